use crate::dto::{
    ActivateRequest, GetUserRequest, RegisterRequest, ResponseData, UserDetails,
    RESPONSE_BAD_REQUEST, RESPONSE_INTERNAL_ERROR, RESPONSE_OK,
};
use crate::pool::{Db, ReferralConfig};
use crate::{ledger, registration, sql_stmt};
use referral_db_entity::db::users::Entity as Users;
use rocket::{serde::json::Json, State};
use sea_orm::prelude::Decimal;
use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, Statement};
use sea_orm_rocket::Connection;
use tracing::warn;

#[post("/register", format = "application/json", data = "<register_request>")]
pub async fn register(
    conn: Connection<'_, Db>,
    register_request: Json<RegisterRequest>,
) -> Json<ResponseData<String>> {
    let db = conn.into_inner();
    if register_request.wallet_address.is_empty() || register_request.upline_address.is_empty() {
        return Json(ResponseData::new(
            RESPONSE_BAD_REQUEST,
            "Missing required fields".to_owned(),
            None,
        ));
    }
    match registration::register(
        db,
        &register_request.wallet_address,
        &register_request.upline_address,
    )
    .await
    {
        Ok(()) => Json(ResponseData::new(
            RESPONSE_OK,
            "Registration successful".to_owned(),
            None,
        )),
        Err(error) => Json(error.into_response()),
    }
}

#[post("/activate", format = "application/json", data = "<activate_request>")]
pub async fn activate(
    conn: Connection<'_, Db>,
    referral_config: &State<ReferralConfig>,
    activate_request: Json<ActivateRequest>,
) -> Json<ResponseData<String>> {
    let db = conn.into_inner();
    let bonus = Decimal::from(referral_config.activation_bonus);
    match ledger::activate(db, &activate_request.wallet_address, bonus).await {
        Ok(()) => Json(ResponseData::new(
            RESPONSE_OK,
            format!("Account activated, {} token bonus added", bonus),
            None,
        )),
        Err(error) => Json(error.into_response()),
    }
}

#[post("/get_user", format = "application/json", data = "<get_user_request>")]
pub async fn get_user(
    conn: Connection<'_, Db>,
    get_user_request: Json<GetUserRequest>,
) -> Json<ResponseData<UserDetails>> {
    let db = conn.into_inner();
    let wallet = get_user_request.wallet_address.to_owned();

    let user = Users::find_by_id(wallet.to_owned()).one(db).await;
    match user {
        Ok(Some(user)) => {
            let referral_count = count(db, sql_stmt::REFERRAL_COUNT, &wallet).await;
            let verified_tasks = count(db, sql_stmt::VERIFIED_TASK_COUNT, &wallet).await;
            match (referral_count, verified_tasks) {
                (Ok(referral_count), Ok(verified_tasks)) => Json(ResponseData::new(
                    RESPONSE_OK,
                    "".to_owned(),
                    Some(UserDetails::new(user, referral_count, verified_tasks)),
                )),
                (Err(error), _) | (_, Err(error)) => {
                    warn!("Error counting records for {}: {:?}", wallet, error);
                    Json(ResponseData::new(
                        RESPONSE_INTERNAL_ERROR,
                        "Server error".to_owned(),
                        None,
                    ))
                }
            }
        }
        Ok(None) => Json(ResponseData::new(
            RESPONSE_BAD_REQUEST,
            "User not found".to_owned(),
            None,
        )),
        Err(error) => {
            warn!("Error fetching user {}: {:?}", wallet, error);
            Json(ResponseData::new(
                RESPONSE_INTERNAL_ERROR,
                "Server error".to_owned(),
                None,
            ))
        }
    }
}

async fn count(db: &DatabaseConnection, sql: &str, wallet: &str) -> Result<i64, DbErr> {
    let row = db
        .query_one(Statement::from_sql_and_values(
            db.get_database_backend(),
            sql,
            vec![wallet.to_owned().into()],
        ))
        .await?;
    match row {
        Some(row) => row.try_get("", "total_records"),
        None => Ok(0),
    }
}
