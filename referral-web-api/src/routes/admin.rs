use crate::dto::{
    AdjudicateRequest, AdminToken, ResponseData, SettleWithdrawalRequest, StatsDetails,
    VerificationDetails, RESPONSE_INTERNAL_ERROR, RESPONSE_OK, RESPONSE_UNAUTHORIZED,
};
use crate::pool::{Db, ReferralConfig};
use crate::{admin_auth, ledger, sql_stmt, verification};
use rocket::{serde::json::Json, State};
use sea_orm::{ConnectionTrait, Statement};
use sea_orm_rocket::Connection;
use tracing::warn;

pub const ADJUDICATOR: &str = "admin";

// The token check is the first thing every admin path does; an
// unauthorized caller learns nothing about which records exist.
fn authorized(token: &AdminToken<'_>, referral_config: &ReferralConfig) -> bool {
    admin_auth::verify_token(token.value(), &referral_config.admin_token_sha256)
}

fn unauthorized<T>() -> Json<ResponseData<T>> {
    Json(ResponseData::new(
        RESPONSE_UNAUTHORIZED,
        "Unauthorized".to_owned(),
        None,
    ))
}

#[get("/admin/pending_verifications", format = "application/json")]
pub async fn pending_verifications(
    conn: Connection<'_, Db>,
    referral_config: &State<ReferralConfig>,
    admin_token: AdminToken<'_>,
) -> Json<ResponseData<Vec<VerificationDetails>>> {
    if !authorized(&admin_token, referral_config) {
        return unauthorized();
    }
    let db = conn.into_inner();
    let rows = db
        .query_all(Statement::from_string(
            db.get_database_backend(),
            sql_stmt::PENDING_VERIFICATIONS.to_owned(),
        ))
        .await;
    match rows {
        Ok(rows) => {
            let verifications = rows.iter().map(VerificationDetails::new).collect();
            Json(ResponseData::new(
                RESPONSE_OK,
                "".to_owned(),
                Some(verifications),
            ))
        }
        Err(error) => {
            warn!("Error fetching pending verifications: {:?}", error);
            Json(ResponseData::new(
                RESPONSE_INTERNAL_ERROR,
                "Failed to fetch verifications".to_owned(),
                None,
            ))
        }
    }
}

#[post(
    "/admin/adjudicate",
    format = "application/json",
    data = "<adjudicate_request>"
)]
pub async fn adjudicate(
    conn: Connection<'_, Db>,
    referral_config: &State<ReferralConfig>,
    admin_token: AdminToken<'_>,
    adjudicate_request: Json<AdjudicateRequest>,
) -> Json<ResponseData<String>> {
    if !authorized(&admin_token, referral_config) {
        return unauthorized();
    }
    let db = conn.into_inner();
    match verification::adjudicate(
        db,
        adjudicate_request.verification_id,
        adjudicate_request.decision,
        ADJUDICATOR,
    )
    .await
    {
        Ok(()) => Json(ResponseData::new(
            RESPONSE_OK,
            "Verification updated".to_owned(),
            None,
        )),
        Err(error) => Json(error.into_response()),
    }
}

#[post(
    "/admin/settle_withdrawal",
    format = "application/json",
    data = "<settle_request>"
)]
pub async fn settle_withdrawal(
    conn: Connection<'_, Db>,
    referral_config: &State<ReferralConfig>,
    admin_token: AdminToken<'_>,
    settle_request: Json<SettleWithdrawalRequest>,
) -> Json<ResponseData<String>> {
    if !authorized(&admin_token, referral_config) {
        return unauthorized();
    }
    let db = conn.into_inner();
    match ledger::settle_withdrawal(db, settle_request.withdrawal_id, settle_request.success).await
    {
        Ok(()) => Json(ResponseData::new(
            RESPONSE_OK,
            "Withdrawal updated".to_owned(),
            None,
        )),
        Err(error) => Json(error.into_response()),
    }
}

#[get("/admin/stats", format = "application/json")]
pub async fn stats(
    conn: Connection<'_, Db>,
    referral_config: &State<ReferralConfig>,
    admin_token: AdminToken<'_>,
) -> Json<ResponseData<StatsDetails>> {
    if !authorized(&admin_token, referral_config) {
        return unauthorized();
    }
    let db = conn.into_inner();
    let row = db
        .query_one(Statement::from_string(
            db.get_database_backend(),
            sql_stmt::PLATFORM_STATS.to_owned(),
        ))
        .await;
    match row {
        Ok(Some(row)) => Json(ResponseData::new(
            RESPONSE_OK,
            "".to_owned(),
            Some(StatsDetails::new(&row)),
        )),
        Ok(None) => Json(ResponseData::new(
            RESPONSE_INTERNAL_ERROR,
            "Failed to fetch stats".to_owned(),
            None,
        )),
        Err(error) => {
            warn!("Error fetching stats: {:?}", error);
            Json(ResponseData::new(
                RESPONSE_INTERNAL_ERROR,
                "Failed to fetch stats".to_owned(),
                None,
            ))
        }
    }
}
