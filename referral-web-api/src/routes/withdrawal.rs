use crate::dto::{
    ResponseData, WithdrawRequest, WithdrawalDetails, RESPONSE_INTERNAL_ERROR, RESPONSE_OK,
};
use crate::ledger::{self, WithdrawalPolicy};
use crate::pool::{Db, ReferralConfig};
use referral_db_entity::db::withdrawals::{Column as WithdrawalColumn, Entity as Withdrawals};
use rocket::{serde::json::Json, State};
use sea_orm::prelude::Decimal;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use sea_orm_rocket::Connection;
use tracing::warn;

#[post(
    "/request_withdrawal",
    format = "application/json",
    data = "<withdraw_request>"
)]
pub async fn request_withdrawal(
    conn: Connection<'_, Db>,
    referral_config: &State<ReferralConfig>,
    withdraw_request: Json<WithdrawRequest>,
) -> Json<ResponseData<i32>> {
    let db = conn.into_inner();
    let policy = withdrawal_policy(referral_config);
    match ledger::request_withdrawal(
        db,
        &withdraw_request.user_address,
        Decimal::from(withdraw_request.amount),
        withdraw_request.fee_method,
        &policy,
    )
    .await
    {
        Ok(withdrawal_id) => Json(ResponseData::new(
            RESPONSE_OK,
            "Withdrawal requested".to_owned(),
            Some(withdrawal_id),
        )),
        Err(error) => Json(error.into_response()),
    }
}

#[get("/withdrawals?<wallet_address>", format = "application/json")]
pub async fn list_withdrawals(
    conn: Connection<'_, Db>,
    wallet_address: String,
) -> Json<ResponseData<Vec<WithdrawalDetails>>> {
    let db = conn.into_inner();
    let withdrawals = Withdrawals::find()
        .filter(WithdrawalColumn::UserAddress.eq(wallet_address.to_owned()))
        .order_by_desc(WithdrawalColumn::RequestedAt)
        .all(db)
        .await;
    match withdrawals {
        Ok(withdrawals) => {
            let withdrawals = withdrawals.iter().map(WithdrawalDetails::new).collect();
            Json(ResponseData::new(
                RESPONSE_OK,
                "".to_owned(),
                Some(withdrawals),
            ))
        }
        Err(error) => {
            warn!(
                "Error fetching withdrawals for {}: {:?}",
                wallet_address, error
            );
            Json(ResponseData::new(
                RESPONSE_INTERNAL_ERROR,
                "Failed to fetch withdrawals".to_owned(),
                None,
            ))
        }
    }
}

pub fn withdrawal_policy(referral_config: &ReferralConfig) -> WithdrawalPolicy {
    WithdrawalPolicy {
        min_amount: Decimal::from(referral_config.withdrawal_min_amount),
        max_amount: Decimal::from(referral_config.withdrawal_max_amount),
        lock_period_days: referral_config.withdrawal_lock_days,
        fee: referral_config.withdrawal_fee,
    }
}
