use crate::error::ServiceError;
use chrono::Utc;
use referral_db_entity::db::referral_edges::ActiveModel as ReferralEdgeActiveModel;
use referral_db_entity::db::referral_edges::Entity as ReferralEdges;
use referral_db_entity::db::users::{
    ActiveModel as UserActiveModel, Column as UserColumn, Entity as Users,
};
use sea_orm::prelude::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, TransactionTrait,
};
use tracing::info;

/// Registers `wallet` under an existing upline. The new-user insert, the
/// upline referral-count increment and the referral edge are one
/// transaction; none of them is observable unless all persist.
pub async fn register(
    db: &DatabaseConnection,
    wallet: &str,
    upline: &str,
) -> Result<(), ServiceError> {
    let txn = db.begin().await?;

    if Users::find_by_id(wallet.to_owned()).one(&txn).await?.is_some() {
        return Err(ServiceError::AlreadyRegistered);
    }
    if Users::find_by_id(upline.to_owned()).one(&txn).await?.is_none() {
        return Err(ServiceError::InvalidUpline);
    }

    let now = Utc::now().timestamp();
    let user = UserActiveModel {
        wallet_address: ActiveValue::Set(wallet.to_owned()),
        upline_address: ActiveValue::Set(Some(upline.to_owned())),
        is_active: ActiveValue::Set(false),
        activation_time: ActiveValue::Set(None),
        total_earned: ActiveValue::Set(Decimal::ZERO),
        locked_tokens: ActiveValue::Set(Decimal::ZERO),
        total_withdrawn: ActiveValue::Set(Decimal::ZERO),
        direct_referrals: ActiveValue::Set(0),
        join_time: ActiveValue::Set(now),
        last_claim_time: ActiveValue::Set(0),
        completed_tasks: ActiveValue::Set(0),
    };
    Users::insert(user).exec(&txn).await?;

    Users::update_many()
        .col_expr(
            UserColumn::DirectReferrals,
            Expr::col(UserColumn::DirectReferrals).add(1),
        )
        .filter(UserColumn::WalletAddress.eq(upline))
        .exec(&txn)
        .await?;

    let edge = ReferralEdgeActiveModel {
        id: ActiveValue::NotSet,
        referrer: ActiveValue::Set(upline.to_owned()),
        referee: ActiveValue::Set(wallet.to_owned()),
        level: ActiveValue::Set(1),
        reward_earned: ActiveValue::Set(Decimal::ZERO),
        created_at: ActiveValue::Set(now),
    };
    ReferralEdges::insert(edge).exec(&txn).await?;

    txn.commit().await?;
    info!("Registered {} under {}", wallet, upline);
    Ok(())
}

/// Out-of-band seeding hook for the first account of a referral tree.
/// Regular registration always requires an existing upline, so the root
/// has to be created through this path (ops tooling, test setup).
pub async fn seed_root(db: &DatabaseConnection, wallet: &str) -> Result<(), ServiceError> {
    if Users::find_by_id(wallet.to_owned()).one(db).await?.is_some() {
        return Err(ServiceError::AlreadyRegistered);
    }
    let user = UserActiveModel {
        wallet_address: ActiveValue::Set(wallet.to_owned()),
        upline_address: ActiveValue::Set(None),
        is_active: ActiveValue::Set(false),
        activation_time: ActiveValue::Set(None),
        total_earned: ActiveValue::Set(Decimal::ZERO),
        locked_tokens: ActiveValue::Set(Decimal::ZERO),
        total_withdrawn: ActiveValue::Set(Decimal::ZERO),
        direct_referrals: ActiveValue::Set(0),
        join_time: ActiveValue::Set(Utc::now().timestamp()),
        last_claim_time: ActiveValue::Set(0),
        completed_tasks: ActiveValue::Set(0),
    };
    Users::insert(user).exec(db).await?;
    Ok(())
}
