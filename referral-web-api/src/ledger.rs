use crate::dto::{FeeMethod, WITHDRAWAL_COMPLETED, WITHDRAWAL_FAILED, WITHDRAWAL_PENDING};
use crate::error::ServiceError;
use chrono::Utc;
use referral_db_entity::db::users::{Column as UserColumn, Entity as Users};
use referral_db_entity::db::withdrawals::{
    ActiveModel as WithdrawalActiveModel, Column as WithdrawalColumn, Entity as Withdrawals,
};
use sea_orm::prelude::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveValue, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    TransactionTrait,
};
use tracing::info;
use uuid::Uuid;

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// Withdrawal rules from configuration: [min, max] amount bounds, the
/// activation lock window and the flat fee charged per request.
pub struct WithdrawalPolicy {
    pub min_amount: Decimal,
    pub max_amount: Decimal,
    pub lock_period_days: i64,
    pub fee: Decimal,
}

impl WithdrawalPolicy {
    pub fn lock_period_secs(&self) -> i64 {
        self.lock_period_days * SECONDS_PER_DAY
    }
}

/// Credits a reward posting: `total_earned` and `locked_tokens` both grow
/// by `amount`. `total_earned` is cumulative and never reduced again;
/// `locked_tokens` shrinks only through withdrawal requests. The increment
/// happens inside the UPDATE so racing postings cannot lose each other.
pub async fn post_reward<C: ConnectionTrait>(
    conn: &C,
    wallet: &str,
    amount: Decimal,
) -> Result<(), ServiceError> {
    if amount < Decimal::ZERO {
        return Err(ServiceError::InvalidAmount);
    }
    let result = Users::update_many()
        .col_expr(
            UserColumn::TotalEarned,
            Expr::col(UserColumn::TotalEarned).add(amount),
        )
        .col_expr(
            UserColumn::LockedTokens,
            Expr::col(UserColumn::LockedTokens).add(amount),
        )
        .filter(UserColumn::WalletAddress.eq(wallet))
        .exec(conn)
        .await?;
    if result.rows_affected == 0 {
        return Err(ServiceError::UnknownUser);
    }
    Ok(())
}

/// One-time account activation. Flips `is_active`, stamps the activation
/// time and posts the fixed bonus, all in one transaction. The conditional
/// UPDATE makes repeated calls fail instead of re-granting the bonus.
pub async fn activate(
    db: &DatabaseConnection,
    wallet: &str,
    bonus: Decimal,
) -> Result<(), ServiceError> {
    let txn = db.begin().await?;
    let now = Utc::now().timestamp();

    let result = Users::update_many()
        .col_expr(UserColumn::IsActive, Expr::value(true))
        .col_expr(UserColumn::ActivationTime, Expr::value(now))
        .filter(UserColumn::WalletAddress.eq(wallet))
        .filter(UserColumn::IsActive.eq(false))
        .exec(&txn)
        .await?;
    if result.rows_affected == 0 {
        return Err(match Users::find_by_id(wallet.to_owned()).one(&txn).await? {
            Some(_) => ServiceError::AlreadyActive,
            None => ServiceError::UnknownUser,
        });
    }

    post_reward(&txn, wallet, bonus).await?;
    txn.commit().await?;
    info!("Activated {} with bonus {}", wallet, bonus);
    Ok(())
}

/// Debit-on-request withdrawal: the locked balance is reduced and
/// `total_withdrawn` increased when the request is accepted, not when it
/// settles. The debit UPDATE carries a `locked_tokens >= amount` guard so
/// a racing reward posting or second request cannot overdraw the balance.
pub async fn request_withdrawal(
    db: &DatabaseConnection,
    wallet: &str,
    amount: Decimal,
    fee_method: FeeMethod,
    policy: &WithdrawalPolicy,
) -> Result<i32, ServiceError> {
    let txn = db.begin().await?;

    let user = Users::find_by_id(wallet.to_owned())
        .one(&txn)
        .await?
        .ok_or(ServiceError::UnknownUser)?;
    if !user.is_active {
        return Err(ServiceError::NotActive);
    }
    if amount < policy.min_amount || amount > policy.max_amount {
        return Err(ServiceError::InvalidAmount);
    }
    if amount > user.locked_tokens {
        return Err(ServiceError::InsufficientBalance);
    }
    let activation_time = user.activation_time.ok_or(ServiceError::NotActive)?;
    let now = Utc::now().timestamp();
    if now - activation_time < policy.lock_period_secs() {
        return Err(ServiceError::LockPeriodActive);
    }

    let debit = Users::update_many()
        .col_expr(
            UserColumn::LockedTokens,
            Expr::col(UserColumn::LockedTokens).sub(amount),
        )
        .col_expr(
            UserColumn::TotalWithdrawn,
            Expr::col(UserColumn::TotalWithdrawn).add(amount),
        )
        .filter(UserColumn::WalletAddress.eq(wallet))
        .filter(UserColumn::LockedTokens.gte(amount))
        .exec(&txn)
        .await?;
    if debit.rows_affected == 0 {
        return Err(ServiceError::InsufficientBalance);
    }

    let withdrawal = WithdrawalActiveModel {
        id: ActiveValue::NotSet,
        user_address: ActiveValue::Set(wallet.to_owned()),
        amount: ActiveValue::Set(amount),
        fee: ActiveValue::Set(policy.fee),
        fee_method: ActiveValue::Set(fee_method.to_string()),
        status: ActiveValue::Set(WITHDRAWAL_PENDING.to_owned()),
        settlement_ref: ActiveValue::Set(None),
        requested_at: ActiveValue::Set(now),
        processed_at: ActiveValue::Set(None),
    };
    let inserted = Withdrawals::insert(withdrawal).exec(&txn).await?;

    txn.commit().await?;
    info!("Withdrawal of {} requested by {}", amount, wallet);
    Ok(inserted.last_insert_id)
}

/// Settlement interface for the external transfer collaborator. Moves a
/// pending request to completed or failed and stamps a simulated
/// settlement reference. Balances are untouched here; the debit already
/// happened at request time.
pub async fn settle_withdrawal(
    db: &DatabaseConnection,
    withdrawal_id: i32,
    success: bool,
) -> Result<(), ServiceError> {
    let txn = db.begin().await?;
    let status = if success {
        WITHDRAWAL_COMPLETED
    } else {
        WITHDRAWAL_FAILED
    };
    let reference = format!("sim-{}", Uuid::new_v4());

    let result = Withdrawals::update_many()
        .col_expr(WithdrawalColumn::Status, Expr::value(status))
        .col_expr(
            WithdrawalColumn::ProcessedAt,
            Expr::value(Utc::now().timestamp()),
        )
        .col_expr(WithdrawalColumn::SettlementRef, Expr::value(reference))
        .filter(WithdrawalColumn::Id.eq(withdrawal_id))
        .filter(WithdrawalColumn::Status.eq(WITHDRAWAL_PENDING))
        .exec(&txn)
        .await?;
    if result.rows_affected == 0 {
        return Err(match Withdrawals::find_by_id(withdrawal_id).one(&txn).await? {
            Some(_) => ServiceError::AlreadyTerminal,
            None => ServiceError::NotFound,
        });
    }

    txn.commit().await?;
    Ok(())
}
