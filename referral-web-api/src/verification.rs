use crate::dto::{Decision, ProofKind, STATUS_PENDING, STATUS_REJECTED, STATUS_VERIFIED};
use crate::error::ServiceError;
use crate::ledger;
use chrono::Utc;
use referral_db_entity::db::tasks::{Column as TaskColumn, Entity as Tasks};
use referral_db_entity::db::users::{Column as UserColumn, Entity as Users};
use referral_db_entity::db::verifications::{
    ActiveModel as VerificationActiveModel, Column as VerificationColumn, Entity as Verifications,
};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, TransactionTrait,
};
use tracing::info;

pub struct ProofSubmission {
    pub user_address: String,
    pub task_id: i32,
    pub proof_kind: ProofKind,
    pub proof_url: Option<String>,
    pub screenshot_path: Option<String>,
    pub user_name: Option<String>,
    pub additional_notes: Option<String>,
}

/// Records a pending proof submission. One submission per (user, task),
/// no matter what became of the earlier one; the screenshot is only a
/// reference into external storage, its bytes never pass through here.
pub async fn submit_proof(
    db: &DatabaseConnection,
    submission: ProofSubmission,
) -> Result<i32, ServiceError> {
    let txn = db.begin().await?;

    let task = Tasks::find()
        .filter(TaskColumn::TaskId.eq(submission.task_id))
        .filter(TaskColumn::IsActive.eq(true))
        .one(&txn)
        .await?;
    if task.is_none() {
        return Err(ServiceError::UnknownTask);
    }

    let existing = Verifications::find()
        .filter(VerificationColumn::UserAddress.eq(&submission.user_address))
        .filter(VerificationColumn::TaskId.eq(submission.task_id))
        .one(&txn)
        .await?;
    if existing.is_some() {
        return Err(ServiceError::DuplicateSubmission);
    }

    let verification = VerificationActiveModel {
        id: ActiveValue::NotSet,
        user_address: ActiveValue::Set(submission.user_address.to_owned()),
        task_id: ActiveValue::Set(submission.task_id),
        proof_kind: ActiveValue::Set(submission.proof_kind.to_string()),
        proof_url: ActiveValue::Set(submission.proof_url),
        screenshot_path: ActiveValue::Set(submission.screenshot_path),
        user_name: ActiveValue::Set(submission.user_name),
        additional_notes: ActiveValue::Set(submission.additional_notes),
        status: ActiveValue::Set(STATUS_PENDING.to_owned()),
        submitted_at: ActiveValue::Set(Utc::now().timestamp()),
        verified_at: ActiveValue::Set(None),
        verified_by: ActiveValue::Set(None),
        reward_distributed: ActiveValue::Set(false),
    };
    let inserted = Verifications::insert(verification).exec(&txn).await?;

    txn.commit().await?;
    info!(
        "Proof for task {} submitted by {}",
        submission.task_id, submission.user_address
    );
    Ok(inserted.last_insert_id)
}

/// Drives the pending -> verified/rejected transition. The transition is a
/// single conditional UPDATE keyed on the current status being `pending`,
/// so two adjudications of the same id cannot both pass the gate; the
/// loser sees AlreadyTerminal. On `verified` the task reward is posted,
/// the user's completed-task count incremented and `reward_distributed`
/// flipped, all in the same transaction as the transition.
pub async fn adjudicate(
    db: &DatabaseConnection,
    verification_id: i32,
    decision: Decision,
    adjudicator: &str,
) -> Result<(), ServiceError> {
    let txn = db.begin().await?;
    let now = Utc::now().timestamp();
    let status = match decision {
        Decision::Verified => STATUS_VERIFIED,
        Decision::Rejected => STATUS_REJECTED,
    };

    let transition = Verifications::update_many()
        .col_expr(VerificationColumn::Status, Expr::value(status))
        .col_expr(VerificationColumn::VerifiedAt, Expr::value(now))
        .col_expr(VerificationColumn::VerifiedBy, Expr::value(adjudicator))
        .filter(VerificationColumn::Id.eq(verification_id))
        .filter(VerificationColumn::Status.eq(STATUS_PENDING))
        .exec(&txn)
        .await?;
    if transition.rows_affected == 0 {
        return Err(
            match Verifications::find_by_id(verification_id).one(&txn).await? {
                Some(_) => ServiceError::AlreadyTerminal,
                None => ServiceError::NotFound,
            },
        );
    }

    if decision == Decision::Verified {
        let verification = Verifications::find_by_id(verification_id)
            .one(&txn)
            .await?
            .ok_or(ServiceError::NotFound)?;
        if !verification.reward_distributed {
            let task = Tasks::find()
                .filter(TaskColumn::TaskId.eq(verification.task_id))
                .one(&txn)
                .await?
                .ok_or(ServiceError::UnknownTask)?;

            ledger::post_reward(&txn, &verification.user_address, task.reward).await?;

            Users::update_many()
                .col_expr(
                    UserColumn::CompletedTasks,
                    Expr::col(UserColumn::CompletedTasks).add(1),
                )
                .filter(UserColumn::WalletAddress.eq(&verification.user_address))
                .exec(&txn)
                .await?;

            // reward_distributed may flip true at most once.
            let marked = Verifications::update_many()
                .col_expr(VerificationColumn::RewardDistributed, Expr::value(true))
                .filter(VerificationColumn::Id.eq(verification_id))
                .filter(VerificationColumn::RewardDistributed.eq(false))
                .exec(&txn)
                .await?;
            if marked.rows_affected == 0 {
                return Err(ServiceError::AlreadyTerminal);
            }
            info!(
                "Verification {} approved, {} credited to {}",
                verification_id, task.reward, verification.user_address
            );
        }
    }

    txn.commit().await?;
    Ok(())
}
