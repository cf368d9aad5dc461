use referral_db_entity::db::tasks::Model as TaskModel;
use referral_db_entity::db::users::Model as UserModel;
use referral_db_entity::db::withdrawals::Model as WithdrawalModel;
use rocket::http::Status;
use rocket::request::{FromRequest, Outcome, Request};
use rocket::serde::{Deserialize, Serialize};
use sea_orm::prelude::Decimal;
use sea_orm::QueryResult;
use strum_macros::Display;

pub const RESPONSE_OK: u16 = 200;
pub const RESPONSE_BAD_REQUEST: u16 = 400;
pub const RESPONSE_UNAUTHORIZED: u16 = 401;
pub const RESPONSE_INTERNAL_ERROR: u16 = 500;

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_VERIFIED: &str = "verified";
pub const STATUS_REJECTED: &str = "rejected";

pub const WITHDRAWAL_PENDING: &str = "pending";
pub const WITHDRAWAL_COMPLETED: &str = "completed";
pub const WITHDRAWAL_FAILED: &str = "failed";

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(crate = "rocket::serde")]
pub struct ResponseData<T> {
    pub code: Option<u16>,
    #[serde(rename = "statusCode")]
    pub status_code: Option<u16>,
    pub message: String,
    pub data: Option<T>,
}

impl<T> ResponseData<T> {
    pub fn new(code: u16, message: String, data: Option<T>) -> ResponseData<T> {
        ResponseData {
            code: Some(code),
            status_code: None,
            message,
            data,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Deserialize, Serialize, Display)]
#[serde(crate = "rocket::serde", rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ProofKind {
    Screenshot,
    Link,
}

#[derive(Copy, Clone, Debug, PartialEq, Deserialize, Serialize, Display)]
#[serde(crate = "rocket::serde", rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Decision {
    Verified,
    Rejected,
}

#[derive(Copy, Clone, Debug, PartialEq, Deserialize, Serialize, Display)]
#[serde(crate = "rocket::serde", rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum FeeMethod {
    Native,
    Stable,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(crate = "rocket::serde")]
pub struct RegisterRequest {
    pub wallet_address: String,
    pub upline_address: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(crate = "rocket::serde")]
pub struct GetUserRequest {
    pub wallet_address: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(crate = "rocket::serde")]
pub struct ActivateRequest {
    pub wallet_address: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(crate = "rocket::serde")]
pub struct SubmitProofRequest {
    pub user_address: String,
    pub task_id: i32,
    pub proof_kind: ProofKind,
    pub proof_url: Option<String>,
    pub screenshot_path: Option<String>,
    pub user_name: Option<String>,
    pub additional_notes: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(crate = "rocket::serde")]
pub struct WithdrawRequest {
    pub user_address: String,
    pub amount: u64,
    pub fee_method: FeeMethod,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(crate = "rocket::serde")]
pub struct AdjudicateRequest {
    pub verification_id: i32,
    pub decision: Decision,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(crate = "rocket::serde")]
pub struct SettleWithdrawalRequest {
    pub withdrawal_id: i32,
    pub success: bool,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(crate = "rocket::serde")]
pub struct UserDetails {
    pub wallet_address: String,
    pub upline_address: Option<String>,
    pub is_active: bool,
    pub activation_time: Option<i64>,
    pub total_earned: String,
    pub locked_tokens: String,
    pub total_withdrawn: String,
    pub direct_referrals: i32,
    pub join_time: i64,
    pub last_claim_time: i64,
    pub completed_tasks: i32,
    pub referral_count: i64,
    pub verified_tasks: i64,
}

impl UserDetails {
    pub fn new(user: UserModel, referral_count: i64, verified_tasks: i64) -> UserDetails {
        UserDetails {
            wallet_address: user.wallet_address,
            upline_address: user.upline_address,
            is_active: user.is_active,
            activation_time: user.activation_time,
            total_earned: user.total_earned.to_string(),
            locked_tokens: user.locked_tokens.to_string(),
            total_withdrawn: user.total_withdrawn.to_string(),
            direct_referrals: user.direct_referrals,
            join_time: user.join_time,
            last_claim_time: user.last_claim_time,
            completed_tasks: user.completed_tasks,
            referral_count,
            verified_tasks,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(crate = "rocket::serde")]
pub struct TaskDetails {
    pub task_id: i32,
    pub platform: String,
    pub task_type: String,
    pub task_name: String,
    pub reward: String,
}

impl TaskDetails {
    pub fn new(task: &TaskModel) -> TaskDetails {
        TaskDetails {
            task_id: task.task_id,
            platform: task.platform.to_owned(),
            task_type: task.task_type.to_owned(),
            task_name: task.task_name.to_owned(),
            reward: task.reward.to_string(),
        }
    }
}

/// Row shape of the verification/task join statements in `sql_stmt`.
/// Task columns are nullable since the join is a LEFT JOIN.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(crate = "rocket::serde")]
pub struct VerificationDetails {
    pub id: i32,
    pub user_address: String,
    pub task_id: i32,
    pub proof_kind: String,
    pub proof_url: Option<String>,
    pub screenshot_path: Option<String>,
    pub user_name: Option<String>,
    pub additional_notes: Option<String>,
    pub status: String,
    pub submitted_at: i64,
    pub verified_at: Option<i64>,
    pub verified_by: Option<String>,
    pub reward_distributed: bool,
    pub task_name: Option<String>,
    pub platform: Option<String>,
    pub reward: Option<String>,
}

impl VerificationDetails {
    pub fn new(row: &QueryResult) -> VerificationDetails {
        VerificationDetails {
            id: row.try_get("", "id").unwrap_or_default(),
            user_address: row.try_get("", "user_address").unwrap_or_default(),
            task_id: row.try_get("", "task_id").unwrap_or_default(),
            proof_kind: row.try_get("", "proof_kind").unwrap_or_default(),
            proof_url: row.try_get("", "proof_url").unwrap_or_default(),
            screenshot_path: row.try_get("", "screenshot_path").unwrap_or_default(),
            user_name: row.try_get("", "user_name").unwrap_or_default(),
            additional_notes: row.try_get("", "additional_notes").unwrap_or_default(),
            status: row.try_get("", "status").unwrap_or_default(),
            submitted_at: row.try_get("", "submitted_at").unwrap_or_default(),
            verified_at: row.try_get("", "verified_at").unwrap_or_default(),
            verified_by: row.try_get("", "verified_by").unwrap_or_default(),
            reward_distributed: row.try_get("", "reward_distributed").unwrap_or_default(),
            task_name: row.try_get("", "task_name").unwrap_or_default(),
            platform: row.try_get("", "platform").unwrap_or_default(),
            reward: row
                .try_get::<Option<Decimal>>("", "reward")
                .unwrap_or_default()
                .map(|reward| reward.to_string()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(crate = "rocket::serde")]
pub struct WithdrawalDetails {
    pub id: i32,
    pub user_address: String,
    pub amount: String,
    pub fee: String,
    pub fee_method: String,
    pub status: String,
    pub settlement_ref: Option<String>,
    pub requested_at: i64,
    pub processed_at: Option<i64>,
}

impl WithdrawalDetails {
    pub fn new(withdrawal: &WithdrawalModel) -> WithdrawalDetails {
        WithdrawalDetails {
            id: withdrawal.id,
            user_address: withdrawal.user_address.to_owned(),
            amount: withdrawal.amount.to_string(),
            fee: withdrawal.fee.to_string(),
            fee_method: withdrawal.fee_method.to_owned(),
            status: withdrawal.status.to_owned(),
            settlement_ref: withdrawal.settlement_ref.to_owned(),
            requested_at: withdrawal.requested_at,
            processed_at: withdrawal.processed_at,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(crate = "rocket::serde")]
pub struct StatsDetails {
    pub total_users: i64,
    pub active_users: i64,
    pub total_earned: String,
    pub total_withdrawn: String,
    pub pending_verifications: i64,
}

impl StatsDetails {
    pub fn new(row: &QueryResult) -> StatsDetails {
        StatsDetails {
            total_users: row.try_get("", "total_users").unwrap_or_default(),
            active_users: row.try_get("", "active_users").unwrap_or_default(),
            total_earned: row
                .try_get::<Decimal>("", "total_earned")
                .unwrap_or(Decimal::ZERO)
                .to_string(),
            total_withdrawn: row
                .try_get::<Decimal>("", "total_withdrawn")
                .unwrap_or(Decimal::ZERO)
                .to_string(),
            pending_verifications: row.try_get("", "pending_verifications").unwrap_or_default(),
        }
    }
}

/// Raw value of the `X-Admin-Token` header. Extraction does not authorize
/// anything; routes must pass it through `admin_auth::verify_token` before
/// touching the store.
#[derive(Debug)]
pub struct AdminToken<'r>(&'r str);

#[derive(Debug)]
pub enum AdminTokenError {
    Missing,
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AdminToken<'r> {
    type Error = AdminTokenError;

    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        match req.headers().get_one("X-Admin-Token") {
            None => Outcome::Failure((Status::BadRequest, AdminTokenError::Missing)),
            Some(token) => Outcome::Success(AdminToken(token)),
        }
    }
}

impl<'r> AdminToken<'r> {
    pub fn value(&self) -> &str {
        self.0
    }
}
