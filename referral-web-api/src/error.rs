use crate::dto::{ResponseData, RESPONSE_BAD_REQUEST, RESPONSE_INTERNAL_ERROR};
use sea_orm::DbErr;
use strum_macros::Display;
use tracing::error;

/// Failure kinds of the core services. Routes translate these into the
/// response envelope; the storage variant is logged and surfaced as a
/// generic server error so internal detail never reaches the caller.
#[derive(Debug, Display)]
pub enum ServiceError {
    AlreadyRegistered,
    InvalidUpline,
    UnknownUser,
    UnknownTask,
    DuplicateSubmission,
    NotFound,
    AlreadyTerminal,
    AlreadyActive,
    NotActive,
    InvalidAmount,
    InsufficientBalance,
    LockPeriodActive,
    Storage(DbErr),
}

impl ServiceError {
    pub fn response_code(&self) -> u16 {
        match self {
            ServiceError::Storage(_) => RESPONSE_INTERNAL_ERROR,
            _ => RESPONSE_BAD_REQUEST,
        }
    }

    pub fn message(&self) -> String {
        let message = match self {
            ServiceError::AlreadyRegistered => "Already registered",
            ServiceError::InvalidUpline => "Invalid upline address",
            ServiceError::UnknownUser => "User not found",
            ServiceError::UnknownTask => "Task not found",
            ServiceError::DuplicateSubmission => "Already submitted",
            ServiceError::NotFound => "Record not found",
            ServiceError::AlreadyTerminal => "Already finalized",
            ServiceError::AlreadyActive => "Account already activated",
            ServiceError::NotActive => "Account not activated",
            ServiceError::InvalidAmount => "Amount out of bounds",
            ServiceError::InsufficientBalance => "Insufficient locked tokens",
            ServiceError::LockPeriodActive => "Lock period active",
            ServiceError::Storage(_) => "Server error",
        };
        message.to_owned()
    }

    pub fn into_response<T>(self) -> ResponseData<T> {
        ResponseData::new(self.response_code(), self.message(), None)
    }
}

impl From<DbErr> for ServiceError {
    fn from(error: DbErr) -> Self {
        error!("Storage error: {:?}", error);
        ServiceError::Storage(error)
    }
}
