use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::CycleError;

/// One rejected entry of a bulk permission update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryFailure {
    pub name: String,
    pub reason: String,
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("user not found")]
    UserNotFound,

    #[error("role not found: {0}")]
    RoleNotFound(String),

    #[error("permission not found: {0}")]
    PermissionNotFound(String),

    #[error("invalid password")]
    InvalidPassword,

    #[error("passwords do not match")]
    PasswordMismatch,

    #[error("invalid page size: {0}")]
    InvalidPageSize(i64),

    #[error(transparent)]
    CycleDetected(#[from] CycleError),

    #[error("{} permission updates rejected", .0.len())]
    PermissionUpdatesRejected(Vec<EntryFailure>),

    #[error("store error: {0}")]
    Store(#[from] anyhow::Error),
}

impl ServiceError {
    /// Stable key into the localization catalog for the user-facing message.
    pub fn localization_key(&self) -> &'static str {
        match self {
            ServiceError::UserNotFound => "UserNotFound",
            ServiceError::RoleNotFound(_) => "RoleNotFound",
            ServiceError::PermissionNotFound(_) => "PermissionNotFound",
            ServiceError::InvalidPassword => "InvalidPassword",
            ServiceError::PasswordMismatch => "PasswordsNotMatch",
            ServiceError::InvalidPageSize(_) => "InvalidPageSize",
            ServiceError::CycleDetected(_) => "CycleDetected",
            ServiceError::PermissionUpdatesRejected(_) => "PermissionUpdatesRejected",
            ServiceError::Store(_) => "StoreFailure",
        }
    }
}
