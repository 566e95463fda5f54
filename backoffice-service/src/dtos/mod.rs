pub mod access;
pub mod users;

use serde::{Deserialize, Serialize};

use crate::services::error::EntryFailure;

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    /// Per-entry failures of a bulk operation, absent otherwise.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failures: Option<Vec<EntryFailure>>,
}

impl ErrorResponse {
    pub fn new(error: String) -> Self {
        Self {
            error,
            failures: None,
        }
    }
}
