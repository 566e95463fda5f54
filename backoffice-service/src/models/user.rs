//! User model - tenant-scoped (or host) user accounts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User entity. `tenant_id = None` marks a host-side user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub user_id: Uuid,
    pub tenant_id: Option<Uuid>,
    pub user_name: String,
    /// Given name; the default listing sort key.
    pub name: String,
    pub full_name: String,
    pub email: String,
    /// Opaque argon2 hash, never exposed through the API.
    pub password_hash: String,
    pub email_confirmed: bool,
    pub phone_confirmed: bool,
    pub lockout_enabled: bool,
    /// Left in place on unlock; only the flag is cleared.
    pub lockout_end_utc: Option<DateTime<Utc>>,
    pub created_utc: DateTime<Utc>,
}

impl User {
    pub fn new(
        tenant_id: Option<Uuid>,
        user_name: String,
        name: String,
        full_name: String,
        email: String,
        password_hash: String,
    ) -> Self {
        Self {
            user_id: Uuid::new_v4(),
            tenant_id,
            user_name,
            name,
            full_name,
            email,
            password_hash,
            email_confirmed: false,
            phone_confirmed: false,
            lockout_enabled: false,
            lockout_end_utc: None,
            created_utc: Utc::now(),
        }
    }

    /// Whether the lockout is in force at `at`.
    pub fn is_locked_out(&self, at: DateTime<Utc>) -> bool {
        self.lockout_enabled && self.lockout_end_utc.map(|end| end > at).unwrap_or(false)
    }
}
