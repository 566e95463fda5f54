//! DTOs for user administration: listing, CRUD, lockout, and passwords.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::User;

/// Paging, filtering, and sorting parameters of a user listing request.
#[derive(Debug, Clone, Deserialize)]
pub struct PageRequest {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_rows")]
    pub rows_per_page: i64,
    /// Escape hatch for small datasets: return everything, no paging.
    #[serde(default)]
    pub get_all: bool,
    /// Case-insensitive substring filter on the username; empty means no filter.
    #[serde(default)]
    pub search: String,
    /// `UserName`, `FullName`, or anything else for the default `Name` field.
    #[serde(default = "default_sort")]
    pub sort: String,
    /// `desc` for descending, anything else for ascending.
    #[serde(default = "default_sort_dir")]
    pub sort_dir: String,
}

fn default_page() -> i64 {
    1
}

fn default_rows() -> i64 {
    10
}

fn default_sort() -> String {
    "Name".to_string()
}

fn default_sort_dir() -> String {
    "asc".to_string()
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: default_page(),
            rows_per_page: default_rows(),
            get_all: false,
            search: String::new(),
            sort: default_sort(),
            sort_dir: default_sort_dir(),
        }
    }
}

/// User row as exposed by the listing API (no credential material).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSummary {
    pub user_id: Uuid,
    pub tenant_id: Option<Uuid>,
    pub user_name: String,
    pub name: String,
    pub full_name: String,
    pub email: String,
    pub email_confirmed: bool,
    pub lockout_enabled: bool,
    /// Whether the lockout is actually in force right now (flag set and the
    /// expiry not yet passed), as the listing UI displays it.
    pub locked_out: bool,
    pub lockout_end_utc: Option<DateTime<Utc>>,
    pub created_utc: DateTime<Utc>,
}

impl From<User> for UserSummary {
    fn from(u: User) -> Self {
        let locked_out = u.is_locked_out(Utc::now());
        Self {
            user_id: u.user_id,
            tenant_id: u.tenant_id,
            user_name: u.user_name,
            name: u.name,
            full_name: u.full_name,
            email: u.email,
            email_confirmed: u.email_confirmed,
            lockout_enabled: u.lockout_enabled,
            locked_out,
            lockout_end_utc: u.lockout_end_utc,
            created_utc: u.created_utc,
        }
    }
}

/// One page of users, echoing the request parameters so the client can
/// restore its listing state.
#[derive(Debug, Serialize, Deserialize)]
pub struct UsersPage {
    pub page: i64,
    pub rows: i64,
    pub remaining_pages: i64,
    pub search: String,
    pub sort: String,
    pub sort_dir: String,
    pub users: Vec<UserSummary>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, message = "Username must not be empty"))]
    pub user_name: String,
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: String,
    pub full_name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    pub user_name: Option<String>,
    pub name: Option<String>,
    pub full_name: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    #[validate(length(min = 8, message = "New password must be at least 8 characters"))]
    pub new_password: String,
}

/// Administrative reset: no current password, but the new one is typed twice.
#[derive(Debug, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    #[validate(length(min = 8, message = "New password must be at least 8 characters"))]
    pub new_password: String,
    pub new_password_confirmation: String,
}
