//! User administration: listing pipeline, CRUD, lockout, and passwords.

use std::sync::Arc;

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::{
    dtos::users::{
        ChangePasswordRequest, CreateUserRequest, PageRequest, ResetPasswordRequest,
        UpdateUserRequest, UserSummary, UsersPage,
    },
    models::User,
    services::ServiceError,
    stores::{IdentityStore, RoleStore},
    utils::{hash_password, verify_password, Password, PasswordHashString},
};

/// How long a lockout lasts.
pub const LOCKOUT_DAYS: i64 = 5;

#[derive(Clone)]
pub struct UserAdminService {
    identity: Arc<dyn IdentityStore>,
    roles: Arc<dyn RoleStore>,
}

impl UserAdminService {
    pub fn new(identity: Arc<dyn IdentityStore>, roles: Arc<dyn RoleStore>) -> Self {
        Self { identity, roles }
    }

    async fn require_user(&self, user_id: Uuid) -> Result<User, ServiceError> {
        self.identity
            .user_by_id(user_id)
            .await?
            .ok_or(ServiceError::UserNotFound)
    }

    /// Filter by username substring, sort by the requested field, page by
    /// skip/take. `get_all` short-circuits the whole pipeline.
    pub async fn list_users(&self, req: PageRequest) -> Result<UsersPage, ServiceError> {
        let users = self.identity.all_users().await?;

        if req.get_all {
            return Ok(UsersPage {
                page: 0,
                rows: 0,
                remaining_pages: 0,
                search: String::new(),
                sort: String::new(),
                sort_dir: String::new(),
                users: users.into_iter().map(UserSummary::from).collect(),
            });
        }

        if req.rows_per_page <= 0 {
            return Err(ServiceError::InvalidPageSize(req.rows_per_page));
        }

        let mut filtered = filter_by_user_name(users, &req.search);
        sort_users(&mut filtered, &req.sort, &req.sort_dir);

        let remaining_pages = remaining_pages(filtered.len() as i64, req.rows_per_page);
        let skip = skip_total(req.page, req.rows_per_page);
        let page: Vec<UserSummary> = filtered
            .into_iter()
            .skip(skip)
            .take(req.rows_per_page as usize)
            .map(UserSummary::from)
            .collect();

        Ok(UsersPage {
            page: req.page,
            rows: req.rows_per_page,
            remaining_pages,
            search: req.search,
            sort: req.sort,
            sort_dir: req.sort_dir,
            users: page,
        })
    }

    /// Create a user, mark the email confirmed, and hand out every role
    /// flagged as default.
    pub async fn create_user(
        &self,
        tenant_id: Option<Uuid>,
        req: CreateUserRequest,
    ) -> Result<UserSummary, ServiceError> {
        let hash = hash_password(&Password::new(req.password))?;
        let mut user = User::new(
            tenant_id,
            req.user_name,
            req.name,
            req.full_name,
            req.email,
            hash.into_string(),
        );
        user.email_confirmed = true;

        let user_id = user.user_id;
        let summary = UserSummary::from(user.clone());
        self.identity.insert_user(user).await?;

        let default_roles: Vec<String> = self
            .roles
            .all_roles()
            .await?
            .into_iter()
            .filter(|role| role.is_default)
            .map(|role| role.name)
            .collect();
        if !default_roles.is_empty() {
            self.identity.add_to_roles(user_id, &default_roles).await?;
        }

        tracing::info!(user_id = %user_id, roles = default_roles.len(), "user created");
        Ok(summary)
    }

    pub async fn get_user(&self, user_id: Uuid) -> Result<UserSummary, ServiceError> {
        Ok(UserSummary::from(self.require_user(user_id).await?))
    }

    pub async fn update_user(
        &self,
        user_id: Uuid,
        req: UpdateUserRequest,
    ) -> Result<UserSummary, ServiceError> {
        let mut user = self.require_user(user_id).await?;
        if let Some(user_name) = req.user_name {
            user.user_name = user_name;
        }
        if let Some(name) = req.name {
            user.name = name;
        }
        if let Some(full_name) = req.full_name {
            user.full_name = full_name;
        }
        if let Some(email) = req.email {
            user.email = email;
        }
        let summary = UserSummary::from(user.clone());
        self.identity.update_user(user).await?;
        Ok(summary)
    }

    pub async fn delete_user(&self, user_id: Uuid) -> Result<(), ServiceError> {
        self.require_user(user_id).await?;
        self.identity.delete_user(user_id).await?;
        tracing::info!(user_id = %user_id, "user deleted");
        Ok(())
    }

    /// Set the lockout flag and push the expiry five days out.
    pub async fn lock_user(&self, user_id: Uuid) -> Result<(), ServiceError> {
        let mut user = self.require_user(user_id).await?;
        user.lockout_enabled = true;
        user.lockout_end_utc = Some(Utc::now() + Duration::days(LOCKOUT_DAYS));
        self.identity.update_user(user).await?;
        tracing::info!(user_id = %user_id, "user locked");
        Ok(())
    }

    /// Clear the flag only; the stored expiry is overwritten on the next lock.
    pub async fn unlock_user(&self, user_id: Uuid) -> Result<(), ServiceError> {
        let mut user = self.require_user(user_id).await?;
        user.lockout_enabled = false;
        self.identity.update_user(user).await?;
        tracing::info!(user_id = %user_id, "user unlocked");
        Ok(())
    }

    /// Verify the current password, then store a hash of the new one. A match
    /// with stale hash parameters still counts as a match.
    pub async fn change_password(
        &self,
        user_id: Uuid,
        req: ChangePasswordRequest,
    ) -> Result<(), ServiceError> {
        let mut user = self.require_user(user_id).await?;

        let stored = PasswordHashString::new(user.password_hash.clone());
        let outcome = verify_password(&Password::new(req.current_password), &stored)?;
        if !outcome.is_match() {
            return Err(ServiceError::InvalidPassword);
        }

        user.password_hash = hash_password(&Password::new(req.new_password))?.into_string();
        self.identity.update_user(user).await?;
        tracing::info!(user_id = %user_id, "password changed");
        Ok(())
    }

    /// Administrative reset: no current password, but the confirmation must
    /// match the new password exactly.
    pub async fn reset_password(
        &self,
        user_id: Uuid,
        req: ResetPasswordRequest,
    ) -> Result<(), ServiceError> {
        if req.new_password != req.new_password_confirmation {
            return Err(ServiceError::PasswordMismatch);
        }
        let mut user = self.require_user(user_id).await?;
        user.password_hash = hash_password(&Password::new(req.new_password))?.into_string();
        self.identity.update_user(user).await?;
        tracing::info!(user_id = %user_id, "password reset by administrator");
        Ok(())
    }
}

fn filter_by_user_name(users: Vec<User>, search: &str) -> Vec<User> {
    if search.is_empty() {
        return users;
    }
    let needle = search.to_uppercase();
    users
        .into_iter()
        .filter(|user| user.user_name.to_uppercase().contains(&needle))
        .collect()
}

fn sort_users(users: &mut [User], sort: &str, sort_dir: &str) {
    let descending = sort_dir == "desc";
    users.sort_by(|a, b| {
        let (ka, kb) = match sort {
            "UserName" => (&a.user_name, &b.user_name),
            "FullName" => (&a.full_name, &b.full_name),
            // Unrecognized fields fall back to the default rather than failing.
            _ => (&a.name, &b.name),
        };
        let ord = ka.to_uppercase().cmp(&kb.to_uppercase());
        if descending {
            ord.reverse()
        } else {
            ord
        }
    });
}

fn remaining_pages(count: i64, rows_per_page: i64) -> i64 {
    // Overflow-free ceiling division; rows_per_page is validated > 0.
    count / rows_per_page + i64::from(count % rows_per_page != 0)
}

fn skip_total(page: i64, rows_per_page: i64) -> usize {
    // page is clamped to >= 1 first, so the subtraction cannot wrap. An
    // overflowing product just skips past the end of any real list.
    (page.max(1) - 1)
        .checked_mul(rows_per_page)
        .map(|skip| skip as usize)
        .unwrap_or(usize::MAX)
}
