//! Store traits for the identity subsystem.
//!
//! The service layer only ever talks to these traits; a deployment backs them
//! with its directory of record. [`memory::InMemoryDirectory`] implements both
//! for the standalone binary and the test suite.

pub mod memory;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{GrantedPermissionSet, Role, User};

pub use memory::InMemoryDirectory;

/// User records, role membership, and per-user permission grants.
///
/// Implementations must give atomic single-record read-modify-write; the
/// service layer performs no locking of its own.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    async fn user_by_id(&self, user_id: Uuid) -> anyhow::Result<Option<User>>;
    /// Every user, in stable listing order.
    async fn all_users(&self) -> anyhow::Result<Vec<User>>;
    async fn insert_user(&self, user: User) -> anyhow::Result<()>;
    /// Replaces the stored record keyed by `user.user_id`.
    async fn update_user(&self, user: User) -> anyhow::Result<()>;
    /// Also discards the user's role memberships and permission grants.
    async fn delete_user(&self, user_id: Uuid) -> anyhow::Result<()>;

    async fn add_to_roles(&self, user_id: Uuid, roles: &[String]) -> anyhow::Result<()>;
    async fn remove_from_role(&self, user_id: Uuid, role: &str) -> anyhow::Result<()>;
    async fn roles_for_user(&self, user_id: Uuid) -> anyhow::Result<Vec<String>>;
    async fn users_in_role(&self, role: &str) -> anyhow::Result<Vec<User>>;

    async fn grant_permission(&self, user_id: Uuid, permission: &str) -> anyhow::Result<()>;
    async fn prohibit_permission(&self, user_id: Uuid, permission: &str) -> anyhow::Result<()>;
    /// Clears every per-user grant, restoring the role-derived baseline.
    async fn reset_permissions(&self, user_id: Uuid) -> anyhow::Result<()>;
    async fn granted_permissions(&self, user_id: Uuid) -> anyhow::Result<GrantedPermissionSet>;
}

/// Read access to the role catalog.
#[async_trait]
pub trait RoleStore: Send + Sync {
    async fn role_by_name(&self, name: &str) -> anyhow::Result<Option<Role>>;
    async fn all_roles(&self) -> anyhow::Result<Vec<Role>>;
}
