//! In-memory identity directory backing the standalone binary and tests.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{GrantedPermissionSet, Role, User};

use super::{IdentityStore, RoleStore};

#[derive(Debug, Default)]
struct DirectoryState {
    users: HashMap<Uuid, User>,
    roles: Vec<Role>,
    /// user_id -> role names
    memberships: HashMap<Uuid, BTreeSet<String>>,
    /// user_id -> granted permission names
    grants: HashMap<Uuid, BTreeSet<String>>,
}

/// Single-process directory. The `RwLock` serializes mutation, which is the
/// atomic read-modify-write the service layer assumes of its store.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    inner: RwLock<DirectoryState>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn seed_role(&self, role: Role) {
        self.inner.write().await.roles.push(role);
    }
}

#[async_trait]
impl IdentityStore for InMemoryDirectory {
    async fn user_by_id(&self, user_id: Uuid) -> anyhow::Result<Option<User>> {
        Ok(self.inner.read().await.users.get(&user_id).cloned())
    }

    async fn all_users(&self) -> anyhow::Result<Vec<User>> {
        let state = self.inner.read().await;
        let mut users: Vec<User> = state.users.values().cloned().collect();
        // Stable listing order regardless of map iteration order.
        users.sort_by(|a, b| a.user_name.cmp(&b.user_name));
        Ok(users)
    }

    async fn insert_user(&self, user: User) -> anyhow::Result<()> {
        let mut state = self.inner.write().await;
        if state.users.contains_key(&user.user_id) {
            anyhow::bail!("user {} already exists", user.user_id);
        }
        state.users.insert(user.user_id, user);
        Ok(())
    }

    async fn update_user(&self, user: User) -> anyhow::Result<()> {
        let mut state = self.inner.write().await;
        if !state.users.contains_key(&user.user_id) {
            anyhow::bail!("user {} does not exist", user.user_id);
        }
        state.users.insert(user.user_id, user);
        Ok(())
    }

    async fn delete_user(&self, user_id: Uuid) -> anyhow::Result<()> {
        let mut state = self.inner.write().await;
        state.users.remove(&user_id);
        state.memberships.remove(&user_id);
        state.grants.remove(&user_id);
        Ok(())
    }

    async fn add_to_roles(&self, user_id: Uuid, roles: &[String]) -> anyhow::Result<()> {
        let mut state = self.inner.write().await;
        let membership = state.memberships.entry(user_id).or_default();
        for role in roles {
            membership.insert(role.clone());
        }
        Ok(())
    }

    async fn remove_from_role(&self, user_id: Uuid, role: &str) -> anyhow::Result<()> {
        let mut state = self.inner.write().await;
        if let Some(membership) = state.memberships.get_mut(&user_id) {
            membership.remove(role);
        }
        Ok(())
    }

    async fn roles_for_user(&self, user_id: Uuid) -> anyhow::Result<Vec<String>> {
        let state = self.inner.read().await;
        Ok(state
            .memberships
            .get(&user_id)
            .map(|roles| roles.iter().cloned().collect())
            .unwrap_or_default())
    }

    async fn users_in_role(&self, role: &str) -> anyhow::Result<Vec<User>> {
        let state = self.inner.read().await;
        let mut users: Vec<User> = state
            .memberships
            .iter()
            .filter(|(_, roles)| roles.contains(role))
            .filter_map(|(user_id, _)| state.users.get(user_id).cloned())
            .collect();
        users.sort_by(|a, b| a.user_name.cmp(&b.user_name));
        Ok(users)
    }

    async fn grant_permission(&self, user_id: Uuid, permission: &str) -> anyhow::Result<()> {
        let mut state = self.inner.write().await;
        state
            .grants
            .entry(user_id)
            .or_default()
            .insert(permission.to_string());
        Ok(())
    }

    async fn prohibit_permission(&self, user_id: Uuid, permission: &str) -> anyhow::Result<()> {
        let mut state = self.inner.write().await;
        if let Some(grants) = state.grants.get_mut(&user_id) {
            grants.remove(permission);
        }
        Ok(())
    }

    async fn reset_permissions(&self, user_id: Uuid) -> anyhow::Result<()> {
        self.inner.write().await.grants.remove(&user_id);
        Ok(())
    }

    async fn granted_permissions(&self, user_id: Uuid) -> anyhow::Result<GrantedPermissionSet> {
        let state = self.inner.read().await;
        Ok(state
            .grants
            .get(&user_id)
            .map(|grants| grants.iter().cloned().collect())
            .unwrap_or_default())
    }
}

#[async_trait]
impl RoleStore for InMemoryDirectory {
    async fn role_by_name(&self, name: &str) -> anyhow::Result<Option<Role>> {
        let state = self.inner.read().await;
        Ok(state.roles.iter().find(|role| role.name == name).cloned())
    }

    async fn all_roles(&self) -> anyhow::Result<Vec<Role>> {
        Ok(self.inner.read().await.roles.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(user_name: &str) -> User {
        User::new(
            None,
            user_name.to_string(),
            user_name.to_string(),
            format!("{} Example", user_name),
            format!("{}@example.com", user_name),
            "hash".to_string(),
        )
    }

    #[tokio::test]
    async fn delete_user_discards_memberships_and_grants() {
        let directory = InMemoryDirectory::new();
        let alice = user("alice");
        let id = alice.user_id;
        directory.insert_user(alice).await.unwrap();
        directory
            .add_to_roles(id, &["Admin".to_string()])
            .await
            .unwrap();
        directory.grant_permission(id, "Pages.Users").await.unwrap();

        directory.delete_user(id).await.unwrap();

        assert!(directory.user_by_id(id).await.unwrap().is_none());
        assert!(directory.roles_for_user(id).await.unwrap().is_empty());
        assert!(directory.granted_permissions(id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn listing_order_is_stable_by_user_name() {
        let directory = InMemoryDirectory::new();
        for name in ["carol", "alice", "bob"] {
            directory.insert_user(user(name)).await.unwrap();
        }
        let names: Vec<String> = directory
            .all_users()
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.user_name)
            .collect();
        assert_eq!(names, vec!["alice", "bob", "carol"]);
    }

    #[tokio::test]
    async fn prohibit_removes_a_prior_grant() {
        let directory = InMemoryDirectory::new();
        let bob = user("bob");
        let id = bob.user_id;
        directory.insert_user(bob).await.unwrap();

        directory.grant_permission(id, "Pages.Users").await.unwrap();
        assert!(directory
            .granted_permissions(id)
            .await
            .unwrap()
            .contains("Pages.Users"));

        directory
            .prohibit_permission(id, "Pages.Users")
            .await
            .unwrap();
        assert!(!directory
            .granted_permissions(id)
            .await
            .unwrap()
            .contains("Pages.Users"));
    }
}
