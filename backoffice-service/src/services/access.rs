//! Role assignment and permission grant orchestration.

use std::collections::BTreeSet;
use std::sync::Arc;

use uuid::Uuid;

use crate::{
    dtos::access::{
        PermissionEntry, RoleSelection, RoleSelectorResponse, UserPermissionsResponse,
    },
    dtos::users::UserSummary,
    localization::Localizer,
    models::{PermissionRegistry, User},
    services::error::{EntryFailure, ServiceError},
    stores::{IdentityStore, RoleStore},
};

#[derive(Clone)]
pub struct AccessControlService {
    identity: Arc<dyn IdentityStore>,
    roles: Arc<dyn RoleStore>,
    registry: Arc<PermissionRegistry>,
    localizer: Arc<dyn Localizer>,
}

impl AccessControlService {
    pub fn new(
        identity: Arc<dyn IdentityStore>,
        roles: Arc<dyn RoleStore>,
        registry: Arc<PermissionRegistry>,
        localizer: Arc<dyn Localizer>,
    ) -> Self {
        Self {
            identity,
            roles,
            registry,
            localizer,
        }
    }

    async fn require_user(&self, user_id: Uuid) -> Result<User, ServiceError> {
        self.identity
            .user_by_id(user_id)
            .await?
            .ok_or(ServiceError::UserNotFound)
    }

    fn require_permission(&self, name: &str) -> Result<(), ServiceError> {
        if self.registry.contains(name) {
            Ok(())
        } else {
            Err(ServiceError::PermissionNotFound(name.to_string()))
        }
    }

    /// The visible permission forest flattened for one user, each entry
    /// carrying its grant status. Caller scope decides the visible top level.
    pub async fn user_permissions(
        &self,
        user_id: Uuid,
        tenant_scoped: bool,
    ) -> Result<UserPermissionsResponse, ServiceError> {
        self.require_user(user_id).await?;
        let granted = self.identity.granted_permissions(user_id).await?;
        let assigned = self
            .registry
            .flatten(&granted, tenant_scoped, self.localizer.as_ref())?;
        Ok(UserPermissionsResponse {
            user_id,
            assigned_permissions: assigned,
        })
    }

    /// Granted permission names only, for menu construction and the like.
    pub async fn granted_permission_names(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<String>, ServiceError> {
        self.require_user(user_id).await?;
        let granted = self.identity.granted_permissions(user_id).await?;
        Ok(granted.names().map(str::to_string).collect())
    }

    pub async fn grant_permission(&self, user_id: Uuid, name: &str) -> Result<(), ServiceError> {
        self.require_permission(name)?;
        self.require_user(user_id).await?;
        self.identity.grant_permission(user_id, name).await?;
        tracing::info!(user_id = %user_id, permission = name, "permission granted");
        Ok(())
    }

    pub async fn prohibit_permission(&self, user_id: Uuid, name: &str) -> Result<(), ServiceError> {
        self.require_permission(name)?;
        self.require_user(user_id).await?;
        self.identity.prohibit_permission(user_id, name).await?;
        tracing::info!(user_id = %user_id, permission = name, "permission prohibited");
        Ok(())
    }

    /// Apply a batch of (name, granted) entries best-effort: one bad entry
    /// does not stop the rest, and every failure is reported at the end.
    pub async fn set_permissions(
        &self,
        user_id: Uuid,
        entries: Vec<PermissionEntry>,
    ) -> Result<(), ServiceError> {
        self.require_user(user_id).await?;

        let mut failures = Vec::new();
        for entry in entries {
            let result = if !self.registry.contains(&entry.name) {
                Err(anyhow::anyhow!("not a registered permission"))
            } else if entry.granted {
                self.identity.grant_permission(user_id, &entry.name).await
            } else {
                self.identity
                    .prohibit_permission(user_id, &entry.name)
                    .await
            };
            if let Err(e) = result {
                failures.push(EntryFailure {
                    name: entry.name,
                    reason: e.to_string(),
                });
            }
        }

        if failures.is_empty() {
            tracing::info!(user_id = %user_id, "permission set replaced");
            Ok(())
        } else {
            tracing::warn!(
                user_id = %user_id,
                rejected = failures.len(),
                "permission set replaced with rejected entries"
            );
            Err(ServiceError::PermissionUpdatesRejected(failures))
        }
    }

    pub async fn reset_permissions(&self, user_id: Uuid) -> Result<(), ServiceError> {
        self.require_user(user_id).await?;
        self.identity.reset_permissions(user_id).await?;
        tracing::info!(user_id = %user_id, "permissions reset");
        Ok(())
    }

    async fn require_role(&self, role_name: &str) -> Result<(), ServiceError> {
        self.roles
            .role_by_name(role_name)
            .await?
            .map(|_| ())
            .ok_or_else(|| ServiceError::RoleNotFound(role_name.to_string()))
    }

    pub async fn add_to_role(&self, user_id: Uuid, role_name: &str) -> Result<(), ServiceError> {
        self.require_role(role_name).await?;
        self.require_user(user_id).await?;
        self.identity
            .add_to_roles(user_id, &[role_name.to_string()])
            .await?;
        tracing::info!(user_id = %user_id, role = role_name, "role assigned");
        Ok(())
    }

    pub async fn remove_from_role(
        &self,
        user_id: Uuid,
        role_name: &str,
    ) -> Result<(), ServiceError> {
        self.require_role(role_name).await?;
        self.require_user(user_id).await?;
        self.identity.remove_from_role(user_id, role_name).await?;
        tracing::info!(user_id = %user_id, role = role_name, "role removed");
        Ok(())
    }

    /// Replace the user's role set. The store only supports single additions
    /// and removals, so the symmetric difference against the current set is
    /// computed and applied; memberships present in both sets are untouched.
    pub async fn set_roles(&self, user_id: Uuid, roles: Vec<String>) -> Result<(), ServiceError> {
        self.require_user(user_id).await?;
        for role_name in &roles {
            self.require_role(role_name).await?;
        }

        let requested: BTreeSet<String> = roles.into_iter().collect();
        let current: BTreeSet<String> =
            self.identity.roles_for_user(user_id).await?.into_iter().collect();

        for stale in current.difference(&requested) {
            self.identity.remove_from_role(user_id, stale).await?;
        }
        let missing: Vec<String> = requested.difference(&current).cloned().collect();
        if !missing.is_empty() {
            self.identity.add_to_roles(user_id, &missing).await?;
        }

        tracing::info!(user_id = %user_id, roles = requested.len(), "role set replaced");
        Ok(())
    }

    /// Every role annotated with whether the user holds it, for the picker UI.
    pub async fn role_selector(
        &self,
        user_id: Uuid,
    ) -> Result<RoleSelectorResponse, ServiceError> {
        self.require_user(user_id).await?;
        let held: BTreeSet<String> =
            self.identity.roles_for_user(user_id).await?.into_iter().collect();
        let roles = self
            .roles
            .all_roles()
            .await?
            .into_iter()
            .map(|role| RoleSelection {
                selected: held.contains(&role.name),
                name: role.name,
                display_name: role.display_name,
                is_static: role.is_static,
            })
            .collect();
        Ok(RoleSelectorResponse { user_id, roles })
    }

    pub async fn users_in_role(&self, role_name: &str) -> Result<Vec<UserSummary>, ServiceError> {
        self.require_role(role_name).await?;
        let users = self.identity.users_in_role(role_name).await?;
        Ok(users.into_iter().map(UserSummary::from).collect())
    }
}
