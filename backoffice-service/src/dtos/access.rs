//! DTOs for role assignment and permission grants.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::FlattenedPermission;

/// One (name, granted) pair of a bulk permission update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermissionEntry {
    pub name: String,
    pub granted: bool,
}

#[derive(Debug, Deserialize)]
pub struct SetPermissionsRequest {
    pub assigned_permissions: Vec<PermissionEntry>,
}

#[derive(Debug, Serialize)]
pub struct UserPermissionsResponse {
    pub user_id: Uuid,
    pub assigned_permissions: Vec<FlattenedPermission>,
}

#[derive(Debug, Deserialize)]
pub struct GrantPermissionRequest {
    pub permission_name: String,
}

/// One row of the role-picker UI.
#[derive(Debug, Serialize, Deserialize)]
pub struct RoleSelection {
    pub name: String,
    pub display_name: String,
    pub selected: bool,
    pub is_static: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RoleSelectorResponse {
    pub user_id: Uuid,
    pub roles: Vec<RoleSelection>,
}

#[derive(Debug, Deserialize)]
pub struct SetRolesRequest {
    pub roles: Vec<String>,
}
