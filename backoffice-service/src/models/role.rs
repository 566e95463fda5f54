//! Role model - named permission bundles assignable to users.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role entity. `tenant_id = None` marks a host-side role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    pub role_id: Uuid,
    pub tenant_id: Option<Uuid>,
    pub name: String,
    pub display_name: String,
    /// Default roles are assigned automatically to newly created users.
    pub is_default: bool,
    /// Static roles are seeded by the host and cannot be removed from the UI.
    pub is_static: bool,
    pub created_utc: DateTime<Utc>,
}

impl Role {
    pub fn new(
        tenant_id: Option<Uuid>,
        name: String,
        display_name: String,
        is_default: bool,
        is_static: bool,
    ) -> Self {
        Self {
            role_id: Uuid::new_v4(),
            tenant_id,
            name,
            display_name,
            is_default,
            is_static,
            created_utc: Utc::now(),
        }
    }
}
