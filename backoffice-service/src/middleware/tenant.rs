//! Tenant context extraction for multi-tenancy support.
//!
//! The surrounding gateway authenticates the caller and forwards the tenant in
//! the `x-tenant-id` header. No header means the caller acts on the host side.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    Json,
};
use uuid::Uuid;

use crate::dtos::ErrorResponse;

pub const TENANT_HEADER: &str = "x-tenant-id";

/// Caller scope: `None` is the host side, `Some` a tenant context.
#[derive(Debug, Clone, Copy)]
pub struct TenantScope(pub Option<Uuid>);

impl TenantScope {
    pub fn is_host(&self) -> bool {
        self.0.is_none()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for TenantScope
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<ErrorResponse>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get(TENANT_HEADER) else {
            return Ok(TenantScope(None));
        };
        let tenant_id = value
            .to_str()
            .ok()
            .and_then(|raw| Uuid::parse_str(raw).ok())
            .ok_or_else(|| {
                (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse::new(format!(
                        "invalid {} header",
                        TENANT_HEADER
                    ))),
                )
            })?;
        Ok(TenantScope(Some(tenant_id)))
    }
}
