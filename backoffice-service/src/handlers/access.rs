//! HTTP surface for role assignment and permission grants.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use uuid::Uuid;

use crate::{
    dtos::access::{GrantPermissionRequest, SetPermissionsRequest, SetRolesRequest},
    dtos::ErrorResponse,
    middleware::TenantScope,
    AppState,
};

use super::reject;

type Rejection = (StatusCode, Json<ErrorResponse>);

#[axum::debug_handler]
pub async fn user_permissions(
    State(state): State<AppState>,
    scope: TenantScope,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, Rejection> {
    let response = state
        .access
        .user_permissions(user_id, !scope.is_host())
        .await
        .map_err(|e| reject(state.localizer.as_ref(), e))?;
    Ok(Json(response))
}

#[axum::debug_handler]
pub async fn granted_permission_names(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, Rejection> {
    let names = state
        .access
        .granted_permission_names(user_id)
        .await
        .map_err(|e| reject(state.localizer.as_ref(), e))?;
    Ok(Json(json!({ "user_id": user_id, "permissions": names })))
}

#[axum::debug_handler]
pub async fn grant_permission(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(req): Json<GrantPermissionRequest>,
) -> Result<impl IntoResponse, Rejection> {
    state
        .access
        .grant_permission(user_id, &req.permission_name)
        .await
        .map_err(|e| reject(state.localizer.as_ref(), e))?;
    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler]
pub async fn prohibit_permission(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(req): Json<GrantPermissionRequest>,
) -> Result<impl IntoResponse, Rejection> {
    state
        .access
        .prohibit_permission(user_id, &req.permission_name)
        .await
        .map_err(|e| reject(state.localizer.as_ref(), e))?;
    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler]
pub async fn set_permissions(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(req): Json<SetPermissionsRequest>,
) -> Result<impl IntoResponse, Rejection> {
    state
        .access
        .set_permissions(user_id, req.assigned_permissions)
        .await
        .map_err(|e| reject(state.localizer.as_ref(), e))?;
    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler]
pub async fn reset_permissions(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, Rejection> {
    state
        .access
        .reset_permissions(user_id)
        .await
        .map_err(|e| reject(state.localizer.as_ref(), e))?;
    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler]
pub async fn role_selector(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, Rejection> {
    let selector = state
        .access
        .role_selector(user_id)
        .await
        .map_err(|e| reject(state.localizer.as_ref(), e))?;
    Ok(Json(selector))
}

#[axum::debug_handler]
pub async fn set_roles(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(req): Json<SetRolesRequest>,
) -> Result<impl IntoResponse, Rejection> {
    state
        .access
        .set_roles(user_id, req.roles)
        .await
        .map_err(|e| reject(state.localizer.as_ref(), e))?;
    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler]
pub async fn add_to_role(
    State(state): State<AppState>,
    Path((user_id, role_name)): Path<(Uuid, String)>,
) -> Result<impl IntoResponse, Rejection> {
    state
        .access
        .add_to_role(user_id, &role_name)
        .await
        .map_err(|e| reject(state.localizer.as_ref(), e))?;
    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler]
pub async fn remove_from_role(
    State(state): State<AppState>,
    Path((user_id, role_name)): Path<(Uuid, String)>,
) -> Result<impl IntoResponse, Rejection> {
    state
        .access
        .remove_from_role(user_id, &role_name)
        .await
        .map_err(|e| reject(state.localizer.as_ref(), e))?;
    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler]
pub async fn users_in_role(
    State(state): State<AppState>,
    Path(role_name): Path<String>,
) -> Result<impl IntoResponse, Rejection> {
    let users = state
        .access
        .users_in_role(&role_name)
        .await
        .map_err(|e| reject(state.localizer.as_ref(), e))?;
    Ok(Json(users))
}
