//! HTTP surface for user administration.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dtos::users::{
        ChangePasswordRequest, CreateUserRequest, PageRequest, ResetPasswordRequest,
        UpdateUserRequest,
    },
    dtos::ErrorResponse,
    middleware::TenantScope,
    AppState,
};

use super::{invalid, reject};

type Rejection = (StatusCode, Json<ErrorResponse>);

#[axum::debug_handler]
pub async fn list_users(
    State(state): State<AppState>,
    Query(req): Query<PageRequest>,
) -> Result<impl IntoResponse, Rejection> {
    let page = state
        .users
        .list_users(req)
        .await
        .map_err(|e| reject(state.localizer.as_ref(), e))?;
    Ok(Json(page))
}

#[axum::debug_handler]
pub async fn create_user(
    State(state): State<AppState>,
    scope: TenantScope,
    Json(req): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, Rejection> {
    req.validate().map_err(invalid)?;
    let summary = state
        .users
        .create_user(scope.0, req)
        .await
        .map_err(|e| reject(state.localizer.as_ref(), e))?;
    Ok((StatusCode::CREATED, Json(summary)))
}

#[axum::debug_handler]
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, Rejection> {
    let summary = state
        .users
        .get_user(user_id)
        .await
        .map_err(|e| reject(state.localizer.as_ref(), e))?;
    Ok(Json(summary))
}

#[axum::debug_handler]
pub async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<impl IntoResponse, Rejection> {
    req.validate().map_err(invalid)?;
    let summary = state
        .users
        .update_user(user_id, req)
        .await
        .map_err(|e| reject(state.localizer.as_ref(), e))?;
    Ok(Json(summary))
}

#[axum::debug_handler]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, Rejection> {
    state
        .users
        .delete_user(user_id)
        .await
        .map_err(|e| reject(state.localizer.as_ref(), e))?;
    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler]
pub async fn lock_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, Rejection> {
    state
        .users
        .lock_user(user_id)
        .await
        .map_err(|e| reject(state.localizer.as_ref(), e))?;
    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler]
pub async fn unlock_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, Rejection> {
    state
        .users
        .unlock_user(user_id)
        .await
        .map_err(|e| reject(state.localizer.as_ref(), e))?;
    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler]
pub async fn change_password(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<impl IntoResponse, Rejection> {
    req.validate().map_err(invalid)?;
    state
        .users
        .change_password(user_id, req)
        .await
        .map_err(|e| reject(state.localizer.as_ref(), e))?;
    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler]
pub async fn reset_password(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(req): Json<ResetPasswordRequest>,
) -> Result<impl IntoResponse, Rejection> {
    req.validate().map_err(invalid)?;
    state
        .users
        .reset_password(user_id, req)
        .await
        .map_err(|e| reject(state.localizer.as_ref(), e))?;
    Ok(StatusCode::NO_CONTENT)
}
