pub mod access;
pub mod users;

use axum::{http::StatusCode, Json};
use validator::ValidationErrors;

use crate::{
    dtos::ErrorResponse,
    localization::Localizer,
    services::ServiceError,
};

/// Map a service failure to an HTTP status and a localized message.
pub(crate) fn reject(
    localizer: &dyn Localizer,
    err: ServiceError,
) -> (StatusCode, Json<ErrorResponse>) {
    let status = match &err {
        ServiceError::UserNotFound
        | ServiceError::RoleNotFound(_)
        | ServiceError::PermissionNotFound(_) => StatusCode::NOT_FOUND,
        ServiceError::InvalidPassword
        | ServiceError::PasswordMismatch
        | ServiceError::InvalidPageSize(_) => StatusCode::BAD_REQUEST,
        ServiceError::PermissionUpdatesRejected(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ServiceError::CycleDetected(_) | ServiceError::Store(_) => {
            tracing::error!(error = %err, "request failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let message = match &err {
        ServiceError::RoleNotFound(name) | ServiceError::PermissionNotFound(name) => {
            format!("{}: {}", localizer.localize(err.localization_key()), name)
        }
        _ => localizer.localize(err.localization_key()),
    };

    let failures = match err {
        ServiceError::PermissionUpdatesRejected(failures) => Some(failures),
        _ => None,
    };

    (
        status,
        Json(ErrorResponse {
            error: message,
            failures,
        }),
    )
}

/// 422 with the validator's message, shared by every inbound DTO check.
pub(crate) fn invalid(errors: ValidationErrors) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ErrorResponse::new(format!("Validation error: {}", errors))),
    )
}
