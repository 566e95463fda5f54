pub mod config;
pub mod dtos;
pub mod handlers;
pub mod localization;
pub mod middleware;
pub mod models;
pub mod services;
pub mod stores;
pub mod utils;

use std::sync::Arc;

use axum::{
    http::HeaderValue,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::BackofficeConfig;
use crate::localization::Localizer;
use crate::services::{AccessControlService, UserAdminService};

#[derive(Clone)]
pub struct AppState {
    pub config: BackofficeConfig,
    pub users: UserAdminService,
    pub access: AccessControlService,
    pub localizer: Arc<dyn Localizer>,
}

pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

pub fn build_router(state: AppState) -> Router {
    let origins: Vec<HeaderValue> = state
        .config
        .security
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any);

    let user_routes = Router::new()
        .route(
            "/backoffice/users",
            get(handlers::users::list_users).post(handlers::users::create_user),
        )
        .route(
            "/backoffice/users/:user_id",
            get(handlers::users::get_user)
                .put(handlers::users::update_user)
                .delete(handlers::users::delete_user),
        )
        .route("/backoffice/users/:user_id/lock", post(handlers::users::lock_user))
        .route(
            "/backoffice/users/:user_id/unlock",
            post(handlers::users::unlock_user),
        )
        .route(
            "/backoffice/users/:user_id/password",
            post(handlers::users::change_password),
        )
        .route(
            "/backoffice/users/:user_id/password/reset",
            post(handlers::users::reset_password),
        );

    let access_routes = Router::new()
        .route(
            "/backoffice/users/:user_id/permissions",
            get(handlers::access::user_permissions)
                .put(handlers::access::set_permissions)
                .delete(handlers::access::reset_permissions),
        )
        .route(
            "/backoffice/users/:user_id/permissions/granted",
            get(handlers::access::granted_permission_names),
        )
        .route(
            "/backoffice/users/:user_id/permissions/grant",
            post(handlers::access::grant_permission),
        )
        .route(
            "/backoffice/users/:user_id/permissions/prohibit",
            post(handlers::access::prohibit_permission),
        )
        .route(
            "/backoffice/users/:user_id/roles",
            get(handlers::access::role_selector).put(handlers::access::set_roles),
        )
        .route(
            "/backoffice/users/:user_id/roles/:role_name",
            post(handlers::access::add_to_role).delete(handlers::access::remove_from_role),
        )
        .route(
            "/backoffice/roles/:role_name/users",
            get(handlers::access::users_in_role),
        );

    Router::new()
        .route("/health", get(health_check))
        .merge(user_routes)
        .merge(access_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
