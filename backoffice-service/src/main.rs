use std::sync::Arc;

use backoffice_service::{
    build_router,
    config::BackofficeConfig,
    localization::{Localizer, StaticCatalog},
    models::{default_permissions, Role},
    services::{AccessControlService, UserAdminService},
    stores::InMemoryDirectory,
    AppState,
};
use tokio::signal;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Load configuration - fail fast if invalid
    let config = BackofficeConfig::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!(
        service = %config.service_name,
        version = %config.service_version,
        environment = ?config.environment,
        "Starting back-office service"
    );

    // The standalone binary runs against the in-memory directory; a deployment
    // wires real IdentityStore/RoleStore implementations here instead.
    let directory = Arc::new(InMemoryDirectory::new());
    directory
        .seed_role(Role::new(
            None,
            "Admin".to_string(),
            "Administrator".to_string(),
            false,
            true,
        ))
        .await;
    directory
        .seed_role(Role::new(
            None,
            "User".to_string(),
            "Standard user".to_string(),
            true,
            true,
        ))
        .await;
    tracing::info!("Identity directory initialized");

    let registry = Arc::new(default_permissions());
    tracing::info!(permissions = registry.len(), "Permission registry loaded");

    let localizer: Arc<dyn Localizer> = Arc::new(StaticCatalog);
    let users = UserAdminService::new(directory.clone(), directory.clone());
    let access = AccessControlService::new(
        directory.clone(),
        directory.clone(),
        registry,
        localizer.clone(),
    );

    let state = AppState {
        config: config.clone(),
        users,
        access,
        localizer,
    };
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = signal::ctrl_c().await;
            tracing::info!("Shutting down");
        })
        .await?;

    Ok(())
}
