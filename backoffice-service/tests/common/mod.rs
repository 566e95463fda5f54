//! Test helper module for backoffice-service integration tests.
//!
//! Builds the full router over the in-memory directory so tests drive the
//! HTTP surface without a network listener.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, Response, StatusCode},
    Router,
};
use backoffice_service::{
    build_router,
    config::BackofficeConfig,
    localization::{Localizer, StaticCatalog},
    models::{default_permissions, Role, User},
    services::{AccessControlService, UserAdminService},
    stores::{IdentityStore, InMemoryDirectory},
    utils::{hash_password, Password},
    AppState,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::util::ServiceExt;
use uuid::Uuid;

pub struct TestApp {
    pub app: Router,
    pub directory: Arc<InMemoryDirectory>,
}

impl TestApp {
    /// Router over a fresh directory seeded with the stock role catalog:
    /// `Admin` (static) and `User` (static, default).
    pub async fn new() -> Self {
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

        let localizer: Arc<dyn Localizer> = Arc::new(StaticCatalog);
        let state = AppState {
            config: BackofficeConfig::for_tests(),
            users: UserAdminService::new(directory.clone(), directory.clone()),
            access: AccessControlService::new(
                directory.clone(),
                directory.clone(),
                Arc::new(default_permissions()),
                localizer.clone(),
            ),
            localizer,
        };

        Self {
            app: build_router(state),
            directory,
        }
    }

    /// Insert a user directly into the directory, bypassing the HTTP surface.
    pub async fn seed_user(&self, user_name: &str, password: &str) -> Uuid {
        let hash = hash_password(&Password::new(password.to_string())).unwrap();
        let user = User::new(
            None,
            user_name.to_string(),
            user_name.to_string(),
            format!("{} Example", user_name),
            format!("{}@example.com", user_name.to_lowercase()),
            hash.into_string(),
        );
        let user_id = user.user_id;
        self.directory.insert_user(user).await.unwrap();
        user_id
    }

    pub async fn get(&self, uri: &str) -> Response<Body> {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn get_with_tenant(&self, uri: &str, tenant_id: Uuid) -> Response<Body> {
        self.send(
            Request::builder()
                .uri(uri)
                .header("x-tenant-id", tenant_id.to_string())
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> Response<Body> {
        self.json_request("POST", uri, body).await
    }

    pub async fn put_json(&self, uri: &str, body: Value) -> Response<Body> {
        self.json_request("PUT", uri, body).await
    }

    pub async fn post_empty(&self, uri: &str) -> Response<Body> {
        self.send(
            Request::builder()
                .method("POST")
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    pub async fn delete(&self, uri: &str) -> Response<Body> {
        self.send(
            Request::builder()
                .method("DELETE")
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    async fn json_request(&self, method: &str, uri: &str, body: Value) -> Response<Body> {
        self.send(
            Request::builder()
                .method(method)
                .uri(uri)
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.app.clone().oneshot(request).await.unwrap()
    }
}

/// Read a response body as JSON.
pub async fn read_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Assert the status and return the parsed body.
pub async fn expect_json(response: Response<Body>, status: StatusCode) -> Value {
    assert_eq!(response.status(), status);
    read_json(response).await
}
