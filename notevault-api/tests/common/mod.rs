/// Common test utilities for integration tests
///
/// This module provides shared infrastructure for integration tests:
/// - An app wired to a fresh in-memory store
/// - Request helpers returning status and parsed JSON
/// - Registration/login shortcuts

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use notevault_api::app::{build_router, AppState};
use notevault_api::config::{ApiConfig, Config, DatabaseConfig, JwtConfig, StoreBackend, StoreConfig};
use notevault_shared::store::memory::MemoryStore;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

pub const JWT_SECRET: &str = "integration-test-secret-at-least-32-chars";

/// Test context holding the router
pub struct TestContext {
    pub app: Router,
}

/// Response status plus the JSON body (`Value::Null` when empty)
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestContext {
    /// Creates an app backed by an empty in-memory store
    pub fn new() -> Self {
        let config = Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors_origins: vec!["*".to_string()],
                production: false,
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 1,
            },
            store: StoreConfig {
                backend: StoreBackend::Memory,
            },
            jwt: JwtConfig {
                secret: JWT_SECRET.to_string(),
            },
        };

        let state = AppState::new(Arc::new(MemoryStore::new()), config);

        Self {
            app: build_router(state),
        }
    }

    /// Sends a request and collects the response
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };

        TestResponse { status, body }
    }

    /// Registers a user and returns the issued token
    pub async fn register(&self, email: &str, role: Option<&str>) -> String {
        let mut payload = json!({ "email": email, "password": "password123" });
        if let Some(role) = role {
            payload["role"] = json!(role);
        }

        let response = self.request("POST", "/register", None, Some(payload)).await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);

        response.body["token"].as_str().unwrap().to_string()
    }

    /// Creates a note and returns its JSON
    pub async fn create_note(&self, token: &str, title: &str, content: &str) -> Value {
        let response = self
            .request(
                "POST",
                "/notes",
                Some(token),
                Some(json!({ "title": title, "content": content })),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);

        response.body
    }

    /// Lists notes with a raw query string
    pub async fn list_titles(&self, token: &str, query: &str) -> Vec<String> {
        let uri = if query.is_empty() {
            "/notes".to_string()
        } else {
            format!("/notes?{}", query)
        };

        let response = self.request("GET", &uri, Some(token), None).await;
        assert_eq!(response.status, StatusCode::OK, "{}", response.body);

        response
            .body
            .as_array()
            .unwrap()
            .iter()
            .map(|note| note["title"].as_str().unwrap().to_string())
            .collect()
    }
}
