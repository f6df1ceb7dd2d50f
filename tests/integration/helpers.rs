//! Shared test helpers for integration tests.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use dashcam_api::{AppState, build_app};
use dashcam_core::config::AppConfig;
use dashcam_database::Stores;
use dashcam_database::memory::MemoryStore;

pub const PASSWORD: &str = "Str0ng!pass";

/// sha256("hello")
pub const HELLO_ID: &str = "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Application config
    pub config: AppConfig,
}

impl TestApp {
    /// Create a new test application over a fresh in-memory store
    pub fn new() -> Self {
        let mut config = AppConfig::default();
        config.database.provider = "memory".to_string();
        config.auth.hash_memory_kib = 8;
        config.auth.hash_iterations = 1;

        let stores = Stores::memory(Arc::new(MemoryStore::new()));
        let state = AppState::new(config.clone(), stores).expect("Failed to build state");

        Self {
            router: build_app(state),
            config,
        }
    }

    /// Send a prepared request
    pub async fn send(&self, req: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024 * 1024)
            .await
            .expect("Failed to read body")
            .to_vec();
        let body: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            body,
            bytes,
        }
    }

    /// Make a JSON request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {}", token));
        }

        self.send(req.body(Body::from(body_str)).expect("Failed to build request"))
            .await
    }

    /// PUT raw bytes
    pub async fn put_bytes(&self, path: &str, bytes: &'static [u8], token: &str) -> TestResponse {
        let req = Request::builder()
            .method("PUT")
            .uri(path)
            .header("Content-Type", "application/octet-stream")
            .header("Authorization", format!("Bearer {}", token))
            .body(Body::from(bytes))
            .expect("Failed to build request");
        self.send(req).await
    }

    /// Register an account and return its id
    pub async fn create_account(&self, email: &str) -> String {
        let response = self
            .request(
                "POST",
                "/Accounts",
                Some(serde_json::json!({
                    "email": email,
                    "fullName": "Test Driver",
                    "password": PASSWORD,
                })),
                None,
            )
            .await;
        assert_eq!(
            response.status,
            StatusCode::CREATED,
            "Account creation failed: {:?}",
            response.body
        );
        response.body["id"]
            .as_str()
            .expect("No id in account response")
            .to_string()
    }

    /// Password grant; returns `(access_token, refresh_token)`
    pub async fn login(&self, email: &str) -> (String, String) {
        let response = self
            .request(
                "POST",
                "/oauth/token",
                Some(serde_json::json!({
                    "grant_type": "password",
                    "username": email,
                    "password": PASSWORD,
                })),
                None,
            )
            .await;
        assert_eq!(
            response.status,
            StatusCode::CREATED,
            "Login failed: {:?}",
            response.body
        );
        let field = |name: &str| {
            response.body[name]
                .as_str()
                .unwrap_or_else(|| panic!("No {name} in token response"))
                .to_string()
        };
        (field("access_token"), field("refresh_token"))
    }

    /// Create an account and log it in; returns the access token
    pub async fn signed_in(&self, email: &str) -> String {
        self.create_account(email).await;
        self.login(email).await.0
    }

    /// Register minimal metadata for `id`
    pub async fn register_video(&self, id: &str, token: &str) -> TestResponse {
        self.request(
            "PUT",
            &format!("/Account/Videos/{id}"),
            Some(serde_json::json!({
                "started": "2024-05-01T08:30:00Z",
                "size": 4,
                "length": 30,
            })),
            Some(token),
        )
        .await
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Parsed JSON body, `Null` when not JSON
    pub body: Value,
    /// Raw body
    pub bytes: Vec<u8>,
}

impl TestResponse {
    /// Codes of the aggregated field errors
    pub fn field_codes(&self) -> Vec<u64> {
        self.body["errors"]
            .as_array()
            .map(|errors| errors.iter().filter_map(|e| e["code"].as_u64()).collect())
            .unwrap_or_default()
    }
}
