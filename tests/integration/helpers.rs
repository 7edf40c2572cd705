//! Shared test helpers for integration tests.

use std::net::SocketAddr;

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use pingboard_api::{AppState, build_app, build_state};
use pingboard_core::config::AppConfig;
use pingboard_core::types::UserId;

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Shared state, for issuing tokens and inspecting the engine directly
    pub state: AppState,
}

impl TestApp {
    /// Create a new test application backed by in-memory stores
    pub fn new() -> Self {
        let mut config = AppConfig::default();
        config.auth.jwt_secret = "integration-test-secret".to_string();

        let state = build_state(config);
        let router = build_app(state.clone());

        Self { router, state }
    }

    /// Register a user through the API
    pub async fn register(&self, username: &str, password: &str) -> TestResponse {
        self.request(
            "POST",
            "/api/auth/register",
            Some(serde_json::json!({
                "username": username,
                "password": password,
            })),
        )
        .await
    }

    /// Register and log in, returning the access token
    pub async fn login(&self, username: &str, password: &str) -> String {
        let response = self
            .request(
                "POST",
                "/api/auth/login",
                Some(serde_json::json!({
                    "username": username,
                    "password": password,
                })),
            )
            .await;

        assert_eq!(
            response.status,
            StatusCode::OK,
            "Login failed: {:?}",
            response.body
        );

        response.body["data"]["token"]
            .as_str()
            .expect("Login response missing token")
            .to_string()
    }

    /// Issue a token directly, bypassing the HTTP endpoints
    pub fn issue_token(&self, username: &str) -> String {
        self.state
            .jwt_encoder
            .issue(&UserId::from(username))
            .expect("Failed to issue token")
            .token
    }

    /// Make an HTTP request to the test app
    pub async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let req = Request::builder()
            .method(method)
            .uri(path)
            .header("content-type", "application/json")
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }

    /// Serve the app on an ephemeral local port for real WebSocket clients
    pub async fn spawn(&self) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local addr");

        let router = self.router.clone();
        tokio::spawn(async move {
            axum::serve(listener, router)
                .await
                .expect("Test server failed");
        });

        addr
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}
