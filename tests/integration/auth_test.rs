//! Integration tests for registration and login.

use http::StatusCode;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_register_success() {
    let app = TestApp::new();

    let response = app.register("alice", "password123").await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["success"], true);
}

#[tokio::test]
async fn test_register_duplicate_username() {
    let app = TestApp::new();

    let first = app.register("alice", "password123").await;
    assert_eq!(first.status, StatusCode::CREATED);

    let second = app.register("alice", "different-password").await;
    assert_eq!(second.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_register_short_password() {
    let app = TestApp::new();

    let response = app.register("alice", "short").await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_success() {
    let app = TestApp::new();
    app.register("testuser", "password123").await;

    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(serde_json::json!({
                "username": "testuser",
                "password": "password123",
            })),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body["data"]["token"].as_str().is_some());
    assert_eq!(
        response.body["data"]["username"].as_str().unwrap(),
        "testuser"
    );
}

#[tokio::test]
async fn test_login_invalid_password() {
    let app = TestApp::new();
    app.register("testuser2", "password123").await;

    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(serde_json::json!({
                "username": "testuser2",
                "password": "wrongpassword",
            })),
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_nonexistent_user() {
    let app = TestApp::new();

    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(serde_json::json!({
                "username": "nobody",
                "password": "password123",
            })),
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::new();

    let response = app.request("GET", "/api/health", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"].as_str().unwrap(), "ok");
    assert_eq!(response.body["data"]["connections"].as_u64().unwrap(), 0);
}
