//! Application state shared across all handlers.

use std::sync::Arc;

use pingboard_auth::jwt::JwtEncoder;
use pingboard_auth::password::PasswordHasher;
use pingboard_auth::store::UserStore;
use pingboard_core::config::AppConfig;
use pingboard_realtime::engine::RealtimeEngine;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// In-memory registered-user store.
    pub users: Arc<UserStore>,
    /// Password hasher (Argon2id).
    pub password_hasher: Arc<PasswordHasher>,
    /// JWT token encoder.
    pub jwt_encoder: Arc<JwtEncoder>,
    /// WebSocket realtime engine.
    pub realtime: Arc<RealtimeEngine>,
}
