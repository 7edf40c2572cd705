//! Route definitions for the Pingboard HTTP API.
//!
//! REST routes live under `/api`; the WebSocket upgrade is mounted at `/ws`.

use axum::{
    Router,
    routing::{get, post},
};

use crate::handlers;
use crate::state::AppState;

/// Builds the router with all routes.
///
/// Receives the fully-constructed `AppState` and threads it through every
/// route via `.with_state(state)`.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new().merge(auth_routes()).merge(health_routes());

    let ws_routes = Router::new().route("/ws", get(handlers::ws::ws_upgrade));

    Router::new()
        .nest("/api", api_routes)
        .merge(ws_routes)
        .with_state(state)
}

/// Auth endpoints: register, login.
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
}

/// Health endpoint.
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
