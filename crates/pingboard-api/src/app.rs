//! Application builder — wires state + router + middleware into an Axum app.

use std::sync::Arc;

use axum::Router;
use tower_http::trace::TraceLayer;

use pingboard_auth::jwt::{JwtDecoder, JwtEncoder};
use pingboard_auth::password::PasswordHasher;
use pingboard_auth::store::UserStore;
use pingboard_core::config::AppConfig;
use pingboard_realtime::engine::RealtimeEngine;
use pingboard_realtime::verify::TokenVerifier;

use crate::middleware::cors::build_cors_layer;
use crate::router::build_router;
use crate::state::AppState;

/// Constructs the shared application state from configuration.
///
/// Wires dependencies leaf to root: hasher and store, JWT codecs, then the
/// realtime engine with its token-backed identity verifier.
pub fn build_state(config: AppConfig) -> AppState {
    let users = Arc::new(UserStore::new());
    let password_hasher = Arc::new(PasswordHasher::new());
    let jwt_encoder = Arc::new(JwtEncoder::new(&config.auth));
    let jwt_decoder = Arc::new(JwtDecoder::new(&config.auth));

    let verifier = Arc::new(TokenVerifier::new(jwt_decoder));
    let realtime = Arc::new(RealtimeEngine::new(config.realtime.clone(), verifier));

    AppState {
        config: Arc::new(config),
        users,
        password_hasher,
        jwt_encoder,
        realtime,
    }
}

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    let cors = build_cors_layer(&state.config.server);

    build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
