//! # pingboard-api
//!
//! HTTP API layer for Pingboard built on Axum.
//!
//! Provides the register/login endpoints, health check, WebSocket upgrade,
//! DTOs, and error mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, build_state};
pub use state::AppState;
