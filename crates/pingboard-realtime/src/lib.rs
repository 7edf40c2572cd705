//! # pingboard-realtime
//!
//! Real-time WebSocket engine for Pingboard. Provides:
//!
//! - Connection registry mapping live connections to authenticated identities
//! - Point-to-point and broadcast signal relay
//! - Full-state presence broadcasting on membership changes
//! - Token-based identity verification behind a trait seam

pub mod connection;
pub mod engine;
pub mod message;
pub mod presence;
pub mod registry;
pub mod relay;
pub mod verify;

pub use connection::handle::{ConnectionHandle, ConnectionId};
pub use engine::RealtimeEngine;
pub use presence::PresenceBroadcaster;
pub use registry::ConnectionRegistry;
pub use relay::Relay;
pub use verify::{IdentityVerifier, TokenVerifier};
