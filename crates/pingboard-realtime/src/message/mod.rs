//! Wire message definitions for the WebSocket transport.

pub mod types;

pub use types::{InboundMessage, OutboundMessage, SignalTarget, PING_TEXT};
