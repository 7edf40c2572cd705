//! Inbound and outbound WebSocket message type definitions.

use serde::{Deserialize, Serialize};

use pingboard_core::types::UserId;

/// Fixed notification text carried by every relayed ping.
pub const PING_TEXT: &str = "Ping!";

/// Wire name for the broadcast target.
const ALL: &str = "all";

/// Target of a signal: one identity or everyone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SignalTarget {
    /// Broadcast to every connected client except the sender.
    All,
    /// Deliver to a single identity's connections.
    User(UserId),
}

impl From<String> for SignalTarget {
    fn from(raw: String) -> Self {
        if raw == ALL {
            Self::All
        } else {
            Self::User(UserId::new(raw))
        }
    }
}

impl From<SignalTarget> for String {
    fn from(target: SignalTarget) -> String {
        match target {
            SignalTarget::All => ALL.to_string(),
            SignalTarget::User(id) => id.into_string(),
        }
    }
}

/// Messages sent by the client to the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundMessage {
    /// Send a ping signal to one identity or to everyone.
    Signal {
        /// Target identity, or `"all"` to broadcast.
        target: SignalTarget,
    },
}

/// Messages sent by the server to the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundMessage {
    /// Full-state presence snapshot.
    Presence {
        /// All currently online identities, sorted.
        online: Vec<UserId>,
    },
    /// Ping notification delivery.
    Notify {
        /// Identity that sent the signal.
        from: UserId,
        /// Notification text.
        message: String,
    },
    /// Error message. The only terminal variant: sent once before the
    /// server closes a rejected connection.
    Error {
        /// Error code.
        code: String,
        /// Error description.
        message: String,
    },
}

impl OutboundMessage {
    /// Builds the notification for a relayed ping.
    pub fn ping_from(sender: UserId) -> Self {
        Self::Notify {
            from: sender,
            message: PING_TEXT.to_string(),
        }
    }
}
