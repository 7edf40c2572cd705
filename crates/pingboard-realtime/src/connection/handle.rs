//! Individual WebSocket connection handle.

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use uuid::Uuid;

use pingboard_core::types::UserId;

use crate::message::OutboundMessage;

/// Unique connection identifier.
pub type ConnectionId = Uuid;

/// A handle to a single admitted WebSocket connection.
///
/// Holds the sender channel for pushing messages to the client, plus the
/// identity the connection was admitted under. Handles are created only
/// after authentication succeeds; a pre-authenticated socket never has one.
#[derive(Debug)]
pub struct ConnectionHandle {
    /// Unique connection ID.
    pub id: ConnectionId,
    /// Identity this connection is admitted under.
    pub user_id: UserId,
    /// Sender for outbound messages.
    sender: mpsc::Sender<OutboundMessage>,
    /// When the connection was admitted.
    pub connected_at: DateTime<Utc>,
    /// Whether the connection is still alive.
    alive: AtomicBool,
}

impl ConnectionHandle {
    /// Creates a new handle for an admitted connection.
    pub fn new(user_id: UserId, sender: mpsc::Sender<OutboundMessage>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            sender,
            connected_at: Utc::now(),
            alive: AtomicBool::new(true),
        }
    }

    /// Pushes an outbound message to this connection.
    ///
    /// Best-effort: a full buffer drops the message, a closed peer marks
    /// the handle dead. Neither outcome is an error for the caller.
    pub fn send(&self, msg: OutboundMessage) -> bool {
        if !self.is_alive() {
            return false;
        }
        match self.sender.try_send(msg) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!(conn_id = %self.id, "Send buffer full, dropping message");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                self.mark_closed();
                false
            }
        }
    }

    /// Checks if the connection is alive.
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    /// Marks the connection as closed. Terminal; never unset.
    pub fn mark_closed(&self) {
        self.alive.store(false, Ordering::SeqCst);
    }
}
