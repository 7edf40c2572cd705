//! Presence broadcasting — full-state online list pushed on membership change.

use std::sync::Arc;

use tracing::debug;

use crate::message::OutboundMessage;
use crate::registry::ConnectionRegistry;

/// Pushes the current online-identity list to every connected client.
///
/// Full-state broadcast rather than deltas: at this scale simplicity wins
/// over bandwidth, and clients never need to reconcile partial updates.
#[derive(Debug, Clone)]
pub struct PresenceBroadcaster {
    registry: Arc<ConnectionRegistry>,
}

impl PresenceBroadcaster {
    /// Creates a broadcaster over the given registry.
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// Computes the online snapshot and pushes it to every connection.
    ///
    /// The payload and the recipient list come from one combined snapshot
    /// taken under a single registry read guard, so a broadcast never
    /// observes a half-applied admit or evict.
    pub fn broadcast_membership(&self) {
        let (online, connections) = self.registry.presence_snapshot();

        let payload = OutboundMessage::Presence {
            online: online.clone(),
        };
        for conn in &connections {
            conn.send(payload.clone());
        }

        debug!(
            online = online.len(),
            connections = connections.len(),
            "Presence broadcast"
        );
    }
}
