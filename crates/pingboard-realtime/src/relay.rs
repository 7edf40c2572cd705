//! Signal relay — resolves targets and delivers ping notifications.

use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::message::{OutboundMessage, SignalTarget};
use crate::registry::ConnectionRegistry;
use crate::{ConnectionHandle, ConnectionId};

/// Routes inbound signal events to the right connections.
///
/// The relay only reads registry snapshots; it never mutates membership.
/// Delivery is fire-and-forget: no acknowledgments, no retries, and no
/// errors surface to the sender.
#[derive(Debug, Clone)]
pub struct Relay {
    registry: Arc<ConnectionRegistry>,
}

impl Relay {
    /// Creates a relay over the given registry.
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// Routes a signal from the given connection.
    ///
    /// Broadcast (`target == all`) fans out to every connection except all
    /// of the sender's own. Point-to-point delivers to every connection of
    /// the target identity; an offline target is silently dropped.
    pub fn route(&self, sender_conn: &ConnectionId, target: SignalTarget) {
        // Structurally impossible for an admitted connection, but checked:
        // an unbound sender means the event is dropped, not delivered.
        let Some(sender) = self.registry.identity_of(sender_conn) else {
            error!(conn_id = %sender_conn, "Signal from connection with no bound identity, dropping");
            return;
        };

        let notification = OutboundMessage::ping_from(sender.clone());

        let recipients: Vec<Arc<ConnectionHandle>> = match target {
            SignalTarget::All => self
                .registry
                .all_connections()
                .into_iter()
                .filter(|conn| conn.user_id != sender)
                .collect(),
            SignalTarget::User(ref target_id) => {
                let conns = self.registry.connections_for(target_id);
                if conns.is_empty() {
                    debug!(from = %sender, to = %target_id, "Target offline, signal dropped");
                }
                conns
            }
        };

        for conn in &recipients {
            // A peer that closed mid-flight is dropped for that connection
            // only; the rest of the fan-out continues.
            if !conn.send(notification.clone()) {
                warn!(conn_id = %conn.id, "Delivery failed, connection closed mid-flight");
            }
        }

        debug!(from = %sender, recipients = recipients.len(), "Signal routed");
    }
}
