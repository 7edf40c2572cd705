//! Top-level real-time engine that ties together all subsystems.

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};
use tracing::{info, warn};

use pingboard_core::config::realtime::RealtimeConfig;
use pingboard_core::error::AppError;

use crate::connection::handle::{ConnectionHandle, ConnectionId};
use crate::message::{InboundMessage, OutboundMessage};
use crate::presence::PresenceBroadcaster;
use crate::registry::ConnectionRegistry;
use crate::relay::Relay;
use crate::verify::IdentityVerifier;

/// Central real-time engine coordinating registry, relay, and presence.
///
/// All connection lifecycle and message traffic flows through this single
/// ingress point, preserving the ordering guarantees between admissions,
/// evictions, and broadcasts.
#[derive(Clone)]
pub struct RealtimeEngine {
    /// Connection registry.
    pub registry: Arc<ConnectionRegistry>,
    /// Signal relay.
    pub relay: Relay,
    /// Presence broadcaster.
    pub presence: PresenceBroadcaster,
    /// Configuration.
    config: RealtimeConfig,
    /// Shutdown signal sender.
    shutdown_tx: broadcast::Sender<()>,
}

impl std::fmt::Debug for RealtimeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealtimeEngine").finish()
    }
}

impl RealtimeEngine {
    /// Creates a new real-time engine with all subsystems.
    pub fn new(config: RealtimeConfig, verifier: Arc<dyn IdentityVerifier>) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);

        let registry = Arc::new(ConnectionRegistry::new(verifier));
        let relay = Relay::new(registry.clone());
        let presence = PresenceBroadcaster::new(registry.clone());

        info!("Real-time engine initialized");

        Self {
            registry,
            relay,
            presence,
            config,
            shutdown_tx,
        }
    }

    /// Admits a new connection and broadcasts the updated presence list.
    ///
    /// Returns the handle and the receiver the transport drains for
    /// outbound frames. On authentication failure nothing is registered;
    /// the caller sends one terminal error frame and closes the socket.
    pub async fn connect(
        &self,
        token: &str,
    ) -> Result<(Arc<ConnectionHandle>, mpsc::Receiver<OutboundMessage>), AppError> {
        let (tx, rx) = mpsc::channel(self.config.channel_buffer_size);
        let handle = self.registry.admit(token, tx).await?;
        self.presence.broadcast_membership();
        Ok((handle, rx))
    }

    /// Evicts a connection, broadcasting presence if its identity went
    /// offline. Idempotent, like the eviction it wraps.
    pub fn disconnect(&self, conn_id: &ConnectionId) {
        if let Some(eviction) = self.registry.evict(conn_id) {
            if eviction.identity_offline {
                self.presence.broadcast_membership();
            }
        }
    }

    /// Processes a raw inbound frame from a client connection.
    pub fn handle_inbound(&self, conn_id: &ConnectionId, raw: &str) {
        let msg: InboundMessage = match serde_json::from_str(raw) {
            Ok(m) => m,
            Err(e) => {
                warn!(conn_id = %conn_id, error = %e, "Unparseable inbound frame");
                if let Some(conn) = self.registry.connection(conn_id) {
                    conn.send(OutboundMessage::Error {
                        code: "INVALID_MESSAGE".to_string(),
                        message: format!("Failed to parse message: {e}"),
                    });
                }
                return;
            }
        };

        match msg {
            InboundMessage::Signal { target } => self.relay.route(conn_id, target),
        }
    }

    /// Returns a shutdown receiver for graceful shutdown coordination.
    pub fn shutdown_receiver(&self) -> broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }

    /// Initiates a graceful shutdown, closing all live connections.
    pub fn shutdown(&self) {
        info!("Shutting down real-time engine");
        let _ = self.shutdown_tx.send(());
        let closed = self.registry.drain_all();
        info!(count = closed.len(), "All connections closed");
    }

    /// Total number of admitted connections.
    pub fn connection_count(&self) -> usize {
        self.registry.connection_count()
    }

    /// Number of distinct online identities.
    pub fn user_count(&self) -> usize {
        self.registry.user_count()
    }
}
