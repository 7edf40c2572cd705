//! Connection registry — the source of truth for who is online.
//!
//! Maps live connections to authenticated identities. The registry
//! exclusively owns both mappings; the relay and presence broadcaster only
//! read copy-out snapshots.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tokio::sync::mpsc;
use tracing::info;

use pingboard_core::error::AppError;
use pingboard_core::types::UserId;

use crate::connection::handle::{ConnectionHandle, ConnectionId};
use crate::message::OutboundMessage;
use crate::verify::IdentityVerifier;

/// Result of evicting a connection.
#[derive(Debug)]
pub struct Eviction {
    /// The evicted handle.
    pub handle: Arc<ConnectionHandle>,
    /// Whether this eviction took the identity's last connection,
    /// changing the online set.
    pub identity_offline: bool,
}

/// Interior state: both maps live behind one lock so admissions and
/// evictions are atomic and every read is a consistent snapshot.
#[derive(Debug, Default)]
struct RegistryInner {
    /// Connection ID → handle, for direct lookup.
    by_conn: HashMap<ConnectionId, Arc<ConnectionHandle>>,
    /// Identity → connection IDs. A user may hold several simultaneous
    /// connections. BTreeMap keeps snapshot order deterministic.
    by_user: BTreeMap<UserId, Vec<ConnectionId>>,
}

/// Registry of all admitted WebSocket connections.
pub struct ConnectionRegistry {
    verifier: Arc<dyn IdentityVerifier>,
    inner: RwLock<RegistryInner>,
}

impl std::fmt::Debug for ConnectionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionRegistry").finish()
    }
}

impl ConnectionRegistry {
    /// Creates an empty registry around an identity verifier.
    pub fn new(verifier: Arc<dyn IdentityVerifier>) -> Self {
        Self {
            verifier,
            inner: RwLock::new(RegistryInner::default()),
        }
    }

    /// Admits a connection after verifying its credential token.
    ///
    /// The verifier is called exactly once per attempt. On failure nothing
    /// is inserted; the caller must send one terminal error frame and close
    /// the socket. A second login for an identity that is already online
    /// adds a connection rather than replacing the existing one.
    pub async fn admit(
        &self,
        token: &str,
        sender: mpsc::Sender<OutboundMessage>,
    ) -> Result<Arc<ConnectionHandle>, AppError> {
        let user_id = self.verifier.verify(token).await?;

        let handle = Arc::new(ConnectionHandle::new(user_id.clone(), sender));
        {
            let mut inner = self.write();
            inner.by_conn.insert(handle.id, handle.clone());
            inner.by_user.entry(user_id.clone()).or_default().push(handle.id);
        }

        info!(conn_id = %handle.id, user_id = %user_id, "Connection admitted");
        Ok(handle)
    }

    /// Evicts a connection, removing it from its identity's set.
    ///
    /// Idempotent: evicting an already-absent handle returns `None` and has
    /// no other effect, which absorbs disconnect races where close fires
    /// twice.
    pub fn evict(&self, conn_id: &ConnectionId) -> Option<Eviction> {
        let eviction = {
            let mut inner = self.write();
            let handle = inner.by_conn.remove(conn_id)?;

            let mut identity_offline = false;
            if let Some(conns) = inner.by_user.get_mut(&handle.user_id) {
                conns.retain(|c| c != conn_id);
                if conns.is_empty() {
                    inner.by_user.remove(&handle.user_id);
                    identity_offline = true;
                }
            }

            Eviction {
                handle,
                identity_offline,
            }
        };

        eviction.handle.mark_closed();
        info!(
            conn_id = %conn_id,
            user_id = %eviction.handle.user_id,
            offline = eviction.identity_offline,
            "Connection evicted"
        );
        Some(eviction)
    }

    /// Returns the identity a connection was admitted under.
    pub fn identity_of(&self, conn_id: &ConnectionId) -> Option<UserId> {
        self.read()
            .by_conn
            .get(conn_id)
            .map(|h| h.user_id.clone())
    }

    /// Looks up a connection handle by ID.
    pub fn connection(&self, conn_id: &ConnectionId) -> Option<Arc<ConnectionHandle>> {
        self.read().by_conn.get(conn_id).cloned()
    }

    /// Snapshot of currently-online distinct identities, sorted.
    pub fn online_identities(&self) -> Vec<UserId> {
        self.read().by_user.keys().cloned().collect()
    }

    /// Snapshot of all connections registered under an identity.
    ///
    /// Returns an empty vec for an unknown identity; that is not an error.
    pub fn connections_for(&self, user_id: &UserId) -> Vec<Arc<ConnectionHandle>> {
        let inner = self.read();
        inner
            .by_user
            .get(user_id)
            .map(|conns| {
                conns
                    .iter()
                    .filter_map(|id| inner.by_conn.get(id).cloned())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Snapshot of every admitted connection.
    pub fn all_connections(&self) -> Vec<Arc<ConnectionHandle>> {
        self.read().by_conn.values().cloned().collect()
    }

    /// Combined snapshot of online identities and all connections, taken
    /// under a single read guard so the two views agree.
    pub fn presence_snapshot(&self) -> (Vec<UserId>, Vec<Arc<ConnectionHandle>>) {
        let inner = self.read();
        (
            inner.by_user.keys().cloned().collect(),
            inner.by_conn.values().cloned().collect(),
        )
    }

    /// Total number of admitted connections.
    pub fn connection_count(&self) -> usize {
        self.read().by_conn.len()
    }

    /// Number of distinct online identities.
    pub fn user_count(&self) -> usize {
        self.read().by_user.len()
    }

    /// Removes and closes every connection. Used during shutdown.
    pub fn drain_all(&self) -> Vec<Arc<ConnectionHandle>> {
        let mut inner = self.write();
        inner.by_user.clear();
        let handles: Vec<_> = inner.by_conn.drain().map(|(_, h)| h).collect();
        drop(inner);

        for handle in &handles {
            handle.mark_closed();
        }
        handles
    }

    fn read(&self) -> RwLockReadGuard<'_, RegistryInner> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, RegistryInner> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }
}
