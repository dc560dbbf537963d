//! Connection registry: who in each lobby is reachable, and how.
//!
//! Each registered peer is the sending half of a connection's outbound
//! queue. A writer task owned by the connection drains the queue into the
//! socket, so pushing here never waits on the network. Dropping a peer
//! closes its queue, which ends the writer and with it the connection.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock, mpsc};
use ultimate_protocol::LobbyId;
use ultimate_transport::ConnectionId;

/// Outbound queue feeding one connection's writer task.
pub type PeerSender = mpsc::UnboundedSender<String>;

/// An encoded message to push, optionally tagged with the game version it
/// describes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outbound {
    version: Option<u64>,
    text: String,
}

impl Outbound {
    /// A snapshot of the game after `version` moves.
    pub fn snapshot(version: u64, text: String) -> Self {
        Self {
            version: Some(version),
            text,
        }
    }

    /// A message that is always delivered, regardless of what the peer has
    /// already seen.
    pub fn unversioned(text: String) -> Self {
        Self {
            version: None,
            text,
        }
    }
}

struct Peer {
    conn_id: ConnectionId,
    sender: PeerSender,
    /// Newest snapshot version pushed to this peer.
    seen: u64,
}

impl Peer {
    /// Queues `msg` unless it is a snapshot older than one already sent.
    fn deliver(&mut self, msg: &Outbound) -> bool {
        if let Some(version) = msg.version {
            if version < self.seen {
                return false;
            }
            self.seen = version;
        }
        self.sender.send(msg.text.clone()).is_ok()
    }
}

type LobbyPeers = Arc<Mutex<HashMap<String, Peer>>>;

/// Live connections, by lobby and player name.
///
/// The outer map is locked only to find or change a lobby's entry; each
/// lobby's peers sit behind their own lock, so pushes to different lobbies
/// never contend.
#[derive(Default)]
pub struct ConnectionRegistry {
    lobbies: RwLock<HashMap<LobbyId, LobbyPeers>>,
}

impl ConnectionRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    async fn peers(&self, lobby_id: LobbyId) -> Option<LobbyPeers> {
        self.lobbies.read().await.get(&lobby_id).cloned()
    }

    /// Registers `name`'s connection in the lobby. A previous connection
    /// under the same name is replaced and its id returned.
    pub async fn register(
        &self,
        lobby_id: LobbyId,
        name: &str,
        conn_id: ConnectionId,
        sender: PeerSender,
    ) -> Option<ConnectionId> {
        let mut lobbies = self.lobbies.write().await;
        let peers = Arc::clone(lobbies.entry(lobby_id).or_default());
        let mut peers = peers.lock().await;
        drop(lobbies);

        let replaced = peers.insert(
            name.to_string(),
            Peer {
                conn_id,
                sender,
                seen: 0,
            },
        );
        tracing::debug!(%lobby_id, player = %name, %conn_id, "connection registered");
        replaced.map(|peer| peer.conn_id)
    }

    /// Pushes `msg` to one player. Returns `false` if the player has no
    /// open connection or the message was stale; nothing is queued for
    /// later.
    pub async fn unicast(&self, lobby_id: LobbyId, name: &str, msg: &Outbound) -> bool {
        let Some(peers) = self.peers(lobby_id).await else {
            return false;
        };
        let mut peers = peers.lock().await;
        peers.get_mut(name).is_some_and(|peer| peer.deliver(msg))
    }

    /// Pushes `msg` to every player in the lobby except `excluded`.
    /// Returns how many peers it was queued for.
    pub async fn broadcast_except(&self, lobby_id: LobbyId, excluded: &str, msg: &Outbound) -> usize {
        let Some(peers) = self.peers(lobby_id).await else {
            return 0;
        };
        let mut peers = peers.lock().await;
        peers
            .iter_mut()
            .filter(|(name, _)| name.as_str() != excluded)
            .filter(|(_, peer)| !peer.sender.is_closed())
            .map(|(_, peer)| peer.deliver(msg))
            .filter(|&queued| queued)
            .count()
    }

    /// Removes `name`'s entry if it still belongs to `conn_id`.
    ///
    /// Returns `false` when the entry was already replaced or dropped, in
    /// which case the caller no longer owns the player's seat.
    pub async fn unregister(&self, lobby_id: LobbyId, name: &str, conn_id: ConnectionId) -> bool {
        let mut lobbies = self.lobbies.write().await;
        let Some(peers) = lobbies.get(&lobby_id).cloned() else {
            return false;
        };
        let mut peers = peers.lock().await;

        let owned = peers.get(name).is_some_and(|peer| peer.conn_id == conn_id);
        if owned {
            peers.remove(name);
            tracing::debug!(%lobby_id, player = %name, %conn_id, "connection unregistered");
        }
        if peers.is_empty() {
            lobbies.remove(&lobby_id);
        }
        owned
    }

    /// Drops `name`'s connection, closing it. Returns `true` if there was
    /// one.
    pub async fn disconnect(&self, lobby_id: LobbyId, name: &str) -> bool {
        let Some(peers) = self.peers(lobby_id).await else {
            return false;
        };
        let removed = peers.lock().await.remove(name);
        if let Some(peer) = &removed {
            tracing::debug!(%lobby_id, player = %name, conn_id = %peer.conn_id, "connection dropped");
        }
        removed.is_some()
    }

    /// Drops every connection in the lobby. Returns how many were closed.
    pub async fn drop_lobby(&self, lobby_id: LobbyId) -> usize {
        let Some(peers) = self.lobbies.write().await.remove(&lobby_id) else {
            return 0;
        };
        let mut peers = peers.lock().await;
        let count = peers.len();
        peers.clear();
        tracing::debug!(%lobby_id, count, "lobby connections dropped");
        count
    }

    /// Number of registered connections in the lobby.
    pub async fn peer_count(&self, lobby_id: LobbyId) -> usize {
        match self.peers(lobby_id).await {
            Some(peers) => peers.lock().await.len(),
            None => 0,
        }
    }
}
