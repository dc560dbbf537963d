//! Lobby registry: creates, tracks, and routes operations to lobbies.

use std::collections::HashMap;

use rand::Rng;
use tokio::sync::RwLock;
use ultimate_game::{GameState, Move, Role};
use ultimate_protocol::LobbyId;

use crate::lobby::{LeaveOutcome, LobbyHandle, spawn_lobby};
use crate::{LobbyConfig, LobbyError, Player, Versioned};

/// Largest lobby id handed out. Ids stay within a signed 32-bit range so
/// every client can represent them.
const MAX_LOBBY_ID: u32 = i32::MAX as u32;

/// All live lobbies.
///
/// The map lock is held only to look up, insert or remove a handle; the
/// operation itself runs on the lobby's actor after the lock is released.
/// Shared between connection tasks behind an `Arc`.
pub struct LobbyRegistry {
    config: LobbyConfig,
    lobbies: RwLock<HashMap<LobbyId, LobbyHandle>>,
}

impl LobbyRegistry {
    /// Creates an empty registry whose lobbies use `config`.
    pub fn new(config: LobbyConfig) -> Self {
        Self {
            config,
            lobbies: RwLock::new(HashMap::new()),
        }
    }

    /// The configuration new lobbies are created with.
    pub fn config(&self) -> &LobbyConfig {
        &self.config
    }

    async fn handle(&self, lobby_id: LobbyId) -> Result<LobbyHandle, LobbyError> {
        self.lobbies
            .read()
            .await
            .get(&lobby_id)
            .cloned()
            .ok_or(LobbyError::NotFound(lobby_id))
    }

    /// Creates a lobby with an empty roster and a new game, and returns its
    /// id. Ids are random and never collide with a live lobby.
    pub async fn create_lobby(&self) -> LobbyId {
        let mut lobbies = self.lobbies.write().await;
        let lobby_id = loop {
            let candidate = LobbyId(rand::rng().random_range(1..=MAX_LOBBY_ID));
            if !lobbies.contains_key(&candidate) {
                break candidate;
            }
        };
        lobbies.insert(lobby_id, spawn_lobby(lobby_id, self.config.clone()));
        tracing::info!(%lobby_id, lobbies = lobbies.len(), "lobby created");
        lobby_id
    }

    /// Seats `name` in the lobby and returns the role it was given.
    ///
    /// # Errors
    /// `NotFound`, `NameTaken`, or `LobbyFull`.
    pub async fn join_lobby(&self, lobby_id: LobbyId, name: &str) -> Result<Role, LobbyError> {
        self.handle(lobby_id).await?.join(name.to_string()).await
    }

    /// Removes `name` from the lobby. The game is left untouched.
    ///
    /// When reaping is enabled and this was the last player, the lobby is
    /// deleted as well.
    ///
    /// # Errors
    /// `NotFound` or `PlayerNotFound`.
    pub async fn leave_lobby(&self, lobby_id: LobbyId, name: &str) -> Result<(), LobbyError> {
        let handle = self.handle(lobby_id).await?;
        if handle.leave(name.to_string()).await? == LeaveOutcome::Reaped {
            let mut lobbies = self.lobbies.write().await;
            // Another task may already have removed it.
            if lobbies.get(&lobby_id).is_some_and(|h| h.same_lobby(&handle)) {
                lobbies.remove(&lobby_id);
                tracing::info!(%lobby_id, "empty lobby reaped");
            }
        }
        Ok(())
    }

    /// Removes the lobby and stops its actor.
    ///
    /// # Errors
    /// `NotFound` if there is no such lobby; nothing changes in that case.
    pub async fn delete_lobby(&self, lobby_id: LobbyId) -> Result<(), LobbyError> {
        let handle = self
            .lobbies
            .write()
            .await
            .remove(&lobby_id)
            .ok_or(LobbyError::NotFound(lobby_id))?;
        handle.shutdown().await;
        tracing::info!(%lobby_id, "lobby deleted");
        Ok(())
    }

    /// The current game with its version.
    pub async fn game_snapshot(&self, lobby_id: LobbyId) -> Result<Versioned<GameState>, LobbyError> {
        self.handle(lobby_id).await?.snapshot().await
    }

    /// The lobby's players in join order.
    pub async fn roster(&self, lobby_id: LobbyId) -> Result<Vec<Player>, LobbyError> {
        self.handle(lobby_id).await?.roster().await
    }

    /// Plays a move as `name`, with `name`'s role deciding the mark.
    ///
    /// # Errors
    /// `NotFound`, `PlayerNotFound`, or `Game` with the rule that was
    /// broken. A rejected move changes nothing.
    pub async fn make_move(
        &self,
        lobby_id: LobbyId,
        name: &str,
        mv: Move,
    ) -> Result<Versioned<GameState>, LobbyError> {
        self.handle(lobby_id)
            .await?
            .make_move(name.to_string(), mv)
            .await
    }

    /// Returns `true` if the lobby exists.
    pub async fn contains(&self, lobby_id: LobbyId) -> bool {
        self.lobbies.read().await.contains_key(&lobby_id)
    }

    /// Returns the number of live lobbies.
    pub async fn lobby_count(&self) -> usize {
        self.lobbies.read().await.len()
    }

    /// Lists all live lobby ids in ascending order.
    pub async fn lobby_ids(&self) -> Vec<LobbyId> {
        let mut ids: Vec<_> = self.lobbies.read().await.keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}

impl Default for LobbyRegistry {
    fn default() -> Self {
        Self::new(LobbyConfig::default())
    }
}
