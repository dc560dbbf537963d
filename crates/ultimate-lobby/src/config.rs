//! Lobby configuration.

use serde::{Deserialize, Serialize};

/// Default command channel size for lobby actors.
const DEFAULT_CHANNEL_SIZE: usize = 64;

/// Settings shared by every lobby in a registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LobbyConfig {
    /// Admit joiners beyond X and O as spectators instead of rejecting
    /// them with `LobbyFull`.
    pub allow_spectators: bool,

    /// Maximum number of spectators (0 = unlimited when allowed).
    pub max_spectators: usize,

    /// Delete a lobby as soon as its last player leaves.
    pub reap_empty_lobbies: bool,

    /// Capacity of each lobby actor's command channel.
    pub channel_size: usize,
}

impl Default for LobbyConfig {
    fn default() -> Self {
        Self {
            allow_spectators: false,
            max_spectators: 0,
            reap_empty_lobbies: false,
            channel_size: DEFAULT_CHANNEL_SIZE,
        }
    }
}

impl LobbyConfig {
    /// Returns `true` if another spectator may join when `current` are
    /// already watching.
    pub fn admits_spectator(&self, current: usize) -> bool {
        self.allow_spectators && (self.max_spectators == 0 || current < self.max_spectators)
    }
}
