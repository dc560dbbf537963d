//! Error types for the lobby layer.
//!
//! The `#[error]` strings are what clients read in `{"Error": ...}`.

use ultimate_game::MoveError;
use ultimate_protocol::LobbyId;

/// Errors that can occur during lobby operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LobbyError {
    /// The lobby does not exist, or its actor has stopped.
    #[error("Lobby not found.")]
    NotFound(LobbyId),

    /// No player with this name is in the lobby.
    #[error("Player not found.")]
    PlayerNotFound(String),

    /// Another player in the lobby already uses this name.
    #[error("Player '{0}' already exists.")]
    NameTaken(String),

    /// Both seats are taken and the seating policy admits no spectator.
    #[error("Lobby is full.")]
    LobbyFull(LobbyId),

    /// The game rejected the move.
    #[error(transparent)]
    Game(#[from] MoveError),
}
