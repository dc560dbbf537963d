//! Lobby lifecycle for the ultimate tic-tac-toe server.
//!
//! Each lobby runs as its own Tokio task (actor model) owning the roster
//! and the game. Operations on one lobby are commands on its channel, so
//! they are serialized per lobby while different lobbies run in parallel.
//!
//! # Key types
//!
//! - [`LobbyRegistry`]: creates/deletes lobbies and routes operations
//! - [`LobbyConfig`]: seating policy and reaping
//! - [`assign_role`]: who gets X, O, or a spectator seat
//! - [`Versioned`]: a game snapshot tagged with its move count

mod config;
mod error;
mod lobby;
mod registry;
mod role;

pub use config::LobbyConfig;
pub use error::LobbyError;
pub use lobby::Versioned;
pub use registry::LobbyRegistry;
pub use role::{Admission, Player, assign_role};
