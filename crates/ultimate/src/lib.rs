//! # Ultimate
//!
//! A server-authoritative ultimate tic-tac-toe backend.
//!
//! Players open a WebSocket at `/ws?lobbyId=<id>&playerName=<name>`, are
//! seated in the lobby, and receive the full game snapshot. Every accepted
//! move is validated on the server and the new snapshot is pushed to the
//! rest of the lobby. Lobby management runs over a second WebSocket path,
//! `/control`, one JSON request and one JSON reply at a time.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ultimate::prelude::*;
//!
//! # async fn start() -> Result<(), UltimateError> {
//! let server = UltimateServer::builder()
//!     .bind("0.0.0.0:8080")
//!     .build()
//!     .await?;
//! server.run().await
//! # }
//! ```

mod connections;
mod dispatch;
mod error;
mod handler;
mod server;

pub use connections::{ConnectionRegistry, Outbound, PeerSender};
pub use dispatch::{Dispatcher, Handshake, MOVE_COMPLETED, Seat};
pub use error::UltimateError;
pub use handler::{CONTROL_PATH, GAME_PATH};
pub use server::{ServerConfig, UltimateServer, UltimateServerBuilder};

/// Everything needed to run a server.
pub mod prelude {
    pub use crate::{ServerConfig, UltimateError, UltimateServer, UltimateServerBuilder};
    pub use ultimate_game::{GameState, Mark, Move, MoveError, Role};
    pub use ultimate_lobby::{LobbyConfig, LobbyError, LobbyRegistry};
    pub use ultimate_protocol::{ControlRequest, GameSnapshot, LobbyId, MoveRequest, Response, Symbol};
}
