//! Wire protocol for the ultimate tic-tac-toe server.
//!
//! - **Types** ([`LobbyId`], [`MoveRequest`], [`GameSnapshot`],
//!   [`Symbol`]) are the records that travel on the wire.
//! - **Control** ([`ControlRequest`], [`Response`]) covers the
//!   request/reply operations: lobby creation, joining, queries, removal.
//! - **Codec** ([`Codec`], [`JsonCodec`]) turns them into text and back.
//!
//! Field names are PascalCase on the wire. Every failure a client sees is
//! the single-key object `{"Error": "<message>"}`.
//!
//! ```text
//! Transport (frames) → Protocol (MoveRequest / ControlRequest) → Lobby
//! ```

mod codec;
mod control;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use control::{ControlRequest, Response};
pub use error::ProtocolError;
pub use types::{GameSnapshot, LobbyId, MoveRequest, Roster, Symbol, roster_entry};
