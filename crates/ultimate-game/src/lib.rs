//! Game rules for ultimate tic-tac-toe.
//!
//! Nine 3×3 sectors arranged in a 3×3 meta-board. The cell a player marks
//! decides which sector the opponent must play in next; winning three
//! sectors in a line wins the game.
//!
//! # Key types
//!
//! - [`evaluate_grid`]: line/draw detection, used at both levels
//! - [`Sector`], [`MetaBoard`]: the two board levels
//! - [`GameState`]: turn, routing constraint, winner; [`GameState::apply_move`]
//! - [`MoveError`]: why a move was rejected
//!
//! This crate has no I/O and no locking. Concurrency is the lobby layer's
//! job.

mod board;
mod error;
mod grid;
mod role;
mod state;

pub use board::{MetaBoard, Sector};
pub use error::MoveError;
pub use grid::{evaluate_grid, Cell, GridValue, Mark, Status, LINES};
pub use role::Role;
pub use state::{GameState, Move, Outcome};
