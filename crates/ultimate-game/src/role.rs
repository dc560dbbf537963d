//! A participant's seat in a game.

use std::fmt;

use crate::Mark;

/// The role a player holds in a lobby.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    X,
    O,
    /// Watches the game; has no mark and cannot move.
    Spectator,
}

impl Role {
    /// The mark this role plays with, if any.
    pub fn mark(self) -> Option<Mark> {
        match self {
            Self::X => Some(Mark::X),
            Self::O => Some(Mark::O),
            Self::Spectator => None,
        }
    }
}

impl From<Mark> for Role {
    fn from(mark: Mark) -> Self {
        match mark {
            Mark::X => Self::X,
            Mark::O => Self::O,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X => write!(f, "X"),
            Self::O => write!(f, "O"),
            Self::Spectator => write!(f, "Spectator"),
        }
    }
}
