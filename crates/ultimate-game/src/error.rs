//! Error types for move validation.

/// Why a move was rejected.
///
/// The variants are listed in the order the checks run: when several
/// conditions fail, the first one in this list is reported. A rejected move
/// leaves the game untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    /// The game already has a winner or ended in a draw.
    #[error("The game is already over.")]
    GameOver,

    /// It is the other player's turn, or the mover has no mark.
    #[error("It's not your turn now.")]
    NotYourTurn,

    /// The sector row or column is outside `0..=2`.
    #[error("Coordinates are out of range.")]
    InvalidCoordinates,

    /// The target sector is already won or drawn.
    #[error("Sector is already closed.")]
    SectorClosed,

    /// The move must be played in `required`.
    #[error("Move must be played in sector ({}, {}).", .required.0, .required.1)]
    WrongSector {
        /// The sector the current player is constrained to.
        required: (usize, usize),
    },

    /// The target cell is already marked (or outside the sector).
    #[error("Cell is already occupied.")]
    CellOccupied,
}
