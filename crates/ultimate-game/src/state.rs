//! The game state machine.
//!
//! [`GameState::apply_move`] is the only way to change a game. It checks
//! every precondition before touching anything, so a rejected move has no
//! side effect and the machine stays a pure function of (state, move).

use crate::board::MetaBoard;
use crate::grid::{Mark, Status};
use crate::MoveError;

/// A move target: a cell inside a sector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub sector_row: usize,
    pub sector_col: usize,
    pub cell_row: usize,
    pub cell_col: usize,
}

impl Move {
    /// Creates a move from sector and cell coordinates.
    pub fn new(
        sector_row: usize,
        sector_col: usize,
        cell_row: usize,
        cell_col: usize,
    ) -> Self {
        Self {
            sector_row,
            sector_col,
            cell_row,
            cell_col,
        }
    }
}

/// How a finished game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Won(Mark),
    Draw,
}

/// The full state of one game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    board: MetaBoard,
    turn: Mark,
    required_sector: Option<(usize, usize)>,
    winner: Option<Outcome>,
    moves_played: u64,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// A fresh game: all sectors open, X to move anywhere.
    pub fn new() -> Self {
        Self {
            board: MetaBoard::new(),
            turn: Mark::X,
            required_sector: None,
            winner: None,
            moves_played: 0,
        }
    }

    pub fn board(&self) -> &MetaBoard {
        &self.board
    }

    /// The mark whose turn it is.
    pub fn turn(&self) -> Mark {
        self.turn
    }

    /// The sector the player to move is sent to, if any.
    ///
    /// Only binding while that sector is still open (free-move rule).
    pub fn required_sector(&self) -> Option<(usize, usize)> {
        self.required_sector
    }

    pub fn winner(&self) -> Option<Outcome> {
        self.winner
    }

    /// Returns `true` once the game has a winner or is drawn.
    pub fn is_over(&self) -> bool {
        self.winner.is_some()
    }

    /// Number of accepted moves. Strictly increases with each one, so it
    /// doubles as a version for ordering snapshots.
    pub fn moves_played(&self) -> u64 {
        self.moves_played
    }

    /// `true` where a sector is still open, regardless of the current
    /// player's routing constraint.
    pub fn open_sectors(&self) -> [[bool; 3]; 3] {
        self.board.sector_statuses().map(|row| row.map(Status::is_open))
    }

    /// The sectors the player to move may target right now.
    pub fn legal_sectors(&self) -> Vec<(usize, usize)> {
        if self.is_over() {
            return Vec::new();
        }
        if let Some(required) = self.binding_sector() {
            return vec![required];
        }
        let open = self.open_sectors();
        (0..3)
            .flat_map(|r| (0..3).map(move |c| (r, c)))
            .filter(|&(r, c)| open[r][c])
            .collect()
    }

    /// The required sector, if it is still open.
    fn binding_sector(&self) -> Option<(usize, usize)> {
        self.required_sector.filter(|&(r, c)| {
            self.board
                .sector(r, c)
                .is_some_and(|sector| sector.status().is_open())
        })
    }

    /// Checks `mv` against the current state without applying it.
    ///
    /// `as_player` is `None` for a participant with no mark (a spectator).
    pub fn validate(
        &self,
        mv: &Move,
        as_player: Option<Mark>,
    ) -> Result<(), MoveError> {
        if self.is_over() {
            return Err(MoveError::GameOver);
        }
        if as_player != Some(self.turn) {
            return Err(MoveError::NotYourTurn);
        }

        let sector = self
            .board
            .sector(mv.sector_row, mv.sector_col)
            .ok_or(MoveError::InvalidCoordinates)?;

        if !sector.status().is_open() {
            return Err(MoveError::SectorClosed);
        }

        if let Some(required) = self.binding_sector() {
            if required != (mv.sector_row, mv.sector_col) {
                return Err(MoveError::WrongSector { required });
            }
        }

        match sector.cell(mv.cell_row, mv.cell_col) {
            Some(crate::Cell::Empty) => Ok(()),
            _ => Err(MoveError::CellOccupied),
        }
    }

    /// Validates and applies a move for `as_player`.
    ///
    /// On success the cell is marked, sector and board statuses are
    /// re-evaluated, the next required sector is routed from the played
    /// cell, and the turn passes to the opponent.
    pub fn apply_move(
        &mut self,
        mv: Move,
        as_player: Option<Mark>,
    ) -> Result<(), MoveError> {
        self.validate(&mv, as_player)?;
        let mark = self.turn;

        let status = self.board.place(
            (mv.sector_row, mv.sector_col),
            (mv.cell_row, mv.cell_col),
            mark,
        );
        self.winner = match status {
            Status::Open => None,
            Status::Won(mark) => Some(Outcome::Won(mark)),
            Status::Drawn => Some(Outcome::Draw),
        };

        let next = (mv.cell_row, mv.cell_col);
        self.required_sector = self
            .board
            .sector(next.0, next.1)
            .filter(|sector| sector.status().is_open())
            .map(|_| next);

        self.turn = mark.opponent();
        self.moves_played += 1;

        if let Some(outcome) = self.winner {
            tracing::debug!(?outcome, moves = self.moves_played, "game finished");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Cell;

    fn mv(sr: usize, sc: usize, cr: usize, cc: usize) -> Move {
        Move::new(sr, sc, cr, cc)
    }

    #[test]
    fn test_new_game_defaults() {
        let game = GameState::new();
        assert_eq!(game.turn(), Mark::X);
        assert_eq!(game.required_sector(), None);
        assert_eq!(game.winner(), None);
        assert_eq!(game.open_sectors(), [[true; 3]; 3]);
        assert_eq!(game.legal_sectors().len(), 9);
    }

    #[test]
    fn test_apply_move_marks_cell_and_routes_opponent() {
        let mut game = GameState::new();
        game.apply_move(mv(0, 0, 1, 2), Some(Mark::X)).unwrap();

        assert_eq!(
            game.board().sector(0, 0).unwrap().cell(1, 2),
            Some(Cell::X)
        );
        assert_eq!(game.turn(), Mark::O);
        assert_eq!(game.required_sector(), Some((1, 2)));
        assert_eq!(game.legal_sectors(), vec![(1, 2)]);
        assert_eq!(game.moves_played(), 1);
    }

    #[test]
    fn test_wrong_turn_rejected() {
        let mut game = GameState::new();
        assert_eq!(
            game.apply_move(mv(0, 0, 0, 0), Some(Mark::O)),
            Err(MoveError::NotYourTurn)
        );
        assert_eq!(
            game.apply_move(mv(0, 0, 0, 0), None),
            Err(MoveError::NotYourTurn)
        );
    }

    #[test]
    fn test_out_of_range_sector_rejected() {
        let mut game = GameState::new();
        assert_eq!(
            game.apply_move(mv(3, 0, 0, 0), Some(Mark::X)),
            Err(MoveError::InvalidCoordinates)
        );
        assert_eq!(
            game.apply_move(mv(0, usize::MAX, 0, 0), Some(Mark::X)),
            Err(MoveError::InvalidCoordinates)
        );
    }

    #[test]
    fn test_out_of_range_cell_rejected_as_occupied() {
        let mut game = GameState::new();
        assert_eq!(
            game.apply_move(mv(0, 0, 0, 3), Some(Mark::X)),
            Err(MoveError::CellOccupied)
        );
    }

    #[test]
    fn test_occupied_cell_rejected() {
        let mut game = GameState::new();
        game.apply_move(mv(1, 1, 1, 1), Some(Mark::X)).unwrap();
        // O is routed back to (1,1) and tries the same cell.
        assert_eq!(
            game.apply_move(mv(1, 1, 1, 1), Some(Mark::O)),
            Err(MoveError::CellOccupied)
        );
    }

    #[test]
    fn test_game_over_checked_before_turn() {
        let mut game = GameState::new();
        game.winner = Some(Outcome::Won(Mark::X));
        assert_eq!(
            game.apply_move(mv(0, 0, 0, 0), Some(Mark::O)),
            Err(MoveError::GameOver)
        );
    }

    #[test]
    fn test_rejected_move_has_no_side_effect() {
        let mut game = GameState::new();
        game.apply_move(mv(0, 0, 0, 0), Some(Mark::X)).unwrap();
        let before = game.clone();

        let _ = game.apply_move(mv(1, 1, 0, 0), Some(Mark::O));
        let _ = game.apply_move(mv(0, 0, 0, 0), Some(Mark::O));
        let _ = game.apply_move(mv(0, 0, 1, 1), Some(Mark::X));

        assert_eq!(game, before);
    }

    #[test]
    fn test_wrong_sector_reports_required() {
        let mut game = GameState::new();
        game.apply_move(mv(0, 0, 2, 1), Some(Mark::X)).unwrap();
        assert_eq!(
            game.apply_move(mv(0, 0, 0, 0), Some(Mark::O)),
            Err(MoveError::WrongSector { required: (2, 1) })
        );
    }

    #[test]
    fn test_wrong_sector_message_names_sector() {
        let err = MoveError::WrongSector { required: (2, 1) };
        assert_eq!(err.to_string(), "Move must be played in sector (2, 1).");
    }
}
