//! Records that travel on the wire.
//!
//! Everything here converts from the game crate's types. Nothing flows the
//! other way except [`MoveRequest::to_move`].

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use ultimate_game::{Cell, GameState, Mark, Move, Outcome, Role, Status};

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// Identifies a lobby. Serialized as a plain number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LobbyId(pub u32);

impl fmt::Display for LobbyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Symbol
// ---------------------------------------------------------------------------

/// The one vocabulary the wire uses for marks, statuses, winners and
/// player types.
///
/// Which variants can appear depends on the field: a cell is never
/// `Draw`, a player type is never `Draw`, a turn is only `X` or `O`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Symbol {
    X,
    O,
    Draw,
    None,
}

impl From<Mark> for Symbol {
    fn from(mark: Mark) -> Self {
        match mark {
            Mark::X => Self::X,
            Mark::O => Self::O,
        }
    }
}

impl From<Cell> for Symbol {
    fn from(cell: Cell) -> Self {
        match cell {
            Cell::Empty => Self::None,
            Cell::X => Self::X,
            Cell::O => Self::O,
        }
    }
}

impl From<Status> for Symbol {
    fn from(status: Status) -> Self {
        match status {
            Status::Open => Self::None,
            Status::Won(mark) => mark.into(),
            Status::Drawn => Self::Draw,
        }
    }
}

impl From<Option<Outcome>> for Symbol {
    fn from(outcome: Option<Outcome>) -> Self {
        match outcome {
            None => Self::None,
            Some(Outcome::Won(mark)) => mark.into(),
            Some(Outcome::Draw) => Self::Draw,
        }
    }
}

/// Spectators have no mark and show up as `None`.
impl From<Role> for Symbol {
    fn from(role: Role) -> Self {
        role.mark().map_or(Self::None, Self::from)
    }
}

// ---------------------------------------------------------------------------
// Moves
// ---------------------------------------------------------------------------

/// An inbound move on a game connection.
///
/// `LobbyId` and `PlayerName` are accepted for compatibility with older
/// clients but never consulted: the connection's own identity decides who
/// is moving and where.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MoveRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lobby_id: Option<LobbyId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_name: Option<String>,
    pub sector_row: i64,
    pub sector_col: i64,
    pub cell_row: i64,
    pub cell_col: i64,
}

impl MoveRequest {
    /// Creates a request carrying only coordinates.
    pub fn new(sector_row: i64, sector_col: i64, cell_row: i64, cell_col: i64) -> Self {
        Self {
            lobby_id: None,
            player_name: None,
            sector_row,
            sector_col,
            cell_row,
            cell_col,
        }
    }

    /// Converts to a game move. Negative coordinates become `usize::MAX`
    /// so the game's range checks reject them.
    pub fn to_move(&self) -> Move {
        Move::new(
            coordinate(self.sector_row),
            coordinate(self.sector_col),
            coordinate(self.cell_row),
            coordinate(self.cell_col),
        )
    }
}

fn coordinate(value: i64) -> usize {
    usize::try_from(value).unwrap_or(usize::MAX)
}

// ---------------------------------------------------------------------------
// Snapshots
// ---------------------------------------------------------------------------

/// The full game as clients see it.
///
/// `Sectors[sr][sc][cr][cc]` is one cell. `Board[sr][sc]` is that sector's
/// status. `OpenSectors[sr][sc]` is `true` while that sector is neither won
/// nor drawn. It says nothing about where the player to move is sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GameSnapshot {
    pub board: [[Symbol; 3]; 3],
    pub sectors: [[[[Symbol; 3]; 3]; 3]; 3],
    pub turn: Symbol,
    pub winner: Symbol,
    pub open_sectors: [[bool; 3]; 3],
}

impl From<&GameState> for GameSnapshot {
    fn from(state: &GameState) -> Self {
        let board = state.board();
        let statuses = board.sector_statuses();
        let sectors = board.sectors();
        Self {
            board: std::array::from_fn(|r| std::array::from_fn(|c| statuses[r][c].into())),
            sectors: std::array::from_fn(|sr| {
                std::array::from_fn(|sc| {
                    let cells = sectors[sr][sc].cells();
                    std::array::from_fn(|cr| std::array::from_fn(|cc| cells[cr][cc].into()))
                })
            }),
            turn: state.turn().into(),
            winner: state.winner().into(),
            open_sectors: state.open_sectors(),
        }
    }
}

// ---------------------------------------------------------------------------
// Roster
// ---------------------------------------------------------------------------

/// A lobby's players in join order, each as `{"<name>": "<PlayerType>"}`.
pub type Roster = Vec<BTreeMap<String, Symbol>>;

/// Builds one roster entry.
pub fn roster_entry(name: impl Into<String>, role: Role) -> BTreeMap<String, Symbol> {
    BTreeMap::from([(name.into(), role.into())])
}
