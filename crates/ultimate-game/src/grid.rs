//! 3×3 grid primitives shared by sectors and the meta-board.
//!
//! The same line-evaluation algorithm runs at two levels: over the cells of
//! one sector, and over the statuses of the nine sectors. [`GridValue`] is
//! the seam that lets [`evaluate_grid`] treat both uniformly.

use std::fmt;

/// A player's symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    /// Returns the other player's mark.
    pub fn opponent(self) -> Self {
        match self {
            Self::X => Self::O,
            Self::O => Self::X,
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X => write!(f, "X"),
            Self::O => write!(f, "O"),
        }
    }
}

/// One square of a sector. Once marked it is never cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    X,
    O,
}

impl From<Mark> for Cell {
    fn from(mark: Mark) -> Self {
        match mark {
            Mark::X => Self::X,
            Mark::O => Self::O,
        }
    }
}

/// The derived state of a 3×3 grid.
///
/// Transitions are one-way: `Open → Won | Drawn`. Callers never move a grid
/// back to `Open`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    /// Still playable.
    #[default]
    Open,
    /// A line of three belongs to this mark.
    Won(Mark),
    /// Full, with no line.
    Drawn,
}

impl Status {
    /// Returns `true` while the grid still accepts moves.
    pub fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }
}

/// A value that can occupy a position of a 3×3 grid.
pub trait GridValue: Copy {
    /// The mark that owns this position for line purposes, if any.
    fn owner(self) -> Option<Mark>;

    /// Whether the position counts as filled for draw detection.
    fn is_filled(self) -> bool;
}

impl GridValue for Cell {
    fn owner(self) -> Option<Mark> {
        match self {
            Self::Empty => None,
            Self::X => Some(Mark::X),
            Self::O => Some(Mark::O),
        }
    }

    fn is_filled(self) -> bool {
        self != Self::Empty
    }
}

/// At meta level a won sector counts as its winner's mark and a drawn
/// sector is filled but owned by nobody.
impl GridValue for Status {
    fn owner(self) -> Option<Mark> {
        match self {
            Self::Won(mark) => Some(mark),
            Self::Open | Self::Drawn => None,
        }
    }

    fn is_filled(self) -> bool {
        !self.is_open()
    }
}

/// The 8 winning lines as `(row, col)` triples.
pub const LINES: [[(usize, usize); 3]; 8] = [
    // Rows
    [(0, 0), (0, 1), (0, 2)],
    [(1, 0), (1, 1), (1, 2)],
    [(2, 0), (2, 1), (2, 2)],
    // Columns
    [(0, 0), (1, 0), (2, 0)],
    [(0, 1), (1, 1), (2, 1)],
    [(0, 2), (1, 2), (2, 2)],
    // Diagonals
    [(0, 0), (1, 1), (2, 2)],
    [(0, 2), (1, 1), (2, 0)],
];

/// Evaluates a 3×3 grid: a full line wins, a full grid without one is a
/// draw, anything else is still open.
pub fn evaluate_grid<T: GridValue>(grid: &[[T; 3]; 3]) -> Status {
    for [a, b, c] in LINES {
        if let Some(mark) = grid[a.0][a.1].owner() {
            if grid[b.0][b.1].owner() == Some(mark)
                && grid[c.0][c.1].owner() == Some(mark)
            {
                return Status::Won(mark);
            }
        }
    }

    if grid.iter().flatten().all(|v| v.is_filled()) {
        Status::Drawn
    } else {
        Status::Open
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_with(line: [(usize, usize); 3], cell: Cell) -> [[Cell; 3]; 3] {
        let mut grid = [[Cell::Empty; 3]; 3];
        for (r, c) in line {
            grid[r][c] = cell;
        }
        grid
    }

    #[test]
    fn test_empty_grid_is_open() {
        assert_eq!(evaluate_grid(&[[Cell::Empty; 3]; 3]), Status::Open);
    }

    #[test]
    fn test_every_line_wins_for_x_and_o() {
        for line in LINES {
            assert_eq!(
                evaluate_grid(&grid_with(line, Cell::X)),
                Status::Won(Mark::X),
                "line {line:?}"
            );
            assert_eq!(
                evaluate_grid(&grid_with(line, Cell::O)),
                Status::Won(Mark::O),
                "line {line:?}"
            );
        }
    }

    #[test]
    fn test_full_grid_without_line_is_drawn() {
        //  X | O | X
        //  X | O | O
        //  O | X | X
        let grid = [
            [Cell::X, Cell::O, Cell::X],
            [Cell::X, Cell::O, Cell::O],
            [Cell::O, Cell::X, Cell::X],
        ];
        assert_eq!(evaluate_grid(&grid), Status::Drawn);
    }

    #[test]
    fn test_mixed_line_does_not_win() {
        let mut grid = grid_with(LINES[0], Cell::X);
        grid[0][2] = Cell::O;
        assert_eq!(evaluate_grid(&grid), Status::Open);
    }

    #[test]
    fn test_full_grid_with_line_is_won_not_drawn() {
        let grid = [
            [Cell::X, Cell::X, Cell::X],
            [Cell::O, Cell::O, Cell::X],
            [Cell::X, Cell::O, Cell::O],
        ];
        assert_eq!(evaluate_grid(&grid), Status::Won(Mark::X));
    }

    #[test]
    fn test_meta_level_drawn_sectors_block_lines() {
        let grid = [
            [Status::Won(Mark::O), Status::Drawn, Status::Won(Mark::O)],
            [Status::Open, Status::Open, Status::Open],
            [Status::Open, Status::Open, Status::Open],
        ];
        assert_eq!(evaluate_grid(&grid), Status::Open);
    }

    #[test]
    fn test_meta_level_all_closed_without_line_is_drawn() {
        let x = Status::Won(Mark::X);
        let o = Status::Won(Mark::O);
        let d = Status::Drawn;
        let grid = [[x, o, d], [d, d, x], [o, x, o]];
        assert_eq!(evaluate_grid(&grid), Status::Drawn);
    }

    #[test]
    fn test_meta_level_won_sectors_form_line() {
        let x = Status::Won(Mark::X);
        let grid = [
            [x, Status::Open, Status::Open],
            [Status::Drawn, x, Status::Open],
            [Status::Open, Status::Open, x],
        ];
        assert_eq!(evaluate_grid(&grid), Status::Won(Mark::X));
    }

    #[test]
    fn test_exhaustive_cell_assignments_agree_with_line_scan() {
        // All 3^9 boards: the result must match a direct definition.
        let values = [Cell::Empty, Cell::X, Cell::O];
        for code in 0..3usize.pow(9) {
            let mut grid = [[Cell::Empty; 3]; 3];
            let mut n = code;
            for i in 0..9 {
                grid[i / 3][i % 3] = values[n % 3];
                n /= 3;
            }

            let winner = LINES.iter().find_map(|line| {
                let first = grid[line[0].0][line[0].1];
                (first != Cell::Empty
                    && line.iter().all(|&(r, c)| grid[r][c] == first))
                .then_some(first)
            });
            let expected = match winner {
                Some(Cell::X) => Status::Won(Mark::X),
                Some(Cell::O) => Status::Won(Mark::O),
                _ if grid.iter().flatten().all(|c| *c != Cell::Empty) => {
                    Status::Drawn
                }
                _ => Status::Open,
            };

            assert_eq!(evaluate_grid(&grid), expected, "board {grid:?}");
        }
    }

    #[test]
    fn test_mark_opponent() {
        assert_eq!(Mark::X.opponent(), Mark::O);
        assert_eq!(Mark::O.opponent(), Mark::X);
    }
}
