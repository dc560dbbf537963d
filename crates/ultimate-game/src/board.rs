//! Sectors and the meta-board that holds them.

use crate::grid::{evaluate_grid, Cell, Mark, Status};

/// One of the nine 3×3 sub-boards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sector {
    cells: [[Cell; 3]; 3],
    status: Status,
}

impl Sector {
    /// Creates an empty, open sector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cell at `(row, col)`, or `None` if out of range.
    pub fn cell(&self, row: usize, col: usize) -> Option<Cell> {
        self.cells.get(row)?.get(col).copied()
    }

    /// Returns all nine cells.
    pub fn cells(&self) -> &[[Cell; 3]; 3] {
        &self.cells
    }

    /// Returns the sector's current status.
    pub fn status(&self) -> Status {
        self.status
    }

    /// Writes `mark` into an empty cell and re-evaluates the sector.
    ///
    /// Returns `true` if the status changed from `Open`. Callers must have
    /// checked that the sector is open and the cell is empty.
    pub(crate) fn place(&mut self, row: usize, col: usize, mark: Mark) -> bool {
        debug_assert!(self.status.is_open());
        debug_assert_eq!(self.cells[row][col], Cell::Empty);

        self.cells[row][col] = mark.into();
        self.status = evaluate_grid(&self.cells);
        !self.status.is_open()
    }
}

/// The 3×3 grid of sectors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetaBoard {
    sectors: [[Sector; 3]; 3],
    status: Status,
}

impl MetaBoard {
    /// Creates a board with nine empty sectors.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the sector at `(row, col)`, or `None` if out of range.
    pub fn sector(&self, row: usize, col: usize) -> Option<&Sector> {
        self.sectors.get(row)?.get(col)
    }

    /// Returns all nine sectors.
    pub fn sectors(&self) -> &[[Sector; 3]; 3] {
        &self.sectors
    }

    /// Returns the status of the board as a whole.
    pub fn status(&self) -> Status {
        self.status
    }

    /// The status of each sector, i.e. the meta-level grid.
    pub fn sector_statuses(&self) -> [[Status; 3]; 3] {
        std::array::from_fn(|r| std::array::from_fn(|c| self.sectors[r][c].status))
    }

    /// Marks a cell and propagates any sector closure to the board status.
    ///
    /// Returns the board status after the write.
    pub(crate) fn place(
        &mut self,
        sector: (usize, usize),
        cell: (usize, usize),
        mark: Mark,
    ) -> Status {
        let closed = self.sectors[sector.0][sector.1].place(cell.0, cell.1, mark);
        if closed {
            self.status = evaluate_grid(&self.sector_statuses());
        }
        self.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_sector_is_open_and_empty() {
        let sector = Sector::new();
        assert_eq!(sector.status(), Status::Open);
        assert!(sector.cells().iter().flatten().all(|c| *c == Cell::Empty));
    }

    #[test]
    fn test_sector_cell_out_of_range() {
        let sector = Sector::new();
        assert_eq!(sector.cell(3, 0), None);
        assert_eq!(sector.cell(0, 3), None);
        assert_eq!(sector.cell(2, 2), Some(Cell::Empty));
    }

    #[test]
    fn test_sector_place_reports_closure() {
        let mut sector = Sector::new();
        assert!(!sector.place(0, 0, Mark::X));
        assert!(!sector.place(0, 1, Mark::X));
        assert!(sector.place(0, 2, Mark::X));
        assert_eq!(sector.status(), Status::Won(Mark::X));
    }

    #[test]
    fn test_board_status_follows_sector_wins() {
        let mut board = MetaBoard::new();
        // X wins sectors (0,0), (1,1), (2,2) via their top rows.
        for s in 0..3 {
            for c in 0..3 {
                board.place((s, s), (0, c), Mark::X);
            }
        }
        assert_eq!(board.status(), Status::Won(Mark::X));
        assert_eq!(board.sector_statuses()[1][1], Status::Won(Mark::X));
        assert_eq!(board.sector_statuses()[0][1], Status::Open);
    }
}
