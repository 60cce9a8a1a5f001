use serde::{Deserialize, Serialize};
use std::fmt;

/// A coordinate on the minesweeper board.
///
/// Cells order row-major, so ordered collections of cells iterate the board
/// top to bottom, left to right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub const fn new(row: usize, col: usize) -> Self {
        Cell { row, col }
    }

    /// Whether the cell lies on a board of the given dimensions.
    pub fn in_bounds(self, height: usize, width: usize) -> bool {
        self.row < height && self.col < width
    }

    /// All cells within one row and column of this one, excluding the cell
    /// itself. Cells that would fall off a `height` x `width` board are skipped.
    pub fn neighbors(self, height: usize, width: usize) -> impl Iterator<Item = Cell> {
        (-1isize..=1).flat_map(move |dr| {
            (-1isize..=1).filter_map(move |dc| {
                if dr == 0 && dc == 0 {
                    return None;
                }

                let row = self.row as isize + dr;
                let col = self.col as isize + dc;

                if row >= 0 && row < height as isize && col >= 0 && col < width as isize {
                    Some(Cell::new(row as usize, col as usize))
                } else {
                    None
                }
            })
        })
    }
}

impl From<(usize, usize)> for Cell {
    fn from((row, col): (usize, usize)) -> Self {
        Cell::new(row, col)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Every cell of a `height` x `width` board in row-major order.
pub fn all_cells(height: usize, width: usize) -> impl Iterator<Item = Cell> {
    (0..height).flat_map(move |row| (0..width).map(move |col| Cell::new(row, col)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neighbors() {
        // Corner cell should have 3 neighbors
        assert_eq!(Cell::new(0, 0).neighbors(3, 3).count(), 3);

        // Center cell should have 8 neighbors
        assert_eq!(Cell::new(1, 1).neighbors(3, 3).count(), 8);

        // Edge cell should have 5 neighbors
        assert_eq!(Cell::new(0, 1).neighbors(3, 3).count(), 5);
    }

    #[test]
    fn test_neighbors_exclude_self_and_stay_on_board() {
        let cell = Cell::new(2, 4);
        for neighbor in cell.neighbors(3, 5) {
            assert_ne!(neighbor, cell);
            assert!(neighbor.in_bounds(3, 5));
            assert!(neighbor.row.abs_diff(cell.row) <= 1);
            assert!(neighbor.col.abs_diff(cell.col) <= 1);
        }
    }

    #[test]
    fn test_single_cell_board_has_no_neighbors() {
        assert_eq!(Cell::new(0, 0).neighbors(1, 1).count(), 0);
    }

    #[test]
    fn test_all_cells_row_major() {
        let cells: Vec<Cell> = all_cells(2, 2).collect();
        assert_eq!(
            cells,
            vec![
                Cell::new(0, 0),
                Cell::new(0, 1),
                Cell::new(1, 0),
                Cell::new(1, 1)
            ]
        );
    }
}
