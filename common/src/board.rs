use crate::cell::all_cells;
use crate::{Cell, GameError};
use rand::Rng;
use rand::prelude::IndexedRandom;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// The hidden ground truth of a game: where the mines are, and which of them
/// the player has flagged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Board {
    height: usize,
    width: usize,
    mines: BTreeSet<Cell>,
    /// Cells the player has flagged as mines.
    mines_found: BTreeSet<Cell>,
}

impl Board {
    /// Places `mines` mines uniformly at random. At least one cell must be
    /// left safe.
    pub fn new<R: Rng + ?Sized>(
        height: usize,
        width: usize,
        mines: usize,
        rng: &mut R,
    ) -> Result<Self, GameError> {
        validate(height, width, mines)?;

        let cells: Vec<Cell> = all_cells(height, width).collect();
        let mines = cells.choose_multiple(rng, mines).copied().collect();

        Ok(Board {
            height,
            width,
            mines,
            mines_found: BTreeSet::new(),
        })
    }

    /// A board with a fixed mine layout.
    pub fn with_mines(
        height: usize,
        width: usize,
        mines: impl IntoIterator<Item = Cell>,
    ) -> Result<Self, GameError> {
        let mines: BTreeSet<Cell> = mines.into_iter().collect();
        validate(height, width, mines.len())?;
        if let Some(&cell) = mines.iter().find(|cell| !cell.in_bounds(height, width)) {
            return Err(GameError::OutOfBounds(cell));
        }

        Ok(Board {
            height,
            width,
            mines,
            mines_found: BTreeSet::new(),
        })
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn mine_count(&self) -> usize {
        self.mines.len()
    }

    pub fn mines(&self) -> &BTreeSet<Cell> {
        &self.mines
    }

    pub fn mines_found(&self) -> &BTreeSet<Cell> {
        &self.mines_found
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.in_bounds(self.height, self.width)
    }

    pub fn is_mine(&self, cell: Cell) -> bool {
        self.mines.contains(&cell)
    }

    /// Number of mines within one row and column of `cell`, not counting the
    /// cell itself.
    pub fn nearby_mines(&self, cell: Cell) -> u8 {
        cell.neighbors(self.height, self.width)
            .filter(|neighbor| self.mines.contains(neighbor))
            .count() as u8
    }

    /// Flags `cell` as a mine. Returns whether the flag is new.
    pub fn mark_found(&mut self, cell: Cell) -> bool {
        self.mines_found.insert(cell)
    }

    /// Every mine has been flagged, and nothing else.
    pub fn won(&self) -> bool {
        self.mines_found == self.mines
    }
}

fn validate(height: usize, width: usize, mines: usize) -> Result<(), GameError> {
    if height == 0 || width == 0 {
        return Err(GameError::InvalidDimensions { height, width });
    }
    let cells = height * width;
    if mines >= cells {
        return Err(GameError::TooManyMines { mines, cells });
    }
    Ok(())
}

impl fmt::Display for Board {
    /// Draws the mine layout, `X` marking each mine.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = format!("{}-", "--".repeat(self.width));
        for row in 0..self.height {
            writeln!(f, "{rule}")?;
            for col in 0..self.width {
                let mark = if self.is_mine(Cell::new(row, col)) { 'X' } else { ' ' };
                write!(f, "|{mark}")?;
            }
            writeln!(f, "|")?;
        }
        writeln!(f, "{rule}")
    }
}
