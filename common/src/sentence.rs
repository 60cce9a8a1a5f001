use crate::Cell;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A logical statement about the board: exactly `count` of `cells` are mines.
///
/// `count` never exceeds the number of cells. Breaking that is an internal
/// logic error and trips a debug assertion.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sentence {
    cells: BTreeSet<Cell>,
    count: usize,
}

impl Sentence {
    pub fn new(cells: impl IntoIterator<Item = Cell>, count: usize) -> Self {
        let sentence = Sentence {
            cells: cells.into_iter().collect(),
            count,
        };
        sentence.debug_check();
        sentence
    }

    pub fn cells(&self) -> &BTreeSet<Cell> {
        &self.cells
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the sentence still satisfies `count <= |cells|`.
    pub fn is_consistent(&self) -> bool {
        self.count <= self.cells.len()
    }

    /// The cell is known to be a mine: drop it and the mine it accounts for.
    /// Returns whether the sentence changed.
    pub fn mark_mine(&mut self, cell: Cell) -> bool {
        if !self.cells.remove(&cell) {
            return false;
        }
        if self.count == 0 {
            // Only reachable when a cell this sentence ruled out was proven a mine.
            tracing::warn!(%cell, sentence = %self, "mine contradicts sentence");
            return true;
        }
        self.count -= 1;
        true
    }

    /// The cell is known to be safe: drop it, the mine count is unaffected.
    /// Returns whether the sentence changed.
    pub fn mark_safe(&mut self, cell: Cell) -> bool {
        if !self.cells.remove(&cell) {
            return false;
        }
        if self.count > self.cells.len() {
            // Only reachable when the caller revealed a cell this sentence
            // needed as a mine.
            tracing::warn!(%cell, sentence = %self, "safe cell contradicts sentence");
            self.count = self.cells.len();
        }
        true
    }

    /// Every cell, if the sentence forces all of them to be mines.
    pub fn implied_mines(&self) -> Option<&BTreeSet<Cell>> {
        (self.count > 0 && self.count == self.cells.len()).then_some(&self.cells)
    }

    /// Every cell, if the sentence forces all of them to be safe.
    pub fn implied_safes(&self) -> Option<&BTreeSet<Cell>> {
        (self.count == 0).then_some(&self.cells)
    }

    pub fn is_subset_of(&self, other: &Sentence) -> bool {
        self.cells.is_subset(&other.cells)
    }

    /// Resolves `self` against a sentence over a subset of its cells:
    /// the cells only `self` mentions hold the mines `subset` does not.
    ///
    /// Returns `None` if `subset` does not in fact cover a subset of our cells,
    /// or if the two sentences contradict each other.
    pub fn difference(&self, subset: &Sentence) -> Option<Sentence> {
        if !subset.is_subset_of(self) {
            return None;
        }
        let count = self.count.checked_sub(subset.count)?;
        let cells: BTreeSet<Cell> = self.cells.difference(&subset.cells).copied().collect();
        if count > cells.len() {
            return None;
        }
        Some(Sentence { cells, count })
    }

    fn debug_check(&self) {
        debug_assert!(
            self.is_consistent(),
            "sentence {self} claims more mines than it has cells"
        );
    }
}

impl fmt::Display for Sentence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}} = {}", self.cells.iter().join(", "), self.count)
    }
}
