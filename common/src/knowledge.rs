use crate::cell::all_cells;
use crate::{Cell, Sentence};
use itertools::Itertools;
use rand::Rng;
use rand::prelude::IndexedRandom;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

/// Why a move was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveKind {
    /// The cell is provably safe.
    Safe,
    /// Nothing is provably safe; the cell is a guess among cells not known to be mines.
    Random,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub cell: Cell,
    pub kind: MoveKind,
}

/// Everything the player has deduced about one board.
///
/// Facts only ever accumulate: once a cell lands in `safes` or `mines` it is
/// purged from every sentence and stays put. The sentences hold what is still
/// uncertain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeBase {
    height: usize,
    width: usize,
    /// Cells that have been revealed.
    moves_made: BTreeSet<Cell>,
    /// Cells proven safe.
    safes: BTreeSet<Cell>,
    /// Cells proven to be mines.
    mines: BTreeSet<Cell>,
    /// Constraints that still mention undetermined cells.
    sentences: Vec<Sentence>,
}

impl KnowledgeBase {
    pub fn new(height: usize, width: usize) -> Self {
        KnowledgeBase {
            height,
            width,
            moves_made: BTreeSet::new(),
            safes: BTreeSet::new(),
            mines: BTreeSet::new(),
            sentences: Vec::new(),
        }
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn moves_made(&self) -> &BTreeSet<Cell> {
        &self.moves_made
    }

    pub fn safes(&self) -> &BTreeSet<Cell> {
        &self.safes
    }

    pub fn mines(&self) -> &BTreeSet<Cell> {
        &self.mines
    }

    pub fn sentences(&self) -> &[Sentence] {
        &self.sentences
    }

    /// Records `cell` as a mine and removes it from every sentence.
    pub fn mark_mine_globally(&mut self, cell: Cell) {
        if self.safes.contains(&cell) {
            tracing::warn!(%cell, "refusing to mark a known safe cell as a mine");
            return;
        }
        if self.mines.insert(cell) {
            tracing::debug!(%cell, "inferred mine");
        }
        for sentence in &mut self.sentences {
            sentence.mark_mine(cell);
        }
    }

    /// Records `cell` as safe and removes it from every sentence.
    pub fn mark_safe_globally(&mut self, cell: Cell) {
        if self.mines.contains(&cell) {
            tracing::warn!(%cell, "refusing to mark a known mine as safe");
            return;
        }
        if self.safes.insert(cell) {
            tracing::debug!(%cell, "inferred safe");
        }
        for sentence in &mut self.sentences {
            sentence.mark_safe(cell);
        }
    }

    /// Folds in the board's answer for a revealed cell: `count` of its
    /// neighbours are mines.
    ///
    /// This must be called once per revealed cell, in reveal order. A count
    /// that disagrees with what is already known is clamped into range and
    /// logged rather than rejected.
    pub fn add_knowledge(&mut self, cell: Cell, count: usize) {
        debug_assert!(
            cell.in_bounds(self.height, self.width),
            "{cell} is off the board"
        );
        if self.mines.contains(&cell) {
            tracing::warn!(%cell, "ignoring reveal of a known mine");
            return;
        }

        // Marking the cell safe also purges it from every existing sentence.
        self.moves_made.insert(cell);
        self.mark_safe_globally(cell);

        let mut unknown = BTreeSet::new();
        let mut known_mines = 0;
        for neighbor in cell.neighbors(self.height, self.width) {
            if self.mines.contains(&neighbor) {
                known_mines += 1;
            } else if !self.safes.contains(&neighbor) {
                unknown.insert(neighbor);
            }
        }

        if count < known_mines || count - known_mines > unknown.len() {
            tracing::warn!(
                %cell,
                count,
                known_mines,
                unknown = unknown.len(),
                "mine count disagrees with the knowledge base"
            );
        }
        let remaining = count.saturating_sub(known_mines).min(unknown.len());

        self.insert_sentence(Sentence::new(unknown, remaining));
        self.infer();
    }

    /// Adds a constraint learned from outside the board's neighbour counts,
    /// such as a guaranteed safe opening, and propagates it.
    ///
    /// Cells already known safe or mined are factored out first.
    pub fn add_sentence(&mut self, mut sentence: Sentence) {
        for &mine in &self.mines {
            sentence.mark_mine(mine);
        }
        for &safe in &self.safes {
            sentence.mark_safe(safe);
        }
        self.insert_sentence(sentence);
        self.infer();
    }

    /// A provably safe cell that has not been revealed yet, lowest first.
    pub fn safe_move(&self) -> Option<Cell> {
        self.safes.difference(&self.moves_made).next().copied()
    }

    /// A uniformly random cell that has not been revealed and is not known
    /// to be a mine.
    pub fn random_move<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Cell> {
        let candidates: Vec<Cell> = all_cells(self.height, self.width)
            .filter(|cell| !self.moves_made.contains(cell) && !self.mines.contains(cell))
            .collect();
        candidates.choose(rng).copied()
    }

    /// Prefers a safe move and falls back to a guess. `None` once every
    /// cell is either revealed or a known mine.
    pub fn make_move<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Move> {
        if let Some(cell) = self.safe_move() {
            return Some(Move {
                cell,
                kind: MoveKind::Safe,
            });
        }
        self.random_move(rng).map(|cell| Move {
            cell,
            kind: MoveKind::Random,
        })
    }

    fn insert_sentence(&mut self, sentence: Sentence) {
        if !sentence.is_empty() && !self.sentences.contains(&sentence) {
            tracing::trace!(%sentence, "new sentence");
            self.sentences.push(sentence);
        }
    }

    /// Alternates simplification and resolution until resolution has
    /// nothing new to add.
    fn infer(&mut self) {
        loop {
            self.simplify();
            if !self.resolve() {
                break;
            }
        }
    }

    /// Turns every trivial sentence into facts until none is left, then drops
    /// duplicates.
    fn simplify(&mut self) {
        while let Some(index) = self.sentences.iter().position(|sentence| {
            sentence.is_empty()
                || sentence.implied_mines().is_some()
                || sentence.implied_safes().is_some()
        }) {
            let sentence = self.sentences.remove(index);
            if let Some(mines) = sentence.implied_mines() {
                for &cell in mines {
                    self.mark_mine_globally(cell);
                }
            } else if let Some(safes) = sentence.implied_safes() {
                for &cell in safes {
                    self.mark_safe_globally(cell);
                }
            }
        }

        let mut seen = HashSet::new();
        self.sentences.retain(|sentence| seen.insert(sentence.clone()));
    }

    /// Derives `(A \ B) = count(A) - count(B)` for every pair of sentences
    /// where B covers a strict subset of A. Returns whether anything new was
    /// added.
    fn resolve(&mut self) -> bool {
        let derived: Vec<Sentence> = self
            .sentences
            .iter()
            .tuple_combinations()
            .filter_map(|(a, b)| {
                let (superset, subset) = match a.len().cmp(&b.len()) {
                    std::cmp::Ordering::Greater => (a, b),
                    std::cmp::Ordering::Less => (b, a),
                    std::cmp::Ordering::Equal => return None,
                };
                if !subset.is_subset_of(superset) {
                    return None;
                }
                let sentence = superset.difference(subset);
                if sentence.is_none() {
                    tracing::warn!(%superset, %subset, "contradictory sentences");
                }
                sentence
            })
            .collect();

        let before = self.sentences.len();
        for sentence in derived {
            if !sentence.is_empty() && !self.sentences.contains(&sentence) {
                tracing::debug!(%sentence, "resolved");
                self.sentences.push(sentence);
            }
        }
        self.sentences.len() > before
    }
}
