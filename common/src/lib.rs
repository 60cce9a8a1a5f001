//! A Minesweeper player that only moves where logic allows.
//!
//! The [`KnowledgeBase`] folds in "this cell has `n` mine neighbours"
//! observations as [`Sentence`]s, simplifies them into known mines and known
//! safe cells, and derives new sentences by subset resolution. The [`Board`]
//! and [`Game`] types provide a hidden mine layout to play against.

pub mod board;
pub mod cell;
pub mod error;
pub mod game;
pub mod knowledge;
pub mod sentence;

pub use board::Board;
pub use cell::Cell;
pub use error::GameError;
pub use game::{CellView, Game, GameState};
pub use knowledge::{KnowledgeBase, Move, MoveKind};
pub use sentence::Sentence;
