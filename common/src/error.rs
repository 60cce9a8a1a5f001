use crate::Cell;

/// Errors raised by the board and the game session. The inference core
/// itself never fails.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("board must have at least one row and one column, got {height}x{width}")]
    InvalidDimensions { height: usize, width: usize },

    #[error("{mines} mines leave no safe cell on a board of {cells} cells")]
    TooManyMines { mines: usize, cells: usize },

    #[error("cell {0} is off the board")]
    OutOfBounds(Cell),

    #[error("game_ended")]
    GameOver,

    #[error("invalid game state encoding: {0}")]
    Codec(#[from] bcs::Error),
}
