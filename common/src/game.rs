use crate::{Board, Cell, GameError, KnowledgeBase, Move};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Represents the current state of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    Playing,
    Won,
    Lost,
}

/// What the player can see of a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellView {
    Hidden,
    /// Hidden, but flagged as a known mine.
    Flagged,
    Revealed(u8), // The u8 is the number of adjacent mines.
}

/// One play session: the hidden board, what the player has seen of it, and
/// what the player has deduced from that.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    board: Board,
    knowledge: KnowledgeBase,
    /// Revealed cells and their adjacent mine counts.
    revealed: BTreeMap<Cell, u8>,
    state: GameState,
}

impl Game {
    /// Starts a game on a randomly mined board.
    pub fn new<R: Rng + ?Sized>(
        height: usize,
        width: usize,
        mines: usize,
        rng: &mut R,
    ) -> Result<Self, GameError> {
        Ok(Game::from_board(Board::new(height, width, mines, rng)?))
    }

    pub fn from_board(board: Board) -> Self {
        Game {
            knowledge: KnowledgeBase::new(board.height(), board.width()),
            board,
            revealed: BTreeMap::new(),
            state: GameState::Playing,
        }
    }

    /// Deserializes a game state from bytes.
    pub fn deserialize(bts: &[u8]) -> Result<Self, GameError> {
        Ok(bcs::from_bytes(bts)?)
    }

    /// Serializes the game state to bytes.
    pub fn serialize(&self) -> Result<Vec<u8>, GameError> {
        Ok(bcs::to_bytes(self)?)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    pub fn revealed(&self) -> &BTreeMap<Cell, u8> {
        &self.revealed
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn height(&self) -> usize {
        self.knowledge.height()
    }

    pub fn width(&self) -> usize {
        self.knowledge.width()
    }

    pub fn view(&self, cell: Cell) -> CellView {
        if let Some(&count) = self.revealed.get(&cell) {
            CellView::Revealed(count)
        } else if self.board.mines_found().contains(&cell) {
            CellView::Flagged
        } else {
            CellView::Hidden
        }
    }

    /// Lets the knowledge base choose a cell and reveals it.
    ///
    /// Returns the move made, or `None` if every cell is already revealed or
    /// known to be a mine.
    pub fn ai_move<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Option<Move>, GameError> {
        if self.state != GameState::Playing {
            return Err(GameError::GameOver);
        }
        let Some(mv) = self.knowledge.make_move(rng) else {
            return Ok(None);
        };
        self.reveal(mv.cell)?;
        Ok(Some(mv))
    }

    /// Reveals `at`, feeding its mine count to the knowledge base and flagging
    /// every mine that is known afterwards.
    ///
    /// Returns `false` if the cell was a mine.
    pub fn reveal(&mut self, at: Cell) -> Result<bool, GameError> {
        if !self.board.contains(at) {
            return Err(GameError::OutOfBounds(at));
        }
        if self.revealed.contains_key(&at) {
            return Ok(true);
        }
        if self.state != GameState::Playing {
            return Err(GameError::GameOver);
        }

        if self.board.is_mine(at) {
            tracing::info!(cell = %at, "revealed a mine");
            self.state = GameState::Lost;
            return Ok(false);
        }

        let count = self.board.nearby_mines(at);
        self.revealed.insert(at, count);
        self.knowledge.add_knowledge(at, count as usize);

        for &mine in self.knowledge.mines() {
            self.board.mark_found(mine);
        }

        if self.check_win_condition() {
            tracing::info!(moves = self.revealed.len(), "board cleared");
            self.state = GameState::Won;
        }

        Ok(true)
    }

    /// Won once every mine is flagged or every other cell is revealed. A
    /// board without mines is only won by revealing it all.
    pub fn check_win_condition(&self) -> bool {
        let cells = self.height() * self.width();
        let all_flagged = self.board.mine_count() > 0 && self.board.won();
        all_flagged || self.revealed.len() + self.board.mine_count() == cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn corner_mine_game() -> Game {
        // X . .
        // . . .
        // . . .
        Game::from_board(Board::with_mines(3, 3, [Cell::new(0, 0)]).unwrap())
    }

    #[test]
    fn test_game_initialization() {
        let mut rng = StdRng::seed_from_u64(9);
        let game = Game::new(5, 4, 3, &mut rng).unwrap();
        assert_eq!(game.height(), 5);
        assert_eq!(game.width(), 4);
        assert_eq!(game.board().mine_count(), 3);
        assert_eq!(game.state(), GameState::Playing);

        for row in 0..5 {
            for col in 0..4 {
                assert_eq!(game.view(Cell::new(row, col)), CellView::Hidden);
            }
        }
    }

    #[test]
    fn test_game_initialization_too_many_mines() {
        let mut rng = StdRng::seed_from_u64(9);
        assert!(matches!(
            Game::new(3, 3, 9, &mut rng),
            Err(GameError::TooManyMines { .. })
        ));
    }

    #[test]
    fn test_ai_clears_board_without_guessing() {
        let mut game = corner_mine_game();
        assert!(game.reveal(Cell::new(2, 2)).unwrap());

        let mut rng = StdRng::seed_from_u64(0);
        while game.state() == GameState::Playing {
            let mv = game.ai_move(&mut rng).unwrap().unwrap();
            assert_eq!(mv.kind, crate::MoveKind::Safe);
        }

        assert_eq!(game.state(), GameState::Won);
        assert_eq!(game.knowledge().mines().len(), 1);
        assert!(game.knowledge().mines().contains(&Cell::new(0, 0)));
        assert_eq!(game.view(Cell::new(0, 0)), CellView::Flagged);
        assert_eq!(game.view(Cell::new(1, 1)), CellView::Revealed(1));
        assert_eq!(game.view(Cell::new(2, 2)), CellView::Revealed(0));
    }

    #[test]
    fn test_mine_free_board_needs_every_cell_revealed() {
        let mut game = Game::from_board(Board::with_mines(2, 2, []).unwrap());
        assert!(game.reveal(Cell::new(0, 0)).unwrap());
        assert_eq!(game.state(), GameState::Playing);
        assert!(!game.check_win_condition());

        let mut rng = StdRng::seed_from_u64(0);
        while game.state() == GameState::Playing {
            game.ai_move(&mut rng).unwrap().unwrap();
        }
        assert_eq!(game.state(), GameState::Won);
        assert_eq!(game.revealed().len(), 4);
    }

    #[test]
    fn test_hitting_mine() {
        let mut game = corner_mine_game();
        assert!(!game.reveal(Cell::new(0, 0)).unwrap());
        assert_eq!(game.state(), GameState::Lost);

        assert!(matches!(
            game.reveal(Cell::new(2, 2)),
            Err(GameError::GameOver)
        ));
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(game.ai_move(&mut rng), Err(GameError::GameOver)));
    }

    #[test]
    fn test_reveal_out_of_bounds() {
        let mut game = corner_mine_game();
        assert!(matches!(
            game.reveal(Cell::new(3, 0)),
            Err(GameError::OutOfBounds(_))
        ));
    }

    #[test]
    fn test_reveal_twice_is_harmless() {
        let mut game = corner_mine_game();
        assert!(game.reveal(Cell::new(1, 1)).unwrap());
        let sentences = game.knowledge().sentences().to_vec();

        assert!(game.reveal(Cell::new(1, 1)).unwrap());
        assert_eq!(game.knowledge().sentences(), sentences.as_slice());
        assert_eq!(game.revealed().len(), 1);
    }

    #[test]
    fn test_serialization_round_trip_mid_game() {
        let mut game = corner_mine_game();
        game.reveal(Cell::new(1, 1)).unwrap();
        game.reveal(Cell::new(0, 2)).unwrap();

        let bytes = game.serialize().unwrap();
        let restored = Game::deserialize(&bytes).unwrap();

        assert_eq!(restored.state(), game.state());
        assert_eq!(restored.revealed(), game.revealed());
        assert_eq!(restored.knowledge().safes(), game.knowledge().safes());
        assert_eq!(restored.knowledge().sentences(), game.knowledge().sentences());
        assert_eq!(restored.board().mines(), game.board().mines());
    }

    #[test]
    fn test_deserialize_garbage() {
        assert!(matches!(
            Game::deserialize(&[0xff, 0x01]),
            Err(GameError::Codec(_))
        ));
    }

    #[test]
    fn test_seeded_games_stay_sound() {
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut game = Game::new(8, 8, 10, &mut rng).unwrap();

            while game.state() == GameState::Playing {
                if game.ai_move(&mut rng).unwrap().is_none() {
                    break;
                }
                let knowledge = game.knowledge();
                assert!(knowledge.mines().is_subset(game.board().mines()));
                assert!(knowledge.safes().is_disjoint(game.board().mines()));
            }
        }
    }
}
