use minesweeper_ai as ms;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub fn create_game(height: u8, width: u8, mines: u8) -> Result<Vec<u8>, String> {
    console_error_panic_hook::set_once();

    let mut rng = rand::rng();
    let game = ms::Game::new(height as usize, width as usize, mines as usize, &mut rng)
        .map_err(|e| e.to_string())?;
    game.serialize().map_err(|e| e.to_string())
}

/// Returns the game state, followed by 0 if the bot survived its move, 1 if
/// it hit a mine, or 2 if it had no move left.
#[wasm_bindgen]
pub fn ai_move(bts: Vec<u8>) -> Result<Vec<u8>, String> {
    console_error_panic_hook::set_once();

    let mut game = ms::Game::deserialize(&bts).map_err(|e| e.to_string())?;
    let mut rng = rand::rng();
    let res = game.ai_move(&mut rng).map_err(|e| e.to_string())?;
    let mut xs = game.serialize().map_err(|e| e.to_string())?;
    xs.push(match res {
        Some(_) if game.state() == ms::GameState::Lost => 1,
        Some(_) => 0,
        None => 2,
    });
    Ok(xs)
}

#[wasm_bindgen]
pub fn reveal(bts: Vec<u8>, row: usize, col: usize) -> Result<Vec<u8>, String> {
    console_error_panic_hook::set_once();

    let mut game = ms::Game::deserialize(&bts).map_err(|e| e.to_string())?;
    let res = game
        .reveal(ms::Cell::new(row, col))
        .map_err(|e| e.to_string())?;
    let mut xs = game.serialize().map_err(|e| e.to_string())?;
    xs.push(if res { 0 } else { 1 });
    Ok(xs)
}

/// 0 while playing, 1 once won, 2 once lost.
#[wasm_bindgen]
pub fn game_status(bts: Vec<u8>) -> Result<u8, String> {
    console_error_panic_hook::set_once();

    let game = ms::Game::deserialize(&bts).map_err(|e| e.to_string())?;
    Ok(match game.state() {
        ms::GameState::Playing => 0,
        ms::GameState::Won => 1,
        ms::GameState::Lost => 2,
    })
}

/// Row-major cell views: -1 hidden, -2 flagged mine, otherwise the revealed
/// mine count.
#[wasm_bindgen]
pub fn get_cells(bts: Vec<u8>) -> Result<Vec<i8>, String> {
    console_error_panic_hook::set_once();

    let game = ms::Game::deserialize(&bts).map_err(|e| e.to_string())?;
    Ok(ms::cell::all_cells(game.height(), game.width())
        .map(|cell| match game.view(cell) {
            ms::CellView::Hidden => -1,
            ms::CellView::Flagged => -2,
            ms::CellView::Revealed(n) => n as i8,
        })
        .collect())
}
