use anyhow::Context;
use clap::Parser;
use minesweeper_ai::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::thread;
use std::time::Duration;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Autonomous minesweeper bot: reveals provably safe cells, guesses only when
/// logic runs out.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Number of rows
    #[arg(long, default_value_t = 8)]
    height: usize,

    /// Number of columns
    #[arg(long, default_value_t = 8)]
    width: usize,

    /// Number of mines
    #[arg(long, default_value_t = 8)]
    mines: usize,

    /// Seed for a reproducible game
    #[arg(long)]
    seed: Option<u64>,

    /// Pause between moves, in milliseconds
    #[arg(long, default_value_t = 500)]
    delay_ms: u64,

    /// Print the hidden mine layout before playing and log every deduction
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    // --- 1. Initialization ---
    let mut game = Game::new(cli.height, cli.width, cli.mines, &mut rng)
        .context("could not set up the board")?;

    println!("--- Autonomous Minesweeper Bot ---");
    println!("Strategy: Prioritize logically safe moves, guess randomly otherwise.");
    if cli.verbose {
        println!("Mine layout:");
        print!("{}", game.board());
    }
    print_board(&game);

    // --- 2. Game Loop ---
    let mut move_count = 0;
    while game.state() == GameState::Playing {
        move_count += 1;
        println!("\n--- Move #{} ---", move_count);

        let Some(mv) = game.ai_move(&mut rng)? else {
            println!("No valid moves left for the bot to make.");
            break;
        };

        match mv.kind {
            MoveKind::Safe => println!("Logic found a guaranteed safe cell."),
            MoveKind::Random => println!("No logically safe move found. Made a random guess..."),
        }
        println!("Bot reveals {}", mv.cell);
        print_board(&game);

        tracing::debug!(
            safes = game.knowledge().safes().len(),
            mines = game.knowledge().mines().len(),
            sentences = game.knowledge().sentences().len(),
            "knowledge after move"
        );

        thread::sleep(Duration::from_millis(cli.delay_ms));
    }

    // --- 3. Final Result ---
    println!("\n--- Game Over ---");

    match game.state() {
        GameState::Won => println!("Result: The bot won!"),
        GameState::Lost => println!("Result: The bot hit a mine and lost."),
        GameState::Playing => println!("Result: The game ended unexpectedly."),
    }

    Ok(())
}

fn print_board(game: &Game) {
    print!("   ");
    for col in 0..game.width() {
        print!("{:^3}", col);
    }
    println!("\n  +{}", "---".repeat(game.width()));

    for row in 0..game.height() {
        print!("{:^2}|", row);
        for col in 0..game.width() {
            let display = match game.view(Cell::new(row, col)) {
                CellView::Hidden => " ■ ".to_string(),
                CellView::Flagged => " F ".to_string(),
                CellView::Revealed(n) => format!(" {} ", n),
            };
            print!("{}", display);
        }
        println!();
    }
    println!();
}
