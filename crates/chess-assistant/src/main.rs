//! Chess Assistant - follows a game over the board.
//!
//! Reads one line at a time from stdin: spoken commands ("start 5 minute
//! game", "best move", "take back", ...), moves as UCI text (`e2e4`) or the
//! squares whose appearance changed most, strongest first (`e2 e4 d1 ...`).

mod clock;
mod command;
mod config;
mod game;

use std::io::BufRead;
use std::path::PathBuf;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use chess_core::Square;
use chess_openings::OpeningBook;
use clap::Parser;
use command::VoiceCommand;
use config::AssistantConfig;
use game::{Game, GameError};
use tracing_subscriber::EnvFilter;

const TICK: Duration = Duration::from_millis(100);

/// Chess Assistant - opening book, clock and engine advice for a board game.
#[derive(Parser)]
#[command(name = "chess-assistant")]
#[command(about = "Follows a chess game and answers spoken commands")]
struct Args {
    /// Path to the configuration file
    #[arg(long, default_value = AssistantConfig::DEFAULT_PATH)]
    config: PathBuf,

    /// Directory containing the opening TSV files
    #[arg(long)]
    openings_dir: Option<PathBuf>,

    /// Analysis engine command line
    #[arg(long)]
    engine: Option<String>,

    /// Run without an analysis engine
    #[arg(long)]
    no_engine: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let mut config = AssistantConfig::load(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    if let Some(dir) = args.openings_dir {
        config.openings_dir = dir;
    }
    if let Some(engine) = args.engine {
        config.engine = engine;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!("Starting chess-assistant");
    tracing::info!("Openings directory: {:?}", config.openings_dir);

    let book = Arc::new(OpeningBook::load_dir(&config.openings_dir));
    let engine = if args.no_engine {
        None
    } else {
        match uci::create_engine(&config.engine, config.think_time()) {
            Ok(engine) => Some(engine),
            Err(e) => {
                tracing::warn!("Running without analysis engine: {}", e);
                None
            }
        }
    };

    let mut game = Game::new(book, engine, config.score_timeout());
    let (white, black) = Game::ready_display();
    println!("{} {}", white, black);

    let (sender, lines) = mpsc::channel();
    std::thread::Builder::new()
        .name("stdin".to_string())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                if sender.send(line).is_err() {
                    break;
                }
            }
        })
        .context("starting input thread")?;

    loop {
        match lines.recv_timeout(TICK) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                if matches!(line, "quit" | "exit") {
                    break;
                }
                handle_line(&mut game, line, Instant::now());
                show_clock(&game);
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
        if let Some(result) = game.tick(Instant::now()) {
            println!("{}", result);
            show_clock(&game);
        }
    }

    tracing::info!("Shutting down");
    Ok(())
}

fn handle_line(game: &mut Game, line: &str, now: Instant) {
    if let Some(command) = command::parse(line) {
        run_command(game, command, now);
        return;
    }

    let squares: Option<Vec<Square>> = line
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|token| !token.is_empty())
        .map(Square::from_algebraic)
        .collect();
    let outcome = match squares {
        Some(squares) if squares.len() > 1 => game.consider_move(&squares, now),
        _ => game.play(line, now).map(Some),
    };
    match outcome {
        Ok(Some(report)) => println!("{}", report),
        Ok(None) => tracing::info!("No unique move for changed squares"),
        Err(e) => println!("{}", e),
    }
}

fn run_command(game: &mut Game, command: VoiceCommand, now: Instant) {
    tracing::debug!("Command: {:?}", command);
    match command {
        VoiceCommand::Start {
            time_ms,
            increment_ms,
        } => {
            game.start(time_ms, increment_ms, now);
            println!("New game");
        }
        VoiceCommand::Pause => game.pause(now),
        VoiceCommand::Resume => game.resume(now),
        VoiceCommand::Undo => {
            if game.undo(now) {
                println!("Took back last move");
            } else {
                println!("Nothing to take back");
            }
        }
        VoiceCommand::BestMove => {
            // The clock stands still while the engine thinks.
            let running = game.clock().is_some_and(|clock| clock.is_running());
            game.pause(now);
            match game.best_move() {
                Ok(san) => println!("Best move: {}", san),
                Err(e) => report_error(e),
            }
            if running {
                game.resume(Instant::now());
            }
        }
        VoiceCommand::Score => match game.score() {
            Ok(Some(score)) => println!("Score: {:+.2}", score),
            Ok(None) => println!("No score available"),
            Err(e) => report_error(e),
        },
    }
}

fn report_error(e: GameError) {
    tracing::error!("{}", e);
    println!("{}", e);
}

fn show_clock(game: &Game) {
    if game.clock().is_some() {
        let (white, black) = game.display();
        println!("[{} | {}]", white, black);
    }
}
