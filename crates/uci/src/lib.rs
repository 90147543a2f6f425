//! UCI (Universal Chess Interface) client for external analysis engines.
//!
//! The assistant plays the GUI side of the protocol: it sends the game's
//! moves, lets the engine think and reads back `bestmove`. Stockfish's `eval`
//! extension is used for position scores.
//!
//! # Commands used
//!
//! - `uci` / `uciok`, `isready` / `readyok` - Handshake
//! - `position startpos [moves <move>...]` - Set position
//! - `go infinite` then `stop` - Timed search
//! - `eval` / `Final evaluation <score>` - Static evaluation (Stockfish)
//! - `quit` - Exit engine

mod command;
mod engine;
mod message;
mod process;

pub use command::GuiCommand;
pub use engine::{create_engine, AnalysisEngine, Stockfish, UciEngine, HANDSHAKE_TIMEOUT, STOP_GRACE};
pub use message::EngineMessage;
pub use process::EngineProcess;

use thiserror::Error;

/// Errors that can occur when talking to an engine.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Failed to spawn the engine process.
    #[error("Failed to start engine '{0}': {1}")]
    Spawn(String, String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// The engine's output ended.
    #[error("Engine closed its output")]
    Closed,
    /// The engine did not answer in time.
    #[error("Timed out waiting for {0}")]
    Timeout(&'static str),
    /// Engine returned an invalid or unexpected response.
    #[error("Invalid engine response: {0}")]
    InvalidResponse(String),
}
