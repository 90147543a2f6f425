//! Analysis engines behind a common capability trait.

use std::time::Duration;

use chess_core::Move;
use chess_engine::Position;

use crate::{EngineError, EngineMessage, EngineProcess, GuiCommand};

/// Time allowed for the `uci` handshake.
pub const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(5);

/// Time allowed for `bestmove` to arrive after `stop`.
pub const STOP_GRACE: Duration = Duration::from_secs(1);

/// An external program that suggests moves and scores positions.
pub trait AnalysisEngine: Send {
    /// The engine's name as reported during the handshake.
    fn name(&self) -> &str;

    /// Searches the position for the configured think time and returns the
    /// engine's choice.
    fn best_move(&mut self, position: &Position) -> Result<Move, EngineError>;

    /// Scores the position in pawns from white's point of view.
    ///
    /// Engines without scoring support return `Ok(None)`, as does a timeout.
    fn score(&mut self, position: &Position, timeout: Duration)
        -> Result<Option<f64>, EngineError>;
}

/// A plain UCI engine.
pub struct UciEngine {
    process: EngineProcess,
    name: String,
    think_time: Duration,
}

impl UciEngine {
    /// Starts the engine, performs the `uci` handshake and waits until it
    /// answers `isready`.
    pub fn spawn(command: &str, think_time: Duration) -> Result<Self, EngineError> {
        let mut process = EngineProcess::spawn(command)?;
        process.send(&GuiCommand::Uci)?;

        let mut name = None;
        let ready = process.wait_for(HANDSHAKE_TIMEOUT, |message| match message {
            EngineMessage::IdName(id) => {
                name = Some(id);
                None
            }
            EngineMessage::UciOk => Some(()),
            _ => None,
        })?;
        if ready.is_none() {
            return Err(EngineError::Timeout("uciok"));
        }

        process.send(&GuiCommand::IsReady)?;
        let ready = process.wait_for(HANDSHAKE_TIMEOUT, |message| match message {
            EngineMessage::ReadyOk => Some(()),
            _ => None,
        })?;
        if ready.is_none() {
            return Err(EngineError::Timeout("readyok"));
        }

        let name = name.unwrap_or_else(|| command.to_string());
        tracing::info!("Engine ready: {}", name);
        Ok(Self {
            process,
            name,
            think_time,
        })
    }

    fn send_position(&mut self, position: &Position) -> Result<(), EngineError> {
        self.process.drain();
        self.process.send(&GuiCommand::position(position.moves()))
    }
}

impl AnalysisEngine for UciEngine {
    fn name(&self) -> &str {
        &self.name
    }

    fn best_move(&mut self, position: &Position) -> Result<Move, EngineError> {
        self.send_position(position)?;
        tracing::info!("Initiating best move search");
        self.process.send(&GuiCommand::GoInfinite)?;
        std::thread::sleep(self.think_time);
        self.process.send(&GuiCommand::Stop)?;

        let best = self.process.wait_for(STOP_GRACE, |message| match message {
            EngineMessage::BestMove { mv, .. } => Some(mv),
            _ => None,
        })?;
        let text = best.ok_or(EngineError::Timeout("bestmove"))?;
        Move::from_uci(&text).map_err(|_| EngineError::InvalidResponse(format!("bestmove {}", text)))
    }

    fn score(&mut self, _position: &Position, _timeout: Duration) -> Result<Option<f64>, EngineError> {
        Ok(None)
    }
}

/// Stockfish, which can also report a static evaluation via `eval`.
pub struct Stockfish {
    engine: UciEngine,
}

impl Stockfish {
    pub fn spawn(command: &str, think_time: Duration) -> Result<Self, EngineError> {
        Ok(Self {
            engine: UciEngine::spawn(command, think_time)?,
        })
    }
}

impl AnalysisEngine for Stockfish {
    fn name(&self) -> &str {
        self.engine.name()
    }

    fn best_move(&mut self, position: &Position) -> Result<Move, EngineError> {
        self.engine.best_move(position)
    }

    fn score(&mut self, position: &Position, timeout: Duration) -> Result<Option<f64>, EngineError> {
        self.engine.send_position(position)?;
        self.engine.process.send(&GuiCommand::Eval)?;
        let score = self.engine.process.wait_for(timeout, |message| match message {
            EngineMessage::FinalEvaluation(score) => Some(score),
            _ => None,
        })?;
        if score.is_none() {
            tracing::warn!(
                "Timeout while waiting to get position score from {}",
                self.engine.process.command()
            );
        }
        Ok(score)
    }
}

/// Starts the engine named by `command`.
///
/// A command ending in `stockfish` gets [`Stockfish`] with scoring support;
/// anything else is driven as a plain [`UciEngine`].
pub fn create_engine(command: &str, think_time: Duration) -> Result<Box<dyn AnalysisEngine>, EngineError> {
    if command.trim_end().ends_with("stockfish") {
        Ok(Box::new(Stockfish::spawn(command, think_time)?))
    } else {
        Ok(Box::new(UciEngine::spawn(command, think_time)?))
    }
}
