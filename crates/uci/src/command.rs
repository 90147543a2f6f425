//! Commands sent from the assistant to an analysis engine.

use chess_core::Move;

/// Commands sent from GUI to engine.
#[derive(Debug, Clone, PartialEq)]
pub enum GuiCommand {
    /// Initialize UCI mode.
    Uci,
    /// Check if engine is ready.
    IsReady,
    /// Set up the position reached from the starting array.
    Position { moves: Vec<String> },
    /// Search until `stop`.
    GoInfinite,
    /// Stop calculating.
    Stop,
    /// Print the static evaluation (Stockfish extension).
    Eval,
    /// Quit the engine.
    Quit,
}

impl GuiCommand {
    /// Position command for a game's move log.
    pub fn position(moves: &[Move]) -> Self {
        GuiCommand::Position {
            moves: moves.iter().map(|m| m.to_uci().to_ascii_lowercase()).collect(),
        }
    }

    /// Format the command as a protocol line.
    pub fn to_uci(&self) -> String {
        match self {
            GuiCommand::Uci => "uci".to_string(),
            GuiCommand::IsReady => "isready".to_string(),
            GuiCommand::Position { moves } if moves.is_empty() => "position startpos".to_string(),
            GuiCommand::Position { moves } => format!("position startpos moves {}", moves.join(" ")),
            GuiCommand::GoInfinite => "go infinite".to_string(),
            GuiCommand::Stop => "stop".to_string(),
            GuiCommand::Eval => "eval".to_string(),
            GuiCommand::Quit => "quit".to_string(),
        }
    }
}
