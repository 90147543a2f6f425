//! Lines received from an analysis engine.

/// Messages sent from engine to GUI.
///
/// Only the replies the assistant acts on are distinguished; everything else
/// (search info, option lists, evaluation tables) is kept as [`EngineMessage::Other`].
#[derive(Debug, Clone, PartialEq)]
pub enum EngineMessage {
    /// Engine identification.
    IdName(String),
    /// UCI initialization complete.
    UciOk,
    /// Engine is ready.
    ReadyOk,
    /// Best move found.
    BestMove { mv: String, ponder: Option<String> },
    /// Stockfish `eval` summary, in pawns from white's point of view.
    FinalEvaluation(f64),
    /// Any other line.
    Other(String),
}

impl EngineMessage {
    /// Parse one line of engine output.
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let mut parts = line.split_whitespace();

        match parts.next() {
            Some("uciok") => EngineMessage::UciOk,
            Some("readyok") => EngineMessage::ReadyOk,
            Some("bestmove") => match parts.next() {
                Some(mv) => {
                    let ponder = match (parts.next(), parts.next()) {
                        (Some("ponder"), Some(p)) => Some(p.to_string()),
                        _ => None,
                    };
                    EngineMessage::BestMove {
                        mv: mv.to_string(),
                        ponder,
                    }
                }
                None => EngineMessage::Other(line.to_string()),
            },
            Some("id") if line.starts_with("id name ") => {
                EngineMessage::IdName(line["id name ".len()..].trim().to_string())
            }
            Some("Final") => parse_final_evaluation(line)
                .map(EngineMessage::FinalEvaluation)
                .unwrap_or_else(|| EngineMessage::Other(line.to_string())),
            _ => EngineMessage::Other(line.to_string()),
        }
    }
}

/// Parses `Final evaluation       +0.25 (white side)`.
///
/// Returns `None` when no number is given, e.g. `Final evaluation: none (in check)`.
fn parse_final_evaluation(line: &str) -> Option<f64> {
    let rest = line.strip_prefix("Final evaluation")?;
    let value = rest.trim_start_matches(':').split_whitespace().next()?;
    value.parse().ok()
}
