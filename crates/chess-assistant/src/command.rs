//! Spoken command grammar.
//!
//! Speech recognition hands over free text; this module picks out the few
//! phrases the assistant reacts to.

/// A recognised spoken command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceCommand {
    /// `start <N> minute game`: a new game with N minutes per side.
    Start { time_ms: u64, increment_ms: u64 },
    /// Stop both clocks.
    Pause,
    /// Restart the clock of the side to move.
    Resume,
    /// Ask the analysis engine for a move.
    BestMove,
    /// Take back the last move.
    Undo,
    /// Ask the analysis engine for a score.
    Score,
}

const MINUTE_SUFFIXES: [&str; 3] = ["-minute", " minutes", " minute"];

/// Recognises a command anywhere in the text, ignoring case.
pub fn parse(text: &str) -> Option<VoiceCommand> {
    let text = text.to_lowercase();

    if let Some(command) = parse_start(&text) {
        return Some(command);
    }

    let has = |phrase: &str| contains_words(&text, phrase);
    if has("best move") {
        Some(VoiceCommand::BestMove)
    } else if has("take back") || has("undo") {
        Some(VoiceCommand::Undo)
    } else if has("pause") || has("stop clock") {
        Some(VoiceCommand::Pause)
    } else if has("resume") || has("continue") {
        Some(VoiceCommand::Resume)
    } else if has("score") || has("evaluate") {
        Some(VoiceCommand::Score)
    } else {
        None
    }
}

fn parse_start(text: &str) -> Option<VoiceCommand> {
    for (index, _) in text.match_indices("start ") {
        let rest = &text[index + "start ".len()..];
        let digits = rest.len() - rest.trim_start_matches(|c: char| c.is_ascii_digit()).len();
        if digits == 0 {
            continue;
        }
        let after_number = &rest[digits..];
        let Some(after_unit) = MINUTE_SUFFIXES
            .iter()
            .find_map(|suffix| after_number.strip_prefix(suffix))
        else {
            continue;
        };
        if !after_unit.starts_with(" game") {
            continue;
        }

        let number = &rest[..digits];
        match number.parse::<u64>().ok().and_then(|m| m.checked_mul(60 * 1000)) {
            Some(time_ms) => {
                return Some(VoiceCommand::Start {
                    time_ms,
                    increment_ms: 0,
                })
            }
            None => {
                tracing::error!("{} can't be parsed as a number of minutes", number);
                return None;
            }
        }
    }
    None
}

/// True if `phrase` occurs in `text` on word boundaries.
fn contains_words(text: &str, phrase: &str) -> bool {
    text.match_indices(phrase).any(|(index, _)| {
        let before = text[..index].chars().next_back();
        let after = text[index + phrase.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start(minutes: u64) -> Option<VoiceCommand> {
        Some(VoiceCommand::Start {
            time_ms: minutes * 60 * 1000,
            increment_ms: 0,
        })
    }

    #[test]
    fn test_start_variants() {
        assert_eq!(parse("start 5 minute game"), start(5));
        assert_eq!(parse("Start 10 minutes game"), start(10));
        assert_eq!(parse("START 3-minute GAME"), start(3));
        assert_eq!(parse("okay, please start 15 minute game now"), start(15));
    }

    #[test]
    fn test_start_needs_full_phrase() {
        assert_eq!(parse("start five minute game"), None);
        assert_eq!(parse("start 5 game"), None);
        assert_eq!(parse("start 5 minute"), None);
        assert_eq!(parse("start 5 hour game"), None);
    }

    #[test]
    fn test_start_second_occurrence() {
        assert_eq!(parse("start the start 7 minute game"), start(7));
    }

    #[test]
    fn test_start_overflow() {
        assert_eq!(parse("start 99999999999999999999 minute game"), None);
    }

    #[test]
    fn test_other_commands() {
        assert_eq!(parse("what is the best move"), Some(VoiceCommand::BestMove));
        assert_eq!(parse("Take back"), Some(VoiceCommand::Undo));
        assert_eq!(parse("undo that"), Some(VoiceCommand::Undo));
        assert_eq!(parse("pause"), Some(VoiceCommand::Pause));
        assert_eq!(parse("resume the game"), Some(VoiceCommand::Resume));
        assert_eq!(parse("what's the score"), Some(VoiceCommand::Score));
    }

    #[test]
    fn test_unrecognised() {
        assert_eq!(parse(""), None);
        assert_eq!(parse("hello there"), None);
        assert_eq!(parse("scoreboard"), None);
        assert_eq!(parse("paused"), None);
    }
}
