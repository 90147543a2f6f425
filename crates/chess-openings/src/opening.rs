//! Opening records as they appear in the database files.

/// A named opening line: ECO code, name and SAN move tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpeningLine {
    /// The ECO code for this opening (e.g., "B20", "C44").
    pub eco: String,
    /// The name of the opening.
    pub name: String,
    /// The moves in SAN, without move numbers.
    pub moves: Vec<String>,
}

impl OpeningLine {
    /// Creates a new opening line.
    #[must_use]
    pub fn new(eco: impl Into<String>, name: impl Into<String>, moves: Vec<String>) -> Self {
        Self {
            eco: eco.into(),
            name: name.into(),
            moves,
        }
    }

    /// Builds a line from a PGN-style move list such as `"1. e4 c5 2. Nf3"`.
    ///
    /// Tokens ending in `.` are move numbers and are dropped.
    #[must_use]
    pub fn from_pgn(eco: impl Into<String>, name: impl Into<String>, pgn: &str) -> Self {
        let moves = pgn
            .split_whitespace()
            .filter(|token| !token.ends_with('.'))
            .map(str::to_string)
            .collect();
        Self::new(eco, name, moves)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opening_line_new() {
        let line = OpeningLine::new("C44", "King's Pawn Game", vec!["e4".into(), "e5".into()]);
        assert_eq!(line.eco, "C44");
        assert_eq!(line.name, "King's Pawn Game");
        assert_eq!(line.moves.len(), 2);
    }

    #[test]
    fn test_from_pgn_drops_move_numbers() {
        let line = OpeningLine::from_pgn("C60", "Ruy Lopez", "1. e4 e5 2. Nf3 Nc6 3. Bb5");
        assert_eq!(line.moves, ["e4", "e5", "Nf3", "Nc6", "Bb5"]);

        let line = OpeningLine::from_pgn("B00", "Odd", "1... e5 2.  Nf3");
        assert_eq!(line.moves, ["e5", "Nf3"]);
    }
}
