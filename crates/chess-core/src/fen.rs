//! FEN (Forsyth-Edwards Notation) parsing.
//!
//! Games always start from the standard array; FEN is used to set up
//! arbitrary positions for analysis and for tests.

use crate::{Color, FenError, Figure, Square};

/// A parsed FEN record.
///
/// The engine converts this into its own position representation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FenSetup {
    /// Occupant of each square, indexed a1 = 0 .. h8 = 63.
    pub cells: [Option<(Figure, Color)>; 64],
    pub side_to_move: Color,
    /// Castling availability letters, e.g. "KQkq" or "" for none.
    pub castling: String,
    /// Square a pawn may be captured on en passant (the square it skipped).
    pub en_passant: Option<Square>,
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
}

impl FenSetup {
    /// The standard starting position.
    pub const STARTPOS: &'static str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    /// Parses a FEN string. The two move counters may be omitted.
    pub fn parse(fen: &str) -> Result<Self, FenError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if !(4..=6).contains(&fields.len()) {
            return Err(FenError::InvalidFieldCount(fields.len()));
        }

        let cells = parse_placement(fields[0])?;

        let side_to_move = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::InvalidActiveColor(other.to_string())),
        };

        let castling = match fields[2] {
            "-" => String::new(),
            letters if letters.chars().all(|c| "KQkq".contains(c)) => letters.to_string(),
            letters => return Err(FenError::InvalidCastlingRights(letters.to_string())),
        };

        let en_passant = match fields[3] {
            "-" => None,
            text => {
                let square = Square::from_algebraic(text)
                    .filter(|sq| sq.row() == 2 || sq.row() == 5)
                    .ok_or_else(|| FenError::InvalidEnPassantSquare(text.to_string()))?;
                Some(square)
            }
        };

        let counter = |index: usize, default: u32| -> Result<u32, FenError> {
            match fields.get(index) {
                None => Ok(default),
                Some(text) => text
                    .parse()
                    .map_err(|_| FenError::InvalidCounter(text.to_string())),
            }
        };

        Ok(FenSetup {
            cells,
            side_to_move,
            castling,
            en_passant,
            halfmove_clock: counter(4, 0)?,
            fullmove_number: counter(5, 1)?,
        })
    }

    /// Returns true if the record grants the given castling right.
    pub fn can_castle(&self, color: Color, kingside: bool) -> bool {
        let letter = match (color, kingside) {
            (Color::White, true) => 'K',
            (Color::White, false) => 'Q',
            (Color::Black, true) => 'k',
            (Color::Black, false) => 'q',
        };
        self.castling.contains(letter)
    }
}

fn parse_placement(placement: &str) -> Result<[Option<(Figure, Color)>; 64], FenError> {
    let rows: Vec<&str> = placement.split('/').collect();
    if rows.len() != 8 {
        return Err(FenError::InvalidPiecePlacement(format!(
            "expected 8 ranks, got {}",
            rows.len()
        )));
    }

    let mut cells = [None; 64];
    for (i, text) in rows.iter().enumerate() {
        let row = 7 - i;
        let mut col = 0usize;
        for c in text.chars() {
            if let Some(skip) = c.to_digit(10) {
                col += skip as usize;
                continue;
            }
            let figure = Figure::from_letter(c).ok_or_else(|| {
                FenError::InvalidPiecePlacement(format!("invalid character '{}' in rank {}", c, row + 1))
            })?;
            if col >= 8 {
                return Err(FenError::InvalidPiecePlacement(format!(
                    "rank {} has more than 8 squares",
                    row + 1
                )));
            }
            cells[row * 8 + col] = Some((figure, Color::from_white(c.is_ascii_uppercase())));
            col += 1;
        }
        if col != 8 {
            return Err(FenError::InvalidPiecePlacement(format!(
                "rank {} has {} squares, expected 8",
                row + 1,
                col
            )));
        }
    }
    Ok(cells)
}
