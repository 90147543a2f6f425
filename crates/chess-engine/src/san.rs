//! Standard Algebraic Notation (SAN) parsing and generation.
//!
//! SAN is the standard way to record chess moves in human-readable form.
//! Examples: "e4", "Nf3", "Bxc6", "O-O", "e8=Q", "Nbd2", "R1e1"

use crate::movegen::{generate_legal_moves, is_king_attacked};
use crate::{Board, Position};
use chess_core::{Figure, Move, Square};
use thiserror::Error;

/// Error type for SAN parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SanError {
    /// The SAN string is empty.
    #[error("empty SAN string")]
    Empty,
    /// The SAN string has invalid format.
    #[error("invalid SAN format: {0}")]
    InvalidFormat(String),
    /// No legal move matches the SAN.
    #[error("no legal move matches: {0}")]
    NoMatchingMove(String),
    /// Multiple legal moves match the SAN.
    #[error("ambiguous move: {0}")]
    AmbiguousMove(String),
}

/// Converts a move to SAN given the position BEFORE the move is made.
///
/// The move must be legal in the given position.
pub fn move_to_san(position: &Position, m: Move) -> String {
    let board = position.board();
    let mut san = String::new();

    if board.is_castling(m) {
        san.push_str(if m.to.col() > m.from.col() { "O-O" } else { "O-O-O" });
        return add_check_suffix(board, m, san);
    }

    let piece = board.pieces[m.from.index()];
    if piece != Figure::Pawn {
        if let Some(letter) = piece.letter() {
            san.push(letter);
        }
        san.push_str(&disambiguation(board, m, piece));
    }

    if board.is_capture(m) {
        if piece == Figure::Pawn {
            san.push(m.from.file_char());
        }
        san.push('x');
    }

    san.push_str(&m.to.to_algebraic());

    if let Some(letter) = m.promoted.letter() {
        san.push('=');
        san.push(letter);
    }

    add_check_suffix(board, m, san)
}

/// Finds the legal move described by a SAN token.
///
/// Check marks, capture marks and annotations are ignored. A promotion
/// without a figure selects the queen promotion.
pub fn san_to_move(position: &Position, san: &str) -> Result<Move, SanError> {
    let token = san.trim();
    if token.is_empty() {
        return Err(SanError::Empty);
    }

    let cleaned: String = token
        .chars()
        .filter(|c| !matches!(c, '+' | '#' | '!' | '?'))
        .collect();

    match cleaned.as_str() {
        "O-O" | "0-0" => return find_castling_move(position, true),
        "O-O-O" | "0-0-0" => return find_castling_move(position, false),
        _ => {}
    }

    let parsed = parse_san(&cleaned)?;
    find_matching_move(position, &parsed, token)
}

#[derive(Debug)]
struct ParsedSan {
    piece: Figure,
    from_file: Option<u8>,
    from_rank: Option<u8>,
    to: Square,
    promotion: Option<Figure>,
}

fn parse_san(san: &str) -> Result<ParsedSan, SanError> {
    let mut chars: Vec<char> = san.chars().filter(|&c| c != 'x' && c != '=').collect();

    let piece = match chars.first() {
        Some(&c) if c.is_ascii_uppercase() => {
            let figure = Figure::from_letter(c)
                .ok_or_else(|| SanError::InvalidFormat(format!("invalid piece letter: {}", san)))?;
            chars.remove(0);
            figure
        }
        Some(_) => Figure::Pawn,
        None => return Err(SanError::Empty),
    };

    let promotion = match chars.last() {
        Some(&c) if c.is_ascii_uppercase() => {
            let figure = Figure::from_letter(c)
                .filter(|f| f.is_promotion())
                .ok_or_else(|| SanError::InvalidFormat(format!("invalid promotion: {}", san)))?;
            chars.pop();
            Some(figure)
        }
        _ => None,
    };

    if chars.len() < 2 {
        return Err(SanError::InvalidFormat(format!("too short: {}", san)));
    }

    let dest: String = chars[chars.len() - 2..].iter().collect();
    let to = Square::from_algebraic(&dest)
        .ok_or_else(|| SanError::InvalidFormat(format!("invalid destination: {}", san)))?;

    let mut from_file = None;
    let mut from_rank = None;
    for &c in &chars[..chars.len() - 2] {
        match c {
            'a'..='h' if from_file.is_none() => from_file = Some(c as u8 - b'a'),
            '1'..='8' if from_rank.is_none() => from_rank = Some(c as u8 - b'1'),
            _ => {
                return Err(SanError::InvalidFormat(format!(
                    "invalid disambiguation: {}",
                    san
                )))
            }
        }
    }

    Ok(ParsedSan {
        piece,
        from_file,
        from_rank,
        to,
        promotion,
    })
}

fn find_castling_move(position: &Position, kingside: bool) -> Result<Move, SanError> {
    let board = position.board();
    position
        .generate_legal_moves()
        .iter()
        .copied()
        .find(|&m| board.is_castling(m) && (m.to.col() > m.from.col()) == kingside)
        .ok_or_else(|| {
            SanError::NoMatchingMove(if kingside { "O-O" } else { "O-O-O" }.to_string())
        })
}

fn find_matching_move(position: &Position, parsed: &ParsedSan, token: &str) -> Result<Move, SanError> {
    let board = position.board();
    let matching: Vec<Move> = position
        .generate_legal_moves()
        .iter()
        .copied()
        .filter(|m| m.to == parsed.to)
        .filter(|m| board.pieces[m.from.index()] == parsed.piece)
        // Pawn captures always name their file; without one only pushes match.
        .filter(|m| match parsed.from_file {
            Some(file) => m.from.col() == file,
            None => parsed.piece != Figure::Pawn || m.from.col() == m.to.col(),
        })
        .filter(|m| parsed.from_rank.map_or(true, |rank| m.from.row() == rank))
        .filter(|m| {
            if m.is_promotion() {
                m.promoted == parsed.promotion.unwrap_or(Figure::Queen)
            } else {
                parsed.promotion.is_none()
            }
        })
        .collect();

    match matching.as_slice() {
        [] => Err(SanError::NoMatchingMove(token.to_string())),
        [m] => Ok(*m),
        _ => Err(SanError::AmbiguousMove(token.to_string())),
    }
}

fn disambiguation(board: &Board, m: Move, piece: Figure) -> String {
    let rivals: Vec<Move> = generate_legal_moves(board)
        .iter()
        .copied()
        .filter(|other| other.to == m.to && other.from != m.from)
        .filter(|other| board.pieces[other.from.index()] == piece)
        .collect();

    if rivals.is_empty() {
        return String::new();
    }
    if rivals.iter().all(|other| other.from.col() != m.from.col()) {
        return m.from.file_char().to_string();
    }
    if rivals.iter().all(|other| other.from.row() != m.from.row()) {
        return m.from.rank_char().to_string();
    }
    m.from.to_algebraic()
}

fn add_check_suffix(board: &Board, m: Move, mut san: String) -> String {
    let mut after = *board;
    after.make_move(m);
    if is_king_attacked(&after, after.side_to_move) {
        if generate_legal_moves(&after).is_empty() {
            san.push('#');
        } else {
            san.push('+');
        }
    }
    san
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uci(position: &Position, san: &str) -> String {
        san_to_move(position, san).unwrap().to_uci()
    }

    #[test]
    fn test_pawn_and_piece_moves() {
        let position = Position::new();
        assert_eq!(uci(&position, "e4"), "e2e4");
        assert_eq!(uci(&position, "Nf3"), "g1f3");
        assert_eq!(uci(&position, "Nc3!?"), "b1c3");
        assert!(matches!(san_to_move(&position, "Ke2"), Err(SanError::NoMatchingMove(_))));
        assert_eq!(san_to_move(&position, "  "), Err(SanError::Empty));
    }

    #[test]
    fn test_captures_and_checks() {
        let mut position = Position::new();
        for token in ["e4", "d5"] {
            position.move_san(token).unwrap();
        }
        assert_eq!(uci(&position, "exd5"), "e4d5");
        assert_eq!(uci(&position, "Bb5+"), "f1b5");
    }

    #[test]
    fn test_castling_literals() {
        let position = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        assert_eq!(uci(&position, "O-O"), "e1g1");
        assert_eq!(uci(&position, "0-0-0"), "e1c1");

        let position = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R b kq - 0 1").unwrap();
        assert_eq!(uci(&position, "O-O+"), "e8g8");
    }

    #[test]
    fn test_disambiguation() {
        let position = Position::from_fen("4k3/8/8/8/8/8/8/R1N1K1NR w - - 0 1").unwrap();
        assert!(matches!(
            san_to_move(&position, "Ne2"),
            Err(SanError::AmbiguousMove(_))
        ));
        assert_eq!(uci(&position, "Nce2"), "c1e2");
        assert_eq!(uci(&position, "Ng1e2"), "g1e2");
        assert_eq!(uci(&position, "Nf3"), "g1f3");

        let position = Position::from_fen("4k3/R7/8/8/8/8/8/R3K3 w - - 0 1").unwrap();
        assert_eq!(uci(&position, "R1a4"), "a1a4");
        assert_eq!(uci(&position, "R7a4"), "a7a4");
    }

    #[test]
    fn test_promotion() {
        let position = Position::from_fen("1n2k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        assert_eq!(uci(&position, "a8=Q"), "a7a8Q");
        assert_eq!(uci(&position, "a8N"), "a7a8N");
        assert_eq!(uci(&position, "a8"), "a7a8Q");
        assert_eq!(uci(&position, "axb8=R+"), "a7b8R");
        assert!(san_to_move(&position, "a8=K").is_err());
    }

    #[test]
    fn test_move_to_san() {
        let mut position = Position::new();
        let m = Move::from_uci("g1f3").unwrap();
        assert_eq!(move_to_san(&position, m), "Nf3");

        for text in ["e2e4", "e7e5", "f1c4", "b8c6", "d1h5", "g8f6"] {
            position.make_move_uci(text).unwrap();
        }
        let mate = Move::from_uci("h5f7").unwrap();
        assert_eq!(move_to_san(&position, mate), "Qxf7#");

        let position = Position::from_fen("4k3/8/8/8/8/8/8/R1N1K1NR w - - 0 1").unwrap();
        assert_eq!(move_to_san(&position, Move::from_uci("c1e2").unwrap()), "Nce2");
        assert_eq!(move_to_san(&position, Move::from_uci("g1f3").unwrap()), "Nf3");

        let position = Position::from_fen("4k3/8/8/8/8/8/8/4K2R w K - 0 1").unwrap();
        assert_eq!(move_to_san(&position, Move::from_uci("e1g1").unwrap()), "O-O");
    }

    #[test]
    fn test_move_to_san_promotion() {
        let position = Position::from_fen("1n2k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let m = Move::from_uci("a7b8Q").unwrap();
        assert_eq!(move_to_san(&position, m), "axb8=Q+");
    }
}
