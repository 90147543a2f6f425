//! Game termination.
//!
//! After every move the position is classified as ongoing, decisive or drawn.
//! Conditions are checked in a fixed order: insufficient material, no legal
//! moves (checkmate or stalemate), repetition, then the fifty-move rule.

use crate::{movegen, Position};
use chess_core::{Color, Move};
use std::fmt;

/// Number of reversible plies after which the game is drawn.
pub const FIFTY_MOVE_PLIES: usize = 100;

/// Number of earlier occurrences of a placement that makes a repetition draw.
pub const REPETITION_COUNT: usize = 3;

/// Who won, if anyone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Winner {
    /// The game continues.
    #[default]
    None,
    Draw,
    White,
    Black,
}

impl Winner {
    /// The winner for a side delivering mate.
    pub const fn from_color(color: Color) -> Self {
        match color {
            Color::White => Winner::White,
            Color::Black => Winner::Black,
        }
    }
}

/// Outcome of a move: who won (if anyone) and a short message.
///
/// While the game continues the message is the move text, otherwise it
/// names the reason the game ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameResult {
    pub winner: Winner,
    pub message: String,
}

impl GameResult {
    pub fn ongoing(m: Move) -> Self {
        GameResult {
            winner: Winner::None,
            message: m.to_uci(),
        }
    }

    pub fn draw(reason: &str) -> Self {
        GameResult {
            winner: Winner::Draw,
            message: reason.to_string(),
        }
    }

    pub fn checkmate(winner: Color) -> Self {
        GameResult {
            winner: Winner::from_color(winner),
            message: "checkmate".to_string(),
        }
    }

    /// Returns true if the game has ended.
    #[inline]
    pub fn is_over(&self) -> bool {
        self.winner != Winner::None
    }
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.winner {
            Winner::None => write!(f, "{}", self.message),
            Winner::Draw => write!(f, "draw by {}", self.message),
            Winner::White => write!(f, "white wins by {}", self.message),
            Winner::Black => write!(f, "black wins by {}", self.message),
        }
    }
}

/// Classifies `position` right after `last` was played.
pub fn evaluate(position: &Position, last: Move) -> GameResult {
    let board = position.board();

    if board.piece_count() == 2 {
        return GameResult::draw("insufficient material");
    }

    if movegen::generate_legal_moves(board).is_empty() {
        let side = board.side_to_move;
        return if movegen::is_king_attacked(board, side) {
            GameResult::checkmate(side.opposite())
        } else {
            GameResult::draw("stalemate")
        };
    }

    let repeats = position
        .prev_positions()
        .iter()
        .filter(|earlier| earlier.same_placement(board))
        .count();
    if repeats >= REPETITION_COUNT {
        return GameResult::draw("repetition");
    }

    if position.prev_positions().len() >= FIFTY_MOVE_PLIES {
        return GameResult::draw("50 move rule");
    }

    GameResult::ongoing(last)
}
