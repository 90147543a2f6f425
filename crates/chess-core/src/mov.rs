//! Move representation and UCI move text.

use crate::{Figure, NotationError, Square};
use std::fmt;

/// A chess move.
///
/// `promoted` is [`Figure::Empty`] except for pawn promotions, where it holds the
/// chosen figure. Two moves with the same squares but different promotions are
/// different moves.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub promoted: Figure,
}

impl Move {
    /// Creates a move.
    #[inline]
    pub const fn new(from: Square, to: Square, promoted: Figure) -> Self {
        Move { from, to, promoted }
    }

    /// Creates a non-promoting move.
    #[inline]
    pub const fn normal(from: Square, to: Square) -> Self {
        Self::new(from, to, Figure::Empty)
    }

    /// Returns true if this move carries a promotion figure.
    #[inline]
    pub const fn is_promotion(self) -> bool {
        !self.promoted.is_empty()
    }

    /// Returns the move text: origin and destination squares plus an optional
    /// promotion letter, e.g. `"e2e4"` or `"e7e8Q"`.
    pub fn to_uci(self) -> String {
        let mut text = String::with_capacity(5);
        text.push_str(&self.from.to_algebraic());
        text.push_str(&self.to.to_algebraic());
        if let Some(letter) = self.promoted.letter() {
            text.push(letter);
        }
        text
    }

    /// Parses move text produced by [`Move::to_uci`].
    ///
    /// The promotion letter is optional and accepted in either case.
    pub fn from_uci(s: &str) -> Result<Self, NotationError> {
        if !s.is_ascii() || s.len() < 4 || s.len() > 5 {
            return Err(NotationError::InvalidMove(s.to_string()));
        }
        let from = Square::from_algebraic(&s[0..2])
            .ok_or_else(|| NotationError::InvalidSquare(s[0..2].to_string()))?;
        let to = Square::from_algebraic(&s[2..4])
            .ok_or_else(|| NotationError::InvalidSquare(s[2..4].to_string()))?;
        let promoted = match s[4..].chars().next() {
            None => Figure::Empty,
            Some(c) => Figure::from_letter(c)
                .filter(|f| f.is_promotion())
                .ok_or_else(|| NotationError::InvalidPromotion(c))?,
        };
        Ok(Move::new(from, to, promoted))
    }

    /// Placeholder value, not a legal move.
    pub const NULL: Move = Move::normal(Square::A1, Square::A1);
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({})", self.to_uci())
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_uci())
    }
}

impl std::str::FromStr for Move {
    type Err = NotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Move::from_uci(s)
    }
}
