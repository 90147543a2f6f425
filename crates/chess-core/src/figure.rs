//! Board cell contents.

use std::fmt;

/// What occupies a square. `Empty` is a regular cell value meaning "no piece".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Figure {
    #[default]
    Empty = 0,
    King = 1,
    Queen = 2,
    Rook = 3,
    Knight = 4,
    Bishop = 5,
    Pawn = 6,
}

impl Figure {
    /// Figures a pawn may be promoted to, in the order they are generated.
    pub const PROMOTIONS: [Figure; 4] = [Figure::Queen, Figure::Rook, Figure::Bishop, Figure::Knight];

    /// Returns true for the `Empty` cell value.
    #[inline]
    pub const fn is_empty(self) -> bool {
        matches!(self, Figure::Empty)
    }

    /// Returns the notation letter (`K`, `Q`, `R`, `N`, `B`).
    ///
    /// Pawns and empty cells have no letter.
    pub const fn letter(self) -> Option<char> {
        match self {
            Figure::King => Some('K'),
            Figure::Queen => Some('Q'),
            Figure::Rook => Some('R'),
            Figure::Knight => Some('N'),
            Figure::Bishop => Some('B'),
            Figure::Pawn | Figure::Empty => None,
        }
    }

    /// Parses a notation letter. Accepts either case; `P` maps to a pawn.
    pub const fn from_letter(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'K' => Some(Figure::King),
            'Q' => Some(Figure::Queen),
            'R' => Some(Figure::Rook),
            'N' => Some(Figure::Knight),
            'B' => Some(Figure::Bishop),
            'P' => Some(Figure::Pawn),
            _ => None,
        }
    }

    /// Returns true if a pawn may be promoted to this figure.
    #[inline]
    pub const fn is_promotion(self) -> bool {
        matches!(
            self,
            Figure::Queen | Figure::Rook | Figure::Bishop | Figure::Knight
        )
    }
}

impl fmt::Display for Figure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Figure::Empty => "Empty",
            Figure::King => "King",
            Figure::Queen => "Queen",
            Figure::Rook => "Rook",
            Figure::Knight => "Knight",
            Figure::Bishop => "Bishop",
            Figure::Pawn => "Pawn",
        };
        write!(f, "{}", name)
    }
}
