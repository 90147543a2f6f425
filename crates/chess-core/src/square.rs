//! Board square representation and the square text codec.

use std::fmt;

/// Converts a square index (0-63) to algebraic text, e.g. `28` -> `"e4"`.
///
/// Indices are little-endian rank-file: `index = row * 8 + col`, a1 = 0, h8 = 63.
/// Values above 63 are folded onto the board.
pub fn index_to_text(index: usize) -> String {
    Square::new((index % 64) as u8).to_algebraic()
}

/// Parses algebraic text into a square index. Inverse of [`index_to_text`].
pub fn text_to_index(text: &str) -> Option<usize> {
    Square::from_algebraic(text).map(Square::index)
}

/// A square on the chess board, indexed 0-63.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square(u8);

impl Square {
    /// Creates a square from an index, masking it to 0-63.
    #[inline]
    pub const fn new(index: u8) -> Self {
        Square(index & 63)
    }

    /// Creates a square from an index, or `None` if it is off the board.
    #[inline]
    pub const fn from_index(index: usize) -> Option<Self> {
        if index < 64 {
            Some(Square(index as u8))
        } else {
            None
        }
    }

    /// Creates a square from column (file, 0 = a) and row (rank, 0 = "1").
    #[inline]
    pub const fn from_coords(col: u8, row: u8) -> Option<Self> {
        if col < 8 && row < 8 {
            Some(Square(row * 8 + col))
        } else {
            None
        }
    }

    /// Parses a square from algebraic notation (e.g., "e4").
    pub fn from_algebraic(s: &str) -> Option<Self> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return None;
        }
        let col = bytes[0].checked_sub(b'a')?;
        let row = bytes[1].checked_sub(b'1')?;
        Self::from_coords(col, row)
    }

    /// Returns the index (0-63).
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Column, 0 = file a.
    #[inline]
    pub const fn col(self) -> u8 {
        self.0 % 8
    }

    /// Row, 0 = rank 1.
    #[inline]
    pub const fn row(self) -> u8 {
        self.0 / 8
    }

    /// File letter ('a'-'h').
    #[inline]
    pub const fn file_char(self) -> char {
        (b'a' + self.col()) as char
    }

    /// Rank digit ('1'-'8').
    #[inline]
    pub const fn rank_char(self) -> char {
        (b'1' + self.row()) as char
    }

    /// Steps `dx` columns and `dy` rows, or `None` when that leaves the board.
    #[inline]
    pub const fn offset(self, dx: i8, dy: i8) -> Option<Self> {
        let col = self.col() as i8 + dx;
        let row = self.row() as i8 + dy;
        if col < 0 || col > 7 || row < 0 || row > 7 {
            None
        } else {
            Some(Square((row * 8 + col) as u8))
        }
    }

    /// Returns the algebraic notation for this square.
    pub fn to_algebraic(self) -> String {
        format!("{}{}", self.file_char(), self.rank_char())
    }

    pub const A1: Square = Square(0);
    pub const C1: Square = Square(2);
    pub const E1: Square = Square(4);
    pub const G1: Square = Square(6);
    pub const H1: Square = Square(7);
    pub const A8: Square = Square(56);
    pub const C8: Square = Square(58);
    pub const E8: Square = Square(60);
    pub const G8: Square = Square(62);
    pub const H8: Square = Square(63);
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Square({})", self.to_algebraic())
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file_char(), self.rank_char())
    }
}
