//! Chess opening book and lookup.
//!
//! This crate builds a move trie from tab-separated opening databases and
//! names the opening reached by a game's moves.
//!
//! ```
//! use chess_engine::Position;
//! use chess_openings::{OpeningBook, OpeningLine};
//!
//! let lines = [OpeningLine::from_pgn("B20", "Sicilian Defense", "1. e4 c5")];
//! let book = OpeningBook::from_lines(&lines).unwrap();
//!
//! let mut position = Position::new();
//! position.make_move_uci("e2e4").unwrap();
//! position.make_move_uci("c7c5").unwrap();
//! assert_eq!(book.find(&position), Some("Sicilian Defense"));
//! ```

pub mod book;
pub mod opening;

pub use book::{parse_tsv, BookError, OpeningBook, BOOK_FILES};
pub use opening::OpeningLine;
