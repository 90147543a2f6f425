//! Chess rules engine with a mailbox board.
//!
//! This crate provides:
//! - [`Board`] - 64-cell board with per-square "moved" flags
//! - [`Position`] - full game state with move log and repetition window
//! - Move generation and validation
//! - [`GameResult`] - checkmate, stalemate and draw detection after each move
//! - SAN notation parsing and generation
//!
//! # Example
//!
//! ```
//! use chess_engine::{Position, Winner};
//!
//! let mut position = Position::new();
//! assert_eq!(position.generate_legal_moves().len(), 20);
//!
//! for text in ["e2e4", "e7e5", "f1c4", "b8c6", "d1h5", "g8f6"] {
//!     position.make_move_uci(text).unwrap();
//! }
//! let result = position.make_move_uci("h5f7").unwrap();
//! assert_eq!(result.winner, Winner::White);
//! assert_eq!(result.message, "checkmate");
//! ```

mod board;
pub mod movegen;
mod position;
pub mod rules;
pub mod san;

pub use board::Board;
pub use movegen::{generate_legal_moves, generate_pseudo_legal_moves, is_king_attacked, MoveList};
pub use position::Position;
pub use rules::{GameResult, Winner};
pub use san::{move_to_san, san_to_move, SanError};
