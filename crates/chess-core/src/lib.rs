//! Core types for chess.
//!
//! This crate provides the value types shared by the rules engine, the opening
//! book and the analysis-engine boundary:
//! - [`Figure`] and [`Color`] for board cells
//! - [`Square`] plus the [`index_to_text`] / [`text_to_index`] codec
//! - [`Move`] and its UCI move text
//! - FEN parsing for setting up arbitrary positions

mod color;
mod error;
mod fen;
mod figure;
mod mov;
mod square;

pub use color::Color;
pub use error::{FenError, NotationError};
pub use fen::FenSetup;
pub use figure::Figure;
pub use mov::Move;
pub use square::{index_to_text, text_to_index, Square};
