//! Game state: the board plus move log and repetition window.

use crate::rules::{self, GameResult, FIFTY_MOVE_PLIES};
use crate::san::{self, SanError};
use crate::{movegen, Board, MoveList};
use chess_core::{Color, FenError, FenSetup, Figure, Move, NotationError, Square};
use std::collections::VecDeque;

/// Authoritative state of one game.
///
/// Moves passed to [`Position::make_move`] are assumed legal; callers that
/// accept untrusted input should check them against
/// [`Position::generate_legal_moves`] first.
#[derive(Debug, Clone)]
pub struct Position {
    board: Board,
    move_number: u32,
    moves: Vec<Move>,
    /// Boards preceding each reversible ply since the last pawn move or capture.
    prev_positions: VecDeque<Board>,
    start: Board,
    start_move_number: u32,
}

impl Position {
    /// Creates a position at the standard starting array.
    pub fn new() -> Self {
        Self::with_start(Board::standard(), 1)
    }

    /// Creates a position from a FEN string.
    ///
    /// The halfmove clock is not carried over; the repetition window starts
    /// empty.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let setup = FenSetup::parse(fen)?;
        Ok(Self::with_start(
            Board::from_setup(&setup),
            setup.fullmove_number.max(1),
        ))
    }

    fn with_start(start: Board, start_move_number: u32) -> Self {
        Position {
            board: start,
            move_number: start_move_number,
            moves: Vec::new(),
            prev_positions: VecDeque::with_capacity(FIFTY_MOVE_PLIES),
            start,
            start_move_number,
        }
    }

    /// Returns to the starting array and forgets all moves.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn pieces(&self) -> &[Figure; 64] {
        &self.board.pieces
    }

    #[inline]
    pub fn color(&self) -> &[Color; 64] {
        &self.board.color
    }

    #[inline]
    pub fn moved(&self) -> &[bool; 64] {
        &self.board.moved
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.board.side_to_move
    }

    #[inline]
    pub fn white_turn(&self) -> bool {
        self.board.side_to_move.is_white()
    }

    #[inline]
    pub fn passing_pawn(&self) -> Option<Square> {
        self.board.passing_pawn
    }

    #[inline]
    pub fn move_number(&self) -> u32 {
        self.move_number
    }

    /// All moves played since the start, in order.
    #[inline]
    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    #[inline]
    pub fn prev_positions(&self) -> &VecDeque<Board> {
        &self.prev_positions
    }

    #[inline]
    pub fn piece_at(&self, square: Square) -> Option<(Figure, Color)> {
        self.board.piece_at(square)
    }

    /// All legal moves for the side to move.
    pub fn generate_legal_moves(&self) -> MoveList {
        movegen::generate_legal_moves(&self.board)
    }

    /// Returns true if the given side's king is attacked.
    pub fn is_king_attacked(&self, color: Color) -> bool {
        movegen::is_king_attacked(&self.board, color)
    }

    /// Returns true if both positions have the same placement of pieces.
    pub fn equal(&self, other: &Position) -> bool {
        self.board.same_placement(&other.board)
    }

    /// Plays a legal move and reports the resulting game state.
    pub fn make_move(&mut self, m: Move) -> GameResult {
        self.apply(m);
        rules::evaluate(self, m)
    }

    /// Plays a move given as text such as `"e2e4"` or `"e7e8Q"`.
    ///
    /// A missing promotion letter promotes to a queen.
    pub fn make_move_uci(&mut self, text: &str) -> Result<GameResult, NotationError> {
        let m = Move::from_uci(text)?;
        Ok(self.make_move(m))
    }

    /// Plays a move given in SAN and returns its move text.
    ///
    /// The game result is not evaluated.
    pub fn move_san(&mut self, text: &str) -> Result<String, SanError> {
        let m = san::san_to_move(self, text)?;
        self.apply(m);
        Ok(m.to_uci())
    }

    fn apply(&mut self, m: Move) {
        self.moves.push(m);

        let irreversible =
            self.board.pieces[m.from.index()] == Figure::Pawn || self.board.is_capture(m);
        if irreversible {
            self.prev_positions.clear();
        } else {
            self.prev_positions.push_back(self.board);
            if self.prev_positions.len() > FIFTY_MOVE_PLIES {
                self.prev_positions.pop_front();
            }
        }

        self.board.make_move(m);
        if self.board.side_to_move == Color::White {
            self.move_number += 1;
        }
    }

    /// The position before the last move, or `None` if no move was played.
    pub fn previous(&self) -> Option<Position> {
        let (_, earlier) = self.moves.split_last()?;
        let mut position = Self::with_start(self.start, self.start_move_number);
        for &m in earlier {
            position.apply(m);
        }
        Some(position)
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Winner;

    #[test]
    fn new_position_state() {
        let position = Position::new();
        assert!(position.white_turn());
        assert_eq!(position.move_number(), 1);
        assert_eq!(position.passing_pawn(), None);
        assert!(position.moves().is_empty());
        assert!(position.prev_positions().is_empty());
        assert_eq!(position.generate_legal_moves().len(), 20);
    }

    #[test]
    fn move_number_advances_after_black() {
        let mut position = Position::new();
        position.make_move_uci("e2e4").unwrap();
        assert_eq!(position.move_number(), 1);
        assert!(!position.white_turn());
        position.make_move_uci("e7e5").unwrap();
        assert_eq!(position.move_number(), 2);
        assert_eq!(position.moves().len(), 2);
    }

    #[test]
    fn window_tracks_reversible_plies() {
        let mut position = Position::new();
        position.make_move_uci("g1f3").unwrap();
        position.make_move_uci("g8f6").unwrap();
        assert_eq!(position.prev_positions().len(), 2);
        position.make_move_uci("e2e4").unwrap();
        assert!(position.prev_positions().is_empty());
        position.make_move_uci("f6e4").unwrap();
        assert!(position.prev_positions().is_empty());
    }

    #[test]
    fn reset_restores_start() {
        let mut position = Position::new();
        position.make_move_uci("e2e4").unwrap();
        position.reset();
        assert!(position.equal(&Position::new()));
        assert!(position.moves().is_empty());
        assert!(position.white_turn());
    }

    #[test]
    fn previous_replays_from_fen_start() {
        let mut position = Position::from_fen("4k3/8/8/8/8/8/4P3/4K3 w - - 0 7").unwrap();
        assert!(position.previous().is_none());
        position.make_move_uci("e2e4").unwrap();
        position.make_move_uci("e8d7").unwrap();

        let previous = position.previous().unwrap();
        assert_eq!(previous.moves().len(), 1);
        assert!(!previous.white_turn());
        assert_eq!(previous.move_number(), 7);
        assert_eq!(previous.piece_at(Square::E8), Some((Figure::King, Color::Black)));
    }

    #[test]
    fn move_san_skips_evaluation() {
        let mut position = Position::new();
        assert_eq!(position.move_san("e4").unwrap(), "e2e4");
        assert_eq!(position.move_san("c5").unwrap(), "c7c5");
        assert_eq!(position.move_san("Nf3").unwrap(), "g1f3");
        assert!(position.move_san("Qxh7").is_err());
        assert_eq!(position.moves().len(), 3);
    }

    #[test]
    fn malformed_text_is_rejected() {
        let mut position = Position::new();
        assert!(position.make_move_uci("e2").is_err());
        assert!(position.make_move_uci("z2e4").is_err());
        assert!(position.moves().is_empty());
    }

    #[test]
    fn uci_result_messages() {
        let mut position = Position::new();
        let result = position.make_move_uci("d2d4").unwrap();
        assert_eq!(result.winner, Winner::None);
        assert_eq!(result.message, "d2d4");
    }
}
