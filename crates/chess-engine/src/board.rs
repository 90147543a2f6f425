//! Mailbox board state.

use chess_core::{Color, FenSetup, Figure, Move, Square};

/// Board-level state of a position: what stands where, who owns it, which
/// squares have been disturbed, who is to move and the en-passant target.
///
/// `Board` is `Copy` so move legality can be tested on throwaway copies, and
/// the repetition window stores boards rather than whole positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board {
    /// Figure occupying each square.
    pub pieces: [Figure; 64],
    /// Owner of each square; only meaningful where `pieces` is not empty.
    pub color: [Color; 64],
    /// True once any piece has departed from or arrived at the square.
    pub moved: [bool; 64],
    pub side_to_move: Color,
    /// Pawn that advanced two squares on the previous ply.
    pub passing_pawn: Option<Square>,
}

const BACK_ROW: [Figure; 8] = [
    Figure::Rook,
    Figure::Knight,
    Figure::Bishop,
    Figure::Queen,
    Figure::King,
    Figure::Bishop,
    Figure::Knight,
    Figure::Rook,
];

impl Board {
    /// The standard starting array with White to move.
    pub fn standard() -> Self {
        let mut pieces = [Figure::Empty; 64];
        for col in 0..8 {
            pieces[col] = BACK_ROW[col];
            pieces[8 + col] = Figure::Pawn;
            pieces[48 + col] = Figure::Pawn;
            pieces[56 + col] = BACK_ROW[col];
        }
        let mut color = [Color::Black; 64];
        color[..32].fill(Color::White);
        Board {
            pieces,
            color,
            moved: [false; 64],
            side_to_move: Color::White,
            passing_pawn: None,
        }
    }

    /// Builds a board from a parsed FEN record.
    ///
    /// Castling rights map onto the `moved` flags: a king or rook whose right
    /// is missing counts as moved. Pawns off their starting row count as moved
    /// so they cannot double-step.
    pub fn from_setup(setup: &FenSetup) -> Self {
        let mut board = Board {
            pieces: [Figure::Empty; 64],
            color: [Color::White; 64],
            moved: [false; 64],
            side_to_move: setup.side_to_move,
            passing_pawn: None,
        };

        for (index, cell) in setup.cells.iter().enumerate() {
            if let Some((figure, owner)) = *cell {
                board.pieces[index] = figure;
                board.color[index] = owner;
            }
        }

        for index in 0..64 {
            if board.pieces[index] == Figure::Pawn {
                let start_row = board.color[index].back_row() as i8 + board.color[index].pawn_direction();
                board.moved[index] = index / 8 != start_row as usize;
            }
        }

        for owner in [Color::White, Color::Black] {
            let row = owner.back_row();
            let kingside = setup.can_castle(owner, true);
            let queenside = setup.can_castle(owner, false);
            for (col, allowed) in [(7, kingside), (0, queenside), (4, kingside || queenside)] {
                if let Some(square) = Square::from_coords(col, row) {
                    board.moved[square.index()] = !allowed;
                }
            }
        }

        // FEN names the skipped square; the engine tracks the pawn itself.
        board.passing_pawn = setup
            .en_passant
            .and_then(|skipped| skipped.offset(0, -setup.side_to_move.pawn_direction()));

        board
    }

    /// Returns the figure and owner on a square, or `None` if it is empty.
    #[inline]
    pub fn piece_at(&self, square: Square) -> Option<(Figure, Color)> {
        let index = square.index();
        match self.pieces[index] {
            Figure::Empty => None,
            figure => Some((figure, self.color[index])),
        }
    }

    /// Returns true if the square holds a piece of the given color.
    #[inline]
    pub fn is_owned_by(&self, square: Square, owner: Color) -> bool {
        let index = square.index();
        !self.pieces[index].is_empty() && self.color[index] == owner
    }

    /// Square of the given side's king.
    pub fn king_square(&self, owner: Color) -> Option<Square> {
        (0..64)
            .find(|&i| self.pieces[i] == Figure::King && self.color[i] == owner)
            .and_then(Square::from_index)
    }

    /// Number of pieces of both colors on the board.
    pub fn piece_count(&self) -> usize {
        self.pieces.iter().filter(|f| !f.is_empty()).count()
    }

    /// Compares piece placement and ownership only.
    pub fn same_placement(&self, other: &Board) -> bool {
        self.pieces == other.pieces
            && (0..64).all(|i| self.pieces[i].is_empty() || self.color[i] == other.color[i])
    }

    /// Returns true if the move is a castling move (king travelling two files).
    #[inline]
    pub fn is_castling(&self, m: Move) -> bool {
        self.pieces[m.from.index()] == Figure::King && m.from.col().abs_diff(m.to.col()) == 2
    }

    /// Returns true if the move captures, including en passant.
    pub fn is_capture(&self, m: Move) -> bool {
        let mover = self.color[m.from.index()];
        if self.is_owned_by(m.to, mover.opposite()) {
            return true;
        }
        self.pieces[m.from.index()] == Figure::Pawn && m.from.col() != m.to.col()
    }

    /// Moves whatever stands on `from` to `to`, marking both squares as moved.
    pub(crate) fn relocate(&mut self, from: Square, to: Square) {
        let (from, to) = (from.index(), to.index());
        self.pieces[to] = self.pieces[from];
        self.color[to] = self.color[from];
        self.pieces[from] = Figure::Empty;
        self.moved[from] = true;
        self.moved[to] = true;
    }

    /// Applies a move to the board and passes the turn.
    ///
    /// The move is not validated. Handles castling, double steps, en passant
    /// and promotion. A promotion without a figure promotes to a queen.
    pub fn make_move(&mut self, m: Move) {
        let figure = self.pieces[m.from.index()];
        let mover = self.color[m.from.index()];
        let dir = mover.pawn_direction();
        self.passing_pawn = None;

        match figure {
            Figure::King if self.is_castling(m) => {
                let kingside = m.to.col() > m.from.col();
                let corner = if kingside { 7 } else { 0 };
                let rook_from = Square::from_coords(corner, m.from.row());
                let rook_to = m.to.offset(if kingside { -1 } else { 1 }, 0);
                if let (Some(rook_from), Some(rook_to)) = (rook_from, rook_to) {
                    self.relocate(rook_from, rook_to);
                }
                self.relocate(m.from, m.to);
            }
            Figure::Pawn if m.from.row().abs_diff(m.to.row()) == 2 => {
                self.relocate(m.from, m.to);
                self.passing_pawn = Some(m.to);
            }
            Figure::Pawn if m.from.col() != m.to.col() && self.pieces[m.to.index()].is_empty() => {
                if let Some(captured) = m.to.offset(0, -dir) {
                    self.pieces[captured.index()] = Figure::Empty;
                    self.moved[captured.index()] = true;
                }
                self.relocate(m.from, m.to);
            }
            _ => self.relocate(m.from, m.to),
        }

        if figure == Figure::Pawn && (m.to.row() == 0 || m.to.row() == 7) {
            self.pieces[m.to.index()] = if m.promoted.is_empty() {
                Figure::Queen
            } else {
                m.promoted
            };
        }

        self.side_to_move = self.side_to_move.opposite();
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}
