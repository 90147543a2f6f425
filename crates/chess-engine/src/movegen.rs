//! Move generation.
//!
//! Pseudo-legal moves follow the piece movement rules only. Legal moves are
//! obtained by playing each pseudo-legal move on a copy of the board and
//! rejecting those that leave the mover's king attacked.

use crate::Board;
use chess_core::{Color, Figure, Move, Square};

/// A list of moves with a fixed maximum capacity.
///
/// Chess positions have at most 218 legal moves, so we use a fixed-size
/// array to avoid heap allocations during move generation.
#[derive(Clone)]
pub struct MoveList {
    moves: [Move; Self::MAX_MOVES],
    len: usize,
}

impl MoveList {
    /// Maximum number of moves held.
    pub const MAX_MOVES: usize = 256;

    /// Creates an empty move list.
    #[inline]
    pub const fn new() -> Self {
        MoveList {
            moves: [Move::NULL; Self::MAX_MOVES],
            len: 0,
        }
    }

    /// Adds a move to the list.
    #[inline]
    pub fn push(&mut self, m: Move) {
        debug_assert!(self.len < Self::MAX_MOVES);
        self.moves[self.len] = m;
        self.len += 1;
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns a slice of the moves.
    #[inline]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.len]
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.as_slice().iter()
    }

    pub fn contains(&self, m: &Move) -> bool {
        self.as_slice().contains(m)
    }
}

impl Default for MoveList {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Index<usize> for MoveList {
    type Output = Move;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.as_slice()[index]
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl std::fmt::Debug for MoveList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

/// One movement direction of a figure: a step and how many times it repeats.
#[derive(Debug, Clone, Copy)]
struct Ray {
    dx: i8,
    dy: i8,
    reach: u8,
}

const fn ray(dx: i8, dy: i8, reach: u8) -> Ray {
    Ray { dx, dy, reach }
}

static ROOK_RAYS: [Ray; 4] = [ray(1, 0, 7), ray(-1, 0, 7), ray(0, 1, 7), ray(0, -1, 7)];

static BISHOP_RAYS: [Ray; 4] = [ray(1, 1, 7), ray(1, -1, 7), ray(-1, 1, 7), ray(-1, -1, 7)];

static QUEEN_RAYS: [Ray; 8] = [
    ray(1, 0, 7),
    ray(-1, 0, 7),
    ray(0, 1, 7),
    ray(0, -1, 7),
    ray(1, 1, 7),
    ray(1, -1, 7),
    ray(-1, 1, 7),
    ray(-1, -1, 7),
];

static KNIGHT_RAYS: [Ray; 8] = [
    ray(1, 2, 1),
    ray(2, 1, 1),
    ray(2, -1, 1),
    ray(1, -2, 1),
    ray(-1, -2, 1),
    ray(-2, -1, 1),
    ray(-2, 1, 1),
    ray(-1, 2, 1),
];

static KING_RAYS: [Ray; 8] = [
    ray(1, 0, 1),
    ray(-1, 0, 1),
    ray(0, 1, 1),
    ray(0, -1, 1),
    ray(1, 1, 1),
    ray(1, -1, 1),
    ray(-1, 1, 1),
    ray(-1, -1, 1),
];

fn rays(figure: Figure) -> &'static [Ray] {
    match figure {
        Figure::Rook => &ROOK_RAYS,
        Figure::Bishop => &BISHOP_RAYS,
        Figure::Queen => &QUEEN_RAYS,
        Figure::Knight => &KNIGHT_RAYS,
        Figure::King => &KING_RAYS,
        Figure::Pawn | Figure::Empty => &[],
    }
}

/// Generates pseudo-legal moves for `side`, regardless of whose turn it is.
///
/// Moves may leave the own king attacked. Promotions are emitted once with an
/// empty promotion figure; [`generate_legal_moves`] expands them.
pub fn generate_pseudo_legal_moves(board: &Board, side: Color, moves: &mut MoveList) {
    for index in 0..64 {
        let figure = board.pieces[index];
        if figure.is_empty() || board.color[index] != side {
            continue;
        }
        let Some(from) = Square::from_index(index) else {
            continue;
        };
        match figure {
            Figure::Pawn => pawn_moves(board, from, side, moves),
            Figure::King => {
                ray_moves(board, from, side, figure, moves);
                castling_moves(board, from, side, moves);
            }
            _ => ray_moves(board, from, side, figure, moves),
        }
    }
}

fn pawn_moves(board: &Board, from: Square, side: Color, moves: &mut MoveList) {
    let dir = side.pawn_direction();
    let Some(ahead) = from.offset(0, dir) else {
        return;
    };

    for dx in [1, -1] {
        let Some(target) = from.offset(dx, dir) else {
            continue;
        };
        // En passant only checks that the passing pawn stands beside us.
        let beside_passing_pawn =
            board.passing_pawn.is_some() && from.offset(dx, 0) == board.passing_pawn;
        if board.is_owned_by(target, side.opposite()) || beside_passing_pawn {
            moves.push(Move::normal(from, target));
        }
    }

    if board.pieces[ahead.index()].is_empty() {
        moves.push(Move::normal(from, ahead));
        if !board.moved[from.index()] {
            if let Some(two_ahead) = ahead.offset(0, dir) {
                if board.pieces[two_ahead.index()].is_empty() {
                    moves.push(Move::normal(from, two_ahead));
                }
            }
        }
    }
}

fn ray_moves(board: &Board, from: Square, side: Color, figure: Figure, moves: &mut MoveList) {
    for ray in rays(figure) {
        let mut current = from;
        for _ in 0..ray.reach {
            let Some(next) = current.offset(ray.dx, ray.dy) else {
                break;
            };
            if board.pieces[next.index()].is_empty() {
                moves.push(Move::normal(from, next));
                current = next;
                continue;
            }
            if board.color[next.index()] != side {
                moves.push(Move::normal(from, next));
            }
            break;
        }
    }
}

fn castling_moves(board: &Board, from: Square, side: Color, moves: &mut MoveList) {
    if board.moved[from.index()] {
        return;
    }
    for (corner, dir) in [(7u8, 1i8), (0u8, -1i8)] {
        let Some(rook) = Square::from_coords(corner, from.row()) else {
            continue;
        };
        if board.moved[rook.index()] || board.piece_at(rook) != Some((Figure::Rook, side)) {
            continue;
        }
        let (low, high) = if corner > from.col() {
            (from.col() + 1, corner)
        } else {
            (corner + 1, from.col())
        };
        let path_clear = (low..high)
            .filter_map(|col| Square::from_coords(col, from.row()))
            .all(|sq| board.pieces[sq.index()].is_empty());
        if !path_clear {
            continue;
        }
        if let Some(to) = from.offset(2 * dir, 0) {
            moves.push(Move::normal(from, to));
        }
    }
}

/// Returns true if any pseudo-legal move of the opponent lands on `side`'s king.
pub fn is_king_attacked(board: &Board, side: Color) -> bool {
    let Some(king) = board.king_square(side) else {
        return false;
    };
    let mut replies = MoveList::new();
    generate_pseudo_legal_moves(board, side.opposite(), &mut replies);
    replies.iter().any(|m| m.to == king)
}

/// Returns true if playing `m` leaves the mover's own king safe.
fn keeps_king_safe(board: &Board, m: Move) -> bool {
    let side = board.color[m.from.index()];
    let mut after = *board;
    after.make_move(m);
    !is_king_attacked(&after, side)
}

/// Generates all legal moves for the side to move.
///
/// Castling is additionally rejected while the king is attacked or when the
/// square it passes over is attacked. Pawn moves onto the first or last rank
/// are expanded into one move per promotion figure.
pub fn generate_legal_moves(board: &Board) -> MoveList {
    let side = board.side_to_move;
    let mut pseudo = MoveList::new();
    generate_pseudo_legal_moves(board, side, &mut pseudo);

    let mut legal = MoveList::new();
    for &m in &pseudo {
        if board.is_castling(m) {
            if is_king_attacked(board, side) {
                continue;
            }
            let Some(transit) = Square::from_index((m.from.index() + m.to.index()) / 2) else {
                continue;
            };
            let mut passing = *board;
            passing.relocate(m.from, transit);
            if is_king_attacked(&passing, side) {
                continue;
            }
        }

        let promotes = board.pieces[m.from.index()] == Figure::Pawn
            && (m.to.row() == 0 || m.to.row() == 7);
        if promotes {
            for figure in Figure::PROMOTIONS {
                let promotion = Move::new(m.from, m.to, figure);
                if keeps_king_safe(board, promotion) {
                    legal.push(promotion);
                }
            }
        } else if keeps_king_safe(board, m) {
            legal.push(m);
        }
    }
    legal
}
