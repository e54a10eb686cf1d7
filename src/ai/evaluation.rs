//! Static position evaluation.
//!
//! Returns a score from White's perspective: positive favors White,
//! negative favors Black. Three components, each summed over every piece
//! with its contribution signed by side:
//!   1. Material balance
//!   2. Piece-square positional bonus, weighted by piece value
//!   3. Control: squares attacked (from the Control Map), weighted by
//!      piece value
//!
//! Only the relative ordering of scores matters to the search, so the
//! blend weights share a common integer basis instead of normalizing.

use crate::engine::board::Board;
use crate::engine::types::{Color, Coord, PieceKind};

/// Bound on any reachable score; alpha-beta windows start here.
pub const INF: i32 = 1_000_000_000;

/// Base score for a forced mate. Scaled by remaining depth at the point of
/// detection so shallower mates always outrank deeper ones, and any mate
/// outranks every static evaluation.
pub const MATE: i32 = 1_000_000;

/// Is this score a forced-mate score?
#[inline]
pub fn is_mate_score(score: i32) -> bool {
    score.abs() >= MATE
}

// =========================================================================
// Blend weights (shared ×20 basis keeps the sum integral)
// =========================================================================

pub const W_POSITION: i32 = 3;
pub const W_MATERIAL: i32 = 920;
pub const W_CONTROL: i32 = 20;

// =========================================================================
// Piece-Square Tables (White's perspective)
//
// Indexed row-major from row 0 (Black's home rank). White reads the table
// directly; Black mirrors vertically.
// =========================================================================

/// Pawn PST — encourages central pawns and advancement.
#[rustfmt::skip]
const PAWN_PST: [i32; 64] = [
     0,  0,  0,  0,  0,  0,  0,  0,
    50, 50, 50, 50, 50, 50, 50, 50,
    10, 10, 20, 30, 30, 20, 10, 10,
     5,  5, 10, 25, 25, 10,  5,  5,
     0,  0,  0, 20, 20,  0,  0,  0,
     5, -5,-10,  0,  0,-10, -5,  5,
     5, 10, 10,-20,-20, 10, 10,  5,
     0,  0,  0,  0,  0,  0,  0,  0,
];

/// Knight PST — encourages centralization.
#[rustfmt::skip]
const KNIGHT_PST: [i32; 64] = [
    -50,-40,-30,-30,-30,-30,-40,-50,
    -40,-20,  0,  0,  0,  0,-20,-40,
    -30,  0, 10, 15, 15, 10,  0,-30,
    -30,  5, 15, 20, 20, 15,  5,-30,
    -30,  0, 15, 20, 20, 15,  0,-30,
    -30,  5, 10, 15, 15, 10,  5,-30,
    -40,-20,  0,  5,  5,  0,-20,-40,
    -50,-40,-30,-30,-30,-30,-40,-50,
];

/// Bishop PST — encourages long diagonals and avoids corners.
#[rustfmt::skip]
const BISHOP_PST: [i32; 64] = [
    -20,-10,-10,-10,-10,-10,-10,-20,
    -10,  0,  0,  0,  0,  0,  0,-10,
    -10,  0,  5, 10, 10,  5,  0,-10,
    -10,  5,  5, 10, 10,  5,  5,-10,
    -10,  0, 10, 10, 10, 10,  0,-10,
    -10, 10, 10, 10, 10, 10, 10,-10,
    -10,  5,  0,  0,  0,  0,  5,-10,
    -20,-10,-10,-10,-10,-10,-10,-20,
];

/// Rook PST — encourages the 7th rank and the castled files.
#[rustfmt::skip]
const ROOK_PST: [i32; 64] = [
     0,  0,  0,  0,  0,  0,  0,  0,
     5, 10, 10, 10, 10, 10, 10,  5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
     0,  0,  0,  5,  5,  0,  0,  0,
];

/// Queen PST — minor centralization bonus.
#[rustfmt::skip]
const QUEEN_PST: [i32; 64] = [
    -20,-10,-10, -5, -5,-10,-10,-20,
    -10,  0,  0,  0,  0,  0,  0,-10,
    -10,  0,  5,  5,  5,  5,  0,-10,
     -5,  0,  5,  5,  5,  5,  0, -5,
      0,  0,  5,  5,  5,  5,  0, -5,
    -10,  5,  5,  5,  5,  5,  0,-10,
    -10,  0,  5,  0,  0,  0,  0,-10,
    -20,-10,-10, -5, -5,-10,-10,-20,
];

/// King PST — rewards the castled corners, penalizes the center.
#[rustfmt::skip]
const KING_PST: [i32; 64] = [
    -30,-40,-40,-50,-50,-40,-40,-30,
    -30,-40,-40,-50,-50,-40,-40,-30,
    -30,-40,-40,-50,-50,-40,-40,-30,
    -30,-40,-40,-50,-50,-40,-40,-30,
    -20,-30,-30,-40,-40,-30,-30,-20,
    -10,-20,-20,-20,-20,-20,-20,-10,
     20, 20,  0,  0,  0,  0, 20, 20,
     20, 30, 10,  0,  0, 10, 30, 20,
];

const PST: [[i32; 64]; PieceKind::COUNT] = [
    PAWN_PST,
    KNIGHT_PST,
    BISHOP_PST,
    ROOK_PST,
    QUEEN_PST,
    KING_PST,
];

/// Piece-square bonus for a piece of `kind` standing on `sq`, from the
/// perspective of `side` (Black reads the table mirrored vertically).
#[inline]
pub fn pst_bonus(kind: PieceKind, sq: Coord, side: Color) -> i32 {
    let index = match side {
        Color::White => sq.index(),
        Color::Black => ((7 - sq.row) * 8 + sq.col) as usize,
    };
    PST[kind.index()][index]
}

// =========================================================================
// Evaluation
// =========================================================================

/// Evaluate a position from White's perspective.
pub fn evaluate(board: &Board) -> i32 {
    W_POSITION * position_score(board)
        + W_MATERIAL * material_score(board)
        + W_CONTROL * control_score(board)
}

/// Sum of signed material values.
fn material_score(board: &Board) -> i32 {
    let mut score = 0;
    for index in 0..Coord::NUM {
        if let Some(piece) = board.piece_at(Coord::from_index(index)) {
            score += piece.signed_value();
        }
    }
    score
}

/// Sum, per piece, of its piece-square bonus times its signed value.
fn position_score(board: &Board) -> i32 {
    let mut score = 0;
    for index in 0..Coord::NUM {
        let sq = Coord::from_index(index);
        if let Some(piece) = board.piece_at(sq) {
            score += pst_bonus(piece.kind, sq, piece.side) * piece.signed_value();
        }
    }
    score
}

/// Sum, per piece, of the number of squares it attacks times its signed
/// value. Walks the Control Map target-side: every origin recorded on a
/// square contributes its signed value once per square it controls.
fn control_score(board: &Board) -> i32 {
    let mut score = 0;
    for index in 0..Coord::NUM {
        for origin in board.attackers(Coord::from_index(index)).iter() {
            let piece = board
                .piece_at(origin)
                .expect("control origin must be occupied");
            score += piece.signed_value();
        }
    }
    score
}

// =========================================================================
// Tests
// =========================================================================
