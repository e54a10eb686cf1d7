//! Legal move generation.
//!
//! Pipeline:
//!   1. Enumerate candidates straight from the piece catalog (steppers:
//!      fixed offsets; sliders: directional walks stopped by occupancy;
//!      pawns: pushes, gated double push, capture diagonals).
//!   2. Filter each candidate with a trial move: apply, test whether the
//!      mover's own king is attacked on the repaired Control Map, undo.
//!
//! The trial filter handles pins, discovered checks, and double checks
//! without any special-casing. Castling skips the trial: its candidates are
//! gated directly on the Control Map (king's square, crossed square, and
//! landing square all free of enemy control) before being emitted.

use crate::engine::board::Board;
use crate::engine::types::{Color, Coord, Move, Piece, PieceKind};

// =========================================================================
// Public API
// =========================================================================

/// Generate all legal moves for the given side. Uses trial apply/undo on
/// the shared board; the board is bit-identical afterwards.
pub fn legal_moves(board: &mut Board, side: Color) -> Vec<Move> {
    let mut candidates = Vec::with_capacity(64);

    for row in 0..8u8 {
        for col in 0..8u8 {
            let from = Coord::new(row, col);
            let piece = match board.piece_at(from) {
                Some(p) if p.side == side => p,
                _ => continue,
            };
            match piece.kind {
                PieceKind::Pawn => pawn_candidates(board, from, piece, &mut candidates),
                PieceKind::Knight | PieceKind::King => {
                    stepper_candidates(board, from, piece.kind, side, &mut candidates)
                }
                PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen => {
                    slider_candidates(board, from, piece.kind, side, &mut candidates)
                }
            }
        }
    }

    let mut legal = Vec::with_capacity(candidates.len());
    for mv in candidates {
        if !leaves_king_exposed(board, side, mv) {
            legal.push(mv);
        }
    }
    castling_candidates(board, side, &mut legal);
    legal
}

// =========================================================================
// Candidate generation per movement pattern
// =========================================================================

fn pawn_candidates(board: &Board, from: Coord, piece: Piece, out: &mut Vec<Move>) {
    let dr = piece.side.pawn_dir();

    if let Some(one) = from.offset(dr, 0) {
        // Single push, and the double push while the pawn is unmoved and
        // both squares ahead are empty.
        if board.piece_at(one).is_none() {
            out.push(Move::new(from, one));
            if !piece.moved {
                if let Some(two) = from.offset(dr * 2, 0) {
                    if board.piece_at(two).is_none() {
                        out.push(Move::new(from, two));
                    }
                }
            }
        }
        // Diagonal steps are captures only.
        for dc in [-1i8, 1] {
            if let Some(diag) = from.offset(dr, dc) {
                if board.side_at(diag) == Some(!piece.side) {
                    out.push(Move::new(from, diag));
                }
            }
        }
    }
}

fn stepper_candidates(
    board: &Board,
    from: Coord,
    kind: PieceKind,
    side: Color,
    out: &mut Vec<Move>,
) {
    for &(dr, dc) in kind.step_offsets() {
        if let Some(to) = from.offset(dr, dc) {
            if board.side_at(to) != Some(side) {
                out.push(Move::new(from, to));
            }
        }
    }
}

fn slider_candidates(
    board: &Board,
    from: Coord,
    kind: PieceKind,
    side: Color,
    out: &mut Vec<Move>,
) {
    for &(dr, dc) in kind.slide_dirs() {
        let mut cursor = from;
        while let Some(to) = cursor.offset(dr, dc) {
            match board.side_at(to) {
                None => out.push(Move::new(from, to)),
                Some(other) if other != side => {
                    out.push(Move::new(from, to)); // capture, then stop
                    break;
                }
                Some(_) => break, // own piece blocks
            }
            cursor = to;
        }
    }
}

// =========================================================================
// Check-safety trial
// =========================================================================

/// Would this move leave (or put) the mover's own king in check? Applies
/// the move, reads the repaired Control Map, and undoes it again.
fn leaves_king_exposed(board: &mut Board, side: Color, mv: Move) -> bool {
    let undo = board.apply(mv, PieceKind::Queen);
    let exposed = board.is_check(side);
    board.undo(mv, undo);
    exposed
}

// =========================================================================
// Castling
// =========================================================================

fn castling_candidates(board: &Board, side: Color, out: &mut Vec<Move>) {
    let row = side.home_row();
    let king_sq = Coord::new(row, 4);
    let king = match board.piece_at(king_sq) {
        Some(p) => p,
        None => return,
    };
    if king.kind != PieceKind::King || king.side != side || king.moved {
        return;
    }
    let them = !side;
    // A king under attack may not castle at all.
    if board.is_attacked(king_sq, them) {
        return;
    }

    // Short: rook on the h-file, f and g empty, f and g unattacked.
    if rook_ready(board, side, Coord::new(row, 7))
        && board.piece_at(Coord::new(row, 5)).is_none()
        && board.piece_at(Coord::new(row, 6)).is_none()
        && !board.is_attacked(Coord::new(row, 5), them)
        && !board.is_attacked(Coord::new(row, 6), them)
    {
        out.push(Move::new(king_sq, Coord::new(row, 6)));
    }

    // Long: rook on the a-file, b, c and d empty, c and d unattacked.
    if rook_ready(board, side, Coord::new(row, 0))
        && board.piece_at(Coord::new(row, 1)).is_none()
        && board.piece_at(Coord::new(row, 2)).is_none()
        && board.piece_at(Coord::new(row, 3)).is_none()
        && !board.is_attacked(Coord::new(row, 2), them)
        && !board.is_attacked(Coord::new(row, 3), them)
    {
        out.push(Move::new(king_sq, Coord::new(row, 2)));
    }
}

fn rook_ready(board: &Board, side: Color, sq: Coord) -> bool {
    matches!(
        board.piece_at(sq),
        Some(p) if p.kind == PieceKind::Rook && p.side == side && !p.moved
    )
}

// =========================================================================
// Tests
// =========================================================================
