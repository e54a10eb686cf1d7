//! Control Map — for every square, the set of origin squares whose piece
//! currently attacks it, across both sides.
//!
//! A piece "controls" every square it could move to or capture on, including
//! squares occupied by either side. Slider rays stop at the first occupied
//! square (inclusive); pawn control is the two capture diagonals only.
//!
//! The map supports a full recompute (scan all 64 squares and cast each
//! piece's pattern) and single-piece casts used by `Board`'s incremental
//! repair. Both maintenance paths must produce identical maps for the same
//! occupancy.

use crate::engine::types::{Bitboard, Coord, Piece, PieceKind};

/// The board's occupancy grid, row-major with row 0 at Black's home rank.
pub type Grid = [[Option<Piece>; 8]; 8];

/// Per-square origin sets: `attackers[sq]` holds the coordinates of every
/// piece currently attacking `sq`, encoded as bits by flat square index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ControlMap {
    attackers: [Bitboard; 64],
}

impl ControlMap {
    /// A map with no control recorded anywhere.
    pub fn empty() -> Self {
        ControlMap {
            attackers: [Bitboard::EMPTY; 64],
        }
    }

    /// Recompute the whole map from scratch for the given occupancy.
    pub fn compute(grid: &Grid) -> Self {
        let mut map = ControlMap::empty();
        for row in 0..8u8 {
            for col in 0..8u8 {
                let origin = Coord::new(row, col);
                if grid[row as usize][col as usize].is_some() {
                    map.cast(grid, origin, true);
                }
            }
        }
        map
    }

    /// Origins currently attacking `sq`.
    #[inline]
    pub fn attackers(&self, sq: Coord) -> Bitboard {
        self.attackers[sq.index()]
    }

    /// Add (or remove) the control cast by the piece standing on `origin`.
    ///
    /// Rays are walked against the occupancy in `grid` as it is right now;
    /// the caller is responsible for sequencing grid mutations so that a
    /// removal sees at least every square the original cast reached.
    pub fn cast(&mut self, grid: &Grid, origin: Coord, add: bool) {
        let piece = grid[origin.row as usize][origin.col as usize]
            .expect("cast requires a piece on the origin square");

        match piece.kind {
            PieceKind::Pawn => {
                let dr = piece.side.pawn_dir();
                for dc in [-1i8, 1] {
                    if let Some(target) = origin.offset(dr, dc) {
                        self.mark(origin, target, add);
                    }
                }
            }
            PieceKind::Knight | PieceKind::King => {
                for &(dr, dc) in piece.kind.step_offsets() {
                    if let Some(target) = origin.offset(dr, dc) {
                        self.mark(origin, target, add);
                    }
                }
            }
            PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen => {
                for &(dr, dc) in piece.kind.slide_dirs() {
                    let mut cursor = origin;
                    while let Some(target) = cursor.offset(dr, dc) {
                        self.mark(origin, target, add);
                        if grid[target.row as usize][target.col as usize].is_some() {
                            break; // ray stops at the first occupied square
                        }
                        cursor = target;
                    }
                }
            }
        }
    }

    #[inline]
    fn mark(&mut self, origin: Coord, target: Coord, add: bool) {
        if add {
            self.attackers[target.index()].set(origin);
        } else {
            self.attackers[target.index()].clear(origin);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
