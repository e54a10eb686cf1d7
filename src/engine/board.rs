//! Board — the single mutable game-state container.
//!
//! Owns the 8×8 grid of optional pieces, each side's king location, and the
//! ply counter, and derives two read models from occupancy: the Position Map
//! (which side, if any, occupies each square, kept as one `Bitboard` per
//! side) and the Control Map (which origins attack each square).
//!
//! Mutation happens through `apply`/`undo` pairs. `apply` returns an
//! `UndoInfo` snapshot; `undo` must be called with that exact snapshot,
//! strictly LIFO, and restores occupancy, moved-flags, king locations, and
//! both derived maps bit-for-bit. `commit` is the permanent variant that
//! also bumps the ply counter.

use crate::engine::control::{ControlMap, Grid};
use crate::engine::types::{Bitboard, Color, Coord, Move, Piece, PieceKind};

/// Half-move cap modeling the 50-move rule: at 100 committed half-moves the
/// game is scored as drawn.
pub const STALEMATE_PLY_CAP: u32 = 100;

// ---------------------------------------------------------------------------
// UndoInfo — saved state for reversing a move
// ---------------------------------------------------------------------------

/// Snapshot captured by `apply` so `undo` can restore the exact pre-move
/// state. No other use is supported.
#[derive(Clone, Copy, Debug)]
pub struct UndoInfo {
    /// The piece that left the from-square, with its pre-move moved-flag.
    pub piece: Piece,
    /// Pre-move occupant of the to-square.
    pub captured: Option<Piece>,
    /// The maps were fully rebuilt (castling or promotion); undo rebuilds
    /// them too instead of reverting incrementally.
    rebuilt: bool,
}

// ---------------------------------------------------------------------------
// Board
// ---------------------------------------------------------------------------

/// A complete game position plus its derived maps.
#[derive(Clone, Debug, PartialEq)]
pub struct Board {
    squares: Grid,
    /// King location per side, always in sync with `squares`.
    king_pos: [Coord; 2],
    /// Position Map: occupancy per side.
    occupancy: [Bitboard; 2],
    /// Control Map, kept current with every mutation.
    control: ControlMap,
    /// Committed half-moves; trial moves never touch this.
    ply: u32,
}

impl Board {
    // -----------------------------------------------------------------------
    // Construction
    // -----------------------------------------------------------------------

    /// Standard starting position.
    pub fn new() -> Self {
        const BACK_RANK: [PieceKind; 8] = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];

        let mut squares: Grid = [[None; 8]; 8];
        for col in 0..8 {
            squares[1][col] = Some(Piece::new(PieceKind::Pawn, Color::Black));
            squares[6][col] = Some(Piece::new(PieceKind::Pawn, Color::White));
        }
        for (col, &kind) in BACK_RANK.iter().enumerate() {
            squares[0][col] = Some(Piece::new(kind, Color::Black));
            squares[7][col] = Some(Piece::new(kind, Color::White));
        }

        Self::from_grid(squares)
    }

    /// Build a board from an explicit piece list. The setup must include
    /// exactly one king per side.
    pub fn from_setup(pieces: &[(Coord, Piece)]) -> Self {
        let mut squares: Grid = [[None; 8]; 8];
        for &(sq, piece) in pieces {
            squares[sq.row as usize][sq.col as usize] = Some(piece);
        }
        Self::from_grid(squares)
    }

    fn from_grid(squares: Grid) -> Self {
        let mut board = Board {
            squares,
            king_pos: [Coord::new(7, 4), Coord::new(0, 4)],
            occupancy: [Bitboard::EMPTY; 2],
            control: ControlMap::empty(),
            ply: 0,
        };
        board.rebuild_maps();
        board
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// What piece (if any) is on a given square?
    #[inline]
    pub fn piece_at(&self, sq: Coord) -> Option<Piece> {
        self.squares[sq.row as usize][sq.col as usize]
    }

    /// Position Map read: which side occupies `sq`, if any.
    #[inline]
    pub fn side_at(&self, sq: Coord) -> Option<Color> {
        if self.occupancy[Color::White.index()].is_set(sq) {
            Some(Color::White)
        } else if self.occupancy[Color::Black.index()].is_set(sq) {
            Some(Color::Black)
        } else {
            None
        }
    }

    /// The king square for the given side.
    #[inline]
    pub fn king(&self, side: Color) -> Coord {
        self.king_pos[side.index()]
    }

    /// Occupancy bitboard for one side.
    #[inline]
    pub fn occupancy(&self, side: Color) -> Bitboard {
        self.occupancy[side.index()]
    }

    /// Origins currently attacking `sq` (both sides).
    #[inline]
    pub fn attackers(&self, sq: Coord) -> Bitboard {
        self.control.attackers(sq)
    }

    /// The full Control Map (read-only).
    pub fn control(&self) -> &ControlMap {
        &self.control
    }

    /// The raw occupancy grid (read-only).
    pub fn grid(&self) -> &Grid {
        &self.squares
    }

    /// Committed half-move count.
    #[inline]
    pub fn ply(&self) -> u32 {
        self.ply
    }

    /// Is `sq` controlled by any piece of side `by`?
    #[inline]
    pub fn is_attacked(&self, sq: Coord, by: Color) -> bool {
        (self.control.attackers(sq) & self.occupancy[by.index()]).is_not_empty()
    }

    /// Is the given side's king currently attacked?
    #[inline]
    pub fn is_check(&self, side: Color) -> bool {
        self.is_attacked(self.king(side), !side)
    }

    // -----------------------------------------------------------------------
    // Map maintenance
    // -----------------------------------------------------------------------

    /// Re-derive both maps and the king locations from the grid.
    pub fn rebuild_maps(&mut self) {
        self.control = ControlMap::compute(&self.squares);
        self.occupancy = [Bitboard::EMPTY; 2];

        let mut kings: [Option<Coord>; 2] = [None, None];
        for row in 0..8u8 {
            for col in 0..8u8 {
                let sq = Coord::new(row, col);
                if let Some(piece) = self.piece_at(sq) {
                    self.occupancy[piece.side.index()].set(sq);
                    if piece.kind == PieceKind::King {
                        kings[piece.side.index()] = Some(sq);
                    }
                }
            }
        }
        self.king_pos = [
            kings[0].expect("board must hold a white king"),
            kings[1].expect("board must hold a black king"),
        ];
    }

    // -----------------------------------------------------------------------
    // Apply / Undo
    // -----------------------------------------------------------------------

    /// Apply a move. The move must be legal (precondition, not re-validated
    /// here). `promotion` is consulted only when a pawn reaches its far
    /// rank; trial and bot moves pass `PieceKind::Queen`.
    ///
    /// Normal moves patch both maps incrementally; castling and promotion
    /// fall back to a full rebuild, recorded in the returned `UndoInfo`.
    pub fn apply(&mut self, mv: Move, promotion: PieceKind) -> UndoInfo {
        debug_assert!(mv.from != mv.to, "degenerate move");
        let piece = self
            .piece_at(mv.from)
            .expect("apply requires a piece on the from-square");
        let captured = self.piece_at(mv.to);

        // Castling: king shifting two files on its home rank. Relocates two
        // pieces, so the maps are rebuilt rather than patched.
        let castling = piece.kind == PieceKind::King
            && (mv.from.col as i8 - mv.to.col as i8).abs() == 2;
        if castling {
            let row = mv.from.row as usize;
            let (rook_home, rook_landing) = if mv.to.col == 6 { (7, 5) } else { (0, 3) };
            let mut king = self.squares[row][mv.from.col as usize]
                .take()
                .expect("castling king");
            let mut rook = self.squares[row][rook_home]
                .take()
                .expect("castling rook on its home square");
            king.moved = true;
            rook.moved = true;
            self.squares[row][mv.to.col as usize] = Some(king);
            self.squares[row][rook_landing] = Some(rook);
            self.rebuild_maps();
            return UndoInfo {
                piece,
                captured: None,
                rebuilt: true,
            };
        }

        // Promotion: the pawn is replaced wholesale, so rebuild as well.
        let promoting =
            piece.kind == PieceKind::Pawn && mv.to.row == piece.side.promotion_row();
        if promoting {
            debug_assert!(
                !matches!(promotion, PieceKind::Pawn | PieceKind::King),
                "promotion to {promotion} is not allowed"
            );
            self.squares[mv.from.row as usize][mv.from.col as usize] = None;
            self.squares[mv.to.row as usize][mv.to.col as usize] = Some(Piece {
                kind: promotion,
                side: piece.side,
                moved: true,
            });
            self.rebuild_maps();
            return UndoInfo {
                piece,
                captured,
                rebuilt: true,
            };
        }

        // Normal move: incremental map repair.
        //
        // 1. Strip the captured piece's control, then the mover's, vacating
        //    each square as its control comes off.
        if captured.is_some() {
            self.control.cast(&self.squares, mv.to, false);
        }
        self.squares[mv.to.row as usize][mv.to.col as usize] = None;
        self.control.cast(&self.squares, mv.from, false);
        self.squares[mv.from.row as usize][mv.from.col as usize] = None;

        // 2. Strip every slider whose line of sight touches the vacated or
        //    destination square. Steppers are blind to occupancy elsewhere
        //    and keep their entries.
        let affected = self.affected_sliders(mv);
        for origin in affected.iter() {
            self.control.cast(&self.squares, origin, false);
        }

        // 3. Land the mover and re-cast it against the new occupancy.
        let mut landed = piece;
        if piece.kind.tracks_moved() {
            landed.moved = true;
        }
        self.squares[mv.to.row as usize][mv.to.col as usize] = Some(landed);
        self.control.cast(&self.squares, mv.to, true);

        // 4. Re-cast the affected sliders against the new occupancy.
        for origin in affected.iter() {
            self.control.cast(&self.squares, origin, true);
        }

        // Position Map patch.
        let side = piece.side;
        self.occupancy[side.index()].clear(mv.from);
        self.occupancy[side.index()].set(mv.to);
        if let Some(taken) = captured {
            self.occupancy[taken.side.index()].clear(mv.to);
        }

        if piece.kind == PieceKind::King {
            self.king_pos[side.index()] = mv.to;
        }

        UndoInfo {
            piece,
            captured,
            rebuilt: false,
        }
    }

    /// Exactly reverse a prior `apply`. Must be called with the snapshot
    /// from that apply, most recent first.
    pub fn undo(&mut self, mv: Move, info: UndoInfo) {
        if info.rebuilt {
            let castled = info.piece.kind == PieceKind::King
                && (mv.from.col as i8 - mv.to.col as i8).abs() == 2;
            if castled {
                let row = mv.from.row as usize;
                let (rook_home, rook_landing) = if mv.to.col == 6 { (7, 5) } else { (0, 3) };
                let mut king = self.squares[row][mv.to.col as usize]
                    .take()
                    .expect("castled king");
                let mut rook = self.squares[row][rook_landing]
                    .take()
                    .expect("castled rook");
                king.moved = false;
                rook.moved = false;
                self.squares[row][mv.from.col as usize] = Some(king);
                self.squares[row][rook_home] = Some(rook);
            } else {
                self.squares[mv.from.row as usize][mv.from.col as usize] = Some(info.piece);
                self.squares[mv.to.row as usize][mv.to.col as usize] = info.captured;
            }
            self.rebuild_maps();
            return;
        }

        // Mirror of the incremental apply.
        //
        // 1. Strip the mover's control at its landing square and vacate it.
        self.control.cast(&self.squares, mv.to, false);
        self.squares[mv.to.row as usize][mv.to.col as usize] = None;

        // 2. Strip the affected sliders.
        let affected = self.affected_sliders(mv);
        for origin in affected.iter() {
            self.control.cast(&self.squares, origin, false);
        }

        // 3. Restore both occupants with their pre-move state.
        self.squares[mv.from.row as usize][mv.from.col as usize] = Some(info.piece);
        self.squares[mv.to.row as usize][mv.to.col as usize] = info.captured;

        // 4. Re-cast the mover, the restored capture, and the sliders.
        self.control.cast(&self.squares, mv.from, true);
        if info.captured.is_some() {
            self.control.cast(&self.squares, mv.to, true);
        }
        for origin in affected.iter() {
            self.control.cast(&self.squares, origin, true);
        }

        // Position Map patch.
        let side = info.piece.side;
        self.occupancy[side.index()].set(mv.from);
        self.occupancy[side.index()].clear(mv.to);
        if let Some(taken) = info.captured {
            self.occupancy[taken.side.index()].set(mv.to);
        }

        if info.piece.kind == PieceKind::King {
            self.king_pos[side.index()] = mv.from;
        }
    }

    /// Apply a move permanently and advance the ply counter.
    pub fn commit(&mut self, mv: Move, promotion: PieceKind) {
        self.apply(mv, promotion);
        self.ply += 1;
    }

    /// Sliders whose recorded control touches either endpoint of `mv`.
    /// Call with both endpoint squares vacated and the map still holding
    /// everyone else's entries.
    fn affected_sliders(&self, mv: Move) -> Bitboard {
        let touching = self.control.attackers(mv.from) | self.control.attackers(mv.to);
        let mut sliders = Bitboard::EMPTY;
        for origin in touching.iter() {
            let piece = self
                .piece_at(origin)
                .expect("control origin must be occupied");
            if piece.kind.is_slider() {
                sliders.set(origin);
            }
        }
        sliders
    }

    // -----------------------------------------------------------------------
    // Display
    // -----------------------------------------------------------------------

    /// Render the board as an 8-line string (rank 8 at top), for caller-side
    /// narration and debugging.
    pub fn render(&self) -> String {
        let mut s = String::with_capacity(200);
        for row in 0..8u8 {
            s.push((b'8' - row) as char);
            s.push(' ');
            for col in 0..8u8 {
                let ch = match self.piece_at(Coord::new(row, col)) {
                    Some(piece) => piece.to_char(),
                    None => '.',
                };
                s.push(ch);
                if col < 7 {
                    s.push(' ');
                }
            }
            s.push('\n');
        }
        s.push_str("  a b c d e f g h");
        s
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.render())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
