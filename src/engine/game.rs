//! Game facade — the surface exposed to the collaborators that stay outside
//! the core (input loops, rendering, mode selection).
//!
//! Splits move validation into a syntactic check (`well_formed`) and a
//! semantic one (`is_legal`) so a caller can re-prompt on bad input without
//! consulting the move generator, commits human and bot moves permanently,
//! and answers the read-only status queries that drive game-loop narration.

use chrono::{DateTime, Utc};
use rand::Rng;
use tracing::debug;
use uuid::Uuid;

use crate::ai::engine::Bot;
use crate::ai::evaluation;
use crate::engine::board::{Board, STALEMATE_PLY_CAP};
use crate::engine::movegen;
use crate::engine::types::{ChessError, Color, GameStatus, Move, PieceKind};

/// Promotion kinds a pawn may become.
const PROMOTION_KINDS: [PieceKind; 4] = [
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Rook,
    PieceKind::Queen,
];

// =========================================================================
// Game
// =========================================================================

/// A running game: the board plus caller-facing identity metadata.
#[derive(Clone, Debug)]
pub struct Game {
    board: Board,
    pub id: String,
    pub created_at: DateTime<Utc>,
}

impl Game {
    // -----------------------------------------------------------------
    // Constructors
    // -----------------------------------------------------------------

    /// Start a game from the standard starting position.
    pub fn new() -> Self {
        Self::from_board(Board::new())
    }

    /// Start a game from an already-set-up board.
    pub fn from_board(board: Board) -> Self {
        Game {
            board,
            id: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
        }
    }

    // -----------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------

    /// Current board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Committed half-move count.
    pub fn ply(&self) -> u32 {
        self.board.ply()
    }

    /// All legal moves for the given side right now.
    pub fn legal_moves(&mut self, side: Color) -> Vec<Move> {
        movegen::legal_moves(&mut self.board, side)
    }

    // -----------------------------------------------------------------
    // Move validation
    // -----------------------------------------------------------------

    /// Syntactic check on raw caller input: both coordinates on the board
    /// and distinct. No board state is consulted.
    pub fn well_formed(from: (i32, i32), to: (i32, i32)) -> bool {
        let in_bounds = |(row, col): (i32, i32)| (0..8).contains(&row) && (0..8).contains(&col);
        in_bounds(from) && in_bounds(to) && from != to
    }

    /// Semantic check: the candidate is in the current legal-move set of
    /// the side owning the piece on its from-square.
    pub fn is_legal(&mut self, mv: Move) -> bool {
        match self.board.piece_at(mv.from) {
            Some(piece) => self.legal_moves(piece.side).contains(&mv),
            None => false,
        }
    }

    // -----------------------------------------------------------------
    // Committing moves
    // -----------------------------------------------------------------

    /// Apply a human-originated move permanently. `promotion` is consulted
    /// only when the move carries a pawn to its far rank, and must then be
    /// one of knight, bishop, rook, or queen.
    pub fn commit_move(
        &mut self,
        mv: Move,
        promotion: Option<PieceKind>,
    ) -> Result<(), ChessError> {
        if !self.is_legal(mv) {
            return Err(ChessError::IllegalMove {
                from: mv.from.to_string(),
                to: mv.to.to_string(),
            });
        }

        let piece = self.board.piece_at(mv.from).expect("legal move origin");
        let promoting =
            piece.kind == PieceKind::Pawn && mv.to.row == piece.side.promotion_row();
        let landing = if promoting {
            match promotion {
                Some(kind) if PROMOTION_KINDS.contains(&kind) => kind,
                Some(kind) => return Err(ChessError::InvalidPromotion(kind.to_string())),
                None => {
                    return Err(ChessError::InvalidPromotion(
                        "a promotion choice is required".to_string(),
                    ));
                }
            }
        } else {
            PieceKind::Queen // unused
        };

        self.board.commit(mv, landing);
        debug!(%mv, ply = self.board.ply(), "move committed");
        Ok(())
    }

    /// Run the search for `side` at the given depth and commit the result,
    /// auto-promoting pawns to queens. The tie-break RNG is injected so
    /// callers can fix a seed.
    pub fn compute_and_commit_bot_move<R: Rng>(
        &mut self,
        side: Color,
        depth: u32,
        rng: &mut R,
    ) -> Result<Move, ChessError> {
        let bot = Bot::new(depth);
        let ply = self.board.ply();
        let (mv, stats) = bot
            .choose_move(&mut self.board, side, ply, rng)
            .ok_or_else(|| ChessError::GameOver("no legal moves".to_string()))?;

        self.board.commit(mv, PieceKind::Queen);
        debug!(
            %mv,
            score = stats.score,
            nodes = stats.nodes,
            ply = self.board.ply(),
            "bot move committed"
        );
        Ok(mv)
    }

    // -----------------------------------------------------------------
    // Status queries
    // -----------------------------------------------------------------

    /// Is the side's king currently attacked?
    pub fn is_check(&self, side: Color) -> bool {
        self.board.is_check(side)
    }

    /// Check with no legal reply.
    pub fn is_checkmate(&mut self, side: Color) -> bool {
        self.board.is_check(side) && self.legal_moves(side).is_empty()
    }

    /// Half-move cap reached, or no legal reply while not in check.
    pub fn is_stalemate(&mut self, side: Color) -> bool {
        self.board.ply() >= STALEMATE_PLY_CAP
            || (!self.board.is_check(side) && self.legal_moves(side).is_empty())
    }

    /// Combined status for narration. Stalemate is checked after checkmate,
    /// so the two can never both be reported for one position.
    pub fn status(&mut self, side: Color) -> GameStatus {
        let in_check = self.board.is_check(side);
        let no_moves = self.legal_moves(side).is_empty();
        if in_check && no_moves {
            GameStatus::Checkmate
        } else if self.board.ply() >= STALEMATE_PLY_CAP || no_moves {
            GameStatus::Stalemate
        } else if in_check {
            GameStatus::Check
        } else {
            GameStatus::Active
        }
    }

    /// Static evaluation of the current position (positive favors White).
    pub fn evaluate(&self) -> i32 {
        evaluation::evaluate(&self.board)
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

// =========================================================================
// Tests
// =========================================================================
