//! Search — minimax with alpha-beta pruning over repeated apply/undo of one
//! shared board.
//!
//! White maximizes and Black minimizes the evaluation. Each node memoizes
//! child scores in a transposition table keyed by exact board content; the
//! table lives for a single top-level search, because cached scores are
//! relative to the remaining depth at which they were computed.
//!
//! At the root every move is scored with a fresh full-width window so the
//! scores stay exact, and the winner is drawn uniformly at random from the
//! extremal-score set with the caller's RNG.

use std::collections::HashMap;
use std::time::Instant;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::config::EngineConfig;
use crate::engine::board::{Board, STALEMATE_PLY_CAP};
use crate::engine::movegen::legal_moves;
use crate::engine::types::{Color, Coord, Move, PieceKind};

use super::evaluation::{evaluate, pst_bonus, INF, MATE};

/// Default transposition-table capacity, in entries.
pub const DEFAULT_CACHE_CAPACITY: usize = 1 << 20;

// =========================================================================
// PositionKey
// =========================================================================

/// Canonical content key for the transposition table: one byte per square
/// packing kind, side, and moved-flag, plus the side to move.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct PositionKey([u8; 65]);

impl PositionKey {
    pub fn of(board: &Board, to_move: Color) -> Self {
        let mut bytes = [0u8; 65];
        for index in 0..Coord::NUM {
            if let Some(piece) = board.piece_at(Coord::from_index(index)) {
                bytes[index] = (piece.kind.index() as u8 + 1)
                    | ((piece.side.index() as u8) << 3)
                    | ((piece.moved as u8) << 4);
            }
        }
        bytes[64] = to_move.index() as u8;
        PositionKey(bytes)
    }
}

// =========================================================================
// TranspositionTable
// =========================================================================

/// Scores memoized by board content. Valid only within one top-level search
/// (scores are depth-relative); capacity-capped, with insertion simply
/// stopping once the table is full.
pub struct TranspositionTable {
    entries: HashMap<PositionKey, i32>,
    capacity: usize,
}

impl TranspositionTable {
    pub fn new(capacity: usize) -> Self {
        TranspositionTable {
            entries: HashMap::new(),
            capacity,
        }
    }

    #[inline]
    pub fn get(&self, key: &PositionKey) -> Option<i32> {
        self.entries.get(key).copied()
    }

    #[inline]
    pub fn insert(&mut self, key: PositionKey, score: i32) {
        if self.entries.len() < self.capacity {
            self.entries.insert(key, score);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// =========================================================================
// SearchStats
// =========================================================================

/// Summary of one completed search.
#[derive(Clone, Debug, Default)]
pub struct SearchStats {
    pub depth: u32,
    pub nodes: u64,
    pub cache_hits: u64,
    pub score: i32,
    pub time_ms: u64,
}

// =========================================================================
// Bot
// =========================================================================

/// The computer opponent: fixed-depth minimax with alpha-beta pruning.
pub struct Bot {
    depth: u32,
    cache_capacity: usize,
}

impl Bot {
    pub fn new(depth: u32) -> Self {
        Bot {
            depth,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Bot {
            depth: config.search_depth,
            cache_capacity: config.cache_capacity,
        }
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Pick the strongest move for `side`, breaking exact-score ties
    /// uniformly at random with the caller's RNG.
    ///
    /// Returns `None` when the position is terminal for `side` (no legal
    /// moves, or the half-move cap has been reached); the caller decides
    /// between mate and draw via the status queries.
    pub fn choose_move<R: Rng>(
        &self,
        board: &mut Board,
        side: Color,
        ply: u32,
        rng: &mut R,
    ) -> Option<(Move, SearchStats)> {
        let start = Instant::now();

        if ply >= STALEMATE_PLY_CAP {
            return None;
        }
        let mut moves = legal_moves(board, side);
        if moves.is_empty() {
            return None;
        }
        order_moves(board, &mut moves);

        let mut cache = TranspositionTable::new(self.cache_capacity);
        let mut stats = SearchStats {
            depth: self.depth,
            ..SearchStats::default()
        };

        // Score every root move with a fresh full-width window: exact
        // scores make the tie set below meaningful.
        let mut scored = Vec::with_capacity(moves.len());
        for mv in moves {
            let undo = board.apply(mv, PieceKind::Queen);
            let score = minimax(
                board,
                !side,
                self.depth.saturating_sub(1),
                ply + 1,
                -INF,
                INF,
                &mut cache,
                &mut stats,
            );
            board.undo(mv, undo);
            scored.push((mv, score));
        }

        let best = match side {
            Color::White => scored.iter().map(|&(_, s)| s).max(),
            Color::Black => scored.iter().map(|&(_, s)| s).min(),
        }
        .expect("at least one scored move");

        let candidates: Vec<Move> = scored
            .iter()
            .filter(|&&(_, s)| s == best)
            .map(|&(m, _)| m)
            .collect();
        let chosen = *candidates.choose(rng).expect("tie set is never empty");

        stats.score = best;
        stats.time_ms = start.elapsed().as_millis() as u64;
        debug!(
            depth = self.depth,
            nodes = stats.nodes,
            cache_hits = stats.cache_hits,
            cached = cache.len(),
            score = best,
            elapsed_ms = stats.time_ms,
            chosen = %chosen,
            "search complete"
        );

        Some((chosen, stats))
    }
}

// =========================================================================
// Minimax with alpha-beta pruning
// =========================================================================

#[allow(clippy::too_many_arguments)]
fn minimax(
    board: &mut Board,
    side: Color,
    depth: u32,
    ply: u32,
    mut alpha: i32,
    mut beta: i32,
    cache: &mut TranspositionTable,
    stats: &mut SearchStats,
) -> i32 {
    stats.nodes += 1;

    // Terminal states come before the depth cutoff so a mate on the horizon
    // is still seen at depth 0.
    let mut moves = legal_moves(board, side);
    let in_check = board.is_check(side);

    if ply >= STALEMATE_PLY_CAP || (!in_check && moves.is_empty()) {
        return 0; // draw
    }
    if moves.is_empty() {
        // `side` is checkmated: score toward the winner, shallower mates
        // first.
        let magnitude = MATE * (depth as i32 + 1);
        return match side {
            Color::White => -magnitude,
            Color::Black => magnitude,
        };
    }
    if depth == 0 {
        return evaluate(board);
    }

    order_moves(board, &mut moves);

    let mut best = match side {
        Color::White => -INF,
        Color::Black => INF,
    };

    for mv in moves {
        let undo = board.apply(mv, PieceKind::Queen);
        let key = PositionKey::of(board, !side);
        let score = match cache.get(&key) {
            Some(hit) => {
                stats.cache_hits += 1;
                hit
            }
            None => {
                let s = minimax(board, !side, depth - 1, ply + 1, alpha, beta, cache, stats);
                cache.insert(key, s);
                s
            }
        };
        board.undo(mv, undo);

        match side {
            Color::White => {
                best = best.max(score);
                alpha = alpha.max(score);
            }
            Color::Black => {
                best = best.min(score);
                beta = beta.min(score);
            }
        }
        if alpha >= beta {
            break; // the rest of this branch cannot affect the parent
        }
    }

    best
}

// =========================================================================
// Move ordering
// =========================================================================

/// Sort moves so high-value pieces headed to strong squares come first,
/// maximizing the chance of early cutoffs.
fn order_moves(board: &Board, moves: &mut [Move]) {
    moves.sort_by_key(|mv| {
        let piece = board.piece_at(mv.from).expect("move from occupied square");
        std::cmp::Reverse(pst_bonus(piece.kind, mv.to, piece.side) * piece.value())
    });
}

// =========================================================================
// Tests
// =========================================================================
