//! chessmate — a two-player chess rules engine with a search-based opponent.
//!
//! The `engine` module owns all game state: the board grid with its derived
//! Position and Control Maps, reversible apply/undo mutation (castling and
//! promotion included), legal move generation with a check-safety trial
//! filter, and the `Game` facade callers drive a game loop with. The `ai`
//! module layers static evaluation and a fixed-depth alpha-beta minimax
//! search with transposition memoization on top.
//!
//! ```no_run
//! use chessmate::{Color, Game};
//!
//! let mut game = Game::new();
//! let mut rng = rand::thread_rng();
//! let mv = game
//!     .compute_and_commit_bot_move(Color::White, 3, &mut rng)
//!     .expect("the opening position is not terminal");
//! println!("bot played {mv}\n{}", game.board());
//! ```

pub mod ai;
pub mod config;
pub mod engine;

pub use ai::engine::{Bot, SearchStats};
pub use ai::evaluation::evaluate;
pub use config::EngineConfig;
pub use engine::board::{Board, STALEMATE_PLY_CAP};
pub use engine::game::Game;
pub use engine::types::{ChessError, Color, Coord, GameStatus, Move, Piece, PieceKind};
