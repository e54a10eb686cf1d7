pub mod board;
pub mod control;
pub mod game;
pub mod movegen;
pub mod types;

pub use board::{Board, UndoInfo, STALEMATE_PLY_CAP};
pub use control::ControlMap;
pub use game::Game;
pub use movegen::legal_moves;
pub use types::*;
