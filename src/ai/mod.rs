pub mod engine;
pub mod evaluation;

pub use engine::{Bot, PositionKey, SearchStats, TranspositionTable};
pub use evaluation::{evaluate, is_mate_score, INF, MATE};
