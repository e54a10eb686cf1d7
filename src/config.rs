use crate::ai::engine::DEFAULT_CACHE_CAPACITY;

/// Engine configuration parsed from environment variables.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Bot search depth in plies of look-ahead.
    pub search_depth: u32,
    /// Transposition-table capacity per search, in entries.
    pub cache_capacity: usize,
}

impl EngineConfig {
    /// Load configuration from environment variables with defaults.
    pub fn from_env() -> Self {
        EngineConfig {
            search_depth: std::env::var("CHESS_BOT_DEPTH")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3),
            cache_capacity: std::env::var("CHESS_BOT_CACHE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_CACHE_CAPACITY),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            search_depth: 3,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}
