//! Best score per game mode, kept across sessions.
//!
//! The state machine only sees the [`ScoreStore`] trait, so the file-backed
//! store can be swapped for [`MemoryScoreStore`] in tests or when the data
//! directory is unusable.

pub mod json_store;
pub mod memory_store;

pub use json_store::{JsonScoreStore, ScoreStoreError, data_dir, default_scores_path};
pub use memory_store::MemoryScoreStore;

/// Game variant a high score belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameMode {
    Classic,
    Obstacle,
}

impl GameMode {
    pub const ALL: [GameMode; 2] = [GameMode::Classic, GameMode::Obstacle];

    pub fn from_obstacles(enabled: bool) -> Self {
        if enabled {
            GameMode::Obstacle
        } else {
            GameMode::Classic
        }
    }

    /// Key the score is stored under
    pub fn key(&self) -> &'static str {
        match self {
            GameMode::Classic => "classic",
            GameMode::Obstacle => "obstacles",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            GameMode::Classic => "Classic",
            GameMode::Obstacle => "Obstacle",
        }
    }
}

/// Persistence for one best score per mode
pub trait ScoreStore {
    /// Best score for `mode`, 0 when nothing was recorded
    fn load(&self, mode: GameMode) -> u32;

    /// Record `value` if it beats the stored best. Returns true when it did.
    fn save(&mut self, mode: GameMode, value: u32) -> bool;
}
