use std::collections::HashMap;

use super::{GameMode, ScoreStore};

/// Store that lives only as long as the process
#[derive(Debug, Clone, Default)]
pub struct MemoryScoreStore {
    scores: HashMap<GameMode, u32>,
}

impl MemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScoreStore for MemoryScoreStore {
    fn load(&self, mode: GameMode) -> u32 {
        self.scores.get(&mode).copied().unwrap_or(0)
    }

    fn save(&mut self, mode: GameMode, value: u32) -> bool {
        if value <= self.load(mode) {
            return false;
        }
        self.scores.insert(mode, value);
        true
    }
}
