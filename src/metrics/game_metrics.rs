use std::time::{Duration, Instant};

use crate::game::GameEvent;

/// Counters for the current process, shown in the HUD
pub struct GameMetrics {
    pub start_time: Instant,
    pub elapsed_time: Duration,
    pub runs_played: u32,
    pub food_eaten: u32,
    pub power_ups_collected: u32,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            elapsed_time: Duration::ZERO,
            runs_played: 0,
            food_eaten: 0,
            power_ups_collected: 0,
        }
    }

    pub fn update(&mut self) {
        self.elapsed_time = self.start_time.elapsed();
    }

    pub fn on_run_start(&mut self) {
        self.start_time = Instant::now();
        self.elapsed_time = Duration::ZERO;
    }

    pub fn on_event(&mut self, event: &GameEvent) {
        match event {
            GameEvent::FoodEaten { .. } => self.food_eaten += 1,
            GameEvent::PowerUpCollected { .. } => self.power_ups_collected += 1,
            GameEvent::GameOver { .. } => self.runs_played += 1,
            GameEvent::Collision { .. } => {}
        }
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        format!("{:02}:{:02}", minutes, seconds)
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}
