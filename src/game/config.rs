use anyhow::{Context, Result, bail, ensure};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// What happens to the running score when a player quits mid-run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuitPolicy {
    /// Abandon the run without touching the high scores
    #[default]
    Discard,
    /// Reconcile the score as if the run had ended normally
    Record,
}

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the game grid
    pub grid_width: usize,
    /// Height of the game grid
    pub grid_height: usize,
    /// Initial length of the snake
    pub initial_snake_length: usize,
    /// Milliseconds between moves without a speed boost
    pub base_tick_ms: u64,

    // Scoring
    /// Base points for one food item
    pub food_points: u32,
    /// Extra base points per food item in obstacle mode
    pub obstacle_bonus: u32,
    /// Points for picking up a power-up (scaled by the multiplier)
    pub power_up_bonus: u32,
    /// Factor applied while a score multiplier is active
    pub score_multiplier: u32,

    // Power-ups
    /// Chance per tick that a power-up appears when none is on the board
    pub power_up_spawn_chance: f64,
    /// Ticks an uncollected power-up stays on the board
    pub power_up_lifetime: u32,
    /// Ticks a collected effect stays active
    pub effect_duration: u32,

    /// Number of obstacle cells generated in obstacle mode
    pub obstacle_count: usize,
    /// Wrap around the grid edges instead of dying
    pub wrap_walls: bool,
    /// While invincible, wrap around the edges instead of dying
    pub invincible_wraps: bool,
    pub quit_policy: QuitPolicy,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 30,
            grid_height: 20,
            initial_snake_length: 3,
            base_tick_ms: 100,
            food_points: 1,
            obstacle_bonus: 2,
            power_up_bonus: 5,
            score_multiplier: 2,
            power_up_spawn_chance: 0.02,
            power_up_lifetime: 100,
            effect_duration: 50,
            obstacle_count: 20,
            wrap_walls: false,
            invincible_wraps: true,
            quit_policy: QuitPolicy::Discard,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10, 10)
    }

    /// Load a configuration from a JSON file; missing fields take defaults
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        let config: GameConfig = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config {:?}", path))?;
        Ok(config)
    }

    /// Movement interval when no speed boost is active
    pub fn base_tick(&self) -> Duration {
        Duration::from_millis(self.base_tick_ms)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.grid_width >= 5 && self.grid_height >= 5,
            "Grid must be at least 5x5, got {}x{}",
            self.grid_width,
            self.grid_height
        );
        ensure!(
            (1..=self.grid_width / 2).contains(&self.initial_snake_length),
            "Initial snake length must be between 1 and {}",
            self.grid_width / 2
        );
        ensure!(self.base_tick_ms > 0, "Tick interval must be positive");
        ensure!(
            (0.0..=1.0).contains(&self.power_up_spawn_chance),
            "Power-up spawn chance must be between 0.0 and 1.0"
        );
        ensure!(self.score_multiplier >= 1, "Score multiplier must be at least 1");

        // Leave room for the snake, a food item and a power-up
        let free = self.grid_width * self.grid_height - self.initial_snake_length - 2;
        if self.obstacle_count > free {
            bail!(
                "{} obstacles do not fit on a {}x{} grid",
                self.obstacle_count,
                self.grid_width,
                self.grid_height
            );
        }
        Ok(())
    }
}
