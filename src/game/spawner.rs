//! Random placement of food and power-ups on free cells.

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use super::effects::{PowerUp, PowerUpKind};
use super::state::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SpawnError {
    /// Every cell of the grid is taken
    #[error("no free cell available on the grid")]
    NoSpaceAvailable,
}

/// All grid cells not in `occupied`, in row-major order
pub fn free_cells(width: usize, height: usize, occupied: &HashSet<Position>) -> Vec<Position> {
    (0..height as i32)
        .flat_map(|y| (0..width as i32).map(move |x| Position::new(x, y)))
        .filter(|pos| !occupied.contains(pos))
        .collect()
}

pub struct Spawner {
    rng: StdRng,
    grid_width: usize,
    grid_height: usize,
}

impl Spawner {
    pub fn new(grid_width: usize, grid_height: usize) -> Self {
        Self::with_rng(StdRng::from_entropy(), grid_width, grid_height)
    }

    /// Deterministic spawner, for replays and tests
    pub fn with_seed(seed: u64, grid_width: usize, grid_height: usize) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed), grid_width, grid_height)
    }

    fn with_rng(rng: StdRng, grid_width: usize, grid_height: usize) -> Self {
        Self {
            rng,
            grid_width,
            grid_height,
        }
    }

    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// Pick a uniformly random free cell
    pub fn spawn_food(&mut self, occupied: &HashSet<Position>) -> Result<Position, SpawnError> {
        let free = free_cells(self.grid_width, self.grid_height, occupied);
        free.choose(&mut self.rng)
            .copied()
            .ok_or(SpawnError::NoSpaceAvailable)
    }

    /// Roll for a new power-up. Nothing spawns while `current` is on the board.
    pub fn maybe_spawn_power_up(
        &mut self,
        occupied: &HashSet<Position>,
        current: Option<&PowerUp>,
        chance: f64,
        lifetime: u32,
    ) -> Option<PowerUp> {
        if current.is_some() || lifetime == 0 {
            return None;
        }
        if !self.rng.gen_bool(chance.clamp(0.0, 1.0)) {
            return None;
        }

        let kind = PowerUpKind::ALL[self.rng.gen_range(0..PowerUpKind::ALL.len())];
        match self.spawn_food(occupied) {
            Ok(cell) => Some(PowerUp::new(cell, kind, lifetime)),
            Err(_) => None,
        }
    }
}
