use std::collections::HashSet;

use log::info;
use rand::Rng;
use rand::seq::SliceRandom;

use super::spawner::free_cells;
use super::state::{Position, Snake};

/// Cells ahead of the starting head kept clear so a run never opens on a wall
const SAFE_LANE: i32 = 3;

/// Cells that must stay free of obstacles when a run starts
pub fn reserved_cells(snake: &Snake) -> HashSet<Position> {
    let mut reserved: HashSet<Position> = snake.body.iter().copied().collect();
    let mut ahead = snake.head();
    for _ in 0..SAFE_LANE {
        ahead = ahead.moved_in_direction(snake.direction);
        reserved.insert(ahead);
    }
    reserved
}

/// Scatter up to `count` obstacles over the grid, avoiding `reserved`.
///
/// Fewer cells are returned when the grid cannot hold `count` of them.
pub fn generate<R: Rng + ?Sized>(
    rng: &mut R,
    grid_width: usize,
    grid_height: usize,
    count: usize,
    reserved: &HashSet<Position>,
) -> HashSet<Position> {
    let candidates = free_cells(grid_width, grid_height, reserved);
    let obstacles: HashSet<Position> = candidates
        .choose_multiple(rng, count)
        .copied()
        .collect();

    info!("Generated {} obstacles", obstacles.len());
    obstacles
}
