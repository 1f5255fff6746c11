use std::collections::HashSet;

use super::action::Direction;
use super::effects::{ActiveEffects, PowerUp};

/// A position on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }

    /// Fold an off-grid position back onto a `width` x `height` torus
    pub fn wrapped(&self, width: usize, height: usize) -> Self {
        Self {
            x: self.x.rem_euclid(width as i32),
            y: self.y.rem_euclid(height as i32),
        }
    }
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at index 0
    pub body: Vec<Position>,
    /// Current direction of movement
    pub direction: Direction,
}

impl Snake {
    /// Create a new snake with given starting position and direction
    pub fn new(head: Position, direction: Direction, length: usize) -> Self {
        let mut body = vec![head];

        // Add initial body segments behind the head
        let (dx, dy) = direction.delta();
        let (back_dx, back_dy) = (-dx, -dy);

        for i in 1..length {
            let prev = body[i - 1];
            body.push(prev.moved_by(back_dx, back_dy));
        }

        Self { body, direction }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Get the tail position (last segment)
    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    /// Whether moving the head onto `pos` would bite the body.
    ///
    /// A non-growing move vacates the tail in the same tick, so the tail cell
    /// only counts when the snake is about to grow.
    pub fn would_bite(&self, pos: Position, growing: bool) -> bool {
        let end = if growing {
            self.body.len()
        } else {
            self.body.len() - 1
        };
        self.body[..end].contains(&pos)
    }

    /// Put the head on `new_head`, dropping the tail unless growing
    pub fn advance_to(&mut self, new_head: Position, grow: bool) {
        self.body.insert(0, new_head);

        if !grow {
            self.body.pop();
        }
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Never true for a snake built with [`Snake::new`]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Type of collision that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    /// Snake left the grid
    Wall,
    /// Snake hit an obstacle cell
    Obstacle,
    /// Snake hit itself
    SelfCollision,
}

/// Everything belonging to one run, from start to game over
#[derive(Debug, Clone, PartialEq)]
pub struct GameSession {
    pub snake: Snake,
    /// `None` only while the board has no free cell left
    pub food: Option<Position>,
    pub power_up: Option<PowerUp>,
    pub obstacles: HashSet<Position>,
    pub effects: ActiveEffects,
    pub obstacle_mode: bool,
    pub grid_width: usize,
    pub grid_height: usize,
    pub score: u32,
    pub steps: u32,
    pub is_alive: bool,
}

impl GameSession {
    /// Create a new session without obstacles
    pub fn new(snake: Snake, food: Position, grid_width: usize, grid_height: usize) -> Self {
        Self {
            snake,
            food: Some(food),
            power_up: None,
            obstacles: HashSet::new(),
            effects: ActiveEffects::new(),
            obstacle_mode: false,
            grid_width,
            grid_height,
            score: 0,
            steps: 0,
            is_alive: true,
        }
    }

    /// Check if a position is within the grid bounds
    pub fn is_in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0
            && pos.x < self.grid_width as i32
            && pos.y >= 0
            && pos.y < self.grid_height as i32
    }

    /// Check if a position is occupied by the snake
    pub fn is_occupied_by_snake(&self, pos: Position) -> bool {
        self.snake.body.contains(&pos)
    }

    pub fn is_obstacle(&self, pos: Position) -> bool {
        self.obstacles.contains(&pos)
    }

    /// Cells a new item must not be placed on
    pub fn occupied(&self) -> HashSet<Position> {
        let mut occupied: HashSet<Position> = self.snake.body.iter().copied().collect();
        occupied.extend(self.obstacles.iter().copied());
        occupied.extend(self.food);
        occupied.extend(self.power_up.map(|p| p.cell));
        occupied
    }
}
