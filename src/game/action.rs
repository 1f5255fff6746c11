/// Direction the snake can move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Returns true if turning from self to other would be a 180-degree turn
    pub fn is_opposite(&self, other: Direction) -> bool {
        matches!(
            (self, other),
            (Direction::Up, Direction::Down)
                | (Direction::Down, Direction::Up)
                | (Direction::Left, Direction::Right)
                | (Direction::Right, Direction::Left)
        )
    }

    /// Returns the delta (dx, dy) for moving in this direction
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

/// Abstract input delivered to the state machine, one queue per tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Move(Direction),
    StartGame,
    ViewHighScores,
    ToggleObstacleMode,
    /// Esc: leave the current screen
    Cancel,
}

/// Picks the heading for the next move from a tick's input queue.
///
/// Only the most recent directional input that does not reverse `current` is
/// honored; everything else in the queue is ignored here.
pub fn resolve_direction(current: Direction, inputs: &[InputEvent]) -> Direction {
    inputs
        .iter()
        .rev()
        .find_map(|input| match input {
            InputEvent::Move(dir) if !current.is_opposite(*dir) => Some(*dir),
            _ => None,
        })
        .unwrap_or(current)
}
