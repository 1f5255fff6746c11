use std::time::Duration;

use log::{debug, info};

use super::{
    action::Direction,
    config::GameConfig,
    effects::PowerUpKind,
    obstacles,
    spawner::Spawner,
    state::{CollisionType, GameSession, Position, Snake},
};

/// Information about a step
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepInfo {
    /// Whether the snake ate food this step
    pub ate_food: bool,
    /// Power-up picked up this step, if any
    pub collected: Option<PowerUpKind>,
    /// Effects that ran out this step
    pub expired: Vec<PowerUpKind>,
    /// Type of collision if one occurred
    pub collision_type: Option<CollisionType>,
}

/// Result of a game step
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// Points awarded this step
    pub points: u32,
    /// Whether the game has terminated
    pub terminated: bool,
    /// Additional information about the step
    pub info: StepInfo,
}

/// The game engine that handles all game logic
pub struct GameEngine {
    config: GameConfig,
    spawner: Spawner,
}

impl GameEngine {
    /// Create a new game engine with the given configuration
    pub fn new(config: GameConfig) -> Self {
        let spawner = Spawner::new(config.grid_width, config.grid_height);
        Self { config, spawner }
    }

    /// Engine whose every random choice follows `seed`
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        let spawner = Spawner::with_seed(seed, config.grid_width, config.grid_height);
        Self { config, spawner }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Start a fresh run, with obstacles when `obstacle_mode` is set
    pub fn reset(&mut self, obstacle_mode: bool) -> GameSession {
        let center_x = (self.config.grid_width / 2) as i32;
        let center_y = (self.config.grid_height / 2) as i32;

        let snake = Snake::new(
            Position::new(center_x, center_y),
            Direction::Right,
            self.config.initial_snake_length,
        );

        let obstacles = if obstacle_mode {
            obstacles::generate(
                self.spawner.rng(),
                self.config.grid_width,
                self.config.grid_height,
                self.config.obstacle_count,
                &obstacles::reserved_cells(&snake),
            )
        } else {
            Default::default()
        };

        // Placeholder food; the real one is drawn once obstacles are known
        let mut state = GameSession::new(
            snake,
            Position::new(0, 0),
            self.config.grid_width,
            self.config.grid_height,
        );
        state.food = None;
        state.obstacles = obstacles;
        state.obstacle_mode = obstacle_mode;
        self.respawn_food(&mut state);

        info!(
            "New run on {}x{} grid, obstacles {}",
            self.config.grid_width,
            self.config.grid_height,
            if obstacle_mode { "on" } else { "off" }
        );
        state
    }

    /// Movement interval for the next tick; a speed boost halves it
    pub fn tick_interval(&self, state: &GameSession) -> Duration {
        let base = self.config.base_tick();
        if state.effects.is_boosted() {
            base / 2
        } else {
            base
        }
    }

    /// Execute one step of the game, heading in `direction`
    pub fn step(&mut self, state: &mut GameSession, direction: Direction) -> StepResult {
        if !state.is_alive {
            return StepResult {
                points: 0,
                terminated: true,
                info: StepInfo::default(),
            };
        }

        // Update direction (prevent 180° turns)
        if !state.snake.direction.is_opposite(direction) {
            state.snake.direction = direction;
        }

        let mut info = StepInfo::default();
        state.steps += 1;

        let ate_food = match self.advance(state) {
            Ok(ate_food) => ate_food,
            Err(collision_type) => {
                state.is_alive = false;
                info.collision_type = Some(collision_type);
                info!(
                    "Collision ({:?}) at step {}, final score {}",
                    collision_type, state.steps, state.score
                );
                return StepResult {
                    points: 0,
                    terminated: true,
                    info,
                };
            }
        };

        let mut points = 0;
        if ate_food {
            let base = if state.obstacle_mode {
                self.config.food_points + self.config.obstacle_bonus
            } else {
                self.config.food_points
            };
            points += base * state.effects.score_factor(self.config.score_multiplier);
            state.food = None;
            info.ate_food = true;
            debug!("Food eaten at {:?}", state.snake.head());
        }

        info.expired = state.effects.decay();
        for kind in &info.expired {
            info!("{} effect expired", kind.label());
        }

        if let Some(kind) = self.collect_power_up(state) {
            points += self.config.power_up_bonus
                * state.effects.score_factor(self.config.score_multiplier);
            info.collected = Some(kind);
        }

        state.score += points;

        if state.food.is_none() {
            self.respawn_food(state);
        }
        self.update_power_up(state);

        StepResult {
            points,
            terminated: false,
            info,
        }
    }

    /// Move the head one cell in the snake's heading.
    ///
    /// Returns whether food was eaten, or the collision that ended the run.
    pub fn advance(&self, state: &mut GameSession) -> Result<bool, CollisionType> {
        let invincible = state.effects.is_invincible();
        let mut new_head = state.snake.head().moved_in_direction(state.snake.direction);

        if !state.is_in_bounds(new_head) {
            let wraps = self.config.wrap_walls || (invincible && self.config.invincible_wraps);
            if !wraps {
                return Err(CollisionType::Wall);
            }
            new_head = new_head.wrapped(state.grid_width, state.grid_height);
        }

        let growing = state.food == Some(new_head);

        if !invincible {
            if state.is_obstacle(new_head) {
                return Err(CollisionType::Obstacle);
            }
            if state.snake.would_bite(new_head, growing) {
                return Err(CollisionType::SelfCollision);
            }
        }

        state.snake.advance_to(new_head, growing);
        Ok(growing)
    }

    fn collect_power_up(&mut self, state: &mut GameSession) -> Option<PowerUpKind> {
        let power_up = state.power_up.filter(|p| p.cell == state.snake.head())?;
        state.power_up = None;
        state
            .effects
            .collect(power_up.kind, self.config.effect_duration);
        info!("{} power-up collected", power_up.kind.label());
        Some(power_up.kind)
    }

    /// Place food on a free cell; on a full board it is retried next step
    fn respawn_food(&mut self, state: &mut GameSession) {
        match self.spawner.spawn_food(&state.occupied()) {
            Ok(pos) => state.food = Some(pos),
            Err(err) => {
                debug!("Food not placed: {}", err);
                state.food = None;
            }
        }
    }

    fn update_power_up(&mut self, state: &mut GameSession) {
        if let Some(power_up) = state.power_up.as_mut()
            && power_up.tick()
        {
            debug!("{} power-up vanished", power_up.kind.label());
            state.power_up = None;
        }

        let spawned = self.spawner.maybe_spawn_power_up(
            &state.occupied(),
            state.power_up.as_ref(),
            self.config.power_up_spawn_chance,
            self.config.power_up_lifetime,
        );
        if let Some(power_up) = spawned {
            debug!("{:?} power-up spawned at {:?}", power_up.kind, power_up.cell);
            state.power_up = Some(power_up);
        }
    }
}
