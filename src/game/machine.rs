//! Screen flow of the game: menu, running session, score board, game over.
//!
//! The harness calls [`StateMachine::update`] once per tick with the input
//! collected since the previous tick, plays the returned [`GameEvent`]s and
//! draws a [`Snapshot`]. Nothing in here blocks or draws.

use std::collections::HashSet;
use std::time::Duration;

use log::info;

use super::action::{InputEvent, resolve_direction};
use super::config::QuitPolicy;
use super::effects::{ActiveEffect, PowerUp, PowerUpKind};
use super::engine::GameEngine;
use super::state::{CollisionType, GameSession, Position};
use crate::scores::{GameMode, ScoreStore};

/// Discrete happenings the presentation layer turns into sound and effects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    FoodEaten { at: Position },
    PowerUpCollected { kind: PowerUpKind, at: Position },
    Collision { kind: CollisionType, at: Position },
    GameOver { score: u32, new_record: bool },
}

/// How a finished run ended up against the stored best
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub mode: GameMode,
    pub score: u32,
    pub best: u32,
    pub new_record: bool,
}

/// Current screen. A running session lives only inside `Playing`.
#[derive(Debug)]
pub enum Screen {
    Menu,
    Playing(Box<GameSession>),
    ScoreBoard,
    GameOver(RunSummary),
}

/// Screen discriminant, for snapshots and matching without the payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenKind {
    Menu,
    Playing,
    ScoreBoard,
    GameOver,
}

/// Read-only view of everything the renderer needs for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub screen: ScreenKind,
    pub obstacle_mode: bool,
    pub grid_width: usize,
    pub grid_height: usize,
    pub snake: Vec<Position>,
    pub food: Option<Position>,
    pub power_up: Option<PowerUp>,
    pub obstacles: HashSet<Position>,
    pub effects: Vec<ActiveEffect>,
    pub score: u32,
    pub multiplier: u32,
    pub classic_best: u32,
    pub obstacle_best: u32,
    pub last_run: Option<RunSummary>,
}

pub struct StateMachine<S: ScoreStore> {
    engine: GameEngine,
    store: S,
    screen: Screen,
    obstacle_mode: bool,
    last_run: Option<RunSummary>,
    /// Input left over when a screen change cut a tick's queue short
    carried: Vec<InputEvent>,
}

impl<S: ScoreStore> StateMachine<S> {
    pub fn new(engine: GameEngine, store: S) -> Self {
        Self {
            engine,
            store,
            screen: Screen::Menu,
            obstacle_mode: false,
            last_run: None,
            carried: Vec::new(),
        }
    }

    pub fn with_obstacle_mode(mut self, enabled: bool) -> Self {
        self.obstacle_mode = enabled;
        self
    }

    pub fn screen_kind(&self) -> ScreenKind {
        match self.screen {
            Screen::Menu => ScreenKind::Menu,
            Screen::Playing(_) => ScreenKind::Playing,
            Screen::ScoreBoard => ScreenKind::ScoreBoard,
            Screen::GameOver(_) => ScreenKind::GameOver,
        }
    }

    pub fn session(&self) -> Option<&GameSession> {
        match &self.screen {
            Screen::Playing(session) => Some(session.as_ref()),
            _ => None,
        }
    }

    pub fn obstacle_mode(&self) -> bool {
        self.obstacle_mode
    }

    pub fn best(&self, mode: GameMode) -> u32 {
        self.store.load(mode)
    }

    /// Delay before the next call to [`update`](Self::update)
    pub fn tick_interval(&self) -> Duration {
        match &self.screen {
            Screen::Playing(session) => self.engine.tick_interval(session),
            _ => self.engine.config().base_tick(),
        }
    }

    /// Advance one tick, consuming the input queued since the last one.
    ///
    /// When a menu screen changes mid-queue, the inputs after the one that
    /// changed it are kept in order and handled first on the next tick.
    pub fn update(&mut self, inputs: &[InputEvent]) -> Vec<GameEvent> {
        let mut queue = std::mem::take(&mut self.carried);
        queue.extend_from_slice(inputs);

        match self.screen_kind() {
            ScreenKind::Menu => {
                self.update_menu(&queue);
                Vec::new()
            }
            ScreenKind::ScoreBoard => {
                if let Some((_, rest)) = queue.split_first() {
                    self.screen = Screen::Menu;
                    self.carried = rest.to_vec();
                }
                Vec::new()
            }
            ScreenKind::GameOver => {
                self.update_game_over(&queue);
                Vec::new()
            }
            ScreenKind::Playing => self.update_playing(&queue),
        }
    }

    fn update_menu(&mut self, inputs: &[InputEvent]) {
        for (i, input) in inputs.iter().enumerate() {
            match input {
                InputEvent::StartGame => {
                    self.start_run();
                    self.carried = inputs[i + 1..].to_vec();
                    return;
                }
                InputEvent::ViewHighScores => {
                    self.screen = Screen::ScoreBoard;
                    self.carried = inputs[i + 1..].to_vec();
                    return;
                }
                InputEvent::ToggleObstacleMode => {
                    self.obstacle_mode = !self.obstacle_mode;
                    info!(
                        "Obstacles toggled {}",
                        if self.obstacle_mode { "on" } else { "off" }
                    );
                }
                InputEvent::Move(_) | InputEvent::Cancel => {}
            }
        }
    }

    fn update_game_over(&mut self, inputs: &[InputEvent]) {
        for (i, input) in inputs.iter().enumerate() {
            let next = match input {
                InputEvent::StartGame => {
                    self.start_run();
                    self.carried = inputs[i + 1..].to_vec();
                    return;
                }
                InputEvent::ViewHighScores => Screen::ScoreBoard,
                InputEvent::Cancel => Screen::Menu,
                InputEvent::Move(_) | InputEvent::ToggleObstacleMode => continue,
            };
            self.screen = next;
            self.carried = inputs[i + 1..].to_vec();
            return;
        }
    }

    fn update_playing(&mut self, inputs: &[InputEvent]) -> Vec<GameEvent> {
        let Screen::Playing(session) = &mut self.screen else {
            return Vec::new();
        };

        if inputs.contains(&InputEvent::Cancel) {
            let score = session.score;
            info!("Run abandoned with score {}", score);
            if self.engine.config().quit_policy == QuitPolicy::Record {
                self.reconcile(score);
            }
            self.screen = Screen::Menu;
            return Vec::new();
        }

        let direction = resolve_direction(session.snake.direction, inputs);
        let result = self.engine.step(session, direction);
        let head = session.snake.head();

        let mut events = Vec::new();
        if result.info.ate_food {
            events.push(GameEvent::FoodEaten { at: head });
        }
        if let Some(kind) = result.info.collected {
            events.push(GameEvent::PowerUpCollected { kind, at: head });
        }

        if result.terminated {
            let score = session.score;
            if let Some(kind) = result.info.collision_type {
                events.push(GameEvent::Collision { kind, at: head });
            }
            let summary = self.reconcile(score);
            info!(
                "Game over in {} mode with score {} (best {})",
                summary.mode.key(),
                summary.score,
                summary.best
            );
            events.push(GameEvent::GameOver {
                score,
                new_record: summary.new_record,
            });
            self.screen = Screen::GameOver(summary);
        }

        events
    }

    fn start_run(&mut self) {
        let session = self.engine.reset(self.obstacle_mode);
        self.screen = Screen::Playing(Box::new(session));
    }

    /// Offer the run's score to the store for the current mode
    fn reconcile(&mut self, score: u32) -> RunSummary {
        let mode = GameMode::from_obstacles(self.obstacle_mode);
        let new_record = self.store.save(mode, score);
        let summary = RunSummary {
            mode,
            score,
            best: self.store.load(mode),
            new_record,
        };
        self.last_run = Some(summary);
        summary
    }

    pub fn snapshot(&self) -> Snapshot {
        let mut snapshot = Snapshot {
            screen: self.screen_kind(),
            obstacle_mode: self.obstacle_mode,
            grid_width: self.engine.config().grid_width,
            grid_height: self.engine.config().grid_height,
            snake: Vec::new(),
            food: None,
            power_up: None,
            obstacles: HashSet::new(),
            effects: Vec::new(),
            score: 0,
            multiplier: 1,
            classic_best: self.store.load(GameMode::Classic),
            obstacle_best: self.store.load(GameMode::Obstacle),
            last_run: self.last_run,
        };

        if let Screen::Playing(session) = &self.screen {
            snapshot.snake = session.snake.body.clone();
            snapshot.food = session.food;
            snapshot.power_up = session.power_up;
            snapshot.obstacles = session.obstacles.clone();
            snapshot.effects = session.effects.iter().copied().collect();
            snapshot.score = session.score;
            snapshot.multiplier = session
                .effects
                .score_factor(self.engine.config().score_multiplier);
        }
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Direction, GameConfig, Snake};
    use crate::scores::MemoryScoreStore;

    fn machine_with(config: GameConfig) -> StateMachine<MemoryScoreStore> {
        let engine = GameEngine::with_seed(config, 21);
        StateMachine::new(engine, MemoryScoreStore::new())
    }

    fn machine() -> StateMachine<MemoryScoreStore> {
        machine_with(GameConfig {
            power_up_spawn_chance: 0.0,
            ..GameConfig::small()
        })
    }

    /// Replace the running session with a hand-built one
    fn place(machine: &mut StateMachine<MemoryScoreStore>, session: GameSession) {
        machine.screen = Screen::Playing(Box::new(session));
    }

    #[test]
    fn test_starts_in_menu() {
        let machine = machine();
        assert_eq!(machine.screen_kind(), ScreenKind::Menu);
        assert!(machine.session().is_none());
    }

    #[test]
    fn test_menu_transitions() {
        let mut machine = machine();

        machine.update(&[InputEvent::ToggleObstacleMode]);
        assert_eq!(machine.screen_kind(), ScreenKind::Menu);
        assert!(machine.obstacle_mode());

        machine.update(&[InputEvent::ViewHighScores]);
        assert_eq!(machine.screen_kind(), ScreenKind::ScoreBoard);

        machine.update(&[InputEvent::Move(Direction::Up)]);
        assert_eq!(machine.screen_kind(), ScreenKind::Menu);

        machine.update(&[InputEvent::StartGame]);
        assert_eq!(machine.screen_kind(), ScreenKind::Playing);
        assert!(machine.session().unwrap().obstacle_mode);
    }

    #[test]
    fn test_moves_after_start_reach_the_run() {
        let mut machine = machine();
        machine.update(&[InputEvent::StartGame, InputEvent::Move(Direction::Up)]);
        let head = machine.session().unwrap().snake.head();

        machine.update(&[]);

        let session = machine.session().unwrap();
        assert_eq!(session.snake.direction, Direction::Up);
        assert_eq!(session.snake.head(), head.moved_by(0, -1));
    }

    #[test]
    fn test_leftover_input_keeps_its_order() {
        let mut machine = machine();
        // Open the score board, dismiss it, then start a run
        machine.update(&[
            InputEvent::ViewHighScores,
            InputEvent::Cancel,
            InputEvent::StartGame,
        ]);
        assert_eq!(machine.screen_kind(), ScreenKind::ScoreBoard);

        machine.update(&[]);
        assert_eq!(machine.screen_kind(), ScreenKind::Menu);

        machine.update(&[]);
        assert_eq!(machine.screen_kind(), ScreenKind::Playing);
    }

    #[test]
    fn test_score_board_waits_for_input() {
        let mut machine = machine();
        machine.update(&[InputEvent::ViewHighScores]);

        machine.update(&[]);
        assert_eq!(machine.screen_kind(), ScreenKind::ScoreBoard);
    }

    #[test]
    fn test_playing_moves_snake_each_tick() {
        let mut machine = machine();
        machine.update(&[InputEvent::StartGame]);
        let head = machine.session().unwrap().snake.head();

        machine.update(&[]);
        assert_eq!(machine.session().unwrap().snake.head(), head.moved_by(1, 0));

        machine.update(&[InputEvent::Move(Direction::Up)]);
        assert_eq!(machine.session().unwrap().snake.head(), head.moved_by(1, -1));
    }

    #[test]
    fn test_food_scenario() {
        let mut machine = machine();
        machine.update(&[InputEvent::StartGame]);
        place(
            &mut machine,
            GameSession::new(
                Snake::new(Position::new(5, 5), Direction::Right, 3),
                Position::new(6, 5),
                10,
                10,
            ),
        );

        let events = machine.update(&[]);

        let session = machine.session().unwrap();
        assert_eq!(session.snake.head(), Position::new(6, 5));
        assert_eq!(session.snake.len(), 4);
        assert_eq!(session.score, 1);
        assert_ne!(session.food, Some(Position::new(6, 5)));
        assert!(session.food.is_some());
        assert_eq!(
            events,
            vec![GameEvent::FoodEaten {
                at: Position::new(6, 5)
            }]
        );
    }

    #[test]
    fn test_wall_scenario_ends_run() {
        let mut machine = machine();
        machine.update(&[InputEvent::StartGame]);
        place(
            &mut machine,
            GameSession::new(
                Snake::new(Position::new(0, 0), Direction::Left, 1),
                Position::new(5, 5),
                10,
                10,
            ),
        );

        let events = machine.update(&[]);

        assert_eq!(machine.screen_kind(), ScreenKind::GameOver);
        assert!(machine.session().is_none());
        assert!(events.contains(&GameEvent::Collision {
            kind: CollisionType::Wall,
            at: Position::new(0, 0)
        }));
        assert!(matches!(events.last(), Some(GameEvent::GameOver { .. })));
    }

    #[test]
    fn test_high_score_reconciliation() {
        let mut machine = machine();
        machine.store.save(GameMode::Classic, 100);

        for (score, expected_best, record) in [(120, 120, true), (80, 120, false)] {
            machine.update(&[InputEvent::StartGame]);
            let mut session = GameSession::new(
                Snake::new(Position::new(0, 0), Direction::Left, 1),
                Position::new(5, 5),
                10,
                10,
            );
            session.score = score;
            place(&mut machine, session);

            let events = machine.update(&[]);

            assert_eq!(
                events.last(),
                Some(&GameEvent::GameOver {
                    score,
                    new_record: record
                })
            );
            assert_eq!(machine.best(GameMode::Classic), expected_best);
            machine.update(&[InputEvent::Cancel]);
            assert_eq!(machine.screen_kind(), ScreenKind::Menu);
        }
        assert_eq!(machine.best(GameMode::Obstacle), 0);
    }

    #[test]
    fn test_quit_discards_score_by_default() {
        let mut machine = machine();
        machine.update(&[InputEvent::StartGame]);
        if let Screen::Playing(session) = &mut machine.screen {
            session.score = 50;
        }

        machine.update(&[InputEvent::Move(Direction::Up), InputEvent::Cancel]);

        assert_eq!(machine.screen_kind(), ScreenKind::Menu);
        assert_eq!(machine.best(GameMode::Classic), 0);
        assert!(machine.snapshot().last_run.is_none());
    }

    #[test]
    fn test_quit_can_record_score() {
        let mut machine = machine_with(GameConfig {
            power_up_spawn_chance: 0.0,
            quit_policy: QuitPolicy::Record,
            ..GameConfig::small()
        });
        machine.update(&[InputEvent::StartGame]);
        if let Screen::Playing(session) = &mut machine.screen {
            session.score = 50;
        }

        machine.update(&[InputEvent::Cancel]);

        assert_eq!(machine.screen_kind(), ScreenKind::Menu);
        assert_eq!(machine.best(GameMode::Classic), 50);
    }

    #[test]
    fn test_game_over_transitions() {
        let mut machine = machine();
        machine.screen = Screen::GameOver(RunSummary {
            mode: GameMode::Classic,
            score: 3,
            best: 3,
            new_record: true,
        });

        machine.update(&[InputEvent::Move(Direction::Up)]);
        assert_eq!(machine.screen_kind(), ScreenKind::GameOver);

        machine.update(&[InputEvent::StartGame]);
        assert_eq!(machine.screen_kind(), ScreenKind::Playing);
        assert_eq!(machine.session().unwrap().score, 0);

        machine.screen = Screen::GameOver(RunSummary {
            mode: GameMode::Classic,
            score: 3,
            best: 3,
            new_record: false,
        });
        machine.update(&[InputEvent::ViewHighScores]);
        assert_eq!(machine.screen_kind(), ScreenKind::ScoreBoard);
    }

    #[test]
    fn test_obstacle_runs_score_separately() {
        let mut machine = machine().with_obstacle_mode(true);
        machine.update(&[InputEvent::StartGame]);
        let mut session = GameSession::new(
            Snake::new(Position::new(0, 0), Direction::Left, 1),
            Position::new(5, 5),
            10,
            10,
        );
        session.score = 9;
        place(&mut machine, session);

        machine.update(&[]);

        assert_eq!(machine.best(GameMode::Obstacle), 9);
        assert_eq!(machine.best(GameMode::Classic), 0);
    }

    #[test]
    fn test_snapshot_reflects_session() {
        let mut machine = machine();
        let menu = machine.snapshot();
        assert_eq!(menu.screen, ScreenKind::Menu);
        assert!(menu.snake.is_empty());

        machine.update(&[InputEvent::StartGame]);
        if let Screen::Playing(session) = &mut machine.screen {
            session.effects.collect(PowerUpKind::ScoreMultiplier, 4);
        }
        let playing = machine.snapshot();
        assert_eq!(playing.screen, ScreenKind::Playing);
        assert_eq!(playing.snake.len(), 3);
        assert!(playing.food.is_some());
        assert_eq!(playing.multiplier, 2);
        assert_eq!(playing.effects.len(), 1);
    }

    #[test]
    fn test_tick_interval_follows_boost() {
        let mut machine = machine();
        assert_eq!(machine.tick_interval(), Duration::from_millis(100));

        machine.update(&[InputEvent::StartGame]);
        if let Screen::Playing(session) = &mut machine.screen {
            session.effects.collect(PowerUpKind::SpeedBoost, 4);
        }
        assert_eq!(machine.tick_interval(), Duration::from_millis(50));
    }
}
