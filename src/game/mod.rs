//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! The state machine is driven one tick at a time by whatever front end hosts it.

pub mod action;
pub mod config;
pub mod effects;
pub mod engine;
pub mod machine;
pub mod obstacles;
pub mod spawner;
pub mod state;

// Re-export commonly used types
pub use action::{Direction, InputEvent};
pub use config::{GameConfig, QuitPolicy};
pub use effects::{ActiveEffect, ActiveEffects, PowerUp, PowerUpKind};
pub use engine::{GameEngine, StepInfo, StepResult};
pub use machine::{GameEvent, RunSummary, Screen, ScreenKind, Snapshot, StateMachine};
pub use spawner::{SpawnError, Spawner};
pub use state::{CollisionType, GameSession, Position, Snake};
