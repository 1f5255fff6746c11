//! Metal Snake - a terminal Snake game with power-ups and obstacles
//!
//! This library provides:
//! - Core game logic and the screen state machine (game module)
//! - High-score persistence (scores module)
//! - TUI rendering, particles and event cues (render module)
//! - Keyboard mapping (input module)
//! - The interactive frame loop (modes module)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
pub mod scores;
