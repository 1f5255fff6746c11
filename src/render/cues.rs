use crate::game::GameEvent;

use super::particles::{BURST_SIZE, ParticleSystem, Tint};

/// Turns game events into what the player sees and hears
pub struct Cues {
    bell: bool,
}

impl Cues {
    pub fn new(bell: bool) -> Self {
        Self { bell }
    }

    /// Emit particles for `events`. Returns true when the terminal bell
    /// should ring.
    pub fn play(&self, events: &[GameEvent], particles: &mut ParticleSystem) -> bool {
        let mut ring = false;
        for event in events {
            match *event {
                GameEvent::FoodEaten { at } => particles.emit(at, BURST_SIZE, Tint::Food),
                GameEvent::PowerUpCollected { kind, at } => {
                    particles.emit(at, BURST_SIZE * 2, Tint::PowerUp(kind))
                }
                GameEvent::Collision { at, .. } => {
                    particles.emit(at, BURST_SIZE * 3, Tint::Crash);
                    ring = true;
                }
                GameEvent::GameOver { .. } => ring = true,
            }
        }
        ring && self.bell
    }
}
