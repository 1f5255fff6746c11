//! Power-ups on the board and the timed effects they grant.

use super::state::Position;

/// Kinds of power-up available in the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PowerUpKind {
    SpeedBoost,
    Invincibility,
    ScoreMultiplier,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 3] = [
        PowerUpKind::SpeedBoost,
        PowerUpKind::Invincibility,
        PowerUpKind::ScoreMultiplier,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PowerUpKind::SpeedBoost => "Speed",
            PowerUpKind::Invincibility => "Invincible",
            PowerUpKind::ScoreMultiplier => "Multiplier",
        }
    }
}

/// A power-up waiting to be collected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerUp {
    pub cell: Position,
    pub kind: PowerUpKind,
    /// Ticks left before it disappears
    pub remaining_lifetime: u32,
}

impl PowerUp {
    pub fn new(cell: Position, kind: PowerUpKind, lifetime: u32) -> Self {
        Self {
            cell,
            kind,
            remaining_lifetime: lifetime,
        }
    }

    /// Count down one tick. Returns true once the power-up has expired.
    pub fn tick(&mut self) -> bool {
        self.remaining_lifetime = self.remaining_lifetime.saturating_sub(1);
        self.remaining_lifetime == 0
    }
}

/// An effect currently applied to the snake
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveEffect {
    pub kind: PowerUpKind,
    pub remaining_duration: u32,
}

/// Set of active effects, at most one per kind
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActiveEffects {
    effects: Vec<ActiveEffect>,
}

impl ActiveEffects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Activate `kind`, or refresh it to `duration` if it is already active
    pub fn collect(&mut self, kind: PowerUpKind, duration: u32) {
        if duration == 0 {
            return;
        }
        match self.effects.iter_mut().find(|e| e.kind == kind) {
            Some(effect) => effect.remaining_duration = duration,
            None => self.effects.push(ActiveEffect {
                kind,
                remaining_duration: duration,
            }),
        }
    }

    /// Count every effect down by one tick, dropping those that run out.
    /// Returns the kinds that expired.
    pub fn decay(&mut self) -> Vec<PowerUpKind> {
        let mut expired = Vec::new();
        self.effects.retain_mut(|effect| {
            effect.remaining_duration = effect.remaining_duration.saturating_sub(1);
            if effect.remaining_duration == 0 {
                expired.push(effect.kind);
                false
            } else {
                true
            }
        });
        expired
    }

    pub fn is_active(&self, kind: PowerUpKind) -> bool {
        self.effects.iter().any(|e| e.kind == kind)
    }

    pub fn remaining(&self, kind: PowerUpKind) -> Option<u32> {
        self.effects
            .iter()
            .find(|e| e.kind == kind)
            .map(|e| e.remaining_duration)
    }

    pub fn is_invincible(&self) -> bool {
        self.is_active(PowerUpKind::Invincibility)
    }

    pub fn is_boosted(&self) -> bool {
        self.is_active(PowerUpKind::SpeedBoost)
    }

    /// Multiplier for points awarded this tick
    pub fn score_factor(&self, multiplier: u32) -> u32 {
        if self.is_active(PowerUpKind::ScoreMultiplier) {
            multiplier
        } else {
            1
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActiveEffect> {
        self.effects.iter()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}
