//! Short-lived sparks drawn over the board.
//!
//! Coordinates are in grid cells; particles advance once per rendered frame.

use rand::Rng;
use rand::rngs::ThreadRng;

use crate::game::{PowerUpKind, Position};

/// Sparks per burst for ordinary food
pub const BURST_SIZE: usize = 12;
/// Cells per frame at full speed
const SPEED: f32 = 0.3;
/// Frames a particle stays visible
const LIFETIME: u32 = 15;

/// What a particle was emitted for; decides its color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tint {
    Food,
    PowerUp(PowerUpKind),
    Crash,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    dx: f32,
    dy: f32,
    pub life: u32,
    pub tint: Tint,
}

impl Particle {
    /// Fraction of lifetime left, 1.0 when fresh
    pub fn fade(&self) -> f32 {
        self.life as f32 / LIFETIME as f32
    }
}

pub struct ParticleSystem {
    particles: Vec<Particle>,
    rng: ThreadRng,
}

impl ParticleSystem {
    pub fn new() -> Self {
        Self {
            particles: Vec::new(),
            rng: rand::thread_rng(),
        }
    }

    /// Burst of `count` sparks from the center of `cell`
    pub fn emit(&mut self, cell: Position, count: usize, tint: Tint) {
        let (cx, cy) = (cell.x as f32 + 0.5, cell.y as f32 + 0.5);
        for _ in 0..count {
            let angle = self.rng.gen_range(0.0..std::f32::consts::TAU);
            let speed = self.rng.gen_range(SPEED * 0.5..=SPEED);
            self.particles.push(Particle {
                x: cx,
                y: cy,
                dx: angle.cos() * speed,
                dy: angle.sin() * speed,
                life: LIFETIME,
                tint,
            });
        }
    }

    /// Move every particle one frame and drop the spent ones
    pub fn update(&mut self) {
        self.particles.retain_mut(|p| {
            p.x += p.dx;
            p.y += p.dy;
            p.life -= 1;
            p.life > 0
        });
    }

    /// Particles at `(x, y)` cells, for particles still on a `width` x `height` board
    pub fn cells(&self, width: usize, height: usize) -> impl Iterator<Item = (i32, i32, &Particle)> {
        self.particles.iter().filter_map(move |p| {
            let (x, y) = (p.x.floor() as i32, p.y.floor() as i32);
            let inside = x >= 0 && y >= 0 && (x as usize) < width && (y as usize) < height;
            inside.then_some((x, y, p))
        })
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }
}

impl Default for ParticleSystem {
    fn default() -> Self {
        Self::new()
    }
}
