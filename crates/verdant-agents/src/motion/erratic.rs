//! Random velocity bursts on a soft tether around the anchor.

use super::jitter;
use rand::Rng;
use std::f64::consts::TAU;
use verdant_core::types::Position;

const TETHER: f64 = 35.0;
const BASE_INTERVAL: f64 = 0.3;
const PULL_RATE: f64 = 4.0;

#[derive(Debug, Clone)]
pub struct Erratic {
    speed: f64,
    /// Seconds between heading changes, before per-change jitter.
    interval: f64,
    velocity: Position,
    position: Position,
    anchor: Position,
    change_timer: f64,
}

impl Erratic {
    pub fn new<R: Rng + ?Sized>(speed: f64, rng: &mut R) -> Self {
        let speed = jitter(rng, speed, 0.15);
        let interval = BASE_INTERVAL + rng.gen_range(-0.1..0.1);
        let velocity = random_direction(rng).scale(speed);
        Self {
            speed,
            interval,
            velocity,
            position: Position::ZERO,
            anchor: Position::ZERO,
            change_timer: 0.0,
        }
    }

    pub fn reset(&mut self, anchor: Position) {
        self.anchor = anchor;
        self.position = anchor;
        self.change_timer = 0.0;
    }

    pub fn compute_target<R: Rng + ?Sized>(&mut self, dt: f64, rng: &mut R) -> Position {
        self.change_timer -= dt;
        if self.change_timer <= 0.0 {
            self.velocity = random_direction(rng).scale(self.speed);
            self.change_timer = self.interval + rng.gen_range(-0.1..0.15);
        }

        self.position = self.position + self.velocity.scale(dt);

        let offset = self.position - self.anchor;
        if offset.length() > TETHER {
            let on_tether = self.anchor + offset.normalized().scale(TETHER);
            self.position = self.position.lerp(&on_tether, (dt * PULL_RATE).min(1.0));
        }
        self.position
    }
}

fn random_direction<R: Rng + ?Sized>(rng: &mut R) -> Position {
    Position::from_angle(rng.gen_range(0.0..TAU))
}
