//! Smooth noise jitter around the anchor.

use super::jitter;
use noise::{NoiseFn, OpenSimplex};
use rand::Rng;
use std::fmt;
use verdant_core::types::Position;

const BASE_RADIUS: f64 = 8.0;
const RADIUS_SPREAD: f64 = 0.15;
const FREQUENCY: f64 = 0.8;
/// Offset between the x and y samples so the axes decorrelate.
const AXIS_PHASE: f64 = 1000.0;

#[derive(Clone)]
pub struct Hover {
    noise: OpenSimplex,
    seed: u32,
    radius: f64,
    anchor: Position,
    time: f64,
}

impl Hover {
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let seed = rng.gen_range(0..100_000);
        Self {
            noise: OpenSimplex::new(seed),
            seed,
            radius: jitter(rng, BASE_RADIUS, RADIUS_SPREAD),
            anchor: Position::ZERO,
            time: 0.0,
        }
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn reset(&mut self, anchor: Position) {
        self.anchor = anchor;
    }

    pub fn compute_target(&mut self, dt: f64) -> Position {
        self.time += dt;
        let t = self.time * FREQUENCY;
        let dx = self.noise.get([t, 0.0]).clamp(-1.0, 1.0);
        let dy = self.noise.get([t + AXIS_PHASE, 0.0]).clamp(-1.0, 1.0);
        self.anchor + Position::new(dx, dy).scale(self.radius)
    }
}

impl fmt::Debug for Hover {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hover")
            .field("seed", &self.seed)
            .field("radius", &self.radius)
            .field("anchor", &self.anchor)
            .field("time", &self.time)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    #[test]
    fn radius_is_jittered_within_fifteen_percent() {
        let mut rng = ChaCha12Rng::seed_from_u64(5);
        for _ in 0..100 {
            let h = Hover::new(&mut rng);
            assert!(h.radius() >= 8.0 * 0.85 && h.radius() < 8.0 * 1.15);
        }
    }

    #[test]
    fn stays_near_anchor() {
        let mut rng = ChaCha12Rng::seed_from_u64(5);
        let mut h = Hover::new(&mut rng);
        let anchor = Position::new(-200.0, 64.0);
        h.reset(anchor);
        for _ in 0..600 {
            let p = h.compute_target(1.0 / 60.0);
            // Each axis sample is bounded by the radius.
            assert!(p.distance_to(&anchor) <= h.radius() * 2.0_f64.sqrt() + 1e-9);
        }
    }

    #[test]
    fn target_drifts_over_time() {
        let mut rng = ChaCha12Rng::seed_from_u64(11);
        let mut h = Hover::new(&mut rng);
        h.reset(Position::ZERO);
        let a = h.compute_target(0.37);
        let b = h.compute_target(0.37);
        assert_ne!(a, b);
    }
}
