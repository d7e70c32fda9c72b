//! Sine-wobbled hops between random points near the anchor.

use super::jitter;
use rand::Rng;
use std::f64::consts::{PI, TAU};
use verdant_core::types::Position;

const WANDER_RADIUS: f64 = 40.0;
const INNER_FRACTION: f64 = 0.3;
const BASE_AMPLITUDE: f64 = 12.0;
const BASE_FREQUENCY: f64 = 2.0;

#[derive(Debug, Clone)]
pub struct Flutter {
    speed: f64,
    amplitude: f64,
    /// Wobble cycles per segment.
    frequency: f64,
    anchor: Position,
    start: Position,
    end: Position,
    progress: f64,
}

impl Flutter {
    pub fn new<R: Rng + ?Sized>(speed: f64, rng: &mut R) -> Self {
        Self {
            speed: jitter(rng, speed, 0.15),
            amplitude: jitter(rng, BASE_AMPLITUDE, 0.2),
            frequency: BASE_FREQUENCY + rng.gen_range(-0.5..0.5),
            anchor: Position::ZERO,
            start: Position::ZERO,
            end: Position::ZERO,
            progress: 0.0,
        }
    }

    pub fn amplitude(&self) -> f64 {
        self.amplitude
    }

    pub fn reset<R: Rng + ?Sized>(&mut self, anchor: Position, rng: &mut R) {
        self.anchor = anchor;
        self.start = anchor;
        self.end = self.pick_target(rng);
        self.progress = 0.0;
    }

    fn pick_target<R: Rng + ?Sized>(&self, rng: &mut R) -> Position {
        let angle = rng.gen_range(0.0..TAU);
        let distance = rng.gen_range(WANDER_RADIUS * INNER_FRACTION..WANDER_RADIUS);
        self.anchor + Position::from_angle(angle).scale(distance)
    }

    pub fn compute_target<R: Rng + ?Sized>(&mut self, dt: f64, rng: &mut R) -> Position {
        let length = self.start.distance_to(&self.end).max(1.0);
        self.progress = (self.progress + self.speed * dt / length).clamp(0.0, 1.0);

        let base = self.start.lerp(&self.end, self.progress);
        let perpendicular = (self.end - self.start).normalized().perpendicular();
        // Damped to zero at both ends of the segment.
        let wobble = (self.progress * self.frequency * TAU).sin()
            * self.amplitude
            * (self.progress * PI).sin();

        if self.progress >= 1.0 {
            self.start = self.end;
            self.end = self.pick_target(rng);
            self.progress = 0.0;
        }

        base + perpendicular.scale(wobble)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    #[test]
    fn targets_land_in_the_annulus() {
        let mut rng = ChaCha12Rng::seed_from_u64(2);
        let mut f = Flutter::new(40.0, &mut rng);
        let anchor = Position::new(10.0, 10.0);
        f.reset(anchor, &mut rng);
        for _ in 0..500 {
            let t = f.pick_target(&mut rng);
            let d = t.distance_to(&anchor);
            assert!(d >= 12.0 - 1e-9 && d < 40.0 + 1e-9, "distance {}", d);
        }
    }

    #[test]
    fn path_stays_within_wander_radius_plus_wobble() {
        let mut rng = ChaCha12Rng::seed_from_u64(8);
        let mut f = Flutter::new(45.0, &mut rng);
        let anchor = Position::ZERO;
        f.reset(anchor, &mut rng);
        let bound = WANDER_RADIUS + f.amplitude() + 1e-6;
        for _ in 0..2000 {
            let p = f.compute_target(1.0 / 30.0, &mut rng);
            assert!(p.distance_to(&anchor) <= bound);
        }
    }

    #[test]
    fn segment_ends_start_a_new_hop() {
        let mut rng = ChaCha12Rng::seed_from_u64(4);
        let mut f = Flutter::new(40.0, &mut rng);
        f.reset(Position::ZERO, &mut rng);
        let first_end = f.end;
        // One huge step finishes the segment.
        f.compute_target(100.0, &mut rng);
        assert_eq!(f.start, first_end);
        assert_eq!(f.progress, 0.0);
    }
}
