//! Breathing elliptical crawl around the anchor, squashed vertically for the
//! top-down view.

use super::jitter;
use rand::Rng;
use std::f64::consts::TAU;
use verdant_core::types::Position;

const BASE_RADIUS: f64 = 14.0;
const BREATH: f64 = 2.0;
const VERTICAL_SQUASH: f64 = 0.6;

#[derive(Debug, Clone)]
pub struct Crawl {
    /// Radians per game-second.
    angular_speed: f64,
    radius: f64,
    angle: f64,
    anchor: Position,
}

impl Crawl {
    pub fn new<R: Rng + ?Sized>(speed: f64, rng: &mut R) -> Self {
        Self {
            angular_speed: jitter(rng, speed / 30.0, 0.15),
            radius: jitter(rng, BASE_RADIUS, 0.2),
            angle: rng.gen_range(0.0..TAU),
            anchor: Position::ZERO,
        }
    }

    pub fn reset(&mut self, anchor: Position) {
        self.anchor = anchor;
    }

    pub fn compute_target(&mut self, dt: f64) -> Position {
        self.angle += self.angular_speed * dt;
        let r = self.radius + (self.angle * 2.0).sin() * BREATH;
        self.anchor
            + Position::new(
                self.angle.cos() * r,
                self.angle.sin() * r * VERTICAL_SQUASH,
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    #[test]
    fn ellipse_is_squashed_vertically() {
        let mut rng = ChaCha12Rng::seed_from_u64(1);
        let mut c = Crawl::new(15.0, &mut rng);
        c.reset(Position::ZERO);
        let max_r = c.radius + BREATH;
        let (mut max_x, mut max_y) = (0.0_f64, 0.0_f64);
        for _ in 0..5000 {
            let p = c.compute_target(0.02);
            max_x = max_x.max(p.x.abs());
            max_y = max_y.max(p.y.abs());
        }
        assert!(max_x <= max_r + 1e-9);
        assert!(max_y <= max_r * VERTICAL_SQUASH + 1e-9);
        assert!(max_y < max_x);
    }

    #[test]
    fn angular_speed_follows_species_speed() {
        let mut rng = ChaCha12Rng::seed_from_u64(1);
        let c = Crawl::new(30.0, &mut rng);
        assert!(c.angular_speed >= 0.85 && c.angular_speed < 1.15);
    }
}
