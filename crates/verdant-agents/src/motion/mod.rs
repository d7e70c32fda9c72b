//! Motion strategies — how a visiting insect moves around its anchor.
//!
//! Each strategy randomizes its traits once, from the agent's own seeded
//! stream, when it is built. Afterwards `compute_target` is called once per
//! visiting tick and returns the world position the insect steers toward.
//! The agent smooths toward that target and clamps how far it may stray;
//! strategies don't need to.
//!
//! | Pattern | Typical species | Shape |
//! |---------|-----------------|-------|
//! | Hover | bees, hoverflies | noise jitter in a small disc |
//! | Flutter | butterflies | sine-wobbled hops between random points |
//! | Crawl | beetles, ladybugs | breathing ellipse |
//! | Erratic | moths, dragonflies | random velocity bursts on a tether |

mod crawl;
mod erratic;
mod flutter;
mod hover;

pub use crawl::Crawl;
pub use erratic::Erratic;
pub use flutter::Flutter;
pub use hover::Hover;

use rand::Rng;
use verdant_core::types::{MotionPattern, Position};

/// Scale `base` by a uniform factor in `[1 - spread, 1 + spread)`.
pub(crate) fn jitter<R: Rng + ?Sized>(rng: &mut R, base: f64, spread: f64) -> f64 {
    base * (1.0 + rng.gen_range(-spread..spread))
}

/// The closed set of movement algorithms.
#[derive(Debug, Clone)]
pub enum MotionStrategy {
    Hover(Hover),
    Flutter(Flutter),
    Crawl(Crawl),
    Erratic(Erratic),
}

impl MotionStrategy {
    /// Build the strategy for `pattern`, drawing per-agent traits from `rng`.
    pub fn for_pattern<R: Rng + ?Sized>(pattern: MotionPattern, speed: f64, rng: &mut R) -> Self {
        match pattern {
            MotionPattern::Hover => MotionStrategy::Hover(Hover::new(rng)),
            MotionPattern::Flutter => MotionStrategy::Flutter(Flutter::new(speed, rng)),
            MotionPattern::Crawl => MotionStrategy::Crawl(Crawl::new(speed, rng)),
            MotionPattern::Erratic => MotionStrategy::Erratic(Erratic::new(speed, rng)),
        }
    }

    pub fn pattern(&self) -> MotionPattern {
        match self {
            MotionStrategy::Hover(_) => MotionPattern::Hover,
            MotionStrategy::Flutter(_) => MotionPattern::Flutter,
            MotionStrategy::Crawl(_) => MotionPattern::Crawl,
            MotionStrategy::Erratic(_) => MotionPattern::Erratic,
        }
    }

    /// Re-center the strategy on a new anchor.
    pub fn reset<R: Rng + ?Sized>(&mut self, anchor: Position, rng: &mut R) {
        match self {
            MotionStrategy::Hover(s) => s.reset(anchor),
            MotionStrategy::Flutter(s) => s.reset(anchor, rng),
            MotionStrategy::Crawl(s) => s.reset(anchor),
            MotionStrategy::Erratic(s) => s.reset(anchor),
        }
    }

    /// Advance by `dt` game-seconds and return the next target position.
    pub fn compute_target<R: Rng + ?Sized>(&mut self, dt: f64, rng: &mut R) -> Position {
        match self {
            MotionStrategy::Hover(s) => s.compute_target(dt),
            MotionStrategy::Flutter(s) => s.compute_target(dt, rng),
            MotionStrategy::Crawl(s) => s.compute_target(dt),
            MotionStrategy::Erratic(s) => s.compute_target(dt, rng),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    #[test]
    fn every_pattern_builds_its_own_strategy() {
        let mut rng = ChaCha12Rng::seed_from_u64(3);
        for pattern in [
            MotionPattern::Hover,
            MotionPattern::Flutter,
            MotionPattern::Crawl,
            MotionPattern::Erratic,
        ] {
            let strategy = MotionStrategy::for_pattern(pattern, 40.0, &mut rng);
            assert_eq!(strategy.pattern(), pattern);
        }
    }

    #[test]
    fn same_seed_same_path() {
        let anchor = Position::new(100.0, -50.0);
        let run = |seed: u64| {
            let mut rng = ChaCha12Rng::seed_from_u64(seed);
            let mut s = MotionStrategy::for_pattern(MotionPattern::Erratic, 40.0, &mut rng);
            s.reset(anchor, &mut rng);
            (0..50)
                .map(|_| s.compute_target(1.0 / 60.0, &mut rng))
                .collect::<Vec<_>>()
        };
        assert_eq!(run(9), run(9));
        assert_ne!(run(9), run(10));
    }

    #[test]
    fn jitter_stays_in_band() {
        let mut rng = ChaCha12Rng::seed_from_u64(1);
        for _ in 0..1000 {
            let v = jitter(&mut rng, 10.0, 0.2);
            assert!((8.0..12.0).contains(&v));
        }
    }
}
