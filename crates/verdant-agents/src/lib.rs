//! # Verdant Agents
//!
//! The insects that visit the garden and the motion strategies they fly
//! with.
//!
//! - **Insect** — a finite-state visitor: arrive, wander, circle, depart, free
//! - **Hover** — noise jitter around the host (bees, hoverflies)
//! - **Flutter** — wobbling hops between random points (butterflies)
//! - **Crawl** — breathing elliptical loop (beetles, ladybugs)
//! - **Erratic** — random bursts on a tether (moths, dragonflies)

pub mod insect;
pub mod motion;
pub mod prelude;
