//! # Verdant
//!
//! A living garden simulation. Tiles carry soil, water, decay and heat;
//! that environment decides which insects show up, where they settle and
//! when they leave.
//!
//! ## Quick Start
//!
//! ```rust
//! use verdant::prelude::*;
//!
//! let mut garden = Garden::new(GardenConfig::default()).unwrap();
//!
//! // Sow a flower bed and keep it watered
//! let bed = CellPos::new(2, 2);
//! assert!(garden.plant(bed, "lavender"));
//! assert!(garden.place_sprinkler(CellPos::new(1, 2), 1));
//!
//! // Run two minutes at 30 frames per second
//! garden.run(3_600, 1.0 / 30.0);
//!
//! for event in garden.drain_events() {
//!     if let GardenEvent::AgentArrived { species_id, .. } = event {
//!         println!("{} arrived", species_id);
//!     }
//! }
//! println!("{:?}", garden.stats());
//! ```
//!
//! ## Architecture
//!
//! Verdant is organized into several crates:
//!
//! - [`verdant_core`] - Shared types, species/plant/zone catalogs, the game clock, events
//! - [`verdant_agents`] - The insect state machine and its motion strategies
//! - [`verdant_runtime`] - Environment grid, spawn scheduler, economy, journal, the garden
//!
//! ## Key Concepts
//!
//! ### The grid
//!
//! | Pass | Cells | What It Does |
//! |------|-------|--------------|
//! | Irrigation | sprinklers | Water every cell within the tier's Chebyshev radius |
//! | Decomposition | logs | Rot one stage per 180 game-seconds, up to stage 2 |
//! | Thermal | stones | Warm toward 1.0 by day, cool toward 0.0 by night |
//!
//! ### Spawning
//!
//! Every 5 ± 1 game-seconds the scheduler checks the insect cap, rolls for a
//! quiet tick, gathers the free blooming/water/log/warm-stone cells, filters
//! the species catalog by what the garden offers, and picks a species by
//! spawn weight.
//!
//! ### Visitors
//!
//! `Arriving → Visiting → PreDeparture → Departing → Freed`. Removing the
//! host plant or the wrong time of day cuts a visit short. Visitors are
//! capturable (photographable) only while visiting or circling.

// Re-export all subcrates
pub use verdant_agents as agents;
pub use verdant_core as core;
pub use verdant_runtime as runtime;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports.
///
/// ```rust
/// use verdant::prelude::*;
/// ```
pub mod prelude {
    pub use verdant_runtime::prelude::*;
}
