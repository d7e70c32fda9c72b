//! # Verdant Core
//!
//! Core types, data catalogs and the game clock for the Verdant garden
//! simulation.
//!
//! - **Types**: grid coordinates, world positions, agent handles, zones
//! - **Catalogs**: species, plants and zones, loaded from JSON with builtin
//!   defaults embedded in this crate
//! - **Clock**: the day cycle and its named periods
//! - **Events**: the outbound garden event stream and per-agent interrupts
//!
//! ## Quick Start
//!
//! ```rust
//! use verdant_core::prelude::*;
//!
//! let species = SpeciesCatalog::builtin().unwrap();
//! let ladybug = species.get("seven_spot_ladybug").unwrap();
//! assert_eq!(ladybug.motion_pattern, MotionPattern::Crawl);
//!
//! let cell = CellPos::new(3, 3);
//! assert_eq!(cell.chebyshev_distance(&CellPos::new(5, 1)), 2);
//! ```

pub mod clock;
pub mod error;
pub mod events;
pub mod plants;
pub mod prelude;
pub mod species;
pub mod types;
pub mod zone;
