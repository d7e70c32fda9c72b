//! Verdant Core Prelude — convenient imports for common usage.
//!
//! ```rust
//! use verdant_core::prelude::*;
//! ```

pub use crate::types::{
    AgentId, CellPos, Position,
    TileKind, DayAffinity, ZoneType, MotionPattern,
};

pub use crate::clock::{ClockConfig, ClockEvent, DayPeriod, GameClock, PeriodBoundaries};
pub use crate::events::{GardenEvent, Interrupt};
pub use crate::plants::{PlantCatalog, PlantDescriptor};
pub use crate::species::{SpeciesCatalog, SpeciesDescriptor};
pub use crate::zone::{ExpansionTier, ZoneDefinition, ZoneTable, DEFAULT_BASE_INSECT_CAP};

// Re-export error types
pub use crate::error::{CatalogError, ConfigError, Result, VerdantError};
