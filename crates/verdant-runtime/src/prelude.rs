//! Verdant Runtime Prelude — convenient imports for common usage.
//!
//! ```rust
//! use verdant_runtime::prelude::*;
//! ```

// Re-export the garden
pub use crate::garden::{Garden, GardenSnapshot, GardenStats, VisitorSnapshot, ZoneProgress};
pub use crate::config::GardenConfig;

// Re-export the environment grid
pub use crate::grid::{Cell, GardenGrid, GridConfig, LogState, MAX_DECOMPOSITION_STAGE, MAX_SPRINKLER_TIER};

// Re-export the scheduler
pub use crate::scheduler::{
    AnchorPools, SchedulerStats, SpawnConfig, SpawnContext, SpawnOutcome, SpawnPlan,
    SpawnScheduler, choose_anchor, eligible_species, is_eligible, weighted_pick,
};

// Re-export economy and journal
pub use crate::economy::{Economy, HarvestPayout};
pub use crate::journal::{Journal, JournalChange, star_rating};

// Re-export from agents
pub use verdant_agents::prelude::*;
