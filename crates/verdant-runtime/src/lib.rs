//! # Verdant Runtime
//!
//! The garden's moving parts: the environment grid, the spawn scheduler
//! and the [`Garden`](garden::Garden) that ties them to the clock, the
//! visitor registry, the economy and the journal.
//!
//! The runtime is single-threaded and tick-driven. Every random stream is
//! seeded from [`GardenConfig::seed`](config::GardenConfig), so two gardens
//! built from the same config and fed the same inputs stay identical.

pub mod config;
pub mod economy;
pub mod garden;
pub mod grid;
pub mod journal;
pub mod prelude;
pub mod scheduler;
