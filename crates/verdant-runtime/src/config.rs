//! Garden configuration — every simulation tuning knob in one TOML file.
//!
//! Catalogs (species, plants, zones) are data and load separately; this is
//! the numeric tuning. Every section is optional and falls back to its
//! defaults, so an empty file is a valid config.

use crate::grid::GridConfig;
use crate::scheduler::SpawnConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use verdant_agents::insect::InsectConfig;
use verdant_core::clock::ClockConfig;
use verdant_core::error::{Result, VerdantError};

/// Top-level simulation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GardenConfig {
    /// Seed for every random stream in the garden (default: 42).
    pub seed: u64,
    /// Nectar in the wallet at the start (default: 100).
    pub starting_nectar: u64,
    pub grid: GridConfig,
    pub spawn: SpawnConfig,
    pub insect: InsectConfig,
    pub clock: ClockConfig,
}

impl Default for GardenConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            starting_nectar: 100,
            grid: GridConfig::default(),
            spawn: SpawnConfig::default(),
            insect: InsectConfig::default(),
            clock: ClockConfig::default(),
        }
    }
}

impl GardenConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: GardenConfig =
            toml::from_str(text).map_err(|e| VerdantError::Serialization(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| VerdantError::Serialization(e.to_string()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        self.grid.validate()?;
        self.spawn.validate()?;
        self.insect.validate()?;
        self.clock.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_all_defaults() {
        assert_eq!(GardenConfig::from_toml("").unwrap(), GardenConfig::default());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = GardenConfig::from_toml(
            r#"
            seed = 7

            [spawn]
            quiet_tick_chance = 0.0
            "#,
        )
        .unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.spawn.quiet_tick_chance, 0.0);
        assert_eq!(config.spawn.check_interval, 5.0);
        assert_eq!(config.grid.tile_size, 128.0);
    }

    #[test]
    fn defaults_round_trip_through_toml() {
        let text = GardenConfig::default().to_toml().unwrap();
        assert_eq!(GardenConfig::from_toml(&text).unwrap(), GardenConfig::default());
    }

    #[test]
    fn invalid_values_are_rejected() {
        let err = GardenConfig::from_toml("[spawn]\nquiet_tick_chance = 2.0\n").unwrap_err();
        assert!(err.to_string().contains("quiet_tick_chance"));
        assert!(GardenConfig::from_toml("[grid]\ntile_size = -1.0\n").is_err());
        assert!(GardenConfig::from_toml("seed = \"nope\"").is_err());
    }
}
