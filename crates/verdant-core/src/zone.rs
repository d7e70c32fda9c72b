//! Zone table — grid sizes, unlock requirements and expansion tiers.
//!
//! Each zone starts at a base size and grows through an ordered list of
//! expansion tiers. Tier 0 is the base grid; tier `n` is the `n`-th entry of
//! `expansions`. Every purchased tier adds its bonus to the zone's insect cap.

use crate::error::{CatalogError, Result};
use crate::types::{CellPos, ZoneType};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

const BUILTIN_ZONES: &str = include_str!("../data/zones.json");

/// Insect cap every zone starts from before expansion bonuses.
pub const DEFAULT_BASE_INSECT_CAP: usize = 12;

/// One purchasable grid-size upgrade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpansionTier {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub nectar_cost: u64,
    pub insect_cap_bonus: usize,
}

/// Static layout and progression data for one zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneDefinition {
    pub zone: ZoneType,
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub unlock_cost: u64,
    /// Discovered species needed before the zone can be unlocked.
    pub journal_required: usize,
    #[serde(default)]
    pub water_tiles: Vec<CellPos>,
    #[serde(default)]
    pub log_tiles: Vec<CellPos>,
    #[serde(default)]
    pub stone_tiles: Vec<CellPos>,
    #[serde(default)]
    pub lamp_tiles: Vec<CellPos>,
    #[serde(default)]
    pub expansions: Vec<ExpansionTier>,
}

impl ZoneDefinition {
    /// Grid dimensions at `tier` (clamped to the last defined tier).
    pub fn grid_size(&self, tier: usize) -> (u32, u32) {
        if tier == 0 {
            return (self.width, self.height);
        }
        match self.expansions.get(tier - 1).or_else(|| self.expansions.last()) {
            Some(t) => (t.width, t.height),
            None => (self.width, self.height),
        }
    }

    /// The tier after `current`, if one exists.
    pub fn next_tier(&self, current: usize) -> Option<&ExpansionTier> {
        self.expansions.get(current)
    }

    pub fn max_tier(&self) -> usize {
        self.expansions.len()
    }

    /// Base cap plus the bonuses of every tier up to and including `tier`.
    pub fn insect_cap(&self, tier: usize, base_cap: usize) -> usize {
        base_cap
            + self
                .expansions
                .iter()
                .take(tier)
                .map(|t| t.insect_cap_bonus)
                .sum::<usize>()
    }

    fn validate(&self) -> std::result::Result<(), CatalogError> {
        let mut prev = (self.width, self.height);
        for (i, tier) in self.expansions.iter().enumerate() {
            if tier.width < prev.0 || tier.height < prev.1 {
                return Err(CatalogError::ShrinkingExpansion {
                    zone: self.zone.to_string(),
                    tier: i + 1,
                });
            }
            prev = (tier.width, tier.height);
        }
        Ok(())
    }
}

/// All zone definitions, in unlock order.
#[derive(Debug, Clone, Default)]
pub struct ZoneTable {
    zones: Vec<ZoneDefinition>,
}

impl ZoneTable {
    pub fn new(zones: Vec<ZoneDefinition>) -> Result<Self> {
        let mut seen = HashSet::new();
        for def in &zones {
            def.validate()?;
            if !seen.insert(def.zone) {
                return Err(CatalogError::DuplicateZone(def.zone.to_string()).into());
            }
        }
        Ok(Self { zones })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let zones: Vec<ZoneDefinition> = serde_json::from_str(json)?;
        Self::new(zones)
    }

    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_ZONES)
    }

    pub fn get(&self, zone: ZoneType) -> Option<&ZoneDefinition> {
        self.zones.iter().find(|d| d.zone == zone)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ZoneDefinition> {
        self.zones.iter()
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Insect cap for `zone` at `tier`; unknown zones get the bare base cap.
    pub fn insect_cap(&self, zone: ZoneType, tier: usize, base_cap: usize) -> usize {
        self.get(zone)
            .map(|d| d.insect_cap(tier, base_cap))
            .unwrap_or(base_cap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_table_defines_every_zone() {
        let table = ZoneTable::builtin().unwrap();
        for zone in ZoneType::ALL {
            assert!(table.get(zone).is_some(), "missing zone {}", zone);
        }
        let starter = table.get(ZoneType::Starter).unwrap();
        assert_eq!(starter.grid_size(0), (5, 5));
        assert_eq!(starter.grid_size(1), (9, 9));
        assert_eq!(starter.unlock_cost, 0);
    }

    #[test]
    fn insect_cap_adds_tier_bonuses() {
        let table = ZoneTable::builtin().unwrap();
        assert_eq!(table.insect_cap(ZoneType::Starter, 0, 12), 12);
        assert_eq!(table.insect_cap(ZoneType::Starter, 1, 12), 16);
        assert_eq!(table.insect_cap(ZoneType::Starter, 2, 12), 20);
        // Tiers past the last one add nothing further.
        assert_eq!(table.insect_cap(ZoneType::Starter, 9, 12), 20);
    }

    #[test]
    fn next_tier_runs_out() {
        let table = ZoneTable::builtin().unwrap();
        let rock = table.get(ZoneType::RockGarden).unwrap();
        assert_eq!(rock.next_tier(0).map(|t| t.name.as_str()), Some("Stone Terrace"));
        assert!(rock.next_tier(1).is_none());
        assert_eq!(rock.max_tier(), 1);
    }

    #[test]
    fn shrinking_tier_is_rejected() {
        let json = r#"[{"zone":"pond","name":"Pond","width":5,"height":5,
            "unlock_cost":0,"journal_required":0,
            "expansions":[{"name":"Small","width":4,"height":5,"nectar_cost":1,"insect_cap_bonus":1}]}]"#;
        let err = ZoneTable::from_json(json).unwrap_err();
        assert!(err.to_string().contains("shrinks"));
    }

    #[test]
    fn fixtures_deserialize_from_coordinate_pairs() {
        let table = ZoneTable::builtin().unwrap();
        let pond = table.get(ZoneType::Pond).unwrap();
        assert_eq!(pond.water_tiles.len(), 4);
        assert!(pond.water_tiles.contains(&CellPos::new(1, 1)));
    }
}
