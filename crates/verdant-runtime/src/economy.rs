//! Economy — the nectar wallet and per-plant harvest levels.
//!
//! Harvesting a plant pays its nectar yield times the plant's level
//! multiplier. Levels come from how many times that plant type has been
//! harvested, so favourite plants pay better over time.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Harvest counts at which a plant reaches levels 1..=5.
pub const LEVEL_THRESHOLDS: [u32; 5] = [0, 5, 15, 30, 50];
/// Nectar multiplier for levels 1..=5.
pub const NECTAR_MULTIPLIERS: [f64; 5] = [1.0, 1.25, 1.5, 1.75, 2.0];

/// Result of paying out one harvest.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HarvestPayout {
    pub nectar: u64,
    pub level: u8,
    /// Set when this harvest pushed the plant to a new level.
    pub leveled_up: bool,
}

/// Nectar balance plus harvest history.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Economy {
    nectar: u64,
    harvest_counts: BTreeMap<String, u32>,
}

impl Economy {
    pub fn new(starting_nectar: u64) -> Self {
        Self {
            nectar: starting_nectar,
            harvest_counts: BTreeMap::new(),
        }
    }

    pub fn nectar(&self) -> u64 {
        self.nectar
    }

    pub fn add(&mut self, amount: u64) {
        self.nectar = self.nectar.saturating_add(amount);
    }

    /// Deduct `amount` if the balance covers it.
    pub fn try_spend(&mut self, amount: u64) -> bool {
        if self.nectar < amount {
            return false;
        }
        self.nectar -= amount;
        true
    }

    pub fn can_afford(&self, amount: u64) -> bool {
        self.nectar >= amount
    }

    pub fn harvest_count(&self, plant_id: &str) -> u32 {
        self.harvest_counts.get(plant_id).copied().unwrap_or(0)
    }

    /// Level 1..=5 from the harvest count.
    pub fn level(&self, plant_id: &str) -> u8 {
        level_for(self.harvest_count(plant_id))
    }

    pub fn nectar_multiplier(&self, plant_id: &str) -> f64 {
        NECTAR_MULTIPLIERS[(self.level(plant_id) - 1) as usize]
    }

    /// Pay out a harvest of `plant_id` with base yield `base_yield`, then
    /// count it toward the plant's level. The current level's multiplier
    /// applies; a level gained here pays from the next harvest on.
    pub fn record_harvest(&mut self, plant_id: &str, base_yield: u32) -> HarvestPayout {
        let before = self.level(plant_id);
        let nectar = (base_yield as f64 * self.nectar_multiplier(plant_id)).round() as u64;
        self.add(nectar);

        *self.harvest_counts.entry(plant_id.to_string()).or_insert(0) += 1;
        let level = self.level(plant_id);
        if level > before {
            debug!(plant = plant_id, level, "plant leveled up");
        }
        HarvestPayout {
            nectar,
            level,
            leveled_up: level > before,
        }
    }
}

fn level_for(count: u32) -> u8 {
    LEVEL_THRESHOLDS
        .iter()
        .rposition(|&threshold| count >= threshold)
        .map(|i| i as u8 + 1)
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spending_never_overdraws() {
        let mut wallet = Economy::new(50);
        assert!(!wallet.try_spend(51));
        assert_eq!(wallet.nectar(), 50);
        assert!(wallet.try_spend(50));
        assert_eq!(wallet.nectar(), 0);
    }

    #[test]
    fn levels_follow_thresholds() {
        assert_eq!(level_for(0), 1);
        assert_eq!(level_for(4), 1);
        assert_eq!(level_for(5), 2);
        assert_eq!(level_for(29), 3);
        assert_eq!(level_for(30), 4);
        assert_eq!(level_for(500), 5);
    }

    #[test]
    fn fifth_harvest_levels_up_and_sixth_pays_more() {
        let mut wallet = Economy::new(0);
        for _ in 0..4 {
            let payout = wallet.record_harvest("lavender", 8);
            assert_eq!(payout.nectar, 8);
            assert!(!payout.leveled_up);
        }
        let fifth = wallet.record_harvest("lavender", 8);
        assert!(fifth.leveled_up);
        assert_eq!(fifth.level, 2);
        assert_eq!(fifth.nectar, 8);
        let sixth = wallet.record_harvest("lavender", 8);
        assert_eq!(sixth.nectar, 10);
        assert_eq!(wallet.nectar(), 8 * 5 + 10);
        assert_eq!(wallet.level("daisy"), 1);
    }
}
