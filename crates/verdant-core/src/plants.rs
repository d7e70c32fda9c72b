//! Plant catalog — what can be sown and how it grows.

use crate::error::{CatalogError, Result};
use crate::types::ZoneType;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

const BUILTIN_PLANTS: &str = include_str!("../data/plants.json");

fn default_rarity() -> String {
    "common".to_string()
}

/// Static description of a plant species.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlantDescriptor {
    pub id: String,
    pub display_name: String,
    pub zone: ZoneType,
    #[serde(default = "default_rarity")]
    pub rarity: String,
    pub seed_cost: u32,
    pub nectar_yield: u32,
    /// Watered game-hours needed per growth stage.
    pub growth_cycles: u32,
    /// Visitor slots the planted cell offers.
    pub insect_slots: u8,
    #[serde(default)]
    pub night_blooming: bool,
}

/// All sowable plants.
#[derive(Debug, Clone, Default)]
pub struct PlantCatalog {
    plants: Vec<PlantDescriptor>,
}

impl PlantCatalog {
    pub fn new(plants: Vec<PlantDescriptor>) -> Result<Self> {
        let mut seen = HashSet::new();
        for plant in &plants {
            if plant.growth_cycles == 0 {
                return Err(CatalogError::NoGrowthCycles(plant.id.clone()).into());
            }
            if !seen.insert(plant.id.clone()) {
                return Err(CatalogError::DuplicatePlant(plant.id.clone()).into());
            }
        }
        Ok(Self { plants })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let plants: Vec<PlantDescriptor> = serde_json::from_str(json)?;
        Self::new(plants)
    }

    pub fn load(path: &Path) -> Result<Self> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_PLANTS)
    }

    pub fn get(&self, id: &str) -> Option<&PlantDescriptor> {
        self.plants.iter().find(|p| p.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlantDescriptor> {
        self.plants.iter()
    }

    pub fn in_zone(&self, zone: ZoneType) -> impl Iterator<Item = &PlantDescriptor> {
        self.plants.iter().filter(move |p| p.zone == zone)
    }

    pub fn len(&self) -> usize {
        self.plants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plants.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_plants_cover_the_starter_zone() {
        let plants = PlantCatalog::builtin().unwrap();
        assert!(plants.in_zone(ZoneType::Starter).count() >= 5);
        let lavender = plants.get("lavender").unwrap();
        assert_eq!(lavender.insect_slots, 2);
    }

    #[test]
    fn zero_growth_cycles_rejected() {
        let json = r#"[{"id":"weed","display_name":"Weed","zone":"starter",
            "seed_cost":0,"nectar_yield":0,"growth_cycles":0,"insect_slots":1}]"#;
        assert!(PlantCatalog::from_json(json).is_err());
    }
}
