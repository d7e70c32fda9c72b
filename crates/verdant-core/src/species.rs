//! Species catalog — the static descriptors insects are spawned from.
//!
//! Descriptors are data, not behaviour: swapping the catalog changes who
//! visits the garden without touching the simulation. The builtin catalog
//! ships as JSON inside this crate.

use crate::error::{CatalogError, Result};
use crate::plants::PlantCatalog;
use crate::types::{DayAffinity, MotionPattern, ZoneType};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

const BUILTIN_SPECIES: &str = include_str!("../data/species.json");

/// Sentinel for "no decomposition requirement".
pub const NO_DECOMPOSITION_REQUIREMENT: i32 = -1;

fn default_rarity() -> String {
    "common".to_string()
}

fn default_decomposition_stage() -> i32 {
    NO_DECOMPOSITION_REQUIREMENT
}

/// Static description of an insect species.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesDescriptor {
    pub id: String,
    pub display_name: String,
    /// Home zone; `None` means the species may appear anywhere.
    #[serde(default)]
    pub zone: Option<ZoneType>,
    #[serde(default = "default_rarity")]
    pub rarity: String,
    pub time_of_day: DayAffinity,
    pub spawn_weight: f64,
    /// Visit length in game-seconds, drawn uniformly per individual.
    pub visit_duration_min: f64,
    pub visit_duration_max: f64,
    /// Plant ids that must all be blooming somewhere in the grid.
    #[serde(default)]
    pub required_plants: Vec<String>,
    #[serde(default)]
    pub required_water_tiles: u32,
    /// Minimum log decomposition stage, or -1 when not required.
    #[serde(default = "default_decomposition_stage")]
    pub required_decomposition_stage: i32,
    #[serde(default)]
    pub requires_heated_stone: bool,
    #[serde(default)]
    pub requires_uv_lamp: bool,
    pub motion_pattern: MotionPattern,
    pub motion_speed: f64,
    #[serde(default)]
    pub body_color_seed: u32,
}

impl SpeciesDescriptor {
    /// Species that only need open water (no plants) anchor on water tiles.
    pub fn is_aquatic_only(&self) -> bool {
        self.required_water_tiles > 0 && self.required_plants.is_empty()
    }

    /// The decomposition stage required, if any.
    pub fn min_decomposition_stage(&self) -> Option<u8> {
        if self.required_decomposition_stage < 0 {
            None
        } else {
            Some(self.required_decomposition_stage as u8)
        }
    }

    /// Whether this species belongs to `zone` (zone-agnostic and starter
    /// species belong everywhere).
    pub fn fits_zone(&self, zone: ZoneType) -> bool {
        match self.zone {
            None | Some(ZoneType::Starter) => true,
            Some(home) => home == zone,
        }
    }

    fn validate(&self) -> std::result::Result<(), CatalogError> {
        if !(self.spawn_weight.is_finite() && self.spawn_weight >= 0.0) {
            return Err(CatalogError::InvalidWeight {
                species: self.id.clone(),
                weight: self.spawn_weight,
            });
        }
        if !(self.visit_duration_min > 0.0 && self.visit_duration_min <= self.visit_duration_max) {
            return Err(CatalogError::InvalidVisitRange {
                species: self.id.clone(),
                min: self.visit_duration_min,
                max: self.visit_duration_max,
            });
        }
        if !(NO_DECOMPOSITION_REQUIREMENT..=2).contains(&self.required_decomposition_stage) {
            return Err(CatalogError::InvalidDecompositionStage {
                species: self.id.clone(),
                stage: self.required_decomposition_stage,
            });
        }
        Ok(())
    }
}

/// The full set of species, immutable once loaded.
#[derive(Debug, Clone, Default)]
pub struct SpeciesCatalog {
    species: Vec<Arc<SpeciesDescriptor>>,
}

impl SpeciesCatalog {
    /// Build a catalog, rejecting duplicate ids and malformed entries.
    pub fn new(species: Vec<SpeciesDescriptor>) -> Result<Self> {
        let mut seen = HashSet::new();
        for descriptor in &species {
            descriptor.validate()?;
            if !seen.insert(descriptor.id.clone()) {
                return Err(CatalogError::DuplicateSpecies(descriptor.id.clone()).into());
            }
        }
        Ok(Self {
            species: species.into_iter().map(Arc::new).collect(),
        })
    }

    /// Parse a JSON array of descriptors.
    pub fn from_json(json: &str) -> Result<Self> {
        let species: Vec<SpeciesDescriptor> = serde_json::from_str(json)?;
        Self::new(species)
    }

    /// Load a JSON catalog from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// The catalog embedded in this crate.
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_SPECIES)
    }

    /// Check that every required plant exists in `plants`.
    pub fn validate_against(&self, plants: &PlantCatalog) -> Result<()> {
        for species in &self.species {
            for plant in &species.required_plants {
                if plants.get(plant).is_none() {
                    return Err(CatalogError::UnknownPlant {
                        species: species.id.clone(),
                        plant: plant.clone(),
                    }
                    .into());
                }
            }
        }
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&Arc<SpeciesDescriptor>> {
        self.species.iter().find(|s| s.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<SpeciesDescriptor>> {
        self.species.iter()
    }

    pub fn len(&self) -> usize {
        self.species.len()
    }

    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }

    /// Species whose home is `zone` (zone-agnostic species excluded).
    pub fn native_to(&self, zone: ZoneType) -> impl Iterator<Item = &Arc<SpeciesDescriptor>> {
        self.species.iter().filter(move |s| s.zone == Some(zone))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(id: &str) -> SpeciesDescriptor {
        SpeciesDescriptor {
            id: id.to_string(),
            display_name: id.to_string(),
            zone: Some(ZoneType::Starter),
            rarity: "common".into(),
            time_of_day: DayAffinity::Day,
            spawn_weight: 1.0,
            visit_duration_min: 10.0,
            visit_duration_max: 20.0,
            required_plants: vec![],
            required_water_tiles: 0,
            required_decomposition_stage: -1,
            requires_heated_stone: false,
            requires_uv_lamp: false,
            motion_pattern: MotionPattern::Hover,
            motion_speed: 30.0,
            body_color_seed: 0,
        }
    }

    #[test]
    fn builtin_catalog_loads_and_references_known_plants() {
        let species = SpeciesCatalog::builtin().unwrap();
        let plants = PlantCatalog::builtin().unwrap();
        assert!(species.len() >= 20);
        species.validate_against(&plants).unwrap();
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let err = SpeciesCatalog::new(vec![descriptor("a"), descriptor("a")]).unwrap_err();
        assert!(err.to_string().contains("duplicate species id"));
    }

    #[test]
    fn inverted_visit_range_is_rejected() {
        let mut bad = descriptor("a");
        bad.visit_duration_min = 30.0;
        bad.visit_duration_max = 5.0;
        assert!(SpeciesCatalog::new(vec![bad]).is_err());
    }

    #[test]
    fn missing_optional_fields_take_defaults() {
        let json = r#"[{
            "id": "gnat", "display_name": "Gnat", "time_of_day": "both",
            "spawn_weight": 0.5, "visit_duration_min": 5, "visit_duration_max": 9,
            "motion_pattern": "erratic", "motion_speed": 40
        }]"#;
        let catalog = SpeciesCatalog::from_json(json).unwrap();
        let gnat = catalog.get("gnat").unwrap();
        assert_eq!(gnat.zone, None);
        assert_eq!(gnat.min_decomposition_stage(), None);
        assert!(gnat.fits_zone(ZoneType::Pond));
        assert_eq!(gnat.rarity, "common");
    }

    #[test]
    fn aquatic_only_needs_water_and_no_plants() {
        let mut strider = descriptor("strider");
        strider.required_water_tiles = 2;
        assert!(strider.is_aquatic_only());
        strider.required_plants.push("cattail".into());
        assert!(!strider.is_aquatic_only());
    }

    #[test]
    fn zone_fit_rules() {
        let mut moth = descriptor("moth");
        moth.zone = Some(ZoneType::Forest);
        assert!(moth.fits_zone(ZoneType::Forest));
        assert!(!moth.fits_zone(ZoneType::Pond));
        assert!(descriptor("bee").fits_zone(ZoneType::Tropical));
    }
}
