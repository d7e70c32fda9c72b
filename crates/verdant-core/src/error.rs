//! Error types for Verdant operations.
//!
//! Simulation calls never fail: invalid coordinates and empty pools are
//! silent no-ops. Errors only come out of loading data and configuration.

use thiserror::Error;

/// Result type for Verdant operations.
pub type Result<T> = std::result::Result<T, VerdantError>;

/// Errors that can occur while loading catalogs or configuration.
#[derive(Debug, Error)]
pub enum VerdantError {
    /// Catalog data failed validation.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
    /// Configuration failed validation.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    /// I/O errors (wrapped).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization errors.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for VerdantError {
    fn from(e: serde_json::Error) -> Self {
        VerdantError::Serialization(e.to_string())
    }
}

/// Catalog validation errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CatalogError {
    #[error("duplicate species id: {0}")]
    DuplicateSpecies(String),
    #[error("duplicate plant id: {0}")]
    DuplicatePlant(String),
    #[error("species '{species}' requires unknown plant '{plant}'")]
    UnknownPlant { species: String, plant: String },
    #[error("species '{species}' has visit range {min}..{max}")]
    InvalidVisitRange { species: String, min: f64, max: f64 },
    #[error("species '{species}' has invalid spawn weight {weight}")]
    InvalidWeight { species: String, weight: f64 },
    #[error("species '{species}' requires decomposition stage {stage} (must be -1..=2)")]
    InvalidDecompositionStage { species: String, stage: i32 },
    #[error("plant '{0}' must have at least one growth cycle")]
    NoGrowthCycles(String),
    #[error("zone '{0}' is defined more than once")]
    DuplicateZone(String),
    #[error("zone '{zone}' expansion tier {tier} shrinks the grid")]
    ShrinkingExpansion { zone: String, tier: usize },
}

/// Configuration validation errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A value that must be strictly positive was not.
    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: f64 },
    /// A probability outside [0, 1].
    #[error("{field} must be within [0, 1], got {value}")]
    NotAProbability { field: &'static str, value: f64 },
    /// Any other invalid value.
    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}
