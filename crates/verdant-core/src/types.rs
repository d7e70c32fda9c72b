//! Shared types used across all Verdant crates.

use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique handle for a live insect agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(pub Uuid);

impl AgentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a deterministic ID (for testing).
    pub fn from_seed(seed: u64) -> Self {
        Self(Uuid::from_u64_pair(seed, seed.rotate_left(32)))
    }

    /// Draw a v4 ID from a seeded stream so whole runs stay reproducible.
    pub fn from_rng<R: RngCore + ?Sized>(rng: &mut R) -> Self {
        let mut bytes = [0u8; 16];
        rng.fill_bytes(&mut bytes);
        Self(uuid::Builder::from_random_bytes(bytes).into_uuid())
    }
}

impl Default for AgentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Short form is enough to tell visitors apart in logs.
        let s = self.0.simple().to_string();
        write!(f, "{}", &s[..8])
    }
}

/// Integer grid coordinate of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellPos {
    pub x: i32,
    pub y: i32,
}

impl CellPos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Chebyshev (king-move) distance, the metric sprinklers water by.
    pub fn chebyshev_distance(&self, other: &CellPos) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }

    pub fn offset(&self, dx: i32, dy: i32) -> CellPos {
        CellPos::new(self.x + dx, self.y + dy)
    }
}

impl From<(i32, i32)> for CellPos {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

impl fmt::Display for CellPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A position in world space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const ZERO: Position = Position { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Unit vector pointing at `angle` radians.
    pub fn from_angle(angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self::new(cos, sin)
    }

    pub fn distance_to(&self, other: &Position) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    pub fn length(&self) -> f64 {
        self.length_squared().sqrt()
    }

    pub fn length_squared(&self) -> f64 {
        self.x * self.x + self.y * self.y
    }

    /// Unit vector in the same direction, or zero for a zero vector.
    pub fn normalized(&self) -> Position {
        let len = self.length();
        if len <= f64::EPSILON {
            Position::ZERO
        } else {
            Position::new(self.x / len, self.y / len)
        }
    }

    /// Linear interpolation toward `to` by `t` (unclamped).
    pub fn lerp(&self, to: &Position, t: f64) -> Position {
        Position::new(self.x + (to.x - self.x) * t, self.y + (to.y - self.y) * t)
    }

    /// Perpendicular vector rotated a quarter turn counter-clockwise.
    pub fn perpendicular(&self) -> Position {
        Position::new(-self.y, self.x)
    }

    pub fn scale(&self, factor: f64) -> Position {
        Position::new(self.x * factor, self.y * factor)
    }
}

impl std::ops::Add for Position {
    type Output = Position;

    fn add(self, rhs: Position) -> Position {
        Position::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Sub for Position {
    type Output = Position;

    fn sub(self, rhs: Position) -> Position {
        Position::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Soil stage of a grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileKind {
    /// Bare ground, or a cell given over to a fixture or sprinkler.
    Empty,
    /// Worked soil, ready for a seed.
    #[default]
    Tilled,
    Planted,
    Growing,
    /// Flowering; the stage insects are drawn to.
    Blooming,
}

impl TileKind {
    /// Whether the cell currently carries a plant.
    pub fn has_plant(&self) -> bool {
        matches!(self, TileKind::Planted | TileKind::Growing | TileKind::Blooming)
    }
}

/// When a species is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayAffinity {
    Day,
    Night,
    Both,
}

impl DayAffinity {
    /// Whether a species with this affinity may appear right now.
    pub fn matches(&self, is_daytime: bool) -> bool {
        match self {
            DayAffinity::Both => true,
            DayAffinity::Day => is_daytime,
            DayAffinity::Night => !is_daytime,
        }
    }
}

/// The garden zones a player can unlock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneType {
    Starter,
    Meadow,
    Forest,
    DeepWood,
    RockGarden,
    Pond,
    Tropical,
}

impl ZoneType {
    /// All zones in unlock order.
    pub const ALL: [ZoneType; 7] = [
        ZoneType::Starter,
        ZoneType::Meadow,
        ZoneType::Forest,
        ZoneType::DeepWood,
        ZoneType::RockGarden,
        ZoneType::Pond,
        ZoneType::Tropical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ZoneType::Starter => "starter",
            ZoneType::Meadow => "meadow",
            ZoneType::Forest => "forest",
            ZoneType::DeepWood => "deep_wood",
            ZoneType::RockGarden => "rock_garden",
            ZoneType::Pond => "pond",
            ZoneType::Tropical => "tropical",
        }
    }
}

impl fmt::Display for ZoneType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ZoneType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ZoneType::ALL
            .iter()
            .copied()
            .find(|zone| zone.as_str() == s)
            .ok_or_else(|| format!("unknown zone '{}'", s))
    }
}

/// Which motion strategy a species flies with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotionPattern {
    Hover,
    Flutter,
    Crawl,
    Erratic,
}

impl fmt::Display for MotionPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MotionPattern::Hover => "hover",
            MotionPattern::Flutter => "flutter",
            MotionPattern::Crawl => "crawl",
            MotionPattern::Erratic => "erratic",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn chebyshev_distance_uses_max_axis() {
        let a = CellPos::new(3, 3);
        assert_eq!(a.chebyshev_distance(&CellPos::new(5, 4)), 2);
        assert_eq!(a.chebyshev_distance(&CellPos::new(0, 3)), 3);
        assert_eq!(a.chebyshev_distance(&a), 0);
    }

    #[test]
    fn normalized_zero_vector_stays_zero() {
        assert_eq!(Position::ZERO.normalized(), Position::ZERO);
        let unit = Position::new(3.0, 4.0).normalized();
        assert!((unit.length() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn seeded_agent_ids_are_reproducible() {
        let mut a = rand::rngs::StdRng::seed_from_u64(7);
        let mut b = rand::rngs::StdRng::seed_from_u64(7);
        assert_eq!(AgentId::from_rng(&mut a), AgentId::from_rng(&mut b));
        assert_eq!(AgentId::from_seed(1), AgentId::from_seed(1));
        assert_ne!(AgentId::from_seed(1), AgentId::from_seed(2));
    }

    #[test]
    fn zone_round_trips_through_its_name() {
        for zone in ZoneType::ALL {
            assert_eq!(zone.as_str().parse::<ZoneType>().unwrap(), zone);
        }
        assert!("moon".parse::<ZoneType>().is_err());
    }

    #[test]
    fn affinity_matching() {
        assert!(DayAffinity::Both.matches(true));
        assert!(DayAffinity::Both.matches(false));
        assert!(DayAffinity::Day.matches(true));
        assert!(!DayAffinity::Night.matches(true));
    }
}
