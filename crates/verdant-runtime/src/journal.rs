//! Field journal — which species have been photographed, and how well.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Highest star rating a photo can earn.
pub const MAX_STARS: u8 = 3;
/// Aim within this fraction of the frame radius earns three stars.
pub const THREE_STAR_FRACTION: f64 = 0.15;
/// Aim within this fraction earns two stars; anything else in frame, one.
pub const TWO_STAR_FRACTION: f64 = 0.40;

/// Stars for a photo taken `distance` world units off the subject with a
/// frame of `frame_radius`. `None` when the subject is outside the frame.
pub fn star_rating(distance: f64, frame_radius: f64) -> Option<u8> {
    if !(frame_radius > 0.0) || distance > frame_radius {
        return None;
    }
    let normalized = distance / frame_radius;
    Some(if normalized <= THREE_STAR_FRACTION {
        3
    } else if normalized <= TWO_STAR_FRACTION {
        2
    } else {
        1
    })
}

/// What a new photo did to the journal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JournalChange {
    /// First photo of the species.
    Discovered,
    /// A better photo of a known species.
    Improved,
    Unchanged,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Journal {
    best_stars: BTreeMap<String, u8>,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a photo of `species_id` rated `stars` (clamped to 1..=3).
    pub fn record(&mut self, species_id: &str, stars: u8) -> JournalChange {
        let stars = stars.clamp(1, MAX_STARS);
        match self.best_stars.get_mut(species_id) {
            None => {
                self.best_stars.insert(species_id.to_string(), stars);
                JournalChange::Discovered
            }
            Some(best) if stars > *best => {
                *best = stars;
                JournalChange::Improved
            }
            Some(_) => JournalChange::Unchanged,
        }
    }

    pub fn is_discovered(&self, species_id: &str) -> bool {
        self.best_stars.contains_key(species_id)
    }

    /// Best rating so far, 0 when undiscovered.
    pub fn stars(&self, species_id: &str) -> u8 {
        self.best_stars.get(species_id).copied().unwrap_or(0)
    }

    pub fn discovered_count(&self) -> usize {
        self.best_stars.len()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, u8)> {
        self.best_stars.iter().map(|(id, stars)| (id.as_str(), *stars))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_the_best_rating() {
        let mut journal = Journal::new();
        assert_eq!(journal.record("ladybug", 1), JournalChange::Discovered);
        assert_eq!(journal.record("ladybug", 1), JournalChange::Unchanged);
        assert_eq!(journal.record("ladybug", 3), JournalChange::Improved);
        assert_eq!(journal.record("ladybug", 2), JournalChange::Unchanged);
        assert_eq!(journal.stars("ladybug"), 3);
        assert_eq!(journal.stars("moth"), 0);
        assert_eq!(journal.discovered_count(), 1);
    }

    #[test]
    fn stars_from_aim() {
        assert_eq!(star_rating(0.0, 80.0), Some(3));
        assert_eq!(star_rating(12.0, 80.0), Some(3));
        assert_eq!(star_rating(30.0, 80.0), Some(2));
        assert_eq!(star_rating(79.0, 80.0), Some(1));
        assert_eq!(star_rating(81.0, 80.0), None);
        assert_eq!(star_rating(1.0, 0.0), None);
    }

    #[test]
    fn ratings_are_clamped() {
        let mut journal = Journal::new();
        journal.record("bee", 9);
        assert_eq!(journal.stars("bee"), MAX_STARS);
        journal.record("moth", 0);
        assert_eq!(journal.stars("moth"), 1);
    }
}
