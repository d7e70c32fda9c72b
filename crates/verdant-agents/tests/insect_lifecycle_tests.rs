//! Insect lifecycle tests against the builtin species catalog.

use std::sync::Arc;
use verdant_agents::prelude::*;

fn spawn(species_id: &str, seed: u64) -> Insect {
    let catalog = SpeciesCatalog::builtin().unwrap();
    let species = Arc::clone(catalog.get(species_id).unwrap());
    let anchor = Position::new(128.0, -64.0);
    let entry = anchor + Position::from_angle(1.0).scale(400.0);
    Insect::new(
        AgentId::from_seed(seed),
        species,
        CellPos::new(3, 2),
        anchor,
        entry,
        seed,
        InsectConfig::default(),
    )
}

fn tick_for(insect: &mut Insect, seconds: f64, events: &mut Vec<GardenEvent>) {
    let dt = 1.0 / 60.0;
    let mut t = 0.0;
    while t < seconds {
        insect.tick(dt, events);
        t += dt;
    }
}

#[test]
fn every_builtin_species_completes_a_visit() {
    let catalog = SpeciesCatalog::builtin().unwrap();
    for (i, species) in catalog.iter().enumerate() {
        let mut insect = spawn(&species.id, i as u64);
        let mut events = Vec::new();
        let lifetime = 1.5 + species.visit_duration_max + 8.0 + 1.2 + 1.0;
        tick_for(&mut insect, lifetime, &mut events);
        assert!(
            insect.is_freed(),
            "{} should be freed after {:.0}s, still {:?}",
            species.id,
            lifetime,
            insect.state()
        );
        let departed = events
            .iter()
            .filter(|e| matches!(e, GardenEvent::AgentDeparted { .. }))
            .count();
        assert_eq!(departed, 1, "{} departs exactly once", species.id);
    }
}

#[test]
fn identical_seeds_fly_identical_paths() {
    let mut a = spawn("cabbage_white", 77);
    let mut b = spawn("cabbage_white", 77);
    let mut events = Vec::new();
    for _ in 0..600 {
        a.tick(1.0 / 60.0, &mut events);
        b.tick(1.0 / 60.0, &mut events);
        assert_eq!(a.position(), b.position());
    }
    assert_eq!(a.remaining_visit(), b.remaining_visit());
}

#[test]
fn visit_duration_drawn_from_species_range() {
    let catalog = SpeciesCatalog::builtin().unwrap();
    let honeybee = catalog.get("western_honeybee").unwrap();
    for seed in 0..50 {
        let insect = spawn("western_honeybee", seed);
        assert!(insect.remaining_visit() >= honeybee.visit_duration_min);
        assert!(insect.remaining_visit() <= honeybee.visit_duration_max);
    }
}

#[test]
fn zero_dt_changes_nothing() {
    let mut insect = spawn("seven_spot_ladybug", 5);
    let mut events = Vec::new();
    let before = insect.position();
    insect.tick(0.0, &mut events);
    assert_eq!(insect.position(), before);
    assert_eq!(insect.state(), InsectState::Arriving);
    assert!(events.is_empty());
}

#[test]
fn pre_departure_is_capturable_and_announced() {
    let mut insect = spawn("seven_spot_ladybug", 9);
    let mut events = Vec::new();
    while insect.state() != InsectState::PreDeparture {
        insect.tick(0.25, &mut events);
    }
    assert!(insect.is_capturable());
    assert!(events
        .iter()
        .any(|e| matches!(e, GardenEvent::AgentDeparting { .. })));
    assert!(insect.try_freeze());
    assert!(!insect.is_capturable());
}
