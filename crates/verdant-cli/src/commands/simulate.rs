//! Plant a starter bed and run the garden headless.

use anyhow::{bail, Context, Result};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use tracing::debug;
use verdant::prelude::*;

use crate::config::Config;

/// Frame radius used for automatic photos, in world units.
const PHOTO_FRAME_RADIUS: f64 = 80.0;

/// Starter plants sown round-robin across the bed.
const BED_PLANTS: [&str; 5] = ["lavender", "sunflower", "daisy", "coneflower", "marigold"];

pub struct SimulateArgs {
    pub seconds: Option<f64>,
    pub speed: Option<f64>,
    pub seed: Option<u64>,
    pub config: Option<String>,
    pub harvest: bool,
    pub photograph: bool,
    pub json: bool,
    pub verbose: bool,
}

pub fn run(args: SimulateArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => Config::load_from(Path::new(path))?,
        None => Config::load()?,
    };
    if let Some(seconds) = args.seconds {
        config.simulation.seconds = seconds;
    }
    if let Some(speed) = args.speed {
        config.simulation.speed = speed;
    }
    if let Some(seed) = args.seed {
        config.garden.seed = seed;
    }
    let sim = &config.simulation;
    if !(sim.seconds > 0.0) || sim.fps == 0 || !(sim.speed > 0.0) {
        bail!("seconds, fps and speed must all be positive");
    }

    let frames = (sim.seconds * sim.fps as f64).ceil() as u64;
    let dt = 1.0 / sim.fps as f64;
    debug!(frames, dt, speed = sim.speed, "simulation configured");

    let mut garden = Garden::new(config.garden.clone()).context("Failed to build garden")?;
    garden.set_speed(sim.speed);
    let planted = lay_out_starter_bed(&mut garden);
    garden.drain_events();

    if !args.json {
        println!(
            "{} Planted {} cells around a sprinkler (seed {})",
            "→".blue(),
            planted.to_string().cyan(),
            config.garden.seed.to_string().cyan()
        );
        println!(
            "{} Simulating {}s at {}x...",
            "→".blue(),
            sim.seconds.to_string().cyan(),
            sim.speed.to_string().cyan()
        );
    }

    let pb = if args.json {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(frames)
    };
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} frames")
            .context("Invalid progress template")?
            .progress_chars("#>-"),
    );

    for _ in 0..frames {
        garden.tick(dt);
        if args.photograph {
            photograph_visitors(&mut garden);
        }
        let events = garden.drain_events();
        let hour_passed = events
            .iter()
            .any(|e| matches!(e, GardenEvent::HourPassed { .. }));
        if args.harvest && hour_passed {
            harvest_idle_blooms(&mut garden);
        }
        for event in events.iter().chain(garden.pending_events()) {
            if args.verbose || is_notable(event) {
                pb.println(format!("  {}", describe(event)));
            }
        }
        garden.drain_events();
        pb.inc(1);
    }
    pb.finish_and_clear();

    garden
        .check_invariants()
        .map_err(anyhow::Error::msg)
        .context("Garden ended in an inconsistent state")?;

    if args.json {
        let snapshot = garden.snapshot();
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    print_summary(&garden);
    Ok(())
}

/// Put a sprinkler in the middle of the active zone and sow starter plants
/// on every other free tilled cell the wallet covers. Returns cells sown.
pub fn lay_out_starter_bed(garden: &mut Garden) -> usize {
    let Some(grid) = garden.active_grid() else {
        return 0;
    };
    let center = CellPos::new(grid.width() as i32 / 2, grid.height() as i32 / 2);
    let free: Vec<CellPos> = grid
        .cells()
        .filter(|(pos, c)| **pos != center && c.tile_kind == TileKind::Tilled && !c.is_fixture())
        .map(|(pos, _)| *pos)
        .collect();

    garden.place_sprinkler(center, 1);
    let mut sown = 0;
    for (pos, plant) in free.into_iter().zip(BED_PLANTS.iter().cycle()) {
        if garden.plant(pos, plant) {
            sown += 1;
        }
    }
    sown
}

fn photograph_visitors(garden: &mut Garden) {
    let targets: Vec<(AgentId, Position)> = garden
        .visitors()
        .filter(|v| v.is_capturable() && garden.journal().stars(v.species_id()) < 3)
        .map(|v| (v.id(), v.position()))
        .collect();
    for (agent, aim) in targets {
        garden.photograph(agent, aim, PHOTO_FRAME_RADIUS);
    }
}

/// Harvest blooms nobody is visiting.
fn harvest_idle_blooms(garden: &mut Garden) {
    let Some(grid) = garden.active_grid() else {
        return;
    };
    let ready: Vec<CellPos> = grid
        .cells()
        .filter(|(_, c)| c.tile_kind == TileKind::Blooming && c.occupant_count() == 0)
        .map(|(pos, _)| *pos)
        .collect();
    for pos in ready {
        garden.harvest(pos);
    }
}

fn is_notable(event: &GardenEvent) -> bool {
    matches!(
        event,
        GardenEvent::SpeciesDiscovered { .. }
            | GardenEvent::PlantLevelUp { .. }
            | GardenEvent::ZoneUnlocked { .. }
            | GardenEvent::TimeOfDayChanged { .. }
    )
}

fn describe(event: &GardenEvent) -> String {
    match event {
        GardenEvent::AgentSpawned { species_id, cell, .. } => {
            format!("{} {} heads for {}", "+".green(), species_id, cell)
        }
        GardenEvent::AgentArrived { species_id, .. } => format!("{} {} arrived", "•".blue(), species_id),
        GardenEvent::AgentDeparting { species_id, .. } => {
            format!("{} {} is leaving", "•".yellow(), species_id)
        }
        GardenEvent::AgentDeparted { species_id, .. } => format!("{} {} left", "-".red(), species_id),
        GardenEvent::PlantPlanted { cell, plant_id, .. } => format!("planted {} at {}", plant_id, cell),
        GardenEvent::PlantBloomed { cell, plant_id, .. } => {
            format!("{} {} bloomed at {}", "✿".magenta(), plant_id, cell)
        }
        GardenEvent::PlantHarvested { cell, plant_id, nectar, .. } => {
            format!("harvested {} at {} for {} nectar", plant_id, cell, nectar)
        }
        GardenEvent::PlantRemoved { cell, plant_id, .. } => format!("removed {} from {}", plant_id, cell),
        GardenEvent::ZoneExpanded { zone, tier, width, height } => {
            format!("{} expanded to tier {} ({}x{})", zone, tier, width, height)
        }
        GardenEvent::ZoneChanged { old, new } => format!("moved from {} to {}", old, new),
        GardenEvent::ZoneUnlocked { zone } => format!("{} {} unlocked", "★".yellow(), zone),
        GardenEvent::TimeOfDayChanged { new, .. } => format!("{} {}", "☼".yellow(), new),
        GardenEvent::HourPassed { hour } => format!("{:02}:00", hour),
        GardenEvent::NectarChanged { balance } => format!("nectar: {}", balance),
        GardenEvent::SpeciesDiscovered { species_id } => {
            format!("{} discovered {}", "✓".green().bold(), species_id.bold())
        }
        GardenEvent::JournalUpdated { species_id, stars } => {
            format!("journal: {} {}", species_id, "★".repeat(*stars as usize))
        }
        GardenEvent::PlantLevelUp { plant_id, level } => {
            format!("{} {} reached level {}", "↑".green(), plant_id, level)
        }
    }
}

fn print_summary(garden: &Garden) {
    let stats = garden.stats();

    println!();
    println!("{}", "Garden Statistics".white().bold());
    println!("{}", "═".repeat(40).dimmed());
    println!();

    println!("{}", "Clock".blue().bold());
    println!(
        "  Day {}, {:02}:{:02} ({})",
        stats.day, stats.hour, stats.minute, stats.period
    );
    println!();

    println!("{}", "Visitors".blue().bold());
    println!("  In the garden:   {:>6} / {}", stats.visitors, stats.insect_cap);
    println!("  Spawned:         {:>6}", stats.total_spawned);
    println!("  Departed:        {:>6}", stats.total_departed);
    println!(
        "  Quiet checks:    {:>6} / {}",
        stats.scheduler.quiet_ticks, stats.scheduler.evaluations
    );
    println!();

    println!("{}", "Garden".blue().bold());
    println!("  Zone:            {:>6}", stats.active_zone.to_string());
    println!("  Blooming cells:  {:>6}", stats.blooming_cells);
    println!("  Nectar:          {:>6}", stats.nectar.to_string().yellow());
    println!();

    println!("{}", "Journal".blue().bold());
    if garden.journal().discovered_count() == 0 {
        println!("  {}", "(nothing photographed yet)".dimmed());
    }
    for (species_id, stars) in garden.journal().entries() {
        let name = garden
            .species()
            .get(species_id)
            .map(|s| s.display_name.as_str())
            .unwrap_or(species_id);
        println!("  {:<24} {}", name, "★".repeat(stars as usize).yellow());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starter_bed_surrounds_a_sprinkler() {
        let mut garden = Garden::new(GardenConfig::default()).unwrap();
        let nectar = garden.economy().nectar();
        let planted = lay_out_starter_bed(&mut garden);
        assert!(planted > 0);

        let grid = garden.active_grid().unwrap();
        let center = CellPos::new(grid.width() as i32 / 2, grid.height() as i32 / 2);
        assert_eq!(grid.cell(center).unwrap().sprinkler, Some(1));
        let sown = grid.cells().filter(|(_, c)| c.plant_id.is_some()).count();
        assert_eq!(sown, planted);
        assert!(garden.economy().nectar() < nectar);
    }

    #[test]
    fn every_event_has_a_description() {
        let event = GardenEvent::SpeciesDiscovered {
            species_id: "ladybug".into(),
        };
        assert!(is_notable(&event));
        assert!(describe(&event).contains("ladybug"));
        assert!(!is_notable(&GardenEvent::HourPassed { hour: 3 }));
        assert_eq!(describe(&GardenEvent::HourPassed { hour: 3 }), "03:00");
    }
}
