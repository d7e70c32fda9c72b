//! List the builtin species and plant catalogs.

use anyhow::{Context, Result};
use colored::Colorize;
use verdant::prelude::*;

pub fn run(zone: Option<ZoneType>, plants: bool) -> Result<()> {
    if plants {
        list_plants(zone)
    } else {
        list_species(zone)
    }
}

fn list_species(zone: Option<ZoneType>) -> Result<()> {
    let catalog = SpeciesCatalog::builtin().context("Failed to load species catalog")?;
    let species: Vec<_> = match zone {
        Some(z) => catalog.native_to(z).collect(),
        None => catalog.iter().collect(),
    };

    println!("{}", heading("Species", zone, species.len()));
    println!("{}", "═".repeat(40).dimmed());
    for s in species {
        let zone_name = s.zone.map(|z| z.to_string()).unwrap_or_else(|| "any".into());
        println!(
            "  {:<24} {:<10} {:<12} {:<6} {}",
            s.display_name.bold(),
            s.rarity,
            zone_name,
            affinity(s.time_of_day),
            s.motion_pattern.to_string().dimmed()
        );
        let mut needs = Vec::new();
        if !s.required_plants.is_empty() {
            needs.push(s.required_plants.join("/"));
        }
        if s.required_water_tiles > 0 {
            needs.push(format!("{} water tiles", s.required_water_tiles));
        }
        if let Some(stage) = s.min_decomposition_stage() {
            needs.push(format!("log stage {}", stage));
        }
        if s.requires_heated_stone {
            needs.push("warm stone".into());
        }
        if s.requires_uv_lamp {
            needs.push("UV lamp".into());
        }
        if !needs.is_empty() {
            println!("    {} {}", "needs".dimmed(), needs.join(", "));
        }
    }
    Ok(())
}

fn list_plants(zone: Option<ZoneType>) -> Result<()> {
    let catalog = PlantCatalog::builtin().context("Failed to load plant catalog")?;
    let plants: Vec<_> = match zone {
        Some(z) => catalog.in_zone(z).collect(),
        None => catalog.iter().collect(),
    };

    println!("{}", heading("Plants", zone, plants.len()));
    println!("{}", "═".repeat(40).dimmed());
    println!(
        "  {:<22} {:>5} {:>6} {:>7} {:>6}",
        "", "seed", "yield", "cycles", "slots"
    );
    for p in plants {
        let night = if p.night_blooming { " ☾" } else { "" };
        println!(
            "  {:<22} {:>5} {:>6} {:>7} {:>6}{}",
            p.display_name.bold(),
            p.seed_cost,
            p.nectar_yield.to_string().yellow(),
            p.growth_cycles,
            p.insect_slots,
            night
        );
    }
    Ok(())
}

fn heading(what: &str, zone: Option<ZoneType>, count: usize) -> String {
    let title = match zone {
        Some(z) => format!("{} of {} ({})", what, z, count),
        None => format!("{} ({})", what, count),
    };
    title.white().bold().to_string()
}

fn affinity(time: DayAffinity) -> &'static str {
    match time {
        DayAffinity::Day => "day",
        DayAffinity::Night => "night",
        DayAffinity::Both => "any",
    }
}
