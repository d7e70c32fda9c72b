//! Show the zone table.

use anyhow::{Context, Result};
use colored::Colorize;
use verdant::prelude::*;

use crate::config::Config;

pub fn run() -> Result<()> {
    let zones = ZoneTable::builtin().context("Failed to load zone table")?;
    let base_cap = Config::load()?.garden.spawn.base_insect_cap;

    println!("{}", "Zones".white().bold());
    println!("{}", "═".repeat(40).dimmed());

    for def in zones.iter() {
        println!();
        println!("{} {}", def.name.blue().bold(), format!("({})", def.zone).dimmed());
        if def.unlock_cost == 0 && def.journal_required == 0 {
            println!("  Unlock:   {}", "free".green());
        } else {
            println!(
                "  Unlock:   {} nectar, {} species in the journal",
                def.unlock_cost.to_string().yellow(),
                def.journal_required
            );
        }
        println!(
            "  Size:     {}x{}, up to {} insects",
            def.width,
            def.height,
            def.insect_cap(0, base_cap)
        );

        let fixtures = [
            ("water", def.water_tiles.len()),
            ("logs", def.log_tiles.len()),
            ("stones", def.stone_tiles.len()),
            ("lamps", def.lamp_tiles.len()),
        ];
        let listed: Vec<String> = fixtures
            .iter()
            .filter(|(_, n)| *n > 0)
            .map(|(name, n)| format!("{} {}", n, name))
            .collect();
        if !listed.is_empty() {
            println!("  Fixtures: {}", listed.join(", "));
        }

        for (i, tier) in def.expansions.iter().enumerate() {
            println!(
                "  Tier {}:   {} {}x{} for {} nectar, cap {}",
                i + 1,
                tier.name,
                tier.width,
                tier.height,
                tier.nectar_cost.to_string().yellow(),
                def.insect_cap(i + 1, base_cap)
            );
        }
    }

    Ok(())
}
