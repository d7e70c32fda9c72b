//! Verdant CLI — run the garden headless, inspect catalogs and zones.

mod commands;
mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use verdant::prelude::ZoneType;

#[derive(Parser)]
#[command(name = "verdant")]
#[command(author, version, about = "Verdant - a garden that insects choose to visit", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default verdant.toml
    Init {
        /// Project directory (default: current directory)
        #[arg(short, long)]
        path: Option<String>,
    },

    /// Plant a starter bed and simulate it
    Simulate {
        /// Real-time seconds to simulate (default: from config)
        #[arg(short, long)]
        seconds: Option<f64>,

        /// Game speed multiplier (default: from config)
        #[arg(long)]
        speed: Option<f64>,

        /// Random seed (default: from config)
        #[arg(long)]
        seed: Option<u64>,

        /// Config file to use instead of the discovered verdant.toml
        #[arg(short, long)]
        config: Option<String>,

        /// Harvest idle blooms every game-hour
        #[arg(long)]
        harvest: bool,

        /// Photograph every capturable visitor
        #[arg(long)]
        photograph: bool,

        /// Print the final snapshot as JSON
        #[arg(long)]
        json: bool,
    },

    /// List species (or plants) in the builtin catalog
    Catalog {
        /// Only entries native to this zone (e.g. "starter", "deep_wood")
        #[arg(short, long)]
        zone: Option<ZoneType>,

        /// List plants instead of species
        #[arg(long)]
        plants: bool,
    },

    /// Show zone layouts, unlock costs and expansion tiers
    Zones,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Init { path } => commands::init::run(path),
        Commands::Simulate {
            seconds,
            speed,
            seed,
            config,
            harvest,
            photograph,
            json,
        } => commands::simulate::run(commands::simulate::SimulateArgs {
            seconds,
            speed,
            seed,
            config,
            harvest,
            photograph,
            json,
            verbose: cli.verbose,
        }),
        Commands::Catalog { zone, plants } => commands::catalog::run(zone, plants),
        Commands::Zones => commands::zones::run(),
    }
}
