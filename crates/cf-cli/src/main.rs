//! Headless driver for the Critterfarm simulation.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "critterfarm",
    about = "Critterfarm: a real-time farm and creature simulation",
    version,
    propagate_version = true
)]
struct Cli {
    /// Save file to read and write
    #[arg(short, long, global = true, default_value = "critterfarm.json")]
    save: PathBuf,

    /// TOML configuration file (defaults are used for missing keys)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a new farm and write it to the save file
    New {
        /// RNG seed for world generation
        #[arg(long)]
        seed: Option<u64>,

        /// Overwrite an existing save
        #[arg(short, long)]
        force: bool,
    },

    /// Run the simulation forward and save the result
    Simulate {
        /// Simulated seconds to run
        #[arg(long, default_value = "600")]
        seconds: f64,

        /// Seconds per step
        #[arg(long, default_value = "1.0")]
        step: f64,

        /// Count days as this many simulated seconds instead of by the wall clock
        #[arg(long)]
        day_length: Option<f64>,

        /// Show every event instead of a summary
        #[arg(short, long)]
        verbose: bool,
    },

    /// Show the farm: player, buildings, and creatures
    Status,

    /// Place a building
    Place {
        /// Building kind (e.g. coop, stable, farm_area)
        kind: String,

        /// Center x coordinate
        #[arg(long, allow_negative_numbers = true)]
        x: f64,

        /// Center y coordinate
        #[arg(long, allow_negative_numbers = true)]
        y: f64,

        /// Rotation in degrees: 0, 90, 180 or 270
        #[arg(short, long, default_value = "0")]
        rotation: u32,
    },

    /// Craft a recipe
    Craft {
        /// Recipe id; omit to list recipes
        recipe: Option<String>,
    },
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let cli = Cli::parse();
    let save = cli.save.as_path();

    let result = commands::load_config(cli.config.as_deref()).and_then(|config| match cli.command {
        Commands::New { seed, force } => commands::new::run(save, config, seed, force),
        Commands::Simulate {
            seconds,
            step,
            day_length,
            verbose,
        } => commands::simulate::run(save, config, seconds, step, day_length, verbose),
        Commands::Status => commands::status::run(save, config),
        Commands::Place {
            kind,
            x,
            y,
            rotation,
        } => commands::place::run(save, config, &kind, x, y, rotation),
        Commands::Craft { recipe } => commands::craft::run(save, config, recipe.as_deref()),
    });

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
