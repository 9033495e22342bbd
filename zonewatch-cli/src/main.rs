//! ZoneWatch CLI - Command-line interface
//!
//! Runs the geofence HTTP service, inspects the zone catalog, replays
//! simulated fleets and manages the configuration file.

mod commands;
mod error;
mod runner;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use commands::config::ConfigCommands;
use commands::simulate::SimulateArgs;
use error::CliError;
use runner::CliRunner;

#[derive(Debug, Parser)]
#[command(name = "zonewatch", version, about = "Geofence enter/exit tracking for vehicle fleets")]
struct Cli {
    /// Configuration file (defaults to $ZONEWATCH_CONFIG or the user config dir)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the HTTP service until Ctrl-C
    Serve {
        /// Listen address (overrides server.bind)
        #[arg(long)]
        bind: Option<SocketAddr>,
    },

    /// List the configured zones in match order
    Zones,

    /// Great-circle distance between two points in kilometers
    Distance {
        #[arg(allow_negative_numbers = true)]
        lat1: f64,
        #[arg(allow_negative_numbers = true)]
        lon1: f64,
        #[arg(allow_negative_numbers = true)]
        lat2: f64,
        #[arg(allow_negative_numbers = true)]
        lon2: f64,
    },

    /// Show which zone contains a point
    Locate {
        #[arg(allow_negative_numbers = true)]
        lat: f64,
        #[arg(allow_negative_numbers = true)]
        lon: f64,
    },

    /// Drive simulated vehicles through the tracker
    Simulate {
        /// Number of vehicles
        #[arg(long, default_value_t = 5)]
        vehicles: usize,

        /// Number of steps per vehicle
        #[arg(long, default_value_t = 100)]
        steps: usize,

        /// Delay between steps in milliseconds
        #[arg(long, default_value_t = 0)]
        interval_ms: u64,

        /// Random seed for a reproducible run
        #[arg(long)]
        seed: Option<u64>,
    },

    /// View or modify configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config_path = cli.config.unwrap_or_else(zonewatch::config::config_file_path);
    let runner = || CliRunner::new(&config_path, cli.verbose);

    match cli.command {
        // Config edits the file directly and never needs logging
        Commands::Config { command } => commands::config::run(command, &config_path),
        Commands::Distance {
            lat1,
            lon1,
            lat2,
            lon2,
        } => commands::distance::run(lat1, lon1, lat2, lon2),
        Commands::Serve { bind } => commands::serve::run(&runner()?, bind),
        Commands::Zones => commands::zones::run(&runner()?),
        Commands::Locate { lat, lon } => commands::locate::run(&runner()?, lat, lon),
        Commands::Simulate {
            vehicles,
            steps,
            interval_ms,
            seed,
        } => commands::simulate::run(
            &runner()?,
            SimulateArgs {
                vehicles,
                steps,
                interval_ms,
                seed,
            },
        ),
    }
}
