//! CycloFlow CLI
//!
//! Plans bike itineraries, finds parking and checks the bike-carriage policy.
//! Results are printed to stdout as JSON; logs go to stderr.

#![allow(clippy::print_stdout)]

mod commands;

use std::path::PathBuf;

use anyhow::Context;
use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};
use domain::{ParkingFilter, parse_compact_local};
use infrastructure::{AppConfig, init_tracing};

/// CycloFlow CLI
#[derive(Debug, Parser)]
#[command(name = "cycloflow-cli")]
#[command(author, version, about = "Bike + transit itinerary planner", long_about = None)]
struct Cli {
    /// Verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Configuration file (defaults to ./config.toml when present)
    #[arg(short, long, env = "CYCLOFLOW_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Plan a door-to-door itinerary
    ///
    /// Example: cycloflow-cli plan "Châtelet, Paris" "La Défense" --parking casier --forecast
    Plan {
        /// Departure address
        from: String,

        /// Arrival address
        to: String,

        /// Stop at the nearest facility of this kind and walk the rest
        /// (privee_abris, clientele_abris, casier, surveille, default)
        #[arg(short, long, value_parser = parse_filter)]
        parking: Option<ParkingFilter>,

        /// Local travel instant (2025-11-12T08:30, 2025-11-12 08:30 or 20251112T083000)
        #[arg(short, long, value_parser = parse_local_instant)]
        at: Option<NaiveDateTime>,

        /// Treat --at as the arrival time
        #[arg(long, requires = "at")]
        arrive_by: bool,

        /// Take a bike-friendly train for part of the trip
        #[arg(short, long)]
        transit: bool,

        /// Attach the weather forecast
        #[arg(short, long)]
        forecast: bool,

        /// Cyclist profile passed to the bike router
        #[arg(long, default_value = application::DEFAULT_BIKE_PROFILE)]
        profile: String,
    },

    /// Find the nearest bike parking to an address
    NearestParking {
        /// Address to search around
        address: String,

        /// Kind of facility
        #[arg(short, long, value_parser = parse_filter, default_value = "default")]
        filter: ParkingFilter,
    },

    /// Check whether bikes may board trains at an instant
    BikeAllowed {
        /// Local instant; now when omitted
        #[arg(short, long, value_parser = parse_local_instant)]
        at: Option<NaiveDateTime>,
    },

    /// List the parking filters
    Filters,
}

/// Log filter override from verbosity count; `None` keeps the configured level
const fn log_filter_from_verbosity(verbose: u8) -> Option<&'static str> {
    match verbose {
        0 => None,
        1 => Some("info"),
        2 => Some("debug"),
        _ => Some("trace"),
    }
}

fn parse_filter(value: &str) -> Result<ParkingFilter, String> {
    value.parse().map_err(|e: domain::DomainError| e.to_string())
}

fn parse_local_instant(value: &str) -> Result<NaiveDateTime, String> {
    const FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ];

    let value = value.trim();
    FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map_or_else(
            || parse_compact_local(value).map_err(|e| e.to_string()),
            Ok,
        )
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_from(cli.config.as_deref())
        .context("Failed to load configuration")?;
    if let Some(level) = log_filter_from_verbosity(cli.verbose) {
        config.logging = config.logging.with_level(level);
    }
    init_tracing(&config.logging)?;

    if let Err(problems) = config.validate() {
        anyhow::bail!("Invalid configuration:\n{problems}");
    }

    let output = match cli.command {
        Commands::Plan {
            from,
            to,
            parking,
            at,
            arrive_by,
            transit,
            forecast,
            profile,
        } => {
            let options = commands::PlanOptions {
                parking,
                at,
                arrive_by,
                transit,
                forecast,
                profile,
            };
            commands::plan(&config, from, to, options).await?
        },
        Commands::NearestParking { address, filter } => {
            commands::nearest_parking(&config, &address, filter).await?
        },
        Commands::BikeAllowed { at } => commands::bike_allowed(&config, at)?,
        Commands::Filters => commands::filters()?,
    };

    println!("{output}");
    Ok(())
}
