//! Range card: every charge of one ammunition family that reaches a given distance.

use std::path::PathBuf;

use anyhow::{anyhow, bail};
use clap::Parser;
use mortar_calculator::ballistics::find_valid_solutions;
use mortar_calculator::config::load_ammunition;
use mortar_calculator::fire::ammunition::build_catalog;
use tracing::debug;
use tracing_subscriber::prelude::*;

#[derive(Parser, Debug)]
#[command(author, version, about = "List valid charges for a distance and height difference")]
struct Cli {
    /// Ammunition catalog (directory of TOML files, one TOML file, or a YAML list)
    #[arg(long, default_value = "configs/ammunition")]
    catalog: PathBuf,

    /// Ammunition family name (case-insensitive)
    #[arg(long, default_value = "M821")]
    ammunition: String,

    /// Gun-to-target horizontal distance in metres
    #[arg(long)]
    distance: f64,

    /// Target height above the gun in metres
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    elevation_delta: f64,

    /// Print solutions as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let catalog = build_catalog(&load_ammunition(&cli.catalog)?)?;
    let family = catalog.get(&cli.ammunition).ok_or_else(|| {
        anyhow!(
            "ammunition `{}` not found (available: {})",
            cli.ammunition,
            catalog.names().join(", ")
        )
    })?;

    let solutions = find_valid_solutions(&family, cli.distance, cli.elevation_delta);
    debug!(family = family.name(), valid = solutions.len(), "range card computed");
    if solutions.is_empty() {
        bail!("no charge of {} reaches {:.1} m", family.name(), cli.distance);
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&solutions)?);
        return Ok(());
    }

    println!(
        "=== {} at {:.1} m (height {:+.1} m) ===",
        family.name(),
        cli.distance,
        cli.elevation_delta
    );
    println!("Charge | Elevation (mils) | TOF (s) | Dispersion (m)");
    for solution in &solutions {
        println!(
            "{:>6} | {:>16.1} | {:>7.1} | {:>14.0}",
            solution.charge,
            solution.elevation_mils,
            solution.time_of_flight_s,
            solution.dispersion_m
        );
    }
    Ok(())
}
