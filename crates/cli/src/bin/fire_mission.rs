use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, anyhow, bail};
use clap::{Parser, ValueEnum};
use mortar_calculator::config::{load_ammunition, load_safety, load_trps};
use mortar_calculator::export::log::{MissionRecord, append_record};
use mortar_calculator::export::sheet;
use mortar_calculator::fire::ammunition::build_catalog;
use mortar_calculator::fire::safety::limits_from_config;
use mortar_calculator::fire::trp;
use mortar_calculator::fire::{
    GunInput, MissionResult, MissionTask, MissionType, MissionWorker, SafetyLimits, TargetInput,
};
use mortar_calculator::grid;
use tracing::info;
use tracing_subscriber::prelude::*;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Fire mission calculator: laying data for every gun of a mortar section"
)]
struct Cli {
    /// Ammunition catalog (directory of TOML files, one TOML file, or a YAML list)
    #[arg(long, default_value = "configs/ammunition")]
    catalog: PathBuf,

    /// Safety limits file (lane width, danger-close margin); defaults to 100 m each
    #[arg(long)]
    safety: Option<PathBuf>,

    /// Ammunition family name (case-insensitive)
    #[arg(long, default_value = "M821")]
    ammunition: String,

    /// Mission type
    #[arg(long, value_enum, default_value_t = MissionKind::Regular)]
    mission: MissionKind,

    /// Gun as CALLSIGN:GRID:ELEVATION (repeat for every gun; the first anchors a creeping barrage)
    #[arg(long = "gun", value_parser = parse_gun, required = true)]
    guns: Vec<GunInput>,

    /// Observer grid (8 or 10 digits)
    #[arg(long, conflicts_with = "target_grid")]
    fo_grid: Option<String>,

    /// Observer elevation in metres
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    fo_elevation: f64,

    /// Observer-to-target azimuth in degrees
    #[arg(long)]
    azimuth: Option<f64>,

    /// Observer-to-target distance in metres
    #[arg(long)]
    distance: Option<f64>,

    /// Target height above the observer in metres
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    elevation_delta: f64,

    /// Lateral correction in metres (negative left, positive right)
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    left_right: f64,

    /// Range correction in metres (negative drop, positive add)
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    add_drop: f64,

    /// Target grid (8 or 10 digits), instead of an observer report
    #[arg(long)]
    target_grid: Option<String>,

    /// Target reference points to fire in one batch (YAML list or TOML `[[trp]]` tables)
    #[arg(long, conflicts_with_all = ["target_grid", "fo_grid"])]
    trp_file: Option<PathBuf>,

    /// Target elevation in metres (grid missions)
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    target_elevation: f64,

    /// Bearing along which a creeping barrage walks, degrees
    #[arg(long, default_value_t = 0.0)]
    creep_direction: f64,

    /// Charge of the spotting round, used to judge whether the correction matters
    #[arg(long)]
    spotting_charge: Option<u8>,

    /// Acknowledge a danger-close solution and print it
    #[arg(long, default_value_t = false)]
    confirm_danger_close: bool,

    /// Skip the danger-close confirmation entirely
    #[arg(long, default_value_t = false)]
    disable_danger_close: bool,

    /// Print the mission as JSON instead of a table
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Append the solved mission to this JSON log
    #[arg(long)]
    log: Option<PathBuf>,

    /// Name recorded in the mission log
    #[arg(long, default_value = "Target")]
    target_name: String,

    /// Write a CSV firing sheet (use '-' for stdout)
    #[arg(long)]
    sheet: Option<PathBuf>,
}

#[derive(Copy, Clone, ValueEnum, Debug)]
enum MissionKind {
    Regular,
    SmallBarrage,
    LargeBarrage,
    CreepingBarrage,
}

impl From<MissionKind> for MissionType {
    fn from(kind: MissionKind) -> Self {
        match kind {
            MissionKind::Regular => MissionType::Regular,
            MissionKind::SmallBarrage => MissionType::SmallBarrage,
            MissionKind::LargeBarrage => MissionType::LargeBarrage,
            MissionKind::CreepingBarrage => MissionType::CreepingBarrage,
        }
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let configs = load_ammunition(&cli.catalog)
        .with_context(|| format!("loading ammunition from {}", cli.catalog.display()))?;
    let catalog = build_catalog(&configs)?;
    info!(families = catalog.len(), path = %cli.catalog.display(), "ammunition catalog loaded");
    let limits = match &cli.safety {
        Some(path) => limits_from_config(
            &load_safety(path)
                .with_context(|| format!("loading safety limits from {}", path.display()))?,
        ),
        None => SafetyLimits::default(),
    };

    let missions = match &cli.trp_file {
        Some(path) => {
            let points = load_trps(path).with_context(|| {
                format!("loading target reference points from {}", path.display())
            })?;
            let Some(first) = points.first() else {
                bail!("{} lists no target reference points", path.display());
            };
            let template = mission_task(
                &cli,
                TargetInput::Grid {
                    grid: first.grid.clone(),
                    elevation_m: first.elevation_m,
                },
            );
            trp::tasks(&template, &points)
        }
        None => vec![(cli.target_name.clone(), mission_task(&cli, target_input(&cli)?))],
    };
    let batch = cli.trp_file.is_some();

    let mut worker = MissionWorker::spawn(Arc::new(catalog), limits)?;
    for (_, task) in &missions {
        worker.submit(task.clone())?;
    }
    let mut solved = Vec::with_capacity(missions.len());
    for (name, _) in missions {
        let outcome = worker.recv()?;
        match outcome.result {
            Ok(result) => solved.push((name, result)),
            Err(err) if batch => eprintln!("[{name}] not solved: {err}"),
            Err(err) => return Err(err.into()),
        }
    }
    worker.shutdown()?;
    if solved.is_empty() {
        bail!("no target reference point could be solved");
    }

    let danger_close = solved.iter().any(|(_, result)| result.requires_confirmation());
    if danger_close && !cli.confirm_danger_close && !cli.disable_danger_close {
        let withheld: Vec<&str> = solved
            .iter()
            .flat_map(|(_, result)| result.solutions())
            .filter(|solution| solution.safety.is_some_and(|s| s.danger_close))
            .map(|solution| solution.gun.callsign.as_str())
            .collect();
        eprintln!("DANGER CLOSE: impact area of {} reaches the observer", withheld.join(", "));
        bail!("solution withheld; rerun with --confirm-danger-close to display it");
    }

    let records: Vec<MissionRecord> = solved
        .iter()
        .map(|(name, result)| MissionRecord::from_result(name, &cli.ammunition, result))
        .collect();
    if cli.json {
        match records.as_slice() {
            [record] if !batch => println!("{}", serde_json::to_string_pretty(record)?),
            _ => println!("{}", serde_json::to_string_pretty(&records)?),
        }
    } else {
        for (name, result) in &solved {
            if batch {
                println!("### {name}");
            }
            print_mission(&cli, result);
            println!();
        }
    }

    if let Some(path) = &cli.sheet {
        sheet::write_missions(path, solved.iter().map(|(name, result)| (name.as_str(), result)))?;
    }
    if let Some(path) = &cli.log {
        let mut entries = 0;
        for record in records {
            entries = append_record(path, record)?;
        }
        eprintln!("[log] {} ({} missions)", path.display(), entries);
    }

    Ok(())
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn parse_gun(value: &str) -> Result<GunInput, String> {
    let mut parts = value.splitn(3, ':');
    let (Some(callsign), Some(grid_ref)) = (parts.next(), parts.next()) else {
        return Err(format!("expected CALLSIGN:GRID[:ELEVATION], got `{value}`"));
    };
    if callsign.trim().is_empty() {
        return Err("gun callsign is empty".to_string());
    }
    grid::parse_any(grid_ref).map_err(|err| err.to_string())?;
    let elevation_m = match parts.next() {
        Some(raw) => raw
            .trim()
            .parse::<f64>()
            .map_err(|_| format!("invalid gun elevation `{raw}`"))?,
        None => 0.0,
    };
    Ok(GunInput {
        callsign: callsign.trim().to_string(),
        grid: grid_ref.to_string(),
        elevation_m,
    })
}

fn mission_task(cli: &Cli, target: TargetInput) -> MissionTask {
    MissionTask {
        mission_type: cli.mission.into(),
        ammunition: cli.ammunition.clone(),
        creep_direction_deg: cli.creep_direction,
        spotting_charge: cli.spotting_charge,
        guns: cli.guns.clone(),
        target,
    }
}

fn target_input(cli: &Cli) -> anyhow::Result<TargetInput> {
    if let Some(grid_ref) = &cli.target_grid {
        return Ok(TargetInput::Grid {
            grid: grid_ref.clone(),
            elevation_m: cli.target_elevation,
        });
    }
    let fo_grid = cli
        .fo_grid
        .clone()
        .ok_or_else(|| anyhow!("either --target-grid or --fo-grid is required"))?;
    let (Some(azimuth_deg), Some(distance_m)) = (cli.azimuth, cli.distance) else {
        bail!("observer missions need --azimuth and --distance");
    };
    Ok(TargetInput::Polar {
        fo_grid,
        fo_elevation_m: cli.fo_elevation,
        azimuth_deg,
        distance_m,
        elevation_delta_m: cli.elevation_delta,
        correction_left_right_m: cli.left_right,
        correction_add_drop_m: cli.add_drop,
    })
}

fn print_mission(cli: &Cli, result: &MissionResult) {
    println!("=== Fire Mission: {} ===", result.mission_type);
    println!("Ammunition : {}", cli.ammunition);
    println!(
        "Target     : {} (elevation {:.1} m)",
        result.target.coordinates, result.target.elevation_m
    );
    if let Some(observer) = &result.observer {
        println!("Observer   : {}", observer);
    }

    for outcome in &result.guns {
        match outcome {
            Ok(solved) => {
                println!("\n[{}] {}", solved.gun.callsign, solved.gun.coordinates);
                if solved.target != result.target {
                    println!("  Aim point  : {}", solved.target.coordinates);
                }
                println!(
                    "  Azimuth    : {:.0} mils   Distance: {:.1} m   Height: {:+.1} m",
                    solved.geometry.azimuth_mils,
                    solved.geometry.distance_m,
                    solved.geometry.elevation_delta_m
                );
                let options = [
                    ("Least TOF", &solved.least_tof),
                    ("Most TOF", &solved.most_tof),
                ];
                for (label, solution) in options {
                    println!(
                        "  {:<10} : charge {} | elevation {:.1} mils | TOF {:.1} s | dispersion {:.0} m",
                        label,
                        solution.charge,
                        solution.elevation_mils,
                        solution.time_of_flight_s,
                        solution.dispersion_m
                    );
                }
                if let Some(safety) = solved.safety {
                    if safety.danger_close && !cli.disable_danger_close {
                        println!("  ! DANGER CLOSE");
                    }
                    if safety.unreliable_correction {
                        println!("  ! Target on gun-observer axis: corrections unreliable");
                    }
                    if safety.correction_within_dispersion {
                        println!("  ! Correction within spotting round dispersion");
                    }
                }
            }
            Err(failure) => {
                println!("\n[{}] {}", failure.gun.callsign, failure.gun.coordinates);
                println!("  cannot engage: {}", failure.error);
            }
        }
    }
}
