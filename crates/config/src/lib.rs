//! Configuration models and loaders for the mortar fire calculator.

use std::fs::File;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// One ammunition family as written in a catalog file.
#[derive(Debug, Deserialize, Clone)]
pub struct AmmunitionConfig {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub charges: Vec<ChargeConfig>,
}

/// Range table and dispersion for one charge.
#[derive(Debug, Deserialize, Clone)]
pub struct ChargeConfig {
    pub charge: u8,
    pub dispersion_m: f64,
    pub ranges: Vec<RangeSampleConfig>,
}

/// A single range table row.
#[derive(Debug, Deserialize, Clone, Copy)]
pub struct RangeSampleConfig {
    pub range_m: f64,
    pub elevation_mils: f64,
    pub time_of_flight_s: f64,
    /// Mils of elevation per 100 m of target height above the gun.
    pub elevation_sensitivity: f64,
}

/// Thresholds for the observer safety checks.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct SafetyConfig {
    #[serde(default = "default_lane_width_m")]
    pub lane_width_m: f64,
    #[serde(default = "default_danger_close_margin_m")]
    pub danger_close_margin_m: f64,
}

impl Default for SafetyConfig {
    fn default() -> Self {
        Self {
            lane_width_m: default_lane_width_m(),
            danger_close_margin_m: default_danger_close_margin_m(),
        }
    }
}

/// A target reference point: a named grid fired on in batches.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct TrpConfig {
    pub name: String,
    pub grid: String,
    #[serde(default)]
    pub elevation_m: f64,
}

#[derive(Debug, Deserialize)]
struct TrpFile {
    #[serde(default)]
    trp: Vec<TrpConfig>,
}

fn default_lane_width_m() -> f64 {
    100.0
}

fn default_danger_close_margin_m() -> f64 {
    100.0
}

/// Errors that can occur while loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Load ammunition families from a directory of TOML files, one TOML file, or a YAML list.
pub fn load_ammunition<P: AsRef<Path>>(path: P) -> Result<Vec<AmmunitionConfig>, ConfigError> {
    load_records(path)
}

/// Load safety limits from a single YAML or TOML document.
pub fn load_safety<P: AsRef<Path>>(path: P) -> Result<SafetyConfig, ConfigError> {
    load_record(path)
}

/// Load target reference points from a YAML list or a TOML file of `[[trp]]` tables.
pub fn load_trps<P: AsRef<Path>>(path: P) -> Result<Vec<TrpConfig>, ConfigError> {
    let path = path.as_ref();
    if is_toml(path) {
        let file: TrpFile = load_record(path)?;
        Ok(file.trp)
    } else {
        load_record(path)
    }
}

fn is_toml(path: &Path) -> bool {
    path.extension().map(|ext| ext == "toml").unwrap_or(false)
}

fn load_record<T, P>(path: P) -> Result<T, ConfigError>
where
    T: for<'de> Deserialize<'de>,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if is_toml(path) {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    } else {
        let reader = File::open(path)?;
        Ok(serde_yaml::from_reader(reader)?)
    }
}

fn load_records<T, P>(path: P) -> Result<Vec<T>, ConfigError>
where
    T: for<'de> Deserialize<'de>,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if path.is_dir() {
        read_dir_records(path)
    } else if is_toml(path) {
        let contents = std::fs::read_to_string(path)?;
        let record: T = toml::from_str(&contents)?;
        Ok(vec![record])
    } else {
        let reader = File::open(path)?;
        Ok(serde_yaml::from_reader(reader)?)
    }
}

fn read_dir_records<T>(dir: &Path) -> Result<Vec<T>, ConfigError>
where
    T: for<'de> Deserialize<'de>,
{
    let mut records = Vec::new();
    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| is_toml(path))
        .collect();
    entries.sort();
    for path in entries {
        let contents = std::fs::read_to_string(&path)?;
        let record: T = toml::from_str(&contents)?;
        records.push(record);
    }
    Ok(records)
}
