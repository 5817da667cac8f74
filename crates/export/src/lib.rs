//! Export helpers for mission log JSON and firing sheet CSV artifacts.

pub mod log {
    use std::fs::{self, File};
    use std::io::{BufReader, BufWriter, Write};
    use std::path::Path;

    use chrono::{DateTime, Utc};
    use mortar_fire::{GunOutcome, MissionResult, MissionType, Solution};
    use mortar_grid::GridCoordinate;
    use serde::{Deserialize, Serialize};
    use thiserror::Error;

    #[derive(Debug, Error)]
    pub enum LogError {
        #[error("I/O error: {0}")]
        Io(#[from] std::io::Error),
        #[error("serialization error: {0}")]
        Json(#[from] serde_json::Error),
        #[error("mission log has {len} entries, cannot remove entry {index}")]
        IndexOutOfRange { index: usize, len: usize },
    }

    /// Laying data as stored in the log.
    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    pub struct SolutionRecord {
        pub charge: u8,
        pub elevation_mils: f64,
        pub time_of_flight_s: f64,
        pub dispersion_m: f64,
    }

    impl From<&Solution> for SolutionRecord {
        fn from(solution: &Solution) -> Self {
            Self {
                charge: solution.charge,
                elevation_mils: solution.elevation_mils,
                time_of_flight_s: solution.time_of_flight_s,
                dispersion_m: solution.dispersion_m,
            }
        }
    }

    /// One gun's line in a logged mission. Failed guns keep only `error`.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct GunRecord {
        pub callsign: String,
        pub gun_grid: String,
        pub gun_elevation_m: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub target_grid: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub azimuth_mils: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub distance_m: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub elevation_delta_m: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub least_tof: Option<SolutionRecord>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub most_tof: Option<SolutionRecord>,
        #[serde(default)]
        pub danger_close: bool,
        #[serde(default)]
        pub unreliable_correction: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub error: Option<String>,
    }

    impl From<&GunOutcome> for GunRecord {
        fn from(outcome: &GunOutcome) -> Self {
            match outcome {
                Ok(solved) => {
                    let safety = solved.safety.unwrap_or_default();
                    Self {
                        callsign: solved.gun.callsign.clone(),
                        gun_grid: grid_string(&solved.gun.coordinates),
                        gun_elevation_m: solved.gun.elevation_m,
                        target_grid: Some(grid_string(&solved.target.coordinates)),
                        azimuth_mils: Some(solved.geometry.azimuth_mils),
                        distance_m: Some(solved.geometry.distance_m),
                        elevation_delta_m: Some(solved.geometry.elevation_delta_m),
                        least_tof: Some((&solved.least_tof).into()),
                        most_tof: Some((&solved.most_tof).into()),
                        danger_close: safety.danger_close,
                        unreliable_correction: safety.unreliable_correction,
                        error: None,
                    }
                }
                Err(failure) => Self {
                    callsign: failure.gun.callsign.clone(),
                    gun_grid: grid_string(&failure.gun.coordinates),
                    gun_elevation_m: failure.gun.elevation_m,
                    target_grid: None,
                    azimuth_mils: None,
                    distance_m: None,
                    elevation_delta_m: None,
                    least_tof: None,
                    most_tof: None,
                    danger_close: false,
                    unreliable_correction: false,
                    error: Some(failure.error.to_string()),
                },
            }
        }
    }

    /// A logged fire mission.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct MissionRecord {
        pub target_name: String,
        pub logged_at: DateTime<Utc>,
        pub mission_type: MissionType,
        pub ammunition: String,
        pub target_grid: String,
        pub target_elevation_m: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub observer_grid: Option<String>,
        pub guns: Vec<GunRecord>,
    }

    impl MissionRecord {
        /// Capture a solved mission, stamped with the current time.
        pub fn from_result(target_name: &str, ammunition: &str, result: &MissionResult) -> Self {
            Self {
                target_name: target_name.to_string(),
                logged_at: Utc::now(),
                mission_type: result.mission_type,
                ammunition: ammunition.to_string(),
                target_grid: grid_string(&result.target.coordinates),
                target_elevation_m: result.target.elevation_m,
                observer_grid: result.observer.as_ref().map(grid_string),
                guns: result.guns.iter().map(GunRecord::from).collect(),
            }
        }
    }

    fn grid_string(coordinate: &GridCoordinate) -> String {
        mortar_grid::format(coordinate, mortar_grid::AXIS_WIDTH)
    }

    /// Read every logged mission; a missing file is an empty log.
    pub fn read_log(path: &Path) -> Result<Vec<MissionRecord>, LogError> {
        if !path.exists() {
            return Ok(Vec::new());
        }
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    /// Replace the log with `records`, creating parent directories as needed.
    pub fn write_log(path: &Path, records: &[MissionRecord]) -> Result<(), LogError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, records)?;
        writer.flush()?;
        Ok(())
    }

    /// Append one mission and return the new number of entries.
    pub fn append_record(path: &Path, record: MissionRecord) -> Result<usize, LogError> {
        let mut records = read_log(path)?;
        records.push(record);
        write_log(path, &records)?;
        Ok(records.len())
    }

    /// Delete the entry at `index` and return it.
    pub fn remove_record(path: &Path, index: usize) -> Result<MissionRecord, LogError> {
        let mut records = read_log(path)?;
        if index >= records.len() {
            return Err(LogError::IndexOutOfRange {
                index,
                len: records.len(),
            });
        }
        let removed = records.remove(index);
        write_log(path, &records)?;
        Ok(removed)
    }
}

pub mod sheet {
    use std::fs::{self, File};
    use std::io::{self, BufWriter, Write};
    use std::path::Path;

    use mortar_fire::{GunOutcome, MissionResult};

    const HEADER: [&str; 18] = [
        "target",
        "callsign",
        "gun_grid",
        "target_grid",
        "azimuth_mils",
        "distance_m",
        "elevation_delta_m",
        "least_charge",
        "least_elevation_mils",
        "least_tof_s",
        "least_dispersion_m",
        "most_charge",
        "most_elevation_mils",
        "most_tof_s",
        "most_dispersion_m",
        "danger_close",
        "unreliable_correction",
        "error",
    ];

    /// Create a writer for the target path, handling stdout (`-`) by convention.
    pub fn writer_for_path(path: &Path) -> io::Result<Box<dyn Write>> {
        if path == Path::new("-") {
            return Ok(Box::new(BufWriter::new(io::stdout())));
        }
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = File::create(path)?;
        Ok(Box::new(BufWriter::new(file)))
    }

    /// Write the firing sheet CSV header.
    pub fn write_header<W: Write>(writer: &mut csv::Writer<W>) -> csv::Result<()> {
        writer.write_record(HEADER)
    }

    /// Fields of one gun outcome, matching the header ordering.
    pub fn row(target_name: &str, outcome: &GunOutcome) -> Vec<String> {
        match outcome {
            Ok(solved) => {
                let safety = solved.safety.unwrap_or_default();
                vec![
                    target_name.to_string(),
                    solved.gun.callsign.clone(),
                    solved.gun.coordinates.to_string(),
                    solved.target.coordinates.to_string(),
                    format!("{:.0}", solved.geometry.azimuth_mils),
                    format!("{:.1}", solved.geometry.distance_m),
                    format!("{:.1}", solved.geometry.elevation_delta_m),
                    solved.least_tof.charge.to_string(),
                    format!("{:.1}", solved.least_tof.elevation_mils),
                    format!("{:.1}", solved.least_tof.time_of_flight_s),
                    format!("{:.1}", solved.least_tof.dispersion_m),
                    solved.most_tof.charge.to_string(),
                    format!("{:.1}", solved.most_tof.elevation_mils),
                    format!("{:.1}", solved.most_tof.time_of_flight_s),
                    format!("{:.1}", solved.most_tof.dispersion_m),
                    safety.danger_close.to_string(),
                    safety.unreliable_correction.to_string(),
                    String::new(),
                ]
            }
            Err(failure) => {
                let mut fields = vec![String::new(); HEADER.len()];
                fields[0] = target_name.to_string();
                fields[1] = failure.gun.callsign.clone();
                fields[2] = failure.gun.coordinates.to_string();
                fields[15] = false.to_string();
                fields[16] = false.to_string();
                fields[17] = failure.error.to_string();
                fields
            }
        }
    }

    /// Serialize one gun outcome.
    pub fn write_row<W: Write>(
        writer: &mut csv::Writer<W>,
        target_name: &str,
        outcome: &GunOutcome,
    ) -> csv::Result<()> {
        writer.write_record(row(target_name, outcome))
    }

    /// Write a complete sheet (header plus one row per gun) for a mission.
    pub fn write_sheet(path: &Path, target_name: &str, result: &MissionResult) -> csv::Result<()> {
        write_missions(path, [(target_name, result)])
    }

    /// Write one sheet covering several missions, in the order given.
    pub fn write_missions<'a, I>(path: &Path, missions: I) -> csv::Result<()>
    where
        I: IntoIterator<Item = (&'a str, &'a MissionResult)>,
    {
        let mut writer = csv::Writer::from_writer(writer_for_path(path)?);
        write_header(&mut writer)?;
        for (target_name, result) in missions {
            for outcome in &result.guns {
                write_row(&mut writer, target_name, outcome)?;
            }
        }
        writer.flush()?;
        Ok(())
    }
}
