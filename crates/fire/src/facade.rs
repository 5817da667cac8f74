//! Re-exported APIs for consumers of the fire crate.

pub use crate::mission::{
    FireMissionSpec, Gun, GunFailure, GunOutcome, GunSolution, MissionError, MissionRequest,
    MissionResult, MissionType, SafetyAssessment, Target, resolve_target, solve_mission,
};
pub use crate::task::{GunInput, MissionTask, TargetInput, solve_task};
pub use crate::worker::{MissionWorker, TaskId, TaskOutcome, WorkerError};
pub use mortar_ballistics::{AmmunitionCatalog, AmmunitionFamily, Solution};
pub use mortar_geometry::SafetyLimits;

pub mod ammunition {
    use std::collections::BTreeMap;

    use mortar_ballistics::{
        AmmunitionCatalog, AmmunitionFamily, Charge, ChargeTable, RangeSample, TableError,
    };
    use mortar_config::{AmmunitionConfig, ChargeConfig};
    use thiserror::Error;

    /// Errors surfaced when turning catalog files into ballistic tables.
    #[derive(Debug, Error)]
    pub enum AmmunitionError {
        #[error("ammunition catalog is empty")]
        EmptyCatalog,
        #[error("ammunition `{0}` is defined more than once")]
        DuplicateFamily(String),
        #[error("ammunition `{name}` defines charge {charge} more than once")]
        DuplicateCharge { name: String, charge: Charge },
        #[error(transparent)]
        Table(#[from] TableError),
    }

    fn charge_table(name: &str, config: &ChargeConfig) -> Result<ChargeTable, TableError> {
        let rows = config
            .ranges
            .iter()
            .map(|row| {
                (
                    row.range_m,
                    RangeSample {
                        elevation_mils: row.elevation_mils,
                        time_of_flight_s: row.time_of_flight_s,
                        elevation_sensitivity: row.elevation_sensitivity,
                    },
                )
            })
            .collect();
        ChargeTable::new(rows, config.dispersion_m).map_err(|source| TableError::Charge {
            name: name.to_string(),
            charge: config.charge,
            source: Box::new(source),
        })
    }

    /// Convert an `AmmunitionConfig` into a validated `AmmunitionFamily`.
    pub fn from_config(config: &AmmunitionConfig) -> Result<AmmunitionFamily, AmmunitionError> {
        let mut charges = BTreeMap::new();
        for charge in &config.charges {
            let table = charge_table(&config.name, charge)?;
            if charges.insert(charge.charge, table).is_some() {
                return Err(AmmunitionError::DuplicateCharge {
                    name: config.name.clone(),
                    charge: charge.charge,
                });
            }
        }
        Ok(AmmunitionFamily::new(config.name.clone(), charges)?)
    }

    /// Build the shared catalog from every configured family.
    pub fn build_catalog(
        configs: &[AmmunitionConfig],
    ) -> Result<AmmunitionCatalog, AmmunitionError> {
        if configs.is_empty() {
            return Err(AmmunitionError::EmptyCatalog);
        }

        let mut catalog = AmmunitionCatalog::new();
        for config in configs {
            if catalog.insert(from_config(config)?).is_some() {
                return Err(AmmunitionError::DuplicateFamily(config.name.clone()));
            }
        }
        Ok(catalog)
    }
}

pub mod safety {
    use mortar_config::SafetyConfig;
    use mortar_geometry::SafetyLimits;

    /// Convert configured thresholds into the limits used by the safety checks.
    pub fn limits_from_config(config: &SafetyConfig) -> SafetyLimits {
        SafetyLimits {
            lane_width_m: config.lane_width_m,
            danger_close_margin_m: config.danger_close_margin_m,
        }
    }
}

pub mod trp {
    use mortar_config::TrpConfig;

    use crate::task::{MissionTask, TargetInput};

    /// One grid task per target reference point, with the guns and settings of `template`.
    pub fn tasks(template: &MissionTask, points: &[TrpConfig]) -> Vec<(String, MissionTask)> {
        points
            .iter()
            .map(|point| {
                let task = MissionTask {
                    target: TargetInput::Grid {
                        grid: point.grid.clone(),
                        elevation_m: point.elevation_m,
                    },
                    ..template.clone()
                };
                (point.name.clone(), task)
            })
            .collect()
    }
}
