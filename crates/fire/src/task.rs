//! Raw mission input as entered by an operator, before grids are parsed.

use mortar_ballistics::{AmmunitionCatalog, Charge};
use mortar_geometry::SafetyLimits;
use mortar_grid::parse_any;
use serde::{Deserialize, Serialize};

use crate::mission::{
    FireMissionSpec, Gun, MissionError, MissionRequest, MissionResult, MissionType, solve_mission,
};

/// A gun position as typed in, grid still a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GunInput {
    pub callsign: String,
    pub grid: String,
    pub elevation_m: f64,
}

/// Target as reported by the observer or read off the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum TargetInput {
    Polar {
        fo_grid: String,
        fo_elevation_m: f64,
        azimuth_deg: f64,
        distance_m: f64,
        #[serde(default)]
        elevation_delta_m: f64,
        #[serde(default)]
        correction_left_right_m: f64,
        #[serde(default)]
        correction_add_drop_m: f64,
    },
    Grid {
        grid: String,
        elevation_m: f64,
    },
}

/// One "calculate" request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionTask {
    pub mission_type: MissionType,
    pub ammunition: String,
    #[serde(default)]
    pub creep_direction_deg: f64,
    #[serde(default)]
    pub spotting_charge: Option<Charge>,
    pub guns: Vec<GunInput>,
    pub target: TargetInput,
}

impl GunInput {
    fn parse(&self) -> Result<Gun, MissionError> {
        Ok(Gun {
            callsign: self.callsign.clone(),
            coordinates: parse_any(&self.grid)?,
            elevation_m: self.elevation_m,
        })
    }
}

impl TargetInput {
    fn parse(&self) -> Result<FireMissionSpec, MissionError> {
        let spec = match self {
            TargetInput::Polar {
                fo_grid,
                fo_elevation_m,
                azimuth_deg,
                distance_m,
                elevation_delta_m,
                correction_left_right_m,
                correction_add_drop_m,
            } => FireMissionSpec::Polar {
                fo_coordinates: parse_any(fo_grid)?,
                fo_elevation_m: *fo_elevation_m,
                azimuth_deg: *azimuth_deg,
                distance_m: *distance_m,
                elevation_delta_m: *elevation_delta_m,
                correction_left_right_m: *correction_left_right_m,
                correction_add_drop_m: *correction_add_drop_m,
            },
            TargetInput::Grid { grid, elevation_m } => FireMissionSpec::Grid {
                target_coordinates: parse_any(grid)?,
                target_elevation_m: *elevation_m,
            },
        };
        Ok(spec)
    }
}

impl MissionTask {
    /// Parse grids and select the ammunition family.
    pub fn into_request(
        self,
        catalog: &AmmunitionCatalog,
        limits: SafetyLimits,
    ) -> Result<MissionRequest, MissionError> {
        let ammunition = catalog
            .get(&self.ammunition)
            .ok_or_else(|| MissionError::UnknownAmmunition(self.ammunition.clone()))?;
        let guns = self
            .guns
            .iter()
            .map(GunInput::parse)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(MissionRequest {
            mission_type: self.mission_type,
            guns,
            spec: self.target.parse()?,
            ammunition,
            creep_direction_deg: self.creep_direction_deg,
            spotting_charge: self.spotting_charge,
            limits,
        })
    }
}

/// Parse, dispatch, and solve a task in one call.
pub fn solve_task(
    task: MissionTask,
    catalog: &AmmunitionCatalog,
    limits: SafetyLimits,
) -> Result<MissionResult, MissionError> {
    let request = task.into_request(catalog, limits)?;
    solve_mission(&request)
}
