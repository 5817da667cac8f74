//! Mission dispatcher that turns guns, a target, and an ammunition family into per-gun laying data.
//!
//! The target is resolved once per mission. Each mission type then reduces the
//! valid solutions of every gun to the one or two options it reports, in the
//! order the guns were supplied.

pub mod barrage;
pub mod creeping;
pub mod regular;
pub mod target;

use std::fmt;
use std::sync::Arc;

use mortar_ballistics::{AmmunitionFamily, Charge, Solution, find_valid_solutions};
use mortar_geometry::{
    FiringGeometry, SafetyLimits, correction_within_dispersion, is_danger_close,
    is_on_mortar_fo_axis,
};
use mortar_grid::{GridCoordinate, GridError};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

pub use target::resolve_target;

/// A firing unit taking part in the mission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gun {
    pub callsign: String,
    pub coordinates: GridCoordinate,
    pub elevation_m: f64,
}

/// Resolved aiming point shared by every gun (creeping barrages offset it per gun).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub coordinates: GridCoordinate,
    pub elevation_m: f64,
}

/// How the target was reported.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FireMissionSpec {
    /// Observer position plus bearing, distance, height difference, and adjustments.
    Polar {
        fo_coordinates: GridCoordinate,
        fo_elevation_m: f64,
        azimuth_deg: f64,
        distance_m: f64,
        elevation_delta_m: f64,
        /// Negative is left, positive is right.
        correction_left_right_m: f64,
        /// Negative is drop, positive is add.
        correction_add_drop_m: f64,
    },
    /// Direct grid reference; no observer is known.
    Grid {
        target_coordinates: GridCoordinate,
        target_elevation_m: f64,
    },
}

impl FireMissionSpec {
    /// Observer position, when the mission came from an observer report.
    pub fn observer(&self) -> Option<GridCoordinate> {
        match self {
            FireMissionSpec::Polar { fo_coordinates, .. } => Some(*fo_coordinates),
            FireMissionSpec::Grid { .. } => None,
        }
    }
}

/// Closed set of mission shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MissionType {
    Regular,
    SmallBarrage,
    LargeBarrage,
    CreepingBarrage,
}

impl fmt::Display for MissionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MissionType::Regular => "Regular",
            MissionType::SmallBarrage => "Small Barrage",
            MissionType::LargeBarrage => "Large Barrage",
            MissionType::CreepingBarrage => "Creeping Barrage",
        };
        f.write_str(label)
    }
}

/// Everything needed to solve one mission.
#[derive(Debug, Clone)]
pub struct MissionRequest {
    pub mission_type: MissionType,
    pub guns: Vec<Gun>,
    pub spec: FireMissionSpec,
    pub ammunition: Arc<AmmunitionFamily>,
    /// Bearing along which a creeping barrage walks, degrees from north.
    pub creep_direction_deg: f64,
    /// Charge of the spotting round, used to judge whether a correction is worth applying.
    pub spotting_charge: Option<Charge>,
    pub limits: SafetyLimits,
}

/// Observer safety findings for one gun.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SafetyAssessment {
    /// Target sits between this gun and the FO, so adjustments are unreliable.
    pub unreliable_correction: bool,
    /// Impact area reaches the FO.
    pub danger_close: bool,
    /// The adjustment is smaller than the spotting round's dispersion.
    pub correction_within_dispersion: bool,
}

/// Laying data reported for one gun.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GunSolution {
    pub gun: Gun,
    pub target: Target,
    pub geometry: FiringGeometry,
    pub least_tof: Solution,
    pub most_tof: Solution,
    /// `None` for grid missions, where no observer is known.
    pub safety: Option<SafetyAssessment>,
}

/// A gun that could not engage, and why.
#[derive(Debug, Clone, PartialEq)]
pub struct GunFailure {
    pub gun: Gun,
    pub error: MissionError,
}

/// Per-gun result; a failure affects only that gun.
pub type GunOutcome = Result<GunSolution, GunFailure>;

/// Mission output ordered exactly as the guns were supplied.
#[derive(Debug, Clone)]
pub struct MissionResult {
    pub mission_type: MissionType,
    pub target: Target,
    pub observer: Option<GridCoordinate>,
    pub guns: Vec<GunOutcome>,
}

impl MissionResult {
    /// Guns that produced laying data.
    pub fn solutions(&self) -> impl Iterator<Item = &GunSolution> {
        self.guns.iter().filter_map(|outcome| outcome.as_ref().ok())
    }

    /// Per-gun failures.
    pub fn failures(&self) -> impl Iterator<Item = &GunFailure> {
        self.guns.iter().filter_map(|outcome| outcome.as_ref().err())
    }

    /// Any gun is danger close, so the solution must be confirmed before display.
    pub fn requires_confirmation(&self) -> bool {
        self.solutions()
            .any(|solution| solution.safety.is_some_and(|s| s.danger_close))
    }
}

/// Mission planning errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MissionError {
    #[error("invalid grid: {0}")]
    Grid(#[from] GridError),
    #[error("no valid charges for this range (gun {gun})")]
    NoValidSolution { gun: String },
    #[error("gun {gun} cannot fire the anchor charge {charge} at its barrage point")]
    NoMatchingCharge { gun: String, charge: Charge },
    #[error("mission needs at least {required} guns, {supplied} supplied")]
    PreconditionFailed { required: usize, supplied: usize },
    #[error("mission has no guns")]
    NoGuns,
    #[error("ammunition `{0}` not found in catalog")]
    UnknownAmmunition(String),
    #[error("internal solver failure: {0}")]
    Internal(String),
}

/// Solve a mission, dispatching on its type.
///
/// Mission-wide problems (no guns, too few guns for a creeping barrage, an
/// anchor gun without any solution) return `Err`. Guns that cannot engage are
/// reported inside the result, except when the mission has a single gun, in
/// which case its failure is the mission's failure.
pub fn solve_mission(request: &MissionRequest) -> Result<MissionResult, MissionError> {
    if request.guns.is_empty() {
        return Err(MissionError::NoGuns);
    }

    let target = resolve_target(&request.spec);
    let guns = match request.mission_type {
        MissionType::Regular => regular::solve(request, &target),
        MissionType::SmallBarrage => barrage::solve_small(request, &target),
        MissionType::LargeBarrage => barrage::solve_large(request, &target),
        MissionType::CreepingBarrage => creeping::solve(request, &target)?,
    };

    if let [Err(failure)] = guns.as_slice() {
        return Err(failure.error.clone());
    }

    for failure in guns.iter().filter_map(|outcome| outcome.as_ref().err()) {
        warn!(
            mission = %request.mission_type,
            gun = %failure.gun.callsign,
            error = %failure.error,
            "gun cannot engage"
        );
    }
    info!(
        mission = %request.mission_type,
        ammunition = request.ammunition.name(),
        target = %target.coordinates,
        guns = guns.len(),
        solved = guns.iter().filter(|outcome| outcome.is_ok()).count(),
        "fire mission solved"
    );

    Ok(MissionResult {
        mission_type: request.mission_type,
        target,
        observer: request.spec.observer(),
        guns,
    })
}

/// Solve one gun against `aim`, letting `select` reduce its valid solutions to `(least_tof, most_tof)`.
fn solve_gun<F>(request: &MissionRequest, gun: &Gun, aim: &Target, select: F) -> GunOutcome
where
    F: FnOnce(&Gun, Vec<Solution>) -> Result<(Solution, Solution), MissionError>,
{
    let geometry = FiringGeometry::between(
        &gun.coordinates,
        gun.elevation_m,
        &aim.coordinates,
        aim.elevation_m,
    );
    let solutions = find_valid_solutions(
        &request.ammunition,
        geometry.distance_m,
        geometry.elevation_delta_m,
    );
    let (least_tof, most_tof) = select(gun, solutions).map_err(|error| GunFailure {
        gun: gun.clone(),
        error,
    })?;

    debug!(
        gun = %gun.callsign,
        distance_m = geometry.distance_m,
        azimuth_mils = geometry.azimuth_mils,
        least_charge = least_tof.charge,
        most_charge = most_tof.charge,
        "gun solved"
    );

    Ok(GunSolution {
        gun: gun.clone(),
        target: *aim,
        geometry,
        least_tof,
        most_tof,
        safety: assess_safety(request, gun, aim, &least_tof),
    })
}

/// Solve every gun against the same aiming point with a single-choice reducer.
fn solve_each<F>(request: &MissionRequest, target: &Target, reduce: F) -> Vec<GunOutcome>
where
    F: Fn(Vec<Solution>) -> Option<(Solution, Solution)>,
{
    request
        .guns
        .iter()
        .map(|gun| {
            solve_gun(request, gun, target, |gun, solutions| {
                reduce(solutions).ok_or_else(|| MissionError::NoValidSolution {
                    gun: gun.callsign.clone(),
                })
            })
        })
        .collect()
}

fn assess_safety(
    request: &MissionRequest,
    gun: &Gun,
    aim: &Target,
    least_tof: &Solution,
) -> Option<SafetyAssessment> {
    let FireMissionSpec::Polar {
        fo_coordinates,
        correction_left_right_m,
        correction_add_drop_m,
        ..
    } = request.spec
    else {
        return None;
    };

    let correction_within = request
        .spotting_charge
        .and_then(|charge| request.ammunition.dispersion_m(charge))
        .is_some_and(|dispersion| {
            correction_within_dispersion(correction_left_right_m, correction_add_drop_m, dispersion)
        });

    Some(SafetyAssessment {
        unreliable_correction: is_on_mortar_fo_axis(
            &gun.coordinates,
            &fo_coordinates,
            &aim.coordinates,
            request.limits.lane_width_m,
        ),
        danger_close: is_danger_close(
            &fo_coordinates,
            &aim.coordinates,
            least_tof.dispersion_m,
            request.limits.danger_close_margin_m,
        ),
        correction_within_dispersion: correction_within,
    })
}
