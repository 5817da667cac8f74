//! Planar geometry between gun, forward observer, and target.

pub mod safety;

use mortar_core::units::{normalize_mils, rad_to_mils};
use mortar_core::vector;
use mortar_grid::GridCoordinate;
use serde::{Deserialize, Serialize};

pub use safety::{SafetyLimits, correction_within_dispersion, is_danger_close, is_on_mortar_fo_axis};

/// Laying geometry from one gun to its aiming point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FiringGeometry {
    /// Horizontal gun-to-target distance (m).
    pub distance_m: f64,
    /// Target elevation minus gun elevation (m).
    pub elevation_delta_m: f64,
    /// Gun-to-target azimuth in `[0, 6400)` mils.
    pub azimuth_mils: f64,
}

impl FiringGeometry {
    pub fn between(
        gun: &GridCoordinate,
        gun_elevation_m: f64,
        target: &GridCoordinate,
        target_elevation_m: f64,
    ) -> Self {
        let delta = vector::sub(&target.as_vector(), &gun.as_vector());
        Self {
            distance_m: vector::norm(&delta),
            elevation_delta_m: target_elevation_m - gun_elevation_m,
            azimuth_mils: bearing_mils(gun, target),
        }
    }
}

/// Compass bearing from `from` to `to` in `[0, 6400)` mils.
pub fn bearing_mils(from: &GridCoordinate, to: &GridCoordinate) -> f64 {
    let delta = vector::sub(&to.as_vector(), &from.as_vector());
    normalize_mils(rad_to_mils(delta[0].atan2(delta[1])))
}
