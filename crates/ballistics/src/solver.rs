//! Firing solution lookup across every charge of an ammunition family.

use mortar_core::constants::ELEVATION_SENSITIVITY_STEP_M;
use serde::{Deserialize, Serialize};

use crate::table::{AmmunitionFamily, Charge};

/// Gun laying data for one charge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    pub charge: Charge,
    pub elevation_mils: f64,
    pub time_of_flight_s: f64,
    pub dispersion_m: f64,
}

/// Every charge whose range table brackets `distance_m`, with height-corrected elevation.
///
/// `elevation_delta_m` is positive when the target sits above the gun. Charges
/// that cannot reach the distance are skipped; an empty result means no charge
/// can engage. Results come out in ascending charge order, which callers must
/// not rely on.
pub fn find_valid_solutions(
    family: &AmmunitionFamily,
    distance_m: f64,
    elevation_delta_m: f64,
) -> Vec<Solution> {
    family
        .charges()
        .filter_map(|(charge, table)| {
            let sample = table.interpolate(distance_m)?;
            let correction =
                (elevation_delta_m / ELEVATION_SENSITIVITY_STEP_M) * sample.elevation_sensitivity;
            Some(Solution {
                charge,
                elevation_mils: sample.elevation_mils + correction,
                time_of_flight_s: sample.time_of_flight_s,
                dispersion_m: table.dispersion_m(),
            })
        })
        .collect()
}
