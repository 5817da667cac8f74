//! Target resolution from observer reports.

use mortar_core::units::deg_to_rad;
use mortar_core::vector::{self, Vector2};
use mortar_grid::GridCoordinate;

use super::{FireMissionSpec, Target};

/// Sign pairs `(left_right, add_drop)` tried when applying a correction, in priority order.
const CORRECTION_SIGNS: [(f64, f64); 4] = [(1.0, 1.0), (-1.0, 1.0), (1.0, -1.0), (-1.0, -1.0)];

/// A candidate must be closer than the current best by more than this to replace it (m).
const TIE_TOLERANCE_M: f64 = 1e-9;

/// Resolve the single aiming point for a mission.
pub fn resolve_target(spec: &FireMissionSpec) -> Target {
    match *spec {
        FireMissionSpec::Grid {
            target_coordinates,
            target_elevation_m,
        } => Target {
            coordinates: target_coordinates,
            elevation_m: target_elevation_m,
        },
        FireMissionSpec::Polar {
            fo_coordinates,
            fo_elevation_m,
            azimuth_deg,
            distance_m,
            elevation_delta_m,
            correction_left_right_m,
            correction_add_drop_m,
        } => {
            let uncorrected = polar_target(&fo_coordinates, azimuth_deg, distance_m);
            Target {
                coordinates: apply_correction(
                    &uncorrected,
                    azimuth_deg,
                    correction_left_right_m,
                    correction_add_drop_m,
                ),
                elevation_m: fo_elevation_m + elevation_delta_m,
            }
        }
    }
}

/// Point `distance_m` from the observer along `azimuth_deg` (clockwise from north).
pub fn polar_target(fo: &GridCoordinate, azimuth_deg: f64, distance_m: f64) -> GridCoordinate {
    fo.offset(azimuth_deg, distance_m)
}

/// Every point an adjustment could denote, in [`CORRECTION_SIGNS`] order.
///
/// Add/drop runs along the observer's line of sight and left/right perpendicular
/// to it (line of sight rotated +90°).
pub fn correction_candidates(
    uncorrected: &GridCoordinate,
    azimuth_deg: f64,
    correction_left_right_m: f64,
    correction_add_drop_m: f64,
) -> [GridCoordinate; 4] {
    let azimuth_rad = deg_to_rad(azimuth_deg);
    let along = vector::from_bearing(azimuth_rad);
    let right = vector::from_bearing(azimuth_rad + std::f64::consts::FRAC_PI_2);
    let origin = uncorrected.as_vector();

    CORRECTION_SIGNS.map(|(lr_sign, ad_sign)| {
        let shift: Vector2 = vector::add(
            &vector::scale(&right, lr_sign * correction_left_right_m),
            &vector::scale(&along, ad_sign * correction_add_drop_m),
        );
        GridCoordinate::from_vector(vector::add(&origin, &shift))
    })
}

/// Apply an observer adjustment to the uncorrected target.
///
/// The candidate nearest the uncorrected point wins. The four candidates are
/// equidistant in exact arithmetic, so ties (within [`TIE_TOLERANCE_M`]) keep the
/// first one, which is the adjustment exactly as signed by the caller.
pub fn apply_correction(
    uncorrected: &GridCoordinate,
    azimuth_deg: f64,
    correction_left_right_m: f64,
    correction_add_drop_m: f64,
) -> GridCoordinate {
    if correction_left_right_m == 0.0 && correction_add_drop_m == 0.0 {
        return *uncorrected;
    }

    let candidates = correction_candidates(
        uncorrected,
        azimuth_deg,
        correction_left_right_m,
        correction_add_drop_m,
    );

    let mut best = candidates[0];
    let mut best_distance = uncorrected.distance_to(&best);
    for candidate in &candidates[1..] {
        let distance = uncorrected.distance_to(candidate);
        if distance < best_distance - TIE_TOLERANCE_M {
            best = *candidate;
            best_distance = distance;
        }
    }
    best
}
