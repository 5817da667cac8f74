//! Safety predicates that gate whether a solution may be shown without confirmation.

use mortar_core::constants::{DEFAULT_DANGER_CLOSE_MARGIN_M, DEFAULT_LANE_WIDTH_M};
use mortar_core::vector;
use mortar_grid::GridCoordinate;
use serde::{Deserialize, Serialize};

/// Configured thresholds for the safety predicates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SafetyLimits {
    /// Full width of the mortar-FO lane (m); a target within half of it is on axis.
    pub lane_width_m: f64,
    /// Distance added to the dispersion radius for danger close (m).
    pub danger_close_margin_m: f64,
}

impl Default for SafetyLimits {
    fn default() -> Self {
        Self {
            lane_width_m: DEFAULT_LANE_WIDTH_M,
            danger_close_margin_m: DEFAULT_DANGER_CLOSE_MARGIN_M,
        }
    }
}

/// True when the target projects strictly between mortar and FO and lies within
/// half a lane width of the line joining them.
///
/// Observer corrections along that line are unreliable. Coincident mortar and
/// FO define no line, so the check reports `false`.
pub fn is_on_mortar_fo_axis(
    mortar: &GridCoordinate,
    fo: &GridCoordinate,
    target: &GridCoordinate,
    lane_width_m: f64,
) -> bool {
    let v_mf = vector::sub(&fo.as_vector(), &mortar.as_vector());
    let v_mt = vector::sub(&target.as_vector(), &mortar.as_vector());

    let len_sq = vector::norm_sq(&v_mf);
    if len_sq == 0.0 {
        return false;
    }

    let dot = vector::dot(&v_mf, &v_mt);
    if !(0.0 < dot && dot < len_sq) {
        return false;
    }

    let perpendicular_m = vector::cross(&v_mf, &v_mt).abs() / len_sq.sqrt();
    perpendicular_m < lane_width_m / 2.0
}

/// True when the target is within `dispersion_m + margin_m` of the FO (inclusive).
pub fn is_danger_close(
    fo: &GridCoordinate,
    target: &GridCoordinate,
    dispersion_m: f64,
    margin_m: f64,
) -> bool {
    let distance_sq = vector::norm_sq(&vector::sub(&target.as_vector(), &fo.as_vector()));
    let radius = dispersion_m + margin_m;
    distance_sq <= radius * radius
}

/// True when a non-zero observer correction is no larger than the spotting round's dispersion.
pub fn correction_within_dispersion(
    correction_left_right_m: f64,
    correction_add_drop_m: f64,
    dispersion_m: f64,
) -> bool {
    let magnitude = correction_left_right_m.hypot(correction_add_drop_m);
    magnitude > 0.0 && magnitude <= dispersion_m
}
