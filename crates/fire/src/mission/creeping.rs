//! Creeping barrage: guns walk fire along a bearing, one dispersion radius apart.
//!
//! The first gun picks the anchor charge (tightest dispersion it can fire at
//! the target). Gun `i` then aims `i` anchor dispersions along the creep
//! direction and must be able to fire that same charge there.

use mortar_ballistics::{Solution, find_valid_solutions};
use mortar_core::constants::CREEPING_BARRAGE_MIN_GUNS;
use mortar_geometry::FiringGeometry;

use super::{GunOutcome, MissionError, MissionRequest, Target, solve_gun};

pub(crate) fn solve(
    request: &MissionRequest,
    target: &Target,
) -> Result<Vec<GunOutcome>, MissionError> {
    let supplied = request.guns.len();
    if supplied < CREEPING_BARRAGE_MIN_GUNS {
        return Err(MissionError::PreconditionFailed {
            required: CREEPING_BARRAGE_MIN_GUNS,
            supplied,
        });
    }

    let lead = &request.guns[0];
    let geometry = FiringGeometry::between(
        &lead.coordinates,
        lead.elevation_m,
        &target.coordinates,
        target.elevation_m,
    );
    let anchor = tightest(&find_valid_solutions(
        &request.ammunition,
        geometry.distance_m,
        geometry.elevation_delta_m,
    ))
    .ok_or_else(|| MissionError::NoValidSolution {
        gun: lead.callsign.clone(),
    })?;

    let outcomes = request
        .guns
        .iter()
        .enumerate()
        .map(|(index, gun)| {
            let aim = Target {
                coordinates: target
                    .coordinates
                    .offset(request.creep_direction_deg, index as f64 * anchor.dispersion_m),
                elevation_m: target.elevation_m,
            };
            solve_gun(request, gun, &aim, |gun, solutions| {
                solutions
                    .into_iter()
                    .find(|solution| solution.charge == anchor.charge)
                    .map(|solution| (solution, solution))
                    .ok_or_else(|| MissionError::NoMatchingCharge {
                        gun: gun.callsign.clone(),
                        charge: anchor.charge,
                    })
            })
        })
        .collect();

    Ok(outcomes)
}

/// Smallest dispersion radius; the first such solution wins a tie.
pub fn tightest(solutions: &[Solution]) -> Option<Solution> {
    solutions.iter().copied().reduce(|best, solution| {
        if solution.dispersion_m < best.dispersion_m {
            solution
        } else {
            best
        }
    })
}
