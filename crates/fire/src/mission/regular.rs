//! Regular mission: fastest charge plus the slowest charge that differs from it.

use mortar_ballistics::Solution;

use super::{GunOutcome, MissionRequest, Target, solve_each};

pub(crate) fn solve(request: &MissionRequest, target: &Target) -> Vec<GunOutcome> {
    solve_each(request, target, least_and_most_tof)
}

/// Sort by time of flight and pick `(least_tof, most_tof)`.
///
/// `most_tof` is the slowest solution whose charge differs from the fastest
/// one, falling back to the fastest solution when every option shares its charge.
pub fn least_and_most_tof(mut solutions: Vec<Solution>) -> Option<(Solution, Solution)> {
    solutions.sort_by(|a, b| a.time_of_flight_s.total_cmp(&b.time_of_flight_s));
    let least = *solutions.first()?;
    let most = solutions
        .iter()
        .rev()
        .find(|solution| solution.charge != least.charge)
        .copied()
        .unwrap_or(least);
    Some((least, most))
}
