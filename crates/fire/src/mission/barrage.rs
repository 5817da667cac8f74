//! Barrages: every gun fires one charge, chosen by time of flight.

use mortar_ballistics::Solution;

use super::{GunOutcome, MissionRequest, Target, solve_each};

pub(crate) fn solve_small(request: &MissionRequest, target: &Target) -> Vec<GunOutcome> {
    solve_each(request, target, |solutions| {
        fastest(&solutions).map(|solution| (solution, solution))
    })
}

pub(crate) fn solve_large(request: &MissionRequest, target: &Target) -> Vec<GunOutcome> {
    solve_each(request, target, |solutions| {
        slowest(&solutions).map(|solution| (solution, solution))
    })
}

/// Shortest time of flight; the first such solution wins a tie.
pub fn fastest(solutions: &[Solution]) -> Option<Solution> {
    solutions.iter().copied().reduce(|best, solution| {
        if solution.time_of_flight_s < best.time_of_flight_s {
            solution
        } else {
            best
        }
    })
}

/// Longest time of flight; the first such solution wins a tie.
pub fn slowest(solutions: &[Solution]) -> Option<Solution> {
    solutions.iter().copied().reduce(|best, solution| {
        if solution.time_of_flight_s > best.time_of_flight_s {
            solution
        } else {
            best
        }
    })
}
