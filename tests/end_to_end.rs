mod common;

use std::sync::Arc;

use common::{EPS, assert_close, shipped_configs};
use mortar_calculator::ballistics::{AmmunitionCatalog, find_valid_solutions};
use mortar_calculator::config::{load_ammunition, load_safety};
use mortar_calculator::fire::ammunition::build_catalog;
use mortar_calculator::fire::safety::limits_from_config;
use mortar_calculator::fire::{
    GunInput, MissionTask, MissionType, MissionWorker, TargetInput, solve_task,
};

fn shipped_catalog() -> AmmunitionCatalog {
    build_catalog(&load_ammunition(shipped_configs().join("ammunition")).expect("configs"))
        .expect("catalog")
}

#[test]
fn version_is_exposed() {
    assert!(!mortar_calculator::version().is_empty());
}

#[test]
fn exact_table_key_at_one_kilometre() {
    let catalog = shipped_catalog();
    let m821 = catalog.get("M821").expect("M821");
    let mut solutions = find_valid_solutions(&m821, 1_000.0, 0.0);
    solutions.sort_by_key(|s| s.charge);

    let charges: Vec<u8> = solutions.iter().map(|s| s.charge).collect();
    assert_eq!(charges, vec![1, 2, 3]);
    assert_close(solutions[0].elevation_mils, 1_240.0, EPS);
    assert_close(solutions[0].time_of_flight_s, 18.6, EPS);
    assert_close(solutions[1].elevation_mils, 1_435.0, EPS);
    assert_close(solutions[2].elevation_mils, 1_520.0, EPS);
}

#[test]
fn observer_due_north_over_the_gun() {
    let task = MissionTask {
        mission_type: MissionType::Regular,
        ammunition: "M821".to_string(),
        creep_direction_deg: 0.0,
        spotting_charge: None,
        guns: vec![GunInput {
            callsign: "Gun 1".to_string(),
            grid: "0000000000".to_string(),
            elevation_m: 100.0,
        }],
        target: TargetInput::Polar {
            fo_grid: "0000000000".to_string(),
            fo_elevation_m: 100.0,
            azimuth_deg: 0.0,
            distance_m: 1_000.0,
            elevation_delta_m: 0.0,
            correction_left_right_m: 0.0,
            correction_add_drop_m: 0.0,
        },
    };

    let result = solve_task(task, &shipped_catalog(), Default::default()).expect("mission");
    assert_eq!(result.target.coordinates.to_string(), "00000 01000");

    let solved = result.guns[0].as_ref().expect("gun solved");
    assert_close(solved.geometry.elevation_delta_m, 0.0, EPS);
    // 1000 m is a key of the charge 1 table
    assert_eq!(solved.least_tof.charge, 1);
    assert_close(solved.least_tof.elevation_mils, 1_240.0, EPS);
    assert_close(solved.least_tof.time_of_flight_s, 18.6, EPS);
    // gun and observer coincide: no axis to be on
    assert!(!solved.safety.expect("assessed").unreliable_correction);
}

#[test]
fn observer_mission_from_shipped_data() {
    let catalog = shipped_catalog();
    let limits = limits_from_config(
        &load_safety(shipped_configs().join("safety.toml")).expect("safety"),
    );
    let task = MissionTask {
        mission_type: MissionType::Regular,
        ammunition: "m821".to_string(),
        creep_direction_deg: 0.0,
        spotting_charge: Some(1),
        guns: vec![
            GunInput {
                callsign: "Gun 1".to_string(),
                grid: "0100001000".to_string(),
                elevation_m: 100.0,
            },
            GunInput {
                callsign: "Gun 2".to_string(),
                grid: "0110 0100".to_string(),
                elevation_m: 100.0,
            },
        ],
        target: TargetInput::Polar {
            fo_grid: "01000 01500".to_string(),
            fo_elevation_m: 110.0,
            azimuth_deg: 0.0,
            distance_m: 500.0,
            elevation_delta_m: -10.0,
            correction_left_right_m: 0.0,
            correction_add_drop_m: 0.0,
        },
    };

    let result = solve_task(task, &catalog, limits).expect("mission");
    assert_close(result.target.coordinates.northing, 2_000.0, 1e-6);
    assert_close(result.target.elevation_m, 100.0, EPS);

    let first = result.guns[0].as_ref().expect("gun 1");
    assert_eq!(first.least_tof.charge, 1);
    assert_eq!(first.most_tof.charge, 3);
    assert_close(first.least_tof.elevation_mils, 1_240.0, EPS);
    let safety = first.safety.expect("assessed");
    // target lies beyond the observer, so corrections are fine
    assert!(!safety.unreliable_correction);
    assert!(!safety.danger_close);
    assert!(!result.requires_confirmation());

    assert!(result.guns[1].is_ok());
}

#[test]
fn worker_solves_shipped_creeping_barrage() {
    let mut worker =
        MissionWorker::spawn(Arc::new(shipped_catalog()), Default::default()).expect("spawn");
    let guns = ["A", "B", "C"]
        .iter()
        .map(|callsign| GunInput {
            callsign: callsign.to_string(),
            grid: "0100 0100".to_string(),
            elevation_m: 0.0,
        })
        .collect();
    let id = worker
        .submit(MissionTask {
            mission_type: MissionType::CreepingBarrage,
            ammunition: "M821".to_string(),
            creep_direction_deg: 90.0,
            spotting_charge: None,
            guns,
            target: TargetInput::Grid {
                grid: "0100 0200".to_string(),
                elevation_m: 0.0,
            },
        })
        .expect("submit");

    let outcome = worker.recv().expect("outcome");
    assert_eq!(outcome.id, id);
    let result = outcome.result.expect("mission");
    // charge 1 (20 m) is the tightest charge reaching 1000 m
    for (index, gun) in result.guns.iter().enumerate() {
        let solved = gun.as_ref().expect("solved");
        assert_eq!(solved.least_tof.charge, 1);
        assert_close(
            solved.target.coordinates.easting,
            1_000.0 + 20.0 * index as f64,
            1e-6,
        );
    }
    worker.shutdown().expect("shutdown");
}
