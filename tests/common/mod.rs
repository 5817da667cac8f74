//! Range-table fixtures shared by the integration tests.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use mortar_calculator::ballistics::{AmmunitionCatalog, AmmunitionFamily, ChargeTable, RangeSample};
use mortar_calculator::fire::{FireMissionSpec, Gun, MissionRequest, MissionType, SafetyLimits};
use mortar_calculator::grid::GridCoordinate;

pub const EPS: f64 = 1e-9;

pub fn sample(
    elevation_mils: f64,
    time_of_flight_s: f64,
    elevation_sensitivity: f64,
) -> RangeSample {
    RangeSample {
        elevation_mils,
        time_of_flight_s,
        elevation_sensitivity,
    }
}

/// Two charges overlapping between 1000 m and 1500 m.
///
/// At 1000 m charge 1 gives 1200 mils / 19 s / 15 mils per 100 m and charge 2
/// gives 1300 mils / 30 s / 8 mils per 100 m.
pub fn test_family() -> AmmunitionFamily {
    let mut charges = BTreeMap::new();
    charges.insert(
        1,
        ChargeTable::new(
            vec![
                (500.0, sample(1400.0, 20.0, 10.0)),
                (1500.0, sample(1000.0, 18.0, 20.0)),
            ],
            20.0,
        )
        .expect("charge 1"),
    );
    charges.insert(
        2,
        ChargeTable::new(
            vec![
                (1000.0, sample(1300.0, 30.0, 8.0)),
                (2000.0, sample(1100.0, 28.0, 12.0)),
            ],
            40.0,
        )
        .expect("charge 2"),
    );
    AmmunitionFamily::new("TEST", charges).expect("family")
}

pub fn test_catalog() -> AmmunitionCatalog {
    std::iter::once(test_family()).collect()
}

pub fn gun(callsign: &str, easting: f64, northing: f64) -> Gun {
    Gun {
        callsign: callsign.to_string(),
        coordinates: GridCoordinate::new(easting, northing),
        elevation_m: 0.0,
    }
}

pub fn grid_spec(easting: f64, northing: f64, elevation_m: f64) -> FireMissionSpec {
    FireMissionSpec::Grid {
        target_coordinates: GridCoordinate::new(easting, northing),
        target_elevation_m: elevation_m,
    }
}

pub fn request(mission_type: MissionType, guns: Vec<Gun>, spec: FireMissionSpec) -> MissionRequest {
    MissionRequest {
        mission_type,
        guns,
        spec,
        ammunition: Arc::new(test_family()),
        creep_direction_deg: 0.0,
        spotting_charge: None,
        limits: SafetyLimits::default(),
    }
}

pub fn shipped_configs() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("configs")
}

pub fn assert_close(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() < tolerance,
        "expected {expected}, got {actual}"
    );
}
