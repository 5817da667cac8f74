mod common;

use std::fs;

use common::shipped_configs;
use mortar_calculator::config::{
    AmmunitionConfig, ChargeConfig, RangeSampleConfig, TrpConfig, load_ammunition, load_safety,
    load_trps,
};
use mortar_calculator::fire::ammunition::{AmmunitionError, build_catalog, from_config};
use mortar_calculator::fire::safety::limits_from_config;
use mortar_calculator::fire::trp;
use mortar_calculator::fire::{GunInput, MissionTask, MissionType, TargetInput};

#[test]
fn shipped_catalog_loads_in_file_order() {
    let configs = load_ammunition(shipped_configs().join("ammunition")).expect("catalog");
    let names: Vec<&str> = configs.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["M821", "O-832"]);

    let catalog = build_catalog(&configs).expect("valid tables");
    assert_eq!(catalog.len(), 2);
    let m821 = catalog.get("m821").expect("case-insensitive lookup");
    assert_eq!(m821.charges().count(), 5);
    assert_eq!(m821.dispersion_m(3), Some(40.0));
    assert!(catalog.get("o-832").is_some());
}

#[test]
fn shipped_safety_limits_match_defaults() {
    let safety = load_safety(shipped_configs().join("safety.toml")).expect("safety");
    let limits = limits_from_config(&safety);
    assert_eq!(limits.lane_width_m, 100.0);
    assert_eq!(limits.danger_close_margin_m, 100.0);
}

#[test]
fn yaml_catalog_and_partial_safety_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let catalog_path = dir.path().join("ammo.yaml");
    fs::write(
        &catalog_path,
        r#"
- name: Practice
  charges:
    - charge: 0
      dispersion_m: 15.0
      ranges:
        - { range_m: 100.0, elevation_mils: 1500.0, time_of_flight_s: 14.0, elevation_sensitivity: 20.0 }
        - { range_m: 400.0, elevation_mils: 1300.0, time_of_flight_s: 13.0, elevation_sensitivity: 25.0 }
"#,
    )
    .expect("write yaml");
    let configs = load_ammunition(&catalog_path).expect("yaml catalog");
    assert_eq!(configs.len(), 1);
    assert!(configs[0].description.is_none());
    let family = from_config(&configs[0]).expect("family");
    assert_eq!(family.name(), "Practice");
    assert!(family.charge(0).expect("charge 0").brackets(250.0));

    let safety_path = dir.path().join("safety.yaml");
    fs::write(&safety_path, "lane_width_m: 60.0\n").expect("write safety");
    let safety = load_safety(&safety_path).expect("safety");
    assert_eq!(safety.lane_width_m, 60.0);
    assert_eq!(safety.danger_close_margin_m, 100.0);
}

fn config(name: &str, charges: Vec<ChargeConfig>) -> AmmunitionConfig {
    AmmunitionConfig {
        name: name.to_string(),
        description: None,
        charges,
    }
}

fn charge(charge: u8, ranges: &[f64]) -> ChargeConfig {
    ChargeConfig {
        charge,
        dispersion_m: 10.0,
        ranges: ranges
            .iter()
            .map(|range_m| RangeSampleConfig {
                range_m: *range_m,
                elevation_mils: 1500.0 - range_m / 10.0,
                time_of_flight_s: 20.0,
                elevation_sensitivity: 10.0,
            })
            .collect(),
    }
}

#[test]
fn catalog_building_rejects_inconsistent_data() {
    assert!(matches!(build_catalog(&[]), Err(AmmunitionError::EmptyCatalog)));

    let duplicate_family = [
        config("A", vec![charge(1, &[100.0, 200.0])]),
        config("a", vec![charge(1, &[100.0, 200.0])]),
    ];
    assert!(matches!(
        build_catalog(&duplicate_family),
        Err(AmmunitionError::DuplicateFamily(name)) if name == "a"
    ));

    let duplicate_charge = config(
        "B",
        vec![charge(1, &[100.0, 200.0]), charge(1, &[300.0, 400.0])],
    );
    assert!(matches!(
        from_config(&duplicate_charge),
        Err(AmmunitionError::DuplicateCharge { charge: 1, .. })
    ));

    let short_table = config("C", vec![charge(2, &[100.0])]);
    assert!(matches!(
        from_config(&short_table),
        Err(AmmunitionError::Table(_))
    ));
    assert!(matches!(
        from_config(&config("D", Vec::new())),
        Err(AmmunitionError::Table(_))
    ));
}

#[test]
fn shipped_trps_load_from_toml_tables() {
    let points = load_trps(shipped_configs().join("trps.toml")).expect("trps");
    assert_eq!(points.len(), 3);
    assert_eq!(points[0].name, "TRP 1 Crossroads");
    assert_eq!(points[1].grid, "0120 0180");
    assert_eq!(points[2].elevation_m, -5.0);
}

#[test]
fn yaml_trps_default_their_elevation() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("trps.yaml");
    fs::write(&path, "- { name: Hill, grid: \"0100 0200\" }\n").expect("write trps");
    assert_eq!(
        load_trps(&path).expect("trps"),
        vec![TrpConfig {
            name: "Hill".to_string(),
            grid: "0100 0200".to_string(),
            elevation_m: 0.0,
        }]
    );
}

#[test]
fn trp_tasks_share_guns_and_replace_the_target() {
    let template = MissionTask {
        mission_type: MissionType::LargeBarrage,
        ammunition: "TEST".to_string(),
        creep_direction_deg: 0.0,
        spotting_charge: None,
        guns: vec![GunInput {
            callsign: "Alpha".to_string(),
            grid: "0100001000".to_string(),
            elevation_m: 5.0,
        }],
        target: TargetInput::Grid {
            grid: "0000000000".to_string(),
            elevation_m: 0.0,
        },
    };
    let points = vec![
        TrpConfig {
            name: "One".to_string(),
            grid: "0100 0200".to_string(),
            elevation_m: 12.0,
        },
        TrpConfig {
            name: "Two".to_string(),
            grid: "0090002100".to_string(),
            elevation_m: 0.0,
        },
    ];

    let tasks = trp::tasks(&template, &points);
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0].0, "One");
    assert_eq!(
        tasks[0].1.target,
        TargetInput::Grid {
            grid: "0100 0200".to_string(),
            elevation_m: 12.0,
        }
    );
    assert_eq!(tasks[1].0, "Two");
    assert!(tasks.iter().all(|(_, task)| task.guns == template.guns
        && task.mission_type == MissionType::LargeBarrage));
}
