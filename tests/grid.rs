use mortar_calculator::grid::{
    self, EIGHT_DIGIT, GridCoordinate, GridError, TEN_DIGIT, normalize_10_digit, parse, parse_any,
};

#[test]
fn eight_digit_grid_scales_to_ten_metre_resolution() {
    let coordinate = parse("12345678", EIGHT_DIGIT).expect("valid grid");
    assert_eq!(coordinate, GridCoordinate::new(12_340.0, 56_780.0));
}

#[test]
fn ten_digit_grid_is_metre_resolution() {
    let coordinate = parse("1234567890", TEN_DIGIT).expect("valid grid");
    assert_eq!(coordinate, GridCoordinate::new(12_345.0, 67_890.0));
}

#[test]
fn whitespace_is_ignored() {
    let spaced = parse(" 1234 5678 ", EIGHT_DIGIT).expect("spaced grid");
    let tabbed = parse("12345\t67890", TEN_DIGIT).expect("tabbed grid");
    assert_eq!(spaced, GridCoordinate::new(12_340.0, 56_780.0));
    assert_eq!(tabbed, GridCoordinate::new(12_345.0, 67_890.0));
}

#[test]
fn wrong_length_reports_expected_and_found() {
    let err = parse("1234567", EIGHT_DIGIT).unwrap_err();
    assert_eq!(
        err,
        GridError::InvalidLength {
            input: "1234567".to_string(),
            expected: 8,
            found: 7,
        }
    );
}

#[test]
fn non_digits_are_rejected() {
    assert!(matches!(
        parse("1234a678", EIGHT_DIGIT),
        Err(GridError::InvalidDigits { .. })
    ));
    assert!(matches!(
        parse("-123456789", TEN_DIGIT),
        Err(GridError::InvalidDigits { .. })
    ));
}

#[test]
fn only_eight_and_ten_digit_precision_exist() {
    assert_eq!(
        parse("123456", 6).unwrap_err(),
        GridError::UnsupportedPrecision(6)
    );
}

#[test]
fn parse_any_picks_precision_from_length() {
    assert_eq!(
        parse_any("0123 4567").expect("8 digit"),
        GridCoordinate::new(1_230.0, 45_670.0)
    );
    assert_eq!(
        parse_any("01234 56789").expect("10 digit"),
        GridCoordinate::new(1_234.0, 56_789.0)
    );
    match parse_any("123456789") {
        Err(GridError::InvalidLength {
            expected, found, ..
        }) => {
            assert_eq!(expected, 10);
            assert_eq!(found, 9);
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn format_pads_and_rounds_half_to_even() {
    assert_eq!(
        grid::format(&GridCoordinate::new(1_234.0, 700.0), 5),
        "01234 00700"
    );
    assert_eq!(
        grid::format(&GridCoordinate::new(12_345.5, 12_344.5), 5),
        "12346 12344"
    );
    assert_eq!(grid::format(&GridCoordinate::new(12.0, 34.0), 4), "0012 0034");
}

#[test]
fn format_wraps_points_outside_the_square() {
    let south_west = GridCoordinate::new(-100.0, -0.4);
    let rendered = grid::format(&south_west, 5);
    assert_eq!(rendered, "99900 00000");
    assert_eq!(
        grid::parse_any(&rendered).expect("reparse"),
        GridCoordinate::new(99_900.0, 0.0)
    );
    assert_eq!(
        grid::format(&GridCoordinate::new(100_250.0, -1.0), 5),
        "00250 99999"
    );
}

#[test]
fn display_and_from_str_agree() {
    let coordinate: GridCoordinate = "0100002000".parse().expect("parse");
    assert_eq!(coordinate.to_string(), "01000 02000");
    let back: GridCoordinate = coordinate.to_string().parse().expect("reparse");
    assert_eq!(back, coordinate);
}

#[test]
fn normalisation_promotes_eight_digit_grids() {
    assert_eq!(normalize_10_digit("1234 5678").unwrap(), "1234056780");
    assert_eq!(normalize_10_digit("12345 67890").unwrap(), "1234567890");
    assert!(matches!(
        normalize_10_digit("123"),
        Err(GridError::InvalidLength { found: 3, .. })
    ));
}

#[test]
fn offset_follows_compass_bearings() {
    let origin = GridCoordinate::new(1_000.0, 1_000.0);
    let north = origin.offset(0.0, 100.0);
    let east = origin.offset(90.0, 100.0);
    let south_west = origin.offset(225.0, 2.0_f64.sqrt() * 100.0);

    assert!((north.easting - 1_000.0).abs() < 1e-9 && (north.northing - 1_100.0).abs() < 1e-9);
    assert!((east.easting - 1_100.0).abs() < 1e-9 && (east.northing - 1_000.0).abs() < 1e-9);
    assert!((south_west.easting - 900.0).abs() < 1e-9);
    assert!((south_west.northing - 900.0).abs() < 1e-9);
    assert!((origin.distance_to(&east) - 100.0).abs() < 1e-9);
}
