//! Map grid codec: 8- and 10-digit numeric grid references to metre coordinates and back.
//!
//! An 8-digit grid (`EEEENNNN`) has 10 m precision and is promoted to metres by
//! multiplying each half by ten. A 10-digit grid (`EEEEENNNNN`) is already in metres.

use std::fmt;
use std::str::FromStr;

use mortar_core::units::deg_to_rad;
use mortar_core::vector::{self, Vector2};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Digits in a 10 m precision grid.
pub const EIGHT_DIGIT: usize = 8;
/// Digits in a metre precision grid.
pub const TEN_DIGIT: usize = 10;
/// Width of each axis when formatting a 10-digit grid.
pub const AXIS_WIDTH: usize = 5;

/// Errors raised while decoding a grid string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("grid must be {expected} digits, got {found} in `{input}`")]
    InvalidLength {
        input: String,
        expected: usize,
        found: usize,
    },
    #[error("grid `{input}` contains non-numeric characters")]
    InvalidDigits { input: String },
    #[error("unsupported grid precision: {0} digits (expected 8 or 10)")]
    UnsupportedPrecision(usize),
}

/// A point on the map grid in metres.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GridCoordinate {
    pub easting: f64,
    pub northing: f64,
}

impl GridCoordinate {
    pub fn new(easting: f64, northing: f64) -> Self {
        Self { easting, northing }
    }

    pub fn as_vector(&self) -> Vector2 {
        [self.easting, self.northing]
    }

    pub fn from_vector(v: Vector2) -> Self {
        Self::new(v[0], v[1])
    }

    /// Move `distance_m` along a compass bearing given in degrees clockwise from north.
    pub fn offset(&self, bearing_deg: f64, distance_m: f64) -> Self {
        let step = vector::scale(&vector::from_bearing(deg_to_rad(bearing_deg)), distance_m);
        Self::from_vector(vector::add(&self.as_vector(), &step))
    }

    /// Horizontal distance to another point.
    pub fn distance_to(&self, other: &GridCoordinate) -> f64 {
        vector::norm(&vector::sub(&other.as_vector(), &self.as_vector()))
    }
}

impl fmt::Display for GridCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format(self, AXIS_WIDTH))
    }
}

impl FromStr for GridCoordinate {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_any(s)
    }
}

fn strip_whitespace(grid: &str) -> String {
    grid.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Parse a grid string of exactly `expected_length` digits (8 or 10) after whitespace removal.
pub fn parse(grid: &str, expected_length: usize) -> Result<GridCoordinate, GridError> {
    let scale = match expected_length {
        EIGHT_DIGIT => 10.0,
        TEN_DIGIT => 1.0,
        other => return Err(GridError::UnsupportedPrecision(other)),
    };

    let digits = strip_whitespace(grid);
    let found = digits.chars().count();
    if found != expected_length {
        return Err(GridError::InvalidLength {
            input: grid.to_string(),
            expected: expected_length,
            found,
        });
    }
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(GridError::InvalidDigits {
            input: grid.to_string(),
        });
    }

    let (east, north) = digits.split_at(expected_length / 2);
    let parse_half = |half: &str| {
        half.parse::<u32>()
            .map(|v| f64::from(v) * scale)
            .map_err(|_| GridError::InvalidDigits {
                input: grid.to_string(),
            })
    };

    Ok(GridCoordinate {
        easting: parse_half(east)?,
        northing: parse_half(north)?,
    })
}

/// Parse either precision, choosing 8 digits when the stripped input has 8 and 10 otherwise.
pub fn parse_any(grid: &str) -> Result<GridCoordinate, GridError> {
    if strip_whitespace(grid).chars().count() == EIGHT_DIGIT {
        parse(grid, EIGHT_DIGIT)
    } else {
        parse(grid, TEN_DIGIT)
    }
}

/// Render a coordinate as two zero-padded integers of `width` digits separated by a space.
///
/// Axes are rounded half-to-even, then wrapped into the grid square (`10^width` metres)
/// so points past its west or south edge still read back through `parse_any`.
pub fn format(coordinate: &GridCoordinate, width: usize) -> String {
    let square = 10_i64.saturating_pow(width as u32);
    let easting = (coordinate.easting.round_ties_even() as i64).rem_euclid(square);
    let northing = (coordinate.northing.round_ties_even() as i64).rem_euclid(square);
    format!("{easting:0width$} {northing:0width$}")
}

/// Canonical 10-digit form of an 8- or 10-digit grid, without whitespace.
///
/// 8-digit grids get a trailing zero on each half (`12345678` becomes `1234056780`).
pub fn normalize_10_digit(grid: &str) -> Result<String, GridError> {
    let digits = strip_whitespace(grid);
    match digits.chars().count() {
        EIGHT_DIGIT => {
            let coordinate = parse(&digits, EIGHT_DIGIT)?;
            Ok(format(&coordinate, AXIS_WIDTH).replace(' ', ""))
        }
        TEN_DIGIT => {
            parse(&digits, TEN_DIGIT)?;
            Ok(digits)
        }
        found => Err(GridError::InvalidLength {
            input: grid.to_string(),
            expected: TEN_DIGIT,
            found,
        }),
    }
}
