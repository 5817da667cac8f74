//! Range tables for one ammunition family, keyed by charge.

use std::collections::BTreeMap;

use mortar_core::interpolation::lerp;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Propellant charge ("rings") identifier.
pub type Charge = u8;

/// One row of a range table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeSample {
    pub elevation_mils: f64,
    pub time_of_flight_s: f64,
    /// Elevation change in mils per 100 m of target height above the gun.
    pub elevation_sensitivity: f64,
}

impl RangeSample {
    fn lerp(distance_m: f64, r1: f64, a: &RangeSample, r2: f64, b: &RangeSample) -> RangeSample {
        RangeSample {
            elevation_mils: lerp(distance_m, r1, a.elevation_mils, r2, b.elevation_mils),
            time_of_flight_s: lerp(distance_m, r1, a.time_of_flight_s, r2, b.time_of_flight_s),
            elevation_sensitivity: lerp(
                distance_m,
                r1,
                a.elevation_sensitivity,
                r2,
                b.elevation_sensitivity,
            ),
        }
    }

    fn is_finite(&self) -> bool {
        self.elevation_mils.is_finite()
            && self.time_of_flight_s.is_finite()
            && self.elevation_sensitivity.is_finite()
    }
}

/// Errors raised when a range table violates its invariants.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TableError {
    #[error("range table needs at least two distinct ranges, got {count}")]
    TooFewRanges { count: usize },
    #[error("range {range_m} m appears more than once")]
    DuplicateRange { range_m: f64 },
    #[error("range table contains a non-finite value at {range_m} m")]
    NonFinite { range_m: f64 },
    #[error("dispersion must be a finite, non-negative radius (got {0})")]
    InvalidDispersion(f64),
    #[error("ammunition `{name}` defines no charges")]
    EmptyFamily { name: String },
    #[error("ammunition `{name}` charge {charge}: {source}")]
    Charge {
        name: String,
        charge: Charge,
        #[source]
        source: Box<TableError>,
    },
}

/// Range samples for a single charge, sorted by range, plus its fixed dispersion radius.
#[derive(Debug, Clone, PartialEq)]
pub struct ChargeTable {
    ranges: Vec<(f64, RangeSample)>,
    dispersion_m: f64,
}

impl ChargeTable {
    /// Build a table from `(range_m, sample)` rows in any order.
    pub fn new(
        mut ranges: Vec<(f64, RangeSample)>,
        dispersion_m: f64,
    ) -> Result<Self, TableError> {
        if !dispersion_m.is_finite() || dispersion_m < 0.0 {
            return Err(TableError::InvalidDispersion(dispersion_m));
        }
        if let Some((range_m, _)) = ranges
            .iter()
            .find(|(range_m, sample)| !range_m.is_finite() || !sample.is_finite())
        {
            return Err(TableError::NonFinite { range_m: *range_m });
        }

        ranges.sort_by(|a, b| a.0.total_cmp(&b.0));
        if let Some(pair) = ranges.windows(2).find(|pair| pair[0].0 == pair[1].0) {
            return Err(TableError::DuplicateRange { range_m: pair[0].0 });
        }
        if ranges.len() < 2 {
            return Err(TableError::TooFewRanges {
                count: ranges.len(),
            });
        }

        Ok(Self {
            ranges,
            dispersion_m,
        })
    }

    pub fn dispersion_m(&self) -> f64 {
        self.dispersion_m
    }

    pub fn min_range_m(&self) -> f64 {
        self.ranges[0].0
    }

    pub fn max_range_m(&self) -> f64 {
        self.ranges[self.ranges.len() - 1].0
    }

    /// Rows in ascending range order.
    pub fn rows(&self) -> &[(f64, RangeSample)] {
        &self.ranges
    }

    /// Whether `distance_m` lies within `[min_range, max_range]`.
    pub fn brackets(&self, distance_m: f64) -> bool {
        (self.min_range_m()..=self.max_range_m()).contains(&distance_m)
    }

    /// Linearly interpolate every column at `distance_m`, or `None` outside the table.
    ///
    /// The first consecutive pair with `r1 <= distance <= r2` is used, so a
    /// distance equal to an interior key resolves to that key's sample exactly.
    pub fn interpolate(&self, distance_m: f64) -> Option<RangeSample> {
        if !self.brackets(distance_m) {
            return None;
        }
        self.ranges
            .windows(2)
            .find(|pair| pair[0].0 <= distance_m && distance_m <= pair[1].0)
            .map(|pair| {
                let (r1, a) = &pair[0];
                let (r2, b) = &pair[1];
                RangeSample::lerp(distance_m, *r1, a, *r2, b)
            })
    }
}

/// An ammunition type with one range table per charge. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct AmmunitionFamily {
    name: String,
    charges: BTreeMap<Charge, ChargeTable>,
}

impl AmmunitionFamily {
    pub fn new(
        name: impl Into<String>,
        charges: BTreeMap<Charge, ChargeTable>,
    ) -> Result<Self, TableError> {
        let name = name.into();
        if charges.is_empty() {
            return Err(TableError::EmptyFamily { name });
        }
        Ok(Self { name, charges })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn charge(&self, charge: Charge) -> Option<&ChargeTable> {
        self.charges.get(&charge)
    }

    /// Charges and their tables in ascending charge order.
    pub fn charges(&self) -> impl Iterator<Item = (Charge, &ChargeTable)> {
        self.charges.iter().map(|(charge, table)| (*charge, table))
    }

    /// Dispersion radius of `charge`, if the family defines it.
    pub fn dispersion_m(&self, charge: Charge) -> Option<f64> {
        self.charge(charge).map(ChargeTable::dispersion_m)
    }
}
