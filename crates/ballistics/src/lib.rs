//! Tabulated ballistics: per-charge range tables and the firing solution solver.

pub mod catalog;
pub mod solver;
pub mod table;

pub use catalog::AmmunitionCatalog;
pub use solver::{Solution, find_valid_solutions};
pub use table::{AmmunitionFamily, Charge, ChargeTable, RangeSample, TableError};
