//! Mortar fire-mission calculator.
//!
//! The solver logic lives in the member crates; this crate re-exports them so
//! front-ends (the CLI today) and the integration tests share one entry point.

pub use mortar_ballistics as ballistics;
pub use mortar_config as config;
pub use mortar_core as core;
pub use mortar_export as export;
pub use mortar_fire as fire;
pub use mortar_geometry as geometry;
pub use mortar_grid as grid;

/// Returns the version of the library for smoke tests.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
