//! Fire mission façade crate: resolves targets, dispatches missions, and hosts the solver worker.

pub mod mission;
pub mod task;
pub mod worker;

pub use facade::*;
pub use mortar_ballistics as ballistics;
pub use mortar_geometry as geometry;
pub use mortar_grid as grid;

mod facade;
