//! Board model: the grid, its walls and everything standing on it.

pub mod entity;
pub mod model;

pub use entity::{Crew, Hazard, PoiFate, PoiKind, PointOfInterest, PoiSnapshot, RetiredPoi};
pub use model::Board;
