//! Points of interest: reveal, rescue and loss.

pub mod tracker;

pub use tracker::{PoiTracker, RevealResult};
