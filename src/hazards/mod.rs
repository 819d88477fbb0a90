//! Hazard propagation: egg incubation, hatching and spider explosions.

pub mod engine;

pub use engine::{ExplosionReport, HazardEngine, TickOutcome};
