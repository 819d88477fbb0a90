//! Core engine types: coordinates, ids, configuration, counters, errors.
//!
//! Everything here is plain data with no knowledge of turns or rules. The
//! board, the state machines and the replay machinery build on top of it.

pub mod coords;
pub mod ids;
pub mod config;
pub mod counters;
pub mod error;

pub use coords::{opposite, CellPos, Direction, WallKey};
pub use ids::{CrewId, PoiId, WallId};
pub use config::{
    BoardConfig, CrewSpec, ExitSpec, HazardSpec, HazardState, PoiSpec, ReplayConfig,
    SpecialWallSpec, WallMask, DEFAULT_EGG_COUNTDOWN,
};
pub use counters::GameCounters;
pub use error::{ConfigError, Lookup, ReplayError, Severity};
