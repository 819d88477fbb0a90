//! Error types.
//!
//! Two families:
//! - `ConfigError`: the initial board or the event log document is malformed.
//!   Fatal, surfaces to the caller.
//! - `ReplayError`: a sub-event could not be applied. Never fatal; the
//!   sequencer turns it into a diagnostic and moves on.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::coords::{CellPos, WallKey};
use super::ids::{CrewId, PoiId};

/// Malformed board configuration or input document.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("grid dimensions must be positive, got {rows}x{cols}")]
    InvalidDimensions { rows: i32, cols: i32 },
    #[error("expected {expected} cell masks, got {actual}")]
    CellCount { expected: usize, actual: usize },
    #[error("invalid wall mask {0:?}, expected four '0'/'1' characters")]
    InvalidMask(String),
    #[error("{what} at {pos} lies outside the grid")]
    OutOfBounds { what: &'static str, pos: CellPos },
    #[error("duplicate crew id {0}")]
    DuplicateCrew(CrewId),
    #[error("duplicate POI id {0}")]
    DuplicatePoi(PoiId),
    #[error("two POIs placed on cell {0}")]
    PoiCellTaken(CellPos),
    #[error("cell {0} already holds a hazard")]
    Occupied(CellPos),
    #[error("special wall {0} is listed more than once")]
    DuplicateSpecialWall(WallKey),
    #[error("special wall {0} has health above its kind's maximum")]
    InvalidHealth(WallKey),
    #[error("malformed JSON document: {0}")]
    Json(#[from] serde_json::Error),
}

/// What a failed lookup was looking for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Lookup {
    Wall(WallKey),
    Hazard(CellPos),
    Egg(CellPos),
    Spider(CellPos),
    Poi(PoiId),
    PoiAt(CellPos),
    Crew(CrewId),
}

impl std::fmt::Display for Lookup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Lookup::Wall(key) => write!(f, "wall {}", key),
            Lookup::Hazard(pos) => write!(f, "hazard at {}", pos),
            Lookup::Egg(pos) => write!(f, "egg at {}", pos),
            Lookup::Spider(pos) => write!(f, "spider at {}", pos),
            Lookup::Poi(id) => write!(f, "{}", id),
            Lookup::PoiAt(pos) => write!(f, "POI at {}", pos),
            Lookup::Crew(id) => write!(f, "{}", id),
        }
    }
}

/// How loudly a diagnostic should be reported.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    /// Idempotence or drift conflict; the log and the board disagree mildly.
    Warning,
    /// The sub-event could not be applied at all.
    Error,
}

/// A sub-event that could not be applied. Always recoverable.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum ReplayError {
    // === State conflicts ===
    #[error("cell {0} is already occupied by a hazard")]
    Occupied(CellPos),
    #[error("{0} not found")]
    NotFound(Lookup),
    #[error("wall {0} is already destroyed")]
    AlreadyDestroyed(WallKey),
    #[error("door {0} is already open")]
    AlreadyOpen(WallKey),
    #[error("{0} is already revealed")]
    AlreadyRevealed(PoiId),
    #[error("{poi} is already carried by {carrier}")]
    AlreadyCarried { poi: PoiId, carrier: CrewId },
    #[error("{crew} is already carrying {poi}")]
    AlreadyCarrying { crew: CrewId, poi: PoiId },

    // === Rule violations ===
    #[error("wall {0} is not a door")]
    NotADoor(WallKey),
    #[error("{0} has not been revealed")]
    NotRevealed(PoiId),
    #[error("{0} is not a victim")]
    NotAVictim(PoiId),
    #[error("{0} is not carrying a victim")]
    NotCarrying(CrewId),
    #[error("wall {0} cannot be damaged")]
    ImmutableWall(WallKey),
    #[error("cell {0} lies outside the grid")]
    OutOfBounds(CellPos),
    #[error("{crew} cannot step from {from} to {to}: cells are not adjacent")]
    NotAdjacent { crew: CrewId, from: CellPos, to: CellPos },
    #[error("{crew} is blocked by wall {wall}")]
    Blocked { crew: CrewId, wall: WallKey },

    // === Malformed sub-events ===
    #[error("unknown action kind {0:?}")]
    UnknownAction(String),
    #[error("unknown dice outcome at {0}")]
    UnknownDiceOutcome(CellPos),
    #[error("action {action} is missing field {field}")]
    MissingField { action: &'static str, field: &'static str },

    // === Reconciliation ===
    #[error("recorded state at {pos} was {recorded} but the board holds {actual}")]
    StateDrift { pos: CellPos, recorded: String, actual: String },
    #[error("recorded {counter} is {recorded} but the engine counts {actual}")]
    CounterDrift { counter: &'static str, recorded: u32, actual: u32 },
    #[error("recorded outcome is {recorded:?} but the rules give {actual}")]
    OutcomeDrift { recorded: String, actual: &'static str },

    // === Protocol ===
    #[error("previous effect batch has not been acknowledged")]
    AwaitingAcknowledgement,
}

impl ReplayError {
    /// Severity used for logging and for the emitted diagnostic.
    #[must_use]
    pub fn severity(&self) -> Severity {
        match self {
            ReplayError::Occupied(_)
            | ReplayError::AlreadyDestroyed(_)
            | ReplayError::AlreadyOpen(_)
            | ReplayError::AlreadyRevealed(_)
            | ReplayError::AlreadyCarried { .. }
            | ReplayError::AlreadyCarrying { .. }
            | ReplayError::UnknownAction(_)
            | ReplayError::UnknownDiceOutcome(_)
            | ReplayError::StateDrift { .. }
            | ReplayError::CounterDrift { .. }
            | ReplayError::OutcomeDrift { .. }
            | ReplayError::AwaitingAcknowledgement => Severity::Warning,
            _ => Severity::Error,
        }
    }
}
