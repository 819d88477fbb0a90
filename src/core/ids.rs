//! Entity identifiers.
//!
//! Crew members and points of interest carry ids assigned by the board
//! configuration. Wall segments get a `WallId` at build time: the index of the
//! segment in the board's wall table, stable for the whole session.
//!
//! Hazards have no id. They are keyed by position because at most one hazard
//! may occupy a cell.
//!
//! ```
//! use rescue_replay::core::{CrewId, PoiId};
//!
//! let crew = CrewId::new(7);
//! assert_eq!(crew.raw(), 7);
//! assert_eq!(format!("{}", crew), "Crew(7)");
//! assert_eq!(format!("{}", PoiId::new(2)), "Poi(2)");
//! ```

use serde::{Deserialize, Serialize};

/// Identifier of a crew member.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CrewId(pub u32);

impl CrewId {
    /// Create a new crew id.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw id value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl From<u32> for CrewId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for CrewId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Crew({})", self.0)
    }
}

/// Identifier of a point of interest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PoiId(pub u32);

impl PoiId {
    /// Create a new POI id.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw id value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl From<u32> for PoiId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for PoiId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Poi({})", self.0)
    }
}

/// Stable identity of one physical wall segment.
///
/// Both `WallKey`s naming the wall resolve to the same `WallId`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WallId(pub u32);

impl WallId {
    /// Index into the board's wall table.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for WallId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Wall({})", self.0)
    }
}
