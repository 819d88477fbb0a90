//! Wall segments.
//!
//! One `WallSegment` per physical wall, shared by the two cells it separates.
//! The segment never changes identity: destruction and opening are state
//! fields, and presentation picks its visuals from them.

use serde::{Deserialize, Serialize};

use crate::core::{WallId, WallKey};

/// Construction material of a wall.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WallKind {
    /// Ordinary interior wall, 2 hit points.
    Wood,
    /// Reinforced interior wall, 4 hit points.
    Concrete,
    /// Opens, never takes damage.
    Door,
    /// Outer hull of the building, never takes damage.
    Exterior,
}

impl WallKind {
    /// Hit points of an undamaged wall of this kind.
    #[must_use]
    pub const fn max_health(self) -> u8 {
        match self {
            WallKind::Wood => 2,
            WallKind::Concrete => 4,
            WallKind::Door | WallKind::Exterior => 1,
        }
    }

    /// Can attacks and explosions damage this kind?
    #[must_use]
    pub const fn is_damageable(self) -> bool {
        matches!(self, WallKind::Wood | WallKind::Concrete)
    }
}

/// Structural state derived from health.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WallState {
    Normal,
    Damaged,
    Destroyed,
}

/// Door position. Independent of health.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DoorState {
    Closed,
    Open,
}

/// A physical wall between two cells.
///
/// ## Invariants
///
/// - `current_health <= max_health`
/// - `destroyed == (current_health == 0)`
/// - `open` is only ever true for doors
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WallSegment {
    /// Stable identity.
    pub id: WallId,
    /// Canonical key (the smaller of the two names of this wall).
    pub key: WallKey,
    pub kind: WallKind,
    pub max_health: u8,
    pub(crate) current_health: u8,
    pub(crate) destroyed: bool,
    pub(crate) open: bool,
}

impl WallSegment {
    /// Create an undamaged segment.
    #[must_use]
    pub fn new(id: WallId, key: WallKey, kind: WallKind) -> Self {
        let max_health = kind.max_health();
        Self {
            id,
            key: key.canonical(),
            kind,
            max_health,
            current_health: max_health,
            destroyed: false,
            open: false,
        }
    }

    /// Start with reduced health (pre-damaged walls). Clamped to `[0, max]`.
    #[must_use]
    pub fn with_health(mut self, health: u8) -> Self {
        self.current_health = health.min(self.max_health);
        self.destroyed = self.current_health == 0;
        self
    }

    /// Start open (doors only; ignored otherwise).
    #[must_use]
    pub fn with_open(mut self, open: bool) -> Self {
        self.open = open && self.kind == WallKind::Door;
        self
    }

    #[must_use]
    pub fn current_health(&self) -> u8 {
        self.current_health
    }

    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open
    }

    #[must_use]
    pub fn is_door(&self) -> bool {
        self.kind == WallKind::Door
    }

    /// Current structural state.
    #[must_use]
    pub fn state(&self) -> WallState {
        if self.destroyed {
            WallState::Destroyed
        } else if self.current_health < self.max_health {
            WallState::Damaged
        } else {
            WallState::Normal
        }
    }

    /// Door position, `None` for non-doors.
    #[must_use]
    pub fn door_state(&self) -> Option<DoorState> {
        match (self.kind, self.open) {
            (WallKind::Door, true) => Some(DoorState::Open),
            (WallKind::Door, false) => Some(DoorState::Closed),
            _ => None,
        }
    }

    /// Can a crew member or a blast pass through?
    #[must_use]
    pub fn is_passable(&self) -> bool {
        self.destroyed || self.open
    }

    /// Copy of the observable state, for effect records.
    #[must_use]
    pub fn snapshot(&self) -> WallSnapshot {
        WallSnapshot {
            kind: self.kind,
            health: self.current_health,
            state: self.state(),
            door: self.door_state(),
        }
    }
}

/// Observable state of a wall at one instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WallSnapshot {
    pub kind: WallKind,
    pub health: u8,
    pub state: WallState,
    pub door: Option<DoorState>,
}
