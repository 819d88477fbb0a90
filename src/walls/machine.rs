//! Wall state machine.
//!
//! ```text
//!   Normal --damage(< health)--> Damaged --damage(>= health)--> Destroyed
//!      \_____________damage(>= health)_______________________/
//!
//!   Door: Closed --open--> Open
//! ```
//!
//! `Destroyed` is terminal: further damage is an `AlreadyDestroyed` conflict.
//! Doors and exterior walls never take damage. Failed transitions leave the
//! segment untouched.

use log::debug;
use serde::{Deserialize, Serialize};

use super::segment::{WallSegment, WallSnapshot};
use crate::board::Board;
use crate::core::{Lookup, ReplayError, WallId, WallKey};

/// Result of damaging a single segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DamageOutcome {
    /// Hit points actually removed (damage past zero is not counted).
    pub removed: u8,
    /// Did this hit destroy the wall?
    pub destroyed: bool,
}

/// A wall transition applied to the board, with before/after snapshots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WallTransition {
    pub wall: WallId,
    pub key: WallKey,
    pub before: WallSnapshot,
    pub after: WallSnapshot,
    pub destroyed: bool,
}

/// Applies damage and door transitions to wall segments.
pub struct WallStateMachine;

impl WallStateMachine {
    // === Segment-level transitions ===

    /// Remove `amount` hit points from a segment, clamping at zero.
    pub fn apply_damage(wall: &mut WallSegment, amount: u8) -> Result<DamageOutcome, ReplayError> {
        if !wall.kind.is_damageable() {
            return Err(ReplayError::ImmutableWall(wall.key));
        }
        if wall.destroyed {
            return Err(ReplayError::AlreadyDestroyed(wall.key));
        }

        let removed = amount.min(wall.current_health);
        wall.current_health -= removed;
        wall.destroyed = wall.current_health == 0;
        Ok(DamageOutcome {
            removed,
            destroyed: wall.destroyed,
        })
    }

    /// Open a closed door.
    pub fn open_door(wall: &mut WallSegment) -> Result<(), ReplayError> {
        if !wall.is_door() {
            return Err(ReplayError::NotADoor(wall.key));
        }
        if wall.open {
            return Err(ReplayError::AlreadyOpen(wall.key));
        }
        wall.open = true;
        Ok(())
    }

    // === Board-level transitions ===

    /// Damage the wall named by `key` (from either side).
    ///
    /// Building damage grows by the hit points actually removed.
    pub fn damage_at(board: &mut Board, key: WallKey, amount: u8) -> Result<WallTransition, ReplayError> {
        let id = board
            .wall_id_at(key)
            .ok_or(ReplayError::NotFound(Lookup::Wall(key)))?;
        let wall = board
            .wall_mut(id)
            .ok_or(ReplayError::NotFound(Lookup::Wall(key)))?;

        let before = wall.snapshot();
        let outcome = Self::apply_damage(wall, amount)?;
        let after = wall.snapshot();
        let canonical = wall.key;

        board.counters_mut().building_damage += u32::from(outcome.removed);
        debug!(
            "wall {} took {} damage ({:?} -> {:?})",
            canonical, outcome.removed, before.state, after.state
        );

        Ok(WallTransition {
            wall: id,
            key: canonical,
            before,
            after,
            destroyed: outcome.destroyed,
        })
    }

    /// Open the door named by `key` (from either side).
    pub fn open_door_at(board: &mut Board, key: WallKey) -> Result<WallTransition, ReplayError> {
        let id = board
            .wall_id_at(key)
            .ok_or(ReplayError::NotFound(Lookup::Wall(key)))?;
        let wall = board
            .wall_mut(id)
            .ok_or(ReplayError::NotFound(Lookup::Wall(key)))?;

        let before = wall.snapshot();
        Self::open_door(wall)?;
        let after = wall.snapshot();
        debug!("door {} opened", wall.key);

        Ok(WallTransition {
            wall: id,
            key: wall.key,
            before,
            after,
            destroyed: false,
        })
    }
}
