//! Effect records.
//!
//! An effect describes one observable change of one entity, with snapshots
//! of the entity before and after. Presentation decides how to show it from
//! these fields alone; it never reads the board while animating.

use serde::{Deserialize, Serialize};

use crate::board::{Crew, Hazard, PoiSnapshot};
use crate::core::{CellPos, CrewId, PoiId, WallId};
use crate::walls::{WallSnapshot, WallTransition};

/// What happened.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    // === Crew ===
    CrewMoved,

    // === Walls ===
    WallDamaged,
    WallDestroyed,
    DoorOpened,

    // === Hazards ===
    HazardSpawned,
    EggIncubated,
    HazardHatched,
    HazardRemoved,
    Explosion,

    // === Points of interest ===
    PoiRevealed,
    PoiDismissed,
    VictimPickedUp,
    VictimRescued,
    VictimLost,
}

/// The entity an effect is about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Subject {
    Wall(WallId),
    /// Hazards are keyed by the cell they occupy.
    Hazard(CellPos),
    Poi(PoiId),
    Crew(CrewId),
}

/// Snapshot of an entity at one instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityState {
    Wall(WallSnapshot),
    Hazard(Hazard),
    Poi(PoiSnapshot),
    Crew(Crew),
}

/// One observable change.
///
/// `before` is `None` for entities that did not exist yet (spawns) and
/// `after` is `None` for entities that left the board (removals, rescues).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Effect {
    pub kind: EffectKind,
    pub subject: Subject,
    pub before: Option<EntityState>,
    pub after: Option<EntityState>,
}

impl Effect {
    /// An effect with no snapshots attached.
    #[must_use]
    pub fn new(kind: EffectKind, subject: Subject) -> Self {
        Self {
            kind,
            subject,
            before: None,
            after: None,
        }
    }

    #[must_use]
    pub fn with_before(mut self, state: EntityState) -> Self {
        self.before = Some(state);
        self
    }

    #[must_use]
    pub fn with_after(mut self, state: EntityState) -> Self {
        self.after = Some(state);
        self
    }

    // === Convenience constructors ===

    /// Damage, destruction or door opening, from a wall transition.
    #[must_use]
    pub fn wall(transition: &WallTransition) -> Self {
        let kind = if transition.after.door.is_some() && transition.before.door != transition.after.door {
            EffectKind::DoorOpened
        } else if transition.destroyed {
            EffectKind::WallDestroyed
        } else {
            EffectKind::WallDamaged
        };
        Self::new(kind, Subject::Wall(transition.wall))
            .with_before(EntityState::Wall(transition.before))
            .with_after(EntityState::Wall(transition.after))
    }

    /// A hazard appeared.
    #[must_use]
    pub fn hazard_spawned(hazard: Hazard) -> Self {
        Self::new(EffectKind::HazardSpawned, Subject::Hazard(hazard.pos()))
            .with_after(EntityState::Hazard(hazard))
    }

    /// A hazard changed in place (incubation or hatch).
    #[must_use]
    pub fn hazard_changed(kind: EffectKind, before: Hazard, after: Hazard) -> Self {
        Self::new(kind, Subject::Hazard(after.pos()))
            .with_before(EntityState::Hazard(before))
            .with_after(EntityState::Hazard(after))
    }

    /// A hazard left the board (`HazardRemoved` or `Explosion`).
    #[must_use]
    pub fn hazard_gone(kind: EffectKind, hazard: Hazard) -> Self {
        Self::new(kind, Subject::Hazard(hazard.pos())).with_before(EntityState::Hazard(hazard))
    }

    /// A crew member changed.
    #[must_use]
    pub fn crew(kind: EffectKind, before: Crew, after: Crew) -> Self {
        Self::new(kind, Subject::Crew(after.id))
            .with_before(EntityState::Crew(before))
            .with_after(EntityState::Crew(after))
    }

    /// A POI changed. `after` is `None` once it left the board.
    #[must_use]
    pub fn poi(kind: EffectKind, id: PoiId, before: PoiSnapshot, after: Option<PoiSnapshot>) -> Self {
        let mut effect = Self::new(kind, Subject::Poi(id)).with_before(EntityState::Poi(before));
        effect.after = after.map(EntityState::Poi);
        effect
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Direction, WallKey};
    use crate::walls::{DoorState, WallKind, WallState};

    fn snapshot(health: u8, state: WallState, door: Option<DoorState>) -> WallSnapshot {
        WallSnapshot {
            kind: if door.is_some() { WallKind::Door } else { WallKind::Wood },
            health,
            state,
            door,
        }
    }

    fn transition(before: WallSnapshot, after: WallSnapshot, destroyed: bool) -> WallTransition {
        WallTransition {
            wall: WallId(3),
            key: WallKey::new(CellPos::new(1, 3), Direction::South),
            before,
            after,
            destroyed,
        }
    }

    #[test]
    fn test_wall_effect_kinds() {
        let damaged = transition(
            snapshot(2, WallState::Normal, None),
            snapshot(1, WallState::Damaged, None),
            false,
        );
        assert_eq!(Effect::wall(&damaged).kind, EffectKind::WallDamaged);

        let destroyed = transition(
            snapshot(1, WallState::Damaged, None),
            snapshot(0, WallState::Destroyed, None),
            true,
        );
        assert_eq!(Effect::wall(&destroyed).kind, EffectKind::WallDestroyed);

        let opened = transition(
            snapshot(1, WallState::Normal, Some(DoorState::Closed)),
            snapshot(1, WallState::Normal, Some(DoorState::Open)),
            false,
        );
        let effect = Effect::wall(&opened);
        assert_eq!(effect.kind, EffectKind::DoorOpened);
        assert_eq!(effect.subject, Subject::Wall(WallId(3)));
    }

    #[test]
    fn test_spawn_has_no_before() {
        let pos = CellPos::new(2, 2);
        let effect = Effect::hazard_spawned(Hazard::Spider { pos });
        assert_eq!(effect.subject, Subject::Hazard(pos));
        assert!(effect.before.is_none());
        assert_eq!(effect.after, Some(EntityState::Hazard(Hazard::Spider { pos })));
    }

    #[test]
    fn test_effect_serialization() {
        let effect = Effect::hazard_gone(EffectKind::Explosion, Hazard::Spider { pos: CellPos::new(3, 3) });
        let json = serde_json::to_string(&effect).unwrap();
        let back: Effect = serde_json::from_str(&json).unwrap();
        assert_eq!(effect, back);
    }
}
