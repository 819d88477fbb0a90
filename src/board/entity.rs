//! Entities living on the board: hazards, points of interest, crew.

use serde::{Deserialize, Serialize};

use crate::core::{CellPos, CrewId, PoiId};

/// A hazard occupying one cell.
///
/// `Egg` incubates for `turns_until_hatch` more ticks, then becomes a
/// `Spider` in place.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Hazard {
    Egg { pos: CellPos, turns_until_hatch: u32 },
    Spider { pos: CellPos },
}

impl Hazard {
    /// Cell the hazard occupies.
    #[must_use]
    pub const fn pos(&self) -> CellPos {
        match self {
            Hazard::Egg { pos, .. } | Hazard::Spider { pos } => *pos,
        }
    }

    #[must_use]
    pub const fn is_egg(&self) -> bool {
        matches!(self, Hazard::Egg { .. })
    }

    #[must_use]
    pub const fn is_spider(&self) -> bool {
        matches!(self, Hazard::Spider { .. })
    }

    /// Short name used in diagnostics and log comparisons.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Hazard::Egg { .. } => "egg",
            Hazard::Spider { .. } => "spider",
        }
    }
}

/// What a point of interest hides.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PoiKind {
    Victim,
    FalseAlarm,
}

/// A point of interest marker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointOfInterest {
    pub id: PoiId,
    /// Floor position, or the carrier's position while carried.
    pub pos: CellPos,
    pub(crate) kind: PoiKind,
    pub revealed: bool,
    pub rescued: bool,
    /// Crew member currently carrying this victim.
    pub carried_by: Option<CrewId>,
}

impl PointOfInterest {
    /// Create an unrevealed POI lying on the floor.
    #[must_use]
    pub fn new(id: PoiId, pos: CellPos, kind: PoiKind) -> Self {
        Self {
            id,
            pos,
            kind,
            revealed: false,
            rescued: false,
            carried_by: None,
        }
    }

    /// The kind, as visible to replay consumers: `None` until revealed.
    #[must_use]
    pub fn visible_kind(&self) -> Option<PoiKind> {
        self.revealed.then_some(self.kind)
    }

    /// The true kind, regardless of reveal state. Engine-internal rules
    /// (victim loss) need it before reveal.
    #[must_use]
    pub(crate) fn hidden_kind(&self) -> PoiKind {
        self.kind
    }

    #[must_use]
    pub fn is_on_floor(&self) -> bool {
        self.carried_by.is_none()
    }

    #[must_use]
    pub fn snapshot(&self) -> PoiSnapshot {
        PoiSnapshot {
            pos: self.pos,
            kind: self.visible_kind(),
            revealed: self.revealed,
            rescued: self.rescued,
            carried_by: self.carried_by,
        }
    }
}

/// Observable POI state. The kind stays hidden until reveal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PoiSnapshot {
    pub pos: CellPos,
    pub kind: Option<PoiKind>,
    pub revealed: bool,
    pub rescued: bool,
    pub carried_by: Option<CrewId>,
}

/// How a POI left the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PoiFate {
    Rescued,
    Lost,
    Dismissed,
}

/// A POI that is no longer on the board. Kept so repeated operations on it
/// report the right conflict instead of a bare "not found".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetiredPoi {
    pub poi: PointOfInterest,
    pub fate: PoiFate,
}

/// A crew member.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Crew {
    pub id: CrewId,
    pub pos: CellPos,
    pub carrying: Option<PoiId>,
}

impl Crew {
    #[must_use]
    pub fn new(id: CrewId, pos: CellPos) -> Self {
        Self { id, pos, carrying: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hazard_pos() {
        let egg = Hazard::Egg { pos: CellPos::new(1, 1), turns_until_hatch: 2 };
        let spider = Hazard::Spider { pos: CellPos::new(3, 4) };
        assert_eq!(egg.pos(), CellPos::new(1, 1));
        assert_eq!(spider.pos(), CellPos::new(3, 4));
        assert!(egg.is_egg());
        assert!(spider.is_spider());
        assert_eq!(egg.label(), "egg");
    }

    #[test]
    fn test_poi_kind_hidden_until_revealed() {
        let mut poi = PointOfInterest::new(PoiId::new(1), CellPos::new(4, 5), PoiKind::Victim);
        assert_eq!(poi.visible_kind(), None);
        assert_eq!(poi.snapshot().kind, None);

        poi.revealed = true;
        assert_eq!(poi.visible_kind(), Some(PoiKind::Victim));
    }

    #[test]
    fn test_poi_kind_json() {
        let kind: PoiKind = serde_json::from_str("\"falseAlarm\"").unwrap();
        assert_eq!(kind, PoiKind::FalseAlarm);
    }
}
