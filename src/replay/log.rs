//! Event log model.
//!
//! ```json
//! {
//!   "turns": [{
//!     "turnIndex": 1,
//!     "subEvents": [
//!       {"type": "dice", "row": 1, "col": 1, "previousState": "egg", "newState": "spider"},
//!       {"type": "action", "crewId": 7, "kind": "breakWall",
//!        "wall": {"row": 2, "col": 3, "direction": "north"}}
//!     ],
//!     "counters": {"victimsRescued": 0, "victimsLost": 0, "buildingDamage": 2}
//!   }]
//! }
//! ```
//!
//! Sub-events keep their recorded order; dice rolls and actions interleave.

use serde::{Deserialize, Serialize};

use super::action::{normalize, ActionKind};
use crate::core::{CellPos, ConfigError, CrewId, PoiId, WallKey};

/// A complete recorded game.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventLog {
    pub turns: Vec<Turn>,
}

impl EventLog {
    /// Parse a log document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Total number of sub-events over all turns.
    #[must_use]
    pub fn sub_event_count(&self) -> usize {
        self.turns.iter().map(|t| t.sub_events.len()).sum()
    }
}

/// One recorded turn.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Turn {
    pub turn_index: u32,
    #[serde(default)]
    pub sub_events: Vec<SubEvent>,
    /// Totals the producer recorded at the end of the turn.
    #[serde(default)]
    pub counters: Option<RecordedCounters>,
}

/// Counters as recorded by the log producer. Every field is optional.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecordedCounters {
    pub victims_rescued: Option<u32>,
    pub victims_lost: Option<u32>,
    pub false_alarms: Option<u32>,
    pub building_damage: Option<u32>,
    pub game_over: Option<bool>,
    /// Free-form result such as `"win"`, `"loss"` or `"VICTORIA"`.
    pub outcome: Option<String>,
}

/// One atomic step of a turn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SubEvent {
    Dice(DiceEvent),
    Action(CrewAction),
}

/// What a dice roll did to its cell.
///
/// Parsed like action names: case, underscores and accents are ignored, and
/// the simulator's Spanish outcomes (`huevo`, `araña`, `explosión`) are
/// accepted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DiceOutcome {
    Egg,
    Spider,
    Explosion,
    /// Not recognised. Reported, never applied.
    Unknown,
}

impl DiceOutcome {
    #[must_use]
    pub fn parse(name: &str) -> Self {
        match normalize(name).as_str() {
            "egg" | "huevo" => DiceOutcome::Egg,
            "spider" | "arana" => DiceOutcome::Spider,
            "explosion" => DiceOutcome::Explosion,
            _ => DiceOutcome::Unknown,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            DiceOutcome::Egg => "egg",
            DiceOutcome::Spider => "spider",
            DiceOutcome::Explosion => "explosion",
            DiceOutcome::Unknown => "unknown",
        }
    }
}

impl From<String> for DiceOutcome {
    fn from(name: String) -> Self {
        Self::parse(&name)
    }
}

impl From<DiceOutcome> for String {
    fn from(outcome: DiceOutcome) -> Self {
        outcome.name().to_string()
    }
}

/// A dice roll landing on one cell.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiceEvent {
    pub row: i32,
    pub col: i32,
    /// Cell content before the roll: `"empty"`, `"egg"` or `"spider"`.
    #[serde(default)]
    pub previous_state: Option<String>,
    pub new_state: DiceOutcome,
    #[serde(default)]
    pub resulting_changes: Option<ResultingChanges>,
}

impl DiceEvent {
    #[must_use]
    pub fn new(pos: CellPos, outcome: DiceOutcome) -> Self {
        Self {
            row: pos.row,
            col: pos.col,
            previous_state: None,
            new_state: outcome,
            resulting_changes: None,
        }
    }

    #[must_use]
    pub fn pos(&self) -> CellPos {
        CellPos::new(self.row, self.col)
    }
}

/// Board changes the producer recorded for a dice roll.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResultingChanges {
    pub walls_damaged: Vec<WallKey>,
    pub hazards_spawned: Vec<CellPos>,
    pub hazards_removed: Vec<CellPos>,
}

/// A crew member's action. Which optional fields are needed depends on
/// the kind.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrewAction {
    pub crew_id: CrewId,
    pub kind: ActionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<CellPos>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<CellPos>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wall: Option<WallKey>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_cell: Option<CellPos>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poi_id: Option<PoiId>,
}

impl CrewAction {
    /// An action with no payload.
    #[must_use]
    pub fn new(crew: CrewId, kind: impl Into<ActionKind>) -> Self {
        Self {
            crew_id: crew,
            kind: kind.into(),
            from: None,
            to: None,
            wall: None,
            target_cell: None,
            poi_id: None,
        }
    }

    #[must_use]
    pub fn with_from(mut self, pos: CellPos) -> Self {
        self.from = Some(pos);
        self
    }

    #[must_use]
    pub fn with_to(mut self, pos: CellPos) -> Self {
        self.to = Some(pos);
        self
    }

    #[must_use]
    pub fn with_wall(mut self, key: WallKey) -> Self {
        self.wall = Some(key);
        self
    }

    #[must_use]
    pub fn with_target(mut self, pos: CellPos) -> Self {
        self.target_cell = Some(pos);
        self
    }

    #[must_use]
    pub fn with_poi(mut self, poi: PoiId) -> Self {
        self.poi_id = Some(poi);
        self
    }
}
