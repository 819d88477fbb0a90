//! Session-wide simulation totals.

use serde::{Deserialize, Serialize};

/// Running totals for one replay session.
///
/// Reset when a session starts. Only the wall state machine, the POI tracker
/// and the turn sequencer write to these; everything else reads them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameCounters {
    /// Victims dropped off at an exit.
    pub victims_rescued: u32,
    /// Victims reached by a spider before rescue.
    pub victims_lost: u32,
    /// False alarms revealed and dismissed.
    pub false_alarms: u32,
    /// Wall hit points removed over the session.
    pub building_damage: u32,
    /// Index of the turn currently being replayed.
    pub turn_index: u32,
}

impl GameCounters {
    /// Fresh counters for a new session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_start_at_zero() {
        let counters = GameCounters::new();
        assert_eq!(counters.victims_rescued, 0);
        assert_eq!(counters.victims_lost, 0);
        assert_eq!(counters.building_damage, 0);
        assert_eq!(counters.turn_index, 0);
    }

    #[test]
    fn test_counters_json_shape() {
        let counters = GameCounters {
            victims_rescued: 2,
            building_damage: 5,
            ..GameCounters::default()
        };
        let json = serde_json::to_value(counters).unwrap();
        assert_eq!(json["victimsRescued"], 2);
        assert_eq!(json["buildingDamage"], 5);
    }
}
