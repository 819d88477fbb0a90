//! Outcome evaluation trait and the default threshold rules.

use serde::{Deserialize, Serialize};

use crate::core::GameCounters;

/// Why a game was lost.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LossReason {
    /// Too many victims lost.
    VictimsLost,
    /// The building took too much damage.
    BuildingCollapsed,
}

/// Result of a finished game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameOutcome {
    Won,
    Lost(LossReason),
}

impl GameOutcome {
    #[must_use]
    pub fn is_win(&self) -> bool {
        matches!(self, GameOutcome::Won)
    }

    /// Name used by recorded logs (`"win"` / `"loss"`).
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            GameOutcome::Won => "win",
            GameOutcome::Lost(_) => "loss",
        }
    }
}

/// Decides whether the counters describe a finished game.
///
/// ## Implementation Notes
///
/// - Must be a pure function of the counters; the sequencer calls it after
///   every turn.
/// - Return `None` while the game continues.
pub trait OutcomeEvaluator {
    fn evaluate(&self, counters: &GameCounters) -> Option<GameOutcome>;
}

impl<F> OutcomeEvaluator for F
where
    F: Fn(&GameCounters) -> Option<GameOutcome>,
{
    fn evaluate(&self, counters: &GameCounters) -> Option<GameOutcome> {
        self(counters)
    }
}

/// Threshold rules of the base game.
///
/// Losses are checked before the win, so a turn that both rescues the last
/// victim and collapses the building is a loss.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ThresholdRules {
    /// Rescued victims needed to win.
    pub rescue_target: u32,
    /// Lost victims that end the game.
    pub victims_lost_limit: u32,
    /// Building damage that ends the game.
    pub damage_limit: u32,
}

impl Default for ThresholdRules {
    fn default() -> Self {
        Self {
            rescue_target: 7,
            victims_lost_limit: 4,
            damage_limit: 24,
        }
    }
}

impl OutcomeEvaluator for ThresholdRules {
    fn evaluate(&self, counters: &GameCounters) -> Option<GameOutcome> {
        if counters.victims_lost >= self.victims_lost_limit {
            Some(GameOutcome::Lost(LossReason::VictimsLost))
        } else if counters.building_damage >= self.damage_limit {
            Some(GameOutcome::Lost(LossReason::BuildingCollapsed))
        } else if counters.victims_rescued >= self.rescue_target {
            Some(GameOutcome::Won)
        } else {
            None
        }
    }
}
