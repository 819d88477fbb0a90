//! Turn sequencer: walks the event log and drives the yield-point protocol.
//!
//! ## Protocol
//!
//! ```text
//!   next_report() -> Some(report)   mutate the board for one sub-event
//!   ... presentation animates report.batch ...
//!   acknowledge()                   allow the next mutation
//! ```
//!
//! Calling `next_report` again before `acknowledge` is refused with
//! `AwaitingAcknowledgement` and changes nothing. There is no timeout and no
//! mid-log cancellation; `restart` rewinds the whole session.
//!
//! The report for the last sub-event of a turn carries the turn summary. A
//! turn without sub-events still yields one (empty) report for its summary.

use log::{info, warn};

use super::action::normalize;
use super::dispatcher::ActionDispatcher;
use super::log::{EventLog, RecordedCounters};
use crate::board::Board;
use crate::core::{BoardConfig, ConfigError, GameCounters, ReplayConfig, ReplayError};
use crate::effects::{Diagnostic, EffectBatch};
use crate::rules::{GameOutcome, OutcomeEvaluator};

/// Position of the next sub-event to apply.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Cursor {
    pub turn: usize,
    pub sub_event: usize,
}

/// Output of one step of the replay.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepReport {
    /// `turnIndex` of the turn this step belongs to.
    pub turn_index: u32,
    /// Index of the sub-event within its turn; `None` for an empty turn.
    pub sub_event: Option<usize>,
    pub batch: EffectBatch,
    /// Present on the last step of a turn.
    pub turn_summary: Option<TurnSummary>,
}

/// Aggregate of one turn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnSummary {
    pub turn_index: u32,
    /// Effects emitted over the turn.
    pub effects: usize,
    /// Diagnostics raised by sub-events over the turn.
    pub diagnostics: usize,
    /// Engine counters at the end of the turn.
    pub counters: GameCounters,
    /// Counters the log recorded for this turn, if any.
    pub recorded: Option<RecordedCounters>,
    /// Disagreements between `counters` and `recorded`.
    pub drift: Vec<Diagnostic>,
    /// Outcome according to the configured rules.
    pub outcome: Option<GameOutcome>,
}

/// Totals of a whole `run`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub turns: usize,
    pub sub_events: usize,
    pub effects: usize,
    pub diagnostics: usize,
    pub counters: GameCounters,
    pub outcome: Option<GameOutcome>,
}

/// Consumer of step reports (the presentation adapter).
pub trait Presenter {
    fn present(&mut self, report: &StepReport);
}

impl<F> Presenter for F
where
    F: FnMut(&StepReport),
{
    fn present(&mut self, report: &StepReport) {
        self(report)
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct TurnTally {
    effects: usize,
    diagnostics: usize,
}

/// Sole owner of the board for a replay session.
pub struct TurnSequencer {
    config: ReplayConfig,
    log: EventLog,
    dispatcher: ActionDispatcher,
    initial: Board,
    board: Board,
    cursor: Cursor,
    tally: TurnTally,
    awaiting_ack: bool,
    /// Board after each completed turn, keyed by `turnIndex`.
    checkpoints: Vec<(u32, Board)>,
}

impl TurnSequencer {
    /// Build the board and prepare a session.
    ///
    /// ## Errors
    ///
    /// `ConfigError` when the board configuration is invalid.
    pub fn new(board: &BoardConfig, log: EventLog, config: ReplayConfig) -> Result<Self, ConfigError> {
        let initial = Board::build(board)?;
        info!(
            "replay session: {} turns, {} sub-events",
            log.len(),
            log.sub_event_count()
        );
        Ok(Self {
            dispatcher: ActionDispatcher::new(&config),
            config,
            log,
            board: initial.clone(),
            initial,
            cursor: Cursor::default(),
            tally: TurnTally::default(),
            awaiting_ack: false,
            checkpoints: Vec::new(),
        })
    }

    /// Parse both documents and prepare a session.
    pub fn from_json(board_json: &str, log_json: &str, config: ReplayConfig) -> Result<Self, ConfigError> {
        let board = BoardConfig::from_json_str(board_json)?;
        let log = EventLog::from_json_str(log_json)?;
        Self::new(&board, log, config)
    }

    // === Accessors ===

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn log(&self) -> &EventLog {
        &self.log
    }

    #[must_use]
    pub fn config(&self) -> &ReplayConfig {
        &self.config
    }

    #[must_use]
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.cursor.turn >= self.log.turns.len()
    }

    #[must_use]
    pub fn is_awaiting_acknowledgement(&self) -> bool {
        self.awaiting_ack
    }

    /// Board as it stood at the end of turn `turn_index`.
    #[must_use]
    pub fn checkpoint(&self, turn_index: u32) -> Option<&Board> {
        self.checkpoints
            .iter()
            .rev()
            .find(|(index, _)| *index == turn_index)
            .map(|(_, board)| board)
    }

    // === Protocol ===

    /// Apply the next sub-event and return its report, or `None` once the
    /// log is exhausted.
    pub fn next_report(&mut self) -> Result<Option<StepReport>, ReplayError> {
        if self.awaiting_ack {
            return Err(ReplayError::AwaitingAcknowledgement);
        }
        let Some(turn) = self.log.turns.get(self.cursor.turn) else {
            return Ok(None);
        };
        let turn_index = turn.turn_index;
        let sub_event_count = turn.sub_events.len();

        if self.cursor.sub_event == 0 {
            self.board.counters_mut().turn_index = turn_index;
            self.tally = TurnTally::default();
            info!("turn {} started ({} sub-events)", turn_index, sub_event_count);
        }

        let (sub_event, batch) = match turn.sub_events.get(self.cursor.sub_event) {
            Some(event) => {
                let batch = self.dispatcher.dispatch(&mut self.board, event);
                self.tally.effects += batch.len();
                self.tally.diagnostics += batch.diagnostics().len();
                let index = self.cursor.sub_event;
                self.cursor.sub_event += 1;
                (Some(index), batch)
            }
            None => (None, EffectBatch::new()),
        };

        let turn_summary = if self.cursor.sub_event >= sub_event_count {
            let recorded = turn.counters.clone();
            let summary = self.finish_turn(turn_index, recorded);
            self.cursor = Cursor {
                turn: self.cursor.turn + 1,
                sub_event: 0,
            };
            Some(summary)
        } else {
            None
        };

        self.awaiting_ack = true;
        Ok(Some(StepReport {
            turn_index,
            sub_event,
            batch,
            turn_summary,
        }))
    }

    /// Presentation has captured the last report.
    pub fn acknowledge(&mut self) {
        self.awaiting_ack = false;
    }

    /// Replay everything left, presenting and acknowledging each report.
    pub fn run<P: Presenter + ?Sized>(&mut self, presenter: &mut P) -> ReplaySummary {
        self.acknowledge();
        let mut summary = ReplaySummary::default();
        while let Ok(Some(report)) = self.next_report() {
            presenter.present(&report);
            self.acknowledge();

            if report.sub_event.is_some() {
                summary.sub_events += 1;
            }
            summary.effects += report.batch.len();
            summary.diagnostics += report.batch.diagnostics().len();
            if let Some(turn) = &report.turn_summary {
                summary.turns += 1;
                summary.outcome = turn.outcome;
            }
        }
        summary.counters = *self.board.counters();
        summary
    }

    /// Replay everything left without a presenter.
    pub fn run_to_end(&mut self) -> ReplaySummary {
        self.run(&mut |_: &StepReport| {})
    }

    /// Rewind to the initial board and the first turn.
    pub fn restart(&mut self) {
        self.board = self.initial.clone();
        self.cursor = Cursor::default();
        self.tally = TurnTally::default();
        self.awaiting_ack = false;
        self.checkpoints.clear();
        info!("replay restarted");
    }

    fn finish_turn(&mut self, turn_index: u32, recorded: Option<RecordedCounters>) -> TurnSummary {
        let counters = *self.board.counters();
        let outcome = self.config.rules.evaluate(&counters);
        let drift = match (&recorded, self.config.reconcile) {
            (Some(recorded), true) => counter_drift(recorded, &counters, outcome),
            _ => Vec::new(),
        };
        for diagnostic in &drift {
            warn!("turn {}: {}", turn_index, diagnostic.error);
        }

        self.checkpoints.push((turn_index, self.board.clone()));
        info!(
            "turn {} finished: {} effects, {} diagnostics, rescued {}, lost {}, damage {}",
            turn_index,
            self.tally.effects,
            self.tally.diagnostics,
            counters.victims_rescued,
            counters.victims_lost,
            counters.building_damage
        );

        TurnSummary {
            turn_index,
            effects: self.tally.effects,
            diagnostics: self.tally.diagnostics,
            counters,
            recorded,
            drift,
            outcome,
        }
    }
}

/// Compares only the fields the log actually recorded.
fn counter_drift(recorded: &RecordedCounters, counters: &GameCounters, outcome: Option<GameOutcome>) -> Vec<Diagnostic> {
    let pairs = [
        ("victimsRescued", recorded.victims_rescued, counters.victims_rescued),
        ("victimsLost", recorded.victims_lost, counters.victims_lost),
        ("falseAlarms", recorded.false_alarms, counters.false_alarms),
        ("buildingDamage", recorded.building_damage, counters.building_damage),
        ("gameOver", recorded.game_over.map(u32::from), u32::from(outcome.is_some())),
    ];
    let mut drift: Vec<Diagnostic> = pairs
        .into_iter()
        .filter_map(|(counter, recorded, actual)| match recorded {
            Some(recorded) if recorded != actual => Some(Diagnostic::new(ReplayError::CounterDrift {
                counter,
                recorded,
                actual,
            })),
            _ => None,
        })
        .collect();

    let actual = outcome.map_or(IN_PROGRESS, |outcome| outcome.label());
    if let Some(text) = &recorded.outcome {
        if recorded_outcome(text).is_some_and(|label| label != actual) {
            drift.push(Diagnostic::new(ReplayError::OutcomeDrift {
                recorded: text.clone(),
                actual,
            }));
        }
    }
    drift
}

const IN_PROGRESS: &str = "in progress";

/// Map a recorded result onto `"win"`, `"loss"` or in progress. Unrecognised
/// text is not compared.
fn recorded_outcome(text: &str) -> Option<&'static str> {
    let text = normalize(text.trim()).replace(' ', "");
    let starts = |prefixes: &[&str]| prefixes.iter().any(|p| text.starts_with(p));
    if text.is_empty() || starts(&["none", "inprogress", "enprogreso"]) {
        Some(IN_PROGRESS)
    } else if starts(&["win", "won", "victory", "victoria"]) {
        Some("win")
    } else if starts(&["loss", "lost", "defeat", "derrota"]) {
        Some("loss")
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CellPos, CrewId, Direction, WallKey, WallMask};
    use crate::replay::{ActionKind, CrewAction, DiceEvent, DiceOutcome, SubEvent, Turn};

    fn turn(index: u32, sub_events: Vec<SubEvent>) -> Turn {
        Turn {
            turn_index: index,
            sub_events,
            counters: None,
        }
    }

    fn sequencer(turns: Vec<Turn>) -> TurnSequencer {
        let board = BoardConfig::open(3, 3)
            .with_mask(CellPos::new(2, 3), WallMask::parse("1000").unwrap())
            .with_crew(CrewId::new(7), CellPos::new(2, 3));
        TurnSequencer::new(&board, EventLog { turns }, ReplayConfig::default()).unwrap()
    }

    fn egg(row: i32, col: i32) -> SubEvent {
        SubEvent::Dice(DiceEvent::new(CellPos::new(row, col), DiceOutcome::Egg))
    }

    #[test]
    fn test_acknowledgement_required() {
        let mut seq = sequencer(vec![turn(1, vec![egg(1, 1), egg(1, 2)])]);
        let first = seq.next_report().unwrap().unwrap();
        assert_eq!(first.sub_event, Some(0));
        assert!(first.turn_summary.is_none());

        assert_eq!(seq.next_report(), Err(ReplayError::AwaitingAcknowledgement));
        assert_eq!(seq.board().hazard_count(), 1);

        seq.acknowledge();
        let second = seq.next_report().unwrap().unwrap();
        assert_eq!(second.sub_event, Some(1));
        assert!(second.turn_summary.is_some());

        seq.acknowledge();
        assert_eq!(seq.next_report(), Ok(None));
        assert!(seq.is_finished());
    }

    #[test]
    fn test_empty_turn_yields_summary() {
        let mut seq = sequencer(vec![turn(4, vec![])]);
        let report = seq.next_report().unwrap().unwrap();
        assert_eq!(report.sub_event, None);
        assert!(report.batch.is_empty());
        assert_eq!(report.turn_summary.unwrap().turn_index, 4);
    }

    #[test]
    fn test_turn_index_tracked() {
        let mut seq = sequencer(vec![turn(3, vec![egg(1, 1)])]);
        seq.run_to_end();
        assert_eq!(seq.board().counters().turn_index, 3);
    }

    #[test]
    fn test_interleaving_matters() {
        // Breaking the wall first lets the crew walk through it.
        let key = WallKey::new(CellPos::new(2, 3), Direction::North);
        let step = SubEvent::Action(
            CrewAction::new(CrewId::new(7), ActionKind::Move).with_to(CellPos::new(1, 3)),
        );
        let hit = SubEvent::Action(CrewAction::new(CrewId::new(7), ActionKind::BreakWall).with_wall(key));

        let mut blocked = sequencer(vec![turn(1, vec![step.clone(), hit.clone()])]);
        blocked.run_to_end();
        assert_eq!(blocked.board().crew_by_id(CrewId::new(7)).unwrap().pos, CellPos::new(2, 3));

        let mut open = sequencer(vec![turn(1, vec![hit, step])]);
        open.run_to_end();
        assert_eq!(open.board().crew_by_id(CrewId::new(7)).unwrap().pos, CellPos::new(1, 3));
    }

    #[test]
    fn test_counter_drift_reported() {
        let mut logged = turn(1, vec![egg(1, 1)]);
        logged.counters = Some(RecordedCounters {
            building_damage: Some(5),
            victims_rescued: Some(0),
            ..RecordedCounters::default()
        });
        let mut seq = sequencer(vec![logged]);
        let report = seq.next_report().unwrap().unwrap();
        let summary = report.turn_summary.unwrap();
        assert_eq!(
            summary.drift[0].error,
            ReplayError::CounterDrift {
                counter: "buildingDamage",
                recorded: 5,
                actual: 0
            }
        );
        assert_eq!(summary.drift.len(), 1);
    }

    #[test]
    fn test_game_over_only_compared_when_recorded() {
        let rules = crate::rules::ThresholdRules {
            rescue_target: 0,
            ..Default::default()
        };
        let board = BoardConfig::open(2, 2);
        let mut logged = turn(1, vec![]);
        logged.counters = Some(RecordedCounters {
            victims_rescued: Some(0),
            ..RecordedCounters::default()
        });
        let log = EventLog { turns: vec![logged] };
        let mut seq = TurnSequencer::new(&board, log, ReplayConfig::default().with_rules(rules)).unwrap();

        let summary = seq.next_report().unwrap().unwrap().turn_summary.unwrap();
        assert_eq!(summary.outcome, Some(GameOutcome::Won));
        assert!(summary.drift.is_empty(), "{:?}", summary.drift);
    }

    #[test]
    fn test_recorded_outcome_compared() {
        let mut logged = turn(1, vec![egg(1, 1)]);
        logged.counters = Some(RecordedCounters {
            game_over: Some(true),
            outcome: Some("VICTORIA".into()),
            ..RecordedCounters::default()
        });
        let mut seq = sequencer(vec![logged]);
        let summary = seq.next_report().unwrap().unwrap().turn_summary.unwrap();
        assert_eq!(summary.outcome, None);
        assert_eq!(
            summary.drift.iter().map(|d| d.error.clone()).collect::<Vec<_>>(),
            vec![
                ReplayError::CounterDrift {
                    counter: "gameOver",
                    recorded: 1,
                    actual: 0
                },
                ReplayError::OutcomeDrift {
                    recorded: "VICTORIA".into(),
                    actual: "in progress"
                },
            ]
        );
        assert_eq!(recorded_outcome("DERROTA - Colapso"), Some("loss"));
        assert_eq!(recorded_outcome("en_progreso"), Some(IN_PROGRESS));
        assert_eq!(recorded_outcome("desconocido"), None);
    }

    #[test]
    fn test_checkpoints_and_restart() {
        let mut seq = sequencer(vec![turn(1, vec![egg(1, 1)]), turn(2, vec![egg(1, 2)])]);
        let summary = seq.run_to_end();
        assert_eq!(summary.turns, 2);
        assert_eq!(summary.sub_events, 2);

        assert_eq!(seq.checkpoint(1).unwrap().hazard_count(), 1);
        assert_eq!(seq.checkpoint(2).unwrap().hazard_count(), 2);
        assert!(seq.checkpoint(3).is_none());

        seq.restart();
        assert_eq!(seq.board().hazard_count(), 0);
        assert!(seq.checkpoint(1).is_none());
        assert_eq!(seq.run_to_end().sub_events, 2);
    }

    #[test]
    fn test_run_presents_every_report() {
        let mut seq = sequencer(vec![turn(1, vec![egg(1, 1), egg(1, 1)]), turn(2, vec![])]);
        let mut seen = Vec::new();
        let summary = seq.run(&mut |report: &StepReport| seen.push((report.turn_index, report.sub_event)));
        assert_eq!(seen, vec![(1, Some(0)), (1, Some(1)), (2, None)]);
        assert_eq!(summary.diagnostics, 1);
        assert!(!seq.is_awaiting_acknowledgement());
    }
}
