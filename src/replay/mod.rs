//! Replay machinery: the event log, the action dispatcher and the turn
//! sequencer.
//!
//! ```text
//!   EventLog --> TurnSequencer --(one sub-event)--> ActionDispatcher
//!                     |                                  |
//!                     |            Board / walls / hazards / POIs
//!                     v                                  |
//!                 StepReport <------- EffectBatch <------'
//! ```

pub mod action;
pub mod dispatcher;
pub mod log;
pub mod sequencer;

pub use action::{ActionKind, ATTACK_DAMAGE, BREAK_DAMAGE};
pub use dispatcher::ActionDispatcher;
pub use log::{
    CrewAction, DiceEvent, DiceOutcome, EventLog, RecordedCounters, ResultingChanges, SubEvent, Turn,
};
pub use sequencer::{Cursor, Presenter, ReplaySummary, StepReport, TurnSequencer, TurnSummary};
