//! # rescue-replay
//!
//! Deterministic replay engine for turn-based rescue simulations.
//!
//! A recorded game (an `EventLog` of turns, each a sequence of dice rolls and
//! crew actions) is applied sub-event by sub-event to an in-memory `Board`.
//! Every sub-event yields an ordered `EffectBatch` describing what changed,
//! which a presentation layer animates before letting the replay continue.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: No randomness, no clocks. The same board and log
//!    always produce the same effects.
//!
//! 2. **Never stall**: Only a malformed initial board is fatal. A sub-event
//!    that cannot be applied becomes a diagnostic and the replay moves on.
//!
//! 3. **Stable identities**: Walls are stored once and addressed from either
//!    side; destruction and door opening are state, never replacement.
//!
//! ## Architecture
//!
//! - **Single owner**: The `TurnSequencer` owns the board for the whole
//!   session. Components receive it by reference.
//!
//! - **Persistent Data Structures**: Board registries use `im-rs`, so a
//!   checkpoint after every turn is an O(1) clone.
//!
//! - **Yield points**: `next_report` applies one sub-event and refuses to
//!   apply another until `acknowledge` is called.
//!
//! ## Modules
//!
//! - `core`: Coordinates, ids, configuration, counters, errors
//! - `board`: Board model and entity registries
//! - `walls`: Wall segments and their state machine
//! - `hazards`: Egg incubation, hatching and explosions
//! - `poi`: Point-of-interest reveal, rescue and loss
//! - `effects`: Effect records and batches
//! - `replay`: Event log, action dispatcher, turn sequencer
//! - `rules`: Win/loss evaluation
//!
//! ## Example
//!
//! ```
//! use rescue_replay::{BoardConfig, CellPos, EventLog, ReplayConfig, TurnSequencer};
//!
//! let board = BoardConfig::open(3, 3).with_spider(CellPos::new(2, 2));
//! let log = EventLog::from_json_str(
//!     r#"{"turns": [{"turnIndex": 1, "subEvents": [
//!         {"type": "dice", "row": 2, "col": 2, "newState": "explosion"}
//!     ]}]}"#,
//! )
//! .unwrap();
//!
//! let mut replay = TurnSequencer::new(&board, log, ReplayConfig::default()).unwrap();
//! let summary = replay.run_to_end();
//!
//! assert_eq!(summary.effects, 5);
//! assert_eq!(replay.board().hazard_count(), 4);
//! ```

pub mod core;
pub mod board;
pub mod walls;
pub mod hazards;
pub mod poi;
pub mod effects;
pub mod replay;
pub mod rules;

// Re-export commonly used types
pub use crate::core::{
    CellPos, Direction, WallKey,
    CrewId, PoiId, WallId,
    BoardConfig, ReplayConfig, WallMask,
    GameCounters,
    ConfigError, ReplayError, Severity,
};

pub use crate::board::{Board, Crew, Hazard, PoiKind, PointOfInterest};

pub use crate::walls::{WallKind, WallSegment, WallState, WallStateMachine};

pub use crate::hazards::{ExplosionReport, HazardEngine};

pub use crate::poi::PoiTracker;

pub use crate::effects::{Diagnostic, Effect, EffectBatch, EffectKind};

pub use crate::replay::{
    ActionDispatcher, ActionKind, EventLog, Presenter, StepReport, SubEvent, TurnSequencer,
    TurnSummary,
};

pub use crate::rules::{GameOutcome, OutcomeEvaluator, ThresholdRules};
