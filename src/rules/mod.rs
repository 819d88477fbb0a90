//! Win/loss evaluation.
//!
//! The replay engine only maintains `GameCounters`. Deciding whether those
//! counters mean a won or lost game is delegated to an `OutcomeEvaluator`;
//! the sequencer uses it to annotate turn summaries and never stops on it.

pub mod outcome;

pub use outcome::{GameOutcome, LossReason, OutcomeEvaluator, ThresholdRules};
