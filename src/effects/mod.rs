//! Effect records emitted after each sub-event.
//!
//! - `Effect`: one observable change of one entity, with before/after
//!   snapshots
//! - `EffectBatch`: the ordered effects of one sub-event, plus diagnostics
//!
//! Effects are plain data. They are produced by the action dispatcher and
//! consumed by presentation; nothing in the engine reads them back.

mod batch;
mod effect;

pub use batch::{Diagnostic, EffectBatch};
pub use effect::{Effect, EffectKind, EntityState, Subject};
