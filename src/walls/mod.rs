//! Wall segments and their state machine.

pub mod machine;
pub mod segment;

pub use machine::{DamageOutcome, WallStateMachine, WallTransition};
pub use segment::{DoorState, WallKind, WallSegment, WallSnapshot, WallState};
