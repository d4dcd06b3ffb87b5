//! Sequential homing
//!
//! Axes are homed strictly one after another, in the order the homing
//! orchestrator supplies.

pub mod sequencer;

pub use sequencer::{HomingOutcome, HomingPhase, HomingRequest, HomingSequencer};
