//! Collaborator traits
//!
//! These traits define the interface between the kinematics and the rest of
//! the firmware: steppers, the toolhead and the homing executor.

pub mod homing;
pub mod stepper;
pub mod toolhead;

pub use homing::HomingExecutor;
pub use stepper::{Stepper, StepperProvider};
pub use toolhead::{StepperId, Toolhead, TrapqId};
