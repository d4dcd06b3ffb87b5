//! Stepper actuator traits
//!
//! The step-pulse engine owns the real steppers. The kinematics only binds
//! each one to a step transform, wires it to the toolhead and writes
//! positions into it.

use crate::kinematics::{Coord, StepperKinematics};

use super::toolhead::{StepperId, TrapqId};

/// One stepper actuator as seen by the kinematics
pub trait Stepper {
    /// Configuration section name (e.g. "stepper_a", "stepper_a1")
    fn name(&self) -> &str;

    /// Handle used to register the stepper's step generator
    fn id(&self) -> StepperId;

    /// Bind the step-to-position transform
    ///
    /// Called once at startup, before any position is written.
    fn bind_kinematics(&mut self, kinematics: StepperKinematics);

    /// Attach the stepper to the toolhead's trajectory queue
    fn set_trapq(&mut self, trapq: TrapqId);

    /// Set the stepper's position from a planner coordinate
    ///
    /// Implementations map the coordinate through their bound transform.
    fn set_position(&mut self, position: &Coord);
}

/// Source of configured steppers, keyed by section name
pub trait StepperProvider {
    /// Stepper type handed out
    type Stepper: Stepper;

    /// Take ownership of the stepper configured in `section`
    ///
    /// Returns `None` when no such stepper is configured.
    fn lookup_stepper(&mut self, section: &str) -> Option<Self::Stepper>;
}
