//! Homing executor trait
//!
//! The executor owns the endstops and the timed homing moves. The kinematics
//! hands it one rail at a time together with the computed targets.

use crate::homing::HomingRequest;
use crate::kinematics::{Axis, Rail};

use super::stepper::Stepper;

/// Performs the physical homing moves for a rail
pub trait HomingExecutor<S: Stepper> {
    /// Error reported when homing fails (endstop not triggered, timeout, ...)
    type Error;

    /// Axes to home, in the order they must be homed
    fn axes(&self) -> &[Axis];

    /// Drive `rail` through `request`, blocking until it finishes
    ///
    /// Moves toward `request.force_position` until the endstop triggers,
    /// then declares the axis to be at `request.home_position`.
    fn home_rails(&mut self, rail: &Rail<S>, request: &HomingRequest) -> Result<(), Self::Error>;
}
