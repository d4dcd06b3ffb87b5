//! Toolhead trait
//!
//! The toolhead owns the trajectory queue and the step-generation
//! dispatcher that flushes steps for every registered stepper.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Handle of a trajectory queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TrapqId(pub u8);

/// Handle of a stepper's step generator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StepperId(pub u8);

/// Motion toolhead the kinematics is attached to
pub trait Toolhead {
    /// Shared trajectory queue for the A/B steppers
    fn trapq(&self) -> TrapqId;

    /// Add a stepper to the step-generation dispatcher
    fn register_step_generator(&mut self, stepper: StepperId);

    /// Velocity and acceleration limits `(max_velocity, max_accel)`
    fn max_velocity(&self) -> (f64, f64);
}
