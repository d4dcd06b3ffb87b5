//! Barba A/B kinematics
//!
//! Entry point used by the toolhead: position mapping, move checks, homing,
//! motor-off handling and status.

use heapless::String;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::coord::{AbCoord, Axis, Coord, AXIS_COUNT};
use super::rails::RailSet;
use crate::config::KinematicsConfig;
use crate::error::{ConfigError, KinematicsError, MoveError};
use crate::homing::{HomingOutcome, HomingPhase, HomingSequencer};
use crate::safety::{check_move, LimitTracker, MotionLimits, MotorOffLatch, Move};
use crate::traits::{HomingExecutor, Stepper, StepperProvider, Toolhead};

/// Status reported to the host
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KinematicsStatus {
    /// Letters of the homed axes, e.g. "ab"
    pub homed_axes: String<AXIS_COUNT>,
    /// Configured lower bounds
    pub axis_minimum: AbCoord,
    /// Configured upper bounds
    pub axis_maximum: AbCoord,
}

/// Two-axis kinematics with independent A and B rails
///
/// Owns the trusted limits. The only writers are homing, `set_position`
/// with homed axes, `update_limits` on an already homed axis, and motor-off.
#[derive(Debug)]
pub struct Barba<'a, S> {
    rails: RailSet<S>,
    limits: LimitTracker,
    sequencer: HomingSequencer,
    motor_off: &'a MotorOffLatch,
    /// Latch epoch already folded into `limits`
    applied_epoch: u32,
    max_velocity: (f64, f64),
}

impl<'a, S: Stepper> Barba<'a, S> {
    /// Build the rails and wire their steppers to the toolhead
    ///
    /// Both axes start unhomed. `motor_off` is the latch raised by the
    /// stepper-enable subsystem.
    pub fn new<P, T>(
        config: &KinematicsConfig,
        provider: &mut P,
        toolhead: &mut T,
        motor_off: &'a MotorOffLatch,
    ) -> Result<Self, ConfigError>
    where
        P: StepperProvider<Stepper = S>,
        T: Toolhead,
    {
        let rails = RailSet::new(config, provider, toolhead)?;

        #[cfg(feature = "defmt")]
        defmt::info!(
            "barba kinematics ready: a {}..{} b {}..{}",
            rails.axis_minimum()[0],
            rails.axis_maximum()[0],
            rails.axis_minimum()[1],
            rails.axis_maximum()[1]
        );

        Ok(Self {
            rails,
            limits: LimitTracker::new(),
            sequencer: HomingSequencer::new(),
            motor_off,
            applied_epoch: motor_off.epoch(),
            max_velocity: toolhead.max_velocity(),
        })
    }

    /// The A and B rails
    pub fn rails(&self) -> &RailSet<S> {
        &self.rails
    }

    /// Every stepper of both rails, for step-generator registration
    pub fn steppers(&self) -> impl Iterator<Item = &S> {
        self.rails.steppers()
    }

    /// Toolhead velocity limits captured at startup
    pub fn max_velocity(&self) -> (f64, f64) {
        self.max_velocity
    }

    /// Phase of the homing sequencer
    pub fn homing_phase(&self) -> HomingPhase {
        self.sequencer.phase()
    }

    /// Map measured stepper positions to `[a, b]`
    ///
    /// Each axis takes the position of its rail's primary stepper.
    pub fn calc_position(&self, stepper_positions: &[(&str, f64)]) -> Result<AbCoord, KinematicsError> {
        let mut position = [0.0; AXIS_COUNT];
        for rail in self.rails.iter() {
            let axis = rail.axis();
            position[axis.index()] = stepper_positions
                .iter()
                .find(|(name, _)| *name == rail.name())
                .map(|&(_, pos)| pos)
                .ok_or(KinematicsError::MissingStepperPosition(axis))?;
        }
        Ok(position)
    }

    /// Write a new position into every rail
    ///
    /// Each axis listed in `homed_axes` is marked homed with its full
    /// configured range.
    pub fn set_position(&mut self, new_pos: &Coord, homed_axes: &[Axis]) {
        self.apply_motor_off();
        for rail in self.rails.iter_mut() {
            rail.set_position(new_pos);
            if homed_axes.contains(&rail.axis()) {
                self.limits.set_homed(rail.axis(), rail.range());
            }
        }
    }

    /// Replace the trusted range of an already homed axis
    pub fn update_limits(&mut self, axis: Axis, range: (f64, f64)) {
        self.apply_motor_off();
        self.limits.update_limits(axis, range);
    }

    /// Trusted limits, with any pending motor-off taken into account
    pub fn limits(&self) -> MotionLimits {
        if self.motor_off_pending() {
            MotionLimits::unhomed()
        } else {
            self.limits.snapshot()
        }
    }

    /// Check a move before it is queued
    pub fn check_move(&self, mv: &Move) -> Result<(), MoveError> {
        let result = check_move(mv, &self.limits());

        #[cfg(feature = "defmt")]
        if let Err(e) = &result {
            defmt::debug!("move rejected: {}", e);
        }

        result
    }

    /// Home every axis the executor asks for, in its order
    ///
    /// Stops at the first failure and returns the executor's error. Axes
    /// homed before the failure stay homed. If the motors are switched off
    /// mid-way the remaining axes are not homed and `Discarded` is returned.
    pub fn home<E: HomingExecutor<S>>(&mut self, executor: &mut E) -> Result<HomingOutcome, E::Error> {
        for index in 0..executor.axes().len() {
            let axis = executor.axes()[index];
            if self.home_axis(axis, executor)? == HomingOutcome::Discarded {
                return Ok(HomingOutcome::Discarded);
            }
        }
        Ok(HomingOutcome::Homed)
    }

    /// Home a single axis
    pub fn home_axis<E: HomingExecutor<S>>(
        &mut self,
        axis: Axis,
        executor: &mut E,
    ) -> Result<HomingOutcome, E::Error> {
        self.apply_motor_off();
        let rail = self.rails.rail(axis);
        let outcome = self
            .sequencer
            .home_axis(rail, &mut self.limits, self.motor_off, executor);
        self.apply_motor_off();
        outcome
    }

    /// Motor-off event handler
    pub fn motor_off(&mut self, print_time: f64) {
        #[cfg(feature = "defmt")]
        defmt::info!("motors off at {}, axes unhomed", print_time);
        #[cfg(not(feature = "defmt"))]
        let _ = print_time;

        self.limits.reset();
        self.sequencer.reset();
        self.applied_epoch = self.motor_off.epoch();
    }

    /// Homed axes and configured bounds
    pub fn status(&self, _eventtime: f64) -> KinematicsStatus {
        KinematicsStatus {
            homed_axes: self.limits().homed_axes(),
            axis_minimum: self.rails.axis_minimum(),
            axis_maximum: self.rails.axis_maximum(),
        }
    }

    fn motor_off_pending(&self) -> bool {
        self.motor_off.epoch() != self.applied_epoch
    }

    /// Fold a pending motor-off notification into the limits
    fn apply_motor_off(&mut self) {
        let epoch = self.motor_off.epoch();
        if epoch != self.applied_epoch {
            self.applied_epoch = epoch;
            self.limits.reset();
            self.sequencer.reset();

            #[cfg(feature = "defmt")]
            defmt::info!("motor-off applied, axes unhomed");
        }
    }
}
