//! Homing sequencer
//!
//! Homes one axis at a time. For each axis it computes the approach and home
//! targets, hands them to the homing executor and, on success, marks the
//! axis homed with its full configured range.

use crate::config::HomingInfo;
use crate::kinematics::{Axis, HomingCoord, Rail, COORD_SLOTS};
use crate::safety::{LimitTracker, MotorOffLatch};
use crate::traits::{HomingExecutor, Stepper};

/// Overshoot applied to the approach move, as a multiple of the distance
/// between the endstop and the bound behind it
pub const FORCE_OVERSHOOT: f64 = 1.5;

/// Phase of the current homing invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HomingPhase {
    /// No homing in progress
    #[default]
    Idle,
    /// Computing the approach and home targets
    ComputingTargets,
    /// Waiting on the homing executor
    Delegated,
    /// Executor finished (successfully or not)
    Done,
}

/// Targets handed to the homing executor
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HomingRequest {
    /// Axis being homed
    pub axis: Axis,
    /// Approach target, far enough to pass the endstop
    pub force_position: HomingCoord,
    /// Position the axis is at once the endstop triggers
    pub home_position: HomingCoord,
    /// Home toward the maximum (true) or the minimum (false)
    pub positive_dir: bool,
    /// First approach speed in mm/s
    pub speed: f64,
}

impl HomingRequest {
    /// Compute the targets for homing `axis`
    ///
    /// Only the homed axis' slot is set. The approach target starts past the
    /// far bound, on the side away from the endstop, by 1.5 times the
    /// distance between the endstop and that bound.
    pub fn new(axis: Axis, range: (f64, f64), info: &HomingInfo) -> Self {
        let (position_min, position_max) = range;
        let endstop = info.position_endstop;

        let mut home_position = [None; COORD_SLOTS];
        home_position[axis.index()] = Some(endstop);

        let force = if info.positive_dir {
            endstop - FORCE_OVERSHOOT * (endstop - position_min)
        } else {
            endstop + FORCE_OVERSHOOT * (position_max - endstop)
        };
        let mut force_position = [None; COORD_SLOTS];
        force_position[axis.index()] = Some(force);

        Self {
            axis,
            force_position,
            home_position,
            positive_dir: info.positive_dir,
            speed: info.speed,
        }
    }

    /// Approach target of the homed axis
    pub fn force(&self) -> f64 {
        self.force_position[self.axis.index()].unwrap_or_default()
    }

    /// Home position of the homed axis
    pub fn home(&self) -> f64 {
        self.home_position[self.axis.index()].unwrap_or_default()
    }
}

/// Result of a successful executor run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HomingOutcome {
    /// The axis is now homed
    Homed,
    /// Motors were switched off during homing, the result was dropped
    Discarded,
}

/// Drives homing, one axis at a time
#[derive(Debug, Clone, Default)]
pub struct HomingSequencer {
    phase: HomingPhase,
    axis: Option<Axis>,
}

impl HomingSequencer {
    /// Create an idle sequencer
    pub const fn new() -> Self {
        Self {
            phase: HomingPhase::Idle,
            axis: None,
        }
    }

    /// Current phase
    pub fn phase(&self) -> HomingPhase {
        self.phase
    }

    /// Axis of the current or last invocation
    pub fn axis(&self) -> Option<Axis> {
        self.axis
    }

    /// Return to idle
    pub fn reset(&mut self) {
        self.phase = HomingPhase::Idle;
        self.axis = None;
    }

    /// Home the axis driven by `rail`
    ///
    /// The executor's error is returned unchanged and the axis stays
    /// unhomed; there is no retry. If `motor_off` is signalled while the
    /// executor runs, the result is discarded.
    pub fn home_axis<S, E>(
        &mut self,
        rail: &Rail<S>,
        limits: &mut LimitTracker,
        motor_off: &MotorOffLatch,
        executor: &mut E,
    ) -> Result<HomingOutcome, E::Error>
    where
        S: Stepper,
        E: HomingExecutor<S>,
    {
        let axis = rail.axis();
        self.axis = Some(axis);

        self.phase = HomingPhase::ComputingTargets;
        let request = HomingRequest::new(axis, rail.range(), rail.homing_info());

        #[cfg(feature = "defmt")]
        defmt::info!(
            "homing axis {}: force {} home {}",
            axis,
            request.force(),
            request.home()
        );

        let epoch = motor_off.epoch();
        self.phase = HomingPhase::Delegated;
        let result = executor.home_rails(rail, &request);
        self.phase = HomingPhase::Done;

        if let Err(e) = result {
            #[cfg(feature = "defmt")]
            defmt::warn!("homing axis {} failed", axis);
            return Err(e);
        }

        if motor_off.epoch() != epoch {
            #[cfg(feature = "defmt")]
            defmt::warn!("motors off during homing of axis {}, result dropped", axis);
            return Ok(HomingOutcome::Discarded);
        }

        limits.set_homed(axis, rail.range());

        #[cfg(feature = "defmt")]
        defmt::info!("axis {} homed", axis);

        Ok(HomingOutcome::Homed)
    }
}
