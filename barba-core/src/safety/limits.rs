//! Trusted travel limits
//!
//! An axis' limits are only trusted once the axis has been referenced
//! against its endstop. Until then every position on that axis counts as
//! out of range.

use heapless::String;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::kinematics::{Axis, AXIS_COUNT};

/// Trusted range of one axis
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AxisLimit {
    /// Not homed, no position is trusted
    #[default]
    Unhomed,
    /// Homed, positions in `[low, high]` are trusted
    Homed { low: f64, high: f64 },
}

impl AxisLimit {
    /// Build from an inverted-range pair, where `low > high` means unhomed
    pub fn from_range(low: f64, high: f64) -> Self {
        if low > high {
            AxisLimit::Unhomed
        } else {
            AxisLimit::Homed { low, high }
        }
    }

    /// Check whether the axis is homed
    pub fn is_homed(&self) -> bool {
        matches!(self, AxisLimit::Homed { .. })
    }

    /// Check whether `position` lies inside the trusted range
    ///
    /// Always false for an unhomed axis.
    pub fn contains(&self, position: f64) -> bool {
        match *self {
            AxisLimit::Unhomed => false,
            AxisLimit::Homed { low, high } => position >= low && position <= high,
        }
    }

    /// Trusted range, if homed
    pub fn range(&self) -> Option<(f64, f64)> {
        match *self {
            AxisLimit::Unhomed => None,
            AxisLimit::Homed { low, high } => Some((low, high)),
        }
    }
}

/// Trusted limits of both axes, indexed by [`Axis::index`]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MotionLimits(pub [AxisLimit; AXIS_COUNT]);

impl MotionLimits {
    /// Both axes unhomed
    pub const fn unhomed() -> Self {
        MotionLimits([AxisLimit::Unhomed; AXIS_COUNT])
    }

    /// Limit of `axis`
    pub fn get(&self, axis: Axis) -> AxisLimit {
        self.0[axis.index()]
    }

    /// Letters of the homed axes, in axis order (e.g. "ab", "b", "")
    pub fn homed_axes(&self) -> String<AXIS_COUNT> {
        let mut homed = String::new();
        for axis in Axis::ALL {
            if self.get(axis).is_homed() {
                // Capacity equals the axis count
                let _ = homed.push(axis.letter());
            }
        }
        homed
    }
}

/// Owner of the trusted limits
///
/// `set_homed` is the only way to move an axis from unhomed to homed.
#[derive(Debug, Clone, Default)]
pub struct LimitTracker {
    limits: MotionLimits,
}

impl LimitTracker {
    /// Create a tracker with both axes unhomed
    pub const fn new() -> Self {
        Self {
            limits: MotionLimits::unhomed(),
        }
    }

    /// Replace the range of an already homed axis
    ///
    /// Does nothing while the axis is unhomed, so an out-of-band limit
    /// change can never mark an axis as homed.
    pub fn update_limits(&mut self, axis: Axis, range: (f64, f64)) {
        if self.limits.get(axis).is_homed() {
            self.limits.0[axis.index()] = AxisLimit::Homed {
                low: range.0,
                high: range.1,
            };
        }
    }

    /// Mark `axis` homed with the trusted `range`
    pub fn set_homed(&mut self, axis: Axis, range: (f64, f64)) {
        self.limits.0[axis.index()] = AxisLimit::Homed {
            low: range.0,
            high: range.1,
        };
    }

    /// Return both axes to unhomed
    pub fn reset(&mut self) {
        self.limits = MotionLimits::unhomed();
    }

    /// Current limits
    pub fn snapshot(&self) -> MotionLimits {
        self.limits
    }

    /// Check whether `axis` is homed
    pub fn is_homed(&self, axis: Axis) -> bool {
        self.limits.get(axis).is_homed()
    }
}
