//! Motor-off notification
//!
//! The stepper-enable subsystem raises motor-off independently of the
//! kinematics. It bumps a shared epoch here; the kinematics compares the
//! epoch against the last one it applied before trusting any limit.

use portable_atomic::{AtomicU32, Ordering};

/// Shared motor-off latch
#[derive(Debug, Default)]
pub struct MotorOffLatch {
    epoch: AtomicU32,
}

impl MotorOffLatch {
    /// Create a latch with no pending notification
    pub const fn new() -> Self {
        Self {
            epoch: AtomicU32::new(0),
        }
    }

    /// Signal that the motors were switched off
    pub fn notify(&self) {
        self.epoch.fetch_add(1, Ordering::AcqRel);
    }

    /// Number of notifications so far (wrapping)
    pub fn epoch(&self) -> u32 {
        self.epoch.load(Ordering::Acquire)
    }
}
