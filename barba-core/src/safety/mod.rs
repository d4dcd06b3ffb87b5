//! Travel-limit safety
//!
//! Tracks which axes are homed, rejects moves outside the trusted range and
//! resets everything when the motors are switched off.

pub mod limits;
pub mod motor_off;
pub mod validator;

pub use limits::{AxisLimit, LimitTracker, MotionLimits};
pub use motor_off::MotorOffLatch;
pub use validator::{check_move, Move};
