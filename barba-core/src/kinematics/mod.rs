//! A/B kinematics
//!
//! Maps the two logical axes onto their rails and composes the limit
//! tracking, move validation and homing into [`Barba`].

pub mod barba;
pub mod coord;
pub mod rails;
pub mod stepper;

pub use barba::{Barba, KinematicsStatus};
pub use coord::{AbCoord, Axis, Coord, HomingCoord, AXIS_COUNT, COORD_SLOTS, Z_SLOT};
pub use rails::{Rail, RailSet, MAX_STEPPERS_PER_RAIL};
pub use stepper::{ActiveAxes, StepperKinematics};
