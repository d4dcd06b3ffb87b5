//! Board-agnostic kinematics core for the Barba A/B motion firmware
//!
//! This crate sits between the motion planner and the step generators:
//!
//! - Axis-to-rail position mapping and step transforms
//! - Travel-limit tracking and move validation
//! - Sequential homing of the A and B axes
//! - Lifecycle hooks (motor-off reset, status reporting)
//! - Rail configuration types, text parser and binary persistence
//!
//! Hardware, the planner and the homing probe are reached only through the
//! traits in [`traits`].

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod homing;
pub mod kinematics;
pub mod safety;
pub mod traits;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{ConfigError, KinematicsError, MoveError};
pub use kinematics::{Axis, Barba, Coord, KinematicsStatus};
