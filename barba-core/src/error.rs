//! Error types
//!
//! Configuration errors are fatal at startup. Move errors reject a single
//! move and leave the firmware running. Homing errors belong to the homing
//! executor and pass through this crate unchanged.

use core::fmt;

use crate::config::parser::ParseError;
use crate::config::RailName;
use crate::kinematics::{Axis, Coord};

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Required `stepper_<axis>` section is missing
    MissingSection(Axis),
    /// Stepper provider has no stepper for the axis section
    MissingStepper(Axis),
    /// Required option missing from a section
    MissingOption {
        section: RailName,
        option: &'static str,
    },
    /// `position_max` is not above `position_min`
    InvalidRange(RailName),
    /// `position_endstop` lies outside `[position_min, position_max]`
    EndstopOutOfRange(RailName),
    /// Homing direction cannot be inferred from the endstop position
    AmbiguousHomingDir(RailName),
    /// Explicit homing direction contradicts the endstop position
    InvalidHomingDir(RailName),
    /// Option value out of its allowed range
    InvalidValue {
        section: RailName,
        option: &'static str,
    },
    /// More rails or steppers than the fixed capacity allows
    TooManySteppers,
    /// Text configuration could not be parsed
    Parse(ParseError),
    /// Binary configuration could not be serialized
    Encode,
    /// Binary configuration could not be deserialized or has a bad header
    Decode,
}

impl From<ParseError> for ConfigError {
    fn from(e: ParseError) -> Self {
        ConfigError::Parse(e)
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingSection(axis) => {
                write!(f, "Section '{}' not found", axis.section())
            }
            ConfigError::MissingStepper(axis) => {
                write!(f, "No stepper registered for '{}'", axis.section())
            }
            ConfigError::MissingOption { section, option } => {
                write!(f, "Option '{}' in section '{}' must be specified", option, section)
            }
            ConfigError::InvalidRange(section) => write!(
                f,
                "position_max in section '{}' must be above position_min",
                section
            ),
            ConfigError::EndstopOutOfRange(section) => write!(
                f,
                "position_endstop in section '{}' must be between position_min and position_max",
                section
            ),
            ConfigError::AmbiguousHomingDir(section) => write!(
                f,
                "Unable to infer homing_positive_dir in section '{}'",
                section
            ),
            ConfigError::InvalidHomingDir(section) => write!(
                f,
                "Invalid homing_positive_dir / position_endstop in '{}'",
                section
            ),
            ConfigError::InvalidValue { section, option } => {
                write!(f, "Option '{}' in section '{}' is out of range", option, section)
            }
            ConfigError::TooManySteppers => write!(f, "Too many steppers configured"),
            ConfigError::Parse(e) => write!(f, "Config parse error: {}", e),
            ConfigError::Encode => write!(f, "Unable to encode configuration"),
            ConfigError::Decode => write!(f, "Unable to decode configuration"),
        }
    }
}

/// Move rejected by the limit check
///
/// Carries the offending axis and the full end position of the move.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MoveError {
    /// The axis has not been homed, its range is not trusted
    Unhomed { axis: Axis, end_pos: Coord },
    /// The end position lies outside the homed range
    OutOfRange { axis: Axis, end_pos: Coord },
}

impl MoveError {
    /// Axis that failed the check
    pub fn axis(&self) -> Axis {
        match self {
            MoveError::Unhomed { axis, .. } | MoveError::OutOfRange { axis, .. } => *axis,
        }
    }

    /// End position of the rejected move
    pub fn end_pos(&self) -> &Coord {
        match self {
            MoveError::Unhomed { end_pos, .. } | MoveError::OutOfRange { end_pos, .. } => end_pos,
        }
    }

    /// Operator-facing message prefix
    pub fn message(&self) -> &'static str {
        match self {
            MoveError::Unhomed { .. } => "Must home axis first",
            MoveError::OutOfRange { .. } => "Move out of range",
        }
    }
}

impl fmt::Display for MoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ep = self.end_pos();
        write!(
            f,
            "{}: {:.3} {:.3} {:.3} [{:.3}]",
            self.message(),
            ep[0],
            ep[1],
            ep[2],
            ep[3]
        )
    }
}

/// Errors from position mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KinematicsError {
    /// No measured position was supplied for the axis' primary stepper
    MissingStepperPosition(Axis),
}

impl fmt::Display for KinematicsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KinematicsError::MissingStepperPosition(axis) => {
                write!(f, "No position reported for '{}'", axis.section())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_error_message() {
        let err = MoveError::Unhomed {
            axis: Axis::A,
            end_pos: [10.0, 20.5, 0.0, 1.25],
        };
        assert_eq!(
            format!("{}", err),
            "Must home axis first: 10.000 20.500 0.000 [1.250]"
        );
        assert_eq!(err.axis(), Axis::A);

        let err = MoveError::OutOfRange {
            axis: Axis::B,
            end_pos: [0.0, 250.0, 0.0, 0.0],
        };
        assert_eq!(
            format!("{}", err),
            "Move out of range: 0.000 250.000 0.000 [0.000]"
        );
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::MissingSection(Axis::B);
        assert_eq!(format!("{}", err), "Section 'stepper_b' not found");

        let section = RailName::try_from("stepper_a").unwrap();
        let err = ConfigError::EndstopOutOfRange(section);
        assert!(format!("{}", err).contains("stepper_a"));
    }
}
