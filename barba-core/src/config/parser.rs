//! Text configuration parser
//!
//! Reads the Klipper-style subset used by the kinematics:
//!
//! - `[section]` headers
//! - `key: value` or `key = value` pairs
//! - Comments starting with `#` or `;`, on their own line or trailing
//!
//! Every `[stepper_*]` section becomes a [`RailConfig`]. Other sections
//! (`[printer]`, `[extruder]`, ...), and keys the kinematics does not use
//! (pins, drivers), belong to other subsystems and are skipped.

use core::fmt;

use super::rail::{KinematicsConfig, RailConfig, RailName};
use crate::error::ConfigError;

/// Parse error, with the 1-based line number where it occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Malformed or over-long section header
    InvalidSection { line: usize },
    /// Line is neither a header nor a key/value pair
    InvalidLine { line: usize },
    /// Value has the wrong type for its key
    InvalidValue { line: usize },
    /// More stepper sections than the configuration can hold
    TooManyItems,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::InvalidSection { line } => write!(f, "invalid section header on line {}", line),
            ParseError::InvalidLine { line } => write!(f, "unable to parse line {}", line),
            ParseError::InvalidValue { line } => write!(f, "invalid value on line {}", line),
            ParseError::TooManyItems => write!(f, "too many stepper sections"),
        }
    }
}

/// Current parsing context
#[derive(Debug, Clone)]
enum Section {
    /// Before the first header, or a section owned by another subsystem
    Other,
    Stepper,
}

/// Parse a configuration file into a [`KinematicsConfig`]
///
/// Only syntax and value types are checked here. Range and homing checks
/// happen when the rails are built.
pub fn parse_config(input: &str) -> Result<KinematicsConfig, ConfigError> {
    let mut config = KinematicsConfig::new();
    let mut section = Section::Other;
    let mut current_rail: Option<RailConfig> = None;

    for (index, raw) in input.lines().enumerate() {
        let line_no = index + 1;
        let line = strip_comment(raw).trim();

        if line.is_empty() {
            continue;
        }

        if line.starts_with('[') {
            if !line.ends_with(']') {
                return Err(ParseError::InvalidSection { line: line_no }.into());
            }
            save_section(&mut config, &mut current_rail)?;

            let header = line[1..line.len() - 1].trim();
            section = parse_section_header(header, line_no)?;
            if let Section::Stepper = section {
                let name =
                    RailName::try_from(header).map_err(|_| ParseError::InvalidSection { line: line_no })?;
                current_rail = Some(RailConfig::new(name));
            }
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(ParseError::InvalidLine { line: line_no })?;

        match section {
            Section::Stepper => {
                if let Some(rail) = current_rail.as_mut() {
                    apply_rail_value(rail, key, value, line_no)?;
                }
            }
            Section::Other => {}
        }
    }

    save_section(&mut config, &mut current_rail)?;

    Ok(config)
}

fn save_section(
    config: &mut KinematicsConfig,
    current_rail: &mut Option<RailConfig>,
) -> Result<(), ConfigError> {
    if let Some(rail) = current_rail.take() {
        config
            .set_rail(rail)
            .map_err(|_| ConfigError::Parse(ParseError::TooManyItems))?;
    }
    Ok(())
}

fn parse_section_header(header: &str, line: usize) -> Result<Section, ParseError> {
    if header.is_empty() {
        return Err(ParseError::InvalidSection { line });
    }
    if header.starts_with("stepper_") {
        if header.contains(char::is_whitespace) {
            return Err(ParseError::InvalidSection { line });
        }
        Ok(Section::Stepper)
    } else {
        Ok(Section::Other)
    }
}

/// Drop a trailing `#` or `;` comment
fn strip_comment(line: &str) -> &str {
    match line.find(|c: char| c == '#' || c == ';') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

/// Split "key: value" or "key = value", whichever separator comes first
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let sep = line.find(|c: char| c == ':' || c == '=')?;
    let key = line[..sep].trim();
    let value = line[sep + 1..].trim();

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

fn parse_float(value: &str, line: usize) -> Result<f64, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidValue { line })
}

fn parse_int<T: core::str::FromStr>(value: &str, line: usize) -> Result<T, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidValue { line })
}

fn parse_bool(value: &str, line: usize) -> Result<bool, ParseError> {
    match value {
        "true" | "True" | "1" => Ok(true),
        "false" | "False" | "0" => Ok(false),
        _ => Err(ParseError::InvalidValue { line }),
    }
}

fn apply_rail_value(
    rail: &mut RailConfig,
    key: &str,
    value: &str,
    line: usize,
) -> Result<(), ParseError> {
    match key {
        "position_min" => rail.position_min = parse_float(value, line)?,
        "position_max" => rail.position_max = Some(parse_float(value, line)?),
        "position_endstop" => rail.position_endstop = Some(parse_float(value, line)?),
        "homing_speed" => rail.homing_speed = parse_float(value, line)?,
        "second_homing_speed" => rail.second_homing_speed = Some(parse_float(value, line)?),
        "homing_retract_dist" => rail.homing_retract_dist = parse_float(value, line)?,
        "homing_retract_speed" => rail.homing_retract_speed = Some(parse_float(value, line)?),
        "homing_positive_dir" => rail.homing_positive_dir = Some(parse_bool(value, line)?),
        "rotation_distance" => rail.rotation_distance = Some(parse_float(value, line)?),
        "microsteps" => rail.microsteps = parse_int(value, line)?,
        "full_steps_per_rotation" => rail.full_steps_per_rotation = parse_int(value, line)?,
        _ => {}
    }
    Ok(())
}
