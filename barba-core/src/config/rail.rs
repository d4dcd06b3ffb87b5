//! Rail configuration types
//!
//! One `[stepper_*]` section per stepper. The primary section of an axis
//! (`stepper_a`, `stepper_b`) also carries the travel range and homing
//! parameters for the whole rail.

use heapless::{String, Vec};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Maximum length of a section name
pub const MAX_NAME_LEN: usize = 24;

/// Maximum number of `[stepper_*]` sections
pub const MAX_RAIL_SECTIONS: usize = 8;

/// Current configuration format version
pub const CONFIG_VERSION: u8 = 1;

/// Section name of a stepper
pub type RailName = String<MAX_NAME_LEN>;

/// Default homing speed in mm/s
pub const DEFAULT_HOMING_SPEED: f64 = 5.0;

/// Default retract distance after the first homing touch, in mm
pub const DEFAULT_RETRACT_DIST: f64 = 5.0;

/// Default microstep setting
pub const DEFAULT_MICROSTEPS: u16 = 16;

/// Default full steps per motor rotation (1.8° motors)
pub const DEFAULT_FULL_STEPS: u16 = 200;

/// Homing parameters of a rail
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HomingInfo {
    /// Axis position when the endstop triggers
    pub position_endstop: f64,
    /// Home toward the maximum (true) or the minimum (false)
    pub positive_dir: bool,
    /// First approach speed in mm/s
    pub speed: f64,
    /// Second, slower approach speed in mm/s
    pub second_speed: f64,
    /// Retract distance between approaches in mm
    pub retract_dist: f64,
    /// Retract speed in mm/s
    pub retract_speed: f64,
}

/// Validated settings of a primary rail section
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RailSettings {
    /// Travel range `(min, max)`
    pub range: (f64, f64),
    /// Homing parameters
    pub homing: HomingInfo,
    /// Travel per step in mm
    pub step_distance: f64,
}

/// One `[stepper_*]` section
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RailConfig {
    /// Section name (e.g. "stepper_a", "stepper_b1")
    pub name: RailName,
    /// Lower travel bound in mm
    pub position_min: f64,
    /// Upper travel bound in mm (required on primary sections)
    pub position_max: Option<f64>,
    /// Endstop trigger position in mm (required on primary sections)
    pub position_endstop: Option<f64>,
    /// Homing speed in mm/s
    pub homing_speed: f64,
    /// Second homing speed, defaults to half the homing speed
    pub second_homing_speed: Option<f64>,
    /// Retract distance between homing approaches
    pub homing_retract_dist: f64,
    /// Retract speed, defaults to the homing speed
    pub homing_retract_speed: Option<f64>,
    /// Explicit homing direction, inferred from the endstop when absent
    pub homing_positive_dir: Option<bool>,
    /// Travel per full motor rotation in mm
    pub rotation_distance: Option<f64>,
    /// Microsteps per full step
    pub microsteps: u16,
    /// Full steps per motor rotation
    pub full_steps_per_rotation: u16,
}

impl RailConfig {
    /// Create a section with defaults for every optional value
    pub fn new(name: RailName) -> Self {
        Self {
            name,
            position_min: 0.0,
            position_max: None,
            position_endstop: None,
            homing_speed: DEFAULT_HOMING_SPEED,
            second_homing_speed: None,
            homing_retract_dist: DEFAULT_RETRACT_DIST,
            homing_retract_speed: None,
            homing_positive_dir: None,
            rotation_distance: None,
            microsteps: DEFAULT_MICROSTEPS,
            full_steps_per_rotation: DEFAULT_FULL_STEPS,
        }
    }

    fn missing(&self, option: &'static str) -> ConfigError {
        ConfigError::MissingOption {
            section: self.name.clone(),
            option,
        }
    }

    fn invalid(&self, option: &'static str) -> ConfigError {
        ConfigError::InvalidValue {
            section: self.name.clone(),
            option,
        }
    }

    /// Travel per microstep in mm
    pub fn step_distance(&self) -> Result<f64, ConfigError> {
        let rotation_distance = self
            .rotation_distance
            .ok_or_else(|| self.missing("rotation_distance"))?;
        if rotation_distance <= 0.0 {
            return Err(self.invalid("rotation_distance"));
        }
        if self.microsteps == 0 {
            return Err(self.invalid("microsteps"));
        }
        if self.full_steps_per_rotation == 0 {
            return Err(self.invalid("full_steps_per_rotation"));
        }
        let steps = self.full_steps_per_rotation as f64 * self.microsteps as f64;
        Ok(rotation_distance / steps)
    }

    /// Travel range `(min, max)`
    pub fn range(&self) -> Result<(f64, f64), ConfigError> {
        let max = self.position_max.ok_or_else(|| self.missing("position_max"))?;
        if max <= self.position_min {
            return Err(ConfigError::InvalidRange(self.name.clone()));
        }
        Ok((self.position_min, max))
    }

    /// Homing parameters, with the homing direction inferred when not set
    pub fn homing_info(&self) -> Result<HomingInfo, ConfigError> {
        let (min, max) = self.range()?;
        let endstop = self
            .position_endstop
            .ok_or_else(|| self.missing("position_endstop"))?;
        if endstop < min || endstop > max {
            return Err(ConfigError::EndstopOutOfRange(self.name.clone()));
        }

        if self.homing_speed <= 0.0 {
            return Err(self.invalid("homing_speed"));
        }
        let second_speed = self.second_homing_speed.unwrap_or(self.homing_speed / 2.0);
        if second_speed <= 0.0 {
            return Err(self.invalid("second_homing_speed"));
        }
        let retract_speed = self.homing_retract_speed.unwrap_or(self.homing_speed);
        if retract_speed <= 0.0 {
            return Err(self.invalid("homing_retract_speed"));
        }
        if self.homing_retract_dist < 0.0 {
            return Err(self.invalid("homing_retract_dist"));
        }

        let positive_dir = match self.homing_positive_dir {
            Some(positive) => {
                if (positive && endstop == min) || (!positive && endstop == max) {
                    return Err(ConfigError::InvalidHomingDir(self.name.clone()));
                }
                positive
            }
            None => {
                let quarter = (max - min) / 4.0;
                if endstop <= min + quarter {
                    false
                } else if endstop >= max - quarter {
                    true
                } else {
                    return Err(ConfigError::AmbiguousHomingDir(self.name.clone()));
                }
            }
        };

        Ok(HomingInfo {
            position_endstop: endstop,
            positive_dir,
            speed: self.homing_speed,
            second_speed,
            retract_dist: self.homing_retract_dist,
            retract_speed,
        })
    }

    /// Validate a primary rail section
    pub fn settings(&self) -> Result<RailSettings, ConfigError> {
        Ok(RailSettings {
            range: self.range()?,
            homing: self.homing_info()?,
            step_distance: self.step_distance()?,
        })
    }
}

/// Kinematics configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KinematicsConfig {
    /// Format version
    pub version: u8,
    /// All `[stepper_*]` sections
    pub rails: Vec<RailConfig, MAX_RAIL_SECTIONS>,
}

impl Default for KinematicsConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl KinematicsConfig {
    /// Empty configuration
    pub fn new() -> Self {
        Self {
            version: CONFIG_VERSION,
            rails: Vec::new(),
        }
    }

    /// Find a stepper section by name
    pub fn rail(&self, name: &str) -> Option<&RailConfig> {
        self.rails.iter().find(|r| r.name.as_str() == name)
    }

    /// Add or replace a stepper section
    pub fn set_rail(&mut self, rail: RailConfig) -> Result<(), ConfigError> {
        if let Some(existing) = self.rails.iter_mut().find(|r| r.name == rail.name) {
            *existing = rail;
            return Ok(());
        }
        self.rails
            .push(rail)
            .map_err(|_| ConfigError::TooManySteppers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rail(endstop: f64, min: f64, max: f64) -> RailConfig {
        let mut r = RailConfig::new(RailName::try_from("stepper_a").unwrap());
        r.position_min = min;
        r.position_max = Some(max);
        r.position_endstop = Some(endstop);
        r.rotation_distance = Some(40.0);
        r
    }

    #[test]
    fn test_step_distance() {
        let r = rail(0.0, 0.0, 200.0);
        // 40mm / (200 * 16)
        assert_eq!(r.step_distance().unwrap(), 0.0125);
    }

    #[test]
    fn test_missing_required_options() {
        let r = RailConfig::new(RailName::try_from("stepper_a").unwrap());
        assert!(matches!(
            r.range(),
            Err(ConfigError::MissingOption { option: "position_max", .. })
        ));
        assert!(matches!(
            r.step_distance(),
            Err(ConfigError::MissingOption { option: "rotation_distance", .. })
        ));

        let mut r = rail(0.0, 0.0, 200.0);
        r.position_endstop = None;
        assert!(matches!(
            r.homing_info(),
            Err(ConfigError::MissingOption { option: "position_endstop", .. })
        ));
    }

    #[test]
    fn test_range_must_be_ordered() {
        let r = rail(0.0, 10.0, 10.0);
        assert!(matches!(r.range(), Err(ConfigError::InvalidRange(_))));
    }

    #[test]
    fn test_endstop_outside_range() {
        let r = rail(250.0, 0.0, 200.0);
        assert!(matches!(
            r.homing_info(),
            Err(ConfigError::EndstopOutOfRange(_))
        ));
    }

    #[test]
    fn test_infer_homing_direction() {
        assert!(!rail(0.0, 0.0, 200.0).homing_info().unwrap().positive_dir);
        assert!(!rail(50.0, 0.0, 200.0).homing_info().unwrap().positive_dir);
        assert!(rail(200.0, 0.0, 200.0).homing_info().unwrap().positive_dir);
        assert!(rail(150.0, 0.0, 200.0).homing_info().unwrap().positive_dir);
        assert!(matches!(
            rail(100.0, 0.0, 200.0).homing_info(),
            Err(ConfigError::AmbiguousHomingDir(_))
        ));
    }

    #[test]
    fn test_explicit_homing_direction() {
        let mut r = rail(100.0, 0.0, 200.0);
        r.homing_positive_dir = Some(true);
        assert!(r.homing_info().unwrap().positive_dir);

        let mut r = rail(0.0, 0.0, 200.0);
        r.homing_positive_dir = Some(true);
        assert!(matches!(
            r.homing_info(),
            Err(ConfigError::InvalidHomingDir(_))
        ));

        let mut r = rail(200.0, 0.0, 200.0);
        r.homing_positive_dir = Some(false);
        assert!(matches!(
            r.homing_info(),
            Err(ConfigError::InvalidHomingDir(_))
        ));
    }

    #[test]
    fn test_homing_speed_defaults() {
        let mut r = rail(0.0, 0.0, 200.0);
        r.homing_speed = 20.0;
        let info = r.homing_info().unwrap();
        assert_eq!(info.speed, 20.0);
        assert_eq!(info.second_speed, 10.0);
        assert_eq!(info.retract_speed, 20.0);
        assert_eq!(info.retract_dist, DEFAULT_RETRACT_DIST);

        r.homing_speed = 0.0;
        assert!(matches!(
            r.homing_info(),
            Err(ConfigError::InvalidValue { option: "homing_speed", .. })
        ));
    }

    #[test]
    fn test_set_rail_replaces_by_name() {
        let mut config = KinematicsConfig::new();
        config.set_rail(rail(0.0, 0.0, 200.0)).unwrap();
        config.set_rail(rail(0.0, 0.0, 300.0)).unwrap();

        assert_eq!(config.rails.len(), 1);
        assert_eq!(config.rail("stepper_a").unwrap().position_max, Some(300.0));
        assert!(config.rail("stepper_b").is_none());
    }
}
