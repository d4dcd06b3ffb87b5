//! Rails of the two logical axes
//!
//! A rail groups every stepper that drives one axis: the primary
//! `stepper_<axis>` plus any `stepper_<axis>1`, `stepper_<axis>2`, ...
//! The primary section fixes the rail's travel range and homing parameters.

use core::fmt::Write;

use heapless::Vec;

use super::coord::{AbCoord, Axis, Coord, AXIS_COUNT};
use super::stepper::StepperKinematics;
use crate::config::{HomingInfo, KinematicsConfig, RailName};
use crate::error::ConfigError;
use crate::traits::{Stepper, StepperProvider, Toolhead};

/// Maximum steppers driving one rail
pub const MAX_STEPPERS_PER_RAIL: usize = 4;

/// All steppers of one logical axis
#[derive(Debug)]
pub struct Rail<S> {
    axis: Axis,
    name: RailName,
    range: (f64, f64),
    homing: HomingInfo,
    steppers: Vec<S, MAX_STEPPERS_PER_RAIL>,
}

impl<S: Stepper> Rail<S> {
    /// Resolve, bind and register the steppers of `axis`
    fn build<P, T>(
        axis: Axis,
        config: &KinematicsConfig,
        provider: &mut P,
        toolhead: &mut T,
    ) -> Result<Self, ConfigError>
    where
        P: StepperProvider<Stepper = S>,
        T: Toolhead,
    {
        let section = axis.section();
        let primary = config
            .rail(section)
            .ok_or(ConfigError::MissingSection(axis))?;
        let settings = primary.settings()?;

        let mut rail = Self {
            axis,
            name: primary.name.clone(),
            range: settings.range,
            homing: settings.homing,
            steppers: Vec::new(),
        };

        let stepper = provider
            .lookup_stepper(section)
            .ok_or(ConfigError::MissingStepper(axis))?;
        rail.attach(stepper, settings.step_distance, toolhead)?;

        for index in 1..=MAX_STEPPERS_PER_RAIL {
            let mut name = RailName::new();
            write!(name, "{}{}", section, index).map_err(|_| ConfigError::TooManySteppers)?;
            let Some(stepper) = provider.lookup_stepper(&name) else {
                break;
            };
            let step_distance = match config.rail(&name) {
                Some(section) => section.step_distance()?,
                None => settings.step_distance,
            };
            rail.attach(stepper, step_distance, toolhead)?;
        }

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "rail {} bound: {} steppers, range {}..{}",
            rail.name.as_str(),
            rail.steppers.len(),
            rail.range.0,
            rail.range.1
        );

        Ok(rail)
    }

    /// Bind one stepper to this rail's axis and wire it to the toolhead
    fn attach<T: Toolhead>(
        &mut self,
        mut stepper: S,
        step_distance: f64,
        toolhead: &mut T,
    ) -> Result<(), ConfigError> {
        stepper.bind_kinematics(StepperKinematics::cartesian(self.axis, step_distance));
        stepper.set_trapq(toolhead.trapq());
        toolhead.register_step_generator(stepper.id());
        self.steppers
            .push(stepper)
            .map_err(|_| ConfigError::TooManySteppers)
    }

    /// Axis driven by this rail
    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// Name of the primary stepper section
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Configured travel range `(min, max)`
    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Homing parameters
    pub fn homing_info(&self) -> &HomingInfo {
        &self.homing
    }

    /// Steppers of this rail, primary first
    pub fn steppers(&self) -> &[S] {
        &self.steppers
    }

    /// Write a planner position into every stepper of the rail
    pub fn set_position(&mut self, position: &Coord) {
        for stepper in self.steppers.iter_mut() {
            stepper.set_position(position);
        }
    }
}

/// The A and B rails
#[derive(Debug)]
pub struct RailSet<S> {
    rails: [Rail<S>; AXIS_COUNT],
}

impl<S: Stepper> RailSet<S> {
    /// Build both rails from configuration
    ///
    /// Each stepper is bound to a cartesian transform for its axis, attached
    /// to the toolhead's trajectory queue and registered for step
    /// generation. This wiring happens once.
    pub fn new<P, T>(
        config: &KinematicsConfig,
        provider: &mut P,
        toolhead: &mut T,
    ) -> Result<Self, ConfigError>
    where
        P: StepperProvider<Stepper = S>,
        T: Toolhead,
    {
        let a = Rail::build(Axis::A, config, provider, toolhead)?;
        let b = Rail::build(Axis::B, config, provider, toolhead)?;
        Ok(Self { rails: [a, b] })
    }

    /// Rail driving `axis`
    pub fn rail(&self, axis: Axis) -> &Rail<S> {
        &self.rails[axis.index()]
    }

    /// Both rails, A first
    pub fn iter(&self) -> impl Iterator<Item = &Rail<S>> {
        self.rails.iter()
    }

    /// Both rails, mutably
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Rail<S>> {
        self.rails.iter_mut()
    }

    /// Every stepper of both rails
    pub fn steppers(&self) -> impl Iterator<Item = &S> {
        self.rails.iter().flat_map(|rail| rail.steppers().iter())
    }

    /// Configured travel range of `axis`
    pub fn range(&self, axis: Axis) -> (f64, f64) {
        self.rail(axis).range()
    }

    /// Homing parameters of `axis`
    pub fn homing_info(&self, axis: Axis) -> &HomingInfo {
        self.rail(axis).homing_info()
    }

    /// Configured lower bounds `[a, b]`
    pub fn axis_minimum(&self) -> AbCoord {
        [self.rails[0].range.0, self.rails[1].range.0]
    }

    /// Configured upper bounds `[a, b]`
    pub fn axis_maximum(&self) -> AbCoord {
        [self.rails[0].range.1, self.rails[1].range.1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RailConfig;
    use crate::testing::{sample_config, FakeProvider, FakeToolhead};

    #[test]
    fn test_build_binds_and_registers() {
        let mut provider = FakeProvider::with(&["stepper_a", "stepper_b", "stepper_b1"]);
        let mut toolhead = FakeToolhead::default();
        let rails = RailSet::new(&sample_config(), &mut provider, &mut toolhead).unwrap();

        let names: std::vec::Vec<&str> = rails.steppers().map(|s| s.name()).collect();
        assert_eq!(names, ["stepper_a", "stepper_b", "stepper_b1"]);
        assert_eq!(toolhead.registered.len(), 3);

        for stepper in rails.steppers() {
            assert_eq!(stepper.trapq, Some(toolhead.trapq()));
            assert!(stepper.kinematics.is_some());
        }

        let b1 = &rails.rail(Axis::B).steppers()[1];
        assert_eq!(b1.kinematics.unwrap().axis(), Axis::B);
    }

    #[test]
    fn test_ranges_and_homing_info() {
        let mut provider = FakeProvider::with(&["stepper_a", "stepper_b"]);
        let mut toolhead = FakeToolhead::default();
        let rails = RailSet::new(&sample_config(), &mut provider, &mut toolhead).unwrap();

        assert_eq!(rails.range(Axis::A), (0.0, 200.0));
        assert_eq!(rails.range(Axis::B), (-50.0, 50.0));
        assert_eq!(rails.axis_minimum(), [0.0, -50.0]);
        assert_eq!(rails.axis_maximum(), [200.0, 50.0]);
        assert!(!rails.homing_info(Axis::A).positive_dir);
        assert!(rails.homing_info(Axis::B).positive_dir);
        assert_eq!(rails.rail(Axis::B).name(), "stepper_b");
    }

    #[test]
    fn test_missing_section() {
        let mut config = sample_config();
        config.rails.retain(|r| r.name.as_str() != "stepper_b");
        let mut provider = FakeProvider::with(&["stepper_a", "stepper_b"]);
        let mut toolhead = FakeToolhead::default();

        let err = RailSet::new(&config, &mut provider, &mut toolhead).unwrap_err();
        assert_eq!(err, ConfigError::MissingSection(Axis::B));
    }

    #[test]
    fn test_missing_stepper() {
        let mut provider = FakeProvider::with(&["stepper_b"]);
        let mut toolhead = FakeToolhead::default();

        let err = RailSet::new(&sample_config(), &mut provider, &mut toolhead).unwrap_err();
        assert_eq!(err, ConfigError::MissingStepper(Axis::A));
    }

    #[test]
    fn test_too_many_steppers() {
        let mut provider = FakeProvider::with(&[
            "stepper_a",
            "stepper_a1",
            "stepper_a2",
            "stepper_a3",
            "stepper_a4",
            "stepper_b",
        ]);
        let mut toolhead = FakeToolhead::default();

        let err = RailSet::new(&sample_config(), &mut provider, &mut toolhead).unwrap_err();
        assert_eq!(err, ConfigError::TooManySteppers);
    }

    #[test]
    fn test_extra_stepper_step_distance() {
        let mut provider = FakeProvider::with(&["stepper_a", "stepper_a1", "stepper_b", "stepper_b1"]);
        let mut toolhead = FakeToolhead::default();
        let rails = RailSet::new(&sample_config(), &mut provider, &mut toolhead).unwrap();

        // stepper_a1 has no section and follows the primary
        let a1 = rails.rail(Axis::A).steppers()[1].kinematics.unwrap();
        assert_eq!(a1.step_distance(), 40.0 / 3200.0);

        let b1 = rails.rail(Axis::B).steppers()[1].kinematics.unwrap();
        assert_eq!(b1.step_distance(), 4.0 / 3200.0);
    }

    #[test]
    fn test_invalid_extra_stepper_section() {
        let mut config = sample_config();
        let mut a1 = RailConfig::new(RailName::try_from("stepper_a1").unwrap());
        a1.rotation_distance = Some(-4.0);
        config.set_rail(a1).unwrap();
        let mut provider = FakeProvider::with(&["stepper_a", "stepper_a1", "stepper_b"]);
        let mut toolhead = FakeToolhead::default();

        let err = RailSet::new(&config, &mut provider, &mut toolhead).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                section: RailName::try_from("stepper_a1").unwrap(),
                option: "rotation_distance",
            }
        );

        let mut config = sample_config();
        config
            .set_rail(RailConfig::new(RailName::try_from("stepper_a1").unwrap()))
            .unwrap();
        let mut provider = FakeProvider::with(&["stepper_a", "stepper_a1", "stepper_b"]);
        let err = RailSet::new(&config, &mut provider, &mut toolhead).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingOption {
                option: "rotation_distance",
                ..
            }
        ));
    }

    #[test]
    fn test_set_position_reaches_every_stepper() {
        let mut provider = FakeProvider::with(&["stepper_a", "stepper_a1", "stepper_b"]);
        let mut toolhead = FakeToolhead::default();
        let mut rails = RailSet::new(&sample_config(), &mut provider, &mut toolhead).unwrap();

        for rail in rails.iter_mut() {
            rail.set_position(&[12.0, -3.0, 0.0, 0.0]);
        }

        let positions: std::vec::Vec<f64> = rails.steppers().map(|s| s.position).collect();
        assert_eq!(positions, [12.0, 12.0, -3.0]);
    }
}
