//! Test doubles for the collaborator traits

use crate::config::{parse_config, KinematicsConfig};
use crate::homing::HomingRequest;
use crate::kinematics::{Axis, Coord, Rail, StepperKinematics};
use crate::safety::MotorOffLatch;
use crate::traits::{HomingExecutor, Stepper, StepperId, StepperProvider, Toolhead, TrapqId};

const SAMPLE_CONFIG: &str = r#"
[printer]
kinematics: barba
max_velocity: 300
max_accel: 3000

[stepper_a]
rotation_distance: 40
position_endstop: 0
position_max: 200

[stepper_b]
rotation_distance: 8
position_min: -50
position_endstop: 50
position_max: 50
homing_positive_dir: true

[stepper_b1]
rotation_distance: 4
"#;

/// A: 0..200 homing to min, B: -50..50 homing to max
pub fn sample_config() -> KinematicsConfig {
    parse_config(SAMPLE_CONFIG).unwrap()
}

#[derive(Debug)]
pub struct FakeStepper {
    pub name: String,
    pub id: StepperId,
    pub trapq: Option<TrapqId>,
    pub kinematics: Option<StepperKinematics>,
    pub position: f64,
}

impl Stepper for FakeStepper {
    fn name(&self) -> &str {
        &self.name
    }

    fn id(&self) -> StepperId {
        self.id
    }

    fn bind_kinematics(&mut self, kinematics: StepperKinematics) {
        self.kinematics = Some(kinematics);
    }

    fn set_trapq(&mut self, trapq: TrapqId) {
        self.trapq = Some(trapq);
    }

    fn set_position(&mut self, position: &Coord) {
        if let Some(kinematics) = self.kinematics.as_mut() {
            kinematics.set_position(position[0], position[1]);
            self.position = kinematics.commanded_position();
        }
    }
}

/// Hands out steppers by section name, each one only once
#[derive(Debug, Default)]
pub struct FakeProvider {
    available: Vec<FakeStepper>,
}

impl FakeProvider {
    pub fn with(names: &[&str]) -> Self {
        let available = names
            .iter()
            .enumerate()
            .map(|(i, name)| FakeStepper {
                name: name.to_string(),
                id: StepperId(i as u8),
                trapq: None,
                kinematics: None,
                position: 0.0,
            })
            .collect();
        Self { available }
    }
}

impl StepperProvider for FakeProvider {
    type Stepper = FakeStepper;

    fn lookup_stepper(&mut self, section: &str) -> Option<FakeStepper> {
        let index = self.available.iter().position(|s| s.name == section)?;
        Some(self.available.remove(index))
    }
}

#[derive(Debug)]
pub struct FakeToolhead {
    pub registered: Vec<StepperId>,
    pub max_velocity: (f64, f64),
}

impl Default for FakeToolhead {
    fn default() -> Self {
        Self {
            registered: Vec::new(),
            max_velocity: (300.0, 3000.0),
        }
    }
}

impl Toolhead for FakeToolhead {
    fn trapq(&self) -> TrapqId {
        TrapqId(0)
    }

    fn register_step_generator(&mut self, stepper: StepperId) {
        self.registered.push(stepper);
    }

    fn max_velocity(&self) -> (f64, f64) {
        self.max_velocity
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomingFailure {
    EndstopNotTriggered(Axis),
}

/// Records every request; can fail on one axis or raise motor-off mid-run
#[derive(Debug)]
pub struct FakeExecutor<'a> {
    pub axes: Vec<Axis>,
    pub requests: Vec<HomingRequest>,
    pub fail_on: Option<Axis>,
    pub motor_off: Option<&'a MotorOffLatch>,
}

impl FakeExecutor<'_> {
    pub fn new(axes: &[Axis]) -> Self {
        Self {
            axes: axes.to_vec(),
            requests: Vec::new(),
            fail_on: None,
            motor_off: None,
        }
    }
}

impl<S: Stepper> HomingExecutor<S> for FakeExecutor<'_> {
    type Error = HomingFailure;

    fn axes(&self) -> &[Axis] {
        &self.axes
    }

    fn home_rails(&mut self, rail: &Rail<S>, request: &HomingRequest) -> Result<(), HomingFailure> {
        self.requests.push(*request);
        if let Some(latch) = self.motor_off {
            latch.notify();
        }
        if self.fail_on == Some(rail.axis()) {
            return Err(HomingFailure::EndstopNotTriggered(rail.axis()));
        }
        Ok(())
    }
}
