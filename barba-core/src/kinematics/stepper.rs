//! Per-stepper step transform
//!
//! Each stepper of a rail is bound to one of these at startup. The transform
//! is cartesian: the stepper position is the coordinate of its axis, nothing
//! else contributes.

use bitflags::bitflags;

use super::coord::{AbCoord, Axis, Coord};

bitflags! {
    /// Axes whose motion moves a stepper
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ActiveAxes: u8 {
        const A = 1 << 0;
        const B = 1 << 1;
    }
}

impl ActiveAxes {
    /// Flag for a single axis
    pub const fn of(axis: Axis) -> Self {
        match axis {
            Axis::A => ActiveAxes::A,
            Axis::B => ActiveAxes::B,
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ActiveAxes {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "ActiveAxes({=u8:#x})", self.bits());
    }
}

/// Step-to-position transform for one stepper
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StepperKinematics {
    /// Axis this stepper follows
    axis: Axis,
    /// Axes that move this stepper
    active: ActiveAxes,
    /// Travel per step in mm
    step_distance: f64,
    /// Last position written through `set_position`
    commanded_pos: f64,
}

impl StepperKinematics {
    /// Cartesian transform following `axis`
    pub const fn cartesian(axis: Axis, step_distance: f64) -> Self {
        Self {
            axis,
            active: ActiveAxes::of(axis),
            step_distance,
            commanded_pos: 0.0,
        }
    }

    /// Axis this stepper follows
    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// Axes that move this stepper
    pub fn active_axes(&self) -> ActiveAxes {
        self.active
    }

    /// Travel per step in mm
    pub fn step_distance(&self) -> f64 {
        self.step_distance
    }

    /// Stepper position for an A/B coordinate
    pub fn calc_position_from_coord(&self, a: f64, b: f64) -> f64 {
        match self.axis {
            Axis::A => a,
            Axis::B => b,
        }
    }

    /// Stepper position for a planner coordinate
    pub fn calc_position(&self, coord: &Coord) -> f64 {
        self.calc_position_from_coord(coord[0], coord[1])
    }

    /// Record the commanded position for an A/B coordinate
    pub fn set_position(&mut self, a: f64, b: f64) {
        self.commanded_pos = self.calc_position_from_coord(a, b);
    }

    /// Last commanded stepper position
    pub fn commanded_position(&self) -> f64 {
        self.commanded_pos
    }

    /// Check whether motion along the lettered axis moves this stepper
    pub fn is_active_axis(&self, letter: char) -> bool {
        Axis::from_letter(letter).is_some_and(|axis| self.active.contains(ActiveAxes::of(axis)))
    }

    /// Commanded position expressed as an A/B pair with the other axis zeroed
    pub fn commanded_coord(&self) -> AbCoord {
        let mut coord = [0.0; 2];
        coord[self.axis.index()] = self.commanded_pos;
        coord
    }
}
