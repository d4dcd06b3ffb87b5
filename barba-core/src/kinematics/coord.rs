//! Axis identifiers and coordinate vectors
//!
//! The planner works in a four-slot coordinate space `[a, b, z, e]`. Only the
//! A and B slots are owned by this core; slot 2 is the vertical axis and
//! slot 3 the auxiliary (extruder-like) axis.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of slots in a planner coordinate
pub const COORD_SLOTS: usize = 4;

/// Number of logical axes owned by the kinematics
pub const AXIS_COUNT: usize = 2;

/// Slot index of the vertical axis
pub const Z_SLOT: usize = 2;

/// Planner coordinate `[a, b, z, e]`
pub type Coord = [f64; COORD_SLOTS];

/// Position of the two logical axes `[a, b]`
pub type AbCoord = [f64; AXIS_COUNT];

/// Partially specified coordinate used for homing targets
///
/// `None` means "leave this slot unchanged".
pub type HomingCoord = [Option<f64>; COORD_SLOTS];

/// Logical axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Axis {
    /// First logical axis, slot 0
    A,
    /// Second logical axis, slot 1
    B,
}

impl Axis {
    /// Both axes in slot order
    pub const ALL: [Axis; AXIS_COUNT] = [Axis::A, Axis::B];

    /// Slot index in a [`Coord`] or [`AbCoord`]
    pub const fn index(self) -> usize {
        match self {
            Axis::A => 0,
            Axis::B => 1,
        }
    }

    /// Lowercase letter used in section names and status strings
    pub const fn letter(self) -> char {
        match self {
            Axis::A => 'a',
            Axis::B => 'b',
        }
    }

    /// Look up an axis by slot index
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Axis::A),
            1 => Some(Axis::B),
            _ => None,
        }
    }

    /// Look up an axis by letter (either case)
    pub fn from_letter(letter: char) -> Option<Self> {
        match letter.to_ascii_lowercase() {
            'a' => Some(Axis::A),
            'b' => Some(Axis::B),
            _ => None,
        }
    }

    /// Configuration section holding this axis' primary stepper
    pub const fn section(self) -> &'static str {
        match self {
            Axis::A => "stepper_a",
            Axis::B => "stepper_b",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_indices() {
        for (i, axis) in Axis::ALL.iter().enumerate() {
            assert_eq!(axis.index(), i);
            assert_eq!(Axis::from_index(i), Some(*axis));
        }
        assert_eq!(Axis::from_index(Z_SLOT), None);
    }

    #[test]
    fn test_axis_letters() {
        assert_eq!(Axis::A.letter(), 'a');
        assert_eq!(Axis::from_letter('B'), Some(Axis::B));
        assert_eq!(Axis::from_letter('z'), None);
        assert_eq!(Axis::B.section(), "stepper_b");
    }
}
