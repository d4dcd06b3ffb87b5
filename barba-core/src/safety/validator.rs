//! Move validation against the trusted limits
//!
//! Runs before a move is handed to the trajectory queue. Once queued a move
//! cannot be taken back, so a rejection here is the only chance to stop it.

use super::limits::MotionLimits;
use crate::error::MoveError;
use crate::kinematics::{Axis, Coord, COORD_SLOTS, Z_SLOT};

/// A planner move as seen by the limit check
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Move {
    /// Start position `[a, b, z, e]`
    pub start_pos: Coord,
    /// End position `[a, b, z, e]`
    pub end_pos: Coord,
    /// Per-slot displacement `end - start`
    pub axes_d: Coord,
}

impl Move {
    /// Create a move between two positions
    pub fn new(start_pos: Coord, end_pos: Coord) -> Self {
        let mut axes_d = [0.0; COORD_SLOTS];
        for (d, (s, e)) in axes_d.iter_mut().zip(start_pos.iter().zip(end_pos.iter())) {
            *d = e - s;
        }
        Self {
            start_pos,
            end_pos,
            axes_d,
        }
    }

    /// Check whether the move displaces coordinate `slot`
    pub fn has_displacement(&self, slot: usize) -> bool {
        self.axes_d[slot] != 0.0
    }
}

/// Accept or reject `mv` against `limits`
///
/// The A/B end position is checked first; only when it falls outside the
/// trusted box are the individual axes examined. A move along the vertical
/// slot repeats the per-axis check regardless of that outcome.
pub fn check_move(mv: &Move, limits: &MotionLimits) -> Result<(), MoveError> {
    let inside = Axis::ALL
        .iter()
        .all(|&axis| limits.get(axis).contains(mv.end_pos[axis.index()]));
    if !inside {
        check_endstops(mv, limits)?;
    }

    if !mv.has_displacement(Z_SLOT) {
        return Ok(());
    }

    check_endstops(mv, limits)
}

/// Per-axis check, only for axes the move actually displaces
fn check_endstops(mv: &Move, limits: &MotionLimits) -> Result<(), MoveError> {
    for axis in Axis::ALL {
        let slot = axis.index();
        let limit = limits.get(axis);
        if mv.has_displacement(slot) && !limit.contains(mv.end_pos[slot]) {
            let end_pos = mv.end_pos;
            if !limit.is_homed() {
                return Err(MoveError::Unhomed { axis, end_pos });
            }
            return Err(MoveError::OutOfRange { axis, end_pos });
        }
    }
    Ok(())
}
