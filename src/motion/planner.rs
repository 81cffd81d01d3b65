//! Turning an angular delta into a rotation command.

use crate::config::{Degrees, Steps};
use crate::protocol::Command;

use super::inertia::InertiaTable;

/// Direction of dome rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Clockwise (positive delta).
    Clockwise,
    /// Counter-clockwise (negative delta).
    CounterClockwise,
}

impl Direction {
    /// Direction for a signed angular delta. Zero maps to clockwise.
    #[inline]
    pub fn from_delta(delta: Degrees) -> Self {
        if delta.value() < 0.0 {
            Direction::CounterClockwise
        } else {
            Direction::Clockwise
        }
    }

    /// Direction for a signed raw rotation count.
    #[inline]
    pub fn from_count(count: i32) -> Self {
        if count < 0 {
            Direction::CounterClockwise
        } else {
            Direction::Clockwise
        }
    }

    /// Rotation opcode for this direction.
    #[inline]
    pub const fn command(self) -> Command {
        match self {
            Direction::Clockwise => Command::CwRotation,
            Direction::CounterClockwise => Command::CcwRotation,
        }
    }
}

/// A sized, compensated rotation ready to send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MovePlan {
    /// Rotation direction.
    pub direction: Direction,
    /// Steps before compensation.
    pub requested: Steps,
    /// Steps to command.
    pub steps: Steps,
}

impl MovePlan {
    /// Plan a move of `delta` degrees.
    pub fn for_delta(delta: Degrees, steps_per_revolution: u32, inertia: &InertiaTable) -> Self {
        let requested = Steps::from_degrees(delta, steps_per_revolution);
        Self {
            direction: Direction::from_delta(delta),
            requested,
            steps: inertia.compensate(requested),
        }
    }

    /// Plan a move that unwinds a raw rotation count.
    pub fn for_count(count: i32, inertia: &InertiaTable) -> Self {
        let requested = Steps(count.unsigned_abs());
        Self {
            direction: Direction::from_count(count),
            requested,
            steps: inertia.compensate(requested),
        }
    }

    /// Whether nothing needs to be sent.
    #[inline]
    pub fn is_noop(&self) -> bool {
        self.steps.is_zero()
    }
}
