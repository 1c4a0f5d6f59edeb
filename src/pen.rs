//! The pen: a cursor that chains path-building calls.
//!
//! A pen movement runs from `begin` (which opens a host path) to `stop`
//! (which closes it). Between the two, the pen remembers where the last
//! move or line ended so relative moves can be expressed as deltas.

#[cfg(test)]
#[path = "pen_test.rs"]
mod pen_test;

use crate::error::DisplayError;
use crate::geometry::Point;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Pen {
    active: bool,
    position: Point,
}

impl Pen {
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Start a pen movement. Fails if one is already running.
    pub fn begin(&mut self) -> Result<(), DisplayError> {
        if self.active {
            return Err(DisplayError::PenAlreadyActive);
        }
        self.active = true;
        Ok(())
    }

    /// The current position, or an error naming `op` if no movement is running.
    pub fn require(&self, op: &'static str) -> Result<Point, DisplayError> {
        if self.active { Ok(self.position) } else { Err(DisplayError::PenInactive(op)) }
    }

    /// Fail with an error naming `op` if a movement is running.
    pub fn require_stopped(&self, op: &'static str) -> Result<(), DisplayError> {
        if self.active { Err(DisplayError::PenActive(op)) } else { Ok(()) }
    }

    pub(crate) fn set_position(&mut self, to: Point) {
        self.position = to;
    }

    /// End the movement and return the cursor to the origin.
    pub(crate) fn stop(&mut self) {
        *self = Self::default();
    }
}
