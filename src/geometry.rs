//! Plain geometric arguments passed through to path and blit operations.
//!
//! Each type carries its own range checks so the display only has to call
//! `validate` before forwarding to the surface.

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use crate::consts::FULL_TURN;
use crate::error::{DisplayError, ensure_finite, ensure_non_negative, ensure_positive};

/// A point in canvas space (CSS pixels).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// This point shifted by `(dx, dy)`.
    #[must_use]
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self { x: self.x + dx, y: self.y + dy }
    }

    pub(crate) fn validate(self, op: &'static str) -> Result<(), DisplayError> {
        ensure_finite(op, &[("x", self.x), ("y", self.y)])
    }
}

/// An axis-aligned rectangle with strictly positive extent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub(crate) fn validate(&self, op: &'static str) -> Result<(), DisplayError> {
        ensure_finite(op, &[("x", self.x), ("y", self.y)])?;
        ensure_positive(op, &[("width", self.width), ("height", self.height)])
    }
}

/// A circular arc around `center`.
///
/// Angles are radians measured from the positive x axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcSpec {
    pub center: Point,
    pub radius: f64,
    pub start_angle: f64,
    pub end_angle: f64,
    pub anticlockwise: bool,
}

impl ArcSpec {
    /// A full clockwise circle.
    #[must_use]
    pub fn circle(center: Point, radius: f64) -> Self {
        Self {
            center,
            radius,
            start_angle: 0.0,
            end_angle: FULL_TURN,
            anticlockwise: false,
        }
    }

    /// Restrict the arc to `[start, end]`.
    #[must_use]
    pub fn angles(mut self, start: f64, end: f64) -> Self {
        self.start_angle = start;
        self.end_angle = end;
        self
    }

    #[must_use]
    pub fn anticlockwise(mut self, anticlockwise: bool) -> Self {
        self.anticlockwise = anticlockwise;
        self
    }

    pub(crate) fn validate(&self, op: &'static str) -> Result<(), DisplayError> {
        self.center.validate(op)?;
        ensure_positive(op, &[("r", self.radius)])?;
        ensure_finite(op, &[("startAngle", self.start_angle), ("endAngle", self.end_angle)])
    }
}

/// An elliptical arc around `center`, rotated by `rotation` radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EllipseSpec {
    pub center: Point,
    pub radius_x: f64,
    pub radius_y: f64,
    pub rotation: f64,
    pub start_angle: f64,
    pub end_angle: f64,
    pub anticlockwise: bool,
}

impl EllipseSpec {
    /// A full, unrotated, clockwise ellipse.
    #[must_use]
    pub fn new(center: Point, radius_x: f64, radius_y: f64) -> Self {
        Self {
            center,
            radius_x,
            radius_y,
            rotation: 0.0,
            start_angle: 0.0,
            end_angle: FULL_TURN,
            anticlockwise: false,
        }
    }

    #[must_use]
    pub fn rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }

    #[must_use]
    pub fn angles(mut self, start: f64, end: f64) -> Self {
        self.start_angle = start;
        self.end_angle = end;
        self
    }

    #[must_use]
    pub fn anticlockwise(mut self, anticlockwise: bool) -> Self {
        self.anticlockwise = anticlockwise;
        self
    }

    pub(crate) fn validate(&self, op: &'static str) -> Result<(), DisplayError> {
        self.center.validate(op)?;
        ensure_non_negative(op, &[("rx", self.radius_x), ("ry", self.radius_y)])?;
        ensure_finite(
            op,
            &[
                ("rotation", self.rotation),
                ("startAngle", self.start_angle),
                ("endAngle", self.end_angle),
            ],
        )
    }
}

/// Source and destination rectangles for an image blit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageBlit {
    pub sx: f64,
    pub sy: f64,
    pub s_width: f64,
    pub s_height: f64,
    pub dx: f64,
    pub dy: f64,
    pub d_width: f64,
    pub d_height: f64,
}

impl ImageBlit {
    /// Copy a whole `width` x `height` image to the origin at its natural size.
    #[must_use]
    pub fn full(width: f64, height: f64) -> Self {
        Self {
            sx: 0.0,
            sy: 0.0,
            s_width: width,
            s_height: height,
            dx: 0.0,
            dy: 0.0,
            d_width: width,
            d_height: height,
        }
    }

    pub(crate) fn validate(&self, op: &'static str) -> Result<(), DisplayError> {
        ensure_non_negative(op, &[("sx", self.sx), ("sy", self.sy), ("dx", self.dx), ("dy", self.dy)])?;
        ensure_positive(
            op,
            &[
                ("sWidth", self.s_width),
                ("sHeight", self.s_height),
                ("dWidth", self.d_width),
                ("dHeight", self.d_height),
            ],
        )
    }
}
