//! Paint sources: hex colors, gradients, and the recorded fill/stroke state.

#[cfg(test)]
#[path = "paint_test.rs"]
mod paint_test;

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{DisplayError, ensure_non_negative};
use crate::geometry::Point;
use crate::style::{GradientKind, Repetition, StyleTarget};

/// A `#rgb` or `#rrggbb` color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct HexColor(String);

impl HexColor {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse `s`, attributing a failure to operation `op`.
    pub(crate) fn parse_for(op: &'static str, s: &str) -> Result<Self, DisplayError> {
        let digits = s.strip_prefix('#').unwrap_or_default();
        let valid = matches!(digits.len(), 3 | 6) && digits.bytes().all(|b| b.is_ascii_hexdigit());
        if valid {
            Ok(Self(s.to_owned()))
        } else {
            Err(DisplayError::invalid(
                op,
                format!("needs a string with a color in hexadecimal format (#rgb or #rrggbb), got `{s}`"),
            ))
        }
    }

    /// Opaque black, the host's initial fill and stroke.
    #[must_use]
    pub fn black() -> Self {
        Self("#000000".to_owned())
    }
}

impl FromStr for HexColor {
    type Err = DisplayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_for("parseColor", s)
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One color stop of a gradient.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorStop {
    /// Position along the gradient, `0.0..=1.0`.
    pub offset: f64,
    /// Any CSS color string the host understands.
    pub color: String,
}

impl ColorStop {
    #[must_use]
    pub fn new(offset: f64, color: impl Into<String>) -> Self {
        Self { offset, color: color.into() }
    }

    fn in_range(&self) -> bool {
        (0.0..=1.0).contains(&self.offset)
    }
}

/// Geometry of a gradient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GradientShape {
    /// Along the line from `start` to `end`.
    Linear { start: Point, end: Point },
    /// Between the circle at `start` and the circle at `end`.
    Radial {
        start: Point,
        start_radius: f64,
        end: Point,
        end_radius: f64,
    },
}

impl GradientShape {
    #[must_use]
    pub fn kind(&self) -> GradientKind {
        match self {
            Self::Linear { .. } => GradientKind::Linear,
            Self::Radial { .. } => GradientKind::Radial,
        }
    }
}

/// A gradient ready to be created on a surface.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientSpec {
    pub shape: GradientShape,
    pub stops: Vec<ColorStop>,
}

impl GradientSpec {
    #[must_use]
    pub fn linear(start: Point, end: Point) -> Self {
        Self { shape: GradientShape::Linear { start, end }, stops: Vec::new() }
    }

    #[must_use]
    pub fn radial(start: Point, start_radius: f64, end: Point, end_radius: f64) -> Self {
        Self {
            shape: GradientShape::Radial { start, start_radius, end, end_radius },
            stops: Vec::new(),
        }
    }

    /// Build from the flat argument list the JS API takes.
    ///
    /// `radii` is ignored for linear gradients and required for radial ones.
    pub fn from_parts(kind: GradientKind, start: Point, end: Point, radii: Option<(f64, f64)>) -> Result<Self, DisplayError> {
        match (kind, radii) {
            (GradientKind::Linear, _) => Ok(Self::linear(start, end)),
            (GradientKind::Radial, Some((r0, r1))) => Ok(Self::radial(start, r0, end, r1)),
            (GradientKind::Radial, None) => Err(DisplayError::invalid(
                "createGradient",
                "needs a pair of radii for a radial gradient",
            )),
        }
    }

    #[must_use]
    pub fn stop(mut self, offset: f64, color: impl Into<String>) -> Self {
        self.stops.push(ColorStop::new(offset, color));
        self
    }

    pub(crate) fn validate(&self) -> Result<(), DisplayError> {
        const OP: &str = "createGradient";
        match self.shape {
            GradientShape::Linear { start, end } => {
                start.validate(OP)?;
                end.validate(OP)
            }
            GradientShape::Radial { start, start_radius, end, end_radius } => {
                start.validate(OP)?;
                end.validate(OP)?;
                ensure_non_negative(OP, &[("r0", start_radius), ("r1", end_radius)])
            }
        }
    }

    /// Stops with an offset inside `0.0..=1.0`, in order. Others are logged and dropped.
    pub(crate) fn usable_stops(&self) -> impl Iterator<Item = &ColorStop> {
        self.stops.iter().filter(|stop| {
            let keep = stop.in_range();
            if !keep {
                log::warn!("skipping color stop `{}` at offset {} (outside 0..=1)", stop.color, stop.offset);
            }
            keep
        })
    }
}

/// What a paint slot currently holds.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Paint {
    Color(HexColor),
    Gradient(GradientKind),
    Pattern(Repetition),
}

impl Serialize for GradientKind {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl Serialize for Repetition {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Fill, stroke and global alpha as last assigned through the display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Colors {
    pub stroke: Paint,
    pub fill: Paint,
    pub alpha: f64,
}

impl Default for Colors {
    fn default() -> Self {
        Self {
            stroke: Paint::Color(HexColor::black()),
            fill: Paint::Color(HexColor::black()),
            alpha: 1.0,
        }
    }
}

impl Colors {
    pub(crate) fn assign(&mut self, target: StyleTarget, paint: Paint) {
        match target {
            StyleTarget::Fill => self.fill = paint,
            StyleTarget::Stroke => self.stroke = paint,
        }
    }
}
