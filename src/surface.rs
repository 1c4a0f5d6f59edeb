//! The seam between the display and the host drawing context.
//!
//! [`Surface`] lists every native operation the display forwards to. The
//! browser implementation lives in [`crate::web`]; tests drive the display
//! through a recording implementation so validation and pen bookkeeping can
//! be checked without a browser.
//!
//! Implementations perform no validation of their own. By the time a call
//! reaches a surface, the display has already checked its arguments.

use std::fmt;

use crate::error::DisplayError;
use crate::geometry::{ArcSpec, EllipseSpec, ImageBlit, Point, Rect};
use crate::paint::{GradientSpec, HexColor};
use crate::style::{CompositeOperation, FillRule, LineCap, LineJoin, Repetition, StyleTarget, TextDirection};

/// Context capabilities that older hosts may lack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    Ellipse,
    Filter,
    TextDirection,
    ImageSmoothing,
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ellipse => "ellipse()",
            Self::Filter => "the filter property",
            Self::TextDirection => "the direction property",
            Self::ImageSmoothing => "the imageSmoothingEnabled property",
        })
    }
}

/// A host drawing surface and its 2D context.
pub trait Surface {
    /// Anything the host can blit or tile from.
    type Image;
    /// A DOM element that can receive a focus ring.
    type Element;

    /// Current bitmap size in pixels.
    fn size(&self) -> (f64, f64);
    fn set_size(&mut self, width: f64, height: f64);
    fn supports(&self, feature: Feature) -> bool;

    // --- Paths ---

    fn begin_path(&mut self);
    fn close_path(&mut self);
    fn move_to(&mut self, to: Point);
    fn line_to(&mut self, to: Point);
    fn arc(&mut self, arc: &ArcSpec) -> Result<(), DisplayError>;
    fn arc_to(&mut self, first: Point, second: Point, radius: f64) -> Result<(), DisplayError>;
    fn bezier_curve_to(&mut self, cp1: Point, cp2: Point, end: Point);
    fn rect(&mut self, rect: &Rect);
    fn ellipse(&mut self, ellipse: &EllipseSpec) -> Result<(), DisplayError>;
    fn fill(&mut self, rule: Option<FillRule>);
    fn stroke(&mut self);
    fn clip(&mut self, rule: Option<FillRule>);
    fn clear_rect(&mut self, rect: &Rect);

    // --- Paint ---

    fn set_color(&mut self, target: StyleTarget, color: &HexColor);
    /// Create the gradient, add `stops` in order, and assign it to `target`.
    fn set_gradient(&mut self, target: StyleTarget, gradient: &GradientSpec) -> Result<(), DisplayError>;
    fn set_pattern(&mut self, target: StyleTarget, image: &Self::Image, repetition: Repetition) -> Result<(), DisplayError>;
    fn set_global_alpha(&mut self, alpha: f64);
    fn set_composite_operation(&mut self, op: CompositeOperation) -> Result<(), DisplayError>;
    fn set_filter(&mut self, filter: &str) -> Result<(), DisplayError>;

    // --- Lines ---

    fn set_line_cap(&mut self, cap: LineCap);
    fn set_line_join(&mut self, join: LineJoin);
    fn set_line_width(&mut self, width: f64);
    fn set_line_dash_offset(&mut self, offset: f64);

    // --- Text ---

    fn set_font(&mut self, font: &str);
    fn set_direction(&mut self, direction: TextDirection) -> Result<(), DisplayError>;
    fn fill_text(&mut self, text: &str, at: Point) -> Result<(), DisplayError>;

    // --- Images & focus ---

    /// Natural size of `image` in pixels.
    fn image_size(&self, image: &Self::Image) -> (f64, f64);
    fn draw_image(&mut self, image: &Self::Image, blit: &ImageBlit) -> Result<(), DisplayError>;
    fn set_image_smoothing(&mut self, enabled: bool) -> Result<(), DisplayError>;
    /// Whether `element` is a `<button>` or an `<input type="button">`.
    fn is_button(&self, element: &Self::Element) -> bool;
    fn draw_focus_if_needed(&mut self, element: &Self::Element);
}
