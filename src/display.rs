//! The display handle: validates arguments and forwards them to a bound [`Surface`].
//!
//! A [`Display`] starts unbound. [`Display::bind`] attaches a surface exactly
//! once; every drawing operation before that fails with
//! [`DisplayError::NotInitialized`]. Loop state also lives here so the draw
//! callback and the frame loop agree on whether the display is running, but
//! scheduling itself is [`crate::frame_loop`]'s job.

#[cfg(test)]
#[path = "display_test.rs"]
mod display_test;

use crate::error::{DisplayError, ensure_finite, ensure_non_negative};
use crate::geometry::{ArcSpec, EllipseSpec, ImageBlit, Point, Rect};
use crate::paint::{Colors, GradientSpec, HexColor, Paint};
use crate::pen::Pen;
use crate::style::{CompositeOperation, FillRule, LineCap, LineJoin, Repetition, StyleTarget, TextDirection};
use crate::surface::{Feature, Surface};

/// Per-frame drawing callback. Receives the host frame timestamp in milliseconds.
pub type DrawFn = Box<dyn FnMut(f64) -> Result<(), DisplayError>>;

/// What the host must do after an auto-resize toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeChange {
    /// Start listening for window resizes.
    Attach,
    /// Stop listening for window resizes.
    Detach,
    /// The flag did not change.
    Unchanged,
}

pub struct Display<S: Surface> {
    surface: Option<S>,
    width: f64,
    height: f64,
    pen: Pen,
    colors: Colors,
    filters: Vec<String>,
    auto_resize: bool,
    looping: bool,
    loop_epoch: u64,
    draw: Option<DrawFn>,
}

impl<S: Surface> Default for Display<S> {
    fn default() -> Self {
        Self {
            surface: None,
            width: 0.0,
            height: 0.0,
            pen: Pen::default(),
            colors: Colors::default(),
            filters: Vec::new(),
            auto_resize: false,
            looping: false,
            loop_epoch: 0,
            draw: None,
        }
    }
}

impl<S: Surface> Display<S> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Binding ---

    /// Attach the drawing surface. A display can be bound only once.
    pub fn bind(&mut self, surface: S) -> Result<(), DisplayError> {
        self.bind_with(surface, None)
    }

    /// Attach the drawing surface and apply an initial image-smoothing setting.
    ///
    /// The setting is applied to the surface before it is stored, so a
    /// failure leaves the display unbound and the call can be retried.
    pub fn bind_with(&mut self, mut surface: S, image_smoothing: Option<bool>) -> Result<(), DisplayError> {
        if self.surface.is_some() {
            return Err(DisplayError::AlreadyInitialized);
        }
        if let Some(enabled) = image_smoothing {
            if !surface.supports(Feature::ImageSmoothing) {
                return Err(DisplayError::Unsupported(Feature::ImageSmoothing));
            }
            surface.set_image_smoothing(enabled)?;
        }
        let (width, height) = surface.size();
        self.width = width;
        self.height = height;
        self.surface = Some(surface);
        log::debug!("display bound to a {width}x{height} surface");
        Ok(())
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.surface.is_some()
    }

    /// The bound surface, if any.
    #[must_use]
    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    fn check_init(&self) -> Result<(), DisplayError> {
        if self.surface.is_some() { Ok(()) } else { Err(DisplayError::NotInitialized) }
    }

    fn surface_mut(&mut self) -> Result<&mut S, DisplayError> {
        self.surface.as_mut().ok_or(DisplayError::NotInitialized)
    }

    fn require_feature(&self, feature: Feature) -> Result<&S, DisplayError> {
        let surface = self.surface.as_ref().ok_or(DisplayError::NotInitialized)?;
        if surface.supports(feature) { Ok(surface) } else { Err(DisplayError::Unsupported(feature)) }
    }

    // --- Size ---

    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Resize the bitmap to `width` x `height`.
    ///
    /// The recorded size is read back from the surface, which may round.
    pub fn fit_to(&mut self, width: f64, height: f64) -> Result<(), DisplayError> {
        self.check_init()?;
        ensure_non_negative("fitTo", &[("width", width), ("height", height)])?;
        let surface = self.surface_mut()?;
        surface.set_size(width, height);
        (self.width, self.height) = surface.size();
        Ok(())
    }

    #[must_use]
    pub fn auto_resize(&self) -> bool {
        self.auto_resize
    }

    /// What turning auto-resizing on or off would require of the host.
    /// `None` flips the current setting.
    ///
    /// Nothing is recorded here. The host attaches or detaches its resize
    /// listener, then calls [`Display::commit_auto_resize`] once that worked.
    pub fn plan_auto_resize(&self, resize: Option<bool>) -> Result<ResizeChange, DisplayError> {
        self.check_init()?;
        let want = resize.unwrap_or(!self.auto_resize);
        Ok(match (self.auto_resize, want) {
            (false, true) => ResizeChange::Attach,
            (true, false) => ResizeChange::Detach,
            _ => ResizeChange::Unchanged,
        })
    }

    /// Record a change planned by [`Display::plan_auto_resize`].
    pub fn commit_auto_resize(&mut self, change: ResizeChange) {
        match change {
            ResizeChange::Attach => self.auto_resize = true,
            ResizeChange::Detach => self.auto_resize = false,
            ResizeChange::Unchanged => {}
        }
    }

    // --- Colors ---

    pub fn set_fill_color(&mut self, color: &str) -> Result<(), DisplayError> {
        self.set_color("setFillColor", StyleTarget::Fill, color)
    }

    pub fn set_stroke_color(&mut self, color: &str) -> Result<(), DisplayError> {
        self.set_color("setStrokeColor", StyleTarget::Stroke, color)
    }

    fn set_color(&mut self, op: &'static str, target: StyleTarget, color: &str) -> Result<(), DisplayError> {
        self.check_init()?;
        let color = HexColor::parse_for(op, color)?;
        self.surface_mut()?.set_color(target, &color);
        self.colors.assign(target, Paint::Color(color));
        Ok(())
    }

    /// Set the global alpha, `0.0` (transparent) to `1.0` (opaque).
    pub fn set_alpha(&mut self, alpha: f64) -> Result<(), DisplayError> {
        self.check_init()?;
        ensure_finite("setAlpha", &[("a", alpha)])?;
        if !(0.0..=1.0).contains(&alpha) {
            return Err(DisplayError::invalid("setAlpha", format!("needs a number between 0 and 1, got {alpha}")));
        }
        self.surface_mut()?.set_global_alpha(alpha);
        self.colors.alpha = alpha;
        Ok(())
    }

    /// Fill, stroke and alpha as last set through this display.
    pub fn colors(&self) -> Result<&Colors, DisplayError> {
        self.check_init()?;
        Ok(&self.colors)
    }

    /// Assign a gradient to the fill or stroke slot.
    ///
    /// Color stops outside `0.0..=1.0` are skipped with a warning.
    pub fn set_gradient(&mut self, target: StyleTarget, gradient: &GradientSpec) -> Result<(), DisplayError> {
        self.check_init()?;
        gradient.validate()?;
        let usable = GradientSpec {
            shape: gradient.shape,
            stops: gradient.usable_stops().cloned().collect(),
        };
        self.surface_mut()?.set_gradient(target, &usable)?;
        self.colors.assign(target, Paint::Gradient(gradient.shape.kind()));
        Ok(())
    }

    /// Tile `image` into the fill or stroke slot.
    pub fn set_pattern(&mut self, image: &S::Image, repetition: Repetition, target: StyleTarget) -> Result<(), DisplayError> {
        self.surface_mut()?.set_pattern(target, image, repetition)?;
        self.colors.assign(target, Paint::Pattern(repetition));
        Ok(())
    }

    pub fn set_composite_operation(&mut self, op: CompositeOperation) -> Result<(), DisplayError> {
        self.surface_mut()?.set_composite_operation(op)
    }

    // --- Lines ---

    pub fn set_line_ending(&mut self, cap: LineCap) -> Result<(), DisplayError> {
        self.surface_mut()?.set_line_cap(cap);
        Ok(())
    }

    pub fn set_line_join(&mut self, join: LineJoin) -> Result<(), DisplayError> {
        self.surface_mut()?.set_line_join(join);
        Ok(())
    }

    /// Forward a line width. The host ignores non-finite and non-positive
    /// widths, so those are logged rather than rejected.
    pub fn set_line_width(&mut self, width: f64) -> Result<(), DisplayError> {
        let surface = self.surface_mut()?;
        if !width.is_finite() || width <= 0.0 {
            log::warn!("setLineWidth({width}) has no effect, the width must be a number above 0");
        }
        surface.set_line_width(width);
        Ok(())
    }

    pub fn set_line_dash_offset(&mut self, offset: f64) -> Result<(), DisplayError> {
        self.check_init()?;
        ensure_finite("setLineDashOffset", &[("v", offset)])?;
        self.surface_mut()?.set_line_dash_offset(offset);
        Ok(())
    }

    // --- Pen ---

    /// Open a new path and start a pen movement at the origin.
    pub fn begin_pen(&mut self) -> Result<(), DisplayError> {
        self.check_init()?;
        self.pen.begin()?;
        self.surface_mut()?.begin_path();
        Ok(())
    }

    fn pen_at(&self, op: &'static str) -> Result<Point, DisplayError> {
        self.check_init()?;
        self.pen.require(op)
    }

    pub fn move_pen_to(&mut self, to: Point) -> Result<(), DisplayError> {
        self.pen_at("movePenTo")?;
        to.validate("movePenTo")?;
        self.surface_mut()?.move_to(to);
        self.pen.set_position(to);
        Ok(())
    }

    pub fn move_pen_by(&mut self, dx: f64, dy: f64) -> Result<(), DisplayError> {
        let from = self.pen_at("movePenBy")?;
        ensure_finite("movePenBy", &[("relX", dx), ("relY", dy)])?;
        let to = from.offset(dx, dy);
        self.surface_mut()?.move_to(to);
        self.pen.set_position(to);
        Ok(())
    }

    /// Draw a line to `to` and leave the pen there.
    pub fn use_pen_to(&mut self, to: Point) -> Result<(), DisplayError> {
        self.pen_at("usePenTo")?;
        to.validate("usePenTo")?;
        self.line_and_move(to)
    }

    pub fn use_pen_by(&mut self, dx: f64, dy: f64) -> Result<(), DisplayError> {
        let from = self.pen_at("usePenBy")?;
        ensure_finite("usePenBy", &[("relX", dx), ("relY", dy)])?;
        self.line_and_move(from.offset(dx, dy))
    }

    fn line_and_move(&mut self, to: Point) -> Result<(), DisplayError> {
        let surface = self.surface_mut()?;
        surface.line_to(to);
        surface.move_to(to);
        self.pen.set_position(to);
        Ok(())
    }

    /// Add a circular arc. The pen position is left unchanged.
    pub fn use_pen_arc(&mut self, arc: &ArcSpec) -> Result<(), DisplayError> {
        self.pen_at("usePenArc")?;
        arc.validate("usePenArc")?;
        self.surface_mut()?.arc(arc)
    }

    /// Add an arc tangent to the lines through `first` and `second`.
    pub fn use_pen_arc_to(&mut self, first: Point, second: Point, radius: f64) -> Result<(), DisplayError> {
        const OP: &str = "usePenArcTo";
        self.pen_at(OP)?;
        first.validate(OP)?;
        second.validate(OP)?;
        ensure_non_negative(OP, &[("r", radius)])?;
        self.surface_mut()?.arc_to(first, second, radius)
    }

    /// Add a cubic bézier curve and move the pen to its end point.
    pub fn use_pen_bezier(&mut self, cp1: Point, cp2: Point, end: Point) -> Result<(), DisplayError> {
        const OP: &str = "usePenBezierCurve";
        self.pen_at(OP)?;
        cp1.validate(OP)?;
        cp2.validate(OP)?;
        end.validate(OP)?;
        let surface = self.surface_mut()?;
        surface.bezier_curve_to(cp1, cp2, end);
        surface.move_to(end);
        self.pen.set_position(end);
        Ok(())
    }

    pub fn use_pen_rect(&mut self, rect: &Rect) -> Result<(), DisplayError> {
        self.pen_at("usePenRect")?;
        rect.validate("usePenRect")?;
        self.surface_mut()?.rect(rect);
        Ok(())
    }

    pub fn use_pen_ellipse(&mut self, ellipse: &EllipseSpec) -> Result<(), DisplayError> {
        self.pen_at("usePenEllipse")?;
        self.require_feature(Feature::Ellipse)?;
        ellipse.validate("usePenEllipse")?;
        self.surface_mut()?.ellipse(ellipse)
    }

    /// Close the current path and end the pen movement.
    pub fn stop_pen(&mut self) -> Result<(), DisplayError> {
        self.pen_at("stopPenMovement")?;
        self.surface_mut()?.close_path();
        self.pen.stop();
        Ok(())
    }

    pub fn pen_position(&self) -> Result<Point, DisplayError> {
        self.pen_at("getPenPos")
    }

    #[must_use]
    pub fn pen_active(&self) -> bool {
        self.pen.is_active()
    }

    /// Fill the current path; `None` uses the host's default (non-zero) rule.
    pub fn fill_path(&mut self, rule: Option<FillRule>) -> Result<(), DisplayError> {
        self.surface_mut()?.fill(rule);
        Ok(())
    }

    pub fn stroke_path(&mut self) -> Result<(), DisplayError> {
        self.surface_mut()?.stroke();
        Ok(())
    }

    /// Turn the current path into the clipping region.
    pub fn create_stencil(&mut self, rule: Option<FillRule>) -> Result<(), DisplayError> {
        self.pen_at("createStencil")?;
        self.surface_mut()?.clip(rule);
        Ok(())
    }

    // --- Clearing ---

    pub fn clear_rect(&mut self, rect: &Rect) -> Result<(), DisplayError> {
        self.check_init()?;
        self.pen.require_stopped("clearRect")?;
        rect.validate("clearRect")?;
        self.surface_mut()?.clear_rect(rect);
        Ok(())
    }

    /// Clear the whole bitmap.
    pub fn clear_canvas(&mut self) -> Result<(), DisplayError> {
        self.check_init()?;
        self.pen.require_stopped("clearCanvas")?;
        let surface = self.surface_mut()?;
        let (width, height) = surface.size();
        surface.clear_rect(&Rect::new(0.0, 0.0, width, height));
        Ok(())
    }

    // --- Images & focus ---

    /// Blit `image`; `None` copies the whole image to the origin at natural size.
    pub fn draw_image(&mut self, image: &S::Image, blit: Option<ImageBlit>) -> Result<(), DisplayError> {
        let surface = self.surface_mut()?;
        let blit = blit.unwrap_or_else(|| {
            let (width, height) = surface.image_size(image);
            ImageBlit::full(width, height)
        });
        blit.validate("drawImage")?;
        surface.draw_image(image, &blit)
    }

    /// Draw a focus ring around `element` if it currently has focus.
    pub fn draw_focus(&mut self, element: &S::Element) -> Result<(), DisplayError> {
        let surface = self.surface_mut()?;
        if !surface.is_button(element) {
            return Err(DisplayError::invalid(
                "drawFocus",
                "needs an HTMLButtonElement or an HTMLInputElement with \"button\" as type",
            ));
        }
        surface.draw_focus_if_needed(element);
        Ok(())
    }

    pub fn set_interpolate(&mut self, enabled: bool) -> Result<(), DisplayError> {
        self.require_feature(Feature::ImageSmoothing)?;
        self.surface_mut()?.set_image_smoothing(enabled)
    }

    // --- Filters ---

    /// Replace the filter chain. Filters are applied in order.
    pub fn set_filters(&mut self, filters: Vec<String>) -> Result<(), DisplayError> {
        self.require_feature(Feature::Filter)?;
        if let Some(pos) = filters.iter().position(|f| f.trim().is_empty()) {
            return Err(DisplayError::invalid("setFilters", format!("got a blank filter at position {pos}")));
        }
        let joined = filters.iter().map(|f| f.trim()).collect::<Vec<_>>().join(" ");
        self.surface_mut()?.set_filter(&joined)?;
        self.filters = filters;
        Ok(())
    }

    pub fn filters(&self) -> Result<&[String], DisplayError> {
        self.require_feature(Feature::Filter)?;
        Ok(&self.filters)
    }

    // --- Text ---

    pub fn set_font(&mut self, font: &str) -> Result<(), DisplayError> {
        self.check_init()?;
        if font.trim().is_empty() {
            return Err(DisplayError::invalid("setFont", "needs a non-empty CSS font string"));
        }
        self.surface_mut()?.set_font(font);
        Ok(())
    }

    pub fn set_text_direction(&mut self, direction: TextDirection) -> Result<(), DisplayError> {
        self.require_feature(Feature::TextDirection)?;
        self.surface_mut()?.set_direction(direction)
    }

    /// Fill `text` with its baseline origin at `at`.
    pub fn write_text(&mut self, text: &str, at: Point) -> Result<(), DisplayError> {
        self.check_init()?;
        at.validate("writeText")?;
        self.surface_mut()?.fill_text(text, at)
    }

    // --- Loop state ---

    /// Install the per-frame callback, replacing any previous one.
    pub fn set_drawing_method(&mut self, draw: DrawFn) {
        self.draw = Some(draw);
    }

    #[must_use]
    pub fn has_drawing_method(&self) -> bool {
        self.draw.is_some()
    }

    #[must_use]
    pub fn is_looping(&self) -> bool {
        self.looping
    }

    /// Stop the loop. The already-requested frame is dropped when it fires.
    pub fn stop_looping(&mut self) {
        if self.looping {
            log::debug!("frame loop stopped");
        }
        self.looping = false;
    }

    /// Mark the loop running and return the epoch its frames must carry.
    pub(crate) fn begin_loop(&mut self) -> Result<u64, DisplayError> {
        self.check_init()?;
        if self.looping {
            return Err(DisplayError::AlreadyLooping);
        }
        self.looping = true;
        self.loop_epoch = self.loop_epoch.wrapping_add(1);
        Ok(self.loop_epoch)
    }

    /// Whether a frame scheduled under `epoch` should still run.
    pub(crate) fn loop_current(&self, epoch: u64) -> bool {
        self.looping && self.loop_epoch == epoch
    }

    pub(crate) fn take_draw(&mut self) -> Option<DrawFn> {
        self.draw.take()
    }

    /// Put back a callback taken for a frame, unless it was replaced meanwhile.
    pub(crate) fn restore_draw(&mut self, draw: Option<DrawFn>) {
        if self.draw.is_none() {
            self.draw = draw;
        }
    }
}
