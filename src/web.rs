//! Browser host: a [`Surface`] over `CanvasRenderingContext2d` and a
//! [`Scheduler`] over `requestAnimationFrame`.
//!
//! This is the only module that talks to the DOM. Everything here maps one
//! call onto the matching `web_sys` binding; argument checks happen earlier
//! in [`crate::display`].

use std::cell::RefCell;
use std::rc::Weak;

use js_sys::Reflect;
use wasm_bindgen::{JsCast, JsValue, closure::Closure};
use web_sys::{
    CanvasRenderingContext2d, CanvasWindingRule, Document, Element, HtmlButtonElement, HtmlCanvasElement,
    HtmlImageElement, HtmlInputElement, ImageBitmap, Window,
};

use crate::consts::{FULLSCREEN_STYLE, PROBE_DIRECTION, PROBE_ELLIPSE, PROBE_FILTER, PROBE_IMAGE_SMOOTHING, RESIZE_EVENT};
use crate::display::Display;
use crate::error::DisplayError;
use crate::frame_loop::{FrameCallback, Scheduler};
use crate::geometry::{ArcSpec, EllipseSpec, ImageBlit, Point, Rect};
use crate::paint::{GradientShape, GradientSpec, HexColor};
use crate::style::{CompositeOperation, FillRule, LineCap, LineJoin, Repetition, StyleTarget, TextDirection};
use crate::surface::{Feature, Surface};

// =============================================================
// DOM access
// =============================================================

fn window() -> Result<Window, DisplayError> {
    web_sys::window().ok_or_else(|| DisplayError::Host("no global window".to_owned()))
}

fn document() -> Result<Document, DisplayError> {
    window()?
        .document()
        .ok_or_else(|| DisplayError::Host("window has no document".to_owned()))
}

/// Inner size of the browser window in CSS pixels.
pub fn window_size() -> Result<(f64, f64), DisplayError> {
    let window = window()?;
    let width = window.inner_width()?.as_f64().unwrap_or(0.0);
    let height = window.inner_height()?.as_f64().unwrap_or(0.0);
    Ok((width, height))
}

/// Create a canvas covering the whole viewport and append it to `<body>`.
pub fn create_fullscreen_canvas() -> Result<HtmlCanvasElement, DisplayError> {
    let document = document()?;
    let canvas = document
        .create_element("canvas")?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| DisplayError::Host("created element is not a canvas".to_owned()))?;
    let body = document
        .body()
        .ok_or_else(|| DisplayError::Host("document has no body".to_owned()))?;
    body.append_child(&canvas)?;

    let style = canvas.style();
    for (property, value) in FULLSCREEN_STYLE {
        style.set_property(property, value)?;
    }
    let (width, height) = window_size()?;
    canvas.set_width(to_px(width));
    canvas.set_height(to_px(height));
    Ok(canvas)
}

/// Look up an existing `<canvas id="...">`.
pub fn find_canvas(id: &str) -> Result<HtmlCanvasElement, DisplayError> {
    document()?
        .get_element_by_id(id)
        .ok_or_else(|| DisplayError::NotACanvas(id.to_owned()))?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| DisplayError::NotACanvas(id.to_owned()))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_px(css: f64) -> u32 {
    css.max(0.0).round() as u32
}

fn has_property(target: &JsValue, name: &str) -> bool {
    matches!(Reflect::has(target, &JsValue::from_str(name)), Ok(true))
}

fn set_property(target: &JsValue, name: &str, value: &JsValue) -> Result<(), DisplayError> {
    Reflect::set(target, &JsValue::from_str(name), value)?;
    Ok(())
}

fn winding(rule: FillRule) -> CanvasWindingRule {
    match rule {
        FillRule::NonZero => CanvasWindingRule::Nonzero,
        FillRule::EvenOdd => CanvasWindingRule::Evenodd,
    }
}

// =============================================================
// Images
// =============================================================

/// The image sources the display can blit or tile from.
#[derive(Debug, Clone)]
pub enum WebImage {
    Image(HtmlImageElement),
    Canvas(HtmlCanvasElement),
    Bitmap(ImageBitmap),
}

impl WebImage {
    /// Classify a JS value passed as an image argument of `op`.
    pub fn from_js(op: &'static str, value: JsValue) -> Result<Self, DisplayError> {
        let value = match value.dyn_into::<HtmlImageElement>() {
            Ok(image) => return Ok(Self::Image(image)),
            Err(value) => value,
        };
        let value = match value.dyn_into::<HtmlCanvasElement>() {
            Ok(canvas) => return Ok(Self::Canvas(canvas)),
            Err(value) => value,
        };
        match value.dyn_into::<ImageBitmap>() {
            Ok(bitmap) => Ok(Self::Bitmap(bitmap)),
            Err(_) => Err(DisplayError::invalid(
                op,
                "needs an image source (HTMLImageElement, HTMLCanvasElement or ImageBitmap)",
            )),
        }
    }
}

// =============================================================
// Surface
// =============================================================

/// A canvas element and its 2D context.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn from_canvas(canvas: HtmlCanvasElement) -> Result<Self, DisplayError> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| DisplayError::Host("2d context unavailable".to_owned()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| DisplayError::Host("2d context has an unexpected type".to_owned()))?;
        Ok(Self { canvas, ctx })
    }

    #[must_use]
    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }
}

impl Surface for CanvasSurface {
    type Image = WebImage;
    type Element = Element;

    fn size(&self) -> (f64, f64) {
        (f64::from(self.canvas.width()), f64::from(self.canvas.height()))
    }

    fn set_size(&mut self, width: f64, height: f64) {
        self.canvas.set_width(to_px(width));
        self.canvas.set_height(to_px(height));
    }

    fn supports(&self, feature: Feature) -> bool {
        let ctx: &JsValue = self.ctx.as_ref();
        match feature {
            Feature::Ellipse => has_property(ctx, PROBE_ELLIPSE),
            Feature::Filter => has_property(ctx, PROBE_FILTER),
            Feature::TextDirection => has_property(ctx, PROBE_DIRECTION),
            Feature::ImageSmoothing => PROBE_IMAGE_SMOOTHING.iter().any(|name| has_property(ctx, name)),
        }
    }

    fn begin_path(&mut self) {
        self.ctx.begin_path();
    }

    fn close_path(&mut self) {
        self.ctx.close_path();
    }

    fn move_to(&mut self, to: Point) {
        self.ctx.move_to(to.x, to.y);
    }

    fn line_to(&mut self, to: Point) {
        self.ctx.line_to(to.x, to.y);
    }

    fn arc(&mut self, arc: &ArcSpec) -> Result<(), DisplayError> {
        self.ctx.arc_with_anticlockwise(
            arc.center.x,
            arc.center.y,
            arc.radius,
            arc.start_angle,
            arc.end_angle,
            arc.anticlockwise,
        )?;
        Ok(())
    }

    fn arc_to(&mut self, first: Point, second: Point, radius: f64) -> Result<(), DisplayError> {
        self.ctx.arc_to(first.x, first.y, second.x, second.y, radius)?;
        Ok(())
    }

    fn bezier_curve_to(&mut self, cp1: Point, cp2: Point, end: Point) {
        self.ctx.bezier_curve_to(cp1.x, cp1.y, cp2.x, cp2.y, end.x, end.y);
    }

    fn rect(&mut self, rect: &Rect) {
        self.ctx.rect(rect.x, rect.y, rect.width, rect.height);
    }

    fn ellipse(&mut self, e: &EllipseSpec) -> Result<(), DisplayError> {
        self.ctx.ellipse_with_anticlockwise(
            e.center.x,
            e.center.y,
            e.radius_x,
            e.radius_y,
            e.rotation,
            e.start_angle,
            e.end_angle,
            e.anticlockwise,
        )?;
        Ok(())
    }

    fn fill(&mut self, rule: Option<FillRule>) {
        match rule {
            Some(rule) => self.ctx.fill_with_canvas_winding_rule(winding(rule)),
            None => self.ctx.fill(),
        }
    }

    fn stroke(&mut self) {
        self.ctx.stroke();
    }

    fn clip(&mut self, rule: Option<FillRule>) {
        match rule {
            Some(rule) => self.ctx.clip_with_canvas_winding_rule(winding(rule)),
            None => self.ctx.clip(),
        }
    }

    fn clear_rect(&mut self, rect: &Rect) {
        self.ctx.clear_rect(rect.x, rect.y, rect.width, rect.height);
    }

    fn set_color(&mut self, target: StyleTarget, color: &HexColor) {
        match target {
            StyleTarget::Fill => self.ctx.set_fill_style_str(color.as_str()),
            StyleTarget::Stroke => self.ctx.set_stroke_style_str(color.as_str()),
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn set_gradient(&mut self, target: StyleTarget, gradient: &GradientSpec) -> Result<(), DisplayError> {
        let created = match gradient.shape {
            GradientShape::Linear { start, end } => self.ctx.create_linear_gradient(start.x, start.y, end.x, end.y),
            GradientShape::Radial { start, start_radius, end, end_radius } => {
                self.ctx
                    .create_radial_gradient(start.x, start.y, start_radius, end.x, end.y, end_radius)?
            }
        };
        for stop in &gradient.stops {
            created.add_color_stop(stop.offset as f32, &stop.color)?;
        }
        match target {
            StyleTarget::Fill => self.ctx.set_fill_style_canvas_gradient(&created),
            StyleTarget::Stroke => self.ctx.set_stroke_style_canvas_gradient(&created),
        }
        Ok(())
    }

    fn set_pattern(&mut self, target: StyleTarget, image: &WebImage, repetition: Repetition) -> Result<(), DisplayError> {
        let repetition = repetition.as_str();
        let pattern = match image {
            WebImage::Image(img) => self.ctx.create_pattern_with_html_image_element(img, repetition)?,
            WebImage::Canvas(canvas) => self.ctx.create_pattern_with_html_canvas_element(canvas, repetition)?,
            WebImage::Bitmap(bitmap) => self.ctx.create_pattern_with_image_bitmap(bitmap, repetition)?,
        }
        .ok_or_else(|| DisplayError::Host("pattern source is not fully decoded".to_owned()))?;
        match target {
            StyleTarget::Fill => self.ctx.set_fill_style_canvas_pattern(&pattern),
            StyleTarget::Stroke => self.ctx.set_stroke_style_canvas_pattern(&pattern),
        }
        Ok(())
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.ctx.set_global_alpha(alpha);
    }

    fn set_composite_operation(&mut self, op: CompositeOperation) -> Result<(), DisplayError> {
        self.ctx.set_global_composite_operation(op.as_str())?;
        Ok(())
    }

    fn set_filter(&mut self, filter: &str) -> Result<(), DisplayError> {
        set_property(self.ctx.as_ref(), PROBE_FILTER, &JsValue::from_str(filter))
    }

    fn set_line_cap(&mut self, cap: LineCap) {
        self.ctx.set_line_cap(cap.as_str());
    }

    fn set_line_join(&mut self, join: LineJoin) {
        self.ctx.set_line_join(join.as_str());
    }

    fn set_line_width(&mut self, width: f64) {
        self.ctx.set_line_width(width);
    }

    fn set_line_dash_offset(&mut self, offset: f64) {
        self.ctx.set_line_dash_offset(offset);
    }

    fn set_font(&mut self, font: &str) {
        self.ctx.set_font(font);
    }

    fn set_direction(&mut self, direction: TextDirection) -> Result<(), DisplayError> {
        set_property(self.ctx.as_ref(), PROBE_DIRECTION, &JsValue::from_str(direction.as_str()))
    }

    fn fill_text(&mut self, text: &str, at: Point) -> Result<(), DisplayError> {
        self.ctx.fill_text(text, at.x, at.y)?;
        Ok(())
    }

    fn image_size(&self, image: &WebImage) -> (f64, f64) {
        let (width, height) = match image {
            WebImage::Image(img) => (img.natural_width(), img.natural_height()),
            WebImage::Canvas(canvas) => (canvas.width(), canvas.height()),
            WebImage::Bitmap(bitmap) => (bitmap.width(), bitmap.height()),
        };
        (f64::from(width), f64::from(height))
    }

    fn draw_image(&mut self, image: &WebImage, b: &ImageBlit) -> Result<(), DisplayError> {
        match image {
            WebImage::Image(img) => self
                .ctx
                .draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                    img, b.sx, b.sy, b.s_width, b.s_height, b.dx, b.dy, b.d_width, b.d_height,
                )?,
            WebImage::Canvas(canvas) => self
                .ctx
                .draw_image_with_html_canvas_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                    canvas, b.sx, b.sy, b.s_width, b.s_height, b.dx, b.dy, b.d_width, b.d_height,
                )?,
            WebImage::Bitmap(bitmap) => self
                .ctx
                .draw_image_with_image_bitmap_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                    bitmap, b.sx, b.sy, b.s_width, b.s_height, b.dx, b.dy, b.d_width, b.d_height,
                )?,
        }
        Ok(())
    }

    fn set_image_smoothing(&mut self, enabled: bool) -> Result<(), DisplayError> {
        let ctx: &JsValue = self.ctx.as_ref();
        for name in PROBE_IMAGE_SMOOTHING {
            set_property(ctx, name, &JsValue::from_bool(enabled))?;
        }
        Ok(())
    }

    fn is_button(&self, element: &Element) -> bool {
        element.is_instance_of::<HtmlButtonElement>()
            || element
                .dyn_ref::<HtmlInputElement>()
                .is_some_and(|input| input.type_() == "button")
    }

    fn draw_focus_if_needed(&mut self, element: &Element) {
        self.ctx.draw_focus_if_needed(element);
    }
}

// =============================================================
// Frame scheduling
// =============================================================

/// Schedules frames with `window.requestAnimationFrame`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnimationFrameScheduler;

impl Scheduler for AnimationFrameScheduler {
    fn request_frame(&self, callback: FrameCallback) -> Result<(), DisplayError> {
        let callback = Closure::once_into_js(move |timestamp: f64| callback(timestamp));
        window()?.request_animation_frame(callback.unchecked_ref())?;
        Ok(())
    }
}

// =============================================================
// Auto-resize
// =============================================================

/// A window `resize` listener that refits one display to the viewport.
///
/// The listener is registered for as long as this value lives; dropping it
/// removes it from the window.
pub struct ResizeListener {
    callback: Closure<dyn FnMut()>,
}

impl ResizeListener {
    /// Start refitting `display` on every window resize.
    ///
    /// Holds only a weak handle to the display.
    pub fn attach(display: Weak<RefCell<Display<CanvasSurface>>>) -> Result<Self, DisplayError> {
        let callback = Closure::wrap(Box::new(move || {
            let Some(display) = display.upgrade() else {
                return;
            };
            if let Err(err) = refit(&display) {
                log::warn!("auto-resize failed: {err}");
            }
        }) as Box<dyn FnMut()>);
        window()?.add_event_listener_with_callback(RESIZE_EVENT, callback.as_ref().unchecked_ref())?;
        Ok(Self { callback })
    }
}

impl Drop for ResizeListener {
    fn drop(&mut self) {
        let removed = window().and_then(|window| {
            window
                .remove_event_listener_with_callback(RESIZE_EVENT, self.callback.as_ref().unchecked_ref())
                .map_err(DisplayError::from)
        });
        if let Err(err) = removed {
            log::warn!("resize listener left on the window: {err}");
        }
    }
}

/// Resize `display` to the current window size.
pub fn refit(display: &RefCell<Display<CanvasSurface>>) -> Result<(), DisplayError> {
    let (width, height) = window_size()?;
    display.borrow_mut().fit_to(width, height)
}
