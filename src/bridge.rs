//! JavaScript-facing `RayDisplay` class.
//!
//! ARCHITECTURE
//! ============
//! JS passes loosely typed values; this layer converts them into the typed
//! arguments [`Display`] expects (parsing enum names, unpacking arrays,
//! filling in defaults) and converts every [`DisplayError`] into a thrown
//! `Error`. It also owns the browser-only pieces of a display: the frame
//! loop bound to `requestAnimationFrame` and the window resize listener.

#[cfg(test)]
#[path = "bridge_test.rs"]
mod bridge_test;

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use js_sys::{Array, Function};
use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::config::{CanvasTarget, DisplayOptions, parse_log_level};
use crate::display::{Display, DrawFn, ResizeChange};
use crate::error::DisplayError;
use crate::frame_loop::{FrameLoop, Scheduler};
use crate::geometry::{ArcSpec, EllipseSpec, ImageBlit, Point, Rect};
use crate::paint::{ColorStop, GradientSpec};
use crate::style::{FillRule, GradientKind, Repetition, StyleTarget};
use crate::surface::Surface;
use crate::web::{self, AnimationFrameScheduler, CanvasSurface, ResizeListener, WebImage};

pub type SharedDisplay = Rc<RefCell<Display<CanvasSurface>>>;

thread_local! {
    static DISPLAYS: RefCell<Vec<Weak<RefCell<Display<CanvasSurface>>>>> = const { RefCell::new(Vec::new()) };
}

fn register(display: &SharedDisplay) {
    DISPLAYS.with(|all| {
        let mut all = all.borrow_mut();
        all.retain(|weak| weak.strong_count() > 0);
        all.push(Rc::downgrade(display));
    });
}

fn live_displays() -> Vec<SharedDisplay> {
    DISPLAYS.with(|all| all.borrow().iter().filter_map(Weak::upgrade).collect())
}

/// Number of live displays (the JS side's view of the registry).
#[wasm_bindgen(js_name = displayCount)]
#[must_use]
pub fn display_count() -> usize {
    live_displays().len()
}

/// Install the console logger and panic hook. Safe to call more than once.
#[wasm_bindgen(js_name = initLogging)]
pub fn init_logging(level: Option<String>) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let level = parse_log_level(level.as_deref().unwrap_or(crate::config::DEFAULT_LOG_LEVEL))?;
    if let Err(err) = console_log::init_with_level(level) {
        log::debug!("console logger already installed: {err}");
    }
    log::set_max_level(level.to_level_filter());
    Ok(())
}

// =============================================================
// Argument conversion
// =============================================================

fn parse<T>(raw: &str) -> Result<T, JsValue>
where
    T: std::str::FromStr<Err = DisplayError>,
{
    raw.parse::<T>().map_err(JsValue::from)
}

fn parse_opt<T>(raw: Option<String>) -> Result<Option<T>, JsValue>
where
    T: std::str::FromStr<Err = DisplayError>,
{
    raw.as_deref().map(parse).transpose()
}

/// Read `[a, b]` number pairs such as gradient radii.
fn number_pair(value: &JsValue) -> Option<(f64, f64)> {
    if !Array::is_array(value) {
        return None;
    }
    let pair = Array::from(value);
    Some((pair.get(0).as_f64()?, pair.get(1).as_f64()?))
}

/// Read `[[offset, color], ...]` color stops.
fn color_stops(stops: &Array) -> Result<Vec<ColorStop>, DisplayError> {
    stops
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let pair = Array::is_array(&entry).then(|| Array::from(&entry));
            pair.and_then(|pair| Some(ColorStop::new(pair.get(0).as_f64()?, pair.get(1).as_string()?)))
                .ok_or_else(|| {
                    DisplayError::invalid("createGradient", format!("needs color stop {i} as [offset, color]"))
                })
        })
        .collect()
}

fn strings(op: &'static str, values: &Array) -> Result<Vec<String>, DisplayError> {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| v.as_string().ok_or_else(|| DisplayError::invalid(op, format!("needs a string at position {i}"))))
        .collect()
}

// =============================================================
// RayDisplay
// =============================================================

#[wasm_bindgen]
pub struct RayDisplay {
    display: SharedDisplay,
    frame_loop: FrameLoop<CanvasSurface>,
    resize: Option<ResizeListener>,
}

impl Default for RayDisplay {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl RayDisplay {
    #[wasm_bindgen(constructor)]
    #[must_use]
    pub fn new() -> Self {
        let display: SharedDisplay = Rc::new(RefCell::new(Display::new()));
        register(&display);
        let scheduler: Rc<dyn Scheduler> = Rc::new(AnimationFrameScheduler);
        let frame_loop = FrameLoop::new(Rc::clone(&display), scheduler);
        Self { display, frame_loop, resize: None }
    }

    // --- Binding ---

    /// Bind to a new fullscreen canvas (default) or to the canvas with `id`.
    pub fn init(&mut self, fullscreen: Option<bool>, id: Option<String>) -> Result<(), JsValue> {
        let options = DisplayOptions {
            fullscreen: fullscreen.unwrap_or(true),
            canvas_id: id,
            ..DisplayOptions::default()
        };
        self.bind_target(&options.target()?, None)?;
        Ok(())
    }

    /// Bind using a `DisplayOptions` object.
    ///
    /// `imageSmoothing` is applied as part of binding, so an unsupported
    /// setting fails the whole call and leaves the display unbound. A failed
    /// `autoResize` is logged and the display stays usable; call
    /// `switchAutoResize(true)` to retry it.
    #[wasm_bindgen(js_name = initWithOptions)]
    pub fn init_with_options(&mut self, options: &JsValue) -> Result<(), JsValue> {
        let raw = if options.is_undefined() || options.is_null() {
            "{}".to_owned()
        } else {
            js_sys::JSON::stringify(options)?
                .as_string()
                .unwrap_or_else(|| "{}".to_owned())
        };
        let options = DisplayOptions::from_json(&raw)?;
        log::set_max_level(options.log_level()?.to_level_filter());
        self.bind_target(&options.target()?, options.image_smoothing)?;
        if options.auto_resize {
            if let Err(err) = self.switch_auto_resize(Some(true)) {
                log::warn!("autoResize not enabled: {}", DisplayError::from_js(&err));
            }
        }
        Ok(())
    }

    #[wasm_bindgen(getter, js_name = isInitialized)]
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.display.borrow().is_initialized()
    }

    #[wasm_bindgen(getter)]
    #[must_use]
    pub fn width(&self) -> f64 {
        self.display.borrow().width()
    }

    #[wasm_bindgen(getter)]
    #[must_use]
    pub fn height(&self) -> f64 {
        self.display.borrow().height()
    }

    /// Turn window-following on or off; no argument toggles it.
    ///
    /// The setting only changes once the listener is attached or removed,
    /// so a failed attach can be retried.
    #[wasm_bindgen(js_name = switchAutoResize)]
    pub fn switch_auto_resize(&mut self, resize: Option<bool>) -> Result<(), JsValue> {
        let change = self.display.borrow().plan_auto_resize(resize)?;
        match change {
            ResizeChange::Attach => {
                web::refit(&self.display)?;
                self.resize = Some(ResizeListener::attach(Rc::downgrade(&self.display))?);
            }
            ResizeChange::Detach => self.resize = None,
            ResizeChange::Unchanged => {}
        }
        self.display.borrow_mut().commit_auto_resize(change);
        Ok(())
    }

    // --- Colors ---

    #[wasm_bindgen(js_name = setFillColor)]
    pub fn set_fill_color(&self, color: &str) -> Result<(), JsValue> {
        Ok(self.display.borrow_mut().set_fill_color(color)?)
    }

    #[wasm_bindgen(js_name = setStrokeColor)]
    pub fn set_stroke_color(&self, color: &str) -> Result<(), JsValue> {
        Ok(self.display.borrow_mut().set_stroke_color(color)?)
    }

    #[wasm_bindgen(js_name = setAlpha)]
    pub fn set_alpha(&self, a: f64) -> Result<(), JsValue> {
        Ok(self.display.borrow_mut().set_alpha(a)?)
    }

    /// `{ stroke, fill, alpha }` as last set through this display.
    ///
    /// `stroke` and `fill` are tagged objects rather than bare style strings:
    /// `{ type: "color", value: "#rrggbb" }`, `{ type: "gradient", value:
    /// "linear" | "radial" }` or `{ type: "pattern", value: <repetition> }`.
    /// `alpha` is a number.
    #[wasm_bindgen(js_name = getColors)]
    pub fn get_colors(&self) -> Result<JsValue, JsValue> {
        let json = serde_json::to_string(self.display.borrow().colors()?).map_err(DisplayError::from)?;
        js_sys::JSON::parse(&json)
    }

    /// `createGradient(x, y, sndX, sndY, r, style, gradientStyle, stops)`.
    ///
    /// `r` is `[r0, r1]` for radial gradients and ignored for linear ones;
    /// `stops` is an array of `[offset, color]` pairs.
    #[wasm_bindgen(js_name = createGradient)]
    #[allow(clippy::too_many_arguments)]
    pub fn create_gradient(
        &self,
        x: f64,
        y: f64,
        snd_x: f64,
        snd_y: f64,
        r: &JsValue,
        style: &str,
        gradient_style: &str,
        stops: &Array,
    ) -> Result<(), JsValue> {
        let target: StyleTarget = parse(style)?;
        let kind: GradientKind = parse(gradient_style)?;
        let mut spec = GradientSpec::from_parts(kind, Point::new(x, y), Point::new(snd_x, snd_y), number_pair(r))?;
        spec.stops = color_stops(stops)?;
        Ok(self.display.borrow_mut().set_gradient(target, &spec)?)
    }

    /// `createPattern(img, repetition = "repeat", style = "fill")`.
    #[wasm_bindgen(js_name = createPattern)]
    pub fn create_pattern(&self, img: JsValue, repetition: Option<String>, style: Option<String>) -> Result<(), JsValue> {
        let image = WebImage::from_js("createPattern", img)?;
        let repetition = parse_opt(repetition)?.unwrap_or(Repetition::Repeat);
        let target = parse_opt(style)?.unwrap_or(StyleTarget::Fill);
        Ok(self.display.borrow_mut().set_pattern(&image, repetition, target)?)
    }

    #[wasm_bindgen(js_name = setCompositeOperation)]
    pub fn set_composite_operation(&self, kind: &str) -> Result<(), JsValue> {
        Ok(self.display.borrow_mut().set_composite_operation(parse(kind)?)?)
    }

    // --- Lines ---

    #[wasm_bindgen(js_name = setLineEnding)]
    pub fn set_line_ending(&self, kind: &str) -> Result<(), JsValue> {
        Ok(self.display.borrow_mut().set_line_ending(parse(kind)?)?)
    }

    #[wasm_bindgen(js_name = setLineJoin)]
    pub fn set_line_join(&self, join: &str) -> Result<(), JsValue> {
        Ok(self.display.borrow_mut().set_line_join(parse(join)?)?)
    }

    #[wasm_bindgen(js_name = setLineWidth)]
    pub fn set_line_width(&self, w: f64) -> Result<(), JsValue> {
        Ok(self.display.borrow_mut().set_line_width(w)?)
    }

    #[wasm_bindgen(js_name = setLineDashOffset)]
    pub fn set_line_dash_offset(&self, v: f64) -> Result<(), JsValue> {
        Ok(self.display.borrow_mut().set_line_dash_offset(v)?)
    }

    // --- Pen ---

    #[wasm_bindgen(js_name = initPenMovement)]
    pub fn init_pen_movement(&self) -> Result<(), JsValue> {
        Ok(self.display.borrow_mut().begin_pen()?)
    }

    #[wasm_bindgen(js_name = movePenTo)]
    pub fn move_pen_to(&self, x: f64, y: f64) -> Result<(), JsValue> {
        Ok(self.display.borrow_mut().move_pen_to(Point::new(x, y))?)
    }

    #[wasm_bindgen(js_name = movePenBy)]
    pub fn move_pen_by(&self, rel_x: f64, rel_y: f64) -> Result<(), JsValue> {
        Ok(self.display.borrow_mut().move_pen_by(rel_x, rel_y)?)
    }

    #[wasm_bindgen(js_name = usePenTo)]
    pub fn use_pen_to(&self, x: f64, y: f64) -> Result<(), JsValue> {
        Ok(self.display.borrow_mut().use_pen_to(Point::new(x, y))?)
    }

    #[wasm_bindgen(js_name = usePenBy)]
    pub fn use_pen_by(&self, rel_x: f64, rel_y: f64) -> Result<(), JsValue> {
        Ok(self.display.borrow_mut().use_pen_by(rel_x, rel_y)?)
    }

    /// `usePenArc(x, y, r, startAngle = 0, endAngle = 2π, anticlockwise = false)`.
    #[wasm_bindgen(js_name = usePenArc)]
    pub fn use_pen_arc(
        &self,
        x: f64,
        y: f64,
        r: f64,
        start_angle: Option<f64>,
        end_angle: Option<f64>,
        anticlockwise: Option<bool>,
    ) -> Result<(), JsValue> {
        let arc = ArcSpec::circle(Point::new(x, y), r);
        let (start, end) = (start_angle.unwrap_or(arc.start_angle), end_angle.unwrap_or(arc.end_angle));
        let arc = arc.angles(start, end).anticlockwise(anticlockwise.unwrap_or(false));
        Ok(self.display.borrow_mut().use_pen_arc(&arc)?)
    }

    #[wasm_bindgen(js_name = usePenArcTo)]
    pub fn use_pen_arc_to(&self, x: f64, y: f64, snd_x: f64, snd_y: f64, r: f64) -> Result<(), JsValue> {
        Ok(self
            .display
            .borrow_mut()
            .use_pen_arc_to(Point::new(x, y), Point::new(snd_x, snd_y), r)?)
    }

    #[wasm_bindgen(js_name = usePenBezierCurve)]
    pub fn use_pen_bezier_curve(
        &self,
        cpx: f64,
        cpy: f64,
        snd_cpx: f64,
        snd_cpy: f64,
        end_point_x: f64,
        end_point_y: f64,
    ) -> Result<(), JsValue> {
        Ok(self.display.borrow_mut().use_pen_bezier(
            Point::new(cpx, cpy),
            Point::new(snd_cpx, snd_cpy),
            Point::new(end_point_x, end_point_y),
        )?)
    }

    #[wasm_bindgen(js_name = usePenRect)]
    pub fn use_pen_rect(&self, x: f64, y: f64, width: f64, height: f64) -> Result<(), JsValue> {
        Ok(self.display.borrow_mut().use_pen_rect(&Rect::new(x, y, width, height))?)
    }

    /// `usePenEllipse(x, y, rx, ry, rotation = 0, startAngle = 0, endAngle = 2π, anticlockwise = false)`.
    #[wasm_bindgen(js_name = usePenEllipse)]
    #[allow(clippy::too_many_arguments)]
    pub fn use_pen_ellipse(
        &self,
        x: f64,
        y: f64,
        rx: f64,
        ry: f64,
        rotation: Option<f64>,
        start_angle: Option<f64>,
        end_angle: Option<f64>,
        anticlockwise: Option<bool>,
    ) -> Result<(), JsValue> {
        let ellipse = EllipseSpec::new(Point::new(x, y), rx, ry);
        let (start, end) = (start_angle.unwrap_or(ellipse.start_angle), end_angle.unwrap_or(ellipse.end_angle));
        let ellipse = ellipse
            .rotation(rotation.unwrap_or(0.0))
            .angles(start, end)
            .anticlockwise(anticlockwise.unwrap_or(false));
        Ok(self.display.borrow_mut().use_pen_ellipse(&ellipse)?)
    }

    #[wasm_bindgen(js_name = stopPenMovement)]
    pub fn stop_pen_movement(&self) -> Result<(), JsValue> {
        Ok(self.display.borrow_mut().stop_pen()?)
    }

    #[wasm_bindgen(js_name = fillPenPath)]
    pub fn fill_pen_path(&self, rule: Option<String>) -> Result<(), JsValue> {
        let rule: Option<FillRule> = parse_opt(rule)?;
        Ok(self.display.borrow_mut().fill_path(rule)?)
    }

    #[wasm_bindgen(js_name = strokePenPath)]
    pub fn stroke_pen_path(&self) -> Result<(), JsValue> {
        Ok(self.display.borrow_mut().stroke_path()?)
    }

    /// `{ x, y }` of the active pen.
    #[wasm_bindgen(js_name = getPenPos)]
    pub fn get_pen_pos(&self) -> Result<JsValue, JsValue> {
        let pos = self.display.borrow().pen_position()?;
        let out = js_sys::Object::new();
        js_sys::Reflect::set(&out, &JsValue::from_str("x"), &JsValue::from_f64(pos.x))?;
        js_sys::Reflect::set(&out, &JsValue::from_str("y"), &JsValue::from_f64(pos.y))?;
        Ok(out.into())
    }

    #[wasm_bindgen(js_name = createStencil)]
    pub fn create_stencil(&self, rule: Option<String>) -> Result<(), JsValue> {
        let rule: Option<FillRule> = parse_opt(rule)?;
        Ok(self.display.borrow_mut().create_stencil(rule)?)
    }

    // --- Clearing ---

    #[wasm_bindgen(js_name = clearRect)]
    pub fn clear_rect(&self, x: f64, y: f64, w: f64, h: f64) -> Result<(), JsValue> {
        Ok(self.display.borrow_mut().clear_rect(&Rect::new(x, y, w, h))?)
    }

    #[wasm_bindgen(js_name = clearCanvas)]
    pub fn clear_canvas(&self) -> Result<(), JsValue> {
        Ok(self.display.borrow_mut().clear_canvas()?)
    }

    // --- Images & focus ---

    /// `drawImage(image, sx, sy, sWidth, sHeight, dx, dy, dWidth, dHeight)`.
    ///
    /// Missing source/destination origins default to 0, missing sizes to the
    /// image's natural size.
    #[wasm_bindgen(js_name = drawImage)]
    #[allow(clippy::too_many_arguments, clippy::similar_names)]
    pub fn draw_image(
        &self,
        image: JsValue,
        sx: Option<f64>,
        sy: Option<f64>,
        s_width: Option<f64>,
        s_height: Option<f64>,
        dx: Option<f64>,
        dy: Option<f64>,
        d_width: Option<f64>,
        d_height: Option<f64>,
    ) -> Result<(), JsValue> {
        let image = WebImage::from_js("drawImage", image)?;
        let mut display = self.display.borrow_mut();
        let explicit = [sx, sy, s_width, s_height, dx, dy, d_width, d_height].iter().any(Option::is_some);
        let blit = if explicit {
            let (width, height) = display
                .surface()
                .map(|surface| surface.image_size(&image))
                .unwrap_or_default();
            Some(ImageBlit {
                sx: sx.unwrap_or(0.0),
                sy: sy.unwrap_or(0.0),
                s_width: s_width.unwrap_or(width),
                s_height: s_height.unwrap_or(height),
                dx: dx.unwrap_or(0.0),
                dy: dy.unwrap_or(0.0),
                d_width: d_width.unwrap_or(width),
                d_height: d_height.unwrap_or(height),
            })
        } else {
            None
        };
        Ok(display.draw_image(&image, blit)?)
    }

    #[wasm_bindgen(js_name = drawFocus)]
    pub fn draw_focus(&self, element: JsValue) -> Result<(), JsValue> {
        let element = element.dyn_into::<Element>().map_err(|_| {
            DisplayError::invalid("drawFocus", "needs an HTMLButtonElement or an HTMLInputElement")
        })?;
        Ok(self.display.borrow_mut().draw_focus(&element)?)
    }

    #[wasm_bindgen(js_name = setInterpolate)]
    pub fn set_interpolate(&self, interpolate: bool) -> Result<(), JsValue> {
        Ok(self.display.borrow_mut().set_interpolate(interpolate)?)
    }

    // --- Filters ---

    #[wasm_bindgen(js_name = setFilters)]
    pub fn set_filters(&self, filters: &Array) -> Result<(), JsValue> {
        let filters = strings("setFilters", filters)?;
        Ok(self.display.borrow_mut().set_filters(filters)?)
    }

    #[wasm_bindgen(js_name = getFilters)]
    pub fn get_filters(&self) -> Result<Array, JsValue> {
        let display = self.display.borrow();
        Ok(display.filters()?.iter().map(|f| JsValue::from_str(f)).collect())
    }

    // --- Text ---

    #[wasm_bindgen(js_name = setFont)]
    pub fn set_font(&self, font: &str) -> Result<(), JsValue> {
        Ok(self.display.borrow_mut().set_font(font)?)
    }

    #[wasm_bindgen(js_name = setTextDirection)]
    pub fn set_text_direction(&self, direction: &str) -> Result<(), JsValue> {
        Ok(self.display.borrow_mut().set_text_direction(parse(direction)?)?)
    }

    #[wasm_bindgen(js_name = writeText)]
    pub fn write_text(&self, text: &str, x: f64, y: f64) -> Result<(), JsValue> {
        Ok(self.display.borrow_mut().write_text(text, Point::new(x, y))?)
    }

    // --- Loop ---

    /// Install `draw`, called once per frame with the frame timestamp (ms).
    #[wasm_bindgen(js_name = setDrawingMethod)]
    pub fn set_drawing_method(&self, draw: Function) {
        let callback: DrawFn = Box::new(move |timestamp| {
            draw.call1(&JsValue::NULL, &JsValue::from_f64(timestamp))
                .map(drop)
                .map_err(DisplayError::from)
        });
        self.display.borrow_mut().set_drawing_method(callback);
    }

    #[wasm_bindgen(js_name = startLooping)]
    pub fn start_looping(&self) -> Result<(), JsValue> {
        Ok(self.frame_loop.start()?)
    }

    #[wasm_bindgen(js_name = stopLooping)]
    pub fn stop_looping(&self) {
        self.frame_loop.stop();
    }

    #[wasm_bindgen(getter, js_name = isLooping)]
    #[must_use]
    pub fn is_looping(&self) -> bool {
        self.display.borrow().is_looping()
    }
}

impl RayDisplay {
    /// Every display created on this thread that is still alive, oldest first.
    #[must_use]
    pub fn all() -> Vec<SharedDisplay> {
        live_displays()
    }

    /// The shared display behind this handle, for Rust callers.
    #[must_use]
    pub fn display(&self) -> &SharedDisplay {
        &self.display
    }

    fn bind_target(&self, target: &CanvasTarget, image_smoothing: Option<bool>) -> Result<(), DisplayError> {
        if self.display.borrow().is_initialized() {
            return Err(DisplayError::AlreadyInitialized);
        }
        let canvas = match target {
            CanvasTarget::Fullscreen => web::create_fullscreen_canvas()?,
            CanvasTarget::Element(id) => web::find_canvas(id)?,
        };
        let bound = CanvasSurface::from_canvas(canvas.clone())
            .and_then(|surface| self.display.borrow_mut().bind_with(surface, image_smoothing));
        if bound.is_err() && *target == CanvasTarget::Fullscreen {
            // The canvas was created for this display; don't leave it on the page.
            canvas.remove();
        }
        bound
    }
}
