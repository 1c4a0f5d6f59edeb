//! In-memory surface and scheduler for driving displays in unit tests.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use crate::error::DisplayError;
use crate::frame_loop::{FrameCallback, Scheduler};
use crate::geometry::{ArcSpec, EllipseSpec, ImageBlit, Point, Rect};
use crate::paint::{GradientShape, GradientSpec, HexColor};
use crate::style::{CompositeOperation, FillRule, LineCap, LineJoin, Repetition, StyleTarget, TextDirection};
use crate::surface::{Feature, Surface};

#[derive(Debug, Clone, PartialEq)]
pub struct TestImage {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TestElement {
    pub tag: &'static str,
    pub input_type: Option<&'static str>,
}

impl TestElement {
    pub fn button() -> Self {
        Self { tag: "button", input_type: None }
    }

    pub fn input(input_type: &'static str) -> Self {
        Self { tag: "input", input_type: Some(input_type) }
    }
}

/// Records every forwarded call as a compact JS-like string.
pub struct RecordingSurface {
    pub width: f64,
    pub height: f64,
    pub features: Vec<Feature>,
    pub calls: Vec<String>,
}

impl RecordingSurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            features: vec![Feature::Ellipse, Feature::Filter, Feature::TextDirection, Feature::ImageSmoothing],
            calls: Vec::new(),
        }
    }

    pub fn without(mut self, feature: Feature) -> Self {
        self.features.retain(|f| *f != feature);
        self
    }

    fn record(&mut self, call: String) {
        self.calls.push(call);
    }
}

fn rule_arg(rule: Option<FillRule>) -> String {
    rule.map(|r| format!("\"{r}\"")).unwrap_or_default()
}

impl Surface for RecordingSurface {
    type Image = TestImage;
    type Element = TestElement;

    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn set_size(&mut self, width: f64, height: f64) {
        // Canvas bitmaps are whole pixels.
        self.width = width.round();
        self.height = height.round();
        self.record(format!("resize({width}, {height})"));
    }

    fn supports(&self, feature: Feature) -> bool {
        self.features.contains(&feature)
    }

    fn begin_path(&mut self) {
        self.record("beginPath()".to_owned());
    }

    fn close_path(&mut self) {
        self.record("closePath()".to_owned());
    }

    fn move_to(&mut self, to: Point) {
        self.record(format!("moveTo({}, {})", to.x, to.y));
    }

    fn line_to(&mut self, to: Point) {
        self.record(format!("lineTo({}, {})", to.x, to.y));
    }

    fn arc(&mut self, arc: &ArcSpec) -> Result<(), DisplayError> {
        self.record(format!(
            "arc({}, {}, {}, {}, {}, {})",
            arc.center.x, arc.center.y, arc.radius, arc.start_angle, arc.end_angle, arc.anticlockwise
        ));
        Ok(())
    }

    fn arc_to(&mut self, first: Point, second: Point, radius: f64) -> Result<(), DisplayError> {
        self.record(format!("arcTo({}, {}, {}, {}, {radius})", first.x, first.y, second.x, second.y));
        Ok(())
    }

    fn bezier_curve_to(&mut self, cp1: Point, cp2: Point, end: Point) {
        self.record(format!(
            "bezierCurveTo({}, {}, {}, {}, {}, {})",
            cp1.x, cp1.y, cp2.x, cp2.y, end.x, end.y
        ));
    }

    fn rect(&mut self, rect: &Rect) {
        self.record(format!("rect({}, {}, {}, {})", rect.x, rect.y, rect.width, rect.height));
    }

    fn ellipse(&mut self, e: &EllipseSpec) -> Result<(), DisplayError> {
        self.record(format!(
            "ellipse({}, {}, {}, {}, {}, {}, {}, {})",
            e.center.x, e.center.y, e.radius_x, e.radius_y, e.rotation, e.start_angle, e.end_angle, e.anticlockwise
        ));
        Ok(())
    }

    fn fill(&mut self, rule: Option<FillRule>) {
        self.record(format!("fill({})", rule_arg(rule)));
    }

    fn stroke(&mut self) {
        self.record("stroke()".to_owned());
    }

    fn clip(&mut self, rule: Option<FillRule>) {
        self.record(format!("clip({})", rule_arg(rule)));
    }

    fn clear_rect(&mut self, rect: &Rect) {
        self.record(format!("clearRect({}, {}, {}, {})", rect.x, rect.y, rect.width, rect.height));
    }

    fn set_color(&mut self, target: StyleTarget, color: &HexColor) {
        self.record(format!("{target}Style = {color}"));
    }

    fn set_gradient(&mut self, target: StyleTarget, gradient: &GradientSpec) -> Result<(), DisplayError> {
        let created = match gradient.shape {
            GradientShape::Linear { start, end } => {
                format!("createLinearGradient({}, {}, {}, {})", start.x, start.y, end.x, end.y)
            }
            GradientShape::Radial { start, start_radius, end, end_radius } => format!(
                "createRadialGradient({}, {}, {start_radius}, {}, {}, {end_radius})",
                start.x, start.y, end.x, end.y
            ),
        };
        self.record(created);
        for stop in &gradient.stops {
            self.record(format!("addColorStop({}, {})", stop.offset, stop.color));
        }
        self.record(format!("{target}Style = gradient"));
        Ok(())
    }

    fn set_pattern(&mut self, target: StyleTarget, image: &TestImage, repetition: Repetition) -> Result<(), DisplayError> {
        self.record(format!("createPattern({}x{}, \"{repetition}\")", image.width, image.height));
        self.record(format!("{target}Style = pattern"));
        Ok(())
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.record(format!("globalAlpha = {alpha}"));
    }

    fn set_composite_operation(&mut self, op: CompositeOperation) -> Result<(), DisplayError> {
        self.record(format!("globalCompositeOperation = {op}"));
        Ok(())
    }

    fn set_filter(&mut self, filter: &str) -> Result<(), DisplayError> {
        self.record(format!("filter = {filter}"));
        Ok(())
    }

    fn set_line_cap(&mut self, cap: LineCap) {
        self.record(format!("lineCap = {cap}"));
    }

    fn set_line_join(&mut self, join: LineJoin) {
        self.record(format!("lineJoin = {join}"));
    }

    fn set_line_width(&mut self, width: f64) {
        self.record(format!("lineWidth = {width}"));
    }

    fn set_line_dash_offset(&mut self, offset: f64) {
        self.record(format!("lineDashOffset = {offset}"));
    }

    fn set_font(&mut self, font: &str) {
        self.record(format!("font = {font}"));
    }

    fn set_direction(&mut self, direction: TextDirection) -> Result<(), DisplayError> {
        self.record(format!("direction = {direction}"));
        Ok(())
    }

    fn fill_text(&mut self, text: &str, at: Point) -> Result<(), DisplayError> {
        self.record(format!("fillText({text:?}, {}, {})", at.x, at.y));
        Ok(())
    }

    fn image_size(&self, image: &TestImage) -> (f64, f64) {
        (image.width, image.height)
    }

    fn draw_image(&mut self, _image: &TestImage, b: &ImageBlit) -> Result<(), DisplayError> {
        self.record(format!(
            "drawImage({}, {}, {}, {}, {}, {}, {}, {})",
            b.sx, b.sy, b.s_width, b.s_height, b.dx, b.dy, b.d_width, b.d_height
        ));
        Ok(())
    }

    fn set_image_smoothing(&mut self, enabled: bool) -> Result<(), DisplayError> {
        self.record(format!("imageSmoothingEnabled = {enabled}"));
        Ok(())
    }

    fn is_button(&self, element: &TestElement) -> bool {
        element.tag == "button" || (element.tag == "input" && element.input_type == Some("button"))
    }

    fn draw_focus_if_needed(&mut self, element: &TestElement) {
        self.record(format!("drawFocusIfNeeded({})", element.tag));
    }
}

/// Queues frame requests until the test fires them.
#[derive(Default)]
pub struct ManualScheduler {
    pending: RefCell<VecDeque<FrameCallback>>,
    pub refuse: Cell<bool>,
}

impl ManualScheduler {
    pub fn pending(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Fire every frame requested so far (not ones requested while firing).
    pub fn run_frame(&self, timestamp: f64) -> usize {
        let due: Vec<FrameCallback> = self.pending.borrow_mut().drain(..).collect();
        let fired = due.len();
        for callback in due {
            callback(timestamp);
        }
        fired
    }
}

impl Scheduler for ManualScheduler {
    fn request_frame(&self, callback: FrameCallback) -> Result<(), DisplayError> {
        if self.refuse.get() {
            return Err(DisplayError::Host("requestAnimationFrame refused".to_owned()));
        }
        self.pending.borrow_mut().push_back(callback);
        Ok(())
    }
}
