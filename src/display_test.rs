#![allow(clippy::float_cmp)]

use super::*;
use crate::consts::FULL_TURN;
use crate::style::GradientKind;
use crate::testing::{RecordingSurface, TestElement, TestImage};

// =============================================================
// Helpers
// =============================================================

fn bound() -> Display<RecordingSurface> {
    let mut display = Display::new();
    assert_eq!(display.bind(RecordingSurface::new(300.0, 150.0)), Ok(()));
    display
}

fn bound_with(surface: RecordingSurface) -> Display<RecordingSurface> {
    let mut display = Display::new();
    assert_eq!(display.bind(surface), Ok(()));
    display
}

fn calls(display: &Display<RecordingSurface>) -> Vec<String> {
    display.surface().map(|s| s.calls.clone()).unwrap_or_default()
}

fn with_pen() -> Display<RecordingSurface> {
    let mut display = bound();
    assert_eq!(display.begin_pen(), Ok(()));
    display
}

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

// =============================================================
// Binding
// =============================================================

#[test]
fn new_display_is_unbound() {
    let display: Display<RecordingSurface> = Display::new();
    assert!(!display.is_initialized());
    assert!(!display.is_looping());
    assert!(!display.auto_resize());
    assert_eq!((display.width(), display.height()), (0.0, 0.0));
}

#[test]
fn bind_records_surface_size() {
    let display = bound();
    assert!(display.is_initialized());
    assert_eq!((display.width(), display.height()), (300.0, 150.0));
}

#[test]
fn bind_twice_fails() {
    let mut display = bound();
    assert_eq!(display.bind(RecordingSurface::new(1.0, 1.0)), Err(DisplayError::AlreadyInitialized));
    assert_eq!(display.width(), 300.0);
}

#[test]
fn bind_with_applies_smoothing_before_binding() {
    let mut display = Display::new();
    assert_eq!(display.bind_with(RecordingSurface::new(10.0, 10.0), Some(false)), Ok(()));
    assert!(display.is_initialized());
    assert_eq!(calls(&display), vec!["imageSmoothingEnabled = false"]);
}

#[test]
fn bind_with_unsupported_smoothing_leaves_display_unbound() {
    let mut display = Display::new();
    let plain = RecordingSurface::new(10.0, 10.0).without(Feature::ImageSmoothing);
    assert_eq!(display.bind_with(plain, Some(true)), Err(DisplayError::Unsupported(Feature::ImageSmoothing)));
    assert!(!display.is_initialized());

    // A retry can still bind.
    assert_eq!(display.bind_with(RecordingSurface::new(20.0, 10.0), Some(true)), Ok(()));
    assert_eq!(display.width(), 20.0);
}

#[test]
fn bind_with_no_smoothing_ignores_missing_support() {
    let mut display = Display::new();
    let plain = RecordingSurface::new(10.0, 10.0).without(Feature::ImageSmoothing);
    assert_eq!(display.bind_with(plain, None), Ok(()));
    assert!(calls(&display).is_empty());
}

#[test]
fn drawing_before_bind_fails_not_initialized() {
    let mut display: Display<RecordingSurface> = Display::new();
    assert_eq!(display.set_fill_color("#fff"), Err(DisplayError::NotInitialized));
    assert_eq!(display.set_alpha(0.5), Err(DisplayError::NotInitialized));
    assert_eq!(display.begin_pen(), Err(DisplayError::NotInitialized));
    assert_eq!(display.clear_canvas(), Err(DisplayError::NotInitialized));
    assert_eq!(display.stroke_path(), Err(DisplayError::NotInitialized));
    assert_eq!(display.set_line_width(2.0), Err(DisplayError::NotInitialized));
    assert_eq!(display.set_line_join(LineJoin::Round), Err(DisplayError::NotInitialized));
    assert_eq!(display.write_text("hi", pt(0.0, 0.0)), Err(DisplayError::NotInitialized));
    assert_eq!(display.set_filters(vec!["blur(2px)".into()]), Err(DisplayError::NotInitialized));
    assert!(display.colors().is_err());
}

#[test]
fn not_initialized_wins_over_pen_checks() {
    let mut display: Display<RecordingSurface> = Display::new();
    assert_eq!(display.move_pen_to(pt(1.0, 1.0)), Err(DisplayError::NotInitialized));
    assert_eq!(display.pen_position(), Err(DisplayError::NotInitialized));
}

// =============================================================
// Size & auto-resize
// =============================================================

#[test]
fn fit_to_resizes_surface_and_tracks_size() {
    let mut display = bound();
    assert_eq!(display.fit_to(800.0, 600.0), Ok(()));
    assert_eq!((display.width(), display.height()), (800.0, 600.0));
    assert_eq!(calls(&display), vec!["resize(800, 600)"]);
}

#[test]
fn fit_to_records_the_size_the_surface_settled_on() {
    let mut display = bound();
    assert_eq!(display.fit_to(1023.5, 599.4), Ok(()));
    assert_eq!((display.width(), display.height()), (1024.0, 599.0));
    assert_eq!(display.clear_canvas(), Ok(()));
    assert_eq!(calls(&display).last().map(String::as_str), Some("clearRect(0, 0, 1024, 599)"));
}

#[test]
fn fit_to_rejects_negative_size() {
    let mut display = bound();
    assert!(display.fit_to(-1.0, 10.0).is_err());
    assert!(calls(&display).is_empty());
}

/// Plan a change and record it, as the host does once its listener work succeeds.
fn switch(display: &mut Display<RecordingSurface>, resize: Option<bool>) -> Result<ResizeChange, DisplayError> {
    let change = display.plan_auto_resize(resize)?;
    display.commit_auto_resize(change);
    Ok(change)
}

#[test]
fn auto_resize_explicit_on_then_off() {
    let mut display = bound();
    assert_eq!(switch(&mut display, Some(true)), Ok(ResizeChange::Attach));
    assert!(display.auto_resize());
    assert_eq!(switch(&mut display, Some(true)), Ok(ResizeChange::Unchanged));
    assert_eq!(switch(&mut display, Some(false)), Ok(ResizeChange::Detach));
    assert!(!display.auto_resize());
    assert_eq!(switch(&mut display, Some(false)), Ok(ResizeChange::Unchanged));
}

#[test]
fn auto_resize_without_argument_toggles() {
    let mut display = bound();
    assert_eq!(switch(&mut display, None), Ok(ResizeChange::Attach));
    assert_eq!(switch(&mut display, None), Ok(ResizeChange::Detach));
    assert_eq!(switch(&mut display, None), Ok(ResizeChange::Attach));
}

#[test]
fn uncommitted_attach_is_planned_again() {
    let mut display = bound();
    assert_eq!(display.plan_auto_resize(Some(true)), Ok(ResizeChange::Attach));
    // Host failed to attach its listener, so nothing was committed.
    assert!(!display.auto_resize());
    assert_eq!(display.plan_auto_resize(Some(true)), Ok(ResizeChange::Attach));
    assert_eq!(display.plan_auto_resize(None), Ok(ResizeChange::Attach));
}

#[test]
fn uncommitted_detach_keeps_auto_resize_on() {
    let mut display = bound();
    assert_eq!(switch(&mut display, Some(true)), Ok(ResizeChange::Attach));
    assert_eq!(display.plan_auto_resize(Some(false)), Ok(ResizeChange::Detach));
    assert!(display.auto_resize());
    assert_eq!(display.plan_auto_resize(Some(false)), Ok(ResizeChange::Detach));
}

#[test]
fn plan_auto_resize_requires_bound_display() {
    let display = Display::<RecordingSurface>::new();
    assert_eq!(display.plan_auto_resize(Some(true)), Err(DisplayError::NotInitialized));
}

// =============================================================
// Colors
// =============================================================

#[test]
fn set_fill_and_stroke_color_forward_and_record() {
    let mut display = bound();
    assert_eq!(display.set_fill_color("#abc"), Ok(()));
    assert_eq!(display.set_stroke_color("#112233"), Ok(()));
    assert_eq!(calls(&display), vec!["fillStyle = #abc", "strokeStyle = #112233"]);

    let colors = display.colors().cloned();
    assert_eq!(colors.as_ref().map(|c| c.fill.clone()), Ok(Paint::Color(HexColor::parse_for("t", "#abc").unwrap())));
    assert_eq!(colors.map(|c| c.stroke), Ok(Paint::Color(HexColor::parse_for("t", "#112233").unwrap())));
}

#[test]
fn invalid_color_is_rejected_without_forwarding() {
    let mut display = bound();
    let err = display.set_fill_color("red").unwrap_err();
    assert!(err.to_string().starts_with("setFillColor()"));
    let err = display.set_stroke_color("#12345").unwrap_err();
    assert!(err.to_string().starts_with("setStrokeColor()"));
    assert!(calls(&display).is_empty());
    assert_eq!(display.colors().map(|c| c.fill.clone()), Ok(Paint::Color(HexColor::black())));
}

#[test]
fn set_alpha_accepts_unit_range() {
    let mut display = bound();
    assert_eq!(display.set_alpha(0.0), Ok(()));
    assert_eq!(display.set_alpha(1.0), Ok(()));
    assert_eq!(display.set_alpha(0.25), Ok(()));
    assert_eq!(display.colors().map(|c| c.alpha), Ok(0.25));
    assert_eq!(calls(&display).last().map(String::as_str), Some("globalAlpha = 0.25"));
}

#[test]
fn set_alpha_rejects_out_of_range_and_nan() {
    let mut display = bound();
    assert!(display.set_alpha(1.5).is_err());
    assert!(display.set_alpha(-0.1).is_err());
    assert!(display.set_alpha(f64::NAN).is_err());
    assert!(calls(&display).is_empty());
    assert_eq!(display.colors().map(|c| c.alpha), Ok(1.0));
}

// =============================================================
// Gradients & patterns
// =============================================================

#[test]
fn linear_gradient_forwards_usable_stops_in_order() {
    let mut display = bound();
    let spec = GradientSpec::linear(pt(0.0, 0.0), pt(100.0, 0.0))
        .stop(0.0, "#000")
        .stop(2.0, "#bad")
        .stop(1.0, "#fff");
    assert_eq!(display.set_gradient(StyleTarget::Fill, &spec), Ok(()));
    assert_eq!(
        calls(&display),
        vec![
            "createLinearGradient(0, 0, 100, 0)",
            "addColorStop(0, #000)",
            "addColorStop(1, #fff)",
            "fillStyle = gradient",
        ]
    );
    assert_eq!(display.colors().map(|c| c.fill.clone()), Ok(Paint::Gradient(GradientKind::Linear)));
}

#[test]
fn radial_gradient_targets_stroke() {
    let mut display = bound();
    let spec = GradientSpec::radial(pt(10.0, 10.0), 0.0, pt(10.0, 10.0), 50.0).stop(0.5, "red");
    assert_eq!(display.set_gradient(StyleTarget::Stroke, &spec), Ok(()));
    assert_eq!(
        calls(&display),
        vec!["createRadialGradient(10, 10, 0, 10, 10, 50)", "addColorStop(0.5, red)", "strokeStyle = gradient"]
    );
    assert_eq!(display.colors().map(|c| c.stroke.clone()), Ok(Paint::Gradient(GradientKind::Radial)));
}

#[test]
fn gradient_with_negative_radius_is_rejected() {
    let mut display = bound();
    let spec = GradientSpec::radial(pt(0.0, 0.0), -5.0, pt(0.0, 0.0), 5.0);
    assert!(display.set_gradient(StyleTarget::Fill, &spec).is_err());
    assert!(calls(&display).is_empty());
}

#[test]
fn pattern_assigns_slot_and_records_repetition() {
    let mut display = bound();
    let image = TestImage { width: 8.0, height: 4.0 };
    assert_eq!(display.set_pattern(&image, Repetition::RepeatY, StyleTarget::Fill), Ok(()));
    assert_eq!(calls(&display), vec!["createPattern(8x4, \"repeat-y\")", "fillStyle = pattern"]);
    assert_eq!(display.colors().map(|c| c.fill.clone()), Ok(Paint::Pattern(Repetition::RepeatY)));
}

// =============================================================
// Lines, compositing
// =============================================================

#[test]
fn line_settings_forward_host_names() {
    let mut display = bound();
    assert_eq!(display.set_line_ending(LineCap::Square), Ok(()));
    assert_eq!(display.set_line_join(LineJoin::Miter), Ok(()));
    assert_eq!(display.set_line_dash_offset(3.5), Ok(()));
    assert_eq!(display.set_composite_operation(CompositeOperation::ColorDodge), Ok(()));
    assert_eq!(
        calls(&display),
        vec!["lineCap = square", "lineJoin = miter", "lineDashOffset = 3.5", "globalCompositeOperation = color-dodge"]
    );
}

#[test]
fn line_dash_offset_rejects_infinity() {
    let mut display = bound();
    assert!(display.set_line_dash_offset(f64::INFINITY).is_err());
    assert!(calls(&display).is_empty());
}

#[test]
fn line_width_forwards_even_when_host_will_ignore_it() {
    let mut display = bound();
    assert_eq!(display.set_line_width(4.0), Ok(()));
    assert_eq!(display.set_line_width(-1.0), Ok(()));
    assert_eq!(calls(&display), vec!["lineWidth = 4", "lineWidth = -1"]);
}

// =============================================================
// Pen
// =============================================================

#[test]
fn begin_pen_opens_path() {
    let display = with_pen();
    assert!(display.pen_active());
    assert_eq!(calls(&display), vec!["beginPath()"]);
    assert_eq!(display.pen_position(), Ok(pt(0.0, 0.0)));
}

#[test]
fn begin_pen_twice_fails() {
    let mut display = with_pen();
    assert_eq!(display.begin_pen(), Err(DisplayError::PenAlreadyActive));
    assert_eq!(calls(&display), vec!["beginPath()"]);
}

#[test]
fn pen_ops_require_active_pen() {
    let mut display = bound();
    assert_eq!(display.move_pen_to(pt(1.0, 2.0)), Err(DisplayError::PenInactive("movePenTo")));
    assert_eq!(display.move_pen_by(1.0, 2.0), Err(DisplayError::PenInactive("movePenBy")));
    assert_eq!(display.use_pen_to(pt(1.0, 2.0)), Err(DisplayError::PenInactive("usePenTo")));
    assert_eq!(display.use_pen_by(1.0, 2.0), Err(DisplayError::PenInactive("usePenBy")));
    assert_eq!(
        display.use_pen_arc(&ArcSpec::circle(pt(0.0, 0.0), 1.0)),
        Err(DisplayError::PenInactive("usePenArc"))
    );
    assert_eq!(
        display.use_pen_arc_to(pt(0.0, 0.0), pt(1.0, 1.0), 1.0),
        Err(DisplayError::PenInactive("usePenArcTo"))
    );
    assert_eq!(
        display.use_pen_bezier(pt(0.0, 0.0), pt(1.0, 1.0), pt(2.0, 2.0)),
        Err(DisplayError::PenInactive("usePenBezierCurve"))
    );
    assert_eq!(
        display.use_pen_rect(&Rect::new(0.0, 0.0, 1.0, 1.0)),
        Err(DisplayError::PenInactive("usePenRect"))
    );
    assert_eq!(
        display.use_pen_ellipse(&EllipseSpec::new(pt(0.0, 0.0), 1.0, 1.0)),
        Err(DisplayError::PenInactive("usePenEllipse"))
    );
    assert_eq!(display.create_stencil(None), Err(DisplayError::PenInactive("createStencil")));
    assert_eq!(display.stop_pen(), Err(DisplayError::PenInactive("stopPenMovement")));
    assert_eq!(display.pen_position(), Err(DisplayError::PenInactive("getPenPos")));
    assert!(calls(&display).is_empty());
}

#[test]
fn move_pen_to_and_by_track_position() {
    let mut display = with_pen();
    assert_eq!(display.move_pen_to(pt(10.0, 20.0)), Ok(()));
    assert_eq!(display.move_pen_by(5.0, -5.0), Ok(()));
    assert_eq!(display.pen_position(), Ok(pt(15.0, 15.0)));
    assert_eq!(calls(&display), vec!["beginPath()", "moveTo(10, 20)", "moveTo(15, 15)"]);
}

#[test]
fn use_pen_draws_line_then_moves() {
    let mut display = with_pen();
    assert_eq!(display.use_pen_to(pt(3.0, 4.0)), Ok(()));
    assert_eq!(display.use_pen_by(1.0, 1.0), Ok(()));
    assert_eq!(display.pen_position(), Ok(pt(4.0, 5.0)));
    assert_eq!(
        calls(&display),
        vec!["beginPath()", "lineTo(3, 4)", "moveTo(3, 4)", "lineTo(4, 5)", "moveTo(4, 5)"]
    );
}

#[test]
fn invalid_coordinates_leave_pen_unchanged() {
    let mut display = with_pen();
    assert_eq!(display.move_pen_to(pt(2.0, 2.0)), Ok(()));
    assert!(display.use_pen_by(f64::NAN, 1.0).is_err());
    assert!(display.move_pen_to(pt(f64::INFINITY, 0.0)).is_err());
    assert_eq!(display.pen_position(), Ok(pt(2.0, 2.0)));
    assert_eq!(calls(&display), vec!["beginPath()", "moveTo(2, 2)"]);
}

#[test]
fn arc_forwards_radius_and_defaults() {
    let mut display = with_pen();
    assert_eq!(display.use_pen_arc(&ArcSpec::circle(pt(50.0, 50.0), 10.0)), Ok(()));
    assert_eq!(
        calls(&display)[1],
        format!("arc(50, 50, 10, 0, {FULL_TURN}, false)")
    );
    assert_eq!(display.pen_position(), Ok(pt(0.0, 0.0)));
}

#[test]
fn arc_requires_positive_radius() {
    let mut display = with_pen();
    let err = display.use_pen_arc(&ArcSpec::circle(pt(0.0, 0.0), 0.0)).unwrap_err();
    assert!(err.to_string().contains("r above 0"));
}

#[test]
fn arc_to_rejects_negative_radius() {
    let mut display = with_pen();
    assert!(display.use_pen_arc_to(pt(0.0, 0.0), pt(5.0, 5.0), -1.0).is_err());
    assert_eq!(display.use_pen_arc_to(pt(0.0, 0.0), pt(5.0, 5.0), 2.0), Ok(()));
    assert_eq!(calls(&display)[1], "arcTo(0, 0, 5, 5, 2)");
}

#[test]
fn bezier_moves_pen_to_end_point() {
    let mut display = with_pen();
    assert_eq!(display.use_pen_bezier(pt(1.0, 2.0), pt(3.0, 4.0), pt(5.0, 6.0)), Ok(()));
    assert_eq!(display.pen_position(), Ok(pt(5.0, 6.0)));
    assert_eq!(calls(&display)[1..], ["bezierCurveTo(1, 2, 3, 4, 5, 6)", "moveTo(5, 6)"]);
}

#[test]
fn rect_requires_positive_size() {
    let mut display = with_pen();
    assert!(display.use_pen_rect(&Rect::new(0.0, 0.0, 0.0, 5.0)).is_err());
    assert_eq!(display.use_pen_rect(&Rect::new(1.0, 2.0, 3.0, 4.0)), Ok(()));
    assert_eq!(calls(&display)[1], "rect(1, 2, 3, 4)");
}

#[test]
fn ellipse_requires_host_support() {
    let mut display = bound_with(RecordingSurface::new(10.0, 10.0).without(Feature::Ellipse));
    assert_eq!(display.begin_pen(), Ok(()));
    assert_eq!(
        display.use_pen_ellipse(&EllipseSpec::new(pt(0.0, 0.0), 1.0, 2.0)),
        Err(DisplayError::Unsupported(Feature::Ellipse))
    );
}

#[test]
fn ellipse_forwards_all_arguments() {
    let mut display = with_pen();
    let spec = EllipseSpec::new(pt(5.0, 5.0), 4.0, 2.0).rotation(0.5).angles(0.0, 1.0).anticlockwise(true);
    assert_eq!(display.use_pen_ellipse(&spec), Ok(()));
    assert_eq!(calls(&display)[1], "ellipse(5, 5, 4, 2, 0.5, 0, 1, true)");
}

#[test]
fn stop_pen_closes_path_and_resets() {
    let mut display = with_pen();
    assert_eq!(display.move_pen_to(pt(9.0, 9.0)), Ok(()));
    assert_eq!(display.stop_pen(), Ok(()));
    assert!(!display.pen_active());
    assert_eq!(calls(&display).last().map(String::as_str), Some("closePath()"));
    assert_eq!(display.begin_pen(), Ok(()));
    assert_eq!(display.pen_position(), Ok(pt(0.0, 0.0)));
}

#[test]
fn fill_and_stroke_work_with_or_without_pen() {
    let mut display = bound();
    assert_eq!(display.fill_path(None), Ok(()));
    assert_eq!(display.fill_path(Some(FillRule::EvenOdd)), Ok(()));
    assert_eq!(display.stroke_path(), Ok(()));
    assert_eq!(calls(&display), vec!["fill()", "fill(\"evenodd\")", "stroke()"]);
}

#[test]
fn stencil_clips_current_path() {
    let mut display = with_pen();
    assert_eq!(display.create_stencil(Some(FillRule::NonZero)), Ok(()));
    assert_eq!(display.create_stencil(None), Ok(()));
    assert_eq!(calls(&display)[1..], ["clip(\"nonzero\")", "clip()"]);
}

// =============================================================
// Clearing
// =============================================================

#[test]
fn clear_rect_forwards_when_pen_stopped() {
    let mut display = bound();
    assert_eq!(display.clear_rect(&Rect::new(1.0, 1.0, 10.0, 10.0)), Ok(()));
    assert_eq!(calls(&display), vec!["clearRect(1, 1, 10, 10)"]);
}

#[test]
fn clearing_requires_stopped_pen() {
    let mut display = with_pen();
    assert_eq!(display.clear_rect(&Rect::new(0.0, 0.0, 1.0, 1.0)), Err(DisplayError::PenActive("clearRect")));
    assert_eq!(display.clear_canvas(), Err(DisplayError::PenActive("clearCanvas")));
    assert_eq!(calls(&display), vec!["beginPath()"]);
}

#[test]
fn clear_rect_rejects_empty_area() {
    let mut display = bound();
    assert!(display.clear_rect(&Rect::new(0.0, 0.0, 10.0, 0.0)).is_err());
}

#[test]
fn clear_canvas_uses_current_size() {
    let mut display = bound();
    assert_eq!(display.fit_to(640.0, 480.0), Ok(()));
    assert_eq!(display.clear_canvas(), Ok(()));
    assert_eq!(calls(&display).last().map(String::as_str), Some("clearRect(0, 0, 640, 480)"));
}

// =============================================================
// Images & focus
// =============================================================

#[test]
fn draw_image_defaults_to_whole_image() {
    let mut display = bound();
    let image = TestImage { width: 32.0, height: 16.0 };
    assert_eq!(display.draw_image(&image, None), Ok(()));
    assert_eq!(calls(&display), vec!["drawImage(0, 0, 32, 16, 0, 0, 32, 16)"]);
}

#[test]
fn draw_image_with_explicit_blit() {
    let mut display = bound();
    let image = TestImage { width: 32.0, height: 16.0 };
    let blit = ImageBlit { sx: 4.0, dx: 10.0, d_width: 64.0, ..ImageBlit::full(16.0, 16.0) };
    assert_eq!(display.draw_image(&image, Some(blit)), Ok(()));
    assert_eq!(calls(&display), vec!["drawImage(4, 0, 16, 16, 10, 0, 64, 16)"]);
}

#[test]
fn draw_image_of_empty_image_is_rejected() {
    let mut display = bound();
    let image = TestImage { width: 0.0, height: 0.0 };
    assert!(display.draw_image(&image, None).is_err());
    assert!(calls(&display).is_empty());
}

#[test]
fn draw_focus_accepts_buttons_only() {
    let mut display = bound();
    assert_eq!(display.draw_focus(&TestElement::button()), Ok(()));
    assert_eq!(display.draw_focus(&TestElement::input("button")), Ok(()));
    assert!(display.draw_focus(&TestElement::input("text")).is_err());
    assert!(display.draw_focus(&TestElement { tag: "div", input_type: None }).is_err());
    assert_eq!(calls(&display), vec!["drawFocusIfNeeded(button)", "drawFocusIfNeeded(input)"]);
}

#[test]
fn interpolate_toggles_smoothing() {
    let mut display = bound();
    assert_eq!(display.set_interpolate(false), Ok(()));
    assert_eq!(calls(&display), vec!["imageSmoothingEnabled = false"]);
}

#[test]
fn interpolate_unsupported_host() {
    let mut display = bound_with(RecordingSurface::new(1.0, 1.0).without(Feature::ImageSmoothing));
    assert_eq!(display.set_interpolate(true), Err(DisplayError::Unsupported(Feature::ImageSmoothing)));
}

// =============================================================
// Filters
// =============================================================

#[test]
fn set_filters_joins_and_remembers() {
    let mut display = bound();
    let filters = vec!["blur(2px)".to_owned(), "grayscale(50%)".to_owned()];
    assert_eq!(display.set_filters(filters.clone()), Ok(()));
    assert_eq!(calls(&display), vec!["filter = blur(2px) grayscale(50%)"]);
    assert_eq!(display.filters(), Ok(filters.as_slice()));
}

#[test]
fn set_filters_rejects_blank_entry() {
    let mut display = bound();
    let err = display.set_filters(vec!["blur(1px)".to_owned(), "  ".to_owned()]).unwrap_err();
    assert!(err.to_string().contains("position 1"));
    assert_eq!(display.filters().map(<[String]>::len), Ok(0));
}

#[test]
fn filters_unsupported_host() {
    let mut display = bound_with(RecordingSurface::new(1.0, 1.0).without(Feature::Filter));
    assert_eq!(display.set_filters(Vec::new()), Err(DisplayError::Unsupported(Feature::Filter)));
    assert_eq!(display.filters(), Err(DisplayError::Unsupported(Feature::Filter)));
}

// =============================================================
// Text
// =============================================================

#[test]
fn text_settings_and_write() {
    let mut display = bound();
    assert_eq!(display.set_font("16px sans-serif"), Ok(()));
    assert_eq!(display.set_text_direction(TextDirection::Rtl), Ok(()));
    assert_eq!(display.write_text("hello", pt(5.0, 20.0)), Ok(()));
    assert_eq!(
        calls(&display),
        vec!["font = 16px sans-serif", "direction = rtl", "fillText(\"hello\", 5, 20)"]
    );
}

#[test]
fn blank_font_is_rejected() {
    let mut display = bound();
    assert!(display.set_font("").is_err());
    assert!(display.set_font("   ").is_err());
}

#[test]
fn text_direction_unsupported_host() {
    let mut display = bound_with(RecordingSurface::new(1.0, 1.0).without(Feature::TextDirection));
    assert_eq!(
        display.set_text_direction(TextDirection::Ltr),
        Err(DisplayError::Unsupported(Feature::TextDirection))
    );
}

#[test]
fn write_text_rejects_nan_position() {
    let mut display = bound();
    assert!(display.write_text("x", pt(f64::NAN, 0.0)).is_err());
    assert!(calls(&display).is_empty());
}

// =============================================================
// Loop state
// =============================================================

#[test]
fn drawing_method_can_be_set_before_bind() {
    let mut display: Display<RecordingSurface> = Display::new();
    display.set_drawing_method(Box::new(|_| Ok(())));
    assert!(display.has_drawing_method());
}

#[test]
fn begin_loop_requires_bind_and_single_start() {
    let mut unbound: Display<RecordingSurface> = Display::new();
    assert_eq!(unbound.begin_loop(), Err(DisplayError::NotInitialized));

    let mut display = bound();
    let first = display.begin_loop();
    assert_eq!(first, Ok(1));
    assert!(display.is_looping());
    assert_eq!(display.begin_loop(), Err(DisplayError::AlreadyLooping));
    display.stop_looping();
    assert_eq!(display.begin_loop(), Ok(2));
    assert!(!display.loop_current(1));
    assert!(display.loop_current(2));
}

#[test]
fn restore_draw_keeps_replacement() {
    let mut display = bound();
    display.set_drawing_method(Box::new(|_| Ok(())));
    let taken = display.take_draw();
    assert!(!display.has_drawing_method());
    display.set_drawing_method(Box::new(|_| Err(DisplayError::Host("replacement".into()))));
    display.restore_draw(taken);
    let outcome = display.take_draw().map(|mut draw| draw(0.0));
    assert_eq!(outcome, Some(Err(DisplayError::Host("replacement".into()))));
}
