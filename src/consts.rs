//! Shared constants for the display crate.

// ── Math ────────────────────────────────────────────────────────

/// 2π, the default end angle for arcs and ellipses.
pub const FULL_TURN: f64 = std::f64::consts::TAU;

// ── Fullscreen canvas ───────────────────────────────────────────

/// Inline CSS applied to a canvas created by a fullscreen init.
pub const FULLSCREEN_STYLE: [(&str, &str); 5] = [
    ("position", "absolute"),
    ("top", "0px"),
    ("left", "0px"),
    ("width", "100vw"),
    ("height", "100vh"),
];

/// Window event that refits an auto-resizing display.
pub const RESIZE_EVENT: &str = "resize";

// ── Host feature probes ─────────────────────────────────────────

/// Context property names probed for optional host features.
pub const PROBE_ELLIPSE: &str = "ellipse";
pub const PROBE_FILTER: &str = "filter";
pub const PROBE_DIRECTION: &str = "direction";
pub const PROBE_IMAGE_SMOOTHING: &[&str] = &[
    "imageSmoothingEnabled",
    "mozImageSmoothingEnabled",
    "webkitImageSmoothingEnabled",
    "msImageSmoothingEnabled",
];
