//! Display options accepted by `RayDisplay.initWithOptions`.
//!
//! Options arrive as a plain JS object, are round-tripped through JSON, and
//! deserialize with defaults for every field:
//!
//! - `fullscreen`: `true`. Create a viewport-sized canvas on `<body>`.
//! - `canvasId`: required when `fullscreen` is `false`.
//! - `autoResize`: `false`. Refit to the window on every resize.
//! - `imageSmoothing`: unset leaves the host default.
//! - `logLevel`: `"info"`. Any `log::Level` name, case-insensitive.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::Deserialize;

use crate::error::DisplayError;

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Where the display's canvas comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CanvasTarget {
    Fullscreen,
    Element(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct DisplayOptions {
    pub fullscreen: bool,
    pub canvas_id: Option<String>,
    pub auto_resize: bool,
    pub image_smoothing: Option<bool>,
    pub log_level: String,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            fullscreen: true,
            canvas_id: None,
            auto_resize: false,
            image_smoothing: None,
            log_level: DEFAULT_LOG_LEVEL.to_owned(),
        }
    }
}

impl DisplayOptions {
    /// Parse and validate options from a JSON document.
    pub fn from_json(raw: &str) -> Result<Self, DisplayError> {
        let options: Self = serde_json::from_str(raw)?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<(), DisplayError> {
        self.target()?;
        self.log_level()?;
        Ok(())
    }

    /// The canvas these options select.
    pub fn target(&self) -> Result<CanvasTarget, DisplayError> {
        if self.fullscreen {
            return Ok(CanvasTarget::Fullscreen);
        }
        match self.canvas_id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => Ok(CanvasTarget::Element(id.to_owned())),
            _ => Err(DisplayError::Config("canvasId is required when fullscreen is false".to_owned())),
        }
    }

    pub fn log_level(&self) -> Result<log::Level, DisplayError> {
        parse_log_level(&self.log_level)
    }
}

/// Parse a `log` level name (`error`, `warn`, `info`, `debug`, `trace`).
pub fn parse_log_level(raw: &str) -> Result<log::Level, DisplayError> {
    raw.trim()
        .parse::<log::Level>()
        .map_err(|_| DisplayError::Config(format!("unknown log level `{raw}`")))
}
