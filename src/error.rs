//! Error type shared by every display operation.

use wasm_bindgen::JsValue;

use crate::surface::Feature;

/// Error returned by display, loop, and bridge operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DisplayError {
    /// `bind` / `init` was called on a display that already owns a surface.
    #[error("display already initialized")]
    AlreadyInitialized,
    /// A drawing operation was called before a surface was bound.
    #[error("display not initialized")]
    NotInitialized,
    /// `begin_pen` was called while a pen movement is active.
    #[error("a pen movement is already active")]
    PenAlreadyActive,
    /// A pen operation was called with no active pen movement.
    #[error("{0}() requires an active pen movement")]
    PenInactive(&'static str),
    /// A clearing operation was called while a pen movement is active.
    #[error("the pen movement must be stopped before {0}()")]
    PenActive(&'static str),
    /// An argument failed a range or shape check.
    #[error("{op}() {reason}")]
    InvalidArgument { op: &'static str, reason: String },
    /// A string did not name any variant of a host enumeration.
    #[error("unknown {kind} `{value}`, expected one of: {expected}")]
    UnknownVariant {
        kind: &'static str,
        value: String,
        expected: String,
    },
    /// The host context lacks an optional feature.
    #[error("host drawing context does not support {0}")]
    Unsupported(Feature),
    /// `start_looping` was called while the loop is running.
    #[error("display already looping")]
    AlreadyLooping,
    /// The element selected for binding is not a canvas.
    #[error("element `{0}` is not a canvas element")]
    NotACanvas(String),
    /// Options could not be parsed or are inconsistent.
    #[error("invalid display options: {0}")]
    Config(String),
    /// The host API rejected a call.
    #[error("host error: {0}")]
    Host(String),
}

impl DisplayError {
    pub(crate) fn invalid(op: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument { op, reason: reason.into() }
    }

    /// Map a thrown JS value into a host error, keeping its message when it has one.
    #[must_use]
    pub fn from_js(value: &JsValue) -> Self {
        let message = value
            .as_string()
            .or_else(|| {
                js_sys::Reflect::get(value, &JsValue::from_str("message"))
                    .map(|m| m.as_string())
                    .unwrap_or_default()
            })
            .unwrap_or_else(|| format!("{value:?}"));
        Self::Host(message)
    }
}

impl From<JsValue> for DisplayError {
    fn from(value: JsValue) -> Self {
        Self::from_js(&value)
    }
}

impl From<serde_json::Error> for DisplayError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<DisplayError> for JsValue {
    fn from(err: DisplayError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}

/// Reject non-finite numbers for operation `op`.
pub(crate) fn ensure_finite(op: &'static str, values: &[(&str, f64)]) -> Result<(), DisplayError> {
    match values.iter().find(|(_, v)| !v.is_finite()) {
        Some((name, v)) => Err(DisplayError::invalid(op, format!("needs a finite number for {name}, got {v}"))),
        None => Ok(()),
    }
}

/// Reject values that are not strictly positive.
pub(crate) fn ensure_positive(op: &'static str, values: &[(&str, f64)]) -> Result<(), DisplayError> {
    ensure_finite(op, values)?;
    match values.iter().find(|(_, v)| *v <= 0.0) {
        Some((name, v)) => Err(DisplayError::invalid(op, format!("needs {name} above 0, got {v}"))),
        None => Ok(()),
    }
}

/// Reject negative values.
pub(crate) fn ensure_non_negative(op: &'static str, values: &[(&str, f64)]) -> Result<(), DisplayError> {
    ensure_finite(op, values)?;
    match values.iter().find(|(_, v)| *v < 0.0) {
        Some((name, v)) => Err(DisplayError::invalid(op, format!("needs {name} of at least 0, got {v}"))),
        None => Ok(()),
    }
}
