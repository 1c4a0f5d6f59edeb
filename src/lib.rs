//! Validated 2D drawing display for the browser.
//!
//! This crate is compiled to WebAssembly and wraps a canvas and its 2D
//! context behind a checked API. Each operation validates its arguments,
//! then forwards one call to the context. A small pen cursor chains path
//! commands, and a per-display frame loop redraws through
//! `requestAnimationFrame`.
//!
//! The core ([`display`], [`frame_loop`]) is generic over [`surface::Surface`]
//! and [`frame_loop::Scheduler`], so it runs and is tested natively. Only
//! [`web`] and [`bridge`] touch the DOM.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`bridge`] | `RayDisplay` JS class, display registry, logging setup |
//! | [`display`] | Display handle: validation, pen, paint state, loop state |
//! | [`frame_loop`] | Re-arming frame loop over a [`frame_loop::Scheduler`] |
//! | [`surface`] | The drawing-context seam and optional [`surface::Feature`]s |
//! | [`web`] | `CanvasRenderingContext2d` surface, rAF scheduler, resize listener |
//! | [`pen`] | Pen cursor state |
//! | [`geometry`] | Points, rects, arcs, ellipses, image blits |
//! | [`paint`] | Hex colors, gradients, current colors |
//! | [`style`] | Named host enums (line caps, joins, composite modes, ...) |
//! | [`config`] | `DisplayOptions` parsing |
//! | [`error`] | [`error::DisplayError`] and shared argument checks |
//! | [`consts`] | Host property names and fixed values |

pub mod bridge;
pub mod config;
pub mod consts;
pub mod display;
pub mod error;
pub mod frame_loop;
pub mod geometry;
pub mod paint;
pub mod pen;
pub mod style;
pub mod surface;
pub mod web;

#[cfg(test)]
mod testing;

pub use bridge::RayDisplay;
pub use display::Display;
pub use error::DisplayError;
