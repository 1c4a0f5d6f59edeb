//! Per-display animation loop driven by the host's frame scheduler.
//!
//! Each running loop keeps exactly one frame request outstanding. When the
//! frame fires, the display's drawing method runs with the frame timestamp
//! and, if the loop is still running, the next frame is requested.
//!
//! Frames carry the loop epoch they were scheduled under. Stopping and
//! restarting bumps the epoch, so a frame requested before the stop becomes
//! a no-op instead of starting a second chain.

#[cfg(test)]
#[path = "frame_loop_test.rs"]
mod frame_loop_test;

use std::cell::RefCell;
use std::rc::Rc;

use crate::display::Display;
use crate::error::DisplayError;
use crate::surface::Surface;

/// One-shot callback invoked with the host frame timestamp (ms).
pub type FrameCallback = Box<dyn FnOnce(f64)>;

/// The host's per-frame callback registration (`requestAnimationFrame` in a browser).
pub trait Scheduler {
    fn request_frame(&self, callback: FrameCallback) -> Result<(), DisplayError>;
}

/// Drives the drawing method of one shared display.
pub struct FrameLoop<S: Surface + 'static> {
    display: Rc<RefCell<Display<S>>>,
    scheduler: Rc<dyn Scheduler>,
}

impl<S: Surface + 'static> Clone for FrameLoop<S> {
    fn clone(&self) -> Self {
        Self {
            display: Rc::clone(&self.display),
            scheduler: Rc::clone(&self.scheduler),
        }
    }
}

impl<S: Surface + 'static> FrameLoop<S> {
    #[must_use]
    pub fn new(display: Rc<RefCell<Display<S>>>, scheduler: Rc<dyn Scheduler>) -> Self {
        Self { display, scheduler }
    }

    #[must_use]
    pub fn display(&self) -> &Rc<RefCell<Display<S>>> {
        &self.display
    }

    /// Start looping. Fails if the display is unbound or already looping.
    pub fn start(&self) -> Result<(), DisplayError> {
        let epoch = self.display.borrow_mut().begin_loop()?;
        if let Err(err) = self.arm(epoch) {
            self.display.borrow_mut().stop_looping();
            return Err(err);
        }
        log::debug!("frame loop started (epoch {epoch})");
        Ok(())
    }

    pub fn stop(&self) {
        self.display.borrow_mut().stop_looping();
    }

    fn arm(&self, epoch: u64) -> Result<(), DisplayError> {
        let this = self.clone();
        self.scheduler.request_frame(Box::new(move |timestamp| {
            if let Err(err) = this.tick(epoch, timestamp) {
                log::error!("frame loop stopped: {err}");
            }
        }))
    }

    /// Run one frame scheduled under `epoch`.
    ///
    /// The display is not borrowed while the drawing method runs, so the
    /// method may call back into the display (including replacing itself or
    /// stopping the loop).
    fn tick(&self, epoch: u64, timestamp: f64) -> Result<(), DisplayError> {
        let mut draw = {
            let mut display = self.display.borrow_mut();
            if !display.loop_current(epoch) {
                return Ok(());
            }
            display.take_draw()
        };

        let outcome = match draw.as_mut() {
            Some(draw) => draw(timestamp),
            None => Ok(()),
        };

        let rearm = {
            let mut display = self.display.borrow_mut();
            display.restore_draw(draw);
            if outcome.is_err() {
                display.stop_looping();
            }
            display.loop_current(epoch)
        };
        outcome?;

        if rearm && let Err(err) = self.arm(epoch) {
            self.display.borrow_mut().stop_looping();
            return Err(err);
        }
        Ok(())
    }
}
