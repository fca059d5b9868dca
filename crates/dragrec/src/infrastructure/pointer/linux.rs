//! Linux X11 pointer injection via the XTest extension.
//!
//! # What is XTest? (for beginners)
//!
//! XTest is an X11 protocol extension that lets a process synthesize mouse
//! and keyboard events as if the user had physically used the hardware.
//! The receiving application cannot tell them apart from real input.
//!
//! The functions used here:
//! - `XTestFakeMotionEvent(display, screen, x, y, time)` – move the cursor to
//!   absolute pixel coordinates.
//! - `XTestFakeButtonEvent(display, button, is_press, time)` – press or
//!   release a mouse button.
//! - `XQueryPointer` – read the current cursor position.
//!
//! Every request is followed by `XFlush` so it reaches the server before the
//! replay thread sleeps.
//!
//! # Permissions
//!
//! The process needs access to the X display named by `DISPLAY`.  Under
//! Wayland this works only for XWayland windows.

#![cfg(target_os = "linux")]

use std::os::raw::{c_int, c_uint};
use std::ptr;
use std::sync::{Mutex, PoisonError};

use dragrec_core::{Point, PointerButton};
use tracing::debug;
use x11::{xlib, xtest};

use crate::application::replay::{PointerBackend, PointerError};

// ── X11 constants ─────────────────────────────────────────────────────────────

/// `CurrentTime`: let the server stamp synthesized events.
const CURRENT_TIME: xlib::Time = 0;

/// `-1` targets the screen that currently contains the pointer.
const SCREEN_DEFAULT: c_int = -1;

/// An open display connection.
struct XDisplay(*mut xlib::Display);

// SAFETY: the pointer is only dereferenced by Xlib while the owning Mutex is
// held, so at most one thread uses the connection at a time.
unsafe impl Send for XDisplay {}

/// Linux X11/XTest implementation of [`PointerBackend`].
pub struct XTestPointerBackend {
    display: Mutex<XDisplay>,
}

impl XTestPointerBackend {
    /// Connects to the display named by `DISPLAY`.
    ///
    /// # Errors
    ///
    /// Returns [`PointerError::Unavailable`] if the display cannot be opened
    /// or the server lacks the XTest extension.
    pub fn new() -> Result<Self, PointerError> {
        // SAFETY: a null name means "use $DISPLAY"; a null return is handled.
        let display = unsafe { xlib::XOpenDisplay(ptr::null()) };
        if display.is_null() {
            let name = std::env::var("DISPLAY").unwrap_or_else(|_| "<unset>".to_string());
            return Err(PointerError::Unavailable(format!(
                "XOpenDisplay failed; DISPLAY={name}"
            )));
        }

        let (mut event_base, mut error_base, mut major, mut minor) = (0, 0, 0, 0);
        // SAFETY: `display` is a live connection and the out-params are valid.
        let has_xtest = unsafe {
            xtest::XTestQueryExtension(
                display,
                &mut event_base,
                &mut error_base,
                &mut major,
                &mut minor,
            )
        };
        if has_xtest == 0 {
            // SAFETY: `display` came from XOpenDisplay and is not used again.
            unsafe { xlib::XCloseDisplay(display) };
            return Err(PointerError::Unavailable(
                "X server does not support the XTest extension".to_string(),
            ));
        }

        debug!(major, minor, "XTest available");
        Ok(Self {
            display: Mutex::new(XDisplay(display)),
        })
    }

    fn with_display<T>(&self, f: impl FnOnce(*mut xlib::Display) -> T) -> T {
        let guard = self.display.lock().unwrap_or_else(PoisonError::into_inner);
        f(guard.0)
    }
}

impl Drop for XTestPointerBackend {
    fn drop(&mut self) {
        let display = self
            .display
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        // SAFETY: the connection is ours and nothing else holds it.
        unsafe { xlib::XCloseDisplay(display.0) };
    }
}

impl PointerBackend for XTestPointerBackend {
    fn position(&self) -> Result<Point, PointerError> {
        self.with_display(|display| {
            let (mut root, mut child) = (0, 0);
            let (mut root_x, mut root_y, mut win_x, mut win_y) = (0, 0, 0, 0);
            let mut mask: c_uint = 0;
            // SAFETY: `display` is live and every out-param is a valid local.
            let on_screen = unsafe {
                let window = xlib::XDefaultRootWindow(display);
                xlib::XQueryPointer(
                    display,
                    window,
                    &mut root,
                    &mut child,
                    &mut root_x,
                    &mut root_y,
                    &mut win_x,
                    &mut win_y,
                    &mut mask,
                )
            };
            if on_screen == 0 {
                return Err(PointerError::Platform(
                    "pointer is not on the default screen".to_string(),
                ));
            }
            Ok(Point::new(root_x, root_y))
        })
    }

    fn move_to(&self, to: Point) -> Result<(), PointerError> {
        self.with_display(|display| {
            // SAFETY: `display` is live for the duration of the call.
            let ok = unsafe {
                let ok = xtest::XTestFakeMotionEvent(display, SCREEN_DEFAULT, to.x, to.y, CURRENT_TIME);
                xlib::XFlush(display);
                ok
            };
            check(ok, "XTestFakeMotionEvent")
        })
    }

    fn button(&self, button: PointerButton, pressed: bool) -> Result<(), PointerError> {
        let xbutton = x11_button(button);
        self.with_display(|display| {
            // SAFETY: `display` is live for the duration of the call.
            let ok = unsafe {
                let ok = xtest::XTestFakeButtonEvent(
                    display,
                    xbutton,
                    c_int::from(pressed),
                    CURRENT_TIME,
                );
                xlib::XFlush(display);
                ok
            };
            check(ok, "XTestFakeButtonEvent")
        })
    }
}

/// X11 button numbering: 1 = left, 2 = middle, 3 = right.
fn x11_button(button: PointerButton) -> c_uint {
    match button {
        PointerButton::Primary => 1,
        PointerButton::Middle => 2,
        PointerButton::Secondary => 3,
    }
}

fn check(status: c_int, call: &str) -> Result<(), PointerError> {
    if status == 0 {
        Err(PointerError::Platform(format!("{call} was rejected")))
    } else {
        Ok(())
    }
}
