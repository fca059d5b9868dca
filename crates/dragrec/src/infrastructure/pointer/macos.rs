//! macOS pointer injection via CoreGraphics events.
//!
//! # What is CoreGraphics event injection? (for beginners)
//!
//! `CGEventPost` injects a synthesized event into the HID event stream, the
//! same level as physical mouse input.  The sequence per action is:
//!
//! 1. `CGEventSource::new(HIDSystemState)` – a source that mimics hardware.
//! 2. `CGEvent::new_mouse_event(source, type, position, button)`.
//! 3. `event.post(CGEventTapLocation::HID)`.
//!
//! # Coordinates
//!
//! Mouse events use the global display space: origin at the top-left of the
//! main display, Y increasing downward, measured in points.  The overlays
//! divide Retina snapshot pixels by the display scale before emitting (the
//! macOS capturer tags snapshots with it), so recorded tracks are already in
//! points and no flip is needed.
//!
//! # Drags
//!
//! macOS only treats pointer motion as a drag when it arrives as
//! `LeftMouseDragged`.  While the primary button is held, moves are posted
//! with that type instead of `MouseMoved`.
//!
//! # Accessibility permission
//!
//! Posting events requires the **Accessibility** permission (System Settings
//! → Privacy & Security → Accessibility).  Without it the events are
//! silently dropped.

#![cfg(target_os = "macos")]

use std::sync::atomic::{AtomicBool, Ordering};

use core_graphics::event::{CGEvent, CGEventTapLocation, CGEventType, CGMouseButton};
use core_graphics::event_source::{CGEventSource, CGEventSourceStateID};
use core_graphics::geometry::CGPoint;
use dragrec_core::{Point, PointerButton};

use crate::application::replay::{PointerBackend, PointerError};

/// macOS CoreGraphics implementation of [`PointerBackend`].
pub struct MacosPointerBackend {
    primary_held: AtomicBool,
}

impl MacosPointerBackend {
    /// # Errors
    ///
    /// Returns [`PointerError::Unavailable`] if no HID event source can be
    /// created.
    pub fn new() -> Result<Self, PointerError> {
        source().map_err(|_| {
            PointerError::Unavailable("could not create a CoreGraphics event source".to_string())
        })?;
        Ok(Self {
            primary_held: AtomicBool::new(false),
        })
    }

    fn post(&self, kind: CGEventType, at: CGPoint, button: CGMouseButton) -> Result<(), PointerError> {
        let event = CGEvent::new_mouse_event(source()?, kind, at, button)
            .map_err(|_| PointerError::Platform(format!("could not create {kind:?} event")))?;
        event.post(CGEventTapLocation::HID);
        Ok(())
    }
}

fn source() -> Result<CGEventSource, PointerError> {
    CGEventSource::new(CGEventSourceStateID::HIDSystemState)
        .map_err(|_| PointerError::Platform("CGEventSourceCreate failed".to_string()))
}

fn current_location() -> Result<CGPoint, PointerError> {
    let event = CGEvent::new(source()?)
        .map_err(|_| PointerError::Platform("CGEventCreate failed".to_string()))?;
    Ok(event.location())
}

fn cg_button(button: PointerButton) -> CGMouseButton {
    match button {
        PointerButton::Primary => CGMouseButton::Left,
        PointerButton::Secondary => CGMouseButton::Right,
        PointerButton::Middle => CGMouseButton::Center,
    }
}

fn button_event(button: PointerButton, pressed: bool) -> CGEventType {
    match (button, pressed) {
        (PointerButton::Primary, true) => CGEventType::LeftMouseDown,
        (PointerButton::Primary, false) => CGEventType::LeftMouseUp,
        (PointerButton::Secondary, true) => CGEventType::RightMouseDown,
        (PointerButton::Secondary, false) => CGEventType::RightMouseUp,
        (PointerButton::Middle, true) => CGEventType::OtherMouseDown,
        (PointerButton::Middle, false) => CGEventType::OtherMouseUp,
    }
}

impl PointerBackend for MacosPointerBackend {
    fn position(&self) -> Result<Point, PointerError> {
        let at = current_location()?;
        Ok(Point::new(at.x.round() as i32, at.y.round() as i32))
    }

    fn move_to(&self, to: Point) -> Result<(), PointerError> {
        let kind = if self.primary_held.load(Ordering::SeqCst) {
            CGEventType::LeftMouseDragged
        } else {
            CGEventType::MouseMoved
        };
        let at = CGPoint::new(f64::from(to.x), f64::from(to.y));
        self.post(kind, at, CGMouseButton::Left)
    }

    fn button(&self, button: PointerButton, pressed: bool) -> Result<(), PointerError> {
        let at = current_location()?;
        self.post(button_event(button, pressed), at, cg_button(button))?;
        if button == PointerButton::Primary {
            self.primary_held.store(pressed, Ordering::SeqCst);
        }
        Ok(())
    }
}
