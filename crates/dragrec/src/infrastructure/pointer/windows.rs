//! Windows pointer injection via `SetCursorPos` and `SendInput`.
//!
//! Moves use `SetCursorPos`, which takes virtual-screen pixels directly and
//! so works on secondary monitors with negative coordinates.  Button events
//! go through `SendInput` at the current cursor position.
//!
//! The process must be DPI aware for pixel coordinates to match what the
//! screen capture reports; eframe declares per-monitor DPI awareness.

#![cfg(target_os = "windows")]

use dragrec_core::{Point, PointerButton};
use windows::Win32::Foundation::POINT;
use windows::Win32::UI::Input::KeyboardAndMouse::{
    SendInput, INPUT, INPUT_0, INPUT_MOUSE, MOUSEEVENTF_LEFTDOWN, MOUSEEVENTF_LEFTUP,
    MOUSEEVENTF_MIDDLEDOWN, MOUSEEVENTF_MIDDLEUP, MOUSEEVENTF_RIGHTDOWN, MOUSEEVENTF_RIGHTUP,
    MOUSEINPUT, MOUSE_EVENT_FLAGS,
};
use windows::Win32::UI::WindowsAndMessaging::{GetCursorPos, SetCursorPos};

use crate::application::replay::{PointerBackend, PointerError};

/// Windows implementation of [`PointerBackend`].
pub struct WindowsPointerBackend;

impl WindowsPointerBackend {
    /// Always succeeds; the signature matches the other platforms.
    pub fn new() -> Result<Self, PointerError> {
        Ok(Self)
    }
}

impl PointerBackend for WindowsPointerBackend {
    fn position(&self) -> Result<Point, PointerError> {
        let mut p = POINT::default();
        // SAFETY: `p` is a valid, writable POINT on the stack.
        unsafe { GetCursorPos(&mut p) }
            .map_err(|e| PointerError::Platform(format!("GetCursorPos failed: {e}")))?;
        Ok(Point::new(p.x, p.y))
    }

    fn move_to(&self, to: Point) -> Result<(), PointerError> {
        // SAFETY: SetCursorPos has no pointer arguments.
        unsafe { SetCursorPos(to.x, to.y) }
            .map_err(|e| PointerError::Platform(format!("SetCursorPos failed: {e}")))
    }

    fn button(&self, button: PointerButton, pressed: bool) -> Result<(), PointerError> {
        send_mouse(button_flags(button, pressed))
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn button_flags(button: PointerButton, pressed: bool) -> MOUSE_EVENT_FLAGS {
    match (button, pressed) {
        (PointerButton::Primary, true) => MOUSEEVENTF_LEFTDOWN,
        (PointerButton::Primary, false) => MOUSEEVENTF_LEFTUP,
        (PointerButton::Secondary, true) => MOUSEEVENTF_RIGHTDOWN,
        (PointerButton::Secondary, false) => MOUSEEVENTF_RIGHTUP,
        (PointerButton::Middle, true) => MOUSEEVENTF_MIDDLEDOWN,
        (PointerButton::Middle, false) => MOUSEEVENTF_MIDDLEUP,
    }
}

fn send_mouse(flags: MOUSE_EVENT_FLAGS) -> Result<(), PointerError> {
    let input = INPUT {
        r#type: INPUT_MOUSE,
        Anonymous: INPUT_0 {
            mi: MOUSEINPUT {
                dx: 0,
                dy: 0,
                mouseData: 0,
                dwFlags: flags,
                time: 0,
                dwExtraInfo: 0,
            },
        },
    };
    // SAFETY: input is a valid INPUT structure on the stack
    let sent = unsafe { SendInput(&[input], std::mem::size_of::<INPUT>() as i32) };
    if sent == 1 {
        Ok(())
    } else {
        // Blocked by UIPI when the foreground window runs elevated.
        Err(PointerError::Platform(
            "SendInput injected no events (blocked by a higher-integrity window?)".to_string(),
        ))
    }
}
