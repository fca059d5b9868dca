//! Platform-specific pointer injection.
//!
//! Each platform implements [`PointerBackend`]; the correct one is selected
//! at compile time via `#[cfg(target_os = ...)]` and re-exported as
//! `NativePointerBackend`:
//!
//! | Module    | OS      | API used                                         |
//! |-----------|---------|--------------------------------------------------|
//! | `windows` | Windows | `SetCursorPos` / `GetCursorPos` + `SendInput`    |
//! | `linux`   | Linux   | XTest (`XTestFakeMotionEvent`, `...ButtonEvent`) |
//! | `macos`   | macOS   | CoreGraphics `CGEvent` mouse events              |
//!
//! A [`MockPointerBackend`](mock::MockPointerBackend) is always compiled (not
//! guarded by `#[cfg]`) so tests and `--dry-run` work on any platform.
//!
//! [`PointerBackend`]: crate::application::replay::PointerBackend

pub mod mock;

#[cfg(target_os = "windows")]
pub mod windows;

/// Re-export the Windows backend as `NativePointerBackend` on Windows.
#[cfg(target_os = "windows")]
pub use windows::WindowsPointerBackend as NativePointerBackend;

#[cfg(target_os = "linux")]
pub mod linux;

#[cfg(target_os = "linux")]
pub use linux::XTestPointerBackend as NativePointerBackend;

#[cfg(target_os = "macos")]
pub mod macos;

#[cfg(target_os = "macos")]
pub use macos::MacosPointerBackend as NativePointerBackend;

use std::sync::Arc;

use crate::application::replay::{PointerBackend, PointerError};

/// Opens the native backend for the current OS.
///
/// # Errors
///
/// Returns [`PointerError::Unavailable`] when the OS input API cannot be
/// reached (no X display, no accessibility permission) or the platform is
/// not supported.
pub fn open_native() -> Result<Arc<dyn PointerBackend>, PointerError> {
    #[cfg(any(target_os = "windows", target_os = "linux", target_os = "macos"))]
    {
        Ok(Arc::new(NativePointerBackend::new()?))
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        Err(PointerError::Unavailable(
            "pointer injection is not supported on this platform".to_string(),
        ))
    }
}
