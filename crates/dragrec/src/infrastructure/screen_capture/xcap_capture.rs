//! Primary-display capture via the `xcap` crate.
//!
//! `xcap` returns the image in physical pixels everywhere.  The monitor
//! origin, like the pointer APIs, is in physical pixels on Windows and X11
//! but in points on macOS, so there the snapshot is tagged with
//! `scale_factor` pixels per screen unit.

use dragrec_core::Point;
use tracing::{debug, instrument};
use xcap::Monitor;

use crate::application::capture::{CaptureError, ScreenCapturer, Snapshot};

/// Captures the primary monitor with `xcap`.
#[derive(Debug, Default, Clone, Copy)]
pub struct XcapScreenCapturer;

impl XcapScreenCapturer {
    pub fn new() -> Self {
        Self
    }
}

fn backend<E: std::fmt::Display>(context: &'static str) -> impl FnOnce(E) -> CaptureError {
    move |e| CaptureError::Backend(format!("{context}: {e}"))
}

fn primary_monitor() -> Result<Monitor, CaptureError> {
    let monitors = Monitor::all().map_err(backend("failed to list monitors"))?;
    for monitor in monitors {
        // A monitor whose primary flag cannot be read is skipped, not fatal.
        if monitor.is_primary().unwrap_or(false) {
            return Ok(monitor);
        }
    }
    Err(CaptureError::NoPrimaryMonitor)
}

impl ScreenCapturer for XcapScreenCapturer {
    #[instrument(skip(self))]
    fn capture_primary(&self) -> Result<Snapshot, CaptureError> {
        let monitor = primary_monitor()?;
        let origin = Point::new(
            monitor.x().map_err(backend("failed to read monitor x"))?,
            monitor.y().map_err(backend("failed to read monitor y"))?,
        );
        let scale_factor = monitor.scale_factor().unwrap_or(1.0);
        let image = monitor
            .capture_image()
            .map_err(backend("failed to capture primary monitor"))?;

        debug!(
            width = image.width(),
            height = image.height(),
            x = origin.x,
            y = origin.y,
            scale_factor,
            "captured primary monitor"
        );
        Ok(Snapshot::new(image, origin, scale_factor)
            .with_pixels_per_unit(pixels_per_unit(scale_factor)))
    }
}

#[cfg(target_os = "macos")]
fn pixels_per_unit(scale_factor: f32) -> f32 {
    scale_factor
}

#[cfg(not(target_os = "macos"))]
fn pixels_per_unit(_scale_factor: f32) -> f32 {
    1.0
}
