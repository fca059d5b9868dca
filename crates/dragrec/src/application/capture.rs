//! Screen snapshots for the overlays.
//!
//! Each overlay activation takes exactly one [`Snapshot`] of the primary
//! display.  The overlay shows it as a frozen background, and the selection
//! preview is cut from the same pixels.

use std::sync::Arc;

use dragrec_core::{Point, ScreenArea};
use image::RgbaImage;
use thiserror::Error;

/// Error type for screen capture operations.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("no primary monitor found")]
    NoPrimaryMonitor,

    /// The capture library or OS API failed.  The string is its message.
    #[error("screen capture failed: {0}")]
    Backend(String),
}

/// A frozen image of one display plus where that display sits on the desktop.
#[derive(Clone)]
pub struct Snapshot {
    /// Physical pixels, row-major RGBA.
    pub image: Arc<RgbaImage>,
    /// Screen coordinates of the image's top-left pixel.
    pub origin: Point,
    /// Physical pixels per logical point for this display.
    pub scale_factor: f32,
    /// Image pixels per screen-coordinate unit: 1 when the OS addresses the
    /// pointer in physical pixels, `scale_factor` when it uses points.
    pub pixels_per_unit: f32,
}

impl Snapshot {
    pub fn new(image: RgbaImage, origin: Point, scale_factor: f32) -> Self {
        Self {
            image: Arc::new(image),
            origin,
            scale_factor,
            pixels_per_unit: 1.0,
        }
    }

    pub fn with_pixels_per_unit(mut self, pixels_per_unit: f32) -> Self {
        self.pixels_per_unit = pixels_per_unit;
        self
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// The desktop area the snapshot covers, for the overlay state machines.
    pub fn area(&self) -> ScreenArea {
        ScreenArea::new(self.origin, self.width(), self.height())
            .with_pixels_per_unit(self.pixels_per_unit)
    }

    /// Physical pixels per egui point when placing a viewport at
    /// [`Snapshot::origin`].  Origins already given in points map 1:1.
    pub fn origin_scale(&self) -> f32 {
        let ratio = self.scale_factor / self.area().pixels_per_unit;
        if ratio.is_finite() && ratio > 0.0 {
            ratio
        } else {
            1.0
        }
    }
}

impl std::fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Snapshot")
            .field("size", &(self.width(), self.height()))
            .field("origin", &self.origin)
            .field("scale_factor", &self.scale_factor)
            .field("pixels_per_unit", &self.pixels_per_unit)
            .finish()
    }
}

/// Captures the primary display.
///
/// Implementations live in `infrastructure::screen_capture`.
pub trait ScreenCapturer: Send + Sync {
    /// # Errors
    ///
    /// Returns [`CaptureError`] when no primary display exists or the OS
    /// refuses the capture (e.g. missing screen-recording permission).
    fn capture_primary(&self) -> Result<Snapshot, CaptureError>;
}
