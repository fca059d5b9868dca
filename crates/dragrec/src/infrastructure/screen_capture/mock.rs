//! In-memory [`ScreenCapturer`] for tests and `--dry-run`.

use std::sync::atomic::{AtomicUsize, Ordering};

use dragrec_core::Point;
use image::{Rgba, RgbaImage};

use crate::application::capture::{CaptureError, ScreenCapturer, Snapshot};

/// Mid-grey, so overlay masks and outlines stay visible in a dry run.
const FILL: Rgba<u8> = Rgba([96, 96, 96, 255]);

/// Returns a solid image of a fixed size, or a fixed error.
pub struct MockScreenCapturer {
    width: u32,
    height: u32,
    origin: Point,
    pixels_per_unit: f32,
    fail: bool,
    captures: AtomicUsize,
}

impl MockScreenCapturer {
    /// A `width × height` display at the desktop origin with scale 1.0.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            origin: Point::new(0, 0),
            pixels_per_unit: 1.0,
            fail: false,
            captures: AtomicUsize::new(0),
        }
    }

    /// Same as [`new`](Self::new) but placed at `origin` on the desktop.
    pub fn at(origin: Point, width: u32, height: u32) -> Self {
        Self {
            origin,
            ..Self::new(width, height)
        }
    }

    /// Simulates a display addressed in points with `pixels_per_unit` image
    /// pixels per point, like a Retina screen on macOS.
    pub fn with_pixels_per_unit(mut self, pixels_per_unit: f32) -> Self {
        self.pixels_per_unit = pixels_per_unit;
        self
    }

    /// A capturer whose every call fails with [`CaptureError::Backend`].
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new(0, 0)
        }
    }

    /// How many times `capture_primary` was called.
    pub fn captures(&self) -> usize {
        self.captures.load(Ordering::SeqCst)
    }
}

impl ScreenCapturer for MockScreenCapturer {
    fn capture_primary(&self) -> Result<Snapshot, CaptureError> {
        self.captures.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(CaptureError::Backend("mock capture failure".into()));
        }
        let image = RgbaImage::from_pixel(self.width, self.height, FILL);
        Ok(Snapshot::new(image, self.origin, self.pixels_per_unit)
            .with_pixels_per_unit(self.pixels_per_unit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_returns_snapshot_of_requested_size() {
        let capturer = MockScreenCapturer::new(800, 600);

        let snapshot = capturer.capture_primary().unwrap();

        assert_eq!((snapshot.width(), snapshot.height()), (800, 600));
        assert_eq!(snapshot.origin, Point::new(0, 0));
        assert_eq!(capturer.captures(), 1);
    }

    #[test]
    fn test_at_offsets_the_area() {
        let capturer = MockScreenCapturer::at(Point::new(1920, 0), 1280, 1024);

        let area = capturer.capture_primary().unwrap().area();

        assert_eq!(area.origin, Point::new(1920, 0));
    }

    #[test]
    fn test_failing_reports_backend_error() {
        let capturer = MockScreenCapturer::failing();

        let err = capturer.capture_primary().unwrap_err();

        assert!(matches!(err, CaptureError::Backend(_)));
        assert_eq!(capturer.captures(), 1);
    }
}
