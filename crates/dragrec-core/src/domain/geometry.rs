//! Screen-space geometry.
//!
//! All coordinates are integers.  Screen coordinates are the units the OS
//! pointer API takes (physical pixels on Windows and X11, points on macOS),
//! with the origin at the top-left corner of the primary display and Y
//! increasing downward.  Overlay-local coordinates are snapshot pixels;
//! [`ScreenArea`] converts between the two.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A pixel position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns this point shifted by `offset`.
    pub fn offset_by(self, offset: Point) -> Point {
        Point::new(self.x + offset.x, self.y + offset.y)
    }

    /// Linear interpolation between `self` and `to`.
    ///
    /// `t` is clamped to `[0.0, 1.0]`; the result is rounded to the nearest
    /// pixel so `t == 1.0` lands exactly on `to`.
    pub fn lerp(self, to: Point, t: f64) -> Point {
        let t = t.clamp(0.0, 1.0);
        let x = f64::from(self.x) + f64::from(to.x - self.x) * t;
        let y = f64::from(self.y) + f64::from(to.y - self.y) * t;
        Point::new(x.round() as i32, y.round() as i32)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// An axis-aligned rectangle in screen coordinates.
///
/// `width` and `height` are unsigned, so a `Rectangle` can never describe a
/// negative extent.  Use [`Rectangle::from_corners`] to build one from two
/// arbitrary drag points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rectangle {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rectangle {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Builds the normalized rectangle spanned by two corners.
    ///
    /// The corners may be given in any order: dragging from bottom-right to
    /// top-left produces the same rectangle as dragging top-left to
    /// bottom-right.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            width: a.x.abs_diff(b.x),
            height: a.y.abs_diff(b.y),
        }
    }

    /// `true` when the rectangle has no area.
    pub fn is_degenerate(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Top-left corner.
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

impl fmt::Display for Rectangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "x={}, y={}, width={}, height={}",
            self.x, self.y, self.width, self.height
        )
    }
}

/// A recorded press point and release point.
///
/// Stored flat (`start_x`, `start_y`, `end_x`, `end_y`) because that is the
/// shape of the `mouse_track` object in the settings file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Trajectory {
    pub start_x: i32,
    pub start_y: i32,
    pub end_x: i32,
    pub end_y: i32,
}

impl Trajectory {
    pub fn new(start: Point, end: Point) -> Self {
        Self {
            start_x: start.x,
            start_y: start.y,
            end_x: end.x,
            end_y: end.y,
        }
    }

    pub fn start(&self) -> Point {
        Point::new(self.start_x, self.start_y)
    }

    pub fn end(&self) -> Point {
        Point::new(self.end_x, self.end_y)
    }

    /// `true` for the all-zero default, i.e. nothing has been recorded.
    pub fn is_unset(&self) -> bool {
        *self == Trajectory::default()
    }

    /// Evenly spaced waypoints from start to end, excluding the start and
    /// including the end.
    ///
    /// `steps` is clamped to at least 1, so the sequence always ends on
    /// [`Trajectory::end`].  Points are produced lazily.
    pub fn waypoints(&self, steps: u32) -> impl Iterator<Item = Point> {
        let steps = steps.max(1);
        let (start, end) = (self.start(), self.end());
        (1..=steps).map(move |i| start.lerp(end, f64::from(i) / f64::from(steps)))
    }
}

impl fmt::Display for Trajectory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "from {} to {}", self.start(), self.end())
    }
}

/// The part of the desktop an overlay covers.
///
/// Overlay input arrives in overlay-local pixels of the snapshot.  Emitted
/// results are in screen coordinates, the space the pointer backends take:
/// `origin` plus the local offset divided by `pixels_per_unit`.  That factor
/// is 1 where the OS addresses the pointer in physical pixels and the display
/// scale factor where it uses logical points (macOS).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenArea {
    pub origin: Point,
    pub width: u32,
    pub height: u32,
    pub pixels_per_unit: f32,
}

impl ScreenArea {
    pub const fn new(origin: Point, width: u32, height: u32) -> Self {
        Self {
            origin,
            width,
            height,
            pixels_per_unit: 1.0,
        }
    }

    /// Sets how many snapshot pixels make up one screen-coordinate unit.
    /// Non-positive or non-finite values fall back to 1.
    pub fn with_pixels_per_unit(mut self, pixels_per_unit: f32) -> Self {
        self.pixels_per_unit = if pixels_per_unit.is_finite() && pixels_per_unit > 0.0 {
            pixels_per_unit
        } else {
            1.0
        };
        self
    }

    /// The full area in overlay-local coordinates.
    pub fn local_bounds(&self) -> Rectangle {
        Rectangle::new(0, 0, self.width, self.height)
    }

    /// Clamps an overlay-local point into the covered area.
    pub fn clamp(&self, p: Point) -> Point {
        let max_x = i32::try_from(self.width).unwrap_or(i32::MAX);
        let max_y = i32::try_from(self.height).unwrap_or(i32::MAX);
        Point::new(p.x.clamp(0, max_x), p.y.clamp(0, max_y))
    }

    /// Converts an overlay-local point to screen coordinates.
    pub fn to_screen(&self, local: Point) -> Point {
        let scale = f64::from(self.pixels_per_unit);
        let x = (f64::from(local.x) / scale).round() as i32;
        let y = (f64::from(local.y) / scale).round() as i32;
        Point::new(x, y).offset_by(self.origin)
    }

    /// Converts an overlay-local rectangle to screen coordinates by mapping
    /// both corners.
    pub fn rect_to_screen(&self, local: Rectangle) -> Rectangle {
        let far = Point::new(
            local.x.saturating_add_unsigned(local.width),
            local.y.saturating_add_unsigned(local.height),
        );
        Rectangle::from_corners(self.to_screen(local.origin()), self.to_screen(far))
    }
}
