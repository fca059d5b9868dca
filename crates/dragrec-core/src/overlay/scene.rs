//! Toolkit-neutral paint description.
//!
//! An overlay does not paint; it returns a [`Scene`] listing the shapes to
//! draw, back to front, in overlay-local pixels.  The UI layer maps each
//! [`Shape`] to its toolkit's painter calls.  Keeping the scene as data lets
//! tests assert things like "the selection interior is drawn from the
//! unmasked snapshot" without a window.

use crate::domain::geometry::{Point, Rectangle};

/// Straight (non-premultiplied) RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);
}

/// One drawing primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Copy the `source` region of the frozen snapshot into `dest`.
    Snapshot { source: Rectangle, dest: Rectangle },
    /// Solid (possibly translucent) fill.
    Fill { rect: Rectangle, color: Rgba },
    /// Rectangle border drawn inside `rect`.
    Outline {
        rect: Rectangle,
        color: Rgba,
        width: f32,
    },
    Line {
        from: Point,
        to: Point,
        color: Rgba,
        width: f32,
    },
    /// Filled circle.
    Marker {
        center: Point,
        radius: f32,
        color: Rgba,
    },
    /// Text whose baseline-left corner sits at `anchor`.
    Label {
        anchor: Point,
        text: String,
        color: Rgba,
    },
}

/// Shapes in paint order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    pub shapes: Vec<Shape>,
}

impl Scene {
    pub fn push(&mut self, shape: Shape) {
        self.shapes.push(shape);
    }

    /// Frozen snapshot covering `bounds` with a translucent black mask on top.
    pub(crate) fn masked_backdrop(bounds: Rectangle, mask_alpha: u8) -> Self {
        Self {
            shapes: vec![
                Shape::Snapshot {
                    source: bounds,
                    dest: bounds,
                },
                Shape::Fill {
                    rect: bounds,
                    color: Rgba::rgba(0, 0, 0, mask_alpha),
                },
            ],
        }
    }
}
