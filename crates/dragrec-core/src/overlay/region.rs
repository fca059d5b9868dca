//! Region capture: drag out a rectangle over the frozen screenshot.
//!
//! | Input                          | Effect                                           |
//! |--------------------------------|--------------------------------------------------|
//! | primary press                  | start a drag at the press point                  |
//! | move while dragging            | update the live selection                        |
//! | primary release, non-empty     | emit the rectangle, then close (`Completed`)     |
//! | primary release, empty         | discard the drag, stay open                      |
//! | secondary press / Escape       | close (`Cancelled`) without a result             |
//!
//! Emitted rectangles are in screen coordinates: the overlay-local selection
//! mapped through [`ScreenArea::rect_to_screen`].

use tracing::info;

use super::scene::{Rgba, Scene, Shape};
use super::{CloseReason, Overlay, OverlayInput, OverlaySignals, OverlayStatus, PointerButton};
use crate::domain::geometry::{Point, Rectangle, ScreenArea};

/// Alpha of the black mask over the frozen screenshot.
pub const MASK_ALPHA: u8 = 150;
/// Selection border color.
pub const BORDER_COLOR: Rgba = Rgba::rgb(0, 174, 255);
/// Selection border width in pixels.
pub const BORDER_WIDTH: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Dragging { origin: Point, selection: Rectangle },
    Finished,
}

/// The region capture overlay.
pub struct RegionSelector {
    area: ScreenArea,
    phase: Phase,
    signals: OverlaySignals<Rectangle>,
}

impl RegionSelector {
    pub fn new(area: ScreenArea) -> Self {
        Self {
            area,
            phase: Phase::Idle,
            signals: OverlaySignals::new(),
        }
    }

    /// The live selection in overlay-local pixels, if a drag is in progress.
    pub fn selection(&self) -> Option<Rectangle> {
        match self.phase {
            Phase::Dragging { selection, .. } => Some(selection),
            _ => None,
        }
    }

    pub fn area(&self) -> ScreenArea {
        self.area
    }

    fn cancel(&mut self) -> OverlayStatus {
        info!("region selection cancelled");
        self.phase = Phase::Finished;
        self.signals.close(CloseReason::Cancelled);
        OverlayStatus::Finished
    }

    fn release(&mut self, at: Point) -> OverlayStatus {
        let Phase::Dragging { origin, .. } = self.phase else {
            return OverlayStatus::Active;
        };
        let selection = Rectangle::from_corners(origin, self.area.clamp(at));
        if selection.is_degenerate() {
            self.phase = Phase::Idle;
            return OverlayStatus::Active;
        }

        let on_screen = self.area.rect_to_screen(selection);
        info!(%on_screen, "region selected");
        self.phase = Phase::Finished;
        self.signals.complete(&on_screen);
        OverlayStatus::Finished
    }
}

impl Overlay for RegionSelector {
    type Output = Rectangle;

    fn handle_input(&mut self, input: OverlayInput) -> OverlayStatus {
        if self.phase == Phase::Finished {
            return OverlayStatus::Finished;
        }

        match input {
            OverlayInput::Pressed {
                button: PointerButton::Primary,
                at,
            } => {
                let origin = self.area.clamp(at);
                self.phase = Phase::Dragging {
                    origin,
                    selection: Rectangle::from_corners(origin, origin),
                };
                OverlayStatus::Active
            }
            OverlayInput::Pressed {
                button: PointerButton::Secondary,
                ..
            }
            | OverlayInput::Escape => self.cancel(),
            OverlayInput::Moved { to } => {
                if let Phase::Dragging { origin, .. } = self.phase {
                    self.phase = Phase::Dragging {
                        origin,
                        selection: Rectangle::from_corners(origin, self.area.clamp(to)),
                    };
                }
                OverlayStatus::Active
            }
            OverlayInput::Released {
                button: PointerButton::Primary,
                at,
            } => self.release(at),
            _ => OverlayStatus::Active,
        }
    }

    fn request_close(&mut self) {
        self.phase = Phase::Finished;
        self.signals.close(CloseReason::External);
    }

    fn scene(&self) -> Scene {
        let mut scene = Scene::masked_backdrop(self.area.local_bounds(), MASK_ALPHA);
        if let Some(selection) = self.selection().filter(|s| !s.is_degenerate()) {
            // Undarkened preview: same pixels, no mask.
            scene.push(Shape::Snapshot {
                source: selection,
                dest: selection,
            });
            scene.push(Shape::Outline {
                rect: selection,
                color: BORDER_COLOR,
                width: BORDER_WIDTH,
            });
        }
        scene
    }

    fn status(&self) -> OverlayStatus {
        match self.phase {
            Phase::Finished => OverlayStatus::Finished,
            _ => OverlayStatus::Active,
        }
    }

    fn signals(&mut self) -> &mut OverlaySignals<Rectangle> {
        &mut self.signals
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn area() -> ScreenArea {
        ScreenArea::new(Point::new(0, 0), 1920, 1080)
    }

    fn press(x: i32, y: i32) -> OverlayInput {
        OverlayInput::Pressed {
            button: PointerButton::Primary,
            at: Point::new(x, y),
        }
    }

    fn moved(x: i32, y: i32) -> OverlayInput {
        OverlayInput::Moved {
            to: Point::new(x, y),
        }
    }

    fn release(x: i32, y: i32) -> OverlayInput {
        OverlayInput::Released {
            button: PointerButton::Primary,
            at: Point::new(x, y),
        }
    }

    fn results(selector: &mut RegionSelector) -> Rc<RefCell<Vec<Rectangle>>> {
        let out = Rc::new(RefCell::new(Vec::new()));
        let o = Rc::clone(&out);
        selector
            .signals()
            .on_result_ready(move |r| o.borrow_mut().push(*r));
        out
    }

    #[test]
    fn test_drag_down_right_emits_rectangle() {
        // Arrange
        let mut selector = RegionSelector::new(area());
        let out = results(&mut selector);

        // Act
        selector.handle_input(press(10, 20));
        selector.handle_input(moved(200, 100));
        let status = selector.handle_input(release(310, 170));

        // Assert
        assert_eq!(status, OverlayStatus::Finished);
        assert_eq!(*out.borrow(), vec![Rectangle::new(10, 20, 300, 150)]);
    }

    #[test]
    fn test_drag_up_left_emits_same_rectangle() {
        let mut selector = RegionSelector::new(area());
        let out = results(&mut selector);

        selector.handle_input(press(310, 170));
        selector.handle_input(release(10, 20));

        assert_eq!(*out.borrow(), vec![Rectangle::new(10, 20, 300, 150)]);
    }

    #[test]
    fn test_result_is_translated_by_screen_origin() {
        let mut selector = RegionSelector::new(ScreenArea::new(Point::new(-1280, 0), 1280, 1024));
        let out = results(&mut selector);

        selector.handle_input(press(0, 0));
        selector.handle_input(release(100, 50));

        assert_eq!(*out.borrow(), vec![Rectangle::new(-1280, 0, 100, 50)]);
    }

    #[test]
    fn test_degenerate_release_keeps_overlay_open() {
        // Arrange
        let mut selector = RegionSelector::new(area());
        let out = results(&mut selector);

        // Act: click without dragging
        selector.handle_input(press(50, 50));
        let status = selector.handle_input(release(50, 50));

        // Assert
        assert_eq!(status, OverlayStatus::Active);
        assert!(out.borrow().is_empty());
        assert!(selector.selection().is_none());
    }

    #[test]
    fn test_release_without_press_is_ignored() {
        let mut selector = RegionSelector::new(area());
        assert_eq!(selector.handle_input(release(5, 5)), OverlayStatus::Active);
    }

    #[test]
    fn test_move_before_press_does_not_select() {
        let mut selector = RegionSelector::new(area());
        selector.handle_input(moved(100, 100));
        assert!(selector.selection().is_none());
    }

    #[test]
    fn test_secondary_press_cancels_mid_drag() {
        let mut selector = RegionSelector::new(area());
        let out = results(&mut selector);

        selector.handle_input(press(10, 10));
        selector.handle_input(moved(100, 100));
        let status = selector.handle_input(OverlayInput::Pressed {
            button: PointerButton::Secondary,
            at: Point::new(100, 100),
        });

        assert_eq!(status, OverlayStatus::Finished);
        assert!(out.borrow().is_empty());
    }

    #[test]
    fn test_input_after_finish_is_ignored() {
        let mut selector = RegionSelector::new(area());
        let out = results(&mut selector);
        selector.handle_input(OverlayInput::Escape);

        selector.handle_input(press(0, 0));
        selector.handle_input(release(10, 10));

        assert!(out.borrow().is_empty());
        assert_eq!(selector.status(), OverlayStatus::Finished);
    }

    #[test]
    fn test_selection_is_clamped_to_screen() {
        let mut selector = RegionSelector::new(ScreenArea::new(Point::new(0, 0), 100, 100));
        selector.handle_input(press(50, 50));
        selector.handle_input(moved(500, -20));
        assert_eq!(selector.selection(), Some(Rectangle::new(50, 0, 50, 50)));
    }

    // ── Scene ─────────────────────────────────────────────────────────────────

    #[test]
    fn test_idle_scene_is_masked_snapshot_only() {
        let selector = RegionSelector::new(area());
        let scene = selector.scene();

        assert_eq!(scene.shapes.len(), 2);
        assert!(matches!(scene.shapes[0], Shape::Snapshot { .. }));
        assert!(matches!(
            scene.shapes[1],
            Shape::Fill { color: Rgba { a: MASK_ALPHA, .. }, .. }
        ));
    }

    #[test]
    fn test_drag_scene_redraws_interior_unmasked_with_border() {
        // Arrange
        let mut selector = RegionSelector::new(area());
        selector.handle_input(press(10, 10));
        selector.handle_input(moved(60, 40));
        let selection = Rectangle::new(10, 10, 50, 30);

        // Act
        let scene = selector.scene();

        // Assert: the preview comes after the mask, so it paints over it.
        assert_eq!(
            scene.shapes[2],
            Shape::Snapshot {
                source: selection,
                dest: selection
            }
        );
        assert_eq!(
            scene.shapes[3],
            Shape::Outline {
                rect: selection,
                color: BORDER_COLOR,
                width: BORDER_WIDTH
            }
        );
    }
}
