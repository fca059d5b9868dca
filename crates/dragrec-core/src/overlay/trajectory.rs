//! Trajectory capture: record where a primary-button drag starts and ends.
//!
//! While the button is held the scene shows a red line from the press point
//! to the pointer, a green marker on the start, a red marker on the current
//! point, and both coordinates as text in the top-left corner.  Release
//! emits a [`Trajectory`] in screen coordinates and closes the overlay.

use tracing::info;

use super::scene::{Rgba, Scene, Shape};
use super::{CloseReason, Overlay, OverlayInput, OverlaySignals, OverlayStatus, PointerButton};
use crate::domain::geometry::{Point, ScreenArea, Trajectory};

pub const MASK_ALPHA: u8 = 50;
pub const LINE_COLOR: Rgba = Rgba::rgb(255, 0, 0);
pub const LINE_WIDTH: f32 = 3.0;
pub const START_MARKER_COLOR: Rgba = Rgba::rgb(0, 255, 0);
pub const CURRENT_MARKER_COLOR: Rgba = Rgba::rgb(255, 0, 0);
pub const MARKER_RADIUS: f32 = 5.0;
/// Where the coordinate read-out is drawn.
pub const START_LABEL_AT: Point = Point::new(10, 30);
pub const CURRENT_LABEL_AT: Point = Point::new(10, 50);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Waiting,
    Tracking { start: Point, current: Point },
    Finished,
}

/// The trajectory capture overlay.
pub struct TrajectoryRecorder {
    area: ScreenArea,
    phase: Phase,
    signals: OverlaySignals<Trajectory>,
}

impl TrajectoryRecorder {
    pub fn new(area: ScreenArea) -> Self {
        Self {
            area,
            phase: Phase::Waiting,
            signals: OverlaySignals::new(),
        }
    }

    /// `(start, current)` in overlay-local pixels while the button is held.
    pub fn tracking(&self) -> Option<(Point, Point)> {
        match self.phase {
            Phase::Tracking { start, current } => Some((start, current)),
            _ => None,
        }
    }

    pub fn area(&self) -> ScreenArea {
        self.area
    }

    fn cancel(&mut self) -> OverlayStatus {
        info!("trajectory recording cancelled");
        self.phase = Phase::Finished;
        self.signals.close(CloseReason::Cancelled);
        OverlayStatus::Finished
    }
}

impl Overlay for TrajectoryRecorder {
    type Output = Trajectory;

    fn handle_input(&mut self, input: OverlayInput) -> OverlayStatus {
        match (self.phase, input) {
            (Phase::Finished, _) => OverlayStatus::Finished,

            (
                _,
                OverlayInput::Pressed {
                    button: PointerButton::Primary,
                    at,
                },
            ) => {
                let at = self.area.clamp(at);
                self.phase = Phase::Tracking {
                    start: at,
                    current: at,
                };
                OverlayStatus::Active
            }

            (
                _,
                OverlayInput::Pressed {
                    button: PointerButton::Secondary,
                    ..
                },
            )
            | (_, OverlayInput::Escape) => self.cancel(),

            (Phase::Tracking { start, .. }, OverlayInput::Moved { to }) => {
                self.phase = Phase::Tracking {
                    start,
                    current: self.area.clamp(to),
                };
                OverlayStatus::Active
            }

            (
                Phase::Tracking { start, .. },
                OverlayInput::Released {
                    button: PointerButton::Primary,
                    at,
                },
            ) => {
                let end = self.area.clamp(at);
                let track = Trajectory::new(self.area.to_screen(start), self.area.to_screen(end));
                info!(%track, "mouse track recorded");
                self.phase = Phase::Finished;
                self.signals.complete(&track);
                OverlayStatus::Finished
            }

            _ => OverlayStatus::Active,
        }
    }

    fn request_close(&mut self) {
        self.phase = Phase::Finished;
        self.signals.close(CloseReason::External);
    }

    fn scene(&self) -> Scene {
        let mut scene = Scene::masked_backdrop(self.area.local_bounds(), MASK_ALPHA);
        let Some((start, current)) = self.tracking() else {
            return scene;
        };

        scene.push(Shape::Line {
            from: start,
            to: current,
            color: LINE_COLOR,
            width: LINE_WIDTH,
        });
        scene.push(Shape::Marker {
            center: start,
            radius: MARKER_RADIUS,
            color: START_MARKER_COLOR,
        });
        scene.push(Shape::Marker {
            center: current,
            radius: MARKER_RADIUS,
            color: CURRENT_MARKER_COLOR,
        });
        scene.push(Shape::Label {
            anchor: START_LABEL_AT,
            text: format!("Start: {}", self.area.to_screen(start)),
            color: Rgba::WHITE,
        });
        scene.push(Shape::Label {
            anchor: CURRENT_LABEL_AT,
            text: format!("Current: {}", self.area.to_screen(current)),
            color: Rgba::WHITE,
        });
        scene
    }

    fn status(&self) -> OverlayStatus {
        match self.phase {
            Phase::Finished => OverlayStatus::Finished,
            _ => OverlayStatus::Active,
        }
    }

    fn signals(&mut self) -> &mut OverlaySignals<Trajectory> {
        &mut self.signals
    }
}
