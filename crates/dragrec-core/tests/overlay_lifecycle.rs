//! Integration tests for the overlay close-notification contract.
//!
//! Every exit path of both overlays must deliver exactly one `closed`
//! notification, and a result (if any) must arrive before it.

use std::cell::RefCell;
use std::rc::Rc;

use dragrec_core::{
    CloseReason, Overlay, OverlayInput, Point, PointerButton, RegionSelector, ScreenArea,
    TrajectoryRecorder,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
enum Event {
    Result,
    Closed(CloseReason),
}

fn area() -> ScreenArea {
    ScreenArea::new(Point::new(0, 0), 1280, 720)
}

fn observe<O: Overlay>(overlay: &mut O) -> Rc<RefCell<Vec<Event>>> {
    let log = Rc::new(RefCell::new(Vec::new()));
    let l = Rc::clone(&log);
    overlay
        .signals()
        .on_result_ready(move |_| l.borrow_mut().push(Event::Result));
    let l = Rc::clone(&log);
    overlay
        .signals()
        .on_closed(move |r| l.borrow_mut().push(Event::Closed(*r)));
    log
}

fn press(button: PointerButton, x: i32, y: i32) -> OverlayInput {
    OverlayInput::Pressed {
        button,
        at: Point::new(x, y),
    }
}

fn release(x: i32, y: i32) -> OverlayInput {
    OverlayInput::Released {
        button: PointerButton::Primary,
        at: Point::new(x, y),
    }
}

fn closes(log: &[Event]) -> usize {
    log.iter().filter(|e| matches!(e, Event::Closed(_))).count()
}

/// Runs `script` against a fresh overlay, drops it, and returns the log.
fn run<O: Overlay>(mut overlay: O, script: impl FnOnce(&mut O)) -> Vec<Event> {
    let log = observe(&mut overlay);
    script(&mut overlay);
    drop(overlay);
    let events = log.borrow().clone();
    events
}

// ── Region overlay ────────────────────────────────────────────────────────────

#[test]
fn test_region_every_exit_path_closes_exactly_once() {
    let scripts: Vec<(&str, Box<dyn FnOnce(&mut RegionSelector)>)> = vec![
        (
            "completion",
            Box::new(|o: &mut RegionSelector| {
                o.handle_input(press(PointerButton::Primary, 1, 1));
                o.handle_input(release(50, 50));
            }),
        ),
        (
            "secondary",
            Box::new(|o: &mut RegionSelector| {
                o.handle_input(press(PointerButton::Secondary, 1, 1));
            }),
        ),
        (
            "escape",
            Box::new(|o: &mut RegionSelector| {
                o.handle_input(OverlayInput::Escape);
            }),
        ),
        ("external", Box::new(|o: &mut RegionSelector| o.request_close())),
        ("drop", Box::new(|_: &mut RegionSelector| {})),
    ];

    for (name, script) in scripts {
        let log = run(RegionSelector::new(area()), script);
        assert_eq!(closes(&log), 1, "path {name} must close exactly once: {log:?}");
    }
}

#[test]
fn test_region_result_precedes_close() {
    let log = run(RegionSelector::new(area()), |o| {
        o.handle_input(press(PointerButton::Primary, 400, 300));
        o.handle_input(release(100, 100));
    });

    assert_eq!(log, vec![Event::Result, Event::Closed(CloseReason::Completed)]);
}

#[test]
fn test_region_degenerate_then_real_drag_emits_once() {
    let log = run(RegionSelector::new(area()), |o| {
        o.handle_input(press(PointerButton::Primary, 10, 10));
        o.handle_input(release(10, 10));
        o.handle_input(press(PointerButton::Primary, 10, 10));
        o.handle_input(release(20, 30));
        o.request_close();
    });

    assert_eq!(log, vec![Event::Result, Event::Closed(CloseReason::Completed)]);
}

#[test]
fn test_region_drop_while_dragging_reports_dropped() {
    let log = run(RegionSelector::new(area()), |o| {
        o.handle_input(press(PointerButton::Primary, 10, 10));
        o.handle_input(OverlayInput::Moved {
            to: Point::new(60, 60),
        });
    });

    assert_eq!(log, vec![Event::Closed(CloseReason::Dropped)]);
}

// ── Trajectory overlay ────────────────────────────────────────────────────────

#[test]
fn test_trajectory_every_exit_path_closes_exactly_once() {
    let scripts: Vec<(&str, Box<dyn FnOnce(&mut TrajectoryRecorder)>)> = vec![
        (
            "completion",
            Box::new(|o: &mut TrajectoryRecorder| {
                o.handle_input(press(PointerButton::Primary, 5, 5));
                o.handle_input(release(400, 300));
            }),
        ),
        (
            "secondary",
            Box::new(|o: &mut TrajectoryRecorder| {
                o.handle_input(press(PointerButton::Secondary, 1, 1));
            }),
        ),
        (
            "escape",
            Box::new(|o: &mut TrajectoryRecorder| {
                o.handle_input(OverlayInput::Escape);
            }),
        ),
        ("external", Box::new(|o: &mut TrajectoryRecorder| o.request_close())),
        ("drop", Box::new(|_: &mut TrajectoryRecorder| {})),
    ];

    for (name, script) in scripts {
        let log = run(TrajectoryRecorder::new(area()), script);
        assert_eq!(closes(&log), 1, "path {name} must close exactly once: {log:?}");
    }
}

#[test]
fn test_trajectory_result_precedes_close() {
    let log = run(TrajectoryRecorder::new(area()), |o| {
        o.handle_input(press(PointerButton::Primary, 5, 5));
        o.handle_input(release(400, 300));
        o.handle_input(OverlayInput::Escape);
    });

    assert_eq!(log, vec![Event::Result, Event::Closed(CloseReason::Completed)]);
}

#[test]
fn test_unsubscribed_observer_sees_nothing() {
    // Arrange
    let hits = Rc::new(RefCell::new(0));
    let mut recorder = TrajectoryRecorder::new(area());
    let h = Rc::clone(&hits);
    let id = recorder.signals().on_closed(move |_| *h.borrow_mut() += 1);

    // Act
    assert!(recorder.signals().unsubscribe(id));
    recorder.handle_input(OverlayInput::Escape);

    // Assert
    assert_eq!(*hits.borrow(), 0);
}

#[test]
fn test_unsubscribing_close_keeps_result_observer() {
    // Arrange
    let results = Rc::new(RefCell::new(0));
    let closes = Rc::new(RefCell::new(0));
    let mut selector = RegionSelector::new(area());
    let r = Rc::clone(&results);
    selector.signals().on_result_ready(move |_| *r.borrow_mut() += 1);
    let c = Rc::clone(&closes);
    let close_id = selector.signals().on_closed(move |_| *c.borrow_mut() += 1);

    // Act
    assert!(selector.signals().unsubscribe(close_id));
    selector.handle_input(press(PointerButton::Primary, 100, 100));
    selector.handle_input(release(300, 200));

    // Assert
    assert_eq!(*results.borrow(), 1);
    assert_eq!(*closes.borrow(), 0);
}
