//! Full-screen overlays as toolkit-neutral state machines.
//!
//! The GUI layer shows a borderless full-screen view over a frozen
//! screenshot, translates its native pointer/key events into
//! [`OverlayInput`], and paints whatever [`Overlay::scene`] returns.
//! Everything else lives here:
//!
//! - **`region`** – [`RegionSelector`](region::RegionSelector): drag out a
//!   rectangle.
//! - **`trajectory`** – [`TrajectoryRecorder`](trajectory::TrajectoryRecorder):
//!   record a press point and a release point.
//! - **`signal`** – the observer list used for notifications.
//! - **`scene`** – the paint description.
//!
//! # Lifecycle guarantees
//!
//! Every overlay owns an [`OverlaySignals`] with two channels:
//! `result_ready` and `closed`.  For one overlay lifetime:
//!
//! - `closed` fires exactly once, whatever the exit path: completion,
//!   secondary-button cancel, Escape, [`Overlay::request_close`], or plain
//!   `drop`.
//! - `result_ready` fires at most once, and only before `closed`.
//!
//! Delivery is synchronous inside [`Overlay::handle_input`].  When it
//! returns [`OverlayStatus::Finished`] both notifications have already run,
//! so the owner can drop the overlay immediately.

use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, warn};

use crate::domain::geometry::Point;

pub mod region;
pub mod scene;
pub mod signal;
pub mod trajectory;

use scene::Scene;
use signal::{Signal, SubscriptionId};

/// Which physical button an input refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    /// Usually the left button.
    Primary,
    /// Usually the right button.
    Secondary,
    Middle,
}

/// A pointer or keyboard event in overlay-local pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayInput {
    Pressed { button: PointerButton, at: Point },
    Moved { to: Point },
    Released { button: PointerButton, at: Point },
    Escape,
}

/// Why an overlay closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    /// A result was emitted just before the close.
    Completed,
    /// The user cancelled with the secondary button or Escape.
    Cancelled,
    /// The owner called [`Overlay::request_close`].
    External,
    /// The overlay was dropped while still open.
    Dropped,
}

/// Whether an overlay still wants input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayStatus {
    Active,
    /// Notifications are delivered; the overlay can be torn down.
    Finished,
}

/// The two notification channels of an overlay, plus the close-once guard.
pub struct OverlaySignals<R> {
    result_ready: Signal<R>,
    closed: Signal<CloseReason>,
    /// Shared by both channels so an id names exactly one subscription.
    next_id: u64,
    close_sent: bool,
}

impl<R> OverlaySignals<R> {
    pub fn new() -> Self {
        Self {
            result_ready: Signal::new(),
            closed: Signal::new(),
            next_id: 0,
            close_sent: false,
        }
    }

    pub fn on_result_ready(&mut self, callback: impl FnMut(&R) + 'static) -> SubscriptionId {
        let id = self.allocate_id();
        self.result_ready.subscribe_as(id, callback);
        id
    }

    pub fn on_closed(&mut self, callback: impl FnMut(&CloseReason) + 'static) -> SubscriptionId {
        let id = self.allocate_id();
        self.closed.subscribe_as(id, callback);
        id
    }

    fn allocate_id(&mut self) -> SubscriptionId {
        let id = SubscriptionId::new(self.next_id);
        self.next_id += 1;
        id
    }

    /// Detaches a subscription from whichever channel holds it.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.result_ready.unsubscribe(id) || self.closed.unsubscribe(id)
    }

    /// `true` once the close notification has gone out.
    pub fn is_closed(&self) -> bool {
        self.close_sent
    }

    /// Emits `result` then the `Completed` close.  No-op after a close.
    pub(crate) fn complete(&mut self, result: &R) {
        if self.close_sent {
            return;
        }
        self.result_ready.emit(result);
        self.close(CloseReason::Completed);
    }

    /// Emits the close notification unless it has already been sent.
    pub(crate) fn close(&mut self, reason: CloseReason) -> bool {
        if self.close_sent {
            return false;
        }
        self.close_sent = true;
        debug!(?reason, "overlay closing");
        self.closed.emit(&reason);
        true
    }
}

impl<R> Default for OverlaySignals<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> Drop for OverlaySignals<R> {
    fn drop(&mut self) {
        if self.close_sent {
            return;
        }
        // Teardown must not take the process down with it.
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            self.close(CloseReason::Dropped);
        }));
        if result.is_err() {
            warn!("close subscriber panicked during overlay teardown; suppressed");
        }
    }
}

/// Common surface of the region selector and the trajectory recorder.
pub trait Overlay {
    /// What a completed overlay emits on `result_ready`.
    type Output;

    /// Feeds one input event.  Ignored once the overlay is finished.
    fn handle_input(&mut self, input: OverlayInput) -> OverlayStatus;

    /// Closes from outside (e.g. the window was closed by the system).
    fn request_close(&mut self);

    /// What to paint right now.
    fn scene(&self) -> Scene;

    fn status(&self) -> OverlayStatus;

    fn signals(&mut self) -> &mut OverlaySignals<Self::Output>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorded() -> (OverlaySignals<u8>, Rc<RefCell<Vec<String>>>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut signals = OverlaySignals::new();
        let l = Rc::clone(&log);
        signals.on_result_ready(move |v| l.borrow_mut().push(format!("result {v}")));
        let l = Rc::clone(&log);
        signals.on_closed(move |r| l.borrow_mut().push(format!("closed {r:?}")));
        (signals, log)
    }

    #[test]
    fn test_complete_emits_result_then_close() {
        let (mut signals, log) = recorded();

        signals.complete(&3);

        assert_eq!(*log.borrow(), vec!["result 3", "closed Completed"]);
        assert!(signals.is_closed());
    }

    #[test]
    fn test_close_is_sent_once() {
        let (mut signals, log) = recorded();

        assert!(signals.close(CloseReason::Cancelled));
        assert!(!signals.close(CloseReason::External));
        signals.complete(&1);
        drop(signals);

        assert_eq!(*log.borrow(), vec!["closed Cancelled"]);
    }

    #[test]
    fn test_drop_sends_close_when_still_open() {
        let (signals, log) = recorded();

        drop(signals);

        assert_eq!(*log.borrow(), vec!["closed Dropped"]);
    }

    #[test]
    fn test_panicking_subscriber_on_drop_is_suppressed() {
        // Arrange
        let mut signals = OverlaySignals::<u8>::new();
        signals.on_closed(|_| panic!("subscriber failure"));

        // Act / Assert: dropping must not propagate the panic.
        drop(signals);
    }

    #[test]
    fn test_unsubscribe_finds_either_channel() {
        let (mut signals, log) = recorded();
        let id = signals.on_closed(|_| {});
        assert!(signals.unsubscribe(id));
        signals.close(CloseReason::External);
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn test_result_and_close_subscriptions_get_distinct_ids() {
        // Arrange
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut signals = OverlaySignals::<u8>::new();
        let l = Rc::clone(&log);
        let result_id = signals.on_result_ready(move |v| l.borrow_mut().push(format!("result {v}")));
        let l = Rc::clone(&log);
        let closed_id = signals.on_closed(move |r| l.borrow_mut().push(format!("closed {r:?}")));

        // Act
        assert_ne!(result_id, closed_id);
        assert!(signals.unsubscribe(closed_id));
        signals.complete(&9);

        // Assert
        assert_eq!(*log.borrow(), vec!["result 9"]);
    }
}
