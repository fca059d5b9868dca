//! Mock pointer backend for unit tests and `--dry-run`.
//!
//! # Why a mock backend?
//!
//! The real backends (`WindowsPointerBackend`, `XTestPointerBackend`,
//! `MacosPointerBackend`) make OS API calls that:
//!
//! - Require a physical desktop session to run.
//! - Actually move the cursor and click on the test machine.
//! - Cannot be observed directly from Rust test code.
//!
//! `MockPointerBackend` replaces all OS calls with in-memory recording.
//! Each action is pushed into a `Mutex<Vec<...>>` so test assertions can
//! inspect exactly what was done and in what order.
//!
//! # Usage in tests
//!
//! ```ignore
//! let backend = Arc::new(MockPointerBackend::new());
//! let executor = ReplayExecutor::new(backend.clone(), ReplayTiming::immediate(), reporter);
//!
//! executor.execute(track, Duration::ZERO).unwrap().join().unwrap();
//!
//! assert_eq!(backend.presses(), 1);
//! ```
//!
//! # Failure injection and gating
//!
//! - [`MockPointerBackend::failing`] makes every call return
//!   `PointerError::Platform`.
//! - [`MockPointerBackend::failing_drag`] fails only moves made with the
//!   button held, i.e. the drag to the end point.
//! - [`MockPointerBackend::gated`] builds a backend whose first call blocks
//!   until [`MockPointerBackend::open_gate`] is called, so a test can hold a
//!   replay "in flight" for as long as it needs.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

use dragrec_core::{Point, PointerButton};
use tracing::info;

use crate::application::replay::{PointerBackend, PointerError};

/// One recorded call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerAction {
    MoveTo(Point),
    Press(PointerButton),
    Release(PointerButton),
}

/// A backend that records all calls without touching the OS.
#[derive(Default)]
pub struct MockPointerBackend {
    /// Every successful call, in order.
    pub actions: Mutex<Vec<PointerAction>>,
    /// When `true`, every method returns an error.
    pub should_fail: bool,
    /// When `true`, `move_to` fails while a button is held.
    pub fail_moves_while_pressed: bool,
    position: Mutex<Point>,
    pressed: AtomicBool,
    log_actions: bool,
    gate: Option<Gate>,
}

struct Gate {
    open: Mutex<bool>,
    opened: Condvar,
}

impl Default for Gate {
    fn default() -> Self {
        Self {
            open: Mutex::new(false),
            opened: Condvar::new(),
        }
    }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockPointerBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// A recording backend that also logs every action at `info` level.
    pub fn logging() -> Self {
        Self {
            log_actions: true,
            ..Self::default()
        }
    }

    /// A backend whose every call fails.
    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    /// A backend that fails only the drag to the end point.
    pub fn failing_drag() -> Self {
        Self {
            fail_moves_while_pressed: true,
            ..Self::default()
        }
    }

    /// A backend whose first call blocks until [`open_gate`](Self::open_gate).
    pub fn gated() -> Self {
        Self {
            gate: Some(Gate::default()),
            ..Self::default()
        }
    }

    /// Releases every caller blocked on the gate.  No-op without a gate.
    pub fn open_gate(&self) {
        if let Some(gate) = &self.gate {
            *lock(&gate.open) = true;
            gate.opened.notify_all();
        }
    }

    /// Snapshot of the recorded actions.
    pub fn recorded(&self) -> Vec<PointerAction> {
        lock(&self.actions).clone()
    }

    pub fn presses(&self) -> usize {
        self.recorded()
            .iter()
            .filter(|a| matches!(a, PointerAction::Press(_)))
            .count()
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed.load(Ordering::SeqCst)
    }

    fn wait_for_gate(&self) {
        if let Some(gate) = &self.gate {
            let mut open = lock(&gate.open);
            while !*open {
                open = gate
                    .opened
                    .wait(open)
                    .unwrap_or_else(PoisonError::into_inner);
            }
        }
    }

    fn check(&self) -> Result<(), PointerError> {
        self.wait_for_gate();
        if self.should_fail {
            return Err(PointerError::Platform("mock failure".into()));
        }
        Ok(())
    }

    fn record(&self, action: PointerAction) {
        if self.log_actions {
            info!(?action, "dry run: pointer action");
        }
        lock(&self.actions).push(action);
    }
}

impl PointerBackend for MockPointerBackend {
    fn position(&self) -> Result<Point, PointerError> {
        self.check()?;
        Ok(*lock(&self.position))
    }

    fn move_to(&self, to: Point) -> Result<(), PointerError> {
        self.check()?;
        if self.fail_moves_while_pressed && self.is_pressed() {
            return Err(PointerError::Platform("mock failure during drag".into()));
        }
        *lock(&self.position) = to;
        self.record(PointerAction::MoveTo(to));
        Ok(())
    }

    fn button(&self, button: PointerButton, pressed: bool) -> Result<(), PointerError> {
        self.check()?;
        self.pressed.store(pressed, Ordering::SeqCst);
        self.record(if pressed {
            PointerAction::Press(button)
        } else {
            PointerAction::Release(button)
        });
        Ok(())
    }
}
