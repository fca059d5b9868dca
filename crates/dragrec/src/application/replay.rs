//! ReplayExecutor: plays a recorded trajectory back as simulated pointer input.
//!
//! This use case sits at the application layer and delegates every OS call
//! to a [`PointerBackend`] trait object.  The platform implementations live
//! in `infrastructure::pointer`.
//!
//! # The replay sequence (for beginners)
//!
//! A replay is a press-drag-release gesture performed by a background thread:
//!
//! ```text
//! wait settle_before            (lets the caller minimise its window)
//! glide to start over approach  (from wherever the pointer currently is)
//! press primary button
//! glide to end over duration    (linear interpolation, one move per step)
//! release primary button
//! wait settle_after
//! report success
//! ```
//!
//! # One replay at a time
//!
//! The executor owns a single `AtomicBool` busy flag.  [`ReplayExecutor::execute`]
//! claims it with a compare-and-swap *before* spawning the worker, so two
//! calls made back to back can never both start a sequence.  A call made
//! while busy is rejected: the reporter receives a failure outcome and no
//! pointer action happens.  Requests are never queued.
//!
//! The worker clears the flag before it reports its outcome.  Whoever observes
//! an outcome can therefore call `execute` again straight away.
//!
//! # Failure handling
//!
//! Every backend error and every panic inside the worker is caught at the
//! thread boundary and turned into a failure [`ReplayOutcome`].  If the
//! failure happens while the button is held, the worker tries to release it
//! so the desktop is not left mid-drag.

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use dragrec_core::{Point, PointerButton, Trajectory};
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Error type for pointer backend operations.
#[derive(Debug, Error)]
pub enum PointerError {
    /// The OS input API rejected or failed the call.
    #[error("platform error: {0}")]
    Platform(String),
    /// The backend could not be set up (no display, missing permission, ...).
    #[error("pointer backend unavailable: {0}")]
    Unavailable(String),
}

/// Platform-agnostic pointer simulation.
///
/// Coordinates are absolute screen pixels with a top-left origin.  Each OS
/// provides an implementation in the infrastructure layer.
pub trait PointerBackend: Send + Sync {
    /// Current pointer position.
    fn position(&self) -> Result<Point, PointerError>;

    /// Moves the pointer to an absolute position.
    fn move_to(&self, to: Point) -> Result<(), PointerError>;

    /// Presses (`pressed == true`) or releases a button at the current position.
    fn button(&self, button: PointerButton, pressed: bool) -> Result<(), PointerError>;
}

/// Which part of the sequence failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayStep {
    MoveToStart,
    Press,
    MoveToEnd,
    Release,
}

impl fmt::Display for ReplayStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReplayStep::MoveToStart => "moving to the start point",
            ReplayStep::Press => "pressing the button",
            ReplayStep::MoveToEnd => "dragging to the end point",
            ReplayStep::Release => "releasing the button",
        };
        f.write_str(name)
    }
}

/// Error type for replay operations.
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("a replay is already running; wait for it to finish")]
    Busy,

    #[error("replay failed while {step}: {source}")]
    Pointer {
        step: ReplayStep,
        #[source]
        source: PointerError,
    },

    #[error("replay worker panicked: {0}")]
    Panicked(String),

    #[error("could not start the replay worker: {0}")]
    Spawn(#[source] std::io::Error),
}

/// The boolean-plus-message result delivered to the reporter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayOutcome {
    pub success: bool,
    pub message: String,
}

impl ReplayOutcome {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn err(error: &ReplayError) -> Self {
        Self {
            success: false,
            message: error.to_string(),
        }
    }
}

/// Fixed pauses and pacing around the drag itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplayTiming {
    /// Pause before the first pointer action.
    pub settle_before: Duration,
    /// Time taken to glide from the current position to the start point.
    pub approach: Duration,
    /// Pause after the release, before reporting.
    pub settle_after: Duration,
    /// Interval between interpolated moves.
    pub step: Duration,
}

impl Default for ReplayTiming {
    fn default() -> Self {
        Self {
            settle_before: Duration::from_millis(500),
            approach: Duration::from_millis(200),
            settle_after: Duration::from_millis(500),
            step: Duration::from_millis(10),
        }
    }
}

impl ReplayTiming {
    /// No pauses at all.  Moves still happen one per step.
    pub fn immediate() -> Self {
        Self {
            settle_before: Duration::ZERO,
            approach: Duration::ZERO,
            settle_after: Duration::ZERO,
            step: Duration::from_millis(1),
        }
    }
}

/// Receives exactly one outcome per `execute` call.
pub type OutcomeReporter = Arc<dyn Fn(ReplayOutcome) + Send + Sync>;

/// The replay use case.
pub struct ReplayExecutor {
    backend: Arc<dyn PointerBackend>,
    timing: ReplayTiming,
    busy: Arc<AtomicBool>,
    reporter: OutcomeReporter,
}

impl ReplayExecutor {
    pub fn new(
        backend: Arc<dyn PointerBackend>,
        timing: ReplayTiming,
        reporter: OutcomeReporter,
    ) -> Self {
        Self {
            backend,
            timing,
            busy: Arc::new(AtomicBool::new(false)),
            reporter,
        }
    }

    /// `true` while a worker owns the busy flag.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    pub fn timing(&self) -> ReplayTiming {
        self.timing
    }

    /// Starts replaying `track`, dragging for `duration`.
    ///
    /// Never blocks.  Returns the worker's handle when the replay was
    /// started, or `None` when it was rejected; in both cases the outcome
    /// goes to the reporter.
    pub fn execute(&self, track: Trajectory, duration: Duration) -> Option<JoinHandle<()>> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            warn!("replay requested while another replay is running");
            (self.reporter)(ReplayOutcome::err(&ReplayError::Busy));
            return None;
        }

        info!(%track, ?duration, "starting replay");
        let backend = Arc::clone(&self.backend);
        let busy = Arc::clone(&self.busy);
        let reporter = Arc::clone(&self.reporter);
        let timing = self.timing;

        let spawned = thread::Builder::new()
            .name("dragrec-replay".to_string())
            .spawn(move || {
                let outcome = {
                    let _guard = BusyGuard(busy);
                    let result = panic::catch_unwind(AssertUnwindSafe(|| {
                        run_sequence(backend.as_ref(), &timing, track, duration)
                    }));
                    match result {
                        Ok(Ok(())) => {
                            info!("replay finished");
                            ReplayOutcome::ok("Mouse track replay finished")
                        }
                        Ok(Err(e)) => {
                            error!("replay failed: {e}");
                            ReplayOutcome::err(&e)
                        }
                        Err(payload) => {
                            let e = ReplayError::Panicked(panic_message(payload.as_ref()));
                            error!("{e}");
                            ReplayOutcome::err(&e)
                        }
                    }
                };
                reporter(outcome);
            });

        match spawned {
            Ok(handle) => Some(handle),
            Err(e) => {
                self.busy.store(false, Ordering::Release);
                let e = ReplayError::Spawn(e);
                error!("{e}");
                (self.reporter)(ReplayOutcome::err(&e));
                None
            }
        }
    }
}

/// Clears the busy flag when the worker's work is over, even on unwind.
struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Holds the primary button down; releases it on drop unless already released.
struct HeldButton<'a> {
    backend: &'a dyn PointerBackend,
    held: bool,
}

impl<'a> HeldButton<'a> {
    fn press(backend: &'a dyn PointerBackend) -> Result<Self, PointerError> {
        backend.button(PointerButton::Primary, true)?;
        Ok(Self {
            backend,
            held: true,
        })
    }

    fn release(mut self) -> Result<(), PointerError> {
        self.held = false;
        self.backend.button(PointerButton::Primary, false)
    }
}

impl Drop for HeldButton<'_> {
    fn drop(&mut self) {
        if self.held {
            warn!("replay aborted with the button held; releasing");
            if let Err(e) = self.backend.button(PointerButton::Primary, false) {
                warn!("best-effort release failed: {e}");
            }
        }
    }
}

fn run_sequence(
    backend: &dyn PointerBackend,
    timing: &ReplayTiming,
    track: Trajectory,
    duration: Duration,
) -> Result<(), ReplayError> {
    let at = |step: ReplayStep| move |source: PointerError| ReplayError::Pointer { step, source };

    thread::sleep(timing.settle_before);

    let from = backend.position().unwrap_or_else(|e| {
        debug!("pointer position unavailable ({e}); jumping to start");
        track.start()
    });
    debug!(%from, to = %track.start(), "moving to start point");
    glide(backend, Trajectory::new(from, track.start()), timing.approach, timing.step)
        .map_err(at(ReplayStep::MoveToStart))?;

    let held = HeldButton::press(backend).map_err(at(ReplayStep::Press))?;
    debug!(to = %track.end(), "dragging to end point");
    glide(backend, track, duration, timing.step).map_err(at(ReplayStep::MoveToEnd))?;
    held.release().map_err(at(ReplayStep::Release))?;

    thread::sleep(timing.settle_after);
    Ok(())
}

/// Moves along `path` in evenly spaced steps spread over `duration`.
///
/// A zero duration is a single jump to the end point.
fn glide(
    backend: &dyn PointerBackend,
    path: Trajectory,
    duration: Duration,
    step: Duration,
) -> Result<(), PointerError> {
    let steps = step_count(duration, step);
    let pause = duration / steps;
    for waypoint in path.waypoints(steps) {
        backend.move_to(waypoint)?;
        if !pause.is_zero() {
            thread::sleep(pause);
        }
    }
    Ok(())
}

fn step_count(duration: Duration, step: Duration) -> u32 {
    if step.is_zero() {
        return 1;
    }
    let n = duration.as_micros() / step.as_micros().max(1);
    u32::try_from(n).unwrap_or(u32::MAX).max(1)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
