//! Shell: the controller behind the main window.
//!
//! The shell owns the settings repository, the screen capturer, the replay
//! executor, and whichever overlay is currently open.  The GUI layer calls it
//! from the event loop:
//!
//! - button clicks → [`Shell::begin_capture`], [`Shell::request_replay`],
//!   [`Shell::confirm_replay`]
//! - overlay pointer/key events → [`Shell::overlay_input`]
//! - the overlay window being closed by the system → [`Shell::close_overlay`]
//! - every frame → [`Shell::tick`]
//!
//! and reads back [`Shell::status_line`] and [`Shell::overlay`] to render.
//!
//! # Event flow (for beginners)
//!
//! Overlays and the replay worker never call into the shell directly.  They
//! push [`ShellEvent`]s into an `mpsc` channel that the shell drains in
//! [`Shell::pump`].  For overlays this happens right after the input that
//! finished them, so the result is saved and the window restored in the
//! same frame.  For replays the worker thread sends the outcome and the next
//! `tick` picks it up on the event-loop thread.
//!
//! ```text
//!  click "Select area"
//!    └─ hide window ── hide_delay ── capture ── open RegionSelector
//!                                                  │ drag + release
//!                                                  ├─ AreaSelected  → save, status
//!                                                  └─ OverlayClosed → restore window
//!
//!  click "Replay" → confirm → countdown 3..2..1 → minimise → ReplayExecutor
//!                                                  └─ ReplayFinished → restore, status
//! ```

use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::time::{Duration, Instant};

use dragrec_core::{
    CloseReason, Overlay, OverlayInput, OverlayStatus, Rectangle, RegionSelector, Scene,
    SettingsRecord, Trajectory, TrajectoryRecorder,
};
use thiserror::Error;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::capture::{ScreenCapturer, Snapshot};
use super::replay::{OutcomeReporter, PointerBackend, ReplayExecutor, ReplayOutcome, ReplayTiming};

// ── Errors ────────────────────────────────────────────────────────────────────

/// Error type for settings persistence.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("I/O error accessing settings at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("settings at {path} are not valid: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize settings: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Why the shell refused a request.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShellError {
    #[error("another capture or replay is in progress")]
    Busy,

    #[error("no mouse track recorded yet")]
    NoTrack,
}

// ── Collaborator traits ───────────────────────────────────────────────────────

/// Visibility control over the shell's own window.
#[cfg_attr(test, mockall::automock)]
pub trait WindowControl {
    /// Gets the window out of the way before a screen capture.
    fn hide(&mut self);
    /// Minimises the window before a replay.
    fn minimize(&mut self);
    /// Brings the window back, un-minimised and focused.
    fn restore(&mut self);
}

/// Where the last area and trajectory are kept between runs.
#[cfg_attr(test, mockall::automock)]
pub trait SettingsRepository {
    /// The current record (defaults when nothing was ever saved).
    fn record(&self) -> SettingsRecord;

    /// Replaces the saved area and persists the whole record.
    ///
    /// The in-memory record is updated even if persisting fails.
    fn save_area(&mut self, area: Rectangle) -> Result<(), SettingsError>;

    /// Replaces the saved trajectory and persists the whole record.
    fn save_track(&mut self, track: Trajectory) -> Result<(), SettingsError>;
}

// ── Shell state ───────────────────────────────────────────────────────────────

/// Timing knobs for the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShellOptions {
    /// Wait between hiding the window and taking the snapshot.
    pub hide_delay: Duration,
    /// Seconds of countdown between confirming a replay and starting it.
    pub countdown_secs: u32,
    /// How long the drag itself takes.
    pub replay_duration: Duration,
}

impl Default for ShellOptions {
    fn default() -> Self {
        Self {
            hide_delay: Duration::from_millis(100),
            countdown_secs: 3,
            replay_duration: Duration::from_millis(500),
        }
    }
}

/// Which overlay a capture opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureKind {
    Region,
    Trajectory,
}

/// Notifications delivered to the shell through its channel.
#[derive(Debug, Clone, PartialEq)]
pub enum ShellEvent {
    AreaSelected(Rectangle),
    TrackRecorded(Trajectory),
    OverlayClosed(CloseReason),
    ReplayFinished(ReplayOutcome),
}

/// The open overlay.
pub enum ActiveOverlay {
    Region(RegionSelector),
    Trajectory(TrajectoryRecorder),
}

/// One overlay activation: the overlay, its frozen snapshot, and an id the
/// GUI uses to key its window and texture.
pub struct OverlaySession {
    pub id: Uuid,
    pub snapshot: Snapshot,
    pub overlay: ActiveOverlay,
}

impl OverlaySession {
    pub fn kind(&self) -> CaptureKind {
        match self.overlay {
            ActiveOverlay::Region(_) => CaptureKind::Region,
            ActiveOverlay::Trajectory(_) => CaptureKind::Trajectory,
        }
    }

    pub fn scene(&self) -> Scene {
        match &self.overlay {
            ActiveOverlay::Region(o) => o.scene(),
            ActiveOverlay::Trajectory(o) => o.scene(),
        }
    }

    fn handle_input(&mut self, input: OverlayInput) -> OverlayStatus {
        match &mut self.overlay {
            ActiveOverlay::Region(o) => o.handle_input(input),
            ActiveOverlay::Trajectory(o) => o.handle_input(input),
        }
    }

    fn request_close(&mut self) {
        match &mut self.overlay {
            ActiveOverlay::Region(o) => o.request_close(),
            ActiveOverlay::Trajectory(o) => o.request_close(),
        }
    }
}

enum Phase {
    Idle,
    PendingCapture {
        kind: CaptureKind,
        due: Instant,
    },
    Overlay(OverlaySession),
    Countdown {
        track: Trajectory,
        remaining: u32,
        next_tick: Instant,
    },
    Replaying,
}

/// The application controller.
pub struct Shell {
    window: Box<dyn WindowControl>,
    settings: Box<dyn SettingsRepository>,
    capturer: Arc<dyn ScreenCapturer>,
    executor: ReplayExecutor,
    options: ShellOptions,
    phase: Phase,
    status: String,
    events_tx: Sender<ShellEvent>,
    events_rx: Receiver<ShellEvent>,
}

impl Shell {
    pub fn new(
        window: Box<dyn WindowControl>,
        settings: Box<dyn SettingsRepository>,
        capturer: Arc<dyn ScreenCapturer>,
        backend: Arc<dyn PointerBackend>,
        timing: ReplayTiming,
        options: ShellOptions,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::channel();

        let tx = events_tx.clone();
        let reporter: OutcomeReporter = Arc::new(move |outcome| {
            if tx.send(ShellEvent::ReplayFinished(outcome)).is_err() {
                debug!("shell dropped before replay finished; outcome discarded");
            }
        });
        let executor = ReplayExecutor::new(backend, timing, reporter);
        let status = startup_status(&settings.record());

        Self {
            window,
            settings,
            capturer,
            executor,
            options,
            phase: Phase::Idle,
            status,
            events_tx,
            events_rx,
        }
    }

    pub fn status_line(&self) -> &str {
        &self.status
    }

    /// The open overlay, if any.
    pub fn overlay(&self) -> Option<&OverlaySession> {
        match &self.phase {
            Phase::Overlay(session) => Some(session),
            _ => None,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.phase, Phase::Idle)
    }

    /// `true` while something time-driven is pending and `tick` must keep
    /// being called even without user input.
    pub fn needs_ticks(&self) -> bool {
        matches!(
            self.phase,
            Phase::PendingCapture { .. } | Phase::Countdown { .. } | Phase::Replaying
        )
    }

    pub fn settings(&self) -> SettingsRecord {
        self.settings.record()
    }

    /// Hides the window and schedules a snapshot for `now + hide_delay`.
    ///
    /// # Errors
    ///
    /// [`ShellError::Busy`] if an overlay, countdown, or replay is active.
    pub fn begin_capture(&mut self, kind: CaptureKind, now: Instant) -> Result<(), ShellError> {
        if !self.is_idle() {
            warn!(?kind, "capture requested while busy");
            return Err(ShellError::Busy);
        }
        info!(?kind, "starting capture; hiding window");
        self.window.hide();
        self.phase = Phase::PendingCapture {
            kind,
            due: now + self.options.hide_delay,
        };
        Ok(())
    }

    /// Advances time-driven work and drains pending events.
    pub fn tick(&mut self, now: Instant) {
        self.pump();

        let due_capture = match self.phase {
            Phase::PendingCapture { kind, due } if now >= due => Some(kind),
            _ => None,
        };
        if let Some(kind) = due_capture {
            self.open_overlay(kind);
        }

        if let Phase::Countdown {
            track,
            remaining,
            next_tick,
        } = &mut self.phase
        {
            if now >= *next_tick {
                *remaining = remaining.saturating_sub(1);
                if *remaining == 0 {
                    let track = *track;
                    self.start_replay(track);
                } else {
                    *next_tick += Duration::from_secs(1);
                    self.status = countdown_text(*remaining);
                }
            }
        }
    }

    /// Feeds one input event to the open overlay.
    pub fn overlay_input(&mut self, input: OverlayInput) {
        let Phase::Overlay(session) = &mut self.phase else {
            return;
        };
        if session.handle_input(input) == OverlayStatus::Finished {
            // Notifications are already queued; tear down, then deliver.
            self.phase = Phase::Idle;
        }
        self.pump();
    }

    /// Closes the open overlay from outside (e.g. its window was closed).
    pub fn close_overlay(&mut self) {
        if let Phase::Overlay(session) = &mut self.phase {
            session.request_close();
            self.phase = Phase::Idle;
        }
        self.pump();
    }

    /// Checks that a replay can run and returns the saved trajectory.
    ///
    /// The GUI asks the user for confirmation and then calls
    /// [`Shell::confirm_replay`].
    ///
    /// # Errors
    ///
    /// [`ShellError::NoTrack`] when nothing has been recorded (the status
    /// line says so), [`ShellError::Busy`] when something else is running.
    pub fn request_replay(&mut self) -> Result<Trajectory, ShellError> {
        if !self.is_idle() {
            return Err(ShellError::Busy);
        }
        let track = self.settings.record().mouse_track;
        if track.is_unset() {
            warn!("replay requested without a recorded track");
            self.status = "No mouse track recorded yet; record one first".to_string();
            return Err(ShellError::NoTrack);
        }
        Ok(track)
    }

    /// Starts the countdown that ends in a replay of `track`.
    ///
    /// # Errors
    ///
    /// [`ShellError::Busy`] when something else is running.
    pub fn confirm_replay(&mut self, track: Trajectory, now: Instant) -> Result<(), ShellError> {
        if !self.is_idle() {
            return Err(ShellError::Busy);
        }
        if self.options.countdown_secs == 0 {
            self.start_replay(track);
        } else {
            info!(secs = self.options.countdown_secs, "replay countdown started");
            self.status = countdown_text(self.options.countdown_secs);
            self.phase = Phase::Countdown {
                track,
                remaining: self.options.countdown_secs,
                next_tick: now + Duration::from_secs(1),
            };
        }
        Ok(())
    }

    /// Handles every queued [`ShellEvent`].
    pub fn pump(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            self.handle_event(event);
        }
    }

    // ── Internals ─────────────────────────────────────────────────────────────

    fn open_overlay(&mut self, kind: CaptureKind) {
        let snapshot = match self.capturer.capture_primary() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                error!("screen capture failed: {e}");
                self.phase = Phase::Idle;
                self.window.restore();
                self.status = format!("Screen capture failed: {e}");
                return;
            }
        };

        let area = snapshot.area();
        let overlay = match kind {
            CaptureKind::Region => {
                let mut o = RegionSelector::new(area);
                wire(&mut o, &self.events_tx, |r| ShellEvent::AreaSelected(*r));
                ActiveOverlay::Region(o)
            }
            CaptureKind::Trajectory => {
                let mut o = TrajectoryRecorder::new(area);
                wire(&mut o, &self.events_tx, |t| ShellEvent::TrackRecorded(*t));
                ActiveOverlay::Trajectory(o)
            }
        };
        let id = Uuid::new_v4();
        info!(?kind, %id, ?snapshot, "overlay opened");
        self.phase = Phase::Overlay(OverlaySession {
            id,
            snapshot,
            overlay,
        });
    }

    fn start_replay(&mut self, track: Trajectory) {
        self.status = "Replaying mouse track...".to_string();
        self.phase = Phase::Replaying;
        self.window.minimize();
        // Rejections are reported through the channel like any other outcome.
        let _ = self.executor.execute(track, self.options.replay_duration);
    }

    fn handle_event(&mut self, event: ShellEvent) {
        match event {
            ShellEvent::AreaSelected(area) => {
                if let Err(e) = self.settings.save_area(area) {
                    error!("could not save selected area: {e}");
                }
                self.status = format!("Selected area: {area}");
            }
            ShellEvent::TrackRecorded(track) => {
                if let Err(e) = self.settings.save_track(track) {
                    error!("could not save mouse track: {e}");
                }
                let message = format!("Mouse track: {track}");
                self.status = join_after(&self.status, "Selected area", &message);
            }
            ShellEvent::OverlayClosed(reason) => {
                debug!(?reason, "overlay closed; restoring window");
                self.window.restore();
            }
            ShellEvent::ReplayFinished(outcome) => {
                if matches!(self.phase, Phase::Replaying) {
                    self.phase = Phase::Idle;
                }
                info!(success = outcome.success, "replay outcome: {}", outcome.message);
                self.window.restore();
                self.status = outcome.message;
            }
        }
    }
}

/// Forwards an overlay's two channels into the shell's event queue.
fn wire<O>(overlay: &mut O, tx: &Sender<ShellEvent>, to_event: fn(&O::Output) -> ShellEvent)
where
    O: Overlay,
    O::Output: 'static,
{
    let result_tx = tx.clone();
    overlay.signals().on_result_ready(move |value| {
        let _ = result_tx.send(to_event(value));
    });
    let close_tx = tx.clone();
    overlay.signals().on_closed(move |reason| {
        let _ = close_tx.send(ShellEvent::OverlayClosed(*reason));
    });
}

/// The status line shown at startup.
fn startup_status(record: &SettingsRecord) -> String {
    let area = if record.has_area() {
        format!("Last selected area: {}", record.selected_area)
    } else {
        "No area selected yet".to_string()
    };
    if record.has_track() {
        let track = format!("Last mouse track: {}", record.mouse_track);
        join_after(&area, "Last selected area", &track)
    } else {
        area
    }
}

/// Appends `message` with a `" | "` separator when `current` starts with
/// `prefix`; otherwise `message` replaces it.
fn join_after(current: &str, prefix: &str, message: &str) -> String {
    if current.starts_with(prefix) {
        format!("{current} | {message}")
    } else {
        message.to_string()
    }
}

fn countdown_text(secs: u32) -> String {
    format!("Replay starts in {secs}s...")
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::pointer::mock::MockPointerBackend;
    use crate::infrastructure::screen_capture::mock::MockScreenCapturer;
    use dragrec_core::{Point, PointerButton};

    fn record(area: Rectangle, track: Trajectory) -> SettingsRecord {
        SettingsRecord {
            selected_area: area,
            mouse_track: track,
            ..Default::default()
        }
    }

    fn quiet_window() -> MockWindowControl {
        let mut window = MockWindowControl::new();
        window.expect_hide().return_const(());
        window.expect_minimize().return_const(());
        window.expect_restore().return_const(());
        window
    }

    fn settings_with(rec: SettingsRecord) -> MockSettingsRepository {
        let mut settings = MockSettingsRepository::new();
        settings.expect_record().return_const(rec);
        settings
    }

    fn shell(window: MockWindowControl, settings: MockSettingsRepository) -> Shell {
        shell_with_capturer(window, settings, MockScreenCapturer::new(800, 600))
    }

    fn shell_with_capturer(
        window: MockWindowControl,
        settings: MockSettingsRepository,
        capturer: MockScreenCapturer,
    ) -> Shell {
        Shell::new(
            Box::new(window),
            Box::new(settings),
            Arc::new(capturer),
            Arc::new(MockPointerBackend::new()),
            ReplayTiming::immediate(),
            ShellOptions {
                hide_delay: Duration::from_millis(100),
                countdown_secs: 3,
                replay_duration: Duration::ZERO,
            },
        )
    }

    fn press(x: i32, y: i32) -> OverlayInput {
        OverlayInput::Pressed {
            button: PointerButton::Primary,
            at: Point::new(x, y),
        }
    }

    fn release(x: i32, y: i32) -> OverlayInput {
        OverlayInput::Released {
            button: PointerButton::Primary,
            at: Point::new(x, y),
        }
    }

    /// Opens an overlay of `kind` and returns the instant it opened at.
    fn open(shell: &mut Shell, kind: CaptureKind) -> Instant {
        let t0 = Instant::now();
        shell.begin_capture(kind, t0).unwrap();
        let opened = t0 + Duration::from_millis(100);
        shell.tick(opened);
        opened
    }

    // ── Status line ───────────────────────────────────────────────────────────

    #[test]
    fn test_startup_status_without_saved_data() {
        let shell = shell(quiet_window(), settings_with(SettingsRecord::default()));
        assert_eq!(shell.status_line(), "No area selected yet");
    }

    #[test]
    fn test_startup_status_with_area_and_track() {
        let rec = record(
            Rectangle::new(10, 20, 300, 150),
            Trajectory::new(Point::new(5, 5), Point::new(400, 300)),
        );
        let shell = shell(quiet_window(), settings_with(rec));
        assert_eq!(
            shell.status_line(),
            "Last selected area: x=10, y=20, width=300, height=150 | \
             Last mouse track: from (5, 5) to (400, 300)"
        );
    }

    #[test]
    fn test_startup_status_with_track_only() {
        let rec = record(
            Rectangle::default(),
            Trajectory::new(Point::new(1, 2), Point::new(3, 4)),
        );
        let shell = shell(quiet_window(), settings_with(rec));
        assert_eq!(shell.status_line(), "Last mouse track: from (1, 2) to (3, 4)");
    }

    // ── Capture flow ──────────────────────────────────────────────────────────

    #[test]
    fn test_capture_waits_for_hide_delay() {
        // Arrange
        let mut window = MockWindowControl::new();
        window.expect_hide().times(1).return_const(());
        let mut shell = shell(window, settings_with(SettingsRecord::default()));
        let t0 = Instant::now();

        // Act
        shell.begin_capture(CaptureKind::Region, t0).unwrap();
        shell.tick(t0 + Duration::from_millis(50));

        // Assert
        assert!(shell.overlay().is_none());
        shell.tick(t0 + Duration::from_millis(100));
        assert_eq!(shell.overlay().map(|s| s.kind()), Some(CaptureKind::Region));
    }

    #[test]
    fn test_region_selection_saves_and_restores_window() {
        // Arrange
        let mut window = MockWindowControl::new();
        window.expect_hide().times(1).return_const(());
        window.expect_restore().times(1).return_const(());
        let mut settings = settings_with(SettingsRecord::default());
        settings
            .expect_save_area()
            .withf(|r| *r == Rectangle::new(10, 20, 300, 150))
            .times(1)
            .returning(|_| Ok(()));
        let mut shell = shell(window, settings);
        open(&mut shell, CaptureKind::Region);

        // Act
        shell.overlay_input(press(10, 20));
        shell.overlay_input(release(310, 170));

        // Assert
        assert!(shell.overlay().is_none());
        assert!(shell.is_idle());
        assert_eq!(
            shell.status_line(),
            "Selected area: x=10, y=20, width=300, height=150"
        );
    }

    #[test]
    fn test_track_status_is_appended_to_selected_area() {
        let mut settings = settings_with(SettingsRecord::default());
        settings.expect_save_area().returning(|_| Ok(()));
        settings.expect_save_track().times(1).returning(|_| Ok(()));
        let mut shell = shell(quiet_window(), settings);

        open(&mut shell, CaptureKind::Region);
        shell.overlay_input(press(0, 0));
        shell.overlay_input(release(50, 40));
        open(&mut shell, CaptureKind::Trajectory);
        shell.overlay_input(press(5, 5));
        shell.overlay_input(release(400, 300));

        assert_eq!(
            shell.status_line(),
            "Selected area: x=0, y=0, width=50, height=40 | \
             Mouse track: from (5, 5) to (400, 300)"
        );
    }

    #[test]
    fn test_track_on_point_addressed_display_is_saved_in_points() {
        // Arrange: a 2x display whose pointer is addressed in points.
        let mut settings = settings_with(SettingsRecord::default());
        settings
            .expect_save_track()
            .withf(|t| *t == Trajectory::new(Point::new(400, 300), Point::new(600, 450)))
            .times(1)
            .returning(|_| Ok(()));
        let capturer = MockScreenCapturer::new(1600, 1200).with_pixels_per_unit(2.0);
        let mut shell = shell_with_capturer(quiet_window(), settings, capturer);
        open(&mut shell, CaptureKind::Trajectory);

        // Act: overlay input arrives in snapshot pixels.
        shell.overlay_input(press(800, 600));
        shell.overlay_input(release(1200, 900));

        // Assert
        assert_eq!(
            shell.status_line(),
            "Mouse track: from (400, 300) to (600, 450)"
        );
    }

    #[test]
    fn test_cancelled_overlay_restores_without_saving() {
        // Arrange: no save expectations, so any save call fails the test.
        let mut window = MockWindowControl::new();
        window.expect_hide().times(1).return_const(());
        window.expect_restore().times(1).return_const(());
        let mut shell = shell(window, settings_with(SettingsRecord::default()));
        open(&mut shell, CaptureKind::Trajectory);

        // Act
        shell.overlay_input(OverlayInput::Escape);

        // Assert
        assert!(shell.is_idle());
        assert_eq!(shell.status_line(), "No area selected yet");
    }

    #[test]
    fn test_external_close_restores_window_once() {
        let mut window = MockWindowControl::new();
        window.expect_hide().return_const(());
        window.expect_restore().times(1).return_const(());
        let mut shell = shell(window, settings_with(SettingsRecord::default()));
        open(&mut shell, CaptureKind::Region);

        shell.close_overlay();
        shell.close_overlay();

        assert!(shell.overlay().is_none());
    }

    #[test]
    fn test_capture_failure_restores_and_reports() {
        // Arrange
        let mut window = MockWindowControl::new();
        window.expect_hide().times(1).return_const(());
        window.expect_restore().times(1).return_const(());
        let mut shell = shell_with_capturer(
            window,
            settings_with(SettingsRecord::default()),
            MockScreenCapturer::failing(),
        );

        // Act
        open(&mut shell, CaptureKind::Region);

        // Assert
        assert!(shell.overlay().is_none());
        assert!(shell.is_idle());
        assert!(shell.status_line().starts_with("Screen capture failed"));
    }

    #[test]
    fn test_second_capture_while_overlay_open_is_refused() {
        let mut shell = shell(quiet_window(), settings_with(SettingsRecord::default()));
        open(&mut shell, CaptureKind::Region);

        let result = shell.begin_capture(CaptureKind::Trajectory, Instant::now());

        assert_eq!(result, Err(ShellError::Busy));
    }

    #[test]
    fn test_save_failure_still_updates_status() {
        let mut settings = settings_with(SettingsRecord::default());
        settings.expect_save_area().returning(|_| {
            Err(SettingsError::Io {
                path: PathBuf::from("/read-only/settings.json"),
                source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
            })
        });
        let mut shell = shell(quiet_window(), settings);
        open(&mut shell, CaptureKind::Region);

        shell.overlay_input(press(1, 1));
        shell.overlay_input(release(11, 11));

        assert!(shell.status_line().starts_with("Selected area"));
    }

    // ── Replay flow ───────────────────────────────────────────────────────────

    #[test]
    fn test_replay_without_track_is_refused() {
        let mut shell = shell(quiet_window(), settings_with(SettingsRecord::default()));

        let result = shell.request_replay();

        assert_eq!(result, Err(ShellError::NoTrack));
        assert!(shell.status_line().starts_with("No mouse track recorded yet"));
    }

    #[test]
    fn test_countdown_then_replay_then_restore() {
        // Arrange
        let track = Trajectory::new(Point::new(5, 5), Point::new(40, 30));
        let mut window = MockWindowControl::new();
        window.expect_minimize().times(1).return_const(());
        window.expect_restore().times(1).return_const(());
        let mut shell = shell(window, settings_with(record(Rectangle::default(), track)));
        let t0 = Instant::now();

        // Act / Assert: countdown
        let confirmed = shell.request_replay().unwrap();
        shell.confirm_replay(confirmed, t0).unwrap();
        assert_eq!(shell.status_line(), "Replay starts in 3s...");
        shell.tick(t0 + Duration::from_secs(1));
        assert_eq!(shell.status_line(), "Replay starts in 2s...");
        shell.tick(t0 + Duration::from_secs(2));
        assert_eq!(shell.status_line(), "Replay starts in 1s...");
        shell.tick(t0 + Duration::from_secs(3));
        assert!(shell.needs_ticks());

        // Act / Assert: outcome arrives from the worker thread
        let deadline = Instant::now() + Duration::from_secs(5);
        while !shell.is_idle() && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(5));
            shell.tick(Instant::now());
        }
        assert!(shell.is_idle());
        assert_eq!(shell.status_line(), "Mouse track replay finished");
    }

    #[test]
    fn test_capture_refused_during_countdown() {
        let track = Trajectory::new(Point::new(5, 5), Point::new(40, 30));
        let mut shell = shell(quiet_window(), settings_with(record(Rectangle::default(), track)));
        shell.confirm_replay(track, Instant::now()).unwrap();

        assert_eq!(
            shell.begin_capture(CaptureKind::Region, Instant::now()),
            Err(ShellError::Busy)
        );
    }

    #[test]
    fn test_join_after_replaces_unrelated_status() {
        assert_eq!(join_after("Screen capture failed", "Selected area", "x"), "x");
        assert_eq!(join_after("Selected area: a", "Selected area", "b"), "Selected area: a | b");
    }
}
