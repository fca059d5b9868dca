//! eframe desktop front end.
//!
//! [`DragrecApp`] is a thin view over the [`Shell`]: it forwards button
//! clicks, calls [`Shell::tick`] every frame, asks for confirmation before a
//! replay, and renders the open overlay through [`overlay_view`].  All
//! decisions live in the shell so they can be tested without a window.
//!
//! # Sub-modules
//!
//! | Module         | Responsibility                                      |
//! |----------------|-----------------------------------------------------|
//! | `overlay_view` | full-screen viewport, scene painting, input mapping |
//! | `window`       | `WindowControl` via root viewport commands          |

pub mod overlay_view;
pub mod window;

use std::sync::Arc;
use std::time::{Duration, Instant};

use dragrec_core::Trajectory;
use eframe::egui;
use tracing::{debug, info};

use crate::application::capture::ScreenCapturer;
use crate::application::replay::{PointerBackend, ReplayTiming};
use crate::application::shell::{CaptureKind, SettingsRepository, Shell, ShellOptions};
use overlay_view::OverlayTexture;
use window::EguiWindowControl;

/// How often the event loop wakes while a countdown or delay is pending.
const TICK_INTERVAL: Duration = Duration::from_millis(50);

/// Everything the GUI needs to build its [`Shell`].
pub struct GuiParts {
    pub settings: Box<dyn SettingsRepository>,
    pub capturer: Arc<dyn ScreenCapturer>,
    pub backend: Arc<dyn PointerBackend>,
    pub timing: ReplayTiming,
    pub options: ShellOptions,
}

/// The eframe application.
pub struct DragrecApp {
    shell: Shell,
    overlay_texture: Option<OverlayTexture>,
    /// Track awaiting the user's yes/no before the countdown starts.
    pending_confirm: Option<Trajectory>,
}

impl DragrecApp {
    pub fn new(ctx: &egui::Context, parts: GuiParts) -> Self {
        let shell = Shell::new(
            Box::new(EguiWindowControl::new(ctx.clone())),
            parts.settings,
            parts.capturer,
            parts.backend,
            parts.timing,
            parts.options,
        );
        Self {
            shell,
            overlay_texture: None,
            pending_confirm: None,
        }
    }

    fn controls(&mut self, ui: &mut egui::Ui, now: Instant) {
        let idle = self.shell.is_idle() && self.pending_confirm.is_none();
        ui.horizontal(|ui| {
            if ui.add_enabled(idle, egui::Button::new("Select area")).clicked() {
                self.capture(CaptureKind::Region, now);
            }
            if ui
                .add_enabled(idle, egui::Button::new("Record mouse track"))
                .clicked()
            {
                self.capture(CaptureKind::Trajectory, now);
            }
            if ui
                .add_enabled(idle, egui::Button::new("Replay mouse track"))
                .clicked()
            {
                match self.shell.request_replay() {
                    Ok(track) => self.pending_confirm = Some(track),
                    Err(e) => debug!("replay not started: {e}"),
                }
            }
        });
    }

    fn capture(&mut self, kind: CaptureKind, now: Instant) {
        if let Err(e) = self.shell.begin_capture(kind, now) {
            debug!(?kind, "capture not started: {e}");
        }
    }

    fn confirm_dialog(&mut self, ctx: &egui::Context, now: Instant) {
        let Some(track) = self.pending_confirm else {
            return;
        };
        let mut answer = None;
        egui::Window::new("Replay mouse track")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(format!("Start: {}", track.start()));
                ui.label(format!("End: {}", track.end()));
                ui.label("The pointer will press at the start and release at the end.");
                ui.horizontal(|ui| {
                    if ui.button("Replay").clicked() {
                        answer = Some(true);
                    }
                    if ui.button("Cancel").clicked() {
                        answer = Some(false);
                    }
                });
            });

        match answer {
            Some(true) => {
                self.pending_confirm = None;
                if let Err(e) = self.shell.confirm_replay(track, now) {
                    debug!("replay not started: {e}");
                }
            }
            Some(false) => {
                info!("replay cancelled by user");
                self.pending_confirm = None;
            }
            None => {}
        }
    }
}

impl eframe::App for DragrecApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        self.shell.tick(now);

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("dragrec");
            ui.add_space(8.0);
            self.controls(ui, now);
            ui.add_space(8.0);
            ui.separator();
            ui.label(self.shell.status_line());
        });
        self.confirm_dialog(ctx, now);

        overlay_view::show(ctx, &mut self.shell, &mut self.overlay_texture);

        if self.shell.needs_ticks() {
            ctx.request_repaint_after(TICK_INTERVAL);
        }
    }
}

/// Opens the main window and blocks until it is closed.
///
/// # Errors
///
/// Returns the eframe error if no window or graphics context can be created.
pub fn run(parts: GuiParts) -> eframe::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("dragrec")
            .with_inner_size([520.0, 160.0])
            .with_min_inner_size([360.0, 120.0]),
        ..Default::default()
    };
    eframe::run_native(
        "dragrec",
        options,
        Box::new(move |cc| Ok(Box::new(DragrecApp::new(&cc.egui_ctx, parts)))),
    )
}
