//! [`WindowControl`] for the eframe root window.
//!
//! "Hide" is a minimise: eframe keeps calling `update` for a minimised root
//! window, which the shell needs to run its hide delay and open the overlay
//! viewport.  A window made invisible may stop receiving frames.

use eframe::egui::{Context, ViewportCommand, ViewportId};
use tracing::debug;

use crate::application::shell::WindowControl;

/// Sends viewport commands to the root window.
pub struct EguiWindowControl {
    ctx: Context,
}

impl EguiWindowControl {
    pub fn new(ctx: Context) -> Self {
        Self { ctx }
    }

    fn send(&self, command: ViewportCommand) {
        debug!(?command, "root window command");
        self.ctx.send_viewport_cmd_to(ViewportId::ROOT, command);
    }
}

impl WindowControl for EguiWindowControl {
    fn hide(&mut self) {
        self.send(ViewportCommand::Minimized(true));
    }

    fn minimize(&mut self) {
        self.send(ViewportCommand::Minimized(true));
    }

    fn restore(&mut self) {
        self.send(ViewportCommand::Visible(true));
        self.send(ViewportCommand::Minimized(false));
        self.send(ViewportCommand::Focus);
        self.ctx.request_repaint();
    }
}
