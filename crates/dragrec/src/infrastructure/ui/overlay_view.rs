//! Renders the shell's open overlay in a borderless full-screen viewport.
//!
//! # Coordinates (for beginners)
//!
//! The overlay state machines work in *physical pixels* of the snapshot,
//! because that is what the pointer backends replay.  egui works in
//! *points*; one point is `pixels_per_point` pixels.  Every position crossing
//! this module is converted:
//!
//! - egui events → overlay input: `pixel = point × ppp`
//! - scene shapes → painter calls: `point = pixel ÷ ppp`
//!
//! Stroke widths, marker radii, and label sizes are not converted; they stay
//! the same size in points on every display.
//!
//! The overlays turn these pixels into screen coordinates themselves (see
//! `ScreenArea::to_screen`), so what they emit is what the pointer backend
//! expects on each OS.
//!
//! # One frame
//!
//! 1. Upload the snapshot as a texture the first time a session is seen.
//! 2. Inside the immediate viewport: collect input events and paint the
//!    scene the overlay described.
//! 3. Back on the root viewport: feed the collected input to the shell.  If
//!    that finished the overlay, the shell restores the main window and the
//!    viewport is simply not shown next frame, which closes it.

use dragrec_core::{OverlayInput, Point, PointerButton, Rectangle, Rgba, Scene, Shape};
use eframe::egui::{
    self, pos2, vec2, Align2, Color32, ColorImage, Context, Event, FontId, Key, Painter, Pos2,
    Rect, Stroke, StrokeKind, TextureHandle, TextureOptions, ViewportBuilder, ViewportId,
};
use tracing::debug;
use uuid::Uuid;

use crate::application::capture::Snapshot;
use crate::application::shell::Shell;

/// Label font size in points.
const LABEL_FONT_SIZE: f32 = 14.0;

/// The uploaded snapshot for one overlay session.
pub struct OverlayTexture {
    session: Uuid,
    handle: TextureHandle,
}

/// Shows the open overlay, if any, and routes its input to the shell.
pub fn show(ctx: &Context, shell: &mut Shell, texture: &mut Option<OverlayTexture>) {
    let Some(session) = shell.overlay() else {
        // Frees the GPU texture once the overlay is gone.
        *texture = None;
        return;
    };
    let id = session.id;
    let snapshot = session.snapshot.clone();
    let scene = session.scene();
    let handle = texture_for(ctx, texture, id, &snapshot);

    let viewport_id = ViewportId::from_hash_of(("dragrec-overlay", id));
    let (inputs, close_requested) =
        ctx.show_viewport_immediate(viewport_id, viewport_builder(&snapshot), |ctx, _class| {
            let ppp = ctx.pixels_per_point();
            let inputs: Vec<OverlayInput> = ctx.input(|i| {
                i.events
                    .iter()
                    .filter_map(|event| to_overlay_input(event, ppp))
                    .collect()
            });
            let close_requested = ctx.input(|i| i.viewport().close_requested());

            egui::CentralPanel::default()
                .frame(egui::Frame::NONE)
                .show(ctx, |ui| {
                    paint(ui.painter(), &scene, &handle, &snapshot, ppp);
                });
            (inputs, close_requested)
        });

    let had_input = !inputs.is_empty();
    for input in inputs {
        shell.overlay_input(input);
        if !is_open(shell, id) {
            return;
        }
    }
    if close_requested {
        debug!(%id, "overlay window closed by the system");
        shell.close_overlay();
        return;
    }
    if had_input {
        // The scene changed after this frame was painted.
        ctx.request_repaint_of(viewport_id);
    }
}

fn is_open(shell: &Shell, id: Uuid) -> bool {
    shell.overlay().is_some_and(|s| s.id == id)
}

fn viewport_builder(snapshot: &Snapshot) -> ViewportBuilder {
    let scale = if snapshot.scale_factor > 0.0 {
        snapshot.scale_factor
    } else {
        1.0
    };
    let origin_scale = snapshot.origin_scale();
    ViewportBuilder::default()
        .with_title("dragrec overlay")
        .with_position(pos2(
            snapshot.origin.x as f32 / origin_scale,
            snapshot.origin.y as f32 / origin_scale,
        ))
        .with_inner_size(vec2(
            snapshot.width() as f32 / scale,
            snapshot.height() as f32 / scale,
        ))
        .with_decorations(false)
        .with_always_on_top()
        .with_fullscreen(true)
}

fn texture_for(
    ctx: &Context,
    cache: &mut Option<OverlayTexture>,
    session: Uuid,
    snapshot: &Snapshot,
) -> TextureHandle {
    if let Some(cached) = cache.as_ref().filter(|t| t.session == session) {
        return cached.handle.clone();
    }
    let size = [snapshot.width() as usize, snapshot.height() as usize];
    let image = ColorImage::from_rgba_unmultiplied(size, snapshot.image.as_raw());
    let handle = ctx.load_texture(
        format!("dragrec-snapshot-{session}"),
        image,
        TextureOptions::LINEAR,
    );
    *cache = Some(OverlayTexture {
        session,
        handle: handle.clone(),
    });
    handle
}

// ── Input mapping ─────────────────────────────────────────────────────────────

fn to_overlay_input(event: &Event, ppp: f32) -> Option<OverlayInput> {
    match event {
        Event::PointerButton {
            pos,
            button,
            pressed,
            ..
        } => {
            let button = to_pointer_button(*button)?;
            let at = to_pixels(*pos, ppp);
            Some(if *pressed {
                OverlayInput::Pressed { button, at }
            } else {
                OverlayInput::Released { button, at }
            })
        }
        Event::PointerMoved(pos) => Some(OverlayInput::Moved {
            to: to_pixels(*pos, ppp),
        }),
        Event::Key {
            key: Key::Escape,
            pressed: true,
            repeat: false,
            ..
        } => Some(OverlayInput::Escape),
        _ => None,
    }
}

fn to_pointer_button(button: egui::PointerButton) -> Option<PointerButton> {
    match button {
        egui::PointerButton::Primary => Some(PointerButton::Primary),
        egui::PointerButton::Secondary => Some(PointerButton::Secondary),
        egui::PointerButton::Middle => Some(PointerButton::Middle),
        egui::PointerButton::Extra1 | egui::PointerButton::Extra2 => None,
    }
}

fn to_pixels(pos: Pos2, ppp: f32) -> Point {
    Point::new((pos.x * ppp).round() as i32, (pos.y * ppp).round() as i32)
}

// ── Painting ──────────────────────────────────────────────────────────────────

fn paint(painter: &Painter, scene: &Scene, texture: &TextureHandle, snapshot: &Snapshot, ppp: f32) {
    let image_size = (snapshot.width(), snapshot.height());
    for shape in &scene.shapes {
        match shape {
            Shape::Snapshot { source, dest } => {
                painter.image(
                    texture.id(),
                    to_rect(*dest, ppp),
                    uv_rect(*source, image_size),
                    Color32::WHITE,
                );
            }
            Shape::Fill { rect, color } => {
                painter.rect_filled(to_rect(*rect, ppp), 0.0, to_color(*color));
            }
            Shape::Outline { rect, color, width } => {
                painter.rect_stroke(
                    to_rect(*rect, ppp),
                    0.0,
                    Stroke::new(*width, to_color(*color)),
                    StrokeKind::Inside,
                );
            }
            Shape::Line {
                from,
                to,
                color,
                width,
            } => {
                painter.line_segment(
                    [to_points(*from, ppp), to_points(*to, ppp)],
                    Stroke::new(*width, to_color(*color)),
                );
            }
            Shape::Marker {
                center,
                radius,
                color,
            } => {
                painter.circle_filled(to_points(*center, ppp), *radius, to_color(*color));
            }
            Shape::Label {
                anchor,
                text,
                color,
            } => {
                painter.text(
                    to_points(*anchor, ppp),
                    Align2::LEFT_BOTTOM,
                    text,
                    FontId::proportional(LABEL_FONT_SIZE),
                    to_color(*color),
                );
            }
        }
    }
}

fn to_points(p: Point, ppp: f32) -> Pos2 {
    pos2(p.x as f32 / ppp, p.y as f32 / ppp)
}

fn to_rect(r: Rectangle, ppp: f32) -> Rect {
    Rect::from_min_size(
        to_points(r.origin(), ppp),
        vec2(r.width as f32 / ppp, r.height as f32 / ppp),
    )
}

/// Normalised texture coordinates of `source` inside a `(w, h)` image.
fn uv_rect(source: Rectangle, (w, h): (u32, u32)) -> Rect {
    let (w, h) = (w.max(1) as f32, h.max(1) as f32);
    Rect::from_min_max(
        pos2(source.x as f32 / w, source.y as f32 / h),
        pos2(
            (source.x as f32 + source.width as f32) / w,
            (source.y as f32 + source.height as f32) / h,
        ),
    )
}

fn to_color(c: Rgba) -> Color32 {
    Color32::from_rgba_unmultiplied(c.r, c.g, c.b, c.a)
}
