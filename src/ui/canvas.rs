// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Drawing canvas.
//!
//! This module paints the background image, the committed strokes and the
//! stroke being drawn, and turns pointer drags into canvas actions.

use crate::models::session::SketchSession;
use crate::models::sketch::{Point, Stroke, StrokeKind};
use crate::util::geometry;

/// Result of canvas interaction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CanvasAction {
    PointerDown(Point),
    PointerMove(Point),
    PointerUp,
}

/// Textures prepared by the app for the current frame.
pub struct CanvasLayers<'a> {
    pub background: Option<&'a egui::TextureHandle>,
    /// Stroke layer, possibly larger than the canvas
    pub strokes: Option<&'a egui::TextureHandle>,
}

const FULL_UV: egui::Rect = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));

/// Display the canvas in `rect` and collect pointer input.
pub fn show(
    ui: &mut egui::Ui,
    rect: egui::Rect,
    session: &SketchSession,
    layers: CanvasLayers<'_>,
    interactive: bool,
) -> Vec<CanvasAction> {
    let mut actions = Vec::new();
    let sense = if interactive {
        egui::Sense::drag()
    } else {
        egui::Sense::hover()
    };
    let response = ui.allocate_rect(rect, sense);
    let painter = ui.painter_at(rect);
    let accent = egui::Color32::from(session.stroke_color());

    // Transparent canvas over a neutral backdrop
    painter.rect_filled(rect, 12.0, egui::Color32::from_gray(40));

    if let Some(texture) = layers.background {
        painter.image(texture.id(), rect, FULL_UV, egui::Color32::WHITE);
    }
    if let Some(texture) = layers.strokes {
        // Drawn at native resolution from the canvas origin, clipped to the canvas
        let size = texture.size_vec2() / ui.ctx().pixels_per_point();
        let strokes_rect = egui::Rect::from_min_size(rect.min, size);
        painter.image(texture.id(), strokes_rect, FULL_UV, egui::Color32::WHITE);
    }
    if let Some(stroke) = session.canvas().in_progress() {
        draw_live_stroke(&painter, stroke, rect);
    }

    painter.rect_stroke(rect, 12.0, egui::Stroke::new(1.0, accent));

    if interactive {
        if let Some(pos) = response.interact_pointer_pos() {
            let point = geometry::to_canvas_point(pos, rect);
            if response.drag_started() {
                actions.push(CanvasAction::PointerDown(point));
            } else if response.dragged() {
                actions.push(CanvasAction::PointerMove(point));
            }
        }
        if response.drag_stopped() {
            actions.push(CanvasAction::PointerUp);
        }

        // Brush outline under the cursor
        if let Some(hover) = response.hover_pos() {
            let radius = session.active_width() / 2.0;
            let outline = if session.erase_mode() {
                egui::Color32::from_gray(200)
            } else {
                accent
            };
            painter.circle_stroke(hover, radius.max(1.0), egui::Stroke::new(1.0, outline));
        }
    }

    actions
}

/// Paint the unfinished stroke directly; it joins the stroke texture on commit.
fn draw_live_stroke(painter: &egui::Painter, stroke: &Stroke, rect: egui::Rect) {
    let color = match stroke.kind {
        StrokeKind::Pen => egui::Color32::from(stroke.color),
        StrokeKind::Erase => egui::Color32::from_white_alpha(60),
    };
    let points: Vec<egui::Pos2> = stroke
        .points
        .iter()
        .map(|p| geometry::to_screen_pos(p, rect))
        .collect();

    let radius = stroke.width / 2.0;
    if let (Some(first), Some(last)) = (points.first(), points.last()) {
        // Round caps
        painter.circle_filled(*first, radius, color);
        painter.circle_filled(*last, radius, color);
    }
    if points.len() > 1 {
        painter.add(egui::Shape::line(points, egui::Stroke::new(stroke.width, color)));
    }
}

/// Status line under the canvas.
pub fn show_status(ui: &mut egui::Ui, session: &SketchSession, camera_opening: bool) {
    ui.horizontal(|ui| {
        let mode = if session.erase_mode() { "Eraser" } else { "Pen" };
        ui.label(format!("Mode: {}", mode));
        ui.separator();
        ui.label(format!("Strokes: {}", session.canvas().strokes().len()));
        ui.separator();
        match session.background() {
            Some(image) => ui.label(format!("Background: {}x{}", image.width(), image.height())),
            None => ui.label("No background"),
        };
        if camera_opening {
            ui.separator();
            ui.spinner();
            ui.label("Opening camera...");
        }
    });
}
