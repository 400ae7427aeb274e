// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! UI components for the sketch window.

pub mod alert;
pub mod camera_overlay;
pub mod canvas;
pub mod toolbar;

/// Dim the window and swallow pointer input below modal windows.
fn backdrop(ctx: &egui::Context, id: &str, alpha: u8) {
    let screen = ctx.screen_rect();
    egui::Area::new(egui::Id::new(id))
        .order(egui::Order::PanelResizeLine)
        .fixed_pos(screen.min)
        .show(ctx, |ui| {
            ui.painter()
                .rect_filled(screen, 0.0, egui::Color32::from_black_alpha(alpha));
            ui.allocate_rect(screen, egui::Sense::click_and_drag());
        });
}
