// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Blocking message dialog.

/// Display `message` in a modal dialog. Returns true once dismissed.
pub fn show(ctx: &egui::Context, message: &str) -> bool {
    let mut dismissed = false;
    super::backdrop(ctx, "alert_backdrop", 120);

    egui::Window::new("Sketchpad")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.set_min_width(240.0);
            ui.add_space(4.0);
            ui.label(message);
            ui.add_space(8.0);
            ui.vertical_centered(|ui| {
                if ui.button("OK").clicked() {
                    dismissed = true;
                }
            });
        });

    if ctx.input(|i| i.key_pressed(egui::Key::Enter) || i.key_pressed(egui::Key::Escape)) {
        dismissed = true;
    }
    dismissed
}
