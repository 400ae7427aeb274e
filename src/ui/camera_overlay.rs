// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Camera preview overlay.
//!
//! Covers the whole window while the camera is open, showing the live
//! frame and the controls to capture it as the canvas background.

/// Result of overlay interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayAction {
    None,
    Snap,
    Cancel,
}

/// Display the overlay with the latest camera frame.
pub fn show(ctx: &egui::Context, frame: Option<&egui::TextureHandle>) -> OverlayAction {
    let mut action = OverlayAction::None;
    super::backdrop(ctx, "camera_backdrop", 204);

    let screen = ctx.screen_rect();
    egui::Window::new("Camera")
        .title_bar(false)
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .frame(egui::Frame::none())
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                match frame {
                    Some(texture) => {
                        ui.add(
                            egui::Image::new(texture)
                                .max_width(screen.width() * 0.9)
                                .max_height(screen.height() * 0.6)
                                .rounding(6.0),
                        );
                    }
                    None => {
                        ui.spinner();
                        ui.label(egui::RichText::new("Waiting for camera...").color(egui::Color32::WHITE));
                    }
                }

                ui.add_space(16.0);
                ui.horizontal(|ui| {
                    let snap = egui::Button::new(egui::RichText::new("Snap & Use").color(egui::Color32::WHITE))
                        .fill(egui::Color32::from_rgb(22, 163, 74));
                    if ui.add(snap).clicked() {
                        action = OverlayAction::Snap;
                    }
                    if ui.button("Cancel").clicked() {
                        action = OverlayAction::Cancel;
                    }
                });
            });
        });

    if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        action = OverlayAction::Cancel;
    }

    action
}
