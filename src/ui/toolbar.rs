// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Toolbar and tool selection UI.
//!
//! A vertical column next to the canvas with the color picker, pen and
//! eraser toggles, history buttons, export and camera controls.

use crate::models::color::StrokeColor;
use crate::models::session::SketchSession;

/// Square size of the toolbar buttons.
const BUTTON_SIZE: f32 = 36.0;

/// Result of toolbar interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarAction {
    None,
    SetColor(StrokeColor),
    SelectPen,
    SelectEraser,
    Undo,
    Redo,
    Clear,
    Save,
    OpenCamera,
    ResetBackground,
}

/// Display the toolbar and report which control was used.
pub fn show(ui: &mut egui::Ui, session: &SketchSession, camera_opening: bool) -> ToolbarAction {
    let mut action = ToolbarAction::None;

    ui.vertical_centered(|ui| {
        ui.spacing_mut().item_spacing.y = 8.0;
        ui.add_space(8.0);

        // Color swatch doubles as the picker
        let mut color = egui::Color32::from(session.stroke_color());
        if ui
            .color_edit_button_srgba(&mut color)
            .on_hover_text(format!("Stroke color {}", session.stroke_color()))
            .changed()
        {
            action = ToolbarAction::SetColor(StrokeColor::from(color));
        }

        ui.separator();

        // Only the inactive mode can be selected
        if tool_button(ui, session.pen_enabled(), "✏", "Pen (P)") {
            action = ToolbarAction::SelectPen;
        }
        if tool_button(ui, session.eraser_enabled(), "⌫", "Eraser (E)") {
            action = ToolbarAction::SelectEraser;
        }

        ui.separator();

        let canvas = session.canvas();
        if tool_button(ui, canvas.can_undo(), "⟲", "Undo (Ctrl+Z)") {
            action = ToolbarAction::Undo;
        }
        if tool_button(ui, canvas.can_redo(), "⟳", "Redo (Ctrl+Shift+Z)") {
            action = ToolbarAction::Redo;
        }
        if tool_button(ui, !canvas.is_empty(), "🗑", "Clear canvas") {
            action = ToolbarAction::Clear;
        }
        if tool_button(ui, true, "💾", "Save as PNG") {
            action = ToolbarAction::Save;
        }
        if tool_button(ui, !camera_opening, "📷", "Use camera snapshot as background") {
            action = ToolbarAction::OpenCamera;
        }
        if tool_button(ui, session.background().is_some(), "🚫", "Remove background") {
            action = ToolbarAction::ResetBackground;
        }
    });

    action
}

fn tool_button(ui: &mut egui::Ui, enabled: bool, icon: &str, tooltip: &str) -> bool {
    let button = egui::Button::new(egui::RichText::new(icon).size(18.0))
        .min_size(egui::vec2(BUTTON_SIZE, BUTTON_SIZE));
    ui.add_enabled(enabled, button)
        .on_hover_text(tooltip)
        .on_disabled_hover_text(tooltip)
        .clicked()
}
