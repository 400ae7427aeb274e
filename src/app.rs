// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! This module contains the main application structure that implements
//! the egui::App trait. It owns the GPU textures and the camera session,
//! and routes toolbar, canvas, overlay and keyboard input into the
//! `SketchSession`.

use crate::io::camera::CameraSession;
use crate::io::{export, settings::Settings};
use crate::models::session::{SketchSession, SAVE_FAILURE_MESSAGE, SAVE_SUCCESS_MESSAGE};
use crate::render::raster;
use crate::ui::{alert, camera_overlay, canvas, toolbar};
use crate::util::geometry;
use image::RgbaImage;
use std::time::Duration;

/// Granularity in pixels by which the stroke texture grows.
const STROKE_EXTENT_STEP: u32 = 256;

/// Repaint interval while the camera is streaming.
const CAMERA_REPAINT: Duration = Duration::from_millis(33);

/// Upload an RGBA image as a texture, reusing the existing handle if any.
fn upload_texture(
    ctx: &egui::Context,
    slot: &mut Option<egui::TextureHandle>,
    name: &str,
    image: &RgbaImage,
) {
    let size = [image.width() as usize, image.height() as usize];
    let color_image = egui::ColorImage::from_rgba_unmultiplied(size, image.as_raw());
    match slot {
        Some(texture) => texture.set(color_image, egui::TextureOptions::LINEAR),
        None => *slot = Some(ctx.load_texture(name, color_image, egui::TextureOptions::LINEAR)),
    }
}

/// Main application state.
pub struct SketchApp {
    settings: Settings,

    /// Interaction state (color, mode, background, strokes, alerts)
    session: SketchSession,

    /// Running camera session, from the access request until snap/cancel
    camera: Option<CameraSession>,

    /// Live camera frame for the overlay
    camera_texture: Option<egui::TextureHandle>,

    /// Background image texture and the session revision it reflects
    background_texture: Option<egui::TextureHandle>,
    background_revision: Option<u64>,

    /// Rasterized committed strokes anchored at the canvas origin, keyed by
    /// (canvas revision, extent, pixels per point bits)
    strokes_texture: Option<egui::TextureHandle>,
    strokes_key: Option<(u64, (u32, u32), u32)>,
    strokes_extent: (u32, u32),

    /// Canvas rect from the last frame, used for export size
    canvas_rect: egui::Rect,
    pixels_per_point: f32,
}

impl SketchApp {
    /// Create a new application instance.
    pub fn new(settings: Settings) -> Self {
        let session = SketchSession::new(&settings);
        let canvas_rect = egui::Rect::from_min_size(
            egui::pos2(0.0, 0.0),
            egui::vec2(settings.window_width, settings.window_height),
        );
        Self {
            settings,
            session,
            camera: None,
            camera_texture: None,
            background_texture: None,
            background_revision: None,
            strokes_texture: None,
            strokes_key: None,
            strokes_extent: (0, 0),
            canvas_rect,
            pixels_per_point: 1.0,
        }
    }

    /// True while waiting for the camera to open.
    fn camera_opening(&self) -> bool {
        self.camera.is_some() && !self.session.show_cam()
    }

    /// Request camera access; the overlay opens once frames arrive.
    fn open_camera(&mut self) {
        if self.camera.is_some() {
            return;
        }
        log::info!("Opening camera {}", self.settings.camera_index);
        self.camera = Some(CameraSession::start(self.settings.camera_index));
    }

    /// Handle camera status changes and refresh the preview texture.
    fn poll_camera(&mut self, ctx: &egui::Context) {
        let Some(camera) = self.camera.as_mut() else {
            return;
        };
        let status = camera.poll();
        if camera.take_frame_update() {
            if let Some(frame) = camera.latest_frame() {
                upload_texture(ctx, &mut self.camera_texture, "camera_frame", frame);
            }
        }
        let finished = camera.is_finished();

        if !self.session.apply_camera_status(status, finished) {
            self.stop_camera();
            return;
        }
        ctx.request_repaint_after(CAMERA_REPAINT);
    }

    fn stop_camera(&mut self) {
        self.camera = None;
        self.camera_texture = None;
    }

    /// Capture the current frame as the background.
    fn snap(&mut self) {
        let frame = self.camera.as_mut().and_then(|camera| camera.take_frame());
        self.session.snap(frame);
        self.stop_camera();
    }

    fn cancel_camera(&mut self) {
        log::info!("Camera closed without snapshot");
        self.session.close_camera();
        self.stop_camera();
    }

    /// Export the canvas to a PNG file chosen by the user.
    fn save_image(&mut self) {
        let (width, height) = geometry::pixel_size(self.canvas_rect, self.pixels_per_point);
        let bytes = match self.session.export_png(width, height, self.pixels_per_point) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                log::info!("Nothing to export");
                return;
            }
            Err(e) => {
                log::error!("Failed to export image: {:#}", e);
                return;
            }
        };

        let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG image", &["png"])
            .set_file_name(self.settings.export_file_name.clone())
            .save_file()
        else {
            return;
        };

        match export::write_png(&bytes, &path) {
            Ok(()) => self.session.push_alert(SAVE_SUCCESS_MESSAGE),
            Err(e) => {
                log::error!("{:#}", e);
                self.session.push_alert(SAVE_FAILURE_MESSAGE);
            }
        }
    }

    fn handle_toolbar_action(&mut self, action: toolbar::ToolbarAction) {
        match action {
            toolbar::ToolbarAction::SetColor(color) => self.session.set_stroke_color(color),
            toolbar::ToolbarAction::SelectPen => self.session.select_pen(),
            toolbar::ToolbarAction::SelectEraser => self.session.select_eraser(),
            toolbar::ToolbarAction::Undo => self.session.undo(),
            toolbar::ToolbarAction::Redo => self.session.redo(),
            toolbar::ToolbarAction::Clear => self.session.clear(),
            toolbar::ToolbarAction::Save => self.save_image(),
            toolbar::ToolbarAction::OpenCamera => self.open_camera(),
            toolbar::ToolbarAction::ResetBackground => self.session.reset_background(),
            toolbar::ToolbarAction::None => {}
        }
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input()
            || self.session.show_cam()
            || self.session.current_alert().is_some()
        {
            return;
        }

        // Redo is Ctrl+Shift+Z or Ctrl+Y
        let (undo, redo, pen, eraser) = ctx.input(|i| {
            let command = i.modifiers.command;
            (
                command && !i.modifiers.shift && i.key_pressed(egui::Key::Z),
                (command && i.modifiers.shift && i.key_pressed(egui::Key::Z))
                    || (command && i.key_pressed(egui::Key::Y)),
                !command && i.key_pressed(egui::Key::P),
                !command && i.key_pressed(egui::Key::E),
            )
        });

        if undo {
            self.session.undo();
        }
        if redo {
            self.session.redo();
        }
        if pen {
            self.session.select_pen();
        }
        if eraser {
            self.session.select_eraser();
        }
    }

    /// Bring textures in line with the session before painting.
    fn sync_textures(&mut self, ctx: &egui::Context, canvas_rect: egui::Rect) {
        let revision = self.session.background_revision();
        if self.background_revision != Some(revision) {
            self.background_revision = Some(revision);
            match self.session.background() {
                Some(image) => upload_texture(ctx, &mut self.background_texture, "background", image),
                None => self.background_texture = None,
            }
        }

        // The texture only grows, so resizing inside it reuses the raster
        let needed = geometry::pixel_size(canvas_rect, self.pixels_per_point);
        self.strokes_extent = geometry::grow_extent(self.strokes_extent, needed, STROKE_EXTENT_STEP);
        let key = (
            self.session.canvas().revision(),
            self.strokes_extent,
            self.pixels_per_point.to_bits(),
        );
        if self.strokes_key != Some(key) {
            self.strokes_key = Some(key);
            let strokes = self.session.canvas().strokes();
            if strokes.is_empty() {
                self.strokes_texture = None;
            } else {
                let (width, height) = self.strokes_extent;
                let layer = raster::draw_strokes(strokes, width, height, self.pixels_per_point);
                upload_texture(ctx, &mut self.strokes_texture, "strokes", &layer);
            }
        }
    }
}

impl eframe::App for SketchApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.pixels_per_point = ctx.pixels_per_point();
        self.poll_camera(ctx);
        self.handle_shortcuts(ctx);

        // Top menu bar
        let mut menu_action = toolbar::ToolbarAction::None;
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Save as PNG...").clicked() {
                        menu_action = toolbar::ToolbarAction::Save;
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                ui.menu_button("Edit", |ui| {
                    let canvas = self.session.canvas();
                    if ui.add_enabled(canvas.can_undo(), egui::Button::new("Undo (Ctrl+Z)")).clicked() {
                        menu_action = toolbar::ToolbarAction::Undo;
                        ui.close_menu();
                    }
                    if ui.add_enabled(canvas.can_redo(), egui::Button::new("Redo (Ctrl+Shift+Z)")).clicked() {
                        menu_action = toolbar::ToolbarAction::Redo;
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.add_enabled(!canvas.is_empty(), egui::Button::new("Clear Canvas")).clicked() {
                        menu_action = toolbar::ToolbarAction::Clear;
                        ui.close_menu();
                    }
                });

                ui.menu_button("Camera", |ui| {
                    if ui.add_enabled(self.camera.is_none(), egui::Button::new("Snapshot Background...")).clicked() {
                        menu_action = toolbar::ToolbarAction::OpenCamera;
                        ui.close_menu();
                    }
                    if ui.add_enabled(self.session.background().is_some(), egui::Button::new("Remove Background")).clicked() {
                        menu_action = toolbar::ToolbarAction::ResetBackground;
                        ui.close_menu();
                    }
                });
            });
        });
        self.handle_toolbar_action(menu_action);

        let camera_opening = self.camera_opening();

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            canvas::show_status(ui, &self.session, camera_opening);
        });

        // Toolbar (right side)
        let toolbar_action = egui::SidePanel::right("toolbar")
            .resizable(false)
            .exact_width(64.0)
            .show(ctx, |ui| toolbar::show(ui, &self.session, camera_opening))
            .inner;
        self.handle_toolbar_action(toolbar_action);

        // Main canvas (center)
        let interactive = !self.session.show_cam() && self.session.current_alert().is_none();
        let canvas_actions = egui::CentralPanel::default()
            .show(ctx, |ui| {
                let rect = ui.available_rect_before_wrap();
                self.canvas_rect = rect;
                self.sync_textures(ctx, rect);
                let layers = canvas::CanvasLayers {
                    background: self.background_texture.as_ref(),
                    strokes: self.strokes_texture.as_ref(),
                };
                canvas::show(ui, rect, &self.session, layers, interactive)
            })
            .inner;

        for action in canvas_actions {
            match action {
                canvas::CanvasAction::PointerDown(point) => self.session.pointer_down(point),
                canvas::CanvasAction::PointerMove(point) => self.session.pointer_move(point),
                canvas::CanvasAction::PointerUp => self.session.pointer_up(),
            }
        }

        // Camera overlay
        if self.session.show_cam() {
            match camera_overlay::show(ctx, self.camera_texture.as_ref()) {
                camera_overlay::OverlayAction::Snap => self.snap(),
                camera_overlay::OverlayAction::Cancel => self.cancel_camera(),
                camera_overlay::OverlayAction::None => {}
            }
        }

        // Alerts go on top of everything
        if let Some(message) = self.session.current_alert().map(str::to_owned) {
            if alert::show(ctx, &message) {
                self.session.dismiss_alert();
            }
        }
    }
}
