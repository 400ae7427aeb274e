// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Interaction state of the sketch window.
//!
//! `SketchSession` holds everything the toolbar and canvas mutate: pen
//! color, pen/eraser mode, camera overlay visibility, the background
//! image and the stroke canvas. It is free of egui so every behavior can
//! be exercised without a UI context.

use super::color::StrokeColor;
use super::sketch::{Point, SketchCanvas, StrokeKind};
use crate::io::camera::CameraStatus;
use crate::io::{export, settings::Settings};
use crate::render::raster;
use anyhow::Result;
use image::RgbaImage;
use std::collections::VecDeque;

pub const CAMERA_UNAVAILABLE_MESSAGE: &str = "Camera access denied / not available";
pub const SAVE_SUCCESS_MESSAGE: &str = "Image Saved Successfully";
pub const SAVE_FAILURE_MESSAGE: &str = "Failed to save image";

#[derive(Debug)]
pub struct SketchSession {
    stroke_color: StrokeColor,
    erase_mode: bool,
    show_cam: bool,
    background: Option<RgbaImage>,
    /// Bumped whenever the background changes
    background_revision: u64,
    canvas: SketchCanvas,
    stroke_width: f32,
    eraser_width: f32,
    alerts: VecDeque<String>,
}

impl Default for SketchSession {
    fn default() -> Self {
        Self::new(&Settings::default())
    }
}

impl SketchSession {
    pub fn new(settings: &Settings) -> Self {
        Self {
            stroke_color: settings.stroke_color,
            erase_mode: false,
            show_cam: false,
            background: None,
            background_revision: 0,
            canvas: SketchCanvas::new(settings.history_limit),
            stroke_width: settings.stroke_width,
            eraser_width: settings.eraser_width,
            alerts: VecDeque::new(),
        }
    }

    pub fn stroke_color(&self) -> StrokeColor {
        self.stroke_color
    }

    pub fn set_stroke_color(&mut self, color: StrokeColor) {
        if color != self.stroke_color {
            log::debug!("Stroke color set to {}", color);
        }
        self.stroke_color = color;
    }

    pub fn erase_mode(&self) -> bool {
        self.erase_mode
    }

    /// Switch to drawing ink.
    pub fn select_pen(&mut self) {
        self.erase_mode = false;
    }

    /// Switch to removing ink.
    pub fn select_eraser(&mut self) {
        self.erase_mode = true;
    }

    /// The pen control is only active while erasing.
    pub fn pen_enabled(&self) -> bool {
        self.erase_mode
    }

    /// The eraser control is only active while drawing.
    pub fn eraser_enabled(&self) -> bool {
        !self.erase_mode
    }

    /// Width used for the next stroke in the current mode.
    pub fn active_width(&self) -> f32 {
        if self.erase_mode {
            self.eraser_width
        } else {
            self.stroke_width
        }
    }

    pub fn show_cam(&self) -> bool {
        self.show_cam
    }

    /// Camera access granted: reveal the overlay.
    pub fn camera_granted(&mut self) {
        self.canvas.cancel_stroke();
        self.show_cam = true;
    }

    /// Camera access denied or unavailable: hide the overlay and tell the user.
    pub fn camera_denied(&mut self, reason: &str) {
        log::warn!("Camera unavailable: {}", reason);
        self.show_cam = false;
        self.push_alert(CAMERA_UNAVAILABLE_MESSAGE);
    }

    /// Use a captured frame as the background and close the overlay.
    ///
    /// A missing frame leaves the background empty.
    pub fn snap(&mut self, frame: Option<RgbaImage>) {
        match frame {
            Some(ref image) => log::info!("Snapshot {}x{} set as background", image.width(), image.height()),
            None => log::warn!("No camera frame available, background cleared"),
        }
        self.set_background(frame);
        self.show_cam = false;
    }

    /// React to what the capture thread reported since the last poll.
    ///
    /// Returns false once the camera session has ended and should be dropped.
    pub fn apply_camera_status(&mut self, status: Option<CameraStatus>, finished: bool) -> bool {
        match status {
            Some(CameraStatus::Ready) => self.camera_granted(),
            Some(CameraStatus::Failed(reason)) => {
                self.camera_denied(&reason);
                return false;
            }
            None => {}
        }
        if finished {
            // Thread exited without an explicit failure
            self.close_camera();
            return false;
        }
        true
    }

    /// Hide the overlay without touching the background.
    pub fn close_camera(&mut self) {
        self.show_cam = false;
    }

    pub fn background(&self) -> Option<&RgbaImage> {
        self.background.as_ref()
    }

    pub fn background_revision(&self) -> u64 {
        self.background_revision
    }

    /// Drop the background image.
    pub fn reset_background(&mut self) {
        self.set_background(None);
        log::info!("Background reset");
    }

    fn set_background(&mut self, background: Option<RgbaImage>) {
        self.background = background;
        self.background_revision += 1;
    }

    pub fn canvas(&self) -> &SketchCanvas {
        &self.canvas
    }

    pub fn undo(&mut self) {
        if self.canvas.undo() {
            log::info!("Undo");
        }
    }

    pub fn redo(&mut self) {
        if self.canvas.redo() {
            log::info!("Redo");
        }
    }

    pub fn clear(&mut self) {
        if self.canvas.clear() {
            log::info!("Canvas cleared");
        }
    }

    /// Pointer pressed on the canvas.
    pub fn pointer_down(&mut self, point: Point) {
        if self.show_cam {
            return;
        }
        let kind = if self.erase_mode {
            StrokeKind::Erase
        } else {
            StrokeKind::Pen
        };
        self.canvas
            .begin_stroke(kind, self.stroke_color, self.active_width(), point);
    }

    pub fn pointer_move(&mut self, point: Point) {
        if self.show_cam {
            return;
        }
        self.canvas.extend_stroke(point);
    }

    pub fn pointer_up(&mut self) {
        if self.show_cam {
            return;
        }
        if self.canvas.end_stroke() {
            log::info!("Stroke added, total: {}", self.canvas.strokes().len());
        }
    }

    /// Whether export would produce anything.
    pub fn has_content(&self) -> bool {
        !self.canvas.is_empty() || self.background.is_some()
    }

    /// Render the canvas to PNG bytes, or `None` when there is nothing to export.
    pub fn export_png(&self, width: u32, height: u32, scale: f32) -> Result<Option<Vec<u8>>> {
        if !self.has_content() {
            return Ok(None);
        }
        let image = raster::rasterize(
            self.canvas.strokes(),
            self.background.as_ref(),
            width,
            height,
            scale,
        );
        Ok(Some(export::encode_png(&image)?))
    }

    pub fn push_alert(&mut self, message: impl Into<String>) {
        self.alerts.push_back(message.into());
    }

    /// The alert currently shown, if any.
    pub fn current_alert(&self) -> Option<&str> {
        self.alerts.front().map(String::as_str)
    }

    /// Dismiss the alert currently shown.
    pub fn dismiss_alert(&mut self) -> Option<String> {
        self.alerts.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn scribble(session: &mut SketchSession) {
        session.pointer_down(Point::new(2.0, 2.0));
        session.pointer_move(Point::new(8.0, 8.0));
        session.pointer_up();
    }

    fn frame(shade: u8) -> RgbaImage {
        RgbaImage::from_pixel(4, 4, Rgba([shade, shade, shade, 255]))
    }

    #[test]
    fn test_defaults() {
        let session = SketchSession::default();
        assert_eq!(session.stroke_color().to_hex(), "#a855f7");
        assert!(!session.erase_mode());
        assert!(!session.show_cam());
        assert!(session.background().is_none());
        assert!(session.current_alert().is_none());
    }

    #[test]
    fn test_pen_and_eraser_are_mutually_exclusive() {
        let mut session = SketchSession::default();
        assert!(!session.pen_enabled());
        assert!(session.eraser_enabled());

        session.select_eraser();
        assert!(session.erase_mode());
        assert!(session.pen_enabled());
        assert!(!session.eraser_enabled());

        session.select_pen();
        assert!(!session.erase_mode());
        assert_ne!(session.pen_enabled(), session.eraser_enabled());
    }

    #[test]
    fn test_strokes_follow_mode_and_color() {
        let settings = Settings {
            stroke_width: 3.0,
            eraser_width: 20.0,
            ..Settings::default()
        };
        let mut session = SketchSession::new(&settings);
        session.set_stroke_color(StrokeColor::new(1, 2, 3));
        scribble(&mut session);
        session.select_eraser();
        scribble(&mut session);

        let strokes = session.canvas().strokes();
        assert_eq!(strokes.len(), 2);
        assert_eq!(strokes[0].kind, StrokeKind::Pen);
        assert_eq!(strokes[0].color, StrokeColor::new(1, 2, 3));
        assert_eq!(strokes[0].width, 3.0);
        assert_eq!(strokes[1].kind, StrokeKind::Erase);
        assert_eq!(strokes[1].width, 20.0);
    }

    #[test]
    fn test_snap_replaces_background_and_closes_overlay() {
        let mut session = SketchSession::default();
        session.camera_granted();
        session.snap(Some(frame(10)));
        assert!(!session.show_cam());

        session.camera_granted();
        assert!(session.show_cam());
        session.snap(Some(frame(200)));
        assert!(!session.show_cam());
        assert_eq!(session.background().unwrap().get_pixel(0, 0).0[0], 200);
    }

    #[test]
    fn test_snap_without_frame_empties_background() {
        let mut session = SketchSession::default();
        session.snap(Some(frame(1)));
        session.camera_granted();
        session.snap(None);
        assert!(session.background().is_none());
        assert!(!session.show_cam());
    }

    #[test]
    fn test_reset_background_always_empties() {
        let mut session = SketchSession::default();
        session.reset_background();
        assert!(session.background().is_none());

        session.snap(Some(frame(5)));
        let before = session.background_revision();
        session.reset_background();
        assert!(session.background().is_none());
        assert!(session.background_revision() > before);
    }

    #[test]
    fn test_camera_denial_hides_overlay_and_alerts() {
        let mut session = SketchSession::default();
        session.camera_denied("no device");
        assert!(!session.show_cam());
        assert_eq!(session.current_alert(), Some(CAMERA_UNAVAILABLE_MESSAGE));

        // Failure while the overlay is already open
        session.camera_granted();
        session.camera_denied("unplugged");
        assert!(!session.show_cam());

        assert!(session.dismiss_alert().is_some());
        assert!(session.dismiss_alert().is_some());
        assert!(session.current_alert().is_none());
    }

    #[test]
    fn test_camera_status_ready_opens_overlay() {
        let mut session = SketchSession::default();
        assert!(session.apply_camera_status(None, false));
        assert!(!session.show_cam());

        assert!(session.apply_camera_status(Some(CameraStatus::Ready), false));
        assert!(session.show_cam());
        assert!(session.current_alert().is_none());
    }

    #[test]
    fn test_camera_status_failure_never_leaves_overlay_open() {
        let mut session = SketchSession::default();
        let keep = session.apply_camera_status(Some(CameraStatus::Failed("denied".into())), true);
        assert!(!keep);
        assert!(!session.show_cam());
        assert_eq!(session.current_alert(), Some(CAMERA_UNAVAILABLE_MESSAGE));

        // Failure after the overlay opened
        session.apply_camera_status(Some(CameraStatus::Ready), false);
        assert!(!session.apply_camera_status(Some(CameraStatus::Failed("unplugged".into())), false));
        assert!(!session.show_cam());
    }

    #[test]
    fn test_camera_thread_exit_closes_overlay_quietly() {
        let mut session = SketchSession::default();
        session.apply_camera_status(Some(CameraStatus::Ready), false);
        assert!(!session.apply_camera_status(None, true));
        assert!(!session.show_cam());
        assert!(session.current_alert().is_none());
    }

    #[test]
    fn test_close_camera_keeps_background() {
        let mut session = SketchSession::default();
        session.snap(Some(frame(7)));
        session.camera_granted();
        session.close_camera();
        assert!(!session.show_cam());
        assert!(session.background().is_some());
    }

    #[test]
    fn test_pointer_ignored_while_overlay_open() {
        let mut session = SketchSession::default();
        session.camera_granted();
        scribble(&mut session);
        assert!(session.canvas().is_empty());
    }

    #[test]
    fn test_undo_redo_clear_pass_through() {
        let mut session = SketchSession::default();
        scribble(&mut session);
        scribble(&mut session);

        session.undo();
        assert_eq!(session.canvas().strokes().len(), 1);
        session.redo();
        assert_eq!(session.canvas().strokes().len(), 2);
        session.clear();
        assert!(session.canvas().is_empty());
        session.undo();
        assert_eq!(session.canvas().strokes().len(), 2);
    }

    #[test]
    fn test_export_empty_canvas_yields_nothing() {
        let session = SketchSession::default();
        assert!(session.export_png(32, 32, 1.0).unwrap().is_none());
    }

    #[test]
    fn test_export_after_clear_yields_nothing() {
        let mut session = SketchSession::default();
        scribble(&mut session);
        session.clear();
        assert!(session.export_png(32, 32, 1.0).unwrap().is_none());
    }

    #[test]
    fn test_export_with_strokes_produces_png() {
        let mut session = SketchSession::default();
        scribble(&mut session);
        let bytes = session.export_png(16, 16, 1.0).unwrap().unwrap();

        let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (16, 16));
        assert_eq!(decoded.get_pixel(5, 5).0[3], 255);
    }

    #[test]
    fn test_export_background_only() {
        let mut session = SketchSession::default();
        session.snap(Some(frame(90)));
        let bytes = session.export_png(8, 8, 1.0).unwrap().unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (8, 8));
    }
}
