// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Sketchpad
//!
//! A desktop sketching canvas with pen and eraser, undo/redo, webcam
//! snapshots as background and PNG export.

mod app;
mod io;
mod models;
mod render;
mod ui;
mod util;

use anyhow::Result;
use app::SketchApp;
use io::settings::Settings;
use std::path::PathBuf;

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    // Optional settings file as the first argument
    let settings_path = Settings::locate(std::env::args_os().nth(1).map(PathBuf::from));
    let settings = Settings::load_or_default(settings_path.as_deref());

    // Configure egui options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([settings.window_width, settings.window_height])
            .with_min_inner_size([640.0, 480.0])
            .with_title("Sketchpad"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Sketchpad",
        options,
        Box::new(|_cc| Ok(Box::new(SketchApp::new(settings)))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
