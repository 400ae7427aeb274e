// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Application settings.
//!
//! Settings are read from a YAML or JSON file, picked by extension. Every
//! field is optional and falls back to its default.

use crate::models::color::StrokeColor;
use crate::models::sketch::DEFAULT_HISTORY_LIMIT;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings file looked up in the working directory when none is given.
pub const DEFAULT_SETTINGS_FILE: &str = "sketchpad.yaml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Initial pen color
    pub stroke_color: StrokeColor,
    /// Pen width in logical pixels
    pub stroke_width: f32,
    /// Eraser width in logical pixels
    pub eraser_width: f32,
    /// Number of undo steps kept
    pub history_limit: usize,
    /// Camera device index
    pub camera_index: i32,
    /// File name suggested by the save dialog
    pub export_file_name: String,
    pub window_width: f32,
    pub window_height: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            stroke_color: StrokeColor::default(),
            stroke_width: 4.0,
            eraser_width: 16.0,
            history_limit: DEFAULT_HISTORY_LIMIT,
            camera_index: 0,
            export_file_name: "sketch.png".to_string(),
            window_width: 1280.0,
            window_height: 720.0,
        }
    }
}

impl Settings {
    /// Load settings from a YAML or JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let extension = path.extension().and_then(|s| s.to_str());
        let settings = match extension {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&text)
                .with_context(|| format!("Invalid YAML in {}", path.display()))?,
            Some("json") => serde_json::from_str(&text)
                .with_context(|| format!("Invalid JSON in {}", path.display()))?,
            _ => bail!("Unsupported settings extension: {:?}", extension),
        };
        Ok(settings)
    }

    /// Resolve the settings path: explicit argument, else the default file if present.
    pub fn locate(arg: Option<PathBuf>) -> Option<PathBuf> {
        arg.or_else(|| {
            let fallback = PathBuf::from(DEFAULT_SETTINGS_FILE);
            fallback.exists().then_some(fallback)
        })
    }

    /// Load from `path` if given, falling back to defaults on any error.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };
        match Self::load(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Using default settings: {:#}", e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_yaml_partial_fields_use_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.yaml");
        std::fs::write(&path, "stroke_color: \"#112233\"\neraser_width: 30\n").unwrap();

        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.stroke_color, StrokeColor::new(0x11, 0x22, 0x33));
        assert_eq!(settings.eraser_width, 30.0);
        assert_eq!(settings.stroke_width, 4.0);
        assert_eq!(settings.export_file_name, "sketch.png");
    }

    #[test]
    fn test_json_settings() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"camera_index": 2, "history_limit": 10}"#).unwrap();

        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.camera_index, 2);
        assert_eq!(settings.history_limit, 10);
        assert_eq!(settings.stroke_color, StrokeColor::default());
    }

    #[test]
    fn test_bad_color_and_extension_are_errors() {
        let dir = tempdir().unwrap();
        let bad_color = dir.path().join("bad.yaml");
        std::fs::write(&bad_color, "stroke_color: purple\n").unwrap();
        assert!(Settings::load(&bad_color).is_err());

        let bad_ext = dir.path().join("settings.toml");
        std::fs::write(&bad_ext, "").unwrap();
        assert!(Settings::load(&bad_ext).is_err());
    }

    #[test]
    fn test_load_or_default_falls_back() {
        assert_eq!(Settings::load_or_default(None), Settings::default());

        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.yaml");
        assert_eq!(Settings::load_or_default(Some(&missing)), Settings::default());
    }

    #[test]
    fn test_locate_prefers_explicit_path() {
        let explicit = PathBuf::from("custom.json");
        assert_eq!(Settings::locate(Some(explicit.clone())), Some(explicit));
    }
}
