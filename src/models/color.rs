// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Stroke color handling.
//!
//! Colors travel as `#rrggbb` strings in settings and are converted to
//! egui and image pixel types at the edges.

use anyhow::{bail, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// An opaque RGB pen color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrokeColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl StrokeColor {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` or the short `#rgb` form.
    pub fn parse_hex(text: &str) -> Result<Self> {
        let Some(digits) = text.trim().strip_prefix('#') else {
            bail!("Color must start with '#': {:?}", text);
        };
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            bail!("Invalid hex color: {:?}", text);
        }

        let channel = |s: &str| u8::from_str_radix(s, 16);
        let color = match digits.len() {
            6 => Self::new(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            ),
            3 => {
                // #abc expands to #aabbcc
                let expand = |s: &str| channel(s).map(|v| v * 17);
                Self::new(
                    expand(&digits[0..1])?,
                    expand(&digits[1..2])?,
                    expand(&digits[2..3])?,
                )
            }
            _ => bail!("Invalid hex color length: {:?}", text),
        };
        Ok(color)
    }

    /// Lowercase `#rrggbb` form.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn to_rgba(&self) -> image::Rgba<u8> {
        image::Rgba([self.r, self.g, self.b, 255])
    }
}

impl Default for StrokeColor {
    /// Purple, `#a855f7`.
    fn default() -> Self {
        Self::new(0xa8, 0x55, 0xf7)
    }
}

impl fmt::Display for StrokeColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl From<StrokeColor> for egui::Color32 {
    fn from(color: StrokeColor) -> Self {
        egui::Color32::from_rgb(color.r, color.g, color.b)
    }
}

impl From<egui::Color32> for StrokeColor {
    fn from(color: egui::Color32) -> Self {
        // The picker works on opaque colors, so alpha is dropped
        Self::new(color.r(), color.g(), color.b())
    }
}

impl Serialize for StrokeColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for StrokeColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse_hex(&text).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_purple() {
        assert_eq!(StrokeColor::default().to_hex(), "#a855f7");
    }

    #[test]
    fn test_parse_long_and_short_forms() {
        assert_eq!(StrokeColor::parse_hex("#FF8000").unwrap(), StrokeColor::new(255, 128, 0));
        assert_eq!(StrokeColor::parse_hex("#f80").unwrap(), StrokeColor::new(255, 136, 0));
        assert_eq!(StrokeColor::parse_hex("  #000000 ").unwrap(), StrokeColor::new(0, 0, 0));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(StrokeColor::parse_hex("a855f7").is_err());
        assert!(StrokeColor::parse_hex("#a855f").is_err());
        assert!(StrokeColor::parse_hex("#gg0000").is_err());
        assert!(StrokeColor::parse_hex("#").is_err());
    }

    #[test]
    fn test_egui_conversion_drops_alpha() {
        let color = StrokeColor::from(egui::Color32::from_rgb(1, 2, 3));
        assert_eq!(color, StrokeColor::new(1, 2, 3));
        assert_eq!(egui::Color32::from(color), egui::Color32::from_rgb(1, 2, 3));
    }
}
