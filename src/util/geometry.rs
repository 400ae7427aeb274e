// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! This module provides conversions between screen positions and
//! canvas-local stroke coordinates, plus the distance math used by the
//! rasterizer.

use crate::models::sketch::Point;

/// Convert a screen position into canvas-local coordinates.
pub fn to_canvas_point(pos: egui::Pos2, canvas_rect: egui::Rect) -> Point {
    Point::new(pos.x - canvas_rect.min.x, pos.y - canvas_rect.min.y)
}

/// Convert canvas-local coordinates back to a screen position.
pub fn to_screen_pos(point: &Point, canvas_rect: egui::Rect) -> egui::Pos2 {
    egui::pos2(canvas_rect.min.x + point.x, canvas_rect.min.y + point.y)
}

/// Pixel dimensions of a canvas rect, never smaller than 1x1.
pub fn pixel_size(canvas_rect: egui::Rect, pixels_per_point: f32) -> (u32, u32) {
    let width = (canvas_rect.width() * pixels_per_point).round().max(1.0);
    let height = (canvas_rect.height() * pixels_per_point).round().max(1.0);
    (width as u32, height as u32)
}

/// Grow a pixel extent so it covers `needed`, rounding up in `step` increments.
///
/// The extent never shrinks, so small resizes inside it cause no change.
pub fn grow_extent(current: (u32, u32), needed: (u32, u32), step: u32) -> (u32, u32) {
    let step = step.max(1);
    let grow = |have: u32, want: u32| {
        if want <= have {
            have
        } else {
            want.div_ceil(step) * step
        }
    };
    (grow(current.0, needed.0), grow(current.1, needed.1))
}

/// Distance between two points.
pub fn distance(a: &Point, b: &Point) -> f32 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    (dx * dx + dy * dy).sqrt()
}

/// Shortest distance from `p` to the segment `a`-`b`.
pub fn distance_to_segment(p: &Point, a: &Point, b: &Point) -> f32 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;
    if len_sq < f32::EPSILON {
        // Degenerate segment
        return distance(p, a);
    }

    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    let closest = Point::new(a.x + t * dx, a.y + t * dy);
    distance(p, &closest)
}
