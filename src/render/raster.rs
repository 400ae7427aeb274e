// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! CPU rasterization of the sketch.
//!
//! Strokes are painted onto a transparent drawing layer which is then
//! composited over the (stretched) background image. Erase strokes only
//! ever clear the drawing layer, so the background shows through.

use crate::models::sketch::{Point, Stroke, StrokeKind};
use crate::util::geometry;
use image::{imageops, Rgba, RgbaImage};

/// Paint the strokes onto a transparent layer of `width` x `height` pixels.
///
/// Stroke coordinates are logical pixels; `scale` is pixels per point.
pub fn draw_strokes(strokes: &[Stroke], width: u32, height: u32, scale: f32) -> RgbaImage {
    let mut layer = RgbaImage::new(width, height);
    for stroke in strokes {
        paint_stroke(&mut layer, stroke, scale);
    }
    layer
}

/// Composite strokes over the background into a single image.
pub fn rasterize(
    strokes: &[Stroke],
    background: Option<&RgbaImage>,
    width: u32,
    height: u32,
    scale: f32,
) -> RgbaImage {
    let mut canvas = match background {
        Some(bg) if bg.dimensions() == (width, height) => bg.clone(),
        Some(bg) => imageops::resize(bg, width, height, imageops::FilterType::Triangle),
        None => RgbaImage::new(width, height),
    };
    let layer = draw_strokes(strokes, width, height, scale);
    imageops::overlay(&mut canvas, &layer, 0, 0);
    canvas
}

fn paint_stroke(layer: &mut RgbaImage, stroke: &Stroke, scale: f32) {
    let Some((min, max)) = stroke.bounds() else {
        return;
    };
    let (w, h) = layer.dimensions();

    // Stroke bounds in pixels, clipped to the layer
    let x0 = ((min.x * scale).floor().max(0.0) as u32).min(w);
    let y0 = ((min.y * scale).floor().max(0.0) as u32).min(h);
    let x1 = ((max.x * scale).ceil().max(0.0) as u32).min(w);
    let y1 = ((max.y * scale).ceil().max(0.0) as u32).min(h);
    if x0 >= x1 || y0 >= y1 {
        return;
    }

    let bw = (x1 - x0) as usize;
    let mut coverage = vec![0.0f32; bw * (y1 - y0) as usize];
    let half = stroke.width / 2.0;

    // Single-point strokes render as a dot
    let segments: Vec<(Point, Point)> = if stroke.points.len() == 1 {
        vec![(stroke.points[0], stroke.points[0])]
    } else {
        stroke.points.windows(2).map(|w| (w[0], w[1])).collect()
    };

    for (a, b) in &segments {
        let sx0 = ((a.x.min(b.x) - half) * scale).floor().max(x0 as f32) as u32;
        let sy0 = ((a.y.min(b.y) - half) * scale).floor().max(y0 as f32) as u32;
        let sx1 = (((a.x.max(b.x) + half) * scale).ceil() as u32).min(x1);
        let sy1 = (((a.y.max(b.y) + half) * scale).ceil() as u32).min(y1);

        for py in sy0..sy1 {
            for px in sx0..sx1 {
                let center = Point::new((px as f32 + 0.5) / scale, (py as f32 + 0.5) / scale);
                let d = geometry::distance_to_segment(&center, a, b);
                let cov = ((half - d) * scale + 0.5).clamp(0.0, 1.0);
                let idx = (py - y0) as usize * bw + (px - x0) as usize;
                if cov > coverage[idx] {
                    coverage[idx] = cov;
                }
            }
        }
    }

    for py in y0..y1 {
        for px in x0..x1 {
            let cov = coverage[(py - y0) as usize * bw + (px - x0) as usize];
            if cov <= 0.0 {
                continue;
            }
            let dst = layer.get_pixel_mut(px, py);
            match stroke.kind {
                StrokeKind::Pen => blend_over(dst, stroke.color.to_rgba(), cov),
                StrokeKind::Erase => {
                    dst.0[3] = (dst.0[3] as f32 * (1.0 - cov)).round() as u8;
                }
            }
        }
    }
}

/// Source-over blend of an opaque color at `alpha` onto `dst` (straight alpha).
fn blend_over(dst: &mut Rgba<u8>, src: Rgba<u8>, alpha: f32) {
    let da = dst.0[3] as f32 / 255.0;
    let out_a = alpha + da * (1.0 - alpha);
    if out_a <= 0.0 {
        return;
    }
    for c in 0..3 {
        let sc = src.0[c] as f32;
        let dc = dst.0[c] as f32;
        dst.0[c] = ((sc * alpha + dc * da * (1.0 - alpha)) / out_a).round() as u8;
    }
    dst.0[3] = (out_a * 255.0).round() as u8;
}
