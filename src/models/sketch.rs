// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Stroke data structures and drawing history.
//!
//! This module defines freehand strokes, the canvas that collects them,
//! and the snapshot-based undo/redo history behind it.

use super::color::StrokeColor;
use crate::util::geometry;

/// Points closer than this to the previous point are dropped.
const MIN_POINT_SPACING: f32 = 0.5;

/// Default number of undo steps kept.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// A 2D point in canvas-local logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Whether a stroke adds or removes ink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrokeKind {
    Pen,
    Erase,
}

/// A freehand stroke.
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    pub kind: StrokeKind,
    pub color: StrokeColor,
    pub width: f32,
    pub points: Vec<Point>,
}

impl Stroke {
    /// Create a stroke starting at `start`.
    pub fn new(kind: StrokeKind, color: StrokeColor, width: f32, start: Point) -> Self {
        Self {
            kind,
            color,
            width,
            points: vec![start],
        }
    }

    /// Append a point unless it sits on top of the previous one.
    pub fn add_point(&mut self, point: Point) -> bool {
        if let Some(last) = self.points.last() {
            if geometry::distance(last, &point) < MIN_POINT_SPACING {
                return false;
            }
        }
        self.points.push(point);
        true
    }

    /// Bounding box (min, max) including the stroke half-width.
    pub fn bounds(&self) -> Option<(Point, Point)> {
        let first = self.points.first()?;
        let half = self.width / 2.0;
        let (mut min, mut max) = (*first, *first);
        for p in &self.points {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        Some((
            Point::new(min.x - half, min.y - half),
            Point::new(max.x + half, max.y + half),
        ))
    }
}

/// History system for undo/redo functionality.
#[derive(Debug)]
struct History {
    /// Undo stack (past states)
    undo_stack: Vec<Vec<Stroke>>,
    /// Redo stack (future states after undo)
    redo_stack: Vec<Vec<Stroke>>,
    /// Maximum history size
    max_size: usize,
}

impl History {
    fn new(max_size: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_size: max_size.max(1),
        }
    }

    /// Save current state before making a change
    fn push(&mut self, strokes: Vec<Stroke>) {
        self.undo_stack.push(strokes);
        if self.undo_stack.len() > self.max_size {
            self.undo_stack.remove(0);
        }
        // A new change invalidates anything that was undone
        self.redo_stack.clear();
    }

    fn undo(&mut self, current: Vec<Stroke>) -> Option<Vec<Stroke>> {
        let previous = self.undo_stack.pop()?;
        self.redo_stack.push(current);
        Some(previous)
    }

    fn redo(&mut self, current: Vec<Stroke>) -> Option<Vec<Stroke>> {
        let next = self.redo_stack.pop()?;
        self.undo_stack.push(current);
        Some(next)
    }

    fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }
}

/// The drawable layer: committed strokes, the stroke being drawn, and history.
#[derive(Debug)]
pub struct SketchCanvas {
    strokes: Vec<Stroke>,
    in_progress: Option<Stroke>,
    history: History,
    revision: u64,
}

impl Default for SketchCanvas {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl SketchCanvas {
    pub fn new(history_limit: usize) -> Self {
        Self {
            strokes: Vec::new(),
            in_progress: None,
            history: History::new(history_limit),
            revision: 0,
        }
    }

    /// Committed strokes, oldest first.
    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    pub fn in_progress(&self) -> Option<&Stroke> {
        self.in_progress.as_ref()
    }

    /// True when no stroke has been committed.
    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    /// Counter bumped on every change to the committed strokes.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Start a new stroke, replacing any unfinished one.
    pub fn begin_stroke(&mut self, kind: StrokeKind, color: StrokeColor, width: f32, start: Point) {
        self.in_progress = Some(Stroke::new(kind, color, width, start));
    }

    pub fn extend_stroke(&mut self, point: Point) {
        if let Some(ref mut stroke) = self.in_progress {
            stroke.add_point(point);
        }
    }

    /// Commit the in-progress stroke. Returns false if there was none.
    pub fn end_stroke(&mut self) -> bool {
        let Some(stroke) = self.in_progress.take() else {
            return false;
        };
        self.history.push(self.strokes.clone());
        self.strokes.push(stroke);
        self.revision += 1;
        log::debug!("Committed stroke, total: {}", self.strokes.len());
        true
    }

    pub fn cancel_stroke(&mut self) {
        self.in_progress = None;
    }

    pub fn undo(&mut self) -> bool {
        self.in_progress = None;
        let current = self.strokes.clone();
        match self.history.undo(current) {
            Some(previous) => {
                self.strokes = previous;
                self.revision += 1;
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        self.in_progress = None;
        let current = self.strokes.clone();
        match self.history.redo(current) {
            Some(next) => {
                self.strokes = next;
                self.revision += 1;
                true
            }
            None => false,
        }
    }

    /// Remove every stroke. Clearing is undoable; clearing an empty canvas is a no-op.
    pub fn clear(&mut self) -> bool {
        self.in_progress = None;
        if self.strokes.is_empty() {
            return false;
        }
        let cleared = std::mem::take(&mut self.strokes);
        self.history.push(cleared);
        self.revision += 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draw(canvas: &mut SketchCanvas, x: f32) {
        canvas.begin_stroke(StrokeKind::Pen, StrokeColor::default(), 4.0, Point::new(x, 0.0));
        canvas.extend_stroke(Point::new(x, 10.0));
        assert!(canvas.end_stroke());
    }

    #[test]
    fn test_add_point_skips_duplicates() {
        let mut stroke = Stroke::new(StrokeKind::Pen, StrokeColor::default(), 2.0, Point::new(0.0, 0.0));
        assert!(!stroke.add_point(Point::new(0.1, 0.1)));
        assert!(stroke.add_point(Point::new(5.0, 0.0)));
        assert_eq!(stroke.points.len(), 2);
    }

    #[test]
    fn test_bounds_include_half_width() {
        let mut stroke = Stroke::new(StrokeKind::Pen, StrokeColor::default(), 4.0, Point::new(10.0, 10.0));
        stroke.add_point(Point::new(20.0, 30.0));
        let (min, max) = stroke.bounds().unwrap();
        assert_eq!(min, Point::new(8.0, 8.0));
        assert_eq!(max, Point::new(22.0, 32.0));
    }

    #[test]
    fn test_end_stroke_without_begin_is_noop() {
        let mut canvas = SketchCanvas::default();
        assert!(!canvas.end_stroke());
        assert!(canvas.is_empty());
        assert!(!canvas.can_undo());
    }

    #[test]
    fn test_undo_redo_strokes() {
        let mut canvas = SketchCanvas::default();
        draw(&mut canvas, 1.0);
        draw(&mut canvas, 2.0);
        assert_eq!(canvas.strokes().len(), 2);

        assert!(canvas.undo());
        assert_eq!(canvas.strokes().len(), 1);
        assert!(canvas.can_redo());

        assert!(canvas.redo());
        assert_eq!(canvas.strokes().len(), 2);
        assert!(!canvas.redo());
    }

    #[test]
    fn test_new_stroke_clears_redo() {
        let mut canvas = SketchCanvas::default();
        draw(&mut canvas, 1.0);
        canvas.undo();
        draw(&mut canvas, 2.0);
        assert!(!canvas.can_redo());
        assert_eq!(canvas.strokes()[0].points[0], Point::new(2.0, 0.0));
    }

    #[test]
    fn test_clear_is_undoable() {
        let mut canvas = SketchCanvas::default();
        draw(&mut canvas, 1.0);
        draw(&mut canvas, 2.0);

        assert!(canvas.clear());
        assert!(canvas.is_empty());
        assert!(!canvas.clear());

        assert!(canvas.undo());
        assert_eq!(canvas.strokes().len(), 2);
    }

    #[test]
    fn test_history_limit() {
        let mut canvas = SketchCanvas::new(2);
        for i in 0..5 {
            draw(&mut canvas, i as f32);
        }
        assert!(canvas.undo());
        assert!(canvas.undo());
        assert!(!canvas.undo());
        assert_eq!(canvas.strokes().len(), 3);
    }

    #[test]
    fn test_revision_tracks_changes() {
        let mut canvas = SketchCanvas::default();
        let start = canvas.revision();
        draw(&mut canvas, 1.0);
        assert!(canvas.revision() > start);

        let after_draw = canvas.revision();
        canvas.begin_stroke(StrokeKind::Erase, StrokeColor::default(), 8.0, Point::new(0.0, 0.0));
        canvas.cancel_stroke();
        assert_eq!(canvas.revision(), after_draw);
    }
}
