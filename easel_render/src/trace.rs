// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Point-sequence tracing, solid and dashed.
//!
//! The dashed tracer walks a polyline splitting it at dash boundaries,
//! emitting [`CanvasOp::LineTo`] for drawn runs and [`CanvasOp::MoveTo`] for
//! skipped ones. Dash state (pattern cursor, remaining budget, draw flag)
//! carries across segment boundaries, so a dash can span a corner.

use easel_scene::Point;

use crate::ops::{CanvasBackend, CanvasOp};

/// Emit a solid trace of `points`: one move to the first point, a line to
/// each remaining point in order, and a closing line back to the first when
/// `closed`.
///
/// Empty and single-point inputs emit nothing.
pub fn trace<B: CanvasBackend + ?Sized>(backend: &mut B, points: &[Point], closed: bool) {
    let Some((first, rest)) = points.split_first() else {
        return;
    };
    if rest.is_empty() {
        return;
    }
    backend.apply(CanvasOp::MoveTo {
        x: first.x,
        y: first.y,
    });
    for p in rest {
        backend.apply(CanvasOp::LineTo { x: p.x, y: p.y });
    }
    if closed {
        backend.apply(CanvasOp::LineTo {
            x: first.x,
            y: first.y,
        });
    }
}

/// Emit a dashed trace of `points`.
///
/// The pattern is treated as a circular sequence of alternating draw/skip
/// lengths, starting in the drawing state with the first entry. For closed
/// input the starting point is traced again at the end, so the final dash
/// runs into the join.
///
/// Degenerate patterns (empty, or without positive total length) fall back
/// to a solid trace.
pub fn trace_dashed<B: CanvasBackend + ?Sized>(
    backend: &mut B,
    points: &[Point],
    closed: bool,
    pattern: &[f64],
) {
    if pattern.is_empty() || !pattern.iter().any(|len| *len > 0.0) {
        trace(backend, points, closed);
        return;
    }
    let Some((first, rest)) = points.split_first() else {
        return;
    };
    if rest.is_empty() {
        return;
    }
    backend.apply(CanvasOp::MoveTo {
        x: first.x,
        y: first.y,
    });
    let mut dash = DashState::new(pattern);
    let mut pen = *first;
    let closing = closed.then_some(first);
    for dest in rest.iter().chain(closing) {
        pen = dash.advance(backend, pen, *dest);
    }
}

/// Mutable dash-walk state threaded through one trace.
struct DashState<'a> {
    pattern: &'a [f64],
    /// Circular cursor into `pattern`.
    index: usize,
    /// Length left in the current pattern entry.
    budget: f64,
    /// Drawing (line) vs skipping (move).
    drawing: bool,
}

impl<'a> DashState<'a> {
    fn new(pattern: &'a [f64]) -> Self {
        Self {
            pattern,
            index: 0,
            budget: pattern[0],
            drawing: true,
        }
    }

    fn emit<B: CanvasBackend + ?Sized>(&self, backend: &mut B, p: Point) {
        let op = if self.drawing {
            CanvasOp::LineTo { x: p.x, y: p.y }
        } else {
            CanvasOp::MoveTo { x: p.x, y: p.y }
        };
        backend.apply(op);
    }

    /// Flip draw/skip and reset the budget from the next entry, wrapping
    /// past the end of the pattern.
    fn flip(&mut self) {
        self.drawing = !self.drawing;
        self.index = (self.index + 1) % self.pattern.len();
        self.budget = self.pattern[self.index];
    }

    /// Walk the pen from `pen` to `dest`, splitting at dash boundaries.
    /// Returns the new pen position.
    fn advance<B: CanvasBackend + ?Sized>(
        &mut self,
        backend: &mut B,
        mut pen: Point,
        dest: Point,
    ) -> Point {
        let mut remaining = pen.distance(dest);
        while self.budget <= remaining {
            if remaining > 0.0 {
                let t = self.budget / remaining;
                pen = Point::new(pen.x + (dest.x - pen.x) * t, pen.y + (dest.y - pen.y) * t);
                self.emit(backend, pen);
                remaining = pen.distance(dest);
            }
            // A zero-length entry at an exact boundary consumes no distance.
            self.flip();
        }
        if remaining > 0.0 {
            self.emit(backend, dest);
            self.budget -= remaining;
        }
        dest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    fn move_to(x: f64, y: f64) -> CanvasOp {
        CanvasOp::MoveTo { x, y }
    }

    fn line_to(x: f64, y: f64) -> CanvasOp {
        CanvasOp::LineTo { x, y }
    }

    #[test]
    fn solid_open_path() {
        let mut log = Vec::new();
        trace(&mut log, &[pt(0.0, 0.0), pt(1.0, 0.0), pt(1.0, 1.0)], false);
        assert_eq!(
            log,
            vec![move_to(0.0, 0.0), line_to(1.0, 0.0), line_to(1.0, 1.0)]
        );
    }

    #[test]
    fn solid_closed_shape_returns_to_start() {
        let mut log = Vec::new();
        trace(&mut log, &[pt(0.0, 0.0), pt(1.0, 0.0), pt(1.0, 1.0)], true);
        assert_eq!(
            log,
            vec![
                move_to(0.0, 0.0),
                line_to(1.0, 0.0),
                line_to(1.0, 1.0),
                line_to(0.0, 0.0),
            ]
        );
    }

    #[test]
    fn solid_degenerate_inputs_are_noops() {
        let mut log = Vec::new();
        trace(&mut log, &[], true);
        trace(&mut log, &[pt(1.0, 1.0)], false);
        assert!(log.is_empty());
    }

    #[test]
    fn dashed_straight_segment_alternates() {
        // [8, 4] over a 20-long segment: draw to 8, skip to 12, draw to 20.
        let mut log = Vec::new();
        trace_dashed(&mut log, &[pt(0.0, 0.0), pt(20.0, 0.0)], false, &[8.0, 4.0]);
        assert_eq!(
            log,
            vec![
                move_to(0.0, 0.0),
                line_to(8.0, 0.0),
                move_to(12.0, 0.0),
                line_to(20.0, 0.0),
            ]
        );
    }

    #[test]
    fn dash_cursor_wraps_with_full_budget() {
        // After the exact boundary at 20, the pattern wraps to a full 8 of
        // skip-free drawing: 20..24 skips (second entry), 24..32 draws.
        let mut log = Vec::new();
        trace_dashed(
            &mut log,
            &[pt(0.0, 0.0), pt(20.0, 0.0), pt(40.0, 0.0)],
            false,
            &[8.0, 4.0],
        );
        assert_eq!(
            log,
            vec![
                move_to(0.0, 0.0),
                line_to(8.0, 0.0),
                move_to(12.0, 0.0),
                line_to(20.0, 0.0),
                move_to(24.0, 0.0),
                line_to(32.0, 0.0),
                move_to(36.0, 0.0),
                line_to(40.0, 0.0),
            ]
        );
    }

    #[test]
    fn dash_state_spans_corners() {
        // A 10-long budget crosses the corner of an L: 6 along the first
        // leg, 4 into the second.
        let mut log = Vec::new();
        trace_dashed(
            &mut log,
            &[pt(0.0, 0.0), pt(6.0, 0.0), pt(6.0, 8.0)],
            false,
            &[10.0, 2.0],
        );
        assert_eq!(
            log,
            vec![
                move_to(0.0, 0.0),
                line_to(6.0, 0.0),
                line_to(6.0, 4.0),
                move_to(6.0, 6.0),
                line_to(6.0, 8.0),
            ]
        );
    }

    #[test]
    fn dashed_closed_shape_traces_back_to_start() {
        // Closed square of side 4, pattern [2, 2]: each side gets one drawn
        // and one skipped half, including the closing edge.
        let square = [pt(0.0, 0.0), pt(4.0, 0.0), pt(4.0, 4.0), pt(0.0, 4.0)];
        let mut log = Vec::new();
        trace_dashed(&mut log, &square, true, &[2.0, 2.0]);
        assert_eq!(
            log,
            vec![
                move_to(0.0, 0.0),
                line_to(2.0, 0.0),
                move_to(4.0, 0.0),
                line_to(4.0, 2.0),
                move_to(4.0, 4.0),
                line_to(2.0, 4.0),
                move_to(0.0, 4.0),
                line_to(0.0, 2.0),
                move_to(0.0, 0.0),
            ]
        );
    }

    #[test]
    fn odd_pattern_alternates_meaning_on_wrap() {
        // A single-entry pattern alternates draw/skip every 5 units.
        let mut log = Vec::new();
        trace_dashed(&mut log, &[pt(0.0, 0.0), pt(12.0, 0.0)], false, &[5.0]);
        assert_eq!(
            log,
            vec![
                move_to(0.0, 0.0),
                line_to(5.0, 0.0),
                move_to(10.0, 0.0),
                line_to(12.0, 0.0),
            ]
        );
    }

    #[test]
    fn degenerate_pattern_falls_back_to_solid() {
        let points = [pt(0.0, 0.0), pt(9.0, 0.0)];
        let mut dashed = Vec::new();
        trace_dashed(&mut dashed, &points, false, &[]);
        let mut zeros = Vec::new();
        trace_dashed(&mut zeros, &points, false, &[0.0, 0.0]);
        let mut solid = Vec::new();
        trace(&mut solid, &points, false);
        assert_eq!(dashed, solid);
        assert_eq!(zeros, solid);
    }

    #[test]
    fn dashed_degenerate_inputs_are_noops() {
        let mut log = Vec::new();
        trace_dashed(&mut log, &[], false, &[8.0, 4.0]);
        trace_dashed(&mut log, &[pt(2.0, 2.0)], true, &[8.0, 4.0]);
        assert!(log.is_empty());
    }

    #[test]
    fn duplicate_points_are_skipped() {
        let mut log = Vec::new();
        trace_dashed(
            &mut log,
            &[pt(0.0, 0.0), pt(0.0, 0.0), pt(6.0, 0.0)],
            false,
            &[4.0, 1.0],
        );
        assert_eq!(
            log,
            vec![
                move_to(0.0, 0.0),
                line_to(4.0, 0.0),
                move_to(5.0, 0.0),
                line_to(6.0, 0.0),
            ]
        );
    }
}
