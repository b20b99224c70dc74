// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-form rendering: local transform and alpha application plus dispatch
//! to the drawing primitives.

use core::f64::consts::TAU;

use easel_scene::{Affine, BasicForm, Form, LineStyle, Point, ShapeStyle};

use crate::ops::{CanvasBackend, CanvasOp};
use crate::trace::{trace, trace_dashed};

/// The form's local matrix: translation, then uniform scale, then rotation.
pub fn form_matrix(form: &Form) -> Affine {
    Affine::translate((form.x, form.y)) * Affine::scale(form.scale) * Affine::rotate(form.theta)
}

/// Render one drawable form into `backend`.
///
/// `ambient_alpha` is the accumulated opacity of the enclosing groups; the
/// form's own alpha multiplies onto it inside the form's save scope, so
/// sibling forms never observe each other's state.
///
/// Group and element forms are routed by the reconciler and are a no-op
/// here.
pub fn render_form<B: CanvasBackend + ?Sized>(backend: &mut B, ambient_alpha: f64, form: &Form) {
    backend.apply(CanvasOp::Save);
    if form.x != 0.0 || form.y != 0.0 {
        backend.apply(CanvasOp::Translate {
            x: form.x,
            y: form.y,
        });
    }
    if form.theta != 0.0 {
        backend.apply(CanvasOp::Rotate {
            theta: form.theta % TAU,
        });
    }
    if form.scale != 1.0 {
        backend.apply(CanvasOp::Scale {
            x: form.scale,
            y: form.scale,
        });
    }
    let alpha = ambient_alpha * form.alpha;
    if alpha != 1.0 {
        backend.apply(CanvasOp::MulAlpha(alpha));
    }
    backend.apply(CanvasOp::BeginPath);
    match &form.basic {
        BasicForm::Path(style, path) => {
            draw_line(backend, style, &path.points, false);
        }
        BasicForm::Shape(ShapeStyle::Line(style), shape) => {
            draw_line(backend, style, &shape.points, true);
        }
        BasicForm::Shape(ShapeStyle::Fill(fill), shape) => {
            trace(backend, &shape.points, true);
            backend.apply(CanvasOp::SetFillStyle(fill.clone()));
            flip(backend);
            backend.apply(CanvasOp::Fill);
        }
        BasicForm::Text(run) => {
            flip(backend);
            backend.apply(CanvasOp::FillText(run.clone()));
        }
        BasicForm::OutlinedText(style, run) => {
            flip(backend);
            backend.apply(CanvasOp::StrokeText {
                style: style.clone(),
                run: run.clone(),
            });
        }
        BasicForm::Image {
            width,
            height,
            src_x,
            src_y,
            url,
        } => {
            flip(backend);
            backend.apply(CanvasOp::DrawImage {
                url: url.clone(),
                src_x: *src_x,
                src_y: *src_y,
                width: *width,
                height: *height,
            });
        }
        // Group traversal and element placement happen during
        // reconciliation, not here.
        BasicForm::Group(..) | BasicForm::Element { .. } => {}
    }
    backend.apply(CanvasOp::Restore);
}

fn draw_line<B: CanvasBackend + ?Sized>(
    backend: &mut B,
    style: &LineStyle,
    points: &[Point],
    closed: bool,
) {
    backend.apply(CanvasOp::SetLineStyle(style.clone()));
    if style.dashing.is_empty() {
        trace(backend, points, closed);
    } else {
        trace_dashed(backend, points, closed, &style.dashing);
    }
    flip(backend);
    backend.apply(CanvasOp::Stroke);
}

/// Undo the y-up flip for the upcoming stroke/fill/text/image operation.
fn flip<B: CanvasBackend + ?Sized>(backend: &mut B) {
    backend.apply(CanvasOp::Scale { x: 1.0, y: -1.0 });
}
