// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canvas operations and the backend traits that consume them.

use easel_scene::{Affine, ElementId, FillStyle, LineStyle, TextRun};

/// A single 2D canvas operation.
///
/// Operations are plain data and carry everything a backend needs; the
/// engine never reads canvas state back. Transform and alpha operations
/// compose with the context's current state and are scoped by
/// [`CanvasOp::Save`]/[`CanvasOp::Restore`] pairs, which the engine always
/// emits balanced.
#[derive(Clone, Debug, PartialEq)]
pub enum CanvasOp {
    /// Push the full context state (transform, alpha, styles, clip).
    Save,
    /// Pop back to the most recently saved context state.
    Restore,
    /// Translate the current transform.
    Translate {
        /// X offset.
        x: f64,
        /// Y offset.
        y: f64,
    },
    /// Rotate the current transform.
    Rotate {
        /// Angle in radians.
        theta: f64,
    },
    /// Scale the current transform.
    Scale {
        /// X factor.
        x: f64,
        /// Y factor.
        y: f64,
    },
    /// Multiply the current transform by a matrix.
    Transform(Affine),
    /// Multiply the global alpha by a factor.
    MulAlpha(f64),
    /// Start a new path.
    BeginPath,
    /// Move the pen without drawing.
    MoveTo {
        /// X coordinate.
        x: f64,
        /// Y coordinate.
        y: f64,
    },
    /// Add a straight line from the pen to the given point.
    LineTo {
        /// X coordinate.
        x: f64,
        /// Y coordinate.
        y: f64,
    },
    /// Set the stroke style (width, cap, join, color).
    ///
    /// Dash patterns are resolved upstream by the line tracer, so backends
    /// must not install them as native dashes.
    SetLineStyle(LineStyle),
    /// Stroke the current path.
    Stroke,
    /// Set the fill style. Texture fills load asynchronously; the dependent
    /// [`CanvasOp::Fill`] is deferred until the image arrives.
    SetFillStyle(FillStyle),
    /// Fill the current path.
    Fill,
    /// Fill a text run at the origin. The backend is the text-layout
    /// collaborator.
    FillText(TextRun),
    /// Stroke a text run's outline at the origin.
    StrokeText {
        /// Stroke style.
        style: LineStyle,
        /// The text run.
        run: TextRun,
    },
    /// Draw a sub-rectangle of an asynchronously loaded image, centered on
    /// the origin.
    DrawImage {
        /// Source image URL.
        url: String,
        /// X offset of the source region within the image.
        src_x: f64,
        /// Y offset of the source region within the image.
        src_y: f64,
        /// Width of the region.
        width: f64,
        /// Height of the region.
        height: f64,
    },
}

/// A surface that applies canvas operations.
pub trait CanvasBackend {
    /// Apply one operation.
    fn apply(&mut self, op: CanvasOp);
}

/// Plain op log. Useful for tests and debugging.
impl CanvasBackend for Vec<CanvasOp> {
    fn apply(&mut self, op: CanvasOp) {
        self.push(op);
    }
}

/// Target sizing for one reconciled canvas child.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CanvasMetrics {
    /// Width in CSS pixels.
    pub width: f64,
    /// Height in CSS pixels.
    pub height: f64,
    /// Device pixel ratio.
    pub ratio: f64,
}

impl CanvasMetrics {
    /// Backing-store width in device pixels.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "canvas backing stores are sized in whole device pixels"
    )]
    pub fn buffer_width(&self) -> u32 {
        (self.width * self.ratio).round().max(0.0) as u32
    }

    /// Backing-store height in device pixels.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "canvas backing stores are sized in whole device pixels"
    )]
    pub fn buffer_height(&self) -> u32 {
        (self.height * self.ratio).round().max(0.0) as u32
    }
}

/// Placement of an embedded DOM element within the container.
///
/// `transform` and `alpha` are the composed ambient values at the element's
/// position in the form tree; the element's own CSS opacity multiplies on
/// top in the backend.
#[derive(Clone, Debug, PartialEq)]
pub struct ElementPlacement {
    /// Ambient group matrices × the element form's own matrix, in collage
    /// space (origin center, y up).
    pub transform: Affine,
    /// Ambient alpha × the element form's own alpha.
    pub alpha: f64,
    /// Element width in CSS pixels.
    pub width: f64,
    /// Element height in CSS pixels.
    pub height: f64,
    /// Stage width in CSS pixels.
    pub stage_width: f64,
    /// Stage height in CSS pixels.
    pub stage_height: f64,
}

impl ElementPlacement {
    /// The full CSS matrix for the element: a flip-and-center base matrix
    /// (collage space to top-left CSS space, accounting for the element's
    /// size) composed with the collage-space transform.
    pub fn css_matrix(&self) -> Affine {
        let base = Affine::new([
            1.0,
            0.0,
            0.0,
            -1.0,
            (self.stage_width - self.width) / 2.0,
            (self.stage_height - self.height) / 2.0,
        ]);
        base * self.transform
    }
}

/// A host container that the reconciler drives.
///
/// The reconciler walks the container's existing children by index, reusing
/// canvas children in place, removing whatever else it finds, appending
/// fresh canvases past the end, and placing embedded elements. The stage
/// decides how each of those maps onto its real child list.
pub trait StageBackend {
    /// Drawing surface of one canvas child.
    type Canvas: CanvasBackend;

    /// Scale factor between CSS pixels and backing-store pixels.
    fn device_pixel_ratio(&self) -> f64;

    /// Number of children currently in the container.
    fn child_count(&self) -> usize;

    /// Returns `true` if the child at `index` is a reusable canvas.
    fn child_is_canvas(&self, index: usize) -> bool;

    /// Remove the child at `index`. Later children shift down by one.
    fn remove_child(&mut self, index: usize);

    /// Resize the canvas child at `index` to the given metrics and return
    /// its drawing surface. Resizing resets the surface to its default
    /// state.
    fn reuse_canvas(&mut self, index: usize, metrics: &CanvasMetrics) -> Self::Canvas;

    /// Append a fresh canvas child sized to the given metrics and return
    /// its drawing surface.
    fn append_canvas(&mut self, metrics: &CanvasMetrics) -> Self::Canvas;

    /// Insert or update the embedded element at `index`.
    ///
    /// If the child at `index` already hosts an element, it is updated in
    /// place; otherwise a new node is inserted there (canvas children are
    /// never displaced). Unknown ids are a no-op.
    fn place_element(&mut self, index: usize, id: ElementId, placement: &ElementPlacement);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec_backend_records_ops() {
        let mut log: Vec<CanvasOp> = Vec::new();
        log.apply(CanvasOp::BeginPath);
        log.apply(CanvasOp::MoveTo { x: 1.0, y: 2.0 });
        assert_eq!(
            log,
            vec![CanvasOp::BeginPath, CanvasOp::MoveTo { x: 1.0, y: 2.0 }]
        );
    }

    #[test]
    fn metrics_scale_buffer_sizes() {
        let metrics = CanvasMetrics {
            width: 320.0,
            height: 200.0,
            ratio: 2.0,
        };
        assert_eq!(metrics.buffer_width(), 640);
        assert_eq!(metrics.buffer_height(), 400);
    }

    #[test]
    fn css_matrix_flips_and_centers() {
        let placement = ElementPlacement {
            transform: Affine::IDENTITY,
            alpha: 1.0,
            width: 40.0,
            height: 20.0,
            stage_width: 200.0,
            stage_height: 100.0,
        };
        let m = placement.css_matrix().as_coeffs();
        assert_eq!(m, [1.0, 0.0, 0.0, -1.0, 80.0, 40.0]);
    }

    #[test]
    fn css_matrix_composes_ambient_transform() {
        let placement = ElementPlacement {
            transform: Affine::translate((10.0, 5.0)),
            alpha: 1.0,
            width: 0.0,
            height: 0.0,
            stage_width: 100.0,
            stage_height: 100.0,
        };
        // Translating up in collage space moves down in CSS space.
        let m = placement.css_matrix().as_coeffs();
        assert_eq!(m, [1.0, 0.0, 0.0, -1.0, 60.0, 45.0]);
    }
}
