// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Easel Render Reference Backend.
//!
//! This crate provides a small, stateful implementation of
//! [`CanvasBackend`] and [`StageBackend`] for **op recording and
//! reconciliation tracing**.
//!
//! It is intentionally *not* a reference renderer:
//! - It does **not** rasterize to pixels.
//! - It does **not** establish "golden" rendering behavior across backends.
//! - It is intended primarily for tests and debugging that want to assert on
//!   emitted canvas ops and on how the reconciler treats the child list
//!   (creation, reuse, removal, element placement).

use std::cell::RefCell;
use std::rc::Rc;

use easel_render::{CanvasBackend, CanvasMetrics, CanvasOp, ElementPlacement, StageBackend};
use easel_scene::ElementId;

/// Shared op log handle for one simulated canvas child.
type SharedOps = Rc<RefCell<Vec<CanvasOp>>>;

/// A recording canvas surface.
///
/// Ops are appended to a log shared with the [`RefStage`] child that handed
/// the surface out, so they stay inspectable after the surface is dropped.
#[derive(Clone, Debug, Default)]
pub struct RefCanvas {
    ops: SharedOps,
}

impl RefCanvas {
    /// The ops applied so far, in order.
    pub fn ops(&self) -> Vec<CanvasOp> {
        self.ops.borrow().clone()
    }
}

impl CanvasBackend for RefCanvas {
    fn apply(&mut self, op: CanvasOp) {
        self.ops.borrow_mut().push(op);
    }
}

/// One simulated child of the container.
#[derive(Clone, Debug)]
pub enum RefChild {
    /// A canvas child with its op log and the metrics it was last sized to.
    Canvas {
        /// Ops applied since the canvas was last sized.
        ops: SharedOps,
        /// Sizing from the most recent reuse/creation.
        metrics: CanvasMetrics,
    },
    /// An embedded element child.
    Element {
        /// The placed element.
        id: ElementId,
        /// Placement from the most recent update.
        placement: ElementPlacement,
    },
}

/// Simulated container stage.
///
/// This backend:
/// - Keeps a plain child list of [`RefChild`] values,
/// - Hands out [`RefCanvas`] surfaces whose op logs stay attached to the
///   child,
/// - Counts creations, reuses, removals, and element placements so tests
///   can assert on reconciliation behavior.
#[derive(Debug)]
pub struct RefStage {
    children: Vec<RefChild>,
    ratio: f64,
    /// Canvas children appended since the last [`RefStage::reset_counters`].
    pub canvases_created: usize,
    /// Canvas children reused in place since the last reset.
    pub canvases_reused: usize,
    /// Children removed since the last reset.
    pub children_removed: usize,
    /// Element placements (inserts and in-place updates) since the last
    /// reset.
    pub elements_placed: usize,
}

impl Default for RefStage {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl RefStage {
    /// Create an empty stage with the given device pixel ratio.
    pub fn new(ratio: f64) -> Self {
        Self {
            children: Vec::new(),
            ratio,
            canvases_created: 0,
            canvases_reused: 0,
            children_removed: 0,
            elements_placed: 0,
        }
    }

    /// The current child list.
    pub fn children(&self) -> &[RefChild] {
        &self.children
    }

    /// The ops recorded by the canvas child at `index` since it was last
    /// sized.
    ///
    /// # Panics
    ///
    /// Panics if the child at `index` is not a canvas.
    pub fn canvas_ops(&self, index: usize) -> Vec<CanvasOp> {
        match &self.children[index] {
            RefChild::Canvas { ops, .. } => ops.borrow().clone(),
            RefChild::Element { .. } => panic!("child {index} is not a canvas"),
        }
    }

    /// Zero all counters, keeping the child list.
    pub fn reset_counters(&mut self) {
        self.canvases_created = 0;
        self.canvases_reused = 0;
        self.children_removed = 0;
        self.elements_placed = 0;
    }

    /// Push a non-canvas child, simulating a foreign node in the container.
    pub fn push_foreign_child(&mut self, id: ElementId) {
        self.children.push(RefChild::Element {
            id,
            placement: ElementPlacement {
                transform: easel_scene::Affine::IDENTITY,
                alpha: 1.0,
                width: 0.0,
                height: 0.0,
                stage_width: 0.0,
                stage_height: 0.0,
            },
        });
    }
}

impl StageBackend for RefStage {
    type Canvas = RefCanvas;

    fn device_pixel_ratio(&self) -> f64 {
        self.ratio
    }

    fn child_count(&self) -> usize {
        self.children.len()
    }

    fn child_is_canvas(&self, index: usize) -> bool {
        matches!(self.children[index], RefChild::Canvas { .. })
    }

    fn remove_child(&mut self, index: usize) {
        self.children.remove(index);
        self.children_removed += 1;
    }

    fn reuse_canvas(&mut self, index: usize, metrics: &CanvasMetrics) -> Self::Canvas {
        self.canvases_reused += 1;
        let RefChild::Canvas {
            ops,
            metrics: stored,
        } = &mut self.children[index]
        else {
            panic!("child {index} is not a canvas");
        };
        *stored = *metrics;
        // Resizing a canvas resets its backing store and context state.
        ops.borrow_mut().clear();
        RefCanvas {
            ops: Rc::clone(ops),
        }
    }

    fn append_canvas(&mut self, metrics: &CanvasMetrics) -> Self::Canvas {
        self.canvases_created += 1;
        let ops: SharedOps = Rc::default();
        self.children.push(RefChild::Canvas {
            ops: Rc::clone(&ops),
            metrics: *metrics,
        });
        RefCanvas { ops }
    }

    fn place_element(&mut self, index: usize, id: ElementId, placement: &ElementPlacement) {
        self.elements_placed += 1;
        let child = RefChild::Element {
            id,
            placement: placement.clone(),
        };
        if index < self.children.len() && !self.child_is_canvas(index) {
            self.children[index] = child;
        } else {
            self.children.insert(index, child);
        }
    }
}
