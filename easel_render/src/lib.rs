// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Easel Render: the backend-agnostic collage render engine.
//!
//! This crate turns an `easel_scene` [`Collage`](easel_scene::Collage) into
//! two kinds of effects on a host surface:
//!
//! - **Canvas operations** ([`CanvasOp`]): a flat, plain-old-data command
//!   stream (save/restore, transforms, path verbs, stroke/fill/text/image
//!   draws) applied by a [`CanvasBackend`].
//! - **Child-node reconciliation** ([`StageBackend`]): matching the scene's
//!   top-level form list against the container's existing children, reusing
//!   canvas children by position, placing embedded elements, and removing
//!   stale nodes.
//!
//! The engine batches each maximal run of consecutive canvas-drawable forms
//! into one physical canvas child. Reuse is by position, not identity:
//! reordering the top-level list defeats reuse. That is a deliberate
//! simplicity/performance tradeoff, not a bug.
//!
//! Scene coordinates are Cartesian with the origin at the collage center and
//! the y-axis up; acquired contexts are primed with a centering translation
//! and a `(ratio, -ratio)` scale so device pixels, CSS pixels, and the y
//! flip are all handled in one place. Stroke and fill operations are
//! preceded by a `(1, -1)` scale to undo the flip for style-space effects,
//! matching the drawing conventions the scene model was designed around.
//!
//! Backends live elsewhere: `easel_web_canvas` drives a real DOM container,
//! and `easel_render_ref` records everything for tests and debugging.

mod ops;
mod reconcile;
mod render;
mod trace;

pub use ops::{CanvasBackend, CanvasMetrics, CanvasOp, ElementPlacement, StageBackend};
pub use reconcile::update_stage;
pub use render::{form_matrix, render_form};
pub use trace::{trace, trace_dashed};
