// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Easel Scene: the declarative collage scene model.
//!
//! This crate defines a small, plain-old-data (POD) friendly scene model for
//! 2D collages and the public API for building it. It sits below the render
//! engine and has no notion of a canvas, a DOM, or any backend at all.
//!
//! # Position in the stack
//!
//! Conceptually there are three layers:
//!
//! - **Scene model (this crate)**: [`Form`] trees, [`Shape`]/[`Path`]
//!   geometry, line and fill styles, and the [`Collage`] container.
//! - **Render engine**: the `easel_render` crate walks a [`Collage`] and
//!   turns it into canvas operations plus child-node reconciliation.
//! - **Backends**: concrete surfaces such as the web canvas backend that
//!   apply those operations to a real drawing context.
//!
//! # Core concepts
//!
//! - **Forms**: one drawable or group primitive with its own local
//!   translation, rotation, scale, and opacity. Forms compose by nesting:
//!   a [`Form::group`]'s transform and opacity compound with each child's
//!   own.
//! - **Shapes and paths**: closed polygons and open polylines built from
//!   point lists by pure constructors ([`rect`], [`oval`], [`ngon`],
//!   [`polygon`], [`path`], [`segment`], ...).
//! - **Collages**: a sized scene, an ordered list of top-level forms drawn
//!   back-to-front (later entries draw over earlier ones).
//!
//! Coordinates are Cartesian with the origin at the collage center and the
//! y-axis pointing up. The render engine owns the flip onto backends whose
//! y-axis points down.
//!
//! # Example
//!
//! ```
//! use easel_scene::{Collage, Color, LineStyle, ngon, rect, segment, Point};
//!
//! let scene = Collage::new(200.0, 200.0, vec![
//!     rect(80.0, 40.0).filled(Color::from_rgba8(40, 120, 240, 255)),
//!     ngon(6, 30.0).outlined(LineStyle::solid(Color::BLACK)).shift(50.0, 0.0),
//!     segment(Point::new(-90.0, 0.0), Point::new(90.0, 0.0))
//!         .traced(LineStyle::dashed(Color::BLACK)),
//! ]);
//! assert_eq!(scene.forms.len(), 3);
//! ```

mod form;
mod path;
mod shape;
mod style;

pub use form::{BasicForm, Collage, ElementId, Form, ShapeStyle};
pub use path::{Path, path, segment};
pub use peniko::{Color, Gradient};
pub use shape::{Shape, circle, ngon, oval, polygon, rect, square};
pub use style::{FillStyle, LineCap, LineJoin, LineStyle, TextRun};

/// Affine transform type used by the scene model.
pub type Affine = kurbo::Affine;

/// A point in collage space: origin at the collage center, y-axis up.
pub type Point = kurbo::Point;
