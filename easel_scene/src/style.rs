// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Line, fill, and text styling for forms.

use peniko::Color;

/// How the ends of a stroked line are drawn.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum LineCap {
    /// End exactly at the endpoint.
    #[default]
    Flat,
    /// Round off the end with a semicircle.
    Round,
    /// Extend the end by half the line width.
    Padded,
}

/// How two stroked segments are joined.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum LineJoin {
    /// Round the corner.
    Smooth,
    /// Extend the corner to a sharp point, clipped past the given miter limit.
    Sharp(f64),
    /// Cut the corner off flat.
    Clipped,
}

impl Default for LineJoin {
    fn default() -> Self {
        Self::Sharp(10.0)
    }
}

/// Styling for stroked paths and shape outlines.
///
/// The dash pattern is a circular sequence of alternating on/off lengths;
/// it cycles regardless of parity, so an odd-length pattern is legal and
/// simply alternates its meaning on each wrap.
#[derive(Clone, Debug, PartialEq)]
pub struct LineStyle {
    /// Stroke color.
    pub color: Color,
    /// Stroke width.
    pub width: f64,
    /// End-cap style.
    pub cap: LineCap,
    /// Join style.
    pub join: LineJoin,
    /// Dash pattern: alternating drawn/skipped lengths. Empty means solid.
    pub dashing: Vec<f64>,
    /// Phase offset into the dash pattern.
    pub dash_offset: f64,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            width: 1.0,
            cap: LineCap::Flat,
            join: LineJoin::default(),
            dashing: Vec::new(),
            dash_offset: 0.0,
        }
    }
}

impl LineStyle {
    /// A solid line of the given color with default width, cap, and join.
    pub fn solid(color: Color) -> Self {
        Self {
            color,
            ..Self::default()
        }
    }

    /// A dashed line of the given color (8 on, 4 off).
    pub fn dashed(color: Color) -> Self {
        Self {
            color,
            dashing: vec![8.0, 4.0],
            ..Self::default()
        }
    }

    /// A dotted line of the given color (3 on, 3 off).
    pub fn dotted(color: Color) -> Self {
        Self {
            color,
            dashing: vec![3.0, 3.0],
            ..Self::default()
        }
    }
}

/// How the interior of a closed shape is painted.
#[derive(Clone, Debug, PartialEq)]
pub enum FillStyle {
    /// A single solid color.
    Solid(Color),
    /// A tiled image loaded from a URL. Loading is asynchronous; the fill is
    /// deferred until the image arrives.
    Texture(String),
    /// A gradient.
    Gradient(peniko::Gradient),
}

/// A single styled run of text.
///
/// Layout and measurement are owned by the backend acting as the text
/// collaborator; the scene model only carries what it needs to hand over.
#[derive(Clone, Debug, PartialEq)]
pub struct TextRun {
    /// The text to draw.
    pub content: String,
    /// CSS font shorthand, e.g. `"16px sans-serif"`.
    pub font: String,
    /// Fill color for plain text.
    pub color: Color,
}

impl TextRun {
    /// Create a text run.
    pub fn new(content: impl Into<String>, font: impl Into<String>, color: Color) -> Self {
        Self {
            content: content.into(),
            font: font.into(),
            color,
        }
    }
}
