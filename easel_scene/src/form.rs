// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Forms: drawable primitives with local transforms, and the collage
//! container that holds them.

use peniko::Color;

use crate::path::Path;
use crate::shape::Shape;
use crate::style::{FillStyle, LineStyle, TextRun};
use crate::Affine;

/// Identifier for an embedded DOM element.
///
/// This is a small, opaque handle. The stage backend owns the registry that
/// resolves it to a live element; an unknown id is drawn as nothing.
#[repr(transparent)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ElementId(pub u32);

/// How a closed shape is rendered: stroked along its outline or filled.
#[derive(Clone, Debug, PartialEq)]
pub enum ShapeStyle {
    /// Stroke the outline.
    Line(LineStyle),
    /// Fill the interior.
    Fill(FillStyle),
}

/// The drawable payload of a [`Form`].
#[derive(Clone, Debug, PartialEq)]
pub enum BasicForm {
    /// An open polyline stroked with a line style.
    Path(LineStyle, Path),
    /// A closed polygon, stroked or filled.
    Shape(ShapeStyle, Shape),
    /// A filled run of text.
    Text(TextRun),
    /// A run of text stroked along its outline.
    OutlinedText(LineStyle, TextRun),
    /// A sub-rectangle of an image, centered on the origin.
    ///
    /// The image is loaded asynchronously from `url`; the draw is deferred
    /// until it arrives.
    Image {
        /// Width of the drawn region.
        width: f64,
        /// Height of the drawn region.
        height: f64,
        /// X offset of the source region within the image.
        src_x: f64,
        /// Y offset of the source region within the image.
        src_y: f64,
        /// Source image URL.
        url: String,
    },
    /// An embedded opaque DOM element.
    ///
    /// Elements bypass canvas drawing entirely; the reconciler positions
    /// them with a CSS transform. The dimensions are carried here so the
    /// centering matrix can be composed without measuring the DOM.
    Element {
        /// Registered element handle.
        id: ElementId,
        /// Element width in CSS pixels.
        width: f64,
        /// Element height in CSS pixels.
        height: f64,
    },
    /// A transformed group of child forms.
    ///
    /// The matrix, and the group form's own transform and opacity, compound
    /// with each child's own.
    Group(Affine, Vec<Form>),
}

/// One drawable or group primitive with its own local transform and opacity.
///
/// Forms are immutable values; the combinators consume and return them.
#[derive(Clone, Debug, PartialEq)]
pub struct Form {
    /// Rotation angle in radians, counterclockwise.
    pub theta: f64,
    /// Uniform scale factor.
    pub scale: f64,
    /// Horizontal translation.
    pub x: f64,
    /// Vertical translation (y-axis up).
    pub y: f64,
    /// Opacity in `[0, 1]`.
    pub alpha: f64,
    /// The drawable payload.
    pub basic: BasicForm,
}

impl Form {
    /// Wrap a payload in a form with the neutral transform and full opacity.
    pub fn new(basic: BasicForm) -> Self {
        Self {
            theta: 0.0,
            scale: 1.0,
            x: 0.0,
            y: 0.0,
            alpha: 1.0,
            basic,
        }
    }

    /// Translate the form by the given offsets.
    pub fn shift(mut self, x: f64, y: f64) -> Self {
        self.x += x;
        self.y += y;
        self
    }

    /// Translate the form horizontally.
    pub fn shift_x(self, x: f64) -> Self {
        self.shift(x, 0.0)
    }

    /// Translate the form vertically.
    pub fn shift_y(self, y: f64) -> Self {
        self.shift(0.0, y)
    }

    /// Scale the form by the given factor, compounding with its current
    /// scale.
    pub fn scale(mut self, factor: f64) -> Self {
        self.scale *= factor;
        self
    }

    /// Rotate the form by the given angle in radians, counterclockwise,
    /// compounding with its current rotation.
    pub fn rotate(mut self, angle: f64) -> Self {
        self.theta += angle;
        self
    }

    /// Set the form's opacity.
    pub fn alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Group child forms so they can be transformed as one.
    pub fn group(forms: Vec<Self>) -> Self {
        Self::new(BasicForm::Group(Affine::IDENTITY, forms))
    }

    /// Group child forms under an explicit matrix.
    pub fn group_transform(matrix: Affine, forms: Vec<Self>) -> Self {
        Self::new(BasicForm::Group(matrix, forms))
    }

    /// A filled run of text.
    pub fn text(run: TextRun) -> Self {
        Self::new(BasicForm::Text(run))
    }

    /// A run of text stroked along its outline.
    pub fn outlined_text(style: LineStyle, run: TextRun) -> Self {
        Self::new(BasicForm::OutlinedText(style, run))
    }

    /// A `width` × `height` region of the image at `url`, sampled starting
    /// at `src` and centered on the origin.
    pub fn image(width: f64, height: f64, src: (f64, f64), url: impl Into<String>) -> Self {
        Self::new(BasicForm::Image {
            width,
            height,
            src_x: src.0,
            src_y: src.1,
            url: url.into(),
        })
    }

    /// Embed a registered DOM element of the given CSS-pixel size.
    pub fn element(id: ElementId, width: f64, height: f64) -> Self {
        Self::new(BasicForm::Element { id, width, height })
    }
}

impl Shape {
    /// Fill the shape with a solid color.
    pub fn filled(self, color: Color) -> Form {
        Form::new(BasicForm::Shape(ShapeStyle::Fill(FillStyle::Solid(color)), self))
    }

    /// Stroke the shape's outline.
    pub fn outlined(self, style: LineStyle) -> Form {
        Form::new(BasicForm::Shape(ShapeStyle::Line(style), self))
    }

    /// Fill the shape with a tiled texture loaded from a URL.
    pub fn textured(self, url: impl Into<String>) -> Form {
        Form::new(BasicForm::Shape(
            ShapeStyle::Fill(FillStyle::Texture(url.into())),
            self,
        ))
    }

    /// Fill the shape with a gradient.
    pub fn gradient(self, gradient: peniko::Gradient) -> Form {
        Form::new(BasicForm::Shape(
            ShapeStyle::Fill(FillStyle::Gradient(gradient)),
            self,
        ))
    }
}

impl Path {
    /// Stroke the path with a line style.
    pub fn traced(self, style: LineStyle) -> Form {
        Form::new(BasicForm::Path(style, self))
    }
}

/// A sized scene: dimensions in CSS pixels plus an ordered list of top-level
/// forms, drawn back-to-front (later entries draw over earlier ones).
#[derive(Clone, Debug, PartialEq)]
pub struct Collage {
    /// Scene width in CSS pixels.
    pub width: f64,
    /// Scene height in CSS pixels.
    pub height: f64,
    /// Top-level forms, back-to-front.
    pub forms: Vec<Form>,
}

impl Collage {
    /// Create a collage.
    pub fn new(width: f64, height: f64, forms: Vec<Form>) -> Self {
        Self {
            width,
            height,
            forms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::rect;

    #[test]
    fn combinators_compound() {
        let form = rect(10.0, 10.0)
            .filled(Color::BLACK)
            .shift(3.0, 4.0)
            .shift_x(1.0)
            .rotate(0.5)
            .rotate(0.25)
            .scale(2.0)
            .scale(3.0)
            .alpha(0.5);
        assert_eq!((form.x, form.y), (4.0, 4.0));
        assert_eq!(form.theta, 0.75);
        assert_eq!(form.scale, 6.0);
        assert_eq!(form.alpha, 0.5);
    }

    #[test]
    fn new_form_is_neutral() {
        let form = Form::text(TextRun::new("hi", "16px sans-serif", Color::BLACK));
        assert_eq!((form.x, form.y), (0.0, 0.0));
        assert_eq!(form.theta, 0.0);
        assert_eq!(form.scale, 1.0);
        assert_eq!(form.alpha, 1.0);
    }

    #[test]
    fn group_nests_forms() {
        let inner = rect(2.0, 2.0).filled(Color::BLACK);
        let group = Form::group(vec![inner.clone()]).alpha(0.5);
        let BasicForm::Group(matrix, children) = &group.basic else {
            panic!("expected a group");
        };
        assert_eq!(*matrix, Affine::IDENTITY);
        assert_eq!(children.as_slice(), [inner]);
    }
}
