// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Web Canvas (2D) backend for the Easel render engine.
//!
//! This crate provides the [`CanvasBackend`] and [`StageBackend`]
//! implementations that drive a real browser container when targeting
//! `wasm32`: canvas children are `<canvas>` elements, drawing goes through
//! `web_sys::CanvasRenderingContext2d`, and embedded elements are positioned
//! with CSS transforms.
//!
//! # Usage
//!
//! Keep a [`WebStage`] alive across renders when the scene embeds DOM
//! elements (the stage owns the element registry); use [`render_into`] for
//! one-shot canvas-only scenes.
//!
//! ```no_run
//! #[cfg(target_arch = "wasm32")]
//! fn draw(
//!     container: web_sys::HtmlElement,
//!     collage: &easel_scene::Collage,
//! ) -> Result<(), wasm_bindgen::JsValue> {
//!     easel_web_canvas::render_into(&container, collage)
//! }
//! ```
//!
//! Notes:
//! - Dash patterns are resolved by the engine's line tracer, so the native
//!   `setLineDash` API is never used here.
//! - Texture fills and images load asynchronously: the dependent fill/draw
//!   is re-issued from the load callback against the same context. A context
//!   that was replaced by a later render pass may receive a stale callback;
//!   that inconsistency under rapid re-render is accepted.
//! - Gradients are best-effort: Canvas 2D does not support all Peniko
//!   gradient features (sweep gradients, extend modes beyond pad).

use easel_render::{CanvasBackend, CanvasMetrics, CanvasOp, ElementPlacement, StageBackend};
use easel_scene::ElementId;

#[cfg(target_arch = "wasm32")]
use easel_render::update_stage;
#[cfg(target_arch = "wasm32")]
use easel_scene::{Affine, Collage, FillStyle, LineCap, LineJoin, LineStyle, TextRun};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsCast;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsValue;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::closure::Closure;
#[cfg(target_arch = "wasm32")]
use web_sys::{
    CanvasGradient, CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlElement,
    HtmlImageElement, Node, Window,
};

#[cfg(target_arch = "wasm32")]
fn color_to_css(color: peniko::Color) -> String {
    // `Rgba8` formats as a CSS `rgb(...)`/`rgba(...)` string.
    color.to_rgba8().to_string()
}

#[cfg(target_arch = "wasm32")]
fn dynamic_color_to_css(color: peniko::color::DynamicColor) -> String {
    let color = color.to_alpha_color::<peniko::color::Srgb>();
    color_to_css(color)
}

#[cfg(target_arch = "wasm32")]
fn cap_to_canvas(cap: LineCap) -> &'static str {
    match cap {
        LineCap::Flat => "butt",
        LineCap::Round => "round",
        LineCap::Padded => "square",
    }
}

#[cfg(target_arch = "wasm32")]
fn join_to_canvas(join: LineJoin) -> &'static str {
    match join {
        LineJoin::Smooth => "round",
        LineJoin::Sharp(_) => "miter",
        LineJoin::Clipped => "bevel",
    }
}

#[cfg(target_arch = "wasm32")]
fn css_matrix(transform: Affine) -> String {
    let [a, b, c, d, e, f] = transform.as_coeffs();
    format!("matrix({a}, {b}, {c}, {d}, {e}, {f})")
}

#[cfg(target_arch = "wasm32")]
fn context_2d(canvas: &HtmlCanvasElement) -> CanvasRenderingContext2d {
    canvas
        .get_context("2d")
        .expect("get_context('2d')")
        .expect("2d context")
        .dyn_into::<CanvasRenderingContext2d>()
        .expect("CanvasRenderingContext2d")
}

/// Drawing surface over one `<canvas>` child (only available on `wasm32`).
#[cfg(target_arch = "wasm32")]
#[derive(Clone, Debug)]
pub struct WebCanvas {
    ctx: CanvasRenderingContext2d,
    /// Set while a texture fill is still loading; the fill op is deferred to
    /// the load callback.
    fill_deferred: bool,
}

#[cfg(target_arch = "wasm32")]
impl WebCanvas {
    /// Wrap the 2D context of the given canvas element.
    pub fn new(canvas: &HtmlCanvasElement) -> Self {
        Self {
            ctx: context_2d(canvas),
            fill_deferred: false,
        }
    }

    fn apply_line_style(&self, style: &LineStyle) {
        self.ctx.set_line_width(style.width);
        self.ctx.set_line_cap(cap_to_canvas(style.cap));
        self.ctx.set_line_join(join_to_canvas(style.join));
        if let LineJoin::Sharp(limit) = style.join {
            self.ctx.set_miter_limit(limit);
        }
        self.ctx.set_stroke_style_str(&color_to_css(style.color));
    }

    fn set_fill(&mut self, fill: &FillStyle) {
        self.fill_deferred = false;
        match fill {
            FillStyle::Solid(color) => {
                self.ctx.set_fill_style_str(&color_to_css(*color));
            }
            FillStyle::Gradient(gradient) => {
                if let Some(grad) = self.create_canvas_gradient(gradient) {
                    self.ctx.set_fill_style_canvas_gradient(&grad);
                } else {
                    self.ctx.set_fill_style_str("#ff00ff");
                }
            }
            FillStyle::Texture(url) => {
                // Tiling patterns need the loaded image. Defer the dependent
                // fill to the load callback; the callback re-issues it on
                // this same context (stale contexts are accepted).
                self.fill_deferred = true;
                let Ok(img) = HtmlImageElement::new() else {
                    return;
                };
                let ctx = self.ctx.clone();
                let pattern_img = img.clone();
                let cb = Closure::once_into_js(move || {
                    if let Ok(Some(pattern)) =
                        ctx.create_pattern_with_html_image_element(&pattern_img, "repeat")
                    {
                        ctx.set_fill_style_canvas_pattern(&pattern);
                        ctx.fill();
                    }
                });
                img.set_onload(Some(cb.unchecked_ref()));
                img.set_src(url);
            }
        }
    }

    fn create_canvas_gradient(&self, gradient: &peniko::Gradient) -> Option<CanvasGradient> {
        let grad = match gradient.kind {
            peniko::GradientKind::Linear(pos) => {
                self.ctx
                    .create_linear_gradient(pos.start.x, pos.start.y, pos.end.x, pos.end.y)
            }
            peniko::GradientKind::Radial(pos) => self
                .ctx
                .create_radial_gradient(
                    pos.start_center.x,
                    pos.start_center.y,
                    f64::from(pos.start_radius),
                    pos.end_center.x,
                    pos.end_center.y,
                    f64::from(pos.end_radius),
                )
                .ok()?,
            peniko::GradientKind::Sweep(_pos) => {
                // Canvas 2D conic gradients are not wired up in this backend.
                return None;
            }
        };

        let stops = gradient.stops.as_slice();
        if stops.is_empty() {
            let _ = grad.add_color_stop(0.0, "rgba(0, 0, 0, 0)");
            let _ = grad.add_color_stop(1.0, "rgba(0, 0, 0, 0)");
        } else {
            for stop in stops {
                let offset = stop.offset.clamp(0.0, 1.0);
                if !offset.is_finite() {
                    continue;
                }
                let css = dynamic_color_to_css(stop.color);
                let _ = grad.add_color_stop(offset, &css);
            }
        }
        Some(grad)
    }

    fn fill_text(&self, run: &TextRun) {
        self.ctx.set_font(&run.font);
        self.ctx.set_fill_style_str(&color_to_css(run.color));
        let _ = self.ctx.fill_text(&run.content, 0.0, 0.0);
    }

    fn stroke_text(&self, style: &LineStyle, run: &TextRun) {
        self.ctx.set_font(&run.font);
        self.apply_line_style(style);
        let _ = self.ctx.stroke_text(&run.content, 0.0, 0.0);
    }

    fn draw_image(&self, url: &str, src_x: f64, src_y: f64, width: f64, height: f64) {
        let Ok(img) = HtmlImageElement::new() else {
            return;
        };
        let ctx = self.ctx.clone();
        let loaded = img.clone();
        let cb = Closure::once_into_js(move || {
            let _ = ctx.draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                &loaded,
                src_x,
                src_y,
                width,
                height,
                -width / 2.0,
                -height / 2.0,
                width,
                height,
            );
        });
        img.set_onload(Some(cb.unchecked_ref()));
        img.set_src(url);
        // Draws nothing while the image is still loading; the callback
        // re-issues it.
        let _ = self
            .ctx
            .draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                &img,
                src_x,
                src_y,
                width,
                height,
                -width / 2.0,
                -height / 2.0,
                width,
                height,
            );
    }
}

#[cfg(target_arch = "wasm32")]
impl CanvasBackend for WebCanvas {
    fn apply(&mut self, op: CanvasOp) {
        match op {
            CanvasOp::Save => self.ctx.save(),
            CanvasOp::Restore => self.ctx.restore(),
            CanvasOp::Translate { x, y } => {
                let _ = self.ctx.translate(x, y);
            }
            CanvasOp::Rotate { theta } => {
                let _ = self.ctx.rotate(theta);
            }
            CanvasOp::Scale { x, y } => {
                let _ = self.ctx.scale(x, y);
            }
            CanvasOp::Transform(m) => {
                let [a, b, c, d, e, f] = m.as_coeffs();
                let _ = self.ctx.transform(a, b, c, d, e, f);
            }
            CanvasOp::MulAlpha(alpha) => {
                let current = self.ctx.global_alpha();
                self.ctx.set_global_alpha(current * alpha);
            }
            CanvasOp::BeginPath => self.ctx.begin_path(),
            CanvasOp::MoveTo { x, y } => self.ctx.move_to(x, y),
            CanvasOp::LineTo { x, y } => self.ctx.line_to(x, y),
            CanvasOp::SetLineStyle(style) => self.apply_line_style(&style),
            CanvasOp::Stroke => self.ctx.stroke(),
            CanvasOp::SetFillStyle(fill) => self.set_fill(&fill),
            CanvasOp::Fill => {
                if !self.fill_deferred {
                    self.ctx.fill();
                }
            }
            CanvasOp::FillText(run) => self.fill_text(&run),
            CanvasOp::StrokeText { style, run } => self.stroke_text(&style, &run),
            CanvasOp::DrawImage {
                url,
                src_x,
                src_y,
                width,
                height,
            } => self.draw_image(&url, src_x, src_y, width, height),
        }
    }
}

/// Stage over a container element (only available on `wasm32`).
///
/// The stage owns the registry that resolves [`ElementId`] handles to live
/// elements; keep it alive across renders when the scene embeds elements.
#[cfg(target_arch = "wasm32")]
#[derive(Clone, Debug)]
pub struct WebStage {
    window: Window,
    document: Document,
    container: HtmlElement,
    elements: Vec<HtmlElement>,
}

#[cfg(target_arch = "wasm32")]
impl WebStage {
    /// Create a stage over the given container element.
    pub fn new(container: HtmlElement) -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("missing window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("missing document"))?;
        Ok(Self {
            window,
            document,
            container,
            elements: Vec::new(),
        })
    }

    /// Register an element for embedding via [`easel_scene::Form::element`].
    ///
    /// The returned id stays valid for the stage's lifetime.
    pub fn register_element(&mut self, element: HtmlElement) -> ElementId {
        let id = u32::try_from(self.elements.len())
            .expect("WebStage: too many elements for u32 ElementId");
        self.elements.push(element);
        ElementId(id)
    }

    /// Reconcile and render the collage into the container.
    pub fn render(&mut self, collage: &Collage) {
        update_stage(self, collage);
    }

    fn child_at(&self, index: usize) -> Option<Node> {
        u32::try_from(index)
            .ok()
            .and_then(|i| self.container.child_nodes().get(i))
    }

    fn size_canvas(&self, canvas: &HtmlCanvasElement, metrics: &CanvasMetrics) {
        canvas.set_width(metrics.buffer_width());
        canvas.set_height(metrics.buffer_height());
        let style = canvas.style();
        let _ = style.set_property("width", &format!("{}px", metrics.width));
        let _ = style.set_property("height", &format!("{}px", metrics.height));
    }

    fn make_wrapper(&self) -> Option<HtmlElement> {
        let wrapper = self
            .document
            .create_element("div")
            .ok()?
            .dyn_into::<HtmlElement>()
            .ok()?;
        let _ = wrapper.style().set_property("position", "absolute");
        Some(wrapper)
    }

    /// The wrapped element's own CSS opacity, defaulting to 1.
    fn element_opacity(element: &HtmlElement) -> f64 {
        element
            .style()
            .get_property_value("opacity")
            .ok()
            .and_then(|value| value.parse::<f64>().ok())
            .unwrap_or(1.0)
    }
}

#[cfg(target_arch = "wasm32")]
impl StageBackend for WebStage {
    type Canvas = WebCanvas;

    fn device_pixel_ratio(&self) -> f64 {
        self.window.device_pixel_ratio()
    }

    fn child_count(&self) -> usize {
        self.container.child_nodes().length() as usize
    }

    fn child_is_canvas(&self, index: usize) -> bool {
        self.child_at(index)
            .is_some_and(|node| node.dyn_ref::<HtmlCanvasElement>().is_some())
    }

    fn remove_child(&mut self, index: usize) {
        if let Some(node) = self.child_at(index) {
            let _ = self.container.remove_child(&node);
        }
    }

    fn reuse_canvas(&mut self, index: usize, metrics: &CanvasMetrics) -> Self::Canvas {
        let canvas = self
            .child_at(index)
            .and_then(|node| node.dyn_into::<HtmlCanvasElement>().ok())
            .expect("reuse_canvas: child is a canvas");
        // Setting the backing-store size also resets the context state.
        self.size_canvas(&canvas, metrics);
        WebCanvas::new(&canvas)
    }

    fn append_canvas(&mut self, metrics: &CanvasMetrics) -> Self::Canvas {
        let canvas = self
            .document
            .create_element("canvas")
            .expect("create <canvas> element")
            .dyn_into::<HtmlCanvasElement>()
            .expect("canvas element is HtmlCanvasElement");
        self.size_canvas(&canvas, metrics);
        let style = canvas.style();
        let _ = style.set_property("display", "block");
        let _ = style.set_property("position", "absolute");
        let _ = self.container.append_child(&canvas);
        WebCanvas::new(&canvas)
    }

    fn place_element(&mut self, index: usize, id: ElementId, placement: &ElementPlacement) {
        let target = match self.elements.get(id.0 as usize) {
            Some(element) => Some(element.clone()),
            None => {
                log::warn!("easel_web_canvas: unknown element id {}", id.0);
                None
            }
        };

        // Reuse a non-canvas child at the cursor as the wrapper; otherwise
        // insert a fresh one there (canvas children are never displaced).
        let existing = self.child_at(index).and_then(|node| {
            if node.dyn_ref::<HtmlCanvasElement>().is_some() {
                None
            } else {
                node.dyn_into::<HtmlElement>().ok()
            }
        });
        let wrapper = match existing {
            Some(wrapper) => wrapper,
            None => {
                let Some(wrapper) = self.make_wrapper() else {
                    return;
                };
                let anchor = self.child_at(index);
                let _ = self.container.insert_before(&wrapper, anchor.as_ref());
                wrapper
            }
        };

        if let Some(target) = target {
            let target_node: &Node = target.as_ref();
            if wrapper.first_child().as_ref() != Some(target_node) {
                while let Some(stale) = wrapper.first_child() {
                    let _ = wrapper.remove_child(&stale);
                }
                let _ = wrapper.append_child(&target);
            }
            let style = wrapper.style();
            let _ = style.set_property("transform", &css_matrix(placement.css_matrix()));
            let opacity = placement.alpha * Self::element_opacity(&target);
            let _ = style.set_property("opacity", &format!("{opacity}"));
        }
    }
}

/// Reconcile and render a collage into a container element.
///
/// This builds a throwaway [`WebStage`], so it cannot resolve embedded
/// element forms; keep your own stage for scenes that use them.
#[cfg(target_arch = "wasm32")]
pub fn render_into(container: &HtmlElement, collage: &Collage) -> Result<(), JsValue> {
    let mut stage = WebStage::new(container.clone())?;
    stage.render(collage);
    Ok(())
}

/// Stub type for non-wasm targets so the crate can be included in the workspace.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default)]
pub struct WebCanvas;

#[cfg(not(target_arch = "wasm32"))]
impl CanvasBackend for WebCanvas {
    fn apply(&mut self, _op: CanvasOp) {
        unimplemented!("WebCanvas is only available on wasm32")
    }
}

/// Stub type for non-wasm targets so the crate can be included in the workspace.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default)]
pub struct WebStage;

#[cfg(not(target_arch = "wasm32"))]
impl StageBackend for WebStage {
    type Canvas = WebCanvas;

    fn device_pixel_ratio(&self) -> f64 {
        unimplemented!("WebStage is only available on wasm32")
    }
    fn child_count(&self) -> usize {
        unimplemented!("WebStage is only available on wasm32")
    }
    fn child_is_canvas(&self, _index: usize) -> bool {
        unimplemented!("WebStage is only available on wasm32")
    }
    fn remove_child(&mut self, _index: usize) {
        unimplemented!("WebStage is only available on wasm32")
    }
    fn reuse_canvas(&mut self, _index: usize, _metrics: &CanvasMetrics) -> Self::Canvas {
        unimplemented!("WebStage is only available on wasm32")
    }
    fn append_canvas(&mut self, _metrics: &CanvasMetrics) -> Self::Canvas {
        unimplemented!("WebStage is only available on wasm32")
    }
    fn place_element(&mut self, _index: usize, _id: ElementId, _placement: &ElementPlacement) {
        unimplemented!("WebStage is only available on wasm32")
    }
}
