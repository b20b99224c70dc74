// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Collage reconciliation: matching a form list against the container's
//! existing children.
//!
//! One pass walks the top-level forms depth-first, batching each maximal run
//! of consecutive canvas-drawable forms into one canvas child. Canvas
//! children are reused by position: the cursor walks the existing child
//! list, non-canvas children in the way are removed, and anything left past
//! the cursor at the end is stale and removed. Embedded elements bypass the
//! canvas path and invalidate the open context, so the next drawable form
//! acquires a fresh one.

use easel_scene::{Affine, BasicForm, Collage, ElementId, Form};
use smallvec::SmallVec;

use crate::ops::{CanvasBackend, CanvasMetrics, CanvasOp, ElementPlacement, StageBackend};
use crate::render::{form_matrix, render_form};

/// Ambient transform stack for nested groups.
type TransformStack = SmallVec<[Affine; 8]>;

/// Reconcile `collage` against the stage's existing children and render
/// every form.
pub fn update_stage<S: StageBackend>(stage: &mut S, collage: &Collage) {
    let metrics = CanvasMetrics {
        width: collage.width,
        height: collage.height,
        ratio: stage.device_pixel_ratio(),
    };
    let mut update = Update {
        stage,
        metrics,
        cursor: 0,
        ctx: None,
    };
    let mut transforms = TransformStack::new();
    update.walk(&collage.forms, &mut transforms, 1.0);
    update.remove_trailing();
}

/// Transient state for one reconciliation pass.
struct Update<'a, S: StageBackend> {
    stage: &'a mut S,
    metrics: CanvasMetrics,
    /// Index into the stage's current child list.
    cursor: usize,
    /// The open canvas context, if the previous form was drawable.
    ctx: Option<S::Canvas>,
}

impl<S: StageBackend> Update<'_, S> {
    fn walk(&mut self, forms: &[Form], transforms: &mut TransformStack, alpha: f64) {
        for form in forms {
            match &form.basic {
                BasicForm::Group(matrix, children) => {
                    let local = form_matrix(form) * *matrix;
                    if let Some(ctx) = self.ctx.as_mut() {
                        ctx.apply(CanvasOp::Save);
                        ctx.apply(CanvasOp::Transform(local));
                    }
                    transforms.push(local);
                    self.walk(children, transforms, alpha * form.alpha);
                    transforms.pop();
                    // Whatever context is current here carries one save per
                    // ambient stack entry (priming replays them), so this
                    // restore balances even after a context switch inside
                    // the group.
                    if let Some(ctx) = self.ctx.as_mut() {
                        ctx.apply(CanvasOp::Restore);
                    }
                }
                BasicForm::Element { id, width, height } => {
                    self.place_element(*id, form, transforms, alpha, *width, *height);
                }
                _ => {
                    let ctx = self.context(transforms);
                    render_form(ctx, alpha, form);
                }
            }
        }
    }

    /// Insert or update an embedded element at the cursor and break the
    /// current canvas batch.
    fn place_element(
        &mut self,
        id: ElementId,
        form: &Form,
        transforms: &TransformStack,
        alpha: f64,
        width: f64,
        height: f64,
    ) {
        let ambient = transforms
            .iter()
            .fold(Affine::IDENTITY, |acc, m| acc * *m);
        let placement = ElementPlacement {
            transform: ambient * form_matrix(form),
            alpha: alpha * form.alpha,
            width,
            height,
            stage_width: self.metrics.width,
            stage_height: self.metrics.height,
        };
        self.stage.place_element(self.cursor, id, &placement);
        self.cursor += 1;
        self.ctx = None;
    }

    /// The open context, acquiring and priming one if needed.
    fn context(&mut self, transforms: &TransformStack) -> &mut S::Canvas {
        if self.ctx.is_none() {
            let mut ctx = self.next_canvas();
            prime(&mut ctx, &self.metrics, transforms);
            return self.ctx.insert(ctx);
        }
        self.ctx.as_mut().expect("open canvas context")
    }

    /// The next canvas child: reuse an existing canvas at the cursor,
    /// removing whatever else is in the way, or append a fresh one.
    fn next_canvas(&mut self) -> S::Canvas {
        while self.cursor < self.stage.child_count() {
            if self.stage.child_is_canvas(self.cursor) {
                let ctx = self.stage.reuse_canvas(self.cursor, &self.metrics);
                self.cursor += 1;
                return ctx;
            }
            // The child list shrinks, so the cursor stays put.
            self.stage.remove_child(self.cursor);
        }
        let ctx = self.stage.append_canvas(&self.metrics);
        self.cursor += 1;
        ctx
    }

    /// Remove stale children at or past the cursor.
    fn remove_trailing(&mut self) {
        while self.stage.child_count() > self.cursor {
            self.stage.remove_child(self.cursor);
        }
    }
}

/// Prepare a freshly acquired context: center the origin, flip the y-axis,
/// scale to device pixels, and replay the ambient group transforms, one
/// save per stack entry.
fn prime<C: CanvasBackend>(ctx: &mut C, metrics: &CanvasMetrics, transforms: &TransformStack) {
    ctx.apply(CanvasOp::Translate {
        x: metrics.width / 2.0 * metrics.ratio,
        y: metrics.height / 2.0 * metrics.ratio,
    });
    ctx.apply(CanvasOp::Scale {
        x: metrics.ratio,
        y: -metrics.ratio,
    });
    for m in transforms {
        ctx.apply(CanvasOp::Save);
        ctx.apply(CanvasOp::Transform(*m));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use easel_scene::{Color, rect};
    use std::cell::RefCell;
    use std::rc::Rc;

    type SharedOps = Rc<RefCell<Vec<CanvasOp>>>;

    struct SharedCanvas(SharedOps);

    impl CanvasBackend for SharedCanvas {
        fn apply(&mut self, op: CanvasOp) {
            self.0.borrow_mut().push(op);
        }
    }

    enum Child {
        Canvas(SharedOps),
        Element(ElementId),
    }

    struct FakeStage {
        children: Vec<Child>,
        ratio: f64,
        created: usize,
        removed: usize,
        reused: usize,
    }

    impl FakeStage {
        fn new(ratio: f64) -> Self {
            Self {
                children: Vec::new(),
                ratio,
                created: 0,
                removed: 0,
                reused: 0,
            }
        }

        fn canvas_ops(&self, index: usize) -> Vec<CanvasOp> {
            match &self.children[index] {
                Child::Canvas(ops) => ops.borrow().clone(),
                Child::Element(_) => panic!("child {index} is not a canvas"),
            }
        }
    }

    impl StageBackend for FakeStage {
        type Canvas = SharedCanvas;

        fn device_pixel_ratio(&self) -> f64 {
            self.ratio
        }

        fn child_count(&self) -> usize {
            self.children.len()
        }

        fn child_is_canvas(&self, index: usize) -> bool {
            matches!(self.children[index], Child::Canvas(_))
        }

        fn remove_child(&mut self, index: usize) {
            self.children.remove(index);
            self.removed += 1;
        }

        fn reuse_canvas(&mut self, index: usize, _metrics: &CanvasMetrics) -> Self::Canvas {
            self.reused += 1;
            let Child::Canvas(ops) = &self.children[index] else {
                panic!("child {index} is not a canvas");
            };
            // Resizing resets the backing store.
            ops.borrow_mut().clear();
            SharedCanvas(Rc::clone(ops))
        }

        fn append_canvas(&mut self, _metrics: &CanvasMetrics) -> Self::Canvas {
            self.created += 1;
            let ops: SharedOps = Rc::default();
            self.children.push(Child::Canvas(Rc::clone(&ops)));
            SharedCanvas(ops)
        }

        fn place_element(&mut self, index: usize, id: ElementId, _placement: &ElementPlacement) {
            if index < self.children.len() && !self.child_is_canvas(index) {
                self.children[index] = Child::Element(id);
            } else {
                self.children.insert(index, Child::Element(id));
            }
        }
    }

    fn shape() -> Form {
        rect(10.0, 10.0).filled(Color::BLACK)
    }

    #[test]
    fn consecutive_shapes_share_one_canvas() {
        let mut stage = FakeStage::new(1.0);
        update_stage(&mut stage, &Collage::new(100.0, 100.0, vec![shape(), shape()]));
        assert_eq!(stage.created, 1);
        assert_eq!(stage.children.len(), 1);
    }

    #[test]
    fn element_breaks_the_canvas_batch() {
        let mut stage = FakeStage::new(1.0);
        let forms = vec![
            shape(),
            Form::element(ElementId(7), 20.0, 20.0),
            shape(),
        ];
        update_stage(&mut stage, &Collage::new(100.0, 100.0, forms));
        assert_eq!(stage.created, 2);
        assert_eq!(stage.children.len(), 3);
        assert!(matches!(stage.children[1], Child::Element(ElementId(7))));
    }

    #[test]
    fn rerender_reuses_every_canvas() {
        let collage = Collage::new(
            100.0,
            100.0,
            vec![shape(), Form::element(ElementId(0), 10.0, 10.0), shape()],
        );
        let mut stage = FakeStage::new(1.0);
        update_stage(&mut stage, &collage);
        assert_eq!(stage.created, 2);

        stage.created = 0;
        stage.removed = 0;
        stage.reused = 0;
        update_stage(&mut stage, &collage);
        assert_eq!(stage.created, 0);
        assert_eq!(stage.removed, 0);
        assert_eq!(stage.reused, 2);
        assert_eq!(stage.children.len(), 3);
    }

    #[test]
    fn stale_trailing_children_are_removed() {
        let mut stage = FakeStage::new(1.0);
        update_stage(
            &mut stage,
            &Collage::new(
                100.0,
                100.0,
                vec![
                    shape(),
                    Form::element(ElementId(0), 10.0, 10.0),
                    shape(),
                    Form::element(ElementId(1), 10.0, 10.0),
                    shape(),
                ],
            ),
        );
        assert_eq!(stage.children.len(), 5);

        stage.removed = 0;
        update_stage(&mut stage, &Collage::new(100.0, 100.0, vec![shape()]));
        assert_eq!(stage.children.len(), 1);
        assert_eq!(stage.removed, 4);
    }

    #[test]
    fn non_canvas_children_in_the_way_are_removed() {
        let mut stage = FakeStage::new(1.0);
        stage.children.push(Child::Element(ElementId(9)));
        update_stage(&mut stage, &Collage::new(100.0, 100.0, vec![shape()]));
        assert_eq!(stage.removed, 1);
        assert_eq!(stage.created, 1);
        assert_eq!(stage.children.len(), 1);
        assert!(stage.child_is_canvas(0));
    }

    #[test]
    fn empty_collage_clears_the_stage() {
        let mut stage = FakeStage::new(1.0);
        update_stage(&mut stage, &Collage::new(50.0, 50.0, vec![shape(), shape()]));
        assert_eq!(stage.children.len(), 1);
        update_stage(&mut stage, &Collage::new(50.0, 50.0, Vec::new()));
        assert!(stage.children.is_empty());
    }

    #[test]
    fn context_is_primed_with_center_flip_and_ratio() {
        let mut stage = FakeStage::new(2.0);
        update_stage(&mut stage, &Collage::new(100.0, 60.0, vec![shape()]));
        let ops = stage.canvas_ops(0);
        assert_eq!(ops[0], CanvasOp::Translate { x: 100.0, y: 60.0 });
        assert_eq!(ops[1], CanvasOp::Scale { x: 2.0, y: -2.0 });
    }

    #[test]
    fn group_transforms_scope_the_shared_context() {
        let mut stage = FakeStage::new(1.0);
        let group = Form::group(vec![shape()]).shift(5.0, 0.0);
        update_stage(&mut stage, &Collage::new(100.0, 100.0, vec![group, shape()]));
        let ops = stage.canvas_ops(0);
        // Priming, then save + group matrix, the child, restore, then the
        // trailing sibling on the same context.
        assert_eq!(ops[2], CanvasOp::Save);
        assert_eq!(ops[3], CanvasOp::Transform(Affine::translate((5.0, 0.0))));
        let group_exit = ops.windows(3).any(|w| {
            w == [CanvasOp::Restore, CanvasOp::Restore, CanvasOp::Save]
        });
        assert!(group_exit, "sibling draws after the group restore: {ops:?}");
    }

    #[test]
    fn context_acquired_inside_group_replays_the_stack() {
        let mut stage = FakeStage::new(1.0);
        let group = Form::group_transform(
            Affine::scale(2.0),
            vec![
                shape(),
                Form::element(ElementId(0), 10.0, 10.0),
                shape(),
            ],
        );
        update_stage(&mut stage, &Collage::new(100.0, 100.0, vec![group]));
        assert_eq!(stage.created, 2);
        let ops = stage.canvas_ops(2);
        assert_eq!(ops[2], CanvasOp::Save);
        assert_eq!(ops[3], CanvasOp::Transform(Affine::scale(2.0)));
        // The group exit restore lands on this context.
        assert_eq!(ops.last(), Some(&CanvasOp::Restore));
    }

    #[test]
    fn group_alpha_compounds_into_child_forms() {
        let mut stage = FakeStage::new(1.0);
        let group = Form::group(vec![shape().alpha(0.5)]).alpha(0.5);
        update_stage(&mut stage, &Collage::new(100.0, 100.0, vec![group]));
        let ops = stage.canvas_ops(0);
        assert!(
            ops.contains(&CanvasOp::MulAlpha(0.25)),
            "expected compounded alpha in {ops:?}"
        );
    }
}
