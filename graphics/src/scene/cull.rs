//! Cull traversal.
//!
//! The [`CullVisitor`] walks a scene from a view camera and collects what
//! must be drawn into a [`FramePlan`]. Cull callbacks receive the visitor
//! itself, so they can adjust the projection stack, publish data in the
//! [`TraversalContext`] or feed bounds into the near/far computation.

use std::sync::Arc;

use parasurf_core::bounds::BoundingBox;
use parasurf_core::math::{Mat4, clamp_projection_near_far};
use parasurf_core::mesh::CpuMesh;

use super::camera::{Camera, ComputeNearFarMode, ReferenceFrame, RenderOrder};
use super::context::{SharedProjection, TraversalContext};
use super::node::{NodeKind, NodeRef};
use super::plan::{DrawItem, FramePlan, RenderStage, StageKind};
use super::state::ResolvedState;

/// Near/far bookkeeping saved across camera boundaries.
#[derive(Debug, Clone, Copy)]
struct NearFarState {
    mode: ComputeNearFarMode,
    ratio: f32,
    near: f32,
    far: f32,
}

impl NearFarState {
    fn for_camera(camera: &Camera) -> Self {
        Self {
            mode: camera.compute_near_far(),
            ratio: camera.near_far_ratio(),
            near: f32::MAX,
            far: -f32::MAX,
        }
    }

    fn range(&self) -> Option<(f32, f32)> {
        (self.far >= self.near).then_some((self.near, self.far))
    }
}

/// Scene traversal producing a [`FramePlan`].
///
/// # Example
///
/// ```ignore
/// let plan = CullVisitor::new(&view_camera).cull(&scene_root);
/// for stage in plan.stages() {
///     println!("{}: {} draws", stage.name, stage.draws.len());
/// }
/// ```
#[derive(Debug)]
pub struct CullVisitor {
    context: TraversalContext,
    model_view_stack: Vec<Mat4>,
    projection_stack: Vec<SharedProjection>,
    state_stack: Vec<ResolvedState>,
    stage: RenderStage,
    pre_stages: Vec<RenderStage>,
    post_stages: Vec<RenderStage>,
    near_far: NearFarState,
}

impl CullVisitor {
    /// Create a visitor whose main stage renders through `camera`.
    pub fn new(camera: &Camera) -> Self {
        let projection = SharedProjection::new(*camera.projection());
        Self {
            context: TraversalContext::new(),
            model_view_stack: vec![*camera.view()],
            projection_stack: vec![projection.clone()],
            state_stack: vec![ResolvedState::default()],
            stage: RenderStage::from_camera("main", StageKind::Main, camera, projection),
            pre_stages: Vec::new(),
            post_stages: Vec::new(),
            near_far: NearFarState::for_camera(camera),
        }
    }

    /// Cull the scene under `root` and return the frame plan.
    pub fn cull(mut self, root: &NodeRef) -> FramePlan {
        self.apply(root);
        self.clamp_current_stage();

        let balanced = self.context.is_empty();
        if !balanced {
            log::warn!(
                "CullVisitor: traversal context not empty after cull ({} published, {} withdrawn)",
                self.context.publish_count(),
                self.context.withdraw_count()
            );
        }

        log::trace!(
            "CullVisitor: {} pre-render, {} post-render stages, main near/far {:?}",
            self.pre_stages.len(),
            self.post_stages.len(),
            self.stage.near_far
        );

        FramePlan::new(
            self.pre_stages,
            self.stage,
            self.post_stages,
            self.context.publish_count(),
            self.context.withdraw_count(),
            balanced,
        )
    }

    /// Visit `node`: apply its state, then run its cull callback (or the
    /// default traversal).
    pub fn apply(&mut self, node: &NodeRef) {
        let pushed_state = match node.state_set() {
            Some(state) => {
                let resolved = self.current_state().merged(&state);
                self.state_stack.push(resolved);
                true
            }
            None => false,
        };

        match node.kind() {
            NodeKind::Camera(camera) => self.apply_camera(node, &camera),
            NodeKind::Group | NodeKind::Geometry(_) => self.handle_callback_and_traverse(node),
        }

        if pushed_state {
            self.state_stack.pop();
        }
    }

    /// Default traversal: queue a geometry node's mesh, or visit a node's
    /// children in order.
    pub fn traverse(&mut self, node: &NodeRef) {
        if let Some(mesh) = node.mesh() {
            self.add_drawable(node, mesh);
            return;
        }
        for child in node.children() {
            self.apply(&child);
        }
    }

    /// Current model-view matrix.
    pub fn model_view(&self) -> Mat4 {
        self.model_view_stack
            .last()
            .copied()
            .unwrap_or_else(Mat4::identity)
    }

    /// Current projection handle.
    pub fn projection_handle(&self) -> SharedProjection {
        self.projection_stack
            .last()
            .cloned()
            .unwrap_or_else(|| self.stage.projection.clone())
    }

    /// Current projection value.
    pub fn projection_matrix(&self) -> Mat4 {
        self.projection_handle().get()
    }

    /// Make `projection` the active projection for subsequent draws.
    pub fn push_projection(&mut self, projection: SharedProjection) {
        self.projection_stack.push(projection);
    }

    /// Restore the projection active before the last push.
    pub fn pop_projection(&mut self) {
        if self.projection_stack.len() > 1 {
            self.projection_stack.pop();
        } else {
            log::warn!("CullVisitor: pop_projection without matching push");
        }
    }

    /// Traversal context shared by callbacks.
    pub fn context(&self) -> &TraversalContext {
        &self.context
    }

    /// Mutable traversal context.
    pub fn context_mut(&mut self) -> &mut TraversalContext {
        &mut self.context
    }

    /// Stage currently receiving draws.
    pub fn current_stage(&self) -> &RenderStage {
        &self.stage
    }

    /// Near/far range accumulated so far for the current camera.
    pub fn computed_near_far(&self) -> Option<(f32, f32)> {
        self.near_far.range()
    }

    /// Grow the current near/far range to cover `bounds` under `model_view`.
    ///
    /// Returns false if the box is invalid or lies entirely behind the eye.
    pub fn update_calculated_near_far(&mut self, model_view: &Mat4, bounds: &BoundingBox) -> bool {
        let Some((near, far)) = bounds.depth_range(model_view) else {
            return false;
        };
        if far < 0.0 {
            return false;
        }
        self.near_far.near = self.near_far.near.min(near);
        self.near_far.far = self.near_far.far.max(far);
        true
    }

    fn current_state(&self) -> ResolvedState {
        self.state_stack.last().cloned().unwrap_or_default()
    }

    fn handle_callback_and_traverse(&mut self, node: &NodeRef) {
        match node.cull_callback() {
            Some(callback) => callback.cull(node, self),
            None => self.traverse(node),
        }
    }

    fn add_drawable(&mut self, node: &NodeRef, mesh: Arc<CpuMesh>) {
        let model_view = self.model_view();
        if self.near_far.mode == ComputeNearFarMode::UsingBoundingVolumes
            && !self.update_calculated_near_far(&model_view, mesh.bounds())
        {
            log::trace!("CullVisitor: culled {:?} behind the eye", node.name());
            return;
        }

        self.stage.draws.push(DrawItem {
            node_name: node.name(),
            mesh,
            model_view,
            projection: self.projection_handle(),
            state: self.current_state(),
        });
    }

    fn apply_camera(&mut self, node: &NodeRef, camera: &Camera) {
        let saved_near_far = self.near_far;
        self.near_far = NearFarState::for_camera(camera);

        let (model_view, projection) = match camera.reference_frame() {
            ReferenceFrame::Relative => (
                self.model_view() * camera.view(),
                self.projection_matrix() * camera.projection(),
            ),
            ReferenceFrame::Absolute => (*camera.view(), *camera.projection()),
        };
        let projection = SharedProjection::new(projection);
        self.model_view_stack.push(model_view);
        self.projection_stack.push(projection.clone());

        let stage_kind = match camera.render_order() {
            RenderOrder::PreRender => Some(StageKind::PreRender),
            RenderOrder::PostRender => Some(StageKind::PostRender),
            RenderOrder::NestedRender => None,
        };

        match stage_kind {
            Some(kind) => {
                let stage = RenderStage::from_camera(node.name(), kind, camera, projection);
                let previous = std::mem::replace(&mut self.stage, stage);

                self.handle_callback_and_traverse(node);

                self.clamp_current_stage();
                let finished = std::mem::replace(&mut self.stage, previous);
                if kind == StageKind::PreRender {
                    self.pre_stages.push(finished);
                } else {
                    self.post_stages.push(finished);
                }
            }
            None => {
                self.handle_callback_and_traverse(node);

                if self.near_far.mode == ComputeNearFarMode::UsingBoundingVolumes
                    && let Some((near, far)) = self.near_far.range()
                {
                    let ratio = self.near_far.ratio;
                    projection.update(|m| clamp_projection_near_far(m, near, far, ratio));
                }
            }
        }

        self.projection_stack.pop();
        self.model_view_stack.pop();
        self.near_far = saved_near_far;
    }

    /// Clamp the current stage's projection in place to the computed range.
    fn clamp_current_stage(&mut self) {
        if self.near_far.mode != ComputeNearFarMode::UsingBoundingVolumes {
            return;
        }
        let Some((near, far)) = self.near_far.range() else {
            return;
        };
        let ratio = self.near_far.ratio;
        self.stage.near_far = self
            .stage
            .projection
            .update(|m| clamp_projection_near_far(m, near, far, ratio));
    }
}
