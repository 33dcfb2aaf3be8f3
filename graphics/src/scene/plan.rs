//! Per-frame render plan produced by the cull traversal.

use std::sync::Arc;

use parasurf_core::math::Mat4;
use parasurf_core::mesh::CpuMesh;

use crate::graph::{
    ColorAttachment, DepthStencilAttachment, GraphicsPass, LoadOp, PassHandle, RenderGraph,
    RenderTarget, RenderTargetConfig, StoreOp,
};
use crate::resources::Texture;
use crate::types::{TextureFormat, Viewport};

use super::camera::{Camera, ClearMask, RenderTargetImplementation};
use super::context::SharedProjection;
use super::state::ResolvedState;

/// Role of a stage in the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageKind {
    /// Rendered before the main stage (render-to-texture).
    PreRender,
    /// The view camera's stage.
    Main,
    /// Rendered after the main stage.
    PostRender,
}

/// One drawable queued for rendering.
#[derive(Debug, Clone)]
pub struct DrawItem {
    /// Name of the geometry node.
    pub node_name: String,
    /// Mesh to draw.
    pub mesh: Arc<CpuMesh>,
    /// Model-view matrix at the time the drawable was culled.
    pub model_view: Mat4,
    /// Projection the drawable is rendered with.
    pub projection: SharedProjection,
    /// Flattened render state.
    pub state: ResolvedState,
}

impl DrawItem {
    /// Current value of the draw's projection.
    pub fn projection_matrix(&self) -> Mat4 {
        self.projection.get()
    }
}

/// A camera's worth of draws targeting one render target.
#[derive(Debug, Clone)]
pub struct RenderStage {
    /// Name of the camera node (or "main").
    pub name: String,
    /// Role in the frame.
    pub kind: StageKind,
    /// Tie-breaking order among stages of the same kind.
    pub order_num: i32,
    /// Viewport.
    pub viewport: Option<Viewport>,
    /// Buffers cleared at stage start.
    pub clear_mask: ClearMask,
    /// Clear color.
    pub clear_color: [f32; 4],
    /// Depth clear value.
    pub clear_depth: f32,
    /// Render target implementation.
    pub render_target: RenderTargetImplementation,
    /// Color attachment.
    pub color_attachment: Option<Arc<Texture>>,
    /// Depth attachment.
    pub depth_attachment: Option<Arc<Texture>>,
    /// The stage's own projection.
    pub projection: SharedProjection,
    /// Near/far range written into the projection, if computed.
    pub near_far: Option<(f32, f32)>,
    /// Draws in submission order.
    pub draws: Vec<DrawItem>,
}

impl RenderStage {
    pub(crate) fn from_camera(
        name: impl Into<String>,
        kind: StageKind,
        camera: &Camera,
        projection: SharedProjection,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            order_num: camera.render_order_num(),
            viewport: camera.viewport(),
            clear_mask: camera.clear_mask(),
            clear_color: camera.clear_color(),
            clear_depth: camera.clear_depth(),
            render_target: camera.render_target(),
            color_attachment: camera.color_attachment().cloned(),
            depth_attachment: camera.depth_attachment().cloned(),
            projection,
            near_far: None,
            draws: Vec::new(),
        }
    }

    /// Distinct textures sampled by the stage's draws, in first-use order.
    pub fn sampled_textures(&self) -> Vec<Arc<Texture>> {
        let mut textures: Vec<Arc<Texture>> = Vec::new();
        for draw in &self.draws {
            for texture in draw.state.textures.values() {
                if !textures.iter().any(|t| t.id() == texture.id()) {
                    textures.push(Arc::clone(texture));
                }
            }
        }
        textures
    }

    /// Returns true if the stage renders into `texture`.
    pub fn writes(&self, texture: &Texture) -> bool {
        [&self.color_attachment, &self.depth_attachment]
            .into_iter()
            .flatten()
            .any(|t| t.id() == texture.id())
    }

    fn render_target_config(&self) -> RenderTargetConfig {
        let mut config = RenderTargetConfig::new();

        match self.render_target {
            RenderTargetImplementation::FrameBufferObject => {
                if let Some(color) = &self.color_attachment {
                    config = config.with_color(
                        ColorAttachment::from_texture(Arc::clone(color))
                            .with_load_op(self.color_load_op()),
                    );
                }
                if let Some(depth) = &self.depth_attachment {
                    config = config.with_depth_stencil(
                        DepthStencilAttachment::from_texture(Arc::clone(depth))
                            .with_depth_load_op(self.depth_load_op()),
                    );
                }
            }
            RenderTargetImplementation::FrameBuffer => {
                let (width, height) = self
                    .viewport
                    .map(|v| (v.width as u32, v.height as u32))
                    .unwrap_or((0, 0));
                config = config
                    .with_color(
                        ColorAttachment::new(RenderTarget::surface(
                            TextureFormat::Bgra8UnormSrgb,
                            width,
                            height,
                        ))
                        .with_load_op(self.color_load_op()),
                    )
                    .with_depth_stencil(
                        DepthStencilAttachment::new(RenderTarget::surface(
                            TextureFormat::Depth32Float,
                            width,
                            height,
                        ))
                        .with_depth_load_op(self.depth_load_op())
                        .with_depth_store_op(StoreOp::DontCare),
                    );
            }
        }

        config
    }

    fn color_load_op(&self) -> LoadOp {
        if self.clear_mask.contains(ClearMask::COLOR) {
            let [r, g, b, a] = self.clear_color;
            LoadOp::clear_color(r, g, b, a)
        } else {
            LoadOp::Load
        }
    }

    fn depth_load_op(&self) -> LoadOp {
        if self.clear_mask.contains(ClearMask::DEPTH) {
            LoadOp::clear_depth(self.clear_depth)
        } else {
            LoadOp::Load
        }
    }

    fn to_pass(&self) -> GraphicsPass {
        let mut pass = GraphicsPass::new(self.name.clone());
        pass.set_render_targets(self.render_target_config());
        if let Some(viewport) = self.viewport {
            pass.set_viewport(viewport);
        }
        pass.set_draw_count(self.draws.len() as u32);
        for texture in self.sampled_textures() {
            pass.add_sampled_texture(texture);
        }
        pass
    }
}

/// Result of culling one frame.
#[derive(Debug, Clone)]
pub struct FramePlan {
    stages: Vec<RenderStage>,
    main_stage: usize,
    publish_count: usize,
    withdraw_count: usize,
    context_balanced: bool,
}

impl FramePlan {
    pub(crate) fn new(
        mut pre: Vec<RenderStage>,
        main: RenderStage,
        mut post: Vec<RenderStage>,
        publish_count: usize,
        withdraw_count: usize,
        context_balanced: bool,
    ) -> Self {
        // stable: equal order numbers keep traversal order
        pre.sort_by_key(|s| s.order_num);
        post.sort_by_key(|s| s.order_num);

        let main_stage = pre.len();
        let mut stages = pre;
        stages.push(main);
        stages.append(&mut post);

        Self {
            stages,
            main_stage,
            publish_count,
            withdraw_count,
            context_balanced,
        }
    }

    /// All stages in render order.
    pub fn stages(&self) -> &[RenderStage] {
        &self.stages
    }

    /// The view camera's stage.
    pub fn main_stage(&self) -> &RenderStage {
        &self.stages[self.main_stage]
    }

    /// Pre-render stages in render order.
    pub fn pre_render_stages(&self) -> &[RenderStage] {
        &self.stages[..self.main_stage]
    }

    /// Post-render stages in render order.
    pub fn post_render_stages(&self) -> &[RenderStage] {
        &self.stages[self.main_stage + 1..]
    }

    /// Total number of draws over all stages.
    pub fn draw_count(&self) -> usize {
        self.stages.iter().map(|s| s.draws.len()).sum()
    }

    /// Projections published to the traversal context during culling.
    pub fn publish_count(&self) -> usize {
        self.publish_count
    }

    /// Projections withdrawn from the traversal context during culling.
    pub fn withdraw_count(&self) -> usize {
        self.withdraw_count
    }

    /// Returns true if the traversal context was empty after culling.
    pub fn is_context_balanced(&self) -> bool {
        self.context_balanced
    }

    /// Build a render graph with one graphics pass per stage.
    ///
    /// Main and post-render passes depend on every pre-render pass, post
    /// passes depend on the main pass, and any pass sampling a texture
    /// depends on the pass that renders into it.
    pub fn to_render_graph(&self) -> RenderGraph {
        let mut graph = RenderGraph::new();
        let handles: Vec<PassHandle> = self
            .stages
            .iter()
            .map(|stage| graph.add_graphics_pass(stage.to_pass()))
            .collect();

        let main = handles[self.main_stage];
        for (i, stage) in self.stages.iter().enumerate() {
            match stage.kind {
                StageKind::PreRender => {}
                StageKind::Main => {
                    for &pre in &handles[..self.main_stage] {
                        graph.add_dependency(handles[i], pre);
                    }
                }
                StageKind::PostRender => {
                    for &pre in &handles[..self.main_stage] {
                        graph.add_dependency(handles[i], pre);
                    }
                    graph.add_dependency(handles[i], main);
                }
            }

            for texture in stage.sampled_textures() {
                for (j, writer) in self.stages.iter().enumerate() {
                    if i != j && writer.writes(&texture) {
                        graph.add_dependency(handles[i], handles[j]);
                    }
                }
            }
        }

        graph
    }
}
