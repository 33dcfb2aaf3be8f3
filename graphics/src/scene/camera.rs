//! Scene cameras.
//!
//! A camera node renders its children with its own view and projection.
//! Pre- and post-render cameras open separate render stages (typically
//! render-to-texture); nested cameras draw inline into the enclosing stage.

use std::sync::Arc;

use bitflags::bitflags;
use parasurf_core::math::{DEFAULT_NEAR_FAR_RATIO, Mat4};

use crate::resources::Texture;
use crate::types::Viewport;

bitflags! {
    /// Buffers cleared when a camera's stage begins.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ClearMask: u32 {
        /// Clear color attachments.
        const COLOR = 1 << 0;
        /// Clear the depth attachment.
        const DEPTH = 1 << 1;
        /// Clear the stencil attachment.
        const STENCIL = 1 << 2;
    }
}

/// When a camera renders relative to the camera that encloses it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderOrder {
    /// Own stage, rendered before the enclosing stage.
    PreRender,
    /// Drawn inline into the enclosing stage.
    NestedRender,
    /// Own stage, rendered after the enclosing stage.
    PostRender,
}

/// Where a camera's stage renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderTargetImplementation {
    /// The window framebuffer.
    FrameBuffer,
    /// An off-screen framebuffer object built from the camera attachments.
    FrameBufferObject,
}

/// How a camera's view and projection combine with inherited ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceFrame {
    /// Multiply onto the inherited model-view and projection.
    Relative,
    /// Replace the inherited model-view and projection.
    Absolute,
}

/// Whether a camera's stage computes near/far planes from drawn content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComputeNearFarMode {
    /// Keep the projection as given.
    DoNotCompute,
    /// Clamp the projection to the bounding volumes drawn in the stage.
    UsingBoundingVolumes,
}

/// Camera settings carried by a camera node.
#[derive(Debug, Clone)]
pub struct Camera {
    viewport: Option<Viewport>,
    clear_mask: ClearMask,
    clear_color: [f32; 4],
    clear_depth: f32,
    render_order: RenderOrder,
    render_order_num: i32,
    render_target: RenderTargetImplementation,
    reference_frame: ReferenceFrame,
    projection: Mat4,
    view: Mat4,
    compute_near_far: ComputeNearFarMode,
    near_far_ratio: f32,
    color_attachment: Option<Arc<Texture>>,
    depth_attachment: Option<Arc<Texture>>,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            viewport: None,
            clear_mask: ClearMask::COLOR | ClearMask::DEPTH,
            clear_color: [0.2, 0.2, 0.4, 1.0],
            clear_depth: 1.0,
            render_order: RenderOrder::NestedRender,
            render_order_num: 0,
            render_target: RenderTargetImplementation::FrameBuffer,
            reference_frame: ReferenceFrame::Relative,
            projection: Mat4::identity(),
            view: Mat4::identity(),
            compute_near_far: ComputeNearFarMode::UsingBoundingVolumes,
            near_far_ratio: DEFAULT_NEAR_FAR_RATIO,
            color_attachment: None,
            depth_attachment: None,
        }
    }
}

impl Camera {
    /// Create a camera with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a top-level view camera rendering to the framebuffer.
    pub fn view_camera(viewport: Viewport, projection: Mat4, view: Mat4) -> Self {
        Self {
            viewport: Some(viewport),
            reference_frame: ReferenceFrame::Absolute,
            projection,
            view,
            ..Self::default()
        }
    }

    /// Set the viewport.
    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = Some(viewport);
        self
    }

    /// Set the clear mask.
    pub fn with_clear_mask(mut self, mask: ClearMask) -> Self {
        self.clear_mask = mask;
        self
    }

    /// Set the clear color.
    pub fn with_clear_color(mut self, color: [f32; 4]) -> Self {
        self.clear_color = color;
        self
    }

    /// Set the depth clear value.
    pub fn with_clear_depth(mut self, depth: f32) -> Self {
        self.clear_depth = depth;
        self
    }

    /// Set the render order and its tie-breaking number.
    pub fn with_render_order(mut self, order: RenderOrder, order_num: i32) -> Self {
        self.render_order = order;
        self.render_order_num = order_num;
        self
    }

    /// Set the render target implementation.
    pub fn with_render_target(mut self, target: RenderTargetImplementation) -> Self {
        self.render_target = target;
        self
    }

    /// Set the reference frame.
    pub fn with_reference_frame(mut self, frame: ReferenceFrame) -> Self {
        self.reference_frame = frame;
        self
    }

    /// Set the projection matrix.
    pub fn with_projection(mut self, projection: Mat4) -> Self {
        self.projection = projection;
        self
    }

    /// Set the view matrix.
    pub fn with_view(mut self, view: Mat4) -> Self {
        self.view = view;
        self
    }

    /// Set the near/far computation mode.
    pub fn with_compute_near_far(mut self, mode: ComputeNearFarMode) -> Self {
        self.compute_near_far = mode;
        self
    }

    /// Attach a color texture.
    pub fn with_color_attachment(mut self, texture: Arc<Texture>) -> Self {
        self.color_attachment = Some(texture);
        self
    }

    /// Attach a depth texture.
    pub fn with_depth_attachment(mut self, texture: Arc<Texture>) -> Self {
        self.depth_attachment = Some(texture);
        self
    }

    /// Viewport, if set.
    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    /// Clear mask.
    pub fn clear_mask(&self) -> ClearMask {
        self.clear_mask
    }

    /// Clear color.
    pub fn clear_color(&self) -> [f32; 4] {
        self.clear_color
    }

    /// Depth clear value.
    pub fn clear_depth(&self) -> f32 {
        self.clear_depth
    }

    /// Render order.
    pub fn render_order(&self) -> RenderOrder {
        self.render_order
    }

    /// Render order number; lower renders first among equal orders.
    pub fn render_order_num(&self) -> i32 {
        self.render_order_num
    }

    /// Render target implementation.
    pub fn render_target(&self) -> RenderTargetImplementation {
        self.render_target
    }

    /// Reference frame.
    pub fn reference_frame(&self) -> ReferenceFrame {
        self.reference_frame
    }

    /// Projection matrix.
    pub fn projection(&self) -> &Mat4 {
        &self.projection
    }

    /// View matrix.
    pub fn view(&self) -> &Mat4 {
        &self.view
    }

    /// Near/far computation mode.
    pub fn compute_near_far(&self) -> ComputeNearFarMode {
        self.compute_near_far
    }

    /// Smallest near/far ratio used when clamping.
    pub fn near_far_ratio(&self) -> f32 {
        self.near_far_ratio
    }

    /// Color attachment.
    pub fn color_attachment(&self) -> Option<&Arc<Texture>> {
        self.color_attachment.as_ref()
    }

    /// Depth attachment.
    pub fn depth_attachment(&self) -> Option<&Arc<Texture>> {
        self.depth_attachment.as_ref()
    }

    /// Returns true if this camera renders into its own stage.
    pub fn opens_stage(&self) -> bool {
        self.render_order != RenderOrder::NestedRender
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let camera = Camera::new();
        assert_eq!(camera.clear_mask(), ClearMask::COLOR | ClearMask::DEPTH);
        assert_eq!(camera.clear_depth(), 1.0);
        assert_eq!(camera.render_order(), RenderOrder::NestedRender);
        assert_eq!(camera.reference_frame(), ReferenceFrame::Relative);
        assert_eq!(camera.compute_near_far(), ComputeNearFarMode::UsingBoundingVolumes);
        assert!(!camera.opens_stage());
    }

    #[test]
    fn test_builder() {
        let camera = Camera::new()
            .with_viewport(Viewport::from_dimensions(64, 32))
            .with_clear_mask(ClearMask::DEPTH)
            .with_clear_depth(0.0)
            .with_render_order(RenderOrder::PreRender, -1)
            .with_render_target(RenderTargetImplementation::FrameBufferObject)
            .with_compute_near_far(ComputeNearFarMode::DoNotCompute);

        assert_eq!(camera.viewport().unwrap().width, 64.0);
        assert_eq!(camera.clear_mask(), ClearMask::DEPTH);
        assert_eq!(camera.clear_depth(), 0.0);
        assert_eq!(camera.render_order_num(), -1);
        assert!(camera.opens_stage());
    }

    #[test]
    fn test_view_camera_is_absolute() {
        let camera =
            Camera::view_camera(Viewport::from_dimensions(8, 8), Mat4::identity(), Mat4::identity());
        assert_eq!(camera.reference_frame(), ReferenceFrame::Absolute);
        assert_eq!(camera.render_target(), RenderTargetImplementation::FrameBuffer);
    }
}
