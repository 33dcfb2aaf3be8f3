//! Pre-render cameras capturing front or back face depth.

use std::fmt;
use std::sync::Arc;

use parasurf_core::sampler::CompareFunction;
use parasurf_graphics::{
    Camera, ClearMask, ComputeNearFarMode, CullFace, DepthState, NodeRef, ReferenceFrame,
    RenderOrder, RenderTargetImplementation, Texture, Viewport,
};

use crate::callbacks::RttCameraCullCallback;

/// Which faces of a closed volume a depth pass records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DepthFace {
    /// Faces towards the viewer: back faces culled, nearest depth kept.
    Front,
    /// Faces away from the viewer: front faces culled, farthest depth kept.
    Back,
}

impl DepthFace {
    /// Faces removed before rasterization.
    pub fn culled_faces(self) -> CullFace {
        match self {
            Self::Front => CullFace::Back,
            Self::Back => CullFace::Front,
        }
    }

    /// Depth test used while capturing.
    pub fn depth_function(self) -> CompareFunction {
        match self {
            Self::Front => CompareFunction::Less,
            Self::Back => CompareFunction::Greater,
        }
    }

    /// Value the depth attachment is cleared to.
    pub fn clear_depth(self) -> f32 {
        match self {
            Self::Front => 1.0,
            Self::Back => 0.0,
        }
    }
}

impl fmt::Display for DepthFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Front => write!(f, "front"),
            Self::Back => write!(f, "back"),
        }
    }
}

/// Builds the off-screen camera that renders a subgraph into a depth texture.
///
/// The camera renders before the main camera, clears only depth, computes no
/// near/far range of its own and borrows the main projection through a
/// [`RttCameraCullCallback`]. Its view and projection are identity in a
/// relative frame, so it sees exactly what the enclosing view sees.
///
/// # Example
///
/// ```ignore
/// let camera = DepthPassBuilder::new(DepthFace::Back)
///     .with_name("back_depth0")
///     .build(texture);
/// camera.add_child(boundary);
/// ```
#[derive(Debug, Clone)]
pub struct DepthPassBuilder {
    face: DepthFace,
    name: Option<String>,
}

impl DepthPassBuilder {
    /// Create a builder for `face`.
    pub fn new(face: DepthFace) -> Self {
        Self { face, name: None }
    }

    /// Name of the camera node (defaults to `"{face}_depth"`).
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Face captured by the built camera.
    pub fn face(&self) -> DepthFace {
        self.face
    }

    /// Build the camera node with `texture` as its only attachment.
    pub fn build(&self, texture: Arc<Texture>) -> NodeRef {
        let viewport = Viewport::from_dimensions(texture.width(), texture.height());
        let camera = Camera::new()
            .with_viewport(viewport)
            .with_clear_mask(ClearMask::DEPTH)
            .with_clear_depth(self.face.clear_depth())
            .with_render_order(RenderOrder::PreRender, 0)
            .with_render_target(RenderTargetImplementation::FrameBufferObject)
            .with_reference_frame(ReferenceFrame::Relative)
            .with_compute_near_far(ComputeNearFarMode::DoNotCompute)
            .with_depth_attachment(texture);

        let name = self
            .name
            .clone()
            .unwrap_or_else(|| format!("{}_depth", self.face));
        let node = NodeRef::camera(name, camera);

        let face = self.face;
        node.update_state_set(|state| {
            state.set_cull_face(face.culled_faces());
            if face == DepthFace::Back {
                state.set_depth(DepthState::new(face.depth_function()));
            }
        });
        node.set_cull_callback(Some(Arc::new(RttCameraCullCallback)));
        node
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DepthTextureFactory;
    use parasurf_graphics::GraphicsDevice;

    fn texture() -> Arc<Texture> {
        DepthTextureFactory::new(GraphicsDevice::new())
            .create(320, 240)
            .unwrap()
    }

    #[test]
    fn test_front_pass() {
        let texture = texture();
        let node = DepthPassBuilder::new(DepthFace::Front).build(Arc::clone(&texture));
        let camera = node.camera_settings().unwrap();

        assert_eq!(node.name(), "front_depth");
        assert_eq!(camera.render_order(), RenderOrder::PreRender);
        assert_eq!(camera.render_target(), RenderTargetImplementation::FrameBufferObject);
        assert_eq!(camera.clear_mask(), ClearMask::DEPTH);
        assert_eq!(camera.clear_depth(), 1.0);
        assert_eq!(camera.compute_near_far(), ComputeNearFarMode::DoNotCompute);
        assert_eq!(camera.viewport(), Some(Viewport::from_dimensions(320, 240)));
        assert_eq!(camera.depth_attachment().unwrap().id(), texture.id());
        assert!(camera.color_attachment().is_none());

        let state = node.state_set().unwrap();
        assert_eq!(state.cull_face(), Some(CullFace::Back));
        // engine default depth test
        assert!(state.depth().is_none());
        assert!(node.cull_callback().is_some());
    }

    #[test]
    fn test_back_pass() {
        let node = DepthPassBuilder::new(DepthFace::Back)
            .with_name("back_depth3")
            .build(texture());
        let camera = node.camera_settings().unwrap();

        assert_eq!(node.name(), "back_depth3");
        assert_eq!(camera.clear_depth(), 0.0);

        let state = node.state_set().unwrap();
        assert_eq!(state.cull_face(), Some(CullFace::Front));
        assert_eq!(state.depth().unwrap().function, CompareFunction::Greater);
    }

    #[test]
    fn test_identity_relative_frame() {
        let camera = DepthPassBuilder::new(DepthFace::Front)
            .build(texture())
            .camera_settings()
            .unwrap();
        assert_eq!(camera.reference_frame(), ReferenceFrame::Relative);
        assert!(camera.view().is_identity(0.0));
        assert!(camera.projection().is_identity(0.0));
    }
}
