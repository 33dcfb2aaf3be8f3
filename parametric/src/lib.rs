//! # parasurf parametric
//!
//! Parametric height-field surfaces composited against boundary volumes.
//!
//! ## Overview
//!
//! The surface is a flat grid (base, top and side walls) whose elevation is
//! computed by a shader function. Boundary subgraphs can be drawn normally
//! and/or captured into a pair of depth textures (front faces and back
//! faces) that the surface shader samples to clip against the volume.
//!
//! - [`DepthTextureFactory`] - Allocates depth textures for the pre-passes
//! - [`DepthPassBuilder`] - Wraps a depth texture in a pre-render camera
//! - [`RttCameraCullCallback`] / [`NearFarCallback`] - Share the main
//!   projection with the pre-passes and fit the clip range to the content
//! - [`SceneComposer`] - Assembles depth and render sub-scenes on `rebuild()`
//! - [`ParametricNode`] - User-facing node building the surface geometry
//!
//! ## Example
//!
//! ```ignore
//! use parasurf_parametric::{ParametricNode, BoundaryShape};
//!
//! let mut node = ParametricNode::new(GraphicsDevice::new());
//! node.settings_mut().depth_boundaries = true;
//! node.add_subgraph(BoundaryShape::sphere(Vec3::new(0.5, 0.5, 0.5), 0.25).to_node("sphere"));
//! node.setup();
//!
//! let plan = CullVisitor::new(&camera).cull(node.root());
//! ```

pub mod bindings;
pub mod callbacks;
pub mod composer;
pub mod depth_pass;
pub mod depth_texture;
pub mod node;
pub mod registry;
pub mod settings;
pub mod shapes;

pub use bindings::DepthBindingsBuilder;
pub use callbacks::{NearFarCallback, RttCameraCullCallback};
pub use composer::SceneComposer;
pub use depth_pass::{DepthFace, DepthPassBuilder};
pub use depth_texture::DepthTextureFactory;
pub use node::ParametricNode;
pub use registry::{DepthTexturePair, SubgraphEntry, SubgraphRegistry};
pub use settings::{ParametricSettings, SettingsError};
pub use shapes::BoundaryShape;

/// Parametric library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the parametric subsystem.
pub fn init() {
    log::info!("parasurf parametric v{} initialized", VERSION);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
