//! # parasurf graphics
//!
//! Minimal scene-graph host built around an abstract render graph.
//!
//! ## Overview
//!
//! This crate provides:
//! - [`GraphicsDevice`] - Texture allocation with resource tracking and an
//!   optional memory budget
//! - [`scene`] - Shared scene nodes, cameras, state sets and the
//!   [`CullVisitor`] that turns a scene into a [`FramePlan`]
//! - [`RenderGraph`] - Declarative description of render passes and dependencies
//! - [`DummyBackend`] - Executes a compiled graph without a GPU
//!
//! ## Example
//!
//! ```ignore
//! use parasurf_graphics::{Camera, CullVisitor, DummyBackend, Backend};
//!
//! let plan = CullVisitor::new(&camera).cull(&root);
//! let graph = plan.to_render_graph();
//! let compiled = graph.compile()?;
//! DummyBackend::new().execute_graph(&graph, &compiled)?;
//! ```

pub mod backend;
pub mod device;
pub mod error;
pub mod graph;
pub mod resources;
pub mod scene;
pub mod types;

// Re-export main types for convenience
pub use backend::{Backend, DummyBackend};
pub use device::{DeviceCapabilities, GraphicsDevice};
pub use error::GraphicsError;
pub use graph::{
    ColorAttachment, CompiledGraph, DepthStencilAttachment, GraphError, GraphicsPass, LoadOp,
    PassHandle, RenderGraph, RenderTarget, RenderTargetConfig, StoreOp,
};
pub use resources::Texture;
pub use scene::{
    Camera, ClearMask, ComputeNearFarMode, CullCallback, CullFace, CullVisitor, DepthState,
    DrawItem, FramePlan, NodeKind, NodeRef, Program, ReferenceFrame, RenderOrder, RenderStage,
    RenderTargetImplementation, ResolvedState, Shader, ShaderStage, SharedProjection, StageKind,
    StateSet, TraversalContext, UniformValue,
};
pub use types::{
    ClearValue, Extent3d, SamplerDescriptor, TextureDescriptor, TextureFormat, TextureUsage,
    Viewport,
};

// Re-export CPU-side types from core.
pub use parasurf_core::mesh::CpuMesh;

/// Graphics library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the graphics subsystem.
///
/// This should be called before using any graphics functionality.
pub fn init() {
    log::info!("parasurf graphics v{} initialized", VERSION);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_render_graph_creation() {
        let graph = RenderGraph::new();
        assert!(graph.passes().is_empty());
    }

    #[test]
    fn test_dummy_backend() {
        let backend = DummyBackend::new();
        assert!(backend.name() == "Dummy Backend");
    }
}
