//! Scene graph host: nodes, cameras, state and the cull traversal.
//!
//! This module provides the scene-graph primitives the rest of the
//! workspace builds on:
//!
//! - [`NodeRef`] - Shared, interior-mutable scene node (group, geometry or camera)
//! - [`Camera`] - Render order, target, reference frame and near/far policy
//! - [`StateSet`] - Render state, textures, uniforms and shader defines
//! - [`CullCallback`] - Typed hook invoked in place of a node's traversal
//! - [`CullVisitor`] - Walks a scene and produces a [`FramePlan`]
//!
//! # Frame flow
//!
//! 1. **Cull** - [`CullVisitor::cull`] walks the scene from a view camera,
//!    opening a render stage per pre-/post-render camera and collecting
//!    draw items with their model-view, shared projection and resolved state.
//! 2. **Plan** - [`FramePlan::to_render_graph`] turns the stages into graphics
//!    passes, with pre-render stages ahead of the stages that sample them.
//! 3. **Execute** - a [`Backend`](crate::Backend) runs the compiled graph.

mod callback;
mod camera;
mod context;
mod cull;
mod node;
mod plan;
mod state;

pub use callback::CullCallback;
pub use camera::{
    Camera, ClearMask, ComputeNearFarMode, ReferenceFrame, RenderOrder,
    RenderTargetImplementation,
};
pub use context::{SharedProjection, TraversalContext};
pub use cull::CullVisitor;
pub use node::{NodeKind, NodeRef};
pub use plan::{DrawItem, FramePlan, RenderStage, StageKind};
pub use state::{
    CullFace, DepthState, Program, ResolvedState, Shader, ShaderStage, StateSet, UniformValue,
};
