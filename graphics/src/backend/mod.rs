//! GPU backend abstraction layer.
//!
//! A backend consumes a compiled [`RenderGraph`] and submits its passes in
//! order. Only the [`DummyBackend`] ships with this crate; it records the
//! passes it was asked to execute, which makes frame plans testable without
//! GPU hardware.

pub mod dummy;

pub use dummy::DummyBackend;

use crate::error::GraphicsError;
use crate::graph::{CompiledGraph, RenderGraph};

/// A GPU API the render graph can be executed on.
pub trait Backend: Send + Sync {
    /// Human readable backend name.
    fn name(&self) -> &'static str;

    /// Execute the passes of `graph` in the order given by `compiled`.
    fn execute_graph(&self, graph: &RenderGraph, compiled: &CompiledGraph) -> Result<(), GraphicsError>;
}
