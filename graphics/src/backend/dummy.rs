//! Dummy GPU backend for testing and development.
//!
//! This backend doesn't perform actual GPU operations but provides
//! a valid implementation for testing the graphics API without
//! requiring GPU hardware.

use parking_lot::Mutex;

use crate::error::GraphicsError;
use crate::graph::{CompiledGraph, RenderGraph};

use super::Backend;

/// Dummy GPU backend.
///
/// Every executed pass name is appended to an internal log that tests can
/// inspect with [`DummyBackend::executed_passes`].
#[derive(Debug, Default)]
pub struct DummyBackend {
    executed: Mutex<Vec<String>>,
}

impl DummyBackend {
    /// Create a new dummy backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Names of all passes executed so far, in execution order.
    pub fn executed_passes(&self) -> Vec<String> {
        self.executed.lock().clone()
    }

    /// Forget previously executed passes.
    pub fn reset(&self) {
        self.executed.lock().clear();
    }
}

impl Backend for DummyBackend {
    fn name(&self) -> &'static str {
        "Dummy Backend"
    }

    fn execute_graph(&self, graph: &RenderGraph, compiled: &CompiledGraph) -> Result<(), GraphicsError> {
        log::trace!(
            "DummyBackend: executing graph with {} passes",
            compiled.pass_order().len()
        );

        let mut executed = self.executed.lock();
        for &handle in compiled.pass_order() {
            let pass = graph.pass(handle).ok_or_else(|| {
                GraphicsError::Internal(format!("pass handle {} out of range", handle.index()))
            })?;
            log::trace!(
                "DummyBackend: pass {:?} ({} draws, {} sampled textures)",
                pass.name(),
                pass.draw_count(),
                pass.sampled_textures().len()
            );
            executed.push(pass.name().to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphicsPass;

    #[test]
    fn test_name() {
        assert_eq!(DummyBackend::new().name(), "Dummy Backend");
    }

    #[test]
    fn test_execute_records_order() {
        let mut graph = RenderGraph::new();
        let main = graph.add_graphics_pass(GraphicsPass::new("main".into()));
        let depth = graph.add_graphics_pass(GraphicsPass::new("depth".into()));
        graph.add_dependency(main, depth);
        let compiled = graph.compile().unwrap();

        let backend = DummyBackend::new();
        backend.execute_graph(&graph, &compiled).unwrap();
        assert_eq!(backend.executed_passes(), vec!["depth", "main"]);

        backend.reset();
        assert!(backend.executed_passes().is_empty());
    }

    #[test]
    fn test_stale_compiled_graph_is_an_error() {
        let mut graph = RenderGraph::new();
        graph.add_graphics_pass(GraphicsPass::new("a".into()));
        let compiled = graph.compile().unwrap();
        graph.clear();

        let result = DummyBackend::new().execute_graph(&graph, &compiled);
        assert!(matches!(result, Err(GraphicsError::Internal(_))));
    }
}
