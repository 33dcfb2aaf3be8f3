//! Render graph infrastructure.
//!
//! The render graph provides a declarative way to describe the passes of a
//! frame and their dependencies. Compiling the graph produces a pass order
//! in which every pass runs after everything it depends on.
//!
//! # Architecture
//!
//! | Layer | Type | Purpose |
//! |-------|------|---------|
//! | Plan | [`FramePlan`](crate::scene::FramePlan) | Culled stages of one frame |
//! | **Graph** | [`RenderGraph`] | Pass dependencies (this module) |
//! | Pass | [`GraphicsPass`] | Single render target configuration |
//!
//! # Example
//!
//! ```ignore
//! use parasurf_graphics::{RenderGraph, GraphicsPass};
//!
//! let mut graph = RenderGraph::new();
//! let depth = graph.add_graphics_pass(GraphicsPass::new("front_depth".into()));
//! let main = graph.add_graphics_pass(GraphicsPass::new("main".into()));
//! graph.add_dependency(main, depth);
//!
//! let compiled = graph.compile()?;
//! ```

mod pass;
mod target;

pub use pass::GraphicsPass;
pub use target::{
    ColorAttachment, DepthStencilAttachment, LoadOp, RenderTarget, RenderTargetConfig, StoreOp,
};

use std::collections::VecDeque;

/// Handle to a pass in the render graph.
///
/// `PassHandle` is `Copy` and cheap to pass around. It is only valid within
/// the `RenderGraph` that created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PassHandle(u32);

impl PassHandle {
    fn new(index: u32) -> Self {
        Self(index)
    }

    /// Index of the pass in [`RenderGraph::passes`].
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// The render graph describes a frame's rendering operations.
///
/// # Construction
///
/// Build a graph by adding passes:
///
/// ```ignore
/// let mut graph = RenderGraph::new();
/// let shadow = graph.add_graphics_pass(GraphicsPass::new("back_depth".into()));
/// let main = graph.add_graphics_pass(GraphicsPass::new("main".into()));
/// graph.add_dependency(main, shadow);
/// ```
#[derive(Debug, Default)]
pub struct RenderGraph {
    /// All passes in the graph.
    passes: Vec<GraphicsPass>,
    /// Dependency edges stored as (dependent, dependency) pairs.
    edges: Vec<(PassHandle, PassHandle)>,
}

impl RenderGraph {
    /// Create a new empty render graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a graphics pass to the graph.
    ///
    /// The pass should be fully configured before adding.
    /// Returns a `PassHandle` for referencing this pass.
    pub fn add_graphics_pass(&mut self, pass: GraphicsPass) -> PassHandle {
        let index = self.passes.len() as u32;
        self.passes.push(pass);
        PassHandle::new(index)
    }

    /// Add a dependency between passes.
    ///
    /// The `dependent` pass will execute after the `dependency` pass.
    pub fn add_dependency(&mut self, dependent: PassHandle, dependency: PassHandle) {
        assert!(
            dependent.index() < self.passes.len(),
            "Invalid dependent handle"
        );
        assert!(
            dependency.index() < self.passes.len(),
            "Invalid dependency handle"
        );
        assert!(dependent != dependency, "Pass cannot depend on itself");

        let exists = self
            .edges
            .iter()
            .any(|&(d, dep)| d == dependent && dep == dependency);
        if !exists {
            self.edges.push((dependent, dependency));
        }
    }

    /// Get dependencies of a pass.
    pub fn dependencies(&self, handle: PassHandle) -> impl Iterator<Item = PassHandle> + '_ {
        self.edges
            .iter()
            .filter(move |&&(dependent, _)| dependent == handle)
            .map(|&(_, dependency)| dependency)
    }

    /// Get the number of dependencies for a pass.
    pub fn dependency_count(&self, handle: PassHandle) -> usize {
        self.edges
            .iter()
            .filter(|&&(dependent, _)| dependent == handle)
            .count()
    }

    /// Get all passes in the graph.
    pub fn passes(&self) -> &[GraphicsPass] {
        &self.passes
    }

    /// Get a pass by handle.
    pub fn pass(&self, handle: PassHandle) -> Option<&GraphicsPass> {
        self.passes.get(handle.index())
    }

    /// Get the number of passes in the graph.
    pub fn pass_count(&self) -> usize {
        self.passes.len()
    }

    /// Compile the graph for execution.
    ///
    /// Passes are topologically sorted; among passes that are ready at the
    /// same time, the one added first runs first.
    pub fn compile(&self) -> Result<CompiledGraph, GraphError> {
        let count = self.passes.len();
        let mut in_degree = vec![0usize; count];
        let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); count];
        for &(dependent, dependency) in &self.edges {
            in_degree[dependent.index()] += 1;
            dependents[dependency.index()].push(dependent.index());
        }

        let mut ready: VecDeque<usize> = (0..count).filter(|&i| in_degree[i] == 0).collect();
        let mut pass_order = Vec::with_capacity(count);

        while let Some(index) = ready.pop_front() {
            pass_order.push(PassHandle::new(index as u32));

            let mut released = Vec::new();
            for &next in &dependents[index] {
                in_degree[next] -= 1;
                if in_degree[next] == 0 {
                    released.push(next);
                }
            }
            released.sort_unstable();
            for next in released {
                // keep the queue ordered by insertion index
                let position = ready.partition_point(|&queued| queued < next);
                ready.insert(position, next);
            }
        }

        if pass_order.len() != count {
            log::error!(
                "RenderGraph: cycle detected, {} of {} passes could not be ordered",
                count - pass_order.len(),
                count
            );
            return Err(GraphError::CyclicDependency);
        }

        log::trace!("RenderGraph: compiled {} passes", count);
        Ok(CompiledGraph { pass_order })
    }

    /// Clear all passes from the graph.
    pub fn clear(&mut self) {
        self.passes.clear();
        self.edges.clear();
    }
}

/// A compiled render graph ready for execution.
#[derive(Debug, Clone)]
pub struct CompiledGraph {
    pass_order: Vec<PassHandle>,
}

impl CompiledGraph {
    /// Pass execution order as handles.
    pub fn pass_order(&self) -> &[PassHandle] {
        &self.pass_order
    }

    /// Position of `handle` in the execution order.
    pub fn position(&self, handle: PassHandle) -> Option<usize> {
        self.pass_order.iter().position(|&h| h == handle)
    }
}

/// Errors that can occur during graph construction or compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// The graph contains a cycle.
    CyclicDependency,
}

impl std::fmt::Display for GraphError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CyclicDependency => write!(f, "render graph contains cyclic dependency"),
        }
    }
}

impl std::error::Error for GraphError {}
