//! Traversal-scoped data shared between cull callbacks.

use std::sync::Arc;

use parasurf_core::math::Mat4;
use parking_lot::RwLock;

/// A projection matrix shared between a stage and the draws that use it.
///
/// Cloning shares the same matrix. When a stage clamps its projection to the
/// computed near/far range at the end of culling, every holder of the
/// handle sees the clamped matrix.
#[derive(Debug, Clone)]
pub struct SharedProjection(Arc<RwLock<Mat4>>);

impl SharedProjection {
    /// Wrap a matrix in a new shared handle.
    pub fn new(matrix: Mat4) -> Self {
        Self(Arc::new(RwLock::new(matrix)))
    }

    /// Current matrix value.
    pub fn get(&self) -> Mat4 {
        *self.0.read()
    }

    /// Replace the matrix value.
    pub fn set(&self, matrix: Mat4) {
        *self.0.write() = matrix;
    }

    /// Modify the matrix in place.
    pub fn update<R>(&self, f: impl FnOnce(&mut Mat4) -> R) -> R {
        f(&mut self.0.write())
    }

    /// Returns true if both handles share one matrix.
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }
}

/// Explicit per-traversal context.
///
/// A composite root publishes its projection here before its subtree is
/// culled, and nested render-to-texture cameras look it up. Publishing is
/// stack-like so nested composites see the innermost projection. The
/// counters let callers check that every publish was withdrawn.
#[derive(Debug, Default)]
pub struct TraversalContext {
    projections: Vec<SharedProjection>,
    publish_count: usize,
    withdraw_count: usize,
}

impl TraversalContext {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a projection for nested passes.
    pub fn publish_projection(&mut self, projection: SharedProjection) {
        self.projections.push(projection);
        self.publish_count += 1;
    }

    /// Withdraw the most recently published projection.
    pub fn withdraw_projection(&mut self) -> Option<SharedProjection> {
        let withdrawn = self.projections.pop();
        if withdrawn.is_some() {
            self.withdraw_count += 1;
        }
        withdrawn
    }

    /// Innermost published projection, if any.
    pub fn inherited_projection(&self) -> Option<&SharedProjection> {
        self.projections.last()
    }

    /// Returns true if nothing is currently published.
    pub fn is_empty(&self) -> bool {
        self.projections.is_empty()
    }

    /// Number of publishes over the traversal.
    pub fn publish_count(&self) -> usize {
        self.publish_count
    }

    /// Number of withdrawals over the traversal.
    pub fn withdraw_count(&self) -> usize {
        self.withdraw_count
    }
}
