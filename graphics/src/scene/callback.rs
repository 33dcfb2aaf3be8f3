//! Typed cull callbacks.

use std::fmt;

use super::cull::CullVisitor;
use super::node::NodeRef;

/// Hook invoked by the [`CullVisitor`] in place of a node's default traversal.
///
/// The visitor hands itself over as a concrete type, so a callback can push
/// projections, read the model-view or publish data in the traversal
/// context without any runtime type check. The callback decides whether and
/// when the node's subtree is visited by calling [`CullVisitor::traverse`].
///
/// For camera nodes the callback runs after the camera has set up its stage,
/// model-view and projection, so `traverse` visits the camera's children.
pub trait CullCallback: Send + Sync + fmt::Debug {
    /// Cull `node`; call `cv.traverse(node)` to continue into its subtree.
    fn cull(&self, node: &NodeRef, cv: &mut CullVisitor);
}
