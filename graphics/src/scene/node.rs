//! Shared scene nodes.

use std::sync::Arc;

use parasurf_core::bounds::BoundingBox;
use parasurf_core::mesh::CpuMesh;
use parking_lot::RwLock;

use super::callback::CullCallback;
use super::camera::{Camera, ReferenceFrame};
use super::state::StateSet;

/// What a node is.
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// Plain grouping node.
    Group,
    /// Leaf drawing a mesh.
    Geometry(Arc<CpuMesh>),
    /// Camera rendering its children.
    Camera(Box<Camera>),
}

#[derive(Debug)]
struct Node {
    name: String,
    kind: NodeKind,
    state_set: Option<StateSet>,
    cull_callback: Option<Arc<dyn CullCallback>>,
    children: Vec<NodeRef>,
}

/// Reference-counted handle to a scene node.
///
/// Cloning the handle shares the node; the same node may be the child of
/// several parents. Accessors take short-lived locks and return owned
/// values, so no lock is held while the caller recurses.
#[derive(Debug, Clone)]
pub struct NodeRef(Arc<RwLock<Node>>);

impl NodeRef {
    fn from_kind(name: impl Into<String>, kind: NodeKind) -> Self {
        Self(Arc::new(RwLock::new(Node {
            name: name.into(),
            kind,
            state_set: None,
            cull_callback: None,
            children: Vec::new(),
        })))
    }

    /// Create a group node.
    pub fn group(name: impl Into<String>) -> Self {
        Self::from_kind(name, NodeKind::Group)
    }

    /// Create a geometry node drawing `mesh`.
    pub fn geometry(name: impl Into<String>, mesh: Arc<CpuMesh>) -> Self {
        Self::from_kind(name, NodeKind::Geometry(mesh))
    }

    /// Create a camera node.
    pub fn camera(name: impl Into<String>, camera: Camera) -> Self {
        Self::from_kind(name, NodeKind::Camera(Box::new(camera)))
    }

    /// Node name.
    pub fn name(&self) -> String {
        self.0.read().name.clone()
    }

    /// Rename the node.
    pub fn set_name(&self, name: impl Into<String>) {
        self.0.write().name = name.into();
    }

    /// Node kind (cloned).
    pub fn kind(&self) -> NodeKind {
        self.0.read().kind.clone()
    }

    /// Mesh of a geometry node.
    pub fn mesh(&self) -> Option<Arc<CpuMesh>> {
        match &self.0.read().kind {
            NodeKind::Geometry(mesh) => Some(Arc::clone(mesh)),
            _ => None,
        }
    }

    /// Camera settings of a camera node.
    pub fn camera_settings(&self) -> Option<Camera> {
        match &self.0.read().kind {
            NodeKind::Camera(camera) => Some((**camera).clone()),
            _ => None,
        }
    }

    /// Returns true for camera nodes.
    pub fn is_camera(&self) -> bool {
        matches!(self.0.read().kind, NodeKind::Camera(_))
    }

    /// Append a child.
    pub fn add_child(&self, child: NodeRef) {
        self.0.write().children.push(child);
    }

    /// Remove every child.
    pub fn remove_children(&self) {
        self.0.write().children.clear();
    }

    /// Children (cloned handles).
    pub fn children(&self) -> Vec<NodeRef> {
        self.0.read().children.clone()
    }

    /// Child at `index`.
    pub fn child(&self, index: usize) -> Option<NodeRef> {
        self.0.read().children.get(index).cloned()
    }

    /// Number of children.
    pub fn num_children(&self) -> usize {
        self.0.read().children.len()
    }

    /// Returns true if `child` is a direct child of this node.
    pub fn contains_child(&self, child: &NodeRef) -> bool {
        self.0.read().children.iter().any(|c| NodeRef::ptr_eq(c, child))
    }

    /// State set (cloned), if any.
    pub fn state_set(&self) -> Option<StateSet> {
        self.0.read().state_set.clone()
    }

    /// Replace the state set.
    pub fn set_state_set(&self, state: Option<StateSet>) {
        self.0.write().state_set = state;
    }

    /// Modify the state set, creating it if needed.
    pub fn update_state_set<R>(&self, f: impl FnOnce(&mut StateSet) -> R) -> R {
        let mut node = self.0.write();
        f(node.state_set.get_or_insert_with(StateSet::new))
    }

    /// Cull callback, if any.
    pub fn cull_callback(&self) -> Option<Arc<dyn CullCallback>> {
        self.0.read().cull_callback.clone()
    }

    /// Replace the cull callback.
    pub fn set_cull_callback(&self, callback: Option<Arc<dyn CullCallback>>) {
        self.0.write().cull_callback = callback;
    }

    /// Bounding box of the subtree in this node's parent space.
    ///
    /// Absolute cameras do not contribute, since their content is not placed
    /// in the parent's coordinate frame.
    pub fn bound(&self) -> BoundingBox {
        let (kind, children) = {
            let node = self.0.read();
            (node.kind.clone(), node.children.clone())
        };

        match kind {
            NodeKind::Geometry(mesh) => *mesh.bounds(),
            NodeKind::Group => children_bound(&children),
            NodeKind::Camera(camera) => match camera.reference_frame() {
                ReferenceFrame::Absolute => BoundingBox::new(),
                ReferenceFrame::Relative => {
                    let bound = children_bound(&children);
                    match camera.view().try_inverse() {
                        Some(inverse) => bound.transformed(&inverse),
                        None => bound,
                    }
                }
            },
        }
    }

    /// Returns true if both handles refer to the same node.
    pub fn ptr_eq(a: &NodeRef, b: &NodeRef) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }
}

fn children_bound(children: &[NodeRef]) -> BoundingBox {
    children
        .iter()
        .fold(BoundingBox::new(), |bound, child| bound.union(&child.bound()))
}

// Ensure node handles can be shared across threads
static_assertions::assert_impl_all!(NodeRef: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use parasurf_core::math::{Mat4, Vec3};
    use parasurf_core::mesh::generators::generate_box;

    fn cube(center: Vec3) -> NodeRef {
        NodeRef::geometry("cube", Arc::new(generate_box(center, Vec3::repeat(2.0))))
    }

    #[test]
    fn test_shared_children() {
        let content = cube(Vec3::zeros());
        let a = NodeRef::group("a");
        let b = NodeRef::group("b");
        a.add_child(content.clone());
        b.add_child(content.clone());

        assert!(a.contains_child(&content));
        assert!(b.contains_child(&content));
        assert!(NodeRef::ptr_eq(&a.child(0).unwrap(), &b.child(0).unwrap()));

        a.remove_children();
        assert_eq!(a.num_children(), 0);
        assert_eq!(b.num_children(), 1);
    }

    #[test]
    fn test_group_bound_is_union() {
        let group = NodeRef::group("g");
        group.add_child(cube(Vec3::zeros()));
        group.add_child(cube(Vec3::new(10.0, 0.0, 0.0)));
        let bound = group.bound();
        assert_eq!(bound.min, Vec3::new(-1.0, -1.0, -1.0));
        assert_eq!(bound.max, Vec3::new(11.0, 1.0, 1.0));
        assert!(!NodeRef::group("empty").bound().is_valid());
    }

    #[test]
    fn test_absolute_camera_has_no_bound() {
        let camera = NodeRef::camera(
            "cam",
            Camera::new().with_reference_frame(ReferenceFrame::Absolute),
        );
        camera.add_child(cube(Vec3::zeros()));
        assert!(!camera.bound().is_valid());

        let relative = NodeRef::camera("rel", Camera::new().with_view(Mat4::identity()));
        relative.add_child(cube(Vec3::zeros()));
        assert!(relative.bound().is_valid());
    }

    #[test]
    fn test_state_set_updates() {
        let node = NodeRef::group("g");
        assert!(node.state_set().is_none());
        node.update_state_set(|s| s.set_define("NUM_DEPTH_TEXTURES", "0"));
        assert_eq!(
            node.state_set().unwrap().define("NUM_DEPTH_TEXTURES"),
            Some("0")
        );
        node.set_state_set(None);
        assert!(node.state_set().is_none());
    }
}
