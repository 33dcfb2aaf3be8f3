//! Cull callbacks sharing the main projection with the depth pre-passes.

use parasurf_core::bounds::BoundingBox;
use parasurf_graphics::{CullCallback, CullVisitor, NodeRef};

/// Cull callback for render-to-texture cameras.
///
/// If an enclosing composite published a projection in the traversal
/// context, the camera's subtree is culled with that projection instead of
/// the camera's own. The handle is shared, so the depth pass ends up with
/// exactly the clip range the main stage settles on.
#[derive(Debug, Clone, Copy, Default)]
pub struct RttCameraCullCallback;

impl CullCallback for RttCameraCullCallback {
    fn cull(&self, node: &NodeRef, cv: &mut CullVisitor) {
        let inherited = cv.context().inherited_projection().cloned();
        let pushed = inherited.is_some();
        if let Some(projection) = inherited {
            cv.push_projection(projection);
        }

        cv.traverse(node);

        if pushed {
            cv.pop_projection();
        }
    }
}

/// Cull callback for the composite root.
///
/// Publishes the current projection for nested depth passes, culls the
/// subtree, then grows the stage's near/far range to cover `bounds` so that
/// boundary volumes only drawn into depth textures are not clipped.
#[derive(Debug, Clone)]
pub struct NearFarCallback {
    bounds: BoundingBox,
}

impl NearFarCallback {
    /// Create a callback fitting the clip range to `bounds`.
    pub fn new(bounds: BoundingBox) -> Self {
        Self { bounds }
    }

    /// Bounds folded into the near/far range.
    pub fn bounds(&self) -> &BoundingBox {
        &self.bounds
    }
}

impl CullCallback for NearFarCallback {
    fn cull(&self, node: &NodeRef, cv: &mut CullVisitor) {
        let projection = cv.projection_handle();
        cv.context_mut().publish_projection(projection);

        cv.traverse(node);

        let model_view = cv.model_view();
        if !cv.update_calculated_near_far(&model_view, &self.bounds) {
            log::trace!("NearFarCallback: bounds of {:?} not in front of the eye", node.name());
        }

        cv.context_mut().withdraw_projection();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use parasurf_core::math::{Vec3, look_at_rh, perspective_rh};
    use parasurf_core::mesh::generators::generate_box;
    use parasurf_graphics::{Camera, SharedProjection, Viewport};

    fn view_camera() -> Camera {
        Camera::view_camera(
            Viewport::from_dimensions(800, 600),
            perspective_rh(1.0, 800.0 / 600.0, 1.0, 1_000.0),
            look_at_rh(&Vec3::new(0.0, -10.0, 0.0), &Vec3::zeros(), &Vec3::z()),
        )
    }

    #[derive(Debug)]
    struct RecordProjection(parking_lot::Mutex<Option<SharedProjection>>);

    impl CullCallback for RecordProjection {
        fn cull(&self, node: &NodeRef, cv: &mut CullVisitor) {
            *self.0.lock() = Some(cv.projection_handle());
            cv.traverse(node);
        }
    }

    #[test]
    fn test_rtt_without_context_keeps_own_projection() {
        let recorder = Arc::new(RecordProjection(parking_lot::Mutex::new(None)));
        let leaf = NodeRef::group("leaf");
        leaf.set_cull_callback(Some(recorder.clone()));

        let rtt = NodeRef::group("rtt");
        rtt.set_cull_callback(Some(Arc::new(RttCameraCullCallback)));
        rtt.add_child(leaf);

        let mut cv = CullVisitor::new(&view_camera());
        let own = cv.projection_handle();
        cv.apply(&rtt);

        let seen = recorder.0.lock().clone().unwrap();
        assert!(SharedProjection::ptr_eq(&seen, &own));
    }

    #[test]
    fn test_rtt_pushes_and_pops_inherited() {
        let recorder = Arc::new(RecordProjection(parking_lot::Mutex::new(None)));
        let leaf = NodeRef::group("leaf");
        leaf.set_cull_callback(Some(recorder.clone()));

        let rtt = NodeRef::group("rtt");
        rtt.set_cull_callback(Some(Arc::new(RttCameraCullCallback)));
        rtt.add_child(leaf);

        let mut cv = CullVisitor::new(&view_camera());
        let own = cv.projection_handle();
        let published = SharedProjection::new(parasurf_core::math::Mat4::identity());
        cv.context_mut().publish_projection(published.clone());

        cv.apply(&rtt);

        let seen = recorder.0.lock().clone().unwrap();
        assert!(SharedProjection::ptr_eq(&seen, &published));
        assert!(SharedProjection::ptr_eq(&cv.projection_handle(), &own));
    }

    #[test]
    fn test_near_far_publishes_once_and_covers_bounds() {
        let bounds = BoundingBox::from_min_max(Vec3::new(-1.0, 20.0, -1.0), Vec3::new(1.0, 40.0, 1.0));
        let root = NodeRef::group("composite");
        root.set_cull_callback(Some(Arc::new(NearFarCallback::new(bounds))));
        root.add_child(NodeRef::geometry(
            "visible",
            Arc::new(generate_box(Vec3::zeros(), Vec3::repeat(2.0))),
        ));

        let plan = CullVisitor::new(&view_camera()).cull(&root);
        assert_eq!(plan.publish_count(), 1);
        assert_eq!(plan.withdraw_count(), 1);
        assert!(plan.is_context_balanced());

        // eye at y = -10: visible box spans 9..11, bounds span 30..50
        let (near, far) = plan.main_stage().near_far.unwrap();
        assert!(near < 9.0);
        assert!(far >= 50.0);
    }

    #[test]
    fn test_near_far_ignores_bounds_behind_eye() {
        let bounds = BoundingBox::from_min_max(Vec3::new(-1.0, -40.0, -1.0), Vec3::new(1.0, -30.0, 1.0));
        let root = NodeRef::group("composite");
        root.set_cull_callback(Some(Arc::new(NearFarCallback::new(bounds))));

        let plan = CullVisitor::new(&view_camera()).cull(&root);
        assert!(plan.main_stage().near_far.is_none());
        assert!(plan.is_context_balanced());
    }
}
