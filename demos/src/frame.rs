//! One-frame driver: viewer camera, cull, graph compile and execution.

use parasurf_core::bounds::BoundingBox;
use parasurf_core::math::{Vec3, look_at_rh, perspective_rh};
use parasurf_graphics::{Backend, Camera, CullVisitor, NodeRef, Viewport};

use crate::error::DemoError;

/// What happened while rendering one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSummary {
    /// Stage names in execution order.
    pub passes: Vec<String>,
    /// Draws recorded across all stages.
    pub draw_count: usize,
    /// Clip range the main stage settled on, if computed.
    pub near_far: Option<(f32, f32)>,
}

/// Camera framing `bounds` from the -Y side, looking slightly down.
///
/// An invalid box frames the unit cube.
pub fn viewer_camera(bounds: &BoundingBox, width: u32, height: u32) -> Camera {
    let bounds = if bounds.is_valid() {
        *bounds
    } else {
        BoundingBox::from_min_max(Vec3::zeros(), Vec3::repeat(1.0))
    };
    let center = bounds.center();
    let radius = bounds.radius().max(0.5);
    let eye = center + Vec3::new(0.0, -3.0 * radius, 1.5 * radius);

    let aspect = width.max(1) as f32 / height.max(1) as f32;
    Camera::view_camera(
        Viewport::from_dimensions(width, height),
        perspective_rh(std::f32::consts::FRAC_PI_4, aspect, 1.0, 10_000.0),
        look_at_rh(&eye, &center, &Vec3::z()),
    )
}

/// Cull `root` from `camera`, compile the frame's render graph and execute
/// it on `backend`.
///
/// # Errors
///
/// Returns [`DemoError::Graph`] if the graph has a cycle and
/// [`DemoError::Backend`] if execution fails.
pub fn run_frame(
    root: &NodeRef,
    camera: &Camera,
    backend: &dyn Backend,
) -> Result<FrameSummary, DemoError> {
    let plan = CullVisitor::new(camera).cull(root);
    let graph = plan.to_render_graph();
    let compiled = graph.compile()?;

    log::info!(
        "Executing {} passes ({} draws) on {}",
        graph.pass_count(),
        plan.draw_count(),
        backend.name()
    );
    backend.execute_graph(&graph, &compiled)?;

    let passes = compiled
        .pass_order()
        .iter()
        .filter_map(|&handle| graph.pass(handle))
        .map(|pass| pass.name().to_string())
        .collect();

    Ok(FrameSummary {
        passes,
        draw_count: plan.draw_count(),
        near_far: plan.main_stage().near_far,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use parasurf_core::math::transform_point;
    use parasurf_graphics::{DummyBackend, GraphicsDevice};
    use parasurf_parametric::{BoundaryShape, ParametricNode};

    #[test]
    fn test_viewer_camera_frames_invalid_bounds() {
        let camera = viewer_camera(&BoundingBox::new(), 800, 600);
        let viewport = camera.viewport().unwrap();
        assert_eq!((viewport.width, viewport.height), (800.0, 600.0));
        let eye_space = transform_point(camera.view(), &Vec3::repeat(0.5));
        assert!(eye_space.z < 0.0);
    }

    #[test]
    fn test_run_frame_depth_passes_first() {
        let mut node = ParametricNode::new(GraphicsDevice::new());
        node.settings_mut().depth_boundaries = true;
        node.settings_mut()
            .boundaries
            .push(BoundaryShape::sphere(Vec3::new(0.5, 0.5, 0.5), 0.25));
        node.setup();

        let camera = viewer_camera(node.composer().bounds(), 800, 600);
        let backend = DummyBackend::new();
        let summary = run_frame(node.root(), &camera, &backend).unwrap();

        assert_eq!(summary.passes, vec!["front_depth0", "back_depth0", "main"]);
        assert_eq!(backend.executed_passes(), summary.passes);
        assert_eq!(summary.draw_count, 3);
        let (near, far) = summary.near_far.unwrap();
        assert!(near > 0.0 && near < far);
    }
}
