//! Common utilities for scene integration tests.

use std::sync::Arc;

use parasurf_core::math::{Vec3, look_at_rh, perspective_rh};
use parasurf_core::mesh::generators::{generate_box, generate_sphere};
use parasurf_graphics::{
    Camera, ClearMask, ComputeNearFarMode, CullCallback, CullVisitor, DummyBackend, GraphicsDevice,
    NodeRef, RenderOrder, RenderTargetImplementation, SharedProjection, Texture,
    TextureDescriptor, TextureFormat, TextureUsage, Viewport,
};

/// Install a test logger once; repeated calls are harmless.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Shared fixtures for a test.
pub struct TestContext {
    pub device: Arc<GraphicsDevice>,
    pub backend: DummyBackend,
}

impl TestContext {
    pub fn new() -> Self {
        init_logging();
        Self {
            device: GraphicsDevice::new(),
            backend: DummyBackend::new(),
        }
    }

    /// Depth texture usable both as an attachment and as a shader input.
    pub fn depth_texture(&self, width: u32, height: u32) -> Arc<Texture> {
        self.device
            .create_texture(
                &TextureDescriptor::new_2d(
                    width,
                    height,
                    TextureFormat::Depth32Float,
                    TextureUsage::RENDER_ATTACHMENT | TextureUsage::TEXTURE_BINDING,
                )
                .with_label("test_depth"),
            )
            .unwrap()
    }
}

/// View camera looking at the origin from `distance` along -Y, Z up.
pub fn view_camera(distance: f32) -> Camera {
    Camera::view_camera(
        Viewport::from_dimensions(800, 600),
        perspective_rh(std::f32::consts::FRAC_PI_4, 800.0 / 600.0, 1.0, 10_000.0),
        look_at_rh(&Vec3::new(0.0, -distance, 0.0), &Vec3::zeros(), &Vec3::z()),
    )
}

pub fn box_node(name: &str, center: Vec3, size: f32) -> NodeRef {
    NodeRef::geometry(name, Arc::new(generate_box(center, Vec3::repeat(size))))
}

pub fn sphere_node(name: &str, center: Vec3, radius: f32) -> NodeRef {
    NodeRef::geometry(name, Arc::new(generate_sphere(center, radius, 16, 8)))
}

/// Pre-render depth-only camera rendering into `texture`.
pub fn depth_camera(name: &str, texture: Arc<Texture>) -> NodeRef {
    let viewport = Viewport::from_dimensions(texture.width(), texture.height());
    NodeRef::camera(
        name,
        Camera::new()
            .with_render_order(RenderOrder::PreRender, 0)
            .with_render_target(RenderTargetImplementation::FrameBufferObject)
            .with_clear_mask(ClearMask::DEPTH)
            .with_viewport(viewport)
            .with_compute_near_far(ComputeNearFarMode::DoNotCompute)
            .with_depth_attachment(texture),
    )
}

/// Pushes the projection inherited through the traversal context.
#[derive(Debug)]
pub struct InheritProjection;

impl CullCallback for InheritProjection {
    fn cull(&self, node: &NodeRef, cv: &mut CullVisitor) {
        let inherited: Option<SharedProjection> = cv.context().inherited_projection().cloned();
        match inherited {
            Some(projection) => {
                cv.push_projection(projection);
                cv.traverse(node);
                cv.pop_projection();
            }
            None => cv.traverse(node),
        }
    }
}

/// Publishes the current projection for the subtree.
#[derive(Debug)]
pub struct PublishProjection;

impl CullCallback for PublishProjection {
    fn cull(&self, node: &NodeRef, cv: &mut CullVisitor) {
        let projection = cv.projection_handle();
        cv.context_mut().publish_projection(projection);
        cv.traverse(node);
        cv.context_mut().withdraw_projection();
    }
}
