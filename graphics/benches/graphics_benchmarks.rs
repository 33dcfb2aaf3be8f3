use std::sync::Arc;

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use parasurf_core::math::{Vec3, look_at_rh, perspective_rh};
use parasurf_core::mesh::generators::generate_box;
use parasurf_graphics::{
    Camera, CullVisitor, GraphicsDevice, GraphicsPass, NodeRef, RenderGraph, TextureDescriptor,
    TextureFormat, TextureUsage, Viewport,
};

// ---------------------------------------------------------------------------
// Render graph construction
// ---------------------------------------------------------------------------

fn bench_graph_build_small(c: &mut Criterion) {
    c.bench_function("render_graph_build_3_passes", |b| {
        b.iter(|| {
            let mut graph = RenderGraph::new();
            let front = graph.add_graphics_pass(GraphicsPass::new("front_depth".into()));
            let back = graph.add_graphics_pass(GraphicsPass::new("back_depth".into()));
            let main = graph.add_graphics_pass(GraphicsPass::new("main".into()));
            graph.add_dependency(main, front);
            graph.add_dependency(main, back);
            black_box(&graph);
        });
    });
}

// ---------------------------------------------------------------------------
// Render graph compilation
// ---------------------------------------------------------------------------

fn bench_graph_compile_large(c: &mut Criterion) {
    let mut graph = RenderGraph::new();
    let mut prev = graph.add_graphics_pass(GraphicsPass::new("pass_0".into()));
    for i in 1..32 {
        let handle = graph.add_graphics_pass(GraphicsPass::new(format!("pass_{i}")));
        graph.add_dependency(handle, prev);
        prev = handle;
    }

    c.bench_function("render_graph_compile_32_passes_chain", |b| {
        b.iter(|| black_box(graph.compile().unwrap()));
    });
}

// ---------------------------------------------------------------------------
// Cull traversal
// ---------------------------------------------------------------------------

fn bench_cull_grid_of_boxes(c: &mut Criterion) {
    let mesh = Arc::new(generate_box(Vec3::zeros(), Vec3::repeat(1.0)));
    let root = NodeRef::group("root");
    for x in 0..16 {
        for y in 0..16 {
            let node = NodeRef::geometry(
                format!("box_{x}_{y}"),
                Arc::new(generate_box(Vec3::new(x as f32 * 2.0, y as f32 * 2.0, 0.0), Vec3::repeat(1.0))),
            );
            root.add_child(node);
        }
    }
    root.add_child(NodeRef::geometry("shared", mesh));

    let camera = Camera::view_camera(
        Viewport::from_dimensions(1280, 1024),
        perspective_rh(1.0, 1.25, 1.0, 10_000.0),
        look_at_rh(&Vec3::new(16.0, -40.0, 20.0), &Vec3::new(16.0, 16.0, 0.0), &Vec3::z()),
    );

    c.bench_function("cull_257_boxes", |b| {
        b.iter(|| black_box(CullVisitor::new(&camera).cull(&root)));
    });
}

// ---------------------------------------------------------------------------
// Device
// ---------------------------------------------------------------------------

fn bench_device_create_texture(c: &mut Criterion) {
    let device = GraphicsDevice::new();
    let descriptor = TextureDescriptor::new_2d(
        1280,
        1024,
        TextureFormat::Depth32Float,
        TextureUsage::RENDER_ATTACHMENT | TextureUsage::TEXTURE_BINDING,
    );

    c.bench_function("device_create_depth_texture", |b| {
        b.iter(|| black_box(device.create_texture(&descriptor).unwrap()));
    });
}

criterion_group!(
    benches,
    bench_graph_build_small,
    bench_graph_compile_large,
    bench_cull_grid_of_boxes,
    bench_device_create_texture,
);

criterion_main!(benches);
