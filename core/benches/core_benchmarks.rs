use criterion::{Criterion, black_box, criterion_group, criterion_main};

use parasurf_core::bounds::BoundingBox;
use parasurf_core::math::{DEFAULT_NEAR_FAR_RATIO, Vec3, clamp_projection_near_far, perspective_rh};
use parasurf_core::mesh::generators::{
    generate_capsule, generate_grid, generate_side_walls, generate_sphere,
};

// ---------------------------------------------------------------------------
// Parametric surface generation
// ---------------------------------------------------------------------------

fn bench_generate_grid_small(c: &mut Criterion) {
    c.bench_function("generate_grid_10x10", |b| {
        b.iter(|| {
            generate_grid(
                Vec3::zeros(),
                Vec3::x(),
                Vec3::y(),
                black_box(10),
                black_box(10),
                true,
            )
        });
    });
}

fn bench_generate_grid_wide_indices(c: &mut Criterion) {
    c.bench_function("generate_grid_512x512", |b| {
        b.iter(|| {
            generate_grid(
                Vec3::zeros(),
                Vec3::x(),
                Vec3::y(),
                black_box(512),
                black_box(512),
                true,
            )
        });
    });
}

fn bench_generate_side_walls(c: &mut Criterion) {
    c.bench_function("generate_side_walls_256", |b| {
        b.iter(|| {
            generate_side_walls(
                Vec3::zeros(),
                Vec3::z(),
                Vec3::x(),
                Vec3::y(),
                black_box(256),
                black_box(256),
            )
        });
    });
}

// ---------------------------------------------------------------------------
// Boundary primitives
// ---------------------------------------------------------------------------

fn bench_generate_sphere(c: &mut Criterion) {
    c.bench_function("generate_sphere_64x32", |b| {
        b.iter(|| generate_sphere(Vec3::zeros(), black_box(1.0), black_box(64), black_box(32)));
    });
}

fn bench_generate_capsule(c: &mut Criterion) {
    c.bench_function("generate_capsule_32x16", |b| {
        b.iter(|| {
            generate_capsule(
                Vec3::zeros(),
                black_box(0.5),
                black_box(2.0),
                black_box(32),
                black_box(16),
            )
        });
    });
}

// ---------------------------------------------------------------------------
// Near/far computation
// ---------------------------------------------------------------------------

fn bench_depth_range_and_clamp(c: &mut Criterion) {
    let bb = BoundingBox::from_min_max(Vec3::repeat(-1.0), Vec3::repeat(1.0));
    let view = parasurf_core::math::look_at_rh(&Vec3::new(3.0, 3.0, 3.0), &Vec3::zeros(), &Vec3::z());
    c.bench_function("depth_range_and_clamp", |b| {
        b.iter(|| {
            let mut projection = perspective_rh(0.8, 1.25, 1.0, 10_000.0);
            if let Some((near, far)) = black_box(&bb).depth_range(black_box(&view)) {
                clamp_projection_near_far(&mut projection, near, far, DEFAULT_NEAR_FAR_RATIO);
            }
            projection
        });
    });
}

criterion_group!(
    mesh_benches,
    bench_generate_grid_small,
    bench_generate_grid_wide_indices,
    bench_generate_side_walls,
    bench_generate_sphere,
    bench_generate_capsule,
);

criterion_group!(math_benches, bench_depth_range_and_clamp);

criterion_main!(mesh_benches, math_benches);
