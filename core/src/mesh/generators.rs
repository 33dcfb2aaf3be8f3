//! Mesh generators for the parametric surface and boundary primitives.
//!
//! Surface generators ([`generate_grid`], [`generate_side_walls`]) attach
//! an *initial bound* padded along the vertical axis, because the final
//! elevation is computed on the GPU and the CPU-side vertices all lie on
//! flat planes.
//!
//! Primitive generators follow the usual scene-graph conventions: the shape
//! is centered on `center` with its axis along +Z. The cone center sits a
//! quarter of the height above the base.

use std::f32::consts::PI;

use crate::bounds::BoundingBox;
use crate::math::Vec3;

use super::data::{CpuMesh, MeshVertex, PrimitiveTopology};

/// Default number of segments around the axis of revolved primitives.
pub const DEFAULT_SEGMENTS: u32 = 32;

/// Default number of latitudinal rings for spheres and capsules.
pub const DEFAULT_RINGS: u32 = 16;

/// Unit normal of the plane spanned by `u_axis` and `v_axis`.
pub fn vertical_axis(u_axis: &Vec3, v_axis: &Vec3) -> Vec3 {
    u_axis.cross(v_axis).normalize()
}

/// Displacement allowance along the vertical axis: the mean axis length.
fn displacement_axis(u_axis: &Vec3, v_axis: &Vec3) -> Vec3 {
    vertical_axis(u_axis, v_axis) * ((u_axis.norm() + v_axis.norm()) * 0.5)
}

fn quad_corners(origin: &Vec3, u_axis: &Vec3, v_axis: &Vec3) -> [Vec3; 4] {
    [
        *origin,
        origin + u_axis,
        origin + v_axis,
        origin + u_axis + v_axis,
    ]
}

/// Generate a flat `u_cells` x `v_cells` grid spanning `u_axis` and `v_axis`.
///
/// Produces `(u_cells + 1) * (v_cells + 1)` vertices, laid out row by row
/// along `v`, and six indices per cell. `top` selects winding and normal
/// facing along `u x v`; otherwise the grid faces the opposite way. Indices
/// are 16-bit while the vertex count fits.
pub fn generate_grid(
    origin: Vec3,
    u_axis: Vec3,
    v_axis: Vec3,
    u_cells: u32,
    v_cells: u32,
    top: bool,
) -> CpuMesh {
    let u_cells = u_cells.max(1);
    let v_cells = v_cells.max(1);

    let up = vertical_axis(&u_axis, &v_axis);
    let normal = if top { up } else { -up };
    let ua = u_axis / u_cells as f32;
    let va = v_axis / v_cells as f32;

    let mut vertices = Vec::with_capacity(((u_cells + 1) * (v_cells + 1)) as usize);
    for r in 0..=v_cells {
        for c in 0..=u_cells {
            let p = origin + ua * c as f32 + va * r as f32;
            vertices.push(MeshVertex::new(p, normal));
        }
    }

    let mut indices = Vec::with_capacity((u_cells * v_cells * 6) as usize);
    for r in 0..v_cells {
        for c in 0..u_cells {
            let p0 = c + r * (u_cells + 1);
            let p1 = p0 + u_cells + 1;
            let p2 = p0 + 1;
            let p3 = p1 + 1;
            if top {
                indices.extend_from_slice(&[p0, p2, p1, p2, p3, p1]);
            } else {
                indices.extend_from_slice(&[p0, p1, p2, p2, p1, p3]);
            }
        }
    }

    let w_axis = displacement_axis(&u_axis, &v_axis);
    let mut bound = BoundingBox::new();
    for corner in quad_corners(&origin, &u_axis, &v_axis) {
        bound.expand_by_point(&corner);
        bound.expand_by_point(&(corner + w_axis));
    }

    CpuMesh::new()
        .with_vertices(vertices)
        .with_indices(&indices)
        .with_initial_bound(bound)
        .with_label(if top { "parametric_top" } else { "parametric_base" })
}

/// Generate the four side walls joining a base grid and a top grid.
///
/// The walls are triangle strips walked around the domain border: the
/// `-u` edge, the far `+v` edge, the `+u` edge and the near `-v` edge. Each
/// strip holds `2 * (cells + 1)` vertices alternating base/top, with the
/// strip's outward normal.
pub fn generate_side_walls(
    base_origin: Vec3,
    top_origin: Vec3,
    u_axis: Vec3,
    v_axis: Vec3,
    u_cells: u32,
    v_cells: u32,
) -> CpuMesh {
    let u_cells = u_cells.max(1);
    let v_cells = v_cells.max(1);

    let ua = u_axis / u_cells as f32;
    let va = v_axis / v_cells as f32;
    let u_dir = u_axis.normalize();
    let v_dir = v_axis.normalize();

    // (column, row) walk per strip, and the strip normal.
    let strips: [(Vec<(u32, u32)>, Vec3); 4] = [
        ((0..=v_cells).map(|r| (0, r)).collect(), -u_dir),
        ((0..=u_cells).map(|c| (c, v_cells)).collect(), v_dir),
        ((0..=v_cells).rev().map(|r| (u_cells, r)).collect(), u_dir),
        ((0..=u_cells).rev().map(|c| (c, 0)).collect(), -v_dir),
    ];

    let mut mesh = CpuMesh::new().with_topology(PrimitiveTopology::TriangleStrip);
    let mut vertices = Vec::with_capacity((4 * (u_cells + v_cells + 2)) as usize);
    for (walk, normal) in &strips {
        let start = vertices.len() as u32;
        for &(c, r) in walk {
            let offset = ua * c as f32 + va * r as f32;
            vertices.push(MeshVertex::new(base_origin + offset, *normal));
            vertices.push(MeshVertex::new(top_origin + offset, *normal));
        }
        mesh = mesh.with_range(start, vertices.len() as u32 - start);
    }

    let w_axis = displacement_axis(&u_axis, &v_axis);
    let mut bound = BoundingBox::new();
    for corner in quad_corners(&base_origin, &u_axis, &v_axis) {
        bound.expand_by_point(&corner);
        bound.expand_by_point(&(corner + w_axis));
        bound.expand_by_point(&(corner - w_axis));
    }

    mesh.with_vertices(vertices)
        .with_initial_bound(bound)
        .with_label("parametric_walls")
}

/// One row of a surface of revolution around +Z.
#[derive(Debug, Clone, Copy)]
struct ProfilePoint {
    radius: f32,
    z: f32,
    /// Normal in the (radial, z) plane.
    normal: (f32, f32),
}

impl ProfilePoint {
    fn new(radius: f32, z: f32, normal: (f32, f32)) -> Self {
        Self { radius, z, normal }
    }
}

/// Accumulates revolved profiles into one indexed mesh.
#[derive(Default)]
struct LatheBuilder {
    vertices: Vec<MeshVertex>,
    indices: Vec<u32>,
}

impl LatheBuilder {
    /// Revolve `profile` (ordered from +Z toward -Z along the outside of the
    /// surface) around the axis through `center`.
    fn revolve(&mut self, center: &Vec3, profile: &[ProfilePoint], segments: u32) {
        let base = self.vertices.len() as u32;

        for point in profile {
            for segment in 0..=segments {
                let phi = segment as f32 * 2.0 * PI / segments as f32;
                let (sin_phi, cos_phi) = phi.sin_cos();
                let position = center
                    + Vec3::new(point.radius * cos_phi, point.radius * sin_phi, point.z);
                let (nr, nz) = point.normal;
                let normal = Vec3::new(nr * cos_phi, nr * sin_phi, nz);
                self.vertices.push(MeshVertex::new(position, normal));
            }
        }

        for row in 0..profile.len().saturating_sub(1) as u32 {
            for segment in 0..segments {
                let current = base + row * (segments + 1) + segment;
                let next = current + segments + 1;

                self.indices.push(current);
                self.indices.push(next);
                self.indices.push(current + 1);

                self.indices.push(current + 1);
                self.indices.push(next);
                self.indices.push(next + 1);
            }
        }
    }

    fn disc(&mut self, center: &Vec3, radius: f32, z: f32, facing_up: bool, segments: u32) {
        let normal = if facing_up { (0.0, 1.0) } else { (0.0, -1.0) };
        let mut profile = [
            ProfilePoint::new(0.0, z, normal),
            ProfilePoint::new(radius, z, normal),
        ];
        if !facing_up {
            profile.reverse();
        }
        self.revolve(center, &profile, segments);
    }

    fn finish(self, label: &str) -> CpuMesh {
        CpuMesh::new()
            .with_vertices(self.vertices)
            .with_indices(&self.indices)
            .with_label(label)
    }
}

/// Hemisphere rows from the pole down to the equator (`upper`) or from the
/// equator down to the pole, shifted along Z by `offset`.
fn hemisphere_profile(radius: f32, rings: u32, upper: bool, offset: f32) -> Vec<ProfilePoint> {
    let half = (rings / 2).max(1);
    (0..=half)
        .map(|ring| {
            let theta = if upper {
                ring as f32 * 0.5 * PI / half as f32
            } else {
                0.5 * PI + ring as f32 * 0.5 * PI / half as f32
            };
            let (sin_theta, cos_theta) = theta.sin_cos();
            ProfilePoint::new(
                radius * sin_theta,
                radius * cos_theta + offset,
                (sin_theta, cos_theta),
            )
        })
        .collect()
}

/// Generate a UV sphere around `center`.
///
/// `segments` subdivide the equator and `rings` go from pole to pole.
pub fn generate_sphere(center: Vec3, radius: f32, segments: u32, rings: u32) -> CpuMesh {
    let segments = segments.max(3);
    let rings = rings.max(2);

    let profile: Vec<ProfilePoint> = (0..=rings)
        .map(|ring| {
            let theta = ring as f32 * PI / rings as f32;
            let (sin_theta, cos_theta) = theta.sin_cos();
            ProfilePoint::new(radius * sin_theta, radius * cos_theta, (sin_theta, cos_theta))
        })
        .collect();

    let mut lathe = LatheBuilder::default();
    lathe.revolve(&center, &profile, segments);
    lathe.finish("sphere")
}

/// Generate an axis-aligned box with full edge lengths `lengths`.
pub fn generate_box(center: Vec3, lengths: Vec3) -> CpuMesh {
    let h = lengths * 0.5;
    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);

    // (normal, tangent a, tangent b) with a x b == normal.
    let faces = [
        (Vec3::x(), Vec3::y(), Vec3::z()),
        (-Vec3::x(), Vec3::z(), Vec3::y()),
        (Vec3::y(), Vec3::z(), Vec3::x()),
        (-Vec3::y(), Vec3::x(), Vec3::z()),
        (Vec3::z(), Vec3::x(), Vec3::y()),
        (-Vec3::z(), Vec3::y(), Vec3::x()),
    ];

    for (normal, a, b) in faces {
        let base = vertices.len() as u32;
        let face_center = normal.component_mul(&h);
        let a = a.component_mul(&h);
        let b = b.component_mul(&h);
        for (sa, sb) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            vertices.push(MeshVertex::new(center + face_center + a * sa + b * sb, normal));
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }

    CpuMesh::new()
        .with_vertices(vertices)
        .with_indices(&indices)
        .with_label("box")
}

/// Generate a closed cylinder of `height` centered on `center`.
pub fn generate_cylinder(center: Vec3, radius: f32, height: f32, segments: u32) -> CpuMesh {
    let segments = segments.max(3);
    let top = height * 0.5;
    let bottom = -top;

    let mut lathe = LatheBuilder::default();
    lathe.disc(&center, radius, top, true, segments);
    lathe.revolve(
        &center,
        &[
            ProfilePoint::new(radius, top, (1.0, 0.0)),
            ProfilePoint::new(radius, bottom, (1.0, 0.0)),
        ],
        segments,
    );
    lathe.disc(&center, radius, bottom, false, segments);
    lathe.finish("cylinder")
}

/// Generate a closed cone with base `radius` and `height`.
///
/// The base lies at `center.z - height / 4`, the apex at
/// `center.z + 3 * height / 4`.
pub fn generate_cone(center: Vec3, radius: f32, height: f32, segments: u32) -> CpuMesh {
    let segments = segments.max(3);
    let bottom = -0.25 * height;
    let apex = 0.75 * height;

    let slant = (height * height + radius * radius).sqrt().max(f32::EPSILON);
    let side_normal = (height / slant, radius / slant);

    let mut lathe = LatheBuilder::default();
    lathe.revolve(
        &center,
        &[
            ProfilePoint::new(0.0, apex, side_normal),
            ProfilePoint::new(radius, bottom, side_normal),
        ],
        segments,
    );
    lathe.disc(&center, radius, bottom, false, segments);
    lathe.finish("cone")
}

/// Generate a capsule: a cylinder of `height` capped by two hemispheres.
///
/// The overall extent along Z is `height + 2 * radius`.
pub fn generate_capsule(
    center: Vec3,
    radius: f32,
    height: f32,
    segments: u32,
    rings: u32,
) -> CpuMesh {
    let segments = segments.max(3);
    let half = height * 0.5;

    let mut profile = hemisphere_profile(radius, rings, true, half);
    profile.extend(hemisphere_profile(radius, rings, false, -half));

    let mut lathe = LatheBuilder::default();
    lathe.revolve(&center, &profile, segments);
    lathe.finish("capsule")
}
