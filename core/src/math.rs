//! Math type aliases and helper functions.
//!
//! All rendering math is `f32`. Projections follow the right-handed,
//! `[0, 1]` depth convention (camera looks down `-Z`).

pub use nalgebra;

/// 2D vector (f32).
pub type Vec2 = nalgebra::Vector2<f32>;

/// 3D vector (f32).
pub type Vec3 = nalgebra::Vector3<f32>;

/// 4D vector (f32).
pub type Vec4 = nalgebra::Vector4<f32>;

/// 4x4 matrix (f32).
pub type Mat4 = nalgebra::Matrix4<f32>;

/// Smallest allowed ratio between the near and far planes of a clamped
/// perspective projection.
pub const DEFAULT_NEAR_FAR_RATIO: f32 = 0.0005;

/// Build a right-handed perspective projection with depth range [0, 1] (wgpu/Vulkan convention).
pub fn perspective_rh(yfov: f32, aspect: f32, znear: f32, zfar: f32) -> Mat4 {
    let f = 1.0 / (yfov / 2.0).tan();
    let nf = 1.0 / (znear - zfar);
    #[rustfmt::skip]
    let result = Mat4::new(
        f / aspect, 0.0,  0.0,              0.0,
        0.0,        f,    0.0,              0.0,
        0.0,        0.0,  zfar * nf,        znear * zfar * nf,
        0.0,        0.0,  -1.0,             0.0,
    );
    result
}

/// Build a right-handed orthographic projection with depth range [0, 1] (wgpu/Vulkan convention).
pub fn orthographic_rh(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Mat4 {
    let rml = right - left;
    let tmb = top - bottom;
    let fmn = far - near;
    #[rustfmt::skip]
    let result = Mat4::new(
        2.0 / rml, 0.0,       0.0,         -(right + left) / rml,
        0.0,       2.0 / tmb, 0.0,         -(top + bottom) / tmb,
        0.0,       0.0,       -1.0 / fmn,  -near / fmn,
        0.0,       0.0,       0.0,          1.0,
    );
    result
}

/// Right-handed look-at view matrix.
pub fn look_at_rh(eye: &Vec3, target: &Vec3, up: &Vec3) -> Mat4 {
    let eye_point = nalgebra::Point3::from(*eye);
    let target_point = nalgebra::Point3::from(*target);
    nalgebra::Isometry3::look_at_rh(&eye_point, &target_point, up).to_homogeneous()
}

/// Transform a point (w = 1) by a 4x4 matrix, without perspective divide.
pub fn transform_point(m: &Mat4, p: &Vec3) -> Vec3 {
    let v = m * Vec4::new(p.x, p.y, p.z, 1.0);
    Vec3::new(v.x, v.y, v.z)
}

/// Project an eye-space point and return its `[0, 1]` depth value.
pub fn projected_depth(projection: &Mat4, eye: &Vec3) -> f32 {
    let clip = projection * Vec4::new(eye.x, eye.y, eye.z, 1.0);
    clip.z / clip.w
}

/// Returns true if the matrix has the shape of an orthographic projection.
pub fn is_orthographic(projection: &Mat4) -> bool {
    projection[(3, 0)] == 0.0
        && projection[(3, 1)] == 0.0
        && projection[(3, 2)] == 0.0
        && projection[(3, 3)] == 1.0
}

/// Returns true if the matrix has the shape of a right-handed perspective projection.
pub fn is_perspective(projection: &Mat4) -> bool {
    projection[(3, 0)] == 0.0
        && projection[(3, 1)] == 0.0
        && projection[(3, 2)] == -1.0
        && projection[(3, 3)] == 0.0
}

/// Rewrite the depth mapping of `projection` so that eye distances
/// `[znear, zfar]` map into `[0, 1]`.
///
/// A small margin is added around the range, and for perspective
/// projections the near plane is kept above `zfar * near_far_ratio`.
/// Returns the near/far pair actually written, or `None` when the range is
/// empty or the matrix is neither perspective nor orthographic (the matrix is
/// left untouched in that case).
pub fn clamp_projection_near_far(
    projection: &mut Mat4,
    znear: f32,
    zfar: f32,
    near_far_ratio: f32,
) -> Option<(f32, f32)> {
    const EPSILON: f32 = 1e-6;

    if !znear.is_finite() || !zfar.is_finite() || zfar < znear - EPSILON {
        return None;
    }

    let (mut znear, mut zfar) = (znear, zfar);
    if zfar < znear + EPSILON {
        let average = (znear + zfar) * 0.5;
        znear = average - EPSILON;
        zfar = average + EPSILON;
    }

    if is_orthographic(projection) {
        let delta_span = ((zfar - znear) * 0.02).max(1.0);
        let near = znear - delta_span;
        let far = zfar + delta_span;
        projection[(2, 2)] = 1.0 / (near - far);
        projection[(2, 3)] = near / (near - far);
        Some((near, far))
    } else if is_perspective(projection) {
        let far = zfar * 1.02;
        let near = (znear * 0.98).max(far * near_far_ratio);
        projection[(2, 2)] = far / (near - far);
        projection[(2, 3)] = near * far / (near - far);
        Some((near, far))
    } else {
        None
    }
}
