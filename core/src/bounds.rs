//! Axis-aligned bounding boxes.

use crate::math::{Mat4, Vec3, transform_point};

/// Axis-aligned bounding box.
///
/// A freshly created box is *invalid* (min > max) and becomes valid once
/// expanded by a point or by another valid box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Minimum corner.
    pub min: Vec3,
    /// Maximum corner.
    pub max: Vec3,
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::new()
    }
}

impl BoundingBox {
    /// Create an empty (invalid) bounding box.
    pub fn new() -> Self {
        Self {
            min: Vec3::repeat(f32::MAX),
            max: Vec3::repeat(-f32::MAX),
        }
    }

    /// Create a bounding box from explicit corners.
    pub fn from_min_max(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create the smallest box enclosing `points`.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Vec3>) -> Self {
        let mut bb = Self::new();
        for p in points {
            bb.expand_by_point(p);
        }
        bb
    }

    /// Returns true if the box encloses at least one point.
    pub fn is_valid(&self) -> bool {
        self.min.x <= self.max.x && self.min.y <= self.max.y && self.min.z <= self.max.z
    }

    /// Grow the box to include `p`.
    pub fn expand_by_point(&mut self, p: &Vec3) {
        self.min = self.min.inf(p);
        self.max = self.max.sup(p);
    }

    /// Grow the box to include `other`. Invalid boxes are ignored.
    pub fn expand_by_box(&mut self, other: &BoundingBox) {
        if other.is_valid() {
            self.min = self.min.inf(&other.min);
            self.max = self.max.sup(&other.max);
        }
    }

    /// Return the union of two boxes.
    pub fn union(mut self, other: &BoundingBox) -> Self {
        self.expand_by_box(other);
        self
    }

    /// Center of the box.
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Half the diagonal length.
    pub fn radius(&self) -> f32 {
        if self.is_valid() {
            (self.max - self.min).norm() * 0.5
        } else {
            0.0
        }
    }

    /// Returns true if `p` lies inside or on the box.
    pub fn contains(&self, p: &Vec3) -> bool {
        self.is_valid()
            && (self.min.x..=self.max.x).contains(&p.x)
            && (self.min.y..=self.max.y).contains(&p.y)
            && (self.min.z..=self.max.z).contains(&p.z)
    }

    /// Corner `i` in `0..8`; bit 0 selects max x, bit 1 max y, bit 2 max z.
    pub fn corner(&self, i: usize) -> Vec3 {
        Vec3::new(
            if i & 1 != 0 { self.max.x } else { self.min.x },
            if i & 2 != 0 { self.max.y } else { self.min.y },
            if i & 4 != 0 { self.max.z } else { self.min.z },
        )
    }

    /// All eight corners.
    pub fn corners(&self) -> [Vec3; 8] {
        std::array::from_fn(|i| self.corner(i))
    }

    /// Bounding box of this box after transformation by `m`.
    pub fn transformed(&self, m: &Mat4) -> Self {
        if !self.is_valid() {
            return *self;
        }
        let corners = self.corners().map(|c| transform_point(m, &c));
        Self::from_points(corners.iter())
    }

    /// Range of eye-space distances (along `-Z`) covered by the box under
    /// `model_view`, as `(nearest, farthest)`. `None` for an invalid box.
    pub fn depth_range(&self, model_view: &Mat4) -> Option<(f32, f32)> {
        if !self.is_valid() {
            return None;
        }
        let (mut near, mut far) = (f32::MAX, -f32::MAX);
        for corner in self.corners() {
            let distance = -transform_point(model_view, &corner).z;
            near = near.min(distance);
            far = far.max(distance);
        }
        Some((near, far))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_box_is_invalid() {
        let bb = BoundingBox::new();
        assert!(!bb.is_valid());
        assert_eq!(bb.radius(), 0.0);
        assert!(bb.depth_range(&Mat4::identity()).is_none());
    }

    #[test]
    fn test_expand_and_union() {
        let mut a = BoundingBox::new();
        a.expand_by_point(&Vec3::new(1.0, 2.0, 3.0));
        assert!(a.is_valid());
        assert_eq!(a.min, a.max);

        let b = BoundingBox::from_min_max(Vec3::new(-1.0, 0.0, 0.0), Vec3::new(0.0, 5.0, 1.0));
        let u = a.union(&b);
        assert_eq!(u.min, Vec3::new(-1.0, 0.0, 0.0));
        assert_eq!(u.max, Vec3::new(1.0, 5.0, 3.0));

        let unchanged = u.union(&BoundingBox::new());
        assert_eq!(unchanged, u);
    }

    #[test]
    fn test_corners_cover_extremes() {
        let bb = BoundingBox::from_min_max(Vec3::zeros(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(bb.corner(0), Vec3::zeros());
        assert_eq!(bb.corner(7), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(bb.corner(5), Vec3::new(1.0, 0.0, 3.0));
        assert!(bb.corners().iter().all(|c| bb.contains(c)));
    }

    #[test]
    fn test_depth_range_under_translation() {
        let bb = BoundingBox::from_min_max(Vec3::repeat(-1.0), Vec3::repeat(1.0));
        let view = Mat4::new_translation(&Vec3::new(0.0, 0.0, -10.0));
        let (near, far) = bb.depth_range(&view).unwrap();
        assert_eq!(near, 9.0);
        assert_eq!(far, 11.0);
    }

    #[test]
    fn test_transformed_box() {
        let bb = BoundingBox::from_min_max(Vec3::zeros(), Vec3::repeat(1.0));
        let moved = bb.transformed(&Mat4::new_translation(&Vec3::new(2.0, 0.0, 0.0)));
        assert_eq!(moved.min, Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(moved.max, Vec3::new(3.0, 1.0, 1.0));
    }
}
