//! Closed boundary primitives.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use parasurf_core::math::Vec3;
use parasurf_core::mesh::CpuMesh;
use parasurf_core::mesh::generators::{
    DEFAULT_RINGS, DEFAULT_SEGMENTS, generate_box, generate_capsule, generate_cone,
    generate_cylinder, generate_sphere,
};
use parasurf_graphics::NodeRef;

/// A boundary volume described by its center and size.
///
/// Box sizes are full edge lengths. Cones sit with their base a quarter of
/// the height below the center.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum BoundaryShape {
    Sphere {
        center: [f32; 3],
        radius: f32,
    },
    Box {
        center: [f32; 3],
        lengths: [f32; 3],
    },
    Cone {
        center: [f32; 3],
        radius: f32,
        height: f32,
    },
    Capsule {
        center: [f32; 3],
        radius: f32,
        height: f32,
    },
    Cylinder {
        center: [f32; 3],
        radius: f32,
        height: f32,
    },
}

impl BoundaryShape {
    pub fn sphere(center: Vec3, radius: f32) -> Self {
        Self::Sphere {
            center: center.into(),
            radius,
        }
    }

    pub fn cuboid(center: Vec3, lengths: Vec3) -> Self {
        Self::Box {
            center: center.into(),
            lengths: lengths.into(),
        }
    }

    pub fn cone(center: Vec3, radius: f32, height: f32) -> Self {
        Self::Cone {
            center: center.into(),
            radius,
            height,
        }
    }

    pub fn capsule(center: Vec3, radius: f32, height: f32) -> Self {
        Self::Capsule {
            center: center.into(),
            radius,
            height,
        }
    }

    pub fn cylinder(center: Vec3, radius: f32, height: f32) -> Self {
        Self::Cylinder {
            center: center.into(),
            radius,
            height,
        }
    }

    /// Center of the shape.
    pub fn center(&self) -> Vec3 {
        let center = match self {
            Self::Sphere { center, .. }
            | Self::Box { center, .. }
            | Self::Cone { center, .. }
            | Self::Capsule { center, .. }
            | Self::Cylinder { center, .. } => center,
        };
        Vec3::from(*center)
    }

    /// Tessellate the shape.
    pub fn to_mesh(&self) -> CpuMesh {
        let center = self.center();
        match *self {
            Self::Sphere { radius, .. } => generate_sphere(center, radius, DEFAULT_SEGMENTS, DEFAULT_RINGS),
            Self::Box { lengths, .. } => generate_box(center, Vec3::from(lengths)),
            Self::Cone { radius, height, .. } => generate_cone(center, radius, height, DEFAULT_SEGMENTS),
            Self::Capsule { radius, height, .. } => {
                generate_capsule(center, radius, height, DEFAULT_SEGMENTS, DEFAULT_RINGS)
            }
            Self::Cylinder { radius, height, .. } => {
                generate_cylinder(center, radius, height, DEFAULT_SEGMENTS)
            }
        }
        .with_label(self.to_string())
    }

    /// Geometry node drawing the shape.
    pub fn to_node(&self, name: impl Into<String>) -> NodeRef {
        NodeRef::geometry(name, Arc::new(self.to_mesh()))
    }
}

impl fmt::Display for BoundaryShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sphere { .. } => write!(f, "sphere"),
            Self::Box { .. } => write!(f, "box"),
            Self::Cone { .. } => write!(f, "cone"),
            Self::Capsule { .. } => write!(f, "capsule"),
            Self::Cylinder { .. } => write!(f, "cylinder"),
        }
    }
}
