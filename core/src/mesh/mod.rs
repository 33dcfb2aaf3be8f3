//! CPU-side mesh types and generators.
//!
//! This module provides GPU-agnostic mesh data structures:
//!
//! - [`MeshVertex`] - Position + normal vertex shared by every generator
//! - [`CpuMesh`] - CPU-side mesh data (vertices, index bytes, draw ranges, bounds)
//! - Generators for the parametric surface (grid, side walls) and for
//!   closed boundary primitives (sphere, box, cone, capsule, cylinder)
//!
//! These types are re-exported by `parasurf-graphics` for convenience.

mod data;
pub mod generators;

pub use data::{CpuMesh, DrawRange, IndexFormat, MeshVertex, PrimitiveTopology};
