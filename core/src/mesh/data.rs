//! CPU-side mesh data structures.
//!
//! This module provides:
//! - [`PrimitiveTopology`] - How vertices are assembled into primitives
//! - [`IndexFormat`] - Index data format (u16 or u32)
//! - [`MeshVertex`] - The vertex layout used by all generated meshes
//! - [`CpuMesh`] - CPU-side mesh holding vertex and raw index data

use crate::bounds::BoundingBox;
use crate::math::Vec3;

/// Primitive topology describing how vertices are assembled into primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PrimitiveTopology {
    /// Each vertex is a separate point.
    PointList,
    /// Every two vertices form a line.
    LineList,
    /// Every three vertices form a triangle.
    #[default]
    TriangleList,
    /// Vertices form a connected strip of triangles.
    TriangleStrip,
}

impl PrimitiveTopology {
    /// Get the number of vertices per primitive (for non-strip topologies).
    pub fn vertices_per_primitive(&self) -> Option<u32> {
        match self {
            Self::PointList => Some(1),
            Self::LineList => Some(2),
            Self::TriangleList => Some(3),
            Self::TriangleStrip => None, // Variable
        }
    }
}

/// Index format for indexed drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IndexFormat {
    /// 16-bit unsigned integers (max 65535 vertices).
    #[default]
    Uint16,
    /// 32-bit unsigned integers (max ~4 billion vertices).
    Uint32,
}

impl IndexFormat {
    /// Get the size in bytes of each index.
    pub fn size(&self) -> usize {
        match self {
            Self::Uint16 => 2,
            Self::Uint32 => 4,
        }
    }

    /// Smallest format able to address `vertex_count` vertices.
    pub fn for_vertex_count(vertex_count: usize) -> Self {
        if vertex_count >> 16 == 0 {
            Self::Uint16
        } else {
            Self::Uint32
        }
    }
}

/// Position + normal vertex (24 bytes).
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    /// Object-space position.
    pub position: [f32; 3],
    /// Unit normal.
    pub normal: [f32; 3],
}

impl MeshVertex {
    /// Create a vertex from nalgebra vectors.
    pub fn new(position: Vec3, normal: Vec3) -> Self {
        Self {
            position: position.into(),
            normal: normal.into(),
        }
    }

    /// Position as a vector.
    pub fn position(&self) -> Vec3 {
        Vec3::from(self.position)
    }

    /// Normal as a vector.
    pub fn normal(&self) -> Vec3 {
        Vec3::from(self.normal)
    }
}

/// A contiguous range of vertices (or indices, for indexed meshes) drawn
/// with the mesh topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawRange {
    /// First vertex or index.
    pub start: u32,
    /// Number of vertices or indices.
    pub count: u32,
}

/// A CPU-side mesh.
///
/// Vertex data is kept typed; index data is stored as raw bytes in the
/// recorded [`IndexFormat`]. A mesh has one or more draw ranges; by default
/// a single range covers all indices (or all vertices when non-indexed).
///
/// The bounding box is computed from the vertices and may be replaced with
/// an explicit *initial bound*, used when a vertex shader displaces the
/// geometry beyond its CPU-side extent.
#[derive(Clone)]
pub struct CpuMesh {
    topology: PrimitiveTopology,
    vertices: Vec<MeshVertex>,
    index_data: Option<Vec<u8>>,
    index_format: Option<IndexFormat>,
    index_count: u32,
    ranges: Vec<DrawRange>,
    bounds: BoundingBox,
    label: Option<String>,
}

impl Default for CpuMesh {
    fn default() -> Self {
        Self::new()
    }
}

impl CpuMesh {
    /// Create a new empty triangle-list mesh.
    pub fn new() -> Self {
        Self {
            topology: PrimitiveTopology::TriangleList,
            vertices: Vec::new(),
            index_data: None,
            index_format: None,
            index_count: 0,
            ranges: Vec::new(),
            bounds: BoundingBox::new(),
            label: None,
        }
    }

    /// Set the vertices and recompute the bounding box.
    pub fn with_vertices(mut self, vertices: Vec<MeshVertex>) -> Self {
        self.bounds = BoundingBox::new();
        for v in &vertices {
            self.bounds.expand_by_point(&v.position());
        }
        self.vertices = vertices;
        self
    }

    /// Set index data, picking 16-bit storage while the vertex count fits.
    pub fn with_indices(self, indices: &[u32]) -> Self {
        match IndexFormat::for_vertex_count(self.vertices.len()) {
            IndexFormat::Uint16 => {
                let narrow: Vec<u16> = indices.iter().map(|&i| i as u16).collect();
                self.with_indices_u16(&narrow)
            }
            IndexFormat::Uint32 => self.with_indices_u32(indices),
        }
    }

    /// Set index data as u16 indices.
    pub fn with_indices_u16(mut self, indices: &[u16]) -> Self {
        self.index_data = Some(bytemuck::cast_slice(indices).to_vec());
        self.index_format = Some(IndexFormat::Uint16);
        self.index_count = indices.len() as u32;
        self
    }

    /// Set index data as u32 indices.
    pub fn with_indices_u32(mut self, indices: &[u32]) -> Self {
        self.index_data = Some(bytemuck::cast_slice(indices).to_vec());
        self.index_format = Some(IndexFormat::Uint32);
        self.index_count = indices.len() as u32;
        self
    }

    /// Set the primitive topology.
    pub fn with_topology(mut self, topology: PrimitiveTopology) -> Self {
        self.topology = topology;
        self
    }

    /// Append an explicit draw range.
    pub fn with_range(mut self, start: u32, count: u32) -> Self {
        self.ranges.push(DrawRange { start, count });
        self
    }

    /// Replace the computed bounding box with an initial bound.
    pub fn with_initial_bound(mut self, bounds: BoundingBox) -> Self {
        self.bounds = bounds;
        self
    }

    /// Set a debug label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Get the primitive topology.
    pub fn topology(&self) -> PrimitiveTopology {
        self.topology
    }

    /// Get the vertices.
    pub fn vertices(&self) -> &[MeshVertex] {
        &self.vertices
    }

    /// Get the raw vertex bytes.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Get the number of vertices.
    pub fn vertex_count(&self) -> u32 {
        self.vertices.len() as u32
    }

    /// Get the raw index data.
    pub fn index_data(&self) -> Option<&[u8]> {
        self.index_data.as_deref()
    }

    /// Get the index format.
    pub fn index_format(&self) -> Option<IndexFormat> {
        self.index_format
    }

    /// Get the number of indices.
    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    /// Check if this mesh uses indexed drawing.
    pub fn is_indexed(&self) -> bool {
        self.index_data.is_some()
    }

    /// Decode the index data to u32 values.
    pub fn indices(&self) -> Vec<u32> {
        let Some(data) = &self.index_data else {
            return Vec::new();
        };
        match self.index_format {
            Some(IndexFormat::Uint16) => data
                .chunks_exact(2)
                .map(|c| bytemuck::pod_read_unaligned::<u16>(c) as u32)
                .collect(),
            Some(IndexFormat::Uint32) => data
                .chunks_exact(4)
                .map(bytemuck::pod_read_unaligned::<u32>)
                .collect(),
            None => Vec::new(),
        }
    }

    /// Draw ranges. A single full range is reported when none were set.
    pub fn ranges(&self) -> Vec<DrawRange> {
        if self.ranges.is_empty() {
            let count = if self.is_indexed() {
                self.index_count
            } else {
                self.vertex_count()
            };
            vec![DrawRange { start: 0, count }]
        } else {
            self.ranges.clone()
        }
    }

    /// Get the bounding box (initial bound if one was set).
    pub fn bounds(&self) -> &BoundingBox {
        &self.bounds
    }

    /// Get the debug label.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

impl std::fmt::Debug for CpuMesh {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuMesh")
            .field("label", &self.label)
            .field("topology", &self.topology)
            .field("vertex_count", &self.vertices.len())
            .field("index_format", &self.index_format)
            .field("index_count", &self.index_count)
            .field("ranges", &self.ranges.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertex(x: f32, y: f32, z: f32) -> MeshVertex {
        MeshVertex::new(Vec3::new(x, y, z), Vec3::z())
    }

    #[test]
    fn test_primitive_topology_vertices() {
        assert_eq!(PrimitiveTopology::PointList.vertices_per_primitive(), Some(1));
        assert_eq!(PrimitiveTopology::LineList.vertices_per_primitive(), Some(2));
        assert_eq!(PrimitiveTopology::TriangleList.vertices_per_primitive(), Some(3));
        assert_eq!(PrimitiveTopology::TriangleStrip.vertices_per_primitive(), None);
    }

    #[test]
    fn test_index_format_size() {
        assert_eq!(IndexFormat::Uint16.size(), 2);
        assert_eq!(IndexFormat::Uint32.size(), 4);
    }

    #[test]
    fn test_index_format_for_vertex_count() {
        assert_eq!(IndexFormat::for_vertex_count(0), IndexFormat::Uint16);
        assert_eq!(IndexFormat::for_vertex_count(65_535), IndexFormat::Uint16);
        assert_eq!(IndexFormat::for_vertex_count(65_536), IndexFormat::Uint32);
    }

    #[test]
    fn test_cpu_mesh_basic() {
        let mesh = CpuMesh::new()
            .with_vertices(vec![vertex(0.0, 0.0, 0.0), vertex(1.0, 0.0, 0.0), vertex(0.0, 1.0, 2.0)])
            .with_label("test");

        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.vertex_bytes().len(), 3 * 24);
        assert!(!mesh.is_indexed());
        assert_eq!(mesh.label(), Some("test"));
        assert_eq!(mesh.bounds().max, Vec3::new(1.0, 1.0, 2.0));
        assert_eq!(mesh.ranges(), vec![DrawRange { start: 0, count: 3 }]);
    }

    #[test]
    fn test_cpu_mesh_indexed_narrow() {
        let mesh = CpuMesh::new()
            .with_vertices(vec![vertex(0.0, 0.0, 0.0); 4])
            .with_indices(&[0, 1, 2, 2, 3, 0]);

        assert!(mesh.is_indexed());
        assert_eq!(mesh.index_count(), 6);
        assert_eq!(mesh.index_format(), Some(IndexFormat::Uint16));
        assert_eq!(mesh.index_data().map(<[u8]>::len), Some(12));
        assert_eq!(mesh.indices(), vec![0, 1, 2, 2, 3, 0]);
    }

    #[test]
    fn test_cpu_mesh_initial_bound_overrides() {
        let padded = BoundingBox::from_min_max(Vec3::repeat(-5.0), Vec3::repeat(5.0));
        let mesh = CpuMesh::new()
            .with_vertices(vec![vertex(0.0, 0.0, 0.0)])
            .with_initial_bound(padded);
        assert_eq!(*mesh.bounds(), padded);
    }
}
