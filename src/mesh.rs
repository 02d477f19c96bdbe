use std::collections::{BTreeMap, BTreeSet};

use crate::math::bounds::Aabb;
use crate::math::Point3;

/// Undirected mesh edge as `(smaller vertex index, larger vertex index)`.
pub type MeshEdge = (u32, u32);

/// Source of the surface the traces are digitized on.
pub trait MeshProvider {
    /// Edges bordering exactly one triangle.
    fn boundary_edges(&self) -> BTreeSet<MeshEdge>;

    /// Position of the vertex at `index`, if it exists.
    fn vertex_position(&self, index: u32) -> Option<Point3>;

    /// Number of vertices in the mesh.
    fn vertex_count(&self) -> usize;

    /// Axis-aligned bounds of every vertex.
    fn bounds(&self) -> Option<Aabb> {
        let count = u32::try_from(self.vertex_count()).unwrap_or(u32::MAX);
        let points: Vec<Point3> = (0..count).filter_map(|i| self.vertex_position(i)).collect();
        Aabb::from_points(&points)
    }

    /// Length of the bounding-box diagonal. Zero for an empty mesh.
    fn diagonal(&self) -> f64 {
        self.bounds().map_or(0.0, |b| b.diagonal())
    }
}

/// A triangulated surface.
#[derive(Debug, Clone, Default)]
pub struct TriangleMesh {
    /// Vertex positions.
    pub vertices: Vec<Point3>,
    /// Triangle indices (each triple defines a triangle).
    pub indices: Vec<[u32; 3]>,
}

impl TriangleMesh {
    /// Creates a mesh from vertex positions and triangle indices.
    #[must_use]
    pub fn new(vertices: Vec<Point3>, indices: Vec<[u32; 3]>) -> Self {
        Self { vertices, indices }
    }

    /// Counts how many triangles share each undirected edge.
    ///
    /// Triangles referencing a vertex past the end of `vertices` are skipped.
    #[must_use]
    pub fn edge_triangle_counts(&self) -> BTreeMap<MeshEdge, usize> {
        let n = self.vertices.len();
        let mut counts = BTreeMap::new();
        for tri in &self.indices {
            if tri.iter().any(|&v| v as usize >= n) {
                tracing::warn!("Skipping triangle {:?} with out-of-range vertex", tri);
                continue;
            }
            for i in 0..3 {
                let (a, b) = (tri[i], tri[(i + 1) % 3]);
                let edge = if a <= b { (a, b) } else { (b, a) };
                *counts.entry(edge).or_insert(0) += 1;
            }
        }
        counts
    }
}

impl MeshProvider for TriangleMesh {
    fn boundary_edges(&self) -> BTreeSet<MeshEdge> {
        self.edge_triangle_counts()
            .into_iter()
            .filter(|&(_, count)| count == 1)
            .map(|(edge, _)| edge)
            .collect()
    }

    fn vertex_position(&self, index: u32) -> Option<Point3> {
        self.vertices.get(index as usize).copied()
    }

    fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    fn bounds(&self) -> Option<Aabb> {
        Aabb::from_points(&self.vertices)
    }
}
