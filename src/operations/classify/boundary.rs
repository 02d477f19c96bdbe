use std::collections::BTreeSet;

use crate::math::Point3;
use crate::mesh::MeshProvider;

/// Collects the positions of mesh vertices that lie on a boundary edge.
pub struct BoundaryVertices<'a, M: MeshProvider + ?Sized> {
    mesh: &'a M,
}

impl<'a, M: MeshProvider + ?Sized> BoundaryVertices<'a, M> {
    /// Creates a new `BoundaryVertices` query.
    #[must_use]
    pub fn new(mesh: &'a M) -> Self {
        Self { mesh }
    }

    /// Executes the query.
    ///
    /// A closed surface yields an empty set, which disables the censored
    /// check during classification.
    #[must_use]
    pub fn execute(&self) -> Vec<Point3> {
        let edges = self.mesh.boundary_edges();
        let indices: BTreeSet<u32> = edges.iter().flat_map(|&(a, b)| [a, b]).collect();
        let vertices: Vec<Point3> = indices
            .iter()
            .filter_map(|&i| self.mesh.vertex_position(i))
            .collect();

        if vertices.is_empty() {
            tracing::warn!("Mesh has no boundary edges, censored terminations disabled");
        } else {
            tracing::info!(
                "Found {} boundary vertices from {} boundary edges",
                vertices.len(),
                edges.len()
            );
        }
        vertices
    }
}
