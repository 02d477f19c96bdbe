use crate::config::MapperConfig;
use crate::error::Result;
use crate::mesh::MeshProvider;
use crate::store::{Endpoint, PolylineStore};
use crate::topology::{TopologyMap, TopologyRecord};

use super::{BoundaryVertices, ClassifyEndpoint, ComputeTau};

/// Summary of one automated detection pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectionReport {
    /// Threshold used for this pass.
    pub tau: f64,
    /// Number of mesh boundary vertices found.
    pub boundary_vertices: usize,
    /// Number of polylines that received a computed record.
    pub classified: usize,
    /// Number of polylines left at the default record.
    pub skipped: usize,
}

/// Classifies both endpoints of every polyline in one pass.
///
/// Runs in O(P² × S²) for P polylines of S segments on average, to
/// completion, with no cancellation.
pub struct AutomatedDetection<'a, M: MeshProvider + ?Sized> {
    mesh: &'a M,
    tau: ComputeTau,
}

impl<'a, M: MeshProvider + ?Sized> AutomatedDetection<'a, M> {
    /// Creates a new `AutomatedDetection` operation.
    #[must_use]
    pub fn new(mesh: &'a M, config: &MapperConfig) -> Self {
        Self {
            mesh,
            tau: ComputeTau::from_config(config),
        }
    }

    /// Executes the pass, replacing every record in `topology`.
    ///
    /// # Errors
    ///
    /// Returns an error if a polyline lookup fails.
    pub fn execute(
        &self,
        store: &PolylineStore,
        topology: &mut TopologyMap,
    ) -> Result<DetectionReport> {
        let boundary = BoundaryVertices::new(self.mesh).execute();
        let tau = self.tau.execute(store);
        tracing::info!("Using tau threshold: {:.6}", tau);

        topology.clear();
        let mut classified = 0;
        let mut skipped = 0;

        for (position, (id, polyline)) in store.iter().enumerate() {
            let mut record = TopologyRecord::default();
            if polyline.len() < 2 {
                tracing::warn!(
                    "Polyline {} has {} points, leaving it unclassified",
                    position + 1,
                    polyline.len()
                );
                topology.insert(id, record);
                skipped += 1;
                continue;
            }

            for end in [Endpoint::Start, Endpoint::End] {
                let Some(&point) = polyline.endpoint(end) else {
                    continue;
                };
                let result = ClassifyEndpoint::new(id, point, tau).execute(store, &boundary)?;
                record.terminations[end.index()] = result.label;
                record.intersecting.extend(result.intersecting);
            }

            tracing::debug!(
                "Polyline {}: [{}, {}], intersects {} others",
                position + 1,
                record.terminations[0].code(),
                record.terminations[1].code(),
                record.intersecting.len()
            );
            topology.insert(id, record);
            classified += 1;
        }

        // An empty store still counts as a run.
        topology.manual_init(store);

        tracing::info!("Automated topology detection complete");
        Ok(DetectionReport {
            tau,
            boundary_vertices: boundary.len(),
            classified,
            skipped,
        })
    }
}
