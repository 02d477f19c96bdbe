use crate::error::Result;
use crate::selection::SelectionState;
use crate::store::{IndexRemap, PolylineId, PolylineStore};
use crate::topology::TopologyMap;

/// Removes a polyline along with its topology record and any selection of it.
pub struct RemovePolyline {
    polyline: PolylineId,
}

impl RemovePolyline {
    /// Creates a new `RemovePolyline` operation.
    #[must_use]
    pub fn new(polyline: PolylineId) -> Self {
        Self { polyline }
    }

    /// Executes the removal.
    ///
    /// # Errors
    ///
    /// Returns an error if the polyline does not exist.
    pub fn execute(
        &self,
        store: &mut PolylineStore,
        topology: &mut TopologyMap,
        selection: &mut SelectionState,
    ) -> Result<IndexRemap> {
        let (_, remap) = store.remove(self.polyline)?;
        topology.remove(self.polyline);
        topology.sync(store);
        selection.reconcile(store);
        tracing::info!("Removed polyline {}", remap.removed() + 1);
        Ok(remap)
    }
}
