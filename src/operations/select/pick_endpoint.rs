use crate::math::Point3;
use crate::selection::{EndpointRef, SelectionState};
use crate::store::{Endpoint, PolylineStore};

/// What an endpoint pick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointPickOutcome {
    Selected(EndpointRef),
    Deselected,
}

/// Picks the polyline endpoint nearest to a point, for topology labeling.
pub struct PickEndpoint {
    point: Point3,
    threshold: f64,
}

impl PickEndpoint {
    /// Creates a new `PickEndpoint` operation.
    #[must_use]
    pub fn new(point: Point3, threshold: f64) -> Self {
        Self { point, threshold }
    }

    /// Nearest endpoint over all polylines, checking starts before ends.
    #[must_use]
    pub fn nearest(&self, store: &PolylineStore) -> Option<(EndpointRef, f64)> {
        let mut best: Option<(EndpointRef, f64)> = None;
        for (id, polyline) in store.iter() {
            for end in [Endpoint::Start, Endpoint::End] {
                let Some(p) = polyline.endpoint(end) else {
                    continue;
                };
                let d = (self.point - p).norm();
                if best.is_none_or(|(_, bd)| d < bd) {
                    best = Some((EndpointRef::new(id, end), d));
                }
            }
        }
        best
    }

    /// Selects the nearest endpoint within the threshold, or toggles it off
    /// if it is already selected. A miss clears the endpoint selection.
    pub fn execute(
        &self,
        store: &PolylineStore,
        selection: &mut SelectionState,
    ) -> EndpointPickOutcome {
        let hit = self
            .nearest(store)
            .filter(|&(_, distance)| distance < self.threshold);

        tracing::debug!("[pick_endpoint] nearest={:?}", hit);

        match hit {
            Some((endpoint, _)) if selection.endpoint() != Some(endpoint) => {
                selection.select_endpoint(endpoint);
                EndpointPickOutcome::Selected(endpoint)
            }
            _ => {
                selection.deselect_endpoint();
                EndpointPickOutcome::Deselected
            }
        }
    }
}
