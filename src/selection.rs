use crate::store::{Endpoint, PolylineId, PolylineStore};

/// A specific end of a specific polyline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EndpointRef {
    pub polyline: PolylineId,
    pub end: Endpoint,
}

impl EndpointRef {
    /// Refers to one end of a polyline.
    #[must_use]
    pub fn new(polyline: PolylineId, end: Endpoint) -> Self {
        Self { polyline, end }
    }
}

/// Currently selected polyline and topology endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionState {
    polyline: Option<PolylineId>,
    endpoint: Option<EndpointRef>,
}

impl SelectionState {
    /// An empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Selected polyline, if any.
    #[must_use]
    pub fn polyline(&self) -> Option<PolylineId> {
        self.polyline
    }

    /// Selected topology endpoint, if any.
    #[must_use]
    pub fn endpoint(&self) -> Option<EndpointRef> {
        self.endpoint
    }

    /// Whether `id` is the selected polyline.
    #[must_use]
    pub fn is_selected(&self, id: PolylineId) -> bool {
        self.polyline == Some(id)
    }

    /// Selects a polyline, replacing any previous one.
    pub fn select(&mut self, id: PolylineId) {
        self.polyline = Some(id);
    }

    /// Clears the polyline selection.
    pub fn deselect(&mut self) {
        self.polyline = None;
    }

    /// Selects a topology endpoint for relabeling.
    pub fn select_endpoint(&mut self, endpoint: EndpointRef) {
        self.endpoint = Some(endpoint);
    }

    /// Clears the endpoint selection.
    pub fn deselect_endpoint(&mut self) {
        self.endpoint = None;
    }

    /// Clears both selections.
    pub fn clear(&mut self) {
        self.polyline = None;
        self.endpoint = None;
    }

    /// Drops any reference to a polyline no longer in the store.
    ///
    /// Returns `true` if something was cleared.
    pub fn reconcile(&mut self, store: &PolylineStore) -> bool {
        let mut cleared = false;
        if self.polyline.is_some_and(|id| !store.contains(id)) {
            tracing::warn!("Selected polyline no longer exists, clearing selection");
            self.polyline = None;
            cleared = true;
        }
        if self.endpoint.is_some_and(|e| !store.contains(e.polyline)) {
            tracing::warn!("Selected endpoint no longer exists, clearing selection");
            self.endpoint = None;
            cleared = true;
        }
        cleared
    }
}
