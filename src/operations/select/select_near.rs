use crate::math::distance_3d::point_to_polyline_dist;
use crate::math::Point3;
use crate::selection::SelectionState;
use crate::store::{PolylineId, PolylineStore};

/// What a selection click did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    /// The polyline became the selection, replacing any previous one.
    Selected {
        id: PolylineId,
        previous: Option<PolylineId>,
    },
    /// The selection was cleared.
    Deselected { previous: Option<PolylineId> },
}

/// Hit-tests a picked point against every polyline segment.
pub struct SelectNear {
    point: Point3,
    threshold: f64,
}

impl SelectNear {
    /// Creates a new `SelectNear` operation.
    #[must_use]
    pub fn new(point: Point3, threshold: f64) -> Self {
        Self { point, threshold }
    }

    /// Finds the polyline with the nearest segment.
    ///
    /// Ties resolve to the first polyline in store order.
    #[must_use]
    pub fn nearest(&self, store: &PolylineStore) -> Option<(PolylineId, f64)> {
        let mut best: Option<(PolylineId, f64)> = None;
        for (id, polyline) in store.iter() {
            let Some(d) = point_to_polyline_dist(&self.point, polyline.points()) else {
                continue;
            };
            if best.is_none_or(|(_, bd)| d < bd) {
                best = Some((id, d));
            }
        }
        best
    }

    /// Executes the selection click.
    ///
    /// A hit on the already-selected polyline toggles it off; a miss clears
    /// the selection.
    pub fn execute(&self, store: &PolylineStore, selection: &mut SelectionState) -> SelectOutcome {
        let previous = selection.polyline();
        let hit = self
            .nearest(store)
            .filter(|&(_, distance)| distance < self.threshold);

        tracing::debug!(
            "[select_near] nearest={:?}, threshold={:.6}",
            hit,
            self.threshold
        );

        match hit {
            Some((id, _)) if previous != Some(id) => {
                selection.select(id);
                SelectOutcome::Selected { id, previous }
            }
            _ => {
                selection.deselect();
                SelectOutcome::Deselected { previous }
            }
        }
    }
}
