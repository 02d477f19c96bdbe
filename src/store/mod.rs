mod polyline;

pub use polyline::{Endpoint, Polyline, PolylineId, MIN_POINTS};

use crate::error::{GuardError, StoreError};
use crate::math::Point3;
use slotmap::SlotMap;

/// Position changes produced by removing a polyline from the store.
///
/// Every surviving polyline below the removed position keeps its position;
/// every polyline above it moves down by one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexRemap {
    removed: usize,
    old_len: usize,
}

impl IndexRemap {
    /// Position the removed polyline occupied.
    #[must_use]
    pub fn removed(&self) -> usize {
        self.removed
    }

    /// New position of a polyline that sat at `old`, or `None` if `old` was
    /// the removed polyline or out of range.
    #[must_use]
    pub fn apply(&self, old: usize) -> Option<usize> {
        match old {
            o if o >= self.old_len || o == self.removed => None,
            o if o < self.removed => Some(o),
            o => Some(o - 1),
        }
    }
}

/// Arena that owns every finished polyline.
///
/// Polylines are referenced by generational [`PolylineId`]s, which stay valid
/// until the polyline itself is removed. Store order (the order polylines were
/// finished in) is tracked separately, so positions shift on removal while ids
/// never do.
#[derive(Debug, Default, Clone)]
pub struct PolylineStore {
    polylines: SlotMap<PolylineId, Polyline>,
    order: Vec<PolylineId>,
}

impl PolylineStore {
    /// Creates a new, empty polyline store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of polylines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the store holds no polylines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Appends a finished polyline and returns its id.
    ///
    /// # Errors
    ///
    /// Returns [`GuardError::TooFewPoints`] if `points` has fewer than
    /// [`MIN_POINTS`] entries.
    pub fn append(&mut self, points: Vec<Point3>) -> Result<PolylineId, GuardError> {
        if points.len() < MIN_POINTS {
            return Err(GuardError::TooFewPoints {
                len: points.len(),
                min: MIN_POINTS,
            });
        }
        let id = self.polylines.insert(Polyline::new(points));
        self.order.push(id);
        Ok(id)
    }

    /// Returns the polyline, or an error if the id is stale.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn get(&self, id: PolylineId) -> Result<&Polyline, StoreError> {
        self.polylines.get(id).ok_or(StoreError::PolylineNotFound)
    }

    pub(crate) fn get_mut(&mut self, id: PolylineId) -> Result<&mut Polyline, StoreError> {
        self.polylines
            .get_mut(id)
            .ok_or(StoreError::PolylineNotFound)
    }

    /// Whether `id` still refers to a polyline in the store.
    #[must_use]
    pub fn contains(&self, id: PolylineId) -> bool {
        self.polylines.contains_key(id)
    }

    /// Removes a polyline and compacts store positions.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn remove(&mut self, id: PolylineId) -> Result<(Polyline, IndexRemap), StoreError> {
        let removed = self.position(id).ok_or(StoreError::PolylineNotFound)?;
        let old_len = self.order.len();
        self.order.remove(removed);
        let polyline = self
            .polylines
            .remove(id)
            .ok_or(StoreError::PolylineNotFound)?;
        Ok((polyline, IndexRemap { removed, old_len }))
    }

    /// Replaces the points of an existing polyline.
    ///
    /// # Errors
    ///
    /// Returns [`GuardError::TooFewPoints`] for fewer than [`MIN_POINTS`]
    /// points, or [`StoreError::PolylineNotFound`] for a stale id.
    pub fn replace_points(&mut self, id: PolylineId, points: Vec<Point3>) -> crate::Result<()> {
        if points.len() < MIN_POINTS {
            return Err(GuardError::TooFewPoints {
                len: points.len(),
                min: MIN_POINTS,
            }
            .into());
        }
        *self.get_mut(id)?.points_mut() = points;
        Ok(())
    }

    /// Store position of `id`.
    #[must_use]
    pub fn position(&self, id: PolylineId) -> Option<usize> {
        self.order.iter().position(|&o| o == id)
    }

    /// Id of the polyline at store position `index`.
    #[must_use]
    pub fn id_at(&self, index: usize) -> Option<PolylineId> {
        self.order.get(index).copied()
    }

    /// Ids in store order.
    #[must_use]
    pub fn ids(&self) -> &[PolylineId] {
        &self.order
    }

    /// Iterates over polylines in store order.
    pub fn iter(&self) -> impl Iterator<Item = (PolylineId, &Polyline)> + '_ {
        self.order
            .iter()
            .filter_map(move |&id| self.polylines.get(id).map(|p| (id, p)))
    }

    /// Removes every polyline.
    pub fn clear(&mut self) {
        self.polylines.clear();
        self.order.clear();
    }
}
