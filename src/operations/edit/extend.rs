use crate::error::Result;
use crate::math::Point3;
use crate::store::{Endpoint, PolylineId, PolylineStore};

/// Adds a point to whichever end of a polyline is nearer.
pub struct Extend {
    polyline: PolylineId,
    point: Point3,
}

impl Extend {
    /// Creates a new `Extend` operation.
    #[must_use]
    pub fn new(polyline: PolylineId, point: Point3) -> Self {
        Self { polyline, point }
    }

    /// Executes the extension, returning the end that grew.
    ///
    /// The point is prepended only when strictly closer to the first point;
    /// ties append.
    ///
    /// # Errors
    ///
    /// Returns an error if the polyline does not exist.
    pub fn execute(&self, store: &mut PolylineStore) -> Result<Endpoint> {
        let points = store.get_mut(self.polyline)?.points_mut();
        let end = match (points.first(), points.last()) {
            (Some(first), Some(last))
                if (self.point - first).norm() < (self.point - last).norm() =>
            {
                Endpoint::Start
            }
            _ => Endpoint::End,
        };
        match end {
            Endpoint::Start => points.insert(0, self.point),
            Endpoint::End => points.push(self.point),
        }
        Ok(end)
    }
}
