use crate::error::{GuardError, Result};
use crate::math::distance_3d::nearest_point;
use crate::math::Point3;
use crate::store::{PolylineId, PolylineStore, MIN_POINTS};

/// Deletes the control point of a polyline nearest to a picked point.
pub struct DeleteNearestControlPoint {
    polyline: PolylineId,
    point: Point3,
    threshold: f64,
}

impl DeleteNearestControlPoint {
    /// Creates a new `DeleteNearestControlPoint` operation.
    #[must_use]
    pub fn new(polyline: PolylineId, point: Point3, threshold: f64) -> Self {
        Self {
            polyline,
            point,
            threshold,
        }
    }

    /// Executes the deletion, returning the index of the removed vertex.
    ///
    /// # Errors
    ///
    /// - [`GuardError::NoControlPointNearby`] if no vertex lies strictly within
    ///   the threshold.
    /// - [`GuardError::RetainedLength`] if the polyline is already at two
    ///   points.
    /// - A store error if the polyline does not exist.
    ///
    /// The polyline is left unchanged on error.
    pub fn execute(&self, store: &mut PolylineStore) -> Result<usize> {
        let polyline = store.get_mut(self.polyline)?;
        let (index, distance) = nearest_point(&self.point, polyline.points()).ok_or(
            GuardError::NoControlPointNearby {
                distance: f64::INFINITY,
                threshold: self.threshold,
            },
        )?;

        tracing::debug!(
            "Closest control point: {}, distance: {:.6}, threshold: {:.6}",
            index,
            distance,
            self.threshold
        );

        if distance >= self.threshold {
            return Err(GuardError::NoControlPointNearby {
                distance,
                threshold: self.threshold,
            }
            .into());
        }
        if polyline.len() <= MIN_POINTS {
            return Err(GuardError::RetainedLength {
                len: polyline.len(),
            }
            .into());
        }

        polyline.points_mut().remove(index);
        Ok(index)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::TraceMapError;

    fn three_point() -> (PolylineStore, PolylineId) {
        let mut store = PolylineStore::new();
        let id = store
            .append(vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(2.0, 0.0, 0.0),
            ])
            .unwrap();
        (store, id)
    }

    #[test]
    fn delete_middle_then_refuse_at_two() {
        let (mut store, id) = three_point();
        let removed = DeleteNearestControlPoint::new(id, Point3::new(1.0, 0.01, 0.0), 0.1)
            .execute(&mut store)
            .unwrap();
        assert_eq!(removed, 1);
        assert_eq!(
            store.get(id).unwrap().points(),
            &[Point3::new(0.0, 0.0, 0.0), Point3::new(2.0, 0.0, 0.0)]
        );

        let before = store.get(id).unwrap().clone();
        let err = DeleteNearestControlPoint::new(id, Point3::new(2.0, 0.0, 0.0), 0.1)
            .execute(&mut store)
            .unwrap_err();
        assert!(matches!(
            err,
            TraceMapError::Guard(GuardError::RetainedLength { len: 2 })
        ));
        assert_eq!(store.get(id).unwrap(), &before);
    }

    #[test]
    fn two_point_polyline_always_refuses() {
        let mut store = PolylineStore::new();
        let id = store
            .append(vec![Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0)])
            .unwrap();
        for probe in [Point3::new(0.0, 0.0, 0.0), Point3::new(0.5, 3.0, 0.0)] {
            assert!(DeleteNearestControlPoint::new(id, probe, 0.1)
                .execute(&mut store)
                .is_err());
            assert_eq!(store.get(id).unwrap().len(), 2);
        }
    }

    #[test]
    fn far_pick_is_not_a_deletion() {
        let (mut store, id) = three_point();
        let err = DeleteNearestControlPoint::new(id, Point3::new(1.0, 0.5, 0.0), 0.1)
            .execute(&mut store)
            .unwrap_err();
        assert!(matches!(
            err,
            TraceMapError::Guard(GuardError::NoControlPointNearby { .. })
        ));
        assert_eq!(store.get(id).unwrap().len(), 3);
    }
}
