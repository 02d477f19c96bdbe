use serde::{Deserialize, Serialize};

use crate::math::Point3;

slotmap::new_key_type! {
    /// Unique identifier for a polyline in the polyline store.
    pub struct PolylineId;
}

/// Minimum number of points a finished polyline must keep.
pub const MIN_POINTS: usize = 2;

/// One end of a polyline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Endpoint {
    Start,
    End,
}

impl Endpoint {
    /// Slot of this endpoint in a `[start, end]` pair.
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::Start => 0,
            Self::End => 1,
        }
    }
}

/// An ordered fracture trace.
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    points: Vec<Point3>,
}

impl Polyline {
    /// Wraps an ordered point sequence.
    #[must_use]
    pub fn new(points: Vec<Point3>) -> Self {
        Self { points }
    }

    /// The ordered control points.
    #[must_use]
    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    pub(crate) fn points_mut(&mut self) -> &mut Vec<Point3> {
        &mut self.points
    }

    /// Number of control points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the polyline has no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of segments, zero below two points.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    /// Iterates over consecutive point pairs.
    pub fn segments(&self) -> impl Iterator<Item = (&Point3, &Point3)> {
        self.points.windows(2).map(|w| (&w[0], &w[1]))
    }

    /// The start point.
    #[must_use]
    pub fn first(&self) -> Option<&Point3> {
        self.points.first()
    }

    /// The end point.
    #[must_use]
    pub fn last(&self) -> Option<&Point3> {
        self.points.last()
    }

    /// The point at the given endpoint.
    #[must_use]
    pub fn endpoint(&self, end: Endpoint) -> Option<&Point3> {
        match end {
            Endpoint::Start => self.first(),
            Endpoint::End => self.last(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn segments_of_open_polyline() {
        let pl = Polyline::new(vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(3.0, 4.0, 0.0),
            Point3::new(3.0, 4.0, 2.0),
        ]);
        assert_eq!(pl.segment_count(), 2);
        assert_eq!(pl.segments().count(), 2);
        let (a, b) = pl.segments().nth(1).unwrap();
        assert_eq!((a.z, b.z), (0.0, 2.0));
    }

    #[test]
    fn single_point_has_no_segments() {
        let pl = Polyline::new(vec![Point3::new(1.0, 1.0, 1.0)]);
        assert_eq!(pl.segment_count(), 0);
        assert_eq!(pl.endpoint(Endpoint::Start), pl.endpoint(Endpoint::End));
        assert!(Polyline::new(Vec::new()).first().is_none());
    }
}
