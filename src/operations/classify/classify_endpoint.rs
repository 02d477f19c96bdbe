use std::collections::BTreeSet;

use crate::error::Result;
use crate::math::distance_3d::{min_point_dist, point_to_segment_dist, segment_to_segment_dist_approx};
use crate::math::Point3;
use crate::store::{Polyline, PolylineId, PolylineStore};
use crate::topology::Termination;

/// Label and contributing neighbours of one classified endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub label: Termination,
    /// Other polylines that are crossing or abutting candidates.
    pub intersecting: BTreeSet<PolylineId>,
}

/// Classifies how one polyline endpoint terminates.
///
/// Rules, first match wins:
/// 1. within τ of a mesh boundary vertex → Censored;
/// 2. farther than τ from every other polyline → Blind;
/// 3. some segment pair with the other polyline within τ but the endpoint
///    itself not within τ of any segment → Crossing;
/// 4. the endpoint within τ of another polyline's segment → Abutting;
/// 5. otherwise Blind.
pub struct ClassifyEndpoint {
    owner: PolylineId,
    endpoint: Point3,
    tau: f64,
}

impl ClassifyEndpoint {
    /// Creates a new `ClassifyEndpoint` query.
    #[must_use]
    pub fn new(owner: PolylineId, endpoint: Point3, tau: f64) -> Self {
        Self {
            owner,
            endpoint,
            tau,
        }
    }

    /// Executes the classification against every other polyline in the store.
    ///
    /// An empty `boundary` skips the censored check.
    ///
    /// # Errors
    ///
    /// Returns an error if the owner polyline does not exist.
    pub fn execute(&self, store: &PolylineStore, boundary: &[Point3]) -> Result<Classification> {
        let owner = store.get(self.owner)?;
        let others = store.iter().filter(|&(id, _)| id != self.owner);
        Ok(self.classify(owner, others, boundary))
    }

    fn classify<'a>(
        &self,
        owner: &Polyline,
        others: impl Iterator<Item = (PolylineId, &'a Polyline)>,
        boundary: &[Point3],
    ) -> Classification {
        let mut intersecting = BTreeSet::new();

        if min_point_dist(&self.endpoint, boundary).is_some_and(|d| d < self.tau) {
            return Classification {
                label: Termination::Censored,
                intersecting,
            };
        }

        let mut min_other = f64::INFINITY;
        let mut crossing = false;
        let mut abutting = false;

        for (id, other) in others {
            for (a, b) in other.segments() {
                let d = point_to_segment_dist(&self.endpoint, a, b);
                min_other = min_other.min(d);
                if d < self.tau {
                    abutting = true;
                    intersecting.insert(id);
                }
            }
            if polylines_within(owner, other, self.tau) {
                crossing = true;
                intersecting.insert(id);
            }
        }

        let label = if min_other > self.tau {
            Termination::Blind
        } else if crossing && !abutting {
            Termination::Crossing
        } else if abutting {
            Termination::Abutting
        } else {
            Termination::Blind
        };

        Classification {
            label,
            intersecting,
        }
    }
}

/// Whether any segment of `a` comes within `tau` of any segment of `b`,
/// using the four-point segment distance approximation.
fn polylines_within(a: &Polyline, b: &Polyline, tau: f64) -> bool {
    a.segments().any(|(p1, p2)| {
        b.segments()
            .any(|(p3, p4)| segment_to_segment_dist_approx(p1, p2, p3, p4) < tau)
    })
}
