use crate::error::{GuardError, Result};
use crate::math::Point3;
use crate::selection::SelectionState;
use crate::store::{Endpoint, IndexRemap, PolylineId, PolylineStore};
use crate::topology::TopologyMap;

/// An endpoint of another polyline that a pick landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoinCandidate {
    pub polyline: PolylineId,
    pub end: Endpoint,
}

/// Looks for another polyline endpoint close to a picked point.
pub struct FindJoinCandidate {
    exclude: PolylineId,
    point: Point3,
    threshold: f64,
}

impl FindJoinCandidate {
    /// Creates a new `FindJoinCandidate` query.
    #[must_use]
    pub fn new(exclude: PolylineId, point: Point3, threshold: f64) -> Self {
        Self {
            exclude,
            point,
            threshold,
        }
    }

    /// Returns the first endpoint within the threshold.
    ///
    /// Polylines are scanned in store order and the start is tested before
    /// the end, so an earlier match wins even when a later one is nearer.
    #[must_use]
    pub fn execute(&self, store: &PolylineStore) -> Option<JoinCandidate> {
        for (id, polyline) in store.iter() {
            if id == self.exclude || polyline.len() < 2 {
                continue;
            }
            for end in [Endpoint::Start, Endpoint::End] {
                let Some(p) = polyline.endpoint(end) else {
                    continue;
                };
                if (self.point - p).norm() < self.threshold {
                    return Some(JoinCandidate { polyline: id, end });
                }
            }
        }
        None
    }
}

/// Result of a successful join.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinOutcome {
    /// The polyline that now holds the merged points.
    pub merged: PolylineId,
    /// The polyline that was absorbed and removed.
    pub removed: PolylineId,
    /// Store position changes caused by the removal.
    pub remap: IndexRemap,
    /// Point count of the merged polyline.
    pub len: usize,
}

/// Joins the selected polyline with another polyline's endpoint.
pub struct Join {
    source: PolylineId,
    target: JoinCandidate,
    click: Point3,
}

impl Join {
    /// Creates a new `Join` operation.
    #[must_use]
    pub fn new(source: PolylineId, target: JoinCandidate, click: Point3) -> Self {
        Self {
            source,
            target,
            click,
        }
    }

    /// Merges the target into the source and removes the target.
    ///
    /// The source keeps its id. Selection and topology records are brought
    /// in line with the store afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`GuardError::SelfJoin`] when source and target are the same
    /// polyline, or a store error if either polyline does not exist.
    pub fn execute(
        &self,
        store: &mut PolylineStore,
        topology: &mut TopologyMap,
        selection: &mut SelectionState,
    ) -> Result<JoinOutcome> {
        if self.source == self.target.polyline {
            return Err(GuardError::SelfJoin.into());
        }
        let source = store.get(self.source)?.points();
        let target = store.get(self.target.polyline)?.points();

        let source_end = match (source.first(), source.last()) {
            (Some(first), Some(last))
                if (self.click - first).norm() < (self.click - last).norm() =>
            {
                Endpoint::Start
            }
            _ => Endpoint::End,
        };
        let merged = merge_points(source, source_end, target, self.target.end);
        let len = merged.len();

        tracing::debug!(
            "Joining {:?} ({} points, {:?}) with {:?} ({} points, {:?})",
            self.source,
            source.len(),
            source_end,
            self.target.polyline,
            target.len(),
            self.target.end
        );

        store.replace_points(self.source, merged)?;
        let (_, remap) = store.remove(self.target.polyline)?;
        topology.remove(self.target.polyline);
        topology.sync(store);
        selection.reconcile(store);

        tracing::info!("Joined polylines into {} points", len);
        Ok(JoinOutcome {
            merged: self.source,
            removed: self.target.polyline,
            remap,
            len,
        })
    }
}

/// Concatenates two polylines that meet at the given ends.
///
/// The shared coordinate (the target's matched endpoint) appears once, so the
/// result has `source.len() + target.len() - 1` points.
#[must_use]
pub fn merge_points(
    source: &[Point3],
    source_end: Endpoint,
    target: &[Point3],
    target_end: Endpoint,
) -> Vec<Point3> {
    let mut merged = Vec::with_capacity((source.len() + target.len()).saturating_sub(1));
    match (source_end, target_end) {
        (Endpoint::Start, Endpoint::Start) => {
            merged.extend(source.iter().rev());
            merged.extend(target.iter().skip(1));
        }
        (Endpoint::Start, Endpoint::End) => {
            merged.extend(target);
            merged.extend(source.iter().skip(1));
        }
        (Endpoint::End, Endpoint::Start) => {
            merged.extend(source);
            merged.extend(target.iter().skip(1));
        }
        (Endpoint::End, Endpoint::End) => {
            merged.extend(source);
            merged.extend(target.iter().rev().skip(1));
        }
    }
    merged
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::topology::{Termination, TopologyRecord};

    fn p(x: f64, y: f64) -> Point3 {
        Point3::new(x, y, 0.0)
    }

    #[test]
    fn join_shared_point_scenario() {
        let mut store = PolylineStore::new();
        let a = store.append(vec![p(0.0, 0.0), p(1.0, 0.0)]).unwrap();
        let b = store.append(vec![p(1.0, 0.0), p(2.0, 0.0)]).unwrap();
        let mut topo = TopologyMap::new();
        let mut sel = SelectionState::new();
        sel.select(a);

        let candidate = FindJoinCandidate::new(a, p(1.0, 0.0), 0.01)
            .execute(&store)
            .unwrap();
        assert_eq!(candidate, JoinCandidate { polyline: b, end: Endpoint::Start });

        let out = Join::new(a, candidate, p(1.0, 0.0))
            .execute(&mut store, &mut topo, &mut sel)
            .unwrap();
        assert_eq!(out.len, 3);
        assert_eq!(store.len(), 1);
        assert_eq!(
            store.get(a).unwrap().points(),
            &[p(0.0, 0.0), p(1.0, 0.0), p(2.0, 0.0)]
        );
        assert_eq!(sel.polyline(), Some(a));
    }

    #[test]
    fn merge_all_four_orientations() {
        // Source runs 0→2 along x, target is a 3-point trace.
        let src = [p(0.0, 0.0), p(1.0, 0.0), p(2.0, 0.0)];

        let tgt = [p(0.0, 0.0), p(0.0, 1.0), p(0.0, 2.0)];
        assert_eq!(
            merge_points(&src, Endpoint::Start, &tgt, Endpoint::Start),
            vec![p(2.0, 0.0), p(1.0, 0.0), p(0.0, 0.0), p(0.0, 1.0), p(0.0, 2.0)]
        );

        let tgt = [p(0.0, 2.0), p(0.0, 1.0), p(0.0, 0.0)];
        assert_eq!(
            merge_points(&src, Endpoint::Start, &tgt, Endpoint::End),
            vec![p(0.0, 2.0), p(0.0, 1.0), p(0.0, 0.0), p(1.0, 0.0), p(2.0, 0.0)]
        );

        let tgt = [p(2.0, 0.0), p(3.0, 0.0), p(4.0, 0.0)];
        assert_eq!(
            merge_points(&src, Endpoint::End, &tgt, Endpoint::Start),
            vec![p(0.0, 0.0), p(1.0, 0.0), p(2.0, 0.0), p(3.0, 0.0), p(4.0, 0.0)]
        );

        let tgt = [p(4.0, 0.0), p(3.0, 0.0), p(2.0, 0.0)];
        assert_eq!(
            merge_points(&src, Endpoint::End, &tgt, Endpoint::End),
            vec![p(0.0, 0.0), p(1.0, 0.0), p(2.0, 0.0), p(3.0, 0.0), p(4.0, 0.0)]
        );
    }

    #[test]
    fn merged_length_is_sum_minus_one() {
        let src: Vec<Point3> = (0..5).map(|i| p(f64::from(i), 0.0)).collect();
        let tgt: Vec<Point3> = (0..4).map(|i| p(4.0, f64::from(i))).collect();
        for se in [Endpoint::Start, Endpoint::End] {
            for te in [Endpoint::Start, Endpoint::End] {
                assert_eq!(merge_points(&src, se, &tgt, te).len(), src.len() + tgt.len() - 1);
            }
        }
    }

    #[test]
    fn first_match_wins_over_nearest() {
        // Regression: the scan returns the first endpoint within the
        // threshold, not the nearest one.
        let mut store = PolylineStore::new();
        let sel_id = store.append(vec![p(-5.0, 0.0), p(-4.0, 0.0)]).unwrap();
        let far = store.append(vec![p(0.0, 0.0), p(0.0, -3.0)]).unwrap();
        let _near = store.append(vec![p(0.05, 0.0), p(0.05, 3.0)]).unwrap();

        let candidate = FindJoinCandidate::new(sel_id, p(0.06, 0.0), 0.1)
            .execute(&store)
            .unwrap();
        assert_eq!(candidate.polyline, far);
        assert_eq!(candidate.end, Endpoint::Start);
    }

    #[test]
    fn start_checked_before_end() {
        let mut store = PolylineStore::new();
        let sel_id = store.append(vec![p(-5.0, 0.0), p(-4.0, 0.0)]).unwrap();
        // Closed-ish short trace: both ends near the pick.
        let other = store.append(vec![p(0.0, 0.0), p(0.5, 0.5), p(0.02, 0.0)]).unwrap();
        let candidate = FindJoinCandidate::new(sel_id, p(0.019, 0.0), 0.1)
            .execute(&store)
            .unwrap();
        assert_eq!(candidate, JoinCandidate { polyline: other, end: Endpoint::Start });
    }

    #[test]
    fn excluded_polyline_is_ignored() {
        let mut store = PolylineStore::new();
        let a = store.append(vec![p(0.0, 0.0), p(1.0, 0.0)]).unwrap();
        assert!(FindJoinCandidate::new(a, p(0.0, 0.0), 0.1)
            .execute(&store)
            .is_none());
    }

    #[test]
    fn join_drops_target_topology_record() {
        let mut store = PolylineStore::new();
        let a = store.append(vec![p(0.0, 0.0), p(1.0, 0.0)]).unwrap();
        let b = store.append(vec![p(3.0, 0.0), p(2.0, 0.0)]).unwrap();
        let c = store.append(vec![p(9.0, 0.0), p(9.0, 1.0)]).unwrap();
        let mut topo = TopologyMap::new();
        topo.manual_init(&store);
        topo.insert(
            c,
            TopologyRecord {
                terminations: [Termination::Abutting, Termination::Blind],
                intersecting: [b].into_iter().collect(),
            },
        );
        let mut sel = SelectionState::new();
        sel.select(a);

        // Source end is nearer the click; target matched at its end.
        let out = Join::new(a, JoinCandidate { polyline: b, end: Endpoint::End }, p(1.1, 0.0))
            .execute(&mut store, &mut topo, &mut sel)
            .unwrap();
        assert_eq!(out.remap.apply(2), Some(1));
        assert_eq!(
            store.get(a).unwrap().points(),
            &[p(0.0, 0.0), p(1.0, 0.0), p(3.0, 0.0)]
        );
        assert_eq!(topo.len(), store.len());
        assert!(topo.get(b).is_none());
        assert!(topo.get(c).unwrap().intersecting.is_empty());
    }

    #[test]
    fn self_join_is_refused() {
        let mut store = PolylineStore::new();
        let a = store.append(vec![p(0.0, 0.0), p(1.0, 0.0)]).unwrap();
        let mut topo = TopologyMap::new();
        let mut sel = SelectionState::new();
        let res = Join::new(a, JoinCandidate { polyline: a, end: Endpoint::Start }, p(0.0, 0.0))
            .execute(&mut store, &mut topo, &mut sel);
        assert!(res.is_err());
        assert_eq!(store.get(a).unwrap().len(), 2);
    }
}
