mod termination;

pub use termination::Termination;

use std::collections::BTreeSet;

use crate::error::StoreError;
use crate::store::{Endpoint, PolylineId, PolylineStore};
use slotmap::SecondaryMap;

/// Termination labels and intersecting traces of one polyline.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TopologyRecord {
    /// `[start, end]` labels.
    pub terminations: [Termination; 2],
    /// Other polylines found within τ of either endpoint.
    pub intersecting: BTreeSet<PolylineId>,
}

impl TopologyRecord {
    /// Label of one endpoint.
    #[must_use]
    pub fn label(&self, end: Endpoint) -> Termination {
        self.terminations[end.index()]
    }
}

/// Topology records keyed by polyline id.
///
/// The map starts inactive and empty. Once a classification pass or manual
/// initialisation has run it becomes active, and [`sync`](Self::sync) keeps
/// exactly one record per stored polyline from then on.
#[derive(Debug, Default, Clone)]
pub struct TopologyMap {
    records: SecondaryMap<PolylineId, TopologyRecord>,
    active: bool,
}

impl TopologyMap {
    /// Creates a new, inactive map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether any classification has been run.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the map holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record for a polyline, if one exists.
    #[must_use]
    pub fn get(&self, id: PolylineId) -> Option<&TopologyRecord> {
        self.records.get(id)
    }

    /// Stores a record and activates the map.
    pub fn insert(&mut self, id: PolylineId, record: TopologyRecord) {
        self.active = true;
        self.records.insert(id, record);
    }

    /// Gives every polyline without a record a `[Blind, Blind]` record.
    ///
    /// Existing records are left untouched.
    pub fn manual_init(&mut self, store: &PolylineStore) {
        self.active = true;
        for &id in store.ids() {
            if !self.records.contains_key(id) {
                self.records.insert(id, TopologyRecord::default());
            }
        }
    }

    /// Overrides one endpoint label.
    ///
    /// # Errors
    ///
    /// Returns an error if the polyline has no record.
    pub fn set_label(
        &mut self,
        id: PolylineId,
        end: Endpoint,
        label: Termination,
    ) -> Result<(), StoreError> {
        let record = self
            .records
            .get_mut(id)
            .ok_or(StoreError::PolylineNotFound)?;
        record.terminations[end.index()] = label;
        Ok(())
    }

    /// Drops the record of a removed polyline and every reference to it.
    pub fn remove(&mut self, id: PolylineId) -> Option<TopologyRecord> {
        let removed = self.records.remove(id);
        for (_, record) in &mut self.records {
            record.intersecting.remove(&id);
        }
        removed
    }

    /// Brings the map in line with the store after a mutation.
    ///
    /// Records of polylines no longer in the store are dropped along with
    /// any reference to them; when active, new polylines get a default record.
    pub fn sync(&mut self, store: &PolylineStore) {
        let stale: Vec<PolylineId> = self
            .records
            .keys()
            .filter(|&id| !store.contains(id))
            .collect();
        for id in stale {
            tracing::debug!("Dropping topology record of removed polyline {:?}", id);
            self.remove(id);
        }
        for (_, record) in &mut self.records {
            record.intersecting.retain(|&other| store.contains(other));
        }
        if self.active {
            self.manual_init(store);
        }
    }

    /// Removes every record and deactivates the map.
    pub fn clear(&mut self) {
        self.records.clear();
        self.active = false;
    }

    /// Iterates over `(id, record)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (PolylineId, &TopologyRecord)> {
        self.records.iter()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point3;

    fn store_with(n: usize) -> (PolylineStore, Vec<PolylineId>) {
        let mut store = PolylineStore::new();
        let ids = (0..n)
            .map(|i| {
                #[allow(clippy::cast_precision_loss)]
                let x = i as f64;
                store
                    .append(vec![Point3::new(x, 0.0, 0.0), Point3::new(x, 1.0, 0.0)])
                    .unwrap()
            })
            .collect();
        (store, ids)
    }

    #[test]
    fn starts_inactive() {
        let (store, _) = store_with(2);
        let mut map = TopologyMap::new();
        map.sync(&store);
        assert!(!map.is_active());
        assert!(map.is_empty());
    }

    #[test]
    fn manual_init_keeps_existing_records() {
        let (store, ids) = store_with(2);
        let mut map = TopologyMap::new();
        map.insert(
            ids[0],
            TopologyRecord {
                terminations: [Termination::Censored, Termination::Abutting],
                intersecting: BTreeSet::from([ids[1]]),
            },
        );
        map.manual_init(&store);
        assert_eq!(map.len(), 2);
        assert_eq!(map.get(ids[0]).unwrap().label(Endpoint::Start), Termination::Censored);
        assert_eq!(map.get(ids[1]).unwrap(), &TopologyRecord::default());
    }

    #[test]
    fn set_label_on_missing_record_fails() {
        let (_, ids) = store_with(1);
        let mut map = TopologyMap::new();
        assert_eq!(
            map.set_label(ids[0], Endpoint::End, Termination::Crossing),
            Err(StoreError::PolylineNotFound)
        );
    }

    #[test]
    fn sync_tracks_store_once_active() {
        let (mut store, ids) = store_with(3);
        let mut map = TopologyMap::new();
        map.manual_init(&store);
        map.set_label(ids[2], Endpoint::End, Termination::Crossing)
            .unwrap();
        map.insert(
            ids[0],
            TopologyRecord {
                terminations: [Termination::Abutting, Termination::Blind],
                intersecting: BTreeSet::from([ids[1]]),
            },
        );

        store.remove(ids[1]).unwrap();
        let added = store
            .append(vec![Point3::origin(), Point3::new(0.0, 0.0, 1.0)])
            .unwrap();
        map.sync(&store);

        assert_eq!(map.len(), store.len());
        assert!(map.get(ids[1]).is_none());
        assert!(map.get(ids[0]).unwrap().intersecting.is_empty());
        assert_eq!(map.get(ids[2]).unwrap().label(Endpoint::End), Termination::Crossing);
        assert_eq!(map.get(added).unwrap(), &TopologyRecord::default());
    }

    #[test]
    fn clear_deactivates() {
        let (store, _) = store_with(1);
        let mut map = TopologyMap::new();
        map.manual_init(&store);
        map.clear();
        assert!(!map.is_active());
        assert!(map.is_empty());
    }
}
