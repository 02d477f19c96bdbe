use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::PersistError;
use crate::store::PolylineStore;
use crate::topology::{Termination, TopologyMap};

/// JSON summary written alongside the per-polyline files.
///
/// Polylines are identified by their 0-based store position at save time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub num_polylines: usize,
    pub polylines: Vec<SavedPolyline>,
    /// Present only once a classification has been run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topology: Option<BTreeMap<usize, SavedTopology>>,
}

/// One polyline's points and its store position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedPolyline {
    pub points: Vec<[f64; 3]>,
    pub id: usize,
}

/// Endpoint labels of one polyline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedTopology {
    pub terminations: [Termination; 2],
    /// Positions of intersecting polylines, ascending.
    pub intersecting_polylines: Vec<usize>,
}

impl Summary {
    /// Snapshots the store and topology records.
    #[must_use]
    pub fn from_state(store: &PolylineStore, topology: &TopologyMap) -> Self {
        let polylines = store
            .iter()
            .enumerate()
            .map(|(position, (_, polyline))| SavedPolyline {
                points: polyline.points().iter().map(|p| [p.x, p.y, p.z]).collect(),
                id: position,
            })
            .collect();

        let topology = topology.is_active().then(|| {
            store
                .iter()
                .enumerate()
                .filter_map(|(position, (id, _))| {
                    let record = topology.get(id)?;
                    let mut intersecting: Vec<usize> = record
                        .intersecting
                        .iter()
                        .filter_map(|&other| store.position(other))
                        .collect();
                    intersecting.sort_unstable();
                    Some((
                        position,
                        SavedTopology {
                            terminations: record.terminations,
                            intersecting_polylines: intersecting,
                        },
                    ))
                })
                .collect()
        });

        Self {
            num_polylines: store.len(),
            polylines,
            topology,
        }
    }

    /// Checks that the polyline count matches the listed polylines.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError::Malformed`] if the count disagrees with the
    /// polyline list.
    pub fn validate(&self) -> Result<(), PersistError> {
        if self.num_polylines != self.polylines.len() {
            return Err(PersistError::Malformed(format!(
                "num_polylines is {} but {} polylines are listed",
                self.num_polylines,
                self.polylines.len()
            )));
        }
        Ok(())
    }

    /// Drops topology entries and intersection references that point past
    /// the polyline list. Returns how many references were dropped.
    pub fn drop_dangling(&mut self) -> usize {
        let len = self.polylines.len();
        let Some(topology) = &mut self.topology else {
            return 0;
        };
        let mut dropped = 0;
        topology.retain(|&position, _| {
            let keep = position < len;
            if !keep {
                tracing::warn!("Dropping topology entry {} with no polyline", position);
                dropped += 1;
            }
            keep
        });
        for (position, record) in topology.iter_mut() {
            record.intersecting_polylines.retain(|&other| {
                let keep = other < len;
                if !keep {
                    tracing::warn!(
                        "Dropping reference from topology entry {} to missing polyline {}",
                        position,
                        other
                    );
                    dropped += 1;
                }
                keep
            });
        }
        dropped
    }
}
