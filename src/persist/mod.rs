//! Saving finished polylines to disk and reading summaries back.

mod summary;

pub use summary::{SavedPolyline, SavedTopology, Summary};

use std::path::{Path, PathBuf};

use crate::error::{GuardError, PersistError, Result};
use crate::store::{Polyline, PolylineStore};
use crate::topology::TopologyMap;

/// Directory created under the chosen save location.
pub const OUTPUT_DIR: &str = "polylines_output";

/// Summary file name inside [`OUTPUT_DIR`].
pub const SUMMARY_FILE: &str = "polylines_summary.json";

/// Where a save wrote its files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveReport {
    pub output_dir: PathBuf,
    pub summary: PathBuf,
    pub polylines: usize,
    pub with_topology: bool,
}

/// Writes every polyline as text and binary coordinates plus a JSON summary
/// into `dir/polylines_output/`.
///
/// Files are numbered from 1 in store order: `polyline_001.txt` holds one
/// `x y z` row per point, `polyline_001.dat` the raw native-endian `f64`s.
///
/// # Errors
///
/// Refuses an empty store with [`GuardError::EmptyStore`] before touching the
/// filesystem, otherwise returns any I/O or serialization error.
pub fn save(store: &PolylineStore, topology: &TopologyMap, dir: &Path) -> Result<SaveReport> {
    if store.is_empty() {
        return Err(GuardError::EmptyStore.into());
    }

    let output_dir = dir.join(OUTPUT_DIR);
    std::fs::create_dir_all(&output_dir).map_err(PersistError::from)?;

    for (position, (_, polyline)) in store.iter().enumerate() {
        let number = position + 1;
        let txt = output_dir.join(format!("polyline_{number:03}.txt"));
        std::fs::write(&txt, to_text(number, polyline)).map_err(PersistError::from)?;

        let dat = output_dir.join(format!("polyline_{number:03}.dat"));
        std::fs::write(&dat, to_binary(polyline)).map_err(PersistError::from)?;

        tracing::debug!("Saved polyline {}: {} and {}", number, txt.display(), dat.display());
    }

    let summary = Summary::from_state(store, topology);
    let with_topology = summary.topology.is_some();
    if with_topology {
        tracing::debug!("Including topology data in summary");
    }
    let summary_path = output_dir.join(SUMMARY_FILE);
    let json = serde_json::to_string_pretty(&summary).map_err(PersistError::from)?;
    std::fs::write(&summary_path, json).map_err(PersistError::from)?;

    tracing::info!(
        "Saved {} polylines to {}",
        store.len(),
        output_dir.display()
    );
    Ok(SaveReport {
        output_dir,
        summary: summary_path,
        polylines: store.len(),
        with_topology,
    })
}

/// Reads and checks a summary written by [`save`].
///
/// Topology references to polylines missing from the file are dropped with a
/// warning; the rest of the summary still loads.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not a summary, or its
/// polyline count disagrees with the polyline list.
pub fn load_summary(path: &Path) -> Result<Summary> {
    let json = std::fs::read_to_string(path).map_err(PersistError::from)?;
    let mut summary: Summary = serde_json::from_str(&json).map_err(PersistError::from)?;
    summary.validate()?;
    summary.drop_dangling();
    tracing::info!(
        "Loaded summary with {} polylines from {}",
        summary.num_polylines,
        path.display()
    );
    Ok(summary)
}

fn to_text(number: usize, polyline: &Polyline) -> String {
    let mut text = format!("# Polyline {number} - X Y Z coordinates\n");
    for p in polyline.points() {
        text.push_str(&format!("{:.6} {:.6} {:.6}\n", p.x, p.y, p.z));
    }
    text
}

fn to_binary(polyline: &Polyline) -> Vec<u8> {
    polyline
        .points()
        .iter()
        .flat_map(|p| [p.x, p.y, p.z])
        .flat_map(f64::to_ne_bytes)
        .collect()
}
