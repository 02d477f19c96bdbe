//! Mode state machine driving the editing engine.
//!
//! A [`Session`] owns every piece of mutable state (store, current polyline,
//! selection, topology records) and turns each [`Event`] into the list of
//! [`Command`]s the viewer must apply. Events are processed to completion one
//! at a time.

mod command;
mod pick;

pub use command::{dispatch, Command, Viewer};

use std::fmt;
use std::path::Path;
use std::time::Instant;

use crate::config::{MapperConfig, Thresholds};
use crate::error::{GuardError, Result, TraceMapError};
use crate::math::Point3;
use crate::mesh::MeshProvider;
use crate::operations::classify::{AutomatedDetection, DetectionReport};
use crate::operations::edit::RemovePolyline;
use crate::operations::select::DoubleClickDetector;
use crate::persist::{self, SaveReport, Summary};
use crate::selection::SelectionState;
use crate::store::{Endpoint, PolylineId, PolylineStore};
use crate::topology::{Termination, TopologyMap, TopologyRecord};

/// Interaction mode. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    #[default]
    Select,
    Digitize,
    Edit,
    Topology,
}

impl Mode {
    /// Display name used in log lines.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Mode::Select => "select",
            Mode::Digitize => "digitize",
            Mode::Edit => "edit",
            Mode::Topology => "topology",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How topology mode fills in termination labels on entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetectionMode {
    /// Classify every endpoint against the mesh and other traces.
    #[default]
    Automated,
    /// Give unlabeled polylines `[Blind, Blind]` and leave the rest.
    Manual,
}

/// One user input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    /// A click that hit the mesh surface.
    Pick { point: Point3, at: Instant },
    /// Space: Select ↔ Digitize, or back to Select from any other mode.
    ToggleDigitize,
    /// `m`: enter or leave Edit.
    ToggleEdit,
    /// `t`: enter or leave Topology.
    ToggleTopology(DetectionMode),
    /// Enter: finish the current polyline.
    Finish,
    /// Escape: discard the current polyline.
    Cancel,
    /// Delete: remove the selected polyline.
    DeleteSelected,
    /// `d`: clear the polyline selection.
    DeselectAll,
    /// `c`: remove everything.
    ClearAll,
    /// `1`–`4`: label the selected endpoint.
    SetLabel(Termination),
}

/// Editing session over one mesh.
pub struct Session<M: MeshProvider> {
    mesh: M,
    config: MapperConfig,
    thresholds: Thresholds,
    mode: Mode,
    store: PolylineStore,
    current: Vec<Point3>,
    selection: SelectionState,
    topology: TopologyMap,
    double_click: DoubleClickDetector,
    last_detection: Option<DetectionReport>,
}

impl<M: MeshProvider> Session<M> {
    /// Creates a session in Select mode with thresholds scaled to the mesh.
    #[must_use]
    pub fn new(mesh: M, config: MapperConfig) -> Self {
        let diagonal = mesh.diagonal();
        let thresholds = Thresholds::for_diagonal(&config, diagonal);
        tracing::debug!(
            "Session thresholds for diagonal {:.6}: {:?}",
            diagonal,
            thresholds
        );
        Self {
            mesh,
            config,
            thresholds,
            mode: Mode::Select,
            store: PolylineStore::new(),
            current: Vec::new(),
            selection: SelectionState::new(),
            topology: TopologyMap::new(),
            double_click: DoubleClickDetector::new(
                config.double_click_interval,
                thresholds.double_click,
            ),
            last_detection: None,
        }
    }

    /// Current interaction mode.
    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// The surface being mapped.
    #[must_use]
    pub fn mesh(&self) -> &M {
        &self.mesh
    }

    /// Configuration the session was built with.
    #[must_use]
    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    /// Pick thresholds scaled to the mesh.
    #[must_use]
    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Finished polylines.
    #[must_use]
    pub fn store(&self) -> &PolylineStore {
        &self.store
    }

    /// Points of the polyline being digitized.
    #[must_use]
    pub fn current(&self) -> &[Point3] {
        &self.current
    }

    /// Current polyline and endpoint selection.
    #[must_use]
    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// Endpoint labels and intersections.
    #[must_use]
    pub fn topology(&self) -> &TopologyMap {
        &self.topology
    }

    /// Report of the most recent automated detection pass.
    #[must_use]
    pub fn last_detection(&self) -> Option<&DetectionReport> {
        self.last_detection.as_ref()
    }

    /// Processes one event and returns the render commands it produced.
    ///
    /// Guard refusals are logged and yield no commands; state is unchanged.
    pub fn handle(&mut self, event: Event) -> Vec<Command> {
        match self.try_handle(event) {
            Ok(commands) => commands,
            Err(TraceMapError::Guard(refusal)) => {
                tracing::warn!("[{}] {}", self.mode, refusal);
                Vec::new()
            }
            Err(err) => {
                tracing::error!("[{}] {}", self.mode, err);
                Vec::new()
            }
        }
    }

    /// Like [`handle`](Self::handle), but returns refusals to the caller.
    ///
    /// # Errors
    ///
    /// Returns the guard refusal or store error that stopped the event.
    pub fn try_handle(&mut self, event: Event) -> Result<Vec<Command>> {
        tracing::debug!("[{}] {:?}", self.mode, event);
        match event {
            Event::Pick { point, at } => self.pick(point, at),
            Event::ToggleDigitize => Ok(self.toggle_digitize()),
            Event::ToggleEdit => self.toggle_edit(),
            Event::ToggleTopology(detection) => self.toggle_topology(detection),
            Event::Finish => self.finish(),
            Event::Cancel => self.cancel(),
            Event::DeleteSelected => self.delete_selected(),
            Event::DeselectAll => Ok(self.deselect_all()),
            Event::ClearAll => Ok(self.clear_all()),
            Event::SetLabel(label) => self.set_label(label),
        }
    }

    /// Asks the viewer for a picked point and applies the resulting commands.
    ///
    /// Returns `false` if the click missed the mesh.
    pub fn pick_with<V: Viewer + ?Sized>(&mut self, viewer: &mut V, at: Instant) -> bool {
        let Some(point) = viewer.pick_point() else {
            tracing::debug!("[{}] pick missed the mesh", self.mode);
            return false;
        };
        let commands = self.handle(Event::Pick { point, at });
        dispatch(viewer, &commands);
        true
    }

    /// Writes every finished polyline under `dir`.
    ///
    /// # Errors
    ///
    /// Refuses an empty store, otherwise propagates I/O errors.
    pub fn save(&self, dir: &Path) -> Result<SaveReport> {
        persist::save(&self.store, &self.topology, dir)
    }

    /// Replaces all state with a previously saved summary.
    ///
    /// Polylines with fewer than 2 points are skipped; topology references to
    /// them are dropped. Returns the commands that redraw the restored scene.
    pub fn restore(&mut self, summary: &Summary) -> Vec<Command> {
        let mut commands = self.clear_all();

        let ids: Vec<Option<PolylineId>> = summary
            .polylines
            .iter()
            .map(|entry| {
                let points: Vec<Point3> = entry
                    .points
                    .iter()
                    .map(|&[x, y, z]| Point3::new(x, y, z))
                    .collect();
                match self.store.append(points) {
                    Ok(id) => Some(id),
                    Err(refusal) => {
                        tracing::warn!("Skipping saved polyline {}: {}", entry.id + 1, refusal);
                        None
                    }
                }
            })
            .collect();

        if let Some(topology) = &summary.topology {
            for (&position, saved) in topology {
                let Some(id) = ids.get(position).copied().flatten() else {
                    continue;
                };
                let intersecting = saved
                    .intersecting_polylines
                    .iter()
                    .filter_map(|&other| ids.get(other).copied().flatten())
                    .collect();
                self.topology.insert(
                    id,
                    TopologyRecord {
                        terminations: saved.terminations,
                        intersecting,
                    },
                );
            }
            self.topology.sync(&self.store);
        }

        tracing::info!(
            "Restored {} of {} saved polylines",
            self.store.len(),
            summary.polylines.len()
        );
        commands.extend(self.render_all());
        if self.topology.is_active() {
            commands.extend(self.render_labels());
        }
        commands
    }

    fn toggle_digitize(&mut self) -> Vec<Command> {
        if self.mode == Mode::Select {
            self.enter(Mode::Digitize)
        } else {
            self.enter(Mode::Select)
        }
    }

    fn toggle_edit(&mut self) -> Result<Vec<Command>> {
        if self.mode == Mode::Edit {
            return Ok(self.enter(Mode::Select));
        }
        if self.store.is_empty() {
            return Err(GuardError::EmptyStore.into());
        }
        self.selection.reconcile(&self.store);
        let id = self.selection.polyline().ok_or(GuardError::NoSelection)?;

        let mut commands = self.enter(Mode::Edit);
        let points = self.store.get(id)?.points().to_vec();
        tracing::info!("Editing polyline with {} points", points.len());
        commands.push(Command::ShowControlPoints { id, points });
        Ok(commands)
    }

    fn toggle_topology(&mut self, detection: DetectionMode) -> Result<Vec<Command>> {
        if self.mode == Mode::Topology {
            return Ok(self.enter(Mode::Select));
        }
        let pending = self.mode == Mode::Digitize && self.current.len() > 1;
        if self.store.is_empty() && !pending {
            return Err(GuardError::EmptyStore.into());
        }
        // Pending digitizing is finished first so it is classified too.
        let mut commands = self.leave_mode();

        match detection {
            DetectionMode::Automated => {
                let report = AutomatedDetection::new(&self.mesh, &self.config)
                    .execute(&self.store, &mut self.topology)?;
                self.last_detection = Some(report);
            }
            DetectionMode::Manual => {
                self.topology.manual_init(&self.store);
                tracing::info!("Manual topology labeling for {} polylines", self.store.len());
            }
        }

        self.mode = Mode::Topology;
        commands.push(Command::ModeChanged(Mode::Topology));
        commands.extend(self.render_labels());
        Ok(commands)
    }

    /// Switches to `mode`, tearing down whatever the old mode left on screen.
    fn enter(&mut self, mode: Mode) -> Vec<Command> {
        let mut commands = self.leave_mode();
        self.mode = mode;
        tracing::info!("Entered {} mode", mode);
        commands.push(Command::ModeChanged(mode));
        commands
    }

    fn leave_mode(&mut self) -> Vec<Command> {
        match self.mode {
            Mode::Digitize => match self.current.len() {
                0 => Vec::new(),
                1 => {
                    tracing::info!("Discarding single-point polyline");
                    self.current.clear();
                    vec![Command::ClearCurrentPolyline]
                }
                _ => self.finish_current().unwrap_or_default(),
            },
            Mode::Edit => vec![Command::ClearControlPoints],
            Mode::Topology => {
                self.selection.deselect_endpoint();
                vec![Command::ClearEndpointHighlight]
            }
            Mode::Select => Vec::new(),
        }
    }

    fn finish(&mut self) -> Result<Vec<Command>> {
        if self.mode != Mode::Digitize {
            return Err(GuardError::WrongMode {
                mode: self.mode.name(),
            }
            .into());
        }
        self.finish_current()
    }

    fn finish_current(&mut self) -> Result<Vec<Command>> {
        let points = std::mem::take(&mut self.current);
        let id = match self.store.append(points.clone()) {
            Ok(id) => id,
            Err(refusal) => {
                self.current = points;
                return Err(refusal.into());
            }
        };
        self.topology.sync(&self.store);
        tracing::info!(
            "Finished polyline {} with {} points",
            self.store.len(),
            points.len()
        );

        let mut commands = vec![
            Command::ClearCurrentPolyline,
            Command::RenderPolyline {
                id,
                points,
                highlighted: false,
            },
        ];
        if self.topology.is_active() {
            commands.extend(self.render_labels());
        }
        Ok(commands)
    }

    fn cancel(&mut self) -> Result<Vec<Command>> {
        if self.mode != Mode::Digitize {
            return Err(GuardError::WrongMode {
                mode: self.mode.name(),
            }
            .into());
        }
        if self.current.is_empty() {
            return Err(GuardError::NoPointsToCancel.into());
        }
        tracing::info!("Cancelled polyline with {} points", self.current.len());
        self.current.clear();
        Ok(vec![Command::ClearCurrentPolyline])
    }

    fn delete_selected(&mut self) -> Result<Vec<Command>> {
        self.selection.reconcile(&self.store);
        let id = self.selection.polyline().ok_or(GuardError::NoSelection)?;
        let endpoint = self.selection.endpoint();
        RemovePolyline::new(id).execute(&mut self.store, &mut self.topology, &mut self.selection)?;

        let mut commands = vec![Command::RemovePolylineRender { id }];
        if self.mode == Mode::Edit {
            commands.push(Command::ClearControlPoints);
        }
        if endpoint.is_some() && self.selection.endpoint().is_none() {
            commands.push(Command::ClearEndpointHighlight);
        }
        if self.topology.is_active() {
            commands.extend(self.render_labels());
        }
        Ok(commands)
    }

    fn deselect_all(&mut self) -> Vec<Command> {
        self.selection.reconcile(&self.store);
        let Some(id) = self.selection.polyline() else {
            return Vec::new();
        };
        self.selection.deselect();
        tracing::info!("Deselected all polylines");

        let mut commands = Vec::new();
        if let Ok(polyline) = self.store.get(id) {
            commands.push(Command::RenderPolyline {
                id,
                points: polyline.points().to_vec(),
                highlighted: false,
            });
        }
        if self.mode == Mode::Edit {
            commands.push(Command::ClearControlPoints);
        }
        commands
    }

    fn clear_all(&mut self) -> Vec<Command> {
        let mut commands: Vec<Command> = self
            .store
            .ids()
            .iter()
            .map(|&id| Command::RemovePolylineRender { id })
            .collect();
        commands.extend([
            Command::ClearCurrentPolyline,
            Command::ClearControlPoints,
            Command::ClearEndpointLabels,
            Command::ClearEndpointHighlight,
        ]);

        let removed = self.store.len();
        self.store.clear();
        self.current.clear();
        self.selection.clear();
        self.topology.clear();
        self.double_click.reset();
        self.last_detection = None;
        tracing::info!("Cleared {} polylines", removed);

        if matches!(self.mode, Mode::Edit | Mode::Topology) {
            self.mode = Mode::Select;
            commands.push(Command::ModeChanged(Mode::Select));
        }
        commands
    }

    fn set_label(&mut self, label: Termination) -> Result<Vec<Command>> {
        if self.mode != Mode::Topology {
            return Err(GuardError::WrongMode {
                mode: self.mode.name(),
            }
            .into());
        }
        self.selection.reconcile(&self.store);
        let endpoint = self
            .selection
            .endpoint()
            .ok_or(GuardError::EndpointNotSelected)?;
        self.topology
            .set_label(endpoint.polyline, endpoint.end, label)?;
        tracing::info!(
            "Set {:?} of polyline {} to {}",
            endpoint.end,
            self.store.position(endpoint.polyline).map_or(0, |p| p + 1),
            label
        );

        let mut commands = self.render_labels();
        self.selection.deselect_endpoint();
        commands.push(Command::ClearEndpointHighlight);
        Ok(commands)
    }

    /// Redraws every finished polyline, highlighting the selection.
    fn render_all(&self) -> Vec<Command> {
        self.store
            .iter()
            .map(|(id, polyline)| Command::RenderPolyline {
                id,
                points: polyline.points().to_vec(),
                highlighted: self.selection.is_selected(id),
            })
            .collect()
    }

    /// Clears and redraws every endpoint label.
    fn render_labels(&self) -> Vec<Command> {
        let mut commands = vec![Command::ClearEndpointLabels];
        for (id, polyline) in self.store.iter() {
            let Some(record) = self.topology.get(id) else {
                continue;
            };
            for end in [Endpoint::Start, Endpoint::End] {
                if let Some(&position) = polyline.endpoint(end) {
                    commands.push(Command::RenderEndpointLabel {
                        polyline: id,
                        end,
                        label: record.label(end),
                        position,
                    });
                }
            }
        }
        commands
    }
}
