use std::time::Instant;

use crate::error::{GuardError, Result, TraceMapError};
use crate::math::Point3;
use crate::mesh::MeshProvider;
use crate::operations::edit::{DeleteNearestControlPoint, Extend, FindJoinCandidate, Join};
use crate::operations::select::{EndpointPickOutcome, PickEndpoint, SelectNear, SelectOutcome};
use crate::store::PolylineId;

use super::{Command, Mode, Session};

impl<M: MeshProvider> Session<M> {
    /// Routes a surface pick to the handler of the current mode.
    pub(super) fn pick(&mut self, point: Point3, at: Instant) -> Result<Vec<Command>> {
        match self.mode {
            Mode::Select => Ok(self.select_pick(point, at)),
            Mode::Digitize => Ok(self.digitize_pick(point)),
            Mode::Edit => self.edit_pick(point),
            Mode::Topology => self.topology_pick(point),
        }
    }

    fn select_pick(&mut self, point: Point3, at: Instant) -> Vec<Command> {
        if self.double_click.detect(point, at) {
            return vec![Command::FocusCamera { target: point }];
        }

        self.selection.reconcile(&self.store);
        let outcome =
            SelectNear::new(point, self.thresholds.selection).execute(&self.store, &mut self.selection);

        let (previous, selected) = match outcome {
            SelectOutcome::Selected { id, previous } => {
                tracing::info!(
                    "Selected polyline {}",
                    self.store.position(id).map_or(0, |p| p + 1)
                );
                (previous, Some(id))
            }
            SelectOutcome::Deselected { previous } => (previous, None),
        };

        let mut commands = Vec::new();
        for (id, highlighted) in [(previous, false), (selected, true)] {
            if let Some(id) = id {
                commands.extend(self.redraw(id, highlighted));
            }
        }
        commands
    }

    fn digitize_pick(&mut self, point: Point3) -> Vec<Command> {
        self.current.push(point);
        tracing::debug!(
            "Added point {} to current polyline: ({:.3}, {:.3}, {:.3})",
            self.current.len(),
            point.x,
            point.y,
            point.z
        );
        vec![Command::RenderCurrentPolyline {
            points: self.current.clone(),
        }]
    }

    /// Delete a nearby control point, otherwise join onto a nearby endpoint,
    /// otherwise extend the nearer end.
    fn edit_pick(&mut self, point: Point3) -> Result<Vec<Command>> {
        self.selection.reconcile(&self.store);
        let id = self.selection.polyline().ok_or(GuardError::NoSelection)?;

        match DeleteNearestControlPoint::new(id, point, self.thresholds.delete)
            .execute(&mut self.store)
        {
            Ok(index) => {
                tracing::info!("Deleted control point {}", index);
                return self.redraw_edited(id);
            }
            Err(TraceMapError::Guard(GuardError::NoControlPointNearby { .. })) => {}
            Err(err) => return Err(err),
        }

        if let Some(candidate) =
            FindJoinCandidate::new(id, point, self.thresholds.join).execute(&self.store)
        {
            let outcome = Join::new(id, candidate, point).execute(
                &mut self.store,
                &mut self.topology,
                &mut self.selection,
            )?;
            let mut commands = vec![Command::RemovePolylineRender {
                id: outcome.removed,
            }];
            commands.extend(self.redraw_edited(outcome.merged)?);
            return Ok(commands);
        }

        let end = Extend::new(id, point).execute(&mut self.store)?;
        tracing::info!("Extended polyline at {:?}", end);
        self.redraw_edited(id)
    }

    fn topology_pick(&mut self, point: Point3) -> Result<Vec<Command>> {
        self.selection.reconcile(&self.store);
        let outcome = PickEndpoint::new(point, self.thresholds.endpoint_pick)
            .execute(&self.store, &mut self.selection);

        match outcome {
            EndpointPickOutcome::Selected(endpoint) => {
                let polyline = self.store.get(endpoint.polyline)?;
                let position = polyline
                    .endpoint(endpoint.end)
                    .copied()
                    .ok_or(GuardError::EndpointNotSelected)?;
                tracing::info!(
                    "Selected {:?} of polyline {}",
                    endpoint.end,
                    self.store.position(endpoint.polyline).map_or(0, |p| p + 1)
                );
                Ok(vec![
                    Command::ClearEndpointHighlight,
                    Command::HighlightEndpoint { endpoint, position },
                ])
            }
            EndpointPickOutcome::Deselected => Ok(vec![Command::ClearEndpointHighlight]),
        }
    }

    fn redraw(&self, id: PolylineId, highlighted: bool) -> Option<Command> {
        let polyline = self.store.get(id).ok()?;
        Some(Command::RenderPolyline {
            id,
            points: polyline.points().to_vec(),
            highlighted,
        })
    }

    /// Redraws the edited polyline with its control points, plus labels when
    /// its endpoints may have moved.
    fn redraw_edited(&self, id: PolylineId) -> Result<Vec<Command>> {
        let points = self.store.get(id)?.points().to_vec();
        let mut commands = vec![
            Command::RenderPolyline {
                id,
                points: points.clone(),
                highlighted: true,
            },
            Command::ShowControlPoints { id, points },
        ];
        if self.topology.is_active() {
            commands.extend(self.render_labels());
        }
        Ok(commands)
    }
}
