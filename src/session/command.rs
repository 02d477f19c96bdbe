use crate::math::Point3;
use crate::selection::EndpointRef;
use crate::store::{Endpoint, PolylineId};
use crate::topology::Termination;

use super::Mode;

/// A render instruction for the external viewer.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Draw (or redraw) a finished polyline.
    RenderPolyline {
        id: PolylineId,
        points: Vec<Point3>,
        highlighted: bool,
    },
    /// Remove a finished polyline from the scene.
    RemovePolylineRender { id: PolylineId },
    /// Draw the polyline being digitized.
    RenderCurrentPolyline { points: Vec<Point3> },
    ClearCurrentPolyline,
    /// Mark the control points of the polyline being edited.
    ShowControlPoints { id: PolylineId, points: Vec<Point3> },
    ClearControlPoints,
    RenderEndpointLabel {
        polyline: PolylineId,
        end: Endpoint,
        label: Termination,
        position: Point3,
    },
    ClearEndpointLabels,
    HighlightEndpoint {
        endpoint: EndpointRef,
        position: Point3,
    },
    ClearEndpointHighlight,
    /// Move the camera focus halfway towards `target`.
    FocusCamera { target: Point3 },
    ModeChanged(Mode),
}

/// The 3D viewer the session drives.
///
/// Only the polyline and label hooks are required; the rest default to no-ops
/// so minimal viewers (and tests) can ignore them.
pub trait Viewer {
    fn render_polyline(&mut self, id: PolylineId, points: &[Point3], highlighted: bool);

    fn remove_polyline_render(&mut self, id: PolylineId);

    fn render_endpoint_label(
        &mut self,
        polyline: PolylineId,
        end: Endpoint,
        label: char,
        position: Point3,
    );

    /// The surface point under the cursor, if the last click hit the mesh.
    fn pick_point(&mut self) -> Option<Point3>;

    fn render_current_polyline(&mut self, _points: &[Point3]) {}

    fn clear_current_polyline(&mut self) {}

    fn show_control_points(&mut self, _id: PolylineId, _points: &[Point3]) {}

    fn clear_control_points(&mut self) {}

    fn clear_endpoint_labels(&mut self) {}

    fn highlight_endpoint(&mut self, _endpoint: EndpointRef, _position: Point3) {}

    fn clear_endpoint_highlight(&mut self) {}

    fn focus_camera(&mut self, _target: Point3) {}

    fn mode_changed(&mut self, _mode: Mode) {}

    /// Applies one command.
    fn apply(&mut self, command: &Command) {
        match command {
            Command::RenderPolyline {
                id,
                points,
                highlighted,
            } => self.render_polyline(*id, points, *highlighted),
            Command::RemovePolylineRender { id } => self.remove_polyline_render(*id),
            Command::RenderCurrentPolyline { points } => self.render_current_polyline(points),
            Command::ClearCurrentPolyline => self.clear_current_polyline(),
            Command::ShowControlPoints { id, points } => self.show_control_points(*id, points),
            Command::ClearControlPoints => self.clear_control_points(),
            Command::RenderEndpointLabel {
                polyline,
                end,
                label,
                position,
            } => self.render_endpoint_label(*polyline, *end, label.code(), *position),
            Command::ClearEndpointLabels => self.clear_endpoint_labels(),
            Command::HighlightEndpoint { endpoint, position } => {
                self.highlight_endpoint(*endpoint, *position);
            }
            Command::ClearEndpointHighlight => self.clear_endpoint_highlight(),
            Command::FocusCamera { target } => self.focus_camera(*target),
            Command::ModeChanged(mode) => self.mode_changed(*mode),
        }
    }
}

/// Feeds commands to a viewer in order.
pub fn dispatch<V: Viewer + ?Sized>(viewer: &mut V, commands: &[Command]) {
    for command in commands {
        viewer.apply(command);
    }
}
