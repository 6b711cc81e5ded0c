// Scene assembly
// The renderer handoff value: instrument, trajectories, bounding volume,
// default camera, and every diagnostic the build recorded.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::geometry::{default_camera_position, instrument_bounds, BoundingBox};
use crate::instrument::{Instrument, InstrumentModel};
use crate::trace::ParseError;
use crate::trajectory::{Trajectory, TrajectorySet};

/// Everything a renderer needs for one traced run. Assembled once both
/// stream phases are built; handed over as a value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneModel {
    /// Static apparatus geometry
    pub instrument: Instrument,

    /// Recorded particle flights in first-seen order
    pub trajectories: Vec<Trajectory>,

    /// World-space bounds of the valid instrument geometry
    pub bounds: BoundingBox,

    /// Suggested initial camera position, beside the beamline and level
    /// with it
    pub camera: DVec3,

    /// Diagnostics from both phases, in stream order
    pub diagnostics: Vec<ParseError>,
}

/// Assemble the scene from the two built phases
pub fn assemble(model: InstrumentModel, set: TrajectorySet) -> SceneModel {
    let InstrumentModel {
        instrument,
        mut diagnostics,
    } = model;
    let TrajectorySet {
        trajectories,
        diagnostics: event_diagnostics,
    } = set;
    diagnostics.extend(event_diagnostics);
    diagnostics.sort_by_key(|d| d.line);

    let bounds = instrument_bounds(&instrument);
    let camera = default_camera_position(&bounds);

    SceneModel {
        instrument,
        trajectories,
        bounds,
        camera,
        diagnostics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instrument::{build_instrument, parse_instrument};
    use crate::trace::TraceLine;
    use crate::trajectory::{build_trajectories, parse_events};

    fn numbered(text: &str) -> Vec<TraceLine> {
        text.lines()
            .enumerate()
            .map(|(i, l)| TraceLine::new(i + 1, l))
            .collect()
    }

    fn scene_from(structure: &str, events: &str) -> SceneModel {
        assemble(
            build_instrument(parse_instrument(&numbered(structure))),
            build_trajectories(parse_events(&numbered(events))),
        )
    }

    #[test]
    fn test_minimal_stream_scenario() {
        use crate::geometry::Transform;
        use crate::instrument::DrawCommand;
        use crate::trajectory::EventKind;

        let scene = scene_from(
            "COMPONENT origin 0 0 0 0 0 0\nDRAW line 0 0 0 1 0 0",
            "EVENT p1 ENTER 0 0 0 0 0 1 0 1.0",
        );
        assert!(scene.diagnostics.is_empty());

        let origin = &scene.instrument.components()[0];
        assert_eq!(origin.name, "origin");
        assert_eq!(origin.transform, Transform::IDENTITY);
        assert_eq!(
            origin.draws,
            vec![DrawCommand::Line {
                start: DVec3::ZERO,
                end: DVec3::X,
            }]
        );

        assert_eq!(scene.trajectories.len(), 1);
        assert_eq!(scene.trajectories[0].id(), "p1");
        assert_eq!(scene.trajectories[0].events()[0].kind, EventKind::Enter);
    }

    #[test]
    fn test_assembles_bounds_and_camera() {
        let scene = scene_from(
            "COMPONENT source 0 0 0 0 0 0\n\
             DRAW box 0 0 0 1 1 1\n\
             COMPONENT detector 0 0 10 0 0 0\n\
             DRAW box 0 0 0 1 1 1",
            "",
        );
        assert_eq!(scene.bounds.min, DVec3::new(-0.5, -0.5, -0.5));
        assert_eq!(scene.bounds.max, DVec3::new(0.5, 0.5, 10.5));

        // Depth 11: beside the beamline, level, centered on it
        assert_eq!(scene.camera, DVec3::new(-5.5, 0.0, 5.0));
    }

    #[test]
    fn test_diagnostics_keep_stream_order() {
        let scene = scene_from(
            "COMPONENT a 0 0 bad 0 0 0",
            "EVENT p1 WOBBLE 0 0 0 0 0 1 0 1.0",
        );
        assert_eq!(scene.diagnostics.len(), 2);
        assert!(scene.diagnostics[0].reason.contains("position"));
        assert!(scene.diagnostics[1].reason.contains("WOBBLE"));
    }

    #[test]
    fn test_scene_serializes_for_the_shell() {
        let scene = scene_from(
            "INSTRUMENT demo\nCOMPONENT origin 0 0 0 0 0 0\nDRAW line 0 0 0 1 0 0",
            "EVENT p1 ENTER 0 0 0 0 0 1 0 1.0",
        );
        let value = serde_json::to_value(&scene).unwrap();
        assert_eq!(value["instrument"]["name"], "demo");
        assert_eq!(value["trajectories"][0]["id"], "p1");
        assert_eq!(value["trajectories"][0]["events"][0]["kind"], "enter");
        assert!(value["camera"].is_array());
    }
}
