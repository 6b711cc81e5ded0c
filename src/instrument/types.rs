// Instrument model types
// Components, their placements, and the draw primitives they carry

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::geometry::Transform;

/// Plane selector for circle primitives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CirclePlane {
    /// Circle lies in the XY plane
    Xy,

    /// Circle lies in the XZ plane
    Xz,

    /// Circle lies in the YZ plane
    Yz,
}

impl CirclePlane {
    /// Parse the plane tag used by DRAW circle lines
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "xy" => Some(CirclePlane::Xy),
            "xz" => Some(CirclePlane::Xz),
            "yz" => Some(CirclePlane::Yz),
            _ => None,
        }
    }

    /// The protocol tag for this plane
    pub fn as_tag(&self) -> &'static str {
        match self {
            CirclePlane::Xy => "xy",
            CirclePlane::Xz => "xz",
            CirclePlane::Yz => "yz",
        }
    }

    /// The two in-plane unit axes
    fn axes(&self) -> (DVec3, DVec3) {
        match self {
            CirclePlane::Xy => (DVec3::X, DVec3::Y),
            CirclePlane::Xz => (DVec3::X, DVec3::Z),
            CirclePlane::Yz => (DVec3::Y, DVec3::Z),
        }
    }
}

/// A drawable primitive in the local coordinate frame of its owning
/// component. The coordinates only become meaningful once combined with the
/// component's transform. Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DrawCommand {
    /// Straight segment between two points
    Line { start: DVec3, end: DVec3 },

    /// Connected polyline through the given points
    Multiline { points: Vec<DVec3> },

    /// Circle of the given radius around a center, in an axis-aligned plane
    Circle {
        plane: CirclePlane,
        center: DVec3,
        radius: f64,
    },

    /// Sphere of the given radius around a center
    Sphere { center: DVec3, radius: f64 },

    /// Axis-aligned box described by its center and full side lengths
    Box { center: DVec3, size: DVec3 },
}

impl DrawCommand {
    /// Local-frame extrema of this primitive: the points whose transformed
    /// images bound it in world space. Used by the bounding volume fold.
    pub fn local_extrema(&self) -> Vec<DVec3> {
        match self {
            DrawCommand::Line { start, end } => vec![*start, *end],
            DrawCommand::Multiline { points } => points.clone(),
            DrawCommand::Circle {
                plane,
                center,
                radius,
            } => {
                let (u, v) = plane.axes();
                vec![
                    *center + u * *radius,
                    *center - u * *radius,
                    *center + v * *radius,
                    *center - v * *radius,
                ]
            }
            DrawCommand::Sphere { center, radius } => vec![
                *center + DVec3::X * *radius,
                *center - DVec3::X * *radius,
                *center + DVec3::Y * *radius,
                *center - DVec3::Y * *radius,
                *center + DVec3::Z * *radius,
                *center - DVec3::Z * *radius,
            ],
            DrawCommand::Box { center, size } => {
                let h = *size * 0.5;
                let mut corners = Vec::with_capacity(8);
                for sx in [-1.0, 1.0] {
                    for sy in [-1.0, 1.0] {
                        for sz in [-1.0, 1.0] {
                            corners.push(*center + DVec3::new(h.x * sx, h.y * sy, h.z * sz));
                        }
                    }
                }
                corners
            }
        }
    }
}

/// One instrument component: a named placement in the beamline carrying an
/// ordered list of draw primitives. Components keep the order in which the
/// trace stream declared them, which is the beamline traversal order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    /// Component name as declared by the trace stream
    pub name: String,

    /// Placement of the component's local frame in world space
    pub transform: Transform,

    /// Draw primitives, in emission order, local to this component
    pub draws: Vec<DrawCommand>,

    /// False when the component's transform declaration was malformed.
    /// The component is kept in position so indices stay stable, but its
    /// geometry must not be trusted.
    pub valid: bool,
}

impl Component {
    /// Create a valid component with no draw primitives yet
    pub fn new(name: impl Into<String>, transform: Transform) -> Self {
        Component {
            name: name.into(),
            transform,
            draws: Vec::new(),
            valid: true,
        }
    }

    /// Create a component whose transform declaration could not be parsed.
    /// It is placed at identity and flagged invalid.
    pub fn invalid(name: impl Into<String>) -> Self {
        Component {
            name: name.into(),
            transform: Transform::IDENTITY,
            draws: Vec::new(),
            valid: false,
        }
    }
}

/// The static geometry of the simulated apparatus: an ordered sequence of
/// components. Read-only once built; only the instrument builder constructs
/// one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instrument {
    /// Instrument name (from the INSTRUMENT line, or a fallback)
    name: String,

    /// Components in first-seen order
    components: Vec<Component>,
}

impl Instrument {
    pub(crate) fn new(name: String, components: Vec<Component>) -> Self {
        Instrument { name, components }
    }

    /// Instrument name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Components in beamline traversal order
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// Number of components, including any flagged invalid
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// True when the instrument has no components
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_plane_tags_round_trip() {
        for plane in [CirclePlane::Xy, CirclePlane::Xz, CirclePlane::Yz] {
            assert_eq!(CirclePlane::from_tag(plane.as_tag()), Some(plane));
        }
        assert_eq!(CirclePlane::from_tag("zz"), None);
    }

    #[test]
    fn test_line_extrema_are_endpoints() {
        let line = DrawCommand::Line {
            start: DVec3::ZERO,
            end: DVec3::new(1.0, 2.0, 3.0),
        };
        let extrema = line.local_extrema();
        assert_eq!(extrema.len(), 2);
        assert_eq!(extrema[0], DVec3::ZERO);
        assert_eq!(extrema[1], DVec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_circle_extrema_stay_in_plane() {
        let circle = DrawCommand::Circle {
            plane: CirclePlane::Xz,
            center: DVec3::new(0.0, 1.0, 0.0),
            radius: 2.0,
        };
        let extrema = circle.local_extrema();
        assert_eq!(extrema.len(), 4);
        for p in extrema {
            assert_eq!(p.y, 1.0);
        }
    }

    #[test]
    fn test_box_extrema_are_corners() {
        let cmd = DrawCommand::Box {
            center: DVec3::ZERO,
            size: DVec3::new(2.0, 4.0, 6.0),
        };
        let extrema = cmd.local_extrema();
        assert_eq!(extrema.len(), 8);
        for p in &extrema {
            assert_eq!(p.x.abs(), 1.0);
            assert_eq!(p.y.abs(), 2.0);
            assert_eq!(p.z.abs(), 3.0);
        }
    }

    #[test]
    fn test_invalid_component_is_flagged_at_identity() {
        let comp = Component::invalid("broken");
        assert!(!comp.valid);
        assert_eq!(comp.transform, Transform::IDENTITY);
        assert!(comp.draws.is_empty());
    }
}
