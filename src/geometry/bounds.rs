// Bounding volumes - world-space extents of the instrument geometry
// Folds draw primitives through their component placements into one box,
// then derives the default preview camera from it

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::geometry::Transform;
use crate::instrument::{DrawCommand, Instrument};

/// Axis-aligned box in world coordinates. Always derived from point folds,
/// never edited in place by consumers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Smallest coordinate per axis
    pub min: DVec3,

    /// Largest coordinate per axis
    pub max: DVec3,
}

impl BoundingBox {
    /// Fallback box for an instrument with no drawable geometry, chosen so
    /// the derived camera is always finite.
    pub const DEFAULT: BoundingBox = BoundingBox {
        min: DVec3::splat(-1.0),
        max: DVec3::splat(1.0),
    };

    /// Create a box from two opposite corners, in any order
    pub fn new(a: DVec3, b: DVec3) -> Self {
        BoundingBox {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Smallest box containing all given points; None when the iterator is
    /// empty
    pub fn from_points(points: impl IntoIterator<Item = DVec3>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bounds = BoundingBox {
            min: first,
            max: first,
        };
        for p in iter {
            bounds.include(p);
        }
        Some(bounds)
    }

    /// Grow the box to contain the given point
    pub fn include(&mut self, point: DVec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// Smallest box containing both boxes
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Midpoint of the box
    pub fn center(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }

    /// Side lengths per axis
    pub fn size(&self) -> DVec3 {
        self.max - self.min
    }
}

/// World-space box enclosing every `(draw command, owning transform)` pair:
/// each primitive's local extrema are mapped through its transform and
/// folded into a running min/max. None when there is no geometry at all.
pub fn world_bounds<'a>(
    pairs: impl IntoIterator<Item = (&'a DrawCommand, &'a Transform)>,
) -> Option<BoundingBox> {
    BoundingBox::from_points(
        pairs
            .into_iter()
            .flat_map(|(draw, transform)| {
                draw.local_extrema()
                    .into_iter()
                    .map(move |p| transform.apply(p))
            }),
    )
}

/// World-space box enclosing every draw primitive of every valid component.
/// Components flagged invalid are excluded: their placement is unknown, so
/// their local geometry has no meaningful world position. An instrument
/// without drawable geometry yields `BoundingBox::DEFAULT`.
pub fn instrument_bounds(instrument: &Instrument) -> BoundingBox {
    world_bounds(
        instrument
            .components()
            .iter()
            .filter(|comp| comp.valid)
            .flat_map(|comp| comp.draws.iter().map(move |draw| (draw, &comp.transform))),
    )
    .unwrap_or(BoundingBox::DEFAULT)
}

/// Default preview camera for a beamline laid out along +Z: level with the
/// beam, beside it at half the beam-axis depth, centered on the box
/// midpoint along Z.
pub fn default_camera_position(bounds: &BoundingBox) -> DVec3 {
    let depth = bounds.max.z - bounds.min.z;
    DVec3::new(-depth / 2.0, 0.0, bounds.min.z + depth / 2.0)
}
