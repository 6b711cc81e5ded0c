// Rigid transforms - component placement in the beamline
// Rotation + translation pairs composed from trace-declared Euler angles

use glam::{DMat3, DVec3, EulerRot};
use serde::{Deserialize, Serialize};

/// A rigid placement: orthonormal rotation followed by translation.
/// Immutable once constructed; composing transforms always yields a new value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Orthonormal 3x3 rotation matrix
    rotation: DMat3,

    /// Translation applied after rotation
    translation: DVec3,
}

impl Transform {
    /// The identity placement: no rotation, no translation
    pub const IDENTITY: Transform = Transform {
        rotation: DMat3::IDENTITY,
        translation: DVec3::ZERO,
    };

    /// Create a transform from a rotation matrix and a translation vector
    pub fn new(rotation: DMat3, translation: DVec3) -> Self {
        Transform {
            rotation,
            translation,
        }
    }

    /// Create a transform from Euler angles in degrees and a translation
    /// vector. The rotation is the matrix product Rx * Ry * Rz, so a point
    /// is rotated about the fixed Z axis first and about X last. This is
    /// the convention used by the trace protocol's COMPONENT lines.
    pub fn from_euler_deg(angles_deg: DVec3, translation: DVec3) -> Self {
        let rotation = DMat3::from_euler(
            EulerRot::XYZ,
            angles_deg.x.to_radians(),
            angles_deg.y.to_radians(),
            angles_deg.z.to_radians(),
        );

        Transform {
            rotation,
            translation,
        }
    }

    /// The rotation part
    pub fn rotation(&self) -> DMat3 {
        self.rotation
    }

    /// The translation part
    pub fn translation(&self) -> DVec3 {
        self.translation
    }

    /// Map a point from the local frame into the parent frame
    pub fn apply(&self, point: DVec3) -> DVec3 {
        self.rotation * point + self.translation
    }

    /// Compose with a child transform: `parent.compose(&child)` maps points
    /// from the child's local frame into the parent's frame. Composition is
    /// associative.
    pub fn compose(&self, child: &Transform) -> Transform {
        Transform {
            rotation: self.rotation * child.rotation,
            translation: self.rotation * child.translation + self.translation,
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Transform::IDENTITY
    }
}
