//! Spatial three-vectors and the angles measured from them

use nalgebra::{Rotation3, Vector3};

/// Spatial three-vector, typically a momentum in GeV
pub type ThreeVector = Vector3<f64>;

/// Spherical angles of a three-vector with the beam along +z
pub trait Angles {
    /// Magnitude of the component transverse to the z axis
    fn transverse(&self) -> f64;

    /// Polar angle from the +z axis in radians, within [0, π]
    ///
    /// The zero vector has polar angle 0.
    fn theta(&self) -> f64;

    /// Azimuthal angle from the +x axis in radians, within (-π, π]
    ///
    /// Vectors along the z axis have azimuthal angle 0. Without this
    /// convention `atan2(-0., -0.)` would give -π.
    fn phi(&self) -> f64;

    /// Angle to `other` in radians, within [0, π], zero if either vanishes
    fn opening_angle(&self, other: &Self) -> f64;

    fn all_finite(&self) -> bool;

    /// Rotation taking `self` onto the +z axis
    ///
    /// First rotates about z so that `self` has no y component and a
    /// non-negative x component (azimuth 0), then about the new y axis.
    /// For a vanishing vector both rotations are the identity.
    fn frame_rotation(&self) -> Rotation3<f64>;

    /// Express `target` in the frame whose z axis points along `self`
    fn rotate_into_frame(&self, target: &Self) -> Self;
}

impl Angles for ThreeVector {
    fn transverse(&self) -> f64 {
        self.x.hypot(self.y)
    }

    fn theta(&self) -> f64 {
        if self.x == 0. && self.y == 0. && self.z == 0. {
            return 0.;
        }
        self.transverse().atan2(self.z)
    }

    fn phi(&self) -> f64 {
        if self.x == 0. && self.y == 0. {
            return 0.;
        }
        self.y.atan2(self.x)
    }

    fn opening_angle(&self, other: &Self) -> f64 {
        self.cross(other).norm().atan2(self.dot(other))
    }

    fn all_finite(&self) -> bool {
        self.iter().all(|c| c.is_finite())
    }

    fn frame_rotation(&self) -> Rotation3<f64> {
        let to_xz = Rotation3::from_axis_angle(&Vector3::z_axis(), -self.phi());
        let onto_z = Rotation3::from_axis_angle(&Vector3::y_axis(), -self.theta());
        onto_z * to_xz
    }

    fn rotate_into_frame(&self, target: &Self) -> Self {
        self.frame_rotation() * target
    }
}
