//! Node and anchor transforms

use crate::geometry::{Point3f, Vector3f};
use nalgebra::{Matrix4, Isometry3, UnitQuaternion};
use serde::{Deserialize, Serialize};

/// A homogeneous 3D transform, used both for node-local placement and for
/// world transforms reported by hit-tests and anchors
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform3D {
    pub matrix: Matrix4<f32>,
}

impl Transform3D {
    /// Create an identity transformation
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    /// Create a translation transformation
    pub fn translation(translation: Vector3f) -> Self {
        Self {
            matrix: Matrix4::new_translation(&translation),
        }
    }

    /// Create a transform placing the origin at `point`
    pub fn at(point: Point3f) -> Self {
        Self::translation(point.coords)
    }

    /// Create a rotation transformation from a quaternion
    pub fn rotation(rotation: UnitQuaternion<f32>) -> Self {
        Self {
            matrix: rotation.to_homogeneous(),
        }
    }

    /// Create a transformation from translation and rotation
    pub fn from_translation_rotation(
        translation: Vector3f,
        rotation: UnitQuaternion<f32>,
    ) -> Self {
        let isometry = Isometry3::from_parts(translation.into(), rotation);
        Self {
            matrix: isometry.to_homogeneous(),
        }
    }

    /// Translation component
    pub fn position(&self) -> Point3f {
        Point3f::new(self.matrix[(0, 3)], self.matrix[(1, 3)], self.matrix[(2, 3)])
    }

    /// Replace the translation component, keeping rotation and scale
    pub fn set_position(&mut self, position: Point3f) {
        self.matrix[(0, 3)] = position.x;
        self.matrix[(1, 3)] = position.y;
        self.matrix[(2, 3)] = position.z;
    }

    /// Apply the transformation to a point
    pub fn transform_point(&self, point: &Point3f) -> Point3f {
        let homogeneous = self.matrix * point.to_homogeneous();
        Point3f::from_homogeneous(homogeneous).unwrap_or(*point)
    }

    /// Compose this transformation with another (`other` is applied first)
    pub fn compose(self, other: Self) -> Self {
        Self {
            matrix: self.matrix * other.matrix,
        }
    }
}

impl Default for Transform3D {
    fn default() -> Self {
        Self::identity()
    }
}

impl std::ops::Mul for Transform3D {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        self.compose(rhs)
    }
}

impl From<Matrix4<f32>> for Transform3D {
    fn from(matrix: Matrix4<f32>) -> Self {
        Self { matrix }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    #[test]
    fn test_position_roundtrip() {
        let mut transform = Transform3D::at(Point3f::new(1.0, 2.0, 3.0));
        assert_eq!(transform.position(), Point3f::new(1.0, 2.0, 3.0));

        transform.set_position(Point3f::new(-1.0, 0.0, 0.5));
        assert_eq!(transform.position(), Point3f::new(-1.0, 0.0, 0.5));
    }

    #[test]
    fn test_set_position_keeps_rotation() {
        let rotation = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), -std::f32::consts::FRAC_PI_2);
        let mut transform = Transform3D::rotation(rotation);
        transform.set_position(Point3f::new(2.0, 0.0, 1.0));

        // Local +Y maps onto world -Z once the quad is laid flat
        let tip = transform.transform_point(&Point3f::new(0.0, 1.0, 0.0));
        assert_relative_eq!(tip.x, 2.0, epsilon = 1e-6);
        assert_relative_eq!(tip.y, 0.0, epsilon = 1e-6);
        assert_relative_eq!(tip.z, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_compose_applies_right_first() {
        let parent = Transform3D::at(Point3f::new(1.0, 0.0, 0.0));
        let child = Transform3D::at(Point3f::new(0.0, 2.0, 0.0));
        let world = parent * child;
        assert_eq!(world.position(), Point3f::new(1.0, 2.0, 0.0));
    }
}
