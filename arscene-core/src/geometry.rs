//! Points, vectors and distances in scene space
//!
//! Scene space is measured in meters, matching the tracking framework's
//! world coordinates.

use nalgebra::{Point3, Vector3};

/// A 3D point with floating point coordinates
pub type Point3f = Point3<f32>;

/// A 3D vector with floating point components
pub type Vector3f = Vector3<f32>;

/// Vector pointing from `from` to `to`
pub fn displacement(from: &Point3f, to: &Point3f) -> Vector3f {
    to - from
}

/// Euclidean distance between two points
pub fn distance(a: &Point3f, b: &Point3f) -> f32 {
    displacement(a, b).norm()
}

/// Format a distance with exactly two fractional digits
pub fn format_meters(distance: f32) -> String {
    format!("{:.2}", distance)
}

/// A position on the device screen, in points
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
}

impl ScreenPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Size of the camera viewport, in points
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// The fixed point hit-tests are issued from
    pub fn center(&self) -> ScreenPoint {
        ScreenPoint::new(self.width / 2.0, self.height / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_distance_along_axis() {
        let a = Point3f::new(0.0, 0.0, 0.0);
        let b = Point3f::new(1.5, 0.0, 0.0);
        assert_relative_eq!(distance(&a, &b), 1.5, epsilon = 1e-6);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let a = Point3f::new(0.3, -1.2, 2.0);
        let b = Point3f::new(-0.7, 0.4, 1.1);
        assert_relative_eq!(distance(&a, &b), distance(&b, &a), epsilon = 1e-6);
    }

    #[test]
    fn test_displacement() {
        let a = Point3f::new(1.0, 2.0, 3.0);
        let b = Point3f::new(4.0, 6.0, 3.0);
        assert_eq!(displacement(&a, &b), Vector3f::new(3.0, 4.0, 0.0));
        assert_relative_eq!(distance(&a, &b), 5.0, epsilon = 1e-6);
    }

    #[test]
    fn test_format_meters() {
        assert_eq!(format_meters(1.5), "1.50");
        assert_eq!(format_meters(0.0), "0.00");
        assert_eq!(format_meters(2.345_678), "2.35");
    }

    #[test]
    fn test_viewport_center() {
        let viewport = Viewport::new(375.0, 667.0);
        assert_eq!(viewport.center(), ScreenPoint::new(187.5, 333.5));
    }
}
