//! Orthographic camera for the 3D view.

use crate::geometry::{Point, Point3};

/// Fraction of full brightness a face receives regardless of the light.
const AMBIENT: f32 = 0.35;

/// Orthographic camera placed at spherical `(azimuth, elevation)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    azimuth: f32,
    elevation: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::from_degrees(-60.0, 30.0)
    }
}

impl Camera {
    /// Create a camera from angles in degrees.
    #[must_use]
    pub fn from_degrees(azimuth: f32, elevation: f32) -> Self {
        Self {
            azimuth: azimuth.to_radians(),
            elevation: elevation.to_radians(),
        }
    }

    /// Azimuth in degrees.
    #[must_use]
    pub fn azimuth(&self) -> f32 {
        self.azimuth.to_degrees()
    }

    /// Elevation in degrees.
    #[must_use]
    pub fn elevation(&self) -> f32 {
        self.elevation.to_degrees()
    }

    /// Project onto the screen plane; `y` grows upwards.
    #[must_use]
    pub fn project(&self, p: Point3) -> Point {
        let (sa, ca) = self.azimuth.sin_cos();
        let (se, ce) = self.elevation.sin_cos();
        Point::new(-p.x * sa + p.y * ca, -p.x * ca * se - p.y * sa * se + p.z * ce)
    }

    /// Distance along the viewing direction; larger is further away.
    #[must_use]
    pub fn depth(&self, p: Point3) -> f32 {
        let (sa, ca) = self.azimuth.sin_cos();
        let (se, ce) = self.elevation.sin_cos();
        -(p.x * ce * ca + p.y * ce * sa + p.z * se)
    }

    /// Ambient plus two-sided diffuse intensity for a face normal.
    #[must_use]
    pub fn light_intensity(&self, normal: Point3) -> f32 {
        let light = Point3::new(0.4, -0.5, 0.76).normalized();
        let diffuse = normal.normalized().dot(light).abs();
        (AMBIENT + (1.0 - AMBIENT) * diffuse).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_angles() {
        let camera = Camera::default();
        assert_relative_eq!(camera.azimuth(), -60.0, epsilon = 1e-4);
        assert_relative_eq!(camera.elevation(), 30.0, epsilon = 1e-4);
    }

    #[test]
    fn test_vertical_axis_projects_upwards() {
        let camera = Camera::default();
        let top = camera.project(Point3::new(0.0, 0.0, 1.0));
        assert_relative_eq!(top.x, 0.0, epsilon = 1e-6);
        assert!(top.y > 0.0);
    }

    #[test]
    fn test_top_view_is_plan() {
        let camera = Camera::from_degrees(-90.0, 90.0);
        let p = camera.project(Point3::new(2.0, 3.0, 7.0));
        assert_relative_eq!(p.x, 2.0, epsilon = 1e-5);
        assert_relative_eq!(p.y, 3.0, epsilon = 1e-5);
    }

    #[test]
    fn test_depth_orders_near_and_far() {
        let camera = Camera::default();
        let near = camera.depth(Point3::new(0.0, 0.0, 1.0));
        let far = camera.depth(Point3::new(0.0, 0.0, -1.0));
        assert!(far > near);
    }

    #[test]
    fn test_light_intensity_bounds() {
        let camera = Camera::default();
        let lit = camera.light_intensity(Point3::new(0.4, -0.5, 0.76));
        assert_relative_eq!(lit, 1.0, epsilon = 1e-4);
        let grazing = camera.light_intensity(Point3::new(0.5, 0.4, 0.0));
        assert!(grazing >= AMBIENT);
    }
}
