//! Oriented lines in space, used as rotation axes.

use crate::float_types::{Real, tolerance};
use crate::traits::{Transform, linear_part};
use nalgebra::{Matrix4, Point3, Rotation3, Translation3, Unit, Vector3};

/// A line through `point` with unit `direction`.
#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    pub point: Point3<Real>,
    /// Unit vector (zero if the axis is degenerate)
    pub direction: Vector3<Real>,
}

impl Axis {
    pub fn new(point: Point3<Real>, direction: Vector3<Real>) -> Self {
        Axis {
            point,
            direction: direction
                .try_normalize(tolerance())
                .unwrap_or_else(Vector3::zeros),
        }
    }

    /// Axis through the origin along `direction`.
    pub fn through_origin(direction: Vector3<Real>) -> Self {
        Axis::new(Point3::origin(), direction)
    }

    pub fn ox() -> Self {
        Axis::through_origin(Vector3::x())
    }

    pub fn oy() -> Self {
        Axis::through_origin(Vector3::y())
    }

    pub fn oz() -> Self {
        Axis::through_origin(Vector3::z())
    }

    pub fn is_degenerate(&self) -> bool {
        self.direction.norm_squared() < tolerance() * tolerance()
    }

    /// Velocity of `point` under a unit angular velocity about this axis:
    /// `direction × (point − axis.point)`.
    #[inline]
    pub fn angular_velocity_at(&self, point: &Point3<Real>) -> Vector3<Real> {
        self.direction.cross(&(point - self.point))
    }

    /// Homogeneous matrix of the rotation by `angle` radians about this line.
    ///
    /// A degenerate axis yields the identity.
    pub fn rotation_matrix(&self, angle: Real) -> Matrix4<Real> {
        if self.is_degenerate() {
            log::warn!("rotation about a degenerate axis {self:?}, nothing to do");
            return Matrix4::identity();
        }
        let rotation =
            Rotation3::from_axis_angle(&Unit::new_unchecked(self.direction), angle);
        let to_origin = Translation3::from(-self.point.coords).to_homogeneous();
        let back = Translation3::from(self.point.coords).to_homogeneous();
        back * rotation.to_homogeneous() * to_origin
    }
}

impl Transform for Axis {
    fn transform_in_place(&mut self, matrix: &Matrix4<Real>) {
        self.point = matrix.transform_point(&self.point);
        self.direction = (linear_part(matrix) * self.direction)
            .try_normalize(tolerance())
            .unwrap_or_else(Vector3::zeros);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::float_types::{FRAC_PI_2, PI};
    use approx::assert_relative_eq;

    #[test]
    fn rotation_about_offset_axis() {
        let axis = Axis::new(Point3::new(0.0, 1.0, 0.0), Vector3::z());
        let matrix = axis.rotation_matrix(PI);
        assert_relative_eq!(
            matrix.transform_point(&Point3::new(0.0, 0.0, 3.0)),
            Point3::new(0.0, 2.0, 3.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn quarter_turn_about_z() {
        let matrix = Axis::oz().rotation_matrix(FRAC_PI_2);
        assert_relative_eq!(
            matrix.transform_point(&Point3::new(1.0, 0.0, 0.0)),
            Point3::new(0.0, 1.0, 0.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn angular_velocity_is_tangential() {
        let axis = Axis::new(Point3::new(0.5, 0.0, 0.0), Vector3::z());
        assert_relative_eq!(
            axis.angular_velocity_at(&Point3::new(1.5, 0.0, 7.0)),
            Vector3::new(0.0, 1.0, 0.0)
        );
    }

    #[test]
    fn degenerate_axis_is_identity() {
        let axis = Axis::through_origin(Vector3::zeros());
        assert!(axis.is_degenerate());
        assert_eq!(axis.rotation_matrix(1.0), Matrix4::identity());
    }

    #[test]
    fn translated_axis_keeps_direction() {
        let axis = Axis::oy().translated_x(2.0);
        assert_relative_eq!(axis.point, Point3::new(2.0, 0.0, 0.0));
        assert_relative_eq!(axis.direction, Vector3::y());
    }
}
