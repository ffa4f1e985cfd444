//! Oriented planes used as mirrors and as clipping boundaries.

use crate::float_types::{Real, tolerance};
use crate::traits::{Transform, linear_part};
use nalgebra::{Matrix3, Matrix4, Point3, Translation3, Vector3};

// Plane classification constants
pub const COPLANAR: i8 = 0;
pub const FRONT: i8 = 1;
pub const BACK: i8 = 2;
pub const SPANNING: i8 = 3;

/// An oriented plane `n·p = w`.
///
/// The normal points towards the FRONT side. Clipping retains the BACK side,
/// so `Plane::xoy()` (normal +z through the origin) keeps everything with
/// `z ≤ 0`.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    /// Unit normal vector of the plane (zero if the plane is degenerate)
    pub normal: Vector3<Real>,
    /// Distance from origin along normal (plane equation: n·p = w)
    pub w: Real,
}

impl Plane {
    /// Plane through `point` with the given (not necessarily unit) `normal`.
    pub fn new(point: Point3<Real>, normal: Vector3<Real>) -> Self {
        let normal = normal
            .try_normalize(tolerance())
            .unwrap_or_else(Vector3::zeros);
        Plane {
            normal,
            w: normal.dot(&point.coords),
        }
    }

    /// Create a new plane from normal vector and distance along that normal
    pub fn from_normal(normal: Vector3<Real>, w: Real) -> Self {
        match normal.try_normalize(tolerance()) {
            Some(normal) => Plane { normal, w },
            None => Plane {
                normal: Vector3::zeros(),
                w: 0.0,
            },
        }
    }

    /// The horizontal plane z = 0, normal pointing up.
    pub fn xoy() -> Self {
        Plane::from_normal(Vector3::z(), 0.0)
    }

    /// The plane x = 0, normal along +x.
    pub fn yoz() -> Self {
        Plane::from_normal(Vector3::x(), 0.0)
    }

    /// The plane y = 0, normal along +y.
    pub fn xoz() -> Self {
        Plane::from_normal(Vector3::y(), 0.0)
    }

    pub const fn normal(&self) -> Vector3<Real> {
        self.normal
    }

    pub const fn offset(&self) -> Real {
        self.w
    }

    /// The point of the plane closest to the origin.
    pub fn point(&self) -> Point3<Real> {
        Point3::from(self.normal * self.w)
    }

    pub fn is_degenerate(&self) -> bool {
        self.normal.norm_squared() < tolerance() * tolerance()
    }

    /// Signed distance of `point` to the plane, positive on the FRONT side.
    #[inline]
    pub fn signed_distance(&self, point: &Point3<Real>) -> Real {
        self.normal.dot(&point.coords) - self.w
    }

    /// Classify `point` as [`FRONT`], [`BACK`] or [`COPLANAR`] within the crate tolerance.
    pub fn orient_point(&self, point: &Point3<Real>) -> i8 {
        let distance = self.signed_distance(point);
        if distance > tolerance() {
            FRONT
        } else if distance < -tolerance() {
            BACK
        } else {
            COPLANAR
        }
    }

    /// Swap FRONT and BACK sides.
    pub fn flip(&mut self) {
        self.normal = -self.normal;
        self.w = -self.w;
    }

    /// Homogeneous matrix of the reflection about this plane, or `None` if the
    /// plane is degenerate.
    pub fn reflection_matrix(&self) -> Option<Matrix4<Real>> {
        if self.is_degenerate() {
            return None;
        }
        let n = self.normal;

        // Translate so the plane crosses the origin
        let offset = n * self.w;
        let t1 = Translation3::from(-offset).to_homogeneous();

        // R = I - 2 n n^T
        let mut reflect_4 = Matrix4::identity();
        let reflect_3 = Matrix3::identity() - 2.0 * n * n.transpose();
        reflect_4.fixed_view_mut::<3, 3>(0, 0).copy_from(&reflect_3);

        // Translate back
        let t2 = Translation3::from(offset).to_homogeneous();

        Some(t2 * reflect_4 * t1)
    }
}

impl Transform for Plane {
    fn transform_in_place(&mut self, matrix: &Matrix4<Real>) {
        let point = matrix.transform_point(&self.point());
        // Normals follow the inverse transpose of the linear part
        let normal = match linear_part(matrix).try_inverse() {
            Some(inverse) => inverse.transpose() * self.normal,
            None => {
                log::warn!("plane transform: singular matrix, normal left unchanged");
                self.normal
            },
        };
        *self = Plane::new(point, normal);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn orient_points_around_free_surface() {
        let plane = Plane::xoy();
        assert_eq!(plane.orient_point(&Point3::new(0.0, 0.0, 1.0)), FRONT);
        assert_eq!(plane.orient_point(&Point3::new(0.0, 0.0, -1.0)), BACK);
        assert_eq!(plane.orient_point(&Point3::new(3.0, -2.0, 1e-12)), COPLANAR);
    }

    #[test]
    fn plane_through_point() {
        let plane = Plane::new(Point3::new(0.0, 1.0, 0.0), Vector3::new(0.0, 2.0, 0.0));
        assert_relative_eq!(plane.normal(), Vector3::y());
        assert_relative_eq!(plane.offset(), 1.0);
        assert_relative_eq!(plane.point(), Point3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn reflection_fixes_plane_points() {
        let plane = Plane::new(Point3::new(0.0, 1.0, 0.0), Vector3::x());
        let matrix = plane.reflection_matrix().unwrap();
        let on_plane = Point3::new(0.0, 5.0, -2.0);
        assert_relative_eq!(matrix.transform_point(&on_plane), on_plane);
        let off_plane = Point3::new(2.0, 5.0, -2.0);
        assert_relative_eq!(
            matrix.transform_point(&off_plane),
            Point3::new(-2.0, 5.0, -2.0)
        );
    }

    #[test]
    fn degenerate_plane_has_no_reflection() {
        let plane = Plane::new(Point3::origin(), Vector3::zeros());
        assert!(plane.is_degenerate());
        assert!(plane.reflection_matrix().is_none());
    }

    #[test]
    fn flip() {
        let mut plane = Plane::from_normal(Vector3::y(), 2.0);
        plane.flip();
        assert_eq!(plane.normal(), Vector3::new(0.0, -1.0, 0.0));
        assert_eq!(plane.offset(), -2.0);
    }

    #[test]
    fn translated_plane_moves_offset() {
        let plane = Plane::xoy().translated_z(-3.0);
        assert_relative_eq!(plane.normal(), Vector3::z());
        assert_relative_eq!(plane.offset(), -3.0);
    }
}
