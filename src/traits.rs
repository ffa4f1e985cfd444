use crate::float_types::Real;
use crate::mesh::{axis::Axis, plane::Plane};
use nalgebra::{Matrix3, Matrix4, Translation3, Vector3};

/// Rigid and affine transformations.
///
/// Implementors provide [`Transform::transform_in_place`]; every other
/// operation comes in two flavours: a verb (`translate`, `rotate`, `mirror`)
/// that mutates `self`, and a participle (`translated`, `rotated`, `mirrored`)
/// that leaves `self` untouched and returns a transformed deep copy.
pub trait Transform: Sized + Clone {
    /// Apply the affine map `matrix` (homogeneous 4×4) to `self`.
    fn transform_in_place(&mut self, matrix: &Matrix4<Real>);

    /// Returns a new Self transformed by `matrix`.
    fn transformed(&self, matrix: &Matrix4<Real>) -> Self {
        let mut copy = self.clone();
        copy.transform_in_place(matrix);
        copy
    }

    /// Translates self by `vector`.
    fn translate(&mut self, vector: Vector3<Real>) {
        self.transform_in_place(&Translation3::from(vector).to_homogeneous());
    }

    /// Returns a new Self translated by `vector`.
    fn translated(&self, vector: Vector3<Real>) -> Self {
        self.transformed(&Translation3::from(vector).to_homogeneous())
    }

    fn translate_x(&mut self, dx: Real) {
        self.translate(Vector3::new(dx, 0.0, 0.0));
    }

    fn translate_y(&mut self, dy: Real) {
        self.translate(Vector3::new(0.0, dy, 0.0));
    }

    fn translate_z(&mut self, dz: Real) {
        self.translate(Vector3::new(0.0, 0.0, dz));
    }

    fn translated_x(&self, dx: Real) -> Self {
        self.translated(Vector3::new(dx, 0.0, 0.0))
    }

    fn translated_y(&self, dy: Real) -> Self {
        self.translated(Vector3::new(0.0, dy, 0.0))
    }

    fn translated_z(&self, dz: Real) -> Self {
        self.translated(Vector3::new(0.0, 0.0, dz))
    }

    /// Rotates self by `angle` radians about `axis` (right-hand rule).
    fn rotate(&mut self, axis: &Axis, angle: Real) {
        self.transform_in_place(&axis.rotation_matrix(angle));
    }

    /// Returns a new Self rotated by `angle` radians about `axis`.
    fn rotated(&self, axis: &Axis, angle: Real) -> Self {
        self.transformed(&axis.rotation_matrix(angle))
    }

    /// Rotation about the x axis through the origin.
    fn rotate_x(&mut self, angle: Real) {
        self.rotate(&Axis::ox(), angle);
    }

    /// Rotation about the y axis through the origin.
    fn rotate_y(&mut self, angle: Real) {
        self.rotate(&Axis::oy(), angle);
    }

    /// Rotation about the z axis through the origin.
    fn rotate_z(&mut self, angle: Real) {
        self.rotate(&Axis::oz(), angle);
    }

    /// Reflect (mirror) self about `plane`.
    ///
    /// A plane with a degenerate normal leaves self unchanged.
    fn mirror(&mut self, plane: &Plane) {
        match plane.reflection_matrix() {
            Some(matrix) => self.transform_in_place(&matrix),
            None => log::warn!("mirror: degenerate plane {plane:?}, nothing to do"),
        }
    }

    /// Returns a new Self mirrored about `plane`.
    fn mirrored(&self, plane: &Plane) -> Self {
        let mut copy = self.clone();
        copy.mirror(plane);
        copy
    }
}

/// The linear (rotation/reflection/scaling) part of an affine map.
///
/// Direction fields such as DOF vectors transform with this part only.
#[inline]
pub fn linear_part(matrix: &Matrix4<Real>) -> Matrix3<Real> {
    matrix.fixed_view::<3, 3>(0, 0).into_owned()
}

/// Whether the affine map flips orientation (mirror-like).
#[inline]
pub fn reverses_orientation(matrix: &Matrix4<Real>) -> bool {
    linear_part(matrix).determinant() < 0.0
}
