//! Test support library
//! Provides various helper functions & utilities for tests.

#![allow(dead_code)]

use hydrobody::{FloatingBody, float_types::Real, mesh::Mesh};
use nalgebra::Vector3;

/// Quick helper to compare two DOF fields row by row with an acceptable tolerance.
pub fn fields_close(a: &[Vector3<Real>], b: &[Vector3<Real>], eps: Real) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(u, v)| (u - v).norm() < eps)
}

/// The single vertical unit square in the plane y = 0.
pub fn one_face_body() -> FloatingBody {
    let nodes = [[0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0, 1.0], [1.0, 0.0, 0.0]];
    let mesh = Mesh::from_arrays(&nodes, &[[0, 1, 2, 3]]).unwrap();
    FloatingBody::with_name(mesh, "one_face")
}

/// Indices of the faces whose center is below `z`.
pub fn faces_below(mesh: &Mesh, z: Real) -> Vec<usize> {
    mesh.faces_centers()
        .iter()
        .enumerate()
        .filter(|(_, c)| c.z < z)
        .map(|(i, _)| i)
        .collect()
}
