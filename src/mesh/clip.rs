//! Half-space clipping of a [`Mesh`].
//!
//! Faces on the FRONT side of the plane are discarded, faces on the BACK side
//! are kept whole, and faces straddling the plane are split along it. Every
//! face of the result remembers which face of the input it came from, so that
//! per-face data (DOF fields) can follow the same retention/splitting decision.

use crate::float_types::Real;
use crate::mesh::Mesh;
use crate::mesh::plane::{BACK, COPLANAR, FRONT, Plane, SPANNING};
use hashbrown::HashMap;
use nalgebra::Point3;

/// Result of [`Mesh::clipped`].
#[derive(Debug, Clone, PartialEq)]
pub struct ClippedMesh {
    pub mesh: Mesh,
    /// For each face of `mesh`, the index of the face of the original mesh it
    /// was taken or cut from.
    pub faces_ids: Vec<usize>,
    /// Faces of `mesh` that were cut by the plane, in increasing order.
    pub split_faces: Vec<usize>,
}

impl Mesh {
    /// Keep the part of the mesh lying behind `plane` (opposite its normal).
    ///
    /// Faces lying entirely in the plane are dropped: they bound the retained
    /// region without belonging to it (a waterplane lid, a flat keel resting on
    /// the sea bottom). Intersection vertices are shared between the two faces
    /// adjacent to a cut edge. Vertices used by no retained face are dropped.
    pub fn clipped(&self, plane: &Plane) -> ClippedMesh {
        let all_faces = || ClippedMesh {
            mesh: self.clone().without_unused_vertices(),
            faces_ids: (0..self.nb_faces()).collect(),
            split_faces: Vec::new(),
        };

        if plane.is_degenerate() {
            log::warn!("clip: degenerate plane {plane:?}, mesh left unchanged");
            return all_faces();
        }

        let orientations: Vec<i8> = self
            .vertices
            .iter()
            .map(|v| plane.orient_point(v))
            .collect();

        if orientations.iter().all(|&o| o == BACK) {
            return all_faces();
        }

        let mut vertices = self.vertices.clone();
        let mut faces = Vec::with_capacity(self.nb_faces());
        let mut faces_ids = Vec::with_capacity(self.nb_faces());
        let mut edge_cache: HashMap<(usize, usize), usize> = HashMap::new();
        let mut split_faces = Vec::new();

        for (face_id, face) in self.faces.iter().enumerate() {
            match classify_face(face, &orientations) {
                BACK => {
                    faces.push(face.clone());
                    faces_ids.push(face_id);
                },
                SPANNING => {
                    let kept = split_face(
                        plane,
                        face,
                        &orientations,
                        &mut vertices,
                        &mut edge_cache,
                    );
                    if kept.len() >= 3 {
                        split_faces.push(faces.len());
                        faces.push(kept);
                        faces_ids.push(face_id);
                    }
                },
                _ => {},
            }
        }

        log::debug!(
            "clip: kept {} of {} faces ({} split)",
            faces.len(),
            self.nb_faces(),
            split_faces.len()
        );

        ClippedMesh {
            mesh: Mesh::from_parts_unchecked(vertices, faces).without_unused_vertices(),
            faces_ids,
            split_faces,
        }
    }
}

/// [`BACK`] if no vertex is in front (and at least one is behind), [`FRONT`] if
/// no vertex is behind (and at least one in front), [`COPLANAR`] if all are on
/// the plane, [`SPANNING`] otherwise.
fn classify_face(face: &[usize], orientations: &[i8]) -> i8 {
    face.iter()
        .fold(COPLANAR, |acc, &index| acc | orientations[index])
}

/// The BACK part of a spanning face, walking its edges in order.
fn split_face(
    plane: &Plane,
    face: &[usize],
    orientations: &[i8],
    vertices: &mut Vec<Point3<Real>>,
    edge_cache: &mut HashMap<(usize, usize), usize>,
) -> Vec<usize> {
    let mut kept = Vec::with_capacity(face.len() + 1);
    for (k, &i) in face.iter().enumerate() {
        let j = face[(k + 1) % face.len()];
        let (type_i, type_j) = (orientations[i], orientations[j]);

        if type_i != FRONT {
            kept.push(i);
        }

        // The edge crosses the plane strictly: insert the intersection point
        if (type_i | type_j) == SPANNING {
            let key = if i < j { (i, j) } else { (j, i) };
            let index = *edge_cache.entry(key).or_insert_with(|| {
                // Always interpolate from the smaller index so that both
                // faces sharing this edge get bit-identical points.
                let (a, b) = (vertices[key.0], vertices[key.1]);
                let da = plane.signed_distance(&a);
                let db = plane.signed_distance(&b);
                let t = da / (da - db);
                vertices.push(a + (b - a) * t);
                vertices.len() - 1
            });
            kept.push(index);
        }
    }
    kept.dedup();
    if kept.len() > 1 && kept.first() == kept.last() {
        kept.pop();
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    fn vertical_square(z_min: Real, z_max: Real) -> Mesh {
        Mesh::from_arrays(
            &[[0.0, 0.0, z_min], [0.0, 0.0, z_max], [1.0, 0.0, z_max], [1.0, 0.0, z_min]],
            &[[0, 1, 2, 3]],
        )
        .unwrap()
    }

    #[test]
    fn submerged_face_is_kept_whole() {
        let mesh = vertical_square(-2.0, -1.0);
        let clipped = mesh.clipped(&Plane::xoy());
        assert_eq!(clipped.mesh, mesh);
        assert_eq!(clipped.faces_ids, vec![0]);
        assert!(clipped.split_faces.is_empty());
    }

    #[test]
    fn emerged_face_is_dropped() {
        let clipped = vertical_square(1.0, 2.0).clipped(&Plane::xoy());
        assert!(clipped.mesh.is_empty());
        assert_eq!(clipped.mesh.nb_vertices(), 0);
        assert!(clipped.faces_ids.is_empty());
    }

    #[test]
    fn face_touching_the_plane_from_below_is_kept() {
        let mesh = vertical_square(-1.0, 0.0);
        let clipped = mesh.clipped(&Plane::xoy());
        assert_eq!(clipped.mesh.nb_faces(), 1);
        assert!(clipped.split_faces.is_empty());
    }

    #[test]
    fn face_in_the_plane_is_dropped() {
        let lid = Mesh::from_arrays(
            &[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]],
            &[[0, 1, 2, 3]],
        )
        .unwrap();
        assert!(lid.clipped(&Plane::xoy()).mesh.is_empty());
    }

    #[test]
    fn spanning_face_is_cut_at_the_plane() {
        let clipped = vertical_square(-1.0, 1.0).clipped(&Plane::xoy());
        assert_eq!(clipped.faces_ids, vec![0]);
        assert_eq!(clipped.split_faces, vec![0]);
        let mesh = &clipped.mesh;
        assert_eq!(mesh.faces()[0].len(), 4);
        assert_relative_eq!(mesh.faces_areas()[0], 1.0);
        assert_relative_eq!(mesh.faces_centers()[0], Point3::new(0.5, 0.0, -0.5));
        assert_relative_eq!(mesh.faces_normals()[0], Vector3::y());
        assert!(mesh.vertices().iter().all(|v| v.z <= 0.0));
    }

    #[test]
    fn cut_vertices_are_shared_between_neighbours() {
        // two squares sharing the edge x = 1
        let mesh = Mesh::from_arrays(
            &[
                [0.0, 0.0, -1.0],
                [0.0, 0.0, 1.0],
                [1.0, 0.0, 1.0],
                [1.0, 0.0, -1.0],
                [2.0, 0.0, 1.0],
                [2.0, 0.0, -1.0],
            ],
            &[[0, 1, 2, 3], [3, 2, 4, 5]],
        )
        .unwrap();
        let clipped = mesh.clipped(&Plane::xoy());
        assert_eq!(clipped.mesh.nb_faces(), 2);
        // 3 submerged corners + 3 points on the waterline
        assert_eq!(clipped.mesh.nb_vertices(), 6);
    }

    #[test]
    fn triangle_corner_cut_gives_quadrangle() {
        let mesh = Mesh::from_arrays(
            &[[0.0, 0.0, -1.0], [2.0, 0.0, -1.0], [1.0, 0.0, 1.0]],
            &[[0, 1, 2]],
        )
        .unwrap();
        let clipped = mesh.clipped(&Plane::xoy());
        assert_eq!(clipped.mesh.faces()[0].len(), 4);
        assert_relative_eq!(clipped.mesh.faces_areas()[0], 1.5);
    }

    #[test]
    fn unused_vertices_are_dropped_on_every_path() {
        // vertex 4 belongs to no face
        let mesh = Mesh::new(
            vec![
                Point3::new(0.0, 0.0, -2.0),
                Point3::new(0.0, 0.0, -1.0),
                Point3::new(1.0, 0.0, -1.0),
                Point3::new(1.0, 0.0, -2.0),
                Point3::new(5.0, 5.0, 5.0),
            ],
            vec![vec![0, 1, 2, 3]],
        )
        .unwrap();
        let below = mesh.clipped(&Plane::xoy());
        let through = mesh.clipped(&Plane::from_normal(Vector3::z(), -0.5));
        assert_eq!(below.mesh.nb_vertices(), 4);
        assert_eq!(through.mesh.nb_vertices(), 4);
        assert_eq!(below.mesh, vertical_square(-2.0, -1.0));
    }

    #[test]
    fn split_faces_are_listed_by_new_index() {
        // a submerged square followed by one crossing the plane
        let mesh = Mesh::from_arrays(
            &[
                [0.0, 0.0, -3.0],
                [0.0, 0.0, -2.0],
                [1.0, 0.0, -2.0],
                [1.0, 0.0, -3.0],
                [0.0, 1.0, -1.0],
                [0.0, 1.0, 1.0],
                [1.0, 1.0, 1.0],
                [1.0, 1.0, -1.0],
                [0.0, 2.0, 1.0],
                [0.0, 2.0, 2.0],
                [1.0, 2.0, 2.0],
                [1.0, 2.0, 1.0],
            ],
            &[[8, 9, 10, 11], [0, 1, 2, 3], [4, 5, 6, 7]],
        )
        .unwrap();
        let clipped = mesh.clipped(&Plane::xoy());
        assert_eq!(clipped.faces_ids, vec![1, 2]);
        assert_eq!(clipped.split_faces, vec![1]);
    }
}
