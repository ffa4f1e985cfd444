//! `Mesh` struct: a vertex array and polygonal faces indexing into it.
//!
//! Per-face geometry (centers, normals, areas) and the bounding box are
//! computed lazily and cached; any transformation produces fresh caches.

use crate::errors::BodyError;
use crate::float_types::{Real, parry3d::bounding_volume::Aabb};
use crate::traits::{Transform, reverses_orientation};
use nalgebra::{Matrix4, Point3, Vector3};
use std::sync::OnceLock;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

pub mod axis;
pub mod clip;
pub mod plane;

pub use clip::ClippedMesh;

/// Geometry derived from the faces of a [`Mesh`], one entry per face.
#[derive(Debug, Clone, PartialEq)]
pub struct FacesGeometry {
    pub centers: Vec<Point3<Real>>,
    pub normals: Vec<Vector3<Real>>,
    pub areas: Vec<Real>,
}

/// A surface mesh made of planar polygonal faces.
///
/// Faces are lists of at least three vertex indices, counter-clockwise when
/// seen from the side the normal points to. Triangles and quadrangles are the
/// usual case; clipping may produce pentagons.
#[derive(Clone, Debug)]
pub struct Mesh {
    vertices: Vec<Point3<Real>>,
    faces: Vec<Vec<usize>>,

    /// Lazily calculated per-face geometry.
    geometry: OnceLock<FacesGeometry>,

    /// Lazily calculated AABB that spans the vertices.
    bounding_box: OnceLock<Aabb>,
}

impl PartialEq for Mesh {
    fn eq(&self, other: &Self) -> bool {
        self.vertices == other.vertices && self.faces == other.faces
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Mesh::empty()
    }
}

impl Mesh {
    /// Build a mesh, checking that every face has at least three vertices and
    /// only refers to existing vertices.
    pub fn new(vertices: Vec<Point3<Real>>, faces: Vec<Vec<usize>>) -> Result<Self, BodyError> {
        if let Some(vertex) = vertices.iter().find(|v| !v.coords.iter().all(|c| c.is_finite())) {
            return Err(BodyError::InvalidMesh(format!(
                "Vertex {vertex} has a NaN or infinite coordinate"
            )));
        }
        for (i, face) in faces.iter().enumerate() {
            if face.len() < 3 {
                return Err(BodyError::InvalidMesh(format!(
                    "Face {i} has only {} vertices",
                    face.len()
                )));
            }
            if let Some(&index) = face.iter().find(|&&index| index >= vertices.len()) {
                return Err(BodyError::InvalidMesh(format!(
                    "Face {i} refers to vertex {index} (nb_vertices = {})",
                    vertices.len()
                )));
            }
        }
        Ok(Mesh::from_parts_unchecked(vertices, faces))
    }

    /// Convenience constructor from plain coordinate arrays.
    ///
    /// ```
    /// # use hydrobody::mesh::Mesh;
    /// let nodes = [[0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0, 1.0], [1.0, 0.0, 0.0]];
    /// let mesh = Mesh::from_arrays(&nodes, &[[0, 1, 2, 3]]).unwrap();
    /// assert_eq!(mesh.nb_faces(), 1);
    /// ```
    pub fn from_arrays<F: AsRef<[usize]>>(
        vertices: &[[Real; 3]],
        faces: &[F],
    ) -> Result<Self, BodyError> {
        Mesh::new(
            vertices.iter().map(|&[x, y, z]| Point3::new(x, y, z)).collect(),
            faces.iter().map(|f| f.as_ref().to_vec()).collect(),
        )
    }

    /// A mesh without vertices or faces.
    pub const fn empty() -> Self {
        Mesh {
            vertices: Vec::new(),
            faces: Vec::new(),
            geometry: OnceLock::new(),
            bounding_box: OnceLock::new(),
        }
    }

    pub(crate) const fn from_parts_unchecked(
        vertices: Vec<Point3<Real>>,
        faces: Vec<Vec<usize>>,
    ) -> Self {
        Mesh {
            vertices,
            faces,
            geometry: OnceLock::new(),
            bounding_box: OnceLock::new(),
        }
    }

    #[inline]
    pub fn vertices(&self) -> &[Point3<Real>] {
        &self.vertices
    }

    #[inline]
    pub fn faces(&self) -> &[Vec<usize>] {
        &self.faces
    }

    #[inline]
    pub const fn nb_vertices(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub const fn nb_faces(&self) -> usize {
        self.faces.len()
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Per-face centers, normals and areas (cached after the first call).
    pub fn geometry(&self) -> &FacesGeometry {
        self.geometry.get_or_init(|| {
            #[cfg(feature = "parallel")]
            let per_face: Vec<_> = self
                .faces
                .par_iter()
                .map(|face| face_geometry(&self.vertices, face))
                .collect();

            #[cfg(not(feature = "parallel"))]
            let per_face: Vec<_> = self
                .faces
                .iter()
                .map(|face| face_geometry(&self.vertices, face))
                .collect();

            let mut geometry = FacesGeometry {
                centers: Vec::with_capacity(per_face.len()),
                normals: Vec::with_capacity(per_face.len()),
                areas: Vec::with_capacity(per_face.len()),
            };
            for (center, normal, area) in per_face {
                geometry.centers.push(center);
                geometry.normals.push(normal);
                geometry.areas.push(area);
            }
            geometry
        })
    }

    #[inline]
    pub fn faces_centers(&self) -> &[Point3<Real>] {
        &self.geometry().centers
    }

    /// Unit outward normals (zero for degenerate faces).
    #[inline]
    pub fn faces_normals(&self) -> &[Vector3<Real>] {
        &self.geometry().normals
    }

    #[inline]
    pub fn faces_areas(&self) -> &[Real] {
        &self.geometry().areas
    }

    pub fn surface_area(&self) -> Real {
        self.faces_areas().iter().sum()
    }

    /// Enclosed volume by the divergence theorem.
    ///
    /// Only meaningful for closed meshes with outward normals; for a hull
    /// clipped at the free surface this is the displaced volume up to the
    /// missing waterplane lid, whose contribution vanishes when the free
    /// surface is `z = 0` and the volume is evaluated along z.
    pub fn volume(&self) -> Real {
        let geometry = self.geometry();
        geometry
            .centers
            .iter()
            .zip(&geometry.normals)
            .zip(&geometry.areas)
            .map(|((c, n), a)| c.z * n.z * a)
            .sum()
    }

    /// Returns a [`parry3d::bounding_volume::Aabb`](Aabb) of all vertices.
    pub fn bounding_box(&self) -> Aabb {
        *self.bounding_box.get_or_init(|| {
            if self.vertices.is_empty() {
                return Aabb::new(Point3::origin(), Point3::origin());
            }
            let mut mins = Point3::new(Real::MAX, Real::MAX, Real::MAX);
            let mut maxs = Point3::new(-Real::MAX, -Real::MAX, -Real::MAX);
            for v in &self.vertices {
                mins = mins.inf(v);
                maxs = maxs.sup(v);
            }
            Aabb::new(mins, maxs)
        })
    }

    /// A new mesh made of the faces listed in `faces_ids`, in that order.
    /// Vertices not used by any of them are dropped.
    pub fn extract_faces(&self, faces_ids: &[usize]) -> Result<Mesh, BodyError> {
        if let Some(&index) = faces_ids.iter().find(|&&id| id >= self.nb_faces()) {
            return Err(BodyError::FaceIndexOutOfRange {
                index,
                nb_faces: self.nb_faces(),
            });
        }
        let faces = faces_ids.iter().map(|&id| self.faces[id].clone()).collect();
        Ok(Mesh::from_parts_unchecked(self.vertices.clone(), faces).without_unused_vertices())
    }

    /// Concatenate meshes: vertices are appended and face indices shifted.
    pub fn join(meshes: &[&Mesh]) -> Mesh {
        let mut vertices = Vec::with_capacity(meshes.iter().map(|m| m.nb_vertices()).sum());
        let mut faces = Vec::with_capacity(meshes.iter().map(|m| m.nb_faces()).sum());
        for mesh in meshes {
            let offset = vertices.len();
            vertices.extend_from_slice(&mesh.vertices);
            faces.extend(
                mesh.faces
                    .iter()
                    .map(|face| face.iter().map(|&i| i + offset).collect::<Vec<_>>()),
            );
        }
        Mesh::from_parts_unchecked(vertices, faces)
    }

    /// Drop the vertices no face refers to and renumber the faces.
    pub(crate) fn without_unused_vertices(self) -> Mesh {
        let mut remap: Vec<Option<usize>> = vec![None; self.vertices.len()];
        let mut vertices = Vec::new();
        let mut faces = self.faces;
        for face in &mut faces {
            for index in face.iter_mut() {
                let old = *index;
                *index = *remap[old].get_or_insert_with(|| {
                    vertices.push(self.vertices[old]);
                    vertices.len() - 1
                });
            }
        }
        Mesh::from_parts_unchecked(vertices, faces)
    }
}

impl Transform for Mesh {
    /// Vertices follow the affine map; faces are re-wound when the map
    /// reverses orientation so that normals keep pointing outwards.
    fn transform_in_place(&mut self, matrix: &Matrix4<Real>) {
        for vertex in &mut self.vertices {
            *vertex = matrix.transform_point(vertex);
        }
        if reverses_orientation(matrix) {
            for face in &mut self.faces {
                face.reverse();
            }
        }
        self.geometry = OnceLock::new();
        self.bounding_box = OnceLock::new();
    }
}

/// Center, unit normal and area of one planar polygon.
///
/// The normal comes from Newell's method; the center is the area-weighted
/// centroid of the fan triangulation, or the vertex mean for degenerate faces.
fn face_geometry(vertices: &[Point3<Real>], face: &[usize]) -> (Point3<Real>, Vector3<Real>, Real) {
    let points: Vec<Point3<Real>> = face.iter().map(|&i| vertices[i]).collect();

    let newell = points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .fold(Vector3::zeros(), |acc, (curr, next)| {
            acc + curr.coords.cross(&next.coords)
        });
    let double_area = newell.norm();
    let normal = if double_area > 0.0 {
        newell / double_area
    } else {
        Vector3::zeros()
    };

    let origin = points[0];
    let mut weighted = Vector3::zeros();
    let mut total = 0.0;
    for pair in points[1..].windows(2) {
        let weight = (pair[0] - origin).cross(&(pair[1] - origin)).norm();
        weighted += (origin.coords + pair[0].coords + pair[1].coords) * (weight / 3.0);
        total += weight;
    }
    let center = if total > 0.0 {
        Point3::from(weighted / total)
    } else {
        Point3::from(points.iter().map(|p| p.coords).sum::<Vector3<Real>>() / points.len() as Real)
    };

    (center, normal, 0.5 * double_area)
}
