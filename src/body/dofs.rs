//! Named DOF table and the per-face vector fields it stores.

use crate::float_types::{Real, tolerance};
use crate::mesh::{ClippedMesh, axis::Axis};
use crate::traits::{Transform, linear_part, reverses_orientation};
use nalgebra::{Matrix3, Matrix4, Point3, Vector3};
use std::collections::{BTreeMap, btree_map};
use std::ops::Index;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// One 3-vector per mesh face: the velocity of that face under a unit
/// actuation of the DOF.
pub type DofField = Vec<Vector3<Real>>;

/// How a DOF field was built, so that it can be evaluated again on faces
/// created by clipping.
#[derive(Debug, Clone, PartialEq)]
pub enum DofDefinition {
    /// The same vector on every face.
    Translation(Vector3<Real>),
    /// `axis.direction × (c − axis.point)` at each face center `c`.
    Rotation(Axis),
    /// Any other field. A face cut by a clip keeps the row of the face it
    /// was cut from.
    Custom,
}

/// A DOF field together with its definition.
#[derive(Debug, Clone, PartialEq)]
pub struct Dof {
    field: DofField,
    definition: DofDefinition,
}

impl Dof {
    pub(crate) const fn new(field: DofField, definition: DofDefinition) -> Self {
        Dof { field, definition }
    }

    pub fn field(&self) -> &DofField {
        &self.field
    }

    pub const fn definition(&self) -> &DofDefinition {
        &self.definition
    }

    /// Rows picked by `faces_ids`, in that order.
    pub(crate) fn select_rows(&mut self, faces_ids: &[usize]) {
        self.field = select_rows(&self.field, faces_ids);
    }

    /// Follow a clip: every retained face takes the row of its parent face,
    /// then rotation rows of the faces that were cut are evaluated again at
    /// their new centers.
    pub(crate) fn follow_clip(&mut self, clipped: &ClippedMesh) {
        self.select_rows(&clipped.faces_ids);
        if let DofDefinition::Rotation(axis) = &self.definition {
            if clipped.split_faces.is_empty() {
                return;
            }
            let centers = clipped.mesh.faces_centers();
            for &row in &clipped.split_faces {
                self.field[row] = axis.angular_velocity_at(&centers[row]);
            }
        }
    }

    /// Apply the linear part of `matrix` to the field and carry the
    /// definition along.
    ///
    /// A rotation stays a rotation only under isometries; under a mirror its
    /// axis direction is reversed so that the velocity field is the mirrored
    /// one. Any other map turns it into a custom field.
    pub(crate) fn transform(&mut self, matrix: &Matrix4<Real>) {
        let linear = linear_part(matrix);
        transform_field(&mut self.field, &linear);
        self.definition = match &self.definition {
            DofDefinition::Translation(direction) => DofDefinition::Translation(linear * direction),
            DofDefinition::Rotation(axis) if is_isometry(&linear) => {
                let mut axis = axis.transformed(matrix);
                if reverses_orientation(matrix) {
                    axis.direction = -axis.direction;
                }
                DofDefinition::Rotation(axis)
            },
            _ => DofDefinition::Custom,
        };
    }
}

fn is_isometry(linear: &Matrix3<Real>) -> bool {
    (linear.transpose() * linear - Matrix3::identity()).norm() < tolerance()
}

/// DOFs of a body, keyed by case-sensitive name.
///
/// Inserting under an existing name overwrites the previous field. Iteration
/// is in name order. Fields can only be added through the owning
/// [`FloatingBody`](crate::body::FloatingBody), which checks their length.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dofs {
    entries: BTreeMap<String, Dof>,
}

impl Dofs {
    pub const fn new() -> Self {
        Dofs {
            entries: BTreeMap::new(),
        }
    }

    /// Store `field` under `name`, returning the field it replaced.
    pub(crate) fn set(
        &mut self,
        name: impl Into<String>,
        field: DofField,
        definition: DofDefinition,
    ) -> Option<DofField> {
        self.entries
            .insert(name.into(), Dof::new(field, definition))
            .map(|dof| dof.field)
    }

    pub fn get(&self, name: &str) -> Option<&DofField> {
        self.entries.get(name).map(Dof::field)
    }

    /// How the DOF called `name` was defined.
    pub fn definition(&self, name: &str) -> Option<&DofDefinition> {
        self.entries.get(name).map(Dof::definition)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<DofField> {
        self.entries.remove(name).map(|dof| dof.field)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.entries.iter(),
        }
    }

    pub(crate) fn for_each_dof(&mut self, f: impl FnMut(&mut Dof)) {
        self.entries.values_mut().for_each(f);
    }
}

impl Index<&str> for Dofs {
    type Output = DofField;

    /// # Panics
    /// If there is no DOF called `name`.
    fn index(&self, name: &str) -> &DofField {
        match self.entries.get(name) {
            Some(dof) => &dof.field,
            None => panic!("no DOF named {name:?}"),
        }
    }
}

/// Iterator over the `(name, field)` pairs of [`Dofs`], in name order.
pub struct Iter<'a> {
    inner: btree_map::Iter<'a, String, Dof>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a DofField);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|(name, dof)| (name.as_str(), &dof.field))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a> IntoIterator for &'a Dofs {
    type Item = (&'a str, &'a DofField);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// The same `direction` on every face.
pub fn translation_field(direction: Vector3<Real>, nb_faces: usize) -> DofField {
    vec![direction; nb_faces]
}

/// `axis.direction × (c − axis.point)` for each face center `c`.
#[cfg(not(feature = "parallel"))]
pub fn rotation_field(axis: &Axis, centers: &[Point3<Real>]) -> DofField {
    centers.iter().map(|c| axis.angular_velocity_at(c)).collect()
}

/// Parallel `axis.direction × (c − axis.point)` for each face center `c`.
#[cfg(feature = "parallel")]
pub fn rotation_field(axis: &Axis, centers: &[Point3<Real>]) -> DofField {
    centers
        .par_iter()
        .map(|c| axis.angular_velocity_at(c))
        .collect()
}

/// Apply the linear part of a transformation to every vector of `field`.
pub(crate) fn transform_field(field: &mut DofField, linear: &Matrix3<Real>) {
    for v in field.iter_mut() {
        *v = linear * *v;
    }
}

/// Rows of `field` picked by `faces_ids`, in that order.
pub(crate) fn select_rows(field: &[Vector3<Real>], faces_ids: &[usize]) -> DofField {
    faces_ids.iter().map(|&id| field[id]).collect()
}

/// `field` placed at `offset` in a field of `len` rows, zero elsewhere.
pub(crate) fn zero_extended(field: &[Vector3<Real>], offset: usize, len: usize) -> DofField {
    let mut extended = vec![Vector3::zeros(); len];
    extended[offset..offset + field.len()].copy_from_slice(field);
    extended
}
