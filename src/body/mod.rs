//! `FloatingBody`: a mesh together with its named degrees of freedom.
//!
//! Every DOF holds one vector per face, so the mesh and the DOF table are
//! always transformed, clipped and sliced together.

use crate::errors::BodyError;
use crate::float_types::{Real, tolerance};
use crate::mesh::{Mesh, axis::Axis, plane::Plane};
use crate::traits::Transform;
use nalgebra::{Matrix4, Point3, Vector3};
use std::fmt::Display;
use std::sync::atomic::{AtomicUsize, Ordering};

pub mod dofs;
pub mod rigid;

use dofs::{DofDefinition, DofField, Dofs, rotation_field, translation_field, zero_extended};
use rigid::{DofKind, RigidDof};

static BODY_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// A fresh `body_{n}` name.
fn next_body_name() -> String {
    format!("body_{}", BODY_COUNTER.fetch_add(1, Ordering::Relaxed))
}

/// Separator between a body name and a DOF name in joined bodies.
pub const DOF_NAME_SEPARATOR: &str = "__";

/// A rigid or deformable body floating in water.
#[derive(Clone, Debug, PartialEq)]
pub struct FloatingBody {
    mesh: Mesh,
    name: String,
    dofs: Dofs,
    /// Reference point: default rotation center of the rigid-body DOFs.
    center: Option<Point3<Real>>,
}

impl FloatingBody {
    /// A body without DOFs nor center, with an auto-generated name.
    pub fn new(mesh: Mesh) -> Self {
        FloatingBody {
            mesh,
            name: next_body_name(),
            dofs: Dofs::new(),
            center: None,
        }
    }

    pub fn with_name(mesh: Mesh, name: impl Into<String>) -> Self {
        FloatingBody::new(mesh).named(name)
    }

    pub fn with_center(mesh: Mesh, center: Point3<Real>) -> Self {
        FloatingBody::new(mesh).centered_at(center)
    }

    /// Builder-style renaming.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Builder-style center assignment.
    pub fn centered_at(mut self, center: Point3<Real>) -> Self {
        self.center = Some(center);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub const fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub const fn center(&self) -> Option<Point3<Real>> {
        self.center
    }

    pub const fn dofs(&self) -> &Dofs {
        &self.dofs
    }

    /// Mutable access to the DOF table, to remove or clear DOFs.
    pub const fn dofs_mut(&mut self) -> &mut Dofs {
        &mut self.dofs
    }

    pub fn nb_dofs(&self) -> usize {
        self.dofs.len()
    }

    /// The point rigid-body rotations are taken about by default.
    pub fn rotation_center(&self) -> Point3<Real> {
        self.center.unwrap_or_else(Point3::origin)
    }

    /// Register an arbitrary DOF field (one vector per face), overwriting any
    /// DOF of the same name.
    ///
    /// Faces later cut by a clip keep the row of the face they were cut from.
    pub fn add_dof(&mut self, name: impl Into<String>, field: DofField) -> Result<(), BodyError> {
        self.insert_dof(name.into(), field, DofDefinition::Custom)
    }

    fn insert_dof(
        &mut self,
        name: String,
        field: DofField,
        definition: DofDefinition,
    ) -> Result<(), BodyError> {
        if field.len() != self.mesh.nb_faces() {
            return Err(BodyError::ShapeMismatch {
                expected: self.mesh.nb_faces(),
                found: field.len(),
            });
        }
        log::debug!("{}: adding dof {name:?}", self.name);
        self.dofs.set(name, field, definition);
        Ok(())
    }

    /// Register a translation along `direction`.
    ///
    /// Without a direction, `name` must be one of Surge, Sway, Heave (any
    /// case) and the matching coordinate axis is used; the DOF is stored under
    /// `name` exactly as given. Without a name, the DOF is called
    /// `dof_{n}_translation`.
    ///
    /// ```
    /// # use hydrobody::{FloatingBody, mesh::Mesh};
    /// # use nalgebra::Vector3;
    /// let nodes = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
    /// let mesh = Mesh::from_arrays(&nodes, &[[0, 1, 2]]).unwrap();
    /// let mut body = FloatingBody::with_name(mesh, "triangle");
    /// body.add_translation_dof(None, Some("HEAVE")).unwrap();
    /// assert_eq!(body.dofs()["HEAVE"], vec![Vector3::z()]);
    /// ```
    pub fn add_translation_dof(
        &mut self,
        direction: Option<Vector3<Real>>,
        name: Option<&str>,
    ) -> Result<(), BodyError> {
        let direction = match (direction, name) {
            (Some(direction), _) => direction,
            (None, Some(name)) => match RigidDof::from_name(name) {
                Some(dof) if dof.kind() == DofKind::Translation => dof.direction(),
                _ => {
                    return Err(BodyError::Configuration(format!(
                        "Cannot infer a translation direction from {name:?}"
                    )));
                },
            },
            (None, None) => {
                return Err(BodyError::Configuration(
                    "A translation DOF needs a direction or a rigid-body DOF name".to_string(),
                ));
            },
        };
        if direction.norm() < tolerance() {
            return Err(BodyError::Configuration(format!(
                "Translation direction {direction:?} has zero length"
            )));
        }

        let name = name
            .map(str::to_owned)
            .unwrap_or_else(|| format!("dof_{}_translation", self.dofs.len()));
        let field = translation_field(direction, self.mesh.nb_faces());
        self.insert_dof(name, field, DofDefinition::Translation(direction))
    }

    /// Register a rotation about `axis`.
    ///
    /// Without an axis, `name` must be one of Roll, Pitch, Yaw (any case) and
    /// the matching coordinate axis through [`FloatingBody::rotation_center`]
    /// is used. Without a name, the DOF is called `dof_{n}_rotation`.
    pub fn add_rotation_dof(
        &mut self,
        axis: Option<Axis>,
        name: Option<&str>,
    ) -> Result<(), BodyError> {
        let axis = match (axis, name) {
            (Some(axis), _) => axis,
            (None, Some(name)) => match RigidDof::from_name(name) {
                Some(dof) if dof.kind() == DofKind::Rotation => dof.axis(self.rotation_center()),
                _ => {
                    return Err(BodyError::Configuration(format!(
                        "Cannot infer a rotation axis from {name:?}"
                    )));
                },
            },
            (None, None) => {
                return Err(BodyError::Configuration(
                    "A rotation DOF needs an axis or a rigid-body DOF name".to_string(),
                ));
            },
        };
        if axis.is_degenerate() {
            return Err(BodyError::Configuration(format!(
                "Rotation axis {axis:?} has no direction"
            )));
        }

        let name = name
            .map(str::to_owned)
            .unwrap_or_else(|| format!("dof_{}_rotation", self.dofs.len()));
        let field = rotation_field(&axis, self.mesh.faces_centers());
        self.insert_dof(name, field, DofDefinition::Rotation(axis))
    }

    /// Register Surge, Sway, Heave, Roll, Pitch and Yaw, rotations being about
    /// [`FloatingBody::rotation_center`].
    pub fn add_all_rigid_body_dofs(&mut self) {
        let center = self.rotation_center();
        for dof in RigidDof::ALL {
            let (field, definition) = match dof.kind() {
                DofKind::Translation => (
                    translation_field(dof.direction(), self.mesh.nb_faces()),
                    DofDefinition::Translation(dof.direction()),
                ),
                DofKind::Rotation => {
                    let axis = dof.axis(center);
                    (
                        rotation_field(&axis, self.mesh.faces_centers()),
                        DofDefinition::Rotation(axis),
                    )
                },
            };
            self.dofs.set(dof.name(), field, definition);
        }
        log::debug!("{}: added the six rigid-body dofs about {center}", self.name);
    }

    /// Deep copy under a new name (auto-generated if `None`).
    pub fn copy(&self, name: Option<&str>) -> FloatingBody {
        let mut copy = self.clone();
        copy.name = name.map_or_else(next_body_name, str::to_owned);
        copy
    }

    /// A new body made of the faces listed in `faces_ids`, with the matching
    /// rows of every DOF. The center is kept.
    pub fn extract_faces(&self, faces_ids: &[usize]) -> Result<FloatingBody, BodyError> {
        let mesh = self.mesh.extract_faces(faces_ids)?;
        let mut dofs = self.dofs.clone();
        dofs.for_each_dof(|dof| dof.select_rows(faces_ids));
        Ok(FloatingBody {
            mesh,
            name: format!("{}_extract", self.name),
            dofs,
            center: self.center,
        })
    }

    /// Keep only the part of the body behind `plane`; see [`Mesh::clipped`].
    ///
    /// Translation and rotation DOFs end up exactly as if they had been
    /// added to the clipped body: rotations are evaluated again at the center
    /// of every face the plane cuts. Custom fields give a cut face the row of
    /// the face it was cut from.
    pub fn clip(&mut self, plane: &Plane) {
        let clipped = self.mesh.clipped(plane);
        self.dofs.for_each_dof(|dof| dof.follow_clip(&clipped));
        self.mesh = clipped.mesh;
    }

    /// Copy of the body clipped by `plane`.
    pub fn clipped(&self, plane: &Plane) -> FloatingBody {
        let mut copy = self.clone();
        copy.clip(plane);
        copy
    }

    /// Remove everything above `z = free_surface` and, if `sea_bottom` is
    /// finite, below `z = sea_bottom`.
    pub fn keep_immersed_part(&mut self, free_surface: Real, sea_bottom: Real) {
        self.clip(&Plane::from_normal(Vector3::z(), free_surface));
        if sea_bottom.is_finite() {
            self.clip(&Plane::from_normal(-Vector3::z(), -sea_bottom));
        }
    }

    /// Copy of the body restricted to `sea_bottom ≤ z ≤ free_surface`.
    pub fn immersed_part(&self, free_surface: Real, sea_bottom: Real) -> FloatingBody {
        let mut copy = self.clone();
        copy.keep_immersed_part(free_surface, sea_bottom);
        copy
    }

    /// Union of `bodies`: meshes are concatenated and each DOF is renamed
    /// `{body}__{dof}` and extended with zeros on the faces of the other
    /// bodies. The joined body has no center, and its DOFs are custom fields.
    pub fn join(bodies: &[&FloatingBody]) -> Result<FloatingBody, BodyError> {
        let meshes: Vec<&Mesh> = bodies.iter().map(|body| &body.mesh).collect();
        let mesh = Mesh::join(&meshes);
        let nb_faces = mesh.nb_faces();

        let mut dofs = Dofs::new();
        let mut offset = 0;
        for body in bodies {
            for (dof_name, field) in body.dofs.iter() {
                let name = format!("{}{DOF_NAME_SEPARATOR}{dof_name}", body.name);
                if dofs.contains(&name) {
                    return Err(BodyError::DofNameCollision(name));
                }
                let field = zero_extended(field, offset, nb_faces);
                dofs.set(name, field, DofDefinition::Custom);
            }
            offset += body.mesh.nb_faces();
        }

        let name = if bodies.is_empty() {
            next_body_name()
        } else {
            bodies
                .iter()
                .map(|body| body.name.as_str())
                .collect::<Vec<_>>()
                .join("+")
        };
        log::debug!("joined {} bodies into {name} ({} dofs)", bodies.len(), dofs.len());

        Ok(FloatingBody {
            mesh,
            name,
            dofs,
            center: None,
        })
    }

    /// [`FloatingBody::join`] of `self` followed by `others`.
    pub fn join_bodies(&self, others: &[&FloatingBody]) -> Result<FloatingBody, BodyError> {
        let mut bodies = Vec::with_capacity(others.len() + 1);
        bodies.push(self);
        bodies.extend_from_slice(others);
        FloatingBody::join(&bodies)
    }

    pub fn volume(&self) -> Real {
        self.mesh.volume()
    }

    pub fn surface_area(&self) -> Real {
        self.mesh.surface_area()
    }
}

impl Transform for FloatingBody {
    /// The mesh and the center follow the affine map; DOF vectors follow its
    /// linear part only.
    fn transform_in_place(&mut self, matrix: &Matrix4<Real>) {
        self.mesh.transform_in_place(matrix);
        self.center = self.center.map(|c| matrix.transform_point(&c));
        self.dofs.for_each_dof(|dof| dof.transform(matrix));
    }
}

impl Display for FloatingBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::float_types::PI;
    use approx::assert_relative_eq;

    fn one_face() -> FloatingBody {
        let mesh = Mesh::from_arrays(
            &[[0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0, 1.0], [1.0, 0.0, 0.0]],
            &[[0, 1, 2, 3]],
        )
        .unwrap();
        FloatingBody::with_name(mesh, "one_face")
    }

    #[test]
    fn auto_names_are_unique() {
        let a = FloatingBody::new(Mesh::empty());
        let b = FloatingBody::new(Mesh::empty());
        assert_ne!(a.name(), b.name());
        assert!(a.name().starts_with("body_"));
    }

    #[test]
    fn unnamed_dofs_are_numbered() {
        let mut body = one_face();
        body.add_translation_dof(Some(Vector3::x()), None).unwrap();
        body.add_rotation_dof(Some(Axis::oz()), None).unwrap();
        assert!(body.dofs().contains("dof_0_translation"));
        assert!(body.dofs().contains("dof_1_rotation"));
    }

    #[test]
    fn inference_is_kind_checked() {
        let mut body = one_face();
        assert!(matches!(
            body.add_translation_dof(None, Some("Pitch")),
            Err(BodyError::Configuration(_))
        ));
        assert!(matches!(
            body.add_rotation_dof(None, Some("Heave")),
            Err(BodyError::Configuration(_))
        ));
        assert!(matches!(
            body.add_translation_dof(None, None),
            Err(BodyError::Configuration(_))
        ));
        assert!(matches!(
            body.add_translation_dof(Some(Vector3::zeros()), Some("still")),
            Err(BodyError::Configuration(_))
        ));
        assert!(body.dofs().is_empty());
    }

    #[test]
    fn custom_field_length_is_checked() {
        let mut body = one_face();
        assert_eq!(
            body.add_dof("flex", vec![Vector3::z(); 2]),
            Err(BodyError::ShapeMismatch { expected: 1, found: 2 })
        );
        body.add_dof("flex", vec![Vector3::z()]).unwrap();
        assert_eq!(body.nb_dofs(), 1);
    }

    #[test]
    fn rotation_about_center() {
        let mut body = one_face().centered_at(Point3::new(0.5, 0.0, 0.0));
        body.add_rotation_dof(None, Some("yaw")).unwrap();
        // face center (0.5, 0, 0.5) is on the yaw axis
        assert_relative_eq!(body.dofs()["yaw"][0], Vector3::zeros());
        body.add_rotation_dof(None, Some("Roll")).unwrap();
        assert_relative_eq!(body.dofs()["Roll"][0], Vector3::new(0.0, -0.5, 0.0));
    }

    #[test]
    fn translation_moves_center_not_dofs() {
        let mut body = one_face().centered_at(Point3::origin());
        body.add_translation_dof(None, Some("Surge")).unwrap();
        body.translate_z(-2.0);
        assert_eq!(body.center(), Some(Point3::new(0.0, 0.0, -2.0)));
        assert_eq!(body.dofs()["Surge"], vec![Vector3::x()]);
    }

    #[test]
    fn mirror_flips_normal_component_of_dofs() {
        let mut body = one_face();
        body.add_translation_dof(Some(Vector3::new(1.0, 1.0, 0.0)), Some("diag")).unwrap();
        let mirrored = body.mirrored(&Plane::yoz());
        assert_relative_eq!(mirrored.dofs()["diag"][0], Vector3::new(-1.0, 1.0, 0.0));
    }

    #[test]
    fn rotation_turns_dofs() {
        let mut body = one_face();
        body.add_translation_dof(None, Some("Surge")).unwrap();
        body.rotate(&Axis::oz(), PI / 2.0);
        assert_relative_eq!(body.dofs()["Surge"][0], Vector3::y(), epsilon = 1e-12);
    }

    #[test]
    fn extract_faces_slices_dofs() {
        let mesh = Mesh::from_arrays(
            &[
                [0.0, 0.0, -1.0],
                [1.0, 0.0, -1.0],
                [0.0, 1.0, -1.0],
                [0.0, 0.0, 1.0],
                [1.0, 0.0, 1.0],
                [0.0, 1.0, 1.0],
            ],
            &[[0, 1, 2], [3, 4, 5]],
        )
        .unwrap();
        let mut body = FloatingBody::with_name(mesh, "pair").centered_at(Point3::origin());
        body.add_rotation_dof(None, Some("Roll")).unwrap();
        let upper = body.extract_faces(&[1]).unwrap();
        assert_eq!(upper.name(), "pair_extract");
        assert_eq!(upper.center(), Some(Point3::origin()));
        assert_eq!(upper.dofs()["Roll"], vec![body.dofs()["Roll"][1]]);
        assert!(matches!(
            body.extract_faces(&[5]),
            Err(BodyError::FaceIndexOutOfRange { index: 5, nb_faces: 2 })
        ));
    }

    #[test]
    fn join_rejects_colliding_names() {
        let mut a = one_face();
        a.add_translation_dof(None, Some("Heave")).unwrap();
        let b = a.copy(Some("one_face"));
        assert_eq!(
            a.join_bodies(&[&b]),
            Err(BodyError::DofNameCollision("one_face__Heave".to_string()))
        );
    }

    #[test]
    fn display_is_name() {
        assert_eq!(one_face().to_string(), "one_face");
    }
}
