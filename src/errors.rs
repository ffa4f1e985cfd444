//! Errors raised while building or manipulating floating bodies

/// All the ways a body, mesh or DOF operation can fail
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BodyError {
    /// A DOF registration could not determine its direction or axis
    #[error("(Configuration) {0}")]
    Configuration(String),
    /// Two DOFs of a joined body would share the same name
    #[error("(DofNameCollision) the joined body would hold two DOFs named {0:?}")]
    DofNameCollision(String),
    /// A per-face array does not have one entry per face
    #[error("(ShapeMismatch) expected {expected} rows (one per face), found {found}")]
    ShapeMismatch { expected: usize, found: usize },
    /// A face index refers past the end of the face list
    #[error("(FaceIndexOutOfRange) face {index} does not exist (nb_faces = {nb_faces})")]
    FaceIndexOutOfRange { index: usize, nb_faces: usize },
    /// The vertex/face arrays do not describe a valid mesh
    #[error("(InvalidMesh) {0}")]
    InvalidMesh(String),
}

// Mesh::new "Face {} has only {} vertices"
// Mesh::new "Face {} refers to vertex {} (nb_vertices = {})"
// FloatingBody::add_translation_dof "Cannot infer a translation direction from {:?}"
// FloatingBody::add_rotation_dof "Cannot infer a rotation axis from {:?}"
