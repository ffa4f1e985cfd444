//! Floating bodies for **boundary-element marine hydrodynamics**.
//!
//! A [`FloatingBody`] couples a polygonal [`Mesh`](mesh::Mesh) with named
//! degrees of freedom (DOFs): one motion vector per face for each way the body
//! can move. Bodies can be mirrored, rotated and translated (the DOFs follow
//! the linear part of the map), clipped at the free surface or the sea bottom
//! (the DOFs follow the same face selection), copied, and joined into one
//! body whose DOF names are prefixed by the name of the body they came from.
//!
//! # Features
//! #### Default
//! - **f64**: use f64 as Real
//!
//! #### Optional
//! - **f32**: use f32 as Real, this conflicts with f64
//! - **parallel**: use rayon to evaluate face geometry and rotation DOFs
//!
//! # Example
//! ```
//! use hydrobody::{FloatingBody, shapes::SphereParams, traits::Transform};
//!
//! let mut sphere = FloatingBody::sphere(&SphereParams {
//!     name: Some("sphere".to_string()),
//!     ..Default::default()
//! });
//! sphere.add_translation_dof(None, Some("Heave")).unwrap();
//! sphere.keep_immersed_part(0.0, f64::NEG_INFINITY);
//!
//! let other = sphere.copy(Some("other")).translated_x(5.0);
//! let both = sphere.join_bodies(&[&other]).unwrap();
//! assert_eq!(both.dofs().names().collect::<Vec<_>>(), ["other__Heave", "sphere__Heave"]);
//! ```

#![forbid(unsafe_code)]
#![deny(unused)]
#![warn(clippy::missing_const_for_fn, clippy::approx_constant, clippy::all)]

pub mod body;
pub mod errors;
pub mod float_types;
pub mod mesh;
pub mod shapes;
pub mod traits;

#[cfg(any(all(feature = "f64", feature = "f32"), not(any(feature = "f64", feature = "f32"))))]
compile_error!("Either 'f64' or 'f32' feature must be specified, but not both");

pub use body::FloatingBody;
pub use errors::BodyError;
pub use traits::Transform;
