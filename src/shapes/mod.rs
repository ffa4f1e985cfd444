//! Mesh generators for simple hull shapes, and the matching body factories.

use crate::body::FloatingBody;
use crate::float_types::{PI, Real, TAU};
use crate::mesh::Mesh;
use nalgebra::Point3;

impl Mesh {
    /// A sphere made of `ntheta` bands from the south pole to the north pole,
    /// each split into `nphi` sectors around the vertical axis.
    ///
    /// Bands touching a pole are triangles, the others quadrangles. With an
    /// even `ntheta` a ring of vertices lies exactly on the equator.
    pub fn sphere(radius: Real, center: Point3<Real>, ntheta: usize, nphi: usize) -> Mesh {
        let ntheta = ntheta.max(2);
        let nphi = nphi.max(3);

        let mut vertices = Vec::with_capacity((ntheta - 1) * nphi + 2);
        vertices.push(center + Point3::new(0.0, 0.0, -radius).coords);
        for i in 1..ntheta {
            let theta = PI * i as Real / ntheta as Real;
            let z = -radius * theta.cos();
            let ring_radius = radius * theta.sin();
            for j in 0..nphi {
                let phi = TAU * j as Real / nphi as Real;
                vertices.push(Point3::new(
                    center.x + ring_radius * phi.cos(),
                    center.y + ring_radius * phi.sin(),
                    center.z + z,
                ));
            }
        }
        vertices.push(center + Point3::new(0.0, 0.0, radius).coords);

        let south_pole = 0;
        let north_pole = vertices.len() - 1;
        let ring = |i: usize, j: usize| 1 + (i - 1) * nphi + j % nphi;

        let mut faces = Vec::with_capacity(ntheta * nphi);
        for j in 0..nphi {
            faces.push(vec![south_pole, ring(1, j + 1), ring(1, j)]);
        }
        for i in 1..ntheta - 1 {
            for j in 0..nphi {
                faces.push(vec![ring(i, j), ring(i, j + 1), ring(i + 1, j + 1), ring(i + 1, j)]);
            }
        }
        for j in 0..nphi {
            faces.push(vec![ring(ntheta - 1, j), ring(ntheta - 1, j + 1), north_pole]);
        }

        Mesh::from_parts_unchecked(vertices, faces)
    }

    /// A closed cylinder whose axis is parallel to x.
    ///
    /// The lateral surface has `nx` panels along the axis and `ntheta` around
    /// it; each end disc is made of `nr` rings.
    pub fn horizontal_cylinder(
        length: Real,
        radius: Real,
        center: Point3<Real>,
        nx: usize,
        ntheta: usize,
        nr: usize,
    ) -> Mesh {
        let nx = nx.max(1);
        let ntheta = ntheta.max(3);
        let nr = nr.max(1);

        let mut vertices = Vec::new();
        let mut faces = Vec::new();

        let point = |x: Real, r: Real, j: usize| {
            let theta = TAU * j as Real / ntheta as Real;
            Point3::new(center.x + x, center.y + r * theta.cos(), center.z + r * theta.sin())
        };

        // Lateral surface
        for k in 0..=nx {
            let x = -length / 2.0 + length * k as Real / nx as Real;
            for j in 0..ntheta {
                vertices.push(point(x, radius, j));
            }
        }
        let lateral = |k: usize, j: usize| k * ntheta + j % ntheta;
        for k in 0..nx {
            for j in 0..ntheta {
                faces.push(vec![
                    lateral(k, j),
                    lateral(k, j + 1),
                    lateral(k + 1, j + 1),
                    lateral(k + 1, j),
                ]);
            }
        }

        // End discs, the +x one wound towards +x and the -x one reversed
        for side in [-1.0, 1.0] {
            let x = side * length / 2.0;
            let disc_center = vertices.len();
            vertices.push(point(x, 0.0, 0));
            let first_ring = vertices.len();
            for m in 1..=nr {
                let r = radius * m as Real / nr as Real;
                for j in 0..ntheta {
                    vertices.push(point(x, r, j));
                }
            }
            let ring = |m: usize, j: usize| first_ring + (m - 1) * ntheta + j % ntheta;

            let mut disc = Vec::with_capacity(nr * ntheta);
            for j in 0..ntheta {
                disc.push(vec![disc_center, ring(1, j), ring(1, j + 1)]);
            }
            for m in 1..nr {
                for j in 0..ntheta {
                    disc.push(vec![ring(m, j), ring(m + 1, j), ring(m + 1, j + 1), ring(m, j + 1)]);
                }
            }
            if side < 0.0 {
                disc.iter_mut().for_each(|face| face.reverse());
            }
            faces.extend(disc);
        }

        Mesh::from_parts_unchecked(vertices, faces)
    }
}

/// Parameters of [`FloatingBody::sphere`].
#[derive(Debug, Clone, PartialEq)]
pub struct SphereParams {
    pub radius: Real,
    pub center: Point3<Real>,
    pub ntheta: usize,
    pub nphi: usize,
    /// Keep only the part below `z = 0`.
    pub clip_free_surface: bool,
    pub name: Option<String>,
}

impl Default for SphereParams {
    fn default() -> Self {
        SphereParams {
            radius: 1.0,
            center: Point3::origin(),
            ntheta: 10,
            nphi: 10,
            clip_free_surface: false,
            name: None,
        }
    }
}

/// Parameters of [`FloatingBody::horizontal_cylinder`].
#[derive(Debug, Clone, PartialEq)]
pub struct HorizontalCylinderParams {
    pub length: Real,
    pub radius: Real,
    pub center: Point3<Real>,
    pub nx: usize,
    pub ntheta: usize,
    pub nr: usize,
    /// Keep only the part below `z = 0`.
    pub clip_free_surface: bool,
    pub name: Option<String>,
}

impl Default for HorizontalCylinderParams {
    fn default() -> Self {
        HorizontalCylinderParams {
            length: 10.0,
            radius: 1.0,
            center: Point3::origin(),
            nx: 10,
            ntheta: 10,
            nr: 2,
            clip_free_surface: false,
            name: None,
        }
    }
}

impl FloatingBody {
    /// A sphere centered on `params.center`, without DOFs.
    pub fn sphere(params: &SphereParams) -> FloatingBody {
        let mesh = Mesh::sphere(params.radius, params.center, params.ntheta, params.nphi);
        finish_factory(mesh, params.center, params.name.as_deref(), params.clip_free_surface)
    }

    /// A horizontal cylinder centered on `params.center`, without DOFs.
    pub fn horizontal_cylinder(params: &HorizontalCylinderParams) -> FloatingBody {
        let mesh = Mesh::horizontal_cylinder(
            params.length,
            params.radius,
            params.center,
            params.nx,
            params.ntheta,
            params.nr,
        );
        finish_factory(mesh, params.center, params.name.as_deref(), params.clip_free_surface)
    }
}

fn finish_factory(
    mesh: Mesh,
    center: Point3<Real>,
    name: Option<&str>,
    clip_free_surface: bool,
) -> FloatingBody {
    let mut body = FloatingBody::new(mesh).centered_at(center);
    if let Some(name) = name {
        body.set_name(name);
    }
    if clip_free_surface {
        body.keep_immersed_part(0.0, Real::NEG_INFINITY);
    }
    body
}
