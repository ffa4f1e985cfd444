//! Scalar type and geometric tolerance, chosen by the `f64`/`f32` features.

#[cfg(feature = "f64")]
pub use parry3d_f64 as parry3d;
#[cfg(feature = "f64")]
pub use core::f64::consts::{FRAC_PI_2, PI, TAU};
#[cfg(feature = "f64")]
pub type Real = f64;

#[cfg(feature = "f32")]
pub use parry3d;
#[cfg(feature = "f32")]
pub use core::f32::consts::{FRAC_PI_2, PI, TAU};
#[cfg(feature = "f32")]
pub type Real = f32;

use std::sync::OnceLock;

/// Distance below which a vertex lies *on* a clipping plane, and length below
/// which an axis, a plane normal or a translation direction is degenerate.
///
/// Fixed once: by [`set_tolerance`] if it is called before the first read,
/// otherwise on first read from `HYDROBODY_TOLERANCE` at build time if it
/// holds a positive number, otherwise to the precision default.
static TOLERANCE: OnceLock<Real> = OnceLock::new();

#[cfg(feature = "f64")]
const DEFAULT_TOLERANCE: Real = 1e-6;
#[cfg(feature = "f32")]
const DEFAULT_TOLERANCE: Real = 1e-4;

/// A usable tolerance: finite and no smaller than the machine epsilon.
fn sanitized(value: Real) -> Option<Real> {
    (value.is_finite() && value > 0.0).then(|| value.max(Real::EPSILON))
}

pub fn tolerance() -> Real {
    *TOLERANCE.get_or_init(|| {
        let Some(raw) = option_env!("HYDROBODY_TOLERANCE") else {
            return DEFAULT_TOLERANCE;
        };
        match raw.parse::<Real>().ok().and_then(sanitized) {
            Some(value) => value,
            None => {
                log::warn!("ignoring HYDROBODY_TOLERANCE={raw:?}: not a positive number");
                DEFAULT_TOLERANCE
            },
        }
    })
}

/// Fix the tolerance before anything reads it,
/// e.g. `hydrobody::float_types::set_tolerance(1e-8)`.
///
/// Returns `false`, leaving the tolerance unchanged, if it was already fixed
/// or `value` is not a positive finite number.
pub fn set_tolerance(value: Real) -> bool {
    match sanitized(value) {
        Some(value) => TOLERANCE.set(value).is_ok(),
        None => false,
    }
}
