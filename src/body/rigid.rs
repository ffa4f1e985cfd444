//! The six canonical rigid-body degrees of freedom.

use crate::errors::BodyError;
use crate::float_types::Real;
use crate::mesh::axis::Axis;
use nalgebra::{Point3, Vector3};
use std::fmt::Display;
use std::str::FromStr;

/// Whether a DOF moves the body along or around an axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DofKind {
    Translation,
    Rotation,
}

/// Canonical rigid-body motions, looked up case-insensitively by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RigidDof {
    Surge,
    Sway,
    Heave,
    Roll,
    Pitch,
    Yaw,
}

impl RigidDof {
    pub const ALL: [RigidDof; 6] = [
        RigidDof::Surge,
        RigidDof::Sway,
        RigidDof::Heave,
        RigidDof::Roll,
        RigidDof::Pitch,
        RigidDof::Yaw,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            RigidDof::Surge => "Surge",
            RigidDof::Sway => "Sway",
            RigidDof::Heave => "Heave",
            RigidDof::Roll => "Roll",
            RigidDof::Pitch => "Pitch",
            RigidDof::Yaw => "Yaw",
        }
    }

    /// Look up a canonical DOF, ignoring ASCII case. No other parsing is
    /// done: `"surge_1"` is not a canonical name.
    pub fn from_name(name: &str) -> Option<RigidDof> {
        RigidDof::ALL
            .into_iter()
            .find(|dof| dof.name().eq_ignore_ascii_case(name))
    }

    pub const fn kind(self) -> DofKind {
        match self {
            RigidDof::Surge | RigidDof::Sway | RigidDof::Heave => DofKind::Translation,
            RigidDof::Roll | RigidDof::Pitch | RigidDof::Yaw => DofKind::Rotation,
        }
    }

    /// The coordinate axis this DOF moves along or turns about.
    pub fn direction(self) -> Vector3<Real> {
        match self {
            RigidDof::Surge | RigidDof::Roll => Vector3::x(),
            RigidDof::Sway | RigidDof::Pitch => Vector3::y(),
            RigidDof::Heave | RigidDof::Yaw => Vector3::z(),
        }
    }

    /// Rotation axis through `center` along [`RigidDof::direction`].
    pub fn axis(self, center: Point3<Real>) -> Axis {
        Axis::new(center, self.direction())
    }
}

impl Display for RigidDof {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RigidDof {
    type Err = BodyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RigidDof::from_name(s).ok_or_else(|| {
            BodyError::Configuration(format!("{s:?} is not a rigid-body DOF name"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_ignores_case() {
        for name in ["Surge", "SURGE", "surge", "sUrGe"] {
            assert_eq!(RigidDof::from_name(name), Some(RigidDof::Surge));
        }
        assert_eq!(RigidDof::from_name("yaw"), Some(RigidDof::Yaw));
    }

    #[test]
    fn lookup_is_exact_otherwise() {
        assert_eq!(RigidDof::from_name("Surge_1"), None);
        assert_eq!(RigidDof::from_name(" heave"), None);
        assert!("rotation".parse::<RigidDof>().is_err());
    }

    #[test]
    fn kinds_and_directions() {
        assert_eq!(RigidDof::Heave.kind(), DofKind::Translation);
        assert_eq!(RigidDof::Pitch.kind(), DofKind::Rotation);
        assert_eq!(RigidDof::Pitch.direction(), Vector3::y());
        let center = Point3::new(1.0, 2.0, 3.0);
        assert_eq!(RigidDof::Yaw.axis(center).point, center);
    }
}
