//! Frame orientations supported by the body sets and the rotations between them.
//!
//! Only the two inertial orientations used by planetary ephemerides are handled:
//! * `J2000`: mean equator and equinox of J2000 (the native frame of the JPL DE kernels),
//! * `ECLIPJ2000`: mean ecliptic and equinox of J2000 (the native frame of the mean elements).
//!
//! Both share the same x-axis (the J2000 equinox), the rotation between them is a single
//! rotation about x by the mean obliquity at J2000.

use std::fmt;
use std::str::FromStr;

use nalgebra::{Matrix3, Rotation3, Vector3};
use serde::{Deserialize, Serialize};

use crate::constants::{Radian, RADSEC, T2000};
use crate::porkchop_errors::PorkchopError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FrameOrientation {
    /// Earth mean equator and equinox of J2000
    #[default]
    #[serde(rename = "J2000")]
    J2000,
    /// Mean ecliptic and equinox of J2000
    #[serde(rename = "ECLIPJ2000")]
    EclipJ2000,
}

impl FromStr for FrameOrientation {
    type Err = PorkchopError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "J2000" | "EME2000" => Ok(FrameOrientation::J2000),
            "ECLIPJ2000" | "ECLIPTIC" => Ok(FrameOrientation::EclipJ2000),
            other => Err(PorkchopError::InvalidConfig(format!(
                "unknown frame orientation: {other}"
            ))),
        }
    }
}

impl fmt::Display for FrameOrientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameOrientation::J2000 => write!(f, "J2000"),
            FrameOrientation::EclipJ2000 => write!(f, "ECLIPJ2000"),
        }
    }
}

/// Mean obliquity of the ecliptic (IAU 1976) at a given epoch.
///
/// ```text
/// ε(t) = ε₀ + ε₁·T + ε₂·T² + ε₃·T³,   T = (tjm - T2000) / 36525
/// ```
///
/// Arguments
/// -----------------
/// * `tjm`: Modified Julian Date (TT)
///
/// Return
/// ----------
/// * The obliquity in radians.
pub fn obleq(tjm: f64) -> Radian {
    let ob0 = ((23.0 * 3600.0 + 26.0 * 60.0) + 21.448) * RADSEC;
    let ob1 = -46.815 * RADSEC;
    let ob2 = -0.0006 * RADSEC;
    let ob3 = 0.00181 * RADSEC;

    let t = (tjm - T2000) / 36525.0;

    ((ob3 * t + ob2) * t + ob1) * t + ob0
}

/// Active rotation of angle `alpha` (radians) about the principal axis `k` (0 = X, 1 = Y, 2 = Z).
///
/// # Panics
///
/// Panics if `k > 2`.
pub fn rotmt(alpha: f64, k: usize) -> Matrix3<f64> {
    let axis = match k {
        0 => Vector3::x_axis(),
        1 => Vector3::y_axis(),
        2 => Vector3::z_axis(),
        _ => panic!("**** ROTMT: invalid axis index {k} (must be 0,1,2) ****"),
    };

    Rotation3::from_axis_angle(&axis, alpha).into()
}

/// Rotation matrix `R` such that `x_to = R · x_from`.
///
/// See also
/// ------------
/// * [`obleq`] – obliquity used for the equator/ecliptic tilt
pub fn rotation_between(from: FrameOrientation, to: FrameOrientation) -> Matrix3<f64> {
    let eps = obleq(T2000);
    match (from, to) {
        (FrameOrientation::J2000, FrameOrientation::EclipJ2000) => rotmt(-eps, 0),
        (FrameOrientation::EclipJ2000, FrameOrientation::J2000) => rotmt(eps, 0),
        _ => Matrix3::identity(),
    }
}

/// Express a vector given in `from` in the `to` orientation.
pub fn rotate_vector(v: &Vector3<f64>, from: FrameOrientation, to: FrameOrientation) -> Vector3<f64> {
    if from == to {
        *v
    } else {
        rotation_between(from, to) * v
    }
}
