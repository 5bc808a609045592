//! Two-body elliptic motion: Kepler's equation and Keplerian elements → Cartesian state.

use nalgebra::Vector3;

use super::constants::{Mu, Radian, DPI};
use crate::porkchop_errors::PorkchopError;

const KEPLER_MAX_ITER: usize = 50;
const KEPLER_TOLERANCE: f64 = 1e-14;

/// Returns the principal value of an angle in radians, in [0, 2π).
pub(crate) fn principal_angle(a: f64) -> f64 {
    a.rem_euclid(DPI)
}

/// Returns the difference `a - b` reduced to [-π, π].
pub(crate) fn angle_diff(a: f64, b: f64) -> f64 {
    let diff = principal_angle(a) - principal_angle(b);
    if diff > std::f64::consts::PI {
        diff - DPI
    } else if diff < -std::f64::consts::PI {
        diff + DPI
    } else {
        diff
    }
}

/// Solve `E - e sin E = M` for the eccentric anomaly (elliptic orbits, `0 ≤ e < 1`).
///
/// Newton iterations started from `E₀ = M + e sin M` (or `π` for high eccentricities).
pub fn solve_kepler(mean_anomaly: Radian, e: f64) -> Result<Radian, PorkchopError> {
    if !(0.0..1.0).contains(&e) {
        return Err(PorkchopError::KeplerNoConvergence(e));
    }

    let m = angle_diff(mean_anomaly, 0.0);
    let mut ecc_anomaly = if e < 0.8 {
        m + e * m.sin()
    } else {
        std::f64::consts::PI * m.signum()
    };

    for _ in 0..KEPLER_MAX_ITER {
        let f = ecc_anomaly - e * ecc_anomaly.sin() - m;
        let step = f / (1.0 - e * ecc_anomaly.cos());
        ecc_anomaly -= step;
        if step.abs() < KEPLER_TOLERANCE {
            return Ok(ecc_anomaly);
        }
    }

    Err(PorkchopError::KeplerNoConvergence(e))
}

/// Classical elements of an elliptic orbit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EllipticElements {
    /// Semi-major axis (km)
    pub semi_major_axis: f64,
    pub eccentricity: f64,
    pub inclination: Radian,
    pub ascending_node_longitude: Radian,
    pub periapsis_argument: Radian,
    pub mean_anomaly: Radian,
}

impl EllipticElements {
    /// Position (km) and velocity (km/s) in the reference plane of the elements.
    pub fn to_state(&self, mu: Mu) -> Result<(Vector3<f64>, Vector3<f64>), PorkchopError> {
        let a = self.semi_major_axis;
        let e = self.eccentricity;
        let ecc_anomaly = solve_kepler(self.mean_anomaly, e)?;

        let (sin_e, cos_e) = ecc_anomaly.sin_cos();
        let sqrt_1me2 = (1.0 - e * e).sqrt();
        let r = a * (1.0 - e * cos_e);

        // perifocal frame
        let x_pf = a * (cos_e - e);
        let y_pf = a * sqrt_1me2 * sin_e;
        let v_scale = (mu * a).sqrt() / r;
        let vx_pf = -v_scale * sin_e;
        let vy_pf = v_scale * sqrt_1me2 * cos_e;

        let (so, co) = self.ascending_node_longitude.sin_cos();
        let (sw, cw) = self.periapsis_argument.sin_cos();
        let (si, ci) = self.inclination.sin_cos();

        let p = Vector3::new(co * cw - so * sw * ci, so * cw + co * sw * ci, sw * si);
        let q = Vector3::new(-co * sw - so * cw * ci, -so * sw + co * cw * ci, cw * si);

        Ok((p * x_pf + q * y_pf, p * vx_pf + q * vy_pf))
    }
}
