//! # Lambert's problem (zero revolution)
//!
//! Given two position vectors and the time of flight between them, find the conic arc joining
//! them around a central body and return the velocities at both ends.
//!
//! The solver uses the **universal variable** formulation (Bate, Mueller & White; Vallado,
//! *Fundamentals of Astrodynamics*, algorithm 58): the time of flight is a monotonic function of
//! the universal variable `ψ = χ²/a` on the zero-revolution branch `ψ ∈ (−4π, 4π²)`, which is
//! solved by bisection. Elliptic, parabolic and hyperbolic arcs are handled by the same code path
//! through the Stumpff functions `c₂(ψ)` and `c₃(ψ)`.
//!
//! ## Geometry
//!
//! The transfer angle `Δν` is taken in the direction of motion given by [`TransferDirection`]:
//! with [`TransferDirection::Prograde`] the arc moves counter-clockwise seen from `+z` (the
//! orbital angular momentum has a positive `z` component), which is the natural choice for
//! interplanetary transfers in an ecliptic or equatorial frame.
//!
//! A transfer angle of exactly 180° leaves the transfer plane undefined and is reported as
//! [`PorkchopError::LambertSingular`].
//!
//! ## Units
//!
//! Any consistent set: the porkchop evaluator uses km, km/s, s and km³/s².

use nalgebra::Vector3;

use crate::{
    constants::{Mu, DPI, LAMBERT_MAX_ITER, LAMBERT_RTOL},
    porkchop_errors::PorkchopError,
};

/// Sense of motion along the transfer arc.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransferDirection {
    /// Angular momentum along `+z`
    #[default]
    Prograde,
    /// Angular momentum along `−z`
    Retrograde,
}

/// Velocities at both ends of a Lambert arc.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LambertSolution {
    /// Velocity at the first position
    pub v1: Vector3<f64>,
    /// Velocity at the second position
    pub v2: Vector3<f64>,
    /// Number of bisection steps used
    pub iterations: usize,
}

/// Stumpff functions `c₂(ψ)` and `c₃(ψ)`.
///
/// Close to `ψ = 0` the closed forms lose all significant digits, the power series is summed
/// instead.
fn stumpff(psi: f64) -> (f64, f64) {
    const SERIES_LIMIT: f64 = 1e-3;
    const JMAX: usize = 10;

    if psi.abs() < SERIES_LIMIT {
        let contr = 100.0 * f64::EPSILON;
        let mut term2 = 0.5;
        let mut term3 = 1.0 / 6.0;
        let mut c2 = term2;
        let mut c3 = term3;
        for j in 1..=JMAX {
            let j = j as f64;
            term2 *= -psi / ((2.0 * j + 1.0) * (2.0 * j + 2.0));
            term3 *= -psi / ((2.0 * j + 2.0) * (2.0 * j + 3.0));
            c2 += term2;
            c3 += term3;
            if term2.abs() < contr && term3.abs() < contr {
                break;
            }
        }
        (c2, c3)
    } else if psi > 0.0 {
        let sqrt_psi = psi.sqrt();
        (
            (1.0 - sqrt_psi.cos()) / psi,
            (sqrt_psi - sqrt_psi.sin()) / (psi * sqrt_psi),
        )
    } else {
        let sqrt_mpsi = (-psi).sqrt();
        (
            (1.0 - sqrt_mpsi.cosh()) / psi,
            (sqrt_mpsi.sinh() - sqrt_mpsi) / (-psi * sqrt_mpsi),
        )
    }
}

/// Solve the zero-revolution Lambert problem.
///
/// Arguments
/// -----------------
/// * `r1`: position at departure
/// * `r2`: position at arrival
/// * `tof`: time of flight, strictly positive
/// * `mu`: gravitational parameter of the central body
/// * `direction`: sense of motion along the arc
///
/// Return
/// ----------
/// * The [`LambertSolution`] holding the departure and arrival velocities, or
///   - [`PorkchopError::InvalidLambertInput`] for a non-positive time of flight or
///     gravitational parameter, or a position at the origin,
///   - [`PorkchopError::LambertSingular`] for a 180° transfer,
///   - [`PorkchopError::LambertNoConvergence`] if the bisection does not reach the
///     requested time of flight.
pub fn solve_lambert(
    r1: &Vector3<f64>,
    r2: &Vector3<f64>,
    tof: f64,
    mu: Mu,
    direction: TransferDirection,
) -> Result<LambertSolution, PorkchopError> {
    if !(tof > 0.0) || !tof.is_finite() {
        return Err(PorkchopError::InvalidLambertInput(format!(
            "time of flight must be positive, got {tof}"
        )));
    }
    if !(mu > 0.0) {
        return Err(PorkchopError::InvalidLambertInput(format!(
            "gravitational parameter must be positive, got {mu}"
        )));
    }

    let r1_norm = r1.norm();
    let r2_norm = r2.norm();
    if r1_norm == 0.0 || r2_norm == 0.0 {
        return Err(PorkchopError::InvalidLambertInput(
            "position vector at the origin".into(),
        ));
    }

    let cos_dnu = (r1.dot(r2) / (r1_norm * r2_norm)).clamp(-1.0, 1.0);
    let normal_z = r1.cross(r2).z;
    let short_way = match direction {
        TransferDirection::Prograde => normal_z >= 0.0,
        TransferDirection::Retrograde => normal_z < 0.0,
    };
    let tm = if short_way { 1.0 } else { -1.0 };

    let a = tm * (r1_norm * r2_norm * (1.0 + cos_dnu)).sqrt();
    if a.abs() < 1e-12 * (r1_norm * r2_norm).sqrt() {
        return Err(PorkchopError::LambertSingular);
    }

    let sqrt_mu = mu.sqrt();
    let y_of = |psi: f64, c2: f64, c3: f64| r1_norm + r2_norm + a * (psi * c3 - 1.0) / c2.sqrt();

    let mut psi = 0.0;
    let mut psi_low = -4.0 * std::f64::consts::PI;
    let mut psi_up = DPI * DPI;
    let (mut c2, mut c3) = stumpff(psi);

    for iteration in 0..LAMBERT_MAX_ITER {
        let mut y = y_of(psi, c2, c3);

        if a > 0.0 {
            // raise the lower bound until y is positive again
            let mut guard = 0;
            while y < 0.0 {
                if guard == LAMBERT_MAX_ITER {
                    return Err(PorkchopError::LambertNoConvergence(iteration));
                }
                guard += 1;
                psi_low = psi;
                psi = 0.8 * (1.0 / c3) * (1.0 - (r1_norm + r2_norm) * c2.sqrt() / a);
                (c2, c3) = stumpff(psi);
                y = y_of(psi, c2, c3);
            }
        }

        if y < 0.0 || c2 <= 0.0 {
            psi_up = psi;
        } else {
            let xi = (y / c2).sqrt();
            let tof_new = (xi.powi(3) * c3 + a * y.sqrt()) / sqrt_mu;

            if ((tof_new - tof) / tof).abs() < LAMBERT_RTOL {
                let f = 1.0 - y / r1_norm;
                let g = a * (y / mu).sqrt();
                let g_dot = 1.0 - y / r2_norm;

                return Ok(LambertSolution {
                    v1: (r2 - f * r1) / g,
                    v2: (g_dot * r2 - r1) / g,
                    iterations: iteration + 1,
                });
            }

            if tof_new <= tof {
                psi_low = psi;
            } else {
                psi_up = psi;
            }
        }

        psi = 0.5 * (psi_low + psi_up);
        (c2, c3) = stumpff(psi);
    }

    Err(PorkchopError::LambertNoConvergence(LAMBERT_MAX_ITER))
}

#[cfg(test)]
mod lambert_test {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_stumpff_continuity() {
        for psi in [-1e-3, 1e-3, 4.0, -4.0] {
            let (c2_closed, c3_closed) = stumpff(psi);
            let (c2_series, c3_series) = stumpff(psi * 0.999_999);
            assert_relative_eq!(c2_closed, c2_series, max_relative = 1e-5);
            assert_relative_eq!(c3_closed, c3_series, max_relative = 1e-5);
        }
        let (c2, c3) = stumpff(0.0);
        assert_eq!(c2, 0.5);
        assert_eq!(c3, 1.0 / 6.0);
    }

    #[test]
    fn test_quarter_circular_orbit() {
        let r1 = Vector3::new(1.0, 0.0, 0.0);
        let r2 = Vector3::new(0.0, 1.0, 0.0);
        let sol = solve_lambert(&r1, &r2, FRAC_PI_2, 1.0, TransferDirection::Prograde).unwrap();

        assert_relative_eq!(sol.v1, Vector3::new(0.0, 1.0, 0.0), epsilon = 1e-6);
        assert_relative_eq!(sol.v2, Vector3::new(-1.0, 0.0, 0.0), epsilon = 1e-6);
        assert!(sol.iterations > 0);
    }

    #[test]
    fn test_retrograde_three_quarter_orbit() {
        let r1 = Vector3::new(1.0, 0.0, 0.0);
        let r2 = Vector3::new(0.0, 1.0, 0.0);
        let sol =
            solve_lambert(&r1, &r2, 1.5 * PI, 1.0, TransferDirection::Retrograde).unwrap();

        assert!(r1.cross(&sol.v1).z < 0.0);
        assert_relative_eq!(sol.v1, Vector3::new(0.0, -1.0, 0.0), epsilon = 1e-6);
        assert_relative_eq!(sol.v2, Vector3::new(1.0, 0.0, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn test_curtis_example_5_2() {
        // Curtis, Orbital Mechanics for Engineering Students, example 5.2 (geocentric)
        let r1 = Vector3::new(5000.0, 10000.0, 2100.0);
        let r2 = Vector3::new(-14600.0, 2500.0, 7000.0);
        let sol =
            solve_lambert(&r1, &r2, 3600.0, 398_600.0, TransferDirection::Prograde).unwrap();

        assert_relative_eq!(
            sol.v1,
            Vector3::new(-5.9925, 1.9254, 3.2456),
            epsilon = 2e-3
        );
        assert_relative_eq!(
            sol.v2,
            Vector3::new(-3.3125, -4.1966, -0.38529),
            epsilon = 2e-3
        );
    }

    #[test]
    fn test_energy_is_conserved_along_arc() {
        let mu = 1.327_124_400_41e11;
        let r1 = Vector3::new(1.0e8, 1.1e8, 0.0);
        let r2 = Vector3::new(-2.0e8, 0.5e8, 4.0e6);
        let sol = solve_lambert(&r1, &r2, 250.0 * 86_400.0, mu, TransferDirection::Prograde)
            .unwrap();

        let energy_1 = 0.5 * sol.v1.norm_squared() - mu / r1.norm();
        let energy_2 = 0.5 * sol.v2.norm_squared() - mu / r2.norm();
        assert_relative_eq!(energy_1, energy_2, max_relative = 1e-6);

        let h1 = r1.cross(&sol.v1);
        let h2 = r2.cross(&sol.v2);
        assert_relative_eq!(h1, h2, max_relative = 1e-6);
        assert!(h1.z > 0.0);
    }

    #[test]
    fn test_invalid_geometry() {
        let r1 = Vector3::new(1.0, 0.0, 0.0);
        assert_eq!(
            solve_lambert(
                &r1,
                &Vector3::new(-1.0, 0.0, 0.0),
                PI,
                1.0,
                TransferDirection::Prograde
            ),
            Err(PorkchopError::LambertSingular)
        );
        assert!(matches!(
            solve_lambert(&r1, &Vector3::new(0.0, 1.0, 0.0), -1.0, 1.0, TransferDirection::Prograde),
            Err(PorkchopError::InvalidLambertInput(_))
        ));
        assert!(matches!(
            solve_lambert(&r1, &Vector3::zeros(), 1.0, 1.0, TransferDirection::Prograde),
            Err(PorkchopError::InvalidLambertInput(_))
        ));
    }
}
