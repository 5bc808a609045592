//! Chebyshev records of SPK segments of type 2 and 3.
//!
//! A record covers the interval `[mid - radius, mid + radius]` (TDB seconds past J2000) and holds
//! one coefficient set per component:
//! * type 2: position `x, y, z` (km), the velocity is the time derivative of the series,
//! * type 3: position `x, y, z` (km) followed by velocity `vx, vy, vz` (km/s).

use nalgebra::Vector3;
use nom::{multi::count, number::complete::le_f64, IResult};

use crate::porkchop_errors::PorkchopError;

#[derive(Debug, Clone, PartialEq)]
pub struct ChebyshevRecord {
    pub mid: f64,
    pub radius: f64,
    /// `[x, y, z]` for type 2, `[x, y, z, vx, vy, vz]` for type 3
    pub coefficients: Vec<Vec<f64>>,
}

/// Value and first derivative (with respect to the normalized time `t`) of `Σ cₙ Tₙ(t)`.
///
/// Uses `T₀ = 1, T₁ = t, Tₙ = 2t Tₙ₋₁ − Tₙ₋₂` and
/// `T'ₙ = 2t T'ₙ₋₁ + 2 Tₙ₋₁ − T'ₙ₋₂`.
fn chebyshev_series(coeffs: &[f64], t: f64) -> (f64, f64) {
    let Some((&c0, rest)) = coeffs.split_first() else {
        return (0.0, 0.0);
    };

    let (mut t_prev, mut t_curr) = (1.0, t);
    let (mut dt_prev, mut dt_curr) = (0.0, 1.0);
    let mut value = c0;
    let mut derivative = 0.0;

    for (n, &c) in rest.iter().enumerate() {
        if n > 0 {
            let t_next = 2.0 * t * t_curr - t_prev;
            let dt_next = 2.0 * t * dt_curr + 2.0 * t_curr - dt_prev;
            t_prev = t_curr;
            t_curr = t_next;
            dt_prev = dt_curr;
            dt_curr = dt_next;
        }
        value += c * t_curr;
        derivative += c * dt_curr;
    }

    (value, derivative)
}

impl ChebyshevRecord {
    /// Decode one record of `rsize` words with `components` coefficient sets (3 or 6).
    pub fn parse(input: &[u8], rsize: usize, components: usize) -> IResult<&[u8], Self> {
        let ncoeff = (rsize - 2) / components;
        let (input, mid) = le_f64(input)?;
        let (input, radius) = le_f64(input)?;
        let (input, coefficients) = count(count(le_f64, ncoeff), components)(input)?;
        Ok((
            input,
            ChebyshevRecord {
                mid,
                radius,
                coefficients,
            },
        ))
    }

    /// Position (km) and velocity (km/s) at `et_seconds`.
    pub fn interpolate(&self, et_seconds: f64) -> Result<(Vector3<f64>, Vector3<f64>), PorkchopError> {
        if self.radius <= 0.0 {
            return Err(PorkchopError::NomParsingError(format!(
                "Chebyshev record with non-positive radius {}",
                self.radius
            )));
        }
        let t = ((et_seconds - self.mid) / self.radius).clamp(-1.0, 1.0);

        let mut position = Vector3::zeros();
        let mut velocity = Vector3::zeros();

        match self.coefficients.len() {
            3 => {
                for (axis, coeffs) in self.coefficients.iter().enumerate() {
                    let (p, dp) = chebyshev_series(coeffs, t);
                    position[axis] = p;
                    velocity[axis] = dp / self.radius;
                }
            }
            6 => {
                for axis in 0..3 {
                    position[axis] = chebyshev_series(&self.coefficients[axis], t).0;
                    velocity[axis] = chebyshev_series(&self.coefficients[axis + 3], t).0;
                }
            }
            n => {
                return Err(PorkchopError::NomParsingError(format!(
                    "Chebyshev record with {n} components"
                )))
            }
        }

        Ok((position, velocity))
    }
}
