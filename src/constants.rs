//! # Constants and type definitions for porkchop
//!
//! This module centralizes the **physical constants**, **conversion factors**, and **unit type
//! aliases** used throughout the crate.
//!
//! ## Overview
//!
//! - Astronomical constants (AU, gravitational parameters)
//! - Unit conversions (degrees ↔ radians, days ↔ seconds, AU/day ↔ km/s)
//! - Core type aliases used across the crate

// -------------------------------------------------------------------------------------------------
// Physical constants and unit conversions
// -------------------------------------------------------------------------------------------------

/// 2π, useful for trigonometric conversions
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// Number of seconds in a Julian day
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Number of days in a Julian century
pub const DAYS_PER_CENTURY: f64 = 36_525.0;

/// Astronomical Unit in kilometers (IAU 2012)
pub const AU: f64 = 149_597_870.7;

/// MJD epoch of J2000.0 (2000-01-01 12:00:00 TT)
pub const T2000: f64 = 51544.5;

/// JD → MJD offset
pub const JDTOMJD: f64 = 2_400_000.5;

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

/// Arcseconds → radians
pub const RADSEC: f64 = std::f64::consts::PI / 648000.0;

/// Gaussian gravitational constant k (AU^(3/2) / day)
pub const GAUSS_GRAV: f64 = 0.01720209895;

/// Heliocentric gravitational parameter in km³/s² (DE440)
pub const GM_SUN: f64 = 1.327_124_400_41e11;

/// AU/day → km/s
pub const AU_PER_DAY_TO_KM_S: f64 = AU / SECONDS_PER_DAY;

/// Relative tolerance on the time of flight matched by the Lambert iteration
pub const LAMBERT_RTOL: f64 = 1e-10;

/// Maximum number of Lambert bisection iterations
pub const LAMBERT_MAX_ITER: usize = 200;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Angle in radians
pub type Radian = f64;
/// Distance in kilometers
pub type Kilometer = f64;
/// Speed in km/s
pub type KmPerSec = f64;
/// Duration in days
pub type Days = f64;
/// Modified Julian Date (days)
pub type MJD = f64;
/// Gravitational parameter in km³/s²
pub type Mu = f64;
