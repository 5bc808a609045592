//! Celestial bodies, frame origins and the body set consumed by the porkchop evaluator.
//!
//! A [`BodySet`] is built once by [`crate::environment::Environment::create_body_set`] and is
//! immutable afterwards: it maps body names to their [`Body`] model and holds a shared handle on
//! the ephemeris, the frame origin and the default frame orientation.

use std::{collections::BTreeMap, fmt, str::FromStr};

use hifitime::Epoch;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::{
    constants::{Kilometer, KmPerSec, Mu},
    jpl_ephem::JPLEphem,
    porkchop_errors::PorkchopError,
    ref_system::{rotate_vector, FrameOrientation},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Body {
    Sun,
    Mercury,
    Venus,
    Earth,
    Moon,
    EarthMoonBarycenter,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
}

impl Body {
    pub const ALL: [Body; 12] = [
        Body::Sun,
        Body::Mercury,
        Body::Venus,
        Body::Earth,
        Body::Moon,
        Body::EarthMoonBarycenter,
        Body::Mars,
        Body::Jupiter,
        Body::Saturn,
        Body::Uranus,
        Body::Neptune,
        Body::Pluto,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Body::Sun => "Sun",
            Body::Mercury => "Mercury",
            Body::Venus => "Venus",
            Body::Earth => "Earth",
            Body::Moon => "Moon",
            Body::EarthMoonBarycenter => "Earth-Moon Barycenter",
            Body::Mars => "Mars",
            Body::Jupiter => "Jupiter",
            Body::Saturn => "Saturn",
            Body::Uranus => "Uranus",
            Body::Neptune => "Neptune",
            Body::Pluto => "Pluto",
        }
    }

    /// NAIF ids that can position this body, the body center first and its system
    /// barycenter as fallback (DE kernels only carry barycenters for Mars and beyond).
    pub fn naif_ids(&self) -> &'static [i32] {
        match self {
            Body::Sun => &[10],
            Body::Mercury => &[199, 1],
            Body::Venus => &[299, 2],
            Body::Earth => &[399],
            Body::Moon => &[301],
            Body::EarthMoonBarycenter => &[3],
            Body::Mars => &[499, 4],
            Body::Jupiter => &[599, 5],
            Body::Saturn => &[699, 6],
            Body::Uranus => &[799, 7],
            Body::Neptune => &[899, 8],
            Body::Pluto => &[999, 9],
        }
    }

    /// Gravitational parameter GM in km³/s² (DE440).
    pub fn gravitational_parameter(&self) -> Mu {
        match self {
            Body::Sun => 1.327_124_400_412_794_2e11,
            Body::Mercury => 22_031.868_551,
            Body::Venus => 324_858.592,
            Body::Earth => 398_600.435_507,
            Body::Moon => 4_902.800_118,
            Body::EarthMoonBarycenter => 403_503.235_625,
            Body::Mars => 42_828.375_816,
            Body::Jupiter => 126_712_764.1,
            Body::Saturn => 37_940_584.841_8,
            Body::Uranus => 5_794_556.4,
            Body::Neptune => 6_836_527.100_58,
            Body::Pluto => 975.5,
        }
    }
}

impl FromStr for Body {
    type Err = PorkchopError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect::<String>()
            .to_ascii_uppercase();
        match key.as_str() {
            "SUN" | "SOL" => Ok(Body::Sun),
            "MERCURY" => Ok(Body::Mercury),
            "VENUS" => Ok(Body::Venus),
            "EARTH" => Ok(Body::Earth),
            "MOON" | "LUNA" => Ok(Body::Moon),
            "EMB" | "EARTHMOONBARYCENTER" | "EARTHBARYCENTER" => Ok(Body::EarthMoonBarycenter),
            "MARS" => Ok(Body::Mars),
            "JUPITER" => Ok(Body::Jupiter),
            "SATURN" => Ok(Body::Saturn),
            "URANUS" => Ok(Body::Uranus),
            "NEPTUNE" => Ok(Body::Neptune),
            "PLUTO" => Ok(Body::Pluto),
            _ => Err(PorkchopError::UnknownBody(s.trim().to_string())),
        }
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Point the body positions are measured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FrameOrigin {
    #[default]
    #[serde(rename = "Sun", alias = "SUN")]
    Sun,
    /// Solar system barycenter
    #[serde(rename = "SSB", alias = "ssb")]
    SolarSystemBarycenter,
}

impl FromStr for FrameOrigin {
    type Err = PorkchopError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SUN" => Ok(FrameOrigin::Sun),
            "SSB" | "SOLARSYSTEMBARYCENTER" | "SOLAR SYSTEM BARYCENTER" => {
                Ok(FrameOrigin::SolarSystemBarycenter)
            }
            other => Err(PorkchopError::InvalidConfig(format!(
                "unknown frame origin: {other}"
            ))),
        }
    }
}

impl fmt::Display for FrameOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameOrigin::Sun => write!(f, "Sun"),
            FrameOrigin::SolarSystemBarycenter => write!(f, "SSB"),
        }
    }
}

/// Cartesian state of a body at an epoch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateVector {
    pub epoch: Epoch,
    pub orientation: FrameOrientation,
    /// Position in km
    pub position: Vector3<Kilometer>,
    /// Velocity in km/s
    pub velocity: Vector3<KmPerSec>,
}

impl StateVector {
    pub fn rotated(&self, orientation: FrameOrientation) -> StateVector {
        StateVector {
            epoch: self.epoch,
            orientation,
            position: rotate_vector(&self.position, self.orientation, orientation),
            velocity: rotate_vector(&self.velocity, self.orientation, orientation),
        }
    }
}

/// Immutable set of named bodies sharing one ephemeris, origin and orientation.
#[derive(Debug, Clone)]
pub struct BodySet<'e> {
    ephemeris: &'e JPLEphem,
    bodies: BTreeMap<String, Body>,
    origin: FrameOrigin,
    orientation: FrameOrientation,
}

impl<'e> BodySet<'e> {
    pub(crate) fn new(
        ephemeris: &'e JPLEphem,
        bodies: BTreeMap<String, Body>,
        origin: FrameOrigin,
        orientation: FrameOrientation,
    ) -> Self {
        BodySet {
            ephemeris,
            bodies,
            origin,
            orientation,
        }
    }

    pub fn origin(&self) -> FrameOrigin {
        self.origin
    }

    pub fn orientation(&self) -> FrameOrientation {
        self.orientation
    }

    pub fn ephemeris(&self) -> &'e JPLEphem {
        self.ephemeris
    }

    /// Names the set was created with, in lexical order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.bodies.keys().map(String::as_str)
    }

    /// Look up a body by name (case and separators are ignored).
    pub fn body(&self, name: &str) -> Result<Body, PorkchopError> {
        let wanted: Body = name.parse()?;
        self.bodies
            .values()
            .copied()
            .find(|b| *b == wanted)
            .ok_or_else(|| PorkchopError::BodyNotInSet(name.to_string()))
    }

    pub fn gravitational_parameter(&self, name: &str) -> Result<Mu, PorkchopError> {
        Ok(self.body(name)?.gravitational_parameter())
    }

    /// State of `name` relative to the set origin, expressed in `orientation`.
    pub fn state(
        &self,
        name: &str,
        epoch: Epoch,
        orientation: FrameOrientation,
    ) -> Result<StateVector, PorkchopError> {
        let body = self.body(name)?;
        self.body_state(body, epoch, orientation)
    }

    pub(crate) fn body_state(
        &self,
        body: Body,
        epoch: Epoch,
        orientation: FrameOrientation,
    ) -> Result<StateVector, PorkchopError> {
        Ok(self
            .ephemeris
            .state(body, self.origin, epoch)?
            .rotated(orientation))
    }

    /// State of `body` relative to the Sun, whatever the set origin.
    pub(crate) fn heliocentric_state(
        &self,
        body: Body,
        epoch: Epoch,
        orientation: FrameOrientation,
    ) -> Result<StateVector, PorkchopError> {
        Ok(self
            .ephemeris
            .state(body, FrameOrigin::Sun, epoch)?
            .rotated(orientation))
    }
}

#[cfg(test)]
mod bodies_test {
    use super::*;

    #[test]
    fn test_parse_body_names() {
        assert_eq!("Earth".parse::<Body>().unwrap(), Body::Earth);
        assert_eq!("MARS".parse::<Body>().unwrap(), Body::Mars);
        assert_eq!(
            "earth moon barycenter".parse::<Body>().unwrap(),
            Body::EarthMoonBarycenter
        );
        assert_eq!(
            "Vulcan".parse::<Body>(),
            Err(PorkchopError::UnknownBody("Vulcan".into()))
        );
        for body in Body::ALL {
            assert_eq!(body.name().parse::<Body>().unwrap(), body);
        }
    }

    #[test]
    fn test_frame_origin() {
        assert_eq!("ssb".parse::<FrameOrigin>().unwrap(), FrameOrigin::SolarSystemBarycenter);
        assert_eq!("Sun".parse::<FrameOrigin>().unwrap(), FrameOrigin::Sun);
        assert!("Earth".parse::<FrameOrigin>().is_err());
    }

    #[test]
    fn test_state_rotation_keeps_norm() {
        let state = StateVector {
            epoch: Epoch::from_et_seconds(0.0),
            orientation: FrameOrientation::J2000,
            position: Vector3::new(1.0e8, 5.0e7, 2.0e7),
            velocity: Vector3::new(-10.0, 25.0, 11.0),
        };
        let ecl = state.rotated(FrameOrientation::EclipJ2000);
        assert_eq!(ecl.orientation, FrameOrientation::EclipJ2000);
        assert!((ecl.position.norm() - state.position.norm()).abs() < 1e-6);
        assert!((ecl.velocity.norm() - state.velocity.norm()).abs() < 1e-12);
    }
}
