//! Analytic planetary ephemeris from the JPL "approximate positions of the planets"
//! mean Keplerian elements (E.M. Standish, valid 1800 AD – 2050 AD).
//!
//! Positions are heliocentric, in the mean ecliptic and equinox of J2000. The accuracy is a few
//! hundred arcseconds for the inner planets, plenty for launch window exploration but not for
//! navigation. The Earth is approximated by the Earth-Moon barycenter.

use hifitime::Epoch;
use nalgebra::Vector3;

use crate::{
    bodies::{Body, FrameOrigin, StateVector},
    constants::{AU, DAYS_PER_CENTURY, GM_SUN, RADEG, T2000},
    kepler::EllipticElements,
    porkchop_errors::PorkchopError,
    ref_system::FrameOrientation,
    time::epoch_to_mjd_tdb,
};

/// Elements at J2000 and their rates per Julian century:
/// `a` (AU), `e`, `I` (deg), mean longitude `L` (deg), longitude of perihelion `ϖ` (deg),
/// longitude of the ascending node `Ω` (deg).
#[derive(Debug, Clone, Copy, PartialEq)]
struct MeanElements {
    at_j2000: [f64; 6],
    rates: [f64; 6],
}

const MERCURY: MeanElements = MeanElements {
    at_j2000: [0.38709927, 0.20563593, 7.00497902, 252.25032350, 77.45779628, 48.33076593],
    rates: [0.00000037, 0.00001906, -0.00594749, 149472.67411175, 0.16047689, -0.12534081],
};

const VENUS: MeanElements = MeanElements {
    at_j2000: [0.72333566, 0.00677672, 3.39467605, 181.97909950, 131.60246718, 76.67984255],
    rates: [0.00000390, -0.00004107, -0.00078890, 58517.81538729, 0.00268329, -0.27769418],
};

const EARTH_MOON_BARYCENTER: MeanElements = MeanElements {
    at_j2000: [1.00000261, 0.01671123, -0.00001531, 100.46457166, 102.93768193, 0.0],
    rates: [0.00000562, -0.00004392, -0.01294668, 35999.37244981, 0.32327364, 0.0],
};

const MARS: MeanElements = MeanElements {
    at_j2000: [1.52371034, 0.09339410, 1.84969142, -4.55343205, -23.94362959, 49.55953891],
    rates: [0.00001847, 0.00007882, -0.00813131, 19140.30268499, 0.44441088, -0.29257343],
};

const JUPITER: MeanElements = MeanElements {
    at_j2000: [5.20288700, 0.04838624, 1.30439695, 34.39644051, 14.72847983, 100.47390909],
    rates: [-0.00011607, -0.00013253, -0.00183714, 3034.74612775, 0.21252668, 0.20469106],
};

const SATURN: MeanElements = MeanElements {
    at_j2000: [9.53667594, 0.05386179, 2.48599187, 49.95424423, 92.59887831, 113.66242448],
    rates: [-0.00125060, -0.00050991, 0.00193609, 1222.49362201, -0.41897216, -0.28867794],
};

const URANUS: MeanElements = MeanElements {
    at_j2000: [19.18916464, 0.04725744, 0.77263783, 313.23810451, 170.95427630, 74.01692503],
    rates: [-0.00196176, -0.00004397, -0.00242939, 428.48202785, 0.40805281, 0.04240589],
};

const NEPTUNE: MeanElements = MeanElements {
    at_j2000: [30.06992276, 0.00859048, 1.77004347, -55.12002969, 44.96476227, 131.78422574],
    rates: [0.00026291, 0.00005105, 0.00035372, 218.45945325, -0.32241464, -0.00508664],
};

const PLUTO: MeanElements = MeanElements {
    at_j2000: [39.48211675, 0.24882730, 17.14001206, 238.92903833, 224.06891629, 110.30393684],
    rates: [-0.00031596, 0.00005170, 0.00004818, 145.20780515, -0.04062942, -0.01183482],
};

/// Validity interval of the element table, in Julian centuries from J2000.
const VALID_CENTURIES: std::ops::RangeInclusive<f64> = -2.0..=0.5;

impl MeanElements {
    fn at(&self, centuries: f64) -> EllipticElements {
        let el: [f64; 6] =
            std::array::from_fn(|k| self.at_j2000[k] + self.rates[k] * centuries);
        let [a, e, inc, mean_long, long_peri, node] = el;

        EllipticElements {
            semi_major_axis: a * AU,
            eccentricity: e,
            inclination: inc * RADEG,
            ascending_node_longitude: node * RADEG,
            periapsis_argument: (long_peri - node) * RADEG,
            mean_anomaly: (mean_long - long_peri) * RADEG,
        }
    }
}

/// Heliocentric mean-element ephemeris (`"analytic"` source).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AnalyticEphem;

impl AnalyticEphem {
    pub fn orientation(&self) -> FrameOrientation {
        FrameOrientation::EclipJ2000
    }

    fn elements(body: Body) -> Option<MeanElements> {
        match body {
            Body::Mercury => Some(MERCURY),
            Body::Venus => Some(VENUS),
            Body::Earth | Body::EarthMoonBarycenter => Some(EARTH_MOON_BARYCENTER),
            Body::Mars => Some(MARS),
            Body::Jupiter => Some(JUPITER),
            Body::Saturn => Some(SATURN),
            Body::Uranus => Some(URANUS),
            Body::Neptune => Some(NEPTUNE),
            Body::Pluto => Some(PLUTO),
            Body::Sun | Body::Moon => None,
        }
    }

    /// Whether `body` can be positioned relative to `origin`.
    pub fn supports(&self, body: Body, origin: FrameOrigin) -> bool {
        origin == FrameOrigin::Sun && (body == Body::Sun || Self::elements(body).is_some())
    }

    /// Heliocentric state (km, km/s) in the ecliptic J2000 frame.
    pub fn state(
        &self,
        body: Body,
        origin: FrameOrigin,
        epoch: Epoch,
    ) -> Result<StateVector, PorkchopError> {
        if origin != FrameOrigin::Sun {
            return Err(PorkchopError::BodyUnavailable {
                body: origin.to_string(),
                source_name: "analytic".into(),
            });
        }

        let (position, velocity) = if body == Body::Sun {
            (Vector3::zeros(), Vector3::zeros())
        } else {
            let table = Self::elements(body).ok_or_else(|| PorkchopError::BodyUnavailable {
                body: body.to_string(),
                source_name: "analytic".into(),
            })?;

            let centuries = (epoch_to_mjd_tdb(epoch) - T2000) / DAYS_PER_CENTURY;
            if !VALID_CENTURIES.contains(&centuries) {
                return Err(PorkchopError::EphemerisOutOfRange {
                    naif_id: body.naif_ids()[0],
                    epoch: epoch.to_string(),
                });
            }

            let mu = GM_SUN + body.gravitational_parameter();
            table.at(centuries).to_state(mu)?
        };

        Ok(StateVector {
            epoch,
            orientation: self.orientation(),
            position,
            velocity,
        })
    }
}

#[cfg(test)]
mod analytic_test {
    use super::*;
    use crate::time::parse_date;
    use approx::assert_relative_eq;

    #[test]
    fn test_earth_orbit() {
        let ephem = AnalyticEphem;
        let epoch = parse_date("2005-06-15").unwrap();
        let state = ephem.state(Body::Earth, FrameOrigin::Sun, epoch).unwrap();

        let r_au = state.position.norm() / AU;
        assert!((0.98..1.02).contains(&r_au), "r = {r_au} AU");
        assert!((29.0..30.6).contains(&state.velocity.norm()));
        // Earth sits in the ecliptic
        assert!(state.position.z.abs() / state.position.norm() < 1e-3);
        // June: the Earth is on the −y side of the Sun (Sun at ecliptic longitude ~84°)
        let longitude = state.position.y.atan2(state.position.x).to_degrees().rem_euclid(360.0);
        assert!((255.0..270.0).contains(&longitude), "longitude = {longitude}");
    }

    #[test]
    fn test_mars_distance_range() {
        let ephem = AnalyticEphem;
        for date in ["2005-04-30", "2005-11-16", "2006-12-21"] {
            let epoch = parse_date(date).unwrap();
            let state = ephem.state(Body::Mars, FrameOrigin::Sun, epoch).unwrap();
            let r_au = state.position.norm() / AU;
            assert!((1.37..1.68).contains(&r_au), "{date}: r = {r_au} AU");
        }
    }

    #[test]
    fn test_sun_and_unavailable_bodies() {
        let ephem = AnalyticEphem;
        let epoch = parse_date("2005-04-30").unwrap();
        let sun = ephem.state(Body::Sun, FrameOrigin::Sun, epoch).unwrap();
        assert_relative_eq!(sun.position.norm(), 0.0);

        assert_eq!(
            ephem.state(Body::Moon, FrameOrigin::Sun, epoch),
            Err(PorkchopError::BodyUnavailable {
                body: "Moon".into(),
                source_name: "analytic".into()
            })
        );
        assert!(ephem
            .state(Body::Mars, FrameOrigin::SolarSystemBarycenter, epoch)
            .is_err());
        assert!(!ephem.supports(Body::Moon, FrameOrigin::Sun));
        assert!(ephem.supports(Body::Mars, FrameOrigin::Sun));
    }

    #[test]
    fn test_out_of_validity() {
        let ephem = AnalyticEphem;
        let epoch = parse_date("2100-01-01").unwrap();
        assert!(matches!(
            ephem.state(Body::Mars, FrameOrigin::Sun, epoch),
            Err(PorkchopError::EphemerisOutOfRange { naif_id: 499, .. })
        ));
    }
}
