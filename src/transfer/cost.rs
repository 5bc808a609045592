//! Transfer cost strategies.
//!
//! The porkchop evaluator asks a [`CostFunction`] for the cost of every
//! `(departure epoch, arrival epoch)` cell. The default strategy, [`LambertCost`], solves the
//! zero-revolution Lambert arc between the two bodies around the Sun and returns the hyperbolic
//! excess speed of each leg. Any closure `Fn(Epoch, Epoch) -> Result<LegCost, PorkchopError>`
//! is a cost function as well.

use hifitime::Epoch;

use crate::{
    bodies::{Body, BodySet, FrameOrigin},
    constants::{KmPerSec, Mu, SECONDS_PER_DAY},
    lambert::{solve_lambert, TransferDirection},
    porkchop_errors::PorkchopError,
    ref_system::FrameOrientation,
    time::span_days,
};

/// Cost of one transfer, split by leg.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LegCost {
    /// Departure leg ΔV (km/s)
    pub departure: KmPerSec,
    /// Arrival leg ΔV (km/s)
    pub arrival: KmPerSec,
}

impl LegCost {
    pub fn new(departure: KmPerSec, arrival: KmPerSec) -> Self {
        LegCost { departure, arrival }
    }

    pub fn total(&self) -> KmPerSec {
        self.departure + self.arrival
    }
}

/// Cost of a transfer leaving at `departure` and arriving at `arrival`.
///
/// Errors returned here are treated as a failed cell by the evaluator when
/// [`PorkchopError::is_cell_failure`] holds, and abort the evaluation otherwise.
pub trait CostFunction {
    fn compute_cost(&self, departure: Epoch, arrival: Epoch) -> Result<LegCost, PorkchopError>;
}

impl<F> CostFunction for F
where
    F: Fn(Epoch, Epoch) -> Result<LegCost, PorkchopError>,
{
    fn compute_cost(&self, departure: Epoch, arrival: Epoch) -> Result<LegCost, PorkchopError> {
        self(departure, arrival)
    }
}

/// Ballistic transfer cost: `|v₁ − v_departure|` and `|v_target − v₂|` for the Lambert arc
/// joining the two bodies.
///
/// The arc is solved around the Sun on heliocentric states, so the cost does not depend on
/// the origin of the body set.
#[derive(Debug, Clone)]
pub struct LambertCost<'a> {
    bodies: &'a BodySet<'a>,
    orientation: FrameOrientation,
    departure_body: Body,
    target_body: Body,
    central_mu: Mu,
    direction: TransferDirection,
}

impl<'a> LambertCost<'a> {
    /// Lambert cost between two members of `bodies`.
    ///
    /// Return
    /// ----------
    /// * The cost function, or [`PorkchopError::BodyNotInSet`] / [`PorkchopError::UnknownBody`]
    ///   if a body name cannot be resolved, [`PorkchopError::InvalidConfig`] if both names
    ///   designate the same body, or [`PorkchopError::BodyUnavailable`] if the ephemeris cannot
    ///   position a body relative to the Sun.
    pub fn new(
        bodies: &'a BodySet<'a>,
        orientation: FrameOrientation,
        departure_body: &str,
        target_body: &str,
    ) -> Result<Self, PorkchopError> {
        let departure = bodies.body(departure_body)?;
        let target = bodies.body(target_body)?;
        if departure == target {
            return Err(PorkchopError::InvalidConfig(format!(
                "departure and target are the same body ({departure})"
            )));
        }
        let ephemeris = bodies.ephemeris();
        if let Some(body) = [departure, target]
            .into_iter()
            .find(|body| !ephemeris.supports(*body, FrameOrigin::Sun))
        {
            return Err(PorkchopError::BodyUnavailable {
                body: body.to_string(),
                source_name: ephemeris.label().into(),
            });
        }

        Ok(LambertCost {
            bodies,
            orientation,
            departure_body: departure,
            target_body: target,
            central_mu: Body::Sun.gravitational_parameter(),
            direction: TransferDirection::Prograde,
        })
    }

    pub fn with_direction(mut self, direction: TransferDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn departure_body(&self) -> Body {
        self.departure_body
    }

    pub fn target_body(&self) -> Body {
        self.target_body
    }
}

impl CostFunction for LambertCost<'_> {
    fn compute_cost(&self, departure: Epoch, arrival: Epoch) -> Result<LegCost, PorkchopError> {
        let from = self
            .bodies
            .heliocentric_state(self.departure_body, departure, self.orientation)?;
        let to = self
            .bodies
            .heliocentric_state(self.target_body, arrival, self.orientation)?;

        let tof = span_days(departure, arrival) * SECONDS_PER_DAY;
        let arc = solve_lambert(
            &from.position,
            &to.position,
            tof,
            self.central_mu,
            self.direction,
        )?;

        Ok(LegCost {
            departure: (arc.v1 - from.velocity).norm(),
            arrival: (to.velocity - arc.v2).norm(),
        })
    }
}

#[cfg(test)]
mod cost_test {
    use super::*;
    use std::collections::BTreeMap;

    use crate::{
        constants::AU,
        environment::Environment,
        jpl_ephem::{
            naif::{
                naif_data::NaifData,
                test_kernel::{build_spk, SyntheticSegment},
            },
            JPLEphem,
        },
        time::parse_date,
    };

    /// Sun away from the SSB, Earth and Mars at fixed heliocentric positions.
    fn offset_sun_ephem() -> JPLEphem {
        let sun = [1.0e6, -3.0e5, 2.0e4];
        let fixed = |target: i32, heliocentric: [f64; 3]| SyntheticSegment {
            target,
            center: 0,
            start: -1.0e9,
            end: 1.0e9,
            records: vec![[
                vec![sun[0] + heliocentric[0]],
                vec![sun[1] + heliocentric[1]],
                vec![sun[2] + heliocentric[2]],
            ]],
        };
        let bytes = build_spk(&[
            fixed(10, [0.0, 0.0, 0.0]),
            fixed(399, [AU, 0.0, 0.0]),
            fixed(499, [0.0, 1.5 * AU, 0.0]),
        ]);
        JPLEphem::NaifFile(NaifData::from_bytes(&bytes).unwrap())
    }

    fn naif_body_set(ephem: &JPLEphem, origin: FrameOrigin) -> BodySet<'_> {
        let bodies = [("Sun", Body::Sun), ("Earth", Body::Earth), ("Mars", Body::Mars)]
            .into_iter()
            .map(|(name, body)| (name.to_string(), body))
            .collect::<BTreeMap<_, _>>();
        BodySet::new(ephem, bodies, origin, FrameOrientation::J2000)
    }

    #[test]
    fn test_closure_cost() {
        let cost = |dep: Epoch, arr: Epoch| -> Result<LegCost, PorkchopError> {
            let tof = span_days(dep, arr);
            Ok(LegCost::new(tof / 100.0, 1.0))
        };
        let leg = cost
            .compute_cost(
                parse_date("2005-06-01").unwrap(),
                parse_date("2005-12-28").unwrap(),
            )
            .unwrap();
        assert!((leg.departure - 2.1).abs() < 1e-12);
        assert!((leg.total() - 3.1).abs() < 1e-12);
    }

    #[test]
    fn test_lambert_cost_earth_mars_2005() {
        let env = Environment::new("analytic").unwrap();
        let bodies = env
            .create_body_set(
                &["Sun", "Earth", "Mars"],
                FrameOrigin::Sun,
                FrameOrientation::EclipJ2000,
            )
            .unwrap();
        let cost =
            LambertCost::new(&bodies, FrameOrientation::EclipJ2000, "Earth", "Mars").unwrap();

        // near the 2005 opportunity optimum (Mars Reconnaissance Orbiter class)
        let leg = cost
            .compute_cost(
                parse_date("2005-08-15").unwrap(),
                parse_date("2006-03-10").unwrap(),
            )
            .unwrap();
        assert!((2.0..5.0).contains(&leg.departure), "{leg:?}");
        assert!((2.0..6.0).contains(&leg.arrival), "{leg:?}");

        // the ΔV magnitudes do not depend on the frame orientation
        let eq = LambertCost::new(&bodies, FrameOrientation::J2000, "Earth", "Mars").unwrap();
        let leg_eq = eq
            .compute_cost(
                parse_date("2005-08-15").unwrap(),
                parse_date("2006-03-10").unwrap(),
            )
            .unwrap();
        assert!((leg.departure - leg_eq.departure).abs() < 1e-6);
    }

    #[test]
    fn test_lambert_cost_ignores_frame_origin() {
        let ephem = offset_sun_ephem();
        let heliocentric = naif_body_set(&ephem, FrameOrigin::Sun);
        let barycentric = naif_body_set(&ephem, FrameOrigin::SolarSystemBarycenter);

        // the set origin still applies to plain state queries
        let departure = parse_date("2005-08-15").unwrap();
        let arrival = parse_date("2006-03-10").unwrap();
        let earth_ssb = barycentric
            .state("Earth", departure, FrameOrientation::J2000)
            .unwrap();
        assert!((earth_ssb.position.x - (AU + 1.0e6)).abs() < 1e-3);

        let leg_sun = LambertCost::new(&heliocentric, FrameOrientation::J2000, "Earth", "Mars")
            .unwrap()
            .compute_cost(departure, arrival)
            .unwrap();
        let leg_ssb = LambertCost::new(&barycentric, FrameOrientation::J2000, "Earth", "Mars")
            .unwrap()
            .compute_cost(departure, arrival)
            .unwrap();

        assert!(leg_sun.departure.is_finite() && leg_sun.arrival.is_finite());
        assert!((leg_sun.departure - leg_ssb.departure).abs() < 1e-9, "{leg_sun:?} {leg_ssb:?}");
        assert!((leg_sun.arrival - leg_ssb.arrival).abs() < 1e-9, "{leg_sun:?} {leg_ssb:?}");
    }

    #[test]
    fn test_lambert_cost_needs_the_sun() {
        // Earth and Mars relative to the SSB only
        let bytes = build_spk(&[
            SyntheticSegment {
                target: 399,
                center: 0,
                start: -1.0e9,
                end: 1.0e9,
                records: vec![[vec![AU], vec![0.0], vec![0.0]]],
            },
            SyntheticSegment {
                target: 499,
                center: 0,
                start: -1.0e9,
                end: 1.0e9,
                records: vec![[vec![0.0], vec![1.5 * AU], vec![0.0]]],
            },
        ]);
        let ephem = JPLEphem::NaifFile(NaifData::from_bytes(&bytes).unwrap());
        let bodies = naif_body_set(&ephem, FrameOrigin::SolarSystemBarycenter);

        assert_eq!(
            LambertCost::new(&bodies, FrameOrientation::J2000, "Earth", "Mars").err(),
            Some(PorkchopError::BodyUnavailable {
                body: "Earth".into(),
                source_name: "naif".into()
            })
        );
    }

    #[test]
    fn test_lambert_cost_errors() {
        let env = Environment::new("analytic").unwrap();
        let bodies = env
            .create_body_set(&["Sun", "Earth"], FrameOrigin::Sun, FrameOrientation::EclipJ2000)
            .unwrap();
        assert_eq!(
            LambertCost::new(&bodies, FrameOrientation::EclipJ2000, "Earth", "Mars").err(),
            Some(PorkchopError::BodyNotInSet("Mars".into()))
        );
        assert!(matches!(
            LambertCost::new(&bodies, FrameOrientation::EclipJ2000, "Earth", "earth"),
            Err(PorkchopError::InvalidConfig(_))
        ));
    }
}
