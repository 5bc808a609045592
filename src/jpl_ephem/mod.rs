use analytic::AnalyticEphem;
use download_jpl_file::{get_ephemeris_file, EphemFileSource};
use hifitime::Epoch;
use naif::naif_data::{NaifData, SSB_ID};

use crate::{
    bodies::{Body, FrameOrigin, StateVector},
    porkchop_errors::PorkchopError,
    ref_system::FrameOrientation,
};

pub mod analytic;
pub mod download_jpl_file;
pub mod naif;

/// NAIF id of the Sun.
const SUN_ID: i32 = 10;

/// A loaded planetary ephemeris.
#[derive(Debug, Clone)]
pub enum JPLEphem {
    NaifFile(NaifData),
    Analytic(AnalyticEphem),
}

impl JPLEphem {
    pub fn new(file_source: &EphemFileSource) -> Result<Self, PorkchopError> {
        match file_source {
            EphemFileSource::Analytic => Ok(JPLEphem::Analytic(AnalyticEphem)),
            EphemFileSource::Naif(_) | EphemFileSource::File(_) => {
                let file_path = get_ephemeris_file(file_source)?;
                Ok(JPLEphem::NaifFile(NaifData::read_naif_file(&file_path)?))
            }
        }
    }

    /// Native orientation of the states returned by [`JPLEphem::state`].
    pub fn orientation(&self) -> FrameOrientation {
        match self {
            JPLEphem::NaifFile(_) => FrameOrientation::J2000,
            JPLEphem::Analytic(analytic) => analytic.orientation(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            JPLEphem::NaifFile(_) => "naif",
            JPLEphem::Analytic(_) => "analytic",
        }
    }

    fn naif_body_id(naif: &NaifData, body: Body) -> Option<i32> {
        body.naif_ids().iter().copied().find(|id| naif.has_target(*id))
    }

    fn origin_id(origin: FrameOrigin) -> i32 {
        match origin {
            FrameOrigin::Sun => SUN_ID,
            FrameOrigin::SolarSystemBarycenter => SSB_ID,
        }
    }

    /// Whether this ephemeris can position `body` relative to `origin`.
    pub fn supports(&self, body: Body, origin: FrameOrigin) -> bool {
        match self {
            JPLEphem::NaifFile(naif) => {
                Self::naif_body_id(naif, body).is_some()
                    && naif.has_target(Self::origin_id(origin))
            }
            JPLEphem::Analytic(analytic) => analytic.supports(body, origin),
        }
    }

    /// State of `body` relative to `origin`, in the native orientation of the ephemeris.
    pub fn state(
        &self,
        body: Body,
        origin: FrameOrigin,
        epoch: Epoch,
    ) -> Result<StateVector, PorkchopError> {
        match self {
            JPLEphem::NaifFile(naif) => {
                let target =
                    Self::naif_body_id(naif, body).ok_or_else(|| PorkchopError::BodyUnavailable {
                        body: body.to_string(),
                        source_name: self.label().into(),
                    })?;
                let (position, velocity) =
                    naif.ephemeris(target, Self::origin_id(origin), epoch.to_et_seconds())?;
                Ok(StateVector {
                    epoch,
                    orientation: FrameOrientation::J2000,
                    position,
                    velocity,
                })
            }
            JPLEphem::Analytic(analytic) => analytic.state(body, origin, epoch),
        }
    }
}
