//! # Environment: ephemeris loading and body set construction
//!
//! [`Environment`] is the entry point of every porkchop run. It owns the ephemeris source
//! description and loads the ephemeris **lazily, once** (through a
//! [`OnceCell`](once_cell::sync::OnceCell)); [`Environment::create_body_set`] then builds the
//! immutable [`BodySet`] handed to the evaluator.
//!
//! ## Typical usage
//!
//! ```rust, no_run
//! use porkchop::environment::Environment;
//! use porkchop::bodies::FrameOrigin;
//! use porkchop::ref_system::FrameOrientation;
//!
//! let env = Environment::new("naif:DE440").unwrap();
//! let bodies = env
//!     .create_body_set(&["Sun", "Earth", "Mars"], FrameOrigin::Sun, FrameOrientation::EclipJ2000)
//!     .unwrap();
//! ```
//!
//! ## Errors
//!
//! Any failure to load the ephemeris (missing kernel, corrupt file) is returned from
//! [`Environment::get_jpl_ephem`] and from [`Environment::create_body_set`]; nothing can be
//! evaluated without it.

use std::collections::BTreeMap;

use once_cell::sync::OnceCell;
use tracing::info;

use crate::{
    bodies::{Body, BodySet, FrameOrigin},
    jpl_ephem::{download_jpl_file::EphemFileSource, JPLEphem},
    porkchop_errors::PorkchopError,
    ref_system::FrameOrientation,
};

#[derive(Debug, Clone)]
pub struct Environment {
    jpl_source: EphemFileSource,
    jpl_ephem: OnceCell<JPLEphem>,
}

impl Environment {
    /// Create an environment from an ephemeris descriptor (`"analytic"`, `"naif:DE440"`,
    /// `"file:<path>"` or a `.bsp` path). The ephemeris itself is not loaded yet.
    ///
    /// Arguments
    /// -----------------
    /// * `jpl_file`: the ephemeris source descriptor
    ///
    /// Return
    /// ----------
    /// * The environment, or an error if the descriptor is malformed.
    pub fn new(jpl_file: &str) -> Result<Self, PorkchopError> {
        Ok(Environment {
            jpl_source: jpl_file.try_into()?,
            jpl_ephem: OnceCell::new(),
        })
    }

    /// Environment on an already loaded ephemeris.
    pub fn with_ephemeris(jpl_source: EphemFileSource, ephem: JPLEphem) -> Self {
        Environment {
            jpl_source,
            jpl_ephem: OnceCell::with_value(ephem),
        }
    }

    pub fn source(&self) -> &EphemFileSource {
        &self.jpl_source
    }

    /// Return the ephemeris, loading it on first use.
    pub fn get_jpl_ephem(&self) -> Result<&JPLEphem, PorkchopError> {
        self.jpl_ephem.get_or_try_init(|| {
            info!(source = %self.jpl_source, "loading ephemeris");
            JPLEphem::new(&self.jpl_source)
        })
    }

    /// Build the named body set used by the evaluator.
    ///
    /// Arguments
    /// -----------------
    /// * `names`: body names (e.g. `["Sun", "Earth", "Mars"]`), resolved case-insensitively
    /// * `origin`: point positions are measured from
    /// * `orientation`: default orientation of the set
    ///
    /// Return
    /// ----------
    /// * The immutable [`BodySet`], or an error if the ephemeris cannot be loaded, a name is
    ///   unknown, or a body cannot be positioned by this ephemeris.
    ///
    /// See also
    /// ------------
    /// * [`BodySet::state`] – states of the member bodies
    pub fn create_body_set<S: AsRef<str>>(
        &self,
        names: &[S],
        origin: FrameOrigin,
        orientation: FrameOrientation,
    ) -> Result<BodySet<'_>, PorkchopError> {
        if names.is_empty() {
            return Err(PorkchopError::InvalidConfig("empty body list".into()));
        }

        let ephem = self.get_jpl_ephem()?;

        let mut bodies = BTreeMap::new();
        for name in names {
            let name = name.as_ref().trim();
            let body: Body = name.parse()?;
            if !ephem.supports(body, origin) {
                return Err(PorkchopError::BodyUnavailable {
                    body: body.to_string(),
                    source_name: ephem.label().into(),
                });
            }
            bodies.insert(name.to_string(), body);
        }

        info!(
            bodies = ?bodies.keys().collect::<Vec<_>>(),
            %origin,
            %orientation,
            "body set created"
        );

        Ok(BodySet::new(ephem, bodies, origin, orientation))
    }
}
