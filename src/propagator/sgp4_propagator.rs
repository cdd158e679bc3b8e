//! # SGP4 orbital state source
//!
//! [`Sgp4Propagator`] composes the two halves of SGP4 behind [`OrbitalStateSource`]:
//!
//! - Cartesian states come from [`sgp4::Constants::propagate`] (full theory, deep space
//!   included), converted from km, km/s to SI.
//! - Internal secular states come from [`SecularModel`], initialized from the same TLE and the
//!   same geopotential.
//!
//! Every propagation (Cartesian or internal) replaces the snapshot returned by
//! [`OrbitalStateSource::snapshot_internal_state`].

use hifitime::{Duration, Epoch};
use nalgebra::Vector3;
use sgp4::{Constants, MinutesSinceEpoch};
use tracing::debug;

use crate::constants::{
    earth_equatorial_radius, earth_mu, Meter, Minutes, EARTH_GEOPOTENTIAL, KM_TO_M,
    SECONDS_PER_MINUTE,
};
use crate::ephem_errors::EphemError;
use crate::orbit_type::CartesianState;
use crate::propagator::sgp4_secular::SecularModel;
use crate::propagator::{OrbitalStateSource, PropagatorInternalState};
use crate::ref_system::ReferenceFrame;
use crate::time::minutes_since;
use crate::tle::TwoLineElementSet;

pub struct Sgp4Propagator {
    epoch: Epoch,
    norad_id: u64,
    constants: Constants,
    secular: SecularModel,
    snapshot: Option<PropagatorInternalState>,
}

impl Sgp4Propagator {
    /// Initialize both halves of SGP4 from a TLE.
    ///
    /// Arguments
    /// ---------
    /// * `tle`: the element set seeding this source. The source never outlives its TLE
    ///   semantics: it is not re-seeded.
    ///
    /// Return
    /// ------
    /// * The propagator, or [`EphemError::PropagatorInit`] if SGP4 rejects the element set.
    pub fn new(tle: &TwoLineElementSet) -> Result<Self, EphemError> {
        let constants = Constants::from_elements(tle.elements())
            .map_err(|e| EphemError::PropagatorInit(format!("{e:?}")))?;
        let secular = SecularModel::new(tle, &EARTH_GEOPOTENTIAL)
            .map_err(|e| EphemError::PropagatorInit(e.to_string()))?;

        debug!(
            "SGP4 initialized for NORAD {} at {} (period {:.3} min, deep space: {})",
            tle.norad_id(),
            tle.epoch(),
            secular.period(),
            secular.is_deep_space()
        );

        Ok(Self {
            epoch: tle.epoch(),
            norad_id: tle.norad_id(),
            constants,
            secular,
            snapshot: None,
        })
    }

    pub fn norad_id(&self) -> u64 {
        self.norad_id
    }

    fn epoch_at(&self, t_since: Minutes) -> Epoch {
        self.epoch + Duration::from_seconds(t_since * SECONDS_PER_MINUTE)
    }
}

impl OrbitalStateSource for Sgp4Propagator {
    fn reference_epoch(&self) -> Epoch {
        self.epoch
    }

    fn internal_frame(&self) -> ReferenceFrame {
        ReferenceFrame::Teme
    }

    fn gravitational_parameter(&self) -> f64 {
        earth_mu()
    }

    fn equatorial_radius(&self) -> Meter {
        earth_equatorial_radius()
    }

    fn advance_to(&mut self, t_since: Minutes) -> Result<PropagatorInternalState, EphemError> {
        match self.secular.state_at(t_since) {
            Ok(state) => {
                self.snapshot = Some(state);
                Ok(state)
            }
            Err(e) => {
                self.snapshot = None;
                Err(EphemError::Propagation {
                    epoch: self.epoch_at(t_since),
                    reason: e.to_string(),
                })
            }
        }
    }

    fn snapshot_internal_state(&self) -> Option<PropagatorInternalState> {
        self.snapshot
    }

    fn cartesian_state(&mut self, epoch: Epoch) -> Result<CartesianState, EphemError> {
        let t_since = minutes_since(epoch, self.epoch);
        debug!("SGP4 propagation to {epoch} (t_since = {t_since:.3} min)");

        self.snapshot = self.secular.state_at(t_since).ok();

        let prediction = self
            .constants
            .propagate(MinutesSinceEpoch(t_since))
            .map_err(|e| EphemError::Propagation {
                epoch,
                reason: format!("{e:?}"),
            })?;

        let [x, y, z] = prediction.position;
        let [vx, vy, vz] = prediction.velocity;

        Ok(CartesianState {
            epoch,
            position: Vector3::new(x, y, z) * KM_TO_M,
            velocity: Vector3::new(vx, vy, vz) * KM_TO_M,
            frame: ReferenceFrame::Teme,
        })
    }
}
