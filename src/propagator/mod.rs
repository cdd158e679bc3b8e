//! # Orbital state sources
//!
//! An [`OrbitalStateSource`] is the narrow capability the element extractors rely on. It is
//! seeded once (typically from a [`TwoLineElementSet`](crate::tle::TwoLineElementSet)) and
//! answers two kinds of questions:
//!
//! - **Cartesian state** at an epoch, for the osculating converter
//!   ([`OrbitalStateSource::cartesian_state`]).
//! - **Internal analytic state** at a time offset, for the mean-element extractor
//!   ([`OrbitalStateSource::advance_to`]), returned as an immutable
//!   [`PropagatorInternalState`] snapshot.
//!
//! ## Exclusive access
//!
//! Both operations take `&mut self`: advancing a source replaces its current internal
//! snapshot. A source can therefore be driven by one tabulation at a time only, and the
//! borrow checker enforces it.
//!
//! ## Implementations
//!
//! - [`sgp4_propagator::Sgp4Propagator`]: SGP4, Cartesian states from the `sgp4` crate and
//!   internal secular state from [`sgp4_secular::SecularModel`].

use hifitime::Epoch;

use crate::constants::{EarthRadii, Meter, Minutes, Radian};
use crate::ephem_errors::EphemError;
use crate::orbit_type::CartesianState;
use crate::ref_system::ReferenceFrame;

/// SGP4 state source built from a two-line element set.
pub mod sgp4_propagator;

/// Near-Earth SGP4 secular recurrence (mean elements with drag).
pub mod sgp4_secular;

/// Snapshot of the propagator's internal analytic variables at one time offset.
///
/// Units
/// -----
/// * `t_since`: minutes since the source reference epoch.
/// * `semi_major_axis`: Earth equatorial radii (propagator-native unit).
/// * angles: radians, **not** normalized (they accumulate secular drift).
///
/// The mean longitude is `L = Ω + ω + M`; the mean anomaly itself is not stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropagatorInternalState {
    pub t_since: Minutes,
    pub semi_major_axis: EarthRadii,
    pub eccentricity: f64,
    pub inclination: Radian,
    pub ascending_node: Radian,
    pub perigee_argument: Radian,
    pub mean_longitude: Radian,
}

/// Capability interface of an analytic orbit propagator.
pub trait OrbitalStateSource {
    /// Epoch the time offsets of [`OrbitalStateSource::advance_to`] are counted from.
    fn reference_epoch(&self) -> Epoch;

    /// Frame the internal elements and the raw Cartesian states are expressed in.
    fn internal_frame(&self) -> ReferenceFrame;

    /// Gravitational parameter (m³/s²) the source was built with.
    fn gravitational_parameter(&self) -> f64;

    /// Equatorial radius (m) that scales the internal semi-major axis.
    fn equatorial_radius(&self) -> Meter;

    /// Advance the internal recurrence to `t_since` minutes from the reference epoch.
    ///
    /// Return
    /// ------
    /// * The internal state at that offset, or [`EphemError::Propagation`] if the recurrence
    ///   cannot reach it. On success the snapshot also becomes the one returned by
    ///   [`OrbitalStateSource::snapshot_internal_state`].
    fn advance_to(&mut self, t_since: Minutes) -> Result<PropagatorInternalState, EphemError>;

    /// The snapshot produced by the most recent propagation, if any.
    fn snapshot_internal_state(&self) -> Option<PropagatorInternalState>;

    /// Cartesian position (m) and velocity (m/s) at `epoch`, in [`Self::internal_frame`].
    fn cartesian_state(&mut self, epoch: Epoch) -> Result<CartesianState, EphemError>;
}

impl<S: OrbitalStateSource + ?Sized> OrbitalStateSource for &mut S {
    fn reference_epoch(&self) -> Epoch {
        (**self).reference_epoch()
    }

    fn internal_frame(&self) -> ReferenceFrame {
        (**self).internal_frame()
    }

    fn gravitational_parameter(&self) -> f64 {
        (**self).gravitational_parameter()
    }

    fn equatorial_radius(&self) -> Meter {
        (**self).equatorial_radius()
    }

    fn advance_to(&mut self, t_since: Minutes) -> Result<PropagatorInternalState, EphemError> {
        (**self).advance_to(t_since)
    }

    fn snapshot_internal_state(&self) -> Option<PropagatorInternalState> {
        (**self).snapshot_internal_state()
    }

    fn cartesian_state(&mut self, epoch: Epoch) -> Result<CartesianState, EphemError> {
        (**self).cartesian_state(epoch)
    }
}
