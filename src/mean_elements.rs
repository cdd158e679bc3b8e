//! # Mean-element extraction
//!
//! [`MeanElementExtractor`] turns the internal secular state of an analytic propagator into
//! Brouwer-Lyddane-type mean Keplerian elements at an arbitrary epoch.
//!
//! ## Algorithm
//!
//! For a target epoch:
//!
//! 1. `t_since` = target − reference epoch of the source, in minutes.
//! 2. The source is advanced to `t_since` and returns a [`PropagatorInternalState`] snapshot.
//!    The recurrence itself belongs to the source and is never re-evaluated here.
//! 3. `a = a_internal × R_eq` (Earth radii → metres).
//! 4. `e` and `i` are read as they are.
//! 5. Ω and ω are read from the same snapshot.
//! 6. The snapshot holds the mean longitude `L = Ω + ω + M`, so `M = L − ω − Ω`, with the Ω and ω
//!    of step 5. Mixing in angles from another propagation step would leak their secular drift
//!    into `M`.
//! 7. Ω, ω and M are each normalized once with [`principal_angle`].
//! 8. The set is tagged with the epoch, the source frame and the source gravitational parameter.
//!
//! ## Reference elements
//!
//! [`reference_mean_elements`] rebuilds the mean element set the TLE itself encodes. It uses the
//! same Brouwer mean motion as the propagator initialization, so at `t_since = 0` both paths
//! describe the same orbit.

use hifitime::Epoch;

use crate::constants::{EARTH_GEOPOTENTIAL, SECONDS_PER_MINUTE};
use crate::ephem_errors::EphemError;
use crate::kepler::principal_angle;
use crate::orbit_type::keplerian_element::KeplerianElements;
use crate::propagator::sgp4_secular::brouwer_mean_motion;
use crate::propagator::{OrbitalStateSource, PropagatorInternalState};
use crate::ref_system::ReferenceFrame;
use crate::time::minutes_since;
use crate::tle::TwoLineElementSet;

/// Wrapper giving exclusive access to an orbital state source for mean-element extraction.
///
/// `S` is either an owned source or `&mut` to one: both implement [`OrbitalStateSource`].
pub struct MeanElementExtractor<S: OrbitalStateSource> {
    source: S,
}

impl<S: OrbitalStateSource> MeanElementExtractor<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Shared access to the wrapped source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Exclusive access to the wrapped source, e.g. to query Cartesian states between two
    /// extractions.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn into_inner(self) -> S {
        self.source
    }

    /// Mean Keplerian elements at `epoch`.
    ///
    /// Arguments
    /// ---------
    /// * `epoch`: target epoch; any offset the source accepts (before or after its reference).
    ///
    /// Return
    /// ------
    /// * The mean elements (frame and `μ` of the source), or [`EphemError::Propagation`]
    ///   carrying `epoch` when the source cannot be advanced there. Nothing partial is returned.
    ///
    /// See also
    /// --------
    /// * [`elements_from_snapshot`] – steps 3 to 8 on an already available snapshot.
    pub fn mean_elements(&mut self, epoch: Epoch) -> Result<KeplerianElements, EphemError> {
        let t_since = minutes_since(epoch, self.source.reference_epoch());

        let snapshot = self
            .source
            .advance_to(t_since)
            .map_err(|e| match e {
                EphemError::Propagation { reason, .. } => EphemError::Propagation { epoch, reason },
                other => EphemError::Propagation {
                    epoch,
                    reason: other.to_string(),
                },
            })?;

        Ok(elements_from_snapshot(
            &snapshot,
            epoch,
            self.source.internal_frame(),
            self.source.equatorial_radius(),
            self.source.gravitational_parameter(),
        ))
    }

    /// Mean elements encoded in `tle`, referenced to the gravitational parameter of the source.
    pub fn reference_mean_elements(&self, tle: &TwoLineElementSet) -> KeplerianElements {
        let mut elements = reference_mean_elements(tle, self.source.gravitational_parameter());
        elements.frame = self.source.internal_frame();
        elements
    }
}

/// Decompose one internal-state snapshot into mean Keplerian elements.
///
/// Arguments
/// ---------
/// * `snapshot`: internal state, all angles read from it and nowhere else.
/// * `epoch`: epoch the snapshot belongs to.
/// * `frame`: frame of the internal elements.
/// * `equatorial_radius`: metres per internal length unit.
/// * `mu`: gravitational parameter (m³/s²) recorded with the elements.
///
/// Return
/// ------
/// * `(a, e, i, Ω, ω, M)` with `M = L − ω − Ω` and Ω, ω, M in `[0, 2π)`.
pub fn elements_from_snapshot(
    snapshot: &PropagatorInternalState,
    epoch: Epoch,
    frame: ReferenceFrame,
    equatorial_radius: f64,
    mu: f64,
) -> KeplerianElements {
    let node = snapshot.ascending_node;
    let argp = snapshot.perigee_argument;
    let mean_anomaly = snapshot.mean_longitude - argp - node;

    KeplerianElements {
        reference_epoch: epoch,
        semi_major_axis: snapshot.semi_major_axis * equatorial_radius,
        eccentricity: snapshot.eccentricity,
        inclination: snapshot.inclination,
        ascending_node_longitude: principal_angle(node),
        periapsis_argument: principal_angle(argp),
        mean_anomaly: principal_angle(mean_anomaly),
        frame,
        mu,
    }
}

/// Mean Keplerian elements encoded in a TLE, at the TLE epoch.
///
/// `a = (μ / n²)^(1/3)` where `n` (rad/s) is the TLE mean motion with the J2 Kozai term removed,
/// exactly as the SGP4 initialization does. e, i, Ω, ω, M are the TLE values. The result is a
/// fixed validation reference: it is never advanced in time.
///
/// Arguments
/// ---------
/// * `tle`: the parsed element set.
/// * `mu`: gravitational parameter (m³/s²).
///
/// Return
/// ------
/// * The reference elements, tagged with the TLE epoch and the TEME frame.
pub fn reference_mean_elements(tle: &TwoLineElementSet, mu: f64) -> KeplerianElements {
    let n_per_min = brouwer_mean_motion(
        tle.mean_motion(),
        tle.eccentricity(),
        tle.inclination(),
        &EARTH_GEOPOTENTIAL,
    );
    let n = n_per_min / SECONDS_PER_MINUTE;

    KeplerianElements {
        reference_epoch: tle.epoch(),
        semi_major_axis: (mu / (n * n)).cbrt(),
        eccentricity: tle.eccentricity(),
        inclination: tle.inclination(),
        ascending_node_longitude: tle.ascending_node(),
        periapsis_argument: tle.perigee_argument(),
        mean_anomaly: tle.mean_anomaly(),
        frame: ReferenceFrame::Teme,
        mu,
    }
}
