//! # Orbital state representations
//!
//! - [`CartesianState`]: position/velocity pair tagged with its epoch and frame, as produced
//!   by an [`OrbitalStateSource`](crate::propagator::OrbitalStateSource).
//! - [`keplerian_element::KeplerianElements`]: classical elements `(a, e, i, Ω, ω, M)`,
//!   tagged with the frame and gravitational parameter they refer to.
//! - [`Representation`]: which of the two element families (osculating or mean) a set of
//!   Keplerian elements belongs to.
//!
//! ## Units
//!
//! Everything here is SI: metres, metres per second, radians, m³/s².
//! Conversion to the kilometre/degree reporting units happens only when a row of an
//! [`EphemerisTable`](crate::ephemeris::table::EphemerisTable) is built.

use std::fmt;

use hifitime::Epoch;
use nalgebra::{Matrix3, Vector3};

use crate::ref_system::ReferenceFrame;

/// Classical Keplerian elements structure and Cartesian → Keplerian conversion.
pub mod keplerian_element;

/// Element family carried by a Keplerian element set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Representation {
    /// Instantaneous two-body elements of the perturbed state.
    Osculating,
    /// Secular (Brouwer-Lyddane type) elements read from the propagator's internal state.
    Mean,
}

impl fmt::Display for Representation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Representation::Osculating => f.write_str("Osculating"),
            Representation::Mean => f.write_str("Mean"),
        }
    }
}

/// Inertial Cartesian state.
///
/// Units
/// -----
/// * `position`: metres.
/// * `velocity`: metres per second.
#[derive(Debug, Clone, PartialEq)]
pub struct CartesianState {
    pub epoch: Epoch,
    pub position: Vector3<f64>,
    pub velocity: Vector3<f64>,
    pub frame: ReferenceFrame,
}

impl CartesianState {
    /// Apply a rotation to both vectors and retag the state with the target frame.
    ///
    /// Arguments
    /// ---------
    /// * `rotation`: matrix such that `x_target = rotation · x_self`.
    /// * `frame`: the frame the rotated vectors are expressed in.
    pub fn rotated(&self, rotation: &Matrix3<f64>, frame: ReferenceFrame) -> Self {
        Self {
            epoch: self.epoch,
            position: rotation * self.position,
            velocity: rotation * self.velocity,
            frame,
        }
    }

    /// Specific angular momentum `r × v` (m²/s).
    pub fn angular_momentum(&self) -> Vector3<f64> {
        self.position.cross(&self.velocity)
    }
}
