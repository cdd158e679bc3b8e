//! # Keplerian orbital elements
//!
//! This module defines [`KeplerianElements`], the full-precision classical element set
//! shared by both element families of the crate, and the two-body conversion from an
//! inertial Cartesian state ([`KeplerianElements::from_cartesian`]).
//!
//! ## Elements
//!
//! 1. **a** – Semi-major axis (m)
//! 2. **e** – Eccentricity
//! 3. **i** – Inclination (rad, `[0, π]`)
//! 4. **Ω** – Right ascension of the ascending node (rad, `[0, 2π)`)
//! 5. **ω** – Argument of perigee (rad, `[0, 2π)`)
//! 6. **M** – Mean anomaly (rad, `[0, 2π)`)
//!
//! Every set carries its epoch, the frame its angles are measured in, and the gravitational
//! parameter `μ` it is referenced to, so that elements built from different sources can be
//! compared only when they really refer to the same thing.
//!
//! ## Degeneracies
//!
//! The Cartesian conversion refuses orbits for which the classical set is ill-conditioned
//! instead of silently picking a convention:
//!
//! - angular momentum ≈ 0 (rectilinear motion),
//! - non-negative orbital energy (parabolic or hyperbolic),
//! - `e ≈ 0` (ω undefined),
//! - `sin i ≈ 0` (Ω undefined).
//!
//! Each case maps to [`EphemError::DegenerateOrbit`] carrying the state epoch.

use std::fmt;

use hifitime::Epoch;
use nalgebra::{Rotation3, Vector3};

use crate::constants::{Radian, KM_TO_M, RADEG};
use crate::ephem_errors::EphemError;
use crate::kepler::principal_angle;
use crate::orbit_type::CartesianState;
use crate::ref_system::ReferenceFrame;

/// Below this eccentricity the argument of perigee is considered undefined.
const ECCENTRICITY_FLOOR: f64 = 1e-10;

/// Below this `sin i` the ascending node is considered undefined.
const SIN_INCLINATION_FLOOR: f64 = 1e-10;

/// Below this ratio `|r × v| / (|r| |v|)` the motion is considered rectilinear.
const ANGULAR_MOMENTUM_FLOOR: f64 = 1e-12;

/// Classical Keplerian elements (SI units, radians).
///
/// See also
/// --------
/// * [`KeplerianElements::from_cartesian`] – osculating elements of a Cartesian state.
/// * [`crate::mean_elements::MeanElementExtractor`] – mean elements from the propagator.
#[derive(Debug, PartialEq, Clone)]
pub struct KeplerianElements {
    pub reference_epoch: Epoch,
    pub semi_major_axis: f64,
    pub eccentricity: f64,
    pub inclination: Radian,
    pub ascending_node_longitude: Radian,
    pub periapsis_argument: Radian,
    pub mean_anomaly: Radian,
    pub frame: ReferenceFrame,
    pub mu: f64,
}

impl KeplerianElements {
    /// Convert an inertial Cartesian state into osculating Keplerian elements.
    ///
    /// The state is first expressed in the orbital frame (x along the line of nodes, z along
    /// the angular momentum), then the elliptic two-body relations give
    ///
    /// ```text
    /// 1/a    = 2/r − v²/μ
    /// e sinE = (r·v) / (n a²)
    /// e cosE = r v² / μ − 1
    /// M      = E − e sinE
    /// ```
    ///
    /// Ω, ω and M are normalized once with [`principal_angle`].
    ///
    /// Arguments
    /// ---------
    /// * `state`: position (m) and velocity (m/s); the frame is copied into the result.
    /// * `mu`: gravitational parameter (m³/s²) the elements are referenced to.
    ///
    /// Return
    /// ------
    /// * The element set, or [`EphemError::DegenerateOrbit`] when the classical elements are
    ///   not defined for this state.
    pub fn from_cartesian(state: &CartesianState, mu: f64) -> Result<Self, EphemError> {
        let degenerate = |reason: String| EphemError::DegenerateOrbit {
            epoch: state.epoch,
            reason,
        };

        let r = state.position;
        let v = state.velocity;

        // Angular momentum and its direction
        let elle = state.angular_momentum();
        let elmod = elle.norm();
        if elmod <= ANGULAR_MOMENTUM_FLOOR * r.norm() * v.norm() {
            return Err(degenerate(format!(
                "angular momentum too small (|h| = {elmod:e} m²/s)"
            )));
        }
        let elv = elle / elmod;

        // Inclination and longitude of the node
        let sini = (elv.x * elv.x + elv.y * elv.y).sqrt();
        if sini < SIN_INCLINATION_FLOOR {
            return Err(degenerate(format!(
                "equatorial orbit, ascending node undefined (sin i = {sini:e})"
            )));
        }
        let ainc = sini.atan2(elv.z);
        let anod = elv.x.atan2(-elv.y);

        // Orbital frame: x toward the ascending node, z along the angular momentum
        let rot = Rotation3::from_axis_angle(&Vector3::x_axis(), -ainc)
            * Rotation3::from_axis_angle(&Vector3::z_axis(), -anod);
        let xorb = rot * r;
        let vorb = rot * v;

        let rs = xorb.norm();
        let v2 = vorb.norm_squared();
        let rv = xorb.dot(&vorb);

        // Reciprocal semi-major axis
        let reca = 2.0 / rs - v2 / mu;
        if reca <= 0.0 {
            return Err(degenerate(format!(
                "unbound orbit (1/a = {reca:e} 1/m)"
            )));
        }
        let sma = 1.0 / reca;
        let enne = (mu / sma.powi(3)).sqrt();

        // Eccentricity and eccentric anomaly
        let esine = rv / (enne * sma * sma);
        let ecose = v2 * rs / mu - 1.0;
        let ecc = (esine * esine + ecose * ecose).sqrt();
        if ecc < ECCENTRICITY_FLOOR {
            return Err(degenerate(format!(
                "circular orbit, argument of perigee undefined (e = {ecc:e})"
            )));
        }
        let anec = esine.atan2(ecose);
        let emme = anec - ecc * anec.sin();

        // Argument of perigee from the direction of the true anomaly
        let x1 = anec.cos() - ecc;
        let x2 = (1.0 - ecc * ecc).sqrt() * anec.sin();
        let xm = (x1 * x1 + x2 * x2).sqrt();
        let (cosf, sinf) = (x1 / xm, x2 / xm);
        let sinper = cosf * xorb.y - sinf * xorb.x;
        let cosper = cosf * xorb.x + sinf * xorb.y;
        let argper = sinper.atan2(cosper);

        Ok(Self {
            reference_epoch: state.epoch,
            semi_major_axis: sma,
            eccentricity: ecc,
            inclination: ainc,
            ascending_node_longitude: principal_angle(anod),
            periapsis_argument: principal_angle(argper),
            mean_anomaly: principal_angle(emme),
            frame: state.frame,
            mu,
        })
    }

    /// Anomalistic period `2π sqrt(a³/μ)`, in seconds.
    pub fn period(&self) -> f64 {
        std::f64::consts::TAU * (self.semi_major_axis.powi(3) / self.mu).sqrt()
    }
}

impl fmt::Display for KeplerianElements {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Keplerian Elements @ {} ({}, mu = {:.6e} m^3/s^2)",
            self.reference_epoch, self.frame, self.mu
        )?;
        writeln!(f, "-------------------------------------------")?;
        writeln!(
            f,
            "  a   (semi-major axis)       = {:.6} km",
            self.semi_major_axis / KM_TO_M
        )?;
        writeln!(
            f,
            "  e   (eccentricity)          = {:.9}",
            self.eccentricity
        )?;
        writeln!(
            f,
            "  i   (inclination)           = {:.6}°",
            self.inclination / RADEG
        )?;
        writeln!(
            f,
            "  Ω   (RAAN)                  = {:.6}°",
            self.ascending_node_longitude / RADEG
        )?;
        writeln!(
            f,
            "  ω   (argument of perigee)   = {:.6}°",
            self.periapsis_argument / RADEG
        )?;
        writeln!(
            f,
            "  M   (mean anomaly)          = {:.6}°",
            self.mean_anomaly / RADEG
        )
    }
}
