//! # Inertial reference frames
//!
//! Two frames are handled, both with the true equator of date as fundamental plane:
//!
//! - [`ReferenceFrame::Teme`]: True Equator, Mean Equinox. This is the frame the SGP4 theory
//!   works in, so Cartesian states and the propagator's internal elements are expressed in it.
//! - [`ReferenceFrame::TrueOfDate`]: True Equator, True Equinox of date. It differs from TEME by
//!   a single rotation about the z axis by the equation of the equinoxes.
//!
//! A vector expressed in TEME is moved into TOD with
//!
//! ```text
//! r_TOD = R_z(Eq_eq) · r_TEME
//! ```
//!
//! where `R_z(α)` is the active rotation of angle `α` about z (see [`rotz`]).

use std::fmt;

use hifitime::Epoch;
use nalgebra::{Matrix3, Rotation3, Vector3};

use crate::constants::Radian;
use crate::earth_orientation::equequ;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReferenceFrame {
    /// True Equator, Mean Equinox (SGP4 native frame).
    Teme,
    /// True Equator, True Equinox of date.
    #[default]
    TrueOfDate,
}

impl ReferenceFrame {
    /// Rotation matrix taking a TEME vector at `epoch` into this frame.
    ///
    /// Arguments
    /// ---------
    /// * `epoch`: the instant the vector refers to (the equinox moves with time).
    ///
    /// Return
    /// ------
    /// * Identity for [`ReferenceFrame::Teme`], `R_z(Eq_eq(epoch))` for [`ReferenceFrame::TrueOfDate`].
    ///
    /// See also
    /// --------
    /// * [`equequ`] – equation of the equinoxes (IAU 1980 nutation)
    pub fn rotation_from_teme(&self, epoch: Epoch) -> Matrix3<f64> {
        match self {
            ReferenceFrame::Teme => Matrix3::identity(),
            ReferenceFrame::TrueOfDate => rotz(equequ(epoch.to_mjd_tt_days())),
        }
    }

    /// Rotation matrix taking a vector of this frame into `target` at `epoch`.
    ///
    /// Both frames share the true equator, so the path always goes through TEME:
    /// `R = R_target←TEME · R_self←TEMEᵀ`.
    pub fn rotation_to(&self, target: ReferenceFrame, epoch: Epoch) -> Matrix3<f64> {
        if *self == target {
            return Matrix3::identity();
        }
        target.rotation_from_teme(epoch) * self.rotation_from_teme(epoch).transpose()
    }

    /// Short label used in reports.
    pub fn name(&self) -> &'static str {
        match self {
            ReferenceFrame::Teme => "TEME",
            ReferenceFrame::TrueOfDate => "TOD",
        }
    }
}

impl fmt::Display for ReferenceFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Active rotation of angle `alpha` (radians) about the z axis.
pub fn rotz(alpha: Radian) -> Matrix3<f64> {
    Rotation3::from_axis_angle(&Vector3::z_axis(), alpha).into()
}
