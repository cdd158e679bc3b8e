//! # Angle normalization
//!
//! Every angle-valued element emitted by this crate (RAAN, argument of perigee, mean anomaly)
//! passes exactly once through [`principal_angle`]. No other module performs its own
//! `if x < 0 { x += 360 }` style fix-up.

use std::f64::consts::PI;

use crate::constants::{Radian, DPI};

/// Return the principal value of an angle in radians, in `[0, 2π)`.
///
/// `rem_euclid` may round a tiny negative input up to exactly `2π`; that case folds back to `0`
/// so the half-open interval holds for every finite input.
///
/// Arguments
/// ---------
/// * `a`: any finite angle in radians.
///
/// Return
/// ------
/// * The equivalent angle in `[0, 2π)`.
pub fn principal_angle(a: Radian) -> Radian {
    let r = a.rem_euclid(DPI);
    if r >= DPI {
        0.0
    } else {
        r
    }
}

/// Return the principal difference `a - b` in `[-π, π]`.
///
/// Used to compare angles that may sit on either side of the `0/2π` seam.
pub fn angle_diff(a: Radian, b: Radian) -> Radian {
    let a = principal_angle(a);
    let b = principal_angle(b);

    let mut diff = a - b;

    if diff > PI {
        diff -= DPI;
    } else if diff < -PI {
        diff += DPI;
    }

    diff
}
