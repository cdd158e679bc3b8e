//! # Earth orientation: obliquity, nutation and the equation of the equinoxes
//!
//! The SGP4 propagator delivers states in the TEME frame (true equator, mean equinox). Moving
//! such a state to the True-of-Date frame only requires the **equation of the equinoxes**, the
//! angle between the mean and the true equinox measured along the true equator.
//!
//! ## Models
//!
//! - Mean obliquity of the ecliptic: IAU 1976 polynomial ([`obleq`]).
//! - Nutation in longitude and obliquity: IAU 1980 series, truncated to its dominant terms
//!   ([`nutn80`]). The retained terms keep Δψ within a few milliarcseconds of the full series,
//!   far below the SGP4 model error.
//! - Equation of the equinoxes: `Δψ cos ε`, plus the two lunar-node terms introduced in 1994
//!   ([`equequ`]).
//!
//! All functions take the epoch as a Modified Julian Date on the TT scale.

use crate::constants::{ArcSec, Radian, DPI, RADSEC, T2000};

/// One periodic term of the IAU 1980 nutation series.
///
/// Multipliers of (l, l', F, D, Ω), then the longitude coefficients `(A, B)` and obliquity
/// coefficients `(C, D)` in units of 0.1 milliarcsecond, the second of each pair per Julian century.
struct NutationTerm {
    args: [f64; 5],
    psi: (f64, f64),
    eps: (f64, f64),
}

const fn term(args: [f64; 5], psi: (f64, f64), eps: (f64, f64)) -> NutationTerm {
    NutationTerm { args, psi, eps }
}

#[rustfmt::skip]
const NUTATION_1980: [NutationTerm; 18] = [
    term([ 0.0,  0.0, 0.0,  0.0, 1.0], (-171996.0, -174.2), (92025.0,  8.9)),
    term([ 0.0,  0.0, 2.0, -2.0, 2.0], ( -13187.0,   -1.6), ( 5736.0, -3.1)),
    term([ 0.0,  0.0, 2.0,  0.0, 2.0], (  -2274.0,   -0.2), (  977.0, -0.5)),
    term([ 0.0,  0.0, 0.0,  0.0, 2.0], (   2062.0,    0.2), ( -895.0,  0.5)),
    term([ 0.0,  1.0, 0.0,  0.0, 0.0], (   1426.0,   -3.4), (   54.0, -0.1)),
    term([ 1.0,  0.0, 0.0,  0.0, 0.0], (    712.0,    0.1), (   -7.0,  0.0)),
    term([ 0.0,  1.0, 2.0, -2.0, 2.0], (   -517.0,    1.2), (  224.0, -0.6)),
    term([ 0.0,  0.0, 2.0,  0.0, 1.0], (   -386.0,   -0.4), (  200.0,  0.0)),
    term([ 1.0,  0.0, 2.0,  0.0, 2.0], (   -301.0,    0.0), (  129.0, -0.1)),
    term([ 0.0, -1.0, 2.0, -2.0, 2.0], (    217.0,   -0.5), (  -95.0,  0.3)),
    term([ 1.0,  0.0, 0.0, -2.0, 0.0], (   -158.0,    0.0), (    0.0,  0.0)),
    term([ 0.0,  0.0, 2.0, -2.0, 1.0], (    129.0,    0.1), (  -70.0,  0.0)),
    term([-1.0,  0.0, 2.0,  0.0, 2.0], (    123.0,    0.0), (  -53.0,  0.0)),
    term([ 1.0,  0.0, 0.0,  0.0, 1.0], (     63.0,    0.1), (  -33.0,  0.0)),
    term([ 0.0,  0.0, 0.0,  2.0, 0.0], (     63.0,    0.0), (    0.0,  0.0)),
    term([-1.0,  0.0, 2.0,  2.0, 2.0], (    -59.0,    0.0), (   26.0,  0.0)),
    term([-1.0,  0.0, 0.0,  0.0, 1.0], (    -58.0,   -0.1), (   32.0,  0.0)),
    term([ 1.0,  0.0, 2.0,  0.0, 1.0], (    -51.0,    0.0), (   27.0,  0.0)),
];

/// Julian centuries of TT elapsed since J2000.0.
fn centuries_since_j2000(tjm: f64) -> f64 {
    (tjm - T2000) / 36525.0
}

/// Mean obliquity of the ecliptic (IAU 1976), in radians.
///
/// Arguments
/// ---------
/// * `tjm`: Modified Julian Date (TT).
///
/// Return
/// ------
/// * ε = 23°26'21.448" − 46.815" T − 0.00059" T² + 0.001813" T³, evaluated with Horner's scheme.
pub fn obleq(tjm: f64) -> Radian {
    let t = centuries_since_j2000(tjm);
    let eps_arcsec = ((0.001813 * t - 0.00059) * t - 46.815) * t + 84381.448;
    eps_arcsec * RADSEC
}

/// Delaunay arguments (l, l', F, D, Ω) of the IAU 1980 theory, in radians.
fn delaunay_arguments(t: f64) -> [Radian; 5] {
    let poly = |c0: f64, c1: f64, c2: f64, c3: f64| -> Radian {
        ((((c3 * t + c2) * t + c1) * t + c0) * RADSEC) % DPI
    };

    [
        poly(485866.733, 1717915922.633, 31.310, 0.064),
        poly(1287099.804, 129596581.224, -0.577, -0.012),
        poly(335778.877, 1739527263.137, -13.257, 0.011),
        poly(1072261.307, 1602961601.328, -6.891, 0.019),
        poly(450160.280, -6962890.539, 7.455, 0.008),
    ]
}

/// Nutation in longitude and obliquity (IAU 1980, dominant terms).
///
/// Arguments
/// ---------
/// * `tjm`: Modified Julian Date (TT).
///
/// Return
/// ------
/// * `(Δψ, Δε)` in arcseconds.
///
/// See also
/// --------
/// * [`equequ`] – projects Δψ onto the true equator.
pub fn nutn80(tjm: f64) -> (ArcSec, ArcSec) {
    let t = centuries_since_j2000(tjm);
    let fundamental = delaunay_arguments(t);

    let (dpsi, deps) = NUTATION_1980.iter().fold((0.0, 0.0), |(dpsi, deps), term| {
        let arg: f64 = term
            .args
            .iter()
            .zip(fundamental.iter())
            .map(|(k, a)| k * a)
            .sum();
        (
            dpsi + (term.psi.0 + term.psi.1 * t) * arg.sin(),
            deps + (term.eps.0 + term.eps.1 * t) * arg.cos(),
        )
    });

    (dpsi * 1e-4, deps * 1e-4)
}

/// Equation of the equinoxes, in radians.
///
/// ```text
/// Eq_eq = Δψ cos ε + 0.00264" sin Ω + 0.000063" sin 2Ω
/// ```
///
/// Arguments
/// ---------
/// * `tjm`: Modified Julian Date (TT).
///
/// See also
/// --------
/// * [`crate::ref_system::ReferenceFrame::rotation_from_teme`] – uses it to rotate TEME
///   into True-of-Date.
pub fn equequ(tjm: f64) -> Radian {
    let oblm = obleq(tjm);
    let (dpsi, _deps) = nutn80(tjm);
    let node = delaunay_arguments(centuries_since_j2000(tjm))[4];

    RADSEC * (dpsi * oblm.cos() + 0.00264 * node.sin() + 0.000063 * (2.0 * node).sin())
}
