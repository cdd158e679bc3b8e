//! # SGP4 secular recurrence (near-Earth)
//!
//! The `sgp4` crate only publishes the final position and velocity. The mean-element extractor
//! needs the variables the theory carries *before* the long- and short-period corrections are
//! added, so this module evaluates that part of SGP4 on its own:
//!
//! - recovery of the Brouwer mean motion and semi-major axis from the TLE (Kozai) mean motion,
//! - J2/J4 secular rates of the node, the perigee and the mean anomaly,
//! - the atmospheric drag polynomials in `t` driven by B* (`C1`…`C5`, `D2`…`D4`).
//!
//! The result at `t_since` minutes is the secular element set `(a, e, i, Ω, ω, L)` with
//! `a` in Earth radii and `L = Ω + ω + M` the mean longitude.
//!
//! ## Scope
//!
//! Only the near-Earth branch (orbital period below 225 minutes) is modelled. For deep-space
//! element sets the lunisolar and resonance terms are missing, so [`SecularModel::state_at`]
//! returns [`SecularError::DeepSpace`] instead of an incomplete state.
//!
//! ## Reference
//!
//! Vallado, Crawford, Hujsak, Kelso, *Revisiting Spacetrack Report #3*, AIAA 2006-6753.

use sgp4::Geopotential;
use thiserror::Error;

use crate::constants::{Minutes, DPI};
use crate::propagator::PropagatorInternalState;
use crate::tle::TwoLineElementSet;

const X2O3: f64 = 2.0 / 3.0;

/// Orbital period (minutes) above which SGP4 switches to the deep-space theory.
pub const DEEP_SPACE_PERIOD: Minutes = 225.0;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SecularError {
    #[error("deep-space secular terms are not modelled (period {period:.1} min)")]
    DeepSpace { period: Minutes },

    #[error("mean motion {0} rad/min is not positive")]
    NonPositiveMeanMotion(f64),

    #[error("mean eccentricity {0} not within [-0.001, 1)")]
    EccentricityOutOfRange(f64),

    #[error("satellite has decayed (mean perigee at {0:.6} earth radii)")]
    Decayed(f64),
}

/// Recover the Brouwer ("un-Kozai'd") mean motion from the TLE mean motion.
///
/// TLE mean motions follow Kozai's definition; SGP4 first removes the J2 part of it so that
/// Kepler's third law `a = (ke / n)^(2/3)` gives the Brouwer mean semi-major axis.
///
/// Arguments
/// ---------
/// * `no_kozai`: TLE mean motion (rad/min).
/// * `ecco`: TLE eccentricity.
/// * `inclo`: TLE inclination (rad).
/// * `geopotential`: Earth model (`ke` in ER^1.5/min, `j2`).
///
/// Return
/// ------
/// * The Brouwer mean motion in rad/min.
pub fn brouwer_mean_motion(
    no_kozai: f64,
    ecco: f64,
    inclo: f64,
    geopotential: &Geopotential,
) -> f64 {
    let omeosq = 1.0 - ecco * ecco;
    let rteosq = omeosq.sqrt();
    let cosio2 = inclo.cos().powi(2);

    let ak = (geopotential.ke / no_kozai).powf(X2O3);
    let d1 = 0.75 * geopotential.j2 * (3.0 * cosio2 - 1.0) / (rteosq * omeosq);
    let del = d1 / (ak * ak);
    let adel = ak * (1.0 - del * del - del * (1.0 / 3.0 + 134.0 * del * del / 81.0));
    let del = d1 / (adel * adel);

    no_kozai / (1.0 + del)
}

/// Drag terms that only apply when the perigee is above 220 km.
#[derive(Debug, Clone, Copy)]
struct HighPerigeeTerms {
    omgcof: f64,
    xmcof: f64,
    delmo: f64,
    sinmao: f64,
    eta: f64,
    cc5: f64,
    d2: f64,
    d3: f64,
    d4: f64,
    t3cof: f64,
    t4cof: f64,
    t5cof: f64,
}

/// Secular part of SGP4, initialized once from a TLE.
#[derive(Debug, Clone)]
pub struct SecularModel {
    ke: f64,
    no_unkozai: f64,
    ecco: f64,
    inclo: f64,
    nodeo: f64,
    argpo: f64,
    mo: f64,
    bstar: f64,
    mdot: f64,
    argpdot: f64,
    nodedot: f64,
    nodecf: f64,
    cc1: f64,
    cc4: f64,
    t2cof: f64,
    high_perigee: Option<HighPerigeeTerms>,
    deep_space: bool,
}

impl SecularModel {
    /// Initialize the secular recurrence from a TLE.
    ///
    /// Arguments
    /// ---------
    /// * `tle`: parsed element set.
    /// * `geopotential`: Earth model shared with the Cartesian propagator.
    ///
    /// Return
    /// ------
    /// * The model, or [`SecularError::NonPositiveMeanMotion`] if the Brouwer mean motion is
    ///   not usable.
    pub fn new(tle: &TwoLineElementSet, geopotential: &Geopotential) -> Result<Self, SecularError> {
        let ae = geopotential.ae;
        let ke = geopotential.ke;
        let j2 = geopotential.j2;
        let j3oj2 = geopotential.j3 / geopotential.j2;
        let j4 = geopotential.j4;

        let ecco = tle.eccentricity();
        let inclo = tle.inclination();
        let argpo = tle.perigee_argument();
        let mo = tle.mean_anomaly();
        let bstar = tle.bstar();

        let no_unkozai = brouwer_mean_motion(tle.mean_motion(), ecco, inclo, geopotential);
        if !(no_unkozai.is_finite() && no_unkozai > 0.0) {
            return Err(SecularError::NonPositiveMeanMotion(no_unkozai));
        }

        let omeosq = 1.0 - ecco * ecco;
        let rteosq = omeosq.sqrt();
        let (sinio, cosio) = inclo.sin_cos();
        let cosio2 = cosio * cosio;
        let cosio4 = cosio2 * cosio2;

        let ao = (ke / no_unkozai).powf(X2O3);
        let po = ao * omeosq;
        let posq = po * po;
        let con42 = 1.0 - 5.0 * cosio2;
        let con41 = 3.0 * cosio2 - 1.0;
        let rp = ao * (1.0 - ecco);

        // Atmospheric density parameters, adjusted for low perigees
        let perige = (rp - 1.0) * ae;
        let (sfour, qzms24) = if perige < 156.0 {
            let s = if perige < 98.0 { 20.0 } else { perige - 78.0 };
            (s / ae + 1.0, ((120.0 - s) / ae).powi(4))
        } else {
            (78.0 / ae + 1.0, ((120.0 - 78.0) / ae).powi(4))
        };

        let pinvsq = 1.0 / posq;
        let tsi = 1.0 / (ao - sfour);
        let eta = ao * ecco * tsi;
        let etasq = eta * eta;
        let eeta = ecco * eta;
        let psisq = (1.0 - etasq).abs();
        let coef = qzms24 * tsi.powi(4);
        let coef1 = coef / psisq.powf(3.5);

        let cc2 = coef1
            * no_unkozai
            * (ao * (1.0 + 1.5 * etasq + eeta * (4.0 + etasq))
                + 0.375 * j2 * tsi / psisq * con41 * (8.0 + 3.0 * etasq * (8.0 + etasq)));
        let cc1 = bstar * cc2;
        let cc3 = if ecco > 1.0e-4 {
            -2.0 * coef * tsi * j3oj2 * no_unkozai * sinio / ecco
        } else {
            0.0
        };
        let x1mth2 = 1.0 - cosio2;
        let cc4 = 2.0
            * no_unkozai
            * coef1
            * ao
            * omeosq
            * (eta * (2.0 + 0.5 * etasq) + ecco * (0.5 + 2.0 * etasq)
                - j2 * tsi / (ao * psisq)
                    * (-3.0 * con41 * (1.0 - 2.0 * eeta + etasq * (1.5 - 0.5 * eeta))
                        + 0.75 * x1mth2 * (2.0 * etasq - eeta * (1.0 + etasq)) * (2.0 * argpo).cos()));
        let cc5 = 2.0 * coef1 * ao * omeosq * (1.0 + 2.75 * (etasq + eeta) + eeta * etasq);

        // Secular rates from J2 and J4
        let temp1 = 1.5 * j2 * pinvsq * no_unkozai;
        let temp2 = 0.5 * temp1 * j2 * pinvsq;
        let temp3 = -0.46875 * j4 * pinvsq * pinvsq * no_unkozai;
        let mdot = no_unkozai
            + 0.5 * temp1 * rteosq * con41
            + 0.0625 * temp2 * rteosq * (13.0 - 78.0 * cosio2 + 137.0 * cosio4);
        let argpdot = -0.5 * temp1 * con42
            + 0.0625 * temp2 * (7.0 - 114.0 * cosio2 + 395.0 * cosio4)
            + temp3 * (3.0 - 36.0 * cosio2 + 49.0 * cosio4);
        let xhdot1 = -temp1 * cosio;
        let nodedot = xhdot1
            + (0.5 * temp2 * (4.0 - 19.0 * cosio2) + 2.0 * temp3 * (3.0 - 7.0 * cosio2)) * cosio;
        let nodecf = 3.5 * omeosq * xhdot1 * cc1;
        let t2cof = 1.5 * cc1;

        let deep_space = DPI / no_unkozai >= DEEP_SPACE_PERIOD;

        // Perigee below 220 km: truncated drag model
        let simplified = rp < 220.0 / ae + 1.0 || deep_space;
        let high_perigee = (!simplified).then(|| {
            let cc1sq = cc1 * cc1;
            let d2 = 4.0 * ao * tsi * cc1sq;
            let temp = d2 * tsi * cc1 / 3.0;
            let d3 = (17.0 * ao + sfour) * temp;
            let d4 = 0.5 * temp * ao * tsi * (221.0 * ao + 31.0 * sfour) * cc1;
            let delmotemp = 1.0 + eta * mo.cos();
            HighPerigeeTerms {
                omgcof: bstar * cc3 * argpo.cos(),
                xmcof: if ecco > 1.0e-4 {
                    -X2O3 * coef * bstar / eeta
                } else {
                    0.0
                },
                delmo: delmotemp.powi(3),
                sinmao: mo.sin(),
                eta,
                cc5,
                d2,
                d3,
                d4,
                t3cof: d2 + 2.0 * cc1sq,
                t4cof: 0.25 * (3.0 * d3 + cc1 * (12.0 * d2 + 10.0 * cc1sq)),
                t5cof: 0.2
                    * (3.0 * d4 + 12.0 * cc1 * d3 + 6.0 * d2 * d2 + 15.0 * cc1sq * (2.0 * d2 + cc1sq)),
            }
        });

        Ok(Self {
            ke,
            no_unkozai,
            ecco,
            inclo,
            nodeo: tle.ascending_node(),
            argpo,
            mo,
            bstar,
            mdot,
            argpdot,
            nodedot,
            nodecf,
            cc1,
            cc4,
            t2cof,
            high_perigee,
            deep_space,
        })
    }

    /// Brouwer mean motion at epoch (rad/min).
    pub fn mean_motion(&self) -> f64 {
        self.no_unkozai
    }

    /// Orbital period from the Brouwer mean motion (minutes).
    pub fn period(&self) -> Minutes {
        DPI / self.no_unkozai
    }

    pub fn is_deep_space(&self) -> bool {
        self.deep_space
    }

    /// Evaluate the secular elements `t_since` minutes after the TLE epoch.
    ///
    /// Arguments
    /// ---------
    /// * `t_since`: time offset in minutes (negative offsets propagate backward).
    ///
    /// Return
    /// ------
    /// * The internal state, or a [`SecularError`] when the recurrence leaves its domain
    ///   (deep space, non-positive mean motion, eccentricity out of range, decay).
    pub fn state_at(&self, t_since: Minutes) -> Result<PropagatorInternalState, SecularError> {
        if self.deep_space {
            return Err(SecularError::DeepSpace {
                period: self.period(),
            });
        }

        let t = t_since;
        let t2 = t * t;

        let xmdf = self.mo + self.mdot * t;
        let argpdf = self.argpo + self.argpdot * t;
        let mut nodem = self.nodeo + self.nodedot * t + self.nodecf * t2;
        let mut argpm = argpdf;
        let mut mm = xmdf;

        let mut tempa = 1.0 - self.cc1 * t;
        let mut tempe = self.bstar * self.cc4 * t;
        let mut templ = self.t2cof * t2;

        if let Some(hp) = &self.high_perigee {
            let delomg = hp.omgcof * t;
            let delm = hp.xmcof * ((1.0 + hp.eta * xmdf.cos()).powi(3) - hp.delmo);
            let temp = delomg + delm;
            mm = xmdf + temp;
            argpm = argpdf - temp;

            let t3 = t2 * t;
            let t4 = t3 * t;
            tempa -= hp.d2 * t2 + hp.d3 * t3 + hp.d4 * t4;
            tempe += self.bstar * hp.cc5 * (mm.sin() - hp.sinmao);
            templ += hp.t3cof * t3 + t4 * (hp.t4cof + t * hp.t5cof);
        }

        let nm = self.no_unkozai;
        if nm <= 0.0 {
            return Err(SecularError::NonPositiveMeanMotion(nm));
        }

        let am = (self.ke / nm).powf(X2O3) * tempa * tempa;
        let mut em = self.ecco - tempe;
        if !(-0.001..1.0).contains(&em) {
            return Err(SecularError::EccentricityOutOfRange(em));
        }
        if em < 1.0e-6 {
            em = 1.0e-6;
        }

        let perigee = am * (1.0 - em);
        if perigee < 1.0 {
            return Err(SecularError::Decayed(perigee));
        }

        mm += self.no_unkozai * templ;
        let xlm = mm + argpm + nodem;
        nodem %= DPI;
        argpm %= DPI;

        Ok(PropagatorInternalState {
            t_since,
            semi_major_axis: am,
            eccentricity: em,
            inclination: self.inclo,
            ascending_node: nodem,
            perigee_argument: argpm,
            mean_longitude: xlm,
        })
    }
}
