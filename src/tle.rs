//! # Two-line element sets
//!
//! [`TwoLineElementSet`] is the immutable entry point of the crate: it is built once from the
//! two raw TLE lines and seeds exactly one orbital state source.
//!
//! Column parsing and checksum validation are delegated to [`sgp4::Elements::from_tle`]; this
//! module only adds
//!
//! - the eccentricity range check (`0 ≤ e < 1`),
//! - angle accessors in radians, normalized to `[0, 2π)`,
//! - the TLE epoch as a [`hifitime::Epoch`],
//! - the raw lines, kept for traceability and for the report header (`Display`).

use std::fmt;

use hifitime::Epoch;
use sgp4::Elements;

use crate::constants::{Radian, DPI, MINUTES_PER_DAY, RADEG};
use crate::ephem_errors::EphemError;
use crate::kepler::principal_angle;
use crate::time::datetime_to_epoch;

#[derive(Debug, Clone)]
pub struct TwoLineElementSet {
    line1: String,
    line2: String,
    elements: Elements,
    epoch: Epoch,
}

impl TwoLineElementSet {
    /// Parse a TLE from its two lines.
    ///
    /// Leading/trailing whitespace on each line is ignored.
    ///
    /// Arguments
    /// ---------
    /// * `line1`: first TLE line (`1 NNNNNC ...`).
    /// * `line2`: second TLE line (`2 NNNNN ...`).
    ///
    /// Return
    /// ------
    /// * The parsed element set, or [`EphemError::TleParse`] if the lines are malformed,
    ///   fail their checksum, or encode an eccentricity outside `[0, 1)`.
    pub fn from_lines(line1: &str, line2: &str) -> Result<Self, EphemError> {
        let line1 = line1.trim();
        let line2 = line2.trim();

        let elements = Elements::from_tle(None, line1.as_bytes(), line2.as_bytes())
            .map_err(|e| EphemError::TleParse(format!("{e:?}")))?;

        if !(0.0..1.0).contains(&elements.eccentricity) {
            return Err(EphemError::TleParse(format!(
                "eccentricity {} outside [0, 1)",
                elements.eccentricity
            )));
        }

        let epoch = datetime_to_epoch(&elements.datetime);

        Ok(Self {
            line1: line1.to_string(),
            line2: line2.to_string(),
            elements,
            epoch,
        })
    }

    /// TLE reference epoch (UTC).
    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    /// Parsed element set, as consumed by the SGP4 propagator.
    pub fn elements(&self) -> &Elements {
        &self.elements
    }

    pub fn line1(&self) -> &str {
        &self.line1
    }

    pub fn line2(&self) -> &str {
        &self.line2
    }

    pub fn norad_id(&self) -> u64 {
        self.elements.norad_id
    }

    /// Kozai mean motion as printed in the TLE, in revolutions per day.
    pub fn mean_motion_rev_per_day(&self) -> f64 {
        self.elements.mean_motion
    }

    /// Kozai mean motion in radians per minute (the SGP4 `no_kozai` input).
    pub fn mean_motion(&self) -> f64 {
        self.elements.mean_motion * DPI / MINUTES_PER_DAY
    }

    pub fn eccentricity(&self) -> f64 {
        self.elements.eccentricity
    }

    /// Inclination in radians, `[0, π]`.
    pub fn inclination(&self) -> Radian {
        self.elements.inclination * RADEG
    }

    /// Right ascension of the ascending node in radians, `[0, 2π)`.
    pub fn ascending_node(&self) -> Radian {
        principal_angle(self.elements.right_ascension * RADEG)
    }

    /// Argument of perigee in radians, `[0, 2π)`.
    pub fn perigee_argument(&self) -> Radian {
        principal_angle(self.elements.argument_of_perigee * RADEG)
    }

    /// Mean anomaly in radians, `[0, 2π)`.
    pub fn mean_anomaly(&self) -> Radian {
        principal_angle(self.elements.mean_anomaly * RADEG)
    }

    /// B* drag term, in inverse Earth radii.
    pub fn bstar(&self) -> f64 {
        self.elements.drag_term
    }
}

impl fmt::Display for TwoLineElementSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "TLE epoch : {}", self.epoch)?;
        writeln!(f, "TLE line 1: {}", self.line1)?;
        write!(f, "TLE line 2: {}", self.line2)
    }
}

#[cfg(test)]
pub(crate) mod tle_test {
    use super::*;
    use approx::assert_relative_eq;

    pub(crate) const LINE1: &str =
        "1 58918U 24024B   25173.92752492  .00004806  00000-0  24653-3 0  9992";
    pub(crate) const LINE2: &str =
        "2 58918  97.3509 245.6212 0011797 302.3575  57.6516 15.16942229 76787";

    #[test]
    fn test_parse_sample_tle() {
        let tle = TwoLineElementSet::from_lines(LINE1, LINE2).unwrap();

        assert_eq!(tle.norad_id(), 58918);
        assert_relative_eq!(tle.eccentricity(), 0.0011797, epsilon = 1e-12);
        assert_relative_eq!(tle.inclination(), 97.3509 * RADEG, epsilon = 1e-12);
        assert_relative_eq!(tle.ascending_node(), 245.6212 * RADEG, epsilon = 1e-12);
        assert_relative_eq!(tle.perigee_argument(), 302.3575 * RADEG, epsilon = 1e-12);
        assert_relative_eq!(tle.mean_anomaly(), 57.6516 * RADEG, epsilon = 1e-12);
        assert_relative_eq!(tle.mean_motion_rev_per_day(), 15.16942229, epsilon = 1e-12);
        assert_relative_eq!(tle.bstar(), 0.24653e-3, epsilon = 1e-12);
    }

    #[test]
    fn test_epoch_day_of_year() {
        let tle = TwoLineElementSet::from_lines(LINE1, LINE2).unwrap();
        // day 173 of 2025 is June 22nd, .92752492 day ≈ 22:15:38
        let expected = Epoch::from_gregorian_utc(2025, 6, 22, 22, 15, 38, 0);
        let diff = (tle.epoch() - expected).to_seconds();
        assert!((0.0..1.0).contains(&diff), "epoch offset {diff} s");
    }

    #[test]
    fn test_report_header() {
        let tle = TwoLineElementSet::from_lines(LINE1, LINE2).unwrap();
        let header = tle.to_string();
        assert!(header.contains("2025-06-22"));
        assert!(header.contains(LINE1));
        assert!(header.contains(LINE2));
    }

    #[test]
    fn test_reject_malformed() {
        let err = TwoLineElementSet::from_lines(LINE1, "2 58918  97.3509").unwrap_err();
        assert_eq!(err.kind(), "ParseError");
    }
}
