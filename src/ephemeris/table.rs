//! # Ephemeris tables
//!
//! Output containers of the tabulator:
//!
//! - [`KeplerianElementSample`]: one row, in report units (km, degrees).
//! - [`SampleFailure`]: one skipped epoch, with the error that caused the skip.
//! - [`EphemerisTable`]: chronological rows of one representation in one frame, plus the
//!   failures recorded during the same run.
//! - [`DualEphemeris`]: the osculating and mean tables of a single pass.

use std::fmt;

use hifitime::{Duration, Epoch};
use itertools::Itertools;

use crate::constants::{Degree, Kilometer, KM_TO_M, RADEG};
use crate::ephem_errors::EphemError;
use crate::orbit_type::keplerian_element::KeplerianElements;
use crate::orbit_type::Representation;
use crate::ref_system::ReferenceFrame;

/// One ephemeris row.
///
/// Angles are the already normalized radians of the source [`KeplerianElements`] expressed in
/// degrees: RAAN, ω and M lie in `[0, 360)`, the inclination in `[0, 180]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeplerianElementSample {
    pub epoch: Epoch,
    pub semi_major_axis_km: Kilometer,
    pub eccentricity: f64,
    pub inclination_deg: Degree,
    pub raan_deg: Degree,
    pub periapsis_argument_deg: Degree,
    pub mean_anomaly_deg: Degree,
}

impl KeplerianElementSample {
    /// The six element values in the fixed order `(a, e, i, RAAN, ω, M)`.
    pub fn values(&self) -> [f64; 6] {
        [
            self.semi_major_axis_km,
            self.eccentricity,
            self.inclination_deg,
            self.raan_deg,
            self.periapsis_argument_deg,
            self.mean_anomaly_deg,
        ]
    }
}

impl From<&KeplerianElements> for KeplerianElementSample {
    fn from(elements: &KeplerianElements) -> Self {
        Self {
            epoch: elements.reference_epoch,
            semi_major_axis_km: elements.semi_major_axis / KM_TO_M,
            eccentricity: elements.eccentricity,
            inclination_deg: elements.inclination / RADEG,
            raan_deg: elements.ascending_node_longitude / RADEG,
            periapsis_argument_deg: elements.periapsis_argument / RADEG,
            mean_anomaly_deg: elements.mean_anomaly / RADEG,
        }
    }
}

/// A grid epoch for which no row could be produced.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleFailure {
    pub epoch: Epoch,
    pub error: EphemError,
}

impl SampleFailure {
    pub fn new(epoch: Epoch, error: EphemError) -> Self {
        Self { epoch, error }
    }
}

impl fmt::Display for SampleFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}] {}", self.epoch, self.error.kind(), self.error)
    }
}

/// Chronological rows of one element representation.
///
/// Rows are stored in loop order and never reordered or deduplicated. Two consecutive rows
/// are exactly [`EphemerisTable::step`] apart unless the epochs between them are listed in
/// [`EphemerisTable::failures`].
#[derive(Debug, Clone, PartialEq)]
pub struct EphemerisTable {
    representation: Representation,
    frame: ReferenceFrame,
    step: Duration,
    samples: Vec<KeplerianElementSample>,
    failures: Vec<SampleFailure>,
}

impl EphemerisTable {
    pub fn new(representation: Representation, frame: ReferenceFrame, step: Duration) -> Self {
        Self {
            representation,
            frame,
            step,
            samples: Vec::new(),
            failures: Vec::new(),
        }
    }

    pub fn push(&mut self, sample: KeplerianElementSample) {
        self.samples.push(sample);
    }

    pub fn record_failure(&mut self, failure: SampleFailure) {
        self.failures.push(failure);
    }

    pub fn representation(&self) -> Representation {
        self.representation
    }

    pub fn frame(&self) -> ReferenceFrame {
        self.frame
    }

    pub fn step(&self) -> Duration {
        self.step
    }

    pub fn samples(&self) -> &[KeplerianElementSample] {
        &self.samples
    }

    pub fn failures(&self) -> &[SampleFailure] {
        &self.failures
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, KeplerianElementSample> {
        self.samples.iter()
    }

    /// Check the row spacing against the step and the recorded failures.
    ///
    /// Return
    /// ------
    /// * `true` if every pair of consecutive rows is separated by a whole number of steps
    ///   and every grid epoch strictly between them is a recorded failure.
    pub fn has_consistent_spacing(&self) -> bool {
        let step_ns = self.step.total_nanoseconds();
        if step_ns <= 0 {
            return self.samples.len() < 2;
        }

        self.samples.iter().tuple_windows().all(|(prev, next)| {
            let gap = (next.epoch - prev.epoch).total_nanoseconds();
            if gap <= 0 || gap % step_ns != 0 {
                return false;
            }
            let missing = gap / step_ns - 1;
            (1..=missing).all(|k| {
                let expected = prev.epoch + Duration::from_total_nanoseconds(k * step_ns);
                self.failures.iter().any(|f| f.epoch == expected)
            })
        })
    }
}

impl<'a> IntoIterator for &'a EphemerisTable {
    type Item = &'a KeplerianElementSample;
    type IntoIter = std::slice::Iter<'a, KeplerianElementSample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}

/// Osculating and mean tables produced by one pass over the epoch grid.
#[derive(Debug, Clone, PartialEq)]
pub struct DualEphemeris {
    pub osculating: EphemerisTable,
    pub mean: EphemerisTable,
}

#[cfg(test)]
mod table_test {
    use super::*;
    use crate::constants::earth_mu;
    use approx::assert_relative_eq;
    use hifitime::Unit;

    fn epoch0() -> Epoch {
        Epoch::from_gregorian_utc(2025, 6, 22, 22, 15, 38, 0)
    }

    fn sample_at(epoch: Epoch) -> KeplerianElementSample {
        KeplerianElementSample {
            epoch,
            semi_major_axis_km: 6890.0,
            eccentricity: 0.001,
            inclination_deg: 97.35,
            raan_deg: 245.6,
            periapsis_argument_deg: 302.4,
            mean_anomaly_deg: 57.7,
        }
    }

    #[test]
    fn test_sample_from_elements() {
        let kep = KeplerianElements {
            reference_epoch: epoch0(),
            semi_major_axis: 6_890_189.04,
            eccentricity: 0.0011797,
            inclination: 97.3509 * RADEG,
            ascending_node_longitude: 245.6212 * RADEG,
            periapsis_argument: 302.3575 * RADEG,
            mean_anomaly: 57.6516 * RADEG,
            frame: ReferenceFrame::Teme,
            mu: earth_mu(),
        };
        let sample = KeplerianElementSample::from(&kep);

        assert_eq!(sample.epoch, epoch0());
        let expected = [6890.18904, 0.0011797, 97.3509, 245.6212, 302.3575, 57.6516];
        for (got, want) in sample.values().iter().zip(expected) {
            assert_relative_eq!(*got, want, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_spacing_with_recorded_gap() {
        let step = Unit::Hour * 1;
        let mut table = EphemerisTable::new(Representation::Mean, ReferenceFrame::Teme, step);
        table.push(sample_at(epoch0()));
        table.push(sample_at(epoch0() + Unit::Hour * 2));
        assert!(!table.has_consistent_spacing());

        table.record_failure(SampleFailure::new(
            epoch0() + step,
            EphemError::Propagation {
                epoch: epoch0() + step,
                reason: "injected".into(),
            },
        ));
        assert!(table.has_consistent_spacing());
        assert_eq!(table.len(), 2);
        assert_eq!(table.failures().len(), 1);
    }

    #[test]
    fn test_spacing_rejects_off_grid_rows() {
        let step = Unit::Hour * 1;
        let mut table =
            EphemerisTable::new(Representation::Osculating, ReferenceFrame::TrueOfDate, step);
        table.push(sample_at(epoch0()));
        table.push(sample_at(epoch0() + Unit::Minute * 90));
        assert!(!table.has_consistent_spacing());
    }

    #[test]
    fn test_failure_display() {
        let failure = SampleFailure::new(
            epoch0(),
            EphemError::DegenerateOrbit {
                epoch: epoch0(),
                reason: "circular orbit".into(),
            },
        );
        let text = failure.to_string();
        assert!(text.contains("DegenerateOrbitError"));
        assert!(text.contains("circular orbit"));
    }
}
