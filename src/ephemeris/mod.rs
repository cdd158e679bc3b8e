//! # Ephemeris tabulation
//!
//! The [`EphemerisTabulator`] walks a fixed-step epoch grid over a closed window and, at each
//! epoch, asks an [`OrbitalStateSource`] for:
//!
//! - **osculating** elements, through [`OsculatingConverter`] (Cartesian state rotated into the
//!   configured frame, then two-body conversion);
//! - **mean** elements, through [`MeanElementExtractor`] (internal secular state of the
//!   propagator, in its native frame).
//!
//! ## Grid
//!
//! The first epoch is the window start, each following epoch adds exactly one step, and no
//! epoch exceeds the window end (see [`EpochGrid`]).
//!
//! ## Per-sample failures
//!
//! A propagation or conversion failure affects one epoch only. What happens next is decided by
//! [`ErrorPolicy`]:
//!
//! - [`ErrorPolicy::SkipAndRecord`] (default): the epoch is skipped, logged with
//!   `tracing::warn!` and kept in [`EphemerisTable::failures`]; the loop continues.
//! - [`ErrorPolicy::AbortOnFirstError`]: the first failure is returned as `Err`, carrying its epoch.
//!
//! ## Example
//!
//! ```rust,no_run
//! use hifitime::Unit;
//! use tlephem::ephemeris::{EphemerisTabulator, TabulationParams};
//! use tlephem::propagator::sgp4_propagator::Sgp4Propagator;
//! use tlephem::tle::TwoLineElementSet;
//!
//! let tle = TwoLineElementSet::from_lines(
//!     "1 58918U 24024B   25173.92752492  .00004806  00000-0  24653-3 0  9992",
//!     "2 58918  97.3509 245.6212 0011797 302.3575  57.6516 15.16942229 76787",
//! )?;
//! let mut sgp4 = Sgp4Propagator::new(&tle)?;
//!
//! let tabulator = EphemerisTabulator::new(TabulationParams::default());
//! let ephem = tabulator.tabulate(&mut sgp4, tle.epoch(), tle.epoch() + Unit::Hour * 2)?;
//! println!("{}", ephem.osculating);
//! println!("{}", ephem.mean);
//! # Ok::<(), tlephem::ephem_errors::EphemError>(())
//! ```

use std::cmp::Ordering::Greater;

use hifitime::{Duration, Epoch};
use tracing::{debug, warn};

use crate::constants::DEFAULT_STEP_SECONDS;
use crate::ephem_errors::EphemError;
use crate::mean_elements::MeanElementExtractor;
use crate::orbit_type::Representation;
use crate::osculating::OsculatingConverter;
use crate::propagator::OrbitalStateSource;
use crate::ref_system::ReferenceFrame;
use crate::time::EpochGrid;

/// Text and CSV rendering of ephemeris tables.
pub mod display;

/// Samples, failures and tables.
pub mod table;

use table::{DualEphemeris, EphemerisTable, KeplerianElementSample, SampleFailure};

/// What the tabulator does when one epoch cannot be sampled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Record the failure, log it, and continue with the next epoch.
    #[default]
    SkipAndRecord,
    /// Stop the run and return the failure.
    AbortOnFirstError,
}

/// Run-level configuration of the ephemeris tabulator.
#[derive(Debug, Clone, PartialEq)]
pub struct TabulationParams {
    /// Spacing between two grid epochs.
    pub step: Duration,
    /// Output frame of the osculating elements.
    pub frame: ReferenceFrame,
    pub error_policy: ErrorPolicy,
}

impl TabulationParams {
    /// Same as [`TabulationParams::default()`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Fluent, validating builder starting from the defaults.
    ///
    /// # Example
    ///
    /// ```rust
    /// use hifitime::Unit;
    /// use tlephem::ephemeris::{ErrorPolicy, TabulationParams};
    /// use tlephem::ref_system::ReferenceFrame;
    ///
    /// let params = TabulationParams::builder()
    ///     .step(Unit::Minute * 10)
    ///     .frame(ReferenceFrame::Teme)
    ///     .error_policy(ErrorPolicy::AbortOnFirstError)
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(params.frame, ReferenceFrame::Teme);
    /// ```
    pub fn builder() -> TabulationParamsBuilder {
        TabulationParamsBuilder::new()
    }
}

impl Default for TabulationParams {
    fn default() -> Self {
        TabulationParams {
            step: Duration::from_seconds(DEFAULT_STEP_SECONDS),
            frame: ReferenceFrame::TrueOfDate,
            error_policy: ErrorPolicy::SkipAndRecord,
        }
    }
}

/// Builder for [`TabulationParams`], with validation.
#[derive(Debug, Clone)]
pub struct TabulationParamsBuilder {
    params: TabulationParams,
}

impl Default for TabulationParamsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TabulationParamsBuilder {
    pub fn new() -> Self {
        Self {
            params: TabulationParams::default(),
        }
    }

    pub fn step(mut self, v: Duration) -> Self {
        self.params.step = v;
        self
    }
    pub fn frame(mut self, v: ReferenceFrame) -> Self {
        self.params.frame = v;
        self
    }
    pub fn error_policy(mut self, v: ErrorPolicy) -> Self {
        self.params.error_policy = v;
        self
    }

    /// Return true iff the duration is strictly positive.
    #[inline]
    fn gt0(d: Duration) -> bool {
        d.partial_cmp(&Duration::ZERO) == Some(Greater)
    }

    /// Finalize the builder.
    ///
    /// Validation rules
    /// -----------------
    /// * `step > 0`: a null or negative step would never reach the end of the window.
    ///
    /// Returns
    /// -----------------
    /// * `Ok(TabulationParams)`, or [`EphemError::InvalidTabulationParameter`].
    pub fn build(self) -> Result<TabulationParams, EphemError> {
        let p = &self.params;

        if !Self::gt0(p.step) {
            return Err(EphemError::InvalidTabulationParameter(format!(
                "step must be > 0, got {}",
                p.step
            )));
        }

        Ok(self.params)
    }
}

/// Fixed-step driver producing osculating and mean element tables.
#[derive(Debug, Clone, Default)]
pub struct EphemerisTabulator {
    params: TabulationParams,
}

impl EphemerisTabulator {
    pub fn new(params: TabulationParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &TabulationParams {
        &self.params
    }

    /// Epochs visited for the window `[start, end]`.
    ///
    /// Errors
    /// ------
    /// * [`EphemError::InvalidTimeWindow`] if `end < start`.
    /// * [`EphemError::InvalidTabulationParameter`] if the step is not strictly positive
    ///   (only reachable when the params were built without the builder).
    pub fn epoch_grid(&self, start: Epoch, end: Epoch) -> Result<EpochGrid, EphemError> {
        EpochGrid::new(start, end, self.params.step)
    }

    /// Lazy osculating samples over `[start, end]`, in the configured frame.
    ///
    /// The source is only advanced when the iterator is polled; dropping the iterator stops
    /// the run. The error policy is not applied here: every failure is yielded as `Err`.
    pub fn osculating_samples<'a, S: OrbitalStateSource + ?Sized + 'a>(
        &self,
        source: &'a mut S,
        start: Epoch,
        end: Epoch,
    ) -> Result<impl Iterator<Item = Result<KeplerianElementSample, SampleFailure>> + 'a, EphemError>
    {
        let grid = self.epoch_grid(start, end)?;
        let converter = OsculatingConverter::new(self.params.frame);

        Ok(grid.map(move |epoch| {
            converter
                .elements_at(&mut *source, epoch)
                .map(|kep| KeplerianElementSample::from(&kep))
                .map_err(|error| SampleFailure::new(epoch, error))
        }))
    }

    /// Lazy mean samples over `[start, end]`, in the internal frame of the source.
    ///
    /// See also
    /// --------
    /// * [`EphemerisTabulator::osculating_samples`] – same contract for osculating elements.
    pub fn mean_samples<'a, S: OrbitalStateSource + ?Sized + 'a>(
        &self,
        source: &'a mut S,
        start: Epoch,
        end: Epoch,
    ) -> Result<impl Iterator<Item = Result<KeplerianElementSample, SampleFailure>> + 'a, EphemError>
    {
        let grid = self.epoch_grid(start, end)?;
        let mut extractor = MeanElementExtractor::new(source);

        Ok(grid.map(move |epoch| {
            extractor
                .mean_elements(epoch)
                .map(|kep| KeplerianElementSample::from(&kep))
                .map_err(|error| SampleFailure::new(epoch, error))
        }))
    }

    /// Osculating ephemeris table over `[start, end]`.
    ///
    /// Return
    /// ------
    /// * The table (with its recorded failures under [`ErrorPolicy::SkipAndRecord`]), or the
    ///   first per-sample error under [`ErrorPolicy::AbortOnFirstError`], or a window error.
    pub fn tabulate_osculating<S: OrbitalStateSource + ?Sized>(
        &self,
        source: &mut S,
        start: Epoch,
        end: Epoch,
    ) -> Result<EphemerisTable, EphemError> {
        let mut table = EphemerisTable::new(
            Representation::Osculating,
            self.params.frame,
            self.params.step,
        );
        for sample in self.osculating_samples(source, start, end)? {
            self.accept(&mut table, sample)?;
        }
        Ok(table)
    }

    /// Mean ephemeris table over `[start, end]`.
    ///
    /// Same error contract as [`EphemerisTabulator::tabulate_osculating`].
    pub fn tabulate_mean<S: OrbitalStateSource + ?Sized>(
        &self,
        source: &mut S,
        start: Epoch,
        end: Epoch,
    ) -> Result<EphemerisTable, EphemError> {
        let mut table = EphemerisTable::new(
            Representation::Mean,
            source.internal_frame(),
            self.params.step,
        );
        for sample in self.mean_samples(source, start, end)? {
            self.accept(&mut table, sample)?;
        }
        Ok(table)
    }

    /// Osculating and mean tables in a single pass over the grid.
    ///
    /// At each epoch the osculating sample is computed first, then the mean sample; a failure
    /// of one does not prevent the other.
    ///
    /// Arguments
    /// ---------
    /// * `source`: exclusively borrowed for the whole run.
    /// * `start`, `end`: closed window.
    ///
    /// Return
    /// ------
    /// * Both tables, or the first error under [`ErrorPolicy::AbortOnFirstError`], or a
    ///   window error.
    pub fn tabulate<S: OrbitalStateSource + ?Sized>(
        &self,
        source: &mut S,
        start: Epoch,
        end: Epoch,
    ) -> Result<DualEphemeris, EphemError> {
        let grid = self.epoch_grid(start, end)?;
        let converter = OsculatingConverter::new(self.params.frame);
        let mut extractor = MeanElementExtractor::new(source);

        let mut osculating = EphemerisTable::new(
            Representation::Osculating,
            self.params.frame,
            self.params.step,
        );
        let mut mean = EphemerisTable::new(
            Representation::Mean,
            extractor.source().internal_frame(),
            self.params.step,
        );

        debug!(
            "Tabulating {} epochs from {start} to {end} (step {}, frame {})",
            grid.len(),
            self.params.step,
            self.params.frame
        );

        for epoch in grid {
            let osc = converter
                .elements_at(extractor.source_mut(), epoch)
                .map(|kep| KeplerianElementSample::from(&kep))
                .map_err(|error| SampleFailure::new(epoch, error));
            self.accept(&mut osculating, osc)?;

            let avg = extractor
                .mean_elements(epoch)
                .map(|kep| KeplerianElementSample::from(&kep))
                .map_err(|error| SampleFailure::new(epoch, error));
            self.accept(&mut mean, avg)?;
        }

        debug!(
            "Tabulation done: {} osculating / {} mean rows, {} / {} skipped",
            osculating.len(),
            mean.len(),
            osculating.failures().len(),
            mean.failures().len()
        );

        Ok(DualEphemeris { osculating, mean })
    }

    /// Apply the error policy to one sample outcome.
    fn accept(
        &self,
        table: &mut EphemerisTable,
        sample: Result<KeplerianElementSample, SampleFailure>,
    ) -> Result<(), EphemError> {
        match sample {
            Ok(row) => {
                table.push(row);
                Ok(())
            }
            Err(failure) => match self.params.error_policy {
                ErrorPolicy::AbortOnFirstError => Err(failure.error),
                ErrorPolicy::SkipAndRecord => {
                    warn!(
                        "Skipping {} sample at {}: {}",
                        table.representation(),
                        failure.epoch,
                        failure.error
                    );
                    table.record_failure(failure);
                    Ok(())
                }
            },
        }
    }
}

#[cfg(test)]
mod ephemeris_test {
    use super::*;
    use crate::mean_elements::reference_mean_elements;
    use crate::propagator::sgp4_propagator::Sgp4Propagator;
    use crate::tle::tle_test::{LINE1, LINE2};
    use crate::tle::TwoLineElementSet;
    use approx::assert_relative_eq;
    use hifitime::Unit;

    fn setup() -> (TwoLineElementSet, Sgp4Propagator) {
        let tle = TwoLineElementSet::from_lines(LINE1, LINE2).unwrap();
        let prop = Sgp4Propagator::new(&tle).unwrap();
        (tle, prop)
    }

    #[test]
    fn test_builder_defaults() {
        let params = TabulationParams::builder().build().unwrap();
        assert_eq!(params, TabulationParams::default());
        assert_eq!(params.step, Unit::Hour * 1);
        assert_eq!(params.frame, ReferenceFrame::TrueOfDate);
        assert_eq!(params.error_policy, ErrorPolicy::SkipAndRecord);
    }

    #[test]
    fn test_builder_rejects_non_positive_step() {
        let err = TabulationParams::builder()
            .step(Duration::ZERO)
            .build()
            .unwrap_err();
        assert_eq!(err.kind(), "InvalidTabulationParameter");

        let err = TabulationParams::builder()
            .step(Unit::Second * -5)
            .build()
            .unwrap_err();
        assert_eq!(err.kind(), "InvalidTabulationParameter");
    }

    #[test]
    fn test_epoch_grid_window_errors() {
        let (tle, _) = setup();
        let tabulator = EphemerisTabulator::default();

        let err = tabulator
            .epoch_grid(tle.epoch(), tle.epoch() - Unit::Second * 1)
            .unwrap_err();
        assert_eq!(err.kind(), "InvalidTimeWindow");

        let grid = tabulator.epoch_grid(tle.epoch(), tle.epoch()).unwrap();
        assert_eq!(grid.len(), 1);
    }

    #[test]
    fn test_lazy_samples_stop_early() {
        let (tle, mut prop) = setup();
        let tabulator = EphemerisTabulator::default();

        let first: Vec<_> = tabulator
            .osculating_samples(&mut prop, tle.epoch(), tle.epoch() + Unit::Day * 10)
            .unwrap()
            .take(2)
            .collect();
        assert_eq!(first.len(), 2);
        assert!(first.iter().all(|s| s.is_ok()));

        // Last propagation is the second epoch
        let snapshot = prop.snapshot_internal_state().unwrap();
        assert_relative_eq!(snapshot.t_since, 60.0, epsilon = 1e-9);
    }

    #[test]
    fn test_separate_and_dual_runs_agree() {
        let (tle, mut prop) = setup();
        let tabulator = EphemerisTabulator::default();
        let end = tle.epoch() + Unit::Hour * 3;

        let osc = tabulator
            .tabulate_osculating(&mut prop, tle.epoch(), end)
            .unwrap();
        let mean = tabulator.tabulate_mean(&mut prop, tle.epoch(), end).unwrap();
        let dual = tabulator.tabulate(&mut prop, tle.epoch(), end).unwrap();

        assert_eq!(osc, dual.osculating);
        assert_eq!(mean, dual.mean);
        assert_eq!(dual.osculating.frame(), ReferenceFrame::TrueOfDate);
        assert_eq!(dual.mean.frame(), ReferenceFrame::Teme);
        assert_eq!(dual.mean.len(), 4);
        assert!(dual.mean.has_consistent_spacing());
    }

    #[test]
    fn test_first_mean_row_is_reference() {
        let (tle, mut prop) = setup();
        let tabulator = EphemerisTabulator::default();
        let mean = tabulator
            .tabulate_mean(&mut prop, tle.epoch(), tle.epoch())
            .unwrap();

        let reference = reference_mean_elements(&tle, prop.gravitational_parameter());
        let reference = KeplerianElementSample::from(&reference);
        let row = mean.samples()[0];
        assert_eq!(row.epoch, reference.epoch);
        for (got, want) in row.values().iter().zip(reference.values()) {
            assert_relative_eq!(*got, want, max_relative = 1e-9);
        }
    }

    #[test]
    fn test_decayed_window_is_recorded_or_aborts() {
        let (tle, mut prop) = setup();
        let far = tle.epoch() + Unit::Day * 7305;

        let skip = EphemerisTabulator::default();
        let mean = skip.tabulate_mean(&mut prop, far, far).unwrap();
        assert!(mean.is_empty());
        assert_eq!(mean.failures().len(), 1);
        assert_eq!(mean.failures()[0].epoch, far);

        let abort = EphemerisTabulator::new(
            TabulationParams::builder()
                .error_policy(ErrorPolicy::AbortOnFirstError)
                .build()
                .unwrap(),
        );
        let err = abort.tabulate_mean(&mut prop, far, far).unwrap_err();
        assert_eq!(err.epoch(), Some(far));
    }
}
