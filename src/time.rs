//! # Time helpers
//!
//! Conversions between the TLE epoch representation used by the `sgp4` crate
//! (`chrono::NaiveDateTime`, UTC) and [`hifitime::Epoch`], the SGP4 time offset
//! (`tsince`, minutes), and the fixed-step epoch grid driven by the ephemeris tabulator.

use chrono::{Datelike, NaiveDateTime, Timelike};
use hifitime::{Duration, Epoch};

use crate::constants::{Minutes, SECONDS_PER_MINUTE};
use crate::ephem_errors::EphemError;

/// Convert a UTC `NaiveDateTime` (TLE epoch as parsed by `sgp4`) into a [`hifitime::Epoch`].
///
/// Argument
/// --------
/// * `datetime`: a naive date-time understood as UTC.
///
/// Return
/// ------
/// * The same instant as an [`Epoch`] on the UTC time scale, nanosecond resolution.
pub fn datetime_to_epoch(datetime: &NaiveDateTime) -> Epoch {
    Epoch::from_gregorian_utc(
        datetime.year(),
        datetime.month() as u8,
        datetime.day() as u8,
        datetime.hour() as u8,
        datetime.minute() as u8,
        datetime.second() as u8,
        datetime.nanosecond(),
    )
}

/// Time elapsed from `reference` to `epoch`, in minutes (the SGP4 `tsince` argument).
pub fn minutes_since(epoch: Epoch, reference: Epoch) -> Minutes {
    (epoch - reference).to_seconds() / SECONDS_PER_MINUTE
}

/// Fixed-step sequence of epochs over the closed window `[start, end]`.
///
/// The first epoch is exactly `start`; each subsequent epoch is the previous one shifted by
/// `step`; iteration stops as soon as the next epoch would be strictly after `end`.
/// `hifitime::Duration` is an integer count of nanoseconds, so repeated shifting never drifts.
///
/// The number of epochs is `⌊(end − start) / step⌋ + 1`, at least one.
#[derive(Debug, Clone)]
pub struct EpochGrid {
    current: Epoch,
    end: Epoch,
    step: Duration,
    remaining: usize,
}

impl EpochGrid {
    /// Build the grid for `[start, end]` with the given step.
    ///
    /// Errors
    /// ------
    /// * [`EphemError::InvalidTimeWindow`] if `end < start`.
    /// * [`EphemError::InvalidTabulationParameter`] if `step` is not strictly positive.
    pub fn new(start: Epoch, end: Epoch, step: Duration) -> Result<Self, EphemError> {
        if step <= Duration::ZERO {
            return Err(EphemError::InvalidTabulationParameter(format!(
                "step must be > 0, got {step}"
            )));
        }
        if end < start {
            return Err(EphemError::InvalidTimeWindow(format!(
                "end {end} is before start {start}"
            )));
        }

        let span = (end - start).total_nanoseconds();
        let count = span / step.total_nanoseconds() + 1;

        Ok(Self {
            current: start,
            end,
            step,
            remaining: count as usize,
        })
    }

    /// Step between two consecutive epochs.
    pub fn step(&self) -> Duration {
        self.step
    }
}

impl Iterator for EpochGrid {
    type Item = Epoch;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 || self.current > self.end {
            return None;
        }
        let epoch = self.current;
        self.current += self.step;
        self.remaining -= 1;
        Some(epoch)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for EpochGrid {}
