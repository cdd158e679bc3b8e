//! # Ephemeris rendering
//!
//! Two renderings of an [`EphemerisTable`]:
//!
//! - a fixed-width text report through [`std::fmt::Display`], one line per row under a header
//!   naming the representation, the frame and the columns;
//! - CSV through [`EphemerisTable::write_csv`], one record per row, epochs written as UTC strings.
//!
//! Failed epochs are not rows: the text report lists them after the table, the CSV output
//! leaves them out.

use std::fmt;
use std::io;

use serde::Serialize;

use super::table::{EphemerisTable, KeplerianElementSample};

const EPOCH_WIDTH: usize = 33;
const VALUE_WIDTH: usize = 18;

const COLUMNS: [&str; 7] = [
    "Epoch (UTC)",
    "a (km)",
    "e",
    "i (deg)",
    "RAAN (deg)",
    "omega (deg)",
    "M (deg)",
];

#[derive(Debug, Serialize)]
struct SampleRecord {
    epoch_utc: String,
    semi_major_axis_km: f64,
    eccentricity: f64,
    inclination_deg: f64,
    raan_deg: f64,
    periapsis_argument_deg: f64,
    mean_anomaly_deg: f64,
}

impl From<&KeplerianElementSample> for SampleRecord {
    fn from(s: &KeplerianElementSample) -> Self {
        SampleRecord {
            epoch_utc: s.epoch.to_string(),
            semi_major_axis_km: s.semi_major_axis_km,
            eccentricity: s.eccentricity,
            inclination_deg: s.inclination_deg,
            raan_deg: s.raan_deg,
            periapsis_argument_deg: s.periapsis_argument_deg,
            mean_anomaly_deg: s.mean_anomaly_deg,
        }
    }
}

impl EphemerisTable {
    /// Stream the rows as CSV (with a header record) into `writer`.
    ///
    /// Arguments
    /// ---------
    /// * `writer`: any byte sink (file, stdout, `Vec<u8>`).
    ///
    /// Return
    /// ------
    /// * `Ok(())` once every row has been written and the writer flushed, or the first
    ///   [`csv::Error`] raised by serialization or I/O.
    pub fn write_csv<W: io::Write>(&self, writer: W) -> csv::Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        for sample in self.iter() {
            wtr.serialize(SampleRecord::from(sample))?;
        }
        wtr.flush()?;
        Ok(())
    }
}

impl fmt::Display for EphemerisTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} Keplerian elements ({}, step {})",
            self.representation(),
            self.frame(),
            self.step()
        )?;

        write!(f, "{:<EPOCH_WIDTH$}", COLUMNS[0])?;
        for name in &COLUMNS[1..] {
            write!(f, " {name:<VALUE_WIDTH$}")?;
        }
        writeln!(f)?;

        for s in self.iter() {
            writeln!(
                f,
                "{:<EPOCH_WIDTH$} {:<VALUE_WIDTH$.5} {:<VALUE_WIDTH$.9} {:<VALUE_WIDTH$.9} {:<VALUE_WIDTH$.9} {:<VALUE_WIDTH$.9} {:<VALUE_WIDTH$.9}",
                s.epoch.to_string(),
                s.semi_major_axis_km,
                s.eccentricity,
                s.inclination_deg,
                s.raan_deg,
                s.periapsis_argument_deg,
                s.mean_anomaly_deg
            )?;
        }

        if !self.failures().is_empty() {
            writeln!(f, "Skipped epochs ({}):", self.failures().len())?;
            for failure in self.failures() {
                writeln!(f, "  {failure}")?;
            }
        }
        Ok(())
    }
}
