#![allow(dead_code)]

use approx::assert_relative_eq;
use tlephem::ephemeris::table::KeplerianElementSample;
use tlephem::kepler::angle_diff;
use tlephem::tle::TwoLineElementSet;

pub const LINE1: &str = "1 58918U 24024B   25173.92752492  .00004806  00000-0  24653-3 0  9992";
pub const LINE2: &str = "2 58918  97.3509 245.6212 0011797 302.3575  57.6516 15.16942229 76787";

pub fn sample_tle() -> TwoLineElementSet {
    TwoLineElementSet::from_lines(LINE1, LINE2).unwrap()
}

/// Install a test subscriber once; honours `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Compare two rows: relative tolerance on `a`, absolute on `e`, wrapped degrees on angles.
pub fn assert_samples_close(
    actual: &KeplerianElementSample,
    expected: &KeplerianElementSample,
    a_rel: f64,
    angle_deg: f64,
) {
    assert_eq!(actual.epoch, expected.epoch);
    assert_relative_eq!(
        actual.semi_major_axis_km,
        expected.semi_major_axis_km,
        max_relative = a_rel
    );
    assert_relative_eq!(actual.eccentricity, expected.eccentricity, epsilon = 1e-9);
    assert_relative_eq!(
        actual.inclination_deg,
        expected.inclination_deg,
        epsilon = angle_deg
    );

    for (got, want) in [
        (actual.raan_deg, expected.raan_deg),
        (actual.periapsis_argument_deg, expected.periapsis_argument_deg),
        (actual.mean_anomaly_deg, expected.mean_anomaly_deg),
    ] {
        let diff = angle_diff(got.to_radians(), want.to_radians()).to_degrees();
        assert!(
            diff.abs() <= angle_deg,
            "angle mismatch: got {got}°, expected {want}° (diff {diff}°)"
        );
    }
}
