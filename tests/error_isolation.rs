mod common;

use hifitime::{Epoch, Unit};

use common::{init_tracing, sample_tle};
use tlephem::constants::{Meter, Minutes};
use tlephem::ephem_errors::EphemError;
use tlephem::ephemeris::{EphemerisTabulator, ErrorPolicy, TabulationParams};
use tlephem::orbit_type::CartesianState;
use tlephem::propagator::sgp4_propagator::Sgp4Propagator;
use tlephem::propagator::{OrbitalStateSource, PropagatorInternalState};
use tlephem::ref_system::ReferenceFrame;
use tlephem::time::minutes_since;

/// SGP4 source that refuses to propagate to one given epoch.
struct FaultySource {
    inner: Sgp4Propagator,
    bad_epoch: Epoch,
}

impl FaultySource {
    fn failure(&self) -> EphemError {
        EphemError::Propagation {
            epoch: self.bad_epoch,
            reason: "injected failure".into(),
        }
    }
}

impl OrbitalStateSource for FaultySource {
    fn reference_epoch(&self) -> Epoch {
        self.inner.reference_epoch()
    }

    fn internal_frame(&self) -> ReferenceFrame {
        self.inner.internal_frame()
    }

    fn gravitational_parameter(&self) -> f64 {
        self.inner.gravitational_parameter()
    }

    fn equatorial_radius(&self) -> Meter {
        self.inner.equatorial_radius()
    }

    fn advance_to(&mut self, t_since: Minutes) -> Result<PropagatorInternalState, EphemError> {
        let bad = minutes_since(self.bad_epoch, self.reference_epoch());
        if (t_since - bad).abs() < 1e-9 {
            return Err(self.failure());
        }
        self.inner.advance_to(t_since)
    }

    fn snapshot_internal_state(&self) -> Option<PropagatorInternalState> {
        self.inner.snapshot_internal_state()
    }

    fn cartesian_state(&mut self, epoch: Epoch) -> Result<CartesianState, EphemError> {
        if epoch == self.bad_epoch {
            return Err(self.failure());
        }
        self.inner.cartesian_state(epoch)
    }
}

fn faulty_source() -> (Epoch, FaultySource) {
    let tle = sample_tle();
    let start = tle.epoch();
    let source = FaultySource {
        inner: Sgp4Propagator::new(&tle).unwrap(),
        bad_epoch: start + Unit::Hour * 2,
    };
    (start, source)
}

#[test]
fn test_skip_and_record_keeps_neighbours() {
    init_tracing();
    let (start, mut source) = faulty_source();
    let bad = source.bad_epoch;
    let end = start + Unit::Hour * 4;

    let tabulator = EphemerisTabulator::default();
    let ephem = tabulator.tabulate(&mut source, start, end).unwrap();

    for table in [&ephem.osculating, &ephem.mean] {
        assert_eq!(table.len(), 4);
        assert!(table.iter().all(|s| s.epoch != bad));
        assert!(table.iter().any(|s| s.epoch == bad - Unit::Hour * 1));
        assert!(table.iter().any(|s| s.epoch == bad + Unit::Hour * 1));

        assert_eq!(table.failures().len(), 1);
        let failure = &table.failures()[0];
        assert_eq!(failure.epoch, bad);
        assert_eq!(failure.error.kind(), "PropagationError");
        assert_eq!(failure.error.epoch(), Some(bad));
        assert!(table.has_consistent_spacing());
    }
}

#[test]
fn test_rows_match_a_clean_run_outside_the_failure() {
    let (start, mut source) = faulty_source();
    let bad = source.bad_epoch;
    let end = start + Unit::Hour * 4;

    let tabulator = EphemerisTabulator::default();
    let faulty = tabulator.tabulate(&mut source, start, end).unwrap();

    let mut clean_source = Sgp4Propagator::new(&sample_tle()).unwrap();
    let clean = tabulator.tabulate(&mut clean_source, start, end).unwrap();

    let expected: Vec<_> = clean.mean.iter().filter(|s| s.epoch != bad).collect();
    let got: Vec<_> = faulty.mean.iter().collect();
    assert_eq!(got, expected);

    let expected: Vec<_> = clean.osculating.iter().filter(|s| s.epoch != bad).collect();
    let got: Vec<_> = faulty.osculating.iter().collect();
    assert_eq!(got, expected);
}

#[test]
fn test_abort_on_first_error() {
    let (start, mut source) = faulty_source();
    let bad = source.bad_epoch;

    let tabulator = EphemerisTabulator::new(
        TabulationParams::builder()
            .error_policy(ErrorPolicy::AbortOnFirstError)
            .build()
            .unwrap(),
    );

    let err = tabulator
        .tabulate(&mut source, start, start + Unit::Hour * 4)
        .unwrap_err();
    assert_eq!(err.epoch(), Some(bad));

    let err = tabulator
        .tabulate_mean(&mut source, start, start + Unit::Hour * 4)
        .unwrap_err();
    assert_eq!(err.epoch(), Some(bad));

    // A window ending before the failing epoch is unaffected
    let table = tabulator
        .tabulate_osculating(&mut source, start, start + Unit::Hour * 1)
        .unwrap();
    assert_eq!(table.len(), 2);
}

#[test]
fn test_lazy_iterator_yields_failure_in_place() {
    let (start, mut source) = faulty_source();
    let bad = source.bad_epoch;

    let tabulator = EphemerisTabulator::default();
    let outcomes: Vec<_> = tabulator
        .mean_samples(&mut source, start, start + Unit::Hour * 3)
        .unwrap()
        .collect();

    assert_eq!(outcomes.len(), 4);
    assert!(outcomes[0].is_ok() && outcomes[1].is_ok() && outcomes[3].is_ok());
    let failure = outcomes[2].as_ref().unwrap_err();
    assert_eq!(failure.epoch, bad);
}
