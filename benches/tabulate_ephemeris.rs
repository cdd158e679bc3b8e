//! Benchmarks for the ephemeris tabulator (single TLE, one day at various steps)
//!
//! Run with:
//!   cargo bench --bench tabulate_ephemeris
//!   cargo bench tabulate_ephemeris -- tabulate_ephemeris/dual

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use hifitime::Unit;

use tlephem::ephemeris::{EphemerisTabulator, TabulationParams};
use tlephem::propagator::sgp4_propagator::Sgp4Propagator;
use tlephem::tle::TwoLineElementSet;

const LINE1: &str = "1 58918U 24024B   25173.92752492  .00004806  00000-0  24653-3 0  9992";
const LINE2: &str = "2 58918  97.3509 245.6212 0011797 302.3575  57.6516 15.16942229 76787";

fn tabulator(step_minutes: i64) -> EphemerisTabulator {
    let params = TabulationParams::builder()
        .step(Unit::Minute * step_minutes)
        .build()
        .expect("valid tabulation params");
    EphemerisTabulator::new(params)
}

fn bench_tabulate(c: &mut Criterion) {
    let tle = TwoLineElementSet::from_lines(LINE1, LINE2).expect("sample TLE");
    let start = tle.epoch();
    let end = start + Unit::Day * 1;

    let hourly = tabulator(60);
    let fine = tabulator(1);

    c.bench_function("tabulate_ephemeris/osculating_1d_hourly", |b| {
        b.iter_batched(
            || Sgp4Propagator::new(&tle).expect("SGP4 init"),
            |mut sgp4| {
                black_box(
                    hourly
                        .tabulate_osculating(&mut sgp4, black_box(start), black_box(end))
                        .expect("osculating table"),
                )
            },
            BatchSize::SmallInput,
        )
    });

    c.bench_function("tabulate_ephemeris/mean_1d_hourly", |b| {
        b.iter_batched(
            || Sgp4Propagator::new(&tle).expect("SGP4 init"),
            |mut sgp4| {
                black_box(
                    hourly
                        .tabulate_mean(&mut sgp4, black_box(start), black_box(end))
                        .expect("mean table"),
                )
            },
            BatchSize::SmallInput,
        )
    });

    c.bench_function("tabulate_ephemeris/dual_1d_minute", |b| {
        b.iter_batched(
            || Sgp4Propagator::new(&tle).expect("SGP4 init"),
            |mut sgp4| {
                black_box(
                    fine.tabulate(&mut sgp4, black_box(start), black_box(end))
                        .expect("dual ephemeris"),
                )
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_tabulate);
criterion_main!(benches);
