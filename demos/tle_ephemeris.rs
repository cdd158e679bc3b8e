//! Tabulate osculating (True-of-Date) and mean Keplerian elements for one TLE over two hours.
//!
//! Run with:
//!   cargo run --example tle_ephemeris
//!   RUST_LOG=tlephem=debug cargo run --example tle_ephemeris
//!
//! Pass `--csv` to print both tables as CSV instead of fixed-width text.

use hifitime::Unit;
use tracing_subscriber::EnvFilter;

use tlephem::constants::SECONDS_PER_MINUTE;
use tlephem::ephemeris::{EphemerisTabulator, TabulationParams};
use tlephem::mean_elements::MeanElementExtractor;
use tlephem::propagator::sgp4_propagator::Sgp4Propagator;
use tlephem::ref_system::ReferenceFrame;
use tlephem::tle::TwoLineElementSet;

const LINE1: &str = "1 58918U 24024B   25173.92752492  .00004806  00000-0  24653-3 0  9992";
const LINE2: &str = "2 58918  97.3509 245.6212 0011797 302.3575  57.6516 15.16942229 76787";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let as_csv = std::env::args().any(|a| a == "--csv");

    let tle = TwoLineElementSet::from_lines(LINE1, LINE2)?;
    println!("{tle}\n");

    let mut sgp4 = Sgp4Propagator::new(&tle)?;

    let reference = MeanElementExtractor::new(&mut sgp4).reference_mean_elements(&tle);
    println!("TLE reference mean elements");
    println!("{reference}");
    println!(
        "  period                      = {:.3} min\n",
        reference.period() / SECONDS_PER_MINUTE
    );

    let params = TabulationParams::builder()
        .step(Unit::Hour * 1)
        .frame(ReferenceFrame::TrueOfDate)
        .build()?;
    let tabulator = EphemerisTabulator::new(params);

    let start = tle.epoch();
    let end = start + Unit::Hour * 2;
    let ephem = tabulator.tabulate(&mut sgp4, start, end)?;

    if as_csv {
        let stdout = std::io::stdout();
        ephem.osculating.write_csv(stdout.lock())?;
        ephem.mean.write_csv(stdout.lock())?;
    } else {
        println!("{}", ephem.osculating);
        println!("{}", ephem.mean);
    }
    Ok(())
}
