//! # Constants and type definitions for tlephem
//!
//! This module centralizes the **physical constants**, **conversion factors**, and **unit type
//! aliases** used throughout the crate.
//!
//! ## Overview
//!
//! - Angular and time conversions (degrees ↔ radians, days ↔ minutes ↔ seconds)
//! - Earth geopotential shared with the SGP4 propagator (`sgp4::WGS84`)
//! - Core type aliases documenting the unit carried by an `f64`
//!
//! The geopotential is deliberately taken from the `sgp4` crate rather than redefined: the
//! osculating converter, the mean-element extractor and the TLE reference elements must all be
//! referenced to the gravitational parameter the propagator itself was built with.

use sgp4::Geopotential;

// -------------------------------------------------------------------------------------------------
// Physical constants and unit conversions
// -------------------------------------------------------------------------------------------------

/// 2π, useful for trigonometric conversions
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// Number of seconds in a Julian day
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Number of minutes in a Julian day
pub const MINUTES_PER_DAY: f64 = 1_440.0;

/// Number of seconds in a minute (SGP4 native time unit is the minute)
pub const SECONDS_PER_MINUTE: f64 = 60.0;

/// MJD epoch of J2000.0 (2000-01-01 12:00:00 TT)
pub const T2000: f64 = 51544.5;

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

/// Arcseconds → radians
pub const RADSEC: f64 = std::f64::consts::PI / 648000.0;

/// Kilometers → meters
pub const KM_TO_M: f64 = 1_000.0;

/// Default tabulation step of the ephemeris loop, in seconds (one hour)
pub const DEFAULT_STEP_SECONDS: f64 = 3_600.0;

/// Geopotential used by the SGP4 propagator (equatorial radius in km, `ke` in ER^1.5/min).
pub const EARTH_GEOPOTENTIAL: Geopotential = sgp4::WGS84;

/// Earth equatorial radius in meters, as used by the propagator.
pub fn earth_equatorial_radius() -> Meter {
    EARTH_GEOPOTENTIAL.ae * KM_TO_M
}

/// Earth gravitational parameter in m³/s², derived from the propagator geopotential.
///
/// SGP4 expresses gravity through `ke = 60 / sqrt(ae³ / μ)` (earth radii and minutes);
/// inverting it gives `μ = ae³ (ke / 60)²`, which is the value every element set produced by
/// this crate is referenced to.
pub fn earth_mu() -> f64 {
    let ae_m = earth_equatorial_radius();
    let ke_per_s = EARTH_GEOPOTENTIAL.ke / SECONDS_PER_MINUTE;
    ae_m.powi(3) * ke_per_s * ke_per_s
}

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Angle in arcseconds
pub type ArcSec = f64;
/// Angle in radians
pub type Radian = f64;
/// Distance in kilometers
pub type Kilometer = f64;
/// Distance in meters
pub type Meter = f64;
/// Distance in Earth equatorial radii (SGP4 internal length unit)
pub type EarthRadii = f64;
/// Time offset in minutes from the TLE epoch (SGP4 `tsince`)
pub type Minutes = f64;

#[cfg(test)]
mod constants_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_earth_mu_matches_wgs84() {
        assert_relative_eq!(earth_mu(), 3.986005e14, max_relative = 1e-9);
    }

    #[test]
    fn test_equatorial_radius() {
        assert_relative_eq!(earth_equatorial_radius(), 6_378_137.0, epsilon = 1e-6);
    }
}
