pub mod constants;
pub mod earth_orientation;
pub mod ephem_errors;
pub mod ephemeris;
pub mod kepler;
pub mod mean_elements;
pub mod orbit_type;
pub mod osculating;
pub mod propagator;
pub mod ref_system;
pub mod time;
pub mod tle;
