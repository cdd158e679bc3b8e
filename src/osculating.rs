//! # Osculating element conversion
//!
//! [`OsculatingConverter`] reads the Cartesian state of an [`OrbitalStateSource`] at an epoch,
//! rotates it into the run's output frame and converts it with the two-body relations of
//! [`KeplerianElements::from_cartesian`], using the gravitational parameter the source was
//! built with.
//!
//! The output frame is fixed when the converter is built: one tabulation run never mixes frames.

use hifitime::Epoch;

use crate::ephem_errors::EphemError;
use crate::orbit_type::keplerian_element::KeplerianElements;
use crate::propagator::OrbitalStateSource;
use crate::ref_system::ReferenceFrame;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OsculatingConverter {
    frame: ReferenceFrame,
}

impl OsculatingConverter {
    pub fn new(frame: ReferenceFrame) -> Self {
        Self { frame }
    }

    /// Output frame of every element set produced by this converter.
    pub fn frame(&self) -> ReferenceFrame {
        self.frame
    }

    /// Osculating Keplerian elements of `source` at `epoch`.
    ///
    /// Arguments
    /// ---------
    /// * `source`: state source, advanced to `epoch` by this call.
    /// * `epoch`: target epoch.
    ///
    /// Return
    /// ------
    /// * The elements in [`Self::frame`], or
    ///   - [`EphemError::Propagation`] if the source cannot produce a state at `epoch`,
    ///   - [`EphemError::DegenerateOrbit`] if the classical elements are undefined there.
    pub fn elements_at<S: OrbitalStateSource + ?Sized>(
        &self,
        source: &mut S,
        epoch: Epoch,
    ) -> Result<KeplerianElements, EphemError> {
        let state = source.cartesian_state(epoch)?;
        let rotation = state.frame.rotation_to(self.frame, epoch);
        let state = state.rotated(&rotation, self.frame);

        KeplerianElements::from_cartesian(&state, source.gravitational_parameter())
    }
}

impl Default for OsculatingConverter {
    fn default() -> Self {
        Self::new(ReferenceFrame::default())
    }
}

#[cfg(test)]
mod osculating_test {
    use super::*;
    use crate::constants::RADEG;
    use crate::kepler::angle_diff;
    use crate::propagator::sgp4_propagator::Sgp4Propagator;
    use crate::ref_system::rotz;
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
    fn test_osculating_sample_tle() {
        let (tle, mut prop) = setup();
        let converter = OsculatingConverter::default();

        for hours in 0..3i64 {
            let epoch = tle.epoch() + Unit::Hour * hours;
            let kep = converter.elements_at(&mut prop, epoch).unwrap();

            assert_eq!(kep.frame, ReferenceFrame::TrueOfDate);
            assert_eq!(kep.reference_epoch, epoch);
            assert!((6_850e3..6_950e3).contains(&kep.semi_major_axis));
            assert!((0.0..1.0).contains(&kep.eccentricity));
            assert!((kep.inclination / RADEG - 97.35).abs() < 0.1);
        }
    }

    #[test]
    fn test_tod_and_teme_differ_by_node_only() {
        let (tle, mut prop) = setup();
        let epoch = tle.epoch() + Unit::Minute * 45;

        let teme = OsculatingConverter::new(ReferenceFrame::Teme)
            .elements_at(&mut prop, epoch)
            .unwrap();
        let tod = OsculatingConverter::new(ReferenceFrame::TrueOfDate)
            .elements_at(&mut prop, epoch)
            .unwrap();

        assert_relative_eq!(tod.semi_major_axis, teme.semi_major_axis, max_relative = 1e-12);
        assert_relative_eq!(tod.eccentricity, teme.eccentricity, max_relative = 1e-9);
        assert_relative_eq!(tod.inclination, teme.inclination, epsilon = 1e-12);
        assert!(angle_diff(tod.periapsis_argument, teme.periapsis_argument).abs() < 1e-9);
        assert!(angle_diff(tod.mean_anomaly, teme.mean_anomaly).abs() < 1e-9);

        // The node moves by the equation of the equinoxes
        let rot = ReferenceFrame::TrueOfDate.rotation_from_teme(epoch);
        let eqeq = rot[(1, 0)].atan2(rot[(0, 0)]);
        assert_relative_eq!(rotz(eqeq), rot, epsilon = 1e-15);
        assert!(
            (angle_diff(tod.ascending_node_longitude, teme.ascending_node_longitude) - eqeq).abs()
                < 1e-9
        );
    }
}
