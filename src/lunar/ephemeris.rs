//! # Apparent Sun and Moon positions
//!
//! The lunar eclipse reduction only needs geocentric right ascension, declination, horizontal
//! parallax and semidiameter of both bodies. They are supplied through the [`Ephemeris`] trait so
//! any source can be plugged in; [`LowPrecisionEphemeris`] is the built-in one.
//!
//! ## Low-precision series
//!
//! The series are those of the *Astronomical Almanac* "low precision formulas": a few periodic
//! terms for the Moon's ecliptic longitude, latitude and parallax, and the mean Sun with the
//! equation of centre. Accuracy is a few arcminutes, ample for eclipse circumstances to about a
//! minute of time.

use hifitime::Epoch;

use crate::constants::{Kilometer, Radian, AU, EARTH_RADIUS_KM, RADEG, RADSEC};
use crate::eclipse_errors::EclipseError;
use crate::frames::ecliptic_to_equatorial;
use crate::time::{jd_tt, julian_centuries_tt};

/// Geocentric apparent place of the Sun or the Moon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApparentPosition {
    /// Right ascension, radians in `[0, 2π)`
    pub ra: Radian,
    /// Declination, radians
    pub dec: Radian,
    /// Geocentric distance, km
    pub distance: Kilometer,
    /// Equatorial horizontal parallax, radians
    pub parallax: Radian,
    /// Apparent semidiameter, radians
    pub semidiameter: Radian,
}

/// Source of Sun and Moon positions.
pub trait Ephemeris {
    fn sun(&self, epoch: &Epoch) -> Result<ApparentPosition, EclipseError>;
    fn moon(&self, epoch: &Epoch) -> Result<ApparentPosition, EclipseError>;
}

/// Astronomical Almanac low-precision Sun and Moon.
#[derive(Debug, Clone, Copy, Default)]
pub struct LowPrecisionEphemeris;

/// `sin` of an angle in degrees.
fn sind(x: f64) -> f64 {
    (x * RADEG).sin()
}

/// `cos` of an angle in degrees.
fn cosd(x: f64) -> f64 {
    (x * RADEG).cos()
}

impl Ephemeris for LowPrecisionEphemeris {
    fn sun(&self, epoch: &Epoch) -> Result<ApparentPosition, EclipseError> {
        let n = jd_tt(epoch) - 2451545.0;

        let mean_longitude = 280.460 + 0.9856474 * n;
        let g = 357.528 + 0.9856003 * n;
        let lambda = mean_longitude + 1.915 * sind(g) + 0.020 * sind(2.0 * g);
        // AU
        let r = 1.00014 - 0.01671 * cosd(g) - 0.00014 * cosd(2.0 * g);

        let (ra, dec) = ecliptic_to_equatorial(lambda * RADEG, 0.0, epoch.to_mjd_tt_days());
        Ok(ApparentPosition {
            ra,
            dec,
            distance: r * AU,
            parallax: 8.794 * RADSEC / r,
            semidiameter: 959.63 * RADSEC / r,
        })
    }

    fn moon(&self, epoch: &Epoch) -> Result<ApparentPosition, EclipseError> {
        let t = julian_centuries_tt(epoch);

        let lambda = 218.32 + 481267.881 * t
            + 6.29 * sind(135.0 + 477198.87 * t)
            - 1.27 * sind(259.3 - 413335.36 * t)
            + 0.66 * sind(235.7 + 890534.22 * t)
            + 0.21 * sind(269.9 + 954397.74 * t)
            - 0.19 * sind(357.5 + 35999.05 * t)
            - 0.11 * sind(186.5 + 966404.03 * t);

        let beta = 5.13 * sind(93.3 + 483202.02 * t)
            + 0.28 * sind(228.2 + 960400.89 * t)
            - 0.28 * sind(318.3 + 6003.15 * t)
            - 0.17 * sind(217.6 - 407332.21 * t);

        let parallax = 0.9508
            + 0.0518 * cosd(135.0 + 477198.87 * t)
            + 0.0095 * cosd(259.3 - 413335.36 * t)
            + 0.0078 * cosd(235.7 + 890534.22 * t)
            + 0.0028 * cosd(269.9 + 954397.74 * t);

        let parallax = parallax * RADEG;
        let (ra, dec) =
            ecliptic_to_equatorial(lambda * RADEG, beta * RADEG, epoch.to_mjd_tt_days());
        Ok(ApparentPosition {
            ra,
            dec,
            distance: EARTH_RADIUS_KM / parallax.sin(),
            parallax,
            semidiameter: 0.2724 * parallax,
        })
    }
}
