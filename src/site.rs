//! # Observer sites on the reference ellipsoid
//!
//! A [`Site`] is a geodetic position (longitude, latitude, height) together with its geocentric
//! parallax components `ρ cos φ'` and `ρ sin φ'`, the only quantities the fundamental-plane
//! reduction needs.
//!
//! Longitudes are **east positive** and stored in radians. The latitude search of
//! [`tangency`](crate::tangency) moves sea-level sites along a meridian, hence the
//! unchecked [`Site::from_radians`] constructor.

use serde::Serialize;

use crate::constants::{Degree, Meter, Radian, EARTH_AXIS_RATIO, EARTH_MAJOR_AXIS};
use crate::eclipse_errors::EclipseError;

/// A geodetic observer position with its parallax components.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Site {
    /// East longitude, radians
    pub longitude: Radian,
    /// Geodetic latitude, radians
    pub latitude: Radian,
    /// Height above the ellipsoid, meters
    pub height: Meter,
    /// Distance to the polar axis, in Earth equatorial radii
    pub rho_cos_phi: f64,
    /// Distance to the equatorial plane, in Earth equatorial radii
    pub rho_sin_phi: f64,
}

impl Site {
    /// Build a site from geodetic coordinates in degrees.
    ///
    /// Arguments
    /// ---------
    /// * `longitude`: east longitude in degrees, any range.
    /// * `latitude`: geodetic latitude in degrees, `[-90, 90]`.
    /// * `height`: height above the ellipsoid in meters.
    ///
    /// Return
    /// ------
    /// * The site, or [`EclipseError::InvalidSite`] for non-finite inputs or a latitude outside
    ///   `[-90, 90]`.
    pub fn new(longitude: Degree, latitude: Degree, height: Meter) -> Result<Self, EclipseError> {
        if !(longitude.is_finite() && latitude.is_finite() && height.is_finite()) {
            return Err(EclipseError::InvalidSite(format!(
                "non-finite coordinates ({longitude}, {latitude}, {height})"
            )));
        }
        if latitude.abs() > 90.0 {
            return Err(EclipseError::InvalidSite(format!(
                "latitude {latitude} outside [-90, 90]"
            )));
        }
        Ok(Site::from_radians(
            longitude.to_radians(),
            latitude.to_radians(),
            height,
        ))
    }

    /// Build a site from radians without range checks.
    ///
    /// Latitudes beyond ±π/2 are accepted: they describe the point reached by continuing over
    /// the pole, which the latitude iteration may visit transiently.
    pub fn from_radians(longitude: Radian, latitude: Radian, height: Meter) -> Self {
        let (rho_cos_phi, rho_sin_phi) = lat_alt_to_parallax(latitude, height);
        Site {
            longitude,
            latitude,
            height,
            rho_cos_phi,
            rho_sin_phi,
        }
    }

    /// East longitude in degrees.
    pub fn longitude_deg(&self) -> Degree {
        self.longitude.to_degrees()
    }

    /// Geodetic latitude in degrees.
    pub fn latitude_deg(&self) -> Degree {
        self.latitude.to_degrees()
    }
}

/// Convert geodetic latitude and height into normalized parallax coordinates.
///
/// Arguments
/// ---------
/// * `lat`: geodetic latitude in radians.
/// * `height`: height above the ellipsoid in meters.
///
/// Return
/// ------
/// * `(rho_cos_phi, rho_sin_phi)`, in Earth equatorial radii.
pub fn lat_alt_to_parallax(lat: Radian, height: Meter) -> (f64, f64) {
    // parametric (reduced) latitude
    let u = (lat.sin() * EARTH_AXIS_RATIO).atan2(lat.cos());
    let h = height / EARTH_MAJOR_AXIS;

    let rho_sin_phi = EARTH_AXIS_RATIO * u.sin() + h * lat.sin();
    let rho_cos_phi = u.cos() + h * lat.cos();

    (rho_cos_phi, rho_sin_phi)
}

#[cfg(test)]
mod site_test {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_lat_alt_to_parallax() {
        // Meeus, example 11.a: Palomar
        let lat = (33.0 + 21.0 / 60.0 + 22.0 / 3600.0_f64).to_radians();
        let (rc, rs) = lat_alt_to_parallax(lat, 1706.0);
        assert_abs_diff_eq!(rs, 0.546861, epsilon = 1e-6);
        assert_abs_diff_eq!(rc, 0.836339, epsilon = 1e-6);
    }

    #[test]
    fn test_poles_and_equator() {
        let (rc, rs) = lat_alt_to_parallax(0.0, 0.0);
        assert_abs_diff_eq!(rc, 1.0);
        assert_abs_diff_eq!(rs, 0.0);

        let (rc, rs) = lat_alt_to_parallax(std::f64::consts::FRAC_PI_2, 0.0);
        assert_abs_diff_eq!(rc, 0.0, epsilon = 1e-15);
        assert_abs_diff_eq!(rs, EARTH_AXIS_RATIO, epsilon = 1e-15);
    }

    #[test]
    fn test_site_validation() {
        assert!(Site::new(-87.5, 36.9, 0.0).is_ok());
        assert_eq!(
            Site::new(0.0, 91.0, 0.0),
            Err(EclipseError::InvalidSite(
                "latitude 91 outside [-90, 90]".to_string()
            ))
        );
        assert!(Site::new(f64::NAN, 0.0, 0.0).is_err());
    }

    #[test]
    fn test_over_the_pole() {
        // 100° along the meridian is 80° on the opposite meridian
        let beyond = Site::from_radians(0.0, 100f64.to_radians(), 0.0);
        let mirror = Site::from_radians(std::f64::consts::PI, 80f64.to_radians(), 0.0);
        assert_abs_diff_eq!(beyond.rho_sin_phi, mirror.rho_sin_phi, epsilon = 1e-12);
        assert_abs_diff_eq!(beyond.rho_cos_phi, -mirror.rho_cos_phi, epsilon = 1e-12);
    }
}
