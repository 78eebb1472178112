//! # Ecliptic and equatorial frames
//!
//! Conversions used by the low-precision ephemeris: mean obliquity of the ecliptic (IAU 1976),
//! elementary rotations and the ecliptic → equatorial transformation of date.

use nalgebra::{Matrix3, Rotation3, Vector3};

use crate::constants::{Radian, DPI, MJD, RADSEC, T2000};

/// Principal axis of an elementary rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationAxis {
    X,
    Y,
    Z,
}

/// Mean obliquity of the ecliptic (IAU 1976).
///
/// Arguments
/// ---------
/// * `tjm`: Modified Julian Date, TT.
///
/// Return
/// ------
/// * ε in radians.
pub fn obleq(tjm: MJD) -> Radian {
    let ob0 = ((23.0 * 3600.0 + 26.0 * 60.0) + 21.448) * RADSEC;
    let ob1 = -46.815 * RADSEC;
    let ob2 = -0.0006 * RADSEC;
    let ob3 = 0.00181 * RADSEC;

    let t = (tjm - T2000) / 36525.0;

    ((ob3 * t + ob2) * t + ob1) * t + ob0
}

/// Active rotation of a vector by `alpha` around `axis` (`x' = R · x`).
pub fn rotmt(alpha: Radian, axis: RotationAxis) -> Matrix3<f64> {
    let axis = match axis {
        RotationAxis::X => Vector3::x_axis(),
        RotationAxis::Y => Vector3::y_axis(),
        RotationAxis::Z => Vector3::z_axis(),
    };
    Rotation3::from_axis_angle(&axis, alpha).into()
}

/// Reduce an angle to `(-π, π]`.
pub fn normalize_angle(angle: Radian) -> Radian {
    let wrapped = angle.rem_euclid(DPI);
    if wrapped > std::f64::consts::PI {
        wrapped - DPI
    } else {
        wrapped
    }
}

/// Unit vector of the spherical direction (`lon`, `lat`).
pub fn unit_vector(lon: Radian, lat: Radian) -> Vector3<f64> {
    let (sin_lat, cos_lat) = lat.sin_cos();
    let (sin_lon, cos_lon) = lon.sin_cos();
    Vector3::new(cos_lat * cos_lon, cos_lat * sin_lon, sin_lat)
}

/// Spherical direction of a non-zero vector, longitude in `[0, 2π)`.
pub fn spherical(v: &Vector3<f64>) -> (Radian, Radian) {
    let lon = v.y.atan2(v.x).rem_euclid(DPI);
    let lat = (v.z / v.norm()).clamp(-1.0, 1.0).asin();
    (lon, lat)
}

/// Convert ecliptic coordinates of date into equatorial coordinates of date.
///
/// Arguments
/// ---------
/// * `lambda`, `beta`: ecliptic longitude and latitude, radians.
/// * `tjm`: Modified Julian Date, TT (for the obliquity).
///
/// Return
/// ------
/// * `(ra, dec)` in radians, right ascension in `[0, 2π)`.
pub fn ecliptic_to_equatorial(lambda: Radian, beta: Radian, tjm: MJD) -> (Radian, Radian) {
    let rot = rotmt(obleq(tjm), RotationAxis::X);
    spherical(&(rot * unit_vector(lambda, beta)))
}
