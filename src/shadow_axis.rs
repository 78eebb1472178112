//! # Shadow axis in the fundamental plane
//!
//! Evaluation of the Besselian polynomials at a time offset, and the geometry that only depends
//! on the shadow axis (not on an observer):
//!
//! * [`ShadowAxis::at`] – values and hourly rates of X, Y, d, μ, L1, L2 at `t`,
//! * [`sub_axis_point`] – geographic point where the shadow axis pierces the ellipsoid.
//!
//! Angles in [`ShadowAxis`] are converted to radians and rates to radians per hour, so the
//! downstream reduction works without further unit juggling.

use crate::besselian::BesselianElements;
use crate::constants::{
    EarthRadii, Hours, Radian, EARTH_AXIS_RATIO, EARTH_ROTATION_DEG_PER_SEC, RADEG,
};
use crate::frames::normalize_angle;

/// Evaluate `c[0] + c[1] t + c[2] t² + …` with Horner's scheme.
fn horner(c: &[f64], t: f64) -> f64 {
    c.iter().rev().fold(0.0, |acc, &ci| acc * t + ci)
}

/// First derivative of the polynomial evaluated by [`horner`].
fn horner_derivative(c: &[f64], t: f64) -> f64 {
    c.iter()
        .enumerate()
        .skip(1)
        .rev()
        .fold(0.0, |acc, (k, &ci)| acc * t + k as f64 * ci)
}

/// State of the shadow axis at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowAxis {
    /// Time offset from `t0`, hours
    pub t: Hours,
    pub x: EarthRadii,
    pub y: EarthRadii,
    /// Declination of the axis, radians
    pub d: Radian,
    /// Greenwich hour angle of the axis, radians
    pub mu: Radian,
    pub l1: EarthRadii,
    pub l2: EarthRadii,
    /// dX/dt, Earth radii per hour
    pub dx: f64,
    /// dY/dt, Earth radii per hour
    pub dy: f64,
    /// dd/dt, radians per hour
    pub dd: f64,
    /// dμ/dt, radians per hour
    pub dmu: f64,
}

impl ShadowAxis {
    /// Evaluate the element polynomials at `t` hours from `t0`.
    pub fn at(elements: &BesselianElements, t: Hours) -> ShadowAxis {
        let c = elements.coefficients();
        ShadowAxis {
            t,
            x: horner(&c.x, t),
            y: horner(&c.y, t),
            d: horner(&c.d, t) * RADEG,
            mu: horner(&c.mu, t) * RADEG,
            l1: horner(&c.l1, t),
            l2: horner(&c.l2, t),
            dx: horner_derivative(&c.x, t),
            dy: horner_derivative(&c.y, t),
            dd: horner_derivative(&c.d, t) * RADEG,
            dmu: horner_derivative(&c.mu, t) * RADEG,
        }
    }

    /// Distance of the axis from the Earth's centre in the fundamental plane.
    pub fn distance(&self) -> EarthRadii {
        self.x.hypot(self.y)
    }

    /// Greenwich hour angle corrected to the ephemeris meridian.
    ///
    /// The elements are expressed in TT; the Earth turns by `1.002738 × 15″` per second of ΔT
    /// between the ephemeris and the Greenwich meridians.
    pub fn ephemeris_hour_angle(&self, delta_t: f64) -> Radian {
        self.mu - EARTH_ROTATION_DEG_PER_SEC * delta_t * RADEG
    }
}

/// Geographic point under the shadow axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubAxisPoint {
    /// East longitude, radians in `(-π, π]`
    pub longitude: Radian,
    /// Geodetic latitude, radians
    pub latitude: Radian,
    /// Third fundamental-plane coordinate of the point (towards the Moon), Earth radii
    pub zeta: EarthRadii,
}

/// Point where the shadow axis meets the reference ellipsoid, on the sunward hemisphere.
///
/// Arguments
/// ---------
/// * `elements`: the Besselian elements (for ΔT).
/// * `axis`: state of the axis at the instant.
///
/// Return
/// ------
/// * `None` when the axis misses the Earth.
///
/// Details
/// -------
/// The point has `ξ = X`, `η = Y`; `ζ` is the larger root of the ellipsoid equation written in
/// the fundamental-plane frame (the polar axis is scaled by `1 / (b/a)`).
pub fn sub_axis_point(elements: &BesselianElements, axis: &ShadowAxis) -> Option<SubAxisPoint> {
    let (x, y) = (axis.x, axis.y);
    let (sin_d, cos_d) = axis.d.sin_cos();
    let k2 = EARTH_AXIS_RATIO * EARTH_AXIS_RATIO;

    let a = cos_d * cos_d + sin_d * sin_d / k2;
    let b = 2.0 * y * sin_d * cos_d * (1.0 / k2 - 1.0);
    let c = x * x + y * y * sin_d * sin_d + y * y * cos_d * cos_d / k2 - 1.0;

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }
    let zeta = (-b + discriminant.sqrt()) / (2.0 * a);

    // back to the equatorial frame of date
    let rho_sin_phi = y * cos_d + zeta * sin_d;
    let rho_cos_phi_cos_h = zeta * cos_d - y * sin_d;
    let hour_angle = x.atan2(rho_cos_phi_cos_h);
    let rho_cos_phi = x.hypot(rho_cos_phi_cos_h);

    let latitude = (rho_sin_phi / k2).atan2(rho_cos_phi);
    let longitude = hour_angle - axis.ephemeris_hour_angle(elements.delta_t());

    Some(SubAxisPoint {
        longitude: normalize_angle(longitude),
        latitude,
        zeta,
    })
}
