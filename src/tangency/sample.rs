//! Fundamental-plane geometry of one observer at one instant.

use crate::besselian::BesselianElements;
use crate::constants::{Degree, EarthRadii, Hours, Radian};
use crate::shadow_axis::ShadowAxis;
use crate::site::Site;

/// Geometry of a site relative to the shadow axis at a time offset `t`.
///
/// `u`, `v` is the shadow axis as seen from the observer's projection onto the fundamental
/// plane, `a`, `b` its rate of change, `n` the norm of that rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometricSample {
    pub t: Hours,
    pub axis: ShadowAxis,
    /// Local hour angle of the shadow axis, radians
    pub hour_angle: Radian,
    pub xi: EarthRadii,
    pub eta: EarthRadii,
    pub zeta: EarthRadii,
    pub u: EarthRadii,
    pub v: EarthRadii,
    pub a: f64,
    pub b: f64,
    pub n: f64,
    /// Penumbral radius in the observer's plane
    pub l1_prime: EarthRadii,
    /// Umbral radius in the observer's plane, negative for a total eclipse
    pub l2_prime: EarthRadii,
}

impl GeometricSample {
    /// Project `site` onto the fundamental plane at `t` hours from `t0`.
    pub fn evaluate(elements: &BesselianElements, site: &Site, t: Hours) -> GeometricSample {
        let axis = ShadowAxis::at(elements, t);

        let hour_angle = axis.ephemeris_hour_angle(elements.delta_t()) + site.longitude;
        let (sin_h, cos_h) = hour_angle.sin_cos();
        let (sin_d, cos_d) = axis.d.sin_cos();
        let (rc, rs) = (site.rho_cos_phi, site.rho_sin_phi);

        let xi = rc * sin_h;
        let eta = rs * cos_d - rc * cos_h * sin_d;
        let zeta = rs * sin_d + rc * cos_h * cos_d;

        let dxi = axis.dmu * rc * cos_h;
        let deta = axis.dmu * xi * sin_d - zeta * axis.dd;

        let u = axis.x - xi;
        let v = axis.y - eta;
        let a = axis.dx - dxi;
        let b = axis.dy - deta;

        GeometricSample {
            t,
            axis,
            hour_angle,
            xi,
            eta,
            zeta,
            u,
            v,
            a,
            b,
            n: a.hypot(b),
            l1_prime: axis.l1 - zeta * elements.tan_f1(),
            l2_prime: axis.l2 - zeta * elements.tan_f2(),
        }
    }

    /// Distance between the observer and the shadow axis, `m`.
    pub fn miss_distance(&self) -> EarthRadii {
        self.u.hypot(self.v)
    }

    /// Eclipse magnitude `(L1' − m) / (L1' + L2')`.
    ///
    /// Positive when the observer is inside the penumbra.
    pub fn magnitude(&self) -> f64 {
        (self.l1_prime - self.miss_distance()) / (self.l1_prime + self.l2_prime)
    }

    /// Ratio of the apparent lunar and solar diameters, `(L1' − L2') / (L1' + L2')`.
    pub fn diameter_ratio(&self) -> f64 {
        (self.l1_prime - self.l2_prime) / (self.l1_prime + self.l2_prime)
    }

    /// Signed distance of the observer from the shadow axis, measured perpendicular to the
    /// relative motion; positive to the left of the motion (north for an eastward track).
    pub fn cross_track(&self) -> EarthRadii {
        (self.u * self.b - self.v * self.a) / self.n
    }

    /// Derivative of [`cross_track`](Self::cross_track) with respect to the site's latitude,
    /// at fixed time and longitude.
    pub fn cross_track_sensitivity(&self, site: &Site) -> f64 {
        let (sin_h, cos_h) = self.hour_angle.sin_cos();
        let (sin_d, cos_d) = self.axis.d.sin_cos();
        let dxi = -site.rho_sin_phi * sin_h;
        let deta = site.rho_cos_phi * cos_d + site.rho_sin_phi * cos_h * sin_d;
        (-self.b * dxi + self.a * deta) / self.n
    }

    /// Component of the observer's offset along the axis normal to the motion, `q` of the
    /// central-line width formula.
    pub fn normal_offset(&self) -> EarthRadii {
        (self.a * self.eta - self.b * self.xi) / self.n
    }

    /// Sine of the geometric altitude of the Sun.
    pub fn sin_altitude(&self, site: &Site) -> f64 {
        let (sin_phi, cos_phi) = site.latitude.sin_cos();
        let (sin_d, cos_d) = self.axis.d.sin_cos();
        sin_phi * sin_d + cos_phi * cos_d * self.hour_angle.cos()
    }

    /// Geometric altitude of the Sun, degrees.
    pub fn altitude(&self, site: &Site) -> Degree {
        self.sin_altitude(site).clamp(-1.0, 1.0).asin().to_degrees()
    }

    /// Position angle of the Moon's centre relative to the Sun's, from north through east,
    /// degrees in `[0, 360)`.
    pub fn position_angle(&self) -> Degree {
        self.u.atan2(self.v).to_degrees().rem_euclid(360.0)
    }
}

#[cfg(test)]
mod sample_test {
    use super::*;
    use crate::unit_test_global::SYNTHETIC_CENTRAL;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_sub_axis_observer() {
        // observer under the axis at t0: at the Greenwich equator
        let elements = &*SYNTHETIC_CENTRAL;
        let site = Site::from_radians(0.0, 0.0, 0.0);
        let s = GeometricSample::evaluate(elements, &site, 0.0);

        assert_abs_diff_eq!(s.xi, 0.0);
        assert_abs_diff_eq!(s.eta, 0.0);
        assert_abs_diff_eq!(s.zeta, 1.0);
        assert_abs_diff_eq!(s.miss_distance(), 0.0);
        assert_abs_diff_eq!(s.l1_prime, 0.54 - 0.0046, epsilon = 1e-15);
        assert_abs_diff_eq!(s.l2_prime, -0.004 - 0.00459, epsilon = 1e-15);
        assert_abs_diff_eq!(s.altitude(&site), 90.0, epsilon = 1e-9);
        assert!(s.magnitude() > 1.0);

        // the surface under the axis moves east at 15°/h
        assert_abs_diff_eq!(s.a, 0.55 - 15f64.to_radians(), epsilon = 1e-15);
    }

    #[test]
    fn test_cross_track_sign() {
        let elements = &*SYNTHETIC_CENTRAL;
        let north = Site::from_radians(0.0, 10f64.to_radians(), 0.0);
        let south = Site::from_radians(0.0, -10f64.to_radians(), 0.0);
        let sn = GeometricSample::evaluate(elements, &north, 0.0);
        let ss = GeometricSample::evaluate(elements, &south, 0.0);

        // the axis passes south of a northern observer
        assert!(sn.v < 0.0);
        assert!(sn.cross_track() > 0.0);
        assert!(ss.cross_track() < 0.0);
        assert_abs_diff_eq!(sn.cross_track(), -ss.cross_track(), epsilon = 1e-12);
        assert!(sn.cross_track_sensitivity(&north) > 0.0);
        assert_abs_diff_eq!(sn.position_angle(), 180.0, epsilon = 1e-9);
    }

    #[test]
    fn test_cross_track_sensitivity_matches_difference() {
        let elements = &*SYNTHETIC_CENTRAL;
        let (lat, step) = (0.3, 1e-6);
        let site = Site::from_radians(0.2, lat, 0.0);
        let s = GeometricSample::evaluate(elements, &site, 0.1);
        let s_up = GeometricSample::evaluate(elements, &Site::from_radians(0.2, lat + step, 0.0), 0.1);
        let numeric = (s_up.cross_track() - s.cross_track()) / step;
        assert_abs_diff_eq!(s.cross_track_sensitivity(&site), numeric, epsilon = 2e-2);
    }
}
