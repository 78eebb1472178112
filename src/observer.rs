//! # Local circumstances of a solar eclipse
//!
//! For one observer [`Site`], compute the instant and magnitude of greatest eclipse, the contact
//! times and whether any of it happens with the Sun above the horizon.
//!
//! ## Overview
//!
//! * [`greatest_magnitude`] – the magnitude alone, `-1.0` when the solve fails.
//! * [`observer_circumstances`] – the full [`ObserverCircumstance`] record.
//!
//! ## Visibility
//!
//! An eclipse is visible when, among greatest eclipse and the first and last contacts, at least
//! one instant has the Sun above the refraction-limited horizon (−34′). The contacts are only
//! solved when the magnitude at greatest eclipse is positive.

use hifitime::Epoch;
use log::debug;

use crate::besselian::BesselianElements;
use crate::constants::{Degree, Hours, Seconds, REFRACTION_FLOOR, SECONDS_PER_HOUR};
use crate::site::Site;
use crate::tangency::{
    solve_time, ContactCone, ContactSide, GeometricSample, NoSolution, TimeObjective,
};

/// Type of the eclipse as seen from a site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalEclipseKind {
    /// The Moon never enters the solar disk
    None,
    Partial,
    Annular,
    Total,
}

/// An event of the local eclipse.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalInstant {
    /// Time offset from `t0`, hours
    pub t: Hours,
    pub tt: Epoch,
    pub ut: Epoch,
    /// Geometric altitude of the Sun, degrees
    pub altitude: Degree,
    /// Position angle of the Moon's centre from the Sun's, degrees from north through east
    pub position_angle: Degree,
}

impl LocalInstant {
    fn new(elements: &BesselianElements, site: &Site, sample: &GeometricSample) -> Self {
        LocalInstant {
            t: sample.t,
            tt: elements.epoch_tt(sample.t),
            ut: elements.epoch_ut(sample.t),
            altitude: sample.altitude(site),
            position_angle: sample.position_angle(),
        }
    }

    /// The Sun clears the refraction-limited horizon.
    pub fn above_horizon(&self) -> bool {
        self.altitude >= REFRACTION_FLOOR.to_degrees()
    }
}

/// Circumstances of a solar eclipse for one observer.
#[derive(Debug, Clone, PartialEq)]
pub struct ObserverCircumstance {
    /// Magnitude at greatest eclipse; negative when the penumbra misses the site
    pub greatest_magnitude: f64,
    pub visible: bool,
    pub kind: LocalEclipseKind,
    pub maximum: LocalInstant,
    /// C1
    pub first_contact: Option<LocalInstant>,
    /// C2
    pub second_contact: Option<LocalInstant>,
    /// C3
    pub third_contact: Option<LocalInstant>,
    /// C4
    pub last_contact: Option<LocalInstant>,
    /// Moon / Sun apparent diameter ratio at greatest eclipse
    pub diameter_ratio: f64,
    /// Fraction of the solar disk area covered at greatest eclipse
    pub obscuration: f64,
}

impl ObserverCircumstance {
    /// Duration of totality or annularity, seconds.
    pub fn central_duration(&self) -> Option<Seconds> {
        match (&self.second_contact, &self.third_contact) {
            (Some(c2), Some(c3)) => Some((c3.t - c2.t) * SECONDS_PER_HOUR),
            _ => None,
        }
    }

    /// Duration of the whole eclipse (C1 to C4), seconds.
    pub fn duration(&self) -> Option<Seconds> {
        match (&self.first_contact, &self.last_contact) {
            (Some(c1), Some(c4)) => Some((c4.t - c1.t) * SECONDS_PER_HOUR),
            _ => None,
        }
    }
}

/// Magnitude of greatest eclipse at a site.
///
/// Return
/// ------
/// * `G = (L1' − m) / (L1' + L2')` at the instant of least distance to the shadow axis,
///   or `-1.0` when the iteration fails.
pub fn greatest_magnitude(elements: &BesselianElements, site: &Site) -> f64 {
    match solve_time(elements, site, TimeObjective::Maximum, 0.0) {
        Ok(sample) => sample.magnitude(),
        Err(err) => {
            debug!("greatest eclipse not found for {site:?}: {err}");
            -1.0
        }
    }
}

fn contact(
    elements: &BesselianElements,
    site: &Site,
    side: ContactSide,
    cone: ContactCone,
    t_max: Hours,
) -> Option<LocalInstant> {
    solve_time(elements, site, TimeObjective::Contact { side, cone }, t_max)
        .map(|s| LocalInstant::new(elements, site, &s))
        .map_err(|err: NoSolution| debug!("{side:?} {cone:?} contact not found: {err}"))
        .ok()
}

/// Fraction of the Sun's disk hidden by the Moon.
///
/// Arguments
/// ---------
/// * `magnitude`: eclipse magnitude (fraction of the solar diameter covered).
/// * `ratio`: Moon / Sun apparent diameter ratio.
fn obscuration(magnitude: f64, ratio: f64) -> f64 {
    if magnitude <= 0.0 {
        return 0.0;
    }
    // disks of radius 1 (Sun) and ratio (Moon), centres c apart
    let c = 1.0 + ratio - 2.0 * magnitude;
    if c <= (ratio - 1.0).abs() {
        return (ratio * ratio).min(1.0);
    }
    let alpha = ((1.0 + c * c - ratio * ratio) / (2.0 * c)).clamp(-1.0, 1.0).acos();
    let beta = ((ratio * ratio + c * c - 1.0) / (2.0 * ratio * c))
        .clamp(-1.0, 1.0)
        .acos();
    let lens = alpha - 0.5 * (2.0 * alpha).sin() + ratio * ratio * (beta - 0.5 * (2.0 * beta).sin());
    lens / std::f64::consts::PI
}

/// Local circumstances of the eclipse at `site`.
///
/// Arguments
/// ---------
/// * `elements`: Besselian elements of the eclipse.
/// * `site`: the observer.
///
/// Return
/// ------
/// * `None` when greatest eclipse cannot be located (non-convergent geometry).
/// * Otherwise the circumstances. When the magnitude is not positive the contacts are absent,
///   `kind` is [`LocalEclipseKind::None`] and `visible` is `false`.
pub fn observer_circumstances(
    elements: &BesselianElements,
    site: &Site,
) -> Option<ObserverCircumstance> {
    let max = solve_time(elements, site, TimeObjective::Maximum, 0.0)
        .map_err(|err| debug!("greatest eclipse not found for {site:?}: {err}"))
        .ok()?;

    let magnitude = max.magnitude();
    let ratio = max.diameter_ratio();
    let maximum = LocalInstant::new(elements, site, &max);

    if magnitude <= 0.0 {
        return Some(ObserverCircumstance {
            greatest_magnitude: magnitude,
            visible: false,
            kind: LocalEclipseKind::None,
            maximum,
            first_contact: None,
            second_contact: None,
            third_contact: None,
            last_contact: None,
            diameter_ratio: ratio,
            obscuration: 0.0,
        });
    }

    let first_contact = contact(elements, site, ContactSide::Ingress, ContactCone::Penumbra, max.t);
    let last_contact = contact(elements, site, ContactSide::Egress, ContactCone::Penumbra, max.t);

    let central = max.miss_distance() < max.l2_prime.abs();
    let (second_contact, third_contact) = if central {
        (
            contact(elements, site, ContactSide::Ingress, ContactCone::Umbra, max.t),
            contact(elements, site, ContactSide::Egress, ContactCone::Umbra, max.t),
        )
    } else {
        (None, None)
    };

    let kind = match (central, max.l2_prime < 0.0) {
        (false, _) => LocalEclipseKind::Partial,
        (true, true) => LocalEclipseKind::Total,
        (true, false) => LocalEclipseKind::Annular,
    };

    let visible = maximum.above_horizon()
        || [first_contact, last_contact]
            .iter()
            .flatten()
            .any(LocalInstant::above_horizon);

    Some(ObserverCircumstance {
        greatest_magnitude: magnitude,
        visible,
        kind,
        maximum,
        first_contact,
        second_contact,
        third_contact,
        last_contact,
        diameter_ratio: ratio,
        obscuration: if kind == LocalEclipseKind::Total {
            1.0
        } else {
            obscuration(magnitude, ratio)
        },
    })
}

#[cfg(test)]
mod observer_test {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_obscuration_bounds() {
        assert_eq!(obscuration(0.0, 1.03), 0.0);
        assert_eq!(obscuration(-0.2, 1.03), 0.0);
        // annular: the Moon sits inside the disk
        assert_abs_diff_eq!(obscuration(0.97, 0.95), 0.9025, epsilon = 1e-12);
        // a grazing half-diameter partial covers less than half the area
        let half = obscuration(0.5, 1.0);
        assert!(half > 0.35 && half < 0.45);
    }

    #[test]
    fn test_obscuration_monotonic() {
        let mut previous = 0.0;
        for k in 1..=20 {
            let o = obscuration(k as f64 * 0.05, 1.02);
            assert!(o > previous);
            previous = o;
        }
    }
}
