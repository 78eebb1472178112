//! # Greatest eclipse and global extent
//!
//! Quantities of a solar eclipse that depend only on the shadow axis:
//!
//! * [`greatest_eclipse`] – the instant the axis passes closest to the Earth's centre, the
//!   signed least distance (γ) and, for a central eclipse, the central-line point there,
//! * [`shadow_window`] – interval during which the axis, or the penumbra, touches the Earth.

use hifitime::Epoch;
use log::debug;

use crate::besselian::BesselianElements;
use crate::constants::{EarthRadii, Hours, MAX_TIME_ITERATIONS, TIME_TOLERANCE};
use crate::curves::CentralLinePoint;
use crate::shadow_axis::{sub_axis_point, ShadowAxis};
use crate::site::Site;
use crate::tangency::{GeometricSample, TangentPoint};

/// Half-width of the seeds bracketing greatest eclipse, hours.
const WINDOW_SEED_OFFSET: Hours = 3.0;

/// Greatest eclipse of a solar eclipse.
#[derive(Debug, Clone, PartialEq)]
pub struct GreatestEclipse {
    /// Time offset from `t0`, hours
    pub t: Hours,
    pub tt: Epoch,
    pub ut: Epoch,
    /// Least distance of the axis from the Earth's centre, signed like Y
    pub gamma: EarthRadii,
    /// Central-line point under the axis; `None` for a non-central eclipse
    pub central: Option<CentralLinePoint>,
}

/// Which part of the shadow a window refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShadowExtent {
    /// The shadow axis meets the Earth (central phase)
    Axis,
    /// Any part of the penumbra meets the Earth
    Penumbra,
}

/// Closed time interval, hours from `t0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeWindow {
    pub start: Hours,
    pub end: Hours,
}

impl TimeWindow {
    pub fn duration(&self) -> Hours {
        self.end - self.start
    }

    pub fn contains(&self, t: Hours) -> bool {
        (self.start..=self.end).contains(&t)
    }
}

/// Locate greatest eclipse.
///
/// The time iterates `t ← t − (x·x' + y·y') / (x'² + y'²)` from `t0`, the shadow-axis analogue
/// of the local maximum.
///
/// Return
/// ------
/// * `None` if the iteration does not settle.
pub fn greatest_eclipse(elements: &BesselianElements) -> Option<GreatestEclipse> {
    let mut t = 0.0;
    let mut converged = None;
    for _ in 0..MAX_TIME_ITERATIONS {
        let axis = ShadowAxis::at(elements, t);
        let speed2 = axis.dx * axis.dx + axis.dy * axis.dy;
        if speed2 == 0.0 {
            break;
        }
        let tau = -(axis.x * axis.dx + axis.y * axis.dy) / speed2;
        t += tau;
        if tau.abs() <= TIME_TOLERANCE {
            converged = Some(t);
            break;
        }
    }
    let Some(t) = converged else {
        debug!("greatest eclipse of {} did not converge", elements.date());
        return None;
    };

    let axis = ShadowAxis::at(elements, t);
    let gamma = axis.distance().copysign(axis.y);

    let central = sub_axis_point(elements, &axis).and_then(|point| {
        let site = Site::from_radians(point.longitude, point.latitude, 0.0);
        let sample = GeometricSample::evaluate(elements, &site, t);
        let tangent = TangentPoint {
            site,
            sample,
            saturated: false,
        };
        CentralLinePoint::from_tangent(&tangent).ok()
    });

    Some(GreatestEclipse {
        t,
        tt: elements.epoch_tt(t),
        ut: elements.epoch_ut(t),
        gamma,
        central,
    })
}

/// Solve `x² + y² = radius²` by Newton's method from `seed`.
fn crossing(
    elements: &BesselianElements,
    radius: impl Fn(&ShadowAxis) -> f64,
    seed: Hours,
) -> Option<Hours> {
    let mut t = seed;
    for _ in 0..MAX_TIME_ITERATIONS {
        let axis = ShadowAxis::at(elements, t);
        let r = radius(&axis);
        let g = axis.x * axis.x + axis.y * axis.y - r * r;
        let dg = 2.0 * (axis.x * axis.dx + axis.y * axis.dy);
        if dg == 0.0 {
            return None;
        }
        let step = g / dg;
        t -= step;
        if step.abs() <= TIME_TOLERANCE {
            return Some(t);
        }
    }
    None
}

/// Interval during which part of the shadow touches the Earth.
///
/// Arguments
/// ---------
/// * `elements`: Besselian elements of the eclipse.
/// * `extent`: the axis (radius 1) or the penumbra (radius `1 + L1`).
///
/// Return
/// ------
/// * `None` when the shadow part never reaches the Earth, e.g. the axis of a partial eclipse.
///
/// Details
/// -------
/// The Earth is taken as the unit disk of the fundamental plane, so the times are within a
/// few minutes of the ellipsoidal contacts.
pub fn shadow_window(elements: &BesselianElements, extent: ShadowExtent) -> Option<TimeWindow> {
    let greatest = greatest_eclipse(elements)?;
    let radius = move |axis: &ShadowAxis| match extent {
        ShadowExtent::Axis => 1.0,
        ShadowExtent::Penumbra => 1.0 + axis.l1,
    };

    let at_greatest = ShadowAxis::at(elements, greatest.t);
    if greatest.gamma.abs() >= radius(&at_greatest) {
        return None;
    }

    let start = crossing(elements, radius, greatest.t - WINDOW_SEED_OFFSET)?;
    let end = crossing(elements, radius, greatest.t + WINDOW_SEED_OFFSET)?;
    if !(start < greatest.t && greatest.t < end) {
        debug!("{extent:?} window of {} is inconsistent", elements.date());
        return None;
    }
    Some(TimeWindow { start, end })
}
