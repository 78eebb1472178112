//! # Tangency solver
//!
//! Fixed-point iterations locating the instant and the place where an observer touches a given
//! shadow edge.
//!
//! ## Overview
//!
//! * [`solve_time`] – for a fixed site, find the time of greatest eclipse or of a contact.
//! * [`solve_latitude`] – for a fixed longitude, find the latitude whose greatest-eclipse
//!   geometry puts the observer on a shadow edge (central line, limits, iso-magnitude curve).
//! * [`solve_limit_pair`] – both sides of a limit at one longitude, with the pole-saturation
//!   guard applied.
//!
//! Both iterations are plain fixed points on the fundamental-plane geometry of
//! [`GeometricSample`]: the time step is the along-track correction `τ`, the latitude step is
//! the cross-track residual divided by its latitude derivative, clamped to
//! [`MAX_LATITUDE_STEP`].
//!
//! ## Failures
//!
//! A failed solve is a normal outcome (the edge does not exist at that longitude, or is on the
//! night side). It is returned as a [`NoSolution`] and logged at `debug` level; callers
//! building curves simply skip the point.

pub mod sample;

use std::fmt;

use log::{debug, trace};

use crate::besselian::BesselianElements;
use crate::constants::{
    Degree, EarthRadii, Hours, Radian, FALLBACK_SEED_LATITUDES, LATITUDE_TOLERANCE,
    MAX_LATITUDE_ITERATIONS, MAX_LATITUDE_STEP, MAX_SATURATED_SPREAD_DEG, MAX_TIME_ITERATIONS,
    REFRACTION_FLOOR, TIME_TOLERANCE,
};
use crate::site::Site;
pub use sample::GeometricSample;

/// Smallest relative shadow speed (Earth radii per hour) the solver divides by.
const MIN_RELATIVE_SPEED: f64 = 1e-9;

/// Why a tangency solve produced no point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NoSolution {
    /// The iteration cap was reached before the step fell under tolerance.
    NonConvergence { iterations: usize },
    /// The geometry has no real solution (e.g. `|S| > 1` for a contact, a negative edge offset).
    DomainInvalid(&'static str),
    /// The point exists but the Sun is below the refraction-limited horizon there.
    BelowHorizon,
}

impl fmt::Display for NoSolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoSolution::NonConvergence { iterations } => {
                write!(f, "no convergence after {iterations} iterations")
            }
            NoSolution::DomainInvalid(reason) => write!(f, "outside the domain: {reason}"),
            NoSolution::BelowHorizon => write!(f, "Sun below the horizon"),
        }
    }
}

// -------------------------------------------------------------------------------------------------
// Time axis
// -------------------------------------------------------------------------------------------------

/// Order of a contact within its pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactSide {
    /// Before the maximum (first or second contact)
    Ingress,
    /// After the maximum (third or last contact)
    Egress,
}

impl ContactSide {
    fn sign(self) -> f64 {
        match self {
            ContactSide::Ingress => -1.0,
            ContactSide::Egress => 1.0,
        }
    }
}

/// Cone whose rim defines a contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactCone {
    /// External contacts C1 / C4
    Penumbra,
    /// Internal contacts C2 / C3
    Umbra,
}

/// What the time iteration converges to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeObjective {
    /// Instant of least distance to the shadow axis
    Maximum,
    /// Instant the observer crosses a cone rim
    Contact { side: ContactSide, cone: ContactCone },
}

impl TimeObjective {
    /// Time correction `τ` from the geometry at the current iterate.
    fn correction(&self, s: &GeometricSample) -> Result<Hours, NoSolution> {
        let n2 = s.n * s.n;
        if s.n < MIN_RELATIVE_SPEED {
            return Err(NoSolution::DomainInvalid("relative shadow motion vanishes"));
        }
        let tau = -(s.u * s.a + s.v * s.b) / n2;

        match self {
            TimeObjective::Maximum => Ok(tau),
            TimeObjective::Contact { side, cone } => {
                let radius = match cone {
                    ContactCone::Penumbra => s.l1_prime,
                    ContactCone::Umbra => s.l2_prime.abs(),
                };
                if radius <= 0.0 {
                    return Err(NoSolution::DomainInvalid("shadow cone radius vanishes"));
                }
                let sin_q = (s.a * s.v - s.u * s.b) / (s.n * radius);
                if sin_q.abs() > 1.0 {
                    return Err(NoSolution::DomainInvalid("|S| > 1, cone rim never reached"));
                }
                Ok(tau + side.sign() * radius * (1.0 - sin_q * sin_q).sqrt() / s.n)
            }
        }
    }
}

/// Iterate the time of an event at a fixed site.
///
/// Arguments
/// ---------
/// * `elements`: Besselian elements of the eclipse.
/// * `site`: the observer.
/// * `objective`: greatest eclipse or one of the contacts.
/// * `t_seed`: starting time offset from `t0`, hours.
///
/// Return
/// ------
/// * The geometry at the converged instant.
/// * [`NoSolution::DomainInvalid`] when a contact does not exist for this site.
/// * [`NoSolution::NonConvergence`] after [`MAX_TIME_ITERATIONS`] steps.
///
/// Details
/// -------
/// The step is `τ = −(u·a + v·b) / n²`, plus `±L·√(1 − S²) / n` for contacts, with
/// `S = (a·v − u·b) / (n·L)` re-evaluated at every iterate. Convergence is `|τ| ≤ 1e-6 h`.
pub fn solve_time(
    elements: &BesselianElements,
    site: &Site,
    objective: TimeObjective,
    t_seed: Hours,
) -> Result<GeometricSample, NoSolution> {
    let mut t = t_seed;
    for _ in 0..MAX_TIME_ITERATIONS {
        let sample = GeometricSample::evaluate(elements, site, t);
        let tau = objective.correction(&sample)?;
        if !tau.is_finite() {
            return Err(NoSolution::DomainInvalid("non-finite time step"));
        }
        t += tau;
        if tau.abs() <= TIME_TOLERANCE {
            return Ok(GeometricSample::evaluate(elements, site, t));
        }
    }
    Err(NoSolution::NonConvergence {
        iterations: MAX_TIME_ITERATIONS,
    })
}

// -------------------------------------------------------------------------------------------------
// Latitude axis
// -------------------------------------------------------------------------------------------------

/// Side of the shadow axis a latitude solve aims at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Branch {
    South,
    Central,
    North,
}

impl Branch {
    /// Direction flag `I ∈ {−1, 0, +1}` of the cross-track target.
    pub fn direction(self) -> f64 {
        match self {
            Branch::South => -1.0,
            Branch::Central => 0.0,
            Branch::North => 1.0,
        }
    }
}

/// Shadow contour traced by a latitude solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShadowEdge {
    /// The shadow axis itself (central line)
    Axis,
    /// Outer rim of the penumbra (magnitude 0)
    Penumbra,
    /// Rim of the umbra or antumbra (path limits)
    Umbra,
    /// Curve of equal greatest magnitude `G`
    Magnitude(f64),
}

impl ShadowEdge {
    /// Cross-track offset `E` of the edge from the axis in the observer's plane.
    pub fn offset(&self, s: &GeometricSample) -> Result<EarthRadii, NoSolution> {
        match *self {
            ShadowEdge::Axis => Ok(0.0),
            ShadowEdge::Penumbra => Ok(s.l1_prime),
            ShadowEdge::Umbra => Ok(s.l2_prime.abs()),
            ShadowEdge::Magnitude(g) => {
                let e = s.l1_prime - g * (s.l1_prime + s.l2_prime);
                if e < 0.0 {
                    Err(NoSolution::DomainInvalid("magnitude beyond the shadow centre"))
                } else {
                    Ok(e)
                }
            }
        }
    }
}

/// Starting point of a latitude solve.
///
/// Solvers sweeping a curve carry the last converged point forward as the next seed.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Seed {
    /// Time offset from `t0`, hours
    pub time: Hours,
    /// Latitude, radians
    pub latitude: Radian,
}

/// A converged latitude solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TangentPoint {
    /// Site at the converged latitude (clamped to `[-π/2, π/2]`)
    pub site: Site,
    /// Geometry at greatest eclipse for that site
    pub sample: GeometricSample,
    /// The raw iterate left `[-π/2, π/2]` and was clamped to a pole
    pub saturated: bool,
}

impl TangentPoint {
    pub fn latitude_deg(&self) -> Degree {
        self.site.latitude.to_degrees()
    }

    /// Seed for the next solve of a sweep.
    pub fn as_seed(&self) -> Seed {
        Seed {
            time: self.sample.t,
            latitude: self.site.latitude,
        }
    }
}

fn iterate_latitude(
    elements: &BesselianElements,
    longitude: Radian,
    branch: Branch,
    edge: ShadowEdge,
    time_seed: Hours,
    latitude_seed: Radian,
) -> Result<(Radian, GeometricSample), NoSolution> {
    let mut latitude = latitude_seed;
    let mut t = time_seed;

    for iteration in 0..MAX_LATITUDE_ITERATIONS {
        let site = Site::from_radians(longitude, latitude, 0.0);
        let sample = solve_time(elements, &site, TimeObjective::Maximum, t)?;
        t = sample.t;

        let target = branch.direction() * edge.offset(&sample)?;
        let slope = sample.cross_track_sensitivity(&site);
        if slope.abs() < MIN_RELATIVE_SPEED {
            return Err(NoSolution::DomainInvalid(
                "cross-track distance insensitive to latitude",
            ));
        }

        let step = (-(sample.cross_track() - target) / slope)
            .clamp(-MAX_LATITUDE_STEP, MAX_LATITUDE_STEP);
        latitude += step;
        trace!(
            "latitude iteration {iteration}: lat={:.6}° t={t:.6} h step={step:.3e}",
            latitude.to_degrees()
        );

        if step.abs() <= LATITUDE_TOLERANCE {
            let site = Site::from_radians(longitude, latitude, 0.0);
            let sample = solve_time(elements, &site, TimeObjective::Maximum, t)?;
            return Ok((latitude, sample));
        }
    }

    Err(NoSolution::NonConvergence {
        iterations: MAX_LATITUDE_ITERATIONS,
    })
}

/// Find the latitude, at a fixed longitude, where greatest eclipse puts the observer on a
/// shadow edge.
///
/// Arguments
/// ---------
/// * `elements`: Besselian elements of the eclipse.
/// * `longitude`: east longitude, radians.
/// * `branch`: north or south side of the axis (`Central` for the axis itself).
/// * `edge`: the contour to reach.
/// * `seed`: starting time and latitude, typically the previous point of the curve.
///
/// Return
/// ------
/// * The tangent point, its latitude clamped to the poles.
/// * [`NoSolution::BelowHorizon`] if the converged point has the Sun below −34′.
/// * A domain failure or a time-axis non-convergence as soon as it occurs.
/// * Otherwise the latitude non-convergence of the last seed tried.
///
/// Details
/// -------
/// The iteration is started from `seed`, then restarted from +80° and −80° only when the
/// latitude loop runs out of its 50 steps. The time seed is kept for every restart.
pub fn solve_latitude(
    elements: &BesselianElements,
    longitude: Radian,
    branch: Branch,
    edge: ShadowEdge,
    seed: Seed,
) -> Result<TangentPoint, NoSolution> {
    let seeds = std::iter::once(seed.latitude).chain(FALLBACK_SEED_LATITUDES);

    let mut failure = NoSolution::NonConvergence {
        iterations: MAX_LATITUDE_ITERATIONS,
    };
    for latitude_seed in seeds {
        match iterate_latitude(elements, longitude, branch, edge, seed.time, latitude_seed) {
            Ok((latitude, sample)) => {
                let saturated = latitude.abs() > std::f64::consts::FRAC_PI_2;
                let clamped =
                    latitude.clamp(-std::f64::consts::FRAC_PI_2, std::f64::consts::FRAC_PI_2);
                let site = Site::from_radians(longitude, clamped, 0.0);

                if sample.sin_altitude(&site) < REFRACTION_FLOOR.sin() {
                    debug!(
                        "{branch:?}/{edge:?} at {:.3}°: point below the horizon",
                        longitude.to_degrees()
                    );
                    return Err(NoSolution::BelowHorizon);
                }

                return Ok(TangentPoint {
                    site,
                    sample,
                    saturated,
                });
            }
            Err(
                err @ NoSolution::NonConvergence {
                    iterations: MAX_LATITUDE_ITERATIONS,
                },
            ) => {
                debug!(
                    "{branch:?}/{edge:?} at {:.3}° from seed {:.1}°: {err}",
                    longitude.to_degrees(),
                    latitude_seed.to_degrees()
                );
                failure = err;
            }
            Err(err) => return Err(err),
        }
    }
    Err(failure)
}

// -------------------------------------------------------------------------------------------------
// Limit pairs
// -------------------------------------------------------------------------------------------------

/// North and south latitudes of a limit curve at one longitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LimitPair {
    pub north: Option<TangentPoint>,
    pub south: Option<TangentPoint>,
}

/// Solve both sides of a limit at one longitude.
///
/// Arguments
/// ---------
/// * `elements`: Besselian elements of the eclipse.
/// * `longitude`: east longitude, radians.
/// * `edge`: the limit contour (penumbral, umbral or iso-magnitude).
/// * `north_seed`, `south_seed`: seeds for each side.
///
/// Return
/// ------
/// * `None` ("no limit") when both sides failed, when both sides saturated at a pole, or when
///   exactly one saturated and the two latitudes are more than
///   [`MAX_SATURATED_SPREAD_DEG`] apart.
pub fn solve_limit_pair(
    elements: &BesselianElements,
    longitude: Radian,
    edge: ShadowEdge,
    north_seed: Seed,
    south_seed: Seed,
) -> Option<LimitPair> {
    let north = solve_latitude(elements, longitude, Branch::North, edge, north_seed).ok();
    let south = solve_latitude(elements, longitude, Branch::South, edge, south_seed).ok();

    match (north, south) {
        (None, None) => None,
        (Some(n), Some(s)) => {
            let spread = (n.latitude_deg() - s.latitude_deg()).abs();
            let degenerate = match (n.saturated, s.saturated) {
                (true, true) => true,
                (true, false) | (false, true) => spread > MAX_SATURATED_SPREAD_DEG,
                (false, false) => false,
            };
            if degenerate {
                debug!(
                    "{edge:?} at {:.3}°: saturated limit pair discarded (spread {spread:.2}°)",
                    longitude.to_degrees()
                );
                None
            } else {
                Some(LimitPair {
                    north: Some(n),
                    south: Some(s),
                })
            }
        }
        (north, south) => Some(LimitPair { north, south }),
    }
}

#[cfg(test)]
mod tangency_test {
    use super::*;
    use crate::unit_test_global::{ECLIPSE_2017, SYNTHETIC_CENTRAL};
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_maximum_on_axis() {
        let elements = &*SYNTHETIC_CENTRAL;
        let site = Site::from_radians(0.0, 0.0, 0.0);
        let s = solve_time(elements, &site, TimeObjective::Maximum, 0.5).unwrap();
        assert_abs_diff_eq!(s.t, 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(s.miss_distance(), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_contacts_bracket_maximum() {
        let elements = &*SYNTHETIC_CENTRAL;
        let site = Site::from_radians(0.0, 20f64.to_radians(), 0.0);
        let max = solve_time(elements, &site, TimeObjective::Maximum, 0.0).unwrap();

        let first = TimeObjective::Contact {
            side: ContactSide::Ingress,
            cone: ContactCone::Penumbra,
        };
        let last = TimeObjective::Contact {
            side: ContactSide::Egress,
            cone: ContactCone::Penumbra,
        };
        let c1 = solve_time(elements, &site, first, max.t).unwrap();
        let c4 = solve_time(elements, &site, last, max.t).unwrap();

        assert!(c1.t < max.t && max.t < c4.t);
        // at a contact the observer sits on the penumbral rim
        assert_abs_diff_eq!(c1.miss_distance(), c1.l1_prime, epsilon = 1e-5);
        assert_abs_diff_eq!(c4.miss_distance(), c4.l1_prime, epsilon = 1e-5);
    }

    #[test]
    fn test_umbral_contact_outside_path() {
        let elements = &*SYNTHETIC_CENTRAL;
        let site = Site::from_radians(0.0, 20f64.to_radians(), 0.0);
        let second = TimeObjective::Contact {
            side: ContactSide::Ingress,
            cone: ContactCone::Umbra,
        };
        assert!(matches!(
            solve_time(elements, &site, second, 0.0),
            Err(NoSolution::DomainInvalid(_))
        ));
    }

    #[test]
    fn test_central_latitude() {
        let elements = &*SYNTHETIC_CENTRAL;
        let point =
            solve_latitude(elements, 0.0, Branch::Central, ShadowEdge::Axis, Seed::default())
                .unwrap();
        assert_abs_diff_eq!(point.latitude_deg(), 0.0, epsilon = 1e-4);
        assert_abs_diff_eq!(point.sample.cross_track(), 0.0, epsilon = 1e-6);
        assert!(!point.saturated);
    }

    #[test]
    fn test_limits_are_antisymmetric() {
        let elements = &*SYNTHETIC_CENTRAL;
        let pair = solve_limit_pair(
            elements,
            0.0,
            ShadowEdge::Penumbra,
            Seed::default(),
            Seed::default(),
        )
        .unwrap();
        let north = pair.north.unwrap().latitude_deg();
        let south = pair.south.unwrap().latitude_deg();
        assert!(north > 25.0 && north < 40.0);
        assert_abs_diff_eq!(north, -south, epsilon = 1e-3);
    }

    #[test]
    fn test_negative_edge_offset() {
        let elements = &*SYNTHETIC_CENTRAL;
        let site = Site::from_radians(0.0, 0.0, 0.0);
        let s = GeometricSample::evaluate(elements, &site, 0.0);
        assert!(matches!(
            ShadowEdge::Magnitude(1.5).offset(&s),
            Err(NoSolution::DomainInvalid(_))
        ));
        assert_abs_diff_eq!(ShadowEdge::Magnitude(0.0).offset(&s).unwrap(), s.l1_prime);
        assert_abs_diff_eq!(ShadowEdge::Umbra.offset(&s).unwrap(), -s.l2_prime);
    }

    #[test]
    fn test_domain_failure_is_not_retried() {
        let elements = &*SYNTHETIC_CENTRAL;
        let result = solve_latitude(
            elements,
            0.0,
            Branch::North,
            ShadowEdge::Magnitude(1.5),
            Seed::default(),
        );
        assert!(matches!(result, Err(NoSolution::DomainInvalid(_))));
    }

    #[test]
    fn test_latitude_cap_after_fallback_seeds() {
        let elements = &*ECLIPSE_2017;
        let result = solve_latitude(
            elements,
            (-60f64).to_radians(),
            Branch::North,
            ShadowEdge::Penumbra,
            Seed::default(),
        );
        assert_eq!(
            result,
            Err(NoSolution::NonConvergence {
                iterations: MAX_LATITUDE_ITERATIONS
            })
        );
    }
}
