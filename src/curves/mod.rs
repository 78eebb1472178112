//! # Eclipse curves
//!
//! Longitude sweeps producing the curves of an eclipse map:
//!
//! * [`trace_central_line`] – path of the shadow axis, with path width, central duration and
//!   eclipse type at each point,
//! * [`trace_limits`] – northern and southern limits of the penumbra or of the umbra,
//! * [`trace_magnitude_contour`] – curve of equal greatest magnitude.
//!
//! ## Sweep model
//!
//! Each tracer is a lazy [`Trace`] iterator. Longitudes are visited in order; the latitude solve
//! at each longitude is seeded with the last converged point, so a trace is deterministic and
//! sequential. Longitudes where the solve fails are skipped, not reported.
//!
//! The per-longitude work is behind the [`CurveSampler`] trait: one implementation for the
//! central line ([`CentralLine`]) and one for every two-sided limit ([`LimitCurve`]).

pub mod params;

use log::trace;
use serde::Serialize;

use crate::besselian::BesselianElements;
use crate::constants::{Degree, Hours, Kilometer, Radian, Seconds, EARTH_RADIUS_KM};
use crate::tangency::{
    solve_latitude, solve_limit_pair, Branch, GeometricSample, NoSolution, Seed, ShadowEdge,
    TangentPoint,
};
pub use params::{LongitudeSweep, TraceParams, TraceParamsBuilder};

/// Nature of the eclipse on the central line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CentralKind {
    Total,
    Annular,
}

/// One point of the central line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CentralLinePoint {
    pub longitude: Degree,
    pub latitude: Degree,
    /// Time of greatest eclipse at the point, hours from `t0`
    pub time: Hours,
    pub kind: CentralKind,
    /// Width of the path, km
    pub path_width: Kilometer,
    /// Duration of totality or annularity on the line, seconds
    pub duration: Seconds,
    /// Apparent Moon / Sun diameter ratio
    pub diameter_ratio: f64,
    /// Geometric altitude of the Sun, degrees
    pub sun_altitude: Degree,
}

impl CentralLinePoint {
    /// Central-line quantities from the geometry of an observer on the shadow axis.
    ///
    /// Return
    /// ------
    /// * [`NoSolution::DomainInvalid`] when the axis grazes the Earth (no finite width).
    pub fn from_tangent(point: &TangentPoint) -> Result<Self, NoSolution> {
        let s: &GeometricSample = &point.sample;

        let q = s.normal_offset();
        let k = s.zeta.abs() / s.zeta.hypot(q);
        if k.is_nan() || k <= 1e-6 {
            return Err(NoSolution::DomainInvalid("shadow axis grazes the Earth"));
        }

        let umbra = s.l2_prime.abs();
        Ok(CentralLinePoint {
            longitude: point.site.longitude_deg(),
            latitude: point.site.latitude_deg(),
            time: s.t,
            kind: if s.l2_prime < 0.0 {
                CentralKind::Total
            } else {
                CentralKind::Annular
            },
            path_width: 2.0 * EARTH_RADIUS_KM * umbra / k,
            duration: 7200.0 * umbra / s.n,
            diameter_ratio: s.diameter_ratio(),
            sun_altitude: s.altitude(&point.site),
        })
    }
}

/// One longitude of a two-sided limit curve. A side is `None` where its solve failed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LimitPoint {
    pub longitude: Degree,
    pub north: Option<Degree>,
    pub south: Option<Degree>,
    /// Time of greatest eclipse on the northern limit, hours from `t0`
    pub north_time: Option<Hours>,
    /// Time of greatest eclipse on the southern limit, hours from `t0`
    pub south_time: Option<Hours>,
}

// -------------------------------------------------------------------------------------------------
// Sampling strategies
// -------------------------------------------------------------------------------------------------

/// Work done by a [`Trace`] at each longitude.
pub trait CurveSampler {
    type Point;
    /// State carried from one longitude to the next
    type Seed: Clone;

    fn initial_seed(&self, params: &TraceParams) -> Self::Seed;

    /// Solve at `longitude` (radians). On failure, return `None` and the unchanged seed.
    fn sample(
        &self,
        elements: &BesselianElements,
        longitude: Radian,
        seed: &Self::Seed,
    ) -> (Option<Self::Point>, Self::Seed);
}

/// Central line sampler.
#[derive(Debug, Clone, Copy, Default)]
pub struct CentralLine;

impl CurveSampler for CentralLine {
    type Point = CentralLinePoint;
    type Seed = Seed;

    fn initial_seed(&self, params: &TraceParams) -> Seed {
        params.seed()
    }

    fn sample(
        &self,
        elements: &BesselianElements,
        longitude: Radian,
        seed: &Seed,
    ) -> (Option<CentralLinePoint>, Seed) {
        let solved = solve_latitude(elements, longitude, Branch::Central, ShadowEdge::Axis, *seed)
            .and_then(|p| CentralLinePoint::from_tangent(&p).map(|c| (c, p.as_seed())));
        match solved {
            Ok((point, next)) => (Some(point), next),
            Err(err) => {
                trace!("central line skipped at {:.3}°: {err}", longitude.to_degrees());
                (None, *seed)
            }
        }
    }
}

/// Two-sided limit sampler for a shadow edge.
#[derive(Debug, Clone, Copy)]
pub struct LimitCurve {
    pub edge: ShadowEdge,
}

/// Seeds of the northern and southern branches.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LimitSeeds {
    pub north: Seed,
    pub south: Seed,
}

impl CurveSampler for LimitCurve {
    type Point = LimitPoint;
    type Seed = LimitSeeds;

    fn initial_seed(&self, params: &TraceParams) -> LimitSeeds {
        LimitSeeds {
            north: params.seed(),
            south: params.seed(),
        }
    }

    fn sample(
        &self,
        elements: &BesselianElements,
        longitude: Radian,
        seed: &LimitSeeds,
    ) -> (Option<LimitPoint>, LimitSeeds) {
        let Some(pair) = solve_limit_pair(elements, longitude, self.edge, seed.north, seed.south)
        else {
            trace!("{:?} limit skipped at {:.3}°", self.edge, longitude.to_degrees());
            return (None, *seed);
        };

        let next = LimitSeeds {
            north: pair.north.map_or(seed.north, |p| p.as_seed()),
            south: pair.south.map_or(seed.south, |p| p.as_seed()),
        };
        let point = LimitPoint {
            longitude: longitude.to_degrees(),
            north: pair.north.map(|p| p.latitude_deg()),
            south: pair.south.map(|p| p.latitude_deg()),
            north_time: pair.north.map(|p| p.sample.t),
            south_time: pair.south.map(|p| p.sample.t),
        };
        (Some(point), next)
    }
}

// -------------------------------------------------------------------------------------------------
// Trace iterator
// -------------------------------------------------------------------------------------------------

/// Lazy longitude sweep of a [`CurveSampler`].
pub struct Trace<'a, S: CurveSampler> {
    elements: &'a BesselianElements,
    sampler: S,
    longitudes: LongitudeSweep,
    seed: S::Seed,
}

impl<'a, S: CurveSampler> Trace<'a, S> {
    pub fn new(elements: &'a BesselianElements, sampler: S, params: &TraceParams) -> Self {
        Trace {
            elements,
            seed: sampler.initial_seed(params),
            sampler,
            longitudes: params.longitudes(),
        }
    }
}

impl<S: CurveSampler> Iterator for Trace<'_, S> {
    type Item = S::Point;

    fn next(&mut self) -> Option<S::Point> {
        for longitude in self.longitudes.by_ref() {
            let (point, seed) = self
                .sampler
                .sample(self.elements, longitude.to_radians(), &self.seed);
            self.seed = seed;
            if point.is_some() {
                return point;
            }
        }
        None
    }
}

/// Trace the central line over the longitude sweep of `params`.
///
/// Arguments
/// ---------
/// * `elements`: Besselian elements of the eclipse.
/// * `params`: longitude sweep and initial seed.
///
/// Return
/// ------
/// * An iterator over the central-line points, in sweep order; longitudes without a solution
///   (axis off the Earth, Sun below the horizon) are skipped.
pub fn trace_central_line<'a>(
    elements: &'a BesselianElements,
    params: &TraceParams,
) -> Trace<'a, CentralLine> {
    Trace::new(elements, CentralLine, params)
}

/// Trace the northern and southern limits of a shadow edge.
///
/// `edge` is typically [`ShadowEdge::Penumbra`] (limits of the partial eclipse) or
/// [`ShadowEdge::Umbra`] (limits of the path of totality or annularity).
pub fn trace_limits<'a>(
    elements: &'a BesselianElements,
    edge: ShadowEdge,
    params: &TraceParams,
) -> Trace<'a, LimitCurve> {
    Trace::new(elements, LimitCurve { edge }, params)
}

/// Trace the curve where the greatest eclipse reaches `magnitude`, on both sides of the path.
pub fn trace_magnitude_contour<'a>(
    elements: &'a BesselianElements,
    magnitude: f64,
    params: &TraceParams,
) -> Trace<'a, LimitCurve> {
    trace_limits(elements, ShadowEdge::Magnitude(magnitude), params)
}

#[cfg(test)]
mod curves_test {
    use super::*;
    use crate::unit_test_global::SYNTHETIC_CENTRAL;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_central_line_on_equator() {
        let elements = &*SYNTHETIC_CENTRAL;
        let params = TraceParams::builder()
            .longitude_range(-20.0, 20.0)
            .longitude_step(5.0)
            .build()
            .unwrap();
        let points: Vec<_> = trace_central_line(elements, &params).collect();
        assert_eq!(points.len(), 9);
        for p in &points {
            assert_abs_diff_eq!(p.latitude, 0.0, epsilon = 1e-3);
            assert_eq!(p.kind, CentralKind::Total);
            assert!(p.path_width > 50.0 && p.path_width < 150.0);
            assert!(p.duration > 0.0);
        }
        // the shadow moves east
        assert!(points[0].time < points[8].time);
    }

    #[test]
    fn test_central_line_at_sub_axis() {
        let elements = &*SYNTHETIC_CENTRAL;
        let params = TraceParams::builder()
            .longitude_range(0.0, 0.0)
            .build()
            .unwrap();
        let p = trace_central_line(elements, &params).next().unwrap();

        // zeta = 1, q = 0 at the sub-axis point: width = 2 R |L2'|
        let l2p: f64 = 0.004 + 0.00459;
        assert_abs_diff_eq!(p.path_width, 2.0 * EARTH_RADIUS_KM * l2p, epsilon = 1e-3);
        let n = 0.55 - 15f64.to_radians();
        assert_abs_diff_eq!(p.duration, 7200.0 * l2p / n, epsilon = 1e-3);
        assert_abs_diff_eq!(p.sun_altitude, 90.0, epsilon = 1e-3);
    }

    #[test]
    fn test_limits_contain_central_line() {
        let elements = &*SYNTHETIC_CENTRAL;
        let params = TraceParams::builder()
            .longitude_range(-10.0, 10.0)
            .longitude_step(10.0)
            .build()
            .unwrap();
        for p in trace_limits(elements, ShadowEdge::Umbra, &params) {
            let (n, s) = (p.north.unwrap(), p.south.unwrap());
            assert!(n > 0.0 && s < 0.0);
            assert!(n < 1.0);
        }
    }
}
