//! # Curve tracing parameters
//!
//! [`TraceParams`] controls the longitude sweep of the curve tracers (range, step) and the seed
//! of the first latitude solve. Build it with [`TraceParams::builder`]; the builder validates
//! the values on [`TraceParamsBuilder::build`].
//!
//! ## Example
//!
//! ```rust
//! use eclipse_solver::curves::TraceParams;
//!
//! let params = TraceParams::builder()
//!     .longitude_range(-130.0, -60.0)
//!     .longitude_step(0.5)
//!     .build()
//!     .unwrap();
//! assert_eq!(params.longitudes().count(), 141);
//! ```

use std::cmp::Ordering::{Equal, Greater, Less};

use crate::constants::{Degree, Hours};
use crate::eclipse_errors::EclipseError;
use crate::tangency::Seed;

/// Longitude sweep and seed of a curve trace.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceParams {
    /// First longitude of the sweep, degrees east
    pub longitude_start: Degree,
    /// Last longitude of the sweep (inclusive when reached), degrees east
    pub longitude_end: Degree,
    /// Increment between samples, degrees (> 0)
    pub longitude_step: Degree,
    /// Time seed of the first solve, hours from `t0`
    pub seed_time: Hours,
    /// Latitude seed of the first solve, degrees
    pub seed_latitude: Degree,
}

impl TraceParams {
    pub fn builder() -> TraceParamsBuilder {
        TraceParamsBuilder::new()
    }

    /// Longitudes visited by the sweep, in degrees.
    ///
    /// Empty when the parameters were assembled by hand with a non-positive step or a
    /// reversed range.
    pub fn longitudes(&self) -> LongitudeSweep {
        let span = self.longitude_end - self.longitude_start;
        let count = if self.longitude_step > 0.0 && span >= 0.0 {
            // a small slack keeps the end point despite rounding of the step
            ((span / self.longitude_step + 1e-9).floor() as usize).saturating_add(1)
        } else {
            0
        };
        LongitudeSweep {
            start: self.longitude_start,
            step: self.longitude_step,
            index: 0,
            count,
        }
    }

    /// Seed of the first latitude solve.
    pub fn seed(&self) -> Seed {
        Seed {
            time: self.seed_time,
            latitude: self.seed_latitude.to_radians(),
        }
    }
}

impl Default for TraceParams {
    fn default() -> Self {
        TraceParams {
            longitude_start: -180.0,
            longitude_end: 180.0,
            longitude_step: 1.0,
            seed_time: 0.0,
            seed_latitude: 0.0,
        }
    }
}

/// Evenly spaced longitudes, computed as `start + k·step` to avoid drift.
#[derive(Debug, Clone)]
pub struct LongitudeSweep {
    start: Degree,
    step: Degree,
    index: usize,
    count: usize,
}

impl Iterator for LongitudeSweep {
    type Item = Degree;

    fn next(&mut self) -> Option<Degree> {
        if self.index >= self.count {
            return None;
        }
        let longitude = self.start + self.index as f64 * self.step;
        self.index += 1;
        Some(longitude)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.count - self.index;
        (left, Some(left))
    }
}

impl ExactSizeIterator for LongitudeSweep {}

#[derive(Debug, Clone)]
pub struct TraceParamsBuilder {
    params: TraceParams,
}

impl Default for TraceParamsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TraceParamsBuilder {
    /// Create a new builder initialized with default values (whole globe, 1° step).
    pub fn new() -> Self {
        Self {
            params: TraceParams::default(),
        }
    }

    pub fn longitude_range(mut self, start: Degree, end: Degree) -> Self {
        self.params.longitude_start = start;
        self.params.longitude_end = end;
        self
    }

    pub fn longitude_step(mut self, v: Degree) -> Self {
        self.params.longitude_step = v;
        self
    }

    pub fn seed_time(mut self, v: Hours) -> Self {
        self.params.seed_time = v;
        self
    }

    pub fn seed_latitude(mut self, v: Degree) -> Self {
        self.params.seed_latitude = v;
        self
    }

    #[inline]
    fn gt0(x: f64) -> bool {
        x.partial_cmp(&0.0) == Some(Greater)
    }

    #[inline]
    fn le(a: f64, b: f64) -> bool {
        matches!(a.partial_cmp(&b), Some(Less) | Some(Equal))
    }

    /// Validate and produce the [`TraceParams`].
    ///
    /// Validation rules
    /// -----------------
    /// * `longitude_step > 0`
    /// * `longitude_start ≤ longitude_end`, both finite, at most one turn apart
    /// * `seed_time` finite, `|seed_latitude| ≤ 90`
    pub fn build(self) -> Result<TraceParams, EclipseError> {
        let p = &self.params;

        if !Self::gt0(p.longitude_step) || !p.longitude_step.is_finite() {
            return Err(EclipseError::InvalidTraceParameter(
                "longitude_step must be > 0".into(),
            ));
        }
        if !p.longitude_start.is_finite()
            || !p.longitude_end.is_finite()
            || !Self::le(p.longitude_start, p.longitude_end)
        {
            return Err(EclipseError::InvalidTraceParameter(
                "longitude range must satisfy start <= end".into(),
            ));
        }
        if !Self::le(p.longitude_end - p.longitude_start, 360.0) {
            return Err(EclipseError::InvalidTraceParameter(
                "longitude range must not exceed 360 degrees".into(),
            ));
        }
        if !p.seed_time.is_finite() {
            return Err(EclipseError::InvalidTraceParameter(
                "seed_time must be finite".into(),
            ));
        }
        if !Self::le(p.seed_latitude.abs(), 90.0) {
            return Err(EclipseError::InvalidTraceParameter(
                "seed_latitude must lie in [-90, 90]".into(),
            ));
        }

        Ok(self.params)
    }
}

#[cfg(test)]
mod params_test {
    use super::*;

    #[test]
    fn test_default_sweep() {
        let params = TraceParams::builder().build().unwrap();
        let longitudes: Vec<f64> = params.longitudes().collect();
        assert_eq!(longitudes.len(), 361);
        assert_eq!(longitudes[0], -180.0);
        assert_eq!(longitudes[360], 180.0);
    }

    #[test]
    fn test_fractional_step() {
        let params = TraceParams::builder()
            .longitude_range(0.0, 1.0)
            .longitude_step(0.1)
            .build()
            .unwrap();
        let longitudes: Vec<f64> = params.longitudes().collect();
        assert_eq!(longitudes.len(), 11);
        assert!((longitudes[10] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_unvalidated_params_give_empty_sweep() {
        let zero_step = TraceParams {
            longitude_step: 0.0,
            ..TraceParams::default()
        };
        assert_eq!(zero_step.longitudes().len(), 0);

        let reversed = TraceParams {
            longitude_start: 10.0,
            longitude_end: -10.0,
            ..TraceParams::default()
        };
        assert_eq!(reversed.longitudes().count(), 0);

        let nan_step = TraceParams {
            longitude_step: f64::NAN,
            ..TraceParams::default()
        };
        assert_eq!(nan_step.longitudes().next(), None);
    }

    #[test]
    fn test_invalid_params() {
        let err = TraceParams::builder().longitude_step(0.0).build();
        assert_eq!(
            err,
            Err(EclipseError::InvalidTraceParameter(
                "longitude_step must be > 0".into()
            ))
        );
        assert!(TraceParams::builder()
            .longitude_step(f64::NAN)
            .build()
            .is_err());
        assert!(TraceParams::builder()
            .longitude_range(10.0, -10.0)
            .build()
            .is_err());
        assert!(TraceParams::builder()
            .longitude_range(-180.0, 540.0)
            .build()
            .is_err());
        assert!(TraceParams::builder().seed_latitude(95.0).build().is_err());
    }

    #[test]
    fn test_seed_in_radians() {
        let params = TraceParams::builder()
            .seed_time(0.5)
            .seed_latitude(45.0)
            .build()
            .unwrap();
        let seed = params.seed();
        assert_eq!(seed.time, 0.5);
        assert!((seed.latitude - std::f64::consts::FRAC_PI_4).abs() < 1e-15);
    }
}
