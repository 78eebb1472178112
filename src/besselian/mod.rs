//! # Besselian elements of a solar eclipse
//!
//! This module defines [`BesselianElements`], the frozen polynomial description of the Moon's
//! shadow cone for one solar eclipse, and the [`catalog`] used to look an element set up by
//! calendar date.
//!
//! ## Content of an element set
//!
//! | Symbol | Degree | Unit | Meaning |
//! |--------|--------|------|---------|
//! | `x`, `y` | 3 | Earth radii | shadow axis in the fundamental plane |
//! | `d` | 2 | degrees | declination of the shadow axis |
//! | `mu` | 1 | degrees | Greenwich hour angle of the shadow axis |
//! | `l1`, `l2` | 2 | Earth radii | penumbral / umbral radius in the fundamental plane |
//! | `tan_f1`, `tan_f2` | – | – | tangent of the penumbral / umbral cone half-angle |
//!
//! Every polynomial is evaluated at `t = T − t0` hours (TT), see
//! [`ShadowAxis::at`](crate::shadow_axis::ShadowAxis::at).
//!
//! A negative `l2` means the umbral vertex lies beyond the fundamental plane: the eclipse is
//! total where the axis meets the Earth. A positive `l2` gives an annular path.
//!
//! ## Invariants
//!
//! [`BesselianElements::new`] rejects non-finite coefficients and non-positive `tan_f1`.
//! Once built, an element set is never mutated.

pub mod catalog;

use hifitime::Epoch;
use serde::Serialize;

use crate::constants::{EarthRadii, Hours, Seconds};
use crate::eclipse_errors::EclipseError;
use crate::time::{tt_to_ut, CalendarDate};

/// Polynomial coefficients of a Besselian element set, lowest degree first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BesselianCoefficients {
    /// X(t), Earth radii
    pub x: [f64; 4],
    /// Y(t), Earth radii
    pub y: [f64; 4],
    /// D(t), degrees
    pub d: [f64; 3],
    /// L1(t), Earth radii
    pub l1: [f64; 3],
    /// L2(t), Earth radii
    pub l2: [f64; 3],
    /// M(t) (μ), degrees
    pub mu: [f64; 2],
    /// tan f1 (penumbral cone)
    pub tan_f1: f64,
    /// tan f2 (umbral cone)
    pub tan_f2: f64,
}

/// Besselian elements for one solar eclipse.
///
/// Fields are private: an element set is validated once by [`BesselianElements::new`] and then
/// only read.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BesselianElements {
    date: CalendarDate,
    t0: Hours,
    delta_t: Seconds,
    gamma: EarthRadii,
    coefficients: BesselianCoefficients,
}

impl BesselianElements {
    /// Validate and freeze an element set.
    ///
    /// Arguments
    /// ---------
    /// * `date`: calendar date (TT) the elements belong to.
    /// * `t0`: reference epoch, hours TT on `date`.
    /// * `delta_t`: ΔT = TT − UT1 in seconds for the event.
    /// * `gamma`: least distance of the shadow axis from the Earth's centre (Earth radii),
    ///   signed like Y at greatest eclipse.
    /// * `coefficients`: the polynomial coefficients.
    ///
    /// Return
    /// ------
    /// * The element set, or [`EclipseError::InvalidBesselianElements`] if a value is not finite
    ///   or `tan_f1 ≤ 0`.
    pub fn new(
        date: CalendarDate,
        t0: Hours,
        delta_t: Seconds,
        gamma: EarthRadii,
        coefficients: BesselianCoefficients,
    ) -> Result<Self, EclipseError> {
        let families: [(&str, &[f64]); 6] = [
            ("x", &coefficients.x),
            ("y", &coefficients.y),
            ("d", &coefficients.d),
            ("l1", &coefficients.l1),
            ("l2", &coefficients.l2),
            ("mu", &coefficients.mu),
        ];
        for (name, values) in families {
            if let Some(bad) = values.iter().position(|c| !c.is_finite()) {
                return Err(EclipseError::InvalidBesselianElements(format!(
                    "{date}: coefficient {name}{bad} is not finite"
                )));
            }
        }

        let scalars = [
            ("t0", t0),
            ("delta_t", delta_t),
            ("gamma", gamma),
            ("tan_f1", coefficients.tan_f1),
            ("tan_f2", coefficients.tan_f2),
        ];
        for (name, value) in scalars {
            if !value.is_finite() {
                return Err(EclipseError::InvalidBesselianElements(format!(
                    "{date}: {name} is not finite"
                )));
            }
        }

        if coefficients.tan_f1 <= 0.0 {
            return Err(EclipseError::InvalidBesselianElements(format!(
                "{date}: tan_f1 must be > 0 (got {})",
                coefficients.tan_f1
            )));
        }

        Ok(BesselianElements {
            date,
            t0,
            delta_t,
            gamma,
            coefficients,
        })
    }

    pub fn date(&self) -> CalendarDate {
        self.date
    }

    pub fn t0(&self) -> Hours {
        self.t0
    }

    pub fn delta_t(&self) -> Seconds {
        self.delta_t
    }

    pub fn gamma(&self) -> EarthRadii {
        self.gamma
    }

    pub fn coefficients(&self) -> &BesselianCoefficients {
        &self.coefficients
    }

    pub fn tan_f1(&self) -> f64 {
        self.coefficients.tan_f1
    }

    pub fn tan_f2(&self) -> f64 {
        self.coefficients.tan_f2
    }

    /// TT epoch of the time offset `t` (hours from `t0`).
    pub fn epoch_tt(&self, t: Hours) -> Epoch {
        self.date.epoch_tt(self.t0 + t)
    }

    /// UT epoch of the time offset `t` (hours from `t0`), using the event's ΔT.
    pub fn epoch_ut(&self, t: Hours) -> Epoch {
        tt_to_ut(&self.epoch_tt(t), self.delta_t)
    }

    /// Universal time of day, in hours, of the time offset `t`.
    ///
    /// May fall outside `[0, 24)` when the offset crosses midnight.
    pub fn ut_hours(&self, t: Hours) -> Hours {
        self.t0 + t - self.delta_t / 3600.0
    }
}
