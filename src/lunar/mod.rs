//! # Lunar eclipses
//!
//! Classification and circumstances of a lunar eclipse from two ephemeris samples one hour
//! apart, in the classical (Chauvenet) linear-motion model.
//!
//! ## Model
//!
//! The Moon is followed relative to the centre of the Earth's shadow (the anti-Sun direction).
//! Over the few hours of an eclipse both motions are taken as linear, so the Moon's path across
//! the shadow is a straight line and every phase is a chord of a circle around the shadow
//! centre:
//!
//! * penumbral radius `P = (50.9 / 50) (π☾ + π☉ + s☉)`,
//! * umbral radius `S = (50.9 / 50) (π☾ + π☉ − s☉)`,
//!
//! the factor `50.9 / 50 ≈ 1.018` enlarging the shadow for the Earth's atmosphere. Phases
//! begin when the distance of the Moon's centre from the shadow axis drops below `P + s☾`
//! (penumbral), `S + s☾` (partial) and `S − s☾` (total).
//!
//! ## Precision
//!
//! Accuracy follows the ephemeris; with [`LowPrecisionEphemeris`] the times are good to a few
//! minutes and the magnitudes to a few hundredths.

pub mod ephemeris;

use hifitime::{Duration, Epoch};
use log::debug;

use crate::constants::{Hours, Radian, CHAUVENET_ENLARGEMENT, SECONDS_PER_HOUR};
use crate::eclipse_errors::EclipseError;
use crate::frames::normalize_angle;
pub use ephemeris::{ApparentPosition, Ephemeris, LowPrecisionEphemeris};

/// Beyond this distance (hours) from the epoch, the opposition is re-sampled once.
const RESAMPLE_THRESHOLD: Hours = 1.0;

/// Type of a lunar eclipse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LunarEclipseType {
    None,
    Penumbral,
    Partial,
    Total,
}

/// Begin and end of an eclipse phase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseWindow {
    pub start: Epoch,
    pub end: Epoch,
}

impl PhaseWindow {
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

/// The deepest phase of a lunar eclipse.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LunarPhase {
    pub kind: LunarEclipseType,
    pub window: PhaseWindow,
    pub magnitude: f64,
}

/// Circumstances of a lunar eclipse.
#[derive(Debug, Clone, PartialEq)]
pub struct LunarEclipse {
    pub kind: LunarEclipseType,
    /// Umbral magnitude for partial and total eclipses, penumbral magnitude otherwise
    pub magnitude: f64,
    pub umbral_magnitude: f64,
    pub penumbral_magnitude: f64,
    /// Instant of opposition in right ascension
    pub opposition: Epoch,
    /// Instant of least distance between the Moon and the shadow axis
    pub greatest: Epoch,
    /// Least distance of the Moon's centre from the shadow axis, radians
    pub miss_distance: Radian,
    pub penumbral_radius: Radian,
    pub umbral_radius: Radian,
    pub moon_semidiameter: Radian,
    pub penumbral: Option<PhaseWindow>,
    pub partial: Option<PhaseWindow>,
    pub total: Option<PhaseWindow>,
}

impl LunarEclipse {
    /// Window and magnitude of the deepest phase, `None` when there is no eclipse.
    pub fn deepest_phase(&self) -> Option<LunarPhase> {
        let window = match self.kind {
            LunarEclipseType::None => None,
            LunarEclipseType::Penumbral => self.penumbral,
            LunarEclipseType::Partial => self.partial,
            LunarEclipseType::Total => self.total,
        }?;
        Some(LunarPhase {
            kind: self.kind,
            window,
            magnitude: self.magnitude,
        })
    }
}

/// Classify a lunar eclipse.
///
/// Arguments
/// ---------
/// * `miss_distance`: least distance `D` of the Moon's centre from the shadow axis.
/// * `umbral_radius`, `penumbral_radius`: `S` and `P`.
/// * `moon_semidiameter`: `s☾`.
///
/// All four in the same angular unit.
pub fn classify(
    miss_distance: f64,
    umbral_radius: f64,
    penumbral_radius: f64,
    moon_semidiameter: f64,
) -> LunarEclipseType {
    if miss_distance <= umbral_radius - moon_semidiameter {
        LunarEclipseType::Total
    } else if miss_distance < umbral_radius + moon_semidiameter {
        LunarEclipseType::Partial
    } else if miss_distance < penumbral_radius + moon_semidiameter {
        LunarEclipseType::Penumbral
    } else {
        LunarEclipseType::None
    }
}

/// Sun and Moon at an epoch and one hour later.
struct HourlyPair {
    epoch: Epoch,
    sun: [ApparentPosition; 2],
    moon: [ApparentPosition; 2],
}

impl HourlyPair {
    fn sample<E: Ephemeris + ?Sized>(ephemeris: &E, epoch: Epoch) -> Result<Self, EclipseError> {
        let next = epoch + Duration::from_seconds(SECONDS_PER_HOUR);
        Ok(HourlyPair {
            epoch,
            sun: [ephemeris.sun(&epoch)?, ephemeris.sun(&next)?],
            moon: [ephemeris.moon(&epoch)?, ephemeris.moon(&next)?],
        })
    }

    /// Hourly gain of the Moon on the Sun in right ascension.
    fn ra_rate(&self) -> f64 {
        normalize_angle(self.moon[1].ra - self.moon[0].ra)
            - normalize_angle(self.sun[1].ra - self.sun[0].ra)
    }

    /// Hours from `epoch` to opposition in right ascension.
    fn opposition_offset(&self) -> Result<Hours, EclipseError> {
        let rate = self.ra_rate();
        if rate.is_nan() || rate <= 0.0 {
            return Err(EclipseError::EphemerisError(
                "the Moon does not gain on the Sun in right ascension".into(),
            ));
        }
        let anti_sun = self.sun[0].ra + std::f64::consts::PI;
        Ok(normalize_angle(anti_sun - self.moon[0].ra) / rate)
    }

    fn at(&self, offset: Hours) -> Epoch {
        self.epoch + Duration::from_seconds(offset * SECONDS_PER_HOUR)
    }
}

fn lerp(pair: [f64; 2], t: Hours) -> f64 {
    pair[0] + (pair[1] - pair[0]) * t
}

/// Circumstances of the lunar eclipse at the full Moon nearest `epoch`.
///
/// Arguments
/// ---------
/// * `ephemeris`: source of Sun and Moon positions.
/// * `epoch`: an instant within a day or so of the full Moon.
///
/// Return
/// ------
/// * The eclipse circumstances; `kind` is [`LunarEclipseType::None`] when the Moon misses the
///   penumbra.
/// * [`EclipseError::EphemerisError`] if the ephemeris fails or the samples are inconsistent.
///
/// Details
/// -------
/// The opposition time is solved in closed form from samples at `epoch` and `epoch + 1 h`. If
/// it falls more than an hour away, the samples are taken again around it, once.
pub fn lunar_eclipse<E: Ephemeris + ?Sized>(
    ephemeris: &E,
    epoch: Epoch,
) -> Result<LunarEclipse, EclipseError> {
    let mut pair = HourlyPair::sample(ephemeris, epoch)?;
    let mut t_opp = pair.opposition_offset()?;
    if t_opp.abs() > RESAMPLE_THRESHOLD {
        debug!("opposition {t_opp:.2} h from {epoch}, re-sampling");
        pair = HourlyPair::sample(ephemeris, pair.at(t_opp.floor()))?;
        t_opp = pair.opposition_offset()?;
    }

    let (sun, moon) = (&pair.sun, &pair.moon);
    let moon_dec = lerp([moon[0].dec, moon[1].dec], t_opp);
    let sun_dec = lerp([sun[0].dec, sun[1].dec], t_opp);
    let parallax_sum = lerp([moon[0].parallax, moon[1].parallax], t_opp)
        + lerp([sun[0].parallax, sun[1].parallax], t_opp);
    let sun_sd = lerp([sun[0].semidiameter, sun[1].semidiameter], t_opp);
    let moon_sd = lerp([moon[0].semidiameter, moon[1].semidiameter], t_opp);

    let penumbral_radius = (parallax_sum + sun_sd) * CHAUVENET_ENLARGEMENT;
    let umbral_radius = (parallax_sum - sun_sd) * CHAUVENET_ENLARGEMENT;

    // Moon relative to the shadow centre (−δ☉), per hour
    let x_rate = pair.ra_rate() * moon_dec.cos();
    let y_rate = (moon[1].dec - moon[0].dec) + (sun[1].dec - sun[0].dec);
    let y_opp = moon_dec + sun_dec;

    let n2 = x_rate * x_rate + y_rate * y_rate;
    let n = n2.sqrt();
    let miss_distance = (y_opp * x_rate).abs() / n;
    let t_greatest = t_opp - y_opp * y_rate / n2;

    let window = |radius: f64| -> Option<PhaseWindow> {
        if radius <= miss_distance {
            return None;
        }
        let half = (radius * radius - miss_distance * miss_distance).sqrt() / n;
        Some(PhaseWindow {
            start: pair.at(t_greatest - half),
            end: pair.at(t_greatest + half),
        })
    };

    let kind = classify(miss_distance, umbral_radius, penumbral_radius, moon_sd);
    let umbral_magnitude = (umbral_radius + moon_sd - miss_distance) / (2.0 * moon_sd);
    let penumbral_magnitude = (penumbral_radius + moon_sd - miss_distance) / (2.0 * moon_sd);

    Ok(LunarEclipse {
        kind,
        magnitude: match kind {
            LunarEclipseType::Partial | LunarEclipseType::Total => umbral_magnitude,
            LunarEclipseType::Penumbral | LunarEclipseType::None => penumbral_magnitude,
        },
        umbral_magnitude,
        penumbral_magnitude,
        opposition: pair.at(t_opp),
        greatest: pair.at(t_greatest),
        miss_distance,
        penumbral_radius,
        umbral_radius,
        moon_semidiameter: moon_sd,
        penumbral: window(penumbral_radius + moon_sd),
        partial: window(umbral_radius + moon_sd),
        total: window(umbral_radius - moon_sd),
    })
}

#[cfg(test)]
mod lunar_test {
    use super::*;

    // radii of a typical eclipse, degrees
    const S: f64 = 0.70;
    const P: f64 = 1.24;
    const S1: f64 = 0.26;

    #[test]
    fn test_classify_thresholds() {
        assert_eq!(classify(0.0, S, P, S1), LunarEclipseType::Total);
        assert_eq!(classify(S - S1, S, P, S1), LunarEclipseType::Total);
        assert_eq!(classify(S - S1 + 1e-9, S, P, S1), LunarEclipseType::Partial);
        assert_eq!(classify(S + S1 - 1e-9, S, P, S1), LunarEclipseType::Partial);
        assert_eq!(classify(S + S1, S, P, S1), LunarEclipseType::Penumbral);
        assert_eq!(classify(P + S1, S, P, S1), LunarEclipseType::None);
    }

    #[test]
    fn test_classify_is_monotonic() {
        let mut previous = LunarEclipseType::Total;
        for k in 0..200 {
            let kind = classify(k as f64 * 0.01, S, P, S1);
            assert!(kind <= previous);
            previous = kind;
        }
        assert_eq!(previous, LunarEclipseType::None);
    }

    #[test]
    fn test_atmospheric_enlargement() {
        assert!((CHAUVENET_ENLARGEMENT - 1.018).abs() < 1e-12);
    }
}
