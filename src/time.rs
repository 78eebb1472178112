use hifitime::{Epoch, TimeScale};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{Degree, Hours, Seconds, JDTOMJD, SECONDS_PER_DAY, T2000};
use crate::eclipse_errors::EclipseError;

/// First Julian day of the Gregorian calendar (1582-10-15 at 0h).
const GREGORIAN_START_JD: f64 = 2299160.5;

/// A civil calendar date (Gregorian from 1582-10-15, Julian before).
///
/// Besselian element tables are keyed by this date: the date of the eclipse in TT at the
/// reference epoch `t0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CalendarDate {
    pub year: i32,
    pub month: u8,
    pub day: u8,
}

impl CalendarDate {
    /// Build a validated calendar date.
    ///
    /// Arguments
    /// ---------
    /// * `year`: astronomical year (year 0 = 1 BC).
    /// * `month`: month in `1..=12`.
    /// * `day`: day of month.
    ///
    /// Return
    /// ------
    /// * The date, or [`EclipseError::InvalidCalendarDate`] if the day does not exist
    ///   (e.g. February 30th, or the ten days dropped by the Gregorian reform).
    pub fn new(year: i32, month: u8, day: u8) -> Result<Self, EclipseError> {
        let date = CalendarDate { year, month, day };
        if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
            return Err(EclipseError::InvalidCalendarDate(date.to_string()));
        }
        // A date exists iff it survives the JD round trip.
        if CalendarDate::from_jd(date.to_jd()) != date {
            return Err(EclipseError::InvalidCalendarDate(date.to_string()));
        }
        Ok(date)
    }

    /// Julian Date at 0h of this date.
    ///
    /// Meeus, *Astronomical Algorithms*, ch. 7. Dates before the Gregorian reform are read in
    /// the Julian calendar.
    pub fn to_jd(&self) -> f64 {
        let (mut y, mut m) = (self.year as f64, self.month as f64);
        if self.month <= 2 {
            y -= 1.0;
            m += 12.0;
        }

        let jd_julian =
            (365.25 * (y + 4716.0)).floor() + (30.6001 * (m + 1.0)).floor() + self.day as f64
                - 1524.5;

        if jd_julian < GREGORIAN_START_JD + 10.0 {
            jd_julian
        } else {
            let a = (y / 100.0).floor();
            let b = 2.0 - a + (a / 4.0).floor();
            jd_julian + b
        }
    }

    /// Calendar date containing the Julian Date `jd`.
    pub fn from_jd(jd: f64) -> CalendarDate {
        let z = (jd + 0.5).floor();
        let f = jd + 0.5 - z;

        let a = if z < 2299161.0 {
            z
        } else {
            let alpha = ((z - 1867216.25) / 36524.25).floor();
            z + 1.0 + alpha - (alpha / 4.0).floor()
        };

        let b = a + 1524.0;
        let c = ((b - 122.1) / 365.25).floor();
        let d = (365.25 * c).floor();
        let e = ((b - d) / 30.6001).floor();

        let day = (b - d - (30.6001 * e).floor() + f).floor();
        let month = if e < 14.0 { e - 1.0 } else { e - 13.0 };
        let year = if month > 2.0 { c - 4716.0 } else { c - 4715.0 };

        CalendarDate {
            year: year as i32,
            month: month as u8,
            day: day as u8,
        }
    }

    /// The following calendar day.
    pub fn succ(&self) -> CalendarDate {
        CalendarDate::from_jd(self.to_jd() + 1.0)
    }

    /// The preceding calendar day.
    pub fn pred(&self) -> CalendarDate {
        CalendarDate::from_jd(self.to_jd() - 1.0)
    }

    /// Epoch `hours` after 0h TT of this date.
    pub fn epoch_tt(&self, hours: Hours) -> Epoch {
        let mjd = self.to_jd() - JDTOMJD + hours / 24.0;
        Epoch::from_mjd_in_time_scale(mjd, TimeScale::TT)
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

/// Julian Date (TT) of an epoch.
pub fn jd_tt(epoch: &Epoch) -> f64 {
    epoch.to_mjd_tt_days() + JDTOMJD
}

/// Julian centuries of TT elapsed since J2000.0.
pub fn julian_centuries_tt(epoch: &Epoch) -> f64 {
    (epoch.to_mjd_tt_days() - T2000) / 36525.0
}

/// Shift a TT epoch onto the UT axis.
///
/// Arguments
/// ---------
/// * `epoch_tt`: the instant, labelled in TT.
/// * `delta_t`: ΔT = TT − UT1 in seconds, as carried by the Besselian elements.
///
/// Return
/// ------
/// * The same instant as a UTC-labelled epoch whose civil reading is UT1. The residual
///   |UT1 − UTC| < 0.9 s is below the precision of the eclipse reductions.
pub fn tt_to_ut(epoch_tt: &Epoch, delta_t: Seconds) -> Epoch {
    let mjd_ut = epoch_tt.to_mjd_tt_days() - delta_t / SECONDS_PER_DAY;
    Epoch::from_mjd_in_time_scale(mjd_ut, TimeScale::UTC)
}

/// Local mean solar time, in hours `[0, 24)`.
///
/// Arguments
/// ---------
/// * `ut_hours`: universal time of day, in hours.
/// * `longitude`: observer longitude in degrees, east positive.
pub fn local_mean_time(ut_hours: Hours, longitude: Degree) -> Hours {
    (ut_hours + longitude / 15.0).rem_euclid(24.0)
}
