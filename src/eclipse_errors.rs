use thiserror::Error;

use crate::time::CalendarDate;

#[derive(Error, Debug)]
pub enum EclipseError {
    #[error("No solar eclipse elements found for {0} (searched ±1 day)")]
    ElementsNotFound(CalendarDate),

    #[error("Invalid Besselian elements: {0}")]
    InvalidBesselianElements(String),

    #[error("Invalid trace parameter: {0}")]
    InvalidTraceParameter(String),

    #[error("Invalid calendar date: {0}")]
    InvalidCalendarDate(String),

    #[error("Invalid observer site: {0}")]
    InvalidSite(String),

    #[error("Unable to read Besselian element table: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Ephemeris service failure: {0}")]
    EphemerisError(String),
}

impl PartialEq for EclipseError {
    fn eq(&self, other: &Self) -> bool {
        use EclipseError::*;
        match (self, other) {
            (ElementsNotFound(a), ElementsNotFound(b)) => a == b,
            (InvalidBesselianElements(a), InvalidBesselianElements(b)) => a == b,
            (InvalidTraceParameter(a), InvalidTraceParameter(b)) => a == b,
            (InvalidCalendarDate(a), InvalidCalendarDate(b)) => a == b,
            (InvalidSite(a), InvalidSite(b)) => a == b,
            (EphemerisError(a), EphemerisError(b)) => a == b,

            // Not comparable: equal when the variant matches
            (CsvError(_), CsvError(_)) => true,
            (IoError(_), IoError(_)) => true,

            _ => false,
        }
    }
}
