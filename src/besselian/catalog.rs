//! # Catalog of Besselian element sets
//!
//! [`BesselianCatalog`] maps calendar dates to [`BesselianElements`]. It is read-only once
//! loaded and can be filled either programmatically or from a CSV table.
//!
//! ## CSV layout
//!
//! One eclipse per row, with the header
//!
//! ```text
//! year,month,day,t0,delta_t,gamma,x0,x1,x2,x3,y0,y1,y2,y3,d0,d1,d2,l10,l11,l12,l20,l21,l22,mu0,mu1,tan_f1,tan_f2
//! ```
//!
//! ## Lookup tolerance
//!
//! [`BesselianCatalog::find`] accepts a date off by one day: the caller's civil date and the TT
//! date of the elements do not always agree near midnight. The exact date wins, then the
//! previous day, then the next.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::{debug, warn};
use serde::Deserialize;

use super::{BesselianCoefficients, BesselianElements};
use crate::eclipse_errors::EclipseError;
use crate::time::CalendarDate;

/// One row of a Besselian element table.
#[derive(Debug, Deserialize)]
struct BesselianRecord {
    year: i32,
    month: u8,
    day: u8,
    t0: f64,
    delta_t: f64,
    gamma: f64,
    x0: f64,
    x1: f64,
    x2: f64,
    x3: f64,
    y0: f64,
    y1: f64,
    y2: f64,
    y3: f64,
    d0: f64,
    d1: f64,
    d2: f64,
    l10: f64,
    l11: f64,
    l12: f64,
    l20: f64,
    l21: f64,
    l22: f64,
    mu0: f64,
    mu1: f64,
    tan_f1: f64,
    tan_f2: f64,
}

impl TryFrom<BesselianRecord> for BesselianElements {
    type Error = EclipseError;

    fn try_from(r: BesselianRecord) -> Result<Self, Self::Error> {
        let date = CalendarDate::new(r.year, r.month, r.day)?;
        let coefficients = BesselianCoefficients {
            x: [r.x0, r.x1, r.x2, r.x3],
            y: [r.y0, r.y1, r.y2, r.y3],
            d: [r.d0, r.d1, r.d2],
            l1: [r.l10, r.l11, r.l12],
            l2: [r.l20, r.l21, r.l22],
            mu: [r.mu0, r.mu1],
            tan_f1: r.tan_f1,
            tan_f2: r.tan_f2,
        };
        BesselianElements::new(date, r.t0, r.delta_t, r.gamma, coefficients)
    }
}

/// Date-keyed collection of solar eclipse element sets.
#[derive(Debug, Clone, Default)]
pub struct BesselianCatalog {
    entries: BTreeMap<CalendarDate, BesselianElements>,
}

impl BesselianCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an element set, returning the one it replaces if the date was already present.
    pub fn insert(&mut self, elements: BesselianElements) -> Option<BesselianElements> {
        let date = elements.date();
        let previous = self.entries.insert(date, elements);
        if previous.is_some() {
            warn!("Besselian elements for {date} replaced");
        }
        previous
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Element sets in chronological order.
    pub fn iter(&self) -> impl Iterator<Item = &BesselianElements> {
        self.entries.values()
    }

    /// Look up the element set of the eclipse on `date`.
    ///
    /// Arguments
    /// ---------
    /// * `date`: calendar date of the eclipse.
    ///
    /// Return
    /// ------
    /// * The elements of `date`, else of the previous day, else of the next day.
    /// * [`EclipseError::ElementsNotFound`] when none of the three dates is cataloged.
    pub fn find(&self, date: CalendarDate) -> Result<&BesselianElements, EclipseError> {
        [date, date.pred(), date.succ()]
            .iter()
            .find_map(|candidate| {
                let found = self.entries.get(candidate);
                if found.is_some() && *candidate != date {
                    debug!("Besselian elements for {date} resolved to {candidate}");
                }
                found
            })
            .ok_or(EclipseError::ElementsNotFound(date))
    }

    /// Read a catalog from CSV data.
    ///
    /// Fields are trimmed, so aligned tables are accepted. Any malformed row aborts the load.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, EclipseError> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut catalog = BesselianCatalog::new();
        for record in rdr.deserialize::<BesselianRecord>() {
            let elements = BesselianElements::try_from(record?)?;
            catalog.insert(elements);
        }
        debug!("Loaded {} Besselian element sets", catalog.len());
        Ok(catalog)
    }

    /// Read a catalog from a CSV file.
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self, EclipseError> {
        let file = File::open(path)?;
        BesselianCatalog::from_csv_reader(file)
    }
}

impl FromIterator<BesselianElements> for BesselianCatalog {
    fn from_iter<I: IntoIterator<Item = BesselianElements>>(iter: I) -> Self {
        let mut catalog = BesselianCatalog::new();
        for elements in iter {
            catalog.insert(elements);
        }
        catalog
    }
}

#[cfg(test)]
mod catalog_test {
    use super::*;

    const TABLE: &str = "\
year,month,day,t0,delta_t,gamma,x0,x1,x2,x3,y0,y1,y2,y3,d0,d1,d2,l10,l11,l12,l20,l21,l22,mu0,mu1,tan_f1,tan_f2
2017,8,21,18.0,70.3,0.4367,-0.129571,0.5406426,-2.94e-05,-8.1e-06,0.485416,-0.14164,-9.05e-05,2.05e-06,11.86696,-0.013622,-2.0e-06,0.542093,0.0001241,-1.18e-05,-0.004025,0.0001234,-1.17e-05,89.24543,15.00394,0.0046222,0.0045992
";

    #[test]
    fn test_load_and_find() {
        let catalog = BesselianCatalog::from_csv_reader(TABLE.as_bytes()).unwrap();
        assert_eq!(catalog.len(), 1);

        let date = CalendarDate::new(2017, 8, 21).unwrap();
        let elements = catalog.find(date).unwrap();
        assert_eq!(elements.t0(), 18.0);
        assert_eq!(elements.coefficients().mu, [89.24543, 15.00394]);

        // one day off on either side still resolves
        assert_eq!(catalog.find(date.succ()).unwrap().date(), date);
        assert_eq!(catalog.find(date.pred()).unwrap().date(), date);

        let far = date.succ().succ();
        assert_eq!(catalog.find(far), Err(EclipseError::ElementsNotFound(far)));
    }

    #[test]
    fn test_exact_date_wins() {
        let base = BesselianCatalog::from_csv_reader(TABLE.as_bytes()).unwrap();
        let elements = base.iter().next().unwrap().clone();
        let next_day = elements.date().succ();

        let shifted = BesselianElements::new(
            next_day,
            elements.t0(),
            elements.delta_t(),
            elements.gamma(),
            elements.coefficients().clone(),
        )
        .unwrap();

        let catalog: BesselianCatalog = vec![elements.clone(), shifted].into_iter().collect();
        assert_eq!(catalog.find(next_day).unwrap().date(), next_day);
        assert_eq!(catalog.find(elements.date()).unwrap().date(), elements.date());
    }

    #[test]
    fn test_malformed_row() {
        let table = TABLE.replace("0.0046222", "oops");
        let err = BesselianCatalog::from_csv_reader(table.as_bytes()).unwrap_err();
        assert!(matches!(err, EclipseError::CsvError(_)));

        let table = TABLE.replace("0.0046222", "-1.0");
        let err = BesselianCatalog::from_csv_reader(table.as_bytes()).unwrap_err();
        assert!(matches!(err, EclipseError::InvalidBesselianElements(_)));
    }
}
