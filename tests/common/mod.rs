#![allow(dead_code)]

use eclipse_solver::besselian::catalog::BesselianCatalog;
use eclipse_solver::besselian::{BesselianCoefficients, BesselianElements};
use eclipse_solver::time::CalendarDate;

pub const CATALOG_PATH: &str = "tests/data/besselian_elements.csv";

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn catalog() -> BesselianCatalog {
    BesselianCatalog::from_csv_path(CATALOG_PATH).unwrap()
}

/// Total solar eclipse of 2017 August 21.
pub fn eclipse_2017() -> BesselianElements {
    catalog()
        .find(CalendarDate::new(2017, 8, 21).unwrap())
        .unwrap()
        .clone()
}

/// Equatorial eclipse symmetric about Greenwich: the axis crosses the Earth's centre at `t0`
/// with the Sun on the equator.
pub fn synthetic_central() -> BesselianElements {
    BesselianElements::new(
        CalendarDate::new(2000, 3, 20).unwrap(),
        12.0,
        0.0,
        0.0,
        BesselianCoefficients {
            x: [0.0, 0.55, 0.0, 0.0],
            y: [0.0; 4],
            d: [0.0; 3],
            l1: [0.54, 0.0, 0.0],
            l2: [-0.004, 0.0, 0.0],
            mu: [0.0, 15.0],
            tan_f1: 0.0046,
            tan_f2: 0.00459,
        },
    )
    .unwrap()
}
