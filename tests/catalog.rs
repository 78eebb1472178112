mod common;

use approx::assert_abs_diff_eq;
use eclipse_solver::besselian::catalog::BesselianCatalog;
use eclipse_solver::eclipse_errors::EclipseError;
use eclipse_solver::greatest::{greatest_eclipse, shadow_window, ShadowExtent};
use eclipse_solver::time::CalendarDate;

use crate::common::{catalog, init_logger, CATALOG_PATH};

#[test]
fn test_load_table() {
    init_logger();
    let catalog = catalog();
    assert_eq!(catalog.len(), 2);

    let dates: Vec<_> = catalog.iter().map(|e| e.date()).collect();
    assert_eq!(
        dates,
        vec![
            CalendarDate::new(2017, 8, 21).unwrap(),
            CalendarDate::new(2024, 4, 8).unwrap()
        ]
    );
}

#[test]
fn test_find_tolerates_one_day() {
    let catalog = catalog();
    // civil date in Australia, the eclipse belongs to the day before in TT
    let local = CalendarDate::new(2024, 4, 9).unwrap();
    let elements = catalog.find(local).unwrap();
    assert_eq!(elements.date(), CalendarDate::new(2024, 4, 8).unwrap());
    assert_abs_diff_eq!(elements.delta_t(), 69.1);

    let missing = CalendarDate::new(2024, 10, 2).unwrap();
    assert_eq!(
        catalog.find(missing),
        Err(EclipseError::ElementsNotFound(missing))
    );
}

#[test]
fn test_missing_file() {
    let err = BesselianCatalog::from_csv_path("tests/data/no_such_table.csv").unwrap_err();
    assert!(matches!(err, EclipseError::IoError(_)));
}

#[test]
fn test_malformed_row() {
    let table = std::fs::read_to_string(CATALOG_PATH).unwrap();
    let broken = table.replacen("0.5406426", "not-a-number", 1);
    let err = BesselianCatalog::from_csv_reader(broken.as_bytes()).unwrap_err();
    assert!(matches!(err, EclipseError::CsvError(_)));
}

#[test]
fn test_greatest_eclipses() {
    let catalog = catalog();

    let e2017 = catalog.find(CalendarDate::new(2017, 8, 21).unwrap()).unwrap();
    let greatest = greatest_eclipse(e2017).unwrap();
    assert_abs_diff_eq!(greatest.t, 0.4445, epsilon = 1e-3);
    assert_abs_diff_eq!(greatest.gamma, e2017.gamma(), epsilon = 1e-3);
    let central = greatest.central.unwrap();
    assert_abs_diff_eq!(central.longitude, -87.67, epsilon = 0.2);
    assert_abs_diff_eq!(central.latitude, 36.97, epsilon = 0.1);
    assert_abs_diff_eq!(central.duration, 160.0, epsilon = 2.0);

    let e2024 = catalog.find(CalendarDate::new(2024, 4, 8).unwrap()).unwrap();
    let greatest = greatest_eclipse(e2024).unwrap();
    assert_abs_diff_eq!(greatest.gamma, e2024.gamma(), epsilon = 2e-3);
    assert!(greatest.central.is_some());
}

#[test]
fn test_shadow_windows_2017() {
    let catalog = catalog();
    let elements = catalog.find(CalendarDate::new(2017, 8, 21).unwrap()).unwrap();
    let greatest = greatest_eclipse(elements).unwrap();

    let axis = shadow_window(elements, ShadowExtent::Axis).unwrap();
    let penumbra = shadow_window(elements, ShadowExtent::Penumbra).unwrap();
    assert_abs_diff_eq!(penumbra.start, -2.202, epsilon = 1e-2);
    assert_abs_diff_eq!(penumbra.end, 3.092, epsilon = 1e-2);
    assert_abs_diff_eq!(axis.duration(), 3.22, epsilon = 1e-2);
    assert!(penumbra.start < axis.start && axis.end < penumbra.end);
    assert!(axis.contains(greatest.t));
}
