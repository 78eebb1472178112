use criterion::{black_box, criterion_group, criterion_main, Criterion};

use eclipse_solver::besselian::catalog::BesselianCatalog;
use eclipse_solver::besselian::BesselianElements;
use eclipse_solver::curves::{trace_central_line, trace_limits, trace_magnitude_contour, TraceParams};
use eclipse_solver::tangency::ShadowEdge;
use eclipse_solver::time::CalendarDate;

fn eclipse_2017() -> BesselianElements {
    let catalog = BesselianCatalog::from_csv_path("tests/data/besselian_elements.csv")
        .expect("Failed to load the element table");
    catalog
        .find(CalendarDate::new(2017, 8, 21).expect("valid date"))
        .expect("2017 elements missing")
        .clone()
}

fn world(step: f64) -> TraceParams {
    TraceParams::builder()
        .longitude_step(step)
        .build()
        .expect("valid trace parameters")
}

fn bench_central_line(c: &mut Criterion) {
    let elements = eclipse_2017();
    let params = world(1.0);

    c.bench_function("trace_curves/central_line_1deg", |b| {
        b.iter(|| trace_central_line(black_box(&elements), black_box(&params)).count())
    });
}

fn bench_limits(c: &mut Criterion) {
    let elements = eclipse_2017();
    let params = world(1.0);

    let mut group = c.benchmark_group("trace_curves/limits_1deg");
    for (name, edge) in [
        ("penumbra", ShadowEdge::Penumbra),
        ("umbra", ShadowEdge::Umbra),
    ] {
        group.bench_function(name, |b| {
            b.iter(|| trace_limits(black_box(&elements), edge, black_box(&params)).count())
        });
    }
    group.finish();
}

fn bench_magnitude_contours(c: &mut Criterion) {
    let elements = eclipse_2017();
    let params = world(2.0);

    c.bench_function("trace_curves/magnitude_contours_2deg", |b| {
        b.iter(|| {
            [0.2, 0.4, 0.6, 0.8]
                .iter()
                .map(|&g| trace_magnitude_contour(black_box(&elements), g, &params).count())
                .sum::<usize>()
        })
    });
}

criterion_group!(
    benches,
    bench_central_line,
    bench_limits,
    bench_magnitude_contours
);
criterion_main!(benches);
