use cityweather::{linear_regression, CityLocator, GazetteerCity, LatLon};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn grid_cities() -> Vec<GazetteerCity> {
    let mut cities = Vec::new();
    for lat in (-85..=85).step_by(5) {
        for lon in (-180..180).step_by(5) {
            cities.push(GazetteerCity::new(
                format!("city_{lat}_{lon}"),
                "xx",
                lat as f64,
                lon as f64,
            ));
        }
    }
    cities
}

fn bench_cityweather(c: &mut Criterion) {
    let x: Vec<f64> = (0..1500).map(|i| (i % 180) as f64 - 90.0).collect();
    let y: Vec<f64> = x.iter().map(|lat| 30.0 - lat.abs() * 0.4).collect();
    c.bench_function("linear_regression", |b| {
        b.iter(|| linear_regression(black_box(&x), black_box(&y)))
    });

    let locator = CityLocator::from_cities(grid_cities()).expect("non-empty grid");
    c.bench_function("nearest_city", |b| {
        b.iter(|| locator.nearest(black_box(LatLon(-20.4, 57.7))))
    });
}

criterion_group!(benches, bench_cityweather);
criterion_main!(benches);
