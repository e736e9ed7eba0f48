use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use stationtrend::{fit, monitored_stations, normalize, station_index, RawObservation};

fn synthetic_raw(rows: u32) -> Vec<RawObservation> {
    let stations = monitored_stations();
    let station = &stations[0];
    let base = NaiveDate::from_ymd_opt(2018, 1, 1).unwrap();
    (0..rows)
        .map(|i| RawObservation {
            station_id: station.id.clone(),
            date: base + chrono::Duration::days(i64::from(i)),
            tmax: Some(200 + (i as i32 * 7) % 150),
            tmin: Some(50 + (i as i32 * 3) % 90),
            prcp: Some((i as i32 * 11) % 200),
        })
        .collect()
}

fn bench_pipeline(c: &mut Criterion) {
    let stations = monitored_stations();
    let index = station_index(&stations);
    let raw = synthetic_raw(1000);
    let records = normalize(&raw, &index).unwrap();
    let station_name = stations[0].name.clone();

    c.bench_function("normalize_1k", |b| {
        b.iter(|| normalize(black_box(&raw), &index))
    });
    c.bench_function("fit_quadratic_1k", |b| {
        b.iter(|| fit(black_box(&records), |r| r.station_name == station_name))
    });
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);
