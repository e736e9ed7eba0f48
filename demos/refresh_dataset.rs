// demos/refresh_dataset.rs
use chrono::NaiveDate;
use stationtrend::{StationTrend, StationTrendError};

#[tokio::main]
async fn main() -> Result<(), StationTrendError> {
    // Set RUST_LOG=info to watch the fetch and persist steps.
    env_logger::init();

    let pipeline = StationTrend::new().await?;
    let start = NaiveDate::from_ymd_opt(2019, 1, 1).unwrap();
    let end = NaiveDate::from_ymd_opt(2019, 12, 31).unwrap();

    println!("Fetching daily observations from {} to {}...", start, end);
    let records = pipeline
        .refresh_dataset()
        .start(start)
        .end(end)
        .call()
        .await?;

    println!(
        "Persisted {} observation records under data/ (stations, stations_utm, observations).",
        records.len()
    );
    if let Some(first) = records.first() {
        println!(
            "First record: {} {} tmax={:.1}C tmin={:.1}C delta={:.1}C",
            first.station_name, first.date, first.temp_max, first.temp_min, first.temp_delta
        );
    }

    Ok(())
}
