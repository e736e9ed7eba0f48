// demos/seasonal_band.rs
use stationtrend::{StationTrend, StationTrendError};

#[tokio::main]
async fn main() -> Result<(), StationTrendError> {
    env_logger::init();

    // Assumes refresh_dataset has already populated data/.
    let pipeline = StationTrend::new().await?;
    let band = pipeline
        .seasonal_band()
        .station_name("Atlanta Hartsfield Intl Airport")
        .call()
        .await?;

    println!(
        "Seasonal temperature-range band at {:.0}% confidence:",
        band.confidence_level * 100.0
    );
    println!("{:>4}  {:>7}  {:>7}  {:>7}", "day", "fit", "lower", "upper");
    for point in &band.points {
        println!(
            "{:>4}  {:>7.2}  {:>7.2}  {:>7.2}",
            point.day_of_year, point.fit, point.lower, point.upper
        );
    }

    Ok(())
}
