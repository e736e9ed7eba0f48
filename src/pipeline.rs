//! The batch pipeline entry point: fetch, normalize, persist, and derive
//! trend bands from the persisted dataset.
//!
//! Everything the original workshop scripts kept in ambient globals (working
//! directory, service credentials) is explicit here: the data directory is
//! passed at construction and credentials live on the fetcher.

use crate::error::StationTrendError;
use crate::observations::fetcher::GhcndFetcher;
use crate::observations::normalize::{normalize, records_from_dataframe, records_to_dataframe};
use crate::stations::project::{project, projected_to_dataframe};
use crate::stations::registry::{
    monitored_stations, station_index, stations_to_dataframe, MONITOR_ZONE,
};
use crate::store::{DataStore, OBSERVATIONS_ARTIFACT, STATIONS_ARTIFACT, STATIONS_UTM_ARTIFACT};
use crate::trend::model::{fit, fitted_days, predict, PredictionBand};
use crate::types::observation::{ObservationRecord, Variable};
use bon::bon;
use chrono::NaiveDate;
use log::info;
use std::path::PathBuf;

const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_CONFIDENCE_LEVEL: f64 = 0.95;

/// The pipeline client.
///
/// Holds the fetcher and the artifact store; the station registry is
/// compile-time data. One instance per batch run is the expected usage —
/// nothing here retries or recovers, the first error surfaces to the caller.
pub struct StationTrend {
    fetcher: GhcndFetcher,
    store: DataStore,
}

#[bon]
impl StationTrend {
    /// Creates a pipeline writing its artifacts under the given directory.
    ///
    /// The directory is created if it does not exist.
    pub async fn with_data_folder(data_folder: PathBuf) -> Result<Self, StationTrendError> {
        Ok(Self {
            fetcher: GhcndFetcher::new(),
            store: DataStore::new(data_folder).await?,
        })
    }

    /// Creates a pipeline using the conventional `data/` directory.
    pub async fn new() -> Result<Self, StationTrendError> {
        Self::with_data_folder(PathBuf::from(DEFAULT_DATA_DIR)).await
    }

    /// Replaces the default fetcher (custom endpoint or service token).
    pub fn with_fetcher(mut self, fetcher: GhcndFetcher) -> Self {
        self.fetcher = fetcher;
        self
    }

    /// Fetches all three elements for every registry station over the date
    /// range, normalizes them, and persists the station table, the projected
    /// station table and the observation table.
    ///
    /// Returns the normalized records so a caller can continue without
    /// re-reading the store.
    ///
    /// ```no_run
    /// # use stationtrend::{StationTrend, StationTrendError};
    /// # use chrono::NaiveDate;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), StationTrendError> {
    /// let pipeline = StationTrend::new().await?;
    /// let records = pipeline
    ///     .refresh_dataset()
    ///     .start(NaiveDate::from_ymd_opt(2019, 1, 1).unwrap())
    ///     .end(NaiveDate::from_ymd_opt(2019, 12, 31).unwrap())
    ///     .call()
    ///     .await?;
    /// println!("{} records persisted", records.len());
    /// # Ok(())
    /// # }
    /// ```
    #[builder]
    pub async fn refresh_dataset(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<ObservationRecord>, StationTrendError> {
        let stations = monitored_stations();
        let ids: Vec<&str> = stations.iter().map(|s| s.id.as_str()).collect();

        let raw = self
            .fetcher
            .fetch(&ids, (start, end), &Variable::all())
            .await?;
        let index = station_index(&stations);
        let records = normalize(&raw, &index)?;
        info!(
            "Normalized {} of {} raw rows across {} stations",
            records.len(),
            raw.len(),
            stations.len()
        );

        let projected = project(&stations, MONITOR_ZONE)?;
        self.store
            .save(STATIONS_ARTIFACT, stations_to_dataframe(&stations)?)
            .await?;
        self.store
            .save(STATIONS_UTM_ARTIFACT, projected_to_dataframe(&projected)?)
            .await?;
        self.store
            .save(OBSERVATIONS_ARTIFACT, records_to_dataframe(&records)?)
            .await?;

        Ok(records)
    }

    /// Re-reads the persisted observation table.
    ///
    /// Downstream consumers re-read rather than refetch; fails with
    /// [`crate::StoreError::NotFound`] if `refresh_dataset` has never run
    /// against this data directory.
    pub async fn load_records(&self) -> Result<Vec<ObservationRecord>, StationTrendError> {
        let frame = self.store.load(OBSERVATIONS_ARTIFACT).await?;
        Ok(records_from_dataframe(&frame)?)
    }

    /// Fits the quadratic seasonal trend for one named station from the
    /// persisted dataset and predicts the confidence band over that station's
    /// observed day-of-year domain.
    ///
    /// Confidence level defaults to 0.95.
    ///
    /// ```no_run
    /// # use stationtrend::{StationTrend, StationTrendError};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), StationTrendError> {
    /// let pipeline = StationTrend::new().await?;
    /// let band = pipeline
    ///     .seasonal_band()
    ///     .station_name("Atlanta Hartsfield Intl Airport")
    ///     .call()
    ///     .await?;
    /// println!("{} band points", band.points.len());
    /// # Ok(())
    /// # }
    /// ```
    #[builder]
    pub async fn seasonal_band(
        &self,
        station_name: &str,
        confidence_level: Option<f64>,
    ) -> Result<PredictionBand, StationTrendError> {
        let records = self.load_records().await?;
        let level = confidence_level.unwrap_or(DEFAULT_CONFIDENCE_LEVEL);

        let model = fit(&records, |r| r.station_name == station_name)?;
        let days = fitted_days(&records, |r| r.station_name == station_name);
        Ok(predict(&model, &days, level)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observations::normalize::records_to_dataframe;
    use crate::store::OBSERVATIONS_ARTIFACT;
    use tempfile::tempdir;

    fn synthetic_records(station_name: &str, days: u32) -> Vec<ObservationRecord> {
        (1..=days)
            .map(|day| {
                let date = NaiveDate::from_yo_opt(2021, day).unwrap();
                let delta = 8.0 + 0.05 * f64::from(day) - 0.0001 * f64::from(day * day);
                ObservationRecord {
                    station_id: "TEST0001".to_string(),
                    station_name: station_name.to_string(),
                    date,
                    year: 2021,
                    month_name: "January".to_string(),
                    day_of_year: day,
                    temp_min: 5.0,
                    temp_max: 5.0 + delta,
                    temp_delta: delta,
                    precipitation: 0.0,
                    lat: 33.6,
                    lon: -84.4,
                }
            })
            .collect()
    }

    #[tokio::test]
    async fn seasonal_band_runs_off_the_persisted_dataset() {
        let dir = tempdir().unwrap();
        let pipeline = StationTrend::with_data_folder(dir.path().to_path_buf())
            .await
            .unwrap();

        let records = synthetic_records("Testville", 40);
        pipeline
            .store
            .save(OBSERVATIONS_ARTIFACT, records_to_dataframe(&records).unwrap())
            .await
            .unwrap();

        let band = pipeline
            .seasonal_band()
            .station_name("Testville")
            .call()
            .await
            .unwrap();

        assert_eq!(band.confidence_level, 0.95);
        assert_eq!(band.points.len(), 40);
        for point in &band.points {
            assert!(point.lower <= point.fit && point.fit <= point.upper);
        }
    }

    #[tokio::test]
    async fn load_records_round_trips_through_the_store() {
        let dir = tempdir().unwrap();
        let pipeline = StationTrend::with_data_folder(dir.path().to_path_buf())
            .await
            .unwrap();

        let records = synthetic_records("Testville", 10);
        pipeline
            .store
            .save(OBSERVATIONS_ARTIFACT, records_to_dataframe(&records).unwrap())
            .await
            .unwrap();

        let loaded = pipeline.load_records().await.unwrap();
        assert_eq!(loaded, records);
    }

    #[tokio::test]
    async fn load_records_without_a_refresh_is_not_found() {
        let dir = tempdir().unwrap();
        let pipeline = StationTrend::with_data_folder(dir.path().to_path_buf())
            .await
            .unwrap();

        let err = pipeline.load_records().await.unwrap_err();
        assert!(matches!(
            err,
            StationTrendError::Store(crate::store::error::StoreError::NotFound(_))
        ));
    }
}
