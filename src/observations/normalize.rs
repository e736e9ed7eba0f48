//! Joins raw observation rows to station metadata and projects them onto the
//! analysis schema. Pure functions, no I/O.

use crate::observations::error::NormalizeError;
use crate::types::observation::{ObservationRecord, RawObservation};
use crate::types::station::Station;
use chrono::{Datelike, NaiveDate};
use polars::prelude::*;
use std::collections::HashMap;

/// Calendar month names, indexed by `month - 1`.
pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Normalizes raw rows into analysis-ready records.
///
/// Each raw row is joined to its station by id (failing with
/// [`NormalizeError::UnknownStationReference`] on a miss), calendar fields are
/// derived from the date, and the integer tenths values become floating-point
/// physical units. Output order is the input order. Rows missing one of the
/// three elements are skipped: the analysis schema has no notion of a partial
/// day.
///
/// ```
/// use chrono::NaiveDate;
/// use stationtrend::{normalize, RawObservation, Station};
/// use std::collections::HashMap;
///
/// let station = Station {
///     id: "S1".to_string(),
///     name: "Test".to_string(),
///     lat: 0.0,
///     lon: 0.0,
/// };
/// let stations = HashMap::from([("S1".to_string(), station)]);
/// let raw = vec![RawObservation {
///     station_id: "S1".to_string(),
///     date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
///     tmax: Some(150),
///     tmin: Some(50),
///     prcp: Some(0),
/// }];
///
/// let records = normalize(&raw, &stations).unwrap();
/// assert_eq!(records[0].temp_max, 15.0);
/// assert_eq!(records[0].temp_delta, 10.0);
/// ```
pub fn normalize(
    raw: &[RawObservation],
    stations: &HashMap<String, Station>,
) -> Result<Vec<ObservationRecord>, NormalizeError> {
    let mut records = Vec::with_capacity(raw.len());
    for observation in raw {
        let station = stations.get(&observation.station_id).ok_or_else(|| {
            NormalizeError::UnknownStationReference(observation.station_id.clone())
        })?;
        let (Some(tmax), Some(tmin), Some(prcp)) =
            (observation.tmax, observation.tmin, observation.prcp)
        else {
            continue;
        };

        let temp_max = f64::from(tmax) / 10.0;
        let temp_min = f64::from(tmin) / 10.0;
        let date = observation.date;
        records.push(ObservationRecord {
            station_id: observation.station_id.clone(),
            station_name: station.name.clone(),
            date,
            year: date.year(),
            month_name: MONTH_NAMES[date.month0() as usize].to_string(),
            day_of_year: date.ordinal(),
            temp_min,
            temp_max,
            temp_delta: temp_max - temp_min,
            precipitation: f64::from(prcp) / 10.0,
            lat: station.lat,
            lon: station.lon,
        });
    }
    Ok(records)
}

/// Converts records to the columnar analysis table the store persists and the
/// rendering layer consumes.
pub fn records_to_dataframe(records: &[ObservationRecord]) -> Result<DataFrame, NormalizeError> {
    let epoch = NaiveDate::default();
    let date_days: Vec<i32> = records
        .iter()
        .map(|r| (r.date - epoch).num_days() as i32)
        .collect();
    let date_column: Column = Int32Chunked::from_vec("date".into(), date_days)
        .into_date()
        .into_series()
        .into();

    let frame = DataFrame::new(vec![
        Column::new(
            "station_id".into(),
            records.iter().map(|r| r.station_id.as_str()).collect::<Vec<_>>(),
        ),
        Column::new(
            "station_name".into(),
            records
                .iter()
                .map(|r| r.station_name.as_str())
                .collect::<Vec<_>>(),
        ),
        date_column,
        Column::new(
            "year".into(),
            records.iter().map(|r| r.year).collect::<Vec<i32>>(),
        ),
        Column::new(
            "month_name".into(),
            records
                .iter()
                .map(|r| r.month_name.as_str())
                .collect::<Vec<_>>(),
        ),
        Column::new(
            "day_of_year".into(),
            records.iter().map(|r| r.day_of_year as i32).collect::<Vec<i32>>(),
        ),
        Column::new(
            "temp_min".into(),
            records.iter().map(|r| r.temp_min).collect::<Vec<f64>>(),
        ),
        Column::new(
            "temp_max".into(),
            records.iter().map(|r| r.temp_max).collect::<Vec<f64>>(),
        ),
        Column::new(
            "temp_delta".into(),
            records.iter().map(|r| r.temp_delta).collect::<Vec<f64>>(),
        ),
        Column::new(
            "precipitation".into(),
            records.iter().map(|r| r.precipitation).collect::<Vec<f64>>(),
        ),
        Column::new(
            "lat".into(),
            records.iter().map(|r| r.lat).collect::<Vec<f64>>(),
        ),
        Column::new(
            "lon".into(),
            records.iter().map(|r| r.lon).collect::<Vec<f64>>(),
        ),
    ])?;
    Ok(frame)
}

/// Reads records back out of a persisted analysis table.
pub fn records_from_dataframe(df: &DataFrame) -> Result<Vec<ObservationRecord>, NormalizeError> {
    let station_id = df.column("station_id")?.str()?;
    let station_name = df.column("station_name")?.str()?;
    let date = df.column("date")?.date()?;
    let year = df.column("year")?.i32()?;
    let month_name = df.column("month_name")?.str()?;
    let day_of_year = df.column("day_of_year")?.i32()?;
    let temp_min = df.column("temp_min")?.f64()?;
    let temp_max = df.column("temp_max")?.f64()?;
    let temp_delta = df.column("temp_delta")?.f64()?;
    let precipitation = df.column("precipitation")?.f64()?;
    let lat = df.column("lat")?.f64()?;
    let lon = df.column("lon")?.f64()?;

    let epoch = NaiveDate::default();
    let mut records = Vec::with_capacity(df.height());
    for row in 0..df.height() {
        let date_days = date.get(row).ok_or_else(|| missing("date", row))?;
        records.push(ObservationRecord {
            station_id: station_id
                .get(row)
                .ok_or_else(|| missing("station_id", row))?
                .to_string(),
            station_name: station_name
                .get(row)
                .ok_or_else(|| missing("station_name", row))?
                .to_string(),
            date: epoch + chrono::Duration::days(i64::from(date_days)),
            year: year.get(row).ok_or_else(|| missing("year", row))?,
            month_name: month_name
                .get(row)
                .ok_or_else(|| missing("month_name", row))?
                .to_string(),
            day_of_year: day_of_year
                .get(row)
                .ok_or_else(|| missing("day_of_year", row))? as u32,
            temp_min: temp_min.get(row).ok_or_else(|| missing("temp_min", row))?,
            temp_max: temp_max.get(row).ok_or_else(|| missing("temp_max", row))?,
            temp_delta: temp_delta
                .get(row)
                .ok_or_else(|| missing("temp_delta", row))?,
            precipitation: precipitation
                .get(row)
                .ok_or_else(|| missing("precipitation", row))?,
            lat: lat.get(row).ok_or_else(|| missing("lat", row))?,
            lon: lon.get(row).ok_or_else(|| missing("lon", row))?,
        });
    }
    Ok(records)
}

fn missing(column: &str, row: usize) -> NormalizeError {
    NormalizeError::MissingValue {
        column: column.to_string(),
        row,
    }
}
