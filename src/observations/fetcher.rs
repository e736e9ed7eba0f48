//! One-shot retrieval of daily GHCND observations from the NCEI access
//! service.
//!
//! This is a batch fetcher, not a service client: one GET per call, no retry
//! policy, the first error propagates to the caller.

use crate::observations::error::FetchError;
use crate::types::observation::{RawObservation, Variable};
use chrono::NaiveDate;
use log::{info, warn};
use polars::prelude::*;
use reqwest::Client;
use std::io::Write;
use tempfile::NamedTempFile;
use tokio::task;

const DEFAULT_ENDPOINT: &str = "https://www.ncei.noaa.gov/access/services/data/v1";
const DATASET: &str = "daily-summaries";

/// Fetches raw daily observation rows for a set of GHCND monitors.
///
/// The endpoint is overridable (tests point it at a local server) and a
/// service token can be attached explicitly instead of living in ambient
/// configuration.
pub struct GhcndFetcher {
    client: Client,
    endpoint: String,
    token: Option<String>,
}

impl Default for GhcndFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl GhcndFetcher {
    /// A fetcher against the public NCEI endpoint, with no token.
    pub fn new() -> Self {
        Self::with_endpoint(DEFAULT_ENDPOINT)
    }

    /// A fetcher against a custom endpoint.
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            token: None,
        }
    }

    /// Attaches a service token, sent as the `token` request header.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Fetches every available daily row for the given stations, date range
    /// (inclusive) and elements.
    ///
    /// A station with no data in range simply contributes zero rows. Fails
    /// with [`FetchError::SourceUnavailable`] on network or service errors and
    /// with [`FetchError::UnknownStation`] when the service rejects the
    /// request for an unrecognized monitor id.
    pub async fn fetch(
        &self,
        station_ids: &[&str],
        date_range: (NaiveDate, NaiveDate),
        variables: &[Variable],
    ) -> Result<Vec<RawObservation>, FetchError> {
        let (start, end) = date_range;
        let params = query_params(station_ids, start, end, variables);
        info!(
            "Requesting {} element(s) for {} station(s) from {} to {}",
            variables.len(),
            station_ids.len(),
            start,
            end
        );

        let mut request = self.client.get(&self.endpoint).query(&params);
        if let Some(token) = &self.token {
            request = request.header("token", token);
        }

        let response = request.send().await.map_err(|e| FetchError::SourceUnavailable {
            url: self.endpoint.clone(),
            source: e,
        })?;
        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                warn!("HTTP error for {}: {:?}", self.endpoint, e);
                return Err(match e.status() {
                    Some(status) if status.is_client_error() => FetchError::UnknownStation {
                        ids: station_ids.iter().map(|s| s.to_string()).collect(),
                        status,
                    },
                    _ => FetchError::SourceUnavailable {
                        url: self.endpoint.clone(),
                        source: e,
                    },
                });
            }
        };

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::SourceUnavailable {
                url: self.endpoint.clone(),
                source: e,
            })?;
        info!("Received {} bytes of observation CSV", body.len());

        csv_to_observations(body.to_vec()).await
    }
}

fn query_params(
    station_ids: &[&str],
    start: NaiveDate,
    end: NaiveDate,
    variables: &[Variable],
) -> Vec<(&'static str, String)> {
    let data_types = variables
        .iter()
        .map(|v| v.element_code())
        .collect::<Vec<_>>()
        .join(",");
    vec![
        ("dataset", DATASET.to_string()),
        ("stations", station_ids.join(",")),
        ("startDate", start.format("%Y-%m-%d").to_string()),
        ("endDate", end.format("%Y-%m-%d").to_string()),
        ("dataTypes", data_types),
        ("format", "csv".to_string()),
    ]
}

/// Parses the service's CSV body into raw observation rows on a blocking
/// task. An empty body means no data in range and yields zero rows.
async fn csv_to_observations(bytes: Vec<u8>) -> Result<Vec<RawObservation>, FetchError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }

    task::spawn_blocking(move || -> Result<Vec<RawObservation>, FetchError> {
        let mut temp_file = NamedTempFile::new()?;
        temp_file.write_all(&bytes)?;
        temp_file.flush()?;

        let df = CsvReadOptions::default()
            .with_has_header(true)
            .try_into_reader_with_file_path(Some(temp_file.path().to_path_buf()))
            .map_err(FetchError::CsvRead)?
            .finish()
            .map_err(FetchError::CsvRead)?;

        let stations = df
            .column("STATION")
            .map_err(FetchError::CsvRead)?
            .str()
            .map_err(FetchError::CsvRead)?
            .clone();
        let dates = df
            .column("DATE")
            .map_err(FetchError::CsvRead)?
            .str()
            .map_err(FetchError::CsvRead)?
            .clone();
        let tmax = element_column(&df, "TMAX")?;
        let tmin = element_column(&df, "TMIN")?;
        let prcp = element_column(&df, "PRCP")?;

        let mut rows = Vec::with_capacity(df.height());
        for i in 0..df.height() {
            let station_id = stations.get(i).ok_or_else(|| {
                FetchError::MalformedResponse(format!("missing STATION value at row {i}"))
            })?;
            let date_str = dates.get(i).ok_or_else(|| {
                FetchError::MalformedResponse(format!("missing DATE value at row {i}"))
            })?;
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|_| {
                FetchError::MalformedResponse(format!("unparseable DATE '{date_str}' at row {i}"))
            })?;
            rows.push(RawObservation {
                station_id: station_id.to_string(),
                date,
                tmax: tmax.as_ref().and_then(|c| c.get(i)),
                tmin: tmin.as_ref().and_then(|c| c.get(i)),
                prcp: prcp.as_ref().and_then(|c| c.get(i)),
            });
        }
        Ok(rows)
    })
    .await?
}

/// An element column is absent entirely when it was not requested or the
/// service has no values for it; within a present column individual rows can
/// still be null.
fn element_column(df: &DataFrame, name: &str) -> Result<Option<Int32Chunked>, FetchError> {
    match df.column(name) {
        Ok(column) => {
            let cast = column
                .cast(&DataType::Int32)
                .map_err(FetchError::CsvRead)?;
            Ok(Some(cast.i32().map_err(FetchError::CsvRead)?.clone()))
        }
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_params_spell_out_the_batch_request() {
        let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2020, 12, 31).unwrap();
        let params = query_params(
            &["USW00013874", "USW00003888"],
            start,
            end,
            &[Variable::Tmax, Variable::Tmin, Variable::Prcp],
        );

        let lookup = |key: &str| {
            params
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.as_str())
                .unwrap()
        };
        assert_eq!(lookup("dataset"), "daily-summaries");
        assert_eq!(lookup("stations"), "USW00013874,USW00003888");
        assert_eq!(lookup("startDate"), "2020-01-01");
        assert_eq!(lookup("endDate"), "2020-12-31");
        assert_eq!(lookup("dataTypes"), "TMAX,TMIN,PRCP");
        assert_eq!(lookup("format"), "csv");
    }

    #[tokio::test]
    async fn csv_body_becomes_raw_rows() {
        let body = b"\
\"STATION\",\"DATE\",\"PRCP\",\"TMAX\",\"TMIN\"
\"USW00013874\",\"2020-01-01\",\"0\",\"150\",\"50\"
\"USW00013874\",\"2020-01-02\",\"5\",\"160\",\"40\"
"
        .to_vec();
        let rows = csv_to_observations(body).await.unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].station_id, "USW00013874");
        assert_eq!(rows[0].date, NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
        assert_eq!(rows[0].tmax, Some(150));
        assert_eq!(rows[0].tmin, Some(50));
        assert_eq!(rows[0].prcp, Some(0));
        assert_eq!(rows[1].prcp, Some(5));
    }

    #[tokio::test]
    async fn missing_element_values_stay_absent() {
        let body = b"\
STATION,DATE,TMAX,TMIN
USW00013874,2020-06-01,310,
USW00013874,2020-06-02,305,221
"
        .to_vec();
        let rows = csv_to_observations(body).await.unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].tmax, Some(310));
        assert_eq!(rows[0].tmin, None);
        assert_eq!(rows[1].tmin, Some(221));
        // PRCP was never requested, so the column is absent entirely.
        assert_eq!(rows[0].prcp, None);
    }

    #[tokio::test]
    async fn empty_body_means_no_rows() {
        let rows = csv_to_observations(Vec::new()).await.unwrap();
        assert!(rows.is_empty());

        let rows = csv_to_observations(b"  \n".to_vec()).await.unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn unparseable_dates_are_rejected() {
        let body = b"\
\"STATION\",\"DATE\",\"TMAX\"
\"USW00013874\",\"January 1st\",\"150\"
"
        .to_vec();
        let err = csv_to_observations(body).await.unwrap_err();
        assert!(matches!(err, FetchError::MalformedResponse(_)));
    }
}
