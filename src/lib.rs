mod error;
mod observations;
mod pipeline;
mod stations;
mod store;
mod trend;
mod types;

pub use error::StationTrendError;
pub use pipeline::*;

pub use observations::error::{FetchError, NormalizeError};
pub use observations::fetcher::GhcndFetcher;
pub use observations::normalize::{
    normalize, records_from_dataframe, records_to_dataframe, MONTH_NAMES,
};

pub use stations::error::ProjectionError;
pub use stations::project::{project, projected_to_dataframe, UtmZone};
pub use stations::registry::{
    monitored_stations, station_index, stations_to_dataframe, MONITOR_ZONE,
};

pub use store::error::StoreError;
pub use store::{DataStore, OBSERVATIONS_ARTIFACT, STATIONS_ARTIFACT, STATIONS_UTM_ARTIFACT};

pub use trend::error::TrendError;
pub use trend::model::{fit, fitted_days, predict, BandPoint, PredictionBand, TrendModel};

pub use types::observation::{ObservationRecord, RawObservation, Variable};
pub use types::station::{ProjectedStation, Station};
