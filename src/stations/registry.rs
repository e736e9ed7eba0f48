//! The fixed list of monitored GHCND sites.
//!
//! The registry is versioned by editing this table; nothing downloads or
//! mutates it at runtime. All three monitors sit in UTM zone 16 north, which
//! is why [`MONITOR_ZONE`] is a constant rather than derived per station.

use crate::stations::project::UtmZone;
use crate::types::station::Station;
use polars::prelude::*;
use std::collections::HashMap;

/// The planar grid the monitored sites are projected onto.
pub const MONITOR_ZONE: UtmZone = UtmZone {
    zone: 16,
    north: true,
};

/// Returns the monitored stations, in registry order.
pub fn monitored_stations() -> Vec<Station> {
    vec![
        Station {
            id: "USW00013874".to_string(),
            name: "Atlanta Hartsfield Intl Airport".to_string(),
            lat: 33.6301,
            lon: -84.4418,
        },
        Station {
            id: "USW00003888".to_string(),
            name: "Atlanta Fulton Co Airport".to_string(),
            lat: 33.7794,
            lon: -84.5214,
        },
        Station {
            id: "USW00053863".to_string(),
            name: "Atlanta Peachtree Dekalb Airport".to_string(),
            lat: 33.8740,
            lon: -84.3020,
        },
    ]
}

/// Builds an id -> station map for the normalizer's join.
pub fn station_index(stations: &[Station]) -> HashMap<String, Station> {
    stations
        .iter()
        .map(|s| (s.id.clone(), s.clone()))
        .collect()
}

/// Converts a station list to the tabular shape the store persists.
pub fn stations_to_dataframe(stations: &[Station]) -> PolarsResult<DataFrame> {
    DataFrame::new(vec![
        Column::new(
            "id".into(),
            stations.iter().map(|s| s.id.as_str()).collect::<Vec<_>>(),
        ),
        Column::new(
            "name".into(),
            stations.iter().map(|s| s.name.as_str()).collect::<Vec<_>>(),
        ),
        Column::new(
            "lat".into(),
            stations.iter().map(|s| s.lat).collect::<Vec<f64>>(),
        ),
        Column::new(
            "lon".into(),
            stations.iter().map(|s| s.lon).collect::<Vec<f64>>(),
        ),
    ])
}
