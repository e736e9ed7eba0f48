//! Reference data for the monitored GHCND sites, in geographic and in
//! projected planar coordinates.

use serde::{Deserialize, Serialize};

/// A single GHCND monitoring site.
///
/// Stations are immutable reference data: the registry builds them once from
/// a literal table and they are never mutated afterwards. `id` is the external
/// monitor identifier (e.g. "USW00013874") and is unique across the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    /// External GHCND monitor identifier.
    pub id: String,
    /// Human-readable display name.
    pub name: String,
    /// Latitude in decimal degrees (positive for North).
    pub lat: f64,
    /// Longitude in decimal degrees (positive for East).
    pub lon: f64,
}

/// A station projected onto a planar UTM grid.
///
/// Easting and northing are in meters. Produced by [`crate::project`] for
/// distance-preserving spatial analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectedStation {
    /// External GHCND monitor identifier.
    pub id: String,
    /// Human-readable display name.
    pub name: String,
    /// Meters east of the zone's central meridian, including the 500 km false
    /// easting.
    pub easting: f64,
    /// Meters north of the equator; southern-hemisphere values carry the
    /// 10 000 km false northing.
    pub northing: f64,
}
