//! Forward transverse Mercator projection of the station list onto a UTM
//! grid, so downstream spatial analysis can work in meters instead of
//! degrees.

use crate::stations::error::ProjectionError;
use crate::types::station::{ProjectedStation, Station};
use polars::prelude::*;

// WGS84 ellipsoid.
const SEMI_MAJOR_AXIS_M: f64 = 6_378_137.0;
const FLATTENING: f64 = 1.0 / 298.257_223_563;

// UTM conventions.
const SCALE_FACTOR: f64 = 0.9996;
const FALSE_EASTING_M: f64 = 500_000.0;
const FALSE_NORTHING_SOUTH_M: f64 = 10_000_000.0;

// The transverse Mercator series is only valid inside this latitude band.
const MIN_LATITUDE_DEG: f64 = -80.0;
const MAX_LATITUDE_DEG: f64 = 84.0;

/// Target coordinate reference system: one UTM zone and hemisphere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UtmZone {
    /// Zone number, 1..=60.
    pub zone: u8,
    /// True for the northern hemisphere.
    pub north: bool,
}

impl UtmZone {
    pub fn north(zone: u8) -> Self {
        Self { zone, north: true }
    }

    pub fn south(zone: u8) -> Self {
        Self { zone, north: false }
    }

    /// Central meridian of the zone in decimal degrees.
    pub fn central_meridian_deg(self) -> f64 {
        f64::from(self.zone) * 6.0 - 183.0
    }
}

/// Projects every station onto the given UTM grid.
///
/// Output order matches input order. Fails with
/// [`ProjectionError::LatitudeOutOfRange`] if any station lies outside the
/// projection's valid latitude band (none of the registry stations do, by
/// construction) and with [`ProjectionError::InvalidZone`] for a zone number
/// outside 1..=60.
///
/// ```
/// use stationtrend::{monitored_stations, project, MONITOR_ZONE};
///
/// let planar = project(&monitored_stations(), MONITOR_ZONE).unwrap();
/// assert_eq!(planar.len(), monitored_stations().len());
/// ```
pub fn project(
    stations: &[Station],
    zone: UtmZone,
) -> Result<Vec<ProjectedStation>, ProjectionError> {
    if zone.zone == 0 || zone.zone > 60 {
        return Err(ProjectionError::InvalidZone(zone.zone));
    }
    stations
        .iter()
        .map(|station| {
            let (easting, northing) = utm_forward(station.lat, station.lon, zone)?;
            Ok(ProjectedStation {
                id: station.id.clone(),
                name: station.name.clone(),
                easting,
                northing,
            })
        })
        .collect()
}

/// Converts a projected station list to the tabular shape the store persists.
pub fn projected_to_dataframe(stations: &[ProjectedStation]) -> PolarsResult<DataFrame> {
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
            "easting".into(),
            stations.iter().map(|s| s.easting).collect::<Vec<f64>>(),
        ),
        Column::new(
            "northing".into(),
            stations.iter().map(|s| s.northing).collect::<Vec<f64>>(),
        ),
    ])
}

/// Snyder's forward series for the transverse Mercator projection on the
/// WGS84 ellipsoid. Returns (easting, northing) in meters.
fn utm_forward(lat_deg: f64, lon_deg: f64, zone: UtmZone) -> Result<(f64, f64), ProjectionError> {
    if !(MIN_LATITUDE_DEG..=MAX_LATITUDE_DEG).contains(&lat_deg) {
        return Err(ProjectionError::LatitudeOutOfRange(lat_deg));
    }

    let e2 = FLATTENING * (2.0 - FLATTENING);
    let ep2 = e2 / (1.0 - e2);

    let lat = lat_deg.to_radians();
    let lon = lon_deg.to_radians();
    let lon0 = zone.central_meridian_deg().to_radians();

    let sin_lat = lat.sin();
    let cos_lat = lat.cos();
    let tan_lat = lat.tan();

    // Radius of curvature in the prime vertical.
    let n = SEMI_MAJOR_AXIS_M / (1.0 - e2 * sin_lat * sin_lat).sqrt();
    let t = tan_lat * tan_lat;
    let c = ep2 * cos_lat * cos_lat;
    let a = cos_lat * (lon - lon0);

    let a2 = a * a;
    let a3 = a2 * a;
    let a4 = a2 * a2;
    let a5 = a4 * a;
    let a6 = a4 * a2;

    let m = meridian_arc(lat, e2);

    let easting = SCALE_FACTOR
        * n
        * (a + (1.0 - t + c) * a3 / 6.0
            + (5.0 - 18.0 * t + t * t + 72.0 * c - 58.0 * ep2) * a5 / 120.0)
        + FALSE_EASTING_M;

    let mut northing = SCALE_FACTOR
        * (m + n
            * tan_lat
            * (a2 / 2.0
                + (5.0 - t + 9.0 * c + 4.0 * c * c) * a4 / 24.0
                + (61.0 - 58.0 * t + t * t + 600.0 * c - 330.0 * ep2) * a6 / 720.0));
    if !zone.north {
        northing += FALSE_NORTHING_SOUTH_M;
    }

    Ok((easting, northing))
}

/// Meridian arc length from the equator to `lat` (radians), in meters.
fn meridian_arc(lat: f64, e2: f64) -> f64 {
    let e4 = e2 * e2;
    let e6 = e4 * e2;
    SEMI_MAJOR_AXIS_M
        * ((1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0) * lat
            - (3.0 * e2 / 8.0 + 3.0 * e4 / 32.0 + 45.0 * e6 / 1024.0) * (2.0 * lat).sin()
            + (15.0 * e4 / 256.0 + 45.0 * e6 / 1024.0) * (4.0 * lat).sin()
            - (35.0 * e6 / 3072.0) * (6.0 * lat).sin())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn station(id: &str, lat: f64, lon: f64) -> Station {
        Station {
            id: id.to_string(),
            name: id.to_string(),
            lat,
            lon,
        }
    }

    #[test]
    fn central_meridian_on_equator_is_the_grid_origin() {
        let zone = UtmZone::north(16);
        let (easting, northing) =
            utm_forward(0.0, zone.central_meridian_deg(), zone).unwrap();
        assert!((easting - FALSE_EASTING_M).abs() < 1e-6);
        assert!(northing.abs() < 1e-6);
    }

    #[test]
    fn one_equatorial_degree_of_longitude_is_about_111_km() {
        let zone = UtmZone::north(16);
        let (easting, _) =
            utm_forward(0.0, zone.central_meridian_deg() + 1.0, zone).unwrap();
        let meters_east = easting - FALSE_EASTING_M;
        // 111.32 km per degree, shrunk by the 0.9996 grid scale factor.
        assert!(
            (111_100.0..111_500.0).contains(&meters_east),
            "unexpected easting offset: {meters_east}"
        );
    }

    #[test]
    fn easting_grows_eastward_and_northing_grows_northward() {
        let zone = UtmZone::north(16);
        let west = utm_forward(33.0, -88.0, zone).unwrap();
        let east = utm_forward(33.0, -86.0, zone).unwrap();
        assert!(east.0 > west.0);

        let south = utm_forward(33.0, -87.0, zone).unwrap();
        let north = utm_forward(35.0, -87.0, zone).unwrap();
        assert!(north.1 > south.1);
    }

    #[test]
    fn forty_five_degrees_north_lands_near_the_known_meridian_arc() {
        let zone = UtmZone::north(31);
        let (_, northing) = utm_forward(45.0, zone.central_meridian_deg(), zone).unwrap();
        // Meridian arc to 45°N is ~4 984 944 m; scaled by 0.9996.
        assert!(
            (4_975_000.0..4_990_000.0).contains(&northing),
            "unexpected northing: {northing}"
        );
    }

    #[test]
    fn southern_hemisphere_gets_the_false_northing() {
        let zone = UtmZone::south(33);
        let (_, northing) = utm_forward(-10.0, zone.central_meridian_deg(), zone).unwrap();
        assert!(
            (8_800_000.0..9_000_000.0).contains(&northing),
            "unexpected southern northing: {northing}"
        );
    }

    #[test]
    fn latitude_outside_the_band_is_rejected() {
        let stations = vec![station("X", 85.0, 10.0)];
        let err = project(&stations, UtmZone::north(32)).unwrap_err();
        assert!(matches!(err, ProjectionError::LatitudeOutOfRange(lat) if lat == 85.0));
    }

    #[test]
    fn invalid_zone_is_rejected() {
        let stations = vec![station("X", 10.0, 10.0)];
        assert!(matches!(
            project(&stations, UtmZone::north(0)),
            Err(ProjectionError::InvalidZone(0))
        ));
        assert!(matches!(
            project(&stations, UtmZone::north(61)),
            Err(ProjectionError::InvalidZone(61))
        ));
    }

    #[test]
    fn projection_preserves_identity_and_order() {
        let stations = vec![station("A", 10.0, 9.0), station("B", 11.0, 9.5)];
        let projected = project(&stations, UtmZone::north(32)).unwrap();
        assert_eq!(projected.len(), 2);
        assert_eq!(projected[0].id, "A");
        assert_eq!(projected[1].id, "B");
        assert_eq!(projected[0].name, "A");
    }
}
