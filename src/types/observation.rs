//! Row types for daily climate observations: the raw integer rows as GHCND
//! serves them, and the normalized analysis schema derived from them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A daily observation element that can be requested from the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variable {
    /// Daily maximum temperature, tenths of a degree Celsius.
    Tmax,
    /// Daily minimum temperature, tenths of a degree Celsius.
    Tmin,
    /// Daily precipitation total, tenths of a millimeter.
    Prcp,
}

impl Variable {
    /// The GHCND element code used on the wire and as the CSV column header.
    pub fn element_code(self) -> &'static str {
        match self {
            Variable::Tmax => "TMAX",
            Variable::Tmin => "TMIN",
            Variable::Prcp => "PRCP",
        }
    }

    /// All elements the pipeline works with.
    pub fn all() -> [Variable; 3] {
        [Variable::Tmax, Variable::Tmin, Variable::Prcp]
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.element_code())
    }
}

/// One raw daily row for one station, exactly as the source reports it.
///
/// Values are integers in tenths (degrees Celsius for the temperatures,
/// millimeters for precipitation). The source can null an individual element
/// inside an otherwise-present row, so each element is optional here; dates
/// are not guaranteed contiguous — missing days are simply absent rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawObservation {
    /// External GHCND monitor identifier.
    pub station_id: String,
    /// Observation date (station-local calendar day).
    pub date: NaiveDate,
    /// Maximum temperature, tenths of a degree Celsius.
    pub tmax: Option<i32>,
    /// Minimum temperature, tenths of a degree Celsius.
    pub tmin: Option<i32>,
    /// Precipitation total, tenths of a millimeter.
    pub prcp: Option<i32>,
}

/// One normalized analysis-ready row: a raw observation joined to its station
/// and converted to physical units and calendar fields.
///
/// Derived deterministically by [`crate::normalize`]. Invariants:
/// `temp_delta == temp_max - temp_min`, and every unit field is the source
/// tenths value divided by 10.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationRecord {
    /// External GHCND monitor identifier.
    pub station_id: String,
    /// Display name of the station, from the registry.
    pub station_name: String,
    /// Observation date.
    pub date: NaiveDate,
    /// ISO calendar year of `date`.
    pub year: i32,
    /// English month name ("January" .. "December").
    pub month_name: String,
    /// Day of year, 1..=366 (leap years inclusive).
    pub day_of_year: u32,
    /// Minimum temperature in degrees Celsius.
    pub temp_min: f64,
    /// Maximum temperature in degrees Celsius.
    pub temp_max: f64,
    /// Diurnal temperature range: `temp_max - temp_min`.
    pub temp_delta: f64,
    /// Precipitation total in millimeters.
    pub precipitation: f64,
    /// Station latitude in decimal degrees.
    pub lat: f64,
    /// Station longitude in decimal degrees.
    pub lon: f64,
}
