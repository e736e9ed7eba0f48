use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProjectionError {
    #[error("latitude {0}° is outside the transverse Mercator domain [-80°, 84°]")]
    LatitudeOutOfRange(f64),

    #[error("UTM zone {0} is not a valid zone (expected 1..=60)")]
    InvalidZone(u8),
}
