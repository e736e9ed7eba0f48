//! Quadratic seasonal trend fitting.
//!
//! Ordinary least squares of the diurnal temperature range on day-of-year and
//! its square, plus the mean-response confidence band derived from the fit.
//! Pure computation over records already in memory; nothing here touches the
//! network or the store, and models are recomputed on demand rather than
//! persisted.

use crate::trend::error::TrendError;
use crate::types::observation::ObservationRecord;
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Number of free parameters in `delta ~ 1 + day + day²`.
const PARAMETERS: usize = 3;

/// A fitted quadratic trend of `temp_delta` against day-of-year.
///
/// Stateless value object: it holds the coefficients plus the residual
/// variance and inverse normal matrix needed to price confidence intervals.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendModel {
    coefficients: [f64; 3],
    xtx_inv: [[f64; 3]; 3],
    residual_variance: f64,
    observations: usize,
    distinct_days: usize,
}

impl TrendModel {
    /// Intercept, linear and quadratic coefficients, in that order.
    pub fn coefficients(&self) -> [f64; 3] {
        self.coefficients
    }

    /// Number of rows the model was fitted on.
    pub fn observations(&self) -> usize {
        self.observations
    }

    /// Residual degrees of freedom, `n - 3`.
    pub fn residual_degrees_of_freedom(&self) -> usize {
        self.observations - PARAMETERS
    }

    /// Estimated residual variance (0 when the fit is exact).
    pub fn residual_variance(&self) -> f64 {
        self.residual_variance
    }

    /// The point prediction at a given day of year.
    pub fn fitted_value(&self, day_of_year: u32) -> f64 {
        let d = f64::from(day_of_year);
        self.coefficients[0] + self.coefficients[1] * d + self.coefficients[2] * d * d
    }
}

/// One row of a confidence band.
#[derive(Debug, Clone, PartialEq)]
pub struct BandPoint {
    pub day_of_year: u32,
    /// Fitted mean response.
    pub fit: f64,
    /// Lower confidence bound; `lower <= fit`.
    pub lower: f64,
    /// Upper confidence bound; `fit <= upper`.
    pub upper: f64,
}

/// An ordered confidence band around the fitted trend, one point per
/// requested day.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionBand {
    pub confidence_level: f64,
    pub points: Vec<BandPoint>,
}

/// Fits `temp_delta ~ 1 + day + day²` over the records matching `predicate`.
///
/// Fails with [`TrendError::InsufficientData`] when fewer than 3 rows match,
/// or when the matching rows cover fewer than 3 distinct day-of-year values
/// (the normal matrix is rank-deficient; a constant day is the degenerate
/// case).
pub fn fit(
    records: &[ObservationRecord],
    predicate: impl Fn(&ObservationRecord) -> bool,
) -> Result<TrendModel, TrendError> {
    let subset: Vec<(u32, f64)> = records
        .iter()
        .filter(|r| predicate(r))
        .map(|r| (r.day_of_year, r.temp_delta))
        .collect();
    let rows = subset.len();

    let mut days: Vec<u32> = subset.iter().map(|&(day, _)| day).collect();
    days.sort_unstable();
    days.dedup();
    let distinct_days = days.len();

    if rows < PARAMETERS || distinct_days < PARAMETERS {
        return Err(TrendError::InsufficientData {
            rows,
            distinct_days,
        });
    }

    // Normal equations: XtX is symmetric with entries sum(d^k), k = 0..=4.
    let mut power_sums = [0.0f64; 5];
    let mut moment = [0.0f64; 3];
    for &(day, delta) in &subset {
        let d = f64::from(day);
        let d2 = d * d;
        power_sums[0] += 1.0;
        power_sums[1] += d;
        power_sums[2] += d2;
        power_sums[3] += d2 * d;
        power_sums[4] += d2 * d2;
        moment[0] += delta;
        moment[1] += delta * d;
        moment[2] += delta * d2;
    }
    let xtx = [
        [power_sums[0], power_sums[1], power_sums[2]],
        [power_sums[1], power_sums[2], power_sums[3]],
        [power_sums[2], power_sums[3], power_sums[4]],
    ];
    let xtx_inv = invert3(&xtx).ok_or(TrendError::InsufficientData {
        rows,
        distinct_days,
    })?;

    let coefficients = [
        xtx_inv[0][0] * moment[0] + xtx_inv[0][1] * moment[1] + xtx_inv[0][2] * moment[2],
        xtx_inv[1][0] * moment[0] + xtx_inv[1][1] * moment[1] + xtx_inv[1][2] * moment[2],
        xtx_inv[2][0] * moment[0] + xtx_inv[2][1] * moment[1] + xtx_inv[2][2] * moment[2],
    ];

    let mut rss = 0.0;
    for &(day, delta) in &subset {
        let d = f64::from(day);
        let fitted = coefficients[0] + coefficients[1] * d + coefficients[2] * d * d;
        let residual = delta - fitted;
        rss += residual * residual;
    }
    let dof = rows - PARAMETERS;
    let residual_variance = if dof > 0 { rss / dof as f64 } else { 0.0 };

    Ok(TrendModel {
        coefficients,
        xtx_inv,
        residual_variance,
        observations: rows,
        distinct_days,
    })
}

/// Computes the fitted value and a two-sided mean-response confidence
/// interval for every requested day, in the order given.
///
/// Uses the standard OLS interval: half-width is the Student-t critical value
/// at `n - 3` degrees of freedom times the standard error of the mean at that
/// design point. Fails with [`TrendError::InsufficientData`] when no residual
/// degrees of freedom remain (`n == 3`) and with
/// [`TrendError::InvalidConfidenceLevel`] outside (0, 1).
pub fn predict(
    model: &TrendModel,
    days: &[u32],
    confidence_level: f64,
) -> Result<PredictionBand, TrendError> {
    if !(confidence_level > 0.0 && confidence_level < 1.0) {
        return Err(TrendError::InvalidConfidenceLevel(confidence_level));
    }
    let dof = model.residual_degrees_of_freedom();
    if dof == 0 {
        return Err(TrendError::InsufficientData {
            rows: model.observations,
            distinct_days: model.distinct_days,
        });
    }

    let t_dist = StudentsT::new(0.0, 1.0, dof as f64)
        .map_err(|_| TrendError::Distribution { dof })?;
    let critical = t_dist.inverse_cdf(1.0 - (1.0 - confidence_level) / 2.0);

    let points = days
        .iter()
        .map(|&day| {
            let d = f64::from(day);
            let design = [1.0, d, d * d];
            let fit = model.fitted_value(day);
            // Leverage of the design point, x' (XtX)^-1 x. Non-negative up to
            // rounding, so clamp before the square root.
            let mut leverage = 0.0;
            for i in 0..3 {
                for j in 0..3 {
                    leverage += design[i] * model.xtx_inv[i][j] * design[j];
                }
            }
            let half_width =
                critical * (model.residual_variance * leverage.max(0.0)).sqrt();
            BandPoint {
                day_of_year: day,
                fit,
                lower: fit - half_width,
                upper: fit + half_width,
            }
        })
        .collect();

    Ok(PredictionBand {
        confidence_level,
        points,
    })
}

/// The sorted distinct day-of-year domain of a subset; the domain a band is
/// usually predicted over.
pub fn fitted_days(
    records: &[ObservationRecord],
    predicate: impl Fn(&ObservationRecord) -> bool,
) -> Vec<u32> {
    let mut days: Vec<u32> = records
        .iter()
        .filter(|r| predicate(r))
        .map(|r| r.day_of_year)
        .collect();
    days.sort_unstable();
    days.dedup();
    days
}

/// Closed-form inverse of a 3x3 matrix via the adjugate; `None` when the
/// determinant is zero or not finite.
fn invert3(m: &[[f64; 3]; 3]) -> Option<[[f64; 3]; 3]> {
    let c00 = m[1][1] * m[2][2] - m[1][2] * m[2][1];
    let c01 = m[1][2] * m[2][0] - m[1][0] * m[2][2];
    let c02 = m[1][0] * m[2][1] - m[1][1] * m[2][0];
    let det = m[0][0] * c00 + m[0][1] * c01 + m[0][2] * c02;
    if !det.is_finite() || det == 0.0 {
        return None;
    }
    let inv_det = 1.0 / det;
    Some([
        [
            c00 * inv_det,
            (m[0][2] * m[2][1] - m[0][1] * m[2][2]) * inv_det,
            (m[0][1] * m[1][2] - m[0][2] * m[1][1]) * inv_det,
        ],
        [
            c01 * inv_det,
            (m[0][0] * m[2][2] - m[0][2] * m[2][0]) * inv_det,
            (m[0][2] * m[1][0] - m[0][0] * m[1][2]) * inv_det,
        ],
        [
            c02 * inv_det,
            (m[0][1] * m[2][0] - m[0][0] * m[2][1]) * inv_det,
            (m[0][0] * m[1][1] - m[0][1] * m[1][0]) * inv_det,
        ],
    ])
}
