//! Assembles the forecast response.
#![expect(
    clippy::float_arithmetic,
    reason = "numeric timestamps advance by whole units"
)]

use super::{
    Trend,
    estimators::{self, ForecastMetrics, round_to},
    request::{ForecastError, ForecastMethod, ForecastRequest, Instant},
};
use chrono::{Duration, SecondsFormat};
use serde::Serialize;

/// Timestamp of a projected period, in the form of the last sample.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FutureTimestamp {
    /// ISO 8601 instant one day per period after the last sample.
    Text(String),
    /// Last numeric timestamp plus the period number.
    Number(f64),
}

/// One projected value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictedPoint {
    /// One-based period number.
    pub period: u32,
    /// Projected timestamp.
    pub timestamp: FutureTimestamp,
    /// Projected value, rounded to four decimals.
    pub value: f64,
}

/// Summary of the observed series.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalStats {
    /// Number of samples.
    pub count: usize,
    /// Smallest value.
    pub min: f64,
    /// Largest value.
    pub max: f64,
    /// Mean value, rounded to four decimals.
    pub mean: f64,
    /// Most recent value.
    pub last_value: f64,
}

/// Complete forecast.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastReport {
    /// Estimator used.
    pub method: ForecastMethod,
    /// Number of projected periods.
    pub periods: u32,
    /// Projected values.
    pub predictions: Vec<PredictedPoint>,
    /// Confidence in `[0, 1]`, rounded to two decimals.
    pub confidence: f64,
    /// Direction of the observed series.
    pub trend: Trend,
    /// Estimator diagnostics.
    pub metrics: ForecastMetrics,
    /// Observed series summary.
    pub historical_stats: HistoricalStats,
}

/// Produces a forecast for `request`.
///
/// # Errors
///
/// Returns [`ForecastError`] when the request fails validation.
pub fn forecast(request: ForecastRequest) -> Result<ForecastReport, ForecastError> {
    let series = request.into_series()?;
    let values = series.values.as_slice();

    let estimate = match series.method {
        ForecastMethod::Linear => estimators::linear(values, series.periods),
        ForecastMethod::MovingAverage => estimators::moving_average(values, series.periods),
        ForecastMethod::ExponentialSmoothing => {
            estimators::exponential_smoothing(values, series.periods)
        }
    };

    let last_instant = series.instants.last().copied();
    let predictions = estimate
        .predictions
        .iter()
        .zip(1..=series.periods)
        .map(|(value, period)| PredictedPoint {
            period,
            timestamp: future_timestamp(last_instant, period),
            value: round_to(*value, 4),
        })
        .collect();

    Ok(ForecastReport {
        method: series.method,
        periods: series.periods,
        predictions,
        confidence: round_to(estimate.confidence, 2),
        trend: Trend::of(values),
        metrics: estimate.metrics,
        historical_stats: historical_stats(values),
    })
}

fn future_timestamp(last: Option<Instant>, period: u32) -> FutureTimestamp {
    match last {
        Some(Instant::Moment(moment)) => FutureTimestamp::Text(
            (moment + Duration::days(i64::from(period)))
                .to_rfc3339_opts(SecondsFormat::Millis, true),
        ),
        Some(Instant::Number(value)) => FutureTimestamp::Number(value + f64::from(period)),
        None => FutureTimestamp::Number(f64::from(period)),
    }
}

fn historical_stats(values: &[f64]) -> HistoricalStats {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    HistoricalStats {
        count: values.len(),
        min,
        max,
        mean: round_to(estimators::mean(values), 4),
        last_value: values.last().copied().unwrap_or_default(),
    }
}
