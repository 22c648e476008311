//! Forecast request parsing and validation.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const MIN_SAMPLES: usize = 3;
const DEFAULT_PERIODS: u32 = 5;
const MAX_PERIODS: u32 = 100;

/// Estimator used to project the series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastMethod {
    /// Least-squares line through the sample indices.
    #[default]
    Linear,
    /// Recursive simple moving average.
    MovingAverage,
    /// Simple exponential smoothing.
    ExponentialSmoothing,
}

/// Timestamp of one sample, as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SampleTime {
    /// Date or RFC 3339 instant.
    Text(String),
    /// Plain number such as a sequence index or epoch offset.
    Number(f64),
}

/// One observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// When the value was observed.
    pub timestamp: SampleTime,
    /// Observed value.
    pub value: f64,
}

/// Forecast input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRequest {
    /// Observed series, in any order.
    pub data: Vec<Sample>,
    /// Number of future steps; 5 when absent.
    #[serde(default)]
    pub periods: Option<u32>,
    /// Estimator; linear when absent.
    #[serde(default)]
    pub method: ForecastMethod,
}

/// Validation failures for forecast input.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ForecastError {
    /// Fewer than three samples.
    #[error("at least 3 data points required, got {0}")]
    TooFewSamples(usize),
    /// Horizon outside 1 to 100.
    #[error("periods must be between 1 and 100, got {0}")]
    PeriodsOutOfRange(u32),
    /// A text timestamp is not a date or RFC 3339 instant.
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),
    /// A value or numeric timestamp is NaN or infinite.
    #[error("data points must be finite numbers")]
    NonFinite,
}

/// Sample position on the time axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Instant {
    Moment(DateTime<Utc>),
    Number(f64),
}

impl Instant {
    /// Sort key in epoch milliseconds; plain numbers are taken as given.
    #[expect(
        clippy::cast_precision_loss,
        reason = "epoch milliseconds stay well inside the f64 mantissa"
    )]
    pub(crate) fn sort_key(self) -> f64 {
        match self {
            Self::Moment(moment) => moment.timestamp_millis() as f64,
            Self::Number(value) => value,
        }
    }
}

/// Validated, time-ordered series.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Series {
    pub(crate) instants: Vec<Instant>,
    pub(crate) values: Vec<f64>,
    pub(crate) periods: u32,
    pub(crate) method: ForecastMethod,
}

impl ForecastRequest {
    /// Validates the request and orders the samples by time.
    pub(crate) fn into_series(self) -> Result<Series, ForecastError> {
        if self.data.len() < MIN_SAMPLES {
            return Err(ForecastError::TooFewSamples(self.data.len()));
        }
        let periods = self.periods.unwrap_or(DEFAULT_PERIODS);
        if !(1..=MAX_PERIODS).contains(&periods) {
            return Err(ForecastError::PeriodsOutOfRange(periods));
        }

        let mut points = self
            .data
            .into_iter()
            .map(|sample| {
                if !sample.value.is_finite() {
                    return Err(ForecastError::NonFinite);
                }
                Ok((parse_time(sample.timestamp)?, sample.value))
            })
            .collect::<Result<Vec<_>, _>>()?;
        points.sort_by(|left, right| left.0.sort_key().total_cmp(&right.0.sort_key()));

        let (instants, values) = points.into_iter().unzip();
        Ok(Series {
            instants,
            values,
            periods,
            method: self.method,
        })
    }
}

fn parse_time(timestamp: SampleTime) -> Result<Instant, ForecastError> {
    match timestamp {
        SampleTime::Number(value) if value.is_finite() => Ok(Instant::Number(value)),
        SampleTime::Number(_) => Err(ForecastError::NonFinite),
        SampleTime::Text(text) => parse_text(text.trim())
            .map(Instant::Moment)
            .ok_or(ForecastError::InvalidTimestamp(text)),
    }
}

fn parse_text(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(moment) = DateTime::parse_from_rfc3339(text) {
        return Some(moment.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
