//! Time-series forecasting over small in-memory series.
//!
//! [`forecast`] sorts the samples, fits one of three estimators, labels the
//! overall trend and projects future timestamps at a fixed spacing of one
//! day (text timestamps) or one unit (numeric timestamps).

mod estimators;
mod report;
mod request;
mod trend;

pub use estimators::ForecastMetrics;
pub use report::{ForecastReport, FutureTimestamp, HistoricalStats, PredictedPoint, forecast};
pub use request::{ForecastError, ForecastMethod, ForecastRequest, Sample, SampleTime};
pub use trend::Trend;

#[cfg(test)]
mod tests;
