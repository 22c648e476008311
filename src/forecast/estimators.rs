//! Series estimators: least squares, moving average and exponential smoothing.
#![expect(
    clippy::float_arithmetic,
    reason = "estimators are floating-point statistics by nature"
)]

use serde::Serialize;

const MOVING_AVERAGE_WINDOW: usize = 3;
const SMOOTHING_ALPHA: f64 = 0.3;

/// Fit diagnostics reported alongside the predictions.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ForecastMetrics {
    /// Least-squares fit.
    #[serde(rename_all = "camelCase")]
    Linear {
        /// Change per step.
        slope: f64,
        /// Value at the first sample.
        intercept: f64,
        /// Coefficient of determination.
        r_squared: f64,
        /// Residual standard error.
        standard_error: f64,
    },
    /// Recursive moving average.
    #[serde(rename_all = "camelCase")]
    MovingAverage {
        /// Number of trailing values averaged.
        window_size: u32,
        /// Walk-forward mean squared error.
        mse: f64,
        /// Human-readable label.
        method: String,
    },
    /// Simple exponential smoothing.
    ExponentialSmoothing {
        /// Smoothing factor.
        alpha: f64,
        /// One-step-ahead mean squared error.
        mse: f64,
        /// Human-readable label.
        method: String,
    },
}

/// Raw estimator output before rounding.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Estimate {
    pub(crate) predictions: Vec<f64>,
    pub(crate) confidence: f64,
    pub(crate) metrics: ForecastMetrics,
}

pub(crate) fn to_f64(count: usize) -> f64 {
    u32::try_from(count).map_or(f64::from(u32::MAX), f64::from)
}

pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / to_f64(values.len())
}

pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10_f64.powi(places);
    (value * factor).round() / factor
}

fn spread(values: &[f64]) -> f64 {
    let (low, high) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), value| {
            (lo.min(*value), hi.max(*value))
        });
    high - low
}

/// Confidence of a residual-based estimator.
///
/// A constant series has no range to normalise against: a perfect fit
/// scores one and any residual scores zero.
fn residual_confidence(mse: f64, values: &[f64]) -> f64 {
    let range = spread(values);
    if range <= 0.0 {
        return if mse <= 0.0 { 1.0 } else { 0.0 };
    }
    (1.0 - mse / range.powi(2)).max(0.0)
}

/// Fits `value = slope * index + intercept` and extends the line.
pub(crate) fn linear(values: &[f64], periods: u32) -> Estimate {
    let count = to_f64(values.len());
    let x_mean = (count - 1.0) / 2.0;
    let y_mean = mean(values);

    let (numerator, denominator) =
        values
            .iter()
            .enumerate()
            .fold((0.0, 0.0), |(num, den), (index, value)| {
                let dx = to_f64(index) - x_mean;
                (num + dx * (value - y_mean), den + dx * dx)
            });
    let slope = if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    };
    let intercept = y_mean - slope * x_mean;

    let predictions = (1..=periods)
        .map(|step| slope * (count - 1.0 + f64::from(step)) + intercept)
        .collect();

    let ss_res: f64 = values
        .iter()
        .enumerate()
        .map(|(index, value)| (value - (slope * to_f64(index) + intercept)).powi(2))
        .sum();
    let ss_tot: f64 = values.iter().map(|value| (value - y_mean).powi(2)).sum();
    let r_squared = if ss_tot > 0.0 {
        1.0 - ss_res / ss_tot
    } else {
        0.0
    };
    let standard_error = (ss_res / (count - 2.0)).sqrt();

    Estimate {
        predictions,
        confidence: r_squared.clamp(0.0, 1.0),
        metrics: ForecastMetrics::Linear {
            slope: round_to(slope, 4),
            intercept: round_to(intercept, 4),
            r_squared: round_to(r_squared, 4),
            standard_error: round_to(standard_error, 4),
        },
    }
}

/// Repeatedly averages the trailing window, feeding each prediction back in.
pub(crate) fn moving_average(values: &[f64], periods: u32) -> Estimate {
    let mut working = values.to_vec();
    let mut predictions = Vec::new();
    for _ in 0..periods {
        let trailing: Vec<f64> = working
            .iter()
            .rev()
            .take(MOVING_AVERAGE_WINDOW)
            .copied()
            .collect();
        let next = mean(&trailing);
        predictions.push(next);
        working.push(next);
    }

    let mse = walk_forward_mse(values, MOVING_AVERAGE_WINDOW);
    let window_size = u32::try_from(MOVING_AVERAGE_WINDOW).unwrap_or(u32::MAX);
    Estimate {
        predictions,
        confidence: residual_confidence(mse, values),
        metrics: ForecastMetrics::MovingAverage {
            window_size,
            mse: round_to(mse, 4),
            method: format!("Simple Moving Average (window={window_size})"),
        },
    }
}

/// Mean squared error of predicting each value from the preceding window.
fn walk_forward_mse(values: &[f64], window: usize) -> f64 {
    let errors: Vec<f64> = values
        .windows(window + 1)
        .filter_map(<[f64]>::split_last)
        .map(|(actual, history)| (actual - mean(history)).powi(2))
        .collect();
    mean(&errors)
}

/// Smooths the series and projects its final level flat.
pub(crate) fn exponential_smoothing(values: &[f64], periods: u32) -> Estimate {
    let Some((first, rest)) = values.split_first() else {
        return Estimate {
            predictions: Vec::new(),
            confidence: 0.0,
            metrics: smoothing_metrics(0.0),
        };
    };

    let (level, squared_error) = rest.iter().fold((*first, 0.0), |(current, total), value| {
        let error = value - current;
        (
            SMOOTHING_ALPHA * value + (1.0 - SMOOTHING_ALPHA) * current,
            total + error * error,
        )
    });
    let mse = if rest.is_empty() {
        0.0
    } else {
        squared_error / to_f64(rest.len())
    };

    let predictions = (0..periods).map(|_| level).collect();
    Estimate {
        predictions,
        confidence: residual_confidence(mse, values),
        metrics: smoothing_metrics(mse),
    }
}

fn smoothing_metrics(mse: f64) -> ForecastMetrics {
    ForecastMetrics::ExponentialSmoothing {
        alpha: SMOOTHING_ALPHA,
        mse: round_to(mse, 4),
        method: "Exponential Smoothing".to_owned(),
    }
}
