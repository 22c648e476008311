//! Direction of a series.
#![expect(
    clippy::float_arithmetic,
    reason = "trend bands are relative thresholds on f64 means"
)]

use super::estimators::mean;
use serde::{Deserialize, Serialize};

const UP_FACTOR: f64 = 1.05;
const DOWN_FACTOR: f64 = 0.95;

/// Overall movement of the observed values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    /// Second half averages more than 5% above the first.
    Up,
    /// Second half averages more than 5% below the first.
    Down,
    /// Neither.
    #[default]
    Stable,
}

impl Trend {
    /// Compares the means of the two halves of `values`.
    ///
    /// The first half holds the floor of half the samples.
    #[must_use]
    pub fn of(values: &[f64]) -> Self {
        let (first, second) = values.split_at(values.len().div_euclid(2));
        let first_mean = mean(first);
        let second_mean = mean(second);
        if second_mean > first_mean * UP_FACTOR {
            Self::Up
        } else if second_mean < first_mean * DOWN_FACTOR {
            Self::Down
        } else {
            Self::Stable
        }
    }
}
