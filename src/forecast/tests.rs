//! Unit tests for the forecasting estimators and report assembly.

use super::{
    ForecastError, ForecastMethod, ForecastMetrics, ForecastRequest, FutureTimestamp, Sample,
    SampleTime, Trend, forecast,
};
use rstest::rstest;

fn numbered(values: &[f64]) -> Vec<Sample> {
    values
        .iter()
        .zip(1_u32..)
        .map(|(value, index)| Sample {
            timestamp: SampleTime::Number(f64::from(index)),
            value: *value,
        })
        .collect()
}

fn request(values: &[f64], method: ForecastMethod) -> ForecastRequest {
    ForecastRequest {
        data: numbered(values),
        periods: None,
        method,
    }
}

#[expect(clippy::float_arithmetic, reason = "tolerance comparison")]
fn approx(left: f64, right: f64) -> bool {
    (left - right).abs() < 1e-9
}

#[rstest]
fn fewer_than_three_samples_are_rejected() {
    let result = forecast(request(&[1.0, 2.0], ForecastMethod::Linear));
    assert_eq!(result, Err(ForecastError::TooFewSamples(2)));
}

#[rstest]
#[case(0)]
#[case(101)]
fn periods_outside_range_are_rejected(#[case] periods: u32) {
    let mut input = request(&[1.0, 2.0, 3.0], ForecastMethod::Linear);
    input.periods = Some(periods);
    assert_eq!(
        forecast(input),
        Err(ForecastError::PeriodsOutOfRange(periods))
    );
}

#[rstest]
fn unparseable_text_timestamp_is_rejected() {
    let mut input = request(&[1.0, 2.0, 3.0], ForecastMethod::Linear);
    input.data.push(Sample {
        timestamp: SampleTime::Text("yesterday".to_owned()),
        value: 4.0,
    });
    assert!(matches!(
        forecast(input),
        Err(ForecastError::InvalidTimestamp(_))
    ));
}

#[rstest]
fn linear_series_extends_exactly() {
    let report = forecast(request(&[1.0, 2.0, 3.0, 4.0, 5.0], ForecastMethod::Linear))
        .expect("forecast should succeed");

    let values: Vec<f64> = report.predictions.iter().map(|p| p.value).collect();
    assert_eq!(values, vec![6.0, 7.0, 8.0, 9.0, 10.0]);
    assert!(approx(report.confidence, 1.0));
    assert_eq!(report.trend, Trend::Up);
    assert_eq!(
        report.metrics,
        ForecastMetrics::Linear {
            slope: 1.0,
            intercept: 1.0,
            r_squared: 1.0,
            standard_error: 0.0,
        }
    );
}

#[rstest]
fn flat_series_has_zero_linear_confidence() {
    let report = forecast(request(&[4.0, 4.0, 4.0], ForecastMethod::Linear))
        .expect("forecast should succeed");
    assert!(approx(report.confidence, 0.0));
    assert_eq!(report.trend, Trend::Stable);
}

#[rstest]
#[case(ForecastMethod::ExponentialSmoothing)]
#[case(ForecastMethod::MovingAverage)]
fn constant_series_is_fitted_with_full_confidence(#[case] method: ForecastMethod) {
    let report = forecast(request(&[5.0, 5.0, 5.0, 5.0, 5.0], method))
        .expect("forecast should succeed");

    assert!(report.predictions.iter().all(|p| approx(p.value, 5.0)));
    assert!(approx(report.confidence, 1.0));
    assert_eq!(report.trend, Trend::Stable);
}

#[rstest]
fn smoothing_projects_final_level() {
    let report = forecast(request(&[10.0, 20.0, 30.0], ForecastMethod::ExponentialSmoothing))
        .expect("forecast should succeed");

    // 10 -> 13 -> 18.1
    assert!(report.predictions.iter().all(|p| approx(p.value, 18.1)));
    let ForecastMetrics::ExponentialSmoothing { alpha, mse, method } = report.metrics else {
        panic!("expected smoothing metrics");
    };
    assert!(approx(alpha, 0.3));
    // ((20 - 10)^2 + (30 - 13)^2) / 2
    assert!(approx(mse, 194.5));
    assert_eq!(method, "Exponential Smoothing");
}

#[rstest]
fn moving_average_feeds_predictions_back() {
    let report = forecast(ForecastRequest {
        periods: Some(2),
        ..request(&[3.0, 6.0, 9.0, 12.0], ForecastMethod::MovingAverage)
    })
    .expect("forecast should succeed");

    // mean(6, 9, 12) = 9, then mean(9, 12, 9) = 10
    let values: Vec<f64> = report.predictions.iter().map(|p| p.value).collect();
    assert_eq!(values, vec![9.0, 10.0]);
    let ForecastMetrics::MovingAverage {
        window_size,
        mse,
        method,
    } = report.metrics
    else {
        panic!("expected moving average metrics");
    };
    assert_eq!(window_size, 3);
    // Only 12 is predicted from history: (12 - 6)^2
    assert!(approx(mse, 36.0));
    assert_eq!(method, "Simple Moving Average (window=3)");
    // 1 - 36 / 81
    assert!(approx(report.confidence, 0.56));
}

#[rstest]
#[case(&[10.0, 10.0, 20.0, 20.0], Trend::Up)]
#[case(&[20.0, 20.0, 10.0, 10.0], Trend::Down)]
#[case(&[100.0, 100.0, 104.0, 104.0], Trend::Stable)]
fn trend_compares_halves(#[case] values: &[f64], #[case] expected: Trend) {
    assert_eq!(Trend::of(values), expected);
}

#[rstest]
fn samples_are_sorted_before_fitting() {
    let data = vec![
        Sample {
            timestamp: SampleTime::Number(3.0),
            value: 30.0,
        },
        Sample {
            timestamp: SampleTime::Number(1.0),
            value: 10.0,
        },
        Sample {
            timestamp: SampleTime::Number(2.0),
            value: 20.0,
        },
    ];
    let report = forecast(ForecastRequest {
        data,
        periods: Some(1),
        method: ForecastMethod::Linear,
    })
    .expect("forecast should succeed");

    assert_eq!(report.historical_stats.last_value, 30.0);
    assert_eq!(report.predictions.first().map(|p| p.value), Some(40.0));
    assert_eq!(
        report.predictions.first().map(|p| p.timestamp.clone()),
        Some(FutureTimestamp::Number(4.0))
    );
}

#[rstest]
fn text_timestamps_advance_by_days() {
    let data = ["2024-01-01", "2024-01-02", "2024-01-03T00:00:00Z"]
        .into_iter()
        .zip([1.0, 2.0, 3.0])
        .map(|(stamp, value)| Sample {
            timestamp: SampleTime::Text(stamp.to_owned()),
            value,
        })
        .collect();
    let report = forecast(ForecastRequest {
        data,
        periods: Some(2),
        method: ForecastMethod::Linear,
    })
    .expect("forecast should succeed");

    let stamps: Vec<FutureTimestamp> = report
        .predictions
        .into_iter()
        .map(|p| p.timestamp)
        .collect();
    assert_eq!(
        stamps,
        vec![
            FutureTimestamp::Text("2024-01-04T00:00:00.000Z".to_owned()),
            FutureTimestamp::Text("2024-01-05T00:00:00.000Z".to_owned()),
        ]
    );
}

#[rstest]
fn report_serialises_with_camel_case_fields() {
    let report = forecast(request(&[1.0, 2.0, 3.0], ForecastMethod::Linear))
        .expect("forecast should succeed");
    let json = serde_json::to_value(&report).expect("serialise");

    assert_eq!(json["method"], "linear");
    assert_eq!(json["historicalStats"]["count"], 3);
    assert_eq!(json["metrics"]["rSquared"], 1.0);
}

#[rstest]
fn request_parses_mixed_timestamp_forms() {
    let input: ForecastRequest = serde_json::from_value(serde_json::json!({
        "data": [
            {"timestamp": "2024-01-01", "value": 1},
            {"timestamp": 1_704_153_600_000_u64, "value": 2},
            {"timestamp": "2024-01-03", "value": 3}
        ],
        "method": "moving_average"
    }))
    .expect("request should parse");

    assert_eq!(input.method, ForecastMethod::MovingAverage);
    assert_eq!(input.periods, None);
    assert!(matches!(
        input.data.get(1).map(|s| &s.timestamp),
        Some(SampleTime::Number(_))
    ));
}
