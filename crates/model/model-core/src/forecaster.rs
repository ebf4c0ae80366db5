//! Seasonal one-step forecasting
//!
//! Refits a fresh [`Sarima`] per metric on every call and projects one step
//! past the last observation. No state survives between calls.

use chrono::{Duration, NaiveDateTime};
use dataset_core::{DatasetError, SeriesFrame};
use model_spi::{ForecastResult, Metric, ModelError, Predictor, Result};
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::sarima::{ArimaOrder, Sarima, SeasonalOrder};

/// Minutes between samples the default seasonal period assumes.
pub const SAMPLING_INTERVAL_MINUTES: i64 = 15;

/// Seasonal forecaster
#[derive(Debug, Clone)]
pub struct SeasonalForecaster {
    order: ArimaOrder,
    seasonal: SeasonalOrder,
    max_iterations: usize,
    /// Offset of the forecast timestamp from the last observation
    horizon_minutes: i64,
    /// Sampling interval the seasonal period is defined against
    interval_minutes: i64,
    /// Reject series whose median spacing differs from `interval_minutes`
    strict_interval: bool,
}

impl Default for SeasonalForecaster {
    fn default() -> Self {
        Self {
            order: ArimaOrder::default(),
            seasonal: SeasonalOrder::default(),
            max_iterations: 2000,
            horizon_minutes: SAMPLING_INTERVAL_MINUTES,
            interval_minutes: SAMPLING_INTERVAL_MINUTES,
            strict_interval: true,
        }
    }
}

impl SeasonalForecaster {
    pub fn new(order: ArimaOrder, seasonal: SeasonalOrder, max_iterations: usize) -> Result<Self> {
        // Validates the orders up front
        Sarima::new(order, seasonal, max_iterations)?;
        Ok(Self {
            order,
            seasonal,
            max_iterations,
            ..Self::default()
        })
    }

    pub fn with_horizon_minutes(mut self, minutes: i64) -> Self {
        self.horizon_minutes = minutes;
        self
    }

    pub fn with_interval_minutes(mut self, minutes: i64) -> Self {
        self.interval_minutes = minutes;
        self
    }

    pub fn with_strict_interval(mut self, strict: bool) -> Self {
        self.strict_interval = strict;
        self
    }

    pub fn is_strict(&self) -> bool {
        self.strict_interval
    }

    /// Timestamp of the step after `last`.
    pub fn next_timestamp(&self, last: NaiveDateTime) -> NaiveDateTime {
        last + Duration::minutes(self.horizon_minutes)
    }

    /// Forecast every metric of a frame one step ahead.
    ///
    /// A frame without recognised metrics yields a result carrying only the
    /// next timestamp.
    pub fn forecast(&self, frame: &SeriesFrame) -> Result<ForecastResult> {
        let last = frame.last_timestamp().ok_or(DatasetError::Empty)?;
        let mut result = ForecastResult::new(self.next_timestamp(last));

        if frame.series.is_empty() {
            debug!("No recognised metrics; returning next timestamp only");
            return Ok(result);
        }

        self.check_sampling_interval(&frame.timestamps)?;

        let metrics: Vec<(Metric, &[f64])> = frame
            .series
            .iter()
            .map(|(metric, values)| (*metric, values.as_slice()))
            .collect();

        let forecasts: Vec<(Metric, f64)> = metrics
            .par_iter()
            .map(|(metric, values)| {
                self.forecast_series(values)
                    .map(|value| (*metric, value))
                    .map_err(|e| {
                        warn!(metric = %metric, error = %e, "Seasonal forecast failed");
                        e
                    })
            })
            .collect::<Result<_>>()?;

        result.values.extend(forecasts);
        Ok(result)
    }

    /// Fit one series and return its next value.
    pub fn forecast_series(&self, values: &[f64]) -> Result<f64> {
        let mut model = Sarima::new(self.order, self.seasonal, self.max_iterations)?;
        model.fit(values)?;
        let forecast = model.predict(1)?;
        forecast
            .first()
            .copied()
            .ok_or_else(|| ModelError::NumericalError("Empty seasonal forecast".to_string()))
    }

    /// Median spacing of consecutive timestamps, in minutes.
    pub fn median_interval(timestamps: &[NaiveDateTime]) -> Option<i64> {
        if timestamps.len() < 2 {
            return None;
        }
        let mut gaps: Vec<i64> = timestamps
            .windows(2)
            .map(|pair| (pair[1] - pair[0]).num_minutes())
            .collect();
        gaps.sort_unstable();
        Some(gaps[gaps.len() / 2])
    }

    /// Check that the series is sampled at the interval the seasonal period
    /// assumes. Always passes when strict checking is off or when there are
    /// fewer than two timestamps.
    pub fn check_sampling_interval(&self, timestamps: &[NaiveDateTime]) -> Result<()> {
        if !self.strict_interval {
            return Ok(());
        }
        match Self::median_interval(timestamps) {
            Some(observed) if observed != self.interval_minutes => {
                Err(ModelError::IncompatibleSamplingInterval {
                    expected_minutes: self.interval_minutes,
                    observed_minutes: observed,
                })
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use model_spi::MetricGroup;
    use std::collections::BTreeMap;

    const PATTERN: [f64; 4] = [3.0, -1.0, 4.0, -2.0];

    fn start() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn frame(n: usize, step_minutes: i64, metrics: &[Metric]) -> SeriesFrame {
        let timestamps = (0..n)
            .map(|i| start() + Duration::minutes(i as i64 * step_minutes))
            .collect();
        let series = metrics
            .iter()
            .map(|m| {
                let values: Vec<f64> =
                    (0..n).map(|t| 10.0 + 0.5 * t as f64 + PATTERN[t % 4]).collect();
                (*m, values)
            })
            .collect::<BTreeMap<_, _>>();
        let groups = MetricGroup::ALL
            .into_iter()
            .filter(|g| g.metrics().iter().all(|m| series.contains_key(m)))
            .collect();
        SeriesFrame {
            timestamps,
            groups,
            series,
        }
    }

    #[test]
    fn test_forecast_timestamp_and_values() {
        let frame = frame(32, 15, &[Metric::Cpu, Metric::Memory]);
        let result = SeasonalForecaster::default().forecast(&frame).unwrap();

        assert_eq!(result.formatted_timestamp(), "2024-01-01 08:00:00");
        assert!((result.get(Metric::Cpu).unwrap() - 29.0).abs() < 1e-6);
        assert!((result.get(Metric::Memory).unwrap() - 29.0).abs() < 1e-6);
        assert_eq!(result.get(Metric::Requests), None);
    }

    #[test]
    fn test_no_metrics_returns_timestamp_only() {
        let frame = frame(3, 15, &[]);
        let result = SeasonalForecaster::default().forecast(&frame).unwrap();
        assert!(result.values.is_empty());
        assert_eq!(result.formatted_timestamp(), "2024-01-01 00:45:00");
    }

    #[test]
    fn test_insufficient_history() {
        let frame = frame(10, 15, &[Metric::Requests]);
        assert_eq!(
            SeasonalForecaster::default().forecast(&frame),
            Err(ModelError::InsufficientHistory {
                required: 16,
                actual: 10
            })
        );
    }

    #[test]
    fn test_strict_interval_rejects_hourly() {
        let frame = frame(32, 60, &[Metric::Requests]);
        assert_eq!(
            SeasonalForecaster::default().forecast(&frame),
            Err(ModelError::IncompatibleSamplingInterval {
                expected_minutes: 15,
                observed_minutes: 60
            })
        );

        let lenient = SeasonalForecaster::default().with_strict_interval(false);
        let result = lenient.forecast(&frame).unwrap();
        // Horizon stays 15 minutes regardless of spacing
        assert_eq!(result.timestamp, frame.last_timestamp().unwrap() + Duration::minutes(15));
    }

    #[test]
    fn test_median_interval_ignores_gaps() {
        let mut timestamps: Vec<NaiveDateTime> =
            (0..10).map(|i| start() + Duration::minutes(i * 15)).collect();
        // One outage of several hours
        timestamps.push(start() + Duration::hours(8));
        assert_eq!(SeasonalForecaster::median_interval(&timestamps), Some(15));
        assert_eq!(SeasonalForecaster::median_interval(&timestamps[..1]), None);
    }

    #[test]
    fn test_invalid_orders() {
        assert!(
            SeasonalForecaster::new(ArimaOrder::new(9, 1, 1), SeasonalOrder::default(), 10).is_err()
        );
    }
}
