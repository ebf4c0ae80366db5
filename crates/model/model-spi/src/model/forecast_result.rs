//! One-step forecast returned by the seasonal forecaster.

use chrono::NaiveDateTime;
use dataset_spi::Metric;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

/// Layout of the forecast timestamp in responses.
pub const FORECAST_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Per-metric next values and the timestamp they refer to.
///
/// Serializes as `{"cpu": 101.3, "memory": 55.0, "timestamp": "2024-01-01 10:15:00"}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastResult {
    #[serde(flatten)]
    pub values: BTreeMap<Metric, f64>,
    #[serde(serialize_with = "serialize_timestamp")]
    pub timestamp: NaiveDateTime,
}

impl ForecastResult {
    pub fn new(timestamp: NaiveDateTime) -> Self {
        Self {
            values: BTreeMap::new(),
            timestamp,
        }
    }

    pub fn get(&self, metric: Metric) -> Option<f64> {
        self.values.get(&metric).copied()
    }

    /// Forecast timestamp rendered as in responses.
    pub fn formatted_timestamp(&self) -> String {
        self.timestamp.format(FORECAST_TIMESTAMP_FORMAT).to_string()
    }
}

fn serialize_timestamp<S: Serializer>(
    timestamp: &NaiveDateTime,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_str(&timestamp.format(FORECAST_TIMESTAMP_FORMAT))
}
