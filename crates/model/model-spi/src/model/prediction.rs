//! Point prediction returned by the prediction service.

use dataset_spi::{Metric, MetricGroup};
use serde::Serialize;
use std::collections::BTreeMap;

/// Integer point predictions for every metric of a group.
///
/// Serializes as a flat object, e.g. `{"cpu": 120, "memory": 88}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Prediction {
    #[serde(skip)]
    pub group: MetricGroup,
    #[serde(flatten)]
    pub values: BTreeMap<Metric, i64>,
}

impl Prediction {
    pub fn new(group: MetricGroup) -> Self {
        Self {
            group,
            values: BTreeMap::new(),
        }
    }

    /// Record a raw model output, truncated toward zero.
    pub fn insert(&mut self, metric: Metric, raw: f64) {
        self.values.insert(metric, truncate(raw));
    }

    pub fn get(&self, metric: Metric) -> Option<i64> {
        self.values.get(&metric).copied()
    }
}

/// Truncate toward zero, never round: `2.9 -> 2`, `-2.9 -> -2`.
pub(crate) fn truncate(raw: f64) -> i64 {
    raw.trunc() as i64
}
