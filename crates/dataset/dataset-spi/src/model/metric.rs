//! Metric vocabulary.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A utilization metric that can be modeled.
///
/// The set is fixed; any other column in a dataset is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    /// CPU usage (vCPU cores)
    Cpu,
    /// Memory usage (GB)
    Memory,
    /// Request rate (requests per second)
    Requests,
}

impl Metric {
    /// All metrics, in column order.
    pub const ALL: [Metric; 3] = [Metric::Cpu, Metric::Memory, Metric::Requests];

    /// Column name of the metric in an uploaded dataset.
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Cpu => "cpu",
            Metric::Memory => "memory",
            Metric::Requests => "requests",
        }
    }

    /// Human label used in fit acknowledgements.
    pub fn label(&self) -> &'static str {
        match self {
            Metric::Cpu => "CPU",
            Metric::Memory => "memory",
            Metric::Requests => "requests",
        }
    }

    /// Look a metric up by its column name.
    pub fn from_column(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == name)
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A group of metrics that always arrive together in one dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricGroup {
    /// `cpu` and `memory`
    Resource,
    /// `requests`
    Requests,
}

impl MetricGroup {
    /// Groups in classification priority order.
    pub const ALL: [MetricGroup; 2] = [MetricGroup::Resource, MetricGroup::Requests];

    /// Metrics belonging to this group.
    pub fn metrics(&self) -> &'static [Metric] {
        match self {
            MetricGroup::Resource => &[Metric::Cpu, Metric::Memory],
            MetricGroup::Requests => &[Metric::Requests],
        }
    }

    /// Name used by the `type` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricGroup::Resource => "resource",
            MetricGroup::Requests => "requests",
        }
    }

    /// Parse a prediction `type` parameter.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "resource" => Some(MetricGroup::Resource),
            "requests" => Some(MetricGroup::Requests),
            _ => None,
        }
    }
}

impl fmt::Display for MetricGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
