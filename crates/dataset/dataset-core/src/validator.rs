//! Dataset validation and metric classification
//!
//! Confirms a timestamp column exists, decides which metric group a dataset
//! carries, and turns the decoded cells into feature and value series.

use chrono::NaiveDateTime;
use dataset_spi::{
    Column, DatasetError, Metric, MetricGroup, Result, Table, TimeOfDay, TIMESTAMP_COLUMN,
};
use std::collections::BTreeMap;

use crate::feature::{cell_to_datetime, extract_datetime};

/// A dataset ready for short-horizon fitting.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedDataset {
    /// Metric group the dataset was classified into
    pub group: MetricGroup,
    /// Time-of-day feature of every row
    pub features: Vec<TimeOfDay>,
    /// Value series of every metric in `group`, row-aligned with `features`
    pub series: BTreeMap<Metric, Vec<f64>>,
}

impl ValidatedDataset {
    /// Values of one metric, if it belongs to the dataset.
    pub fn values(&self, metric: Metric) -> Option<&[f64]> {
        self.series.get(&metric).map(Vec::as_slice)
    }
}

/// A chronologically ordered dataset for seasonal forecasting.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesFrame {
    /// Timestamps in ascending order
    pub timestamps: Vec<NaiveDateTime>,
    /// Every recognised group present in the dataset (possibly none)
    pub groups: Vec<MetricGroup>,
    /// Value series aligned with `timestamps`
    pub series: BTreeMap<Metric, Vec<f64>>,
}

impl SeriesFrame {
    /// Latest observed timestamp.
    pub fn last_timestamp(&self) -> Option<NaiveDateTime> {
        self.timestamps.last().copied()
    }

    pub fn values(&self, metric: Metric) -> Option<&[f64]> {
        self.series.get(&metric).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }
}

/// Validates decoded tables against the utilization dataset schema.
///
/// Stateless; never touches fitted models.
#[derive(Debug, Default, Clone, Copy)]
pub struct DatasetValidator;

impl DatasetValidator {
    pub fn new() -> Self {
        Self
    }

    /// Classify a table into one metric group.
    ///
    /// `{cpu, memory}` wins over `{requests}` when both are present.
    pub fn classify(&self, table: &Table) -> Result<MetricGroup> {
        if !table.has_column(TIMESTAMP_COLUMN) {
            return Err(DatasetError::MissingTimestampColumn);
        }
        MetricGroup::ALL
            .into_iter()
            .find(|group| Self::has_group(table, *group))
            .ok_or(DatasetError::NoRecognizedMetrics)
    }

    /// Validate a table for short-horizon fitting.
    pub fn validate(&self, table: &Table) -> Result<ValidatedDataset> {
        let group = self.classify(table)?;
        let timestamps = Self::timestamps(table)?;
        let features = timestamps.iter().map(extract_datetime).collect();

        let mut series = BTreeMap::new();
        for metric in group.metrics() {
            series.insert(*metric, Self::metric_values(table, *metric)?);
        }

        Ok(ValidatedDataset {
            group,
            features,
            series,
        })
    }

    /// Validate a table for forecasting and sort it chronologically.
    ///
    /// Unlike [`validate`](Self::validate), every recognised group is kept and
    /// a table with no recognised metric is not an error.
    pub fn series(&self, table: &Table) -> Result<SeriesFrame> {
        if !table.has_column(TIMESTAMP_COLUMN) {
            return Err(DatasetError::MissingTimestampColumn);
        }

        let timestamps = Self::timestamps(table)?;
        if timestamps.is_empty() {
            return Err(DatasetError::Empty);
        }

        // Stable sort keeps submission order for duplicate timestamps
        let mut order: Vec<usize> = (0..timestamps.len()).collect();
        order.sort_by_key(|&i| timestamps[i]);

        let groups: Vec<MetricGroup> = MetricGroup::ALL
            .into_iter()
            .filter(|group| Self::has_group(table, *group))
            .collect();

        let mut series = BTreeMap::new();
        for metric in groups.iter().flat_map(|g| g.metrics()) {
            let values = Self::metric_values(table, *metric)?;
            series.insert(*metric, order.iter().map(|&i| values[i]).collect());
        }

        Ok(SeriesFrame {
            timestamps: order.iter().map(|&i| timestamps[i]).collect(),
            groups,
            series,
        })
    }

    fn has_group(table: &Table, group: MetricGroup) -> bool {
        group.metrics().iter().all(|m| table.has_column(m.as_str()))
    }

    fn timestamps(table: &Table) -> Result<Vec<NaiveDateTime>> {
        let column = table
            .column(TIMESTAMP_COLUMN)
            .ok_or(DatasetError::MissingTimestampColumn)?;
        column.cells.iter().map(cell_to_datetime).collect()
    }

    fn metric_values(table: &Table, metric: Metric) -> Result<Vec<f64>> {
        let column = table
            .column(metric.as_str())
            .ok_or(DatasetError::NoRecognizedMetrics)?;
        Self::numeric(column)
    }

    fn numeric(column: &Column) -> Result<Vec<f64>> {
        column
            .cells
            .iter()
            .enumerate()
            .map(|(row, cell)| {
                cell.as_f64()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| DatasetError::InvalidValue {
                        column: column.name.clone(),
                        row,
                        value: cell.display_value(),
                    })
            })
            .collect()
    }
}
