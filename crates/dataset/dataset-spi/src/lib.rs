//! Dataset Service Provider Interface
//!
//! Defines the decoded tabular dataset, the metric vocabulary shared by the
//! fitting and forecasting paths, and the contract for table decoders.
//!
//! - [`Table`]: column-oriented, already-decoded dataset
//! - [`Metric`] / [`MetricGroup`]: the recognised utilization metrics
//! - [`TimeOfDay`]: the bounded time-of-day feature
//! - [`TableDecoder`]: turns raw upload bytes into a [`Table`]
//! - [`DatasetError`]: standardized error type for dataset operations

pub mod contract;
pub mod error;
pub mod model;

// Re-export all public items at crate root for convenience
pub use contract::TableDecoder;
pub use error::{DatasetError, Result};
pub use model::{
    Cell, Column, Metric, MetricGroup, Table, TimeOfDay, MINUTES_PER_DAY, TIMESTAMP_COLUMN,
};
