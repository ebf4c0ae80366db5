//! Data models for decoded datasets.

mod metric;
mod table;
mod time_of_day;

pub use metric::{Metric, MetricGroup};
pub use table::{Cell, Column, Table, TIMESTAMP_COLUMN};
pub use time_of_day::{TimeOfDay, MINUTES_PER_DAY};
