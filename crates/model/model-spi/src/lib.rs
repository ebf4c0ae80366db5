//! Model Service Provider Interface
//!
//! Defines the contracts and error taxonomy of the model lifecycle:
//!
//! - [`Regressor`]: scalar-feature regression (short-horizon models)
//! - [`Predictor`]: fit-on-history, project-forward models (seasonal forecasts)
//! - [`Prediction`] / [`ForecastResult`]: values returned to callers
//! - [`ModelError`]: standardized error type for all model operations
//! - [`Result`]: convenient result type alias

pub mod contract;
pub mod error;
pub mod model;

// Re-export all public items at crate root for convenience
pub use contract::{Predictor, Regressor};
pub use error::{ModelError, Result};
pub use model::{ForecastResult, Prediction, FORECAST_TIMESTAMP_FORMAT};

pub use dataset_spi::{Metric, MetricGroup, TimeOfDay};
