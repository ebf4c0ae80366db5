//! Error types for model operations
//!
//! This module provides the [`ModelError`] enum and [`Result`] type alias
//! shared by fitting, forecasting and prediction.

mod model_error;

pub use model_error::{ModelError, Result};
