//! Model Facade
//!
//! High-level API for utilization models. Re-exports all public types from
//! the model stack, and the dataset stack under [`dataset`], for convenient
//! usage.

// Re-export everything from API (which includes SPI and core)
pub use model_api::*;

// Explicit re-exports for documentation
pub use model_api::prelude;

// Re-export core modules for direct access
pub use model_core::{
    fitter, forecaster, optimize, polynomial, prediction, registry, sarima, service,
};

// Dataset decoding and validation
pub use dataset_facade as dataset;

// Re-export SPI traits
pub use model_spi::{Predictor, Regressor};
