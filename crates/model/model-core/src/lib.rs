//! Model Core
//!
//! Core implementations of the model lifecycle:
//!
//! - [`polynomial`]: least-squares polynomial regression on one feature
//! - [`fitter`]: per-metric short-horizon fitting on the time-of-day feature
//! - [`registry`]: process-wide store of the latest fitted model per metric
//! - [`prediction`]: point predictions against the registry
//! - [`sarima`] / [`forecaster`]: seasonal ARIMA one-step forecasts
//! - [`service`]: request-level orchestration of the above

pub mod fitter;
pub mod forecaster;
pub mod optimize;
pub mod polynomial;
pub mod prediction;
pub mod registry;
pub mod sarima;
pub mod service;

// Re-export SPI traits for implementations
pub use model_spi::{
    ForecastResult, Metric, MetricGroup, ModelError, Prediction, Predictor, Regressor, Result,
    TimeOfDay,
};

// Re-export main types
pub use fitter::{FittedModel, ShortHorizonFitter, DEFAULT_DEGREE, FEATURE_SCALE};
pub use forecaster::{SeasonalForecaster, SAMPLING_INTERVAL_MINUTES};
pub use optimize::{Minimum, NelderMead};
pub use polynomial::PolynomialRegression;
pub use prediction::PredictionService;
pub use registry::ModelRegistry;
pub use sarima::{ArimaOrder, Sarima, SeasonalOrder};
pub use service::{FitReport, ModelService, ModelSummary};
