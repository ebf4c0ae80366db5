//! Model Consumer API
//!
//! Consumer configurations and builder APIs for the model services.
//!
//! This crate provides:
//! - Configuration types for short-horizon fitting and seasonal forecasting
//! - Builders that turn a configuration into a ready [`ModelService`]
//! - Re-exports from SPI and core for convenience

// Re-export from core
pub use model_core::{
    fitter, forecaster, polynomial, prediction, registry, sarima, service, ArimaOrder,
    FitReport, FittedModel, ModelRegistry, ModelService, ModelSummary, PolynomialRegression,
    PredictionService, Sarima, SeasonalForecaster, SeasonalOrder, ShortHorizonFitter,
};

// Re-export traits from SPI
pub use model_spi::{
    ForecastResult, Metric, MetricGroup, ModelError, Prediction, Predictor, Regressor, Result,
    TimeOfDay,
};

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Configuration for short-horizon fitting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitConfig {
    /// Polynomial degree of the time-of-day regression
    pub degree: usize,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            degree: model_core::DEFAULT_DEGREE,
        }
    }
}

impl FitConfig {
    pub fn build(&self) -> Result<ShortHorizonFitter> {
        ShortHorizonFitter::new(self.degree)
    }
}

/// Configuration for seasonal forecasting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// Non-seasonal (p, d, q)
    pub order: ArimaOrder,
    /// Seasonal (P, D, Q, s)
    pub seasonal_order: SeasonalOrder,
    /// Minutes between the last observation and the forecast
    pub horizon_minutes: i64,
    /// Sampling interval the seasonal period assumes
    pub interval_minutes: i64,
    /// Reject series sampled at a different interval
    pub strict_interval: bool,
    /// Optimizer iteration limit
    pub max_iterations: usize,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            order: ArimaOrder::default(),
            seasonal_order: SeasonalOrder::default(),
            horizon_minutes: model_core::SAMPLING_INTERVAL_MINUTES,
            interval_minutes: model_core::SAMPLING_INTERVAL_MINUTES,
            strict_interval: true,
            max_iterations: 2000,
        }
    }
}

impl ForecastConfig {
    pub fn with_strict_interval(mut self, strict: bool) -> Self {
        self.strict_interval = strict;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn build(&self) -> Result<SeasonalForecaster> {
        if self.horizon_minutes <= 0 || self.interval_minutes <= 0 {
            return Err(ModelError::InvalidParameter {
                name: "horizon_minutes".to_string(),
                reason: "horizon and interval must be positive".to_string(),
            });
        }
        Ok(
            SeasonalForecaster::new(self.order, self.seasonal_order, self.max_iterations)?
                .with_horizon_minutes(self.horizon_minutes)
                .with_interval_minutes(self.interval_minutes)
                .with_strict_interval(self.strict_interval),
        )
    }
}

/// Builder for [`ModelService`]
#[derive(Debug, Clone, Default)]
pub struct ModelServiceBuilder {
    fit: FitConfig,
    forecast: ForecastConfig,
    registry: Option<Arc<ModelRegistry>>,
}

impl ModelServiceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fit_config(mut self, config: FitConfig) -> Self {
        self.fit = config;
        self
    }

    pub fn forecast_config(mut self, config: ForecastConfig) -> Self {
        self.forecast = config;
        self
    }

    /// Share an existing registry instead of creating a fresh one.
    pub fn registry(mut self, registry: Arc<ModelRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn build(self) -> Result<ModelService> {
        Ok(ModelService::new(
            self.fit.build()?,
            self.forecast.build()?,
            self.registry.unwrap_or_default(),
        ))
    }
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{FitConfig, ForecastConfig, ModelServiceBuilder};
    pub use model_core::{
        ArimaOrder, FitReport, ModelRegistry, ModelService, ModelSummary, SeasonalForecaster,
        SeasonalOrder, ShortHorizonFitter,
    };
    pub use model_spi::{
        ForecastResult, Metric, MetricGroup, ModelError, Prediction, Predictor, Regressor, Result,
        TimeOfDay,
    };
}
