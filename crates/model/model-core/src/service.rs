//! Request-level orchestration
//!
//! [`ModelService`] ties the validator, fitters, registry and prediction
//! service together behind the three operations the transport exposes:
//! fit, forecast and predict. All methods are synchronous and CPU-bound;
//! async callers run them on a blocking pool.

use chrono::{DateTime, Utc};
use dataset_core::{DatasetValidator, Table};
use model_spi::{ForecastResult, Metric, MetricGroup, Prediction, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

use crate::fitter::{FittedModel, ShortHorizonFitter};
use crate::forecaster::SeasonalForecaster;
use crate::prediction::PredictionService;
use crate::registry::ModelRegistry;

/// Training statistics of one registered model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelSummary {
    pub metric: Metric,
    pub degree: usize,
    pub n_observations: usize,
    pub rmse: f64,
    pub r_squared: f64,
    pub fitted_at: DateTime<Utc>,
}

impl From<&FittedModel> for ModelSummary {
    fn from(model: &FittedModel) -> Self {
        Self {
            metric: model.metric,
            degree: model.regression.degree(),
            n_observations: model.regression.n_observations(),
            rmse: model.regression.rmse(),
            r_squared: model.regression.r_squared(),
            fitted_at: model.fitted_at,
        }
    }
}

/// Outcome of a successful fit.
///
/// Serializes to one acknowledgement per fitted metric, e.g.
/// `{"cpu_model": "Model fitted for CPU"}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FitReport {
    #[serde(skip)]
    pub group: MetricGroup,
    #[serde(skip)]
    pub models: Vec<ModelSummary>,
    #[serde(flatten)]
    pub acknowledgements: BTreeMap<String, String>,
}

impl FitReport {
    fn new(group: MetricGroup, models: Vec<ModelSummary>) -> Self {
        let acknowledgements = models
            .iter()
            .map(|m| {
                (
                    format!("{}_model", m.metric.as_str()),
                    format!("Model fitted for {}", m.metric.label()),
                )
            })
            .collect();
        Self {
            group,
            models,
            acknowledgements,
        }
    }

    pub fn metrics(&self) -> Vec<Metric> {
        self.models.iter().map(|m| m.metric).collect()
    }
}

/// Fit, forecast and predict against one shared registry.
#[derive(Debug, Clone)]
pub struct ModelService {
    validator: DatasetValidator,
    fitter: ShortHorizonFitter,
    forecaster: SeasonalForecaster,
    predictions: PredictionService,
}

impl Default for ModelService {
    fn default() -> Self {
        Self::new(
            ShortHorizonFitter::default(),
            SeasonalForecaster::default(),
            Arc::new(ModelRegistry::new()),
        )
    }
}

impl ModelService {
    pub fn new(
        fitter: ShortHorizonFitter,
        forecaster: SeasonalForecaster,
        registry: Arc<ModelRegistry>,
    ) -> Self {
        Self {
            validator: DatasetValidator::new(),
            fitter,
            forecaster,
            predictions: PredictionService::new(registry),
        }
    }

    pub fn registry(&self) -> &Arc<ModelRegistry> {
        self.predictions.registry()
    }

    pub fn forecaster(&self) -> &SeasonalForecaster {
        &self.forecaster
    }

    /// Validate a table, fit one model per metric of its group and publish
    /// them. Nothing is published unless every metric fits.
    pub fn fit_table(&self, table: &Table) -> Result<FitReport> {
        let (group, models) = self.fit_models(table)?;
        Ok(self.publish(group, models))
    }

    /// Validate and fit without touching the registry.
    pub fn fit_models(&self, table: &Table) -> Result<(MetricGroup, Vec<FittedModel>)> {
        let dataset = self.validator.validate(table)?;
        info!(
            group = dataset.group.as_str(),
            rows = dataset.features.len(),
            "Fitting short-horizon models"
        );

        let models = self.fitter.fit_dataset(&dataset)?;
        Ok((dataset.group, models))
    }

    /// Swap freshly fitted models into the registry.
    pub fn publish(&self, group: MetricGroup, models: Vec<FittedModel>) -> FitReport {
        let summaries = models.iter().map(ModelSummary::from).collect();
        self.registry().put_all(models);

        let report = FitReport::new(group, summaries);
        info!(metrics = ?report.metrics(), "Short-horizon fit complete");
        report
    }

    /// Forecast every recognised metric of a table one step ahead.
    pub fn forecast_table(&self, table: &Table) -> Result<ForecastResult> {
        let frame = self.validator.series(table)?;
        info!(
            rows = frame.len(),
            groups = ?frame.groups,
            "Forecasting seasonal models"
        );
        self.forecaster.forecast(&frame)
    }

    pub fn predict(&self, kind: Option<&str>, timestamp: Option<&str>) -> Result<Prediction> {
        self.predictions.predict(kind, timestamp)
    }

    /// Summaries of every registered model, in metric order.
    pub fn model_summaries(&self) -> Vec<ModelSummary> {
        self.registry()
            .fitted_metrics()
            .into_iter()
            .filter_map(|metric| self.registry().get(metric))
            .map(|model| ModelSummary::from(model.as_ref()))
            .collect()
    }
}
