//! Point predictions against the model registry

use dataset_core::{extract, DatasetError};
use model_spi::{MetricGroup, ModelError, Prediction, Result, TimeOfDay};
use std::sync::Arc;
use tracing::debug;

use crate::registry::ModelRegistry;

/// Answers `predict(kind, timestamp)` queries.
#[derive(Debug, Clone)]
pub struct PredictionService {
    registry: Arc<ModelRegistry>,
}

impl PredictionService {
    pub fn new(registry: Arc<ModelRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<ModelRegistry> {
        &self.registry
    }

    /// Predict the metrics of `kind` at the clock time of `timestamp`.
    ///
    /// Inputs are checked in request order: a missing or unparseable
    /// timestamp fails before the type is looked at.
    pub fn predict(&self, kind: Option<&str>, timestamp: Option<&str>) -> Result<Prediction> {
        let timestamp = timestamp
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(DatasetError::MissingTimestamp)?;
        let time = extract(timestamp)?;

        let kind = kind.unwrap_or_default();
        let group = MetricGroup::parse(kind)
            .ok_or_else(|| ModelError::InvalidPredictionType(kind.to_string()))?;

        self.predict_at(group, time)
    }

    /// Predict the metrics of `group` at an already extracted time of day.
    ///
    /// Every model of the group is looked up before any is evaluated, so a
    /// partially fitted group never yields a partial answer.
    pub fn predict_at(&self, group: MetricGroup, time: TimeOfDay) -> Result<Prediction> {
        let models = group
            .metrics()
            .iter()
            .map(|metric| self.registry.get(*metric))
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| ModelError::ModelNotLoaded(not_loaded_message(group)))?;

        let mut prediction = Prediction::new(group);
        for model in models {
            let raw = model.predict(time)?;
            debug!(metric = %model.metric, time = %time, raw, "Predicted");
            prediction.insert(model.metric, raw);
        }
        Ok(prediction)
    }
}

fn not_loaded_message(group: MetricGroup) -> String {
    match group {
        MetricGroup::Resource => "CPU or Memory model is not loaded",
        MetricGroup::Requests => "Requests model is not loaded",
    }
    .to_string()
}
