//! Model registry
//!
//! Holds at most one fitted model per metric. Readers take a cheap `Arc`
//! snapshot; a fit publishes a new `Arc`, so a prediction in flight keeps
//! using the model it started with.

use dashmap::DashMap;
use model_spi::Metric;
use std::sync::Arc;
use tracing::info;

use crate::fitter::FittedModel;

/// Concurrent store of the latest fitted model per metric.
#[derive(Debug, Default)]
pub struct ModelRegistry {
    models: DashMap<Metric, Arc<FittedModel>>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a model, replacing any previous model of the same metric.
    pub fn put(&self, model: FittedModel) {
        let metric = model.metric;
        let replaced = self.models.insert(metric, Arc::new(model)).is_some();
        info!(metric = %metric, replaced, "Registered model");
    }

    /// Publish several models.
    pub fn put_all(&self, models: impl IntoIterator<Item = FittedModel>) {
        for model in models {
            self.put(model);
        }
    }

    /// Snapshot of the current model for a metric.
    pub fn get(&self, metric: Metric) -> Option<Arc<FittedModel>> {
        self.models.get(&metric).map(|entry| Arc::clone(entry.value()))
    }

    pub fn contains(&self, metric: Metric) -> bool {
        self.models.contains_key(&metric)
    }

    /// Metrics with a fitted model, in canonical order.
    pub fn fitted_metrics(&self) -> Vec<Metric> {
        Metric::ALL
            .into_iter()
            .filter(|metric| self.contains(*metric))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}
