//! Short-horizon fitting
//!
//! One polynomial per metric, regressed on the minutes-since-midnight
//! feature. Every fit starts from scratch; nothing is carried over from a
//! previously fitted model.

use chrono::{DateTime, Utc};
use dataset_core::ValidatedDataset;
use model_spi::{Metric, ModelError, Regressor, Result, TimeOfDay};
use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use crate::polynomial::PolynomialRegression;

/// Default polynomial degree of short-horizon models.
pub const DEFAULT_DEGREE: usize = 4;

/// Scale applied to the time-of-day feature (last minute of the day).
pub const FEATURE_SCALE: f64 = 1439.0;

/// A fitted regression bound to the metric it predicts.
#[derive(Debug, Clone, Serialize)]
pub struct FittedModel {
    pub metric: Metric,
    pub regression: PolynomialRegression,
    pub fitted_at: DateTime<Utc>,
}

impl FittedModel {
    /// Raw (untruncated) prediction at a time of day.
    pub fn predict(&self, time: TimeOfDay) -> Result<f64> {
        self.regression.predict_one(time.as_f64())
    }
}

/// Fits short-horizon models.
#[derive(Debug, Clone, Copy)]
pub struct ShortHorizonFitter {
    degree: usize,
}

impl Default for ShortHorizonFitter {
    fn default() -> Self {
        Self {
            degree: DEFAULT_DEGREE,
        }
    }
}

impl ShortHorizonFitter {
    pub fn new(degree: usize) -> Result<Self> {
        // Validates the degree up front
        PolynomialRegression::new(degree, FEATURE_SCALE)?;
        Ok(Self { degree })
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Fit one metric's series against its time-of-day features.
    pub fn fit(
        &self,
        metric: Metric,
        features: &[TimeOfDay],
        values: &[f64],
    ) -> Result<FittedModel> {
        let x: Vec<f64> = features.iter().map(TimeOfDay::as_f64).collect();
        let mut regression = PolynomialRegression::new(self.degree, FEATURE_SCALE)?;
        regression.fit(&x, values)?;

        debug!(
            metric = %metric,
            observations = regression.n_observations(),
            rmse = regression.rmse(),
            r_squared = regression.r_squared(),
            "Fitted short-horizon model"
        );

        Ok(FittedModel {
            metric,
            regression,
            fitted_at: Utc::now(),
        })
    }

    /// Fit every metric of a validated dataset.
    ///
    /// Metrics are fitted in parallel. Either every metric fits or an error
    /// is returned and no model is produced.
    pub fn fit_dataset(&self, dataset: &ValidatedDataset) -> Result<Vec<FittedModel>> {
        dataset
            .group
            .metrics()
            .par_iter()
            .map(|metric| {
                let values = dataset.values(*metric).ok_or_else(|| {
                    ModelError::InvalidData(format!("Dataset has no {} series", metric))
                })?;
                self.fit(*metric, &dataset.features, values)
            })
            .collect()
    }
}
