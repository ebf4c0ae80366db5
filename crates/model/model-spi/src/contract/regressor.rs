//! Regressor trait for scalar-feature models

use crate::error::Result;

/// Regression of a value on a single scalar feature
///
/// Fitting replaces any previous state entirely; there is no incremental
/// update.
pub trait Regressor: Send + Sync {
    /// Fit `y ~ f(x)` on paired observations
    fn fit(&mut self, x: &[f64], y: &[f64]) -> Result<()>;

    /// Evaluate the fitted curve at `x`
    fn predict_one(&self, x: f64) -> Result<f64>;

    /// Check if the model has been fitted
    fn is_fitted(&self) -> bool;

    /// Evaluate the fitted curve at every point of `x`
    fn predict_many(&self, x: &[f64]) -> Result<Vec<f64>> {
        x.iter().map(|&v| self.predict_one(v)).collect()
    }
}
