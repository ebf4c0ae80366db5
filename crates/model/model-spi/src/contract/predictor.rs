//! Predictor trait for history-based forecasting models

use crate::error::Result;

/// Fit-on-history, project-forward model
///
/// Implementations are fitted against a chronologically ordered series and
/// then project `steps` values past its end.
///
/// # Example
///
/// ```rust,ignore
/// use model_spi::Predictor;
///
/// fn next_value<P: Predictor>(model: &mut P, history: &[f64]) -> model_spi::Result<f64> {
///     model.fit(history)?;
///     Ok(model.predict(1)?[0])
/// }
/// ```
pub trait Predictor {
    /// Fit the model to historical data
    fn fit(&mut self, data: &[f64]) -> Result<()>;

    /// Predict future values
    fn predict(&self, steps: usize) -> Result<Vec<f64>>;

    /// Check if the model has been fitted
    fn is_fitted(&self) -> bool;
}
