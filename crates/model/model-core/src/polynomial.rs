//! Polynomial least-squares regression
//!
//! Fits `y = b0 + b1*z + ... + bk*z^k` by ordinary least squares, where `z`
//! is the input feature divided by a fixed scale. Scaling keeps the
//! Vandermonde design matrix well conditioned for features up to 1439; it
//! does not change the fitted curve.
//!
//! ## Example
//!
//! ```rust
//! use model_core::{PolynomialRegression, Regressor};
//!
//! let x: Vec<f64> = (0..10).map(|i| i as f64).collect();
//! let y: Vec<f64> = x.iter().map(|v| 1.0 + 2.0 * v * v).collect();
//!
//! let mut model = PolynomialRegression::new(2, 10.0).unwrap();
//! model.fit(&x, &y).unwrap();
//! assert!((model.predict_one(3.0).unwrap() - 19.0).abs() < 1e-6);
//! ```

use model_spi::{ModelError, Regressor, Result};
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

/// Singular values below this are treated as zero by the solver.
const SVD_EPSILON: f64 = 1e-12;

/// Polynomial regression on a single scalar feature
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolynomialRegression {
    /// Highest power of the basis expansion
    degree: usize,
    /// Divisor applied to inputs before expansion
    scale: f64,
    /// Coefficients in ascending power order (intercept first)
    coefficients: Vec<f64>,
    /// Number of observations used in fitting
    n_observations: usize,
    /// In-sample root mean squared error
    rmse: f64,
    /// R-squared value
    r_squared: f64,
    /// Whether model has been fitted
    fitted: bool,
}

impl PolynomialRegression {
    /// Create a new unfitted model
    ///
    /// # Arguments
    ///
    /// * `degree` - Highest power of the feature (1-10)
    /// * `scale` - Positive divisor applied to the feature before expansion
    pub fn new(degree: usize, scale: f64) -> Result<Self> {
        if degree == 0 || degree > 10 {
            return Err(ModelError::InvalidParameter {
                name: "degree".to_string(),
                reason: "must be between 1 and 10".to_string(),
            });
        }
        if !(scale.is_finite() && scale > 0.0) {
            return Err(ModelError::InvalidParameter {
                name: "scale".to_string(),
                reason: "must be a positive finite number".to_string(),
            });
        }

        Ok(Self {
            degree,
            scale,
            coefficients: vec![0.0; degree + 1],
            n_observations: 0,
            rmse: 0.0,
            r_squared: 0.0,
            fitted: false,
        })
    }

    /// Minimum number of distinct feature values needed for a unique fit.
    pub fn min_distinct_values(&self) -> usize {
        self.degree + 1
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Coefficients on the scaled feature, intercept first.
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    pub fn n_observations(&self) -> usize {
        self.n_observations
    }

    pub fn rmse(&self) -> f64 {
        self.rmse
    }

    /// Get R-squared (coefficient of determination)
    pub fn r_squared(&self) -> f64 {
        self.r_squared
    }

    fn evaluate(&self, x: f64) -> f64 {
        let z = x / self.scale;
        // Horner's scheme
        self.coefficients
            .iter()
            .rev()
            .fold(0.0, |acc, &c| acc * z + c)
    }

    fn design_matrix(&self, x: &[f64]) -> DMatrix<f64> {
        DMatrix::from_fn(x.len(), self.degree + 1, |i, j| {
            (x[i] / self.scale).powi(j as i32)
        })
    }
}

/// Count distinct values of a feature series.
pub fn distinct_count(x: &[f64]) -> usize {
    let mut sorted: Vec<f64> = x.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted.dedup();
    sorted.len()
}

impl Regressor for PolynomialRegression {
    fn fit(&mut self, x: &[f64], y: &[f64]) -> Result<()> {
        if x.len() != y.len() {
            return Err(ModelError::InvalidData(format!(
                "feature has {} rows but target has {}",
                x.len(),
                y.len()
            )));
        }

        if x.iter().chain(y).any(|v| !v.is_finite()) {
            return Err(ModelError::InvalidData(
                "Data contains NaN or infinite values".to_string(),
            ));
        }

        let distinct = distinct_count(x);
        if distinct < self.min_distinct_values() {
            return Err(ModelError::InsufficientData {
                required: self.min_distinct_values(),
                actual: distinct,
            });
        }

        let design = self.design_matrix(x);
        let target = DVector::from_column_slice(y);
        let solution = design
            .svd(true, true)
            .solve(&target, SVD_EPSILON)
            .map_err(|e| ModelError::NumericalError(e.to_string()))?;

        if solution.iter().any(|c| !c.is_finite()) {
            return Err(ModelError::NumericalError(
                "Least-squares solution is not finite".to_string(),
            ));
        }

        self.coefficients = solution.iter().copied().collect();
        self.n_observations = x.len();

        // Goodness of fit
        let n = y.len() as f64;
        let mean_y = y.iter().sum::<f64>() / n;
        let ss_tot: f64 = y.iter().map(|&v| (v - mean_y).powi(2)).sum();
        let ss_res: f64 = x
            .iter()
            .zip(y)
            .map(|(&xi, &yi)| (yi - self.evaluate(xi)).powi(2))
            .sum();

        self.rmse = (ss_res / n).sqrt();
        self.r_squared = if ss_tot > 1e-10 {
            1.0 - ss_res / ss_tot
        } else {
            1.0
        };

        self.fitted = true;
        Ok(())
    }

    fn predict_one(&self, x: f64) -> Result<f64> {
        if !self.fitted {
            return Err(ModelError::NotFitted);
        }
        Ok(self.evaluate(x))
    }

    fn is_fitted(&self) -> bool {
        self.fitted
    }
}
