//! Seasonal ARIMA
//!
//! SARIMA(p,d,q)(P,D,Q,s) estimated by conditional sum of squares (CSS).
//!
//! The series is differenced with `(1-B)^d (1-B^s)^D`, and the differenced
//! series `w` is modeled as
//!
//! ```text
//! (1 - φ(B)) (1 - Φ(B^s)) w_t = (1 + θ(B)) (1 + Θ(B^s)) e_t
//! ```
//!
//! Coefficients are found by Nelder-Mead over the box `|c| < 0.99`, with
//! pre-sample residuals fixed at zero. Forecasts set future residuals to
//! zero and integrate the differenced forecast back to the original scale.
//!
//! ## Example
//!
//! ```rust
//! use model_core::{Predictor, Sarima};
//!
//! let pattern = [3.0, -1.0, 4.0, -2.0];
//! let data: Vec<f64> = (0..24).map(|t| 10.0 + 0.5 * t as f64 + pattern[t % 4]).collect();
//!
//! let mut model = Sarima::default();
//! model.fit(&data).unwrap();
//! let next = model.predict(1).unwrap();
//! assert!((next[0] - (10.0 + 12.0 + 3.0)).abs() < 1e-6);
//! ```

use model_spi::{ModelError, Predictor, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::optimize::NelderMead;

/// Coefficients are kept strictly inside `(-BOUND, BOUND)`.
const COEFFICIENT_BOUND: f64 = 0.99;

/// Largest accepted value of any single order component.
const MAX_ORDER: usize = 3;

/// Non-seasonal order `(p, d, q)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArimaOrder {
    pub p: usize,
    pub d: usize,
    pub q: usize,
}

impl ArimaOrder {
    pub fn new(p: usize, d: usize, q: usize) -> Self {
        Self { p, d, q }
    }
}

impl Default for ArimaOrder {
    fn default() -> Self {
        Self::new(1, 1, 1)
    }
}

/// Seasonal order `(P, D, Q, s)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonalOrder {
    pub p: usize,
    pub d: usize,
    pub q: usize,
    /// Observations per seasonal cycle
    pub period: usize,
}

impl SeasonalOrder {
    pub fn new(p: usize, d: usize, q: usize, period: usize) -> Self {
        Self { p, d, q, period }
    }
}

impl Default for SeasonalOrder {
    fn default() -> Self {
        // One hour of 15-minute samples
        Self::new(1, 1, 1, 4)
    }
}

/// Seasonal ARIMA model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sarima {
    order: ArimaOrder,
    seasonal: SeasonalOrder,
    max_iterations: usize,
    /// Non-seasonal AR coefficients (φ)
    ar: Vec<f64>,
    /// Non-seasonal MA coefficients (θ)
    ma: Vec<f64>,
    /// Seasonal AR coefficients (Φ)
    seasonal_ar: Vec<f64>,
    /// Seasonal MA coefficients (Θ)
    seasonal_ma: Vec<f64>,
    /// Residual variance of the fit
    sigma2: f64,
    /// Optimizer iterations used by the last fit
    iterations: usize,
    /// Original series
    history: Vec<f64>,
    /// Differenced series
    differenced: Vec<f64>,
    /// In-sample residuals of the differenced series
    residuals: Vec<f64>,
    fitted: bool,
}

impl Default for Sarima {
    fn default() -> Self {
        Self::unchecked(ArimaOrder::default(), SeasonalOrder::default(), 2000)
    }
}

impl Sarima {
    /// Create a new unfitted model
    ///
    /// # Arguments
    ///
    /// * `order` - Non-seasonal `(p, d, q)`, each component at most 3
    /// * `seasonal` - Seasonal `(P, D, Q, s)`, each order component at most 3
    ///   and `s >= 2` whenever a seasonal component is used
    /// * `max_iterations` - Optimizer iteration limit
    pub fn new(order: ArimaOrder, seasonal: SeasonalOrder, max_iterations: usize) -> Result<Self> {
        for (name, value) in [
            ("p", order.p),
            ("d", order.d),
            ("q", order.q),
            ("P", seasonal.p),
            ("D", seasonal.d),
            ("Q", seasonal.q),
        ] {
            if value > MAX_ORDER {
                return Err(ModelError::InvalidParameter {
                    name: name.to_string(),
                    reason: format!("must be <= {}", MAX_ORDER),
                });
            }
        }

        let uses_season = seasonal.p + seasonal.d + seasonal.q > 0;
        if uses_season && seasonal.period < 2 {
            return Err(ModelError::InvalidParameter {
                name: "period".to_string(),
                reason: "seasonal period must be >= 2".to_string(),
            });
        }

        if max_iterations == 0 {
            return Err(ModelError::InvalidParameter {
                name: "max_iterations".to_string(),
                reason: "must be positive".to_string(),
            });
        }

        Ok(Self::unchecked(order, seasonal, max_iterations))
    }

    fn unchecked(order: ArimaOrder, seasonal: SeasonalOrder, max_iterations: usize) -> Self {
        Self {
            order,
            seasonal,
            max_iterations,
            ar: vec![0.0; order.p],
            ma: vec![0.0; order.q],
            seasonal_ar: vec![0.0; seasonal.p],
            seasonal_ma: vec![0.0; seasonal.q],
            sigma2: 0.0,
            iterations: 0,
            history: Vec::new(),
            differenced: Vec::new(),
            residuals: Vec::new(),
            fitted: false,
        }
    }

    /// Minimum series length the orders can be estimated from.
    pub fn min_observations(&self) -> usize {
        let s = self.seasonal;
        let o = self.order;
        s.period * (s.p + s.d + s.q) + o.p + o.d + o.q + 1
    }

    pub fn order(&self) -> ArimaOrder {
        self.order
    }

    pub fn seasonal_order(&self) -> SeasonalOrder {
        self.seasonal
    }

    pub fn ar_coefficients(&self) -> &[f64] {
        &self.ar
    }

    pub fn ma_coefficients(&self) -> &[f64] {
        &self.ma
    }

    pub fn seasonal_ar_coefficients(&self) -> &[f64] {
        &self.seasonal_ar
    }

    pub fn seasonal_ma_coefficients(&self) -> &[f64] {
        &self.seasonal_ma
    }

    /// Residual variance (mean squared CSS residual)
    pub fn sigma2(&self) -> f64 {
        self.sigma2
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    fn num_parameters(&self) -> usize {
        self.order.p + self.order.q + self.seasonal.p + self.seasonal.q
    }

    /// Split a flat parameter vector into (φ, θ, Φ, Θ).
    fn split<'a>(&self, params: &'a [f64]) -> (&'a [f64], &'a [f64], &'a [f64], &'a [f64]) {
        let (ar, rest) = params.split_at(self.order.p);
        let (ma, rest) = rest.split_at(self.order.q);
        let (sar, sma) = rest.split_at(self.seasonal.p);
        (ar, ma, sar, sma)
    }

    /// Full AR and MA lag polynomials for a parameter vector.
    fn polynomials(&self, params: &[f64]) -> (Vec<f64>, Vec<f64>) {
        let (ar, ma, sar, sma) = self.split(params);
        let period = self.seasonal.period;
        let ar_poly = multiply(&lag_polynomial(ar, 1, -1.0), &lag_polynomial(sar, period, -1.0));
        let ma_poly = multiply(&lag_polynomial(ma, 1, 1.0), &lag_polynomial(sma, period, 1.0));
        (ar_poly, ma_poly)
    }

    fn differencing_polynomial(&self) -> Vec<f64> {
        let mut poly = vec![1.0];
        for _ in 0..self.order.d {
            poly = multiply(&poly, &[1.0, -1.0]);
        }
        for _ in 0..self.seasonal.d {
            let mut seasonal = vec![0.0; self.seasonal.period + 1];
            seasonal[0] = 1.0;
            seasonal[self.seasonal.period] = -1.0;
            poly = multiply(&poly, &seasonal);
        }
        poly
    }

    /// Mean squared CSS residual; `+inf` outside the coefficient box.
    fn objective(&self, differenced: &[f64], params: &[f64]) -> f64 {
        if params.iter().any(|c| c.abs() >= COEFFICIENT_BOUND) {
            return f64::INFINITY;
        }
        let (ar_poly, ma_poly) = self.polynomials(params);
        let start = ar_poly.len() - 1;
        let residuals = css_residuals(differenced, &ar_poly, &ma_poly);
        let count = differenced.len() - start;
        residuals[start..].iter().map(|e| e * e).sum::<f64>() / count as f64
    }
}

impl Predictor for Sarima {
    fn fit(&mut self, data: &[f64]) -> Result<()> {
        let required = self.min_observations();
        if data.len() < required {
            return Err(ModelError::InsufficientHistory {
                required,
                actual: data.len(),
            });
        }

        if data.iter().any(|v| !v.is_finite()) {
            return Err(ModelError::InvalidData(
                "Data contains NaN or infinite values".to_string(),
            ));
        }

        let delta = self.differencing_polynomial();
        let differenced = apply_difference(data, &delta);

        let dims = self.num_parameters();
        let (params, iterations) = if dims == 0 {
            (Vec::new(), 0)
        } else {
            let minimum = NelderMead::new(self.max_iterations)
                .minimize(|x| self.objective(&differenced, x), &vec![0.0; dims])?;
            (minimum.point, minimum.iterations)
        };

        let (ar_poly, ma_poly) = self.polynomials(&params);
        let residuals = css_residuals(&differenced, &ar_poly, &ma_poly);
        let start = ar_poly.len() - 1;
        let count = (differenced.len() - start) as f64;
        let sigma2 = residuals[start..].iter().map(|e| e * e).sum::<f64>() / count;

        if !sigma2.is_finite() {
            return Err(ModelError::NumericalError(
                "Seasonal model residuals are not finite".to_string(),
            ));
        }

        let (ar, ma, sar, sma) = self.split(&params);
        let (ar, ma, sar, sma) = (ar.to_vec(), ma.to_vec(), sar.to_vec(), sma.to_vec());
        self.ar = ar;
        self.ma = ma;
        self.seasonal_ar = sar;
        self.seasonal_ma = sma;
        self.sigma2 = sigma2;
        self.iterations = iterations;
        self.history = data.to_vec();
        self.differenced = differenced;
        self.residuals = residuals;
        self.fitted = true;

        debug!(
            observations = data.len(),
            iterations,
            sigma2,
            "Fitted seasonal model"
        );

        Ok(())
    }

    fn predict(&self, steps: usize) -> Result<Vec<f64>> {
        if !self.fitted {
            return Err(ModelError::NotFitted);
        }

        let params: Vec<f64> = self
            .ar
            .iter()
            .chain(&self.ma)
            .chain(&self.seasonal_ar)
            .chain(&self.seasonal_ma)
            .copied()
            .collect();
        let (ar_poly, ma_poly) = self.polynomials(&params);
        let delta = self.differencing_polynomial();

        let mut w = self.differenced.clone();
        let mut e = self.residuals.clone();
        let mut y = self.history.clone();
        let mut forecasts = Vec::with_capacity(steps);

        for _ in 0..steps {
            let t = w.len();
            let mut next_w = 0.0;
            for (k, c) in ar_poly.iter().enumerate().skip(1) {
                next_w -= c * w[t - k];
            }
            for (k, m) in ma_poly.iter().enumerate().skip(1) {
                next_w += m * e[t - k];
            }
            w.push(next_w);
            e.push(0.0);

            let ty = y.len();
            let mut next_y = next_w;
            for (k, c) in delta.iter().enumerate().skip(1) {
                next_y -= c * y[ty - k];
            }
            y.push(next_y);
            forecasts.push(next_y);
        }

        if forecasts.iter().any(|v| !v.is_finite()) {
            return Err(ModelError::NumericalError(
                "Seasonal forecast is not finite".to_string(),
            ));
        }

        Ok(forecasts)
    }

    fn is_fitted(&self) -> bool {
        self.fitted
    }
}

/// `1 + sign * Σ c_i B^(i*step)`
fn lag_polynomial(coefficients: &[f64], step: usize, sign: f64) -> Vec<f64> {
    let mut poly = vec![0.0; coefficients.len() * step + 1];
    poly[0] = 1.0;
    for (i, c) in coefficients.iter().enumerate() {
        poly[(i + 1) * step] = sign * c;
    }
    poly
}

fn multiply(a: &[f64], b: &[f64]) -> Vec<f64> {
    let mut product = vec![0.0; a.len() + b.len() - 1];
    for (i, x) in a.iter().enumerate() {
        for (j, y) in b.iter().enumerate() {
            product[i + j] += x * y;
        }
    }
    product
}

/// `w_i = Σ δ_k y_(i+L-k)` for every `i` with a full window.
fn apply_difference(data: &[f64], delta: &[f64]) -> Vec<f64> {
    let lag = delta.len() - 1;
    (lag..data.len())
        .map(|t| delta.iter().enumerate().map(|(k, c)| c * data[t - k]).sum())
        .collect()
}

/// Residuals of the ARMA recursion; entries before the first full AR
/// window stay zero.
fn css_residuals(w: &[f64], ar_poly: &[f64], ma_poly: &[f64]) -> Vec<f64> {
    let start = ar_poly.len() - 1;
    let mut e = vec![0.0; w.len()];
    for t in start..w.len() {
        let mut value: f64 = ar_poly.iter().enumerate().map(|(k, c)| c * w[t - k]).sum();
        for (k, m) in ma_poly.iter().enumerate().skip(1) {
            if k > t {
                break;
            }
            value -= m * e[t - k];
        }
        e[t] = value;
    }
    e
}
