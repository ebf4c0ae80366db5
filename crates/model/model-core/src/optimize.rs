//! Derivative-free minimization
//!
//! Nelder-Mead simplex search, used to estimate seasonal model coefficients
//! by minimizing the conditional sum of squares.

use model_spi::{ModelError, Result};

const REFLECTION: f64 = 1.0;
const EXPANSION: f64 = 2.0;
const CONTRACTION: f64 = 0.5;
const SHRINK: f64 = 0.5;

/// Outcome of a converged minimization.
#[derive(Debug, Clone, PartialEq)]
pub struct Minimum {
    pub point: Vec<f64>,
    pub value: f64,
    pub iterations: usize,
}

/// Nelder-Mead simplex minimizer.
#[derive(Debug, Clone)]
pub struct NelderMead {
    max_iterations: usize,
    /// Relative tolerance on the spread of objective values
    f_tolerance: f64,
    /// Absolute tolerance on the spread of simplex vertices
    x_tolerance: f64,
    /// Edge length of the initial simplex
    initial_step: f64,
}

impl Default for NelderMead {
    fn default() -> Self {
        Self {
            max_iterations: 2000,
            f_tolerance: 1e-8,
            x_tolerance: 1e-4,
            initial_step: 0.5,
        }
    }
}

impl NelderMead {
    pub fn new(max_iterations: usize) -> Self {
        Self {
            max_iterations,
            ..Self::default()
        }
    }

    pub fn with_f_tolerance(mut self, tolerance: f64) -> Self {
        self.f_tolerance = tolerance;
        self
    }

    pub fn with_x_tolerance(mut self, tolerance: f64) -> Self {
        self.x_tolerance = tolerance;
        self
    }

    pub fn with_initial_step(mut self, step: f64) -> Self {
        self.initial_step = step;
        self
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// Minimize `objective` starting from `start`.
    ///
    /// Non-finite objective values are treated as `+inf`. Returns
    /// [`ModelError::NonConvergent`] when the tolerances are not met within
    /// the iteration limit.
    pub fn minimize<F>(&self, objective: F, start: &[f64]) -> Result<Minimum>
    where
        F: Fn(&[f64]) -> f64,
    {
        let n = start.len();
        if n == 0 {
            return Err(ModelError::InvalidParameter {
                name: "start".to_string(),
                reason: "must have at least one dimension".to_string(),
            });
        }

        let eval = |x: &[f64]| {
            let value = objective(x);
            if value.is_finite() {
                value
            } else {
                f64::INFINITY
            }
        };

        // Initial simplex: start plus one step along each axis
        let mut simplex: Vec<Vec<f64>> = Vec::with_capacity(n + 1);
        simplex.push(start.to_vec());
        for i in 0..n {
            let mut vertex = start.to_vec();
            vertex[i] += self.initial_step;
            simplex.push(vertex);
        }
        let mut values: Vec<f64> = simplex.iter().map(|x| eval(x)).collect();

        for iteration in 0..=self.max_iterations {
            order(&mut simplex, &mut values);

            if self.converged(&simplex, &values) {
                return Ok(Minimum {
                    point: simplex[0].clone(),
                    value: values[0],
                    iterations: iteration,
                });
            }
            if iteration == self.max_iterations {
                break;
            }

            let centroid = centroid(&simplex[..n]);
            let worst = &simplex[n];

            let reflected = along(&centroid, worst, -REFLECTION);
            let f_reflected = eval(&reflected);

            if f_reflected < values[0] {
                let expanded = along(&centroid, worst, -EXPANSION);
                let f_expanded = eval(&expanded);
                if f_expanded < f_reflected {
                    simplex[n] = expanded;
                    values[n] = f_expanded;
                } else {
                    simplex[n] = reflected;
                    values[n] = f_reflected;
                }
                continue;
            }

            if f_reflected < values[n - 1] {
                simplex[n] = reflected;
                values[n] = f_reflected;
                continue;
            }

            let (contracted, f_contracted) = if f_reflected < values[n] {
                // Outside contraction
                let point = along(&centroid, worst, -CONTRACTION);
                let value = eval(&point);
                (point, value)
            } else {
                // Inside contraction
                let point = along(&centroid, worst, CONTRACTION);
                let value = eval(&point);
                (point, value)
            };

            if f_contracted < values[n].min(f_reflected) {
                simplex[n] = contracted;
                values[n] = f_contracted;
                continue;
            }

            // Shrink toward the best vertex
            let best = simplex[0].clone();
            for i in 1..=n {
                simplex[i] = along(&best, &simplex[i], SHRINK);
                values[i] = eval(&simplex[i]);
            }
        }

        Err(ModelError::NonConvergent {
            iterations: self.max_iterations,
        })
    }

    fn converged(&self, simplex: &[Vec<f64>], values: &[f64]) -> bool {
        let best = values[0];
        let worst = values[values.len() - 1];
        if !best.is_finite() || !worst.is_finite() {
            return false;
        }

        let f_spread = worst - best;
        let x_spread = simplex[1..]
            .iter()
            .flat_map(|vertex| vertex.iter().zip(&simplex[0]).map(|(a, b)| (a - b).abs()))
            .fold(0.0_f64, f64::max);

        f_spread <= self.f_tolerance * best.abs().max(1.0) && x_spread <= self.x_tolerance
    }
}

/// Sort vertices by ascending objective value.
fn order(simplex: &mut Vec<Vec<f64>>, values: &mut Vec<f64>) {
    let mut indices: Vec<usize> = (0..values.len()).collect();
    indices.sort_by(|&a, &b| values[a].total_cmp(&values[b]));
    *simplex = indices.iter().map(|&i| simplex[i].clone()).collect();
    *values = indices.iter().map(|&i| values[i]).collect();
}

fn centroid(vertices: &[Vec<f64>]) -> Vec<f64> {
    let n = vertices.len() as f64;
    let dim = vertices[0].len();
    (0..dim)
        .map(|j| vertices.iter().map(|v| v[j]).sum::<f64>() / n)
        .collect()
}

/// `origin + t * (target - origin)`
fn along(origin: &[f64], target: &[f64], t: f64) -> Vec<f64> {
    origin
        .iter()
        .zip(target)
        .map(|(o, x)| o + t * (x - o))
        .collect()
}
