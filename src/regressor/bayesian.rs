use nalgebra::DVector;
use ndarray::{Array1, Array2};

use super::{center, to_array1};
use crate::config::SolverConfig;

// Gamma hyperprior shape/rate for the noise precision (alpha) and the
// weight precision (lambda).
const ALPHA_1: f64 = 1e-6;
const ALPHA_2: f64 = 1e-6;
const LAMBDA_1: f64 = 1e-6;
const LAMBDA_2: f64 = 1e-6;

/// Bayesian ridge regression fitted by evidence maximisation.
///
/// Iterates the MacKay fixed-point updates for the noise precision `alpha`
/// and weight precision `lambda`, reusing one SVD of the centered design.
#[derive(Debug, Clone)]
pub struct BayesianRidge {
    coef: Array1<f64>,
    intercept: f64,
    alpha: f64,
    lambda: f64,
    iterations: usize,
}

impl BayesianRidge {
    pub fn fit(x: &Array2<f64>, y: &Array1<f64>, solver: &SolverConfig) -> Result<Self, String> {
        let centered = center(x, y)?;
        let n_samples = centered.x.nrows() as f64;

        let y_var = centered.y.norm_squared() / n_samples;
        let mut alpha = 1.0 / (y_var + f64::EPSILON);
        let mut lambda = 1.0;

        let svd = centered.x.clone().svd(true, true);
        let u = svd
            .u
            .as_ref()
            .ok_or_else(|| "SVD did not produce U".to_string())?;
        let v_t = svd
            .v_t
            .as_ref()
            .ok_or_else(|| "SVD did not produce V^T".to_string())?;
        let s = &svd.singular_values;
        let uty = u.transpose() * &centered.y;
        let eigen_vals: DVector<f64> = s.map(|v| v * v);

        let posterior_mean = |alpha: f64, lambda: f64| -> DVector<f64> {
            let ratio = lambda / alpha;
            let scaled = DVector::from_iterator(
                s.len(),
                s.iter()
                    .zip(uty.iter())
                    .map(|(sv, proj)| sv / (sv * sv + ratio) * proj),
            );
            v_t.transpose() * scaled
        };

        let mut coef_old: Option<DVector<f64>> = None;
        let mut iterations = 0;
        for iter in 0..solver.bayes_max_iterations {
            iterations = iter + 1;
            let coef = posterior_mean(alpha, lambda);
            let residual = &centered.y - &centered.x * &coef;
            let rmse = residual.norm_squared();

            let gamma: f64 = eigen_vals
                .iter()
                .map(|ev| alpha * ev / (lambda + alpha * ev))
                .sum();
            lambda = (gamma + 2.0 * LAMBDA_1) / (coef.norm_squared() + 2.0 * LAMBDA_2);
            alpha = (n_samples - gamma + 2.0 * ALPHA_1) / (rmse + 2.0 * ALPHA_2);

            if let Some(prev) = &coef_old {
                let change: f64 = (prev - &coef).iter().map(|d| d.abs()).sum();
                if change < solver.bayes_tolerance {
                    break;
                }
            }
            coef_old = Some(coef);
        }

        if !(alpha.is_finite() && lambda.is_finite()) {
            return Err(format!(
                "precision estimates diverged (alpha={}, lambda={})",
                alpha, lambda
            ));
        }

        let coef = to_array1(&posterior_mean(alpha, lambda));
        let intercept = centered.y_mean - centered.x_mean.dot(&coef);
        tracing::debug!(alpha, lambda, iterations, "Bayesian ridge converged");
        Ok(Self {
            coef,
            intercept,
            alpha,
            lambda,
            iterations,
        })
    }

    pub fn predict(&self, x: &Array2<f64>) -> Array1<f64> {
        x.dot(&self.coef) + self.intercept
    }

    pub fn coefficients(&self) -> &Array1<f64> {
        &self.coef
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Estimated noise precision.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Estimated weight precision.
    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }
}
