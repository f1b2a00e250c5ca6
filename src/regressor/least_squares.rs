use ndarray::{Array1, Array2};

use super::{center, center_owned, rank_cutoff, to_array1, Centered};

/// Ordinary least squares with intercept.
///
/// Solved as a minimum-norm least-squares problem on centered data, so
/// rank-deficient designs (duplicate or constant columns) still fit.
#[derive(Debug, Clone)]
pub struct LeastSquares {
    coef: Array1<f64>,
    intercept: f64,
}

impl LeastSquares {
    pub fn fit(x: &Array2<f64>, y: &Array1<f64>) -> Result<Self, String> {
        Self::solve(center(x, y)?)
    }

    /// Same as [`LeastSquares::fit`], consuming `x` instead of copying it.
    pub fn fit_owned(x: Array2<f64>, y: &Array1<f64>) -> Result<Self, String> {
        Self::solve(center_owned(x, y)?)
    }

    fn solve(centered: Centered) -> Result<Self, String> {
        let (rows, cols) = centered.x.shape();
        let svd = centered.x.svd(true, true);
        let eps = rank_cutoff(&svd.singular_values, rows, cols);
        let w = svd
            .solve(&centered.y, eps)
            .map_err(|e| format!("least-squares solve failed: {}", e))?;
        let coef = to_array1(&w);
        let intercept = centered.y_mean - centered.x_mean.dot(&coef);
        Ok(Self { coef, intercept })
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
}
