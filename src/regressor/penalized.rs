use ndarray::{Array1, Array2, Axis};
use smartcore::linear::elastic_net::{ElasticNet, ElasticNetParameters};
use smartcore::linear::lasso::{Lasso, LassoParameters};
use smartcore::linear::ridge_regression::{RidgeRegression, RidgeRegressionParameters};

use crate::config::SolverConfig;

/// Ridge, lasso and elastic net fitted with smartcore on centered data.
///
/// Penalties are expressed the scikit-learn way and converted to smartcore's
/// unscaled objective `||y - Xw||^2 + l2 ||w||^2 + l1 ||w||_1` before fitting.
#[derive(Debug, Clone)]
pub struct PenalizedRegression {
    coef: Array1<f64>,
    intercept: f64,
}

/// Training data shifted to zero column means and zero target mean.
struct CenteredInput {
    x: Array2<f64>,
    y: Array1<f64>,
    x_mean: Array1<f64>,
    y_mean: f64,
}

impl CenteredInput {
    fn new(x: &Array2<f64>, y: &Array1<f64>) -> Result<Self, String> {
        if x.nrows() == 0 || x.nrows() != y.len() {
            return Err(format!(
                "expected matching non-empty inputs, got {} rows and {} targets",
                x.nrows(),
                y.len()
            ));
        }
        let x_mean = x
            .mean_axis(Axis(0))
            .ok_or_else(|| "empty training matrix".to_string())?;
        let y_mean = y.sum() / y.len() as f64;
        Ok(Self {
            x: x - &x_mean,
            y: y - y_mean,
            x_mean,
            y_mean,
        })
    }

    /// Map coefficients fitted on the centered data back to the input scale.
    fn finish(self, coef: Array1<f64>, inner_intercept: f64) -> PenalizedRegression {
        let intercept = self.y_mean + inner_intercept - self.x_mean.dot(&coef);
        PenalizedRegression { coef, intercept }
    }
}

fn column(values: &Array2<f64>) -> Array1<f64> {
    values.iter().copied().collect()
}

impl PenalizedRegression {
    /// Objective `||y - Xw||^2 + alpha ||w||^2`.
    pub fn ridge(x: &Array2<f64>, y: &Array1<f64>, alpha: f64) -> Result<Self, String> {
        let data = CenteredInput::new(x, y)?;
        let params = RidgeRegressionParameters::default()
            .with_alpha(alpha)
            .with_normalize(false);
        let model = RidgeRegression::<f64, f64, Array2<f64>, Array1<f64>>::fit(
            &data.x, &data.y, params,
        )
        .map_err(|e| e.to_string())?;
        let coef = column(model.coefficients());
        let inner = *model.intercept();
        tracing::debug!(alpha, features = coef.len(), "Ridge fitted");
        Ok(data.finish(coef, inner))
    }

    /// Objective `1/(2n) ||y - Xw||^2 + alpha ||w||_1`, which is smartcore's
    /// lasso with its penalty doubled.
    pub fn lasso(
        x: &Array2<f64>,
        y: &Array1<f64>,
        alpha: f64,
        solver: &SolverConfig,
    ) -> Result<Self, String> {
        let data = CenteredInput::new(x, y)?;
        let params = LassoParameters::default()
            .with_alpha(2.0 * alpha)
            .with_normalize(false)
            .with_fit_intercept(true)
            .with_tol(solver.tolerance)
            .with_max_iter(solver.max_iterations as usize);
        let model = Lasso::<f64, f64, Array2<f64>, Array1<f64>>::fit(&data.x, &data.y, params)
            .map_err(|e| e.to_string())?;
        let coef = column(model.coefficients());
        let inner = *model.intercept();
        tracing::debug!(
            alpha,
            nonzero = coef.iter().filter(|w| w.abs() > 0.0).count(),
            "Lasso fitted"
        );
        Ok(data.finish(coef, inner))
    }

    /// Objective `1/(2n) ||y - Xw||^2 + alpha * l1_ratio ||w||_1
    /// + alpha * (1 - l1_ratio) / 2 ||w||^2`.
    pub fn elastic_net(
        x: &Array2<f64>,
        y: &Array1<f64>,
        alpha: f64,
        l1_ratio: f64,
        solver: &SolverConfig,
    ) -> Result<Self, String> {
        let (penalty, mix) = smartcore_elastic_penalty(alpha, l1_ratio);
        let data = CenteredInput::new(x, y)?;
        let params = ElasticNetParameters::default()
            .with_alpha(penalty)
            .with_l1_ratio(mix)
            .with_normalize(false)
            .with_tol(solver.tolerance)
            .with_max_iter(solver.max_iterations as usize);
        let model =
            ElasticNet::<f64, f64, Array2<f64>, Array1<f64>>::fit(&data.x, &data.y, params)
                .map_err(|e| e.to_string())?;
        let coef = column(model.coefficients());
        let inner = *model.intercept();
        tracing::debug!(alpha, l1_ratio, penalty, mix, "Elastic net fitted");
        Ok(data.finish(coef, inner))
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

/// smartcore scales its penalties as `l1 = a * r * n` and
/// `l2 = a * (1 - r) * n` against an unscaled squared loss. Matching the
/// `1/(2n)` objective needs `l1 = 2n * alpha * l1_ratio` and
/// `l2 = n * alpha * (1 - l1_ratio)`.
pub(crate) fn smartcore_elastic_penalty(alpha: f64, l1_ratio: f64) -> (f64, f64) {
    let penalty = alpha * (1.0 + l1_ratio);
    let mix = 2.0 * l1_ratio / (1.0 + l1_ratio);
    (penalty, mix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elastic_penalty_conversion_preserves_both_terms() {
        let (alpha, ratio) = (0.1, 0.5);
        let (a, r) = smartcore_elastic_penalty(alpha, ratio);
        assert!((a * r - 2.0 * alpha * ratio).abs() < 1e-12);
        assert!((a * (1.0 - r) - alpha * (1.0 - ratio)).abs() < 1e-12);
    }

    #[test]
    fn pure_l1_maps_to_pure_l1() {
        let (a, r) = smartcore_elastic_penalty(0.3, 1.0);
        assert!((r - 1.0).abs() < 1e-12);
        assert!((a - 0.6).abs() < 1e-12);
    }
}
