//! Regression model catalogue and fitting.
//!
//! Every model is a stock linear-regression variant. Plain and polynomial
//! least squares plus Bayesian ridge go through nalgebra's SVD; ridge, lasso
//! and elastic net are smartcore's solvers.

pub mod bayesian;
pub mod least_squares;
pub mod penalized;
pub mod polynomial;

use nalgebra::{DMatrix, DVector};
use ndarray::{Array1, Array2, Axis};
use serde::Serialize;

use crate::config::SolverConfig;
use crate::error::{AppError, AppResult};

pub use bayesian::BayesianRidge;
pub use least_squares::LeastSquares;
pub use penalized::PenalizedRegression;
pub use polynomial::PolynomialRegression;

pub const RIDGE_ALPHA_OPTIONS: [f64; 4] = [0.1, 1.0, 10.0, 100.0];
pub const LASSO_ALPHA_OPTIONS: [f64; 6] = [0.001, 0.01, 0.1, 0.5, 1.0, 5.0];
pub const ELASTIC_ALPHA_OPTIONS: [f64; 4] = [0.01, 0.1, 1.0, 10.0];
pub const ELASTIC_L1_RATIO_OPTIONS: [f64; 3] = [0.1, 0.5, 0.9];
pub const POLY_DEGREE_OPTIONS: [usize; 2] = [2, 3];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    NormalLinear,
    MultipleLinear,
    Ridge,
    Lasso,
    ElasticNet,
    Polynomial,
    BayesianRidge,
}

/// Which version of the feature matrix a model consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureInput {
    Standardized,
    Raw,
}

impl ModelKind {
    pub const ALL: [ModelKind; 7] = [
        ModelKind::NormalLinear,
        ModelKind::MultipleLinear,
        ModelKind::Ridge,
        ModelKind::Lasso,
        ModelKind::ElasticNet,
        ModelKind::Polynomial,
        ModelKind::BayesianRidge,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ModelKind::NormalLinear => "Normal Linear Regression",
            ModelKind::MultipleLinear => "Multiple Linear Regression",
            ModelKind::Ridge => "Ridge Regression",
            ModelKind::Lasso => "Lasso Regression",
            ModelKind::ElasticNet => "ElasticNet Regression",
            ModelKind::Polynomial => "Polynomial Regression",
            ModelKind::BayesianRidge => "Bayesian Ridge Regression",
        }
    }

    /// Short form used in query strings.
    pub fn key(self) -> &'static str {
        match self {
            ModelKind::NormalLinear => "normal",
            ModelKind::MultipleLinear => "multiple",
            ModelKind::Ridge => "ridge",
            ModelKind::Lasso => "lasso",
            ModelKind::ElasticNet => "elasticnet",
            ModelKind::Polynomial => "polynomial",
            ModelKind::BayesianRidge => "bayesian",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.key() == key)
    }

    pub fn feature_input(self) -> FeatureInput {
        match self {
            // The polynomial pipeline expands raw features, then scales.
            ModelKind::Polynomial => FeatureInput::Raw,
            _ => FeatureInput::Standardized,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Hyperparams {
    pub ridge_alpha: f64,
    pub lasso_alpha: f64,
    pub elastic_alpha: f64,
    pub elastic_l1_ratio: f64,
    pub poly_degree: usize,
}

impl Default for Hyperparams {
    fn default() -> Self {
        Self {
            ridge_alpha: 1.0,
            lasso_alpha: 0.1,
            elastic_alpha: 0.1,
            elastic_l1_ratio: 0.5,
            poly_degree: 2,
        }
    }
}

fn check_option(name: &str, value: f64, options: &[f64]) -> AppResult<()> {
    if options.iter().any(|o| (o - value).abs() < 1e-12) {
        return Ok(());
    }
    let allowed: Vec<String> = options.iter().map(|o| o.to_string()).collect();
    Err(AppError::InvalidHyperparameter(format!(
        "{} {} is not one of {}",
        name,
        value,
        allowed.join(", ")
    )))
}

impl Hyperparams {
    pub fn validate(&self) -> AppResult<()> {
        check_option("Ridge alpha", self.ridge_alpha, &RIDGE_ALPHA_OPTIONS)?;
        check_option("Lasso alpha", self.lasso_alpha, &LASSO_ALPHA_OPTIONS)?;
        check_option("ElasticNet alpha", self.elastic_alpha, &ELASTIC_ALPHA_OPTIONS)?;
        check_option(
            "ElasticNet l1_ratio",
            self.elastic_l1_ratio,
            &ELASTIC_L1_RATIO_OPTIONS,
        )?;
        if !POLY_DEGREE_OPTIONS.contains(&self.poly_degree) {
            return Err(AppError::InvalidHyperparameter(format!(
                "Polynomial degree {} is not one of 2, 3",
                self.poly_degree
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub enum FittedRegressor {
    LeastSquares(LeastSquares),
    Penalized(PenalizedRegression),
    Polynomial(PolynomialRegression),
    BayesianRidge(BayesianRidge),
}

impl FittedRegressor {
    pub fn predict(&self, x: &Array2<f64>) -> Array1<f64> {
        match self {
            FittedRegressor::LeastSquares(m) => m.predict(x),
            FittedRegressor::Penalized(m) => m.predict(x),
            FittedRegressor::Polynomial(m) => m.predict(x),
            FittedRegressor::BayesianRidge(m) => m.predict(x),
        }
    }
}

/// Fit `kind` on the training matrix it consumes (see [`ModelKind::feature_input`]).
pub fn fit_model(
    kind: ModelKind,
    hp: &Hyperparams,
    solver: &SolverConfig,
    x: &Array2<f64>,
    y: &Array1<f64>,
) -> AppResult<FittedRegressor> {
    match kind {
        ModelKind::NormalLinear | ModelKind::MultipleLinear => {
            LeastSquares::fit(x, y).map(FittedRegressor::LeastSquares)
        }
        ModelKind::Ridge => PenalizedRegression::ridge(x, y, hp.ridge_alpha)
            .map(FittedRegressor::Penalized),
        ModelKind::Lasso => PenalizedRegression::lasso(x, y, hp.lasso_alpha, solver)
            .map(FittedRegressor::Penalized),
        ModelKind::ElasticNet => PenalizedRegression::elastic_net(
            x,
            y,
            hp.elastic_alpha,
            hp.elastic_l1_ratio,
            solver,
        )
        .map(FittedRegressor::Penalized),
        ModelKind::Polynomial => {
            PolynomialRegression::fit(x, y, hp.poly_degree).map(FittedRegressor::Polynomial)
        }
        ModelKind::BayesianRidge => {
            BayesianRidge::fit(x, y, solver).map(FittedRegressor::BayesianRidge)
        }
    }
    .map_err(|reason| AppError::ModelFit {
        model: kind.label().to_string(),
        reason,
    })
}

/// Training data with column means and the target mean removed.
pub(crate) struct Centered {
    pub x: DMatrix<f64>,
    pub y: DVector<f64>,
    pub x_mean: Array1<f64>,
    pub y_mean: f64,
}

fn check_inputs(rows: usize, targets: usize) -> Result<(), String> {
    if rows == 0 || rows != targets {
        return Err(format!(
            "expected matching non-empty inputs, got {} rows and {} targets",
            rows, targets
        ));
    }
    Ok(())
}

fn center_target(y: &Array1<f64>) -> (DVector<f64>, f64) {
    let y_mean = y.sum() / y.len() as f64;
    (
        DVector::from_iterator(y.len(), y.iter().map(|v| v - y_mean)),
        y_mean,
    )
}

pub(crate) fn center(x: &Array2<f64>, y: &Array1<f64>) -> Result<Centered, String> {
    check_inputs(x.nrows(), y.len())?;
    let x_mean = x
        .mean_axis(Axis(0))
        .ok_or_else(|| "empty training matrix".to_string())?;
    let (y, y_mean) = center_target(y);
    Ok(Centered {
        x: DMatrix::from_fn(x.nrows(), x.ncols(), |i, j| x[[i, j]] - x_mean[j]),
        y,
        x_mean,
        y_mean,
    })
}

/// Centers `x` in place. A column-major `x` hands its buffer straight to
/// nalgebra, so wide designs are held once.
pub(crate) fn center_owned(mut x: Array2<f64>, y: &Array1<f64>) -> Result<Centered, String> {
    check_inputs(x.nrows(), y.len())?;
    let x_mean = x
        .mean_axis(Axis(0))
        .ok_or_else(|| "empty training matrix".to_string())?;
    x -= &x_mean;
    let (rows, cols) = x.dim();
    let x = if x.t().is_standard_layout() {
        DMatrix::from_vec(rows, cols, x.into_raw_vec())
    } else {
        DMatrix::from_fn(rows, cols, |i, j| x[[i, j]])
    };
    let (y, y_mean) = center_target(y);
    Ok(Centered {
        x,
        y,
        x_mean,
        y_mean,
    })
}

pub(crate) fn to_array1(v: &DVector<f64>) -> Array1<f64> {
    Array1::from_iter(v.iter().copied())
}

/// Cutoff below which singular values count as zero.
pub(crate) fn rank_cutoff(singular_values: &DVector<f64>, rows: usize, cols: usize) -> f64 {
    singular_values.max() * rows.max(cols) as f64 * f64::EPSILON
}
