use ndarray::{Array1, Array2};

use super::LeastSquares;
use crate::preprocess::{PolynomialFeatures, StandardScaler};

/// Expanded training matrices above this size get a warning; the SVD needs
/// a few times as much again.
pub const WIDE_EXPANSION_BYTES: usize = 256 * 1024 * 1024;

/// Bytes held by one `rows x cols` matrix of `f64`.
pub fn expansion_bytes(rows: usize, cols: usize) -> usize {
    rows.saturating_mul(cols).saturating_mul(std::mem::size_of::<f64>())
}

/// Polynomial expansion -> standardization -> least squares, all fitted on
/// the raw training features.
#[derive(Debug, Clone)]
pub struct PolynomialRegression {
    expansion: PolynomialFeatures,
    scaler: StandardScaler,
    ols: LeastSquares,
}

impl PolynomialRegression {
    pub fn fit(x: &Array2<f64>, y: &Array1<f64>, degree: usize) -> Result<Self, String> {
        let expansion = PolynomialFeatures::new(x.ncols(), degree);
        let expanded_cols = expansion.n_output_features();
        let bytes = expansion_bytes(x.nrows(), expanded_cols);
        if bytes > WIDE_EXPANSION_BYTES {
            tracing::warn!(
                degree,
                rows = x.nrows(),
                expanded = expanded_cols,
                mib = bytes >> 20,
                "Wide polynomial expansion, fitting will be slow and memory hungry"
            );
        } else {
            tracing::debug!(
                degree,
                inputs = x.ncols(),
                expanded = expanded_cols,
                "Expanding polynomial features"
            );
        }
        // expand, scale and center share one buffer that nalgebra then takes over
        let expanded = expansion.transform(x);
        let scaler = StandardScaler::fit(&expanded).map_err(|e| e.to_string())?;
        let ols = LeastSquares::fit_owned(scaler.transform_owned(expanded), y)?;
        Ok(Self {
            expansion,
            scaler,
            ols,
        })
    }

    pub fn predict(&self, x: &Array2<f64>) -> Array1<f64> {
        let expanded = self.expansion.transform(x);
        self.ols.predict(&self.scaler.transform(&expanded))
    }

    pub fn degree(&self) -> usize {
        self.expansion.degree()
    }

    pub fn n_expanded_features(&self) -> usize {
        self.scaler.n_features()
    }
}
