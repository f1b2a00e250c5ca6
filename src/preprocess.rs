use ndarray::{Array1, Array2, Axis, ShapeBuilder};

use crate::error::{AppError, AppResult};

const MIN_STD: f64 = 1e-12;

/// Column-wise standardization fitted on the training split only.
#[derive(Debug, Clone)]
pub struct StandardScaler {
    means: Array1<f64>,
    scales: Array1<f64>,
}

impl StandardScaler {
    pub fn fit(x: &Array2<f64>) -> AppResult<Self> {
        let means = x
            .mean_axis(Axis(0))
            .ok_or_else(|| AppError::Metric("cannot fit a scaler on zero rows".to_string()))?;
        // Population std; constant columns keep scale 1 so they center to 0.
        let scales = x
            .std_axis(Axis(0), 0.0)
            .mapv(|s| if s > MIN_STD { s } else { 1.0 });
        Ok(Self { means, scales })
    }

    pub fn transform(&self, x: &Array2<f64>) -> Array2<f64> {
        (x - &self.means) / &self.scales
    }

    /// Scales `x` in place, keeping its memory layout.
    pub fn transform_owned(&self, mut x: Array2<f64>) -> Array2<f64> {
        x -= &self.means;
        x /= &self.scales;
        x
    }

    pub fn n_features(&self) -> usize {
        self.means.len()
    }
}

/// Full polynomial expansion with bias: every monomial of total degree
/// 0..=degree, graded then lexicographic by feature index.
#[derive(Debug, Clone)]
pub struct PolynomialFeatures {
    degree: usize,
    powers: Vec<Vec<usize>>,
}

impl PolynomialFeatures {
    pub fn new(n_features: usize, degree: usize) -> Self {
        let mut powers: Vec<Vec<usize>> = vec![Vec::new()];
        let mut frontier: Vec<Vec<usize>> = vec![Vec::new()];
        for _ in 0..degree {
            let mut next = Vec::new();
            for combo in &frontier {
                let start = combo.last().copied().unwrap_or(0);
                for j in start..n_features {
                    let mut extended = combo.clone();
                    extended.push(j);
                    next.push(extended);
                }
            }
            powers.extend(next.iter().cloned());
            frontier = next;
        }
        Self { degree, powers }
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    pub fn n_output_features(&self) -> usize {
        self.powers.len()
    }

    /// Column-major output: one monomial per contiguous column.
    pub fn transform(&self, x: &Array2<f64>) -> Array2<f64> {
        let mut out = Array2::<f64>::ones((x.nrows(), self.powers.len()).f());
        for (col, combo) in self.powers.iter().enumerate() {
            for &feature in combo {
                let mut target = out.column_mut(col);
                target *= &x.column(feature);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn scaler_centers_and_scales_training_columns() {
        let x = array![[1.0, 10.0], [2.0, 10.0], [3.0, 10.0]];
        let scaler = StandardScaler::fit(&x).unwrap();
        let z = scaler.transform(&x);
        let std = (2.0f64 / 3.0).sqrt();
        assert!((z[[0, 0]] + 1.0 / std).abs() < 1e-12);
        assert!(z[[1, 0]].abs() < 1e-12);
        // constant column maps to zero rather than NaN
        assert!(z.column(1).iter().all(|v| v.abs() < 1e-12));
    }

    #[test]
    fn polynomial_degree_two_matches_expected_layout() {
        let poly = PolynomialFeatures::new(2, 2);
        assert_eq!(poly.n_output_features(), 6);
        let out = poly.transform(&array![[2.0, 3.0]]);
        // 1, a, b, a^2, ab, b^2
        assert_eq!(out.row(0).to_vec(), vec![1.0, 2.0, 3.0, 4.0, 6.0, 9.0]);
    }

    #[test]
    fn owned_transform_matches_borrowed() {
        let x = array![[1.0, 4.0], [2.0, 6.0], [4.0, 5.0]];
        let scaler = StandardScaler::fit(&x).unwrap();
        let expected = scaler.transform(&x);
        assert_eq!(scaler.transform_owned(x), expected);
    }

    #[test]
    fn polynomial_output_is_column_major() {
        let poly = PolynomialFeatures::new(3, 2);
        let out = poly.transform(&array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
        assert!(out.t().is_standard_layout());
        // 1, a, b, c, a^2, ab, ...
        assert_eq!(out.column(5).to_vec(), vec![2.0, 20.0]);
    }

    #[test]
    fn polynomial_degree_three_output_count() {
        // C(n + d, d) monomials including the bias
        let poly = PolynomialFeatures::new(4, 3);
        assert_eq!(poly.n_output_features(), 35);
        assert_eq!(poly.degree(), 3);
    }
}
