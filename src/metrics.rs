use ndarray::ArrayView1;
use serde::Serialize;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FitScores {
    pub mse: f64,
    pub r2: f64,
}

impl FitScores {
    pub fn compute(actual: ArrayView1<f64>, predicted: ArrayView1<f64>) -> AppResult<Self> {
        Ok(Self {
            mse: mean_squared_error(actual, predicted)?,
            r2: r2_score(actual, predicted)?,
        })
    }
}

fn check_lengths(actual: ArrayView1<f64>, predicted: ArrayView1<f64>) -> AppResult<()> {
    if actual.is_empty() || actual.len() != predicted.len() {
        return Err(AppError::Metric(format!(
            "actual ({}) and predicted ({}) must have the same non-zero length",
            actual.len(),
            predicted.len()
        )));
    }
    Ok(())
}

pub fn mean_squared_error(actual: ArrayView1<f64>, predicted: ArrayView1<f64>) -> AppResult<f64> {
    check_lengths(actual, predicted)?;
    let sse: f64 = actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| (a - p).powi(2))
        .sum();
    Ok(sse / actual.len() as f64)
}

/// Coefficient of determination. A constant `actual` scores 1.0 when
/// predicted exactly and 0.0 otherwise.
pub fn r2_score(actual: ArrayView1<f64>, predicted: ArrayView1<f64>) -> AppResult<f64> {
    check_lengths(actual, predicted)?;
    let mean = actual.sum() / actual.len() as f64;
    let ss_res: f64 = actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| (a - p).powi(2))
        .sum();
    let ss_tot: f64 = actual.iter().map(|a| (a - mean).powi(2)).sum();
    if ss_tot == 0.0 {
        return Ok(if ss_res == 0.0 { 1.0 } else { 0.0 });
    }
    Ok(1.0 - ss_res / ss_tot)
}
