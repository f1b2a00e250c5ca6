use ndarray::{Array1, Array2, Axis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::config::SplitConfig;
use crate::error::{AppError, AppResult};

/// Row indices of the train/validation/test partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitIndices {
    pub train: Vec<usize>,
    pub validation: Vec<usize>,
    pub test: Vec<usize>,
}

impl SplitIndices {
    pub fn total(&self) -> usize {
        self.train.len() + self.validation.len() + self.test.len()
    }

    /// Realised (train, validation, test) fractions.
    pub fn proportions(&self) -> (f64, f64, f64) {
        let total = self.total().max(1) as f64;
        (
            self.train.len() as f64 / total,
            self.validation.len() as f64 / total,
            self.test.len() as f64 / total,
        )
    }
}

/// Carve `test_fraction` off a permutation of `indices`, test rows first.
fn shuffle_split(
    mut indices: Vec<usize>,
    test_fraction: f64,
    rng: &mut StdRng,
) -> (Vec<usize>, Vec<usize>) {
    let n_test = (indices.len() as f64 * test_fraction).ceil() as usize;
    indices.shuffle(rng);
    let rest = indices.split_off(n_test.min(indices.len()));
    (rest, indices)
}

/// Two-stage seeded split: hold out a fraction, then halve the holdout into
/// validation and test. Each stage draws from a generator freshly seeded
/// with the same seed.
pub fn three_way_split(n: usize, cfg: &SplitConfig) -> AppResult<SplitIndices> {
    let (train, holdout) = shuffle_split(
        (0..n).collect(),
        cfg.holdout_fraction,
        &mut StdRng::seed_from_u64(cfg.seed),
    );
    let (validation, test) = shuffle_split(
        holdout,
        cfg.test_fraction_of_holdout,
        &mut StdRng::seed_from_u64(cfg.seed),
    );

    if train.len() < 2 || validation.is_empty() || test.is_empty() {
        return Err(AppError::TooFewRows {
            rows: n,
            min: crate::dataset::MIN_ROWS,
        });
    }

    Ok(SplitIndices {
        train,
        validation,
        test,
    })
}

pub fn take_rows(x: &Array2<f64>, rows: &[usize]) -> Array2<f64> {
    x.select(Axis(0), rows)
}

pub fn take_values(y: &Array1<f64>, rows: &[usize]) -> Array1<f64> {
    y.select(Axis(0), rows)
}
