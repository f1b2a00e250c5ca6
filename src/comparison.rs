//! Orchestration of one dashboard run: prepared splits in, one result row
//! per selected model out.
//!
//! Splits and scaling are computed once per upload ([`PreparedData`]) so
//! changing the model selection or a hyperparameter never reshuffles rows.

use std::time::Instant;

use ndarray::{Array1, Array2};
use serde::Serialize;
use uuid::Uuid;

use crate::config::{SolverConfig, SplitConfig};
use crate::error::AppResult;
use crate::features::{build_features, FeatureMatrix};
use crate::metrics::FitScores;
use crate::model::sales::SalesRecord;
use crate::preprocess::StandardScaler;
use crate::regressor::{fit_model, FeatureInput, Hyperparams, ModelKind};
use crate::split::{take_rows, take_values, three_way_split, SplitIndices};

#[derive(Debug, Clone)]
pub struct SplitPart {
    pub raw: Array2<f64>,
    pub scaled: Array2<f64>,
    pub target: Array1<f64>,
}

impl SplitPart {
    fn new(features: &FeatureMatrix, rows: &[usize], scaler: &StandardScaler) -> Self {
        let raw = take_rows(&features.x, rows);
        let scaled = scaler.transform(&raw);
        Self {
            raw,
            scaled,
            target: take_values(&features.y, rows),
        }
    }

    pub fn input(&self, input: FeatureInput) -> &Array2<f64> {
        match input {
            FeatureInput::Standardized => &self.scaled,
            FeatureInput::Raw => &self.raw,
        }
    }

    pub fn len(&self) -> usize {
        self.target.len()
    }

    pub fn is_empty(&self) -> bool {
        self.target.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct PreparedData {
    pub feature_names: Vec<String>,
    pub n_rows: usize,
    pub split: SplitIndices,
    pub train: SplitPart,
    pub validation: SplitPart,
    pub test: SplitPart,
}

impl PreparedData {
    pub fn from_records(records: &[SalesRecord], split_cfg: &SplitConfig) -> AppResult<Self> {
        let features = build_features(records)?;
        Self::from_features(&features, split_cfg)
    }

    pub fn from_features(features: &FeatureMatrix, split_cfg: &SplitConfig) -> AppResult<Self> {
        let split = three_way_split(features.n_samples(), split_cfg)?;
        let scaler = StandardScaler::fit(&take_rows(&features.x, &split.train))?;
        let train = SplitPart::new(features, &split.train, &scaler);
        let validation = SplitPart::new(features, &split.validation, &scaler);
        let test = SplitPart::new(features, &split.test, &scaler);
        Ok(Self {
            feature_names: features.feature_names.clone(),
            n_rows: features.n_samples(),
            split,
            train,
            validation,
            test,
        })
    }
}

/// Sidebar state for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunRequest {
    pub models: Vec<ModelKind>,
    pub hyperparams: Hyperparams,
}

impl Default for RunRequest {
    fn default() -> Self {
        Self {
            models: ModelKind::ALL.to_vec(),
            hyperparams: Hyperparams::default(),
        }
    }
}

impl RunRequest {
    pub fn is_selected(&self, kind: ModelKind) -> bool {
        self.models.contains(&kind)
    }

    /// Selected models, deduplicated, in catalogue order.
    pub fn ordered_models(&self) -> Vec<ModelKind> {
        ModelKind::ALL
            .into_iter()
            .filter(|k| self.is_selected(*k))
            .collect()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ModelResult {
    pub kind: ModelKind,
    pub label: String,
    pub validation: FitScores,
    pub test: FitScores,
    pub test_predictions: Vec<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComparisonReport {
    pub run_id: Uuid,
    pub hyperparams: Hyperparams,
    pub rows: Vec<ModelResult>,
    pub test_actual: Vec<f64>,
    pub elapsed_ms: u64,
}

impl ComparisonReport {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, kind: ModelKind) -> Option<&ModelResult> {
        self.rows.iter().find(|r| r.kind == kind)
    }
}

pub fn run_comparison(
    data: &PreparedData,
    request: &RunRequest,
    solver: &SolverConfig,
) -> AppResult<ComparisonReport> {
    request.hyperparams.validate()?;

    let run_id = Uuid::new_v4();
    let started = Instant::now();
    let models = request.ordered_models();
    tracing::info!(
        %run_id,
        models = models.len(),
        train = data.train.len(),
        validation = data.validation.len(),
        test = data.test.len(),
        "Starting comparison run"
    );

    let mut rows = Vec::with_capacity(models.len());
    for kind in models {
        let input = kind.feature_input();
        let fitted = fit_model(
            kind,
            &request.hyperparams,
            solver,
            data.train.input(input),
            &data.train.target,
        )?;
        let val_pred = fitted.predict(data.validation.input(input));
        let test_pred = fitted.predict(data.test.input(input));
        let validation = FitScores::compute(data.validation.target.view(), val_pred.view())?;
        let test = FitScores::compute(data.test.target.view(), test_pred.view())?;

        tracing::info!(
            %run_id,
            model = kind.label(),
            val_mse = validation.mse,
            val_r2 = validation.r2,
            test_mse = test.mse,
            test_r2 = test.r2,
            "Model scored"
        );

        rows.push(ModelResult {
            kind,
            label: kind.label().to_string(),
            validation,
            test,
            test_predictions: test_pred.to_vec(),
        });
    }

    let elapsed_ms = started.elapsed().as_millis() as u64;
    tracing::info!(%run_id, elapsed_ms, "Comparison run finished");

    Ok(ComparisonReport {
        run_id,
        hyperparams: request.hyperparams,
        rows,
        test_actual: data.test.target.to_vec(),
        elapsed_ms,
    })
}
