mod common;

use sales_regression_lab::comparison::{run_comparison, PreparedData, RunRequest};
use sales_regression_lab::config::{SolverConfig, SplitConfig};
use sales_regression_lab::dataset::load_sales_csv;
use sales_regression_lab::error::AppError;
use sales_regression_lab::regressor::{Hyperparams, ModelKind};

fn prepared() -> PreparedData {
    let csv = common::sales_csv(3, 40);
    let records = load_sales_csv(csv.as_bytes()).unwrap();
    PreparedData::from_records(&records, &SplitConfig::default()).unwrap()
}

#[test]
fn prepared_data_is_split_70_15_15() {
    let data = prepared();
    assert_eq!(data.n_rows, 120);
    assert_eq!(data.train.len(), 84);
    assert_eq!(data.validation.len(), 18);
    assert_eq!(data.test.len(), 18);
    assert_eq!(data.feature_names.len(), 9);
    assert_eq!(data.train.raw.ncols(), 9);
    assert_eq!(data.test.scaled.nrows(), 18);
}

#[test]
fn training_features_are_standardized() {
    let data = prepared();
    for col in data.train.scaled.columns() {
        let mean = col.mean().unwrap();
        assert!(mean.abs() < 1e-9);
    }
}

#[test]
fn preparation_is_deterministic() {
    let a = prepared();
    let b = prepared();
    assert_eq!(a.split, b.split);
    assert_eq!(a.test.target, b.test.target);
}

#[test]
fn default_run_scores_every_model_in_order() {
    let data = prepared();
    let report = run_comparison(&data, &RunRequest::default(), &SolverConfig::default()).unwrap();
    let kinds: Vec<ModelKind> = report.rows.iter().map(|r| r.kind).collect();
    assert_eq!(kinds, ModelKind::ALL.to_vec());
    assert_eq!(report.test_actual.len(), 18);
    for row in &report.rows {
        assert_eq!(row.label, row.kind.label());
        assert_eq!(row.test_predictions.len(), 18);
        assert!(row.validation.mse.is_finite() && row.validation.mse >= 0.0);
        assert!(row.test.r2.is_finite());
    }
}

#[test]
fn store_level_signal_is_learned() {
    let data = prepared();
    let request = RunRequest {
        models: vec![ModelKind::MultipleLinear],
        hyperparams: Hyperparams::default(),
    };
    let report = run_comparison(&data, &request, &SolverConfig::default()).unwrap();
    let row = report.get(ModelKind::MultipleLinear).unwrap();
    assert!(row.test.r2 > 0.8, "test r2 {}", row.test.r2);
}

#[test]
fn normal_and_multiple_linear_agree() {
    let data = prepared();
    let report = run_comparison(&data, &RunRequest::default(), &SolverConfig::default()).unwrap();
    let normal = report.get(ModelKind::NormalLinear).unwrap();
    let multiple = report.get(ModelKind::MultipleLinear).unwrap();
    assert_eq!(normal.test_predictions, multiple.test_predictions);
}

#[test]
fn selection_is_reported_in_catalogue_order() {
    let data = prepared();
    let request = RunRequest {
        models: vec![ModelKind::BayesianRidge, ModelKind::Ridge, ModelKind::Ridge],
        hyperparams: Hyperparams::default(),
    };
    let report = run_comparison(&data, &request, &SolverConfig::default()).unwrap();
    let kinds: Vec<ModelKind> = report.rows.iter().map(|r| r.kind).collect();
    assert_eq!(kinds, vec![ModelKind::Ridge, ModelKind::BayesianRidge]);
    assert!(report.get(ModelKind::Lasso).is_none());
}

#[test]
fn empty_selection_yields_empty_report() {
    let data = prepared();
    let request = RunRequest {
        models: vec![],
        hyperparams: Hyperparams::default(),
    };
    let report = run_comparison(&data, &request, &SolverConfig::default()).unwrap();
    assert!(report.is_empty());
}

#[test]
fn hyperparameters_change_only_their_model() {
    let data = prepared();
    let base = run_comparison(&data, &RunRequest::default(), &SolverConfig::default()).unwrap();
    let request = RunRequest {
        models: ModelKind::ALL.to_vec(),
        hyperparams: Hyperparams {
            ridge_alpha: 100.0,
            ..Hyperparams::default()
        },
    };
    let changed = run_comparison(&data, &request, &SolverConfig::default()).unwrap();
    assert_ne!(
        base.get(ModelKind::Ridge).unwrap().test_predictions,
        changed.get(ModelKind::Ridge).unwrap().test_predictions
    );
    assert_eq!(
        base.get(ModelKind::BayesianRidge).unwrap().test_predictions,
        changed.get(ModelKind::BayesianRidge).unwrap().test_predictions
    );
    assert_eq!(base.test_actual, changed.test_actual);
    assert_ne!(base.run_id, changed.run_id);
}

#[test]
fn invalid_hyperparameters_abort_the_run() {
    let data = prepared();
    let request = RunRequest {
        models: vec![ModelKind::Lasso],
        hyperparams: Hyperparams {
            lasso_alpha: 0.3,
            ..Hyperparams::default()
        },
    };
    assert!(matches!(
        run_comparison(&data, &request, &SolverConfig::default()),
        Err(AppError::InvalidHyperparameter(_))
    ));
}
