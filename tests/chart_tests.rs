mod common;

use sales_regression_lab::chart::{
    horizontal_bar_svg, predicted_vs_actual_svg, residual_plot_svg, ChartSet, LIGHT_GREEN,
    MSE_TITLE, PREDICTED_TITLE, R2_TITLE, RESIDUAL_TITLE, SKY_BLUE,
};
use sales_regression_lab::comparison::{run_comparison, PreparedData, RunRequest};
use sales_regression_lab::config::{SolverConfig, SplitConfig};
use sales_regression_lab::dataset::load_sales_csv;
use sales_regression_lab::regressor::{Hyperparams, ModelKind};

fn prepared() -> PreparedData {
    let csv = common::sales_csv(2, 30);
    let records = load_sales_csv(csv.as_bytes()).unwrap();
    PreparedData::from_records(&records, &SplitConfig::default()).unwrap()
}

#[test]
fn bar_chart_is_svg_with_labels() {
    let svg = horizontal_bar_svg(
        MSE_TITLE,
        "Mean Squared Error",
        &[("Ridge Regression", 0.12), ("Lasso Regression", 0.3)],
        SKY_BLUE,
    )
    .unwrap();
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains(MSE_TITLE));
    assert!(svg.contains("Ridge Regression"));
    assert!(svg.contains("Lasso Regression"));
    assert!(svg.contains("Mean Squared Error"));
}

#[test]
fn bar_chart_handles_single_and_negative_bars() {
    let svg = horizontal_bar_svg(R2_TITLE, "R² Score", &[("Lasso Regression", -0.4)], LIGHT_GREEN)
        .unwrap();
    assert!(svg.contains("Lasso Regression"));
}

#[test]
fn diagnostic_plots_render() {
    let actual = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
    let predicted = [1.1, 1.9, 3.2, 3.8, 5.1, 6.3];
    let resid = residual_plot_svg(&actual, &predicted).unwrap();
    assert!(resid.contains(RESIDUAL_TITLE));
    assert!(resid.contains("Predicted Values"));
    let pva = predicted_vs_actual_svg(&actual, &predicted).unwrap();
    assert!(pva.contains(PREDICTED_TITLE));
    assert!(pva.contains("y = x line"));
}

#[test]
fn chart_set_includes_polynomial_diagnostics_when_selected() {
    let data = prepared();
    let report = run_comparison(&data, &RunRequest::default(), &SolverConfig::default()).unwrap();
    let charts = ChartSet::render(&report).unwrap().unwrap();
    assert!(charts.mse.contains("Bayesian Ridge Regression"));
    assert!(charts.r2.contains(R2_TITLE));
    assert!(charts.poly_residuals.is_some());
    assert!(charts.poly_predicted.is_some());
}

#[test]
fn chart_set_skips_polynomial_diagnostics_otherwise() {
    let data = prepared();
    let request = RunRequest {
        models: vec![ModelKind::Ridge, ModelKind::Lasso],
        hyperparams: Hyperparams::default(),
    };
    let report = run_comparison(&data, &request, &SolverConfig::default()).unwrap();
    let charts = ChartSet::render(&report).unwrap().unwrap();
    assert!(charts.poly_residuals.is_none());
    assert!(charts.poly_predicted.is_none());
}

#[test]
fn empty_report_has_no_charts() {
    let data = prepared();
    let request = RunRequest {
        models: vec![],
        hyperparams: Hyperparams::default(),
    };
    let report = run_comparison(&data, &request, &SolverConfig::default()).unwrap();
    assert!(ChartSet::render(&report).unwrap().is_none());
}
