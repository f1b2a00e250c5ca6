use ndarray::array;
use sales_regression_lab::error::AppError;
use sales_regression_lab::metrics::{mean_squared_error, r2_score, FitScores};

#[test]
fn mse_matches_hand_computed_value() {
    let actual = array![3.0, -0.5, 2.0, 7.0];
    let predicted = array![2.5, 0.0, 2.0, 8.0];
    // (0.25 + 0.25 + 0 + 1) / 4
    let mse = mean_squared_error(actual.view(), predicted.view()).unwrap();
    assert!((mse - 0.375).abs() < 1e-12);
}

#[test]
fn r2_matches_hand_computed_value() {
    let actual = array![3.0, -0.5, 2.0, 7.0];
    let predicted = array![2.5, 0.0, 2.0, 8.0];
    // mean 2.875, ss_tot 29.1875, ss_res 1.5
    let r2 = r2_score(actual.view(), predicted.view()).unwrap();
    assert!((r2 - (1.0 - 1.5 / 29.1875)).abs() < 1e-12);
}

#[test]
fn perfect_and_mean_predictions() {
    let actual = array![1.0, 2.0, 3.0];
    let scores = FitScores::compute(actual.view(), actual.view()).unwrap();
    assert_eq!(scores.mse, 0.0);
    assert_eq!(scores.r2, 1.0);

    let mean = array![2.0, 2.0, 2.0];
    let r2 = r2_score(actual.view(), mean.view()).unwrap();
    assert!(r2.abs() < 1e-12);
}

#[test]
fn r2_can_be_negative() {
    let actual = array![1.0, 2.0, 3.0];
    let predicted = array![3.0, 2.0, 1.0];
    assert!((r2_score(actual.view(), predicted.view()).unwrap() + 3.0).abs() < 1e-12);
}

#[test]
fn constant_actual_values() {
    let actual = array![4.0, 4.0, 4.0];
    assert_eq!(r2_score(actual.view(), actual.view()).unwrap(), 1.0);
    let off = array![4.0, 4.5, 4.0];
    assert_eq!(r2_score(actual.view(), off.view()).unwrap(), 0.0);
}

#[test]
fn mismatched_or_empty_inputs_fail() {
    let a = array![1.0, 2.0];
    let b = array![1.0];
    assert!(matches!(
        mean_squared_error(a.view(), b.view()),
        Err(AppError::Metric(_))
    ));
    let empty = ndarray::Array1::<f64>::zeros(0);
    assert!(matches!(
        r2_score(empty.view(), empty.view()),
        Err(AppError::Metric(_))
    ));
}
