//! Feature engineering: one-hot categoricals, calendar fields and the
//! log-sales target.

use std::collections::BTreeSet;

use ndarray::{Array1, Array2};

use crate::error::{AppError, AppResult};
use crate::model::sales::SalesRecord;

const NUMERIC_COLUMNS: [&str; 6] = [
    "Temperature",
    "Fuel_Price",
    "CPI",
    "Unemployment",
    "Month",
    "Year",
];

/// Feature matrix and log-sales target derived from a sales table.
#[derive(Debug, Clone)]
pub struct FeatureMatrix {
    /// n_samples x n_features
    pub x: Array2<f64>,
    /// ln(Weekly_Sales)
    pub y: Array1<f64>,
    pub feature_names: Vec<String>,
}

impl FeatureMatrix {
    pub fn n_samples(&self) -> usize {
        self.x.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.x.ncols()
    }
}

pub fn log_sales(weekly_sales: f64) -> Option<f64> {
    if weekly_sales > 0.0 && weekly_sales.is_finite() {
        Some(weekly_sales.ln())
    } else {
        None
    }
}

pub fn restore_sales(log_value: f64) -> f64 {
    log_value.exp()
}

/// Dummy columns for every category but the first, in ascending order.
fn dummy_levels(values: impl Iterator<Item = i64>) -> Vec<i64> {
    let levels: BTreeSet<i64> = values.collect();
    levels.into_iter().skip(1).collect()
}

pub fn build_features(records: &[SalesRecord]) -> AppResult<FeatureMatrix> {
    let store_levels = dummy_levels(records.iter().map(|r| r.store));
    let holiday_levels = dummy_levels(records.iter().map(|r| r.holiday_flag));

    let mut feature_names: Vec<String> = NUMERIC_COLUMNS.iter().map(|c| c.to_string()).collect();
    feature_names.extend(store_levels.iter().map(|s| format!("Store_{}", s)));
    feature_names.extend(holiday_levels.iter().map(|h| format!("Holiday_Flag_{}", h)));

    let n_features = feature_names.len();
    let mut x = Array2::<f64>::zeros((records.len(), n_features));
    let mut y = Array1::<f64>::zeros(records.len());

    for (i, record) in records.iter().enumerate() {
        y[i] = log_sales(record.weekly_sales).ok_or(AppError::NonPositiveSales {
            row: i + 2,
            value: record.weekly_sales,
        })?;

        x[[i, 0]] = record.temperature;
        x[[i, 1]] = record.fuel_price;
        x[[i, 2]] = record.cpi;
        x[[i, 3]] = record.unemployment;
        x[[i, 4]] = f64::from(record.month());
        x[[i, 5]] = f64::from(record.year());

        let mut col = NUMERIC_COLUMNS.len();
        if let Ok(pos) = store_levels.binary_search(&record.store) {
            x[[i, col + pos]] = 1.0;
        }
        col += store_levels.len();
        if let Ok(pos) = holiday_levels.binary_search(&record.holiday_flag) {
            x[[i, col + pos]] = 1.0;
        }
    }

    tracing::debug!(
        samples = records.len(),
        features = n_features,
        stores = store_levels.len() + 1,
        "Built feature matrix"
    );

    Ok(FeatureMatrix {
        x,
        y,
        feature_names,
    })
}
