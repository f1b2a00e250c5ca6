//! CSV ingestion for the weekly sales table.
//!
//! The header is checked before any row is read so a file with the wrong
//! shape fails with the full list of missing columns instead of a
//! per-row deserialization error.

use std::io::Read;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::model::sales::SalesRecord;

pub const REQUIRED_COLUMNS: [&str; 8] = [
    "Store",
    "Date",
    "Weekly_Sales",
    "Holiday_Flag",
    "Temperature",
    "Fuel_Price",
    "CPI",
    "Unemployment",
];

pub const MIN_ROWS: usize = 10;

const DATE_FORMATS: [&str; 4] = ["%d-%m-%Y", "%d/%m/%Y", "%d.%m.%Y", "%Y-%m-%d"];

#[derive(Debug, Deserialize)]
struct RawSalesRow {
    #[serde(rename = "Store")]
    store: i64,
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Weekly_Sales")]
    weekly_sales: f64,
    #[serde(rename = "Holiday_Flag")]
    holiday_flag: i64,
    #[serde(rename = "Temperature")]
    temperature: f64,
    #[serde(rename = "Fuel_Price")]
    fuel_price: f64,
    #[serde(rename = "CPI")]
    cpi: f64,
    #[serde(rename = "Unemployment")]
    unemployment: f64,
}

/// Parse a day-first date, accepting ISO dates as well.
pub fn parse_sales_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
}

pub fn load_sales_csv<R: Read>(reader: R) -> AppResult<Vec<SalesRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|col| !headers.iter().any(|h| h == **col))
        .map(|col| col.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(AppError::MissingColumns(missing));
    }

    let mut records = Vec::new();
    for (idx, row) in rdr.deserialize::<RawSalesRow>().enumerate() {
        let raw = row?;
        // Header is line 1, so the first data row is line 2.
        let line = idx + 2;
        let date = parse_sales_date(&raw.date).ok_or_else(|| AppError::InvalidDate {
            row: line,
            value: raw.date.clone(),
        })?;
        records.push(SalesRecord {
            store: raw.store,
            date,
            weekly_sales: raw.weekly_sales,
            holiday_flag: raw.holiday_flag,
            temperature: raw.temperature,
            fuel_price: raw.fuel_price,
            cpi: raw.cpi,
            unemployment: raw.unemployment,
        });
    }

    if records.len() < MIN_ROWS {
        return Err(AppError::TooFewRows {
            rows: records.len(),
            min: MIN_ROWS,
        });
    }

    tracing::debug!(rows = records.len(), "Parsed sales CSV");
    Ok(records)
}

pub fn load_sales_bytes(bytes: &[u8]) -> AppResult<Vec<SalesRecord>> {
    load_sales_csv(bytes)
}
