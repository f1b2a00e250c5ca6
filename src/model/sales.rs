use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// One weekly sales observation for a single store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesRecord {
    pub store: i64,
    pub date: NaiveDate,
    pub weekly_sales: f64,
    pub holiday_flag: i64,
    pub temperature: f64,
    pub fuel_price: f64,
    pub cpi: f64,
    pub unemployment: f64,
}

impl SalesRecord {
    pub fn month(&self) -> u32 {
        self.date.month()
    }

    pub fn year(&self) -> i32 {
        self.date.year()
    }
}
