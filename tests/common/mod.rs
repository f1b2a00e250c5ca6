#![allow(dead_code)]

use chrono::{Duration, NaiveDate};

pub const HEADER: &str =
    "Store,Date,Weekly_Sales,Holiday_Flag,Temperature,Fuel_Price,CPI,Unemployment";

/// Deterministic weekly sales table: `stores` stores, `weeks` weeks each,
/// starting 05-02-2010, dates written day-first.
pub fn sales_csv(stores: i64, weeks: i64) -> String {
    let start = NaiveDate::from_ymd_opt(2010, 2, 5).unwrap();
    let mut out = String::from(HEADER);
    out.push('\n');
    for store in 1..=stores {
        for week in 0..weeks {
            let date = start + Duration::weeks(week);
            let holiday = i64::from(week % 6 == 0);
            let temperature = 40.0 + 30.0 * ((week as f64) * 0.12).sin() + store as f64;
            let fuel = 2.5 + 0.01 * week as f64;
            let cpi = 210.0 + 0.05 * week as f64 + 0.3 * store as f64;
            let unemployment = 8.0 - 0.01 * week as f64 + 0.1 * ((store * 7 + week) % 5) as f64;
            let log_sales = 13.0
                + 0.25 * store as f64
                + 0.004 * temperature
                + 0.08 * holiday as f64
                + 0.02 * ((week * 13 + store * 5) % 7) as f64;
            out.push_str(&format!(
                "{},{},{:.2},{},{:.2},{:.3},{:.4},{:.3}\n",
                store,
                date.format("%d-%m-%Y"),
                log_sales.exp(),
                holiday,
                temperature,
                fuel,
                cpi,
                unemployment
            ));
        }
    }
    out
}
