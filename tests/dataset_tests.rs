mod common;

use chrono::NaiveDate;
use sales_regression_lab::dataset::{load_sales_bytes, load_sales_csv, parse_sales_date, MIN_ROWS};
use sales_regression_lab::error::AppError;

#[test]
fn loads_generated_table() {
    let csv = common::sales_csv(3, 20);
    let records = load_sales_csv(csv.as_bytes()).unwrap();
    assert_eq!(records.len(), 60);
    assert_eq!(records[0].store, 1);
    assert_eq!(records[0].date, NaiveDate::from_ymd_opt(2010, 2, 5).unwrap());
    assert_eq!(records[0].holiday_flag, 1);
    assert!(records.iter().all(|r| r.weekly_sales > 0.0));
}

#[test]
fn dates_are_day_first() {
    let expected = NaiveDate::from_ymd_opt(2010, 2, 5).unwrap();
    assert_eq!(parse_sales_date("05-02-2010"), Some(expected));
    assert_eq!(parse_sales_date("05/02/2010"), Some(expected));
    assert_eq!(parse_sales_date("05.02.2010"), Some(expected));
    assert_eq!(parse_sales_date(" 2010-02-05 "), Some(expected));
    assert_eq!(parse_sales_date("31-12-2011"), NaiveDate::from_ymd_opt(2011, 12, 31));
    assert_eq!(parse_sales_date("12-31-2011"), None);
    assert_eq!(parse_sales_date("yesterday"), None);
}

#[test]
fn extra_columns_and_order_do_not_matter() {
    let mut csv = String::from(
        "Notes,Unemployment,CPI,Fuel_Price,Temperature,Holiday_Flag,Weekly_Sales,Date,Store\n",
    );
    for week in 0..12 {
        csv.push_str(&format!(
            "x,8.1,211.1,2.57,42.3,0,{},{:02}-03-2010,7\n",
            1_000_000.0 + week as f64,
            week + 1
        ));
    }
    let records = load_sales_bytes(csv.as_bytes()).unwrap();
    assert_eq!(records.len(), 12);
    assert_eq!(records[3].store, 7);
    assert_eq!(records[3].date, NaiveDate::from_ymd_opt(2010, 3, 4).unwrap());
    assert!((records[3].cpi - 211.1).abs() < 1e-9);
}

#[test]
fn missing_columns_are_all_reported() {
    let csv = "Store,Date,Weekly_Sales,Temperature,Fuel_Price\n1,05-02-2010,100.0,40.0,2.5\n";
    match load_sales_csv(csv.as_bytes()) {
        Err(AppError::MissingColumns(cols)) => {
            assert_eq!(cols, vec!["Holiday_Flag", "CPI", "Unemployment"]);
        }
        other => panic!("expected MissingColumns, got {:?}", other),
    }
}

#[test]
fn bad_date_names_the_line() {
    let mut csv = common::sales_csv(1, 12);
    csv = csv.replacen("19-02-2010", "2010/19/02", 1);
    match load_sales_csv(csv.as_bytes()) {
        Err(AppError::InvalidDate { row, value }) => {
            assert_eq!(row, 4);
            assert_eq!(value, "2010/19/02");
        }
        other => panic!("expected InvalidDate, got {:?}", other),
    }
}

#[test]
fn malformed_number_is_a_csv_error() {
    let csv = common::sales_csv(1, 12).replacen(",0,", ",zero,", 1);
    assert!(matches!(load_sales_csv(csv.as_bytes()), Err(AppError::Csv(_))));
}

#[test]
fn too_few_rows_is_rejected() {
    let csv = common::sales_csv(1, MIN_ROWS as i64 - 1);
    match load_sales_csv(csv.as_bytes()) {
        Err(AppError::TooFewRows { rows, min }) => {
            assert_eq!(rows, MIN_ROWS - 1);
            assert_eq!(min, MIN_ROWS);
        }
        other => panic!("expected TooFewRows, got {:?}", other),
    }
}
