//! Sidebar controls carried in the page's query string.
//!
//! The controls form always sends `submitted=1`, which is how an empty model
//! selection is told apart from a first visit with no query at all.

use url::form_urlencoded;

use crate::comparison::RunRequest;
use crate::error::{AppError, AppResult};
use crate::regressor::{Hyperparams, ModelKind};

pub const SUBMITTED: &str = "submitted";
pub const MODEL: &str = "model";
pub const RIDGE_ALPHA: &str = "ridge_alpha";
pub const LASSO_ALPHA: &str = "lasso_alpha";
pub const ELASTIC_ALPHA: &str = "elastic_alpha";
pub const ELASTIC_L1_RATIO: &str = "elastic_l1_ratio";
pub const POLY_DEGREE: &str = "poly_degree";

pub fn parse_run_request(query: Option<&str>) -> AppResult<RunRequest> {
    let query = query.unwrap_or_default();
    let mut submitted = false;
    let mut models = Vec::new();
    let mut hp = Hyperparams::default();

    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        match key.as_ref() {
            SUBMITTED => submitted = true,
            MODEL => {
                let kind = ModelKind::from_key(&value).ok_or_else(|| {
                    AppError::InvalidHyperparameter(format!("unknown model '{}'", value))
                })?;
                if !models.contains(&kind) {
                    models.push(kind);
                }
            }
            RIDGE_ALPHA => hp.ridge_alpha = parse_float(RIDGE_ALPHA, &value)?,
            LASSO_ALPHA => hp.lasso_alpha = parse_float(LASSO_ALPHA, &value)?,
            ELASTIC_ALPHA => hp.elastic_alpha = parse_float(ELASTIC_ALPHA, &value)?,
            ELASTIC_L1_RATIO => hp.elastic_l1_ratio = parse_float(ELASTIC_L1_RATIO, &value)?,
            POLY_DEGREE => {
                hp.poly_degree = value.trim().parse().map_err(|_| {
                    AppError::InvalidHyperparameter(format!(
                        "{} must be an integer, got '{}'",
                        POLY_DEGREE, value
                    ))
                })?
            }
            // Unknown keys are ignored.
            _ => {}
        }
    }
    hp.validate()?;

    if !submitted && models.is_empty() {
        return Ok(RunRequest {
            models: ModelKind::ALL.to_vec(),
            hyperparams: hp,
        });
    }
    Ok(RunRequest {
        models,
        hyperparams: hp,
    })
}

fn parse_float(name: &str, value: &str) -> AppResult<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| {
            AppError::InvalidHyperparameter(format!("{} must be a number, got '{}'", name, value))
        })
}

/// Query string that reproduces `request`.
pub fn to_query(request: &RunRequest) -> String {
    let hp = &request.hyperparams;
    let mut out = form_urlencoded::Serializer::new(String::new());
    out.append_pair(SUBMITTED, "1");
    for kind in request.ordered_models() {
        out.append_pair(MODEL, kind.key());
    }
    out.append_pair(RIDGE_ALPHA, &format_option(hp.ridge_alpha));
    out.append_pair(LASSO_ALPHA, &format_option(hp.lasso_alpha));
    out.append_pair(ELASTIC_ALPHA, &format_option(hp.elastic_alpha));
    out.append_pair(ELASTIC_L1_RATIO, &format_option(hp.elastic_l1_ratio));
    out.append_pair(POLY_DEGREE, &hp.poly_degree.to_string());
    out.finish()
}

/// Option values keep one decimal for whole numbers (`1.0`, `100.0`).
pub fn format_option(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}
