//! HTML rendering for the dashboard page.

use std::fmt::Write;

use crate::chart::ChartSet;
use crate::comparison::{ComparisonReport, RunRequest};
use crate::regressor::{
    ModelKind, ELASTIC_ALPHA_OPTIONS, ELASTIC_L1_RATIO_OPTIONS, LASSO_ALPHA_OPTIONS,
    POLY_DEGREE_OPTIONS, RIDGE_ALPHA_OPTIONS,
};
use crate::web::controls::{self, format_option};
use crate::web::DatasetInfo;

pub const TITLE: &str = "Walmart Sales Regression Model Comparison";
pub const UPLOAD_PROMPT: &str = "Please upload the Walmart_Sales.csv file to begin.";

const STYLE: &str = "body{margin:0;font-family:sans-serif;display:flex;color:#262730}\
aside{width:300px;min-height:100vh;background:#f0f2f6;padding:16px;box-sizing:border-box}\
main{flex:1;padding:24px 40px}\
label{display:block;margin:4px 0}\
select{margin-bottom:10px}\
table{border-collapse:collapse}\
th,td{border:1px solid #ddd;padding:6px 10px;text-align:right}\
th:first-child,td:first-child{text-align:left}\
.info{background:#e8f0fe;color:#1c4fa0;padding:12px;border-radius:4px}\
.error{background:#fdecea;color:#8a1c1c;padding:12px;border-radius:4px}\
.chart{margin:16px 0}";

pub struct PageView<'a> {
    pub dataset: Option<&'a DatasetInfo>,
    pub request: &'a RunRequest,
    pub report: Option<&'a ComparisonReport>,
    pub charts: Option<&'a ChartSet>,
    pub error: Option<&'a str>,
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn render_page(view: &PageView<'_>) -> String {
    let mut html = String::with_capacity(64 * 1024);
    let _ = write!(
        html,
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>{TITLE}</title>\
         <style>{STYLE}</style></head><body>"
    );
    render_sidebar(&mut html, view);
    html.push_str("<main>");
    let _ = write!(html, "<h1>{TITLE}</h1>");

    if let Some(err) = view.error {
        let _ = write!(html, "<div class=\"error\">{}</div>", escape_html(err));
    }

    match view.dataset {
        None => {
            let _ = write!(html, "<div class=\"info\">{UPLOAD_PROMPT}</div>");
        }
        Some(info) => {
            let _ = write!(
                html,
                "<p>Loaded <strong>{}</strong>: {} rows, {} features \
                 (train {}, validation {}, test {}), uploaded {}.</p>",
                escape_html(&info.file_name),
                info.rows,
                info.features,
                info.train,
                info.validation,
                info.test,
                info.uploaded_at.format("%Y-%m-%d %H:%M:%S UTC"),
            );
            if let Some(report) = view.report {
                render_results(&mut html, report, view.charts);
                let _ = write!(
                    html,
                    "<p><a href=\"/api/report?{}\">JSON report</a></p>",
                    escape_html(&controls::to_query(view.request))
                );
            }
        }
    }

    html.push_str("</main></body></html>");
    html
}

fn render_sidebar(html: &mut String, view: &PageView<'_>) {
    let request = view.request;
    let hp = &request.hyperparams;

    html.push_str("<aside><h2>Configuration</h2>");
    html.push_str(
        "<form method=\"post\" action=\"/upload\" enctype=\"multipart/form-data\">\
         <label for=\"file\">Upload Walmart_Sales.csv</label>\
         <input type=\"file\" id=\"file\" name=\"file\" accept=\".csv\" required>\
         <button type=\"submit\">Upload</button></form>",
    );

    let _ = write!(
        html,
        "<form method=\"get\" action=\"/\" id=\"controls\">\
         <input type=\"hidden\" name=\"{}\" value=\"1\">\
         <h3>Select models to train and compare:</h3>",
        controls::SUBMITTED
    );
    for kind in ModelKind::ALL {
        let checked = if request.is_selected(kind) { " checked" } else { "" };
        let _ = write!(
            html,
            "<label><input type=\"checkbox\" name=\"{}\" value=\"{}\"{} \
             onchange=\"this.form.submit()\"> {}</label>",
            controls::MODEL,
            kind.key(),
            checked,
            kind.label()
        );
    }

    html.push_str("<h3>Hyperparameters</h3>");
    select_float(html, "Ridge alpha", controls::RIDGE_ALPHA, &RIDGE_ALPHA_OPTIONS, hp.ridge_alpha);
    select_float(html, "Lasso alpha", controls::LASSO_ALPHA, &LASSO_ALPHA_OPTIONS, hp.lasso_alpha);
    select_float(
        html,
        "ElasticNet alpha",
        controls::ELASTIC_ALPHA,
        &ELASTIC_ALPHA_OPTIONS,
        hp.elastic_alpha,
    );
    select_float(
        html,
        "ElasticNet l1_ratio",
        controls::ELASTIC_L1_RATIO,
        &ELASTIC_L1_RATIO_OPTIONS,
        hp.elastic_l1_ratio,
    );

    let _ = write!(
        html,
        "<label for=\"{name}\">Polynomial degree</label>\
         <select id=\"{name}\" name=\"{name}\" onchange=\"this.form.submit()\">",
        name = controls::POLY_DEGREE
    );
    for degree in POLY_DEGREE_OPTIONS {
        let selected = if degree == hp.poly_degree { " selected" } else { "" };
        let _ = write!(html, "<option value=\"{degree}\"{selected}>{degree}</option>");
    }
    html.push_str("</select>");

    html.push_str("<noscript><button type=\"submit\">Apply</button></noscript></form></aside>");
}

fn select_float(html: &mut String, label: &str, name: &str, options: &[f64], current: f64) {
    let _ = write!(
        html,
        "<label for=\"{name}\">{label}</label>\
         <select id=\"{name}\" name=\"{name}\" onchange=\"this.form.submit()\">"
    );
    for option in options {
        let selected = if (option - current).abs() < 1e-12 {
            " selected"
        } else {
            ""
        };
        let value = format_option(*option);
        let _ = write!(html, "<option value=\"{value}\"{selected}>{value}</option>");
    }
    html.push_str("</select>");
}

fn render_results(html: &mut String, report: &ComparisonReport, charts: Option<&ChartSet>) {
    if report.is_empty() {
        return;
    }

    html.push_str(
        "<h2>Model Performance on Validation and Test Sets</h2>\
         <table><thead><tr><th>Model</th><th>Validation MSE</th><th>Validation R²</th>\
         <th>Test MSE</th><th>Test R²</th></tr></thead><tbody>",
    );
    for row in &report.rows {
        let _ = write!(
            html,
            "<tr><td>{}</td><td>{:.4}</td><td>{:.4}</td><td>{:.4}</td><td>{:.4}</td></tr>",
            escape_html(&row.label),
            row.validation.mse,
            row.validation.r2,
            row.test.mse,
            row.test.r2
        );
    }
    html.push_str("</tbody></table>");

    let Some(charts) = charts else {
        return;
    };
    let _ = write!(html, "<div class=\"chart\">{}</div>", charts.mse);
    let _ = write!(html, "<div class=\"chart\">{}</div>", charts.r2);
    if let Some(svg) = &charts.poly_residuals {
        let _ = write!(
            html,
            "<h2>Polynomial Regression Residual Plot</h2><div class=\"chart\">{svg}</div>"
        );
    }
    if let Some(svg) = &charts.poly_predicted {
        let _ = write!(
            html,
            "<h2>Polynomial Regression: Predicted vs Actual</h2><div class=\"chart\">{svg}</div>"
        );
    }
}
