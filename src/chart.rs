//! Server-side SVG charts for a comparison run.

use std::ops::Range;

use anyhow::{Context, Result};
use lowess::prelude::Lowess;
use plotters::prelude::*;

use crate::comparison::ComparisonReport;
use crate::regressor::ModelKind;

pub const SKY_BLUE: RGBColor = RGBColor(135, 206, 235);
pub const LIGHT_GREEN: RGBColor = RGBColor(144, 238, 144);

const WIDTH: u32 = 800;
const HEIGHT: u32 = 400;
const CAPTION_FONT: (&str, u32) = ("sans-serif", 20);

const LOWESS_FRACTION: f64 = 2.0 / 3.0;
const LOWESS_ITERATIONS: usize = 3;

pub const MSE_TITLE: &str = "Model Comparison - MSE (Test Set)";
pub const R2_TITLE: &str = "Model Comparison - R² (Test Set)";
pub const RESIDUAL_TITLE: &str = "Residual Plot for Polynomial Regression";
pub const PREDICTED_TITLE: &str = "Predicted vs Actual Values";

/// Every chart drawn for one report. The polynomial diagnostics are only
/// present when Polynomial Regression was part of the run.
#[derive(Debug, Clone)]
pub struct ChartSet {
    pub mse: String,
    pub r2: String,
    pub poly_residuals: Option<String>,
    pub poly_predicted: Option<String>,
}

impl ChartSet {
    /// `None` for an empty report: no table, no charts.
    pub fn render(report: &ComparisonReport) -> Result<Option<Self>> {
        if report.is_empty() {
            return Ok(None);
        }
        let mse: Vec<(&str, f64)> = report
            .rows
            .iter()
            .map(|r| (r.label.as_str(), r.test.mse))
            .collect();
        let r2: Vec<(&str, f64)> = report
            .rows
            .iter()
            .map(|r| (r.label.as_str(), r.test.r2))
            .collect();

        let mse = horizontal_bar_svg(MSE_TITLE, "Mean Squared Error", &mse, SKY_BLUE)
            .context("render MSE chart")?;
        let r2 =
            horizontal_bar_svg(R2_TITLE, "R² Score", &r2, LIGHT_GREEN).context("render R² chart")?;

        let (poly_residuals, poly_predicted) = match report.get(ModelKind::Polynomial) {
            Some(poly) => (
                Some(
                    residual_plot_svg(&report.test_actual, &poly.test_predictions)
                        .context("render polynomial residual plot")?,
                ),
                Some(
                    predicted_vs_actual_svg(&report.test_actual, &poly.test_predictions)
                        .context("render predicted-vs-actual plot")?,
                ),
            ),
            None => (None, None),
        };

        Ok(Some(Self {
            mse,
            r2,
            poly_residuals,
            poly_predicted,
        }))
    }
}

/// One bar per entry, first entry at the bottom.
pub fn horizontal_bar_svg(
    title: &str,
    value_label: &str,
    bars: &[(&str, f64)],
    color: RGBColor,
) -> Result<String> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (WIDTH, HEIGHT)).into_drawing_area();
        root.fill(&WHITE)?;

        let values = bars.iter().map(|b| b.1).chain([0.0]);
        let x_range = padded_range(values);
        // Integer ranges are inclusive here, so `0..last` yields one segment per bar.
        let last = (bars.len() as i32 - 1).max(1);

        let label_of = |v: &SegmentValue<i32>| -> String {
            match v {
                SegmentValue::CenterOf(i) => usize::try_from(*i)
                    .ok()
                    .and_then(|i| bars.get(i))
                    .map(|b| b.0.to_string())
                    .unwrap_or_default(),
                _ => String::new(),
            }
        };

        let mut chart = ChartBuilder::on(&root)
            .caption(title, CAPTION_FONT)
            .margin(12)
            .x_label_area_size(40)
            .y_label_area_size(220)
            .build_cartesian_2d(x_range, (0..last).into_segmented())?;

        chart
            .configure_mesh()
            .disable_y_mesh()
            .y_labels(bars.len() + 1)
            .y_label_formatter(&label_of)
            .x_desc(value_label)
            .y_desc("Models")
            .draw()?;

        chart.draw_series(bars.iter().enumerate().map(|(i, (_, value))| {
            let i = i as i32;
            let top = if i < last {
                SegmentValue::Exact(i + 1)
            } else {
                SegmentValue::Last
            };
            let mut bar = Rectangle::new(
                [(0.0, SegmentValue::Exact(i)), (*value, top)],
                color.filled(),
            );
            bar.set_margin(4, 4, 0, 0);
            bar
        }))?;

        root.present()?;
    }
    Ok(svg)
}

/// Residuals (actual - predicted) against predictions, detrended by a
/// least-squares line, with a red LOWESS trend and a dashed zero line.
pub fn residual_plot_svg(actual: &[f64], predicted: &[f64]) -> Result<String> {
    let residuals: Vec<(f64, f64)> = predicted
        .iter()
        .zip(actual)
        .map(|(p, a)| (*p, a - p))
        .collect();
    let points = detrend(&residuals);
    let trend = lowess_trend(&points)?;

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (WIDTH, HEIGHT)).into_drawing_area();
        root.fill(&WHITE)?;

        let x_range = padded_range(points.iter().map(|p| p.0));
        let y_range = padded_range(points.iter().map(|p| p.1).chain([0.0]));
        let (x0, x1) = (x_range.start, x_range.end);

        let mut chart = ChartBuilder::on(&root)
            .caption(RESIDUAL_TITLE, CAPTION_FONT)
            .margin(12)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(x_range, y_range)?;

        chart
            .configure_mesh()
            .x_desc("Predicted Values")
            .y_desc("Residuals")
            .draw()?;

        chart.draw_series(DashedLineSeries::new(
            [(x0, 0.0), (x1, 0.0)],
            2,
            4,
            BLACK.mix(0.6).stroke_width(1),
        ))?;
        chart.draw_series(
            points
                .iter()
                .map(|&(x, y)| Circle::new((x, y), 3, BLUE.mix(0.6).filled())),
        )?;
        chart.draw_series(LineSeries::new(trend, RED.stroke_width(1)))?;

        root.present()?;
    }
    Ok(svg)
}

/// Scatter of predictions against actual values plus the red `y = x` line.
pub fn predicted_vs_actual_svg(actual: &[f64], predicted: &[f64]) -> Result<String> {
    let points: Vec<(f64, f64)> = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (*a, *p))
        .filter(|(a, p)| a.is_finite() && p.is_finite())
        .collect();
    let (lo, hi) = points
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (a, _)| {
            (lo.min(*a), hi.max(*a))
        });

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (WIDTH, HEIGHT)).into_drawing_area();
        root.fill(&WHITE)?;

        let x_range = padded_range(points.iter().map(|p| p.0));
        let y_range = padded_range(points.iter().map(|p| p.1).chain(points.iter().map(|p| p.0)));

        let mut chart = ChartBuilder::on(&root)
            .caption(PREDICTED_TITLE, CAPTION_FONT)
            .margin(12)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(x_range, y_range)?;

        chart
            .configure_mesh()
            .x_desc("Actual Values")
            .y_desc("Predicted Values")
            .draw()?;

        chart
            .draw_series(
                points
                    .iter()
                    .map(|&(x, y)| Circle::new((x, y), 3, BLUE.filled())),
            )?
            .label("Predicted vs Actual")
            .legend(|(x, y)| Circle::new((x + 10, y), 3, BLUE.filled()));

        if lo.is_finite() && hi.is_finite() {
            chart
                .draw_series(LineSeries::new([(lo, lo), (hi, hi)], RED.stroke_width(2)))?
                .label("y = x line")
                .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED.stroke_width(2)));
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;

        root.present()?;
    }
    Ok(svg)
}

/// Residuals of a least-squares line through `points`.
fn detrend(points: &[(f64, f64)]) -> Vec<(f64, f64)> {
    let n = points.len() as f64;
    if points.len() < 2 {
        return points.to_vec();
    }
    let mean_x = points.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = points.iter().map(|p| p.1).sum::<f64>() / n;
    let sxx: f64 = points.iter().map(|p| (p.0 - mean_x).powi(2)).sum();
    let sxy: f64 = points
        .iter()
        .map(|p| (p.0 - mean_x) * (p.1 - mean_y))
        .sum();
    let slope = if sxx > 0.0 { sxy / sxx } else { 0.0 };
    points
        .iter()
        .map(|&(x, y)| (x, y - mean_y - slope * (x - mean_x)))
        .collect()
}

/// LOWESS trend through `points`, ascending in x. Non-finite points are
/// skipped; fewer than two remaining points give no trend.
fn lowess_trend(points: &[(f64, f64)]) -> Result<Vec<(f64, f64)>> {
    let (x, y): (Vec<f64>, Vec<f64>) = points
        .iter()
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .copied()
        .unzip();
    if x.len() < 2 {
        return Ok(Vec::new());
    }
    let fit = Lowess::new()
        .fraction(LOWESS_FRACTION)
        .iterations(LOWESS_ITERATIONS)
        .delta(0.0)
        .return_sorted()
        .build()
        .context("invalid LOWESS settings")?
        .fit(&x, &y)
        .context("LOWESS smoothing failed")?;
    Ok(fit.x.into_iter().zip(fit.y).collect())
}

/// Finite extent of `values` with 5% padding; never empty.
fn padded_range(values: impl Iterator<Item = f64>) -> Range<f64> {
    let (lo, hi) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if !lo.is_finite() || !hi.is_finite() {
        return 0.0..1.0;
    }
    let pad = if hi > lo {
        (hi - lo) * 0.05
    } else {
        lo.abs().max(1.0) * 0.05
    };
    (lo - pad)..(hi + pad)
}
