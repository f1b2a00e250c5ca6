//! HTTP surface: the dashboard page, CSV upload and the JSON report.

pub mod controls;
pub mod page;

use std::future::Future;
use std::sync::Arc;

use anyhow::Context;
use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, Multipart, RawQuery, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;

use crate::chart::ChartSet;
use crate::comparison::{run_comparison, ComparisonReport, PreparedData, RunRequest};
use crate::config::{Config, SolverConfig};
use crate::dataset::load_sales_bytes;
use page::{render_page, PageView};

/// The uploaded dataset, prepared once and shared by every request.
#[derive(Debug, Clone)]
pub struct Session {
    pub info: DatasetInfo,
    pub data: Arc<PreparedData>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DatasetInfo {
    pub file_name: String,
    pub rows: usize,
    pub features: usize,
    pub train: usize,
    pub validation: usize,
    pub test: usize,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    session: Arc<RwLock<Option<Session>>>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            session: Arc::new(RwLock::new(None)),
        }
    }

    pub async fn session(&self) -> Option<Session> {
        self.session.read().await.clone()
    }

    /// Parse and prepare `bytes`, replacing the current dataset on success.
    /// A failed upload leaves the previous dataset in place.
    pub async fn load_upload(&self, file_name: String, bytes: Bytes) -> anyhow::Result<DatasetInfo> {
        let split_cfg = self.config.split;
        let size = bytes.len();
        let (rows, data) = tokio::task::spawn_blocking(move || {
            let records = load_sales_bytes(&bytes)?;
            let data = PreparedData::from_records(&records, &split_cfg)?;
            anyhow::Ok((records.len(), data))
        })
        .await
        .context("dataset preparation task failed")??;

        let info = DatasetInfo {
            file_name,
            rows,
            features: data.feature_names.len(),
            train: data.train.len(),
            validation: data.validation.len(),
            test: data.test.len(),
            uploaded_at: Utc::now(),
        };
        tracing::info!(
            file = %info.file_name,
            bytes = size,
            rows = info.rows,
            features = info.features,
            train = info.train,
            validation = info.validation,
            test = info.test,
            "Dataset loaded"
        );
        *self.session.write().await = Some(Session {
            info: info.clone(),
            data: Arc::new(data),
        });
        Ok(info)
    }
}

pub fn router(state: AppState) -> Router {
    let limit = state.config.server.max_upload_bytes;
    Router::new()
        .route("/", get(index))
        .route("/upload", post(upload))
        .route("/api/report", get(api_report))
        .layer(DefaultBodyLimit::max(limit))
        .with_state(state)
}

/// Waits for `signal` (Ctrl+C in the binary). A failed signal handler is
/// logged and ends the wait too.
pub async fn shutdown_on<F>(signal: F)
where
    F: Future<Output = std::io::Result<()>>,
{
    match signal.await {
        Ok(()) => tracing::info!("Shutdown signal received"),
        Err(e) => tracing::warn!(error = %e, "Signal handler failed, shutting down"),
    }
}

/// Fit and score on the blocking pool, then draw the charts.
async fn run(
    data: Arc<PreparedData>,
    request: RunRequest,
    solver: SolverConfig,
    with_charts: bool,
) -> anyhow::Result<(ComparisonReport, Option<ChartSet>)> {
    tokio::task::spawn_blocking(move || {
        let report = run_comparison(&data, &request, &solver)?;
        let charts = if with_charts {
            ChartSet::render(&report)?
        } else {
            None
        };
        anyhow::Ok((report, charts))
    })
    .await
    .context("comparison task failed")?
}

fn html_page(status: StatusCode, view: &PageView<'_>) -> Response {
    (status, Html(render_page(view))).into_response()
}

async fn index(State(state): State<AppState>, RawQuery(query): RawQuery) -> Response {
    let session = state.session().await;
    let info = session.as_ref().map(|s| &s.info);

    let request = match controls::parse_run_request(query.as_deref()) {
        Ok(r) => r,
        Err(e) => {
            let fallback = RunRequest::default();
            let message = e.to_string();
            return html_page(
                StatusCode::BAD_REQUEST,
                &PageView {
                    dataset: info,
                    request: &fallback,
                    report: None,
                    charts: None,
                    error: Some(&message),
                },
            );
        }
    };

    let Some(session) = session.as_ref() else {
        return html_page(
            StatusCode::OK,
            &PageView {
                dataset: None,
                request: &request,
                report: None,
                charts: None,
                error: None,
            },
        );
    };

    match run(session.data.clone(), request.clone(), state.config.solver, true).await {
        Ok((report, charts)) => html_page(
            StatusCode::OK,
            &PageView {
                dataset: Some(&session.info),
                request: &request,
                report: Some(&report),
                charts: charts.as_ref(),
                error: None,
            },
        ),
        Err(e) => {
            tracing::warn!(error = %format!("{:#}", e), "Comparison run failed");
            let message = format!("{:#}", e);
            html_page(
                StatusCode::UNPROCESSABLE_ENTITY,
                &PageView {
                    dataset: Some(&session.info),
                    request: &request,
                    report: None,
                    charts: None,
                    error: Some(&message),
                },
            )
        }
    }
}

/// Pull the `file` field out of the upload form.
async fn read_upload(multipart: &mut Multipart) -> Result<(String, Bytes), (StatusCode, String)> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| (e.status(), e.body_text()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("upload.csv").to_string();
        let bytes = field.bytes().await.map_err(|e| (e.status(), e.body_text()))?;
        if bytes.is_empty() {
            return Err((
                StatusCode::BAD_REQUEST,
                "The uploaded file is empty; choose a CSV file.".to_string(),
            ));
        }
        return Ok((file_name, bytes));
    }
    Err((
        StatusCode::BAD_REQUEST,
        "No file was uploaded; choose a CSV file.".to_string(),
    ))
}

async fn upload(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    let outcome = match read_upload(&mut multipart).await {
        Ok((file_name, bytes)) => state
            .load_upload(file_name, bytes)
            .await
            .map_err(|e| (StatusCode::BAD_REQUEST, format!("{:#}", e))),
        Err(e) => Err(e),
    };

    match outcome {
        Ok(_) => Redirect::to("/").into_response(),
        Err((status, message)) => {
            tracing::warn!(%status, error = %message, "Upload rejected");
            let session = state.session().await;
            let request = RunRequest::default();
            html_page(
                status,
                &PageView {
                    dataset: session.as_ref().map(|s| &s.info),
                    request: &request,
                    report: None,
                    charts: None,
                    error: Some(&message),
                },
            )
        }
    }
}

#[derive(Serialize)]
struct ApiReport<'a> {
    dataset: &'a DatasetInfo,
    report: &'a ComparisonReport,
}

fn json_error(status: StatusCode, message: String) -> Response {
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}

async fn api_report(State(state): State<AppState>, RawQuery(query): RawQuery) -> Response {
    let request = match controls::parse_run_request(query.as_deref()) {
        Ok(r) => r,
        Err(e) => return json_error(StatusCode::BAD_REQUEST, e.to_string()),
    };
    let Some(session) = state.session().await else {
        return json_error(StatusCode::NOT_FOUND, page::UPLOAD_PROMPT.to_string());
    };
    match run(session.data.clone(), request, state.config.solver, false).await {
        Ok((report, _)) => Json(ApiReport {
            dataset: &session.info,
            report: &report,
        })
        .into_response(),
        Err(e) => json_error(StatusCode::UNPROCESSABLE_ENTITY, format!("{:#}", e)),
    }
}
