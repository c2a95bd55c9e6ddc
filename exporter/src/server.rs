//! HTTP boundary: `/probe`, the telemetry path and a landing page.

use std::sync::Arc;

use axum::Router;
use axum::extract::{Query, State};
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use script_exporter_common::Script;
use serde::Deserialize;

use crate::application::ports::ScriptRunner;
use crate::application::services::{ExecutionEngine, ProbeRequest, run_probe};
use crate::output::{CONTENT_TYPE, render_exporter_metrics, render_measurements};

/// Path of the probe endpoint.
pub const PROBE_PATH: &str = "/probe";

/// Shared, read-only state handed to every request.
pub struct AppState<R> {
    pub scripts: Arc<[Arc<Script>]>,
    pub engine: ExecutionEngine<R>,
    pub metrics_path: String,
}

impl<R> Clone for AppState<R> {
    fn clone(&self) -> Self {
        Self {
            scripts: Arc::clone(&self.scripts),
            engine: self.engine.clone(),
            metrics_path: self.metrics_path.clone(),
        }
    }
}

/// Query string of `/probe`. Absent parameters are empty strings.
#[derive(Debug, Default, Deserialize)]
pub struct ProbeParams {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub pattern: String,
    #[serde(default)]
    pub target: String,
}

/// Build the router. `state.metrics_path` must already be validated.
pub fn router<R: ScriptRunner>(state: AppState<R>) -> Router {
    let metrics_path = state.metrics_path.clone();
    Router::new()
        .route("/", get(landing::<R>))
        .route(PROBE_PATH, get(probe::<R>))
        .route(&metrics_path, get(exporter_metrics::<R>))
        .with_state(state)
}

async fn probe<R: ScriptRunner>(
    State(state): State<AppState<R>>,
    Query(params): Query<ProbeParams>,
) -> Response {
    let request = ProbeRequest {
        name: &params.name,
        pattern: &params.pattern,
        target: &params.target,
    };

    match run_probe(&state.engine, &state.scripts, request).await {
        Ok(batch) => (
            [(header::CONTENT_TYPE, CONTENT_TYPE)],
            render_measurements(&batch),
        )
            .into_response(),
        Err(e) => {
            let status = if e.is_invalid_target() {
                StatusCode::BAD_REQUEST
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            };
            (status, format!("{e}\n")).into_response()
        }
    }
}

async fn exporter_metrics<R: ScriptRunner>(State(state): State<AppState<R>>) -> Response {
    (
        [(header::CONTENT_TYPE, CONTENT_TYPE)],
        render_exporter_metrics(env!("CARGO_PKG_VERSION"), state.scripts.len()),
    )
        .into_response()
}

async fn landing<R: ScriptRunner>(State(state): State<AppState<R>>) -> Html<String> {
    Html(format!(
        "<html>\n\
         <head><title>Script Exporter</title></head>\n\
         <body>\n\
         <h1>Script Exporter</h1>\n\
         <p><a href=\"{}\">Metrics</a></p>\n\
         </body>\n\
         </html>\n",
        state.metrics_path
    ))
}
