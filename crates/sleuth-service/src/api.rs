//! HTTP API.
//!
//! Every analysis endpoint re-reads the configured ledger and recomputes from
//! scratch; nothing is cached between requests.

use std::sync::Arc;

use axum::{
    Router,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Json, Response},
    routing::get,
};
use serde_json::{Value, json};
use sleuth_engine::{ReportFilter, SuspicionEngine, WalletReport};
use tower_http::cors::{Any, CorsLayer};
use tracing::warn;

use crate::analysis::{RunOutput, run_file};
use crate::config::SleuthConfig;
use crate::export::write_suspects;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<SleuthConfig>,
    pub engine: Arc<SuspicionEngine>,
}

impl AppState {
    pub fn new(config: SleuthConfig) -> anyhow::Result<Self> {
        let engine = SuspicionEngine::new(config.detection.clone())?;
        Ok(Self {
            config: Arc::new(config),
            engine: Arc::new(engine),
        })
    }
}

// ── Error helper ─────────────────────────────────────────────────────────────

enum ApiError {
    BadRequest(String),
    NotFound(String),
    Internal(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m),
            ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m),
            ApiError::Internal(e) => {
                warn!(error = %format!("{e:#}"), "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, format!("{e:#}"))
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl<E: Into<anyhow::Error>> From<E> for ApiError {
    fn from(e: E) -> Self {
        ApiError::Internal(e.into())
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

// ── Router ───────────────────────────────────────────────────────────────────

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/analyze", get(analyze))
        .route("/results", get(results))
        .route("/results/:wallet", get(wallet_detail))
        .route("/export", get(export))
        .layer(cors)
        .with_state(state)
}

/// Run the pipeline off the async executor.
async fn run(state: &AppState) -> Result<RunOutput, ApiError> {
    let path = state.config.data_path.clone();
    let engine = state.engine.clone();
    let output = tokio::task::spawn_blocking(move || run_file(&path, &engine)).await??;
    Ok(output)
}

// ── /health ──────────────────────────────────────────────────────────────────

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

// ── /analyze ─────────────────────────────────────────────────────────────────

async fn analyze(State(s): State<AppState>) -> ApiResult<Value> {
    let out = run(&s).await?;
    let seeds: Vec<&str> = out.analysis.seeds().map(|w| w.as_str()).collect();
    let subgraph = out.analysis.suspect_subgraph();

    Ok(Json(json!({
        "message":  "analysis completed",
        "ingest":   out.ingest,
        "summary":  out.summary(),
        "seeds":    seeds,
        "max_raw":  out.analysis.max_raw(),
        "subgraph": { "nodes": subgraph.node_count(), "edges": subgraph.edges },
        "examples": {
            "fan_out": out.analysis.fan_out_example(),
            "fan_in":  out.analysis.fan_in_example(),
        },
    })))
}

// ── /results?risk=&search=&limit= ────────────────────────────────────────────

async fn results(
    State(s): State<AppState>,
    query: Result<Query<ReportFilter>, QueryRejection>,
) -> ApiResult<Vec<WalletReport>> {
    let Query(filter) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let out = run(&s).await?;
    let reports = out.analysis.reports();
    if filter == ReportFilter::default() {
        return Ok(Json(reports));
    }
    Ok(Json(filter.apply(&reports)))
}

// ── /results/:wallet ─────────────────────────────────────────────────────────

async fn wallet_detail(
    State(s): State<AppState>,
    Path(wallet): Path<String>,
) -> ApiResult<Value> {
    let out = run(&s).await?;
    let record = out
        .analysis
        .get(&wallet)
        .ok_or_else(|| ApiError::NotFound(format!("unknown wallet: {wallet}")))?;
    let report = WalletReport::from(record);
    let graph = out.analysis.graph();
    let ix = graph.index_of(&wallet);
    let neighborhood = out.analysis.neighborhood(&wallet);

    Ok(Json(json!({
        "wallet":        report.wallet,
        "score":         report.score,
        "risk":          report.risk(),
        "fan_out":       report.fan_out,
        "fan_in":        report.fan_in,
        "peeling_chain": report.peeling_chain,
        "raw_score":     record.raw_score,
        "proximity":     record.proximity(),
        "in_degree":     ix.map(|ix| graph.in_degree(ix)),
        "out_degree":    ix.map(|ix| graph.out_degree(ix)),
        "successors":    neighborhood.as_ref().map(|n| &n.successors),
        "predecessors":  neighborhood.as_ref().map(|n| &n.predecessors),
    })))
}

// ── /export ──────────────────────────────────────────────────────────────────

async fn export(State(s): State<AppState>) -> Result<Response, ApiError> {
    let out = run(&s).await?;
    let mut body = Vec::new();
    write_suspects(&mut body, &out.analysis.reports())?;
    Ok(([(header::CONTENT_TYPE, "text/csv")], body).into_response())
}
