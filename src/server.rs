use std::net::SocketAddr;
use std::str::FromStr;

use anyhow::Result;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::analysis::ImpactReport;
use crate::audit::{audit_rows, AuditParams, AuditReport, AuditRow};
use crate::block::DEFAULT_TARGET_RATIO;
use crate::cell::{CellOutput, CellValue};
use crate::config::Config;
use crate::functions::host::CustomFunction;

#[derive(Clone)]
struct ApiState {
    config: Config,
}

#[derive(Debug, Serialize)]
struct ApiResponse<T: Serialize> {
    ok: bool,
    data: T,
}

#[derive(Debug, Serialize)]
struct ApiErrorBody {
    ok: bool,
    error: String,
}

#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ApiErrorBody {
            ok: false,
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

type ApiResult<T> = std::result::Result<Json<ApiResponse<T>>, ApiError>;

#[derive(Debug, Clone, Deserialize, Default)]
struct InvokeRequest {
    #[serde(default)]
    args: Vec<CellValue>,
}

#[derive(Debug, Clone, Deserialize)]
struct ScoreRequest {
    value: f64,
    target_ratio: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
struct AuditRequest {
    rows: Vec<AuditRow>,
    city_population: Option<f64>,
    standard_budget_unit: Option<f64>,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

#[derive(Debug, Serialize)]
struct FunctionInfo {
    name: &'static str,
    signature: &'static str,
    description: &'static str,
}

#[derive(Debug, Serialize)]
struct InvokeResponse {
    function: CustomFunction,
    result: CellOutput,
}

pub fn router(config: Config) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/v1/functions", get(functions))
        .route("/v1/functions/:name", post(invoke))
        .route("/v1/score", post(score))
        .route("/v1/audit", post(audit))
        .route("/v1/config", get(show_config))
        .layer(cors)
        .with_state(ApiState { config })
}

pub async fn run_server(config: Config, bind: SocketAddr) -> Result<()> {
    let app = router(config);
    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!("REST API listening on http://{bind}");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn health() -> Json<ApiResponse<HealthResponse>> {
    ok(HealthResponse { status: "ok" })
}

async fn functions() -> Json<ApiResponse<Vec<FunctionInfo>>> {
    ok(CustomFunction::ALL
        .iter()
        .map(|f| FunctionInfo {
            name: f.name(),
            signature: f.signature(),
            description: f.description(),
        })
        .collect())
}

async fn invoke(
    Path(name): Path<String>,
    Json(request): Json<InvokeRequest>,
) -> ApiResult<InvokeResponse> {
    let function =
        CustomFunction::from_str(&name).map_err(|e| ApiError::bad_request(e.to_string()))?;
    let result = function.invoke(&request.args);
    Ok(ok(InvokeResponse { function, result }))
}

async fn score(Json(request): Json<ScoreRequest>) -> ApiResult<ImpactReport> {
    let ratio = request.target_ratio.unwrap_or(DEFAULT_TARGET_RATIO);
    Ok(ok(ImpactReport::compute(request.value, ratio)))
}

async fn audit(
    State(state): State<ApiState>,
    Json(request): Json<AuditRequest>,
) -> ApiResult<AuditReport> {
    let city_population = request
        .city_population
        .unwrap_or(state.config.audit.city_population);
    let Some(unit) = request
        .standard_budget_unit
        .or(state.config.audit.standard_budget_unit)
    else {
        return Err(ApiError::bad_request("standard_budget_unit is required"));
    };
    let params = AuditParams::new(city_population, unit)
        .map_err(|e| ApiError::bad_request(e.to_string()))?;
    Ok(ok(audit_rows(&request.rows, params)))
}

async fn show_config(State(state): State<ApiState>) -> Json<ApiResponse<Config>> {
    ok(state.config)
}

fn ok<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse { ok: true, data })
}
