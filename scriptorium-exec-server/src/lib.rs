//! HTTP surface for the scriptorium code execution service.
//!
//! Two entry points feed the same pipeline: `/execute` takes inline
//! source, `/templates/execute` resolves a stored template first. Both
//! return the program's stdout on success and a diagnostic message with
//! a client-error status when the submission itself failed.

pub mod templates;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use scriptorium_exec::{
    ExecutionLimits, ExecutionRequest, ExecutionService, Language, Outcome, StdinPayload,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::{net::SocketAddr, sync::Arc, time::Duration};
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};

use templates::TemplateStore;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Language not supported: {0}")]
    UnsupportedLanguage(String),
    #[error("{0}")]
    InvalidSource(String),
    #[error("{0}")]
    CompileError(String),
    #[error("{0}")]
    RuntimeError(String),
    #[error("execution timed out")]
    Timeout,
    #[error("Code template not found")]
    TemplateNotFound,
    #[error("Internal server error")]
    Internal(String),
}

impl From<scriptorium_exec::Error> for ServerError {
    fn from(err: scriptorium_exec::Error) -> Self {
        match err {
            scriptorium_exec::Error::UnsupportedLanguage(name) => {
                ServerError::UnsupportedLanguage(name)
            }
            scriptorium_exec::Error::InvalidSource(msg) => ServerError::InvalidSource(msg),
            other => ServerError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = match &self {
            ServerError::UnsupportedLanguage(_)
            | ServerError::InvalidSource(_)
            | ServerError::CompileError(_)
            | ServerError::RuntimeError(_) => StatusCode::BAD_REQUEST,
            ServerError::TemplateNotFound => StatusCode::NOT_FOUND,
            ServerError::Timeout => StatusCode::REQUEST_TIMEOUT,
            ServerError::Internal(detail) => {
                // The detail stays server-side; the caller gets a generic
                // message so host paths and tool errors never leak.
                error!("internal fault: {}", detail);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ExecuteRequest {
    pub language: String,
    pub code: String,
    pub input: Option<StdinPayload>,
    pub timeout: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExecuteResponse {
    pub output: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub truncated: bool,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct TemplateExecuteRequest {
    #[serde(rename = "templateId")]
    pub template_id: String,
    pub input: Option<StdinPayload>,
    pub timeout: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TemplateExecuteResponse {
    pub output: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub truncated: bool,
    pub template: TemplateSummary,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TemplateSummary {
    pub id: String,
    pub title: String,
    pub language: String,
}

#[derive(Clone)]
pub struct AppState {
    service: ExecutionService,
    templates: Arc<dyn TemplateStore>,
}

pub fn create_app(
    max_concurrent: usize,
    limits: ExecutionLimits,
    templates: Arc<dyn TemplateStore>,
) -> Router {
    let state = AppState {
        service: ExecutionService::new(max_concurrent, limits),
        templates,
    };

    Router::new()
        .route("/health", get(health_check))
        .route("/execute", post(execute))
        .route("/templates/execute", post(execute_template))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), ServerError> {
    info!("Starting code execution server on {}", addr);
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| ServerError::Internal(e.to_string()))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| ServerError::Internal(e.to_string()))?;

    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}

async fn execute(
    State(state): State<AppState>,
    Json(payload): Json<ExecuteRequest>,
) -> Result<Json<ExecuteResponse>, ServerError> {
    let language: Language = payload.language.parse().map_err(ServerError::from)?;

    let request = ExecutionRequest {
        language,
        code: payload.code,
        input: payload.input,
        timeout: Duration::from_secs(payload.timeout.unwrap_or(DEFAULT_TIMEOUT_SECS)),
    };

    let outcome = state.service.execute(request).await?;
    let (output, truncated) = into_output(outcome)?;

    Ok(Json(ExecuteResponse { output, truncated }))
}

async fn execute_template(
    State(state): State<AppState>,
    Json(payload): Json<TemplateExecuteRequest>,
) -> Result<Json<TemplateExecuteResponse>, ServerError> {
    let template = state
        .templates
        .fetch(&payload.template_id)
        .await?
        .ok_or(ServerError::TemplateNotFound)?;

    let language: Language = template.language.parse().map_err(ServerError::from)?;

    let request = ExecutionRequest {
        language,
        code: template.content,
        input: payload.input,
        timeout: Duration::from_secs(payload.timeout.unwrap_or(DEFAULT_TIMEOUT_SECS)),
    };

    let outcome = state.service.execute(request).await?;
    let (output, truncated) = into_output(outcome)?;

    Ok(Json(TemplateExecuteResponse {
        output,
        truncated,
        template: TemplateSummary {
            id: template.id,
            title: template.title,
            language: template.language,
        },
    }))
}

/// User-caused failures carry their diagnostic text verbatim; only a
/// clean exit produces a response body.
fn into_output(outcome: Outcome) -> Result<(String, bool), ServerError> {
    match outcome {
        Outcome::Success {
            stdout, truncated, ..
        } => Ok((stdout, truncated)),
        Outcome::CompileError { diagnostics } => Err(ServerError::CompileError(diagnostics)),
        Outcome::RuntimeError { stderr, .. } => Err(ServerError::RuntimeError(stderr)),
        Outcome::Timeout { .. } => Err(ServerError::Timeout),
    }
}
