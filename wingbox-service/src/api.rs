use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;
use wingbox_core::elements::MaterialResolver;
use wingbox_core::error::WingboxError;
use wingbox_core::pipeline::{Pipeline, PipelineOutput};

use crate::config::ServiceConfig;
use crate::executor::{ExecutorError, SolverExecutor};
use crate::generator::{BulkDataGenerator, GeneratorError};
use crate::models::{
    AnalysisRequest, AnalysisResponse, AnalysisStatus, AssembleResponse, ValidationResponse,
};

/// One solver run at a time
pub type SharedExecutor = Arc<Mutex<SolverExecutor>>;

/// Application state
pub struct AppState {
    config: ServiceConfig,
    resolver: MaterialResolver,
    executor: SharedExecutor,
    generator: BulkDataGenerator,
}

impl AppState {
    pub fn new(config: ServiceConfig, resolver: MaterialResolver) -> Self {
        Self {
            executor: Arc::new(Mutex::new(SolverExecutor::new(config.solver.clone()))),
            generator: BulkDataGenerator::new(),
            config,
            resolver,
        }
    }

    /// Run the pipeline and render its model as bulk data
    fn assemble(&self, request: &AnalysisRequest) -> Result<(PipelineOutput, String), ApiError> {
        let mut output = Pipeline::new(&self.resolver).run(&request.input)?;
        if let Some(title) = &request.title {
            output.model.title = title.clone();
        }
        let deck = self.generator.generate(&output.model)?;
        Ok((output, deck))
    }
}

/// Build the API router
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_check))
        .route("/api/v1/version", get(version_handler))
        .route("/api/v1/validate", post(validate_handler))
        .route("/api/v1/assemble", post(assemble_handler))
        .route("/api/v1/analyze", post(analyze_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(Arc::new(state))
}

/// Root endpoint
async fn root_handler() -> Json<serde_json::Value> {
    Json(json!({
        "service": "Wingbox Structural Service",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
        "description": "Parametric wingbox layout, load mapping and static analysis decks",
        "supported_elements": ["CQUAD4", "CTRIA3", "CBAR"],
        "load_case_modes": ["alpha", "CL"]
    }))
}

/// Health check endpoint
async fn health_check(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let solver = &state.config.solver;
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "solver_available": solver.is_available(),
        "solver_command": solver.executable.to_string_lossy(),
        "material_rows": state.resolver.rows().len()
    }))
}

/// Version endpoint
async fn version_handler() -> Json<serde_json::Value> {
    Json(json!({
        "service": "Wingbox Structural Service",
        "version": env!("CARGO_PKG_VERSION"),
        "api_version": "v1",
        "solution": "SOL 101 linear static"
    }))
}

/// Validate inputs without building geometry
async fn validate_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AnalysisRequest>,
) -> Result<Json<ValidationResponse>, ApiError> {
    tracing::info!("Validating request");
    let cases = Pipeline::new(&state.resolver).validate(&request.input)?;
    Ok(Json(ValidationResponse {
        valid: true,
        load_cases: cases.len(),
        message: "Input validation passed".to_string(),
    }))
}

/// Assemble the model and return its bulk data
async fn assemble_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AnalysisRequest>,
) -> Result<Json<AssembleResponse>, ApiError> {
    tracing::info!(
        "Received assemble request: {} mesh nodes, {} load cases",
        request.input.mesh.nodes.len(),
        request.input.load_cases.names.len()
    );
    let (output, deck) = state.assemble(&request)?;
    Ok(Json(AssembleResponse {
        job_id: Uuid::new_v4().to_string(),
        summary: output.model.summary(),
        bulk_data: deck,
        timestamp: chrono::Utc::now().to_rfc3339(),
    }))
}

/// Assemble, run the solver and return parsed results
async fn analyze_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AnalysisRequest>,
) -> Result<Json<AnalysisResponse>, ApiError> {
    tracing::info!(
        "Received analysis request: {} mesh nodes, {} load cases",
        request.input.mesh.nodes.len(),
        request.input.load_cases.names.len()
    );

    // 1. Validate, build and render
    let (output, deck) = state.assemble(&request)?;
    let summary = output.model.summary();
    tracing::info!(
        "Model assembled: {} grids, {} elements, {} subcases",
        summary.grids,
        summary.elements,
        summary.subcases
    );

    // 2. Execute analysis
    let job_id = Uuid::new_v4();
    let executor = state.executor.lock().await;
    let results = executor.execute(&job_id, &deck, &output.model).await?;

    Ok(Json(AnalysisResponse {
        job_id: job_id.to_string(),
        status: AnalysisStatus::Success,
        summary,
        results: Some(results),
        error_message: None,
        timestamp: chrono::Utc::now().to_rfc3339(),
    }))
}

/// API Errors
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Mapping error: {0}")]
    MappingError(String),
    #[error("Solver error: {0}")]
    SolverError(String),
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<WingboxError> for ApiError {
    fn from(err: WingboxError) -> Self {
        if err.is_validation() {
            ApiError::ValidationError(err.to_string())
        } else if matches!(err, WingboxError::Mapping { .. }) {
            ApiError::MappingError(err.to_string())
        } else {
            ApiError::InternalError(err.to_string())
        }
    }
}

impl From<GeneratorError> for ApiError {
    fn from(err: GeneratorError) -> Self {
        ApiError::InternalError(format!("Failed to generate bulk data: {}", err))
    }
}

impl From<ExecutorError> for ApiError {
    fn from(err: ExecutorError) -> Self {
        match err {
            ExecutorError::Deck(_) | ExecutorError::IoError(_) => {
                ApiError::InternalError(format!("Analysis execution failed: {}", err))
            }
            other => ApiError::SolverError(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::MappingError(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::SolverError(msg) => (StatusCode::BAD_GATEWAY, msg),
            ApiError::InternalError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        tracing::warn!("Request failed ({}): {}", status, message);

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_status_mapping() {
        let status = |err: ApiError| err.into_response().status();

        let coherence = WingboxError::coherence("ribs", 3, 2);
        assert_eq!(status(coherence.into()), StatusCode::BAD_REQUEST);

        let mapping = WingboxError::Mapping { case: 1, point: [0.0, 1.0, 0.0], radius: 1.0 };
        assert_eq!(status(mapping.into()), StatusCode::UNPROCESSABLE_ENTITY);

        let solver = ExecutorError::NonZeroExit { code: Some(3), dir: PathBuf::from("/tmp/job") };
        assert_eq!(status(solver.into()), StatusCode::BAD_GATEWAY);

        let io = WingboxError::IoError(std::io::Error::new(std::io::ErrorKind::Other, "disk"));
        assert_eq!(status(io.into()), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
