//! # API REST
//!
//! REST API implementation for the CRM task conversion service.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON bodies, status codes, CORS)
//!
//! Uses `api-shared` for request/response types and `crm-core` for the conversion itself.

#![warn(rust_2018_idioms)]

use api_shared::{
    warnings_res, ErrorRes, ExportTaskReq, ExportTaskRes, HealthRes, HealthService,
    ImportTaskRes, WarningRes,
};
use axum::{extract::State, http::StatusCode, response::Json, routing::get, routing::post, Router};
use crm_core::{CoreConfig, CoreError, CoreResult, ExportOptions, TaskService};
use fhir::FhirError;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Application state shared across REST handlers.
#[derive(Clone)]
pub struct AppState {
    task_service: TaskService,
}

impl AppState {
    pub fn new(task_service: TaskService) -> Self {
        Self { task_service }
    }

    /// Build state from startup configuration, loading the display-name directory.
    ///
    /// # Errors
    ///
    /// Returns any error from loading the configured directory file.
    pub fn from_config(cfg: &CoreConfig) -> CoreResult<Self> {
        let resolver = crm_core::resolver_from_config(cfg)?;
        Ok(Self::new(TaskService::new(resolver)))
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(health, import_task, export_task),
    components(schemas(
        HealthRes,
        ImportTaskRes,
        ExportTaskReq,
        ExportTaskRes,
        ErrorRes,
        WarningRes
    ))
)]
pub struct ApiDoc;

type ApiError = (StatusCode, Json<ErrorRes>);

/// Build the REST router with Swagger UI and permissive CORS.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/tasks/import", post(import_task))
        .route("/tasks/export", post(export_task))
        .merge(
            SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind `addr` and serve the router until the process is stopped.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails while running.
pub async fn serve(addr: &str, state: AppState) -> anyhow::Result<()> {
    tracing::info!("-- Starting CRM REST API on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(state)).await?;
    Ok(())
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Used for monitoring and load balancer health checks.
#[axum::debug_handler]
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    post,
    path = "/tasks/import",
    request_body(content = String, description = "FHIR Task resource (JSON)", content_type = "application/json"),
    responses(
        (status = 200, description = "Internal task", body = ImportTaskRes),
        (status = 400, description = "Malformed JSON or reference", body = ErrorRes),
        (status = 422, description = "Structurally invalid Task", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Convert a FHIR Task resource into an internal task
///
/// The body is read as raw text so schema errors can name the failing element. Display names
/// are filled in from the configured directory.
///
/// # Errors
/// Returns `422 Unprocessable Entity` with the violated element names if the resource fails
/// structural validation, and `400 Bad Request` if it is not a Task-shaped JSON document.
#[axum::debug_handler]
async fn import_task(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<ImportTaskRes>, ApiError> {
    match state.task_service.import_json(&body) {
        Ok(imported) => Ok(Json(ImportTaskRes {
            warnings: warnings_res(&imported.warnings),
            task: imported.task,
        })),
        Err(e) => Err(error_response(e, "task could not be loaded")),
    }
}

#[utoipa::path(
    post,
    path = "/tasks/export",
    request_body = ExportTaskReq,
    responses(
        (status = 200, description = "FHIR Task resource", body = ExportTaskRes),
        (status = 400, description = "Task cannot be represented", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Convert an internal task into a FHIR Task resource
///
/// Reference display strings are resolved from the configured directory.
///
/// # Errors
/// Returns `400 Bad Request` if an identifier needed for a reference is empty.
#[axum::debug_handler]
async fn export_task(
    State(state): State<AppState>,
    Json(req): Json<ExportTaskReq>,
) -> Result<Json<ExportTaskRes>, ApiError> {
    let options = ExportOptions {
        authored_on: req.authored_on,
        period_start: req.period_start,
    };
    match state.task_service.export(&req.task, options) {
        Ok(exported) => Ok(Json(ExportTaskRes {
            warnings: warnings_res(&exported.warnings),
            resource: exported.resource,
        })),
        Err(e) => Err(error_response(e, "task could not be saved")),
    }
}

/// Map a core error onto a status code and a generic body.
fn error_response(err: CoreError, message: &str) -> ApiError {
    let (status, violations) = match &err {
        CoreError::Fhir(FhirError::InvalidResource { violations }) => {
            (StatusCode::UNPROCESSABLE_ENTITY, violations.clone())
        }
        CoreError::Fhir(
            FhirError::MalformedReference(_)
            | FhirError::InvalidInput(_)
            | FhirError::InvalidJson(_)
            | FhirError::Translation(_),
        ) => (StatusCode::BAD_REQUEST, Vec::new()),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, Vec::new()),
    };

    if status.is_server_error() {
        tracing::error!("{message}: {err:?}");
    } else {
        tracing::warn!("{message}: {err}");
    }

    (
        status,
        Json(ErrorRes {
            error: message.to_string(),
            violations,
        }),
    )
}
