//! # API REST
//!
//! REST API for patient trajectory analysis.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (path validation, JSON serialisation, CORS)
//!
//! All decision logic lives in `trajectory-core`; handlers only validate input, call
//! [`TimelineService`] and translate results into `api-shared` wire types.

#![warn(rust_2018_idioms)]

pub mod config;

use axum::{
    extract::{Path as AxumPath, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use api_shared::{
    DeletePatientRes, HealthRes, HealthService, IssueRes, NewVisitReq, PatientTimelineRes,
    ResetRes, VisitRes,
};
use trajectory_core::{PatientId, TimelineService, TrajectoryError};

pub use config::{ConfigError, RestConfig};

/// Application state shared across REST API handlers.
#[derive(Clone)]
pub struct AppState {
    timeline_service: TimelineService,
}

impl AppState {
    pub fn new(timeline_service: TimelineService) -> Self {
        Self { timeline_service }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Patient Trajectory & Diagnosis Drift Detector",
        description = "Rule-based analysis of chronological patient visits."
    ),
    paths(
        health,
        list_patients,
        get_timeline,
        add_visit,
        delete_patient,
        reset_all,
    ),
    components(schemas(
        HealthRes,
        NewVisitReq,
        VisitRes,
        IssueRes,
        PatientTimelineRes,
        DeletePatientRes,
        ResetRes,
    ))
)]
pub struct ApiDoc;

/// Builds the REST router.
///
/// Swagger UI is mounted at `/swagger-ui` (document at `/api-docs/openapi.json`) when enabled in
/// `cfg`. CORS is permissive so local frontends can call the API directly.
pub fn router(state: AppState, cfg: &RestConfig) -> Router {
    let mut app = Router::new()
        .route("/health", get(health))
        .route("/patients", get(list_patients))
        .route("/patients/:id", get(get_timeline).delete(delete_patient))
        .route("/patients/:id/visits", post(add_visit))
        .route("/reset", delete(reset_all));

    if cfg.enable_swagger() {
        app = app.merge(
            SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()),
        );
    }

    app.layer(CorsLayer::permissive()).with_state(state)
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
/// Used by monitoring and load balancer health checks.
#[axum::debug_handler]
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    get,
    path = "/patients",
    responses(
        (status = 200, description = "Identifiers of stored patients", body = Vec<String>),
        (status = 500, description = "Internal server error")
    )
)]
/// List the identifiers of every patient with recorded visits.
///
/// # Errors
/// Returns `500 Internal Server Error` if the visit store cannot be read.
#[axum::debug_handler]
async fn list_patients(
    State(state): State<AppState>,
) -> Result<Json<Vec<String>>, (StatusCode, &'static str)> {
    let ids = state
        .timeline_service
        .list_patients()
        .map_err(|e| error_response("List patients", e))?;
    Ok(Json(ids.into_iter().map(PatientId::into_inner).collect()))
}

#[utoipa::path(
    get,
    path = "/patients/{id}",
    params(("id" = String, Path, description = "Patient identifier")),
    responses(
        (status = 200, description = "Sorted visits with freshly computed issues", body = PatientTimelineRes),
        (status = 400, description = "Invalid patient identifier"),
        (status = 404, description = "Patient not found"),
        (status = 500, description = "Internal server error")
    )
)]
/// Get a patient's timeline
///
/// Visits are returned sorted by date and issues are recomputed on every call.
///
/// # Errors
/// Returns `404 Not Found` if the patient has no recorded visits.
#[axum::debug_handler]
async fn get_timeline(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
) -> Result<Json<PatientTimelineRes>, (StatusCode, &'static str)> {
    let id = parse_patient_id(&id)?;
    let timeline = state
        .timeline_service
        .timeline(&id)
        .map_err(|e| error_response("Get timeline", e))?;
    Ok(Json(timeline.into()))
}

#[utoipa::path(
    post,
    path = "/patients/{id}/visits",
    params(("id" = String, Path, description = "Patient identifier")),
    request_body = NewVisitReq,
    responses(
        (status = 200, description = "Visit recorded; updated timeline", body = PatientTimelineRes),
        (status = 400, description = "Invalid patient identifier or malformed JSON"),
        (status = 422, description = "Visit payload failed validation"),
        (status = 500, description = "Internal server error")
    )
)]
/// Record a visit for a patient
///
/// Creates the patient on first use. Payload validation (date format, required fields) is done
/// by the JSON extractor before the analyzer runs.
///
/// # Errors
/// Returns `400 Bad Request` for an invalid patient identifier.
#[axum::debug_handler]
async fn add_visit(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
    Json(req): Json<NewVisitReq>,
) -> Result<Json<PatientTimelineRes>, (StatusCode, &'static str)> {
    let id = parse_patient_id(&id)?;
    let timeline = state
        .timeline_service
        .record_visit(&id, req.into())
        .map_err(|e| error_response("Record visit", e))?;
    Ok(Json(timeline.into()))
}

#[utoipa::path(
    delete,
    path = "/patients/{id}",
    params(("id" = String, Path, description = "Patient identifier")),
    responses(
        (status = 200, description = "Patient deleted", body = DeletePatientRes),
        (status = 400, description = "Invalid patient identifier"),
        (status = 404, description = "Patient not found"),
        (status = 500, description = "Internal server error")
    )
)]
/// Delete all visits for a patient
///
/// # Errors
/// Returns `404 Not Found` if the patient is unknown.
#[axum::debug_handler]
async fn delete_patient(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
) -> Result<Json<DeletePatientRes>, (StatusCode, &'static str)> {
    let id = parse_patient_id(&id)?;
    state
        .timeline_service
        .delete_patient(&id)
        .map_err(|e| error_response("Delete patient", e))?;
    Ok(Json(DeletePatientRes {
        status: "deleted".into(),
        patient_id: id.into_inner(),
    }))
}

#[utoipa::path(
    delete,
    path = "/reset",
    responses(
        (status = 200, description = "Store cleared", body = ResetRes),
        (status = 500, description = "Internal server error")
    )
)]
/// Clear every stored patient
#[axum::debug_handler]
async fn reset_all(
    State(state): State<AppState>,
) -> Result<Json<ResetRes>, (StatusCode, &'static str)> {
    state
        .timeline_service
        .reset()
        .map_err(|e| error_response("Reset", e))?;
    Ok(Json(ResetRes {
        status: "reset".into(),
        patients: 0,
    }))
}

fn parse_patient_id(raw: &str) -> Result<PatientId, (StatusCode, &'static str)> {
    PatientId::new(raw).map_err(|e| {
        tracing::warn!("Invalid patient id {:?}: {}", raw, e);
        (StatusCode::BAD_REQUEST, "Invalid patient id")
    })
}

fn error_response(operation: &str, err: TrajectoryError) -> (StatusCode, &'static str) {
    match err {
        TrajectoryError::PatientNotFound(_) => (StatusCode::NOT_FOUND, "Patient not found"),
        TrajectoryError::StoreUnavailable(_) | TrajectoryError::Import { .. } => {
            tracing::error!("{} error: {:?}", operation, err);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
        }
    }
}
