//! HTTP request handlers for the salary structure engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::PreviewService;
use crate::config::CatalogMetadata;
use crate::error::EngineError;
use crate::models::{PayComponentDefinition, PreviewResult, SalaryStructure};

use super::request::{AssignmentPreviewRequest, PreviewRequest};
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/preview", post(preview_handler))
        .route("/assignments/preview", post(assignment_preview_handler))
        .route("/components", get(list_components_handler))
        .route("/structures/:id", get(get_structure_handler))
        .route("/catalog/reload", post(reload_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

/// Response body for `GET /components`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ComponentListResponse {
    /// Catalog metadata.
    pub catalog: CatalogMetadata,
    /// Every component definition, sorted by id.
    pub components: Vec<PayComponentDefinition>,
}

/// Query parameters for `GET /structures/:id`.
#[derive(Debug, Deserialize)]
pub struct StructureQuery {
    /// The version to fetch; latest if absent.
    pub version: Option<u32>,
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn error_response(error: impl Into<ApiErrorResponse>) -> Response {
    let api_error: ApiErrorResponse = error.into();
    json_response(api_error.status, api_error.error)
}

/// Maps a body extraction failure to a 400 response.
fn rejection_response(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // The body text carries the detailed error from serde
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::new("VALIDATION_ERROR", body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    json_response(StatusCode::BAD_REQUEST, error)
}

fn preview_outcome(
    correlation_id: Uuid,
    start_time: Instant,
    outcome: Result<PreviewResult, EngineError>,
) -> Response {
    match outcome {
        Ok(result) => {
            info!(
                correlation_id = %correlation_id,
                structure_id = result.structure_id.as_deref().unwrap_or("draft"),
                components = result.components.len(),
                net_salary = %result.net_salary,
                warnings = result.audit_trace.warnings.len(),
                duration_us = start_time.elapsed().as_micros(),
                "Preview completed successfully"
            );
            json_response(StatusCode::OK, result)
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Preview failed"
            );
            error_response(err)
        }
    }
}

/// Handler for POST /preview endpoint.
///
/// Accepts a draft or stored structure reference plus a CTC and returns the
/// monthly breakdown.
async fn preview_handler(
    State(state): State<AppState>,
    payload: Result<Json<PreviewRequest>, JsonRejection>,
) -> Response {
    // Generate correlation ID for request tracking
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing preview request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let source = match request.source() {
        Ok(source) => source,
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Invalid preview request");
            return error_response(err);
        }
    };

    let config = state.config();
    let start_time = Instant::now();
    let outcome = PreviewService::new(config.config()).compute_preview(
        source,
        request.ctc_annual,
        request.attendance_factor,
    );
    preview_outcome(correlation_id, start_time, outcome)
}

/// Handler for POST /assignments/preview endpoint.
async fn assignment_preview_handler(
    State(state): State<AppState>,
    payload: Result<Json<AssignmentPreviewRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };
    info!(
        correlation_id = %correlation_id,
        employee_id = %request.assignment.employee_id,
        on_date = %request.on_date,
        "Processing assignment preview request"
    );

    let config = state.config();
    let start_time = Instant::now();
    let outcome = PreviewService::new(config.config()).compute_for_assignment(
        &request.assignment,
        request.on_date,
        request.attendance_factor,
    );
    preview_outcome(correlation_id, start_time, outcome)
}

/// Handler for GET /components endpoint.
async fn list_components_handler(State(state): State<AppState>) -> Response {
    let config = state.config();
    let catalog = config.catalog();
    json_response(
        StatusCode::OK,
        ComponentListResponse {
            catalog: catalog.metadata().clone(),
            components: catalog.iter().cloned().collect(),
        },
    )
}

/// Handler for GET /structures/:id endpoint.
async fn get_structure_handler(
    State(state): State<AppState>,
    Path(structure_id): Path<String>,
    Query(query): Query<StructureQuery>,
) -> Response {
    let config = state.config();
    match config.get_structure(&structure_id, query.version) {
        Ok(structure) => json_response::<&SalaryStructure>(StatusCode::OK, structure),
        Err(err) => error_response(err),
    }
}

/// Handler for POST /catalog/reload endpoint.
async fn reload_handler(State(state): State<AppState>) -> Response {
    match state.reload() {
        Ok(config) => json_response(
            StatusCode::OK,
            serde_json::json!({
                "catalog": config.catalog().metadata(),
                "components": config.catalog().len(),
                "structures": config.config().structures().len(),
            }),
        ),
        Err(err) => {
            warn!(error = %err, "Configuration reload failed; keeping current configuration");
            error_response(err)
        }
    }
}

/// Handler for GET /health endpoint.
async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}
