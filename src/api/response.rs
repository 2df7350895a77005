//! Response types for the salary structure engine API.
//!
//! This module defines the error response structures and error handling
//! for the HTTP API.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, ErrorKind};

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Every individual problem, for errors that aggregate several.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            errors: Vec::new(),
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            details: Some(details.into()),
            ..Self::new(code, message)
        }
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let kind = error.kind();
        match error {
            EngineError::ConfigNotFound { path } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration error",
                    format!("Configuration file not found: {}", path),
                ),
            },
            EngineError::ConfigParseError { path, message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration parse error",
                    format!("Failed to parse {}: {}", path, message),
                ),
            },
            EngineError::DuplicateCatalogComponent { component_id } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration error",
                    format!("Component '{}' is defined more than once in the catalog", component_id),
                ),
            },
            EngineError::ComponentNotFound { component_id } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "COMPONENT_NOT_FOUND",
                    format!("Component not found: {}", component_id),
                    format!("The component id '{}' is not in the catalog", component_id),
                ),
            },
            EngineError::StructureNotFound {
                structure_id,
                version,
            } => ApiErrorResponse {
                status: StatusCode::NOT_FOUND,
                error: ApiError::new(
                    "STRUCTURE_NOT_FOUND",
                    format!(
                        "Salary structure '{}' not found (version {})",
                        structure_id, version
                    ),
                ),
            },
            EngineError::InvalidStructure(errors) => {
                let code = match kind {
                    Some(ErrorKind::Dependency) => "DEPENDENCY_ERROR",
                    _ => "STRUCTURAL_ERROR",
                };
                ApiErrorResponse {
                    status: StatusCode::UNPROCESSABLE_ENTITY,
                    error: ApiError {
                        errors: errors.messages(),
                        ..ApiError::new(
                            code,
                            format!("Salary structure has {} error(s)", errors.len()),
                        )
                    },
                }
            }
            EngineError::InvalidRequest { field, message } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::new(
                    "VALIDATION_ERROR",
                    format!("Invalid request field '{}': {}", field, message),
                ),
            },
            EngineError::NegativeNetSalary { net_salary } => ApiErrorResponse {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                error: ApiError::with_details(
                    "EVALUATION_ERROR",
                    format!("Net salary would be negative ({})", net_salary),
                    "Deductions exceed earnings for this structure and CTC",
                ),
            },
            EngineError::AmountOverflow {
                component_id,
                operation,
            } => ApiErrorResponse {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                error: ApiError::with_details(
                    "EVALUATION_ERROR",
                    format!("Amount overflow in component '{}'", component_id),
                    format!("The {} result exceeds the supported decimal range", operation),
                ),
            },
            EngineError::AssignmentNotActive { employee_id, date } => ApiErrorResponse {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                error: ApiError::new(
                    "ASSIGNMENT_NOT_ACTIVE",
                    format!(
                        "Assignment for employee '{}' is not active on {}",
                        employee_id, date
                    ),
                ),
            },
            EngineError::CalculationError { message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details("CALCULATION_ERROR", "Calculation failed", message),
            },
        }
    }
}
