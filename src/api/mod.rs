//! HTTP API module for the salary structure engine.
//!
//! This module provides the REST API endpoints for previewing salary
//! structures and browsing the component catalog.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::{ComponentListResponse, StructureQuery, create_router};
pub use request::{AssignmentPreviewRequest, PreviewRequest};
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;
