//! Request types for the salary structure engine API.
//!
//! This module defines the JSON request structures for the `/preview`
//! endpoints.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::StructureSource;
use crate::error::{EngineError, EngineResult};
use crate::models::{SalaryAssignment, StructureComponentDraft};

/// Request body for the `/preview` endpoint.
///
/// Exactly one of `components` (an unsaved draft) or `structure_id` (a
/// stored structure) must be given.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewRequest {
    /// Draft components to preview.
    #[serde(default)]
    pub components: Option<Vec<StructureComponentDraft>>,
    /// Id of a stored structure to preview.
    #[serde(default)]
    pub structure_id: Option<String>,
    /// Version of the stored structure; latest if absent.
    #[serde(default)]
    pub structure_version: Option<u32>,
    /// Annual cost-to-company.
    pub ctc_annual: Decimal,
    /// Proration for attendance-based components; defaults to 1.
    #[serde(default)]
    pub attendance_factor: Option<Decimal>,
}

impl PreviewRequest {
    /// Returns the structure this request previews.
    pub fn source(&self) -> EngineResult<StructureSource<'_>> {
        match (&self.components, &self.structure_id) {
            (Some(components), None) => Ok(StructureSource::Draft(components)),
            (None, Some(structure_id)) => Ok(StructureSource::Stored {
                structure_id,
                version: self.structure_version,
            }),
            (Some(_), Some(_)) => Err(EngineError::InvalidRequest {
                field: "components".to_string(),
                message: "provide either components or structure_id, not both".to_string(),
            }),
            (None, None) => Err(EngineError::InvalidRequest {
                field: "components".to_string(),
                message: "one of components or structure_id is required".to_string(),
            }),
        }
    }
}

/// Request body for the `/assignments/preview` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentPreviewRequest {
    /// The assignment to evaluate.
    pub assignment: SalaryAssignment,
    /// The date to evaluate the assignment on.
    pub on_date: NaiveDate,
    /// Proration for attendance-based components; defaults to 1.
    #[serde(default)]
    pub attendance_factor: Option<Decimal>,
}
