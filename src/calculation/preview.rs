//! Salary previews for draft and stored structures.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{GrossBasis, PreviewResult, SalaryAssignment, StructureComponentDraft};

use super::{EvaluationInput, evaluate, resolve, validate, validate_structure};

/// Where the components of a preview come from.
#[derive(Debug, Clone, Copy)]
pub enum StructureSource<'a> {
    /// An unsaved list of components, typically from an editor.
    Draft(&'a [StructureComponentDraft]),
    /// A stored structure; `None` selects the latest version.
    Stored {
        /// The structure id.
        structure_id: &'a str,
        /// The version to evaluate.
        version: Option<u32>,
    },
}

/// Computes salary previews against a loaded configuration.
///
/// The service holds no state of its own; identical inputs always produce
/// identical results.
///
/// # Example
///
/// ```no_run
/// use salary_engine::calculation::{PreviewService, StructureSource};
/// use salary_engine::config::ConfigLoader;
/// use rust_decimal::Decimal;
///
/// let loader = ConfigLoader::load("./config/default")?;
/// let service = PreviewService::new(loader.config());
///
/// let preview = service.compute_preview(
///     StructureSource::Stored { structure_id: "standard", version: Some(1) },
///     Decimal::from(1_200_000),
///     None,
/// )?;
/// println!("Net salary: {}", preview.net_salary);
/// # Ok::<(), salary_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct PreviewService<'a> {
    config: &'a EngineConfig,
    gross_basis: GrossBasis,
}

impl<'a> PreviewService<'a> {
    /// Creates a service using the configured `GROSS` basis.
    pub fn new(config: &'a EngineConfig) -> Self {
        Self {
            config,
            gross_basis: config.settings().gross_basis,
        }
    }

    /// Overrides how `GROSS` references are resolved.
    pub fn with_gross_basis(mut self, gross_basis: GrossBasis) -> Self {
        self.gross_basis = gross_basis;
        self
    }

    /// Computes the monthly breakdown of a structure for an annual CTC.
    ///
    /// `attendance_factor` defaults to 1 (full attendance).
    ///
    /// # Returns
    ///
    /// Returns the preview, or an error if:
    /// - `ctc_annual` is not positive or `attendance_factor` is outside 0..=1
    /// - a stored structure does not exist
    /// - the structure fails validation or dependency resolution
    /// - the resulting net salary would be negative
    pub fn compute_preview(
        &self,
        source: StructureSource<'_>,
        ctc_annual: Decimal,
        attendance_factor: Option<Decimal>,
    ) -> EngineResult<PreviewResult> {
        if ctc_annual <= Decimal::ZERO {
            return Err(EngineError::InvalidRequest {
                field: "ctc_annual".to_string(),
                message: format!("must be greater than zero, got {}", ctc_annual),
            });
        }

        let attendance_factor = attendance_factor.unwrap_or(Decimal::ONE);
        if attendance_factor < Decimal::ZERO || attendance_factor > Decimal::ONE {
            return Err(EngineError::InvalidRequest {
                field: "attendance_factor".to_string(),
                message: format!("must be between 0 and 1, got {}", attendance_factor),
            });
        }

        let catalog = self.config.catalog();
        let validated = match source {
            StructureSource::Draft(drafts) => validate(drafts, catalog)?,
            StructureSource::Stored {
                structure_id,
                version,
            } => {
                let structure = self.config.find_structure(structure_id, version)?;
                validate_structure(structure, catalog)?
            }
        };

        let structure_id = validated.structure_id().map(str::to_string);
        let structure_version = validated.version();
        let plan = resolve(validated)?;

        debug!(
            structure_id = structure_id.as_deref().unwrap_or("draft"),
            components = plan.components().len(),
            first_pass = plan.first_pass().len(),
            second_pass = plan.second_pass().len(),
            "Resolved evaluation plan"
        );

        let evaluation = evaluate(
            &plan,
            &EvaluationInput {
                ctc_annual,
                attendance_factor,
                gross_basis: self.gross_basis,
            },
        )?;

        Ok(PreviewResult {
            structure_id,
            structure_version,
            ctc_annual,
            ctc_monthly: evaluation.ctc_monthly,
            gross_basis: self.gross_basis,
            components: evaluation.components,
            total_earnings: evaluation.total_earnings,
            total_deductions: evaluation.total_deductions,
            net_salary: evaluation.net_salary,
            audit_trace: evaluation.audit_trace,
        })
    }

    /// Computes the preview an employee's assignment produces on a date.
    ///
    /// The pinned structure version is always used, even when newer
    /// versions have been published since.
    pub fn compute_for_assignment(
        &self,
        assignment: &SalaryAssignment,
        on_date: NaiveDate,
        attendance_factor: Option<Decimal>,
    ) -> EngineResult<PreviewResult> {
        if !assignment.is_active_on(on_date) {
            return Err(EngineError::AssignmentNotActive {
                employee_id: assignment.employee_id.clone(),
                date: on_date,
            });
        }

        self.compute_preview(
            StructureSource::Stored {
                structure_id: &assignment.structure_id,
                version: Some(assignment.structure_version),
            },
            assignment.ctc_annual,
            attendance_factor,
        )
    }
}
