//! Preview result models.
//!
//! This module contains the [`PreviewResult`] type and its associated
//! structures that capture all outputs from evaluating a salary structure:
//! the per-component monthly breakdown, totals, and an audit trace.
//!
//! Every monetary value in a [`PreviewResult`] carries exactly two decimal
//! places, produced by [`crate::calculation::round_money`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{ComponentCategory, ComponentType};

/// What a `GROSS` base reference sums over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrossBasis {
    /// Every earning that does not itself depend on gross, regardless of
    /// declared position.
    #[default]
    AllEarnings,
    /// Earnings declared before the referencing component, as evaluated so far.
    DeclaredOrder,
}

/// The evaluated monthly amount of one structure component.
///
/// # Example
///
/// ```
/// use salary_engine::models::{ComponentAmount, ComponentCategory, ComponentType};
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let amount = ComponentAmount {
///     component_id: "hra".to_string(),
///     code: "HRA".to_string(),
///     name: "House Rent Allowance".to_string(),
///     component_type: ComponentType::Earning,
///     category: ComponentCategory::Hra,
///     monthly_amount: Decimal::from_str("20000.00").unwrap(),
///     annual_amount: Decimal::from_str("240000.00").unwrap(),
///     is_variable: false,
///     clamped: false,
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentAmount {
    /// The catalog id of the component.
    pub component_id: String,
    /// Short payslip code.
    pub code: String,
    /// Human-readable name.
    pub name: String,
    /// Earning or deduction.
    pub component_type: ComponentType,
    /// Reporting category.
    pub category: ComponentCategory,
    /// Rounded monthly amount.
    pub monthly_amount: Decimal,
    /// Monthly amount times twelve.
    pub annual_amount: Decimal,
    /// Whether the component is variable pay.
    pub is_variable: bool,
    /// Whether a min/max bound changed the computed value.
    pub clamped: bool,
}

/// A single step in the audit trace recording an evaluation decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The component evaluated in this step.
    pub component_id: String,
    /// The identifier of the rule that was applied.
    pub rule_id: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during evaluation.
///
/// Warnings indicate potential issues that don't prevent evaluation
/// but may require attention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level (e.g., "low", "medium", "high").
    pub severity: String,
}

/// The complete audit trace for an evaluation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The evaluation steps, in evaluation order.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during evaluation.
    pub warnings: Vec<AuditWarning>,
}

/// The complete result of previewing a structure for a CTC.
///
/// `total_earnings - total_deductions == net_salary` holds exactly, because
/// the totals are sums of the already-rounded component amounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewResult {
    /// The stored structure id, when previewing a stored structure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structure_id: Option<String>,
    /// The stored structure version, when previewing a stored structure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structure_version: Option<u32>,
    /// The annual CTC the preview was computed for.
    pub ctc_annual: Decimal,
    /// Annual CTC / 12, rounded.
    pub ctc_monthly: Decimal,
    /// How `GROSS` references were resolved.
    pub gross_basis: GrossBasis,
    /// Per-component amounts in declared order.
    pub components: Vec<ComponentAmount>,
    /// Sum of earning amounts.
    pub total_earnings: Decimal,
    /// Sum of deduction amounts.
    pub total_deductions: Decimal,
    /// Earnings minus deductions.
    pub net_salary: Decimal,
    /// Record of each evaluation decision.
    pub audit_trace: AuditTrace,
}

impl PreviewResult {
    /// Returns the monthly amount of a component, if present.
    pub fn amount_of(&self, component_id: &str) -> Option<Decimal> {
        self.components
            .iter()
            .find(|c| c.component_id == component_id)
            .map(|c| c.monthly_amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn create_sample_amount(component_id: &str, amount: Decimal) -> ComponentAmount {
        ComponentAmount {
            component_id: component_id.to_string(),
            code: component_id.to_uppercase(),
            name: component_id.to_string(),
            component_type: ComponentType::Earning,
            category: ComponentCategory::Allowance,
            monthly_amount: amount,
            annual_amount: amount * Decimal::from(12),
            is_variable: false,
            clamped: false,
        }
    }

    fn create_sample_result() -> PreviewResult {
        PreviewResult {
            structure_id: None,
            structure_version: None,
            ctc_annual: dec("1200000"),
            ctc_monthly: dec("100000.00"),
            gross_basis: GrossBasis::AllEarnings,
            components: vec![
                create_sample_amount("basic", dec("40000.00")),
                create_sample_amount("hra", dec("16000.00")),
            ],
            total_earnings: dec("56000.00"),
            total_deductions: dec("0.00"),
            net_salary: dec("56000.00"),
            audit_trace: AuditTrace::default(),
        }
    }

    #[test]
    fn test_amount_of_finds_component() {
        let result = create_sample_result();
        assert_eq!(result.amount_of("hra"), Some(dec("16000.00")));
        assert_eq!(result.amount_of("lta"), None);
    }

    #[test]
    fn test_money_serializes_as_string() {
        let result = create_sample_result();
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["total_earnings"], "56000.00");
        assert_eq!(json["components"][0]["monthly_amount"], "40000.00");
        assert_eq!(json["gross_basis"], "all_earnings");
        assert!(json.get("structure_id").is_none());
    }

    #[test]
    fn test_preview_result_round_trips() {
        let result = create_sample_result();
        let json = serde_json::to_string(&result).unwrap();
        let parsed: PreviewResult = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, result);
    }

    #[test]
    fn test_gross_basis_default_is_all_earnings() {
        assert_eq!(GrossBasis::default(), GrossBasis::AllEarnings);
        let basis: GrossBasis = serde_json::from_str("\"declared_order\"").unwrap();
        assert_eq!(basis, GrossBasis::DeclaredOrder);
    }
}
