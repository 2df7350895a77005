//! Pay component definitions.
//!
//! A [`PayComponentDefinition`] is the reusable, catalog-owned description of
//! a pay component: what it is called, whether it adds to or subtracts from
//! pay, and how its amount is calculated. Salary structures refer to these
//! definitions by id and add the per-structure configuration.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a component adds to or subtracts from pay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComponentType {
    /// Counted towards gross salary.
    Earning,
    /// Subtracted from gross salary.
    Deduction,
}

/// The reporting category of a component.
///
/// Exactly one category, BASIC, carries meaning for evaluation: the first
/// BASIC component of a structure is its anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComponentCategory {
    /// Basic salary.
    Basic,
    /// House rent allowance.
    Hra,
    /// General allowances.
    Allowance,
    /// Bonuses and incentives.
    Bonus,
    /// Reimbursements.
    Reimbursement,
    /// Statutory contributions and deductions.
    Statutory,
    /// Anything else.
    Other,
}

/// How a component's monthly amount is calculated.
///
/// # Example
///
/// ```
/// use salary_engine::models::CalculationType;
///
/// assert_eq!(CalculationType::AttendanceBased.to_string(), "ATTENDANCE_BASED");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CalculationType {
    /// A fixed monthly amount.
    Fixed,
    /// A percentage of CTC, gross, basic or another component.
    Percentage,
    /// A free-form formula.
    Formula,
    /// A fixed monthly amount scaled by attendance.
    AttendanceBased,
}

impl fmt::Display for CalculationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CalculationType::Fixed => "FIXED",
            CalculationType::Percentage => "PERCENTAGE",
            CalculationType::Formula => "FORMULA",
            CalculationType::AttendanceBased => "ATTENDANCE_BASED",
        };
        f.write_str(name)
    }
}

/// A catalog entry describing a reusable pay component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayComponentDefinition {
    /// Unique identifier referenced by structures.
    pub id: String,
    /// Short payslip code (e.g., "BASIC", "HRA").
    pub code: String,
    /// Human-readable name.
    pub name: String,
    /// Earning or deduction.
    #[serde(rename = "type")]
    pub component_type: ComponentType,
    /// Reporting category.
    pub category: ComponentCategory,
    /// How the monthly amount is calculated.
    pub calculation_type: CalculationType,
    /// Whether the component is mandated by statute.
    #[serde(default)]
    pub is_statutory: bool,
    /// Whether the component is subject to income tax.
    #[serde(default)]
    pub is_taxable: bool,
}

impl PayComponentDefinition {
    /// Returns true if the component counts towards gross salary.
    pub fn is_earning(&self) -> bool {
        self.component_type == ComponentType::Earning
    }

    /// Returns true if the component is in the BASIC category.
    pub fn is_basic(&self) -> bool {
        self.category == ComponentCategory::Basic
    }
}
