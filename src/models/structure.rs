//! Salary structure models.
//!
//! A structure is authored as a list of [`StructureComponentDraft`] entries,
//! whose fields are optional because their meaning depends on the catalog
//! definition's calculation type. Validation turns each draft into a
//! [`StructureComponent`] carrying a typed [`CalculationRule`], after which
//! invalid field combinations can no longer be expressed.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::PayComponentDefinition;

/// The amount a percentage component is calculated against.
///
/// `CTC`, `GROSS` and `BASIC` are synthetic keywords; anything else names a
/// component within the same structure.
///
/// # Example
///
/// ```
/// use salary_engine::models::BaseRef;
///
/// assert_eq!(BaseRef::from("CTC".to_string()), BaseRef::Ctc);
/// assert_eq!(
///     BaseRef::from("basic_salary".to_string()),
///     BaseRef::Component("basic_salary".to_string())
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BaseRef {
    /// Monthly cost-to-company (annual CTC / 12).
    Ctc,
    /// Sum of earning components.
    Gross,
    /// The structure's anchor BASIC component.
    Basic,
    /// Another component in the same structure, by id.
    Component(String),
}

impl BaseRef {
    /// Returns the referenced component id for specific-id references.
    pub fn component_id(&self) -> Option<&str> {
        match self {
            BaseRef::Component(id) => Some(id),
            _ => None,
        }
    }
}

impl From<String> for BaseRef {
    fn from(value: String) -> Self {
        match value.as_str() {
            "CTC" => BaseRef::Ctc,
            "GROSS" => BaseRef::Gross,
            "BASIC" => BaseRef::Basic,
            _ => BaseRef::Component(value),
        }
    }
}

impl From<BaseRef> for String {
    fn from(value: BaseRef) -> Self {
        value.to_string()
    }
}

impl fmt::Display for BaseRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BaseRef::Ctc => f.write_str("CTC"),
            BaseRef::Gross => f.write_str("GROSS"),
            BaseRef::Basic => f.write_str("BASIC"),
            BaseRef::Component(id) => f.write_str(id),
        }
    }
}

/// Optional lower and upper limits applied to a computed amount.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    /// Minimum monthly amount.
    pub min: Option<Decimal>,
    /// Maximum monthly amount.
    pub max: Option<Decimal>,
}

impl Bounds {
    /// Clamps a value into the bounds that are present.
    ///
    /// # Example
    ///
    /// ```
    /// use salary_engine::models::Bounds;
    /// use rust_decimal::Decimal;
    ///
    /// let bounds = Bounds {
    ///     min: Some(Decimal::from(5000)),
    ///     max: Some(Decimal::from(10000)),
    /// };
    /// assert_eq!(bounds.clamp(Decimal::from(3000)), Decimal::from(5000));
    /// assert_eq!(bounds.clamp(Decimal::from(12000)), Decimal::from(10000));
    /// assert_eq!(bounds.clamp(Decimal::from(7000)), Decimal::from(7000));
    /// ```
    pub fn clamp(&self, value: Decimal) -> Decimal {
        let capped = match self.max {
            Some(max) if value > max => max,
            _ => value,
        };
        match self.min {
            Some(min) if capped < min => min,
            _ => capped,
        }
    }
}

/// How a validated component computes its monthly amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CalculationRule {
    /// A fixed monthly amount.
    Fixed {
        /// The monthly amount.
        value: Decimal,
    },
    /// A percentage of a reference amount.
    Percentage {
        /// Percentage in the 0-100 range (values above 100 are allowed).
        percentage: Decimal,
        /// What the percentage is taken of.
        base: BaseRef,
    },
    /// A fixed monthly amount scaled by the attendance factor.
    AttendanceBased {
        /// The monthly amount at full attendance.
        value: Decimal,
    },
}

impl CalculationRule {
    /// Returns the base reference of a percentage rule.
    pub fn base(&self) -> Option<&BaseRef> {
        match self {
            CalculationRule::Percentage { base, .. } => Some(base),
            _ => None,
        }
    }
}

/// A structure component as authored, before validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructureComponentDraft {
    /// The catalog id of the component.
    pub component_id: String,
    /// Monthly amount for FIXED and ATTENDANCE_BASED components.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_value: Option<Decimal>,
    /// Percentage for PERCENTAGE components.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percentage: Option<Decimal>,
    /// Base reference for PERCENTAGE components.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_component_ref: Option<BaseRef>,
    /// Lower bound on the monthly amount.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_value: Option<Decimal>,
    /// Upper bound on the monthly amount.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_value: Option<Decimal>,
    /// Whether the component is variable pay.
    #[serde(default)]
    pub is_variable: bool,
    /// Display order; defaults to the position in the list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
}

impl StructureComponentDraft {
    /// Returns the bounds declared on this draft.
    pub fn bounds(&self) -> Bounds {
        Bounds {
            min: self.min_value,
            max: self.max_value,
        }
    }
}

/// A validated structure component with its catalog definition attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructureComponent {
    /// The catalog id of the component.
    pub component_id: String,
    /// The catalog definition.
    pub definition: PayComponentDefinition,
    /// How the monthly amount is computed.
    pub rule: CalculationRule,
    /// Limits applied to the computed amount.
    pub bounds: Bounds,
    /// Whether the component is variable pay.
    pub is_variable: bool,
    /// Display order.
    pub order: u32,
}

/// Conceptual lifecycle of a stored structure.
///
/// The engine never transitions structures itself; the surrounding system
/// owns these states.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructureStatus {
    /// Being authored; may fail validation.
    #[default]
    Draft,
    /// Passes validation, not yet assigned.
    Valid,
    /// Bound to at least one assignment.
    Assigned,
    /// No active assignments; kept for historical evaluation.
    Retired,
}

impl StructureStatus {
    /// Returns true if edits may be made in place.
    ///
    /// Assigned and retired structures are frozen; changes to them must be
    /// published as a new version.
    pub fn is_editable(&self) -> bool {
        matches!(self, StructureStatus::Draft | StructureStatus::Valid)
    }
}

/// A versioned salary structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalaryStructure {
    /// Structure id, shared by all versions.
    pub id: String,
    /// Version number; `(id, version)` identifies an immutable structure.
    #[serde(default = "default_version")]
    pub version: u32,
    /// Human-readable name.
    pub name: String,
    /// Short code.
    pub code: String,
    /// Optional salary grade.
    #[serde(default)]
    pub grade: Option<String>,
    /// Date from which this version applies.
    #[serde(default)]
    pub effective_from: Option<NaiveDate>,
    /// Lifecycle state.
    #[serde(default)]
    pub status: StructureStatus,
    /// The component configuration, in authored order.
    pub components: Vec<StructureComponentDraft>,
    /// Free-form metadata.
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

fn default_version() -> u32 {
    1
}
