//! Error types for the salary structure engine.
//!
//! Two layers of errors live here. [`ValidationError`] describes a single
//! problem found in a salary structure; the validator collects every one of
//! them into [`ValidationErrors`] instead of stopping at the first. The
//! crate-wide [`EngineError`] wraps those collections together with
//! configuration, lookup and evaluation failures.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::CalculationType;

/// Broad classification of a structure or evaluation problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The structure itself is malformed (missing anchor, duplicate ids, bad fields).
    Structural,
    /// Component references cannot be resolved into an evaluation order.
    Dependency,
    /// The structure is well-formed but the numbers cannot be produced.
    Evaluation,
}

/// A single violation found while validating a salary structure.
///
/// # Example
///
/// ```
/// use salary_engine::error::{ErrorKind, ValidationError};
///
/// let error = ValidationError::DuplicateComponent {
///     component_id: "hra".to_string(),
/// };
/// assert_eq!(error.kind(), ErrorKind::Structural);
/// assert_eq!(error.to_string(), "Duplicate component 'hra' in structure");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// No component of category BASIC is present.
    #[error("Structure must contain at least one BASIC component")]
    MissingBasicComponent,

    /// The same component id appears more than once.
    #[error("Duplicate component '{component_id}' in structure")]
    DuplicateComponent {
        /// The repeated component id.
        component_id: String,
    },

    /// The component id is not present in the component catalog.
    #[error("Component '{component_id}' is not defined in the component catalog")]
    UnknownComponent {
        /// The unknown component id.
        component_id: String,
    },

    /// A field required by the component's calculation type is absent.
    #[error("Component '{component_id}' ({calculation_type}) requires '{field}'")]
    MissingField {
        /// The component missing the field.
        component_id: String,
        /// The calculation type that requires the field.
        calculation_type: CalculationType,
        /// The name of the missing field.
        field: &'static str,
    },

    /// The calculation type cannot be evaluated by this engine.
    #[error("Component '{component_id}' uses unsupported calculation type {calculation_type}")]
    UnsupportedCalculation {
        /// The offending component.
        component_id: String,
        /// Its calculation type.
        calculation_type: CalculationType,
    },

    /// A monetary or percentage value is negative.
    #[error("Component '{component_id}' has negative {field}: {value}")]
    NegativeValue {
        /// The offending component.
        component_id: String,
        /// The field carrying the negative value.
        field: &'static str,
        /// The rejected value.
        value: Decimal,
    },

    /// Both bounds are present and the minimum exceeds the maximum.
    #[error("Component '{component_id}' has min_value {min} greater than max_value {max}")]
    InvalidBounds {
        /// The offending component.
        component_id: String,
        /// The declared minimum.
        min: Decimal,
        /// The declared maximum.
        max: Decimal,
    },

    /// A base reference names a component that is not in the structure.
    #[error("Component '{component_id}' references '{reference}', which is not in the structure")]
    UnresolvedReference {
        /// The referencing component.
        component_id: String,
        /// The reference that could not be resolved.
        reference: String,
    },

    /// Component references form a cycle.
    #[error("Circular dependency detected: {}", .path.join(" -> "))]
    DependencyCycle {
        /// The component ids along the cycle, with the first id repeated at the end.
        path: Vec<String>,
    },
}

impl ValidationError {
    /// Returns whether this is a structural or a dependency problem.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ValidationError::UnresolvedReference { .. } | ValidationError::DependencyCycle { .. } => {
                ErrorKind::Dependency
            }
            _ => ErrorKind::Structural,
        }
    }
}

/// Every violation found in one validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Appends a violation.
    pub fn push(&mut self, error: ValidationError) {
        self.0.push(error);
    }

    /// Appends every violation from an iterator.
    pub fn extend(&mut self, errors: impl IntoIterator<Item = ValidationError>) {
        self.0.extend(errors);
    }

    /// Returns true when no violation was recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of violations.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates over the violations in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }

    /// Returns true if any violation has the given kind.
    pub fn has_kind(&self, kind: ErrorKind) -> bool {
        self.0.iter().any(|e| e.kind() == kind)
    }

    /// Renders each violation as a user-presentable message.
    pub fn messages(&self) -> Vec<String> {
        self.0.iter().map(ToString::to_string).collect()
    }

    /// Converts into `Ok(value)` when empty, otherwise `Err(self)`.
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.messages().join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        Self(vec![error])
    }
}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// The main error type for the salary structure engine.
///
/// # Example
///
/// ```
/// use salary_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/catalog.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/catalog.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// The same component id is defined twice in one catalog.
    #[error("Component '{component_id}' is defined more than once in the catalog")]
    DuplicateCatalogComponent {
        /// The repeated component id.
        component_id: String,
    },

    /// Component id was not found in the catalog.
    #[error("Component not found: {component_id}")]
    ComponentNotFound {
        /// The component id that was not found.
        component_id: String,
    },

    /// No stored structure matches the requested id and version.
    #[error("Salary structure '{structure_id}' not found (version {version})")]
    StructureNotFound {
        /// The requested structure id.
        structure_id: String,
        /// The requested version, or "latest".
        version: String,
    },

    /// The structure failed validation or dependency resolution.
    #[error("Invalid salary structure: {0}")]
    InvalidStructure(ValidationErrors),

    /// A request field was missing or out of range.
    #[error("Invalid request field '{field}': {message}")]
    InvalidRequest {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// Deductions exceed earnings for this structure and CTC.
    #[error("Net salary would be negative ({net_salary}) for this structure and CTC")]
    NegativeNetSalary {
        /// The net salary that was computed.
        net_salary: Decimal,
    },

    /// An assignment was evaluated outside its effective dates.
    #[error("Assignment for employee '{employee_id}' is not active on {date}")]
    AssignmentNotActive {
        /// The employee the assignment belongs to.
        employee_id: String,
        /// The evaluation date.
        date: NaiveDate,
    },

    /// An amount left the representable decimal range.
    #[error("Amount overflow in component '{component_id}' while computing {operation}")]
    AmountOverflow {
        /// The component being computed, or the aggregate (`GROSS`, `totals`).
        component_id: String,
        /// The operation that overflowed.
        operation: &'static str,
    },

    /// A general calculation error occurred.
    #[error("Calculation error: {message}")]
    CalculationError {
        /// A description of the calculation error.
        message: String,
    },
}

impl EngineError {
    /// Returns the structure/evaluation classification, if this error has one.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            EngineError::InvalidStructure(errors) if errors.has_kind(ErrorKind::Structural) => {
                Some(ErrorKind::Structural)
            }
            EngineError::InvalidStructure(_) => Some(ErrorKind::Dependency),
            EngineError::NegativeNetSalary { .. } | EngineError::AmountOverflow { .. } => {
                Some(ErrorKind::Evaluation)
            }
            _ => None,
        }
    }
}

impl From<ValidationErrors> for EngineError {
    fn from(errors: ValidationErrors) -> Self {
        EngineError::InvalidStructure(errors)
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
