//! Structure validation.
//!
//! This module checks a salary structure before any arithmetic runs and
//! converts its loosely-typed drafts into typed [`StructureComponent`]s.
//! Every check runs on every call and all violations are returned together,
//! so an editor can show the complete list at once.

use std::collections::HashSet;

use crate::config::ComponentCatalog;
use crate::error::{ValidationError, ValidationErrors};
use crate::models::{
    CalculationRule, CalculationType, PayComponentDefinition, SalaryStructure, StructureComponent,
    StructureComponentDraft,
};

use super::ReferenceGraph;

/// A structure that has passed every validation check.
///
/// Only [`validate`] and [`validate_structure`] can produce one, so holding a
/// `ValidatedStructure` guarantees the structure has a BASIC anchor, unique
/// component ids, well-formed rules and bounds, and acyclic references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedStructure {
    structure_id: Option<String>,
    version: Option<u32>,
    components: Vec<StructureComponent>,
    anchor: usize,
}

impl ValidatedStructure {
    /// The stored structure id, if this came from a stored structure.
    pub fn structure_id(&self) -> Option<&str> {
        self.structure_id.as_deref()
    }

    /// The stored structure version, if this came from a stored structure.
    pub fn version(&self) -> Option<u32> {
        self.version
    }

    /// The components sorted by declared order.
    pub fn components(&self) -> &[StructureComponent] {
        &self.components
    }

    /// Index of the anchor BASIC component: the first BASIC component in declared order.
    pub fn anchor(&self) -> usize {
        self.anchor
    }
}

/// Validates a stored structure against the catalog.
pub fn validate_structure(
    structure: &SalaryStructure,
    catalog: &ComponentCatalog,
) -> Result<ValidatedStructure, ValidationErrors> {
    let mut validated = validate(&structure.components, catalog)?;
    validated.structure_id = Some(structure.id.clone());
    validated.version = Some(structure.version);
    Ok(validated)
}

/// Validates a list of structure component drafts against the catalog.
///
/// Checks, in reporting order:
/// 1. at least one BASIC-category component is present;
/// 2. no component id appears twice;
/// 3. every component exists in the catalog, has a supported calculation
///    type, declares the fields its type needs, and has no negative values;
/// 4. `min_value <= max_value` when both are present;
/// 5. every specific-id base reference names a component in the structure;
/// 6. references contain no cycle.
///
/// Components are ordered by their declared `order`, falling back to their
/// position in the list.
///
/// # Example
///
/// ```no_run
/// use salary_engine::calculation::validate;
/// use salary_engine::config::ConfigLoader;
/// use salary_engine::error::ValidationError;
///
/// let config = ConfigLoader::load("./config/default").unwrap();
/// let errors = validate(&[], config.catalog()).unwrap_err();
/// assert_eq!(
///     errors.iter().next(),
///     Some(&ValidationError::MissingBasicComponent)
/// );
/// ```
pub fn validate(
    drafts: &[StructureComponentDraft],
    catalog: &ComponentCatalog,
) -> Result<ValidatedStructure, ValidationErrors> {
    let mut declared: Vec<(u32, &StructureComponentDraft)> = drafts
        .iter()
        .enumerate()
        .map(|(position, draft)| (draft.order.unwrap_or(position as u32), draft))
        .collect();
    // Stable, so equal orders keep their list position.
    declared.sort_by_key(|(order, _)| *order);

    let definitions: Vec<Option<&PayComponentDefinition>> = declared
        .iter()
        .map(|(_, draft)| catalog.lookup(&draft.component_id).ok())
        .collect();

    let mut errors = ValidationErrors::new();

    // 1. Anchor
    let anchor = definitions
        .iter()
        .position(|d| d.is_some_and(PayComponentDefinition::is_basic));
    if anchor.is_none() {
        errors.push(ValidationError::MissingBasicComponent);
    }

    // 2. Duplicates
    let mut seen: HashSet<&str> = HashSet::new();
    let mut reported: HashSet<&str> = HashSet::new();
    for (_, draft) in &declared {
        let id = draft.component_id.as_str();
        if !seen.insert(id) && reported.insert(id) {
            errors.push(ValidationError::DuplicateComponent {
                component_id: id.to_string(),
            });
        }
    }

    // 3 & 4. Per-component rules and bounds
    let mut components = Vec::with_capacity(declared.len());
    for ((order, draft), definition) in declared.iter().zip(&definitions) {
        let Some(definition) = definition else {
            errors.push(ValidationError::UnknownComponent {
                component_id: draft.component_id.clone(),
            });
            continue;
        };

        let rule = build_rule(draft, definition.calculation_type, &mut errors);
        check_values(draft, &mut errors);

        if let (Some(min), Some(max)) = (draft.min_value, draft.max_value) {
            if min > max {
                errors.push(ValidationError::InvalidBounds {
                    component_id: draft.component_id.clone(),
                    min,
                    max,
                });
            }
        }

        if let Some(rule) = rule {
            components.push(StructureComponent {
                component_id: draft.component_id.clone(),
                definition: (*definition).clone(),
                rule,
                bounds: draft.bounds(),
                is_variable: draft.is_variable,
                order: *order,
            });
        }
    }

    // Only percentage components carry a meaningful base reference.
    let bases: Vec<_> = declared
        .iter()
        .zip(&definitions)
        .map(|((_, draft), definition)| {
            let is_percentage =
                definition.is_some_and(|d| d.calculation_type == CalculationType::Percentage);
            (
                draft.component_id.as_str(),
                draft.base_component_ref.as_ref().filter(|_| is_percentage),
            )
        })
        .collect();

    // 5. Unresolved references
    for (component_id, base) in &bases {
        if let Some(target) = base.and_then(|b| b.component_id()) {
            if !seen.contains(target) {
                errors.push(ValidationError::UnresolvedReference {
                    component_id: component_id.to_string(),
                    reference: target.to_string(),
                });
            }
        }
    }

    // 6. Cycles
    let traversal = ReferenceGraph::build(bases.iter().copied(), anchor).traverse();
    errors.extend(
        traversal
            .cycles
            .into_iter()
            .map(|path| ValidationError::DependencyCycle { path }),
    );

    match anchor {
        Some(anchor) if errors.is_empty() => Ok(ValidatedStructure {
            structure_id: None,
            version: None,
            components,
            anchor,
        }),
        _ => Err(errors),
    }
}

/// Builds the typed rule for a draft, recording any missing field.
fn build_rule(
    draft: &StructureComponentDraft,
    calculation_type: CalculationType,
    errors: &mut ValidationErrors,
) -> Option<CalculationRule> {
    let missing = |field: &'static str| ValidationError::MissingField {
        component_id: draft.component_id.clone(),
        calculation_type,
        field,
    };

    match calculation_type {
        CalculationType::Fixed => match draft.fixed_value {
            Some(value) => Some(CalculationRule::Fixed { value }),
            None => {
                errors.push(missing("fixed_value"));
                None
            }
        },
        CalculationType::AttendanceBased => match draft.fixed_value {
            Some(value) => Some(CalculationRule::AttendanceBased { value }),
            None => {
                errors.push(missing("fixed_value"));
                None
            }
        },
        CalculationType::Percentage => {
            if draft.percentage.is_none() {
                errors.push(missing("percentage"));
            }
            if draft.base_component_ref.is_none() {
                errors.push(missing("base_component_ref"));
            }
            match (draft.percentage, &draft.base_component_ref) {
                (Some(percentage), Some(base)) => Some(CalculationRule::Percentage {
                    percentage,
                    base: base.clone(),
                }),
                _ => None,
            }
        }
        CalculationType::Formula => {
            errors.push(ValidationError::UnsupportedCalculation {
                component_id: draft.component_id.clone(),
                calculation_type,
            });
            None
        }
    }
}

/// Records every negative amount, percentage or bound on a draft.
fn check_values(draft: &StructureComponentDraft, errors: &mut ValidationErrors) {
    let fields = [
        ("fixed_value", draft.fixed_value),
        ("percentage", draft.percentage),
        ("min_value", draft.min_value),
        ("max_value", draft.max_value),
    ];
    for (field, value) in fields {
        if let Some(value) = value.filter(|v| v.is_sign_negative() && !v.is_zero()) {
            errors.push(ValidationError::NegativeValue {
                component_id: draft.component_id.clone(),
                field,
                value,
            });
        }
    }
}
