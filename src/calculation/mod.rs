//! Calculation logic for the salary structure engine.
//!
//! A preview runs in four stages:
//!
//! 1. [`validate`] checks a structure's components against the catalog and
//!    turns them into typed [`CalculationRule`](crate::models::CalculationRule)s
//! 2. [`resolve`] orders the components so every reference is evaluated
//!    before the component that uses it, with `GROSS`-dependent components
//!    in a second pass
//! 3. [`evaluate`] computes every amount at full precision and aggregates
//!    the totals
//! 4. [`PreviewService`] ties the stages together for draft and stored
//!    structures and assembles the [`PreviewResult`](crate::models::PreviewResult)

mod evaluator;
mod preview;
mod resolver;
mod rounding;
mod validator;

pub use evaluator::{Evaluation, EvaluationInput, evaluate};
pub use preview::{PreviewService, StructureSource};
pub use resolver::{EvaluationPlan, ReferenceGraph, Traversal, resolve};
pub use rounding::{MONEY_DECIMAL_PLACES, round_money};
pub use validator::{ValidatedStructure, validate, validate_structure};

#[cfg(test)]
pub(crate) mod test_support {
    //! Shared fixtures for calculation tests.

    use std::str::FromStr;

    use rust_decimal::Decimal;

    use crate::config::{CatalogFile, ComponentCatalog};
    use crate::models::{BaseRef, StructureComponentDraft};

    /// The default catalog shipped under `config/default`.
    pub fn catalog() -> ComponentCatalog {
        let file: CatalogFile =
            serde_yaml::from_str(include_str!("../../config/default/catalog.yaml")).unwrap();
        ComponentCatalog::new(file.catalog, file.components).unwrap()
    }

    fn draft(component_id: &str) -> StructureComponentDraft {
        StructureComponentDraft {
            component_id: component_id.to_string(),
            fixed_value: None,
            percentage: None,
            base_component_ref: None,
            min_value: None,
            max_value: None,
            is_variable: false,
            order: None,
        }
    }

    pub fn fixed(component_id: &str, value: &str) -> StructureComponentDraft {
        StructureComponentDraft {
            fixed_value: Some(Decimal::from_str(value).unwrap()),
            ..draft(component_id)
        }
    }

    /// Same shape as [`fixed`]; attendance components carry their full amount in `fixed_value`.
    pub fn attendance(component_id: &str, value: &str) -> StructureComponentDraft {
        fixed(component_id, value)
    }

    pub fn percentage(component_id: &str, percentage: &str, base: &str) -> StructureComponentDraft {
        StructureComponentDraft {
            percentage: Some(Decimal::from_str(percentage).unwrap()),
            base_component_ref: Some(BaseRef::from(base.to_string())),
            ..draft(component_id)
        }
    }

    pub fn bounded(
        draft: StructureComponentDraft,
        min: Option<&str>,
        max: Option<&str>,
    ) -> StructureComponentDraft {
        StructureComponentDraft {
            min_value: min.map(|v| Decimal::from_str(v).unwrap()),
            max_value: max.map(|v| Decimal::from_str(v).unwrap()),
            ..draft
        }
    }
}
