//! The read-only component catalog.

use std::collections::BTreeMap;

use crate::error::{EngineError, EngineResult};
use crate::models::PayComponentDefinition;

use super::CatalogMetadata;

/// Registry of pay component definitions, looked up by id.
///
/// The catalog has no mutation API. A changed catalog is picked up by
/// loading a new one and swapping it in (see [`crate::api::AppState::reload`]).
///
/// # Example
///
/// ```
/// use salary_engine::config::{CatalogMetadata, ComponentCatalog};
/// use salary_engine::models::{
///     CalculationType, ComponentCategory, ComponentType, PayComponentDefinition,
/// };
/// use chrono::NaiveDate;
///
/// let catalog = ComponentCatalog::new(
///     CatalogMetadata {
///         code: "TEST".to_string(),
///         name: "Test catalog".to_string(),
///         version: "1".to_string(),
///         effective_date: NaiveDate::from_ymd_opt(2026, 4, 1).unwrap(),
///     },
///     vec![PayComponentDefinition {
///         id: "basic".to_string(),
///         code: "BASIC".to_string(),
///         name: "Basic Salary".to_string(),
///         component_type: ComponentType::Earning,
///         category: ComponentCategory::Basic,
///         calculation_type: CalculationType::Percentage,
///         is_statutory: false,
///         is_taxable: true,
///     }],
/// )
/// .unwrap();
///
/// assert_eq!(catalog.lookup("basic").unwrap().code, "BASIC");
/// assert!(catalog.lookup("missing").is_err());
/// ```
#[derive(Debug, Clone)]
pub struct ComponentCatalog {
    metadata: CatalogMetadata,
    components: BTreeMap<String, PayComponentDefinition>,
}

impl ComponentCatalog {
    /// Builds a catalog, rejecting duplicate component ids.
    pub fn new(
        metadata: CatalogMetadata,
        definitions: Vec<PayComponentDefinition>,
    ) -> EngineResult<Self> {
        let mut components = BTreeMap::new();
        for definition in definitions {
            let id = definition.id.clone();
            if components.insert(id.clone(), definition).is_some() {
                return Err(EngineError::DuplicateCatalogComponent { component_id: id });
            }
        }
        Ok(Self {
            metadata,
            components,
        })
    }

    /// Returns the catalog metadata.
    pub fn metadata(&self) -> &CatalogMetadata {
        &self.metadata
    }

    /// Looks up a component definition by id.
    pub fn lookup(&self, component_id: &str) -> EngineResult<&PayComponentDefinition> {
        self.components
            .get(component_id)
            .ok_or_else(|| EngineError::ComponentNotFound {
                component_id: component_id.to_string(),
            })
    }

    /// Iterates over all definitions in id order.
    pub fn iter(&self) -> impl Iterator<Item = &PayComponentDefinition> {
        self.components.values()
    }

    /// Returns the number of definitions.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Returns true if the catalog has no definitions.
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CalculationType, ComponentCategory, ComponentType};
    use chrono::NaiveDate;

    fn metadata() -> CatalogMetadata {
        CatalogMetadata {
            code: "TEST".to_string(),
            name: "Test".to_string(),
            version: "1".to_string(),
            effective_date: NaiveDate::from_ymd_opt(2026, 4, 1).unwrap(),
        }
    }

    fn definition(id: &str) -> PayComponentDefinition {
        PayComponentDefinition {
            id: id.to_string(),
            code: id.to_uppercase(),
            name: id.to_string(),
            component_type: ComponentType::Deduction,
            category: ComponentCategory::Statutory,
            calculation_type: CalculationType::Fixed,
            is_statutory: true,
            is_taxable: false,
        }
    }

    #[test]
    fn test_iter_is_sorted_by_id() {
        let catalog =
            ComponentCatalog::new(metadata(), vec![definition("pt"), definition("epf")]).unwrap();
        let ids: Vec<&str> = catalog.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["epf", "pt"]);
        assert_eq!(catalog.len(), 2);
        assert!(!catalog.is_empty());
    }

    #[test]
    fn test_duplicate_definition_is_rejected() {
        let result = ComponentCatalog::new(metadata(), vec![definition("pt"), definition("pt")]);
        match result {
            Err(EngineError::DuplicateCatalogComponent { component_id }) => {
                assert_eq!(component_id, "pt")
            }
            _ => panic!("Expected duplicate definition to be rejected"),
        }
    }

    #[test]
    fn test_lookup_unknown_returns_component_not_found() {
        let catalog = ComponentCatalog::new(metadata(), vec![]).unwrap();
        match catalog.lookup("lta") {
            Err(EngineError::ComponentNotFound { component_id }) => assert_eq!(component_id, "lta"),
            _ => panic!("Expected ComponentNotFound error"),
        }
    }
}
