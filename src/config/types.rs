//! Configuration types for the salary structure engine.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{GrossBasis, PayComponentDefinition, SalaryStructure};

use super::ComponentCatalog;

/// Metadata about the component catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogMetadata {
    /// Short identifier of the catalog (e.g., "IN-STANDARD").
    pub code: String,
    /// Human-readable name.
    pub name: String,
    /// Catalog version string.
    pub version: String,
    /// Date from which this catalog version applies.
    pub effective_date: NaiveDate,
}

/// Catalog configuration file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogFile {
    /// Catalog metadata.
    pub catalog: CatalogMetadata,
    /// All component definitions.
    pub components: Vec<PayComponentDefinition>,
}

/// Engine-wide behaviour settings from engine.yaml.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EngineSettings {
    /// How `GROSS` references are resolved.
    #[serde(default)]
    pub gross_basis: GrossBasis,
    /// Default tracing filter when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            gross_basis: GrossBasis::default(),
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// The complete engine configuration loaded from YAML files.
///
/// Aggregates the component catalog, the engine settings and any stored
/// structure versions found in the configuration directory.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    catalog: ComponentCatalog,
    settings: EngineSettings,
    /// Stored structures sorted by id, then version ascending.
    structures: Vec<SalaryStructure>,
}

impl EngineConfig {
    /// Creates a new EngineConfig from its component parts.
    pub fn new(
        catalog: ComponentCatalog,
        settings: EngineSettings,
        structures: Vec<SalaryStructure>,
    ) -> Self {
        let mut sorted_structures = structures;
        sorted_structures.sort_by(|a, b| a.id.cmp(&b.id).then(a.version.cmp(&b.version)));
        Self {
            catalog,
            settings,
            structures: sorted_structures,
        }
    }

    /// Returns the component catalog.
    pub fn catalog(&self) -> &ComponentCatalog {
        &self.catalog
    }

    /// Returns the engine settings.
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Returns all stored structures.
    pub fn structures(&self) -> &[SalaryStructure] {
        &self.structures
    }

    /// Finds a stored structure by id and version.
    ///
    /// When `version` is `None` the highest stored version is returned.
    pub fn find_structure(
        &self,
        structure_id: &str,
        version: Option<u32>,
    ) -> EngineResult<&SalaryStructure> {
        let mut versions = self.structures.iter().filter(|s| s.id == structure_id);

        let found = match version {
            Some(v) => versions.find(|s| s.version == v),
            // Sorted ascending, so the last match is the latest version
            None => versions.next_back(),
        };

        found.ok_or_else(|| EngineError::StructureNotFound {
            structure_id: structure_id.to_string(),
            version: version.map_or_else(|| "latest".to_string(), |v| v.to_string()),
        })
    }
}
