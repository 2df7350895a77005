//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the component
//! catalog, engine settings and stored structures from YAML files.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::models::SalaryStructure;

use super::types::{CatalogFile, EngineConfig, EngineSettings};
use super::ComponentCatalog;

/// Loads and provides access to engine configuration.
///
/// The `ConfigLoader` reads YAML configuration files from a directory
/// and provides methods to query the catalog, settings and stored structures.
///
/// # Directory Structure
///
/// The configuration directory should have the following structure:
/// ```text
/// config/default/
/// ├── catalog.yaml         # Catalog metadata and component definitions
/// ├── engine.yaml          # Engine settings
/// └── structures/          # Optional stored structure versions
///     └── standard_v1.yaml
/// ```
///
/// # Example
///
/// ```no_run
/// use salary_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/default").unwrap();
///
/// let basic = loader.catalog().lookup("basic").unwrap();
/// println!("Component: {}", basic.name);
///
/// let structure = loader.get_structure("standard", None).unwrap();
/// println!("Latest standard structure is version {}", structure.version);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: EngineConfig,
    source_dir: PathBuf,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - `catalog.yaml` or `engine.yaml` is missing
    /// - Any file contains invalid YAML
    /// - The catalog defines a component twice, or two stored structures
    ///   share an `(id, version)` pair
    ///
    /// # Example
    ///
    /// ```no_run
    /// use salary_engine::config::ConfigLoader;
    ///
    /// let loader = ConfigLoader::load("./config/default")?;
    /// # Ok::<(), salary_engine::error::EngineError>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        // Load catalog.yaml
        let catalog_path = path.join("catalog.yaml");
        let catalog_file = Self::load_yaml::<CatalogFile>(&catalog_path)?;
        let catalog = ComponentCatalog::new(catalog_file.catalog, catalog_file.components)
            .map_err(|e| EngineError::ConfigParseError {
                path: catalog_path.display().to_string(),
                message: e.to_string(),
            })?;

        // Load engine.yaml
        let settings = Self::load_yaml::<EngineSettings>(&path.join("engine.yaml"))?;

        // Load stored structures, if any
        let structures = Self::load_structures(&path.join("structures"))?;

        debug!(
            catalog = %catalog.metadata().code,
            components = catalog.len(),
            structures = structures.len(),
            "Loaded engine configuration"
        );

        Ok(Self {
            config: EngineConfig::new(catalog, settings, structures),
            source_dir: path.to_path_buf(),
        })
    }

    /// Loads a fresh copy of the configuration from the same directory.
    pub fn reload(&self) -> EngineResult<Self> {
        Self::load(&self.source_dir)
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Loads all structure files from the structures directory.
    ///
    /// A missing directory means no structures are stored.
    fn load_structures(structures_dir: &Path) -> EngineResult<Vec<SalaryStructure>> {
        if !structures_dir.exists() {
            return Ok(Vec::new());
        }

        let structures_dir_str = structures_dir.display().to_string();
        let entries = fs::read_dir(structures_dir).map_err(|_| EngineError::ConfigNotFound {
            path: structures_dir_str.clone(),
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|_| EngineError::ConfigNotFound {
                path: structures_dir_str.clone(),
            })?;

            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "yaml") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut structures: Vec<SalaryStructure> = Vec::with_capacity(paths.len());
        for path in paths {
            let structure = Self::load_yaml::<SalaryStructure>(&path)?;
            if structures
                .iter()
                .any(|s| s.id == structure.id && s.version == structure.version)
            {
                return Err(EngineError::ConfigParseError {
                    path: path.display().to_string(),
                    message: format!(
                        "structure '{}' version {} is defined more than once",
                        structure.id, structure.version
                    ),
                });
            }
            structures.push(structure);
        }

        Ok(structures)
    }

    /// Returns the underlying engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the directory this configuration was loaded from.
    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    /// Returns the component catalog.
    pub fn catalog(&self) -> &ComponentCatalog {
        self.config.catalog()
    }

    /// Returns the engine settings.
    pub fn settings(&self) -> &EngineSettings {
        self.config.settings()
    }

    /// Gets a stored structure by id and version.
    ///
    /// When `version` is `None` the highest stored version is returned.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use salary_engine::config::ConfigLoader;
    ///
    /// let loader = ConfigLoader::load("./config/default")?;
    /// let pinned = loader.get_structure("standard", Some(1))?;
    /// assert_eq!(pinned.version, 1);
    /// # Ok::<(), salary_engine::error::EngineError>(())
    /// ```
    pub fn get_structure(
        &self,
        structure_id: &str,
        version: Option<u32>,
    ) -> EngineResult<&SalaryStructure> {
        self.config.find_structure(structure_id, version)
    }
}
