//! Configuration loading and management for the salary structure engine.
//!
//! This module provides functionality to load the component catalog, engine
//! settings and stored salary structures from YAML files.
//!
//! # Example
//!
//! ```no_run
//! use salary_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/default").unwrap();
//! println!("Loaded catalog: {}", config.catalog().metadata().name);
//! ```

mod catalog;
mod loader;
mod types;

pub use catalog::ComponentCatalog;
pub use loader::ConfigLoader;
pub use types::{CatalogFile, CatalogMetadata, EngineConfig, EngineSettings};
