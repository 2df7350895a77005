//! Application state for the salary structure engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::{Arc, RwLock};

use tracing::info;

use crate::config::ConfigLoader;
use crate::error::EngineResult;

/// Shared application state.
///
/// Holds the loaded configuration behind a swappable pointer. Handlers take
/// a snapshot with [`AppState::config`] and keep using it for the whole
/// request, so a concurrent [`AppState::reload`] never changes the catalog
/// underneath an evaluation.
#[derive(Clone)]
pub struct AppState {
    config: Arc<RwLock<Arc<ConfigLoader>>>,
}

impl AppState {
    /// Creates a new application state with the given configuration loader.
    pub fn new(config: ConfigLoader) -> Self {
        Self {
            config: Arc::new(RwLock::new(Arc::new(config))),
        }
    }

    /// Returns a snapshot of the current configuration.
    pub fn config(&self) -> Arc<ConfigLoader> {
        let guard = self
            .config
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(&*guard)
    }

    /// Reloads the configuration from its source directory and swaps it in.
    ///
    /// On failure the current configuration stays in place.
    pub fn reload(&self) -> EngineResult<Arc<ConfigLoader>> {
        let fresh = Arc::new(self.config().reload()?);

        let mut guard = self
            .config
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = Arc::clone(&fresh);

        info!(
            catalog = %fresh.catalog().metadata().code,
            version = %fresh.catalog().metadata().version,
            "Configuration reloaded"
        );
        Ok(fresh)
    }
}
