//! Viewer configuration
//!
//! This module re-exports the shared config types from raidsim-types and
//! provides persistence and the icon registry the config points at.

use std::path::{Path, PathBuf};

pub use raidsim_types::{DEFAULT_ICON_BASE_URL, SortColumn, ViewerConfig};

use super::error::ConfigError;
use crate::action_id::{IconRegistry, ResolveError};

const APP_NAME: &str = "raidsim";
const CONFIG_NAME: &str = "config";

// ─────────────────────────────────────────────────────────────────────────────
// ViewerConfig Extensions
// ─────────────────────────────────────────────────────────────────────────────

/// Extension trait for ViewerConfig persistence
pub trait ViewerConfigExt: Sized {
    fn load() -> Self;
    fn try_load() -> Result<Self, ConfigError>;
    fn save(&self) -> Result<(), ConfigError>;
    fn config_path() -> Option<PathBuf>;
    fn icon_registry(&self) -> Result<IconRegistry, ResolveError>;
}

impl ViewerConfigExt for ViewerConfig {
    /// Missing or unreadable config falls back to defaults
    fn load() -> Self {
        Self::try_load().unwrap_or_default()
    }

    fn try_load() -> Result<Self, ConfigError> {
        Ok(confy::load(APP_NAME, CONFIG_NAME)?)
    }

    fn save(&self) -> Result<(), ConfigError> {
        confy::store(APP_NAME, CONFIG_NAME, self).map_err(ConfigError::Save)
    }

    fn config_path() -> Option<PathBuf> {
        confy::get_configuration_file_path(APP_NAME, CONFIG_NAME).ok()
    }

    /// The configured icon database, or an empty registry that names every
    /// action by its id.
    fn icon_registry(&self) -> Result<IconRegistry, ResolveError> {
        let registry = match &self.icon_database {
            Some(path) => IconRegistry::load_from_csv(Path::new(path))?,
            None => IconRegistry::new(),
        };
        Ok(registry.with_icon_base_url(self.icon_base_url.clone()))
    }
}
