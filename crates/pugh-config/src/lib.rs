//! # pugh-config
//!
//! Layered configuration loading for Pugh using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`PUGH_*` prefix, `__` as separator)
//! 2. Project-level `.pugh/config.toml`
//! 3. User-level `~/.config/pugh/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `PUGH_GENERAL__AUTHOR` -> `general.author`,
//! `PUGH_STORE__PERSIST_KEY` -> `store.persist_key`, etc.
//! The `__` (double underscore) separates nested config sections.
//!
//! # Usage
//!
//! ```no_run
//! use pugh_config::PughConfig;
//!
//! let config = PughConfig::load_with_dotenv().expect("config");
//! config.validate().expect("valid config");
//! println!("recording as {}", config.general.author);
//! ```

mod error;
mod general;
mod store;

pub use error::ConfigError;
pub use general::GeneralConfig;
pub use store::StoreConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Project-relative location of the project-level config file.
pub const PROJECT_CONFIG_PATH: &str = ".pugh/config.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PughConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl PughConfig {
    /// Load configuration for the current directory (TOML files + env).
    ///
    /// Does NOT call `dotenvy`; use [`Self::load_with_dotenv`] for `.env` support.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Figment`] if a source cannot be parsed.
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment().extract().map_err(ConfigError::from)
    }

    /// Load configuration for the project rooted at `project_root`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Figment`] if a source cannot be parsed.
    pub fn load_for(project_root: &Path) -> Result<Self, ConfigError> {
        Self::figment_for(project_root)
            .extract()
            .map_err(ConfigError::from)
    }

    /// Load configuration after reading `.env` from the current directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Figment`] if a source cannot be parsed.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain for the current directory.
    #[must_use]
    pub fn figment() -> Figment {
        Self::figment_for(Path::new("."))
    }

    /// Build the figment provider chain for `project_root`.
    ///
    /// Public so tests can add providers on top.
    #[must_use]
    pub fn figment_for(project_root: &Path) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = project_root.join(PROJECT_CONFIG_PATH);
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed("PUGH_").split("__"))
    }

    /// Reject values the store cannot run with.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for an empty persist key or
    /// author, or a weight range whose minimum exceeds its maximum.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store.persist_key.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "store.persist_key".into(),
                reason: "must not be empty".into(),
            });
        }
        if self.general.author.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "general.author".into(),
                reason: "must not be empty".into(),
            });
        }
        if self.general.weight_min > self.general.weight_max {
            return Err(ConfigError::InvalidValue {
                field: "general.weight_min".into(),
                reason: format!(
                    "{} is greater than general.weight_max {}",
                    self.general.weight_min, self.general.weight_max
                ),
            });
        }
        Ok(())
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("pugh").join("config.toml"))
    }
}
