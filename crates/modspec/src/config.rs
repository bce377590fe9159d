//! Loader configuration (modspec.toml)
//!
//! ```toml
//! [alias]
//! infrastructure = ["org.infinispan"]
//! allow_self_alias = false
//! ```

use crate::alias::{AliasOptions, DEFAULT_INFRASTRUCTURE_MODULE};
use crate::error::SpecError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] toml::de::Error),

    /// A value is present but unusable
    #[error("Invalid configuration: {0}")]
    InvalidValue(String),
}

/// Top-level configuration document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SpecConfig {
    /// Alias synthesis policy
    #[serde(default)]
    pub alias: AliasConfig,
}

/// The `[alias]` section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AliasConfig {
    /// Modules every alias additionally depends on, after its target
    #[serde(default = "default_infrastructure")]
    pub infrastructure: Vec<String>,

    /// Accept aliases that name themselves as target
    #[serde(default)]
    pub allow_self_alias: bool,
}

fn default_infrastructure() -> Vec<String> {
    vec![DEFAULT_INFRASTRUCTURE_MODULE.to_string()]
}

impl Default for AliasConfig {
    fn default() -> Self {
        Self {
            infrastructure: default_infrastructure(),
            allow_self_alias: false,
        }
    }
}

impl SpecConfig {
    /// Parse configuration from a file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parse configuration from a string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: SpecConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (i, module) in self.alias.infrastructure.iter().enumerate() {
            if module.trim().is_empty() {
                return Err(ConfigError::InvalidValue(format!(
                    "alias.infrastructure[{}] is empty",
                    i
                )));
            }
        }
        Ok(())
    }

    /// Alias synthesis options described by this configuration
    pub fn alias_options(&self) -> Result<AliasOptions, SpecError> {
        let mut options =
            AliasOptions::with_infrastructure(self.alias.infrastructure.iter().cloned())?;
        options.allow_self_alias = self.alias.allow_self_alias;
        Ok(options)
    }
}
