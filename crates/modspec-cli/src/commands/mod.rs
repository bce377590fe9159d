//! CLI command implementations

pub mod inspect;
pub mod link;

use anyhow::Context;
use modspec::{AliasOptions, SpecConfig};
use std::path::Path;

/// Alias options from the configuration file, or the defaults
pub fn alias_options(config: Option<&Path>) -> anyhow::Result<AliasOptions> {
    let Some(path) = config else {
        return Ok(AliasOptions::default());
    };
    let config = SpecConfig::from_file(path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
    Ok(config.alias_options()?)
}
