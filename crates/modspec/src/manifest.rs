//! Module manifests (TOML module definitions)
//!
//! A manifest describes one module, either concrete or an alias:
//!
//! ```toml
//! [module]
//! name = "app.core"
//! main = "app.core.Main"
//! version = "1.2.0"
//! assertions = "enabled"
//!
//! [[dependencies]]
//! name = "app.util"
//! version = "^1.0"
//! export = true
//! imports = { include = ["app/util/**"], exclude = ["app/util/internal/**"] }
//!
//! [[resources]]
//! path = "lib"
//!
//! [properties]
//! owner = "platform"
//! ```
//!
//! An alias manifest only names its target:
//!
//! ```toml
//! [module]
//! name = "app.api"
//! alias = "app.core"
//! ```

use crate::alias::AliasOptions;
use crate::concrete::AssertionSetting;
use crate::dependency::DependencySpec;
use crate::error::SpecError;
use crate::filter::PathFilter;
use crate::resource::{DirectoryResourceLoader, ResourceLoaderSpec};
use crate::spec::ModuleSpec;
use semver::{Version, VersionReq};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur during manifest parsing
#[derive(Debug, Error)]
pub enum ManifestError {
    /// Failed to read manifest file
    #[error("Failed to read manifest file: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse manifest: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Validation error
    #[error("Invalid manifest: {0}")]
    ValidationError(String),

    /// The described module could not be constructed
    #[error(transparent)]
    Spec(#[from] SpecError),
}

/// Module manifest
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModuleManifest {
    /// Module identity and top-level settings
    pub module: ModuleInfo,

    /// Dependencies in search order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<DependencyEntry>,

    /// Resource roots, relative to the manifest's directory
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<ResourceEntry>,

    /// Free-form module properties
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, String>,
}

/// The `[module]` section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModuleInfo {
    /// Module name (must be unique within a registry)
    pub name: String,

    /// Main entry point
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main: Option<String>,

    /// Semver version
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Assertion policy (defaults to inherit)
    #[serde(default)]
    pub assertions: AssertionSetting,

    /// Target module when this manifest defines an alias
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

/// One `[[dependencies]]` entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DependencyEntry {
    /// Target module name
    pub name: String,

    /// Version requirement on the target
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Tolerate a missing target
    #[serde(default)]
    pub optional: bool,

    /// Re-export everything imported from the target
    #[serde(default)]
    pub export: bool,

    /// Paths imported from the target (defaults to everything)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imports: Option<FilterEntry>,

    /// Paths re-exported to dependents; overrides `export`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exports: Option<FilterEntry>,
}

/// Glob include/exclude lists
///
/// Excludes are checked before includes. Paths matching neither list are
/// accepted only when no includes are given.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct FilterEntry {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub include: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<String>,
}

/// One `[[resources]]` entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResourceEntry {
    /// Directory relative to the manifest
    pub path: String,

    /// Paths of this root visible to the module (defaults to everything)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<FilterEntry>,
}

impl FilterEntry {
    /// Compile the lists into a path filter
    pub fn to_filter(&self) -> Result<PathFilter, SpecError> {
        let mut rules = PathFilter::rules(self.include.is_empty());
        for glob in &self.exclude {
            rules = rules.exclude(PathFilter::matches(glob)?);
        }
        for glob in &self.include {
            rules = rules.include(PathFilter::matches(glob)?);
        }
        Ok(rules.build())
    }
}

impl DependencyEntry {
    fn to_spec(&self) -> Result<DependencySpec, ManifestError> {
        let mut builder = DependencySpec::build(&self.name).optional(self.optional);

        if let Some(imports) = &self.imports {
            builder = builder.import_filter(imports.to_filter()?);
        }

        builder = match &self.exports {
            Some(exports) => builder.export_filter(exports.to_filter()?),
            None => builder.export(self.export),
        };

        if let Some(version) = &self.version {
            let req = VersionReq::parse(version).map_err(|e| {
                ManifestError::ValidationError(format!(
                    "Dependency '{}' has invalid version requirement '{}': {}",
                    self.name, version, e
                ))
            })?;
            builder = builder.version_constraint(req);
        }

        Ok(builder.build()?)
    }
}

impl ModuleManifest {
    /// Parse a manifest from a file
    pub fn from_file(path: &Path) -> Result<Self, ManifestError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parse a manifest from a string
    pub fn from_str(content: &str) -> Result<Self, ManifestError> {
        let manifest: ModuleManifest = toml::from_str(content)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Validate the manifest
    pub fn validate(&self) -> Result<(), ManifestError> {
        if self.module.name.is_empty() {
            return Err(ManifestError::ValidationError(
                "Module name cannot be empty".to_string(),
            ));
        }

        if let Some(target) = &self.module.alias {
            if target.is_empty() {
                return Err(ManifestError::ValidationError(format!(
                    "Alias '{}' has an empty target",
                    self.module.name
                )));
            }
            if !self.is_bare_alias() {
                return Err(ManifestError::ValidationError(format!(
                    "Alias '{}' cannot declare main, version, assertions, dependencies, resources or properties",
                    self.module.name
                )));
            }
        }

        if let Some(version) = &self.module.version {
            if Version::parse(version).is_err() {
                return Err(ManifestError::ValidationError(format!(
                    "Invalid version: {}. Must be valid semver (e.g., 1.2.3)",
                    version
                )));
            }
        }

        for dep in &self.dependencies {
            if dep.name.is_empty() {
                return Err(ManifestError::ValidationError(
                    "Dependency name cannot be empty".to_string(),
                ));
            }
        }

        for resource in &self.resources {
            if resource.path.is_empty() {
                return Err(ManifestError::ValidationError(
                    "Resource path cannot be empty".to_string(),
                ));
            }
        }

        Ok(())
    }

    fn is_bare_alias(&self) -> bool {
        self.module.main.is_none()
            && self.module.version.is_none()
            && self.module.assertions == AssertionSetting::Inherit
            && self.dependencies.is_empty()
            && self.resources.is_empty()
            && self.properties.is_empty()
    }

    pub fn is_alias(&self) -> bool {
        self.module.alias.is_some()
    }

    /// Build the module specification this manifest describes
    ///
    /// Resource paths are resolved against `base_dir`.
    pub fn into_spec(
        &self,
        base_dir: &Path,
        options: &AliasOptions,
    ) -> Result<ModuleSpec, ManifestError> {
        if let Some(target) = &self.module.alias {
            return Ok(ModuleSpec::alias_with(&self.module.name, target, options)?);
        }

        let mut builder = ModuleSpec::build(&self.module.name)
            .assertion_setting(self.module.assertions);

        if let Some(main) = &self.module.main {
            builder = builder.main_class(main);
        }

        if let Some(version) = &self.module.version {
            let version = Version::parse(version)
                .map_err(|e| ManifestError::ValidationError(e.to_string()))?;
            builder = builder.version(version);
        }

        for resource in &self.resources {
            let loader = Arc::new(DirectoryResourceLoader::new(base_dir.join(&resource.path)));
            let filter = match &resource.filter {
                Some(filter) => filter.to_filter()?,
                None => PathFilter::accept_all(),
            };
            builder = builder.add_resource_root(ResourceLoaderSpec::with_filter(loader, filter));
        }

        for dep in &self.dependencies {
            builder = builder.add_dependency(dep.to_spec()?);
        }

        for (key, value) in &self.properties {
            builder = builder.property(key, value);
        }

        Ok(builder.build()?)
    }

    /// Parse a manifest file and build its specification
    pub fn load_spec(path: &Path, options: &AliasOptions) -> Result<ModuleSpec, ManifestError> {
        let manifest = Self::from_file(path)?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        manifest.into_spec(base_dir, options)
    }
}
