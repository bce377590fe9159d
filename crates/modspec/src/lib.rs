//! Module specification layer for a modular runtime loader
//!
//! This crate provides:
//! - Concrete module specifications and their builder
//! - Alias specifications, rewritten into concrete form at construction
//! - Dependency declarations with import/export path filters
//! - Permission sets and the process-wide default
//! - Structured module identifiers (`name[:slot]`)
//! - TOML module manifests and loader configuration
//! - A module registry with finders and dependency linking

pub mod alias;
pub mod concrete;
pub mod config;
pub mod dependency;
pub mod error;
pub mod filter;
pub mod identifier;
pub mod loader;
pub mod manifest;
pub mod permission;
pub mod registry;
pub mod resource;
pub mod spec;

pub use alias::{AliasModuleSpec, AliasOptions, DEFAULT_INFRASTRUCTURE_MODULE};
pub use concrete::{AssertionSetting, ConcreteModuleSpec, ModuleSpecBuilder};
pub use config::{AliasConfig, ConfigError, SpecConfig};
pub use dependency::{DependencySpec, DependencySpecBuilder};
pub use error::SpecError;
pub use filter::PathFilter;
pub use identifier::{ModuleIdentifier, DEFAULT_SLOT};
pub use loader::{ClassTransformer, LocalLoader, ModuleLoaderFactory};
pub use manifest::{DependencyEntry, FilterEntry, ManifestError, ModuleManifest, ResourceEntry};
pub use permission::{default_permissions, Permission, PermissionSet};
pub use registry::{LinkedModule, MissingDependency, ModuleFinder, ModuleRegistry};
pub use resource::{
    DirectoryResourceLoader, MemoryResourceLoader, ResourceLoader, ResourceLoaderSpec,
};
pub use spec::{DependencySummary, ModuleSpec, SpecSummary};

pub use semver::{Version, VersionReq};
