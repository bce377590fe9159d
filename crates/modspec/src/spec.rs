//! The closed set of module specification variants

use crate::alias::{AliasModuleSpec, AliasOptions};
use crate::concrete::{ConcreteModuleSpec, ModuleSpecBuilder};
use crate::error::SpecError;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

/// A module specification, either concrete or an alias
///
/// Both variants are immutable and cheap to clone. There is deliberately no
/// shared dependency accessor: loaders go through [`ModuleSpec::loadable`].
#[derive(Debug, Clone)]
pub enum ModuleSpec {
    Concrete(Arc<ConcreteModuleSpec>),
    Alias(Arc<AliasModuleSpec>),
}

impl ModuleSpec {
    /// Start building a concrete specification
    pub fn build(name: impl Into<String>) -> ModuleSpecBuilder {
        ModuleSpecBuilder::new(name)
    }

    /// Define an alias with the default [`AliasOptions`]
    pub fn alias(name: impl Into<String>, target: impl Into<String>) -> Result<Self, SpecError> {
        Self::alias_with(name, target, &AliasOptions::default())
    }

    pub fn alias_with(
        name: impl Into<String>,
        target: impl Into<String>,
        options: &AliasOptions,
    ) -> Result<Self, SpecError> {
        Ok(ModuleSpec::Alias(Arc::new(AliasModuleSpec::with_options(
            name, target, options,
        )?)))
    }

    pub fn name(&self) -> &str {
        match self {
            ModuleSpec::Concrete(spec) => spec.name(),
            ModuleSpec::Alias(spec) => spec.name(),
        }
    }

    pub fn is_alias(&self) -> bool {
        matches!(self, ModuleSpec::Alias(_))
    }

    pub fn as_alias(&self) -> Option<&AliasModuleSpec> {
        match self {
            ModuleSpec::Alias(spec) => Some(spec),
            ModuleSpec::Concrete(_) => None,
        }
    }

    /// The concrete shape the loading subsystem works with
    ///
    /// Concrete specifications are returned as-is; aliases yield their cached
    /// synthesized form. Repeated calls return the same allocation.
    pub fn loadable(&self) -> Arc<ConcreteModuleSpec> {
        match self {
            ModuleSpec::Concrete(spec) => Arc::clone(spec),
            ModuleSpec::Alias(spec) => Arc::clone(spec.as_concrete_spec()),
        }
    }

    /// A serializable description of this specification
    pub fn summary(&self) -> SpecSummary {
        let concrete = self.loadable();
        SpecSummary {
            name: self.name().to_string(),
            kind: if self.is_alias() { "alias" } else { "concrete" },
            alias_of: self.as_alias().map(|a| a.alias_name().to_string()),
            main_class: concrete.main_class().map(str::to_string),
            assertions: concrete.assertion_setting().to_string(),
            resources: concrete
                .resource_loaders()
                .iter()
                .map(|r| r.loader().root_name().to_string())
                .collect(),
            dependencies: concrete
                .dependencies()
                .iter()
                .map(|d| DependencySummary {
                    module: d.module_name().to_string(),
                    imports: d.import_filter().to_string(),
                    exports: d.export_filter().to_string(),
                    version: d.version_constraint().map(|v| v.to_string()),
                    optional: d.is_optional(),
                })
                .collect(),
            properties: concrete
                .properties()
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            version: concrete.version().map(|v| v.to_string()),
        }
    }
}

impl From<ConcreteModuleSpec> for ModuleSpec {
    fn from(spec: ConcreteModuleSpec) -> Self {
        ModuleSpec::Concrete(Arc::new(spec))
    }
}

impl From<AliasModuleSpec> for ModuleSpec {
    fn from(spec: AliasModuleSpec) -> Self {
        ModuleSpec::Alias(Arc::new(spec))
    }
}

/// Serializable view of a specification's loadable shape
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SpecSummary {
    pub name: String,
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias_of: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main_class: Option<String>,
    pub assertions: String,
    pub resources: Vec<String>,
    pub dependencies: Vec<DependencySummary>,
    pub properties: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DependencySummary {
    pub module: String,
    pub imports: String,
    pub exports: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub optional: bool,
}
