//! Alias module specifications
//!
//! An alias has no content of its own and stands for another module. Loading
//! treats an alias as an ordinary module whose only dependencies are the alias
//! target followed by any configured extra dependencies, all with accept-all
//! import and export filters. The concrete form is synthesized once, when the
//! alias is constructed, and shared for the lifetime of the alias.

use crate::concrete::{AssertionSetting, ConcreteModuleSpec, ModuleSpecBuilder};
use crate::dependency::DependencySpec;
use crate::error::{require_name, SpecError};
use crate::identifier::ModuleIdentifier;
use crate::permission::default_permissions;
use std::sync::Arc;
use tracing::debug;

/// Infrastructure module every alias depends on unless configured otherwise
pub const DEFAULT_INFRASTRUCTURE_MODULE: &str = "org.infinispan";

/// Policy applied when synthesizing the concrete form of an alias
#[derive(Debug, Clone, PartialEq)]
pub struct AliasOptions {
    /// Dependencies appended after the alias target, in order
    pub extra_dependencies: Vec<DependencySpec>,

    /// Permit an alias whose target is its own name
    pub allow_self_alias: bool,
}

impl AliasOptions {
    /// Options with no extra dependencies
    pub fn without_extras() -> Self {
        Self {
            extra_dependencies: Vec::new(),
            allow_self_alias: false,
        }
    }

    /// Options that inject an accept-all dependency on each named module
    pub fn with_infrastructure<I, S>(modules: I) -> Result<Self, SpecError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let extra_dependencies = modules
            .into_iter()
            .map(DependencySpec::unrestricted)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            extra_dependencies,
            allow_self_alias: false,
        })
    }
}

impl Default for AliasOptions {
    fn default() -> Self {
        Self {
            extra_dependencies: vec![infrastructure_dependency()],
            allow_self_alias: false,
        }
    }
}

fn infrastructure_dependency() -> DependencySpec {
    DependencySpec::unrestricted_static(DEFAULT_INFRASTRUCTURE_MODULE)
}

/// A module specification that redirects to another module
#[derive(Debug, Clone)]
pub struct AliasModuleSpec {
    name: String,
    alias_name: String,
    concrete: Arc<ConcreteModuleSpec>,
}

impl AliasModuleSpec {
    /// Create an alias using the default [`AliasOptions`]
    pub fn new(name: impl Into<String>, alias_name: impl Into<String>) -> Result<Self, SpecError> {
        Self::with_options(name, alias_name, &AliasOptions::default())
    }

    /// Create an alias, synthesizing its concrete form under `options`
    pub fn with_options(
        name: impl Into<String>,
        alias_name: impl Into<String>,
        options: &AliasOptions,
    ) -> Result<Self, SpecError> {
        let name = name.into();
        let alias_name = alias_name.into();
        require_name(&name, "Alias name")?;
        require_name(&alias_name, "Alias target name")?;
        if name == alias_name && !options.allow_self_alias {
            return Err(SpecError::InvalidSpecification(format!(
                "Module {} cannot be an alias of itself",
                name
            )));
        }

        let concrete = synthesize(&name, &alias_name, options)?;
        debug!(
            alias = %name,
            target = %alias_name,
            dependencies = concrete.dependencies().len(),
            "synthesized alias module"
        );

        Ok(Self {
            name,
            alias_name,
            concrete: Arc::new(concrete),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The target module name, exactly as given at construction
    pub fn alias_name(&self) -> &str {
        &self.alias_name
    }

    /// The target parsed as a structured identifier
    #[deprecated(note = "use `alias_name` instead")]
    pub fn alias_target(&self) -> Result<ModuleIdentifier, SpecError> {
        ModuleIdentifier::parse(&self.alias_name)
    }

    /// The synthesized concrete form; the same instance on every call
    pub(crate) fn as_concrete_spec(&self) -> &Arc<ConcreteModuleSpec> {
        &self.concrete
    }
}

fn synthesize(
    name: &str,
    alias_name: &str,
    options: &AliasOptions,
) -> Result<ConcreteModuleSpec, SpecError> {
    let target = DependencySpec::unrestricted(alias_name)?;

    let builder = ModuleSpecBuilder::new(name)
        .assertion_setting(AssertionSetting::Inherit)
        .permissions(default_permissions())
        .add_dependency(target);

    options
        .extra_dependencies
        .iter()
        .cloned()
        .fold(builder, ModuleSpecBuilder::add_dependency)
        .build_concrete()
}
