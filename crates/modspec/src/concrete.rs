//! Concrete module specifications
//!
//! A concrete specification fully describes a loadable module. It is only
//! produced by [`ModuleSpecBuilder`] or by alias synthesis and has no setters.

use crate::dependency::DependencySpec;
use crate::error::{require_name, SpecError};
use crate::loader::{ClassTransformer, LocalLoader, ModuleLoaderFactory};
use crate::permission::{default_permissions, PermissionSet};
use crate::resource::ResourceLoaderSpec;
use crate::spec::ModuleSpec;
use rustc_hash::FxHashMap;
use semver::Version;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Assertion policy for code loaded from a module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssertionSetting {
    Enabled,
    Disabled,
    #[default]
    Inherit,
}

impl fmt::Display for AssertionSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AssertionSetting::Enabled => "enabled",
            AssertionSetting::Disabled => "disabled",
            AssertionSetting::Inherit => "inherit",
        };
        write!(f, "{}", s)
    }
}

/// The loadable shape of a module
#[derive(Debug, Clone)]
pub struct ConcreteModuleSpec {
    name: String,
    main_class: Option<String>,
    assertion_setting: AssertionSetting,
    resource_loaders: Vec<ResourceLoaderSpec>,
    dependencies: Vec<DependencySpec>,
    fallback_loader: Option<Arc<dyn LocalLoader>>,
    loader_factory: Option<Arc<dyn ModuleLoaderFactory>>,
    class_transformer: Option<Arc<dyn ClassTransformer>>,
    properties: FxHashMap<String, String>,
    permissions: Arc<PermissionSet>,
    version: Option<Version>,
}

impl ConcreteModuleSpec {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn main_class(&self) -> Option<&str> {
        self.main_class.as_deref()
    }

    pub fn assertion_setting(&self) -> AssertionSetting {
        self.assertion_setting
    }

    pub fn resource_loaders(&self) -> &[ResourceLoaderSpec] {
        &self.resource_loaders
    }

    /// Dependencies in search order
    pub fn dependencies(&self) -> &[DependencySpec] {
        &self.dependencies
    }

    pub fn fallback_loader(&self) -> Option<&Arc<dyn LocalLoader>> {
        self.fallback_loader.as_ref()
    }

    pub fn loader_factory(&self) -> Option<&Arc<dyn ModuleLoaderFactory>> {
        self.loader_factory.as_ref()
    }

    pub fn class_transformer(&self) -> Option<&Arc<dyn ClassTransformer>> {
        self.class_transformer.as_ref()
    }

    pub fn properties(&self) -> &FxHashMap<String, String> {
        &self.properties
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    pub fn permissions(&self) -> &Arc<PermissionSet> {
        &self.permissions
    }

    pub fn version(&self) -> Option<&Version> {
        self.version.as_ref()
    }
}

/// Builder for concrete module specifications
///
/// # Example
/// ```ignore
/// let spec = ModuleSpec::build("app.core")
///     .main_class("app.core.Main")
///     .add_dependency(DependencySpec::unrestricted("app.util")?)
///     .build()?;
/// ```
#[derive(Debug)]
pub struct ModuleSpecBuilder {
    spec: ConcreteModuleSpec,
}

impl ModuleSpecBuilder {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            spec: ConcreteModuleSpec {
                name: name.into(),
                main_class: None,
                assertion_setting: AssertionSetting::Inherit,
                resource_loaders: Vec::new(),
                dependencies: Vec::new(),
                fallback_loader: None,
                loader_factory: None,
                class_transformer: None,
                properties: FxHashMap::default(),
                permissions: default_permissions(),
                version: None,
            },
        }
    }

    pub fn main_class(mut self, main_class: impl Into<String>) -> Self {
        self.spec.main_class = Some(main_class.into());
        self
    }

    pub fn assertion_setting(mut self, setting: AssertionSetting) -> Self {
        self.spec.assertion_setting = setting;
        self
    }

    pub fn add_resource_root(mut self, loader: ResourceLoaderSpec) -> Self {
        self.spec.resource_loaders.push(loader);
        self
    }

    /// Append a dependency; earlier dependencies take precedence
    pub fn add_dependency(mut self, dependency: DependencySpec) -> Self {
        self.spec.dependencies.push(dependency);
        self
    }

    pub fn fallback_loader(mut self, loader: Arc<dyn LocalLoader>) -> Self {
        self.spec.fallback_loader = Some(loader);
        self
    }

    pub fn loader_factory(mut self, factory: Arc<dyn ModuleLoaderFactory>) -> Self {
        self.spec.loader_factory = Some(factory);
        self
    }

    pub fn class_transformer(mut self, transformer: Arc<dyn ClassTransformer>) -> Self {
        self.spec.class_transformer = Some(transformer);
        self
    }

    pub fn property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.spec.properties.insert(key.into(), value.into());
        self
    }

    pub fn permissions(mut self, permissions: Arc<PermissionSet>) -> Self {
        self.spec.permissions = permissions;
        self
    }

    pub fn version(mut self, version: Version) -> Self {
        self.spec.version = Some(version);
        self
    }

    /// Validate and produce the bare concrete specification
    pub(crate) fn build_concrete(self) -> Result<ConcreteModuleSpec, SpecError> {
        require_name(&self.spec.name, "Module name")?;
        Ok(self.spec)
    }

    pub fn build(self) -> Result<ModuleSpec, SpecError> {
        Ok(ModuleSpec::Concrete(Arc::new(self.build_concrete()?)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::PathFilter;
    use crate::resource::MemoryResourceLoader;

    #[derive(Debug)]
    struct Upcase;

    impl ClassTransformer for Upcase {
        fn transform(&self, _class_name: &str, bytes: &[u8]) -> Option<Vec<u8>> {
            Some(bytes.to_ascii_uppercase())
        }
    }

    #[derive(Debug)]
    struct Fallback;

    impl LocalLoader for Fallback {
        fn load_class(&self, name: &str) -> Option<Vec<u8>> {
            (name == "Fallback").then(|| b"fallback".to_vec())
        }

        fn load_resource(&self, _path: &str) -> Option<Vec<u8>> {
            None
        }
    }

    #[derive(Debug)]
    struct FallbackFactory;

    impl ModuleLoaderFactory for FallbackFactory {
        fn create(&self, _module_name: &str) -> Box<dyn LocalLoader> {
            Box::new(Fallback)
        }
    }

    #[test]
    fn test_builder_defaults() {
        let spec = ModuleSpecBuilder::new("app.core").build_concrete().unwrap();
        assert_eq!(spec.name(), "app.core");
        assert_eq!(spec.main_class(), None);
        assert_eq!(spec.assertion_setting(), AssertionSetting::Inherit);
        assert!(spec.resource_loaders().is_empty());
        assert!(spec.dependencies().is_empty());
        assert!(spec.properties().is_empty());
        assert!(Arc::ptr_eq(spec.permissions(), &default_permissions()));
        assert!(spec.version().is_none());
    }

    #[test]
    fn test_builder_populates_every_field() {
        let loader = Arc::new(MemoryResourceLoader::new("mem").with_resource("a/B", b"b".to_vec()));
        let spec = ModuleSpecBuilder::new("app.core")
            .main_class("app.core.Main")
            .assertion_setting(AssertionSetting::Enabled)
            .add_resource_root(ResourceLoaderSpec::new(loader))
            .add_dependency(DependencySpec::unrestricted("app.util").unwrap())
            .add_dependency(
                DependencySpec::build("app.log")
                    .import_filter(PathFilter::is_child_of("log"))
                    .optional(true)
                    .build()
                    .unwrap(),
            )
            .fallback_loader(Arc::new(Fallback))
            .loader_factory(Arc::new(FallbackFactory))
            .class_transformer(Arc::new(Upcase))
            .property("api.visibility", "private")
            .permissions(Arc::new(PermissionSet::empty()))
            .version(Version::new(1, 2, 3))
            .build_concrete()
            .unwrap();

        assert_eq!(spec.main_class(), Some("app.core.Main"));
        assert_eq!(spec.assertion_setting(), AssertionSetting::Enabled);
        assert_eq!(spec.resource_loaders()[0].get_resource("a/B"), Some(b"b".to_vec()));
        let names: Vec<&str> = spec.dependencies().iter().map(|d| d.module_name()).collect();
        assert_eq!(names, vec!["app.util", "app.log"]);
        assert_eq!(
            spec.fallback_loader().unwrap().load_class("Fallback"),
            Some(b"fallback".to_vec())
        );
        let runtime_loader = spec.loader_factory().unwrap().create("app.core");
        assert!(runtime_loader.load_class("Fallback").is_some());
        assert_eq!(
            spec.class_transformer().unwrap().transform("X", b"abc"),
            Some(b"ABC".to_vec())
        );
        assert_eq!(spec.property("api.visibility"), Some("private"));
        assert!(spec.permissions().is_empty());
        assert_eq!(spec.version(), Some(&Version::new(1, 2, 3)));
    }

    #[test]
    fn test_empty_name_rejected() {
        assert!(matches!(
            ModuleSpecBuilder::new("").build(),
            Err(SpecError::InvalidSpecification(_))
        ));
    }
}
