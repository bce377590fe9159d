//! Module registry and name resolution
//!
//! The registry owns published specifications keyed by module name. Lookups
//! that miss are delegated to the configured finders in order, and the first
//! hit is published. Every specification is immutable, so readers share them
//! freely; only publishing takes the write lock.

use crate::concrete::ConcreteModuleSpec;
use crate::error::SpecError;
use crate::spec::ModuleSpec;
use parking_lot::RwLock;
use rustc_hash::{FxHashMap, FxHashSet};
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Resolves module names to specifications
pub trait ModuleFinder: Send + Sync {
    /// Find the specification for `name`, or `None` if this finder has none
    fn find_module(&self, name: &str) -> Result<Option<ModuleSpec>, SpecError>;
}

impl<F> ModuleFinder for F
where
    F: Fn(&str) -> Result<Option<ModuleSpec>, SpecError> + Send + Sync,
{
    fn find_module(&self, name: &str) -> Result<Option<ModuleSpec>, SpecError> {
        self(name)
    }
}

/// An optional dependency that was absent at link time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingDependency {
    pub module: String,
    pub dependency: String,
}

/// The transitive closure of a module, in dependency search order
#[derive(Debug, Clone)]
pub struct LinkedModule {
    modules: Vec<Arc<ConcreteModuleSpec>>,
    missing_optional: Vec<MissingDependency>,
}

impl LinkedModule {
    /// The module that was linked
    pub fn root(&self) -> &Arc<ConcreteModuleSpec> {
        // Only `ModuleRegistry::link` builds these, always with the root first
        &self.modules[0]
    }

    /// Concrete shapes, root first, each module once
    pub fn modules(&self) -> &[Arc<ConcreteModuleSpec>] {
        &self.modules
    }

    /// Optional dependencies that could not be found
    pub fn missing_optional(&self) -> &[MissingDependency] {
        &self.missing_optional
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.modules.iter().map(|m| m.name()).collect()
    }
}

/// Registry of published module specifications
#[derive(Default)]
pub struct ModuleRegistry {
    modules: RwLock<FxHashMap<String, ModuleSpec>>,
    finders: Vec<Box<dyn ModuleFinder>>,
}

impl ModuleRegistry {
    /// Create an empty registry with no finders
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a finder consulted after the local table and earlier finders
    pub fn with_finder(mut self, finder: impl ModuleFinder + 'static) -> Self {
        self.finders.push(Box::new(finder));
        self
    }

    /// Publish a new specification
    pub fn define(&self, spec: ModuleSpec) -> Result<(), SpecError> {
        let mut modules = self.modules.write();
        if modules.contains_key(spec.name()) {
            return Err(SpecError::DuplicateModule(spec.name().to_string()));
        }
        debug!(module = spec.name(), alias = spec.is_alias(), "defined module");
        modules.insert(spec.name().to_string(), spec);
        Ok(())
    }

    /// Publish a specification, returning the one it displaced
    pub fn replace(&self, spec: ModuleSpec) -> Option<ModuleSpec> {
        let name = spec.name().to_string();
        let previous = self.modules.write().insert(name.clone(), spec);
        debug!(module = %name, replaced = previous.is_some(), "published module");
        previous
    }

    /// Undefine a module
    pub fn remove(&self, name: &str) -> Option<ModuleSpec> {
        let removed = self.modules.write().remove(name);
        if removed.is_some() {
            debug!(module = name, "removed module");
        }
        removed
    }

    /// Check whether a module is published locally (finders are not consulted)
    pub fn contains(&self, name: &str) -> bool {
        self.modules.read().contains_key(name)
    }

    /// Names of locally published modules, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.modules.read().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.modules.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.read().is_empty()
    }

    /// Look up a module, consulting finders on a miss
    pub fn get(&self, name: &str) -> Result<Option<ModuleSpec>, SpecError> {
        if let Some(spec) = self.modules.read().get(name) {
            return Ok(Some(spec.clone()));
        }

        for finder in &self.finders {
            if let Some(spec) = finder.find_module(name)? {
                if spec.name() != name {
                    return Err(SpecError::InvalidSpecification(format!(
                        "Finder returned module {} for name {}",
                        spec.name(),
                        name
                    )));
                }
                let mut modules = self.modules.write();
                let published = modules.entry(name.to_string()).or_insert(spec);
                trace!(module = name, "published module from finder");
                return Ok(Some(published.clone()));
            }
        }

        Ok(None)
    }

    /// Load the concrete shape of a module
    pub fn load(&self, name: &str) -> Result<Arc<ConcreteModuleSpec>, SpecError> {
        self.get(name)?
            .map(|spec| spec.loadable())
            .ok_or_else(|| SpecError::ModuleNotFound(name.to_string()))
    }

    /// Resolve the transitive dependencies of `root`
    ///
    /// Modules are visited depth-first in declaration order. Cycles are
    /// permitted; each module appears once.
    pub fn link(&self, root: &str) -> Result<LinkedModule, SpecError> {
        let root_spec = self.load(root)?;
        let mut linked = LinkedModule {
            modules: vec![Arc::clone(&root_spec)],
            missing_optional: Vec::new(),
        };
        let mut visited = FxHashSet::default();
        visited.insert(root.to_string());

        // Each frame is a module and the index of its next dependency
        let mut stack: Vec<(Arc<ConcreteModuleSpec>, usize)> = vec![(root_spec, 0)];
        while let Some(frame) = stack.last_mut() {
            let module = Arc::clone(&frame.0);
            let Some(dep) = module.dependencies().get(frame.1) else {
                stack.pop();
                continue;
            };
            frame.1 += 1;

            let target = match self.get(dep.module_name())? {
                Some(spec) => spec.loadable(),
                None if dep.is_optional() => {
                    warn!(
                        module = module.name(),
                        dependency = dep.module_name(),
                        "optional dependency not found"
                    );
                    linked.missing_optional.push(MissingDependency {
                        module: module.name().to_string(),
                        dependency: dep.module_name().to_string(),
                    });
                    continue;
                }
                None => {
                    return Err(SpecError::UnresolvedDependency {
                        module: module.name().to_string(),
                        dependency: dep.module_name().to_string(),
                    });
                }
            };

            if !dep.accepts_version(target.version()) {
                return Err(SpecError::IncompatibleVersion {
                    module: module.name().to_string(),
                    dependency: dep.module_name().to_string(),
                    required: dep
                        .version_constraint()
                        .map(|v| v.to_string())
                        .unwrap_or_default(),
                    found: target
                        .version()
                        .map(|v| v.to_string())
                        .unwrap_or_default(),
                });
            }

            if visited.insert(dep.module_name().to_string()) {
                trace!(module = target.name(), "linking module");
                linked.modules.push(Arc::clone(&target));
                stack.push((target, 0));
            }
        }

        debug!(root, modules = linked.len(), "linked module");
        Ok(linked)
    }
}

impl ModuleFinder for ModuleRegistry {
    fn find_module(&self, name: &str) -> Result<Option<ModuleSpec>, SpecError> {
        self.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alias::AliasOptions;
    use crate::dependency::DependencySpec;

    #[test]
    fn test_define_rejects_duplicates() {
        let registry = ModuleRegistry::new();
        registry.define(ModuleSpec::build("a").build().unwrap()).unwrap();
        let err = registry
            .define(ModuleSpec::build("a").build().unwrap())
            .unwrap_err();
        assert_eq!(err, SpecError::DuplicateModule("a".to_string()));
    }

    #[test]
    fn test_replace_returns_previous() {
        let registry = ModuleRegistry::new();
        assert!(registry.replace(ModuleSpec::build("a").build().unwrap()).is_none());
        let previous = registry
            .replace(ModuleSpec::alias_with("a", "b", &AliasOptions::without_extras()).unwrap())
            .unwrap();
        assert!(!previous.is_alias());
        assert!(registry.get("a").unwrap().unwrap().is_alias());
    }

    #[test]
    fn test_remove() {
        let registry = ModuleRegistry::new();
        registry.define(ModuleSpec::build("a").build().unwrap()).unwrap();
        assert!(registry.remove("a").is_some());
        assert!(registry.is_empty());
        assert!(registry.remove("a").is_none());
    }

    #[test]
    fn test_link_preserves_depth_first_order() {
        let registry = ModuleRegistry::new();
        let graph: [(&str, &[&str]); 4] = [("a", &["b", "d"]), ("b", &["c"]), ("c", &[]), ("d", &["c"])];
        for (name, deps) in graph {
            let spec = deps
                .iter()
                .fold(ModuleSpec::build(name), |b, d| {
                    b.add_dependency(DependencySpec::unrestricted(*d).unwrap())
                })
                .build()
                .unwrap();
            registry.define(spec).unwrap();
        }

        let linked = registry.link("a").unwrap();
        assert_eq!(linked.names(), vec!["a", "b", "c", "d"]);
        assert_eq!(linked.root().name(), "a");
        assert_eq!(linked.len(), 4);
        assert!(linked.missing_optional().is_empty());
    }

    #[test]
    fn test_finder_rejects_mismatched_name() {
        let registry = ModuleRegistry::new().with_finder(
            |_: &str| -> Result<Option<ModuleSpec>, SpecError> {
                Ok(Some(ModuleSpec::build("other").build()?))
            },
        );
        assert!(matches!(
            registry.get("wanted"),
            Err(SpecError::InvalidSpecification(_))
        ));
    }
}
