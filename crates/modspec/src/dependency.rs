//! Dependency declarations
//!
//! A dependency names another module and filters which of its paths are
//! imported into the declaring module and which are re-exported to the
//! declaring module's own dependents.

use crate::error::{require_name, SpecError};
use crate::filter::PathFilter;
use semver::{Version, VersionReq};

/// An immutable declaration that a module may consult another named module
#[derive(Debug, Clone, PartialEq)]
pub struct DependencySpec {
    module_name: String,
    import_filter: PathFilter,
    export_filter: PathFilter,
    version_constraint: Option<VersionReq>,
    optional: bool,
}

impl DependencySpec {
    /// Declare a dependency on another module
    ///
    /// # Arguments
    /// * `import_filter` - paths of the target visible to the declaring module
    /// * `export_filter` - imported paths re-exported to the declaring module's dependents
    /// * `version_constraint` - versions of the target this dependency accepts
    /// * `module_name` - name of the target module
    /// * `optional` - whether a missing target is tolerated at link time
    pub fn module(
        import_filter: PathFilter,
        export_filter: PathFilter,
        version_constraint: Option<VersionReq>,
        module_name: impl Into<String>,
        optional: bool,
    ) -> Result<Self, SpecError> {
        let module_name = module_name.into();
        require_name(&module_name, "Dependency module name")?;
        Ok(Self {
            module_name,
            import_filter,
            export_filter,
            version_constraint,
            optional,
        })
    }

    /// Accept-all, non-optional dependency with no version constraint
    pub fn unrestricted(module_name: impl Into<String>) -> Result<Self, SpecError> {
        Self::module(
            PathFilter::accept_all(),
            PathFilter::accept_all(),
            None,
            module_name,
            false,
        )
    }

    pub(crate) fn unrestricted_static(module_name: &'static str) -> Self {
        debug_assert!(!module_name.is_empty());
        Self {
            module_name: module_name.to_string(),
            import_filter: PathFilter::accept_all(),
            export_filter: PathFilter::accept_all(),
            version_constraint: None,
            optional: false,
        }
    }

    /// Start building a dependency on `module_name`
    ///
    /// Defaults: imports everything, exports nothing, required, unconstrained.
    pub fn build(module_name: impl Into<String>) -> DependencySpecBuilder {
        DependencySpecBuilder {
            module_name: module_name.into(),
            import_filter: PathFilter::accept_all(),
            export_filter: PathFilter::reject_all(),
            version_constraint: None,
            optional: false,
        }
    }

    pub fn module_name(&self) -> &str {
        &self.module_name
    }

    pub fn import_filter(&self) -> &PathFilter {
        &self.import_filter
    }

    pub fn export_filter(&self) -> &PathFilter {
        &self.export_filter
    }

    pub fn version_constraint(&self) -> Option<&VersionReq> {
        self.version_constraint.as_ref()
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// Check whether a target version satisfies this dependency
    ///
    /// Unversioned targets satisfy any constraint.
    pub fn accepts_version(&self, version: Option<&Version>) -> bool {
        match (&self.version_constraint, version) {
            (Some(req), Some(version)) => req.matches(version),
            _ => true,
        }
    }
}

/// Builder for [`DependencySpec`]
#[derive(Debug, Clone)]
pub struct DependencySpecBuilder {
    module_name: String,
    import_filter: PathFilter,
    export_filter: PathFilter,
    version_constraint: Option<VersionReq>,
    optional: bool,
}

impl DependencySpecBuilder {
    pub fn import_filter(mut self, filter: PathFilter) -> Self {
        self.import_filter = filter;
        self
    }

    pub fn export_filter(mut self, filter: PathFilter) -> Self {
        self.export_filter = filter;
        self
    }

    /// Re-export everything this dependency imports
    pub fn export(self, export: bool) -> Self {
        let filter = if export {
            PathFilter::accept_all()
        } else {
            PathFilter::reject_all()
        };
        self.export_filter(filter)
    }

    pub fn version_constraint(mut self, constraint: VersionReq) -> Self {
        self.version_constraint = Some(constraint);
        self
    }

    pub fn optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }

    pub fn build(self) -> Result<DependencySpec, SpecError> {
        DependencySpec::module(
            self.import_filter,
            self.export_filter,
            self.version_constraint,
            self.module_name,
            self.optional,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unrestricted_dependency() {
        let dep = DependencySpec::unrestricted("org.acme").unwrap();
        assert_eq!(dep.module_name(), "org.acme");
        assert!(dep.import_filter().is_accept_all());
        assert!(dep.export_filter().is_accept_all());
        assert!(dep.version_constraint().is_none());
        assert!(!dep.is_optional());
    }

    #[test]
    fn test_empty_name_rejected() {
        assert!(matches!(
            DependencySpec::unrestricted(""),
            Err(SpecError::InvalidSpecification(_))
        ));
        assert!(DependencySpec::build("").build().is_err());
    }

    #[test]
    fn test_builder_defaults() {
        let dep = DependencySpec::build("org.acme").build().unwrap();
        assert!(dep.import_filter().is_accept_all());
        assert_eq!(dep.export_filter(), &PathFilter::RejectAll);
        assert!(!dep.is_optional());
    }

    #[test]
    fn test_version_acceptance() {
        let dep = DependencySpec::build("org.acme")
            .version_constraint(VersionReq::parse("^1.2").unwrap())
            .build()
            .unwrap();

        assert!(dep.accepts_version(Some(&Version::new(1, 4, 0))));
        assert!(!dep.accepts_version(Some(&Version::new(2, 0, 0))));
        assert!(dep.accepts_version(None));
    }
}
