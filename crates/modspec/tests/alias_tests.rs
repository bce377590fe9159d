//! Integration tests for alias synthesis

use modspec::{
    default_permissions, AliasModuleSpec, AliasOptions, AssertionSetting, DependencySpec,
    ModuleIdentifier, ModuleSpec, PathFilter, SpecError, DEFAULT_INFRASTRUCTURE_MODULE,
};
use std::sync::Arc;

#[test]
fn test_alias_keeps_its_own_name() {
    for (name, target) in [("app.core", "app.impl"), ("a", "b"), ("x.y.z", "x.y.z.impl")] {
        let spec = ModuleSpec::alias(name, target).unwrap();
        assert_eq!(spec.name(), name);
        assert_eq!(spec.loadable().name(), name);
    }
}

#[test]
fn test_alias_dependency_list() {
    let spec = ModuleSpec::alias("app.core", "app.impl").unwrap();
    let concrete = spec.loadable();
    let deps = concrete.dependencies();

    assert_eq!(deps.len(), 2);
    assert_eq!(deps[0], DependencySpec::unrestricted("app.impl").unwrap());
    assert_eq!(
        deps[1],
        DependencySpec::unrestricted(DEFAULT_INFRASTRUCTURE_MODULE).unwrap()
    );
    for dep in deps {
        assert_eq!(dep.import_filter(), &PathFilter::accept_all());
        assert_eq!(dep.export_filter(), &PathFilter::accept_all());
        assert!(!dep.is_optional());
    }
}

#[test]
fn test_alias_carries_no_content() {
    let concrete = ModuleSpec::alias("app.core", "app.impl").unwrap().loadable();

    assert!(concrete.resource_loaders().is_empty());
    assert!(concrete.main_class().is_none());
    assert_eq!(concrete.assertion_setting(), AssertionSetting::Inherit);
    assert!(concrete.properties().is_empty());
    assert!(concrete.version().is_none());
    assert!(Arc::ptr_eq(concrete.permissions(), &default_permissions()));
}

#[test]
fn test_loadable_returns_same_instance() {
    let spec = ModuleSpec::alias("app.core", "app.impl").unwrap();
    let first = spec.loadable();
    let second = spec.loadable();
    assert!(Arc::ptr_eq(&first, &second));

    let cloned = spec.clone();
    assert!(Arc::ptr_eq(&first, &cloned.loadable()));
}

#[test]
fn test_alias_name_is_verbatim() {
    let alias = AliasModuleSpec::new("app.core", r"weird\name:slot").unwrap();
    assert_eq!(alias.alias_name(), r"weird\name:slot");
}

#[test]
#[allow(deprecated)]
fn test_legacy_target_parsing() {
    let alias = AliasModuleSpec::new("app.core", "app.impl").unwrap();
    let id = alias.alias_target().unwrap();
    assert_eq!(id, "app.impl".parse::<ModuleIdentifier>().unwrap());
    assert_eq!(id.slot(), "main");

    let bad = AliasModuleSpec::new("app.core", "app impl").unwrap();
    assert!(matches!(
        bad.alias_target(),
        Err(SpecError::MalformedIdentifier { .. })
    ));
    // The plain accessor is unaffected by the parse failure
    assert_eq!(bad.alias_name(), "app impl");
}

#[test]
fn test_empty_target_rejected() {
    assert!(matches!(
        ModuleSpec::alias("app.core", ""),
        Err(SpecError::InvalidSpecification(_))
    ));
    assert!(matches!(
        ModuleSpec::alias("", "app.impl"),
        Err(SpecError::InvalidSpecification(_))
    ));
}

#[test]
fn test_self_alias_rejected_by_default() {
    assert!(matches!(
        ModuleSpec::alias("app.core", "app.core"),
        Err(SpecError::InvalidSpecification(_))
    ));
}

#[test]
fn test_configured_extra_dependencies() {
    let options = AliasOptions {
        extra_dependencies: vec![DependencySpec::build("infra.log")
            .optional(true)
            .build()
            .unwrap()],
        allow_self_alias: false,
    };
    let concrete = ModuleSpec::alias_with("app.core", "app.impl", &options)
        .unwrap()
        .loadable();

    let deps = concrete.dependencies();
    assert_eq!(deps.len(), 2);
    assert_eq!(deps[0].module_name(), "app.impl");
    assert_eq!(deps[1].module_name(), "infra.log");
    assert!(deps[1].is_optional());
}
