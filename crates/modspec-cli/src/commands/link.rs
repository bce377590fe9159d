//! `modspec link`: resolve a module against a directory of manifests.

use anyhow::Context;
use modspec::{AliasOptions, ModuleManifest, ModuleRegistry};
use std::path::Path;
use tracing::debug;

/// Define every manifest found directly in `dir`
pub fn load_directory(dir: &Path, options: &AliasOptions) -> anyhow::Result<ModuleRegistry> {
    // The directory itself may contain glob metacharacters
    let pattern = format!(
        "{}/*.toml",
        glob::Pattern::escape(&dir.to_string_lossy())
    );
    let registry = ModuleRegistry::new();

    for entry in glob::glob(&pattern).context("Invalid manifest directory")? {
        let path = entry?;
        if path.file_name().is_some_and(|n| n == "modspec.toml") {
            continue;
        }
        let spec = ModuleManifest::load_spec(&path, options)
            .with_context(|| format!("Failed to load {}", path.display()))?;
        debug!(module = spec.name(), path = %path.display(), "loaded manifest");
        registry
            .define(spec)
            .with_context(|| format!("Failed to define module from {}", path.display()))?;
    }

    Ok(registry)
}

pub fn execute(dir: &Path, module: &str, options: &AliasOptions, json: bool) -> anyhow::Result<()> {
    let registry = load_directory(dir, options)?;
    let linked = registry
        .link(module)
        .with_context(|| format!("Failed to link {}", module))?;

    if json {
        let names = linked.names();
        let missing: Vec<_> = linked
            .missing_optional()
            .iter()
            .map(|m| serde_json::json!({ "module": m.module, "dependency": m.dependency }))
            .collect();
        let out = serde_json::json!({ "modules": names, "missing_optional": missing });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("Link order for {} ({} modules):", module, linked.len());
    for (i, name) in linked.names().iter().enumerate() {
        println!("  {:>3}. {}", i + 1, name);
    }
    for missing in linked.missing_optional() {
        println!("  (optional {} of {} not found)", missing.dependency, missing.module);
    }
    Ok(())
}
