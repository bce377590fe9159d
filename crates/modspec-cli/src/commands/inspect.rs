//! `modspec inspect`: show the loadable shape of a manifest.

use anyhow::Context;
use modspec::{AliasOptions, ModuleManifest, SpecSummary};
use std::path::Path;

pub fn execute(manifest: &Path, options: &AliasOptions, json: bool) -> anyhow::Result<()> {
    let spec = ModuleManifest::load_spec(manifest, options)
        .with_context(|| format!("Failed to load {}", manifest.display()))?;
    let summary = spec.summary();

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }
    Ok(())
}

pub fn print_summary(summary: &SpecSummary) {
    println!("Module:       {} ({})", summary.name, summary.kind);
    if let Some(ref target) = summary.alias_of {
        println!("Alias of:     {}", target);
    }
    if let Some(ref main) = summary.main_class {
        println!("Main:         {}", main);
    }
    if let Some(ref version) = summary.version {
        println!("Version:      {}", version);
    }
    println!("Assertions:   {}", summary.assertions);

    if !summary.resources.is_empty() {
        println!("Resources:");
        for root in &summary.resources {
            println!("  {}", root);
        }
    }

    if !summary.dependencies.is_empty() {
        println!("Dependencies:");
        for dep in &summary.dependencies {
            let mut line = format!("  {}", dep.module);
            if let Some(ref version) = dep.version {
                line.push_str(&format!(" {}", version));
            }
            if dep.optional {
                line.push_str(" (optional)");
            }
            println!("{}", line);
            println!("    imports: {}", dep.imports);
            println!("    exports: {}", dep.exports);
        }
    }

    if !summary.properties.is_empty() {
        println!("Properties:");
        for (key, value) in &summary.properties {
            println!("  {} = {}", key, value);
        }
    }
}
