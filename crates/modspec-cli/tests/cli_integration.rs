//! Integration tests for the modspec CLI.

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn modspec(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_modspec"))
        .args(args)
        .env_remove("MODSPEC_LOG")
        .output()
        .expect("failed to run modspec")
}

fn fixture(path: &str) -> String {
    fixtures_dir().join(path).to_string_lossy().into_owned()
}

#[test]
fn test_inspect_alias_json() {
    let out = modspec(&["inspect", &fixture("modules/app.core.toml"), "--json"]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let summary: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(summary["name"], "app.core");
    assert_eq!(summary["kind"], "alias");
    assert_eq!(summary["alias_of"], "app.impl");
    assert_eq!(summary["dependencies"][0]["module"], "app.impl");
    assert_eq!(summary["dependencies"][0]["imports"], "accept-all");
    assert_eq!(summary["dependencies"][1]["module"], "org.infinispan");
}

#[test]
fn test_inspect_with_config() {
    let out = modspec(&[
        "inspect",
        &fixture("modules/app.core.toml"),
        "--json",
        "--config",
        &fixture("no-extras.toml"),
    ]);
    assert!(out.status.success());

    let summary: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(summary["dependencies"].as_array().unwrap().len(), 1);
}

#[test]
fn test_inspect_text() {
    let out = modspec(&["inspect", &fixture("modules/app.impl.toml")]);
    assert!(out.status.success());

    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("app.impl (concrete)"));
    assert!(stdout.contains("Main:         app.impl.Main"));
    assert!(stdout.contains("app.metrics (optional)"));
}

#[test]
fn test_link_json() {
    let out = modspec(&["link", &fixture("modules"), "app.core", "--json"]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let linked: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    let modules: Vec<&str> = linked["modules"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    assert_eq!(modules, vec!["app.core", "app.impl", "app.util", "org.infinispan"]);
    assert_eq!(linked["missing_optional"][0]["dependency"], "app.metrics");
}

#[test]
fn test_link_directory_with_glob_characters() {
    let temp = tempfile::TempDir::new().unwrap();
    let dir = temp.path().join("mods[v1]");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("a.toml"), "[module]\nname = \"a\"\n").unwrap();
    fs::write(dir.join("b.toml"), "[module]\nname = \"b\"\nalias = \"a\"\n").unwrap();

    let out = modspec(&[
        "link",
        &dir.to_string_lossy(),
        "b",
        "--json",
        "--config",
        &fixture("no-extras.toml"),
    ]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let linked: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(linked["modules"], serde_json::json!(["b", "a"]));
}

#[test]
fn test_link_unknown_module_fails() {
    let out = modspec(&["link", &fixture("modules"), "absent"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("Module not found: absent"));
}

#[test]
fn test_missing_manifest_fails() {
    let out = modspec(&["inspect", &fixture("modules/absent.toml")]);
    assert!(!out.status.success());
}
