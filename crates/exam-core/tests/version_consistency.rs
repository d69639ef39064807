//! Workspace manifests agree on one version.

use std::path::{Path, PathBuf};

fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../..")
}

fn manifest(relative: &str) -> toml::Value {
    let path = workspace_root().join(relative).join("Cargo.toml");
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("reading {}: {e}", path.display()))
        .parse()
        .unwrap()
}

fn workspace_version() -> String {
    manifest(".")["workspace"]["package"]["version"]
        .as_str()
        .unwrap()
        .to_string()
}

#[test]
fn every_crate_inherits_the_workspace_version() {
    for krate in ["crates/exam-core", "crates/exam-state", "crates/exam-cli"] {
        let version = &manifest(krate)["package"]["version"];
        assert_eq!(
            version.get("workspace").and_then(|v| v.as_bool()),
            Some(true),
            "{krate} declares version = {version}"
        );
    }
}

#[test]
fn internal_dependencies_pin_workspace_version() {
    let root = manifest(".");
    let expected = workspace_version();
    for name in ["exam-core", "exam-state"] {
        let declared = root["workspace"]["dependencies"][name]["version"].as_str();
        assert_eq!(declared, Some(expected.as_str()), "{name} pinned to a stale version");
    }
}

#[test]
fn workspace_version_matches_cargo_pkg() {
    assert_eq!(workspace_version(), env!("CARGO_PKG_VERSION"));
}
