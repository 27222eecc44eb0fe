// tests/config_test.rs
use git_versioner::config::load_config;
use git_versioner::domain::{BranchFilter, Version};
use std::io::Write;
use tempfile::{Builder, NamedTempFile};

fn write_config(suffix: &str, content: &str) -> NamedTempFile {
    let mut temp_file = Builder::new().suffix(suffix).tempfile().unwrap();
    temp_file.write_all(content.as_bytes()).unwrap();
    temp_file.flush().unwrap();
    temp_file
}

#[test]
fn test_load_yaml_file() {
    let temp_file = write_config(
        ".yml",
        r#"
backend:
  version: "3.1.0"
  environments:
    production:
      auto-tag: true
      branches:
        only: [main, master]
    development:
      is-prerelease: true
      prerelease-tag: beta
      branches:
        ignore: [main, master]
frontend:
  environments:
    production:
      branches:
        only: [main]
"#,
    );

    let config = load_config(temp_file.path()).unwrap();
    assert_eq!(config.scope_names(), vec!["backend", "frontend"]);

    let backend = config.get("backend").unwrap();
    assert_eq!(backend.baseline_version, Version::new(3, 1, 0));
    assert_eq!(
        backend.environments[0].branch_filter,
        BranchFilter::only(["main", "master"])
    );
    assert_eq!(
        backend.environments[1].prerelease_label("feature/login", 2),
        "beta.2"
    );

    let frontend = config.get("frontend").unwrap();
    assert_eq!(frontend.baseline_version, Version::new(1, 0, 0));
    assert!(!frontend.environments[0].auto_tag);
}

#[test]
fn test_load_toml_file() {
    let temp_file = write_config(
        ".toml",
        r#"
[backend]
version = "0.4.2"

[backend.environments.production]
auto-tag = true
branches = { only = ["main"] }
"#,
    );

    let config = load_config(temp_file.path()).unwrap();
    let backend = config.get("backend").unwrap();
    assert_eq!(backend.baseline_version, Version::new(0, 4, 2));
    assert!(backend.environments[0].auto_tag);
}

#[test]
fn test_load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_config(&dir.path().join("version.yml")).unwrap_err();

    assert!(err.is_configuration_error());
    assert!(
        err.to_string().contains("not found"),
        "unexpected message: {}",
        err
    );
}

#[test]
fn test_load_malformed_yaml() {
    let temp_file = write_config(".yml", "backend:\n  environments: [oops\n");

    let err = load_config(temp_file.path()).unwrap_err();
    assert!(err.is_configuration_error());
}

#[test]
fn test_load_malformed_toml() {
    let temp_file = write_config(".toml", "[backend\nversion = 1\n");

    let err = load_config(temp_file.path()).unwrap_err();
    assert!(err.is_configuration_error());
}

#[test]
fn test_unknown_keys_are_rejected() {
    let temp_file = write_config(
        ".yml",
        "backend:\n  environments:\n    production:\n      auto_tag: true\n",
    );

    assert!(load_config(temp_file.path()).is_err());
}
