// tests/config_test.rs
use std::env;
use std::io::Write;

use multi_release::config::{load_config, BranchConfig, Config, LOCAL_CONFIG_FILE};
use multi_release::domain::{BumpStrategy, RangePrefix, ReleaseStrategy, TagFormat};
use serial_test::serial;
use tempfile::NamedTempFile;

#[test]
fn test_load_default_config() {
    let config = Config::default();
    assert_eq!(config.tag_format, TagFormat::new("{name}@{version}"));
    let names: Vec<&str> = config.branches.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["master", "main", "next", "next-major", "beta", "alpha"]
    );
    assert_eq!(config.branches[4].channel(), Some("beta".to_string()));
}

#[test]
fn test_load_from_file() {
    let mut temp_file = NamedTempFile::new().unwrap();
    let toml_content = r#"
[deps]
bump = "satisfy"
release = "minor"

[[branches]]
name = "main"

[[branches]]
name = "beta"
prerelease = true
"#;
    temp_file.write_all(toml_content.as_bytes()).unwrap();
    temp_file.flush().unwrap();

    let config = load_config(Some(temp_file.path().to_str().unwrap())).unwrap();
    assert_eq!(config.deps.bump, BumpStrategy::Satisfy);
    assert_eq!(config.deps.release, ReleaseStrategy::Minor);
    assert_eq!(config.deps.prefix, RangePrefix::Exact);
    assert_eq!(
        config.branches,
        vec![BranchConfig::release("main"), BranchConfig::prerelease("beta")]
    );
}

#[test]
#[serial]
fn test_load_fixture() {
    let config = load_config(Some("tests/fixtures/config_with_deps.toml"))
        .expect("Failed to load test config");
    assert_eq!(config.tag_format.format("core", "1.0.0"), "core-v1.0.0");
    assert_eq!(config.deps.bump, BumpStrategy::Inherit);
    assert_eq!(config.deps.release, ReleaseStrategy::Inherit);
    assert_eq!(config.deps.prefix, RangePrefix::Caret);
    assert_eq!(config.branches[1].channel(), Some("rc".to_string()));
}

#[test]
fn test_tag_format_without_version_rejected() {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file
        .write_all(b"tag_format = \"{name}-latest\"\n")
        .unwrap();
    temp_file.flush().unwrap();

    assert!(load_config(Some(temp_file.path().to_str().unwrap())).is_err());
}

#[test]
fn test_invalid_toml_rejected() {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(b"[deps\nbump = 1\n").unwrap();
    temp_file.flush().unwrap();

    assert!(load_config(Some(temp_file.path().to_str().unwrap())).is_err());
}

#[test]
#[serial]
fn test_missing_explicit_file_rejected() {
    assert!(load_config(Some("tests/fixtures/does_not_exist.toml")).is_err());
}

#[test]
#[serial]
fn test_local_config_file_in_working_directory() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join(LOCAL_CONFIG_FILE),
        "[deps]\nrelease = \"major\"\n",
    )
    .unwrap();

    let original = env::current_dir().unwrap();
    env::set_current_dir(dir.path()).unwrap();
    let config = load_config(None);
    env::set_current_dir(original).unwrap();

    assert_eq!(config.unwrap().deps.release, ReleaseStrategy::Major);
}
