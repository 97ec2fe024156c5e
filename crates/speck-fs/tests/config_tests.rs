//! Tests for ConfigStore format detection

use rstest::rstest;
use serde::Deserialize;
use speck_fs::{ConfigStore, Error};
use std::fs;
use tempfile::TempDir;

#[derive(Debug, Deserialize, PartialEq)]
struct Sample {
    repository: String,
    timeout_secs: u64,
}

#[rstest]
#[case("config.toml", "repository = \"telum-ai/speck\"\ntimeout_secs = 30\n")]
#[case("config.json", r#"{"repository": "telum-ai/speck", "timeout_secs": 30}"#)]
#[case("config.yaml", "repository: telum-ai/speck\ntimeout_secs: 30\n")]
fn loads_by_extension(#[case] name: &str, #[case] content: &str) {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join(name);
    fs::write(&path, content).unwrap();

    let loaded: Sample = ConfigStore::new().load(&path).unwrap();

    assert_eq!(
        loaded,
        Sample {
            repository: "telum-ai/speck".into(),
            timeout_secs: 30,
        }
    );
}

#[test]
fn unsupported_extension_is_rejected() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.ini");
    fs::write(&path, "repository=x").unwrap();

    let result: Result<Sample, _> = ConfigStore::new().load(&path);
    assert!(matches!(result, Err(Error::UnsupportedFormat { .. })));
}

#[test]
fn parse_error_names_format_and_path() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.toml");
    fs::write(&path, "repository = ").unwrap();

    let result: Result<Sample, _> = ConfigStore::new().load(&path);
    let err = result.unwrap_err();
    let display = err.to_string();
    assert!(display.contains("TOML"), "got: {display}");
    assert!(display.contains("config.toml"), "got: {display}");
}
