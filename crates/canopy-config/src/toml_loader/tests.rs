//! Tests for TOML config loading.

use super::*;
use canopy_common::ConfigError;
use std::path::Path;

#[test]
fn load_from_nonexistent_returns_file_not_found() {
    let result = load_from_path(Path::new("/tmp/nonexistent_canopy_view.toml"));
    assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
}

#[test]
fn load_valid_partial_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("view.toml");
    std::fs::write(
        &path,
        r##"
[tooltip]
max_length = 80

[accessibility]
renderer_accessible = true
"##,
    )
    .unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.tooltip.max_length, 80);
    assert!(config.accessibility.renderer_accessible);
    // Defaults preserved
    assert_eq!(config.tooltip.max_width_px, 300);
    assert_eq!(config.accessibility.root_id, 1000);
}

#[test]
fn load_invalid_toml_returns_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("view.toml");
    std::fs::write(&path, "this is not valid toml {{{").unwrap();

    let result = load_from_path(&path);
    assert!(matches!(result, Err(ConfigError::ParseError(_))));
}

#[test]
fn load_out_of_range_values_still_loads() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("view.toml");
    std::fs::write(
        &path,
        r#"
[plugins]
registration_attempts = 0
"#,
    )
    .unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.plugins.registration_attempts, 0);
}

#[test]
fn from_str_wrong_type_is_parse_error() {
    let result = from_toml_str("[paint]\ndeemphasis_alpha = \"dark\"\n");
    assert!(matches!(result, Err(ConfigError::ParseError(_))));
}
