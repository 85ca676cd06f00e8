//! Integration tests for loading and saving `FontConfig` files.

use fontweft_config::{AntiAliasMode, ConfigError, FontConfig};
use tempfile::TempDir;

#[test]
fn test_missing_file_yields_defaults() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("absent.yaml");
    let config = FontConfig::load_from(&path).unwrap();
    assert_eq!(config, FontConfig::default());
}

#[test]
fn test_save_then_load() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("nested").join("fonts.yaml");

    let mut config = FontConfig::default();
    config.default_family = "Monospaced".to_string();
    config.retained_strikes = 0;
    config.default_antialias = AntiAliasMode::None;
    config.fallback_families = vec!["Noto Color Emoji".to_string()];
    config.save_to(&path).unwrap();

    let loaded = FontConfig::load_from(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_invalid_file_reports_validation_error() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("fonts.yaml");
    std::fs::write(&path, "default_family: Papyrus\n").unwrap();

    match FontConfig::load_from(&path) {
        Err(ConfigError::Validation(msg)) => assert!(msg.contains("Papyrus")),
        other => panic!("expected validation error, got {:?}", other),
    }
}

#[test]
fn test_logical_family_override() {
    let yaml = "logical_families:\n  monospaced: [\"Fira Code\", \"monospace\"]\n";
    let config = FontConfig::from_yaml_str(yaml).unwrap();
    assert_eq!(
        config.logical_families.monospaced,
        vec!["Fira Code".to_string(), "monospace".to_string()]
    );
    // Untouched families keep their platform defaults
    assert!(!config.logical_families.system.is_empty());
}
