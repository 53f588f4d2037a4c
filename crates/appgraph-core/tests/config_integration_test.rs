use appgraph_core::{
    AppGraphConfig, ConfigError, ConfigManager, HyperlinkMode, OutputFormat,
};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_config_file_persistence() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("nested").join("config.toml");

    ConfigManager::create_default_config(&config_path).unwrap();
    assert!(config_path.exists());

    let loaded = ConfigManager::read_toml_file(&config_path).unwrap();
    assert_eq!(loaded, AppGraphConfig::default());
}

#[test]
fn test_load_explicit_file() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("appgraph.toml");
    fs::write(
        &config_path,
        r#"
[logging]
level = "debug"

[display]
hyperlinks = "never"
output = "json"
"#,
    )
    .unwrap();

    let manager = ConfigManager::load(Some(&config_path)).unwrap();
    assert_eq!(manager.config_path(), Some(config_path.as_path()));
    assert_eq!(manager.config().display.hyperlinks, HyperlinkMode::Never);
    assert_eq!(manager.config().display.output, OutputFormat::Json);
    // Unspecified keys fall back to defaults.
    assert_eq!(manager.config().logging.format, "pretty");
}

#[test]
fn test_load_missing_explicit_file() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("missing.toml");

    let err = ConfigManager::load(Some(&missing)).unwrap_err();
    assert!(matches!(err, ConfigError::NotFound(_)));
}

#[test]
fn test_malformed_file_is_parse_error() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("broken.toml");
    fs::write(&config_path, "[display]\nhyperlinks = \"sometimes\"\n").unwrap();

    let err = ConfigManager::read_toml_file(&config_path).unwrap_err();
    assert!(matches!(err, ConfigError::ParseError(_)));
}

#[test]
fn test_invalid_values_rejected() {
    let mut config = AppGraphConfig::default();
    config.logging.level = "chatty".to_string();
    assert!(ConfigManager::from_config(config).is_err());

    let manager = ConfigManager::from_config(AppGraphConfig::default()).unwrap();
    let rendered = manager.to_toml().unwrap();
    assert!(rendered.contains("hyperlinks = \"auto\""));
    assert!(rendered.contains("output = \"text\""));
}
