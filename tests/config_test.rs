//! Unit tests for config.rs module

use std::fs;
use std::path::Path;
use tempfile::tempdir;
use feedback_insights::config::AppConfig;
use feedback_insights::dashboard::DashboardSettings;

#[test]
fn test_default_config_values() {
    let config = AppConfig::default();

    assert_eq!(config.data.default_path, "data/econsult_comments_dataset.csv");
    assert_eq!(config.logging.level, "warn");
    assert_eq!(config.logging.file_path, None);
    assert_eq!(config.logging.format, "text");
}

#[test]
fn test_default_dashboard_config() {
    let config = AppConfig::default();

    assert_eq!(config.dashboard.sample_size, 10);
    assert_eq!(config.dashboard.top_words, 15);
    assert_eq!(config.dashboard.bar_width, 40);
    assert_eq!(DashboardSettings::from(&config.dashboard), DashboardSettings::default());
}

#[test]
fn test_default_report_config() {
    let config = AppConfig::default();

    assert_eq!(config.report.file_name, "feedback_insights.csv");
    assert_eq!(config.report.default_format, "csv");
    assert_eq!(
        config.default_report_path(),
        Path::new("./output").join("feedback_insights.csv")
    );
}

#[test]
fn test_validate_rejects_bad_log_level() {
    let mut config = AppConfig::default();
    config.logging.level = "verbose".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_rejects_bad_formats() {
    let mut config = AppConfig::default();
    config.logging.format = "xml".to_string();
    assert!(config.validate().is_err());

    let mut config = AppConfig::default();
    config.report.default_format = "xlsx".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_rejects_bad_dashboard_values() {
    let mut config = AppConfig::default();
    config.dashboard.sample_size = 0;
    assert!(config.validate().is_err());

    let mut config = AppConfig::default();
    config.dashboard.bar_width = 5;
    assert!(config.validate().is_err());

    let mut config = AppConfig::default();
    config.dashboard.bar_width = 200;
    assert!(config.validate().is_ok());
}

#[test]
fn test_validate_rejects_empty_paths() {
    let mut config = AppConfig::default();
    config.data.default_path = "  ".to_string();
    assert!(config.validate().is_err());

    let mut config = AppConfig::default();
    config.report.file_name = String::new();
    assert!(config.validate().is_err());
}

#[test]
fn test_load_explicit_file_overrides_defaults() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let path = temp_dir.path().join("feedback.toml");
    fs::write(
        &path,
        "[dashboard]\nsample_size = 3\n\n[report]\ndefault_format = \"json\"\n",
    )
    .expect("Failed to write config");

    let config = AppConfig::load(Some(&path)).expect("Failed to load config");
    assert_eq!(config.dashboard.sample_size, 3);
    assert_eq!(config.dashboard.top_words, 15);
    assert_eq!(config.report.default_format, "json");
}

#[test]
fn test_load_explicit_yaml_file() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let path = temp_dir.path().join("feedback.yaml");
    fs::write(&path, "logging:\n  level: debug\n").expect("Failed to write config");

    let config = AppConfig::load(Some(&path)).expect("Failed to load config");
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn test_load_rejects_invalid_values_from_file() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let path = temp_dir.path().join("feedback.toml");
    fs::write(&path, "[dashboard]\nbar_width = 1\n").expect("Failed to write config");

    assert!(AppConfig::load(Some(&path)).is_err());
}

#[test]
fn test_load_missing_explicit_file_fails() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let path = temp_dir.path().join("absent.toml");
    assert!(AppConfig::load(Some(&path)).is_err());
}
