/*!
 * Tests for application configuration functionality
 */

use anyhow::Result;
use kotoba_stats::app_config::{Config, FeatureLayout, LogLevel};
use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.corpus_path, "data/vocab.json");
    assert_eq!(config.reconstruct.gap_threshold_ms, 500);
    assert_eq!(config.tokenizer.max_input_bytes, 40_000);
    assert_eq!(config.tokenizer.feature_layout, FeatureLayout::Unidic);
    assert_eq!(config.filters.drawing_command_patterns.len(), 1);
    assert!(config.readability.enabled);
    assert_eq!(config.batch.workers, 4);
    assert_eq!(config.log_level, LogLevel::Info);
    assert!(config.validate().is_ok());
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();
    assert!(config.validate().is_ok());

    config.batch.workers = 0;
    assert!(config.validate().is_err());
    config.batch.workers = 1;

    config.tokenizer.max_input_bytes = 3;
    assert!(config.validate().is_err());
    config.tokenizer.max_input_bytes = 4;
    assert!(config.validate().is_ok());

    config.filters.drawing_command_patterns = vec![];
    assert!(config.validate().is_err());

    config.filters.drawing_command_patterns = vec!["[unclosed".to_string()];
    let error = config.validate().unwrap_err();
    assert!(format!("{:#}", error).contains("[unclosed"));
}

/// Missing sections fall back to defaults
#[test]
fn test_config_deserialize_withPartialJson_shouldFillDefaults() -> Result<()> {
    let json = r#"{
        "corpus_path": "/srv/vocab.json",
        "tokenizer": { "feature_layout": "ipadic" },
        "log_level": "debug"
    }"#;
    let config: Config = serde_json::from_str(json)?;

    assert_eq!(config.corpus_path, "/srv/vocab.json");
    assert_eq!(config.tokenizer.feature_layout, FeatureLayout::Ipadic);
    assert_eq!(config.tokenizer.dictionary_path, "data/system.dic");
    assert_eq!(config.tokenizer.max_input_bytes, 40_000);
    assert_eq!(config.reconstruct.gap_threshold_ms, 500);
    assert_eq!(config.log_level, LogLevel::Debug);
    Ok(())
}

/// Test saving and loading a configuration file
#[test]
fn test_config_save_and_load_withTempFile_shouldPreserveValues() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("conf.json");

    let mut config = Config::default();
    config.reconstruct.gap_threshold_ms = 750;
    config.batch.workers = 8;
    config.readability.enabled = false;
    config.save(&path)?;

    let loaded = Config::from_file(&path)?;
    assert_eq!(loaded.reconstruct.gap_threshold_ms, 750);
    assert_eq!(loaded.batch.workers, 8);
    assert!(!loaded.readability.enabled);
    Ok(())
}

#[test]
fn test_config_from_file_withMissingFile_shouldFail() {
    let result = Config::from_file("/nonexistent/conf.json");
    assert!(result.is_err());
}
