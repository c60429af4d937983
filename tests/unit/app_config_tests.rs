/*!
 * Tests for configuration loading and validation
 */

use anyhow::Result;
use captionsmith::app_config::{Config, LogLevel};
use captionsmith::formats::OutputFormat;
use captionsmith::layout::TimingStrategy;
use captionsmith::output::ExistsPolicy;
use log::LevelFilter;
use crate::common;

/// Test that a missing config file is created with defaults
#[test]
fn test_load_or_create_withMissingFile_shouldWriteDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config_path = temp_dir.path().join("conf.json");

    let (config, created) = Config::load_or_create(&config_path)?;

    assert!(created);
    assert!(config_path.exists());
    assert_eq!(config.output.format, OutputFormat::Lrc);
    assert_eq!(config.translation.endpoint, "http://localhost:11434");

    let (reloaded, created_again) = Config::load_or_create(&config_path)?;
    assert!(!created_again);
    assert_eq!(reloaded.layout.max_line_chars, config.layout.max_line_chars);
    Ok(())
}

/// Test that an existing file is read and missing sections get defaults
#[test]
fn test_load_or_create_withPartialFile_shouldMergeDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config_path = common::create_test_file(
        &temp_dir.path().to_path_buf(),
        "conf.json",
        r#"{
  "source_language": "en",
  "output": {"format": "vtt", "exists": "rename", "language_suffix": true},
  "layout": {"strategy": "character_budget", "durations": {"max_abs": 4.0}},
  "log_level": "debug"
}"#,
    )?;

    let (config, created) = Config::load_or_create(&config_path)?;

    assert!(!created);
    assert_eq!(config.source_language.as_deref(), Some("en"));
    assert_eq!(config.output.format, OutputFormat::Vtt);
    assert_eq!(config.output.exists, ExistsPolicy::Rename);
    assert!(config.output.language_suffix);
    assert_eq!(config.layout.strategy, TimingStrategy::CharacterBudget);
    assert_eq!(config.layout.durations.max_abs, 4.0);
    assert_eq!(config.layout.durations.min_abs, 0.7);
    assert_eq!(config.log_level.to_level_filter(), LevelFilter::Debug);
    assert!(config.validate().is_ok());
    Ok(())
}

/// Test that a malformed file is reported instead of replaced
#[test]
fn test_load_or_create_withMalformedFile_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config_path = common::create_test_file(&temp_dir.path().to_path_buf(), "conf.json", "{ not json")?;

    assert!(Config::load_or_create(&config_path).is_err());
    assert_eq!(std::fs::read_to_string(&config_path)?, "{ not json");
    Ok(())
}

/// Test that translation is only requested with a non-blank target
#[test]
fn test_wants_translation_withTargetLanguage_shouldReturnTrue() {
    let mut config = Config::default();
    assert!(!config.wants_translation());

    config.target_language = Some("  ".to_string());
    assert!(!config.wants_translation());

    config.target_language = Some("fr".to_string());
    assert!(config.wants_translation());
}

/// Test that inconsistent layout and recognition settings are rejected
#[test]
fn test_validate_withInvalidSettings_shouldFail() {
    let mut config = Config::default();
    config.layout.max_line_chars = 0;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.recognition.device = Some("tpu".to_string());
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.recognition.timeout_secs = 0;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.target_language = Some("de".to_string());
    config.translation.model = String::new();
    assert!(config.validate().is_err());
}

/// Test that log levels map onto log filters
#[test]
fn test_log_level_withEveryVariant_shouldMapToFilter() {
    assert_eq!(LogLevel::Error.to_level_filter(), LevelFilter::Error);
    assert_eq!(LogLevel::Warn.to_level_filter(), LevelFilter::Warn);
    assert_eq!(LogLevel::default().to_level_filter(), LevelFilter::Info);
    assert_eq!(LogLevel::Trace.to_level_filter(), LevelFilter::Trace);
}
