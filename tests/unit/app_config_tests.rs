/*!
 * Tests for application configuration functionality
 */

use rpgtl::app_config::{Config, LogLevel, ProviderConfig, TranslationProvider};
use std::str::FromStr;

use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.source_language, "it");
    assert_eq!(config.target_language, "en");
    assert_eq!(config.translation.provider, TranslationProvider::Google);
    assert_eq!(config.translation.common.retry_count, 10);
    assert_eq!(config.translation.common.retry_backoff_ms, 1000);

    assert_eq!(config.layout.dialogue_max_line_width, 44);
    assert_eq!(config.layout.common_events_max_line_width, 55);
    assert_eq!(config.layout.record_max_line_width, 55);
    assert!(config.layout.reflow_dialogue);

    assert!(config.output.pretty);
    assert_eq!(config.records.two_line_keys, vec!["description", "profile"]);
    assert!(config.records.raw_keys.contains(&"message4".to_string()));
    assert_eq!(config.log_level, LogLevel::Info);
    assert!(!config.verbose);
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();
    assert!(config.validate().is_ok());

    config.source_language = "q1".to_string();
    assert!(config.validate().is_err());
    config.source_language = "ita".to_string();
    assert!(config.validate().is_ok());

    config.target_language = "".to_string();
    assert!(config.validate().is_err());
    config.target_language = "it".to_string();
    assert!(config.validate().is_err());
    config.target_language = "en".to_string();

    config.source_language = "zh-CN".to_string();
    config.target_language = "zh-TW".to_string();
    assert!(config.validate().is_ok());
    config.target_language = "zh_cn".to_string();
    assert!(config.validate().is_err());
    config.source_language = "it".to_string();
    config.target_language = "en".to_string();

    config.layout.dialogue_max_line_width = 0;
    assert!(config.validate().is_err());
    config.layout.dialogue_max_line_width = 44;

    config.output.concurrent_files = 0;
    assert!(config.validate().is_err());
    config.output.concurrent_files = 4;

    assert!(config.validate().is_ok());
}

/// Hosted providers need an API key
#[test]
fn test_config_validation_withHostedProviderWithoutKey_shouldFail() {
    let mut config = Config::default();
    config.translation.provider = TranslationProvider::OpenAI;
    assert!(config.validate().is_err());

    config.translation.active_provider_config_mut().api_key = "sk-test".to_string();
    assert!(config.validate().is_ok());

    config.translation.active_provider_config_mut().endpoint = "not a url".to_string();
    assert!(config.validate().is_err());
}

/// Test provider accessors fall back to provider defaults
#[test]
fn test_provider_accessors_withMissingEntry_shouldUseDefaults() {
    let mut config = Config::default();
    config.translation.available_providers.clear();
    config.translation.provider = TranslationProvider::Ollama;

    assert_eq!(config.translation.get_model(), ProviderConfig::new(TranslationProvider::Ollama).model);
    assert_eq!(config.translation.get_endpoint(), "http://localhost:11434");
    assert_eq!(config.translation.get_concurrent_requests(), 4);
    assert_eq!(config.translation.get_timeout_secs(), 30);

    config.translation.active_provider_config_mut().model = "mistral".to_string();
    assert_eq!(config.translation.get_model(), "mistral");
    assert_eq!(config.translation.available_providers.len(), 1);
}

/// Test provider parsing
#[test]
fn test_provider_from_str_withKnownNames_shouldParse() {
    assert_eq!(TranslationProvider::from_str("google").unwrap(), TranslationProvider::Google);
    assert_eq!(TranslationProvider::from_str("LMStudio").unwrap(), TranslationProvider::LMStudio);
    assert!(TranslationProvider::from_str("babelfish").is_err());
    assert!(TranslationProvider::Anthropic.requires_api_key());
    assert!(!TranslationProvider::Google.requires_api_key());
}

/// Missing config files are created with defaults, existing ones are loaded
#[test]
fn test_load_or_create_withMissingFile_shouldWriteDefaults() -> anyhow::Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("conf.json");

    let (config, created) = Config::load_or_create(&path)?;
    assert!(created);
    assert!(path.exists());
    assert_eq!(config.target_language, "en");

    let (reloaded, created) = Config::load_or_create(&path)?;
    assert!(!created);
    assert_eq!(reloaded.source_language, config.source_language);
    Ok(())
}

/// Partial config files are completed with defaults, and a BOM is tolerated
#[test]
fn test_load_or_create_withPartialFile_shouldFillDefaults() -> anyhow::Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "conf.json",
        "\u{feff}{\"source_language\": \"ja\", \"target_language\": \"fr\", \"layout\": {\"reflow_dialogue\": false}}",
    )?;

    let (config, created) = Config::load_or_create(&path)?;
    assert!(!created);
    assert_eq!(config.source_language, "ja");
    assert_eq!(config.target_language, "fr");
    assert!(!config.layout.reflow_dialogue);
    assert_eq!(config.layout.dialogue_max_line_width, 44);
    assert_eq!(config.translation.common.retry_count, 10);
    Ok(())
}
