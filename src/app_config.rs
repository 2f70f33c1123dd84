use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::Path;
use url::Url;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Source language code (ISO)
    pub source_language: String,

    /// Target language code (ISO)
    pub target_language: String,

    /// Translation config
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Line widths and dialogue merging
    #[serde(default)]
    pub layout: LayoutConfig,

    /// Field allow-lists for keyed record files
    #[serde(default)]
    pub records: RecordsConfig,

    /// Output formatting and file-level concurrency
    #[serde(default)]
    pub output: OutputConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Trace every translated unit as `source -> target`
    #[serde(default)]
    pub verbose: bool,
}

/// Translation provider type
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationProvider {
    // @provider: Google translate web endpoint
    #[default]
    Google,
    // @provider: Ollama
    Ollama,
    // @provider: OpenAI
    OpenAI,
    // @provider: Anthropic
    Anthropic,
    // @provider: LM Studio (OpenAI-compatible local server)
    LMStudio,
}

impl TranslationProvider {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Google => "Google",
            Self::Ollama => "Ollama",
            Self::OpenAI => "OpenAI",
            Self::Anthropic => "Anthropic",
            Self::LMStudio => "LM Studio",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Google => "google".to_string(),
            Self::Ollama => "ollama".to_string(),
            Self::OpenAI => "openai".to_string(),
            Self::Anthropic => "anthropic".to_string(),
            Self::LMStudio => "lmstudio".to_string(),
        }
    }

    // @returns: Whether the provider needs an API key
    pub fn requires_api_key(&self) -> bool {
        matches!(self, Self::OpenAI | Self::Anthropic)
    }
}

impl std::fmt::Display for TranslationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

impl std::str::FromStr for TranslationProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "google" => Ok(Self::Google),
            "ollama" => Ok(Self::Ollama),
            "openai" => Ok(Self::OpenAI),
            "anthropic" => Ok(Self::Anthropic),
            "lmstudio" => Ok(Self::LMStudio),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Provider configuration wrapper
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    // @field: Provider type identifier
    #[serde(rename = "type")]
    pub provider_type: String,

    // @field: Model name (ignored by google)
    #[serde(default = "String::new")]
    pub model: String,

    // @field: API key
    #[serde(default = "String::new")]
    pub api_key: String,

    // @field: Service URL
    #[serde(default = "String::new")]
    pub endpoint: String,

    // @field: Max in-flight requests
    #[serde(default = "default_concurrent_requests")]
    pub concurrent_requests: usize,

    // @field: Timeout seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ProviderConfig {
    // @param provider_type: Provider enum
    // @returns: Provider config with defaults
    pub fn new(provider_type: TranslationProvider) -> Self {
        let (model, endpoint, concurrent_requests) = match provider_type {
            TranslationProvider::Google => (String::new(), default_google_endpoint(), 8),
            TranslationProvider::Ollama => (default_ollama_model(), default_ollama_endpoint(), 2),
            TranslationProvider::OpenAI => (default_openai_model(), default_openai_endpoint(), default_concurrent_requests()),
            TranslationProvider::Anthropic => (default_anthropic_model(), default_anthropic_endpoint(), default_concurrent_requests()),
            TranslationProvider::LMStudio => (default_lmstudio_model(), default_lmstudio_endpoint(), 2),
        };

        Self {
            provider_type: provider_type.to_lowercase_string(),
            model,
            api_key: String::new(),
            endpoint,
            concurrent_requests,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Translation service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Translation provider to use
    #[serde(default)]
    pub provider: TranslationProvider,

    /// Available translation providers
    #[serde(default)]
    pub available_providers: Vec<ProviderConfig>,

    /// Common translation settings
    #[serde(default)]
    pub common: TranslationCommonConfig,
}

/// Common translation settings applicable to all providers
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationCommonConfig {
    /// System prompt template for LLM providers
    /// Placeholders: {source_language}, {target_language}
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// Retries after the first failed attempt
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    /// Fixed delay before each retry (in milliseconds)
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Temperature parameter for LLM providers (0.0 to 1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for TranslationCommonConfig {
    fn default() -> Self {
        Self {
            system_prompt: default_system_prompt(),
            retry_count: default_retry_count(),
            retry_backoff_ms: default_retry_backoff_ms(),
            temperature: default_temperature(),
        }
    }
}

/// Line widths and dialogue merging
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LayoutConfig {
    /// Width of map event message boxes
    #[serde(default = "default_dialogue_width")]
    pub dialogue_max_line_width: usize,

    /// Width of common event message boxes
    #[serde(default = "default_record_width")]
    pub common_events_max_line_width: usize,

    /// Width of description/profile lines in database records
    #[serde(default = "default_record_width")]
    pub record_max_line_width: usize,

    /// Merge consecutive text lines of map events and reflow them.
    /// When false every line is translated on its own.
    #[serde(default = "default_true")]
    pub reflow_dialogue: bool,

    /// Pages/record lists translated at the same time within one file
    #[serde(default = "default_concurrent_containers")]
    pub concurrent_containers: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            dialogue_max_line_width: default_dialogue_width(),
            common_events_max_line_width: default_record_width(),
            record_max_line_width: default_record_width(),
            reflow_dialogue: true,
            concurrent_containers: default_concurrent_containers(),
        }
    }
}

/// Field allow-lists for keyed record files
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RecordsConfig {
    /// Keys translated anywhere inside GalleryList.json
    #[serde(default = "default_gallery_keys")]
    pub gallery_keys: Vec<String>,

    /// Keys translated on each entry of a database table
    #[serde(default = "default_record_keys")]
    pub record_keys: Vec<String>,

    /// Keys reflowed to at most two lines
    #[serde(default = "default_two_line_keys")]
    pub two_line_keys: Vec<String>,

    /// Keys whose embedded line breaks are kept as-is
    #[serde(default = "default_raw_keys")]
    pub raw_keys: Vec<String>,
}

impl Default for RecordsConfig {
    fn default() -> Self {
        Self {
            gallery_keys: default_gallery_keys(),
            record_keys: default_record_keys(),
            two_line_keys: default_two_line_keys(),
            raw_keys: default_raw_keys(),
        }
    }
}

/// Output formatting and file-level concurrency
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OutputConfig {
    /// Indent output JSON with four spaces
    #[serde(default = "default_true")]
    pub pretty: bool,

    /// Files translated at the same time
    #[serde(default = "default_concurrent_files")]
    pub concurrent_files: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            pretty: true,
            concurrent_files: default_concurrent_files(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_concurrent_requests() -> usize {
    4
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_retry_count() -> u32 {
    10
}

fn default_retry_backoff_ms() -> u64 {
    1000 // fixed, not doubled
}

fn default_temperature() -> f32 {
    0.3
}

fn default_true() -> bool {
    true
}

fn default_dialogue_width() -> usize {
    44
}

fn default_record_width() -> usize {
    55
}

fn default_concurrent_containers() -> usize {
    4
}

fn default_concurrent_files() -> usize {
    4
}

fn default_gallery_keys() -> Vec<String> {
    ["displayName", "hint", "stageText", "sceneText", "text"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_record_keys() -> Vec<String> {
    ["name", "description", "profile", "message1", "message2", "message3", "message4"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_two_line_keys() -> Vec<String> {
    vec!["description".to_string(), "profile".to_string()]
}

fn default_raw_keys() -> Vec<String> {
    (1..=4).map(|n| format!("message{}", n)).collect()
}

fn default_google_endpoint() -> String {
    "https://translate.googleapis.com".to_string()
}

fn default_ollama_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn default_openai_endpoint() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_anthropic_endpoint() -> String {
    "https://api.anthropic.com".to_string()
}

fn default_lmstudio_endpoint() -> String {
    // LM Studio default server (OpenAI compatible) runs on port 1234 under /v1
    "http://localhost:1234/v1".to_string()
}

fn default_ollama_model() -> String {
    "llama3.2:3b".to_string()
}

fn default_openai_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_anthropic_model() -> String {
    "claude-3-haiku-20240307".to_string()
}

fn default_lmstudio_model() -> String {
    // Placeholder; users should set to the loaded model name in LM Studio
    "local-model".to_string()
}

fn default_system_prompt() -> String {
    "You translate video game text from {source_language} to {target_language}. Keep control codes such as \\C[2] or \\N[1] untouched. Reply with the translation only.".to_string()
}

impl Config {
    /// Load a config file, or write and return the defaults when it is missing
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<(Self, bool)> {
        let path = path.as_ref();
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to open config file: {}", path.display()))?;
            let config: Config = serde_json::from_str(content.trim_start_matches('\u{feff}'))
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            return Ok((config, false));
        }

        let config = Config::default();
        let json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write default config to file: {}", path.display()))?;
        Ok((config, true))
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        crate::language_utils::get_language_name(&self.source_language)?;
        crate::language_utils::get_language_name(&self.target_language)?;
        if crate::language_utils::provider_codes_match(&self.source_language, &self.target_language) {
            return Err(anyhow!(
                "Source and target language are the same: {} / {}",
                self.source_language,
                self.target_language
            ));
        }

        if self.layout.dialogue_max_line_width == 0
            || self.layout.common_events_max_line_width == 0
            || self.layout.record_max_line_width == 0
        {
            return Err(anyhow!("Line widths must be greater than zero"));
        }

        if self.layout.concurrent_containers == 0 || self.output.concurrent_files == 0 {
            return Err(anyhow!("Concurrency limits must be greater than zero"));
        }

        let provider = &self.translation.provider;
        if provider.requires_api_key() && self.translation.get_api_key().is_empty() {
            return Err(anyhow!(
                "Translation API key is required for {} provider",
                provider.display_name()
            ));
        }

        let endpoint = self.translation.get_endpoint();
        Url::parse(&endpoint)
            .with_context(|| format!("Invalid endpoint for {}: {}", provider.display_name(), endpoint))?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            source_language: "it".to_string(),
            target_language: "en".to_string(),
            translation: TranslationConfig::default(),
            layout: LayoutConfig::default(),
            records: RecordsConfig::default(),
            output: OutputConfig::default(),
            log_level: LogLevel::default(),
            verbose: false,
        }
    }
}

impl TranslationConfig {
    /// Get the active provider configuration from the available_providers array
    pub fn get_active_provider_config(&self) -> Option<&ProviderConfig> {
        self.get_provider_config(&self.provider)
    }

    /// Get a specific provider configuration by type
    pub fn get_provider_config(&self, provider_type: &TranslationProvider) -> Option<&ProviderConfig> {
        let provider_str = provider_type.to_lowercase_string();
        self.available_providers
            .iter()
            .find(|p| p.provider_type == provider_str)
    }

    /// Mutable access to the active provider configuration, created on demand
    pub fn active_provider_config_mut(&mut self) -> &mut ProviderConfig {
        let provider_str = self.provider.to_lowercase_string();
        let index = match self.available_providers.iter().position(|p| p.provider_type == provider_str) {
            Some(index) => index,
            None => {
                self.available_providers.push(ProviderConfig::new(self.provider.clone()));
                self.available_providers.len() - 1
            }
        };
        &mut self.available_providers[index]
    }

    /// Get the model for the active provider
    pub fn get_model(&self) -> String {
        self.get_active_provider_config()
            .filter(|p| !p.model.is_empty())
            .map(|p| p.model.clone())
            .unwrap_or_else(|| ProviderConfig::new(self.provider.clone()).model)
    }

    /// Get the API key for the active provider
    pub fn get_api_key(&self) -> String {
        self.get_active_provider_config()
            .map(|p| p.api_key.clone())
            .unwrap_or_default()
    }

    /// Get the endpoint for the active provider
    pub fn get_endpoint(&self) -> String {
        self.get_active_provider_config()
            .filter(|p| !p.endpoint.is_empty())
            .map(|p| p.endpoint.clone())
            .unwrap_or_else(|| ProviderConfig::new(self.provider.clone()).endpoint)
    }

    /// Get the in-flight request limit for the active provider
    pub fn get_concurrent_requests(&self) -> usize {
        self.get_active_provider_config()
            .map(|p| p.concurrent_requests)
            .filter(|n| *n > 0)
            .unwrap_or_else(default_concurrent_requests)
    }

    /// Get the request timeout for the active provider
    pub fn get_timeout_secs(&self) -> u64 {
        self.get_active_provider_config()
            .map(|p| p.timeout_secs)
            .filter(|n| *n > 0)
            .unwrap_or_else(default_timeout_secs)
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            provider: TranslationProvider::default(),
            available_providers: vec![
                ProviderConfig::new(TranslationProvider::Google),
                ProviderConfig::new(TranslationProvider::Ollama),
                ProviderConfig::new(TranslationProvider::OpenAI),
                ProviderConfig::new(TranslationProvider::Anthropic),
                ProviderConfig::new(TranslationProvider::LMStudio),
            ],
            common: TranslationCommonConfig::default(),
        }
    }
}
