/*!
 * Provider implementations for different translation services.
 *
 * This module contains client implementations for the supported backends:
 * - Google: public translate endpoint, no key needed
 * - Ollama: Local LLM server
 * - OpenAI: OpenAI API integration (also used for LM Studio)
 * - Anthropic: Anthropic API integration
 * - Mock: deterministic stand-in for tests
 *
 * Clients make exactly one attempt per call. Retrying is the job of
 * `translation::client::TranslationClient`.
 */

use anyhow::Result;
use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use crate::app_config::{TranslationConfig, TranslationProvider};
use crate::errors::ProviderError;

/// Common trait for all HTTP providers
///
/// This trait defines the wire-level interface of a provider, with its own
/// request and response types.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// The request type for this provider
    type Request: Send + Sync;

    /// The response type for this provider
    type Response: Send + Sync;

    /// Complete a request using this provider
    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError>;

    /// Test the connection to the provider
    async fn test_connection(&self) -> Result<(), ProviderError>;

    /// Extract text from the provider response
    fn extract_text(response: &Self::Response) -> String;
}

/// Text-in, text-out view of a provider, used by the translation engine
#[async_trait]
pub trait Translator: Send + Sync + Debug {
    /// Translate one piece of text between two language codes
    async fn translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, ProviderError>;

    /// Check that the backend is reachable before a run
    async fn check_connection(&self) -> Result<(), ProviderError> {
        Ok(())
    }
}

/// Build the translator selected in the configuration
pub fn from_config(config: &TranslationConfig) -> Result<Arc<dyn Translator>> {
    let endpoint = config.get_endpoint();
    let timeout = Duration::from_secs(config.get_timeout_secs());

    let translator: Arc<dyn Translator> = match config.provider {
        TranslationProvider::Google => Arc::new(google::Google::new(endpoint, timeout)),
        TranslationProvider::Ollama => Arc::new(ollama::Ollama::new(
            endpoint,
            config.get_model(),
            config.common.system_prompt.clone(),
            config.common.temperature,
            timeout,
        )),
        TranslationProvider::OpenAI | TranslationProvider::LMStudio => Arc::new(openai::OpenAI::new(
            endpoint,
            config.get_api_key(),
            config.get_model(),
            config.common.system_prompt.clone(),
            config.common.temperature,
            timeout,
        )),
        TranslationProvider::Anthropic => Arc::new(anthropic::Anthropic::new(
            endpoint,
            config.get_api_key(),
            config.get_model(),
            config.common.system_prompt.clone(),
            config.common.temperature,
            timeout,
        )),
    };

    Ok(translator)
}

/// Fill the `{source_language}`/`{target_language}` placeholders of a system prompt
pub fn render_system_prompt(template: &str, source_language: &str, target_language: &str) -> String {
    let source = crate::language_utils::get_language_name(source_language)
        .unwrap_or_else(|_| source_language.to_string());
    let target = crate::language_utils::get_language_name(target_language)
        .unwrap_or_else(|_| target_language.to_string());
    template
        .replace("{source_language}", &source)
        .replace("{target_language}", &target)
}

/// Shared HTTP client setup
pub(crate) fn http_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .pool_idle_timeout(Duration::from_secs(90))
        .tcp_keepalive(Duration::from_secs(60))
        .build()
        .unwrap_or_default()
}

/// Turn a non-success response into a provider error, keeping the body for context
pub(crate) async fn error_from_response(response: reqwest::Response) -> ProviderError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    let message: String = body.chars().take(300).collect();
    ProviderError::from_status(status, message)
}

pub mod anthropic;
pub mod google;
pub mod mock;
pub mod ollama;
pub mod openai;
