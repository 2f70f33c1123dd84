/*!
 * Translation client.
 *
 * Wraps a `Translator` with the rules every unit goes through: case
 * normalization of the first letter, a bound on in-flight provider calls,
 * and a fixed-delay retry loop that degrades to the original text instead
 * of failing.
 */

use log::debug;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

use crate::app_config::TranslationCommonConfig;
use crate::errors::ProviderError;
use crate::providers::Translator;

/// Fixed-delay retry policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first failed attempt
    pub max_retries: u32,
    /// Delay before every retry
    pub backoff: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, backoff: Duration) -> Self {
        Self { max_retries, backoff }
    }

    pub fn from_config(common: &TranslationCommonConfig) -> Self {
        Self::new(common.retry_count, Duration::from_millis(common.retry_backoff_ms))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(10, Duration::from_secs(1))
    }
}

/// Result of translating one unit
#[derive(Debug, Clone, PartialEq)]
pub enum TranslationOutcome {
    /// The provider answered
    Translated(String),
    /// Every attempt failed; `text` is the untranslated input
    Degraded {
        text: String,
        reason: ProviderError,
        attempts: u32,
    },
}

impl TranslationOutcome {
    pub fn text(&self) -> &str {
        match self {
            TranslationOutcome::Translated(text) => text,
            TranslationOutcome::Degraded { text, .. } => text,
        }
    }

    pub fn is_translated(&self) -> bool {
        matches!(self, TranslationOutcome::Translated(_))
    }

    /// `(text, success)` pair
    pub fn into_parts(self) -> (String, bool) {
        match self {
            TranslationOutcome::Translated(text) => (text, true),
            TranslationOutcome::Degraded { text, .. } => (text, false),
        }
    }
}

/// Lowercase the first letter of `translated` when the source started with a
/// lowercase letter, so continuation lines keep mid-sentence casing.
pub fn normalize_case(original: &str, translated: &str) -> String {
    let (Some(source_first), Some(target_first)) = (original.chars().next(), translated.chars().next()) else {
        return translated.to_string();
    };

    if source_first.is_alphabetic() && target_first.is_alphabetic() && !source_first.is_uppercase() {
        let mut result: String = target_first.to_lowercase().collect();
        result.push_str(&translated[target_first.len_utf8()..]);
        result
    } else {
        translated.to_string()
    }
}

/// Keep a leading space that the provider trimmed away
pub fn preserve_leading_space(original: &str, translated: &str) -> String {
    if original.starts_with(' ') && !translated.starts_with(' ') {
        format!(" {}", translated)
    } else {
        translated.to_string()
    }
}

/// Provider wrapper shared by every unit of a run
#[derive(Debug, Clone)]
pub struct TranslationClient {
    translator: Arc<dyn Translator>,
    source_language: String,
    target_language: String,
    retry: RetryPolicy,
    limiter: Arc<Semaphore>,
}

impl TranslationClient {
    pub fn new(
        translator: Arc<dyn Translator>,
        source_language: impl Into<String>,
        target_language: impl Into<String>,
    ) -> Self {
        Self {
            translator,
            source_language: source_language.into(),
            target_language: target_language.into(),
            retry: RetryPolicy::default(),
            limiter: Arc::new(Semaphore::new(4)),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Bound the number of provider calls in flight at once
    pub fn with_concurrency_limit(mut self, limit: usize) -> Self {
        self.limiter = Arc::new(Semaphore::new(limit.max(1)));
        self
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// One provider call, with case normalization
    pub async fn translate_one(&self, text: &str) -> Result<String, ProviderError> {
        let _permit = self
            .limiter
            .acquire()
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;

        let translated = self
            .translator
            .translate(text, &self.source_language, &self.target_language)
            .await?;

        Ok(normalize_case(text, &translated))
    }

    /// Translate, retrying up to `max_retries` times after a fixed delay.
    /// Never fails: exhausting the retries yields the original text.
    pub async fn translate_with_retry(&self, text: &str) -> TranslationOutcome {
        let mut last_error = match self.translate_one(text).await {
            Ok(translated) => return TranslationOutcome::Translated(translated),
            Err(e) => e,
        };

        for attempt in 1..=self.retry.max_retries {
            debug!("Retry {}/{} after: {}", attempt, self.retry.max_retries, last_error);
            tokio::time::sleep(self.retry.backoff).await;

            match self.translate_one(text).await {
                Ok(translated) => return TranslationOutcome::Translated(translated),
                Err(e) => last_error = e,
            }
        }

        TranslationOutcome::Degraded {
            text: text.to_string(),
            reason: last_error,
            attempts: self.retry.max_retries + 1,
        }
    }
}
