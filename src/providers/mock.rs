/*!
 * Mock translator for testing.
 *
 * This module provides a deterministic translator that simulates different behaviors:
 * - `MockTranslator::echo()` - Returns the input unchanged
 * - `MockTranslator::tagged()` - Prefixes the input with the target language
 * - `MockTranslator::dictionary(..)` - Looks the input up, errors on unknown text
 * - `MockTranslator::failing()` - Always fails with an error
 *
 * Any behavior can be combined with `fail_first(n)` (the first n calls error)
 * and `with_delay(..)` (every call sleeps before answering).
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::errors::ProviderError;
use crate::providers::Translator;

/// Behavior mode for the mock translator
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Return the text unchanged
    Echo,
    /// Return `[<target>] <text>`
    Tagged,
    /// Exact lookup; unknown text is an API error
    Dictionary(HashMap<String, String>),
    /// Always fail
    Failing,
}

/// Mock translator that never touches the network
#[derive(Debug, Clone)]
pub struct MockTranslator {
    behavior: MockBehavior,
    /// Calls that fail before the behavior kicks in
    fail_first: usize,
    /// Simulated latency per call
    delay: Option<Duration>,
    /// Total calls, including failed ones
    request_count: Arc<AtomicUsize>,
    /// Texts received, in call order
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockTranslator {
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            fail_first: 0,
            delay: None,
            request_count: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn echo() -> Self {
        Self::new(MockBehavior::Echo)
    }

    pub fn tagged() -> Self {
        Self::new(MockBehavior::Tagged)
    }

    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    pub fn dictionary<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self::new(MockBehavior::Dictionary(map))
    }

    /// Fail the first `failures` calls with a connection error
    pub fn fail_first(mut self, failures: usize) -> Self {
        self.fail_first = failures;
        self
    }

    /// Sleep before every answer
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of calls made so far
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Texts received so far
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl Translator for MockTranslator {
    async fn translate(
        &self,
        text: &str,
        _source_language: &str,
        target_language: &str,
    ) -> Result<String, ProviderError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().push(text.to_string());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if count < self.fail_first {
            return Err(ProviderError::ConnectionError(format!(
                "simulated failure {} of {}",
                count + 1,
                self.fail_first
            )));
        }

        match &self.behavior {
            MockBehavior::Echo => Ok(text.to_string()),
            MockBehavior::Tagged => Ok(format!("[{}] {}", target_language, text)),
            MockBehavior::Dictionary(map) => map.get(text).cloned().ok_or_else(|| {
                ProviderError::ApiError {
                    status_code: 404,
                    message: format!("no mock entry for {:?}", text),
                }
            }),
            MockBehavior::Failing => Err(ProviderError::ConnectionError(
                "mock provider is configured to fail".to_string(),
            )),
        }
    }
}
