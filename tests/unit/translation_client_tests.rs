/*!
 * Tests for the translation client: casing, limits and retries
 */

use std::sync::Arc;
use std::time::{Duration, Instant};

use rpgtl::errors::ProviderError;
use rpgtl::providers::mock::MockTranslator;
use rpgtl::translation::{RetryPolicy, TranslationClient, TranslationOutcome};

fn client(mock: &MockTranslator, retries: u32) -> TranslationClient {
    TranslationClient::new(Arc::new(mock.clone()), "it", "en").with_retry_policy(RetryPolicy::new(retries, Duration::ZERO))
}

/// A lowercase source keeps a lowercase translation
#[tokio::test]
async fn test_translate_one_withLowercaseSource_shouldLowercaseTranslation() {
    let mock = MockTranslator::dictionary([("hello", "Ciao"), ("Hello", "Ciao")]);
    let client = client(&mock, 0);

    assert_eq!(client.translate_one("hello").await.unwrap(), "ciao");
    assert_eq!(client.translate_one("Hello").await.unwrap(), "Ciao");
}

/// Provider errors surface from a single call
#[tokio::test]
async fn test_translate_one_withFailingProvider_shouldReturnError() {
    let mock = MockTranslator::failing();
    let result = client(&mock, 3).translate_one("ciao").await;

    assert!(matches!(result, Err(ProviderError::ConnectionError(_))));
    assert_eq!(mock.request_count(), 1);
}

/// Exhausted retries give back the original text, never an error
#[tokio::test]
async fn test_translate_with_retry_withAlwaysFailingProvider_shouldDegradeToOriginal() {
    let mock = MockTranslator::failing();
    let outcome = client(&mock, 3).translate_with_retry("Ciao mondo").await;

    match &outcome {
        TranslationOutcome::Degraded { text, reason, attempts } => {
            assert_eq!(text, "Ciao mondo");
            assert!(matches!(reason, ProviderError::ConnectionError(_)));
            assert_eq!(*attempts, 4);
        }
        other => panic!("expected a degraded outcome, got {:?}", other),
    }
    assert_eq!(outcome.clone().into_parts(), ("Ciao mondo".to_string(), false));
    assert!(!outcome.is_translated());
    assert_eq!(mock.request_count(), 4);
}

/// A transient failure is absorbed by the retry loop
#[tokio::test]
async fn test_translate_with_retry_withTransientFailures_shouldSucceed() {
    let mock = MockTranslator::tagged().fail_first(2);
    let outcome = client(&mock, 2).translate_with_retry("Ciao").await;

    assert_eq!(outcome, TranslationOutcome::Translated("[en] Ciao".to_string()));
    assert_eq!(outcome.text(), "[en] Ciao");
    assert_eq!(mock.request_count(), 3);
}

/// Zero retries means exactly one attempt
#[tokio::test]
async fn test_translate_with_retry_withZeroRetries_shouldTryOnce() {
    let mock = MockTranslator::failing();
    let client = client(&mock, 0);
    assert_eq!(client.retry_policy().max_retries, 0);
    let outcome = client.translate_with_retry("Ciao").await;

    assert!(!outcome.is_translated());
    assert_eq!(mock.request_count(), 1);
}

/// Every retry waits for the fixed backoff
#[tokio::test]
async fn test_translate_with_retry_withBackoff_shouldWaitBetweenAttempts() {
    let mock = MockTranslator::failing();
    let client = TranslationClient::new(Arc::new(mock.clone()), "it", "en")
        .with_retry_policy(RetryPolicy::new(2, Duration::from_millis(25)));

    let start = Instant::now();
    client.translate_with_retry("Ciao").await;
    assert!(start.elapsed() >= Duration::from_millis(50));
    assert_eq!(mock.request_count(), 3);
}

/// The client never has more calls in flight than its limit
#[tokio::test]
async fn test_concurrency_limit_withOnePermit_shouldSerializeCalls() {
    let mock = MockTranslator::echo().with_delay(Duration::from_millis(30));
    let client = client(&mock, 0).with_concurrency_limit(1);

    let start = Instant::now();
    let (a, b) = tokio::join!(client.translate_one("a"), client.translate_one("b"));
    assert_eq!(a.unwrap(), "a");
    assert_eq!(b.unwrap(), "b");
    assert!(start.elapsed() >= Duration::from_millis(60));
}

/// The default policy matches the documented retry behavior
#[test]
fn test_retry_policy_default_withNoParameters_shouldRetryTenTimesEverySecond() {
    let policy = RetryPolicy::default();
    assert_eq!(policy.max_retries, 10);
    assert_eq!(policy.backoff, Duration::from_secs(1));
}
