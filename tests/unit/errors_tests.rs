/*!
 * Tests for error types
 */

use rpgtl::errors::{AppError, DocumentError, ProviderError, ReflowError, SchemaAnomaly};

/// HTTP statuses map onto the closest provider error
#[test]
fn test_provider_error_from_status_withKnownStatuses_shouldMapVariants() {
    assert_eq!(
        ProviderError::from_status(401, "bad key"),
        ProviderError::AuthenticationError("bad key".to_string())
    );
    assert_eq!(
        ProviderError::from_status(403, "forbidden"),
        ProviderError::AuthenticationError("forbidden".to_string())
    );
    assert_eq!(
        ProviderError::from_status(429, "slow down"),
        ProviderError::RateLimitExceeded("slow down".to_string())
    );
    assert_eq!(
        ProviderError::from_status(500, "boom"),
        ProviderError::ApiError {
            status_code: 500,
            message: "boom".to_string()
        }
    );
}

/// Error messages carry their context
#[test]
fn test_error_display_withContext_shouldIncludeDetails() {
    let error = ProviderError::ApiError {
        status_code: 503,
        message: "unavailable".to_string(),
    };
    assert_eq!(error.to_string(), "API responded with error: 503 - unavailable");

    assert_eq!(
        SchemaAnomaly::AnswerArity { found: 3 }.to_string(),
        "choice answer expects 2 parameters, found 3"
    );
    assert_eq!(
        SchemaAnomaly::EmptyChoice { index: 1 }.to_string(),
        "choice list entry 1 is empty"
    );
    assert!(ReflowError::ZeroWidth.to_string().contains("greater than zero"));

    let shape = DocumentError::UnexpectedShape {
        expected: "array",
        location: "/events".to_string(),
    };
    assert_eq!(shape.to_string(), "unexpected document shape: expected array at /events");
}

/// Lower-level errors convert into the application error
#[test]
fn test_app_error_conversions_withLowerLevelErrors_shouldWrap() {
    let app: AppError = ProviderError::ConnectionError("refused".to_string()).into();
    assert!(matches!(app, AppError::Provider(_)));

    let app: AppError = DocumentError::Unsupported("System.json".to_string()).into();
    assert_eq!(app.to_string(), "Document error: unsupported document: System.json");

    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
    assert!(matches!(AppError::from(io), AppError::File(_)));

    let app: AppError = anyhow::anyhow!("other").into();
    assert_eq!(app.to_string(), "Unknown error: other");
}
