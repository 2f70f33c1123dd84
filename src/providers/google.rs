use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde_json::Value;
use std::fmt;
use std::time::Duration;

use crate::errors::ProviderError;
use crate::language_utils;
use crate::providers::{error_from_response, http_client, Provider, Translator};

/// Client for the public Google translate endpoint (`client=gtx`)
pub struct Google {
    /// Base URL, normally https://translate.googleapis.com
    base_url: String,
    /// HTTP client for making requests
    client: Client,
}

/// One translation request
#[derive(Debug, Clone)]
pub struct GoogleRequest {
    pub text: String,
    pub source_language: String,
    pub target_language: String,
}

/// Raw response: nested arrays whose first element lists translated segments
#[derive(Debug, Clone)]
pub struct GoogleResponse(pub Value);

impl Google {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: http_client(timeout),
        }
    }
}

impl fmt::Debug for Google {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Google").field("base_url", &self.base_url).finish()
    }
}

#[async_trait]
impl Provider for Google {
    type Request = GoogleRequest;
    type Response = GoogleResponse;

    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError> {
        let url = format!("{}/translate_a/single", self.base_url);
        let source = language_utils::provider_code(&request.source_language)
            .unwrap_or_else(|_| request.source_language.clone());
        let target = language_utils::provider_code(&request.target_language)
            .unwrap_or_else(|_| request.target_language.clone());

        let response = self
            .client
            .get(&url)
            .query(&[
                ("client", "gtx"),
                ("sl", source.as_str()),
                ("tl", target.as_str()),
                ("dt", "t"),
                ("q", request.text.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let value: Value = response.json().await?;
        if !value.get(0).is_some_and(Value::is_array) {
            return Err(ProviderError::ParseError(
                "translation segments missing from response".to_string(),
            ));
        }
        Ok(GoogleResponse(value))
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        let request = GoogleRequest {
            text: "ciao".to_string(),
            source_language: "it".to_string(),
            target_language: "en".to_string(),
        };
        self.complete(request).await.map(|_| ())
    }

    fn extract_text(response: &Self::Response) -> String {
        response
            .0
            .get(0)
            .and_then(Value::as_array)
            .map(|segments| {
                segments
                    .iter()
                    .filter_map(|segment| segment.get(0).and_then(Value::as_str))
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl Translator for Google {
    async fn translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, ProviderError> {
        let response = self
            .complete(GoogleRequest {
                text: text.to_string(),
                source_language: source_language.to_string(),
                target_language: target_language.to_string(),
            })
            .await?;

        let translated = Self::extract_text(&response);
        if translated.is_empty() {
            return Err(ProviderError::ParseError("empty translation".to_string()));
        }
        debug!("google: {} chars -> {} chars", text.chars().count(), translated.chars().count());
        Ok(translated)
    }

    async fn check_connection(&self) -> Result<(), ProviderError> {
        self.test_connection().await
    }
}
