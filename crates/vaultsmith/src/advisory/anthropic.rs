//! Anthropic Claude API provider implementation.

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::Deserialize;
use serde_json::json;

use crate::error::{Result, VaultError};

use super::prompts;
use super::provider::{
    request_error, AdvisoryConfig, AdvisoryProvider, AdvisoryRequest, AdvisoryResponse,
};

/// Anthropic API endpoint.
const API_URL: &str = "https://api.anthropic.com/v1/messages";

/// Anthropic API version.
const API_VERSION: &str = "2023-06-01";

/// Anthropic Claude provider.
pub struct AnthropicProvider {
    client: Client,
    api_key: String,
    config: AdvisoryConfig,
}

impl AnthropicProvider {
    /// Create a new Anthropic provider with the given API key.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(api_key, AdvisoryConfig::default())
    }

    /// Create a new Anthropic provider with custom configuration.
    pub fn with_config(api_key: impl Into<String>, config: AdvisoryConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| VaultError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            config,
        })
    }

    /// Create from environment variable.
    pub fn from_env() -> Result<Self> {
        Self::from_env_with_config(AdvisoryConfig::default())
    }

    pub fn from_env_with_config(config: AdvisoryConfig) -> Result<Self> {
        let api_key = std::env::var("ANTHROPIC_API_KEY").map_err(|_| {
            VaultError::Config("ANTHROPIC_API_KEY environment variable not set".to_string())
        })?;
        Self::with_config(api_key, config)
    }

    /// Build headers for API requests.
    fn build_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            "x-api-key",
            HeaderValue::from_str(&self.api_key)
                .map_err(|e| VaultError::Config(format!("Invalid API key: {}", e)))?,
        );
        headers.insert("anthropic-version", HeaderValue::from_static(API_VERSION));
        Ok(headers)
    }

    /// Send a message to the Claude API.
    fn send_message(&self, user_prompt: &str) -> Result<String> {
        let body = json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
            "system": prompts::system_prompt(),
            "messages": [
                {
                    "role": "user",
                    "content": user_prompt
                }
            ]
        });

        let response = self
            .client
            .post(API_URL)
            .headers(self.build_headers()?)
            .json(&body)
            .send()
            .map_err(|e| request_error(e, &self.config))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().unwrap_or_default();
            return Err(VaultError::AdvisoryUnavailable(format!(
                "Anthropic API error ({}): {}",
                status, error_text
            )));
        }

        let api_response: ApiResponse = response.json().map_err(|e| {
            VaultError::AdvisoryUnavailable(format!("Failed to parse API response: {}", e))
        })?;

        api_response
            .content
            .into_iter()
            .find_map(|block| {
                if block.content_type == "text" {
                    Some(block.text)
                } else {
                    None
                }
            })
            .ok_or_else(|| VaultError::AdvisoryUnavailable("No text in API response".to_string()))
    }
}

impl AdvisoryProvider for AnthropicProvider {
    fn advise(&self, request: &AdvisoryRequest) -> Result<AdvisoryResponse> {
        let prompt = prompts::classification_prompt(request);
        let response = self.send_message(&prompt)?;
        AdvisoryResponse::parse(&response)
    }

    fn config(&self) -> &AdvisoryConfig {
        &self.config
    }

    fn name(&self) -> &str {
        "anthropic"
    }
}

/// Anthropic API response structure.
#[derive(Debug, Deserialize)]
struct ApiResponse {
    content: Vec<ContentBlock>,
}

/// Content block in API response.
#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    content_type: String,
    #[serde(default)]
    text: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_timeout_comes_from_config() {
        let config = AdvisoryConfig {
            timeout: Duration::from_secs(5),
            ..Default::default()
        };
        let provider = AnthropicProvider::with_config("test", config).unwrap();
        assert_eq!(provider.config().timeout, Duration::from_secs(5));
        assert_eq!(provider.name(), "anthropic");
    }

    #[test]
    fn test_api_response_text_block() {
        let raw = r#"{"content":[{"type":"text","text":"{\"confidence_score\":0.9,\"suggested_classification\":\"date\"}"}]}"#;
        let parsed: ApiResponse = serde_json::from_str(raw).unwrap();
        let text = &parsed.content[0].text;
        let response = AdvisoryResponse::parse(text).unwrap();
        assert_eq!(response.confidence_score, 0.9);
    }

    #[test]
    fn test_invalid_api_key_header() {
        let provider = AnthropicProvider::new("bad\nkey").unwrap();
        assert!(matches!(provider.build_headers(), Err(VaultError::Config(_))));
    }
}
