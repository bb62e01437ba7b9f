//! Ollama local model provider implementation.
//!
//! Ollama runs models locally without API keys.
//! Install from: https://ollama.ai

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::Deserialize;
use serde_json::json;

use crate::error::{Result, VaultError};

use super::prompts;
use super::provider::{
    request_error, AdvisoryConfig, AdvisoryProvider, AdvisoryRequest, AdvisoryResponse,
};

/// Default Ollama API endpoint.
const DEFAULT_API_URL: &str = "http://localhost:11434/api/chat";

/// Ollama local model provider.
pub struct OllamaProvider {
    client: Client,
    api_url: String,
    config: AdvisoryConfig,
}

impl OllamaProvider {
    /// Create a new Ollama provider with default settings.
    ///
    /// Uses the llama3.2 model by default. Make sure you've pulled it:
    /// `ollama pull llama3.2`
    pub fn new() -> Result<Self> {
        Self::with_config(Self::default_config())
    }

    /// Default configuration with a local model.
    pub fn default_config() -> AdvisoryConfig {
        AdvisoryConfig::default().with_model("llama3.2")
    }

    /// Create with a specific model.
    pub fn with_model(model: impl Into<String>) -> Result<Self> {
        Self::with_config(Self::default_config().with_model(model))
    }

    /// Create with custom configuration.
    ///
    /// The endpoint is taken from `OLLAMA_HOST` when set.
    pub fn with_config(config: AdvisoryConfig) -> Result<Self> {
        let api_url = std::env::var("OLLAMA_HOST")
            .map(|host| format!("{}/api/chat", host.trim_end_matches('/')))
            .unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        Self::with_endpoint(api_url, config)
    }

    /// Create against an explicit chat endpoint.
    pub fn with_endpoint(api_url: impl Into<String>, config: AdvisoryConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| VaultError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_url: api_url.into(),
            config,
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Build headers for API requests.
    fn build_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers
    }

    /// Send a message to Ollama.
    fn send_message(&self, user_prompt: &str) -> Result<String> {
        let body = json!({
            "model": self.config.model,
            "stream": false,
            "format": "json",
            "options": {
                "temperature": self.config.temperature,
                "num_predict": self.config.max_tokens
            },
            "messages": [
                {
                    "role": "system",
                    "content": prompts::system_prompt()
                },
                {
                    "role": "user",
                    "content": user_prompt
                }
            ]
        });

        let response = self
            .client
            .post(&self.api_url)
            .headers(self.build_headers())
            .json(&body)
            .send()
            .map_err(|e| {
                if e.is_connect() {
                    VaultError::AdvisoryUnavailable(
                        "Failed to connect to Ollama. Is it running? Start with: ollama serve"
                            .to_string(),
                    )
                } else {
                    request_error(e, &self.config)
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().unwrap_or_default();

            if error_text.contains("not found") {
                return Err(VaultError::AdvisoryUnavailable(format!(
                    "Model '{}' not found. Pull it with: ollama pull {}",
                    self.config.model, self.config.model
                )));
            }

            return Err(VaultError::AdvisoryUnavailable(format!(
                "Ollama error ({}): {}",
                status, error_text
            )));
        }

        let api_response: OllamaResponse = response.json().map_err(|e| {
            VaultError::AdvisoryUnavailable(format!("Failed to parse Ollama response: {}", e))
        })?;

        Ok(api_response.message.content)
    }
}

impl AdvisoryProvider for OllamaProvider {
    fn advise(&self, request: &AdvisoryRequest) -> Result<AdvisoryResponse> {
        let prompt = prompts::classification_prompt(request);
        let response = self.send_message(&prompt)?;
        AdvisoryResponse::parse(&response)
    }

    fn config(&self) -> &AdvisoryConfig {
        &self.config
    }

    fn name(&self) -> &str {
        "ollama"
    }
}

/// Ollama API response structure.
#[derive(Debug, Deserialize)]
struct OllamaResponse {
    message: OllamaMessage,
}

#[derive(Debug, Deserialize)]
struct OllamaMessage {
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::SemanticType;
    use std::time::Duration;

    #[test]
    fn test_explicit_endpoint_and_model() {
        let provider = OllamaProvider::with_endpoint(
            "http://127.0.0.1:9/api/chat",
            OllamaProvider::default_config().with_model("mistral"),
        )
        .unwrap();
        assert_eq!(provider.api_url(), "http://127.0.0.1:9/api/chat");
        assert_eq!(provider.config().model, "mistral");
    }

    #[test]
    fn test_unreachable_server_is_advisory_unavailable() {
        let config = AdvisoryConfig {
            timeout: Duration::from_millis(500),
            ..OllamaProvider::default_config()
        };
        // Port 9 (discard) is closed on test hosts
        let provider = OllamaProvider::with_endpoint("http://127.0.0.1:9/api/chat", config).unwrap();
        let request = AdvisoryRequest {
            column_name: "status".to_string(),
            sample_values: vec!["NEW".to_string()],
            total_rows: 1,
            null_count: 0,
            pattern_suggestion: SemanticType::Text,
        };

        let err = provider.advise(&request).unwrap_err();
        assert!(matches!(err, VaultError::AdvisoryUnavailable(_)));
    }
}
