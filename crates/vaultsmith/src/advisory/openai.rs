//! OpenAI GPT API provider implementation.

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;
use serde_json::json;

use crate::error::{Result, VaultError};

use super::prompts;
use super::provider::{
    request_error, AdvisoryConfig, AdvisoryProvider, AdvisoryRequest, AdvisoryResponse,
};

/// OpenAI API endpoint.
const API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// OpenAI GPT provider.
pub struct OpenAIProvider {
    client: Client,
    api_key: String,
    config: AdvisoryConfig,
}

impl OpenAIProvider {
    /// Create a new OpenAI provider with the given API key.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(api_key, Self::default_config())
    }

    /// Default configuration with an OpenAI model.
    pub fn default_config() -> AdvisoryConfig {
        AdvisoryConfig::default().with_model("gpt-4o")
    }

    /// Create a new OpenAI provider with custom configuration.
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
        Self::from_env_with_config(Self::default_config())
    }

    pub fn from_env_with_config(config: AdvisoryConfig) -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| {
            VaultError::Config("OPENAI_API_KEY environment variable not set".to_string())
        })?;
        Self::with_config(api_key, config)
    }

    /// Build headers for API requests.
    fn build_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.api_key))
                .map_err(|e| VaultError::Config(format!("Invalid API key: {}", e)))?,
        );
        Ok(headers)
    }

    /// Send a message to the OpenAI API.
    fn send_message(&self, user_prompt: &str) -> Result<String> {
        let body = json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
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
            .post(API_URL)
            .headers(self.build_headers()?)
            .json(&body)
            .send()
            .map_err(|e| request_error(e, &self.config))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().unwrap_or_default();
            return Err(VaultError::AdvisoryUnavailable(format!(
                "OpenAI API error ({}): {}",
                status, error_text
            )));
        }

        let api_response: OpenAIResponse = response.json().map_err(|e| {
            VaultError::AdvisoryUnavailable(format!("Failed to parse API response: {}", e))
        })?;

        api_response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| VaultError::AdvisoryUnavailable("No response from OpenAI".to_string()))
    }
}

impl AdvisoryProvider for OpenAIProvider {
    fn advise(&self, request: &AdvisoryRequest) -> Result<AdvisoryResponse> {
        let prompt = prompts::classification_prompt(request);
        let response = self.send_message(&prompt)?;
        AdvisoryResponse::parse(&response)
    }

    fn config(&self) -> &AdvisoryConfig {
        &self.config
    }

    fn name(&self) -> &str {
        "openai"
    }
}

/// OpenAI API response structure.
#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Debug, Deserialize)]
struct Message {
    content: String,
}
