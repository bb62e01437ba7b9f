//! Mock advisory provider for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::{Result, VaultError};
use crate::profile::SemanticType;

use super::provider::{AdvisoryConfig, AdvisoryProvider, AdvisoryRequest, AdvisoryResponse};

/// How the mock answers one column.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Return this classification with this confidence.
    Propose {
        classification: SemanticType,
        confidence: f64,
    },
    /// Feed this text through the normal response parser.
    Raw(String),
    /// Behave as if the round-trip exceeded the configured timeout.
    Timeout,
    /// Fail with this message.
    Fail(String),
}

/// Mock provider that returns predictable responses for testing.
///
/// Unscripted columns get the pattern suggestion echoed back at
/// confidence 0.85, which never triggers an override.
pub struct MockProvider {
    config: AdvisoryConfig,
    scripted: HashMap<String, MockReply>,
    fallback: Option<MockReply>,
    calls: AtomicUsize,
}

impl MockProvider {
    /// Create a new mock provider.
    pub fn new() -> Self {
        Self::with_config(AdvisoryConfig::default().with_model("mock"))
    }

    /// Create with custom configuration.
    pub fn with_config(config: AdvisoryConfig) -> Self {
        Self {
            config,
            scripted: HashMap::new(),
            fallback: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Script the reply for a column, matched by its original header.
    pub fn with_reply(mut self, column: impl Into<String>, reply: MockReply) -> Self {
        self.scripted.insert(column.into(), reply);
        self
    }

    /// Reply used for every column without a script.
    pub fn with_default_reply(mut self, reply: MockReply) -> Self {
        self.fallback = Some(reply);
        self
    }

    /// Number of `advise` calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }

    fn echo(request: &AdvisoryRequest) -> Result<AdvisoryResponse> {
        let response = AdvisoryResponse::new(
            0.85,
            request.pattern_suggestion,
            format!(
                "Column '{}' looks like {} data based on {} sample values.",
                request.column_name,
                request.pattern_suggestion,
                request.sample_values.len()
            ),
        )?;
        Ok(response
            .with_business_meaning(format!("Values of {}", request.column_name))
            .with_data_quality_notes(format!(
                "{} of {} rows missing",
                request.null_count, request.total_rows
            )))
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl AdvisoryProvider for MockProvider {
    fn advise(&self, request: &AdvisoryRequest) -> Result<AdvisoryResponse> {
        self.calls.fetch_add(1, Ordering::Relaxed);

        let reply = self
            .scripted
            .get(&request.column_name)
            .or(self.fallback.as_ref());

        match reply {
            None => Self::echo(request),
            Some(MockReply::Propose {
                classification,
                confidence,
            }) => AdvisoryResponse::new(
                *confidence,
                *classification,
                format!("Scripted proposal for '{}'", request.column_name),
            ),
            Some(MockReply::Raw(text)) => AdvisoryResponse::parse(text),
            Some(MockReply::Timeout) => Err(VaultError::AdvisoryUnavailable(format!(
                "request timed out after {}s",
                self.config.timeout.as_secs_f64()
            ))),
            Some(MockReply::Fail(message)) => {
                Err(VaultError::AdvisoryUnavailable(message.clone()))
            }
        }
    }

    fn config(&self) -> &AdvisoryConfig {
        &self.config
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(column: &str) -> AdvisoryRequest {
        AdvisoryRequest {
            column_name: column.to_string(),
            sample_values: vec!["A".to_string(), "B".to_string()],
            total_rows: 10,
            null_count: 1,
            pattern_suggestion: SemanticType::Text,
        }
    }

    #[test]
    fn test_mock_echoes_pattern() {
        let provider = MockProvider::new();
        let response = provider.advise(&request("segment")).unwrap();

        assert_eq!(response.suggested_classification, SemanticType::Text);
        assert_eq!(response.confidence_score, 0.85);
        assert!(response.reasoning.contains("segment"));
        assert_eq!(provider.calls(), 1);
    }

    #[test]
    fn test_scripted_replies() {
        let provider = MockProvider::new()
            .with_reply(
                "segment",
                MockReply::Propose {
                    classification: SemanticType::BusinessKey,
                    confidence: 0.95,
                },
            )
            .with_reply("notes", MockReply::Timeout)
            .with_reply("blob", MockReply::Raw("{not json".to_string()));

        let proposed = provider.advise(&request("segment")).unwrap();
        assert_eq!(proposed.suggested_classification, SemanticType::BusinessKey);

        let timeout = provider.advise(&request("notes")).unwrap_err();
        assert!(timeout.to_string().contains("timed out"));

        assert!(matches!(
            provider.advise(&request("blob")),
            Err(VaultError::AdvisoryUnavailable(_))
        ));
        assert_eq!(provider.calls(), 3);
    }

    #[test]
    fn test_default_reply() {
        let provider =
            MockProvider::new().with_default_reply(MockReply::Fail("unauthenticated".to_string()));
        let err = provider.advise(&request("anything")).unwrap_err();
        assert!(err.to_string().contains("unauthenticated"));
    }
}
