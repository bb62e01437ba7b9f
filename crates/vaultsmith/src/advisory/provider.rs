//! Advisory provider trait and the request, response and insight types.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Result, VaultError};
use crate::profile::{ColumnProfile, SemanticType, PROFILE_SAMPLE_LIMIT};

use super::prompts;

/// Configuration shared by advisory providers.
#[derive(Debug, Clone)]
pub struct AdvisoryConfig {
    /// Model to use (e.g., "claude-sonnet-4-20250514").
    pub model: String,

    /// Maximum tokens in response.
    pub max_tokens: usize,

    /// Temperature for generation (0.0-1.0).
    pub temperature: f64,

    /// Upper bound on a single advisory round-trip.
    pub timeout: Duration,

    /// A proposal must be strictly more confident than this to override.
    pub confidence_threshold: f64,
}

impl AdvisoryConfig {
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

impl Default for AdvisoryConfig {
    fn default() -> Self {
        Self {
            model: "claude-sonnet-4-20250514".to_string(),
            max_tokens: 1024,
            temperature: 0.2,
            timeout: Duration::from_secs(30),
            confidence_threshold: 0.8,
        }
    }
}

/// What the advisory collaborator is told about a column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisoryRequest {
    pub column_name: String,
    /// At most five sampled values.
    pub sample_values: Vec<String>,
    pub total_rows: usize,
    pub null_count: usize,
    /// Classification from the pattern rules alone.
    pub pattern_suggestion: SemanticType,
}

impl AdvisoryRequest {
    pub fn from_profile(profile: &ColumnProfile) -> Self {
        Self {
            column_name: profile.source_name.clone(),
            sample_values: profile
                .sample_values
                .iter()
                .take(PROFILE_SAMPLE_LIMIT)
                .cloned()
                .collect(),
            total_rows: profile.statistics.total_rows,
            null_count: profile.statistics.null_count,
            pattern_suggestion: profile.pattern_type(),
        }
    }
}

/// A validated advisory answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisoryResponse {
    /// Always finite and within [0, 1].
    pub confidence_score: f64,
    pub business_meaning: String,
    pub data_quality_notes: String,
    pub suggested_classification: SemanticType,
    pub reasoning: String,
    pub suggested_improvements: String,
}

/// Wire shape before validation.
#[derive(Debug, Deserialize)]
struct RawResponse {
    confidence_score: f64,
    suggested_classification: String,
    #[serde(default)]
    business_meaning: String,
    #[serde(default)]
    data_quality_notes: String,
    #[serde(default)]
    reasoning: String,
    #[serde(default)]
    suggested_improvements: String,
}

impl AdvisoryResponse {
    /// Build a response, rejecting confidences outside [0, 1].
    pub fn new(
        confidence_score: f64,
        suggested_classification: SemanticType,
        reasoning: impl Into<String>,
    ) -> Result<Self> {
        check_confidence(confidence_score)?;
        Ok(Self {
            confidence_score,
            business_meaning: String::new(),
            data_quality_notes: String::new(),
            suggested_classification,
            reasoning: reasoning.into(),
            suggested_improvements: String::new(),
        })
    }

    pub fn with_business_meaning(mut self, meaning: impl Into<String>) -> Self {
        self.business_meaning = meaning.into();
        self
    }

    pub fn with_data_quality_notes(mut self, notes: impl Into<String>) -> Self {
        self.data_quality_notes = notes.into();
        self
    }

    pub fn with_suggested_improvements(mut self, improvements: impl Into<String>) -> Self {
        self.suggested_improvements = improvements.into();
        self
    }

    /// Parse model output, tolerating a surrounding markdown code fence.
    ///
    /// Anything that is not a JSON object of the expected shape, carries
    /// an out-of-range confidence, or names an unknown classification is
    /// reported as [`VaultError::AdvisoryUnavailable`].
    pub fn parse(text: &str) -> Result<Self> {
        let body = prompts::strip_code_fence(text);
        let raw: RawResponse = serde_json::from_str(body).map_err(|e| {
            VaultError::AdvisoryUnavailable(format!("malformed advisory response: {}", e))
        })?;

        check_confidence(raw.confidence_score)?;
        let suggested_classification: SemanticType =
            raw.suggested_classification.parse().map_err(|_| {
                VaultError::AdvisoryUnavailable(format!(
                    "unknown classification '{}'",
                    raw.suggested_classification
                ))
            })?;

        Ok(Self {
            confidence_score: raw.confidence_score,
            business_meaning: raw.business_meaning,
            data_quality_notes: raw.data_quality_notes,
            suggested_classification,
            reasoning: raw.reasoning,
            suggested_improvements: raw.suggested_improvements,
        })
    }
}

fn check_confidence(confidence: f64) -> Result<()> {
    if confidence.is_finite() && (0.0..=1.0).contains(&confidence) {
        Ok(())
    } else {
        Err(VaultError::AdvisoryUnavailable(format!(
            "confidence {} outside [0, 1]",
            confidence
        )))
    }
}

/// Where an insight came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightSource {
    Advisory,
    Fallback,
}

/// Advisory outcome recorded next to each profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisoryInsight {
    pub confidence: f64,
    pub proposed_type: SemanticType,
    pub business_meaning: String,
    pub data_quality_notes: String,
    pub suggested_improvements: String,
    pub reasoning: String,
    pub source: InsightSource,
    /// Why the pattern-only result was used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<String>,
    pub override_applied: bool,
}

impl AdvisoryInsight {
    pub fn from_response(response: AdvisoryResponse) -> Self {
        Self {
            confidence: response.confidence_score,
            proposed_type: response.suggested_classification,
            business_meaning: response.business_meaning,
            data_quality_notes: response.data_quality_notes,
            suggested_improvements: response.suggested_improvements,
            reasoning: response.reasoning,
            source: InsightSource::Advisory,
            fallback_reason: None,
            override_applied: false,
        }
    }

    /// Pattern-only insight used when no advisory answer is available.
    pub fn fallback(profile: &ColumnProfile, reason: impl Into<String>) -> Self {
        let reason = reason.into();
        Self {
            confidence: 0.6,
            proposed_type: profile.semantic_type,
            business_meaning: format!("Pattern: {}", profile.semantic_type),
            data_quality_notes: reason.clone(),
            suggested_improvements: String::new(),
            reasoning: "Pattern-only".to_string(),
            source: InsightSource::Fallback,
            fallback_reason: Some(reason),
            override_applied: false,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.source == InsightSource::Fallback
    }

    /// Whether the proposal matches the pattern-only classification.
    pub fn agrees_with(&self, profile: &ColumnProfile) -> bool {
        self.proposed_type == profile.pattern_type()
    }
}

/// Apply an advisory proposal to a profile.
///
/// The type is replaced only when the proposal came from the advisory
/// collaborator, is strictly more confident than `threshold`, differs
/// from the current type, and the profile has not been overridden before.
/// Returns whether the override happened.
pub fn merge(profile: &mut ColumnProfile, insight: &mut AdvisoryInsight, threshold: f64) -> bool {
    if insight.source != InsightSource::Advisory
        || insight.confidence <= threshold
        || insight.proposed_type == profile.semantic_type
        || profile.overridden_from.is_some()
    {
        return false;
    }

    debug!(
        column = %profile.source_name,
        from = %profile.semantic_type,
        to = %insight.proposed_type,
        confidence = insight.confidence,
        "advisory override"
    );
    profile.overridden_from = Some(profile.semantic_type);
    profile.semantic_type = insight.proposed_type;
    insight.override_applied = true;
    true
}

/// Ask a provider about a profile, degrading to a fallback insight.
///
/// Never fails: a missing provider or any provider error yields a
/// [`InsightSource::Fallback`] insight with the reason recorded.
pub fn consult(provider: Option<&dyn AdvisoryProvider>, profile: &ColumnProfile) -> AdvisoryInsight {
    let Some(provider) = provider else {
        return AdvisoryInsight::fallback(profile, "advisory disabled");
    };

    let request = AdvisoryRequest::from_profile(profile);
    match provider.advise(&request) {
        Ok(response) => AdvisoryInsight::from_response(response),
        Err(e) => {
            warn!(
                column = %profile.source_name,
                provider = provider.name(),
                error = %e,
                "advisory failed, using pattern-only result"
            );
            AdvisoryInsight::fallback(profile, e.to_string())
        }
    }
}

/// Map a transport failure, calling out timeouts explicitly.
pub(crate) fn request_error(e: reqwest::Error, config: &AdvisoryConfig) -> VaultError {
    if e.is_timeout() {
        VaultError::AdvisoryUnavailable(format!(
            "request timed out after {}s",
            config.timeout.as_secs_f64()
        ))
    } else {
        VaultError::AdvisoryUnavailable(format!("API request failed: {}", e))
    }
}

/// Trait for advisory providers.
///
/// Implementations must be thread-safe (Send + Sync) to allow
/// sharing across analysis operations.
pub trait AdvisoryProvider: Send + Sync {
    /// Propose a classification for one column.
    ///
    /// Network problems, timeouts and unparseable answers are reported as
    /// [`VaultError::AdvisoryUnavailable`].
    fn advise(&self, request: &AdvisoryRequest) -> Result<AdvisoryResponse>;

    /// Get the configuration for this provider.
    fn config(&self) -> &AdvisoryConfig;

    /// Get the name of this provider (for logging/debugging).
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{ColumnStatistics, PiiLevel};

    fn profile(semantic_type: SemanticType) -> ColumnProfile {
        ColumnProfile {
            name: "region_name".to_string(),
            source_name: "Region Name".to_string(),
            source_table: None,
            semantic_type,
            is_primary_key: false,
            is_business_key: false,
            references: vec![],
            pii_level: PiiLevel::Low,
            unique_ratio: 0.4,
            sample_values: vec!["north".to_string(), "south".to_string()],
            statistics: ColumnStatistics {
                total_rows: 12,
                null_count: 2,
                sample_size: 10,
                distinct_count: 4,
                unique_ratio: 0.4,
                ..Default::default()
            },
            overridden_from: None,
        }
    }

    fn advisory(confidence: f64, proposed: SemanticType) -> AdvisoryInsight {
        AdvisoryInsight::from_response(AdvisoryResponse::new(confidence, proposed, "test").unwrap())
    }

    #[test]
    fn test_parse_fenced_response() {
        let text = r#"```json
{
  "confidence_score": 0.92,
  "business_meaning": "Sales territory",
  "data_quality_notes": "",
  "suggested_classification": "Business_Key",
  "reasoning": "Small set of repeated labels",
  "suggested_improvements": "Use a lookup table"
}
```"#;
        let response = AdvisoryResponse::parse(text).unwrap();
        assert_eq!(response.suggested_classification, SemanticType::BusinessKey);
        assert_eq!(response.business_meaning, "Sales territory");
    }

    #[test]
    fn test_parse_defaults_missing_text_fields() {
        let response =
            AdvisoryResponse::parse(r#"{"confidence_score": 0.5, "suggested_classification": "text"}"#)
                .unwrap();
        assert!(response.reasoning.is_empty());
        assert!(response.suggested_improvements.is_empty());
    }

    #[test]
    fn test_parse_rejects_bad_shapes() {
        for text in [
            "not json at all",
            r#"{"confidence_score": 1.5, "suggested_classification": "text"}"#,
            r#"{"confidence_score": 0.9, "suggested_classification": "currency"}"#,
            r#"{"suggested_classification": "text"}"#,
            r#"{"confidence_score": "high", "suggested_classification": "text"}"#,
        ] {
            let err = AdvisoryResponse::parse(text).unwrap_err();
            assert!(matches!(err, VaultError::AdvisoryUnavailable(_)), "{}", text);
        }
    }

    #[test]
    fn test_new_rejects_non_finite() {
        assert!(AdvisoryResponse::new(f64::NAN, SemanticType::Text, "").is_err());
        assert!(AdvisoryResponse::new(-0.1, SemanticType::Text, "").is_err());
    }

    #[test]
    fn test_merge_overrides_above_threshold() {
        let mut p = profile(SemanticType::Text);
        let mut insight = advisory(0.95, SemanticType::BusinessKey);

        assert!(merge(&mut p, &mut insight, 0.8));
        assert_eq!(p.semantic_type, SemanticType::BusinessKey);
        assert_eq!(p.overridden_from, Some(SemanticType::Text));
        assert_eq!(p.pattern_type(), SemanticType::Text);
        assert!(insight.override_applied);
    }

    #[test]
    fn test_merge_threshold_is_strict() {
        let mut p = profile(SemanticType::Text);
        let mut insight = advisory(0.8, SemanticType::BusinessKey);

        assert!(!merge(&mut p, &mut insight, 0.8));
        assert_eq!(p.semantic_type, SemanticType::Text);
        assert!(!insight.override_applied);
    }

    #[test]
    fn test_merge_happens_once() {
        let mut p = profile(SemanticType::Text);
        merge(&mut p, &mut advisory(0.9, SemanticType::BusinessKey), 0.8);

        let mut second = advisory(0.99, SemanticType::Date);
        assert!(!merge(&mut p, &mut second, 0.8));
        assert_eq!(p.semantic_type, SemanticType::BusinessKey);
    }

    #[test]
    fn test_fallback_never_overrides() {
        let mut p = profile(SemanticType::Text);
        let mut insight = AdvisoryInsight::fallback(&p, "timeout");
        insight.confidence = 1.0;
        insight.proposed_type = SemanticType::Date;

        assert!(!merge(&mut p, &mut insight, 0.8));
        assert_eq!(p.semantic_type, SemanticType::Text);
    }

    #[test]
    fn test_consult_without_provider() {
        let p = profile(SemanticType::Numeric);
        let insight = consult(None, &p);

        assert!(insight.is_fallback());
        assert_eq!(insight.confidence, 0.6);
        assert_eq!(insight.proposed_type, SemanticType::Numeric);
        assert_eq!(insight.reasoning, "Pattern-only");
        assert_eq!(insight.fallback_reason.as_deref(), Some("advisory disabled"));
        assert!(insight.agrees_with(&p));
    }

    #[test]
    fn test_request_from_profile() {
        let request = AdvisoryRequest::from_profile(&profile(SemanticType::Text));
        assert_eq!(request.column_name, "Region Name");
        assert_eq!(request.total_rows, 12);
        assert_eq!(request.null_count, 2);
        assert_eq!(request.pattern_suggestion, SemanticType::Text);
    }
}
