//! Prompt templates for advisory calls.

use crate::profile::SemanticType;

use super::provider::AdvisoryRequest;

/// System prompt shared by every provider.
pub fn system_prompt() -> &'static str {
    r#"You are a data engineering assistant for Vaultsmith, a tool that derives Data Vault 2.0 models from tabular data.

Your role is to classify database columns into one of a fixed set of semantic classes
and to describe what the column means to the business.

Guidelines:
- Be concise and specific
- Base the classification on the column name and the sample values together
- Only disagree with the pattern suggestion when the evidence is clear
- Report your confidence honestly; low confidence is acceptable
- Always respond with valid JSON when requested"#
}

/// Build the classification prompt for one column.
pub fn classification_prompt(request: &AdvisoryRequest) -> String {
    let sample_str = if request.sample_values.is_empty() {
        "No samples available".to_string()
    } else {
        request
            .sample_values
            .iter()
            .map(|s| format!("  - \"{}\"", s))
            .collect::<Vec<_>>()
            .join("\n")
    };

    let allowed = SemanticType::ALL
        .iter()
        .map(|t| t.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r#"Classify the database column '{}'.

## Allowed classes
{}

## Sample Values
{}

## Column Statistics
- Total rows: {}
- Missing values: {}
- Pattern suggestion: {}

## Task
Return ONLY valid JSON with exactly these keys:
{{
  "confidence_score": 0.0-1.0,
  "business_meaning": "What the column represents",
  "data_quality_notes": "Any quality issues noticed",
  "suggested_classification": "one of the allowed classes",
  "reasoning": "Why you chose this class",
  "suggested_improvements": "How the column could be improved"
}}"#,
        request.column_name,
        allowed,
        sample_str,
        request.total_rows,
        request.null_count,
        request.pattern_suggestion,
    )
}

/// Extract the JSON body from a reply that may wrap it in a markdown fence.
pub fn strip_code_fence(response: &str) -> &str {
    if response.contains("```json") {
        response
            .split("```json")
            .nth(1)
            .and_then(|s| s.split("```").next())
            .map(|s| s.trim())
            .unwrap_or(response)
    } else if response.contains("```") {
        response
            .split("```")
            .nth(1)
            .map(|s| s.trim())
            .unwrap_or(response)
    } else {
        response.trim()
    }
}
