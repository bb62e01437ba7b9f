//! Closed classification enums shared by profiles and the vault model.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Semantic role of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SemanticType {
    /// Technical row identifier (e.g., customer_id with unique values).
    Identifier,
    /// Natural, human-meaningful key (code, category, status).
    BusinessKey,
    /// Date or date-part column.
    Date,
    /// Integer or decimal values.
    Numeric,
    /// Free or categorical text.
    Text,
    /// true/false/0/1 flags.
    Boolean,
}

impl SemanticType {
    pub const ALL: [SemanticType; 6] = [
        SemanticType::Identifier,
        SemanticType::BusinessKey,
        SemanticType::Date,
        SemanticType::Numeric,
        SemanticType::Text,
        SemanticType::Boolean,
    ];

    /// Lower snake-case name, as used in prompts and reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            SemanticType::Identifier => "identifier",
            SemanticType::BusinessKey => "business_key",
            SemanticType::Date => "date",
            SemanticType::Numeric => "numeric",
            SemanticType::Text => "text",
            SemanticType::Boolean => "boolean",
        }
    }

    /// Whether the type marks a column as a Hub candidate.
    pub fn is_key(&self) -> bool {
        matches!(self, SemanticType::Identifier | SemanticType::BusinessKey)
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SemanticType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        SemanticType::ALL
            .into_iter()
            .find(|t| t.as_str() == normalized)
            .ok_or_else(|| format!("unknown semantic type '{}'", s))
    }
}

/// Ordered PII sensitivity of a column's values.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum PiiLevel {
    #[default]
    None,
    Low,
    Medium,
    High,
}

impl PiiLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            PiiLevel::None => "none",
            PiiLevel::Low => "low",
            PiiLevel::Medium => "medium",
            PiiLevel::High => "high",
        }
    }
}

impl fmt::Display for PiiLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
