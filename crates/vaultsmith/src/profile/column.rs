//! Column profile and sampled statistics.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::types::{PiiLevel, SemanticType};

/// Maximum number of sample values carried on a profile.
pub const PROFILE_SAMPLE_LIMIT: usize = 5;

/// Statistics computed over one column's sampled values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnStatistics {
    /// Total rows in the source table (including missing values).
    pub total_rows: usize,
    /// Number of missing values.
    pub null_count: usize,
    /// Number of values in the sample.
    pub sample_size: usize,
    /// Number of distinct values in the sample.
    pub distinct_count: usize,
    /// distinct_count / sample_size, 0 for an empty sample.
    pub unique_ratio: f64,
    /// Value frequencies in first-seen sample order.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub value_counts: IndexMap<String, usize>,
}

impl ColumnStatistics {
    /// Compute statistics from sampled values.
    pub fn from_sample<'a>(
        sample: impl IntoIterator<Item = &'a str>,
        total_rows: usize,
        null_count: usize,
    ) -> Self {
        let mut value_counts: IndexMap<String, usize> = IndexMap::new();
        let mut sample_size = 0;
        for value in sample {
            sample_size += 1;
            *value_counts.entry(value.to_string()).or_insert(0) += 1;
        }

        let distinct_count = value_counts.len();
        let unique_ratio = if sample_size == 0 {
            0.0
        } else {
            distinct_count as f64 / sample_size as f64
        };

        Self {
            total_rows,
            null_count,
            sample_size,
            distinct_count,
            unique_ratio,
            value_counts,
        }
    }

    /// Missing values as a percentage of all rows.
    pub fn null_percentage(&self) -> f64 {
        if self.total_rows == 0 {
            0.0
        } else {
            (self.null_count as f64 / self.total_rows as f64) * 100.0
        }
    }
}

/// Everything the classifier knows about one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnProfile {
    /// Sanitized lower-snake name.
    pub name: String,
    /// Original header.
    pub source_name: String,
    /// Table the column was read from, for multi-table datasets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_table: Option<String>,
    pub semantic_type: SemanticType,
    pub is_primary_key: bool,
    pub is_business_key: bool,
    /// Headers of columns this column is believed to reference, in discovery order.
    #[serde(default)]
    pub references: Vec<String>,
    pub pii_level: PiiLevel,
    pub unique_ratio: f64,
    /// First sampled values, at most [`PROFILE_SAMPLE_LIMIT`].
    #[serde(default)]
    pub sample_values: Vec<String>,
    pub statistics: ColumnStatistics,
    /// Pattern-only type, set when the advisory layer replaced it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overridden_from: Option<SemanticType>,
}

impl ColumnProfile {
    /// Whether the profile seeds a Hub.
    pub fn is_hub_candidate(&self) -> bool {
        self.is_primary_key || self.is_business_key || self.semantic_type.is_key()
    }

    /// Whether the profile holds at least one foreign-key reference.
    pub fn has_references(&self) -> bool {
        !self.references.is_empty()
    }

    /// Descriptive columns are neither keys nor reference holders.
    pub fn is_descriptive(&self) -> bool {
        !(self.is_primary_key || self.is_business_key || self.has_references())
    }

    /// The classification produced by pattern rules alone.
    pub fn pattern_type(&self) -> SemanticType {
        self.overridden_from.unwrap_or(self.semantic_type)
    }
}

/// Sanitize a header: every run of non-alphanumeric characters becomes
/// one underscore, then lower-case.
pub fn suggested_name(header: &str) -> String {
    let mut out = String::with_capacity(header.len());
    let mut in_run = false;
    for ch in header.chars() {
        if ch.is_ascii_alphanumeric() {
            out.push(ch.to_ascii_lowercase());
            in_run = false;
        } else if !in_run {
            out.push('_');
            in_run = true;
        }
    }
    out
}
