//! Column classifier: sampled values in, [`ColumnProfile`] out.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::patterns::{
    BOOLEAN_VALUES, BUSINESS_KEY_NAMES, DATE_NAME, IDENTIFIER_NAME, NUMERIC_VALUE, SHORT_CODE,
};
use super::pii::detect_pii;
use super::relationships::{RelationshipCandidate, RelationshipResolver, TableIndex};
use super::sample::ColumnSample;
use crate::error::{Result, VaultError};
use crate::input::{DataTable, Dataset};
use crate::profile::{
    suggested_name, ColumnProfile, ColumnStatistics, SemanticType, PROFILE_SAMPLE_LIMIT,
};

/// Classifier configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Maximum number of non-missing values sampled per column.
    pub sample_size: usize,
    /// Seed for the sampling shuffle.
    pub seed: u64,
}

impl ClassifierConfig {
    /// Reject settings that would make every sample empty.
    pub fn validate(&self) -> Result<()> {
        if self.sample_size == 0 {
            return Err(VaultError::Config(
                "sample_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            sample_size: 1000,
            seed: 0,
        }
    }
}

/// A column that could not be classified in a batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedColumn {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
    pub column: String,
    pub reason: String,
}

impl SkippedColumn {
    /// `table.column`, or just the column for single-table runs.
    pub fn qualified_name(&self) -> String {
        match &self.table {
            Some(table) => format!("{}.{}", table, self.column),
            None => self.column.clone(),
        }
    }
}

/// Result of classifying every column of a table or dataset.
#[derive(Debug, Clone, Default)]
pub struct BatchProfiles {
    /// Profiles in table order, then column order.
    pub profiles: Vec<ColumnProfile>,
    pub skipped: Vec<SkippedColumn>,
}

/// Derives a [`ColumnProfile`] from a column's sampled values.
#[derive(Debug, Clone)]
pub struct ColumnClassifier {
    config: ClassifierConfig,
    resolver: RelationshipResolver,
}

impl ColumnClassifier {
    pub fn new() -> Self {
        Self::with_config(ClassifierConfig::default())
    }

    pub fn with_config(config: ClassifierConfig) -> Self {
        Self {
            config,
            resolver: RelationshipResolver::new(),
        }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Profile one column of a table.
    ///
    /// Fails only when `column` is not a header of `table`.
    pub fn analyze(&self, table: &DataTable, column: &str) -> Result<ColumnProfile> {
        self.config.validate()?;
        let col = table.require_column(column)?;
        let index = TableIndex::build(table);
        Ok(self.profile_column(&index, col, None, &[]))
    }

    /// Profile every column of a single table.
    pub fn analyze_table(&self, table: &DataTable) -> Result<BatchProfiles> {
        self.config.validate()?;
        table.ensure_not_empty()?;
        let index = TableIndex::build(table);
        let mut batch = BatchProfiles::default();
        self.collect_table(&index, None, &[], &mut batch);

        info!(
            columns = table.column_count(),
            profiled = batch.profiles.len(),
            "classified table"
        );
        Ok(batch)
    }

    /// Profile every column of every table in a dataset.
    ///
    /// Columns also look for references among the candidate keys of the
    /// other tables.
    pub fn analyze_dataset(&self, dataset: &Dataset) -> Result<BatchProfiles> {
        self.config.validate()?;
        if dataset.is_empty() || dataset.column_count() == 0 {
            return Err(VaultError::EmptyInput(
                "dataset has no columns".to_string(),
            ));
        }
        for named in dataset.tables() {
            named.table.ensure_not_empty()?;
        }

        let indexes: Vec<TableIndex<'_>> = dataset
            .tables()
            .iter()
            .map(|t| TableIndex::build(&t.table))
            .collect();

        let mut batch = BatchProfiles::default();
        for (pos, named) in dataset.tables().iter().enumerate() {
            let foreign: Vec<(&str, &TableIndex<'_>)> = dataset
                .tables()
                .iter()
                .zip(indexes.iter())
                .enumerate()
                .filter(|(other, _)| *other != pos)
                .map(|(_, (t, idx))| (t.name.as_str(), idx))
                .collect();

            self.collect_table(&indexes[pos], Some(&named.name), &foreign, &mut batch);
            info!(table = %named.name, columns = named.table.column_count(), "classified table");
        }

        Ok(batch)
    }

    fn collect_table(
        &self,
        index: &TableIndex<'_>,
        table_name: Option<&str>,
        foreign: &[(&str, &TableIndex<'_>)],
        batch: &mut BatchProfiles,
    ) {
        let table = index.table();
        for (col, header) in table.headers.iter().enumerate() {
            if header.trim().is_empty() {
                warn!(position = col, "skipping empty column header");
                batch.skipped.push(SkippedColumn {
                    table: table_name.map(str::to_string),
                    column: header.clone(),
                    reason: "empty column header".to_string(),
                });
                continue;
            }
            // Duplicate headers cannot be addressed by name
            if table.column_index(header) != Some(col) {
                warn!(column = %header, "skipping duplicate column header");
                batch.skipped.push(SkippedColumn {
                    table: table_name.map(str::to_string),
                    column: header.clone(),
                    reason: "duplicate column header".to_string(),
                });
                continue;
            }
            batch
                .profiles
                .push(self.profile_column(index, col, table_name, foreign));
        }
    }

    fn profile_column(
        &self,
        index: &TableIndex<'_>,
        col: usize,
        table_name: Option<&str>,
        foreign: &[(&str, &TableIndex<'_>)],
    ) -> ColumnProfile {
        let table = index.table();
        let header = &table.headers[col];

        let sample = ColumnSample::draw(table, col, self.config.sample_size, self.config.seed);
        let values: Vec<&str> = sample.values().collect();
        let statistics =
            ColumnStatistics::from_sample(values.iter().copied(), table.row_count(), sample.null_count());

        let (semantic_type, is_primary_key) =
            self.detect_semantic_type(header, &values, statistics.unique_ratio);
        let is_business_key =
            self.detect_business_key(header, &values, &statistics, semantic_type);

        let mut relationships = self.resolver.resolve(index, col, &sample);
        if !foreign.is_empty() {
            let across = self.resolver.resolve_across(&sample, foreign, &relationships);
            relationships.extend(across);
        }
        let references = reference_names(&relationships);

        let (pii_level, pii_rule) = detect_pii(header, &values);

        let profile = ColumnProfile {
            name: suggested_name(header),
            source_name: header.clone(),
            source_table: table_name.map(str::to_string),
            semantic_type,
            is_primary_key,
            is_business_key,
            references,
            pii_level,
            unique_ratio: statistics.unique_ratio,
            sample_values: values
                .iter()
                .take(PROFILE_SAMPLE_LIMIT)
                .map(|v| v.to_string())
                .collect(),
            statistics,
            overridden_from: None,
        };

        debug!(
            column = %profile.source_name,
            semantic_type = %profile.semantic_type,
            pk = profile.is_primary_key,
            bk = profile.is_business_key,
            references = ?profile.references,
            evidence = ?describe_relationships(&relationships),
            pii = %profile.pii_level,
            pii_rule = pii_rule.unwrap_or("-"),
            unique_ratio = profile.unique_ratio,
            "profiled column"
        );

        profile
    }

    /// First matching rule wins; only the identifier rule sets the primary key.
    fn detect_semantic_type(
        &self,
        name: &str,
        values: &[&str],
        unique_ratio: f64,
    ) -> (SemanticType, bool) {
        if unique_ratio > 0.9 && IDENTIFIER_NAME.is_match(name) {
            return (SemanticType::Identifier, true);
        }
        if DATE_NAME.is_match(name) {
            return (SemanticType::Date, false);
        }
        // An empty sample satisfies both value rules and lands on Numeric
        if values.iter().all(|v| NUMERIC_VALUE.is_match(v)) {
            return (SemanticType::Numeric, false);
        }
        if values
            .iter()
            .all(|v| BOOLEAN_VALUES.contains(&v.to_lowercase().as_str()))
        {
            return (SemanticType::Boolean, false);
        }
        (SemanticType::Text, false)
    }

    fn detect_business_key(
        &self,
        name: &str,
        values: &[&str],
        statistics: &ColumnStatistics,
        semantic_type: SemanticType,
    ) -> bool {
        if BUSINESS_KEY_NAMES.iter().any(|p| p.is_match(name)) {
            return true;
        }

        if semantic_type != SemanticType::Text {
            return false;
        }

        let unique_ratio = statistics.unique_ratio;

        // Low-cardinality short codes
        if unique_ratio < 0.3 && values.len() > 10 {
            let codes = values.iter().filter(|v| SHORT_CODE.is_match(v)).count();
            if codes as f64 / values.len() as f64 > 0.5 {
                return true;
            }
        }

        // Enum-like values
        if unique_ratio < 0.1 && statistics.distinct_count < 20 {
            return true;
        }

        unique_ratio < 0.5
    }
}

impl Default for ColumnClassifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Referenced headers in discovery order, without repeats.
fn reference_names(relationships: &[RelationshipCandidate]) -> Vec<String> {
    let mut names: Vec<String> = Vec::with_capacity(relationships.len());
    for rel in relationships {
        if !names.contains(&rel.column) {
            names.push(rel.column.clone());
        }
    }
    names
}

/// `column[heuristic score]` per candidate, for logging.
fn describe_relationships(relationships: &[RelationshipCandidate]) -> Vec<String> {
    relationships
        .iter()
        .map(|rel| {
            let target = match &rel.table {
                Some(table) => format!("{}.{}", table, rel.column),
                None => rel.column.clone(),
            };
            format!("{}[{:?} {:.2}]", target, rel.heuristic, rel.score)
        })
        .collect()
}
