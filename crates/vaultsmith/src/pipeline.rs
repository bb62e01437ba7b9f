//! Main Vaultsmith struct and public API.

use std::path::Path;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::advisory::{consult, merge, AdvisoryInsight, AdvisoryProvider};
use crate::classify::{BatchProfiles, ClassifierConfig, ColumnClassifier, SkippedColumn};
use crate::error::Result;
use crate::input::{DataTable, Dataset, Parser, ParserConfig, SourceMetadata};
use crate::profile::ColumnProfile;
use crate::vault::{BuilderConfig, SchemaBuilder, SchemaModel};

/// Model name used when none is given.
pub const DEFAULT_MODEL_NAME: &str = "AutoGeneratedVault";

/// Configuration for a Vaultsmith run.
#[derive(Debug, Clone)]
pub struct VaultsmithConfig {
    /// Parser configuration.
    pub parser: ParserConfig,
    /// Sampling configuration for the classifier.
    pub classifier: ClassifierConfig,
    /// Schema builder configuration.
    pub builder: BuilderConfig,
    /// Name given to models built by [`Vaultsmith::analyze`].
    pub model_name: String,
}

impl Default for VaultsmithConfig {
    fn default() -> Self {
        Self {
            parser: ParserConfig::default(),
            classifier: ClassifierConfig::default(),
            builder: BuilderConfig::default(),
            model_name: DEFAULT_MODEL_NAME.to_string(),
        }
    }
}

/// A column profile with the advisory outcome that shaped it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifiedColumn {
    pub profile: ColumnProfile,
    pub insight: AdvisoryInsight,
}

/// Result of a full pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineResult {
    /// Metadata about the source files, if any were read.
    pub sources: Vec<SourceMetadata>,
    /// Profiles in table order, then column order.
    pub columns: Vec<ClassifiedColumn>,
    /// Columns that could not be classified.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedColumn>,
    /// The inferred vault model.
    pub model: SchemaModel,
    /// Summary statistics.
    pub summary: AnalysisSummary,
}

impl PipelineResult {
    pub fn profiles(&self) -> impl Iterator<Item = &ColumnProfile> {
        self.columns.iter().map(|c| &c.profile)
    }

    /// Find a classified column by its original header.
    pub fn column(&self, source_name: &str) -> Option<&ClassifiedColumn> {
        self.columns
            .iter()
            .find(|c| c.profile.source_name == source_name)
    }
}

/// Summary of the analysis results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisSummary {
    /// Columns seen, classified or not.
    pub total_columns: usize,
    pub classified_columns: usize,
    pub skipped_columns: usize,
    /// Columns where the advisory proposal matched the pattern-only type.
    pub pattern_advisory_agreement: usize,
    /// Agreement as a percentage of classified columns, one decimal.
    pub agreement_percentage: f64,
    /// Final semantic types, in first-seen order.
    pub classification_breakdown: IndexMap<String, usize>,
    pub pii_breakdown: IndexMap<String, usize>,
    pub advisory_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advisory_provider: Option<String>,
    pub overrides_applied: usize,
    pub hubs: usize,
    pub links: usize,
    pub satellites: usize,
}

/// The main Vaultsmith engine.
pub struct Vaultsmith {
    config: VaultsmithConfig,
    parser: Parser,
    classifier: ColumnClassifier,
    builder: SchemaBuilder,
    advisory: Option<Arc<dyn AdvisoryProvider>>,
}

impl Vaultsmith {
    /// Create a new Vaultsmith instance with default configuration.
    pub fn new() -> Self {
        Self::with_config(VaultsmithConfig::default())
    }

    /// Create a Vaultsmith instance with custom configuration.
    pub fn with_config(config: VaultsmithConfig) -> Self {
        let parser = Parser::with_config(config.parser.clone());
        let classifier = ColumnClassifier::with_config(config.classifier.clone());
        let builder = SchemaBuilder::with_config(config.builder.clone());

        Self {
            config,
            parser,
            classifier,
            builder,
            advisory: None,
        }
    }

    /// Add an advisory provider.
    ///
    /// Every classified column is then sent to the provider, and a
    /// sufficiently confident proposal replaces the pattern-only type.
    /// Provider failures never fail the run.
    pub fn with_advisory(mut self, provider: impl AdvisoryProvider + 'static) -> Self {
        self.advisory = Some(Arc::new(provider));
        self
    }

    /// Share an already boxed provider.
    pub fn with_shared_advisory(mut self, provider: Arc<dyn AdvisoryProvider>) -> Self {
        self.advisory = Some(provider);
        self
    }

    pub fn config(&self) -> &VaultsmithConfig {
        &self.config
    }

    /// Analyze a single data file.
    pub fn analyze(&self, path: impl AsRef<Path>) -> Result<PipelineResult> {
        self.analyze_files(&[path.as_ref()])
    }

    /// Analyze several files as one dataset, one table per file.
    pub fn analyze_files<P: AsRef<Path>>(&self, paths: &[P]) -> Result<PipelineResult> {
        let (dataset, sources) = self.parser.parse_dataset(paths)?;
        let mut result = self.analyze_dataset(&dataset, &self.config.model_name)?;
        result.sources = sources;
        Ok(result)
    }

    /// Analyze an in-memory table.
    pub fn analyze_table(&self, table: &DataTable, model_name: &str) -> Result<PipelineResult> {
        let batch = self.classifier.analyze_table(table)?;
        Ok(self.finish(batch, model_name))
    }

    /// Analyze an in-memory dataset, resolving references across tables.
    pub fn analyze_dataset(&self, dataset: &Dataset, model_name: &str) -> Result<PipelineResult> {
        let batch = self.classifier.analyze_dataset(dataset)?;
        Ok(self.finish(batch, model_name))
    }

    /// Advisory merge, schema building and summary.
    fn finish(&self, batch: BatchProfiles, model_name: &str) -> PipelineResult {
        let provider = self.advisory.as_deref();
        let threshold = provider.map(|p| p.config().confidence_threshold);

        let columns: Vec<ClassifiedColumn> = batch
            .profiles
            .into_iter()
            .map(|mut profile| {
                let mut insight = consult(provider, &profile);
                if let Some(threshold) = threshold {
                    merge(&mut profile, &mut insight, threshold);
                }
                ClassifiedColumn { profile, insight }
            })
            .collect();

        let profiles: Vec<ColumnProfile> = columns.iter().map(|c| c.profile.clone()).collect();
        let model = self.builder.build(&profiles, model_name);
        let summary = self.compute_summary(&columns, batch.skipped.len(), &model);

        info!(
            model = %model.model_name,
            columns = summary.classified_columns,
            skipped = summary.skipped_columns,
            overrides = summary.overrides_applied,
            "pipeline finished"
        );

        PipelineResult {
            sources: Vec::new(),
            columns,
            skipped: batch.skipped,
            model,
            summary,
        }
    }

    /// Compute summary statistics from analysis results.
    fn compute_summary(
        &self,
        columns: &[ClassifiedColumn],
        skipped: usize,
        model: &SchemaModel,
    ) -> AnalysisSummary {
        let classified = columns.len();

        let agreement = columns
            .iter()
            .filter(|c| c.insight.agrees_with(&c.profile))
            .count();
        let agreement_percentage = if classified == 0 {
            0.0
        } else {
            (agreement as f64 / classified as f64 * 1000.0).round() / 10.0
        };

        let mut classification_breakdown = IndexMap::new();
        let mut pii_breakdown = IndexMap::new();
        for column in columns {
            *classification_breakdown
                .entry(column.profile.semantic_type.to_string())
                .or_insert(0) += 1;
            *pii_breakdown
                .entry(column.profile.pii_level.to_string())
                .or_insert(0) += 1;
        }

        AnalysisSummary {
            total_columns: classified + skipped,
            classified_columns: classified,
            skipped_columns: skipped,
            pattern_advisory_agreement: agreement,
            agreement_percentage,
            classification_breakdown,
            pii_breakdown,
            advisory_enabled: self.advisory.is_some(),
            advisory_provider: self.advisory.as_ref().map(|p| p.name().to_string()),
            overrides_applied: columns.iter().filter(|c| c.insight.override_applied).count(),
            hubs: model.hubs().len(),
            links: model.links().len(),
            satellites: model.satellites().len(),
        }
    }
}

impl Default for Vaultsmith {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisory::{InsightSource, MockProvider, MockReply};
    use crate::error::VaultError;
    use crate::profile::SemanticType;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn segment_table() -> DataTable {
        DataTable::from_columns(vec![
            ("account_id", (1..=8).map(|i| format!("A{:03}", i)).collect::<Vec<_>>()),
            (
                "segment",
                ["gold", "silver", "bronze", "gold", "silver", "gold", "x1", "x2"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
            ),
        ])
    }

    #[test]
    fn test_analyze_simple_csv() {
        let content = "customer_id,amount,is_active\nC1,10.5,true\nC2,3,false\nC3,7,true\n";
        let file = create_test_file(content);

        let result = Vaultsmith::new().analyze(file.path()).unwrap();

        assert_eq!(result.columns.len(), 3);
        assert_eq!(result.sources.len(), 1);
        assert_eq!(result.sources[0].row_count, 3);
        assert_eq!(result.model.model_name, DEFAULT_MODEL_NAME);
        assert!(!result.summary.advisory_enabled);
        assert_eq!(result.summary.agreement_percentage, 100.0);
    }

    #[test]
    fn test_empty_file_fails_before_classification() {
        let file = create_test_file("a,b\n");
        let err = Vaultsmith::new().analyze(file.path()).unwrap_err();
        assert!(matches!(err, VaultError::EmptyInput(_)));
    }

    #[test]
    fn test_advisory_override_is_applied() {
        let provider = MockProvider::new().with_reply(
            "segment",
            MockReply::Propose {
                classification: SemanticType::BusinessKey,
                confidence: 0.93,
            },
        );
        let result = Vaultsmith::new()
            .with_advisory(provider)
            .analyze_table(&segment_table(), "Accounts")
            .unwrap();

        let segment = result.column("segment").unwrap();
        assert_eq!(segment.profile.semantic_type, SemanticType::BusinessKey);
        assert_eq!(segment.profile.overridden_from, Some(SemanticType::Text));
        assert!(segment.insight.override_applied);
        assert_eq!(result.summary.overrides_applied, 1);
        assert_eq!(result.summary.advisory_provider.as_deref(), Some("mock"));
        assert!(result.model.hub("SEGMENT").is_some());
    }

    #[test]
    fn test_advisory_timeout_keeps_pattern_type() {
        let provider = MockProvider::new().with_default_reply(MockReply::Timeout);
        let plain = Vaultsmith::new()
            .analyze_table(&segment_table(), "Accounts")
            .unwrap();
        let result = Vaultsmith::new()
            .with_advisory(provider)
            .analyze_table(&segment_table(), "Accounts")
            .unwrap();

        for (a, b) in plain.profiles().zip(result.profiles()) {
            assert_eq!(a.semantic_type, b.semantic_type);
        }
        for column in &result.columns {
            assert_eq!(column.insight.source, InsightSource::Fallback);
            assert!(column.insight.fallback_reason.as_deref().unwrap().contains("timed out"));
        }
        assert_eq!(result.summary.overrides_applied, 0);
    }

    #[test]
    fn test_summary_breakdowns() {
        let result = Vaultsmith::new()
            .analyze_table(&segment_table(), "Accounts")
            .unwrap();
        let summary = &result.summary;

        assert_eq!(summary.total_columns, 2);
        assert_eq!(summary.classification_breakdown.get("identifier"), Some(&1));
        assert_eq!(summary.classification_breakdown.get("text"), Some(&1));
        assert_eq!(summary.pii_breakdown.values().sum::<usize>(), 2);
        assert_eq!(summary.hubs, result.model.hubs().len());
    }
}
