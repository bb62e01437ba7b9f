//! Result files written by the analyze command.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;
use vaultsmith::PipelineResult;

pub const MODEL_SUMMARY_FILE: &str = "model_summary.json";
pub const COLUMN_PROFILES_FILE: &str = "column_profiles.csv";
pub const PIPELINE_REPORT_FILE: &str = "pipeline_report.txt";

/// Sample values carried into the profile CSV.
const CSV_SAMPLE_VALUES: usize = 3;

type BoxResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Write all result files into `output_dir`, creating it if needed.
///
/// Returns the written paths in a stable order.
pub fn write_results(result: &PipelineResult, output_dir: &Path) -> BoxResult<Vec<PathBuf>> {
    fs::create_dir_all(output_dir)
        .map_err(|e| format!("Cannot create {}: {}", output_dir.display(), e))?;

    let summary_path = output_dir.join(MODEL_SUMMARY_FILE);
    fs::write(&summary_path, serde_json::to_string_pretty(&model_summary(result))?)?;
    tracing::info!(path = %summary_path.display(), "Model summary saved");

    let profiles_path = output_dir.join(COLUMN_PROFILES_FILE);
    write_column_profiles(result, &profiles_path)?;
    tracing::info!(path = %profiles_path.display(), "Column profiles saved");

    let report_path = output_dir.join(PIPELINE_REPORT_FILE);
    fs::write(&report_path, pipeline_report(result))?;
    tracing::info!(path = %report_path.display(), "Pipeline report saved");

    Ok(vec![summary_path, profiles_path, report_path])
}

fn input_files(result: &PipelineResult) -> Vec<&str> {
    result.sources.iter().map(|s| s.file.as_str()).collect()
}

/// Model structure plus run metadata and summary counters.
pub fn model_summary(result: &PipelineResult) -> serde_json::Value {
    let model = &result.model;
    json!({
        "metadata": {
            "model_name": model.model_name,
            "generated_at": model.created_at.to_rfc3339(),
            "input_files": input_files(result),
            "total_columns": model.total_columns_analyzed,
        },
        "hubs": model.hubs().iter().map(|h| json!({
            "name": h.name,
            "business_keys": h.business_keys,
            "hash_key": h.hash_key,
        })).collect::<Vec<_>>(),
        "links": model.links().iter().map(|l| json!({
            "name": l.name,
            "hub_references": l.hub_references,
            "hash_key": l.hash_key,
        })).collect::<Vec<_>>(),
        "satellites": model.satellites().iter().map(|s| json!({
            "name": s.name,
            "parent_table": s.parent_table,
            "columns": s.columns,
            "satellite_type": s.satellite_type,
        })).collect::<Vec<_>>(),
        "summary": result.summary,
    })
}

fn write_column_profiles(result: &PipelineResult, path: &Path) -> BoxResult<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record([
        "source_table",
        "column_name",
        "data_type",
        "is_primary_key",
        "is_business_key",
        "foreign_key_references",
        "pii_level",
        "unique_ratio",
        "sample_values",
        "advisory_source",
    ])?;

    for column in &result.columns {
        let p = &column.profile;
        let samples: Vec<&str> = p
            .sample_values
            .iter()
            .take(CSV_SAMPLE_VALUES)
            .map(String::as_str)
            .collect();
        writer.write_record([
            p.source_table.clone().unwrap_or_default(),
            p.name.clone(),
            p.semantic_type.to_string(),
            p.is_primary_key.to_string(),
            p.is_business_key.to_string(),
            p.references.join("|"),
            p.pii_level.to_string(),
            format!("{:.3}", p.unique_ratio),
            samples.join("|"),
            serde_json::to_value(column.insight.source)?
                .as_str()
                .unwrap_or_default()
                .to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// Human-readable run report.
pub fn pipeline_report(result: &PipelineResult) -> String {
    let model = &result.model;
    let summary = &result.summary;
    let mut lines = vec![
        "Vaultsmith Pipeline Report".to_string(),
        "=".repeat(50),
        format!("Generated: {}", model.created_at.format("%Y-%m-%d %H:%M:%S")),
        format!("Input Files: {}", input_files(result).join(", ")),
        format!("Model Name: {}", model.model_name),
        String::new(),
        "MODEL SUMMARY:".to_string(),
        format!("  Total Columns Analyzed: {}", model.total_columns_analyzed),
        format!("  Columns Skipped: {}", summary.skipped_columns),
        format!("  Hubs Generated: {}", model.hubs().len()),
        format!("  Links Generated: {}", model.links().len()),
        format!("  Satellites Generated: {}", model.satellites().len()),
        format!("  PII Satellites: {}", model.pii_satellite_count()),
    ];

    if summary.advisory_enabled {
        lines.push(format!(
            "  Advisory Provider: {}",
            summary.advisory_provider.as_deref().unwrap_or("unknown")
        ));
        lines.push(format!(
            "  Pattern/Advisory Agreement: {}/{} ({:.1}%)",
            summary.pattern_advisory_agreement, summary.classified_columns, summary.agreement_percentage
        ));
        lines.push(format!("  Overrides Applied: {}", summary.overrides_applied));
    }
    lines.push(String::new());

    if !model.hubs().is_empty() {
        lines.push("HUBS:".to_string());
        for hub in model.hubs() {
            lines.push(format!("  - {}", hub.name));
            lines.push(format!("    Business Keys: {}", hub.business_keys.join(", ")));
        }
        lines.push(String::new());
    }

    if !model.links().is_empty() {
        lines.push("LINKS:".to_string());
        for link in model.links() {
            lines.push(format!("  - {}", link.name));
            lines.push(format!("    Connects: {}", link.hub_references.join(", ")));
        }
        lines.push(String::new());
    }

    if !model.satellites().is_empty() {
        lines.push("SATELLITES:".to_string());
        for sat in model.satellites() {
            lines.push(format!("  - {} [{}]", sat.name, sat.satellite_type));
            lines.push(format!("    Parent: {}", sat.parent_table));
            lines.push(format!("    Columns: {}", sat.columns.join(", ")));
        }
        lines.push(String::new());
    }

    if !result.skipped.is_empty() {
        lines.push("SKIPPED COLUMNS:".to_string());
        for skipped in &result.skipped {
            lines.push(format!(
                "  - {}: {}",
                skipped.qualified_name(),
                skipped.reason
            ));
        }
        lines.push(String::new());
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use vaultsmith::{DataTable, Dataset, MockProvider, Vaultsmith};

    fn sample_result() -> PipelineResult {
        let table = DataTable::from_columns(vec![
            (
                "customer_id",
                (1..=10).map(|i| format!("CUST_{:06}", i)).collect::<Vec<_>>(),
            ),
            (
                "contact_email",
                (1..=10).map(|i| format!("user{}@example.com", i % 5)).collect(),
            ),
        ]);
        Vaultsmith::new()
            .with_advisory(MockProvider::new())
            .analyze_table(&table, "ReportVault")
            .unwrap()
    }

    #[test]
    fn test_write_results_creates_all_files() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("nested").join("results");
        let paths = write_results(&sample_result(), &out).unwrap();

        assert_eq!(paths.len(), 3);
        for path in &paths {
            assert!(path.exists(), "missing {}", path.display());
        }
    }

    #[test]
    fn test_model_summary_shape() {
        let summary = model_summary(&sample_result());
        assert_eq!(summary["metadata"]["model_name"], "ReportVault");
        assert_eq!(summary["metadata"]["total_columns"], 2);
        assert_eq!(summary["hubs"][0]["name"], "CUSTOMER_ID");
        assert_eq!(summary["satellites"][0]["satellite_type"], "PII");
        assert_eq!(summary["summary"]["advisory_enabled"], true);
    }

    #[test]
    fn test_column_profiles_csv() {
        let dir = TempDir::new().unwrap();
        let paths = write_results(&sample_result(), dir.path()).unwrap();
        let content = fs::read_to_string(&paths[1]).unwrap();
        let mut lines = content.lines();

        assert!(lines.next().unwrap().starts_with("source_table,column_name,data_type"));
        let first = lines.next().unwrap();
        assert!(first.contains("customer_id,identifier,true"));
        assert!(first.contains("1.000"));
        // At most three pipe-joined samples
        let samples = first.split(',').nth(8).unwrap();
        assert!(samples.split('|').count() <= 3);
    }

    #[test]
    fn test_pipeline_report_sections() {
        let report = pipeline_report(&sample_result());
        assert!(report.contains("Model Name: ReportVault"));
        assert!(report.contains("HUBS:"));
        assert!(report.contains("  - CUSTOMER_ID"));
        assert!(report.contains("SATELLITES:"));
        assert!(report.contains("Advisory Provider: mock"));
        assert!(!report.contains("LINKS:"));
    }

    #[test]
    fn test_pipeline_report_lists_skipped_columns() {
        let orders = DataTable::new(
            vec!["order_id".to_string(), "order_id".to_string(), String::new()],
            vec![
                vec!["ORD_1".to_string(), "x".to_string(), "1".to_string()],
                vec!["ORD_2".to_string(), "y".to_string(), "2".to_string()],
            ],
            b',',
        );
        let dataset = Dataset::new().with_table("orders", orders);
        let result = Vaultsmith::new()
            .analyze_dataset(&dataset, "SkipVault")
            .unwrap();
        assert_eq!(result.skipped.len(), 2);

        let report = pipeline_report(&result);
        assert!(report.contains("SKIPPED COLUMNS:"));
        assert!(report.contains("  - orders.order_id: duplicate column header"));
        assert!(report.contains("  - orders.: empty column header"));
        assert!(report.contains("Columns Skipped: 2"));
    }
}
