//! Profile command - print column profiles for a single file.

use std::path::PathBuf;

use colored::Colorize;
use vaultsmith::{ClassifierConfig, ColumnClassifier, PiiLevel, Parser};

pub fn run(
    file: PathBuf,
    json_output: bool,
    sample_size: usize,
    seed: u64,
) -> Result<(), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }

    let (table, source) = Parser::new().parse_file(&file)?;
    let classifier = ColumnClassifier::with_config(ClassifierConfig { sample_size, seed });
    let batch = classifier.analyze_table(&table)?;

    if json_output {
        let output = serde_json::json!({
            "file": source.file,
            "row_count": source.row_count,
            "column_count": source.column_count,
            "profiles": batch.profiles,
            "skipped": batch.skipped,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!(
        "{} {} ({} rows, {} columns)",
        "Profiles for".cyan().bold(),
        source.file.white(),
        source.row_count,
        source.column_count
    );
    println!();

    for p in &batch.profiles {
        let pii = match p.pii_level {
            PiiLevel::High => p.pii_level.to_string().red().bold(),
            PiiLevel::Medium => p.pii_level.to_string().yellow(),
            PiiLevel::Low => p.pii_level.to_string().blue(),
            PiiLevel::None => p.pii_level.to_string().normal(),
        };
        let mut flags = Vec::new();
        if p.is_primary_key {
            flags.push("PK");
        }
        if p.is_business_key {
            flags.push("BK");
        }

        println!(
            "  {:28} {:14} {:6} unique={:.3} {}",
            p.name.white().bold(),
            p.semantic_type.to_string(),
            pii,
            p.unique_ratio,
            flags.join(",").green()
        );
        if !p.references.is_empty() {
            println!("  {:28} -> {}", "", p.references.join(", ").dimmed());
        }
    }

    for skipped in &batch.skipped {
        println!(
            "  {} {}: {}",
            "skipped".yellow(),
            skipped.column,
            skipped.reason
        );
    }

    Ok(())
}
