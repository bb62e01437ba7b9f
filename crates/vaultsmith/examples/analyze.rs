//! Example: Infer a Data Vault model from one or more tabular files.
//!
//! Usage:
//!   cargo run --example analyze -- <file_path>...
//!
//! Example:
//!   cargo run --example analyze -- customers.csv orders.csv

use std::env;
use std::path::Path;

use vaultsmith::{MockProvider, Vaultsmith};

fn main() -> vaultsmith::Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();

    if args.is_empty() {
        eprintln!("Usage: cargo run --example analyze -- <file_path>...");
        eprintln!("\nExample:");
        eprintln!("  cargo run --example analyze -- customers.csv orders.csv");
        std::process::exit(1);
    }

    for file_path in &args {
        if !Path::new(file_path).exists() {
            eprintln!("Error: File not found: {}", file_path);
            std::process::exit(1);
        }
    }

    let separator = "=".repeat(80);
    println!("{}", separator);
    println!("Vaultsmith Analysis: {}", args.join(", "));
    println!("{}", separator);
    println!();

    // Mock advisory so the example runs without an API key
    let vaultsmith = Vaultsmith::new().with_advisory(MockProvider::new());
    let result = vaultsmith.analyze_files(&args)?;

    println!("## Sources");
    for source in &result.sources {
        println!(
            "  {} ({}, {} rows, {} columns)",
            source.file, source.format, source.row_count, source.column_count
        );
    }
    println!();

    println!("## Profiles ({} columns)", result.columns.len());
    println!();
    for column in &result.columns {
        let p = &column.profile;
        println!(
            "  {:24} {:14} pii={:<6} pk={:<5} bk={:<5} unique={:.3}",
            p.name,
            p.semantic_type.to_string(),
            p.pii_level.to_string(),
            p.is_primary_key,
            p.is_business_key,
            p.unique_ratio
        );
        if !p.references.is_empty() {
            println!("  {:24} references: {}", "", p.references.join(", "));
        }
    }
    println!();

    let model = &result.model;
    println!("## Hubs ({})", model.hubs().len());
    for hub in model.hubs() {
        println!("  {} [{}]", hub.name, hub.business_keys.join(", "));
    }
    println!();

    println!("## Links ({})", model.links().len());
    for link in model.links() {
        println!("  {} -> {}", link.name, link.hub_references.join(", "));
    }
    println!();

    println!("## Satellites ({})", model.satellites().len());
    for sat in model.satellites() {
        println!("  {} ({}) on {}", sat.name, sat.satellite_type, sat.parent_table);
    }
    println!();

    println!("## Summary");
    println!(
        "  Agreement: {}/{} ({:.1}%)",
        result.summary.pattern_advisory_agreement,
        result.summary.classified_columns,
        result.summary.agreement_percentage
    );
    println!("  Overrides applied: {}", result.summary.overrides_applied);
    println!("  Skipped columns: {}", result.summary.skipped_columns);
    println!();

    println!("{}", separator);

    Ok(())
}
