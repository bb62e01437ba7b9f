//! Analyze command - profile tables and generate a Data Vault model.

use std::path::PathBuf;
use std::sync::Arc;

use colored::Colorize;
use vaultsmith::{
    AdvisoryConfig, AdvisoryProvider, AnthropicProvider, BuilderConfig, ClassifierConfig,
    MockProvider, OllamaProvider, OpenAIProvider, SatelliteRouting, SatelliteType, Vaultsmith,
    VaultsmithConfig,
};

use crate::cli::LlmProviderChoice;
use crate::report;

pub struct AnalyzeArgs {
    pub files: Vec<PathBuf>,
    pub model_name: String,
    pub output_dir: PathBuf,
    pub llm: LlmProviderChoice,
    pub model: Option<String>,
    pub sample_size: usize,
    pub seed: u64,
    pub route_by_table: bool,
    pub verbose: bool,
}

pub fn run(args: AnalyzeArgs) -> Result<(), Box<dyn std::error::Error>> {
    // Validate input files exist
    for file in &args.files {
        if !file.exists() {
            return Err(format!("File not found: {}", file.display()).into());
        }
    }

    for file in &args.files {
        println!(
            "{} {}",
            "Analyzing".cyan().bold(),
            file.display().to_string().white()
        );
    }

    let config = VaultsmithConfig {
        classifier: ClassifierConfig {
            sample_size: args.sample_size,
            seed: args.seed,
        },
        builder: BuilderConfig {
            satellite_routing: if args.route_by_table {
                SatelliteRouting::SourceTable
            } else {
                SatelliteRouting::FirstHub
            },
        },
        model_name: args.model_name,
        ..Default::default()
    };

    let mut vaultsmith = Vaultsmith::with_config(config);
    if let Some(provider) = build_provider(&args.llm, args.model)? {
        println!(
            "{} {} ({})",
            "Advisory".cyan().bold(),
            provider.name(),
            provider.config().model
        );
        vaultsmith = vaultsmith.with_shared_advisory(provider);
    }

    let result = vaultsmith.analyze_files(&args.files)?;

    if args.verbose {
        println!();
        println!("{}", "Profiles:".yellow().bold());
        for column in &result.columns {
            let p = &column.profile;
            println!(
                "  {:28} {:14} pii={:6} pk={:5} bk={:5} refs=[{}]",
                p.name,
                p.semantic_type.to_string(),
                p.pii_level.to_string(),
                p.is_primary_key,
                p.is_business_key,
                p.references.join(", ")
            );
        }
        println!();
    }

    let summary = &result.summary;
    println!(
        "Classified {} columns ({} skipped)",
        summary.classified_columns.to_string().white().bold(),
        summary.skipped_columns.to_string().yellow()
    );
    println!(
        "Generated {} hubs, {} links, {} satellites ({} PII)",
        summary.hubs.to_string().white().bold(),
        summary.links.to_string().white().bold(),
        summary.satellites.to_string().white().bold(),
        result.model.pii_satellite_count().to_string().red()
    );
    if summary.advisory_enabled {
        println!(
            "Advisory agreement: {:.1}% ({} overrides applied)",
            summary.agreement_percentage, summary.overrides_applied
        );
    }

    for skipped in &result.skipped {
        println!(
            "  {} {}: {}",
            "skipped".yellow(),
            skipped.qualified_name(),
            skipped.reason
        );
    }

    let problems = result.model.validate();
    for problem in &problems {
        println!("  {} {}", "invalid".red().bold(), problem);
    }

    let written = report::write_results(&result, &args.output_dir)?;

    println!();
    for path in &written {
        println!(
            "{} {}",
            "Saved to".green().bold(),
            path.display().to_string().white()
        );
    }

    if result
        .model
        .satellites()
        .iter()
        .any(|s| s.satellite_type == SatelliteType::Pii)
    {
        println!();
        println!("{}", "PII satellites present - review access controls".yellow());
    }

    Ok(())
}

/// Build the selected advisory provider, or `None` for pattern-only runs.
fn build_provider(
    choice: &LlmProviderChoice,
    model: Option<String>,
) -> Result<Option<Arc<dyn AdvisoryProvider>>, Box<dyn std::error::Error>> {
    let with_model = |config: AdvisoryConfig| match &model {
        Some(m) => config.with_model(m.clone()),
        None => config,
    };

    let provider: Arc<dyn AdvisoryProvider> = match choice {
        LlmProviderChoice::None => return Ok(None),
        LlmProviderChoice::Mock => Arc::new(MockProvider::with_config(with_model(
            AdvisoryConfig::default().with_model("mock"),
        ))),
        LlmProviderChoice::Anthropic => Arc::new(AnthropicProvider::from_env_with_config(
            with_model(AdvisoryConfig::default()),
        )?),
        LlmProviderChoice::OpenAI => Arc::new(OpenAIProvider::from_env_with_config(with_model(
            OpenAIProvider::default_config(),
        ))?),
        LlmProviderChoice::Ollama => Arc::new(OllamaProvider::with_config(with_model(
            OllamaProvider::default_config(),
        ))?),
    };

    Ok(Some(provider))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn args(dir: &TempDir, sample_size: usize) -> AnalyzeArgs {
        let file = dir.path().join("notes.csv");
        std::fs::write(&file, "note_id,comment\n1,great\n2,meh\n").unwrap();
        AnalyzeArgs {
            files: vec![file],
            model_name: "CliVault".to_string(),
            output_dir: dir.path().join("out"),
            llm: LlmProviderChoice::None,
            model: None,
            sample_size,
            seed: 0,
            route_by_table: false,
            verbose: false,
        }
    }

    #[test]
    fn test_run_writes_results() {
        let dir = TempDir::new().unwrap();
        run(args(&dir, 1000)).unwrap();
        assert!(dir.path().join("out").join(report::PIPELINE_REPORT_FILE).exists());
    }

    #[test]
    fn test_run_rejects_zero_sample_size() {
        let dir = TempDir::new().unwrap();
        let err = run(args(&dir, 0)).unwrap_err();
        assert!(err.to_string().contains("sample_size"));
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn test_none_builds_no_provider() {
        assert!(build_provider(&LlmProviderChoice::None, None).unwrap().is_none());
    }

    #[test]
    fn test_mock_provider_takes_model_override() {
        let provider = build_provider(&LlmProviderChoice::Mock, Some("tiny".to_string()))
            .unwrap()
            .unwrap();
        assert_eq!(provider.name(), "mock");
        assert_eq!(provider.config().model, "tiny");
    }

    #[test]
    fn test_ollama_defaults_to_local_model() {
        let provider = build_provider(&LlmProviderChoice::Ollama, None)
            .unwrap()
            .unwrap();
        assert_eq!(provider.config().model, "llama3.2");
    }
}
