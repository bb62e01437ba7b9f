//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Vaultsmith: Data Vault 2.0 schema inference for tabular data
#[derive(Parser)]
#[command(name = "vaultsmith")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output (debug-level logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit log events as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Profile one or more tables and generate a Data Vault model
    Analyze {
        /// Paths to the data files (CSV/TSV); each file is one table
        #[arg(value_name = "FILES", required = true)]
        files: Vec<PathBuf>,

        /// Name for the generated Data Vault model
        #[arg(long, default_value = vaultsmith::DEFAULT_MODEL_NAME)]
        model_name: String,

        /// Directory to save results into
        #[arg(short, long, default_value = "pipeline_results")]
        output_dir: PathBuf,

        /// Advisory provider used to refine classifications
        #[arg(long, default_value = "none")]
        llm: LlmProviderChoice,

        /// Model to use (provider-specific, e.g., "gpt-4o", "llama3.2")
        #[arg(long)]
        model: Option<String>,

        /// Maximum non-null values sampled per column
        #[arg(long, default_value = "1000")]
        sample_size: usize,

        /// Sampling seed
        #[arg(long, default_value = "0")]
        seed: u64,

        /// Attach satellites to the hub of their own table instead of the first hub
        #[arg(long)]
        route_by_table: bool,
    },

    /// Print column profiles for a single file
    Profile {
        /// Path to the data file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Maximum non-null values sampled per column
        #[arg(long, default_value = "1000")]
        sample_size: usize,

        /// Sampling seed
        #[arg(long, default_value = "0")]
        seed: u64,
    },
}

/// Advisory provider choice for analysis
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum LlmProviderChoice {
    /// No advisory - pattern-only classification
    #[default]
    None,
    /// Anthropic Claude API (requires ANTHROPIC_API_KEY)
    Anthropic,
    /// OpenAI GPT API (requires OPENAI_API_KEY)
    OpenAI,
    /// Ollama local models (requires Ollama running)
    Ollama,
    /// Mock provider for testing
    Mock,
}

impl std::str::FromStr for LlmProviderChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(LlmProviderChoice::None),
            "anthropic" | "claude" => Ok(LlmProviderChoice::Anthropic),
            "openai" | "gpt" => Ok(LlmProviderChoice::OpenAI),
            "ollama" | "local" => Ok(LlmProviderChoice::Ollama),
            "mock" | "test" => Ok(LlmProviderChoice::Mock),
            _ => Err(format!(
                "Unknown provider: {}. Use: none, anthropic, openai, ollama, or mock.",
                s
            )),
        }
    }
}

impl std::fmt::Display for LlmProviderChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LlmProviderChoice::None => write!(f, "none"),
            LlmProviderChoice::Anthropic => write!(f, "anthropic"),
            LlmProviderChoice::OpenAI => write!(f, "openai"),
            LlmProviderChoice::Ollama => write!(f, "ollama"),
            LlmProviderChoice::Mock => write!(f, "mock"),
        }
    }
}
