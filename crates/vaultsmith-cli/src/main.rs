//! Vaultsmith CLI - Data Vault schema inference from tabular files.

mod cli;
mod commands;
mod report;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_json);

    let result = match cli.command {
        Commands::Analyze {
            files,
            model_name,
            output_dir,
            llm,
            model,
            sample_size,
            seed,
            route_by_table,
        } => commands::analyze::run(commands::analyze::AnalyzeArgs {
            files,
            model_name,
            output_dir,
            llm,
            model,
            sample_size,
            seed,
            route_by_table,
            verbose: cli.verbose,
        }),

        Commands::Profile {
            file,
            json,
            sample_size,
            seed,
        } => commands::profile::run(file, json, sample_size, seed),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Install the global subscriber. Logs go to stderr so stdout stays parseable.
fn init_tracing(verbose: bool, json: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}
