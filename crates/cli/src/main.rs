//! memstats-gen CLI: regenerate `memory_stats` methods across a source tree.
//!
//! Calls `memstats-core` directly; all fatal conditions come back as errors
//! and are turned into the exit code here.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;

use memstats_core::{load_config, Generator, RunSummary};

/// Keep generated memory_stats methods in sync with manager declarations.
#[derive(Parser)]
#[command(name = "memstats-gen", version, about)]
struct Cli {
    /// Project root to scan
    root: PathBuf,

    /// Compute changes without writing any file
    #[arg(long)]
    dry_run: bool,

    /// Like --dry-run, but exit with status 1 if any file would change
    #[arg(long)]
    check: bool,

    /// Output the summary as JSON instead of human-readable text
    #[arg(long)]
    json: bool,

    /// Config file (default: <ROOT>/.memstats.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,
}

fn print_summary(summary: &RunSummary) {
    let verb = if summary.dry_run { "would update" } else { "updated" };
    println!("Entities found:    {}", summary.entities_found);
    println!("Entities {verb:<9}{}", summary.entities_updated);
    println!("Fields generated:  {}", summary.total_fields);
    println!(
        "Aggregator:        {} calls, {}",
        summary.aggregator_calls,
        if summary.aggregator_changed { verb } else { "unchanged" }
    );
    if !summary.invalid.is_empty() {
        println!("\nInvalid entities ({}):", summary.invalid.len());
        for invalid in &summary.invalid {
            println!("  {:<32} {}", invalid.name, invalid.path.display());
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("memstats_core=info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let root = match cli.root.canonicalize() {
        Ok(r) => r,
        Err(e) => {
            error!(root = %cli.root.display(), error = %e, "Project root not found");
            return ExitCode::FAILURE;
        }
    };

    let config = match load_config(&root, cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            error!(error = %e, "Could not load config");
            return ExitCode::FAILURE;
        }
    };

    let summary = match Generator::new(&root, config).dry_run(cli.dry_run || cli.check).run() {
        Ok(s) => s,
        Err(e) => {
            error!(error = %e, "Generation failed");
            return ExitCode::FAILURE;
        }
    };

    if cli.json {
        match serde_json::to_string_pretty(&summary) {
            Ok(text) => println!("{text}"),
            Err(e) => {
                error!(error = %e, "Could not serialize summary");
                return ExitCode::FAILURE;
            }
        }
    } else {
        print_summary(&summary);
    }

    if cli.check && summary.any_changed() {
        eprintln!("\nGenerated code is out of date; run memstats-gen without --check");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
