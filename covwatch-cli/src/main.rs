//! Covwatch CLI - assess repository quality risk and track it over time

#![deny(warnings)]

// Global invariants enforced:
// - Deterministic output ordering
// - Identical snapshot history yields identical output

use anyhow::Context;
use clap::{Parser, Subcommand};
use covwatch_core::render::{
    render_assessment_json, render_assessment_text, render_comparison_json,
    render_comparison_text, render_snapshot_list_json, render_snapshot_list_text,
};
use covwatch_core::{assess, build_assessment, compare, AnalyzerOptions, SnapshotStore};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "covwatch")]
#[command(about = "Assess repository quality risk from analyzer reports and track it over time")]
#[command(version)]
struct Cli {
    /// Snapshot storage root (default: per-user local data directory)
    #[arg(long, global = true)]
    store_root: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the analyzer, persist a snapshot, and print insights
    Assess {
        /// Path to the repository root
        path: PathBuf,

        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,

        /// Analyzer binary (default: covlint on PATH)
        #[arg(long)]
        analyzer: Option<PathBuf>,

        /// Analyzer timeout in seconds
        #[arg(long, default_value = "120")]
        timeout: u64,
    },
    /// List persisted snapshots for a repository, newest first
    List {
        /// Path to the repository root
        path: PathBuf,

        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,
    },
    /// Compare the two most recent snapshots
    Compare {
        /// Path to the repository root
        path: PathBuf,

        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,
    },
    /// Re-derive insights from the latest snapshot without re-running the analyzer
    Insights {
        /// Path to the repository root
        path: PathBuf,

        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn normalize_path(path: PathBuf) -> anyhow::Result<PathBuf> {
    let normalized = if path.is_relative() {
        std::env::current_dir()?.join(&path)
    } else {
        path
    };

    if !normalized.exists() {
        anyhow::bail!("Path does not exist: {}", normalized.display());
    }

    Ok(normalized)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let store = SnapshotStore::new(
        cli.store_root
            .clone()
            .unwrap_or_else(SnapshotStore::default_root),
    );

    match cli.command {
        Commands::Assess {
            path,
            format,
            analyzer,
            timeout,
        } => {
            let path = normalize_path(path)?;
            let options = AnalyzerOptions {
                binary: analyzer
                    .unwrap_or_else(|| PathBuf::from(covwatch_core::analyzer::DEFAULT_ANALYZER_BIN)),
                timeout: Duration::from_secs(timeout),
            };

            let assessment = assess(&path, &store, &options)
                .with_context(|| format!("assessment failed for {}", path.display()))?;

            match format {
                OutputFormat::Text => print!("{}", render_assessment_text(&assessment)),
                OutputFormat::Json => println!("{}", render_assessment_json(&assessment)),
            }
        }
        Commands::List { path, format } => {
            let path = normalize_path(path)?;
            let snapshots = store
                .list_snapshots(&path)
                .context("failed to list snapshots")?;

            match format {
                OutputFormat::Text => print!("{}", render_snapshot_list_text(&snapshots)),
                OutputFormat::Json => println!("{}", render_snapshot_list_json(&snapshots)),
            }
        }
        Commands::Compare { path, format } => {
            let path = normalize_path(path)?;
            let snapshots = store
                .list_snapshots(&path)
                .context("failed to list snapshots")?;

            if snapshots.len() < 2 {
                anyhow::bail!(
                    "need at least two snapshots to compare (found {})",
                    snapshots.len()
                );
            }

            // Listing is newest first: snapshots[1] is the baseline
            let comparison = compare(&snapshots[1], &snapshots[0]);

            match format {
                OutputFormat::Text => print!("{}", render_comparison_text(&comparison)),
                OutputFormat::Json => println!("{}", render_comparison_json(&comparison)),
            }
        }
        Commands::Insights { path, format } => {
            let path = normalize_path(path)?;
            let snapshots = store
                .list_snapshots(&path)
                .context("failed to list snapshots")?;

            let Some(latest) = snapshots.first().cloned() else {
                anyhow::bail!("no snapshots recorded for {}", path.display());
            };
            let comparison = snapshots
                .get(1)
                .map(|baseline| compare(baseline, &latest));

            let assessment = build_assessment(latest, comparison);

            match format {
                OutputFormat::Text => print!("{}", render_assessment_text(&assessment)),
                OutputFormat::Json => println!("{}", render_assessment_json(&assessment)),
            }
        }
    }

    Ok(())
}
