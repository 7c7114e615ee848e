//! amu-pca CLI Module
//!
//! Runs the projection pipeline on a dataset file or the bundled sample.

use clap::{Parser, Subcommand};
use colored::*;
use std::path::{Path, PathBuf};

use crate::data::{sample_batches, sample_batches_with_categories, DatasetConfig, YearBatch};
use crate::decomposition::BackendKind;
use crate::pipeline::{Pipeline, PipelineRun};
use crate::preprocessing::{PipelineConfig, YearTagging};

// ─── Styling helpers ───────────────────────────────────────────────────────────

fn dim(s: &str) -> ColoredString   { s.truecolor(100, 100, 100) }
fn muted(s: &str) -> ColoredString { s.truecolor(140, 140, 140) }
fn ok(s: &str) -> ColoredString    { s.truecolor(100, 210, 120) }

fn kv(key: &str, val: &str) -> String {
    format!("{} {}", muted(key), val.white())
}

fn step_ok(msg: &str) {
    println!("  {} {}", ok("✓"), msg);
}

fn section(title: &str) {
    println!();
    println!("  {}", title.white().bold());
    println!("  {}", dim(&"─".repeat(56)));
}

// ─── CLI definition ────────────────────────────────────────────────────────────

#[derive(Debug, Parser)]
#[command(name = "amu-pca")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Project antimicrobial-usage records for charting")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the pipeline and emit the presenter payload as JSON
    Run {
        /// Dataset file (JSON); the bundled sample is used when omitted
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// Use the category-labelled sample (ignored with --data)
        #[arg(long)]
        categories: bool,

        /// Assign years by combined index instead of batch origin
        #[arg(long)]
        literal_year_tagging: bool,

        /// Index threshold for --literal-year-tagging
        #[arg(long, default_value = "2", requires = "literal_year_tagging")]
        threshold: usize,

        /// SVD backend (nalgebra, power)
        #[arg(short, long, default_value = "nalgebra")]
        backend: String,

        /// Output file; payload goes to stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the bundled sample dataset as JSON
    Sample {
        /// Include Narrow/Broad category labels
        #[arg(long)]
        categories: bool,
    },
}

// ─── Commands ──────────────────────────────────────────────────────────────────

pub fn load_batches(data: Option<&Path>, categories: bool) -> anyhow::Result<Vec<YearBatch>> {
    let batches = match data {
        Some(path) => DatasetConfig::from_json_file(path)?.batches,
        None if categories => sample_batches_with_categories(),
        None => sample_batches(),
    };
    Ok(batches)
}

pub fn cmd_run(
    data: Option<&Path>,
    categories: bool,
    literal_year_tagging: bool,
    threshold: usize,
    backend: &str,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let batches = load_batches(data, categories)?;

    let tagging = if literal_year_tagging {
        YearTagging::IndexThreshold { threshold }
    } else {
        YearTagging::ByBatch
    };
    let config = PipelineConfig::new().with_year_tagging(tagging);
    let backend: BackendKind = backend.parse()?;

    let pipeline = Pipeline::new(config).with_backend(backend.build());
    let run = pipeline.run_detailed(&batches)?;
    let json = serde_json::to_string_pretty(&run.payload)?;

    match output {
        Some(path) => {
            std::fs::write(path, json)?;
            print_summary(&run, data, pipeline.backend_name());
            step_ok(&format!("Payload written to {}", path.display()));
            println!();
        }
        None => println!("{}", json),
    }

    Ok(())
}

pub fn cmd_sample(categories: bool) -> anyhow::Result<()> {
    let batches = if categories {
        sample_batches_with_categories()
    } else {
        sample_batches()
    };
    println!("{}", DatasetConfig::new(batches).to_json_string()?);
    Ok(())
}

fn print_summary(run: &PipelineRun, data: Option<&Path>, backend: &str) {
    section("Run");

    let source = data
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "bundled sample".to_string());
    println!("  {}", kv("Source  ", &source));
    println!("  {}", kv("Records ", &run.records.len().to_string()));
    println!("  {}", kv("Backend ", backend));
    if run.mistagged_years > 0 {
        let note = format!("{} record(s) tagged off their batch year", run.mistagged_years);
        println!("  {}", kv("Years   ", &note));
    }
    println!("  {}", kv("Elapsed ", &format!("{:.2} ms", run.elapsed * 1000.0)));

    let sv: Vec<String> = run
        .payload
        .singular_values
        .iter()
        .map(|s| format!("{:.4}", s))
        .collect();
    println!("  {}", kv("Sigma   ", &sv.join(", ")));

    section("Projection");
    println!(
        "  {:<20} {:>6} {:>10} {:>10}",
        muted("Name"), muted("Year"), muted("PC1"), muted("PC2")
    );
    println!("  {}", dim(&"─".repeat(50)));
    for r in &run.records {
        println!("  {:<20} {:>6} {:>10.4} {:>10.4}", r.name(), r.year(), r.coord1, r.coord2);
    }

    if let Some(clusters) = &run.clusters {
        section("Categories");
        for count in clusters.counts() {
            println!("  {:<20} {:>6}", count.category, count.count);
        }
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_run_flags() {
        let cli = Cli::try_parse_from([
            "amu-pca", "run", "--literal-year-tagging", "--threshold", "3", "--backend", "power",
        ])
        .unwrap();
        match cli.command {
            Commands::Run { literal_year_tagging, threshold, backend, data, .. } => {
                assert!(literal_year_tagging);
                assert_eq!(threshold, 3);
                assert_eq!(backend, "power");
                assert!(data.is_none());
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn test_threshold_requires_literal_tagging() {
        let err = Cli::try_parse_from(["amu-pca", "run", "--threshold", "3"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);

        let cli = Cli::try_parse_from(["amu-pca", "run"]).unwrap();
        match cli.command {
            Commands::Run { literal_year_tagging, threshold, .. } => {
                assert!(!literal_year_tagging);
                assert_eq!(threshold, 2);
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn test_load_batches_sample() {
        let plain = load_batches(None, false).unwrap();
        assert!(plain.iter().flat_map(|b| &b.records).all(|r| r.category.is_none()));
        let labelled = load_batches(None, true).unwrap();
        assert!(labelled.iter().flat_map(|b| &b.records).all(|r| r.category.is_some()));
    }

    #[test]
    fn test_cmd_run_writes_output() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("payload.json");
        cmd_run(None, true, false, 2, "nalgebra", Some(out.as_path())).unwrap();

        let written = std::fs::read_to_string(&out).unwrap();
        let payload: crate::visualization::PresenterPayload = serde_json::from_str(&written).unwrap();
        assert_eq!(payload.bar.len(), 4);
        assert!(payload.doughnut.is_some());
    }

    #[test]
    fn test_cmd_run_unknown_backend() {
        assert!(cmd_run(None, false, false, 2, "lapack", None).is_err());
    }
}
