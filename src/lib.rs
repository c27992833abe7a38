//! yoloprep: split class-per-folder image collections into YOLO datasets.
//!
//! Given `data/raw/<Class>/*.{jpg,jpeg,png}`, yoloprep shuffles the images,
//! splits them into train/val/test with a fixed seed, copies them into an
//! Ultralytics-style `images/` + `labels/` tree with empty label stubs, and
//! writes a `data.yaml` manifest.
//!
//! # Modules
//!
//! - [`classes`]: Class name → ID table
//! - [`config`]: Run configuration
//! - [`scan`]: Class-folder scanning
//! - [`split`]: Seeded two-stage partitioning
//! - [`materialize`]: Image copies and label stubs
//! - [`manifest`]: `data.yaml` rendering and parsing
//! - [`prepare`]: The end-to-end pipeline
//! - [`check`]: Consistency check for a processed tree
//! - [`error`]: Error types

pub mod check;
pub mod classes;
pub mod config;
pub mod error;
pub mod manifest;
pub mod materialize;
pub mod prepare;
pub mod scan;
pub mod split;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use classes::ClassMap;
pub use config::PrepareConfig;
pub use error::PrepError;
pub use prepare::{prepare_dataset, PrepareOutcome, PrepareReport};

/// The yoloprep CLI application.
#[derive(Parser)]
#[command(name = "yoloprep")]
#[command(version, about)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Split raw class folders into a YOLO train/val/test dataset (default).
    Prepare(PrepareArgs),
    /// Check a processed dataset for missing labels and manifest problems.
    Check(CheckArgs),
}

/// Arguments for the prepare subcommand.
#[derive(clap::Args)]
struct PrepareArgs {
    /// Directory containing one folder per class.
    #[arg(long, default_value = "data/raw")]
    raw: PathBuf,

    /// Directory receiving the split tree and data.yaml.
    #[arg(long, default_value = "data/processed")]
    output: PathBuf,

    /// Class folder names, in class-ID order.
    #[arg(long, value_delimiter = ',', default_values_t = classes::DEFAULT_CLASSES.map(String::from))]
    classes: Vec<String>,

    /// Seed for the train/val/test split.
    #[arg(long, default_value_t = config::DEFAULT_SEED)]
    seed: u64,

    /// Seed for the initial shuffle (random on every run when omitted).
    #[arg(long)]
    shuffle_seed: Option<u64>,

    /// Fraction of all images held out for testing.
    #[arg(long, default_value_t = config::DEFAULT_TEST_RATIO)]
    test_ratio: f64,

    /// Fraction of the remaining images held out for validation.
    #[arg(long, default_value_t = config::DEFAULT_VAL_RATIO)]
    val_ratio: f64,

    /// Value written to the manifest's `path` key [default: the --output directory].
    #[arg(long)]
    manifest_path: Option<String>,

    /// Output format for the report ('text' or 'json').
    #[arg(long, default_value = "text")]
    report: String,
}

impl Default for PrepareArgs {
    fn default() -> Self {
        let config = PrepareConfig::default();
        Self {
            raw: config.raw_root,
            output: config.output_root,
            classes: config.classes.names().to_vec(),
            seed: config.seed,
            shuffle_seed: config.shuffle_seed,
            test_ratio: config.test_ratio,
            val_ratio: config.val_ratio,
            manifest_path: None,
            report: "text".to_string(),
        }
    }
}

/// Arguments for the check subcommand.
#[derive(clap::Args)]
struct CheckArgs {
    /// Processed dataset root (containing data.yaml).
    #[arg(default_value = "data/processed")]
    root: PathBuf,

    /// Output format for the report ('text' or 'json').
    #[arg(long, default_value = "text")]
    report: String,
}

/// Run the yoloprep CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), PrepError> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Prepare(args)) => run_prepare(args),
        Some(Commands::Check(args)) => run_check(args),
        // No subcommand: prepare with the default layout
        None => run_prepare(PrepareArgs::default()),
    }
}

fn check_report_format(format: &str) -> Result<(), PrepError> {
    match format {
        "text" | "json" => Ok(()),
        other => Err(PrepError::UnsupportedReportFormat(format!(
            "'{}' (supported: text, json)",
            other
        ))),
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), PrepError> {
    let json = serde_json::to_string_pretty(value).map_err(|e| PrepError::Io(e.into()))?;
    println!("{}", json);
    Ok(())
}

/// Execute the prepare subcommand.
fn run_prepare(args: PrepareArgs) -> Result<(), PrepError> {
    check_report_format(&args.report)?;

    let manifest_path = args
        .manifest_path
        .unwrap_or_else(|| config::manifest_path_for(&args.output));

    let config = PrepareConfig {
        raw_root: args.raw,
        output_root: args.output,
        classes: ClassMap::new(args.classes)?,
        seed: args.seed,
        shuffle_seed: args.shuffle_seed,
        test_ratio: args.test_ratio,
        val_ratio: args.val_ratio,
        manifest_path,
        ..Default::default()
    };

    let outcome = prepare_dataset(&config)?;

    match (args.report.as_str(), &outcome) {
        ("json", PrepareOutcome::Prepared(report)) => print_json(report)?,
        ("json", PrepareOutcome::Skipped(reason)) => print_json(reason)?,
        (_, PrepareOutcome::Prepared(report)) => print!("{}", report),
        (_, PrepareOutcome::Skipped(reason)) => println!("{}", reason),
    }

    // Skipped runs exit 0.
    Ok(())
}

/// Execute the check subcommand.
fn run_check(args: CheckArgs) -> Result<(), PrepError> {
    check_report_format(&args.report)?;

    let report = check::check_processed(&args.root)?;

    match args.report.as_str() {
        "json" => print_json(&report)?,
        _ => print!("{}", report),
    }

    if report.is_ok() {
        Ok(())
    } else {
        Err(PrepError::CheckFailed {
            error_count: report.error_count(),
        })
    }
}
