//! End-to-end dataset preparation.
//!
//! Scan → partition → materialize → manifest. The output tree is only touched
//! once the scan has produced at least one record.

mod report;

pub use report::{PrepareReport, SplitReport};

use crate::config::{PrepareConfig, IMAGE_EXTENSIONS};
use crate::error::PrepError;
use crate::materialize::materialize_partition;
use crate::manifest::write_manifest;
use crate::scan::{scan_classes, ScanOutcome, SkipReason};
use crate::split::{partition_records, shuffle_records};

/// How a preparation run ended.
#[derive(Clone, Debug)]
pub enum PrepareOutcome {
    /// The output tree and manifest were written.
    Prepared(PrepareReport),
    /// Nothing was written.
    Skipped(SkipReason),
}

impl PrepareOutcome {
    /// Returns true if the run wrote the dataset.
    pub fn is_prepared(&self) -> bool {
        matches!(self, PrepareOutcome::Prepared(_))
    }
}

/// Prepare a YOLO dataset according to `config`.
pub fn prepare_dataset(config: &PrepareConfig) -> Result<PrepareOutcome, PrepError> {
    config.validate()?;

    tracing::info!(raw_root = %config.raw_root.display(), "scanning class folders");
    let scan = match scan_classes(&config.raw_root, &config.classes, &IMAGE_EXTENSIONS)? {
        ScanOutcome::Found(scan) => scan,
        ScanOutcome::Skipped(reason) => {
            tracing::info!(?reason, "nothing to prepare");
            return Ok(PrepareOutcome::Skipped(reason));
        }
    };

    let mut records = scan.records;
    let total = records.len();
    shuffle_records(&mut records, config.shuffle_seed);
    let partition = partition_records(records, config.test_ratio, config.val_ratio, config.seed);

    tracing::info!(output_root = %config.output_root.display(), total, "writing splits");
    let summaries = materialize_partition(&config.output_root, &partition)?;

    let manifest = write_manifest(
        &config.output_root,
        &config.classes,
        &config.manifest_path,
        &config.dataset_name,
    )?;

    let report = PrepareReport {
        raw_root: config.raw_root.clone(),
        output_root: config.output_root.clone(),
        manifest,
        total,
        classes: scan.per_class,
        splits: summaries
            .into_iter()
            .map(|(split, summary)| SplitReport {
                split,
                images: summary.images,
                preview: summary.preview,
            })
            .collect(),
    };

    Ok(PrepareOutcome::Prepared(report))
}
