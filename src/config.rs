//! Run configuration for dataset preparation.

use std::path::{Path, PathBuf};

use crate::classes::ClassMap;
use crate::error::PrepError;

/// Image extensions accepted by the scanner (compared case-insensitively).
pub const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Default seed for both split stages.
pub const DEFAULT_SEED: u64 = 42;

/// Fraction of the whole set held out as the test split.
pub const DEFAULT_TEST_RATIO: f64 = 0.1;

/// Fraction of the remainder held out as the validation split (about 20% of
/// the whole set).
pub const DEFAULT_VAL_RATIO: f64 = 0.222;

/// Immutable settings for one preparation run.
#[derive(Clone, Debug)]
pub struct PrepareConfig {
    /// Directory holding one subdirectory per class.
    pub raw_root: PathBuf,
    /// Directory receiving the `train/`, `val/`, `test/` trees and `data.yaml`.
    pub output_root: PathBuf,
    /// Class folders to read, in ID order.
    pub classes: ClassMap,
    /// Seed for the two holdout stages.
    pub seed: u64,
    /// Seed for the initial shuffle; `None` uses the process-wide generator.
    pub shuffle_seed: Option<u64>,
    /// Fraction of all images held out as the test split, in `[0, 1)`.
    pub test_ratio: f64,
    /// Fraction of the remaining images held out as the validation split, in `[0, 1)`.
    pub val_ratio: f64,
    /// Value written to the manifest's `path` key; see [`manifest_path_for`].
    pub manifest_path: String,
    /// Title written in the manifest's header comment.
    pub dataset_name: String,
}

impl Default for PrepareConfig {
    fn default() -> Self {
        let output_root = PathBuf::from("data/processed");
        Self {
            raw_root: PathBuf::from("data/raw"),
            manifest_path: manifest_path_for(&output_root),
            output_root,
            classes: ClassMap::default(),
            seed: DEFAULT_SEED,
            shuffle_seed: None,
            test_ratio: DEFAULT_TEST_RATIO,
            val_ratio: DEFAULT_VAL_RATIO,
            dataset_name: "Cacao diseases".to_string(),
        }
    }
}

/// Manifest `path` value for an output root: relative roots get a leading
/// `./`, separators are written as `/`.
pub fn manifest_path_for(output_root: &Path) -> String {
    let path = output_root.to_string_lossy().replace('\\', "/");
    let explicit = output_root.is_absolute()
        || path == "."
        || path == ".."
        || path.starts_with("./")
        || path.starts_with("../");
    if explicit {
        path
    } else {
        format!("./{path}")
    }
}

impl PrepareConfig {
    /// Check ratio bounds before any filesystem work.
    pub fn validate(&self) -> Result<(), PrepError> {
        check_ratio("test ratio", self.test_ratio)?;
        check_ratio("validation ratio", self.val_ratio)?;
        Ok(())
    }
}

fn check_ratio(name: &'static str, value: f64) -> Result<(), PrepError> {
    if (0.0..1.0).contains(&value) {
        Ok(())
    } else {
        Err(PrepError::InvalidRatio { name, value })
    }
}
