//! Class-folder scanning.
//!
//! Reads `<raw_root>/<class>/` for every configured class and turns each
//! qualifying image into an [`ImageRecord`]. Nothing is written here, so a
//! skipped scan leaves the output tree untouched.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use walkdir::WalkDir;

use crate::classes::{ClassId, ClassMap};
use crate::error::PrepError;

/// One source image found during the scan.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ImageRecord {
    pub class_name: String,
    pub class_id: ClassId,
    /// File name inside the class folder (no directories).
    pub file_name: String,
    pub source_path: PathBuf,
}

/// Why a run stopped before touching the output tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    /// A configured class has no folder under the raw root.
    MissingClassDirectory { class: String, path: PathBuf },
    /// Every class folder exists but none holds a qualifying image.
    EmptyDataset { raw_root: PathBuf },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingClassDirectory { class, path } => {
                writeln!(f, "Warning: {} does not exist", path.display())?;
                write!(
                    f,
                    "  Create the folder and put the {} images inside it",
                    class
                )
            }
            SkipReason::EmptyDataset { raw_root } => {
                write!(f, "No images found under {}", raw_root.display())
            }
        }
    }
}

/// Result of scanning the raw root.
#[derive(Clone, Debug)]
pub enum ScanOutcome {
    /// Records for every class, in class order then file-name order.
    Found(ScanResult),
    Skipped(SkipReason),
}

/// Records collected by a successful scan.
#[derive(Clone, Debug, Default)]
pub struct ScanResult {
    pub records: Vec<ImageRecord>,
    /// Image counts in class order.
    pub per_class: Vec<ClassCount>,
}

/// Number of images found for one class.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ClassCount {
    pub id: usize,
    pub name: String,
    pub images: usize,
}

/// Scan every class folder, stopping at the first missing one.
///
/// All folders are checked before any file is listed.
pub fn scan_classes(
    raw_root: &Path,
    classes: &ClassMap,
    extensions: &[&str],
) -> Result<ScanOutcome, PrepError> {
    for (_, class_name) in classes.iter() {
        let class_dir = raw_root.join(class_name);
        if !class_dir.is_dir() {
            return Ok(ScanOutcome::Skipped(SkipReason::MissingClassDirectory {
                class: class_name.to_string(),
                path: class_dir,
            }));
        }
    }

    let mut result = ScanResult::default();

    for (class_id, class_name) in classes.iter() {
        let class_dir = raw_root.join(class_name);
        let file_names = list_files_with_extensions(&class_dir, extensions)?;
        tracing::debug!(class = class_name, count = file_names.len(), "scanned class folder");

        result.per_class.push(ClassCount {
            id: class_id.as_usize(),
            name: class_name.to_string(),
            images: file_names.len(),
        });
        result
            .records
            .extend(file_names.into_iter().map(|file_name| ImageRecord {
                class_name: class_name.to_string(),
                class_id,
                source_path: class_dir.join(&file_name),
                file_name,
            }));
    }

    if result.records.is_empty() {
        return Ok(ScanOutcome::Skipped(SkipReason::EmptyDataset {
            raw_root: raw_root.to_path_buf(),
        }));
    }

    Ok(ScanOutcome::Found(result))
}

/// List names of files directly inside `dir` with an allowed extension, sorted.
///
/// Names that are not valid UTF-8 are logged and left out.
pub(crate) fn list_files_with_extensions(
    dir: &Path,
    extensions: &[&str],
) -> Result<Vec<String>, PrepError> {
    let mut names = Vec::new();

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).follow_links(true) {
        let entry = entry.map_err(|source| PrepError::Scan {
            path: dir.to_path_buf(),
            message: format!("failed while listing directory: {source}"),
        })?;

        if !entry.file_type().is_file() || !has_extension(entry.path(), extensions) {
            continue;
        }

        let Some(name) = entry.file_name().to_str() else {
            tracing::warn!(
                path = %entry.path().display(),
                "skipping file whose name is not valid UTF-8"
            );
            continue;
        };
        names.push(name.to_string());
    }

    names.sort();
    Ok(names)
}

pub(crate) fn has_extension(path: &Path, allowed: &[&str]) -> bool {
    let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
        return false;
    };

    allowed
        .iter()
        .any(|allowed_ext| ext.eq_ignore_ascii_case(allowed_ext))
}
