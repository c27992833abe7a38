//! Output tree materialization.
//!
//! Writes each split as an Ultralytics-style `images/` + `labels/` pair:
//!
//! ```text
//! <output>/<split>/images/<class>_<file name>
//! <output>/<split>/labels/<class>_<stem>.txt   (empty)
//! ```

use std::fs::{self, FileTimes};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::PrepError;
use crate::scan::ImageRecord;
use crate::split::{Partition, SplitKind};

const LABEL_EXTENSION: &str = "txt";

/// Number of destination names listed per split in progress output.
pub const PREVIEW_LIMIT: usize = 3;

/// What was written for one split.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SplitSummary {
    pub images: usize,
    /// First few `(destination file name, class id)` pairs.
    pub preview: Vec<(String, usize)>,
}

/// Destination file name for a record's image.
pub fn image_file_name(record: &ImageRecord) -> String {
    format!("{}_{}", record.class_name, record.file_name)
}

/// Destination file name for a record's label stub.
///
/// Only the last extension of the source name is replaced.
pub fn label_file_name(record: &ImageRecord) -> String {
    let stem = Path::new(&record.file_name)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(record.file_name.as_str());
    format!("{}_{}.{}", record.class_name, stem, LABEL_EXTENSION)
}

/// `<output>/<split>/images`
pub fn images_dir(output_root: &Path, kind: SplitKind) -> PathBuf {
    output_root.join(kind.as_str()).join("images")
}

/// `<output>/<split>/labels`
pub fn labels_dir(output_root: &Path, kind: SplitKind) -> PathBuf {
    output_root.join(kind.as_str()).join("labels")
}

/// Create `images/` and `labels/` for every split.
pub fn create_split_dirs(output_root: &Path) -> Result<(), PrepError> {
    for kind in SplitKind::ALL {
        fs::create_dir_all(images_dir(output_root, kind)).map_err(PrepError::Io)?;
        fs::create_dir_all(labels_dir(output_root, kind)).map_err(PrepError::Io)?;
    }
    Ok(())
}

/// Copy every image and write its empty label stub.
///
/// Stops at the first failure; files already written stay in place.
pub fn materialize_partition(
    output_root: &Path,
    partition: &Partition,
) -> Result<Vec<(SplitKind, SplitSummary)>, PrepError> {
    create_split_dirs(output_root)?;

    let mut summaries = Vec::with_capacity(SplitKind::ALL.len());

    for split in partition.splits() {
        tracing::info!(split = %split.kind, images = split.records.len(), "materializing split");

        let images = images_dir(output_root, split.kind);
        let labels = labels_dir(output_root, split.kind);
        let mut summary = SplitSummary::default();

        for record in &split.records {
            let image_name = image_file_name(record);
            let image_dest = images.join(&image_name);
            copy_with_metadata(&record.source_path, &image_dest)?;

            let label_dest = labels.join(label_file_name(record));
            write_empty_label(&label_dest)?;

            tracing::debug!(
                from = %record.source_path.display(),
                to = %image_dest.display(),
                "copied image"
            );

            if summary.preview.len() < PREVIEW_LIMIT {
                summary
                    .preview
                    .push((image_name, record.class_id.as_usize()));
            }
            summary.images += 1;
        }

        summaries.push((split.kind, summary));
    }

    Ok(summaries)
}

/// Copy file content and permissions, then carry over access/modify times.
fn copy_with_metadata(from: &Path, to: &Path) -> Result<(), PrepError> {
    let copy_err = |source| PrepError::Copy {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    };

    fs::copy(from, to).map_err(copy_err)?;

    let meta = fs::metadata(from).map_err(copy_err)?;
    let mut times = FileTimes::new();
    if let Ok(accessed) = meta.accessed() {
        times = times.set_accessed(accessed);
    }
    if let Ok(modified) = meta.modified() {
        times = times.set_modified(modified);
    }

    let dest = fs::OpenOptions::new()
        .write(true)
        .open(to)
        .map_err(copy_err)?;
    dest.set_times(times).map_err(copy_err)
}

/// Create or truncate an empty label file.
fn write_empty_label(path: &Path) -> Result<(), PrepError> {
    fs::File::create(path)
        .map(|_| ())
        .map_err(|source| PrepError::LabelWrite {
            path: path.to_path_buf(),
            source,
        })
}
