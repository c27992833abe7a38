//! Consistency check for a processed dataset tree.
//!
//! Verifies that:
//! - `data.yaml` declares a dense class table whose size matches `nc`
//! - each split has `images/` and `labels/` directories
//! - every image has a label stub and every label has an image

mod report;

pub use report::{CheckIssue, CheckReport, IssueCode, IssueContext, Severity, SplitStats};

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use crate::config::IMAGE_EXTENSIONS;
use crate::error::PrepError;
use crate::manifest::{read_manifest, ManifestDoc, MANIFEST_FILE};
use crate::materialize::{images_dir, labels_dir};
use crate::scan::list_files_with_extensions;
use crate::split::SplitKind;

const LABEL_EXTENSIONS: [&str; 1] = ["txt"];

/// Check the dataset rooted at `output_root`.
pub fn check_processed(output_root: &Path) -> Result<CheckReport, PrepError> {
    let manifest = read_manifest(&output_root.join(MANIFEST_FILE))?;

    let mut report = CheckReport {
        classes: manifest.names.len(),
        ..Default::default()
    };

    check_manifest(&manifest, &mut report);

    for kind in SplitKind::ALL {
        if let Some(stats) = check_split(output_root, kind, &mut report)? {
            report.splits.push(stats);
        }
    }

    Ok(report)
}

fn check_manifest(manifest: &ManifestDoc, report: &mut CheckReport) {
    match manifest.nc {
        Some(nc) if nc == manifest.names.len() => {}
        Some(nc) => report.add(CheckIssue::error(
            IssueCode::ClassCountMismatch,
            format!("nc is {} but {} class name(s) are listed", nc, manifest.names.len()),
            IssueContext::Manifest,
        )),
        None => report.add(CheckIssue::error(
            IssueCode::ClassCountMismatch,
            "nc is missing",
            IssueContext::Manifest,
        )),
    }

    for (id, name) in manifest.names.iter().enumerate() {
        if name.is_none() {
            report.add(CheckIssue::error(
                IssueCode::ClassNameGap,
                format!("no class name for ID {}", id),
                IssueContext::Manifest,
            ));
        }
    }

    for kind in SplitKind::ALL {
        let expected = format!("{}/images", kind.as_str());
        match manifest.split_path(kind) {
            Some(path) if path == expected => {}
            Some(path) => report.add(CheckIssue::warning(
                IssueCode::UnexpectedSplitPath,
                format!("'{}' points at '{}', expected '{}'", kind, path, expected),
                IssueContext::Manifest,
            )),
            None => report.add(CheckIssue::warning(
                IssueCode::UnexpectedSplitPath,
                format!("'{}' key is missing", kind),
                IssueContext::Manifest,
            )),
        }
    }
}

fn check_split(
    output_root: &Path,
    kind: SplitKind,
    report: &mut CheckReport,
) -> Result<Option<SplitStats>, PrepError> {
    let images = images_dir(output_root, kind);
    let labels = labels_dir(output_root, kind);

    let mut missing = false;
    for dir in [&images, &labels] {
        if !dir.is_dir() {
            report.add(CheckIssue::error(
                IssueCode::MissingSplitDir,
                format!("{} does not exist", dir.display()),
                IssueContext::Split { split: kind },
            ));
            missing = true;
        }
    }
    if missing {
        return Ok(None);
    }

    let image_names = list_files_with_extensions(&images, &IMAGE_EXTENSIONS)?;
    let label_names = list_files_with_extensions(&labels, &LABEL_EXTENSIONS)?;

    let image_stems: BTreeSet<&str> = image_names.iter().map(|n| stem(n)).collect();
    let label_stems: BTreeSet<&str> = label_names.iter().map(|n| stem(n)).collect();

    for name in &image_names {
        if !label_stems.contains(stem(name)) {
            report.add(CheckIssue::error(
                IssueCode::MissingLabel,
                format!("no {}.txt in labels/", stem(name)),
                IssueContext::File {
                    split: kind,
                    name: name.clone(),
                },
            ));
        }
    }

    let mut annotated = 0;
    for name in &label_names {
        if !image_stems.contains(stem(name)) {
            report.add(CheckIssue::warning(
                IssueCode::OrphanLabel,
                "label has no matching image",
                IssueContext::File {
                    split: kind,
                    name: name.clone(),
                },
            ));
        }

        let content = fs::read_to_string(labels.join(name)).map_err(PrepError::Io)?;
        if content.lines().any(|line| !line.trim().is_empty()) {
            annotated += 1;
        }
    }

    Ok(Some(SplitStats {
        split: kind,
        images: image_names.len(),
        labels: label_names.len(),
        annotated,
    }))
}

fn stem(file_name: &str) -> &str {
    Path::new(file_name)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(file_name)
}
