//! Integration tests for checking processed datasets.

use std::fs;

use yoloprep::check::{check_processed, IssueCode};
use yoloprep::{prepare_dataset, PrepareConfig};

mod common;
use common::write_raw_tree;

#[test]
fn freshly_prepared_tree_passes_check() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let tree: [(&str, &[&str]); 3] = [
        ("Fito", &["a.jpg", "b.jpg", "c.jpg"]),
        ("Monilia", &["d.png", "e.png"]),
        ("Sana", &["f.jpeg", "g.jpg", "h.jpg"]),
    ];
    write_raw_tree(&temp.path().join("raw"), &tree);

    let config = PrepareConfig {
        raw_root: temp.path().join("raw"),
        output_root: temp.path().join("processed"),
        shuffle_seed: Some(3),
        ..Default::default()
    };
    prepare_dataset(&config).expect("prepare");

    let report = check_processed(&config.output_root).expect("check");
    assert!(report.issues.is_empty(), "{report}");
    assert_eq!(report.classes, 3);

    let images: usize = report.splits.iter().map(|s| s.images).sum();
    let labels: usize = report.splits.iter().map(|s| s.labels).sum();
    let annotated: usize = report.splits.iter().map(|s| s.annotated).sum();
    assert_eq!((images, labels, annotated), (8, 8, 0));
}

#[test]
fn deleted_label_is_reported() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let tree: [(&str, &[&str]); 3] = [
        ("Fito", &["a.jpg", "b.jpg"]),
        ("Monilia", &["c.jpg", "d.jpg"]),
        ("Sana", &["e.jpg", "f.jpg"]),
    ];
    write_raw_tree(&temp.path().join("raw"), &tree);

    let config = PrepareConfig {
        raw_root: temp.path().join("raw"),
        output_root: temp.path().join("processed"),
        shuffle_seed: Some(3),
        ..Default::default()
    };
    prepare_dataset(&config).expect("prepare");

    let labels = config.output_root.join("train/labels");
    let victim = fs::read_dir(&labels)
        .expect("list labels")
        .next()
        .expect("at least one train label")
        .expect("dir entry")
        .path();
    fs::remove_file(&victim).expect("remove label");

    let report = check_processed(&config.output_root).expect("check");
    assert_eq!(report.error_count(), 1);
    assert_eq!(report.issues[0].code, IssueCode::MissingLabel);
}
