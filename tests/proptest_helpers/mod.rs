#![allow(dead_code)]

use std::path::PathBuf;

use proptest::prelude::*;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};
use yoloprep::classes::ClassId;
use yoloprep::scan::ImageRecord;

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

/// Records with unique file names spread over `classes` classes.
pub fn arb_records(max_len: usize, classes: usize) -> impl Strategy<Value = Vec<ImageRecord>> {
    prop::collection::vec(0..classes, 0..=max_len).prop_map(|class_ids| {
        class_ids
            .into_iter()
            .enumerate()
            .map(|(i, class)| {
                let class_name = format!("class_{class}");
                let file_name = format!("img_{i:04}.jpg");
                ImageRecord {
                    source_path: PathBuf::from("raw").join(&class_name).join(&file_name),
                    class_name,
                    class_id: ClassId(class),
                    file_name,
                }
            })
            .collect()
    })
}

/// Ratios accepted by the partitioner.
pub fn arb_ratio() -> impl Strategy<Value = f64> {
    0.0..0.95f64
}
